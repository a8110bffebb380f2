use std::{
    io::Read,
    path::PathBuf,
};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use fx_pipeline::{
    config::{PipelineConfig, Settings, resolve_database_url},
    cycle::execute_cycle,
    db::{
        connection::{self, StoreConnection},
        migrate,
    },
    event::handle_event,
    forecast::{
        DEFAULT_LOOK_BACK, DEFAULT_TEST_RATIO,
        evaluate::{EvaluationOptions, evaluate_pair},
        model::{Forecaster, LastValue, WindowMean},
    },
};
use quote_source::{models::pair::CurrencyPair, providers::oanda_rest::OandaProvider};
use secrecy::ExposeSecret;
use serde_json::json;
use shared_utils::env::ProcessEnv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Daily FX candle ingestion")]
struct Cli {
    /// Settings file (TOML); defaults apply when omitted
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Create the tables if they do not exist
    Migrate,
    /// Run one ingestion cycle per pair
    Ingest {
        /// Pair to ingest, repeatable; the configured default when omitted
        #[arg(long = "pair", value_name = "PAIR")]
        pairs: Vec<String>,
    },
    /// Handle a trigger payload such as {"currency_pair": "EUR/USD"}
    Event {
        /// JSON payload; read from stdin when omitted
        #[arg(long)]
        payload: Option<String>,
    },
    /// Score a baseline forecaster on the stored closes
    Evaluate {
        #[arg(long)]
        pair: Option<String>,
        #[arg(long, default_value_t = DEFAULT_LOOK_BACK)]
        look_back: usize,
        #[arg(long, default_value_t = DEFAULT_TEST_RATIO)]
        test_ratio: f64,
        #[arg(long, value_enum, default_value_t = Model::LastValue)]
        model: Model,
        /// Span for the window-mean model
        #[arg(long, default_value_t = 5)]
        span: usize,
        /// Store test-set predictions
        #[arg(long)]
        persist: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Model {
    LastValue,
    WindowMean,
}

#[tokio::main]
async fn main() -> Result<()> {
    // a missing .env is fine
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.cmd {
        Cmd::Migrate => {
            let url = resolve_database_url(&ProcessEnv)?;
            let applied = migrate::run_all(url.expose_secret()).context("running migrations")?;
            info!(count = applied.len(), "migrations applied");
            println!("{}", json!({ "applied": applied }));
        }
        Cmd::Ingest { pairs } => {
            let config = PipelineConfig::resolve(settings, &ProcessEnv)?;
            let provider = OandaProvider::new(&config.source)?;
            let pairs = if pairs.is_empty() {
                vec![config.default_pair.clone()]
            } else {
                pairs
                    .iter()
                    .map(|p| p.parse::<CurrencyPair>())
                    .collect::<Result<Vec<_>, _>>()?
            };

            let mut failed = 0;
            for pair in &pairs {
                match execute_cycle(&config, &provider, pair).await {
                    Ok(report) => println!(
                        "{}",
                        json!({ "currency_pair": pair.to_string(), "report": report })
                    ),
                    Err(e) => {
                        failed += 1;
                        println!(
                            "{}",
                            json!({
                                "currency_pair": pair.to_string(),
                                "error": e.to_string(),
                                "kind": e.kind(),
                            })
                        );
                    }
                }
            }
            if failed > 0 {
                bail!("{failed} of {} cycles failed", pairs.len());
            }
        }
        Cmd::Event { payload } => {
            let config = PipelineConfig::resolve(settings, &ProcessEnv)?;
            let provider = OandaProvider::new(&config.source)?;
            let raw = match payload {
                Some(p) => p,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("reading payload from stdin")?;
                    buf
                }
            };
            let payload: serde_json::Value = if raw.trim().is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::from_str(&raw).context("parsing event payload")?
            };

            match handle_event(&config, &provider, &payload).await {
                Ok(response) => println!("{}", serde_json::to_string(&response)?),
                Err(e) => {
                    error!(error = %e, "event failed");
                    println!(
                        "{}",
                        json!({ "status_code": 500, "body": e.to_string(), "kind": e.kind() })
                    );
                    bail!(e);
                }
            }
        }
        Cmd::Evaluate {
            pair,
            look_back,
            test_ratio,
            model,
            span,
            persist,
        } => {
            let url = resolve_database_url(&ProcessEnv)?;
            let pair: CurrencyPair = match pair {
                Some(p) => p.parse()?,
                None => settings.pipeline.default_pair.parse()?,
            };
            let mut forecaster: Box<dyn Forecaster> = match model {
                Model::LastValue => Box::new(LastValue),
                Model::WindowMean => Box::new(WindowMean::new(span)),
            };
            let options = EvaluationOptions {
                look_back,
                test_ratio,
                persist,
            };

            let evaluation = match connection::open(url.expose_secret())? {
                StoreConnection::Sqlite(mut conn) => {
                    evaluate_pair(&mut conn, &pair, forecaster.as_mut(), &options)?
                }
                #[cfg(feature = "postgres")]
                StoreConnection::Postgres(mut conn) => {
                    evaluate_pair(&mut conn, &pair, forecaster.as_mut(), &options)?
                }
            };
            println!("{}", serde_json::to_string(&evaluation)?);
        }
    }

    Ok(())
}
