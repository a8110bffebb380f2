mod common;

use chrono::NaiveDate;
use diesel::prelude::*;
use fx_pipeline::models::{
    CurrencyBarRow, MovingAverageRow, NewCurrencyBar, NewMovingAverage, PredictionRow,
    NewPrediction,
};
use fx_pipeline::schema::{currency_data::dsl as cd, moving_average::dsl as ma, prediction::dsl as pr};

#[test]
fn selectable_smoke_query_compiles_and_runs() {
    let (_db, mut conn) = common::setup_db();
    let ts = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(22, 0, 0)
        .unwrap();

    diesel::insert_into(cd::currency_data)
        .values(&NewCurrencyBar {
            currency_pair: "EUR/USD",
            timestamp: ts,
            open: 1.1,
            high: 1.2,
            low: 1.0,
            close: 1.15,
            volume: 10,
        })
        .execute(&mut conn)
        .unwrap();

    let bars = cd::currency_data
        .select(CurrencyBarRow::as_select())
        .load::<CurrencyBarRow>(&mut conn)
        .unwrap();
    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].timestamp, ts);
    assert_eq!(bars[0].volume, 10);

    diesel::insert_into(ma::moving_average)
        .values(&NewMovingAverage {
            currency_data_id: bars[0].id,
            timestamp: ts,
            window_size: 5,
            average: 1.12,
        })
        .execute(&mut conn)
        .unwrap();
    diesel::insert_into(pr::prediction)
        .values(&NewPrediction {
            currency_data_id: bars[0].id,
            timestamp: ts,
            model_name: "last_value",
            predicted_close: 1.14,
        })
        .execute(&mut conn)
        .unwrap();

    let averages = MovingAverageRow::belonging_to(&bars[0])
        .select(MovingAverageRow::as_select())
        .load(&mut conn)
        .unwrap();
    assert_eq!(averages.len(), 1);
    assert_eq!(averages[0].average, 1.12);

    let predictions = PredictionRow::belonging_to(&bars[0])
        .select(PredictionRow::as_select())
        .load(&mut conn)
        .unwrap();
    assert_eq!(predictions[0].model_name, "last_value");
}
