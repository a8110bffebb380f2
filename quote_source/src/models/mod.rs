pub mod bar;
pub mod candle;
pub mod granularity;
pub mod pair;
pub mod request_params;
