//! Domain types shared by the data layer, the metrics and the runner.

pub mod candle;
pub mod instrument;

pub use candle::Candle;
pub use instrument::{Exchange, InstrumentToken, Interval};
