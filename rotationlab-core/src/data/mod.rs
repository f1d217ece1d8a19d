//! Data layer: brokerage session, instrument lookup, candle retrieval, universe.

pub mod provider;
pub mod retry;
pub mod scrip_master;
pub mod smartapi;
pub mod totp;
pub mod universe;

pub use provider::{CandleProvider, CandleRequest, DataError};
pub use retry::{RecordingSleeper, RetryError, RetryPolicy, Sleeper, ThreadSleeper};
pub use scrip_master::{ScripRecord, SymbolTable, INSTRUMENT_MASTER_URL};
pub use smartapi::{Credentials, Session, SmartApiClient, DEFAULT_BASE_URL};
pub use totp::{Totp, TotpError};
pub use universe::{Sector, SectorId, Universe, UniverseError};
