//! Exchange segments, candle intervals and instrument tokens.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exchange segment as named by the broker (`exch_seg` in the instrument master).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exchange {
    Nse,
    Bse,
    Nfo,
    Mcx,
}

impl Exchange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Exchange::Nse => "NSE",
            Exchange::Bse => "BSE",
            Exchange::Nfo => "NFO",
            Exchange::Mcx => "MCX",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exchange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NSE" => Ok(Exchange::Nse),
            "BSE" => Ok(Exchange::Bse),
            "NFO" => Ok(Exchange::Nfo),
            "MCX" => Ok(Exchange::Mcx),
            other => Err(format!("unknown exchange '{other}'")),
        }
    }
}

/// Candle interval accepted by the historical data endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Interval {
    OneMinute,
    FiveMinute,
    FifteenMinute,
    OneHour,
    OneDay,
}

impl Interval {
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "ONE_MINUTE",
            Interval::FiveMinute => "FIVE_MINUTE",
            Interval::FifteenMinute => "FIFTEEN_MINUTE",
            Interval::OneHour => "ONE_HOUR",
            Interval::OneDay => "ONE_DAY",
        }
    }
}

/// Broker-side numeric identifier of an instrument ("symbol token").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentToken(pub String);

impl InstrumentToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstrumentToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exchange_parses_case_insensitively() {
        assert_eq!("nse".parse::<Exchange>().unwrap(), Exchange::Nse);
        assert_eq!("BSE".parse::<Exchange>().unwrap(), Exchange::Bse);
        assert!("LSE".parse::<Exchange>().is_err());
    }

    #[test]
    fn exchange_serde_uses_broker_names() {
        let json = serde_json::to_string(&Exchange::Nse).unwrap();
        assert_eq!(json, "\"NSE\"");
    }

    #[test]
    fn interval_wire_names() {
        assert_eq!(Interval::OneDay.as_str(), "ONE_DAY");
        let json = serde_json::to_string(&Interval::FiveMinute).unwrap();
        assert_eq!(json, "\"FIVE_MINUTE\"");
    }
}
