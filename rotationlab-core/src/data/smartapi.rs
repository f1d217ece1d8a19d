//! Angel One SmartAPI provider.
//!
//! Session login (client code + password + TOTP), feed token from the login
//! payload, and the historical candle endpoint. Every response arrives in the
//! same `{status, message, errorcode, data}` envelope.

use super::provider::{CandleProvider, CandleRequest, DataError};
use super::totp::Totp;
use crate::domain::candle::canonicalize;
use crate::domain::Candle;
use chrono::DateTime;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://apiconnect.angelone.in";

const LOGIN_PATH: &str = "/rest/auth/angelbroking/user/v1/loginByPassword";
const CANDLE_PATH: &str = "/rest/secure/angelbroking/historical/v1/getCandleData";

/// Broker credentials. `Debug` never prints the secrets.
#[derive(Clone)]
pub struct Credentials {
    pub api_key: String,
    pub client_code: String,
    pub password: String,
    pub totp_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("client_code", &self.client_code)
            .field("password", &"<redacted>")
            .field("totp_secret", &"<redacted>")
            .finish()
    }
}

/// Tokens returned by a successful login.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub jwt_token: String,
    pub refresh_token: String,
    pub feed_token: String,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Session { .. }")
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    status: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    errorcode: String,
    data: Option<T>,
}

#[derive(Serialize)]
struct LoginBody<'a> {
    clientcode: &'a str,
    password: &'a str,
    totp: &'a str,
}

#[derive(Serialize)]
struct CandleQuery<'a> {
    exchange: &'a str,
    symboltoken: &'a str,
    interval: &'a str,
    fromdate: String,
    todate: String,
}

/// `[timestamp, open, high, low, close, volume]`
type CandleRow = (String, f64, f64, f64, f64, f64);

/// SmartAPI REST client.
pub struct SmartApiClient {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    session: Option<Session>,
}

impl SmartApiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            session: None,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Build a client and log in.
    pub fn connect(credentials: &Credentials, base_url: &str) -> Result<Self, DataError> {
        let mut client = Self::new(credentials.api_key.clone())?.with_base_url(base_url);
        client.login(credentials)?;
        Ok(client)
    }

    /// Generate a session with a fresh TOTP code.
    pub fn login(&mut self, credentials: &Credentials) -> Result<&Session, DataError> {
        let code = Totp::from_base32(&credentials.totp_secret)
            .and_then(|t| t.now())
            .map_err(|e| DataError::AuthenticationRequired(e.to_string()))?;

        let body = LoginBody {
            clientcode: &credentials.client_code,
            password: &credentials.password,
            totp: &code,
        };
        let session: Session = self
            .post(LOGIN_PATH, &body, None)?
            .ok_or_else(|| DataError::AuthenticationRequired("login returned no session".into()))?;

        log::info!("session established for client {}", credentials.client_code);
        Ok(self.session.insert(session))
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Feed token issued with the current session.
    pub fn feed_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.feed_token.as_str())
    }

    fn headers(&self) -> Result<HeaderMap, DataError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("X-UserType", HeaderValue::from_static("USER"));
        headers.insert("X-SourceID", HeaderValue::from_static("WEB"));
        headers.insert("X-ClientLocalIP", HeaderValue::from_static("127.0.0.1"));
        headers.insert("X-ClientPublicIP", HeaderValue::from_static("127.0.0.1"));
        headers.insert("X-MACAddress", HeaderValue::from_static("00:00:00:00:00:00"));
        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|_| DataError::AuthenticationRequired("API key is not a valid header".into()))?;
        headers.insert("X-PrivateKey", key);
        Ok(headers)
    }

    fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        jwt: Option<&str>,
    ) -> Result<Option<T>, DataError> {
        let url = format!("{}{path}", self.base_url.trim_end_matches('/'));
        let mut request = self.client.post(&url).headers(self.headers()?).json(body);
        if let Some(token) = jwt {
            request = request.bearer_auth(token);
        }

        log::debug!("POST {url}");
        let resp = request
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        let status = resp.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(DataError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DataError::AuthenticationRequired(format!(
                "HTTP {status} from {path}"
            )));
        }

        if !status.is_success() {
            return Err(DataError::Http {
                status: status.as_u16(),
                context: path.to_string(),
            });
        }

        let text = resp
            .text()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;
        parse_envelope(&text)
    }
}

impl CandleProvider for SmartApiClient {
    fn name(&self) -> &str {
        "smartapi"
    }

    fn candles(&self, request: &CandleRequest) -> Result<Vec<Candle>, DataError> {
        let session = self.session.as_ref().ok_or_else(|| {
            DataError::AuthenticationRequired("no active session; log in first".into())
        })?;

        let query = CandleQuery {
            exchange: request.exchange.as_str(),
            symboltoken: request.token.as_str(),
            interval: request.interval.as_str(),
            fromdate: request.from_param(),
            todate: request.to_param(),
        };
        // login may return the token with its scheme prefix
        let jwt = session.jwt_token.trim_start_matches("Bearer ").trim();
        let rows: Option<Vec<CandleRow>> = self.post(CANDLE_PATH, &query, Some(jwt))?;
        parse_candles(rows.unwrap_or_default())
    }
}

/// Unwrap the response envelope, mapping `status: false` to an error.
fn parse_envelope<T: DeserializeOwned>(body: &str) -> Result<Option<T>, DataError> {
    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| {
        if e.is_syntax() || e.is_eof() {
            DataError::InvalidResponse(e.to_string())
        } else {
            DataError::ResponseFormatChanged(e.to_string())
        }
    })?;

    if !envelope.status {
        let code = envelope.errorcode;
        let message = envelope.message;
        // AG8001..AG8003: invalid, expired or missing token.
        return Err(match code.as_str() {
            "AG8001" | "AG8002" | "AG8003" => {
                DataError::AuthenticationRequired(format!("{code}: {message}"))
            }
            _ => DataError::Api { code, message },
        });
    }

    Ok(envelope.data)
}

fn parse_candles(rows: Vec<CandleRow>) -> Result<Vec<Candle>, DataError> {
    let mut candles = Vec::with_capacity(rows.len());
    for (ts, open, high, low, close, volume) in rows {
        let timestamp = DateTime::parse_from_rfc3339(&ts)
            .map_err(|e| DataError::ResponseFormatChanged(format!("invalid timestamp '{ts}': {e}")))?;
        if !volume.is_finite() || volume < 0.0 {
            return Err(DataError::ResponseFormatChanged(format!(
                "invalid volume {volume} at {ts}"
            )));
        }
        let candle = Candle {
            timestamp,
            open,
            high,
            low,
            close,
            volume: volume.round() as u64,
        };
        if !candle.is_sane() {
            log::warn!("inconsistent OHLC at {ts}: {open} {high} {low} {close}");
        }
        candles.push(candle);
    }
    Ok(canonicalize(candles))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_candle_envelope() {
        let body = r#"{
            "status": true, "message": "SUCCESS", "errorcode": "",
            "data": [
                ["2024-03-05T00:00:00+05:30", 101.0, 104.0, 100.0, 103.0, 12000],
                ["2024-03-04T00:00:00+05:30", 100.0, 102.5, 99.0, 101.5, 10000]
            ]
        }"#;
        let rows: Vec<CandleRow> = parse_envelope(body).unwrap().unwrap();
        let candles = parse_candles(rows).unwrap();
        assert_eq!(candles.len(), 2);
        // re-ordered ascending
        assert_eq!(candles[0].open, 100.0);
        assert_eq!(candles[1].volume, 12_000);
    }

    #[test]
    fn null_data_is_empty() {
        let body = r#"{"status": true, "message": "SUCCESS", "errorcode": "", "data": null}"#;
        let rows: Option<Vec<CandleRow>> = parse_envelope(body).unwrap();
        assert!(parse_candles(rows.unwrap_or_default()).unwrap().is_empty());
    }

    #[test]
    fn status_false_maps_to_errors() {
        let body = r#"{"status": false, "message": "Invalid Token", "errorcode": "AG8001", "data": null}"#;
        let err = parse_envelope::<Vec<CandleRow>>(body).unwrap_err();
        assert!(matches!(err, DataError::AuthenticationRequired(_)));

        let body = r#"{"status": false, "message": "Invalid symboltoken", "errorcode": "AB1018", "data": null}"#;
        let err = parse_envelope::<Vec<CandleRow>>(body).unwrap_err();
        assert!(matches!(err, DataError::Api { ref code, .. } if code == "AB1018"));
        assert!(!err.is_transient());
    }

    #[test]
    fn non_json_body_is_transient() {
        let err = parse_envelope::<Vec<CandleRow>>("Access denied because of exceeding access rate")
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidResponse(_)));
        assert!(err.is_transient());
    }

    #[test]
    fn schema_change_is_permanent() {
        let body = r#"{"status": true, "data": [["2024-03-05T00:00:00+05:30", "x"]]}"#;
        let err = parse_envelope::<Vec<CandleRow>>(body).unwrap_err();
        assert!(matches!(err, DataError::ResponseFormatChanged(_)));
    }

    #[test]
    fn session_payload_is_camel_case() {
        let body = r#"{"status": true, "message": "SUCCESS", "errorcode": "",
            "data": {"jwtToken": "Bearer abc", "refreshToken": "r", "feedToken": "f"}}"#;
        let session: Session = parse_envelope(body).unwrap().unwrap();
        assert_eq!(session.feed_token, "f");
        assert_eq!(format!("{session:?}"), "Session { .. }");
    }

    #[test]
    fn candles_require_a_session() {
        let client = SmartApiClient::new("key").unwrap();
        let req = CandleRequest::daily_lookback(
            crate::domain::Exchange::Nse,
            crate::domain::InstrumentToken::new("2885"),
            chrono::NaiveDate::from_ymd_opt(2024, 3, 8)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            7,
        );
        assert!(matches!(
            client.candles(&req),
            Err(DataError::AuthenticationRequired(_))
        ));
        assert!(client.feed_token().is_none());
    }

    #[test]
    fn credentials_debug_is_redacted() {
        let creds = Credentials {
            api_key: "k3y".into(),
            client_code: "A123".into(),
            password: "hunter2".into(),
            totp_secret: "GEZDGNBV".into(),
        };
        let dbg = format!("{creds:?}");
        assert!(dbg.contains("A123"));
        assert!(!dbg.contains("hunter2"));
        assert!(!dbg.contains("k3y"));
    }
}
