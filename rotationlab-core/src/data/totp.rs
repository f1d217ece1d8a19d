//! Time-based one-time passwords for the broker login.
//!
//! RFC 6238 with HMAC-SHA1, 30-second steps and 6 digits, which is what the
//! broker's authenticator enrolment produces. The shared secret is base32.

use data_encoding::BASE32_NOPAD;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

type HmacSha1 = Hmac<Sha1>;

const STEP_SECS: u64 = 30;
const DIGITS: u32 = 6;

#[derive(Debug, Error)]
pub enum TotpError {
    #[error("invalid TOTP secret: {0}")]
    InvalidSecret(String),

    #[error("system clock is before the Unix epoch")]
    Clock,
}

/// TOTP generator holding the decoded shared key.
#[derive(Clone)]
pub struct Totp {
    key: Vec<u8>,
}

impl std::fmt::Debug for Totp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Totp").field("key", &"<redacted>").finish()
    }
}

impl Totp {
    /// Decode a base32 secret. Whitespace, padding and lowercase are tolerated.
    pub fn from_base32(secret: &str) -> Result<Self, TotpError> {
        let normalized: String = secret
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '=')
            .map(|c| c.to_ascii_uppercase())
            .collect();
        if normalized.is_empty() {
            return Err(TotpError::InvalidSecret("secret is empty".into()));
        }
        let key = BASE32_NOPAD
            .decode(normalized.as_bytes())
            .map_err(|e| TotpError::InvalidSecret(e.to_string()))?;
        Ok(Self { key })
    }

    /// Code for the step containing `unix_secs`.
    pub fn code_at(&self, unix_secs: u64) -> String {
        let counter = unix_secs / STEP_SECS;
        let value = hotp(&self.key, counter) % 10u32.pow(DIGITS);
        format!("{value:0width$}", width = DIGITS as usize)
    }

    /// Code for the current wall-clock time.
    pub fn now(&self) -> Result<String, TotpError> {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| TotpError::Clock)?
            .as_secs();
        Ok(self.code_at(secs))
    }
}

/// RFC 4226 dynamic truncation of HMAC-SHA1(key, counter).
fn hotp(key: &[u8], counter: u64) -> u32 {
    // HMAC accepts keys of any length, so construction cannot fail here.
    let mut mac = match HmacSha1::new_from_slice(key) {
        Ok(mac) => mac,
        Err(_) => return 0,
    };
    mac.update(&counter.to_be_bytes());
    let hash = mac.finalize().into_bytes();
    let offset = (hash[hash.len() - 1] & 0x0f) as usize;
    (u32::from(hash[offset] & 0x7f) << 24)
        | (u32::from(hash[offset + 1]) << 16)
        | (u32::from(hash[offset + 2]) << 8)
        | u32::from(hash[offset + 3])
}
