use crate::constants::{HEADER_HPKP, HEADER_HPKP_REPORT_ONLY, HPKP_MIN_PINS};
use crate::error::SecurityHeadersError;
use crate::headers::{diff_result, HeaderResult};
use crate::security::hash::{HashAlgorithm, HashGenerator};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use url::Url;

#[inline]
fn https_only_by_default() -> bool {
    true
}

/// Public-Key-Pins configuration, used for both the enforcing and the
/// report-only header. Pins are base64 SHA-256 digests of a SubjectPublicKeyInfo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HpkpConfig {
    pub max_age: Option<u64>,
    pub include_subdomains: bool,
    pub pins: Vec<String>,
    pub report_uri: Option<String>,
    #[serde(default = "https_only_by_default")]
    pub https_only: bool,
}

impl Default for HpkpConfig {
    fn default() -> Self {
        Self {
            max_age: None,
            include_subdomains: false,
            pins: Vec::new(),
            report_uri: None,
            https_only: true,
        }
    }
}

/// The pin value of a DER encoded SubjectPublicKeyInfo.
pub fn spki_pin(spki_der: &[u8]) -> String {
    HashGenerator::generate(HashAlgorithm::Sha256, spki_der)
}

impl HpkpConfig {
    pub fn new(max_age: u64) -> Self {
        Self {
            max_age: Some(max_age),
            ..Self::default()
        }
    }

    #[inline]
    pub fn include_subdomains(mut self, include: bool) -> Self {
        self.include_subdomains = include;
        self
    }

    #[inline]
    pub fn pin(mut self, pin: impl Into<String>) -> Self {
        self.pins.push(pin.into());
        self
    }

    #[inline]
    pub fn report_uri(mut self, uri: impl Into<String>) -> Self {
        self.report_uri = Some(uri.into());
        self
    }

    #[inline]
    pub fn https_only(mut self, https_only: bool) -> Self {
        self.https_only = https_only;
        self
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.max_age.is_some() && !self.pins.is_empty()
    }

    pub fn header_value(&self) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        let mut value = format!("max-age={}", self.max_age?);
        if self.include_subdomains {
            value.push_str(";includeSubdomains");
        }
        for pin in &self.pins {
            let _ = write!(value, ";pin-sha256=\"{}\"", pin);
        }
        if let Some(uri) = &self.report_uri {
            let _ = write!(value, ";report-uri=\"{}\"", uri);
        }
        Some(value)
    }

    pub fn validate(&self) -> Result<(), SecurityHeadersError> {
        let invalid = |reason: String| SecurityHeadersError::InvalidHeaderConfig {
            header: HEADER_HPKP,
            reason,
        };

        if self.max_age.is_some() && self.pins.len() < HPKP_MIN_PINS {
            return Err(invalid(format!(
                "at least {} pins are required",
                HPKP_MIN_PINS
            )));
        }

        let mut seen = FxHashSet::default();
        for pin in &self.pins {
            let valid = BASE64
                .decode(pin)
                .is_ok_and(|digest| digest.len() == HashAlgorithm::Sha256.digest_len());
            if !valid {
                return Err(invalid(format!("'{}' is not a base64 SHA-256 digest", pin)));
            }
            if !seen.insert(pin.as_str()) {
                return Err(invalid(format!("pin '{}' is listed twice", pin)));
            }
        }

        if let Some(uri) = &self.report_uri {
            // rendered inside a quoted-string
            if uri.contains(|c: char| c == '"' || c == '\\' || c.is_control()) {
                return Err(invalid(format!(
                    "report URI '{}' contains a quote, backslash or control character",
                    uri
                )));
            }
            let absolute = Url::parse(uri)
                .is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host());
            if !absolute {
                return Err(invalid(format!(
                    "report URI '{}' must be an absolute http or https URI",
                    uri
                )));
            }
        }

        Ok(())
    }
}

pub fn create_hpkp_result(
    config: &HpkpConfig,
    report_only: bool,
    old_config: Option<&HpkpConfig>,
) -> Option<HeaderResult> {
    let name = if report_only {
        HEADER_HPKP_REPORT_ONLY
    } else {
        HEADER_HPKP
    };
    diff_result(
        name,
        config.header_value(),
        old_config.is_some_and(HpkpConfig::is_enabled),
    )
}
