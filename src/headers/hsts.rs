use crate::constants::{HEADER_HSTS, HSTS_PRELOAD_MIN_MAX_AGE};
use crate::error::SecurityHeadersError;
use crate::headers::{diff_result, HeaderResult};
use serde::{Deserialize, Serialize};

#[inline]
fn https_only_by_default() -> bool {
    true
}

/// Strict-Transport-Security. The header is off while `max_age` is unset;
/// `Some(0)` is a valid policy telling browsers to forget the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct HstsConfig {
    pub max_age: Option<u64>,
    pub include_subdomains: bool,
    pub preload: bool,
    #[serde(default = "https_only_by_default")]
    pub https_only: bool,
}

impl Default for HstsConfig {
    fn default() -> Self {
        Self {
            max_age: None,
            include_subdomains: false,
            preload: false,
            https_only: true,
        }
    }
}

impl HstsConfig {
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
    pub fn preload(mut self, preload: bool) -> Self {
        self.preload = preload;
        self
    }

    #[inline]
    pub fn https_only(mut self, https_only: bool) -> Self {
        self.https_only = https_only;
        self
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.max_age.is_some()
    }

    pub fn header_value(&self) -> Option<String> {
        let mut value = format!("max-age={}", self.max_age?);
        if self.include_subdomains {
            value.push_str("; includeSubDomains");
        }
        if self.preload {
            value.push_str("; preload");
        }
        Some(value)
    }

    /// Browser preload lists require subdomains and at least eighteen weeks.
    pub fn validate(&self) -> Result<(), SecurityHeadersError> {
        if !self.preload {
            return Ok(());
        }
        let reason = match self.max_age {
            Some(_) if !self.include_subdomains => "preload requires includeSubDomains",
            Some(max_age) if max_age < HSTS_PRELOAD_MIN_MAX_AGE => {
                "preload requires a max-age of at least 10886400 seconds"
            }
            _ => return Ok(()),
        };
        Err(SecurityHeadersError::InvalidHeaderConfig {
            header: HEADER_HSTS,
            reason: reason.to_owned(),
        })
    }
}

pub fn create_hsts_result(
    config: &HstsConfig,
    old_config: Option<&HstsConfig>,
) -> Option<HeaderResult> {
    diff_result(
        HEADER_HSTS,
        config.header_value(),
        old_config.is_some_and(HstsConfig::is_enabled),
    )
}
