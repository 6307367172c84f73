use crate::constants::HEADER_X_XSS_PROTECTION;
use crate::headers::{diff_result, HeaderResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum XXssPolicy {
    /// No header is sent.
    #[default]
    Disabled,
    /// `0`, switches the browser filter off.
    FilterDisabled,
    FilterEnabled,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct XXssProtectionConfig {
    pub policy: XXssPolicy,
    pub block_mode: bool,
}

impl XXssProtectionConfig {
    #[inline]
    pub fn new(policy: XXssPolicy, block_mode: bool) -> Self {
        Self { policy, block_mode }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.policy != XXssPolicy::Disabled
    }

    pub fn header_value(&self) -> Option<&'static str> {
        match (self.policy, self.block_mode) {
            (XXssPolicy::Disabled, _) => None,
            (XXssPolicy::FilterDisabled, _) => Some("0"),
            (XXssPolicy::FilterEnabled, false) => Some("1"),
            (XXssPolicy::FilterEnabled, true) => Some("1; mode=block"),
        }
    }
}

pub fn create_x_xss_protection_result(
    config: &XXssProtectionConfig,
    old_config: Option<&XXssProtectionConfig>,
) -> Option<HeaderResult> {
    diff_result(
        HEADER_X_XSS_PROTECTION,
        config.header_value().map(str::to_owned),
        old_config.is_some_and(XXssProtectionConfig::is_enabled),
    )
}
