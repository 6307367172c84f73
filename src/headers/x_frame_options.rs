use crate::constants::HEADER_X_FRAME_OPTIONS;
use crate::headers::{diff_result, HeaderResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum XFrameOptionsPolicy {
    #[default]
    Disabled,
    Deny,
    SameOrigin,
}

impl XFrameOptionsPolicy {
    #[inline]
    pub const fn header_value(&self) -> Option<&'static str> {
        match self {
            Self::Disabled => None,
            Self::Deny => Some("DENY"),
            Self::SameOrigin => Some("SAMEORIGIN"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct XFrameOptionsConfig {
    pub policy: XFrameOptionsPolicy,
}

impl XFrameOptionsConfig {
    #[inline]
    pub fn new(policy: XFrameOptionsPolicy) -> Self {
        Self { policy }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.policy != XFrameOptionsPolicy::Disabled
    }
}

pub fn create_x_frame_options_result(
    config: &XFrameOptionsConfig,
    old_config: Option<&XFrameOptionsConfig>,
) -> Option<HeaderResult> {
    diff_result(
        HEADER_X_FRAME_OPTIONS,
        config.policy.header_value().map(str::to_owned),
        old_config.is_some_and(XFrameOptionsConfig::is_enabled),
    )
}
