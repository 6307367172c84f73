use crate::constants::HEADER_REFERRER_POLICY;
use crate::headers::{diff_result, HeaderResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferrerPolicy {
    #[default]
    Disabled,
    NoReferrer,
    NoReferrerWhenDowngrade,
    Origin,
    OriginWhenCrossOrigin,
    SameOrigin,
    StrictOrigin,
    StrictOriginWhenCrossOrigin,
    UnsafeUrl,
}

impl ReferrerPolicy {
    pub const fn header_value(&self) -> Option<&'static str> {
        match self {
            Self::Disabled => None,
            Self::NoReferrer => Some("no-referrer"),
            Self::NoReferrerWhenDowngrade => Some("no-referrer-when-downgrade"),
            Self::Origin => Some("origin"),
            Self::OriginWhenCrossOrigin => Some("origin-when-cross-origin"),
            Self::SameOrigin => Some("same-origin"),
            Self::StrictOrigin => Some("strict-origin"),
            Self::StrictOriginWhenCrossOrigin => Some("strict-origin-when-cross-origin"),
            Self::UnsafeUrl => Some("unsafe-url"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ReferrerPolicyConfig {
    pub policy: ReferrerPolicy,
}

impl ReferrerPolicyConfig {
    #[inline]
    pub fn new(policy: ReferrerPolicy) -> Self {
        Self { policy }
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.policy != ReferrerPolicy::Disabled
    }
}

pub fn create_referrer_policy_result(
    config: &ReferrerPolicyConfig,
    old_config: Option<&ReferrerPolicyConfig>,
) -> Option<HeaderResult> {
    diff_result(
        HEADER_REFERRER_POLICY,
        config.policy.header_value().map(str::to_owned),
        old_config.is_some_and(ReferrerPolicyConfig::is_enabled),
    )
}
