use crate::constants::HEADER_X_ROBOTS_TAG;
use crate::error::SecurityHeadersError;
use crate::headers::{diff_result, HeaderResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XRobotsTagConfig {
    #[serde(default = "crate::core::directives::enabled_by_default")]
    pub enabled: bool,
    #[serde(rename = "noindex")]
    pub no_index: bool,
    #[serde(rename = "nofollow")]
    pub no_follow: bool,
    #[serde(rename = "nosnippet")]
    pub no_snippet: bool,
    #[serde(rename = "noarchive")]
    pub no_archive: bool,
    #[serde(rename = "noodp")]
    pub no_odp: bool,
    #[serde(rename = "notranslate")]
    pub no_translate: bool,
    #[serde(rename = "noimageindex")]
    pub no_image_index: bool,
}

impl XRobotsTagConfig {
    #[inline]
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    #[inline]
    pub fn no_index(mut self) -> Self {
        self.no_index = true;
        self
    }

    #[inline]
    pub fn no_follow(mut self) -> Self {
        self.no_follow = true;
        self
    }

    #[inline]
    pub fn no_snippet(mut self) -> Self {
        self.no_snippet = true;
        self
    }

    #[inline]
    pub fn no_archive(mut self) -> Self {
        self.no_archive = true;
        self
    }

    #[inline]
    pub fn no_odp(mut self) -> Self {
        self.no_odp = true;
        self
    }

    #[inline]
    pub fn no_translate(mut self) -> Self {
        self.no_translate = true;
        self
    }

    #[inline]
    pub fn no_image_index(mut self) -> Self {
        self.no_image_index = true;
        self
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.header_value().is_some()
    }

    /// `noindex` already implies the snippet, archive, odp and translate
    /// restrictions, so they are dropped when it is present.
    pub fn header_value(&self) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let implied = !self.no_index;
        let values = [
            (self.no_index, "noindex"),
            (self.no_follow, "nofollow"),
            (self.no_snippet && implied, "nosnippet"),
            (self.no_archive && implied, "noarchive"),
            (self.no_odp && implied, "noodp"),
            (self.no_translate && implied, "notranslate"),
            (self.no_image_index, "noimageindex"),
        ];
        let value = values
            .iter()
            .filter_map(|(set, token)| set.then_some(*token))
            .collect::<Vec<_>>()
            .join(", ");
        (!value.is_empty()).then_some(value)
    }

    pub fn validate(&self) -> Result<(), SecurityHeadersError> {
        if self.enabled && self.header_value().is_none() {
            return Err(SecurityHeadersError::InvalidHeaderConfig {
                header: HEADER_X_ROBOTS_TAG,
                reason: "at least one directive must be set when enabled".to_owned(),
            });
        }
        Ok(())
    }
}

pub fn create_x_robots_tag_result(
    config: &XRobotsTagConfig,
    old_config: Option<&XRobotsTagConfig>,
) -> Option<HeaderResult> {
    diff_result(
        HEADER_X_ROBOTS_TAG,
        config.header_value(),
        old_config.is_some_and(XRobotsTagConfig::is_enabled),
    )
}
