use crate::core::config::CspConfiguration;
use crate::error::SecurityHeadersError;
use crate::headers::{
    HpkpConfig, HstsConfig, ReferrerPolicyConfig, XContentTypeOptionsConfig,
    XDownloadOptionsConfig, XFrameOptionsConfig, XRobotsTagConfig, XXssProtectionConfig,
};
use crate::constants::HEADER_HPKP_REPORT_ONLY;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Process-wide header configuration. Every section is optional and a
/// missing section leaves its header disabled.
///
/// ```json
/// {
///   "csp": { "default-src": { "self": true }, "script-src": { "custom-sources": ["https://cdn.example"] } },
///   "x-frame-options": { "policy": "deny" },
///   "hsts": { "max-age": 31536000, "include-subdomains": true }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SecurityHeadersConfig {
    pub csp: CspConfiguration,
    pub csp_report_only: CspConfiguration,
    pub x_frame_options: XFrameOptionsConfig,
    pub hsts: HstsConfig,
    pub x_content_type_options: XContentTypeOptionsConfig,
    pub x_download_options: XDownloadOptionsConfig,
    pub x_xss_protection: XXssProtectionConfig,
    pub x_robots_tag: XRobotsTagConfig,
    pub referrer_policy: ReferrerPolicyConfig,
    pub hpkp: HpkpConfig,
    pub hpkp_report_only: HpkpConfig,
}

impl SecurityHeadersConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, SecurityHeadersError> {
        let mut config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SecurityHeadersError> {
        let path = path.as_ref();
        debug!("Loading security header configuration from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Canonicalizes sources in place and checks every section.
    pub fn validate(&mut self) -> Result<(), SecurityHeadersError> {
        self.csp.validate()?;
        self.csp_report_only.validate()?;
        self.hsts.validate()?;
        self.x_robots_tag.validate()?;
        self.hpkp.validate()?;
        self.hpkp_report_only
            .validate()
            .map_err(|err| match err {
                SecurityHeadersError::InvalidHeaderConfig { reason, .. } => {
                    SecurityHeadersError::InvalidHeaderConfig {
                        header: HEADER_HPKP_REPORT_ONLY,
                        reason,
                    }
                }
                other => other,
            })?;
        Ok(())
    }

    #[inline]
    pub fn csp(mut self, csp: CspConfiguration) -> Self {
        self.csp = csp;
        self
    }

    #[inline]
    pub fn csp_report_only(mut self, csp: CspConfiguration) -> Self {
        self.csp_report_only = csp;
        self
    }

    #[inline]
    pub fn x_frame_options(mut self, config: XFrameOptionsConfig) -> Self {
        self.x_frame_options = config;
        self
    }

    #[inline]
    pub fn hsts(mut self, config: HstsConfig) -> Self {
        self.hsts = config;
        self
    }

    #[inline]
    pub fn x_content_type_options(mut self, config: XContentTypeOptionsConfig) -> Self {
        self.x_content_type_options = config;
        self
    }

    #[inline]
    pub fn x_download_options(mut self, config: XDownloadOptionsConfig) -> Self {
        self.x_download_options = config;
        self
    }

    #[inline]
    pub fn x_xss_protection(mut self, config: XXssProtectionConfig) -> Self {
        self.x_xss_protection = config;
        self
    }

    #[inline]
    pub fn x_robots_tag(mut self, config: XRobotsTagConfig) -> Self {
        self.x_robots_tag = config;
        self
    }

    #[inline]
    pub fn referrer_policy(mut self, config: ReferrerPolicyConfig) -> Self {
        self.referrer_policy = config;
        self
    }

    #[inline]
    pub fn hpkp(mut self, config: HpkpConfig) -> Self {
        self.hpkp = config;
        self
    }

    #[inline]
    pub fn hpkp_report_only(mut self, config: HpkpConfig) -> Self {
        self.hpkp_report_only = config;
        self
    }
}
