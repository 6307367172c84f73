use crate::core::directives::CspDirectiveKind;
use crate::core::overrides::{CspDirectiveOverride, CspOverrideConfiguration};
use crate::error::SecurityHeadersError;
use crate::headers::{ReferrerPolicyConfig, XFrameOptionsConfig, XRobotsTagConfig, XXssProtectionConfig};
use crate::security::nonce::NonceGenerator;
use log::debug;

/// Overrides accumulated while one request is handled.
///
/// Calls are applied in order, so an outer scope should apply its overrides
/// before an inner one; later values win.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SecurityContext {
    pub csp: CspOverrideConfiguration,
    pub csp_report_only: CspOverrideConfiguration,
    pub x_frame_options: Option<XFrameOptionsConfig>,
    pub x_xss_protection: Option<XXssProtectionConfig>,
    pub x_robots_tag: Option<XRobotsTagConfig>,
    pub referrer_policy: Option<ReferrerPolicyConfig>,
    script_nonce: Option<String>,
    style_nonce: Option<String>,
}

impl SecurityContext {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn csp_override(&mut self, report_only: bool) -> &mut CspOverrideConfiguration {
        if report_only {
            &mut self.csp_report_only
        } else {
            &mut self.csp
        }
    }

    pub fn override_csp_directive(
        &mut self,
        report_only: bool,
        kind: CspDirectiveKind,
        directive: CspDirectiveOverride,
    ) -> Result<&mut Self, SecurityHeadersError> {
        debug!(
            "Overriding {} for {}",
            kind,
            if report_only { "report-only CSP" } else { "CSP" }
        );
        self.csp_override(report_only).set_directive(kind, directive)?;
        Ok(self)
    }

    #[inline]
    pub fn set_csp_enabled(&mut self, report_only: bool, enabled: bool) -> &mut Self {
        self.csp_override(report_only).set_enabled(enabled);
        self
    }

    #[inline]
    pub fn set_x_frame_options(&mut self, config: XFrameOptionsConfig) -> &mut Self {
        self.x_frame_options = Some(config);
        self
    }

    #[inline]
    pub fn set_x_xss_protection(&mut self, config: XXssProtectionConfig) -> &mut Self {
        self.x_xss_protection = Some(config);
        self
    }

    pub fn set_x_robots_tag(
        &mut self,
        config: XRobotsTagConfig,
    ) -> Result<&mut Self, SecurityHeadersError> {
        config.validate()?;
        self.x_robots_tag = Some(config);
        Ok(self)
    }

    #[inline]
    pub fn set_referrer_policy(&mut self, config: ReferrerPolicyConfig) -> &mut Self {
        self.referrer_policy = Some(config);
        self
    }

    /// Nonce for inline scripts. The first call generates it and adds it to
    /// `script-src` of both CSP headers; later calls return the same value.
    pub fn csp_script_nonce(
        &mut self,
        generator: &NonceGenerator,
    ) -> Result<String, SecurityHeadersError> {
        if let Some(nonce) = &self.script_nonce {
            return Ok(nonce.clone());
        }
        let nonce = generator.generate()?;
        self.inject_nonce(CspDirectiveKind::ScriptSrc, &nonce);
        self.script_nonce = Some(nonce.clone());
        Ok(nonce)
    }

    /// Same as [`Self::csp_script_nonce`] for `style-src`.
    pub fn csp_style_nonce(
        &mut self,
        generator: &NonceGenerator,
    ) -> Result<String, SecurityHeadersError> {
        if let Some(nonce) = &self.style_nonce {
            return Ok(nonce.clone());
        }
        let nonce = generator.generate()?;
        self.inject_nonce(CspDirectiveKind::StyleSrc, &nonce);
        self.style_nonce = Some(nonce.clone());
        Ok(nonce)
    }

    #[inline]
    pub fn script_nonce(&self) -> Option<&str> {
        self.script_nonce.as_deref()
    }

    #[inline]
    pub fn style_nonce(&self) -> Option<&str> {
        self.style_nonce.as_deref()
    }

    fn inject_nonce(&mut self, kind: CspDirectiveKind, nonce: &str) {
        debug!("Injecting nonce into {}", kind);
        self.csp.inject_nonce(kind, nonce);
        self.csp_report_only.inject_nonce(kind, nonce);
    }
}
