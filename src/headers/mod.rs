pub mod csp;
pub mod hpkp;
pub mod hsts;
pub mod referrer_policy;
pub mod x_content_type_options;
pub mod x_download_options;
pub mod x_frame_options;
pub mod x_robots_tag;
pub mod x_xss_protection;

pub use csp::{create_csp_result, render_csp};
pub use hpkp::{create_hpkp_result, spki_pin, HpkpConfig};
pub use hsts::{create_hsts_result, HstsConfig};
pub use referrer_policy::{create_referrer_policy_result, ReferrerPolicy, ReferrerPolicyConfig};
pub use x_content_type_options::{create_x_content_type_options_result, XContentTypeOptionsConfig};
pub use x_download_options::{create_x_download_options_result, XDownloadOptionsConfig};
pub use x_frame_options::{create_x_frame_options_result, XFrameOptionsConfig, XFrameOptionsPolicy};
pub use x_robots_tag::{create_x_robots_tag_result, XRobotsTagConfig};
pub use x_xss_protection::{create_x_xss_protection_result, XXssPolicy, XXssProtectionConfig};

use crate::core::context::SecurityContext;
use crate::core::merge::merge_csp_configuration;
use crate::error::SecurityHeadersError;
use crate::settings::SecurityHeadersConfig;
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue};
use bytes::Bytes;
use log::debug;
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    Set,
    Remove,
}

/// A decision to set or remove one response header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderResult {
    pub action: HeaderAction,
    pub name: &'static str,
    pub value: Option<String>,
}

pub type HeaderResults = SmallVec<[HeaderResult; 8]>;

impl HeaderResult {
    #[inline]
    pub fn set(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            action: HeaderAction::Set,
            name,
            value: Some(value.into()),
        }
    }

    #[inline]
    pub fn remove(name: &'static str) -> Self {
        Self {
            action: HeaderAction::Remove,
            name,
            value: None,
        }
    }

    /// Writes the decision into a response header map. A later `Set` for the
    /// same name replaces the earlier value.
    pub fn apply(&self, headers: &mut HeaderMap) -> Result<(), SecurityHeadersError> {
        let name = HeaderName::from_bytes(self.name.as_bytes())
            .map_err(|_| SecurityHeadersError::HeaderError(self.name))?;

        match (self.action, &self.value) {
            (HeaderAction::Set, Some(value)) => {
                let value = HeaderValue::from_maybe_shared(Bytes::from(value.clone()))
                    .map_err(|_| SecurityHeadersError::HeaderError(self.name))?;
                headers.insert(name, value);
            }
            (HeaderAction::Set, None) => {
                return Err(SecurityHeadersError::HeaderError(self.name));
            }
            (HeaderAction::Remove, _) => {
                headers.remove(name);
            }
        }
        Ok(())
    }
}

/// Shared rule of the single-value headers: nothing when neither the new nor
/// the old policy is active, a removal when only the old one was, and the
/// rendered value otherwise.
pub(crate) fn diff_result(
    name: &'static str,
    new_value: Option<String>,
    old_enabled: bool,
) -> Option<HeaderResult> {
    match new_value {
        Some(value) => Some(HeaderResult::set(name, value)),
        None if old_enabled => Some(HeaderResult::remove(name)),
        None => None,
    }
}

/// Headers produced by the process-wide configuration alone.
pub fn base_results(
    config: &SecurityHeadersConfig,
    is_https: bool,
    builtin_report_handler_uri: Option<&str>,
) -> HeaderResults {
    let mut results = HeaderResults::new();

    results.extend(create_x_frame_options_result(&config.x_frame_options, None));
    if is_https || !config.hsts.https_only {
        results.extend(create_hsts_result(&config.hsts, None));
    }
    results.extend(create_x_content_type_options_result(
        &config.x_content_type_options,
        None,
    ));
    results.extend(create_x_download_options_result(
        &config.x_download_options,
        None,
    ));
    results.extend(create_x_xss_protection_result(&config.x_xss_protection, None));
    results.extend(create_x_robots_tag_result(&config.x_robots_tag, None));
    results.extend(create_referrer_policy_result(&config.referrer_policy, None));
    if is_https || !config.hpkp.https_only {
        results.extend(create_hpkp_result(&config.hpkp, false, None));
    }
    if is_https || !config.hpkp_report_only.https_only {
        results.extend(create_hpkp_result(&config.hpkp_report_only, true, None));
    }
    results.extend(create_csp_result(
        &config.csp,
        false,
        builtin_report_handler_uri,
        None,
    ));
    results.extend(create_csp_result(
        &config.csp_report_only,
        true,
        builtin_report_handler_uri,
        None,
    ));

    debug!("Computed {} base header results", results.len());
    results
}

/// Headers changed by request overrides, diffed against the base
/// configuration. Applied after [`base_results`].
pub fn override_results(
    config: &SecurityHeadersConfig,
    context: &SecurityContext,
    builtin_report_handler_uri: Option<&str>,
) -> HeaderResults {
    let mut results = HeaderResults::new();

    if let Some(x_frame_options) = &context.x_frame_options {
        results.extend(create_x_frame_options_result(
            x_frame_options,
            Some(&config.x_frame_options),
        ));
    }
    if let Some(x_xss_protection) = &context.x_xss_protection {
        results.extend(create_x_xss_protection_result(
            x_xss_protection,
            Some(&config.x_xss_protection),
        ));
    }
    if let Some(x_robots_tag) = &context.x_robots_tag {
        results.extend(create_x_robots_tag_result(
            x_robots_tag,
            Some(&config.x_robots_tag),
        ));
    }
    if let Some(referrer_policy) = &context.referrer_policy {
        results.extend(create_referrer_policy_result(
            referrer_policy,
            Some(&config.referrer_policy),
        ));
    }

    let csp_headers = [
        (&config.csp, &context.csp, false),
        (&config.csp_report_only, &context.csp_report_only, true),
    ];
    for (base, overrides, report_only) in csp_headers {
        if overrides.is_empty() {
            continue;
        }
        let merged = merge_csp_configuration(base, overrides);
        match create_csp_result(&merged, report_only, builtin_report_handler_uri, Some(base)) {
            Some(result) => results.push(result),
            // Enabled but empty after merging: withdraw what the base set.
            None if base.enabled && render_csp(base, builtin_report_handler_uri).is_some() => {
                results.push(HeaderResult::remove(csp::header_name(report_only)));
            }
            None => {}
        }
    }

    debug!("Computed {} override header results", results.len());
    results
}
