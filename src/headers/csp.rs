use crate::constants::{
    BLOCK_ALL_MIXED_CONTENT, HEADER_CSP, HEADER_CSP_REPORT_ONLY, NONCE_PREFIX, NONE_SOURCE,
    PLUGIN_TYPES, REPORT_URI, SANDBOX, SELF_SOURCE, STRICT_DYNAMIC_SOURCE, UNSAFE_EVAL_SOURCE,
    UNSAFE_INLINE_SOURCE, UPGRADE_INSECURE_REQUESTS,
};
use crate::core::config::CspConfiguration;
use crate::core::directives::{
    CspDirectiveConfig, CspDirectiveKind, CspMixedContentConfig, CspPluginTypesConfig,
    CspReportUriConfig, CspSandboxConfig, CspUpgradeInsecureRequestsConfig,
};
use crate::headers::HeaderResult;
use crate::utils::{BufferWriter, HeaderBuffer};
use log::{debug, trace};

#[inline]
pub(crate) const fn header_name(report_only: bool) -> &'static str {
    if report_only {
        HEADER_CSP_REPORT_ONLY
    } else {
        HEADER_CSP
    }
}

struct SourceListDirective<'a> {
    kind: CspDirectiveKind,
    config: &'a CspDirectiveConfig,
}

impl BufferWriter for SourceListDirective<'_> {
    fn write_to_buffer(&self, buffer: &mut HeaderBuffer) {
        let config = self.config;
        if !config.enabled {
            return;
        }

        let mut directive = buffer.directive(self.kind.name());
        if config.none_src {
            directive.token(NONE_SOURCE);
            return;
        }

        let keywords = [
            (config.self_src, SELF_SOURCE),
            (config.unsafe_inline_src, UNSAFE_INLINE_SOURCE),
            (config.unsafe_eval_src, UNSAFE_EVAL_SOURCE),
            (config.strict_dynamic_src, STRICT_DYNAMIC_SOURCE),
        ];
        directive
            .tokens(
                keywords
                    .into_iter()
                    .filter_map(|(enabled, keyword)| enabled.then_some(keyword)),
            )
            .tokens(config.custom_sources.iter().map(String::as_str));
        if let Some(nonce) = &config.nonce {
            directive.quoted(NONCE_PREFIX, nonce);
        }
    }
}

impl BufferWriter for CspSandboxConfig {
    fn write_to_buffer(&self, buffer: &mut HeaderBuffer) {
        if self.enabled {
            buffer.directive(SANDBOX).bare().tokens(self.tokens());
        }
    }
}

impl BufferWriter for CspPluginTypesConfig {
    fn write_to_buffer(&self, buffer: &mut HeaderBuffer) {
        if self.enabled {
            buffer
                .directive(PLUGIN_TYPES)
                .tokens(self.media_types.iter().map(String::as_str));
        }
    }
}

impl BufferWriter for CspUpgradeInsecureRequestsConfig {
    fn write_to_buffer(&self, buffer: &mut HeaderBuffer) {
        if self.enabled {
            buffer.directive(UPGRADE_INSECURE_REQUESTS).bare();
        }
    }
}

impl BufferWriter for CspMixedContentConfig {
    fn write_to_buffer(&self, buffer: &mut HeaderBuffer) {
        if self.enabled {
            buffer.directive(BLOCK_ALL_MIXED_CONTENT).bare();
        }
    }
}

struct ReportUriDirective<'a> {
    config: &'a CspReportUriConfig,
    builtin_handler_uri: Option<&'a str>,
}

impl BufferWriter for ReportUriDirective<'_> {
    fn write_to_buffer(&self, buffer: &mut HeaderBuffer) {
        if !self.config.enabled {
            return;
        }
        let builtin = self
            .builtin_handler_uri
            .filter(|_| self.config.enable_builtin_handler);
        buffer.directive(REPORT_URI).tokens(
            builtin
                .into_iter()
                .chain(self.config.report_uris.iter().map(String::as_str)),
        );
    }
}

/// Serializes a configuration, or `None` when no directive produces output.
pub fn render_csp(
    config: &CspConfiguration,
    builtin_report_handler_uri: Option<&str>,
) -> Option<String> {
    let mut buffer = HeaderBuffer::new();

    for (kind, directive) in config.directives() {
        buffer.write(&SourceListDirective {
            kind,
            config: directive,
        });
    }
    buffer
        .write(&config.sandbox)
        .write(&config.plugin_types)
        .write(&config.upgrade_insecure_requests)
        .write(&config.block_all_mixed_content)
        .write(&ReportUriDirective {
            config: &config.report_uri,
            builtin_handler_uri: builtin_report_handler_uri,
        });

    buffer.finish()
}

/// Header decision for a merged configuration.
///
/// A disabled configuration removes the header only when `old_config` had it
/// enabled. An enabled configuration that renders nothing yields `None`.
pub fn create_csp_result(
    config: &CspConfiguration,
    report_only: bool,
    builtin_report_handler_uri: Option<&str>,
    old_config: Option<&CspConfiguration>,
) -> Option<HeaderResult> {
    let name = header_name(report_only);

    if !config.enabled {
        return old_config.filter(|old| old.enabled).map(|_| {
            debug!("Removing {}", name);
            HeaderResult::remove(name)
        });
    }

    let value = render_csp(config, builtin_report_handler_uri)?;
    trace!("{}: {}", name, value);
    Some(HeaderResult::set(name, value))
}
