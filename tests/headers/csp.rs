use actix_web_secure_headers::core::{
    CspConfiguration, CspConfigurationBuilder, CspDirectiveConfig, CspDirectiveKind,
    CspMixedContentConfig, CspPluginTypesConfig, CspReportUriConfig, CspSandboxConfig,
    CspUpgradeInsecureRequestsConfig, Source,
};
use actix_web_secure_headers::headers::{create_csp_result, render_csp, HeaderAction, HeaderResult};

fn default_self() -> CspConfiguration {
    let mut config = CspConfiguration::new();
    config.default_src = CspDirectiveConfig::new().self_src();
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_directive() {
        assert_eq!(
            create_csp_result(&default_self(), false, None, None),
            Some(HeaderResult::set("Content-Security-Policy", "default-src 'self'"))
        );
    }

    #[test]
    fn test_directives_are_joined_without_space() {
        let mut config = default_self();
        config.script_src = CspDirectiveConfig::new().none();
        let result = create_csp_result(&config, false, None, None).unwrap();
        assert_eq!(result.value.as_deref(), Some("default-src 'self';script-src 'none'"));
    }

    #[test]
    fn test_disabled_with_enabled_old_is_removed() {
        let config = CspConfiguration::default();
        let result = create_csp_result(&config, false, None, Some(&default_self())).unwrap();
        assert_eq!(result.action, HeaderAction::Remove);
        assert_eq!(result.name, "Content-Security-Policy");
        assert_eq!(result.value, None);

        let result = create_csp_result(&config, true, None, Some(&default_self())).unwrap();
        assert_eq!(result.name, "Content-Security-Policy-Report-Only");
    }

    #[test]
    fn test_disabled_with_disabled_old_is_nothing() {
        let config = CspConfiguration::default();
        let mut old = default_self();
        old.enabled = false;
        assert_eq!(create_csp_result(&config, false, None, Some(&old)), None);
    }

    #[test]
    fn test_enabled_without_directives_is_nothing() {
        assert_eq!(create_csp_result(&CspConfiguration::new(), false, None, None), None);

        let mut config = CspConfiguration::new();
        config.img_src = CspDirectiveConfig::new();
        config.plugin_types = CspPluginTypesConfig {
            enabled: true,
            media_types: Vec::new(),
        };
        config.report_uri = CspReportUriConfig::new();
        assert_eq!(create_csp_result(&config, false, Some("/csp-report"), None), None);
    }

    #[test]
    fn test_disabled_directive_is_skipped() {
        let mut config = default_self();
        config.script_src = CspDirectiveConfig {
            enabled: false,
            ..CspDirectiveConfig::new().self_src()
        };
        assert_eq!(render_csp(&config, None).as_deref(), Some("default-src 'self'"));
    }

    #[test]
    fn test_canonical_directive_order() {
        let mut config = CspConfiguration::new();
        for kind in CspDirectiveKind::ALL.into_iter().rev() {
            *config.directive_mut(kind) = CspDirectiveConfig::new().self_src();
        }
        config.report_uri = CspReportUriConfig::new().report_uri("/r").unwrap();
        config.block_all_mixed_content = CspMixedContentConfig::new();
        config.upgrade_insecure_requests = CspUpgradeInsecureRequestsConfig::new(443);
        config.plugin_types = CspPluginTypesConfig::new("application/pdf").unwrap();
        config.sandbox = CspSandboxConfig::new();

        let expected = [
            "default-src 'self'",
            "script-src 'self'",
            "object-src 'self'",
            "style-src 'self'",
            "img-src 'self'",
            "media-src 'self'",
            "frame-src 'self'",
            "font-src 'self'",
            "connect-src 'self'",
            "base-uri 'self'",
            "child-src 'self'",
            "form-action 'self'",
            "frame-ancestors 'self'",
            "manifest-src 'self'",
            "worker-src 'self'",
            "sandbox",
            "plugin-types application/pdf",
            "upgrade-insecure-requests",
            "block-all-mixed-content",
            "report-uri /r",
        ]
        .join(";");
        assert_eq!(render_csp(&config, None), Some(expected));
    }

    #[test]
    fn test_keyword_and_source_order() {
        let config = CspConfigurationBuilder::new()
            .script_src([
                Source::Custom("https://b.example".to_owned()),
                Source::StrictDynamic,
                Source::Custom("https://a.example".to_owned()),
                Source::UnsafeEval,
                Source::UnsafeInline,
                Source::Self_,
            ])
            .build()
            .unwrap();
        assert_eq!(
            render_csp(&config, None).as_deref(),
            Some("script-src 'self' 'unsafe-inline' 'unsafe-eval' 'strict-dynamic' https://b.example https://a.example")
        );
    }

    #[test]
    fn test_full_sandbox_order() {
        let mut config = CspConfiguration::new();
        config.sandbox = CspSandboxConfig::new()
            .allow_top_navigation()
            .allow_scripts()
            .allow_same_origin()
            .allow_presentation()
            .allow_popups_to_escape_sandbox()
            .allow_popups()
            .allow_pointer_lock()
            .allow_orientation_lock()
            .allow_modals()
            .allow_forms();
        assert_eq!(
            render_csp(&config, None).as_deref(),
            Some(
                "sandbox allow-forms allow-modals allow-orientation-lock allow-pointer-lock \
                 allow-popups allow-popups-to-escape-sandbox allow-presentation \
                 allow-same-origin allow-scripts allow-top-navigation"
            )
        );
    }

    #[test]
    fn test_sandbox_in_report_only_header() {
        let mut config = CspConfiguration::new();
        config.sandbox = CspSandboxConfig::new().allow_forms();
        assert_eq!(
            create_csp_result(&config, true, None, None),
            Some(HeaderResult::set(
                "Content-Security-Policy-Report-Only",
                "sandbox allow-forms"
            ))
        );
    }

    #[test]
    fn test_builtin_report_uri_comes_first() {
        let mut config = default_self();
        config.report_uri = CspReportUriConfig::new()
            .builtin_handler()
            .report_uri("https://report.example/csp")
            .unwrap();
        assert_eq!(
            render_csp(&config, Some("/csp-report")).as_deref(),
            Some("default-src 'self';report-uri /csp-report https://report.example/csp")
        );

        config.report_uri.enable_builtin_handler = false;
        assert_eq!(
            render_csp(&config, Some("/csp-report")).as_deref(),
            Some("default-src 'self';report-uri https://report.example/csp")
        );
    }

    #[test]
    fn test_hash_source_renders_quoted() {
        let mut config = CspConfiguration::new();
        config.style_src = CspDirectiveConfig::new()
            .sources("sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU=")
            .unwrap();
        assert_eq!(
            render_csp(&config, None).as_deref(),
            Some("style-src 'sha256-47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU='")
        );
    }
}
