use actix_web_secure_headers::core::{
    merge_csp_configuration, CspConfiguration, CspDirectiveConfig, CspDirectiveKind,
    CspDirectiveOverride, SecurityContext,
};
use actix_web_secure_headers::headers::{render_csp, XFrameOptionsConfig, XFrameOptionsPolicy, XRobotsTagConfig};
use actix_web_secure_headers::security::{NonceGenerator, RandomSource};
use actix_web_secure_headers::SecurityHeadersError;
use mockall::mock;
use std::sync::Arc;

mock! {
    pub Random {}

    impl RandomSource for Random {
        fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), SecurityHeadersError>;
    }
}

fn fixed_generator(byte: u8, calls: usize) -> NonceGenerator {
    let mut random = MockRandom::new();
    random.expect_fill_bytes().times(calls).returning(move |dest| {
        dest.fill(byte);
        Ok(())
    });
    NonceGenerator::with_source(4, Arc::new(random))
}

fn base_policy() -> CspConfiguration {
    let mut config = CspConfiguration::new();
    config.script_src = CspDirectiveConfig::new().self_src();
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_nonce_is_generated_once() {
        let generator = fixed_generator(7, 1);
        let mut context = SecurityContext::new();

        let first = context.csp_script_nonce(&generator).unwrap();
        let second = context.csp_script_nonce(&generator).unwrap();

        assert_eq!(first, "BwcHBw==");
        assert_eq!(first, second);
        assert_eq!(context.script_nonce(), Some("BwcHBw=="));
        assert_eq!(context.style_nonce(), None);
    }

    #[test]
    fn test_script_nonce_reaches_both_headers() {
        let generator = fixed_generator(7, 1);
        let mut context = SecurityContext::new();
        let nonce = context.csp_script_nonce(&generator).unwrap();

        let base = base_policy();
        for overrides in [&context.csp, &context.csp_report_only] {
            let merged = merge_csp_configuration(&base, overrides);
            assert_eq!(
                render_csp(&merged, None).unwrap(),
                format!("script-src 'self' 'nonce-{}'", nonce)
            );
        }
    }

    #[test]
    fn test_nonce_enables_missing_directive() {
        let generator = fixed_generator(7, 1);
        let mut context = SecurityContext::new();
        context.csp_style_nonce(&generator).unwrap();

        let merged = merge_csp_configuration(&base_policy(), &context.csp);
        assert!(merged.style_src.enabled);
        assert_eq!(
            render_csp(&merged, None).as_deref(),
            Some("script-src 'self';style-src 'nonce-BwcHBw=='")
        );
    }

    #[test]
    fn test_nonce_joins_existing_override() {
        let generator = fixed_generator(1, 1);
        let mut context = SecurityContext::new();
        context
            .override_csp_directive(
                false,
                CspDirectiveKind::ScriptSrc,
                CspDirectiveOverride::new()
                    .custom_sources("https://cdn.example")
                    .unwrap(),
            )
            .unwrap();
        context.csp_script_nonce(&generator).unwrap();

        let merged = merge_csp_configuration(&base_policy(), &context.csp);
        assert_eq!(
            render_csp(&merged, None).as_deref(),
            Some("script-src 'self' https://cdn.example 'nonce-AQEBAQ=='")
        );
    }

    #[test]
    fn test_script_and_style_nonces_are_independent() {
        let mut random = MockRandom::new();
        let mut next = 0u8;
        random.expect_fill_bytes().times(2).returning(move |dest| {
            next += 1;
            dest.fill(next);
            Ok(())
        });
        let generator = NonceGenerator::with_source(4, Arc::new(random));
        let mut context = SecurityContext::new();

        let script = context.csp_script_nonce(&generator).unwrap();
        let style = context.csp_style_nonce(&generator).unwrap();
        assert_ne!(script, style);
        assert_eq!(context.csp_style_nonce(&generator).unwrap(), style);
    }

    #[test]
    fn test_random_failure_is_propagated() {
        let mut random = MockRandom::new();
        random
            .expect_fill_bytes()
            .times(1)
            .returning(|_| Err(SecurityHeadersError::RandomError("unavailable".to_owned())));
        let generator = NonceGenerator::with_source(4, Arc::new(random));
        let mut context = SecurityContext::new();

        let err = context.csp_script_nonce(&generator).unwrap_err();
        assert!(matches!(err, SecurityHeadersError::RandomError(_)));
        assert_eq!(context.script_nonce(), None);
        assert!(context.csp.is_empty());
    }

    #[test]
    fn test_report_only_override_is_separate() {
        let mut context = SecurityContext::new();
        context
            .override_csp_directive(
                true,
                CspDirectiveKind::ScriptSrc,
                CspDirectiveOverride::disabled(),
            )
            .unwrap();
        context.set_csp_enabled(false, false);

        assert_eq!(context.csp.enabled_override, Some(false));
        assert!(context.csp.directive(CspDirectiveKind::ScriptSrc).is_none());
        assert!(context.csp_report_only.directive(CspDirectiveKind::ScriptSrc).is_some());
    }

    #[test]
    fn test_simple_header_overrides() {
        let mut context = SecurityContext::new();
        context.set_x_frame_options(XFrameOptionsConfig::new(XFrameOptionsPolicy::Deny));
        assert_eq!(
            context.x_frame_options.as_ref().map(|config| config.policy),
            Some(XFrameOptionsPolicy::Deny)
        );

        let empty_robots = XRobotsTagConfig::new();
        assert!(context.set_x_robots_tag(empty_robots).is_err());
        assert!(context.x_robots_tag.is_none());
        context
            .set_x_robots_tag(XRobotsTagConfig::new().no_index())
            .unwrap();
        assert!(context.x_robots_tag.is_some());
    }
}
