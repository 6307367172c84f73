use crate::core::config::CspConfiguration;
use crate::core::directives::{CspDirectiveConfig, CspDirectiveKind, CspPluginTypesConfig};
use crate::core::overrides::{CspDirectiveOverride, CspOverrideConfiguration, CspPluginTypesOverride};
use log::debug;

/// Combines a validated base configuration with request overrides.
///
/// The base is never modified. The result is not re-validated: overrides are
/// checked when they are set, and rendering treats `'none'` as exclusive.
pub fn merge_csp_configuration(
    base: &CspConfiguration,
    overrides: &CspOverrideConfiguration,
) -> CspConfiguration {
    let mut merged = base.clone();

    if let Some(enabled) = overrides.enabled_override {
        merged.enabled = enabled;
    }

    for kind in CspDirectiveKind::ALL {
        if let Some(directive_override) = overrides.directive(kind) {
            debug!("Applying override to {}", kind);
            let directive = merge_directive(base.directive(kind), directive_override);
            *merged.directive_mut(kind) = directive;
        }
    }

    if let Some(sandbox) = &overrides.sandbox {
        merged.sandbox = sandbox.clone();
    }
    if let Some(plugin_types) = &overrides.plugin_types {
        merged.plugin_types = merge_plugin_types(&base.plugin_types, plugin_types);
    }
    if let Some(upgrade) = &overrides.upgrade_insecure_requests {
        merged.upgrade_insecure_requests = upgrade.clone();
    }
    if let Some(mixed_content) = &overrides.block_all_mixed_content {
        merged.block_all_mixed_content = mixed_content.clone();
    }
    if let Some(report_uri) = &overrides.report_uri {
        merged.report_uri = report_uri.clone();
    }

    merged
}

pub fn merge_directive(
    base: &CspDirectiveConfig,
    directive_override: &CspDirectiveOverride,
) -> CspDirectiveConfig {
    let custom_sources = if directive_override.inherit_custom_sources {
        let mut sources =
            Vec::with_capacity(base.custom_sources.len() + directive_override.custom_sources.len());
        sources.extend(base.custom_sources.iter().cloned());
        sources.extend(directive_override.custom_sources.iter().cloned());
        sources
    } else {
        directive_override.custom_sources.clone()
    };

    CspDirectiveConfig {
        enabled: directive_override.enabled,
        none_src: directive_override.none.unwrap_or(base.none_src),
        self_src: directive_override.self_src.unwrap_or(base.self_src),
        unsafe_inline_src: directive_override
            .unsafe_inline
            .unwrap_or(base.unsafe_inline_src),
        unsafe_eval_src: directive_override.unsafe_eval.unwrap_or(base.unsafe_eval_src),
        strict_dynamic_src: directive_override
            .strict_dynamic
            .unwrap_or(base.strict_dynamic_src),
        nonce: directive_override
            .nonce
            .clone()
            .or_else(|| base.nonce.clone()),
        custom_sources,
    }
}

pub fn merge_plugin_types(
    base: &CspPluginTypesConfig,
    plugin_types_override: &CspPluginTypesOverride,
) -> CspPluginTypesConfig {
    let media_types = if plugin_types_override.inherit_media_types {
        base.media_types
            .iter()
            .chain(plugin_types_override.media_types.iter())
            .cloned()
            .collect()
    } else {
        plugin_types_override.media_types.clone()
    };

    CspPluginTypesConfig {
        enabled: plugin_types_override.enabled,
        media_types,
    }
}
