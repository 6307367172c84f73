use crate::core::directives::{
    CspDirectiveKind, CspMixedContentConfig, CspReportUriConfig, CspSandboxConfig,
    CspUpgradeInsecureRequestsConfig,
};
use crate::core::source::{parse_media_types, parse_source_list, Source};
use crate::constants;
use crate::error::SecurityHeadersError;

/// A partial directive applied on top of a base directive.
///
/// Keyword flags are tri-state: `None` inherits the base value. Custom
/// sources are appended to the base list while `inherit_custom_sources` is
/// set and replace it otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CspDirectiveOverride {
    pub enabled: bool,
    pub none: Option<bool>,
    pub self_src: Option<bool>,
    pub unsafe_inline: Option<bool>,
    pub unsafe_eval: Option<bool>,
    pub strict_dynamic: Option<bool>,
    pub nonce: Option<String>,
    pub inherit_custom_sources: bool,
    pub custom_sources: Vec<String>,
}

impl Default for CspDirectiveOverride {
    fn default() -> Self {
        Self {
            enabled: true,
            none: None,
            self_src: None,
            unsafe_inline: None,
            unsafe_eval: None,
            strict_dynamic: None,
            nonce: None,
            inherit_custom_sources: true,
            custom_sources: Vec::new(),
        }
    }
}

impl CspDirectiveOverride {
    /// An enabled override that inherits everything.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// An override that switches the directive off.
    #[inline]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    #[inline]
    pub fn none(mut self, value: bool) -> Self {
        self.none = Some(value);
        self
    }

    #[inline]
    pub fn self_src(mut self, value: bool) -> Self {
        self.self_src = Some(value);
        self
    }

    #[inline]
    pub fn unsafe_inline(mut self, value: bool) -> Self {
        self.unsafe_inline = Some(value);
        self
    }

    #[inline]
    pub fn unsafe_eval(mut self, value: bool) -> Self {
        self.unsafe_eval = Some(value);
        self
    }

    #[inline]
    pub fn strict_dynamic(mut self, value: bool) -> Self {
        self.strict_dynamic = Some(value);
        self
    }

    #[inline]
    pub fn inherit_custom_sources(mut self, inherit: bool) -> Self {
        self.inherit_custom_sources = inherit;
        self
    }

    /// Adds a space separated source list. Keywords in the list switch the
    /// matching flag on.
    pub fn custom_sources(mut self, list: &str) -> Result<Self, SecurityHeadersError> {
        for source in parse_source_list(list)? {
            match source {
                Source::None => self.none = Some(true),
                Source::Self_ => self.self_src = Some(true),
                Source::UnsafeInline => self.unsafe_inline = Some(true),
                Source::UnsafeEval => self.unsafe_eval = Some(true),
                Source::StrictDynamic => self.strict_dynamic = Some(true),
                custom => self.custom_sources.push(custom.to_string()),
            }
        }
        Ok(self)
    }

    pub fn nonce(mut self, nonce: &str) -> Result<Self, SecurityHeadersError> {
        validate_nonce(nonce)?;
        self.nonce = Some(nonce.to_owned());
        Ok(self)
    }

    /// Rejects keywords the directive does not support and `'none'` mixed
    /// with anything that would be rendered next to it.
    pub fn validate(&self, kind: CspDirectiveKind) -> Result<(), SecurityHeadersError> {
        let directive = kind.name();
        let on = |flag: Option<bool>| flag == Some(true);

        let unsupported = if on(self.unsafe_inline) && !kind.supports_unsafe_inline() {
            Some(constants::UNSAFE_INLINE_SOURCE)
        } else if on(self.unsafe_eval) && !kind.supports_unsafe_eval() {
            Some(constants::UNSAFE_EVAL_SOURCE)
        } else if on(self.strict_dynamic) && !kind.supports_strict_dynamic() {
            Some(constants::STRICT_DYNAMIC_SOURCE)
        } else {
            None
        };
        if let Some(keyword) = unsupported {
            return Err(SecurityHeadersError::UnsupportedKeyword { directive, keyword });
        }

        let others = on(self.self_src)
            || on(self.unsafe_inline)
            || on(self.unsafe_eval)
            || on(self.strict_dynamic)
            || self.nonce.is_some()
            || !self.custom_sources.is_empty();
        if on(self.none) && others {
            return Err(SecurityHeadersError::NoneCombined { directive });
        }

        Ok(())
    }

    fn enables_source(&self) -> bool {
        [
            self.self_src,
            self.unsafe_inline,
            self.unsafe_eval,
            self.strict_dynamic,
        ]
        .contains(&Some(true))
            || self.nonce.is_some()
            || !self.custom_sources.is_empty()
    }

    /// Layers an inner override on top of this one. Merging a base with the
    /// result equals merging it with `self` and then with `inner`, except
    /// that an inner layer turning on any source clears an outer `'none'`.
    pub fn layer(&mut self, inner: &CspDirectiveOverride) {
        self.enabled = inner.enabled;
        self.none = match inner.none {
            Some(none) => Some(none),
            None if self.none == Some(true) && inner.enables_source() => Some(false),
            None => self.none,
        };
        self.self_src = inner.self_src.or(self.self_src);
        self.unsafe_inline = inner.unsafe_inline.or(self.unsafe_inline);
        self.unsafe_eval = inner.unsafe_eval.or(self.unsafe_eval);
        self.strict_dynamic = inner.strict_dynamic.or(self.strict_dynamic);
        if inner.nonce.is_some() {
            self.nonce.clone_from(&inner.nonce);
        }
        if inner.inherit_custom_sources {
            self.custom_sources
                .extend(inner.custom_sources.iter().cloned());
        } else {
            self.inherit_custom_sources = false;
            self.custom_sources.clone_from(&inner.custom_sources);
        }
    }
}

/// Nonces are base64 values; anything else would break the quoted token.
pub(crate) fn validate_nonce(nonce: &str) -> Result<(), SecurityHeadersError> {
    let valid = !nonce.is_empty()
        && nonce
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=' | b'-' | b'_'));
    if valid {
        Ok(())
    } else {
        Err(SecurityHeadersError::InvalidNonceValue(nonce.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CspPluginTypesOverride {
    pub enabled: bool,
    pub inherit_media_types: bool,
    pub media_types: Vec<String>,
}

impl Default for CspPluginTypesOverride {
    fn default() -> Self {
        Self {
            enabled: true,
            inherit_media_types: true,
            media_types: Vec::new(),
        }
    }
}

impl CspPluginTypesOverride {
    pub fn new(media_types: &str) -> Result<Self, SecurityHeadersError> {
        Ok(Self {
            media_types: parse_media_types(media_types)?,
            ..Self::default()
        })
    }

    #[inline]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    #[inline]
    pub fn inherit_media_types(mut self, inherit: bool) -> Self {
        self.inherit_media_types = inherit;
        self
    }

    pub fn layer(&mut self, inner: &CspPluginTypesOverride) {
        self.enabled = inner.enabled;
        if inner.inherit_media_types {
            self.media_types.extend(inner.media_types.iter().cloned());
        } else {
            self.inherit_media_types = false;
            self.media_types.clone_from(&inner.media_types);
        }
    }
}

/// Request-scoped changes to one CSP header. Absent entries inherit the base
/// configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CspOverrideConfiguration {
    pub enabled_override: Option<bool>,
    directives: [Option<CspDirectiveOverride>; CspDirectiveKind::COUNT],
    pub sandbox: Option<CspSandboxConfig>,
    pub plugin_types: Option<CspPluginTypesOverride>,
    pub upgrade_insecure_requests: Option<CspUpgradeInsecureRequestsConfig>,
    pub block_all_mixed_content: Option<CspMixedContentConfig>,
    pub report_uri: Option<CspReportUriConfig>,
}

impl CspOverrideConfiguration {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    #[inline]
    pub fn set_enabled(&mut self, enabled: bool) -> &mut Self {
        self.enabled_override = Some(enabled);
        self
    }

    #[inline]
    pub fn directive(&self, kind: CspDirectiveKind) -> Option<&CspDirectiveOverride> {
        self.directives[kind.index()].as_ref()
    }

    /// Validates the override and layers it over any earlier one for the
    /// same directive.
    pub fn set_directive(
        &mut self,
        kind: CspDirectiveKind,
        directive: CspDirectiveOverride,
    ) -> Result<&mut Self, SecurityHeadersError> {
        directive.validate(kind)?;
        let slot = &mut self.directives[kind.index()];
        match slot {
            Some(existing) => existing.layer(&directive),
            None => *slot = Some(directive),
        }
        Ok(self)
    }

    /// Attaches a nonce, creating an inheriting override when none exists.
    pub(crate) fn inject_nonce(&mut self, kind: CspDirectiveKind, nonce: &str) {
        self.directives[kind.index()]
            .get_or_insert_with(CspDirectiveOverride::default)
            .nonce = Some(nonce.to_owned());
    }

    #[inline]
    pub fn set_sandbox(&mut self, sandbox: CspSandboxConfig) -> &mut Self {
        self.sandbox = Some(sandbox);
        self
    }

    pub fn set_plugin_types(&mut self, plugin_types: CspPluginTypesOverride) -> &mut Self {
        match &mut self.plugin_types {
            Some(existing) => existing.layer(&plugin_types),
            None => self.plugin_types = Some(plugin_types),
        }
        self
    }

    pub fn set_upgrade_insecure_requests(
        &mut self,
        config: CspUpgradeInsecureRequestsConfig,
    ) -> Result<&mut Self, SecurityHeadersError> {
        config.validate()?;
        self.upgrade_insecure_requests = Some(config);
        Ok(self)
    }

    #[inline]
    pub fn set_block_all_mixed_content(&mut self, config: CspMixedContentConfig) -> &mut Self {
        self.block_all_mixed_content = Some(config);
        self
    }

    pub fn set_report_uri(
        &mut self,
        mut config: CspReportUriConfig,
    ) -> Result<&mut Self, SecurityHeadersError> {
        config.validate()?;
        self.report_uri = Some(config);
        Ok(self)
    }

    /// Layers an inner override configuration over this one.
    pub fn layer(&mut self, inner: &CspOverrideConfiguration) {
        if inner.enabled_override.is_some() {
            self.enabled_override = inner.enabled_override;
        }
        for (slot, layered) in self.directives.iter_mut().zip(inner.directives.iter()) {
            if let Some(layered) = layered {
                match slot {
                    Some(existing) => existing.layer(layered),
                    None => *slot = Some(layered.clone()),
                }
            }
        }
        if let Some(sandbox) = &inner.sandbox {
            self.sandbox = Some(sandbox.clone());
        }
        if let Some(plugin_types) = &inner.plugin_types {
            self.set_plugin_types(plugin_types.clone());
        }
        if let Some(upgrade) = &inner.upgrade_insecure_requests {
            self.upgrade_insecure_requests = Some(upgrade.clone());
        }
        if let Some(mixed_content) = &inner.block_all_mixed_content {
            self.block_all_mixed_content = Some(mixed_content.clone());
        }
        if let Some(report_uri) = &inner.report_uri {
            self.report_uri = Some(report_uri.clone());
        }
    }
}
