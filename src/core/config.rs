use crate::core::directives::{
    enabled_by_default, CspDirectiveConfig, CspDirectiveKind, CspMixedContentConfig,
    CspPluginTypesConfig, CspReportUriConfig, CspSandboxConfig, CspUpgradeInsecureRequestsConfig,
};
use crate::core::source::Source;
use crate::error::SecurityHeadersError;
use serde::{Deserialize, Serialize};

/// A complete Content-Security-Policy configuration.
///
/// Every directive is always present; an unused directive is simply
/// disabled, so rendering and merging never deal with missing entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CspConfiguration {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub default_src: CspDirectiveConfig,
    pub script_src: CspDirectiveConfig,
    pub object_src: CspDirectiveConfig,
    pub style_src: CspDirectiveConfig,
    pub img_src: CspDirectiveConfig,
    pub media_src: CspDirectiveConfig,
    pub frame_src: CspDirectiveConfig,
    pub font_src: CspDirectiveConfig,
    pub connect_src: CspDirectiveConfig,
    pub base_uri: CspDirectiveConfig,
    pub child_src: CspDirectiveConfig,
    pub form_action: CspDirectiveConfig,
    pub frame_ancestors: CspDirectiveConfig,
    pub manifest_src: CspDirectiveConfig,
    pub worker_src: CspDirectiveConfig,
    pub sandbox: CspSandboxConfig,
    pub plugin_types: CspPluginTypesConfig,
    pub upgrade_insecure_requests: CspUpgradeInsecureRequestsConfig,
    pub block_all_mixed_content: CspMixedContentConfig,
    pub report_uri: CspReportUriConfig,
}

impl CspConfiguration {
    /// An enabled configuration with every directive disabled.
    #[inline]
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    pub fn directive(&self, kind: CspDirectiveKind) -> &CspDirectiveConfig {
        match kind {
            CspDirectiveKind::DefaultSrc => &self.default_src,
            CspDirectiveKind::ScriptSrc => &self.script_src,
            CspDirectiveKind::ObjectSrc => &self.object_src,
            CspDirectiveKind::StyleSrc => &self.style_src,
            CspDirectiveKind::ImgSrc => &self.img_src,
            CspDirectiveKind::MediaSrc => &self.media_src,
            CspDirectiveKind::FrameSrc => &self.frame_src,
            CspDirectiveKind::FontSrc => &self.font_src,
            CspDirectiveKind::ConnectSrc => &self.connect_src,
            CspDirectiveKind::BaseUri => &self.base_uri,
            CspDirectiveKind::ChildSrc => &self.child_src,
            CspDirectiveKind::FormAction => &self.form_action,
            CspDirectiveKind::FrameAncestors => &self.frame_ancestors,
            CspDirectiveKind::ManifestSrc => &self.manifest_src,
            CspDirectiveKind::WorkerSrc => &self.worker_src,
        }
    }

    pub fn directive_mut(&mut self, kind: CspDirectiveKind) -> &mut CspDirectiveConfig {
        match kind {
            CspDirectiveKind::DefaultSrc => &mut self.default_src,
            CspDirectiveKind::ScriptSrc => &mut self.script_src,
            CspDirectiveKind::ObjectSrc => &mut self.object_src,
            CspDirectiveKind::StyleSrc => &mut self.style_src,
            CspDirectiveKind::ImgSrc => &mut self.img_src,
            CspDirectiveKind::MediaSrc => &mut self.media_src,
            CspDirectiveKind::FrameSrc => &mut self.frame_src,
            CspDirectiveKind::FontSrc => &mut self.font_src,
            CspDirectiveKind::ConnectSrc => &mut self.connect_src,
            CspDirectiveKind::BaseUri => &mut self.base_uri,
            CspDirectiveKind::ChildSrc => &mut self.child_src,
            CspDirectiveKind::FormAction => &mut self.form_action,
            CspDirectiveKind::FrameAncestors => &mut self.frame_ancestors,
            CspDirectiveKind::ManifestSrc => &mut self.manifest_src,
            CspDirectiveKind::WorkerSrc => &mut self.worker_src,
        }
    }

    /// Source-list directives paired with their kind, in rendering order.
    pub fn directives(&self) -> impl Iterator<Item = (CspDirectiveKind, &CspDirectiveConfig)> {
        CspDirectiveKind::ALL
            .into_iter()
            .map(move |kind| (kind, self.directive(kind)))
    }

    /// Canonicalizes sources and report URIs in place and enforces the
    /// per-directive rules. Runs once when the configuration is loaded.
    pub fn validate(&mut self) -> Result<(), SecurityHeadersError> {
        for kind in CspDirectiveKind::ALL {
            self.directive_mut(kind).validate(kind)?;
        }
        self.plugin_types.validate()?;
        self.report_uri.validate()?;
        self.upgrade_insecure_requests.validate()?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct CspConfigurationBuilder {
    config: CspConfiguration,
}

impl CspConfigurationBuilder {
    #[inline]
    pub fn new() -> Self {
        Self {
            config: CspConfiguration::new(),
        }
    }

    #[inline]
    pub fn directive(mut self, kind: CspDirectiveKind, directive: CspDirectiveConfig) -> Self {
        *self.config.directive_mut(kind) = directive;
        self
    }

    pub fn sources(
        self,
        kind: CspDirectiveKind,
        sources: impl IntoIterator<Item = Source>,
    ) -> Self {
        let directive = sources
            .into_iter()
            .fold(CspDirectiveConfig::new(), CspDirectiveConfig::add_source);
        self.directive(kind, directive)
    }

    pub fn default_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(CspDirectiveKind::DefaultSrc, sources)
    }

    pub fn script_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(CspDirectiveKind::ScriptSrc, sources)
    }

    pub fn style_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(CspDirectiveKind::StyleSrc, sources)
    }

    pub fn img_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(CspDirectiveKind::ImgSrc, sources)
    }

    pub fn connect_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(CspDirectiveKind::ConnectSrc, sources)
    }

    pub fn font_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(CspDirectiveKind::FontSrc, sources)
    }

    pub fn object_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(CspDirectiveKind::ObjectSrc, sources)
    }

    pub fn media_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(CspDirectiveKind::MediaSrc, sources)
    }

    pub fn frame_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(CspDirectiveKind::FrameSrc, sources)
    }

    pub fn worker_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(CspDirectiveKind::WorkerSrc, sources)
    }

    pub fn manifest_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(CspDirectiveKind::ManifestSrc, sources)
    }

    pub fn child_src(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(CspDirectiveKind::ChildSrc, sources)
    }

    pub fn frame_ancestors(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(CspDirectiveKind::FrameAncestors, sources)
    }

    pub fn base_uri(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(CspDirectiveKind::BaseUri, sources)
    }

    pub fn form_action(self, sources: impl IntoIterator<Item = Source>) -> Self {
        self.sources(CspDirectiveKind::FormAction, sources)
    }

    #[inline]
    pub fn sandbox(mut self, sandbox: CspSandboxConfig) -> Self {
        self.config.sandbox = sandbox;
        self
    }

    #[inline]
    pub fn plugin_types(mut self, plugin_types: CspPluginTypesConfig) -> Self {
        self.config.plugin_types = plugin_types;
        self
    }

    #[inline]
    pub fn upgrade_insecure_requests(mut self, https_port: u16) -> Self {
        self.config.upgrade_insecure_requests = CspUpgradeInsecureRequestsConfig::new(https_port);
        self
    }

    #[inline]
    pub fn block_all_mixed_content(mut self) -> Self {
        self.config.block_all_mixed_content = CspMixedContentConfig::new();
        self
    }

    #[inline]
    pub fn report_uri(mut self, report_uri: CspReportUriConfig) -> Self {
        self.config.report_uri = report_uri;
        self
    }

    #[inline]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    pub fn build(mut self) -> Result<CspConfiguration, SecurityHeadersError> {
        self.config.validate()?;
        Ok(self.config)
    }

    #[inline]
    pub fn build_unchecked(self) -> CspConfiguration {
        self.config
    }
}
