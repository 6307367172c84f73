use crate::constants;
use crate::core::source::{
    parse_media_types, parse_source_list, validate_media_type, validate_report_uri, Source,
};
use crate::error::SecurityHeadersError;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[inline]
pub(crate) fn enabled_by_default() -> bool {
    true
}

#[inline]
fn default_https_port() -> u16 {
    constants::DEFAULT_HTTPS_PORT
}

/// The fifteen source-list directives, in header rendering order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CspDirectiveKind {
    DefaultSrc,
    ScriptSrc,
    ObjectSrc,
    StyleSrc,
    ImgSrc,
    MediaSrc,
    FrameSrc,
    FontSrc,
    ConnectSrc,
    BaseUri,
    ChildSrc,
    FormAction,
    FrameAncestors,
    ManifestSrc,
    WorkerSrc,
}

impl CspDirectiveKind {
    pub const COUNT: usize = 15;

    pub const ALL: [CspDirectiveKind; Self::COUNT] = [
        Self::DefaultSrc,
        Self::ScriptSrc,
        Self::ObjectSrc,
        Self::StyleSrc,
        Self::ImgSrc,
        Self::MediaSrc,
        Self::FrameSrc,
        Self::FontSrc,
        Self::ConnectSrc,
        Self::BaseUri,
        Self::ChildSrc,
        Self::FormAction,
        Self::FrameAncestors,
        Self::ManifestSrc,
        Self::WorkerSrc,
    ];

    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DefaultSrc => constants::DEFAULT_SRC,
            Self::ScriptSrc => constants::SCRIPT_SRC,
            Self::ObjectSrc => constants::OBJECT_SRC,
            Self::StyleSrc => constants::STYLE_SRC,
            Self::ImgSrc => constants::IMG_SRC,
            Self::MediaSrc => constants::MEDIA_SRC,
            Self::FrameSrc => constants::FRAME_SRC,
            Self::FontSrc => constants::FONT_SRC,
            Self::ConnectSrc => constants::CONNECT_SRC,
            Self::BaseUri => constants::BASE_URI,
            Self::ChildSrc => constants::CHILD_SRC,
            Self::FormAction => constants::FORM_ACTION,
            Self::FrameAncestors => constants::FRAME_ANCESTORS,
            Self::ManifestSrc => constants::MANIFEST_SRC,
            Self::WorkerSrc => constants::WORKER_SRC,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn supports_unsafe_inline(&self) -> bool {
        matches!(self, Self::DefaultSrc | Self::ScriptSrc | Self::StyleSrc)
    }

    #[inline]
    pub const fn supports_unsafe_eval(&self) -> bool {
        matches!(self, Self::DefaultSrc | Self::ScriptSrc)
    }

    #[inline]
    pub const fn supports_strict_dynamic(&self) -> bool {
        matches!(self, Self::DefaultSrc | Self::ScriptSrc)
    }
}

impl fmt::Display for CspDirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CspDirectiveKind {
    type Err = SecurityHeadersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| SecurityHeadersError::InvalidHeaderConfig {
                header: constants::HEADER_CSP,
                reason: format!("unknown directive '{}'", s),
            })
    }
}

/// Settings of one source-list directive. Keyword flags that only some
/// directives support are always present and validated per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CspDirectiveConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(rename = "none")]
    pub none_src: bool,
    #[serde(rename = "self")]
    pub self_src: bool,
    #[serde(rename = "unsafe-inline")]
    pub unsafe_inline_src: bool,
    #[serde(rename = "unsafe-eval")]
    pub unsafe_eval_src: bool,
    #[serde(rename = "strict-dynamic")]
    pub strict_dynamic_src: bool,
    #[serde(skip)]
    pub nonce: Option<String>,
    pub custom_sources: Vec<String>,
}

impl CspDirectiveConfig {
    /// An enabled directive with no sources.
    #[inline]
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    #[inline]
    pub fn none(mut self) -> Self {
        self.none_src = true;
        self
    }

    #[inline]
    pub fn self_src(mut self) -> Self {
        self.self_src = true;
        self
    }

    #[inline]
    pub fn unsafe_inline(mut self) -> Self {
        self.unsafe_inline_src = true;
        self
    }

    #[inline]
    pub fn unsafe_eval(mut self) -> Self {
        self.unsafe_eval_src = true;
        self
    }

    #[inline]
    pub fn strict_dynamic(mut self) -> Self {
        self.strict_dynamic_src = true;
        self
    }

    pub fn add_source(mut self, source: Source) -> Self {
        self.apply_source(source);
        self
    }

    /// Adds every token of a space separated source list.
    pub fn sources(mut self, list: &str) -> Result<Self, SecurityHeadersError> {
        for source in parse_source_list(list)? {
            self.apply_source(source);
        }
        Ok(self)
    }

    pub(crate) fn apply_source(&mut self, source: Source) {
        match source {
            Source::None => self.none_src = true,
            Source::Self_ => self.self_src = true,
            Source::UnsafeInline => self.unsafe_inline_src = true,
            Source::UnsafeEval => self.unsafe_eval_src = true,
            Source::StrictDynamic => self.strict_dynamic_src = true,
            custom => self.custom_sources.push(custom.to_string()),
        }
    }

    #[inline]
    pub fn has_sources(&self) -> bool {
        self.none_src
            || self.self_src
            || self.unsafe_inline_src
            || self.unsafe_eval_src
            || self.strict_dynamic_src
            || self.nonce.is_some()
            || !self.custom_sources.is_empty()
    }

    /// Canonicalizes custom sources in place and checks keyword usage.
    ///
    /// A keyword listed among the custom sources is folded into its flag;
    /// listing it while the flag is already set, or listing the same source
    /// twice, is a duplicate.
    pub fn validate(&mut self, kind: CspDirectiveKind) -> Result<(), SecurityHeadersError> {
        let directive = kind.name();
        let raw = std::mem::take(&mut self.custom_sources);
        let mut seen = FxHashSet::with_capacity_and_hasher(raw.len(), Default::default());
        let mut canonical = Vec::with_capacity(raw.len());

        for token in &raw {
            let source = Source::parse(token)?;
            if source.is_keyword() {
                let flag = match source {
                    Source::None => &mut self.none_src,
                    Source::Self_ => &mut self.self_src,
                    Source::UnsafeInline => &mut self.unsafe_inline_src,
                    Source::UnsafeEval => &mut self.unsafe_eval_src,
                    _ => &mut self.strict_dynamic_src,
                };
                if *flag {
                    return Err(SecurityHeadersError::DuplicateSource {
                        directive,
                        token: token.clone(),
                    });
                }
                *flag = true;
                continue;
            }

            let value = source.to_string();
            if !seen.insert(value.clone()) {
                return Err(SecurityHeadersError::DuplicateSource {
                    directive,
                    token: token.clone(),
                });
            }
            canonical.push(value);
        }
        self.custom_sources = canonical;

        let unsupported = if self.unsafe_inline_src && !kind.supports_unsafe_inline() {
            Some(constants::UNSAFE_INLINE_SOURCE)
        } else if self.unsafe_eval_src && !kind.supports_unsafe_eval() {
            Some(constants::UNSAFE_EVAL_SOURCE)
        } else if self.strict_dynamic_src && !kind.supports_strict_dynamic() {
            Some(constants::STRICT_DYNAMIC_SOURCE)
        } else {
            None
        };
        if let Some(keyword) = unsupported {
            return Err(SecurityHeadersError::UnsupportedKeyword { directive, keyword });
        }

        if self.none_src {
            let others = Self {
                none_src: false,
                ..self.clone()
            };
            if others.has_sources() {
                return Err(SecurityHeadersError::NoneCombined { directive });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CspSandboxConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub allow_forms: bool,
    pub allow_modals: bool,
    pub allow_orientation_lock: bool,
    pub allow_pointer_lock: bool,
    pub allow_popups: bool,
    pub allow_popups_to_escape_sandbox: bool,
    pub allow_presentation: bool,
    pub allow_same_origin: bool,
    pub allow_scripts: bool,
    pub allow_top_navigation: bool,
}

impl CspSandboxConfig {
    /// An enabled sandbox with every restriction in place.
    #[inline]
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    #[inline]
    pub fn allow_forms(mut self) -> Self {
        self.allow_forms = true;
        self
    }

    #[inline]
    pub fn allow_modals(mut self) -> Self {
        self.allow_modals = true;
        self
    }

    #[inline]
    pub fn allow_orientation_lock(mut self) -> Self {
        self.allow_orientation_lock = true;
        self
    }

    #[inline]
    pub fn allow_pointer_lock(mut self) -> Self {
        self.allow_pointer_lock = true;
        self
    }

    #[inline]
    pub fn allow_popups(mut self) -> Self {
        self.allow_popups = true;
        self
    }

    #[inline]
    pub fn allow_popups_to_escape_sandbox(mut self) -> Self {
        self.allow_popups_to_escape_sandbox = true;
        self
    }

    #[inline]
    pub fn allow_presentation(mut self) -> Self {
        self.allow_presentation = true;
        self
    }

    #[inline]
    pub fn allow_same_origin(mut self) -> Self {
        self.allow_same_origin = true;
        self
    }

    #[inline]
    pub fn allow_scripts(mut self) -> Self {
        self.allow_scripts = true;
        self
    }

    #[inline]
    pub fn allow_top_navigation(mut self) -> Self {
        self.allow_top_navigation = true;
        self
    }

    /// Enabled sandbox tokens in their fixed header order.
    pub fn tokens(&self) -> impl Iterator<Item = &'static str> {
        [
            (self.allow_forms, constants::SANDBOX_ALLOW_FORMS),
            (self.allow_modals, constants::SANDBOX_ALLOW_MODALS),
            (
                self.allow_orientation_lock,
                constants::SANDBOX_ALLOW_ORIENTATION_LOCK,
            ),
            (self.allow_pointer_lock, constants::SANDBOX_ALLOW_POINTER_LOCK),
            (self.allow_popups, constants::SANDBOX_ALLOW_POPUPS),
            (
                self.allow_popups_to_escape_sandbox,
                constants::SANDBOX_ALLOW_POPUPS_TO_ESCAPE_SANDBOX,
            ),
            (self.allow_presentation, constants::SANDBOX_ALLOW_PRESENTATION),
            (self.allow_same_origin, constants::SANDBOX_ALLOW_SAME_ORIGIN),
            (self.allow_scripts, constants::SANDBOX_ALLOW_SCRIPTS),
            (
                self.allow_top_navigation,
                constants::SANDBOX_ALLOW_TOP_NAVIGATION,
            ),
        ]
        .into_iter()
        .filter_map(|(allowed, token)| allowed.then_some(token))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CspPluginTypesConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub media_types: Vec<String>,
}

impl CspPluginTypesConfig {
    /// Enabled plugin-types from a space separated media type list.
    pub fn new(media_types: &str) -> Result<Self, SecurityHeadersError> {
        Ok(Self {
            enabled: true,
            media_types: parse_media_types(media_types)?,
        })
    }

    pub fn validate(&self) -> Result<(), SecurityHeadersError> {
        self.media_types
            .iter()
            .try_for_each(|media_type| validate_media_type(media_type))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CspReportUriConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    pub enable_builtin_handler: bool,
    pub report_uris: Vec<String>,
}

impl CspReportUriConfig {
    #[inline]
    pub fn new() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    #[inline]
    pub fn builtin_handler(mut self) -> Self {
        self.enable_builtin_handler = true;
        self
    }

    pub fn report_uri(mut self, uri: &str) -> Result<Self, SecurityHeadersError> {
        self.report_uris.push(validate_report_uri(uri)?);
        Ok(self)
    }

    /// Validates and encodes every report URI in place.
    pub fn validate(&mut self) -> Result<(), SecurityHeadersError> {
        for uri in self.report_uris.iter_mut() {
            *uri = validate_report_uri(uri)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CspUpgradeInsecureRequestsConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default = "default_https_port")]
    pub https_port: u16,
}

impl CspUpgradeInsecureRequestsConfig {
    #[inline]
    pub fn new(https_port: u16) -> Self {
        Self {
            enabled: true,
            https_port,
        }
    }

    pub fn validate(&self) -> Result<(), SecurityHeadersError> {
        if self.enabled && self.https_port == 0 {
            return Err(SecurityHeadersError::InvalidHeaderConfig {
                header: constants::HEADER_CSP,
                reason: "upgrade-insecure-requests https port must be between 1 and 65535"
                    .to_owned(),
            });
        }
        Ok(())
    }
}

impl Default for CspUpgradeInsecureRequestsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            https_port: constants::DEFAULT_HTTPS_PORT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CspMixedContentConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl CspMixedContentConfig {
    #[inline]
    pub fn new() -> Self {
        Self { enabled: true }
    }
}
