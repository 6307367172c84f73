pub use crate::core::{
    CspConfiguration, CspConfigurationBuilder, CspDirectiveConfig, CspDirectiveKind,
    CspDirectiveOverride, CspMixedContentConfig, CspPluginTypesConfig, CspReportUriConfig,
    CspSandboxConfig, CspUpgradeInsecureRequestsConfig, SecurityContext, Source,
};
pub use crate::error::SecurityHeadersError;
pub use crate::headers::{
    HpkpConfig, HstsConfig, ReferrerPolicy, ReferrerPolicyConfig, XContentTypeOptionsConfig,
    XDownloadOptionsConfig, XFrameOptionsConfig, XFrameOptionsPolicy, XRobotsTagConfig,
    XXssPolicy, XXssProtectionConfig,
};
pub use crate::middleware::{
    csp_reporting_middleware, security_headers_middleware, CspReportingMiddleware,
    SecurityHeadersExtensions, SecurityHeadersMiddleware,
};
pub use crate::report::CspViolationReport;
pub use crate::security::{HashAlgorithm, NonceGenerator};
pub use crate::settings::SecurityHeadersConfig;
