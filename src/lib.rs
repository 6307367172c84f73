pub(crate) mod constants;
pub mod core;
pub mod error;
pub mod headers;
pub mod middleware;
pub mod prelude;
pub mod report;
pub mod security;
pub mod settings;
pub(crate) mod utils;

// Re-export commonly used types for convenience
pub use crate::core::{
    merge_csp_configuration, CspConfiguration, CspConfigurationBuilder, CspDirectiveConfig,
    CspDirectiveKind, CspDirectiveOverride, CspOverrideConfiguration, SecurityContext, Source,
};
pub use crate::error::{InvalidSourceError, SecurityHeadersError};
pub use crate::headers::{create_csp_result, HeaderAction, HeaderResult};
pub use crate::middleware::{
    csp_reporting_middleware, security_headers_middleware, CspReportingMiddleware,
    SecurityHeadersExtensions, SecurityHeadersMiddleware,
};
pub use crate::report::CspViolationReport;
pub use crate::security::{HashAlgorithm, HashGenerator, NonceGenerator, RandomSource};
pub use crate::settings::SecurityHeadersConfig;
