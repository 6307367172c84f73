pub mod extensions;
pub mod reporting;
pub mod security_headers;

pub use extensions::SecurityHeadersExtensions;
pub use reporting::{csp_reporting_middleware, CspReportingMiddleware, CspReportingMiddlewareService};
pub use security_headers::{
    security_headers_middleware, SecurityHeadersMiddleware, SecurityHeadersMiddlewareService,
};
