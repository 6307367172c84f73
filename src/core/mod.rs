pub mod config;
pub mod context;
pub mod directives;
pub mod merge;
pub mod overrides;
pub mod source;

pub use config::{CspConfiguration, CspConfigurationBuilder};
pub use context::SecurityContext;
pub use directives::*;
pub use merge::{merge_csp_configuration, merge_directive, merge_plugin_types};
pub use overrides::{CspDirectiveOverride, CspOverrideConfiguration, CspPluginTypesOverride};
pub use source::{
    encode_report_uri, parse_hash_source, parse_media_types, parse_source_list, parse_uri_source,
    validate_media_type, validate_report_uri, Source,
};
