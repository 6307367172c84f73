use crate::constants::HEADER_X_CONTENT_TYPE_OPTIONS;
use crate::headers::{diff_result, HeaderResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct XContentTypeOptionsConfig {
    pub enabled: bool,
}

impl XContentTypeOptionsConfig {
    #[inline]
    pub fn nosniff() -> Self {
        Self { enabled: true }
    }
}

pub fn create_x_content_type_options_result(
    config: &XContentTypeOptionsConfig,
    old_config: Option<&XContentTypeOptionsConfig>,
) -> Option<HeaderResult> {
    diff_result(
        HEADER_X_CONTENT_TYPE_OPTIONS,
        config.enabled.then(|| "nosniff".to_owned()),
        old_config.is_some_and(|old| old.enabled),
    )
}
