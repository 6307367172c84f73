use crate::constants::HEADER_X_DOWNLOAD_OPTIONS;
use crate::headers::{diff_result, HeaderResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct XDownloadOptionsConfig {
    pub enabled: bool,
}

impl XDownloadOptionsConfig {
    #[inline]
    pub fn noopen() -> Self {
        Self { enabled: true }
    }
}

pub fn create_x_download_options_result(
    config: &XDownloadOptionsConfig,
    old_config: Option<&XDownloadOptionsConfig>,
) -> Option<HeaderResult> {
    diff_result(
        HEADER_X_DOWNLOAD_OPTIONS,
        config.enabled.then(|| "noopen".to_owned()),
        old_config.is_some_and(|old| old.enabled),
    )
}
