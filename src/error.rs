use actix_web::http::StatusCode;
use actix_web::ResponseError;
use thiserror::Error;

/// A source-list token that could not be turned into a canonical CSP source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid source '{token}': {reason}")]
pub struct InvalidSourceError {
    pub token: String,
    pub reason: &'static str,
}

impl InvalidSourceError {
    #[inline]
    pub(crate) fn new(token: &str, reason: &'static str) -> Self {
        Self {
            token: token.to_owned(),
            reason,
        }
    }
}

#[derive(Debug, Error)]
pub enum SecurityHeadersError {
    #[error(transparent)]
    InvalidSource(#[from] InvalidSourceError),

    #[error("Invalid hash source: {0}")]
    InvalidHashSource(String),

    #[error("Invalid media type: {0}")]
    InvalidMediaType(String),

    #[error("Invalid source list '{list}': {reason}")]
    InvalidSourceList { list: String, reason: &'static str },

    #[error("Directive '{directive}' combines 'none' with other sources")]
    NoneCombined { directive: &'static str },

    #[error("Directive '{directive}' defines source '{token}' more than once")]
    DuplicateSource {
        directive: &'static str,
        token: String,
    },

    #[error("Directive '{directive}' does not support {keyword}")]
    UnsupportedKeyword {
        directive: &'static str,
        keyword: &'static str,
    },

    #[error("Invalid report URI: {0}")]
    InvalidReportUri(String),

    #[error("Invalid nonce value: {0}")]
    InvalidNonceValue(String),

    #[error("Invalid {header} configuration: {reason}")]
    InvalidHeaderConfig {
        header: &'static str,
        reason: String,
    },

    #[error("Invalid header value for {0}")]
    HeaderError(&'static str),

    #[error("Security headers middleware is not installed for this request")]
    MissingContext,

    #[error("Random source error: {0}")]
    RandomError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SecurityHeadersError {
    /// True for errors caused by the supplied configuration rather than the environment.
    pub fn is_validation_error(&self) -> bool {
        !matches!(
            self,
            Self::HeaderError(_)
                | Self::MissingContext
                | Self::RandomError(_)
                | Self::SerializationError(_)
                | Self::IoError(_)
        )
    }
}

impl ResponseError for SecurityHeadersError {
    fn status_code(&self) -> StatusCode {
        if self.is_validation_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub type Result<T, E = SecurityHeadersError> = std::result::Result<T, E>;
