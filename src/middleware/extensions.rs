use crate::core::context::SecurityContext;
use crate::core::source::Source;
use crate::error::SecurityHeadersError;
use crate::security::hash::{HashAlgorithm, HashGenerator};
use crate::security::nonce::NonceGenerator;
use actix_web::HttpMessage;
use log::warn;

/// Request-side access to the security header context installed by
/// [`SecurityHeadersMiddleware`](super::SecurityHeadersMiddleware).
pub trait SecurityHeadersExtensions {
    /// Script nonce for this response, added to `script-src` of both CSP
    /// headers on first use.
    fn csp_script_nonce(&self) -> Result<String, SecurityHeadersError>;

    /// Style nonce for this response, added to `style-src` of both CSP
    /// headers on first use.
    fn csp_style_nonce(&self) -> Result<String, SecurityHeadersError>;

    /// Runs `f` against the request's overrides.
    fn with_security_context<F, R>(&self, f: F) -> Result<R, SecurityHeadersError>
    where
        F: FnOnce(&mut SecurityContext) -> R;

    fn csp_hash_source(&self, algorithm: HashAlgorithm, content: &[u8]) -> Source {
        HashGenerator::generate_source(algorithm, content)
    }
}

fn with_nonce<T, F>(message: &T, f: F) -> Result<String, SecurityHeadersError>
where
    T: HttpMessage,
    F: FnOnce(&mut SecurityContext, &NonceGenerator) -> Result<String, SecurityHeadersError>,
{
    let mut extensions = message.extensions_mut();
    let Some(generator) = extensions.get::<NonceGenerator>().cloned() else {
        warn!("CSP nonce requested without the security headers middleware");
        return Err(SecurityHeadersError::MissingContext);
    };
    let context = extensions
        .get_mut::<SecurityContext>()
        .ok_or(SecurityHeadersError::MissingContext)?;
    f(context, &generator)
}

impl<T> SecurityHeadersExtensions for T
where
    T: HttpMessage,
{
    fn csp_script_nonce(&self) -> Result<String, SecurityHeadersError> {
        with_nonce(self, SecurityContext::csp_script_nonce)
    }

    fn csp_style_nonce(&self) -> Result<String, SecurityHeadersError> {
        with_nonce(self, SecurityContext::csp_style_nonce)
    }

    fn with_security_context<F, R>(&self, f: F) -> Result<R, SecurityHeadersError>
    where
        F: FnOnce(&mut SecurityContext) -> R,
    {
        let mut extensions = self.extensions_mut();
        let context = extensions
            .get_mut::<SecurityContext>()
            .ok_or(SecurityHeadersError::MissingContext)?;
        Ok(f(context))
    }
}
