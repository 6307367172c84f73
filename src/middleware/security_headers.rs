use crate::constants::{DEFAULT_HTTPS_PORT, HEADER_UPGRADE_INSECURE_REQUESTS};
use crate::core::context::SecurityContext;
use crate::error::SecurityHeadersError;
use crate::headers::{base_results, override_results};
use crate::security::nonce::NonceGenerator;
use crate::settings::SecurityHeadersConfig;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::{LOCATION, VARY},
    Error, HttpMessage, HttpResponse,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use log::{debug, error};
use std::borrow::Cow;
use std::{rc::Rc, sync::Arc};
use url::Url;

/// Adds the configured security headers to every response and gives handlers
/// a [`SecurityContext`] for per-request overrides.
#[derive(Clone)]
pub struct SecurityHeadersMiddleware {
    config: Arc<SecurityHeadersConfig>,
    nonce_generator: NonceGenerator,
    builtin_report_uri: Option<Cow<'static, str>>,
}

impl SecurityHeadersMiddleware {
    /// Canonicalizes and checks `config` before serving it. A configuration
    /// that fails validation is logged and replaced by an empty one, so no
    /// unchecked value reaches a response. Use [`Self::try_new`] to handle
    /// the error instead.
    pub fn new(mut config: SecurityHeadersConfig) -> Self {
        if let Err(err) = config.validate() {
            error!("Invalid security header configuration, serving none: {}", err);
            config = SecurityHeadersConfig::default();
        }
        Self::from_shared(Arc::new(config))
    }

    /// Shares a configuration that already went through
    /// [`SecurityHeadersConfig::validate`]. It is served as is.
    #[inline]
    pub fn from_shared(config: Arc<SecurityHeadersConfig>) -> Self {
        Self {
            config,
            nonce_generator: NonceGenerator::default(),
            builtin_report_uri: None,
        }
    }

    pub fn try_new(mut config: SecurityHeadersConfig) -> Result<Self, SecurityHeadersError> {
        config.validate()?;
        Ok(Self::from_shared(Arc::new(config)))
    }

    #[inline]
    pub fn with_nonce_generator(mut self, generator: NonceGenerator) -> Self {
        self.nonce_generator = generator;
        self
    }

    /// URI rendered into `report-uri` for configurations that enable the
    /// builtin handler.
    #[inline]
    pub fn with_builtin_report_handler(mut self, uri: impl Into<Cow<'static, str>>) -> Self {
        self.builtin_report_uri = Some(uri.into());
        self
    }

    #[inline]
    pub fn config(&self) -> Arc<SecurityHeadersConfig> {
        self.config.clone()
    }
}

impl<S, B> Transform<S, ServiceRequest> for SecurityHeadersMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = SecurityHeadersMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SecurityHeadersMiddlewareService {
            service: Rc::new(service),
            config: self.config.clone(),
            nonce_generator: self.nonce_generator.clone(),
            builtin_report_uri: self.builtin_report_uri.clone(),
        }))
    }
}

pub struct SecurityHeadersMiddlewareService<S> {
    service: Rc<S>,
    config: Arc<SecurityHeadersConfig>,
    nonce_generator: NonceGenerator,
    builtin_report_uri: Option<Cow<'static, str>>,
}

impl<S, B> Service<ServiceRequest> for SecurityHeadersMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let is_https = req.connection_info().scheme() == "https";

        if let Some(location) = upgrade_location(&req, &self.config, is_https) {
            debug!("Upgrading insecure request to {}", location);
            let response = HttpResponse::TemporaryRedirect()
                .insert_header((LOCATION, location.as_str()))
                .insert_header((VARY, HEADER_UPGRADE_INSECURE_REQUESTS))
                .finish()
                .map_into_right_body();
            return Box::pin(ready(Ok::<_, Error>(req.into_response(response))));
        }

        req.extensions_mut().insert(SecurityContext::new());
        req.extensions_mut().insert(self.nonce_generator.clone());

        let service = self.service.clone();
        let config = self.config.clone();
        let builtin_report_uri = self.builtin_report_uri.clone();

        Box::pin(async move {
            let mut res = service.call(req).await?;
            let builtin = builtin_report_uri.as_deref();

            let base = base_results(&config, is_https, builtin);
            let overrides = res
                .request()
                .extensions()
                .get::<SecurityContext>()
                .map(|context| override_results(&config, context, builtin));

            let headers = res.headers_mut();
            for result in base.iter().chain(overrides.iter().flatten()) {
                if let Err(err) = result.apply(headers) {
                    error!("Failed to apply {}: {}", result.name, err);
                }
            }

            Ok(res.map_into_left_body())
        })
    }
}

/// Redirect target for a plain-http request announcing
/// `Upgrade-Insecure-Requests: 1`, when the enforced CSP upgrades requests.
fn upgrade_location(
    req: &ServiceRequest,
    config: &SecurityHeadersConfig,
    is_https: bool,
) -> Option<String> {
    let upgrade = &config.csp.upgrade_insecure_requests;
    if is_https || !config.csp.enabled || !upgrade.enabled {
        return None;
    }
    let requested = req
        .headers()
        .get(HEADER_UPGRADE_INSECURE_REQUESTS)
        .is_some_and(|value| value.as_bytes() == b"1");
    if !requested {
        return None;
    }

    let path = req
        .uri()
        .path_and_query()
        .map_or("/", |path_and_query| path_and_query.as_str());
    let mut url = Url::parse(&format!("http://{}{}", req.connection_info().host(), path))
        .map_err(|err| debug!("Cannot build upgrade location: {}", err))
        .ok()?;
    url.set_scheme("https").ok()?;
    let port = (upgrade.https_port != DEFAULT_HTTPS_PORT).then_some(upgrade.https_port);
    url.set_port(port).ok()?;
    Some(url.into())
}

#[inline]
pub fn security_headers_middleware(config: SecurityHeadersConfig) -> SecurityHeadersMiddleware {
    SecurityHeadersMiddleware::new(config)
}
