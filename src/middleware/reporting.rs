use crate::constants::{DEFAULT_MAX_REPORT_SIZE, DEFAULT_REPORT_PATH};
use crate::report::CspViolationReport;
use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorPayloadTooLarge,
    http::Method,
    web, Error, FromRequest, HttpResponse,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use log::{debug, error};
use std::{borrow::Cow, rc::Rc, sync::Arc};

type ViolationHandler = Arc<dyn Fn(CspViolationReport) + Send + Sync + 'static>;

/// Builtin `report-uri` endpoint. POSTed violation reports on the report path
/// are parsed and handed to the callback; other requests pass through.
#[derive(Clone)]
pub struct CspReportingMiddleware {
    handler: ViolationHandler,
    report_path: Cow<'static, str>,
    max_report_size: usize,
}

impl CspReportingMiddleware {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(CspViolationReport) + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
            report_path: Cow::Borrowed(DEFAULT_REPORT_PATH),
            max_report_size: DEFAULT_MAX_REPORT_SIZE,
        }
    }

    #[inline]
    pub fn with_report_path(mut self, path: impl Into<Cow<'static, str>>) -> Self {
        self.report_path = path.into();
        self
    }

    #[inline]
    pub fn with_max_report_size(mut self, size: usize) -> Self {
        self.max_report_size = size;
        self
    }

    /// The path to pass as the builtin report handler URI.
    #[inline]
    pub fn report_path(&self) -> &str {
        &self.report_path
    }
}

impl<S, B> Transform<S, ServiceRequest> for CspReportingMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = CspReportingMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CspReportingMiddlewareService {
            service: Rc::new(service),
            handler: self.handler.clone(),
            report_path: self.report_path.clone(),
            max_report_size: self.max_report_size,
        }))
    }
}

pub struct CspReportingMiddlewareService<S> {
    service: Rc<S>,
    handler: ViolationHandler,
    report_path: Cow<'static, str>,
    max_report_size: usize,
}

impl<S, B> Service<ServiceRequest> for CspReportingMiddlewareService<S>
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
        if req.path() != self.report_path || req.method() != Method::POST {
            let service = self.service.clone();
            return Box::pin(async move {
                let res = service.call(req).await?;
                Ok(res.map_into_left_body())
            });
        }

        let handler = self.handler.clone();
        let max_size = self.max_report_size;

        Box::pin(async move {
            let (http_req, mut payload) = req.into_parts();
            let body = web::Bytes::from_request(&http_req, &mut payload).await?;
            if body.len() > max_size {
                return Err(ErrorPayloadTooLarge("CSP report too large"));
            }

            match CspViolationReport::from_body(&body) {
                Ok(Some(report)) => handler(report),
                Ok(None) => debug!("CSP violation report missing 'csp-report' field"),
                Err(e) => error!("Failed to parse CSP violation report: {}", e),
            }

            let response = HttpResponse::NoContent().finish().map_into_right_body();
            Ok(ServiceResponse::new(http_req, response))
        })
    }
}

#[inline]
pub fn csp_reporting_middleware<F>(handler: F) -> CspReportingMiddleware
where
    F: Fn(CspViolationReport) + Send + Sync + 'static,
{
    CspReportingMiddleware::new(handler)
}
