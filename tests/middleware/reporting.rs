use crate::helpers::{init_logger, plain_handler, test_config};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use actix_web_secure_headers::prelude::*;
use parking_lot::Mutex;
use std::sync::Arc;

const REPORT: &str = r#"{
    "csp-report": {
        "document-uri": "https://example.com/page",
        "referrer": "",
        "violated-directive": "script-src 'self'",
        "effective-directive": "script-src",
        "original-policy": "default-src 'self';script-src 'self'",
        "disposition": "report",
        "blocked-uri": "https://evil.example/x.js",
        "status-code": 200
    }
}"#;

fn collector() -> (Arc<Mutex<Vec<CspViolationReport>>>, CspReportingMiddleware) {
    let reports = Arc::new(Mutex::new(Vec::new()));
    let sink = reports.clone();
    let middleware = csp_reporting_middleware(move |report| sink.lock().push(report));
    (reports, middleware)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_report_is_delivered() {
        init_logger();
        let (reports, middleware) = collector();
        let app = test::init_service(
            App::new()
                .wrap(middleware)
                .route("/", web::get().to(plain_handler)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/csp-report")
            .insert_header(("content-type", "application/csp-report"))
            .set_payload(REPORT)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let reports = reports.lock();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].blocked_uri, "https://evil.example/x.js");
        assert_eq!(reports[0].status_code, Some(200));
        assert_eq!(reports[0].directive_kind(), Some(CspDirectiveKind::ScriptSrc));
        assert!(reports[0].is_report_only());
    }

    #[actix_web::test]
    async fn test_malformed_report_is_acknowledged() {
        let (reports, middleware) = collector();
        let app = test::init_service(
            App::new()
                .wrap(middleware)
                .route("/", web::get().to(plain_handler)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/csp-report")
            .set_payload("not json")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        assert!(reports.lock().is_empty());
    }

    #[actix_web::test]
    async fn test_oversized_report_is_rejected() {
        let (reports, middleware) = collector();
        let app = test::init_service(
            App::new()
                .wrap(middleware.with_max_report_size(16))
                .route("/", web::get().to(plain_handler)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/csp-report")
            .set_payload(REPORT)
            .to_request();
        let res = test::try_call_service(&app, req).await;
        match res {
            Ok(res) => assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE),
            Err(err) => assert_eq!(
                err.as_response_error().status_code(),
                StatusCode::PAYLOAD_TOO_LARGE
            ),
        }
        assert!(reports.lock().is_empty());
    }

    #[actix_web::test]
    async fn test_other_requests_pass_through() {
        let (reports, middleware) = collector();
        let app = test::init_service(
            App::new()
                .wrap(middleware.with_report_path("/violations"))
                .route("/", web::get().to(plain_handler))
                .route("/csp-report", web::get().to(plain_handler)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/violations").to_request())
                .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/csp-report")
            .set_payload(REPORT)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(reports.lock().is_empty());
    }

    #[actix_web::test]
    async fn test_builtin_handler_uri_is_rendered() {
        let (_reports, reporting) = collector();
        let mut config = test_config();
        config.csp.report_uri = CspReportUriConfig::new().builtin_handler();

        let app = test::init_service(
            App::new()
                .wrap(
                    SecurityHeadersMiddleware::new(config)
                        .with_builtin_report_handler(reporting.report_path().to_owned()),
                )
                .wrap(reporting)
                .route("/", web::get().to(plain_handler)),
        )
        .await;

        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let csp = res
            .headers()
            .get("content-security-policy")
            .and_then(|value| value.to_str().ok());
        assert_eq!(
            csp,
            Some("default-src 'self';script-src 'self';report-uri /csp-report")
        );
    }
}
