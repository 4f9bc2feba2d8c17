use std::time::Duration;

use pretty_assertions::assert_eq;
use reportobello_client::{ApiError, ApiSettings, ReportApi, ReportobelloClient, Template};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ReportobelloClient {
    ReportobelloClient::new(ApiSettings {
        host: server.uri(),
        api_key: Some("rbo_test_key".to_string()),
        ..ApiSettings::default()
    })
    .expect("client")
}

#[tokio::test]
async fn upload_posts_typst_source_with_bearer_key() {
    let server = MockServer::start().await;
    let source = "#let data = json(\"data.json\")\n= Q#data.quarter\n";
    Mock::given(method("POST"))
        .and(path("/api/v1/template/quarterly_report"))
        .and(header("authorization", "Bearer rbo_test_key"))
        .and(header("content-type", "application/x-typst"))
        .and(body_string(source))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "quarterly_report",
            "template": source,
            "version": 3,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let template = client_for(&server)
        .upload_template("quarterly_report", source)
        .await
        .expect("upload ok");

    assert_eq!(
        template,
        Template {
            name: "quarterly_report".to_string(),
            template: source.to_string(),
            version: 3,
        }
    );
}

#[tokio::test]
async fn upload_rejection_carries_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/template/quarterly_report"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Content type is invalid"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .upload_template("quarterly_report", "x")
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Rejected {
            status: 400,
            message: "Content type is invalid".to_string(),
        }
    );
}

#[tokio::test]
async fn run_report_returns_pdf_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/template/quarterly_report/build"))
        .and(query_param("justUrl", ""))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "content_type": "application/json",
            "data": {"quarter": 1, "earnings": 123456},
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("https://host/r/abc123.pdf"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let url = client_for(&server)
        .run_report("quarterly_report", &json!({"quarter": 1, "earnings": 123456}))
        .await
        .expect("run ok");

    assert_eq!(url, Url::parse("https://host/r/abc123.pdf").unwrap());
}

#[tokio::test]
async fn run_report_maps_missing_template() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/template/quarterly_report/build"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Template not found"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .run_report("quarterly_report", &json!({}))
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::TemplateNotFound("quarterly_report".to_string()));
    assert_eq!(err.to_string(), "template not found: quarterly_report");
}

#[tokio::test]
async fn run_report_maps_build_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/template/quarterly_report/build"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string("error: unknown variable: ENV_VAR_EXAMPLE\n"),
        )
        .mount(&server)
        .await;

    let err = client_for(&server)
        .run_report("quarterly_report", &json!({"quarter": 1}))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::BuildFailed("error: unknown variable: ENV_VAR_EXAMPLE".to_string())
    );
}

#[tokio::test]
async fn run_report_rejects_non_url_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/template/quarterly_report/build"))
        .respond_with(ResponseTemplate::new(200).set_body_string("%PDF-1.7"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .run_report("quarterly_report", &json!({}))
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidResponse(_)), "{err:?}");
}

#[tokio::test]
async fn bad_key_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .upload_template("quarterly_report", "x")
        .await
        .unwrap_err();

    assert_eq!(err, ApiError::Unauthorized);
}

#[tokio::test]
async fn template_names_are_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/template/q%201%2F2/build"))
        .respond_with(ResponseTemplate::new(200).set_body_string("https://host/r/x.pdf"))
        .expect(1)
        .mount(&server)
        .await;

    let url = client_for(&server)
        .run_report("q 1/2", &json!({}))
        .await
        .expect("run ok");
    assert_eq!(url.as_str(), "https://host/r/x.pdf");
}

#[tokio::test]
async fn configured_timeout_applies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("https://host/r/slow.pdf"),
        )
        .mount(&server)
        .await;

    let client = ReportobelloClient::new(ApiSettings {
        host: server.uri(),
        request_timeout: Some(Duration::from_millis(50)),
        ..ApiSettings::default()
    })
    .expect("client");

    let err = client
        .run_report("quarterly_report", &json!({}))
        .await
        .unwrap_err();
    assert_eq!(err, ApiError::Timeout);
}

#[test]
fn invalid_host_is_rejected() {
    let err = ReportobelloClient::new(ApiSettings {
        host: "not a url".to_string(),
        ..ApiSettings::default()
    })
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidUrl(_)));
}
