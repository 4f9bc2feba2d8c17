use std::collections::BTreeMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use report_logging::{report_debug, report_info, report_warn};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::{ApiError, ApiSettings, Report, ReportApi, Template};

const TYPST_CONTENT_TYPE: &str = "application/x-typst";
const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Serialize)]
struct BuildPayload<'a> {
    content_type: &'a str,
    data: &'a serde_json::Value,
}

/// HTTP client for a Reportobello server.
#[derive(Debug, Clone)]
pub struct ReportobelloClient {
    http: reqwest::Client,
    host: Url,
    api_key: Option<String>,
    max_pdf_bytes: u64,
}

impl ReportobelloClient {
    pub fn new(settings: ApiSettings) -> Result<Self, ApiError> {
        let host = Url::parse(&settings.host)
            .map_err(|err| ApiError::InvalidUrl(format!("{}: {err}", settings.host)))?;
        if host.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(settings.host));
        }

        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            host,
            api_key: settings.api_key.filter(|key| !key.is_empty()),
            max_pdf_bytes: settings.max_pdf_bytes,
        })
    }

    /// All templates of the current user, latest version of each.
    pub async fn list_templates(&self) -> Result<Vec<Template>, ApiError> {
        let url = self.endpoint(&["templates"])?;
        let response = self.send(self.http.get(url)).await?;
        let response = expect_success(response, None).await?;
        read_json(response).await
    }

    /// Every stored version of `name`, newest first.
    pub async fn template_versions(&self, name: &str) -> Result<Vec<Template>, ApiError> {
        let url = self.endpoint(&["template", name])?;
        let response = self.send(self.http.get(url)).await?;
        let response = expect_success(response, Some(name)).await?;
        read_json(response).await
    }

    /// Removes `name`. Deleting a missing template is not an error.
    pub async fn delete_template(&self, name: &str) -> Result<(), ApiError> {
        let url = self.endpoint(&["template", name])?;
        let response = self.send(self.http.delete(url)).await?;
        expect_success(response, None).await?;
        report_info!("Deleted template {}", name);
        Ok(())
    }

    /// Recent builds of `name` (the server pages by 20), optionally older than `before`.
    pub async fn recent_builds(
        &self,
        name: &str,
        before: Option<DateTime<Utc>>,
    ) -> Result<Vec<Report>, ApiError> {
        let mut url = self.endpoint(&["template", name, "recent"])?;
        if let Some(before) = before {
            url.query_pairs_mut().append_pair("before", &before.to_rfc3339());
        }
        let response = self.send(self.http.get(url)).await?;
        let response = expect_success(response, Some(name)).await?;
        read_json(response).await
    }

    /// Sets environment variables visible to every report of the user.
    pub async fn update_env_vars(&self, vars: &BTreeMap<String, String>) -> Result<(), ApiError> {
        let url = self.endpoint(&["env"])?;
        let body = serde_json::to_vec(vars).map_err(|err| ApiError::Encode(err.to_string()))?;
        let request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body);
        let response = self.send(request).await?;
        expect_success(response, None).await?;
        report_info!("Updated {} environment variable(s)", vars.len());
        Ok(())
    }

    /// Deletes environment variables by key; unknown keys are ignored by the server.
    pub async fn delete_env_vars(&self, keys: &[String]) -> Result<(), ApiError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut url = self.endpoint(&["env"])?;
        url.query_pairs_mut().append_pair("keys", &keys.join(","));
        let response = self.send(self.http.delete(url)).await?;
        expect_success(response, None).await?;
        report_info!("Deleted {} environment variable(s)", keys.len());
        Ok(())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.host.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.host.to_string()))?
            .pop_if_empty()
            .extend(["api", "v1"])
            .extend(segments);
        Ok(url)
    }

    /// Sends `request` with the API key attached.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, ApiError> {
        let request = match &self.api_key {
            Some(key) => request.header(AUTHORIZATION, format!("Bearer {key}")),
            None => request,
        };
        execute(request).await
    }

    /// The key only ever goes back to the configured host.
    fn is_own_origin(&self, url: &Url) -> bool {
        url.origin() == self.host.origin()
    }
}

#[async_trait::async_trait]
impl ReportApi for ReportobelloClient {
    async fn upload_template(&self, name: &str, source: &str) -> Result<Template, ApiError> {
        let url = self.endpoint(&["template", name])?;
        let request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, TYPST_CONTENT_TYPE)
            .body(source.to_string());
        let response = self.send(request).await?;
        let response = expect_success(response, None).await?;
        let template: Template = read_json(response).await?;
        report_info!("Template {} is at version {}", template.name, template.version);
        Ok(template)
    }

    async fn run_report(&self, name: &str, data: &serde_json::Value) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&["template", name, "build"])?;
        url.query_pairs_mut().append_key_only("justUrl");
        let payload = BuildPayload {
            content_type: JSON_CONTENT_TYPE,
            data,
        };
        let body = serde_json::to_vec(&payload).map_err(|err| ApiError::Encode(err.to_string()))?;
        let request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body);
        let response = self.send(request).await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ApiError::TemplateNotFound(name.to_string())),
            StatusCode::BAD_REQUEST => {
                let message = response.text().await?;
                report_warn!("Build of {} failed: {}", name, message.trim());
                return Err(ApiError::BuildFailed(message.trim().to_string()));
            }
            _ => {}
        }

        let response = expect_success(response, Some(name)).await?;
        let text = response.text().await?;
        let location = Url::parse(text.trim())
            .map_err(|err| ApiError::InvalidResponse(format!("expected a pdf url: {err}")))?;
        report_info!("Built {} at {}", name, location);
        Ok(location)
    }

    async fn fetch_pdf(&self, url: &Url) -> Result<Bytes, ApiError> {
        let request = self.http.get(url.clone());
        let response = if self.is_own_origin(url) {
            self.send(request).await?
        } else {
            report_debug!("Fetching {} without credentials", url);
            execute(request).await?
        };
        let response = expect_success(response, None).await?;

        if let Some(content_len) = response.content_length() {
            if content_len > self.max_pdf_bytes {
                return Err(ApiError::TooLarge {
                    max_bytes: self.max_pdf_bytes,
                    actual: Some(content_len),
                });
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.max_pdf_bytes {
                return Err(ApiError::TooLarge {
                    max_bytes: self.max_pdf_bytes,
                    actual: Some(next_len),
                });
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(Bytes::from(bytes))
    }
}

async fn execute(request: reqwest::RequestBuilder) -> Result<Response, ApiError> {
    let response = request.send().await?;
    report_debug!("{} {}", response.status(), response.url());
    Ok(response)
}

/// Maps non-success statuses onto `ApiError`. A 404 names `template` when given.
async fn expect_success(
    response: Response,
    template: Option<&str>,
) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match (status, template) {
        (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN, _) => Err(ApiError::Unauthorized),
        (StatusCode::NOT_FOUND, Some(name)) => Err(ApiError::TemplateNotFound(name.to_string())),
        _ => {
            let message = response.text().await.unwrap_or_default();
            let message = if message.trim().is_empty() {
                status.to_string()
            } else {
                message.trim().to_string()
            };
            Err(ApiError::Rejected {
                status: status.as_u16(),
                message,
            })
        }
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|err| ApiError::InvalidResponse(err.to_string()))
}
