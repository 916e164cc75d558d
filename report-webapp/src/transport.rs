//! HTTP transport for report submissions

use crate::error::TransportError;
use crate::request::SubmissionRequest;
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Raw HTTP answer; interpretation happens in [`crate::response`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one multipart POST and returns whatever came back
#[async_trait(?Send)]
pub trait Transport {
    async fn post(
        &self,
        url: &Url,
        request: SubmissionRequest,
    ) -> Result<RawResponse, TransportError>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// `timeout` of `None` leaves the request unbounded on the client side
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;
        Ok(Self { client })
    }
}

fn multipart_form(request: SubmissionRequest) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for (name, value) in request.fields {
        form = form.text(name, value);
    }
    if let Some(attachment) = request.attachment {
        let part = Part::bytes(attachment.bytes)
            .file_name(attachment.file_name)
            .mime_str(&attachment.mime)
            .map_err(|e| TransportError::Build(format!("attachment content type: {}", e)))?;
        form = form.part(attachment.field, part);
    }
    Ok(form)
}

#[async_trait(?Send)]
impl Transport for ReqwestTransport {
    async fn post(
        &self,
        url: &Url,
        request: SubmissionRequest,
    ) -> Result<RawResponse, TransportError> {
        let form = multipart_form(request)?;

        let response = self
            .client
            .post(url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(TransportError::Send)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        debug!(status, content_type = ?content_type, "report endpoint answered");

        let body = response.text().await.map_err(TransportError::Body)?;

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }
}
