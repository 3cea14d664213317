use std::error::Error as _;

use async_trait::async_trait;
use fractic_server_error::{CriticalError, ServerError};
use reqwest::{
    multipart::{Form, Part},
    Client, Url,
};
use tracing::warn;

use crate::{
    data::models::extraction_response_model::{ExtractionExchange, ExtractionHttpResponse},
    domain::entities::batch_file::PDF_MIME_TYPE,
    entities::{FilePayload, ImportConfig},
    errors::InvalidEndpoint,
};

#[async_trait]
pub(crate) trait ExtractionApiDatasource: Send + Sync {
    /// Posts the PDF as a multipart form. Any HTTP status is returned as a
    /// response, and a transport failure as its error text.
    async fn post_pdf(&self, file: &FilePayload) -> Result<ExtractionExchange, ServerError>;
}

pub(crate) struct ExtractionApiDatasourceImpl {
    client: Client,
    endpoint: Url,
    file_field_name: String,
}

impl ExtractionApiDatasourceImpl {
    pub(crate) fn new(config: &ImportConfig) -> Result<Self, ServerError> {
        let endpoint = Url::parse(&config.extraction_endpoint)
            .map_err(|e| InvalidEndpoint::with_debug(&config.extraction_endpoint, &e))?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CriticalError::with_debug("failed to build HTTP client", &e))?;
        Ok(Self {
            client,
            endpoint,
            file_field_name: config.file_field_name.clone(),
        })
    }
}

#[async_trait]
impl ExtractionApiDatasource for ExtractionApiDatasourceImpl {
    async fn post_pdf(&self, file: &FilePayload) -> Result<ExtractionExchange, ServerError> {
        let part = Part::bytes(file.bytes.to_vec())
            .file_name(file.name.clone())
            .mime_str(PDF_MIME_TYPE)
            .map_err(|e| CriticalError::with_debug("invalid PDF mime type", &e))?;
        let form = Form::new().part(self.file_field_name.clone(), part);

        let response = match self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Ok(transport_failed(self.endpoint.as_str(), e)),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Ok(transport_failed(self.endpoint.as_str(), e)),
        };

        Ok(ExtractionExchange::Response(ExtractionHttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().map(str::to_string),
            body,
        }))
    }
}

/// The error text with its causes appended, e.g. "error sending request for
/// url (...): operation timed out".
fn transport_failed(endpoint: &str, e: reqwest::Error) -> ExtractionExchange {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    warn!(endpoint, error = %message, "extraction request failed");
    ExtractionExchange::TransportFailed { message }
}
