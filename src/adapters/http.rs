use crate::core::trace::Trace;
use crate::domain::model::{AuthContext, CreatePortRequest, NamedResource, PortResult};
use crate::domain::ports::{Collection, NetworkingApi};
use crate::utils::error::{ProvisionError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::time::Duration;

const JSON_MEDIA_TYPE: &str = "application/json";
const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// reqwest-backed client for the K5 networking service.
///
/// One instance is built per module run and shared by every request of that
/// run. The timeout applies to each request separately.
#[derive(Debug, Clone)]
pub struct K5NetworkClient {
    client: Client,
}

impl K5NetworkClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProvisionError::transport)?;
        Ok(Self { client })
    }

    fn headers(auth: &AuthContext) -> Result<HeaderMap> {
        let mut token =
            HeaderValue::from_str(auth.token()?).map_err(|e| ProvisionError::InvalidConfig {
                field: "k5_auth.auth_token".to_string(),
                value: "<redacted>".to_string(),
                reason: e.to_string(),
            })?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON_MEDIA_TYPE));
        headers.insert(HeaderName::from_static(AUTH_TOKEN_HEADER), token);
        Ok(headers)
    }

    fn describe_headers(headers: &HeaderMap) -> String {
        headers
            .iter()
            .map(|(name, value)| {
                let shown = if value.is_sensitive() {
                    "<redacted>"
                } else {
                    value.to_str().unwrap_or("<non-ascii>")
                };
                format!("{}: {}", name, shown)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn trace_request(trace: &mut Trace, endpoint: &str, url: &str, headers: &HeaderMap) {
        trace.record(format!("endpoint: {}", endpoint));
        trace.record(format!("REQ: {}", url));
        trace.record(format!("headers: {{{}}}", Self::describe_headers(headers)));
    }

    async fn read_body(url: &str, response: reqwest::Response) -> Result<(StatusCode, String)> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProvisionError::from_request(url, e))?;
        Ok((status, body))
    }
}

#[async_trait]
impl NetworkingApi for K5NetworkClient {
    async fn list(
        &self,
        auth: &AuthContext,
        collection: Collection,
        trace: &mut Trace,
    ) -> Result<Vec<NamedResource>> {
        let endpoint = auth.networking_endpoint()?;
        let url = format!("{}{}", endpoint, collection.path());
        let headers = Self::headers(auth)?;
        Self::trace_request(trace, endpoint, &url, &headers);

        tracing::debug!("📡 GET {}", url);
        let response = self
            .client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(|e| ProvisionError::from_request(&url, e))?;

        let (status, body) = Self::read_body(&url, response).await?;
        tracing::debug!("GET {} returned {}", url, status);

        if status != StatusCode::OK {
            return Err(ProvisionError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let mut listing: serde_json::Value = serde_json::from_str(&body)?;
        let entries = listing
            .get_mut(collection.key())
            .map(serde_json::Value::take)
            .ok_or_else(|| {
                <serde_json::Error as serde::de::Error>::missing_field(collection.key())
            })?;

        let resources: Vec<NamedResource> = serde_json::from_value(entries)?;
        tracing::debug!("Listed {} {}", resources.len(), collection.key());
        Ok(resources)
    }

    async fn create_port(
        &self,
        auth: &AuthContext,
        request: &CreatePortRequest,
        trace: &mut Trace,
    ) -> Result<PortResult> {
        let endpoint = auth.networking_endpoint()?;
        let url = format!("{}{}", endpoint, Collection::Ports.path());
        let headers = Self::headers(auth)?;
        Self::trace_request(trace, endpoint, &url, &headers);
        trace.record(format!("json: {}", serde_json::to_string(request)?));

        tracing::debug!("📡 POST {}", url);
        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(|e| ProvisionError::from_request(&url, e))?;

        let (status, body) = Self::read_body(&url, response).await?;
        tracing::debug!("POST {} returned {}", url, status);

        if status != StatusCode::CREATED {
            return Err(ProvisionError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        let mut created: serde_json::Value = serde_json::from_str(&body)?;
        trace.record(format!("response json: {}", created));

        if let Some(port) = created.get_mut("port") {
            return Ok(port.take());
        }
        Ok(created)
    }
}
