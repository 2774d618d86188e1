use crate::config::{RtAuth, RtConfig};
use crate::parser;
use crate::records::{
    AttachmentManager, CustomFieldManager, RecordManager, TicketManager, TransactionManager,
};
use crate::types::RecordType;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum RtError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Authentication failed")]
    Authentication,

    #[error("Not found: {url}")]
    NotFound { url: String },

    #[error("RT API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("{operation} is not supported for record type {record_type} due to RT API limitations")]
    Unsupported {
        operation: String,
        record_type: RecordType,
    },

    #[error("Invalid ticket status: {status}")]
    InvalidStatus { status: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },
}

pub type RtResult<T> = Result<T, RtError>;

/// A file to attach through the REST 1.0 API.
#[derive(Debug, Clone)]
pub struct V1Attachment {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl V1Attachment {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// A REST 1.0 response: raw body plus its parsed form.
#[derive(Debug, Clone)]
pub struct V1Response {
    pub status: Option<u32>,
    pub sections: Vec<parser::Fields>,
    pub raw: String,
}

/// The verb layer record managers talk through. [`RtClient`] is the real
/// implementation; tests substitute a mock.
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET relative to the REST 2.0 root.
    async fn get(&self, path: &str) -> RtResult<Value>;

    /// POST JSON content relative to the REST 2.0 root.
    async fn post(&self, path: &str, content: &Value) -> RtResult<Value>;

    /// POST a plain-text body (some endpoints require `text/plain`).
    async fn post_plain(&self, path: &str, body: String) -> RtResult<Value>;

    /// PUT JSON content relative to the REST 2.0 root.
    async fn put(&self, path: &str, content: &Value) -> RtResult<Value>;

    /// DELETE relative to the REST 2.0 root.
    async fn delete(&self, path: &str) -> RtResult<Value>;

    /// Multipart POST against the REST 1.0 API; only needed for attachments.
    async fn post_v1(
        &self,
        path: &str,
        content: Vec<(String, String)>,
        attachments: Vec<V1Attachment>,
    ) -> RtResult<V1Response>;

    /// Base URL of the RT host (no API suffix), used for direct file links.
    fn base_host(&self) -> &str;
}

/// Client for an RT host: holds the authenticated session and hands out
/// per-record-type managers.
#[derive(Debug)]
pub struct RtClient {
    http: reqwest::Client,
    base: String,
    api_root: String,
}

impl RtClient {
    /// Builds the HTTP session and performs the login POST: a credential
    /// form, or an `Authentication: token <tok>` form when a token is
    /// configured.
    pub async fn login(config: RtConfig) -> RtResult<Self> {
        config
            .validate()
            .map_err(|message| RtError::InvalidConfig { message })?;

        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(RtError::Network)?;

        let base = config.base();
        let auth_url = format!("{}{}", base, config.auth_endpoint);
        debug!(url = %auth_url, "authenticating");

        let response = match &config.auth {
            RtAuth::Credentials { username, password } => {
                http.post(&auth_url)
                    .form(&[("user", username.as_str()), ("pass", password.as_str())])
                    .send()
                    .await?
            }
            RtAuth::Token(token) => {
                http.post(&auth_url)
                    .form(&[("Authentication", format!("token {token}"))])
                    .send()
                    .await?
            }
        };
        if !response.status().is_success() {
            return Err(RtError::Authentication);
        }
        info!(host = %base, "authenticated");

        let api_root = format!("{}{}", base, config.api_endpoint);
        Ok(Self {
            http,
            base,
            api_root,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_root, path.trim_start_matches('/'))
    }

    fn v1_url(&self, path: &str) -> String {
        format!("{}REST/1.0/{}", self.base, path.trim_start_matches('/'))
    }

    async fn decode(response: reqwest::Response) -> RtResult<Value> {
        let status = response.status();
        let url = response.url().to_string();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let body = response.text().await.unwrap_or_default();
        Err(match status.as_u16() {
            401 | 403 => RtError::Authentication,
            404 => RtError::NotFound { url },
            code => RtError::Api { status: code, body },
        })
    }

    // Record managers ---------------------------------------------------

    pub fn ticket(&self) -> TicketManager<'_> {
        TicketManager::new(self)
    }

    pub fn transaction(&self) -> TransactionManager<'_> {
        TransactionManager::new(self)
    }

    pub fn attachment(&self) -> AttachmentManager<'_> {
        AttachmentManager::new(self)
    }

    pub fn custom_field(&self) -> CustomFieldManager<'_> {
        CustomFieldManager::new(self)
    }

    pub fn queue(&self) -> RecordManager<'_> {
        RecordManager::new(self, RecordType::Queue)
    }

    pub fn catalog(&self) -> RecordManager<'_> {
        RecordManager::new(self, RecordType::Catalog)
    }

    pub fn asset(&self) -> RecordManager<'_> {
        RecordManager::new(self, RecordType::Asset)
    }

    pub fn user(&self) -> RecordManager<'_> {
        RecordManager::new(self, RecordType::User)
    }

    pub fn group(&self) -> RecordManager<'_> {
        RecordManager::new(self, RecordType::Group)
    }

    pub fn custom_role(&self) -> RecordManager<'_> {
        RecordManager::new(self, RecordType::CustomRole)
    }

    // System information -------------------------------------------------

    /// General information about the RT system, including version and
    /// plugins.
    pub async fn rt_info(&self) -> RtResult<Value> {
        self.get("rt").await
    }

    pub async fn rt_version(&self) -> RtResult<String> {
        let info = self.rt_info().await?;
        info["Version"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| RtError::MalformedResponse {
                message: "rt info has no Version field".to_string(),
            })
    }

    pub async fn rt_plugins(&self) -> RtResult<Vec<String>> {
        let info = self.rt_info().await?;
        info["Plugins"]
            .as_array()
            .map(|plugins| {
                plugins
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .ok_or_else(|| RtError::MalformedResponse {
                message: "rt info has no Plugins field".to_string(),
            })
    }
}

/// Encodes v1 form content as `Key: value` lines, indenting embedded
/// newlines so multi-line values stay within their field.
fn encode_v1_content(content: &[(String, String)]) -> String {
    let mut data = String::new();
    for (key, value) in content {
        let value = value.replace('\n', "\n  ");
        data.push_str(&format!("{key}: {value}\n"));
    }
    data
}

#[async_trait]
impl Transport for RtClient {
    async fn get(&self, path: &str) -> RtResult<Value> {
        let url = self.api_url(path);
        debug!(%url, "GET");
        Self::decode(self.http.get(&url).send().await?).await
    }

    async fn post(&self, path: &str, content: &Value) -> RtResult<Value> {
        let url = self.api_url(path);
        debug!(%url, "POST");
        Self::decode(self.http.post(&url).json(content).send().await?).await
    }

    async fn post_plain(&self, path: &str, body: String) -> RtResult<Value> {
        let url = self.api_url(path);
        debug!(%url, "POST (text/plain)");
        Self::decode(
            self.http
                .post(&url)
                .header(reqwest::header::CONTENT_TYPE, "text/plain")
                .body(body)
                .send()
                .await?,
        )
        .await
    }

    async fn put(&self, path: &str, content: &Value) -> RtResult<Value> {
        let url = self.api_url(path);
        debug!(%url, "PUT");
        Self::decode(self.http.put(&url).json(content).send().await?).await
    }

    async fn delete(&self, path: &str) -> RtResult<Value> {
        let url = self.api_url(path);
        debug!(%url, "DELETE");
        Self::decode(self.http.delete(&url).send().await?).await
    }

    async fn post_v1(
        &self,
        path: &str,
        mut content: Vec<(String, String)>,
        attachments: Vec<V1Attachment>,
    ) -> RtResult<V1Response> {
        let url = self.v1_url(path);
        debug!(%url, attachments = attachments.len(), "POST v1");

        let mut form = reqwest::multipart::Form::new();
        if !attachments.is_empty() {
            let names = attachments
                .iter()
                .map(|a| a.name.clone())
                .collect::<Vec<_>>()
                .join("\n ");
            content.push(("Attachment".to_string(), names));
            for (i, attachment) in attachments.into_iter().enumerate() {
                form = form.part(
                    format!("attachment_{}", i + 1),
                    reqwest::multipart::Part::bytes(attachment.bytes)
                        .file_name(attachment.name),
                );
            }
        }
        form = form.text("content", encode_v1_content(&content));

        let response = self.http.post(&url).multipart(form).send().await?;
        let raw = response.text().await?;
        Ok(V1Response {
            status: parser::parse_status_code(&raw),
            sections: parser::parse(&raw),
            raw,
        })
    }

    fn base_host(&self) -> &str {
        &self.base
    }
}
