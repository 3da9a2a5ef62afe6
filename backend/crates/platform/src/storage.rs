//! Object Storage Client
//!
//! Boundary to the external asset host that stores uploaded images.
//! The application hands over a byte buffer and a folder label and gets
//! back a public URL; nothing else about the host leaks inward.

use serde::Deserialize;
use thiserror::Error;

/// Metadata returned by the asset host for a stored object
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedObject {
    /// Publicly reachable URL of the stored object
    pub url: String,
    /// Size in bytes as reported by the host
    #[serde(default)]
    pub bytes: Option<u64>,
    /// Content type as reported by the host
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Object storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Transport-level failure
    #[error("Storage request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The host rejected the upload
    #[error("Storage host rejected the upload with status {status}")]
    Rejected { status: u16 },

    /// The host answered with something we cannot use
    #[error("Unusable storage response: {0}")]
    InvalidResponse(String),
}

/// Trait for object storage backends
#[trait_variant::make(ObjectStorage: Send)]
pub trait LocalObjectStorage {
    /// Store `data` under the given folder label, returning the public
    /// URL and metadata.
    async fn put(
        &self,
        data: Vec<u8>,
        file_name: &str,
        folder: &str,
    ) -> Result<UploadedObject, StorageError>;
}

/// HTTP-backed object storage
///
/// Posts a multipart form (`file`, `folder`) to the configured upload
/// endpoint and expects a JSON body carrying at least `url`.
#[derive(Debug, Clone)]
pub struct HttpObjectStorage {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpObjectStorage {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key,
            client: reqwest::Client::new(),
        }
    }
}

impl ObjectStorage for HttpObjectStorage {
    async fn put(
        &self,
        data: Vec<u8>,
        file_name: &str,
        folder: &str,
    ) -> Result<UploadedObject, StorageError> {
        let part = reqwest::multipart::Part::bytes(data).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("folder", folder.to_string());

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = %status, "Asset host rejected upload");
            return Err(StorageError::Rejected {
                status: status.as_u16(),
            });
        }

        let object: UploadedObject = response
            .json()
            .await
            .map_err(|e| StorageError::InvalidResponse(e.to_string()))?;

        if object.url.is_empty() {
            return Err(StorageError::InvalidResponse(
                "response carried no object URL".to_string(),
            ));
        }

        Ok(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uploaded_object_deserializes_minimal_body() {
        let object: UploadedObject =
            serde_json::from_str(r#"{"url": "https://cdn.example.com/x.webp"}"#).unwrap();
        assert_eq!(object.url, "https://cdn.example.com/x.webp");
        assert_eq!(object.bytes, None);
        assert_eq!(object.content_type, None);
    }

    #[test]
    fn test_uploaded_object_deserializes_full_body() {
        let object: UploadedObject = serde_json::from_str(
            r#"{"url": "https://cdn.example.com/x.webp", "bytes": 1024, "content_type": "image/webp"}"#,
        )
        .unwrap();
        assert_eq!(object.bytes, Some(1024));
        assert_eq!(object.content_type.as_deref(), Some("image/webp"));
    }
}
