//! Pinecone client — namespace management, embedding and upsert for résumé
//! chunks.
//!
//! One namespace per uploaded file, derived from the file name. Re-indexing
//! the same file name clears the old vectors first, so indexing is idempotent
//! per name.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
const API_VERSION: &str = "2025-01";
/// Embedding model matching the index dimensionality (1024).
pub const EMBED_MODEL: &str = "multilingual-e5-large";

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Embedding count mismatch: {expected} inputs, {got} vectors")]
    EmbeddingMismatch { expected: usize, got: usize },
}

/// Derives the vector-store namespace from an uploaded file name: every
/// non-alphanumeric character is replaced by `_`. Pure and stable, so the
/// same file name always lands in the same namespace.
pub fn namespace_for_file(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

#[derive(Debug, Deserialize)]
struct IndexDescription {
    host: String,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    data: Vec<Embedding>,
}

#[derive(Debug, Deserialize)]
struct Embedding {
    values: Vec<f32>,
}

#[derive(Debug, Serialize)]
struct VectorRecord {
    id: String,
    values: Vec<f32>,
    metadata: serde_json::Value,
}

/// Pinecone REST client bound to one index. The data-plane host is resolved
/// from the control plane once at startup.
pub struct PineconeClient {
    client: Client,
    api_key: String,
    index_host: String,
}

impl PineconeClient {
    /// Resolves the index's data-plane host and returns a ready client.
    /// Fails fast if the index does not exist or the key is rejected.
    pub async fn connect(api_key: String, index_name: &str) -> Result<Self, VectorStoreError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()?;

        let response = client
            .get(format!("{CONTROL_PLANE_URL}/indexes/{index_name}"))
            .header("Api-Key", &api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let description: IndexDescription = response.json().await?;
        info!("Resolved index '{index_name}' host: {}", description.host);

        Ok(Self {
            client,
            api_key,
            index_host: description.host,
        })
    }

    /// Indexes résumé chunks into the namespace derived from `file_name`:
    /// embed, clear any prior vectors in the namespace, upsert.
    /// Returns the namespace written to.
    pub async fn index_resume(
        &self,
        file_name: &str,
        chunks: &[String],
    ) -> Result<String, VectorStoreError> {
        let namespace = namespace_for_file(file_name);
        let vectors = self.embed(chunks).await?;

        // Guarded cleanup: the namespace may not exist yet, and a failed
        // delete must not stop the upsert.
        if let Err(e) = self.clear_namespace(&namespace).await {
            warn!("Could not clear namespace '{namespace}' before upsert: {e}");
        }

        self.upsert(&namespace, chunks, vectors).await?;
        info!(
            "Indexed {} chunks into namespace '{namespace}'",
            chunks.len()
        );
        Ok(namespace)
    }

    /// Embeds passages via the Pinecone inference API.
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, VectorStoreError> {
        let body = json!({
            "model": EMBED_MODEL,
            "parameters": { "input_type": "passage", "truncate": "END" },
            "inputs": inputs.iter().map(|text| json!({ "text": text })).collect::<Vec<_>>(),
        });

        let response = self
            .client
            .post(format!("{CONTROL_PLANE_URL}/embed"))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let embed_response: EmbedResponse = response.json().await?;
        if embed_response.data.len() != inputs.len() {
            return Err(VectorStoreError::EmbeddingMismatch {
                expected: inputs.len(),
                got: embed_response.data.len(),
            });
        }

        debug!("Embedded {} passages", inputs.len());
        Ok(embed_response.data.into_iter().map(|e| e.values).collect())
    }

    /// Deletes every vector in `namespace`.
    pub async fn clear_namespace(&self, namespace: &str) -> Result<(), VectorStoreError> {
        let response = self
            .client
            .post(format!("https://{}/vectors/delete", self.index_host))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&json!({ "deleteAll": true, "namespace": namespace }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(())
    }

    async fn upsert(
        &self,
        namespace: &str,
        chunks: &[String],
        vectors: Vec<Vec<f32>>,
    ) -> Result<(), VectorStoreError> {
        let records: Vec<VectorRecord> = chunks
            .iter()
            .zip(vectors)
            .map(|(text, values)| VectorRecord {
                id: Uuid::new_v4().to_string(),
                values,
                metadata: json!({ "text": text }),
            })
            .collect();

        let response = self
            .client
            .post(format!("https://{}/vectors/upsert", self.index_host))
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(&json!({ "vectors": records, "namespace": namespace }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VectorStoreError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_replaces_non_alphanumerics() {
        assert_eq!(namespace_for_file("john doe-cv.pdf"), "john_doe_cv_pdf");
    }

    #[test]
    fn test_namespace_keeps_alphanumerics() {
        assert_eq!(namespace_for_file("Resume2024pdf"), "Resume2024pdf");
    }

    #[test]
    fn test_namespace_is_stable() {
        let a = namespace_for_file("my résumé (final).pdf");
        let b = namespace_for_file("my résumé (final).pdf");
        assert_eq!(a, b);
    }
}
