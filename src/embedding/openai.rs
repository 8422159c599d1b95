//! Embeddings over an OpenAI-compatible `/embeddings` endpoint.

use super::Embedder;
use crate::config::{Credentials, Settings};
use crate::error::{DocmindError, Result};
use crate::openai::{classify_error, create_client, Service};
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Remote embedder.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: Option<u32>,
    batch_size: usize,
}

impl OpenAIEmbedder {
    /// Create an embedder from settings.
    pub fn new(settings: &Settings, credentials: &Credentials) -> Result<Self> {
        Ok(Self {
            client: create_client(&settings.api, credentials)?,
            model: settings.embedding.model.clone(),
            dimensions: settings.embedding.dimensions,
            batch_size: settings.embedding.batch_size.max(1),
        })
    }

    /// The configured model name.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| DocmindError::ServiceUnavailable("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            let mut args = CreateEmbeddingRequestArgs::default();
            args.model(&self.model)
                .input(EmbeddingInput::StringArray(batch.to_vec()));
            if let Some(dimensions) = self.dimensions {
                args.dimensions(dimensions);
            }
            let request = args
                .build()
                .map_err(|e| classify_error(e, Service::Embeddings))?;

            let response = self
                .client
                .embeddings()
                .create(request)
                .await
                .map_err(|e| classify_error(e, Service::Embeddings))?;

            if response.data.len() != batch.len() {
                return Err(DocmindError::ServiceUnavailable(format!(
                    "Embedding service returned {} vectors for {} inputs",
                    response.data.len(),
                    batch.len()
                )));
            }

            // Sort by index to ensure correct order
            let mut embeddings: Vec<_> = response.data.into_iter().collect();
            embeddings.sort_by_key(|e| e.index);

            all_embeddings.extend(embeddings.into_iter().map(|e| e.embedding));
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }
}
