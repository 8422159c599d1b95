//! Deterministic stand-ins for the remote services, used by unit tests.

use crate::completion::{ChatMessage, ChatModel, Role};
use crate::config::REFUSAL;
use crate::embedding::Embedder;
use crate::error::{DocmindError, Result};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const DIMENSIONS: usize = 256;

/// Bag-of-words embedder: each lowercase word bumps one hashed dimension.
#[derive(Default)]
pub struct HashEmbedder {
    calls: AtomicUsize,
}

impl HashEmbedder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of embed requests served.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vectorize(text: &str) -> Vec<f32> {
        let mut v = vec![0.0; DIMENSIONS];
        for word in words(text) {
            let mut hasher = DefaultHasher::new();
            word.hash(&mut hasher);
            v[(hasher.finish() % DIMENSIONS as u64) as usize] += 1.0;
        }
        v
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::vectorize(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::vectorize(t)).collect())
    }
}

/// Embedder whose backend is always down.
pub struct FailingEmbedder;

#[async_trait]
impl Embedder for FailingEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(DocmindError::ServiceUnavailable("connection refused".to_string()))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(DocmindError::ServiceUnavailable("connection refused".to_string()))
    }
}

/// Embedder that drops the last vector of every batch.
#[derive(Default)]
pub struct ShortEmbedder {
    inner: HashEmbedder,
}

#[async_trait]
impl Embedder for ShortEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.inner.embed(text).await
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = self.inner.embed_batch(texts).await?;
        vectors.pop();
        Ok(vectors)
    }
}

/// Chat model that answers only from the context it is given.
///
/// Replies `"Answer: <first context passage>"` when a keyword of the question
/// (a word longer than three letters) occurs in the context, and the refusal
/// string otherwise.
#[derive(Default)]
pub struct GroundedChatModel {
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl GroundedChatModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completion requests served.
    pub fn calls(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Messages of the most recent request.
    pub fn last_request(&self) -> Option<Vec<ChatMessage>> {
        self.requests.lock().ok().and_then(|r| r.last().cloned())
    }
}

#[async_trait]
impl ChatModel for GroundedChatModel {
    async fn complete(&self, messages: &[ChatMessage], _max_tokens: u32, _temperature: f32) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }

        let last = messages
            .last()
            .filter(|m| m.role == Role::User)
            .ok_or_else(|| DocmindError::Generation("no question".to_string()))?;

        let (context, question) = last
            .content
            .split_once("\n\nQuestion:\n")
            .ok_or_else(|| DocmindError::Generation("unexpected layout".to_string()))?;
        let context = context.trim_start_matches("Context:\n").to_lowercase();

        let grounded = words(question).any(|w| w.len() > 3 && context.contains(&w));
        if grounded {
            let first = context.split("\n\n").next().unwrap_or_default();
            Ok(format!("  Answer: {}  ", first))
        } else {
            Ok(format!("{}\n", REFUSAL))
        }
    }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(|w| w.to_lowercase())
}

/// A structurally valid one-page PDF whose text uses a font it never declares.
pub fn pdf_without_resources() -> Vec<u8> {
    let content = "BT /F9 12 Tf 72 712 Td (Hello) Tj ET";
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] /Contents 4 0 R >>".to_string(),
        format!("<< /Length {} >>\nstream\n{}\nendstream", content.len(), content),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_at = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{:010} 00000 n \n", offset));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    ));
    pdf.into_bytes()
}
