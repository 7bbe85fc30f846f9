//! Deterministic trigram-hash embedding provider.
//!
//! Produces content-dependent unit vectors from character trigrams and
//! word frequencies. Not semantically accurate like a neural encoder, but
//! deterministic and cheap — the default for local runs and the encoder
//! used throughout the test suite.

use crate::embeddings::provider::EmbeddingProvider;
use askdocs_core::AppResult;
use std::collections::{HashMap, HashSet};

/// Common English words filtered out before hashing.
const STOP_WORDS: [&str; 32] = [
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them",
];

#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
}

impl TrigramProvider {
    /// Create a new trigram provider with the given vector dimension.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn encode(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];

        let stop_words: HashSet<&str> = STOP_WORDS.iter().copied().collect();
        let lower = text.to_lowercase();

        let mut word_freq: HashMap<&str, u32> = HashMap::new();
        for word in lower
            .split_whitespace()
            .filter(|w| w.len() > 2 && !stop_words.contains(w))
        {
            *word_freq.entry(word).or_insert(0) += 1;
        }

        for (word, freq) in &word_freq {
            // Each trigram of the word lights up one dimension; sqrt
            // scaling keeps frequent words from dominating
            let chars: Vec<char> = word.chars().collect();
            for window in chars.windows(3) {
                let dim = hash_chars(window, 37) % self.dimensions;
                embedding[dim] += (*freq as f32).sqrt();
            }

            // The whole word lights up one more
            let dim = hash_chars(&chars, 31) % self.dimensions;
            embedding[dim] += *freq as f32;
        }

        normalize(&mut embedding);
        embedding
    }
}

/// FNV-style rolling hash over characters.
fn hash_chars(chars: &[char], prime: u64) -> usize {
    let mut acc = 0u64;
    for &c in chars {
        let mut buf = [0u8; 4];
        for &b in c.encode_utf8(&mut buf).as_bytes() {
            acc = acc.wrapping_mul(prime).wrapping_add(b as u64);
        }
    }
    acc as usize
}

/// Scale to a unit vector; zero vectors stay zero.
fn normalize(v: &mut [f32]) {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.encode(text)).collect())
    }
}
