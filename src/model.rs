//! Model wrapper for next-token prediction and token bookkeeping.
//!
//! The actual language model lives behind [`CausalLmBackend`]; this layer
//! owns the tokenizer and handles encode/decode plumbing.

use hf_hub::{api::sync::Api, Repo, RepoType};
use tokenizers::Tokenizer;
use tracing::info;

use crate::error::{RationaleError, Result};
use crate::predict::{Prediction, TokenPrediction};

/// Backend trait for any causal language model.
///
/// Implementing this trait is the only requirement for plugging a model
/// into the prediction and rationalization pipeline. Forward-pass
/// internals, device placement, and batching strategy are entirely the
/// backend's business.
pub trait CausalLmBackend {
    /// Size of the output vocabulary.
    fn vocab_size(&self) -> usize;

    /// Next-token probability distribution given a token sequence.
    ///
    /// Returns one probability per vocabulary entry.
    fn next_token_probs(&self, input_ids: &[u32]) -> Result<Vec<f32>>;
}

/// High-level model wrapper: a boxed backend plus its tokenizer.
pub struct RationaleModel {
    backend: Box<dyn CausalLmBackend>,
    tokenizer: Tokenizer,
}

impl RationaleModel {
    /// Wrap a backend and its tokenizer.
    pub fn new(backend: Box<dyn CausalLmBackend>, tokenizer: Tokenizer) -> Self {
        Self { backend, tokenizer }
    }

    /// Download `tokenizer.json` for a model id from HuggingFace.
    pub fn tokenizer_from_pretrained(model_id: &str) -> Result<Tokenizer> {
        info!("Fetching tokenizer for: {}", model_id);
        let api = Api::new().map_err(RationaleError::tokenizer)?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(RationaleError::tokenizer)?;
        Tokenizer::from_file(&tokenizer_path).map_err(RationaleError::tokenizer)
    }

    /// Access the wrapped tokenizer.
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Size of the backend vocabulary.
    pub fn vocab_size(&self) -> usize {
        self.backend.vocab_size()
    }

    /// Encode text to token ids.
    pub fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let encoding = self
            .tokenizer
            .encode(text, false)
            .map_err(RationaleError::tokenizer)?;
        Ok(encoding.get_ids().to_vec())
    }

    /// Decode token ids back to text.
    pub fn decode(&self, ids: &[u32], skip_special_tokens: bool) -> Result<String> {
        self.tokenizer
            .decode(ids, skip_special_tokens)
            .map_err(RationaleError::tokenizer)
    }

    /// Decode a single token id, falling back to `<id>` on failure.
    pub fn decode_token(&self, token_id: u32) -> String {
        self.tokenizer
            .decode(&[token_id], false)
            .unwrap_or_else(|_| format!("<{token_id}>"))
    }

    /// Tokenize text and return the per-token strings.
    pub fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        let ids = self.encode(text)?;
        Ok(ids.iter().map(|&id| self.decode_token(id)).collect())
    }

    /// End-of-sequence token id, probed from common special-token names.
    pub fn eos_token_id(&self) -> Option<u32> {
        let vocab = self.tokenizer.get_vocab(true);
        ["<|endoftext|>", "<|im_end|>", "</s>", "<end_of_turn>"]
            .iter()
            .find_map(|name| vocab.get(*name).copied())
    }

    /// Padding token id; the EOS token doubles as the padding stand-in.
    pub fn pad_token_id(&self) -> Option<u32> {
        self.eos_token_id()
    }

    /// Top-K next-token prediction for a prompt.
    ///
    /// Candidates are ordered by probability descending; equal
    /// probabilities keep ascending token-id order.
    pub fn predict_top_k(&self, prompt: &str, k: usize) -> Result<Prediction> {
        let input_ids = self.encode(prompt)?;
        let probs = self.backend.next_token_probs(&input_ids)?;
        if probs.len() != self.backend.vocab_size() {
            return Err(RationaleError::ShapeMismatch(format!(
                "backend returned {} probabilities for vocab size {}",
                probs.len(),
                self.backend.vocab_size()
            )));
        }

        let mut ranked: Vec<usize> = (0..probs.len()).collect();
        ranked.sort_by(|&left, &right| {
            probs[right]
                .partial_cmp(&probs[left])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let top_k = ranked
            .into_iter()
            .take(k)
            .map(|idx| TokenPrediction {
                token_id: idx as u32,
                token: self.decode_token(idx as u32),
                probability: probs[idx],
            })
            .collect();

        Ok(Prediction {
            prompt: prompt.to_string(),
            top_k,
        })
    }
}
