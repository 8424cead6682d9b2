//! Top-K next-token prediction collection.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::model::RationaleModel;

/// A single candidate next token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPrediction {
    /// Token ID
    pub token_id: u32,
    /// Decoded token string
    pub token: String,
    /// Probability (0.0 - 1.0)
    pub probability: f32,
}

/// Top-K prediction for one prompt. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// The raw prompt string
    pub prompt: String,
    /// Candidates ordered by probability, descending
    pub top_k: Vec<TokenPrediction>,
}

/// Collect top-K predictions for a batch of prompts.
///
/// Strictly sequential, one prompt per model call, in input order. Model
/// errors propagate unchanged; there is no retry or fallback here.
pub fn collect_predictions(
    model: &RationaleModel,
    prompts: &[String],
    top_k: usize,
) -> Result<Vec<Prediction>> {
    let mut results = Vec::with_capacity(prompts.len());

    for (i, prompt) in prompts.iter().enumerate() {
        let prediction = model.predict_top_k(prompt, top_k)?;
        info!("predicted {}/{} prompts", i + 1, prompts.len());
        results.push(prediction);
    }

    Ok(results)
}
