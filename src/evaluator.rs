//! Importance score evaluation and rationalization.
//!
//! Bridges token-id batches to the text-based attribution collaborator:
//! decode ids to text, attribute, align the scores back to input token
//! positions, and rank positions by importance.

use candle_core::Tensor;

use crate::attribution::Attributor;
use crate::error::{RationaleError, Result};
use crate::model::RationaleModel;

/// Dense per-token importance scores for one evaluation batch.
///
/// Shape `(batch, sequence length)`, one scalar per input token position.
/// No normalization is guaranteed at this level.
#[derive(Debug, Clone)]
pub struct ImportanceScores {
    scores: Tensor,
}

impl ImportanceScores {
    /// The underlying `(batch, seq)` score tensor.
    pub fn tensor(&self) -> &Tensor {
        &self.scores
    }

    /// Scores as nested vectors, one inner vector per batch element.
    pub fn to_vec2(&self) -> Result<Vec<Vec<f32>>> {
        Ok(self.scores.to_vec2::<f32>()?)
    }

    /// Per-position mean score across the batch.
    pub fn mean(&self) -> Result<Vec<f32>> {
        Ok(self.scores.mean(0)?.to_vec1::<f32>()?)
    }
}

/// Ranked rationale for one evaluation batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Rationale {
    /// Input token positions per batch element, ordered by score
    /// descending. Equal scores keep ascending position order (stable
    /// sort, lower original index wins).
    pub ranked_positions: Vec<Vec<usize>>,
    /// Per-position mean score across the batch; renormalized to sum to 1
    /// for methods that require it.
    pub mean_scores: Vec<f32>,
}

/// Caller-held history of evaluated score batches.
///
/// The evaluator itself keeps no state between calls; push results here
/// when past batches need to stay inspectable.
#[derive(Debug, Default)]
pub struct ScoreHistory {
    batches: Vec<ImportanceScores>,
}

impl ScoreHistory {
    /// Record an evaluated batch.
    pub fn push(&mut self, scores: ImportanceScores) {
        self.batches.push(scores);
    }

    /// The most recently recorded batch.
    pub fn last(&self) -> Option<&ImportanceScores> {
        self.batches.last()
    }

    /// Number of recorded batches.
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// Check if no batches are recorded.
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

/// Scores input tokens for their contribution to a target prediction.
pub struct ImportanceScoreEvaluator<'m> {
    model: &'m RationaleModel,
    attributor: Box<dyn Attributor>,
}

impl<'m> ImportanceScoreEvaluator<'m> {
    /// Pair a model with an attribution routine.
    pub fn new(model: &'m RationaleModel, attributor: Box<dyn Attributor>) -> Self {
        Self { model, attributor }
    }

    /// Evaluate importance scores for a batch of (input, target) pairs.
    ///
    /// `input_ids` has shape `(batch, seq)`, `target_ids` shape `(batch)`.
    /// Each input sequence and its input+target extension are decoded back
    /// to text because the attribution routine operates on text pairs. The
    /// decoded input must re-encode to the original ids; when the
    /// tokenizer cannot round-trip (whitespace runs and multi-token
    /// newlines are the usual culprits) the attribution output cannot be
    /// aligned to positions and evaluation fails with `RoundTripMismatch`.
    pub fn evaluate(&self, input_ids: &Tensor, target_ids: &Tensor) -> Result<ImportanceScores> {
        let (batch, seq) = input_ids.dims2()?;
        let targets = target_ids.to_vec1::<u32>()?;
        if targets.len() != batch {
            return Err(RationaleError::ShapeMismatch(format!(
                "{} targets for an input batch of {batch}",
                targets.len()
            )));
        }

        let rows = input_ids.to_vec2::<u32>()?;
        let mut flat = Vec::with_capacity(batch * seq);

        for (row, &target) in rows.iter().zip(&targets) {
            let input_text = self.model.decode(row, true)?;

            let mut full = row.clone();
            full.push(target);
            let target_text = self.model.decode(&full, true)?;

            let reencoded = self.model.encode(&input_text)?;
            if reencoded != *row {
                return Err(RationaleError::RoundTripMismatch(format!(
                    "decoding `{input_text}` re-encodes to {} ids, expected {}",
                    reencoded.len(),
                    row.len()
                )));
            }

            flat.extend(self.attribute_one(&input_text, &target_text, seq)?);
        }

        let scores = Tensor::from_vec(flat, (batch, seq), input_ids.device())?;
        Ok(ImportanceScores { scores })
    }

    /// Evaluate, then rank input positions by importance.
    ///
    /// Positions are sorted per batch element by score descending. The
    /// batch-mean score vector is renormalized to sum to 1 when the
    /// attribution method requires it (occlusion), so magnitudes stay
    /// comparable across methods.
    pub fn rationalize(&self, input_ids: &Tensor, target_ids: &Tensor) -> Result<Rationale> {
        let scores = self.evaluate(input_ids, target_ids)?;

        let mut mean_scores = scores.mean()?;
        if self.attributor.method().requires_renormalization() {
            let sum: f32 = mean_scores.iter().sum();
            if sum.abs() < f32::EPSILON {
                return Err(RationaleError::AttributionFailure(
                    "mean importance scores sum to zero, cannot renormalize".to_string(),
                ));
            }
            for score in &mut mean_scores {
                *score /= sum;
            }
        }

        let ranked_positions = scores
            .to_vec2()?
            .into_iter()
            .map(|row| {
                let mut positions: Vec<usize> = (0..row.len()).collect();
                positions.sort_by(|&left, &right| {
                    row[right]
                        .partial_cmp(&row[left])
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                positions
            })
            .collect();

        Ok(Rationale {
            ranked_positions,
            mean_scores,
        })
    }

    /// Run the attributor on one text pair and align scores to the input.
    ///
    /// Step vectors are summed elementwise, then the final position (the
    /// target attributing to itself) is dropped, leaving one score per
    /// input token.
    fn attribute_one(&self, input_text: &str, target_text: &str, seq: usize) -> Result<Vec<f32>> {
        let steps = self.attributor.attribute(input_text, target_text)?;
        if steps.is_empty() {
            return Err(RationaleError::AttributionFailure(
                "attribution routine returned no steps".to_string(),
            ));
        }

        let mut scores = vec![0f32; seq + 1];
        for step in &steps {
            if step.len() != seq + 1 {
                return Err(RationaleError::AttributionFailure(format!(
                    "attribution step has {} scores, expected {}",
                    step.len(),
                    seq + 1
                )));
            }
            for (acc, value) in scores.iter_mut().zip(step) {
                *acc += value;
            }
        }
        scores.truncate(seq);

        if scores.iter().any(|score| !score.is_finite()) {
            return Err(RationaleError::AttributionFailure(
                "attribution scores contain non-finite values".to_string(),
            ));
        }

        Ok(scores)
    }
}
