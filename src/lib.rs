// Pedantic clippy configuration for research tooling.
#![allow(clippy::cast_precision_loss)] // usize→f32 intentional in score math
#![allow(clippy::module_name_repetitions)] // AnalogyCorpus in corpus.rs is fine
#![allow(clippy::missing_errors_doc)] // # Errors section for every Result fn
#![allow(clippy::must_use_candidate)] // #[must_use] on every pure fn is excessive
#![allow(clippy::doc_markdown)] // backticks for every technical term is excessive

//! rationale-rs: analogy prompts and token-importance rationales
//!
//! Builds analogy-based prompt datasets from a word-pair corpus and ranks
//! input tokens by their contribution to a causal language model's
//! next-token prediction, via an external attribution routine.
//!
//! ## Architecture
//!
//! - `corpus`: analogy corpus parsing and prompt-record building
//! - `templates`: narrative templates with `[A]`/`[B]` placeholder slots
//! - `model`: causal-LM backend trait and tokenizer-owning wrapper
//! - `predict`: sequential top-K next-token prediction collection
//! - `attribution`: attribution method taxonomy and collaborator trait
//! - `evaluator`: importance score evaluation and position ranking
//! - `alignment`: whitespace restoration and span score aggregation
//! - `persist`: single-file binary dataset save/load
//! - `error`: crate-wide error type

pub mod alignment;
pub mod attribution;
pub mod corpus;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod persist;
pub mod predict;
pub mod templates;

#[cfg(test)]
pub(crate) mod testing;

pub use alignment::{check_whitespace, match_tokens_with_scores};
pub use attribution::{AttributionConfig, AttributionMethod, Attributor};
pub use corpus::{AnalogyCategory, AnalogyCorpus, ParseMode, PromptRecord};
pub use error::{RationaleError, Result};
pub use evaluator::{ImportanceScoreEvaluator, ImportanceScores, Rationale, ScoreHistory};
pub use model::{CausalLmBackend, RationaleModel};
pub use persist::{load, save};
pub use predict::{collect_predictions, Prediction, TokenPrediction};
