//! Attribution collaborator interface.
//!
//! All attribution math (gradients, occlusion, attention rollout) lives in
//! an external routine behind [`Attributor`]; this module only names the
//! methods and their normalization policy.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{RationaleError, Result};

/// Named attribution method.
///
/// The normalization policy rides on the variant, so adding a method
/// forces a decision instead of relying on a string comparison downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributionMethod {
    /// Occlusion-based attribution (mask a token, measure the change).
    Occlusion,
    /// Plain gradient magnitude.
    Saliency,
    /// Gradient times input embedding.
    InputXGradient,
    /// Integrated gradients along a baseline path.
    IntegratedGradients,
    /// Attention-weight attribution.
    Attention,
}

impl AttributionMethod {
    /// Whether downstream mean scores must be renormalized to sum to 1.
    ///
    /// Occlusion scores carry raw probability differences and are not
    /// comparable across methods until rescaled; gradient-based scores
    /// come back already normalized by the attribution routine.
    pub fn requires_renormalization(self) -> bool {
        matches!(self, Self::Occlusion)
    }
}

impl fmt::Display for AttributionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Occlusion => "occlusion",
            Self::Saliency => "saliency",
            Self::InputXGradient => "input_x_gradient",
            Self::IntegratedGradients => "integrated_gradients",
            Self::Attention => "attention",
        };
        write!(f, "{name}")
    }
}

impl FromStr for AttributionMethod {
    type Err = RationaleError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "occlusion" => Ok(Self::Occlusion),
            "saliency" => Ok(Self::Saliency),
            "input_x_gradient" => Ok(Self::InputXGradient),
            "integrated_gradients" => Ok(Self::IntegratedGradients),
            "attention" => Ok(Self::Attention),
            other => Err(RationaleError::AttributionFailure(format!(
                "unknown attribution method `{other}`"
            ))),
        }
    }
}

/// Method selection plus method-specific options passed through to the
/// attribution routine untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionConfig {
    pub method: AttributionMethod,
    pub options: HashMap<String, serde_json::Value>,
}

impl AttributionConfig {
    /// Config for a method with no extra options.
    pub fn new(method: AttributionMethod) -> Self {
        Self {
            method,
            options: HashMap::new(),
        }
    }

    /// Add a method-specific option.
    pub fn with_option(mut self, key: &str, value: serde_json::Value) -> Self {
        self.options.insert(key.to_string(), value);
        self
    }
}

/// External attribution routine operating on `(input text, target text)`
/// pairs.
///
/// `attribute` returns one score vector per attribution step; each vector
/// carries one score per token position of the target text (the input
/// tokens followed by the target token). Alignment back to token ids is
/// the caller's job.
pub trait Attributor {
    /// The method this attributor implements.
    fn method(&self) -> AttributionMethod;

    /// Score every target-text token position for each attribution step.
    fn attribute(&self, input_text: &str, target_text: &str) -> Result<Vec<Vec<f32>>>;
}
