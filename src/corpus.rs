//! Analogy corpus parsing and prompt-record building.
//!
//! The raw corpus is a single text blob with colon-introduced sections:
//! each section names an analogy category and lists analogy quadruples as
//! whitespace-separated tokens. Only pairs matter here, so the flattened
//! token stream of a section is read as alternating left/right members.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tokenizers::Tokenizer;
use tracing::{debug, warn};

use crate::error::{RationaleError, Result};
use crate::templates;

/// How to treat a section whose token count cannot be paired up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Fail with `MalformedCorpus` on an unpairable trailing token.
    #[default]
    Strict,
    /// Truncate the unmatched token and log a warning.
    Lenient,
}

/// One analogy category: parallel left/right member lists plus the
/// narrative template used to turn a pair into a prompt.
///
/// Invariant: `a.len() == b.len()`, and `(a[i], b[i])` pairs are unique
/// in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalogyCategory {
    /// Category identifier, e.g. `capital-common-countries`.
    pub name: String,
    /// Left members of each pair.
    pub a: Vec<String>,
    /// Right members of each pair.
    pub b: Vec<String>,
    /// Narrative template with `[A]`/`[B]` markers; empty until
    /// `AnalogyCorpus::with_templates` runs.
    pub template: String,
}

impl AnalogyCategory {
    /// Number of analogy pairs.
    pub fn len(&self) -> usize {
        self.a.len()
    }

    /// Check if the category holds no pairs.
    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }

    /// Iterate over `(left, right)` pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.a
            .iter()
            .zip(self.b.iter())
            .map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// Build the prompt for pair `index` by substituting it into the
    /// category template.
    pub fn prompt(&self, index: usize) -> Result<String> {
        templates::validate(&self.template)?;
        let (a, b) = self.a.get(index).zip(self.b.get(index)).ok_or_else(|| {
            RationaleError::MalformedCorpus(format!(
                "pair index {index} out of range for `{}` ({} pairs)",
                self.name,
                self.len()
            ))
        })?;
        Ok(templates::fill(&self.template, a, b))
    }
}

/// One template-filled prompt, ready for prediction or rationalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub category: String,
    pub a: String,
    pub b: String,
    pub prompt: String,
}

/// Parsed analogy corpus: all categories in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalogyCorpus {
    categories: Vec<AnalogyCategory>,
}

impl AnalogyCorpus {
    /// Parse the raw analogy file content.
    ///
    /// Lines are joined with spaces and split on `:` to isolate sections.
    /// Within a section the first whitespace token is the category name and
    /// the rest pair up by parity: even-indexed tokens are left members,
    /// odd-indexed tokens right members. Whitespace-splitting the section
    /// body also absorbs the empty-token artifact that the `:` split leaves
    /// at the end of every section but the last. Duplicate pairs are
    /// dropped, first occurrence wins, so downstream vocabulary filtering
    /// stays deterministic.
    pub fn parse(raw: &str, mode: ParseMode) -> Result<Self> {
        let joined = raw.lines().collect::<Vec<_>>().join(" ");

        let mut categories = Vec::new();
        // Everything before the first `:` is prologue, not a section.
        for section in joined.split(':').skip(1) {
            let mut tokens = section.split_whitespace();
            let name = tokens.next().ok_or_else(|| {
                RationaleError::MalformedCorpus("section with empty header".to_string())
            })?;

            let members: Vec<&str> = tokens.collect();
            if members.len() % 2 != 0 {
                match mode {
                    ParseMode::Strict => {
                        return Err(RationaleError::MalformedCorpus(format!(
                            "section `{name}` has an unpairable trailing token ({} tokens)",
                            members.len()
                        )));
                    }
                    ParseMode::Lenient => {
                        warn!(
                            "section `{}` has an unpairable trailing token, dropping `{}`",
                            name,
                            members[members.len() - 1]
                        );
                    }
                }
            }

            let mut seen = HashSet::new();
            let mut a = Vec::new();
            let mut b = Vec::new();
            for pair in members.chunks_exact(2) {
                if seen.insert((pair[0], pair[1])) {
                    a.push(pair[0].to_string());
                    b.push(pair[1].to_string());
                }
            }

            debug!("section `{}`: {} unique pairs", name, a.len());
            categories.push(AnalogyCategory {
                name: name.to_string(),
                a,
                b,
                template: String::new(),
            });
        }

        Ok(Self { categories })
    }

    /// Attach the registered narrative template to every category.
    ///
    /// A category with no registered template fails with
    /// `UnknownCategory`; sections are never silently skipped.
    pub fn with_templates(mut self) -> Result<Self> {
        for category in &mut self.categories {
            category.template = templates::template_for(&category.name)?.to_string();
        }
        Ok(self)
    }

    /// Keep only pairs whose members each tokenize to a single word-piece.
    ///
    /// Members are encoded in their in-sentence form (with a leading
    /// space), since subword vocabularies fold the preceding space into the
    /// word piece. Order and the `a`/`b` parallelism are preserved.
    pub fn retain_single_token_pairs(&mut self, tokenizer: &Tokenizer) -> Result<()> {
        for category in &mut self.categories {
            let mut keep = Vec::with_capacity(category.len());
            for (a, b) in category.pairs() {
                keep.push(is_single_token(tokenizer, a)? && is_single_token(tokenizer, b)?);
            }

            let before = category.len();
            let mut flags = keep.iter().copied();
            category.a.retain(|_| flags.next().unwrap_or(false));
            let mut flags = keep.iter().copied();
            category.b.retain(|_| flags.next().unwrap_or(false));
            debug!(
                "section `{}`: kept {}/{} single-token pairs",
                category.name,
                category.len(),
                before
            );
        }
        Ok(())
    }

    /// Look up a category by name.
    pub fn category(&self, name: &str) -> Option<&AnalogyCategory> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// All categories in file order.
    pub fn categories(&self) -> &[AnalogyCategory] {
        &self.categories
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Check if the corpus holds no categories.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Sample up to `samples_per_category` pairs from each category with a
    /// seeded RNG and substitute them into the category template.
    ///
    /// The same seed always yields the same records.
    pub fn build_prompt_records(
        &self,
        samples_per_category: usize,
        seed: u64,
    ) -> Result<Vec<PromptRecord>> {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let mut records = Vec::new();

        for category in &self.categories {
            let mut indices: Vec<usize> = (0..category.len()).collect();
            indices.shuffle(&mut rng);
            indices.truncate(samples_per_category);
            // Keep corpus order within the sampled subset.
            indices.sort_unstable();

            for index in indices {
                records.push(PromptRecord {
                    category: category.name.clone(),
                    a: category.a[index].clone(),
                    b: category.b[index].clone(),
                    prompt: category.prompt(index)?,
                });
            }
        }

        Ok(records)
    }
}

fn is_single_token(tokenizer: &Tokenizer, word: &str) -> Result<bool> {
    let encoding = tokenizer
        .encode(format!(" {word}"), false)
        .map_err(RationaleError::tokenizer)?;
    Ok(encoding.get_ids().len() == 1)
}
