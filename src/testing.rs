//! Shared fixtures for unit tests: an in-memory word-level tokenizer and a
//! fixed-distribution model backend.

use std::collections::HashMap;

use tokenizers::models::wordlevel::WordLevel;
use tokenizers::pre_tokenizers::whitespace::WhitespaceSplit;
use tokenizers::{AddedToken, Tokenizer};

use crate::error::Result;
use crate::model::CausalLmBackend;

/// Build a word-level tokenizer over `words` plus `<unk>` and
/// `<|endoftext|>` specials.
///
/// Ids follow the given word order, then `<unk>`, then `<|endoftext|>`.
/// Decoding joins tokens with single spaces, so word-level text
/// round-trips exactly through encode/decode.
pub fn word_level_tokenizer(words: &[&str]) -> Tokenizer {
    let mut vocab = HashMap::new();
    for (i, word) in words.iter().enumerate() {
        vocab.insert((*word).to_string(), i as u32);
    }
    vocab.insert("<unk>".to_string(), words.len() as u32);
    vocab.insert("<|endoftext|>".to_string(), words.len() as u32 + 1);

    let model = WordLevel::builder()
        .vocab(vocab)
        .unk_token("<unk>".to_string())
        .build()
        .expect("word-level vocab");

    let mut tokenizer = Tokenizer::new(model);
    tokenizer.with_pre_tokenizer(WhitespaceSplit);
    tokenizer.add_special_tokens(&[AddedToken::from("<|endoftext|>", true)]);
    tokenizer
}

/// Backend that returns the same next-token distribution for every input.
pub struct UnigramBackend {
    probs: Vec<f32>,
}

impl UnigramBackend {
    pub fn new(probs: Vec<f32>) -> Self {
        Self { probs }
    }
}

impl CausalLmBackend for UnigramBackend {
    fn vocab_size(&self) -> usize {
        self.probs.len()
    }

    fn next_token_probs(&self, _input_ids: &[u32]) -> Result<Vec<f32>> {
        Ok(self.probs.clone())
    }
}
