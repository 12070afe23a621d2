//! Offline provider: garbles text locally without calling a model.

use async_trait::async_trait;
use opentelemetry::Context;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::transform::{TransformError, Transformer};

/// Mishears text by swapping two adjacent words or dropping a letter.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScrambleTransformer;

impl ScrambleTransformer {
    /// Apply one random mutation using `rng`.
    pub fn mutate<R: Rng>(text: &str, rng: &mut R) -> String {
        let mut words: Vec<&str> = text.split_whitespace().collect();
        if words.len() >= 2 && rng.gen_bool(0.5) {
            let i = rng.gen_range(0..words.len() - 1);
            words.swap(i, i + 1);
            return words.join(" ");
        }

        // Drop one alphabetic character, keeping at least one behind.
        let letters: Vec<usize> = text
            .char_indices()
            .filter(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| i)
            .collect();
        if letters.len() < 2 {
            return text.to_string();
        }
        match letters.choose(rng) {
            Some(&at) => {
                let mut out = text.to_string();
                out.remove(at);
                out
            }
            None => text.to_string(),
        }
    }
}

#[async_trait]
impl Transformer for ScrambleTransformer {
    async fn transform(&self, _cx: &Context, text: &str) -> Result<String, TransformError> {
        Ok(Self::mutate(text, &mut rand::thread_rng()))
    }
}
