//! Prefix completion over the static vocabulary.

use std::collections::BTreeSet;
use std::ops::Bound;

use crate::types::CompletionResult;

/// Sorted vocabulary of metric names and function names.
#[derive(Debug, Clone, Default)]
pub struct PrefixMatcher {
    vocabulary: BTreeSet<String>,
}

impl PrefixMatcher {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            vocabulary: words.into_iter().map(Into::into).collect(),
        }
    }

    /// Every entry starting with `prefix`, in sorted order.
    pub fn matches<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.vocabulary
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(move |word| word.starts_with(prefix))
            .map(String::as_str)
    }

    /// Complete the word ending at the end of `text`.
    ///
    /// The replace length is the byte length of that word, so the chosen
    /// candidate overwrites what was typed. An empty word matches everything.
    pub fn complete(&self, text: &str) -> CompletionResult {
        let token = trailing_word(text);
        CompletionResult {
            candidates: self.matches(token).map(str::to_string).collect(),
            replace_length: token.len(),
        }
    }
}

/// The run of identifier characters (`[a-zA-Z0-9_:]`) at the end of `text`.
pub fn trailing_word(text: &str) -> &str {
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, ch)| is_word_char(*ch))
        .last()
        .map_or(text.len(), |(idx, _)| idx);
    &text[start..]
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == ':'
}
