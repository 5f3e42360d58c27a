//! Highlight word matching.
//!
//! Every word is wrapped as `(\W|\b)<word>(\W|\b)` and matched without regard
//! to case. This is looser than a plain `\b<word>\b`: the word may also sit
//! directly against punctuation on either side.

use regex::{Regex, RegexBuilder};
use tracing::{debug, warn};

/// Build the matcher for one word.
///
/// With `literal` unset the word is used as a regex fragment, so `foo.bar`
/// also matches `fooXbar`.
pub fn compile_word(word: &str, literal: bool) -> Result<Regex, regex::Error> {
    let fragment = if literal {
        regex::escape(word)
    } else {
        word.to_string()
    };
    RegexBuilder::new(&format!(r"(\W|\b){}(\W|\b)", fragment))
        .case_insensitive(true)
        .build()
}

/// Compiled form of the `highlights` option.
#[derive(Debug, Clone, Default)]
pub struct Highlights {
    matchers: Vec<Regex>,
}

impl Highlights {
    /// Compile a space-separated word list. Words that do not form a valid
    /// pattern are dropped with a warning so one typo does not disable the
    /// rest.
    pub fn compile(words: &str, literal: bool) -> Self {
        let matchers = words
            .split_whitespace()
            .filter_map(|word| match compile_word(word, literal) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!(word, error = %e, "skipping invalid highlight");
                    None
                }
            })
            .collect::<Vec<_>>();
        debug!(count = matchers.len(), "compiled highlights");
        Self { matchers }
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

/// True if `message` matches any highlight or the nickname matcher.
pub fn match_any(message: &str, highlights: &Highlights, identity: Option<&Regex>) -> bool {
    highlights
        .matchers
        .iter()
        .chain(identity)
        .any(|re| re.is_match(message))
}
