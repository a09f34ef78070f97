//! Turn validation against the running chain.

use crate::rules::{Word, leading_unit, normalize};
use crate::wordbank::WordBank;
use std::collections::HashSet;
use std::fmt;

pub type UsedWords = HashSet<Word>;

/// The chain so far: the last accepted word and every word played this game.
#[derive(Debug, Clone, Default)]
pub struct ChainState {
    last_word: Option<Word>,
    used_words: UsedWords,
}

impl ChainState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn last_word(&self) -> Option<&Word> {
        self.last_word.as_ref()
    }

    #[must_use]
    pub fn used_words(&self) -> &UsedWords {
        &self.used_words
    }

    /// The unit the next word has to start with, if any word has been played.
    #[must_use]
    pub fn required_lead(&self) -> Option<&str> {
        self.last_word.as_ref().map(Word::trailing_unit)
    }

    /// Records an accepted word as the new end of the chain.
    pub fn record(&mut self, word: Word) {
        self.used_words.insert(word.clone());
        self.last_word = Some(word);
    }

    pub fn clear(&mut self) {
        self.last_word = None;
        self.used_words.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    UnknownWord,
    BrokenChain { expected: String, found: String },
    AlreadyUsed,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownWord => f.write_str("nincs a szótárban"),
            Self::BrokenChain { expected, found } => {
                write!(f, "'{expected}' betűvel kell kezdődnie, nem '{found}'")
            }
            Self::AlreadyUsed => f.write_str("már elhangzott"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Unparseable or too short. Not an error, the player simply tries again.
    NonEvent,
    Accepted(Word),
    Rejected { word: Word, reasons: Vec<Rejection> },
}

/// Checks raw input against the chain and the dictionary.
///
/// Every failing condition is listed in the rejection. The chain itself is
/// not touched; the caller records accepted words.
#[must_use]
pub fn validate(raw: &str, state: &ChainState, bank: &WordBank) -> Verdict {
    let Some(word) = normalize(raw).filter(Word::is_playable) else {
        return Verdict::NonEvent;
    };

    let mut reasons = Vec::new();
    if !bank.contains(word.as_str()) {
        reasons.push(Rejection::UnknownWord);
    }
    if let Some(expected) = state.required_lead() {
        let found = leading_unit(word.as_str());
        if found != expected {
            reasons.push(Rejection::BrokenChain {
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
    }
    if state.used_words.contains(&word) {
        reasons.push(Rejection::AlreadyUsed);
    }

    if reasons.is_empty() {
        Verdict::Accepted(word)
    } else {
        Verdict::Rejected { word, reasons }
    }
}
