//! Letter rules for the word chain.
//!
//! Hungarian spells some single sounds with two letters. The six digraphs in
//! [`DIGRAPHS`] count as one unit when matching the end of one word against
//! the start of the next, so `kalács` must be followed by a word starting
//! with `cs`, not just `s`.

use std::borrow::Borrow;
use std::fmt;

/// Digraphs in matching order. The first match wins.
pub const DIGRAPHS: [&str; 6] = ["cs", "sz", "ny", "gy", "ty", "ly"];

/// Shortest word (in characters) that counts as a move.
pub const MIN_PLAYABLE_LEN: usize = 2;

const ACCENTED_LETTERS: [char; 9] = ['á', 'é', 'í', 'ó', 'ö', 'ő', 'ú', 'ü', 'ű'];

/// A normalized word: lowercase letters, optionally two runs joined by one hyphen.
///
/// The only way to build one is [`normalize`], so every `Word` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Word(String);

impl Word {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, which is also the word's score.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    #[must_use]
    pub fn is_playable(&self) -> bool {
        self.char_len() >= MIN_PLAYABLE_LEN
    }

    #[must_use]
    pub fn leading_unit(&self) -> &str {
        leading_unit(&self.0)
    }

    #[must_use]
    pub fn trailing_unit(&self) -> &str {
        trailing_unit(&self.0)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Word {
    fn borrow(&self) -> &str {
        &self.0
    }
}

fn is_letter(c: char) -> bool {
    c.is_ascii_lowercase() || ACCENTED_LETTERS.contains(&c)
}

/// Normalize free-form input into a [`Word`].
///
/// Trims and lowercases the input, skips anything before the first letter,
/// then keeps one run of letters, optionally followed by `-` and a second
/// run. Everything after that is dropped. Returns `None` if there is no
/// letter at all.
#[must_use]
pub fn normalize(raw: &str) -> Option<Word> {
    let lowered = raw.trim().to_lowercase();
    let mut chars = lowered.chars().skip_while(|c| !is_letter(*c)).peekable();

    let mut word = String::new();
    while let Some(c) = chars.next_if(|c| is_letter(*c)) {
        word.push(c);
    }
    if word.is_empty() {
        return None;
    }

    if chars.next_if_eq(&'-').is_some() {
        let second: String = chars.take_while(|c| is_letter(*c)).collect();
        if !second.is_empty() {
            word.push('-');
            word.push_str(&second);
        }
    }

    Some(Word(word))
}

/// First unit of `word`: a digraph if it starts with one, otherwise the first character.
///
/// Returns `""` for an empty string.
#[must_use]
pub fn leading_unit(word: &str) -> &str {
    if let Some(digraph) = DIGRAPHS.iter().find(|d| word.starts_with(**d)) {
        return &word[..digraph.len()];
    }
    word.chars().next().map_or("", |c| &word[..c.len_utf8()])
}

/// Last unit of `word`: a digraph if it ends with one, otherwise the last character.
///
/// Returns `""` for an empty string.
#[must_use]
pub fn trailing_unit(word: &str) -> &str {
    if let Some(digraph) = DIGRAPHS.iter().find(|d| word.ends_with(**d)) {
        return &word[word.len() - digraph.len()..];
    }
    word.char_indices().next_back().map_or("", |(i, _)| &word[i..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(raw: &str) -> Word {
        normalize(raw).expect("input should normalize")
    }

    #[test]
    fn test_normalize_lowercases_and_trims() {
        assert_eq!(word("  ALMA \n").as_str(), "alma");
        assert_eq!(word("ŐSZIBARACK").as_str(), "őszibarack");
        assert_eq!(word("Ütő").as_str(), "ütő");
    }

    #[test]
    fn test_normalize_strips_surrounding_junk() {
        assert_eq!(word("\"alma!\"").as_str(), "alma");
        assert_eq!(word("...kacsa, meg minden").as_str(), "kacsa");
        assert_eq!(word("12körte34").as_str(), "körte");
    }

    #[test]
    fn test_normalize_hyphenated_word() {
        assert_eq!(word("csiga-biga").as_str(), "csiga-biga");
        // Only one hyphen joins; the rest is dropped
        assert_eq!(word("ide-oda-vissza").as_str(), "ide-oda");
        // A dangling hyphen is not part of the word
        assert_eq!(word("ide-").as_str(), "ide");
        assert_eq!(word("ide-3").as_str(), "ide");
    }

    #[test]
    fn test_normalize_rejects_input_without_letters() {
        assert_eq!(normalize(""), None);
        assert_eq!(normalize("   "), None);
        assert_eq!(normalize("1234 !?"), None);
        assert_eq!(normalize("---"), None);
    }

    #[test]
    fn test_normalize_stops_at_foreign_letters() {
        // Letters outside the Hungarian alphabet end the run
        assert_eq!(word("façade").as_str(), "fa");
        assert_eq!(normalize("ß"), None);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["Alma", " kacsa! ", "csiga-biga", "ŐZ", "x", "12körte"] {
            let once = word(raw);
            let twice = word(once.as_str());
            assert_eq!(once, twice, "normalize not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_units_for_every_digraph() {
        for digraph in DIGRAPHS {
            let starts = format!("{digraph}aa");
            let ends = format!("aa{digraph}");
            assert_eq!(leading_unit(&starts), digraph);
            assert_eq!(trailing_unit(&ends), digraph);
        }
    }

    #[test]
    fn test_units_for_exact_digraph_word() {
        for digraph in DIGRAPHS {
            assert_eq!(leading_unit(digraph), digraph);
            assert_eq!(trailing_unit(digraph), digraph);
        }
    }

    #[test]
    fn test_units_for_single_character() {
        assert_eq!(leading_unit("a"), "a");
        assert_eq!(trailing_unit("a"), "a");
        assert_eq!(leading_unit("ő"), "ő");
        assert_eq!(trailing_unit("ő"), "ő");
        assert_eq!(leading_unit(""), "");
        assert_eq!(trailing_unit(""), "");
    }

    #[test]
    fn test_units_fall_back_to_single_character() {
        assert_eq!(leading_unit("alma"), "a");
        assert_eq!(trailing_unit("alma"), "a");
        assert_eq!(leading_unit("zsák"), "z");
        assert_eq!(trailing_unit("akác"), "c");
        assert_eq!(trailing_unit("kés"), "s");
        assert_eq!(leading_unit("ügy"), "ü");
        assert_eq!(trailing_unit("ügy"), "gy");
    }

    #[test]
    fn test_units_chain_link() {
        let prev = word("kalács");
        let next = word("csiga");
        assert_eq!(prev.trailing_unit(), next.leading_unit());
        assert_ne!(prev.trailing_unit(), word("sas").leading_unit());
    }

    #[test]
    fn test_word_len_and_playable() {
        assert_eq!(word("őz").char_len(), 2);
        assert!(word("őz").is_playable());
        assert!(!word("a").is_playable());
        assert_eq!(word("akác").char_len(), 4);
    }
}
