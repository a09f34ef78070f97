use crate::info_log;
use crate::rules::{Word, normalize};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

pub const WORDBANK_FILE_NAME: &str = "magyar-szavak.txt";
const DATA_DIR_NAME: &str = "szolanc";

#[derive(Debug, thiserror::Error)]
pub enum WordBankError {
    #[error("Nem található a fájl: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Hiba a fájl betöltése közben ({}): {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("A fájl üres vagy minden sor érvénytelen.")]
    Empty,
}

/// The dictionary: distinct playable words in file order.
#[derive(Debug, Clone)]
pub struct WordBank {
    words: Vec<Word>,
    index: HashSet<Word>,
}

impl WordBank {
    /// Builds a bank from already-normalized words, dropping duplicates and unplayable entries.
    pub fn from_words<I: IntoIterator<Item = Word>>(words: I) -> Result<Self, WordBankError> {
        let mut index = HashSet::new();
        let words: Vec<Word> = words
            .into_iter()
            .filter(Word::is_playable)
            .filter(|w| index.insert(w.clone()))
            .collect();
        if words.is_empty() {
            return Err(WordBankError::Empty);
        }
        Ok(Self { words, index })
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains(word)
    }

    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

pub fn load_wordbank_from_str(data: &str) -> Result<WordBank, WordBankError> {
    WordBank::from_words(data.lines().filter_map(normalize))
}

pub fn load_wordbank_from_file<P: AsRef<Path>>(path: P) -> Result<WordBank, WordBankError> {
    let path = path.as_ref();
    let read_error = |source| WordBankError::Read {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => WordBankError::NotFound(path.to_path_buf()),
        _ => read_error(e),
    })?;
    let reader = BufReader::new(file);
    let mut words = Vec::new();
    for line in reader.lines() {
        if let Some(word) = normalize(&line.map_err(read_error)?) {
            words.push(word);
        }
    }
    let bank = WordBank::from_words(words)?;
    info_log!("Loaded {} words from {}", bank.len(), path.display());
    Ok(bank)
}

/// Places to look for the dictionary when no path is given: next to the
/// executable first, then the per-user data directory.
#[must_use]
pub fn wordbank_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(exe) = std::env::current_exe()
        && let Some(dir) = exe.parent()
    {
        paths.push(dir.join(WORDBANK_FILE_NAME));
    }
    if let Some(data) = dirs::data_dir() {
        paths.push(data.join(DATA_DIR_NAME).join(WORDBANK_FILE_NAME));
    }
    paths
}

/// Resolves the dictionary path. An explicit path must exist; otherwise the
/// first existing entry of [`wordbank_search_paths`] wins.
pub fn locate_wordbank(explicit: Option<&Path>) -> Result<PathBuf, WordBankError> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(WordBankError::NotFound(path.to_path_buf()))
        };
    }
    let candidates = wordbank_search_paths();
    candidates
        .iter()
        .find(|p| p.is_file())
        .cloned()
        .ok_or_else(|| {
            WordBankError::NotFound(
                candidates
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| PathBuf::from(WORDBANK_FILE_NAME)),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_load_from_str_normalizes_and_dedupes() {
        let bank = load_wordbank_from_str("Alma\n  KACSA!\nalma\n\n123\nakác\n").unwrap();
        let words: Vec<&str> = bank.words().iter().map(Word::as_str).collect();
        assert_eq!(words, vec!["alma", "kacsa", "akác"]);
        assert!(bank.contains("kacsa"));
        assert!(!bank.contains("KACSA"));
    }

    #[test]
    fn test_load_from_str_drops_unplayable_words() {
        let bank = load_wordbank_from_str("a\nő\nőz\n").unwrap();
        assert_eq!(bank.len(), 1);
        assert!(bank.contains("őz"));
        assert!(!bank.contains("a"));
    }

    #[test]
    fn test_load_from_str_empty_is_error() {
        assert!(matches!(load_wordbank_from_str(""), Err(WordBankError::Empty)));
        assert!(matches!(
            load_wordbank_from_str("123\n!!\na\n"),
            Err(WordBankError::Empty)
        ));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("szolanc_wordbank_unit_test.txt");
        fs::write(&path, "Alma\r\nkörte\nszilva\n").unwrap();
        let bank = load_wordbank_from_file(&path).unwrap();
        assert_eq!(bank.len(), 3);
        assert!(bank.contains("körte"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_from_missing_file() {
        let path = std::env::temp_dir().join("szolanc_definitely_missing.txt");
        let _ = fs::remove_file(&path);
        match load_wordbank_from_file(&path) {
            Err(WordBankError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_load_from_invalid_utf8_file() {
        let path = std::env::temp_dir().join("szolanc_wordbank_bad_utf8.txt");
        fs::write(&path, [b'a', b'l', 0xFF, b'\n']).unwrap();
        assert!(matches!(
            load_wordbank_from_file(&path),
            Err(WordBankError::Read { .. })
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_locate_explicit_path() {
        let path = std::env::temp_dir().join("szolanc_locate_test.txt");
        fs::write(&path, "alma\n").unwrap();
        assert_eq!(locate_wordbank(Some(&path)).unwrap(), path);
        let _ = fs::remove_file(&path);
        assert!(matches!(
            locate_wordbank(Some(&path)),
            Err(WordBankError::NotFound(_))
        ));
    }

    #[test]
    fn test_search_paths_use_file_name() {
        for path in wordbank_search_paths() {
            assert!(path.ends_with(WORDBANK_FILE_NAME));
        }
    }
}
