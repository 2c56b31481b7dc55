//! Wordlist management module
//!
//! A [`Wordlist`] is a lower-cased word set used both as the dictionary of
//! forbidden passwords and as the shared password history. It reports
//! itself `Closed` until words have been loaded.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

use crate::services::{ServiceStatus, WordlistService};

const WORDLIST_PATH_VAR: &str = "PWD_WORDLIST_PATH";
const DEFAULT_WORDLIST_PATH: &str = "./assets/wordlist.txt";

#[derive(Error, Debug)]
pub enum WordlistError {
    #[error("Wordlist file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read wordlist file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Wordlist file is empty")]
    EmptyFile,
    #[error("Wordlist lock poisoned, words not stored")]
    LockPoisoned,
}

/// Returns the wordlist file path.
///
/// Priority:
/// 1. Environment variable `PWD_WORDLIST_PATH`
/// 2. Default path `./assets/wordlist.txt`
pub fn wordlist_path() -> PathBuf {
    std::env::var(WORDLIST_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_WORDLIST_PATH))
}

/// In-memory word set, loadable from a file.
#[derive(Debug, Default)]
pub struct Wordlist {
    words: RwLock<Option<HashSet<String>>>,
}

impl Wordlist {
    /// An empty, closed wordlist.
    pub fn new() -> Self {
        Self::default()
    }

    /// An open wordlist holding `words`.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = words
            .into_iter()
            .map(|w| normalize(w.as_ref()))
            .filter(|w| !w.is_empty())
            .collect();
        Wordlist {
            words: RwLock::new(Some(set)),
        }
    }

    /// Loads the wordlist from the path named by `PWD_WORDLIST_PATH`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File does not exist
    /// - File cannot be read
    /// - File is empty
    /// - The word set lock is poisoned
    pub fn load(&self) -> Result<usize, WordlistError> {
        self.load_from_path(wordlist_path())
    }

    /// Loads the wordlist from a specific file, one word per line.
    ///
    /// Loading is idempotent: once words are present, later calls return the
    /// current size without touching the file.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let wordlist = pwd_policy::Wordlist::new();
    /// wordlist.load_from_path("/etc/myapp/wordlist.txt")?;
    /// ```
    pub fn load_from_path<P: AsRef<Path>>(&self, path: P) -> Result<usize, WordlistError> {
        if let Some(count) = self.word_count() {
            return Ok(count);
        }

        let path = path.as_ref();

        if !path.exists() {
            #[cfg(feature = "tracing")]
            tracing::error!("Wordlist initialization FAILED: FileNotFound {:?}", path);
            return Err(WordlistError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;

        if content.trim().is_empty() {
            #[cfg(feature = "tracing")]
            tracing::error!("Wordlist initialization FAILED: Empty file {:?}", path);
            return Err(WordlistError::EmptyFile);
        }

        let set: HashSet<String> = content
            .lines()
            .map(normalize)
            .filter(|l| !l.is_empty())
            .collect();

        let count = set.len();
        match self.words.write() {
            Ok(mut guard) => *guard = Some(set),
            Err(_) => {
                #[cfg(feature = "tracing")]
                tracing::error!("Wordlist initialization FAILED: lock poisoned {:?}", path);
                return Err(WordlistError::LockPoisoned);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::info!("Wordlist initialized: {} words from {:?}", count, path);

        Ok(count)
    }

    /// Number of loaded words, `None` until loaded.
    pub fn word_count(&self) -> Option<usize> {
        self.words
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(HashSet::len))
    }
}

impl WordlistService for Wordlist {
    fn status(&self) -> ServiceStatus {
        match self.word_count() {
            Some(_) => ServiceStatus::Open,
            None => ServiceStatus::Closed,
        }
    }

    /// Case-insensitive exact match; `false` while not loaded.
    fn contains_word(&self, word: &str) -> bool {
        self.words
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|set| set.contains(&normalize(word))))
            .unwrap_or(false)
    }
}

fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}
