use parking_lot::RwLock;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::error::{ReasonError, Result};
use crate::metrics::{CACHED_LANGUAGES, REASON_LOADS, REASON_LOAD_ERRORS};

/// Where the raw reason lists come from.
///
/// `load` returns the undecoded bytes of a JSON array of strings for one
/// language. Decoding and validation happen in the store.
pub trait ReasonSource: Send + Sync {
    fn languages(&self) -> Vec<String>;
    fn load(&self, lang: &str) -> Result<Vec<u8>>;
}

// Reads `<dir>/reasons.<lang>.json`
pub struct FsReasonSource {
    dir: PathBuf,
}

impl FsReasonSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn file_path(&self, lang: &str) -> PathBuf {
        self.dir.join(format!("reasons.{lang}.json"))
    }
}

impl ReasonSource for FsReasonSource {
    fn languages(&self) -> Vec<String> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "Could not scan data directory");
                return Vec::new();
            }
        };

        let mut languages: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| {
                let name = entry.file_name();
                language_from_file_name(name.to_str()?).map(str::to_string)
            })
            .collect();
        languages.sort();
        languages
    }

    fn load(&self, lang: &str) -> Result<Vec<u8>> {
        // keeps the code from walking out of the data directory
        if !is_language_code(lang) {
            return Err(ReasonError::NotFound(lang.to_string()));
        }

        fs::read(self.file_path(lang)).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ReasonError::NotFound(lang.to_string()),
            _ => ReasonError::Io {
                lang: lang.to_string(),
                source: e,
            },
        })
    }
}

// "reasons.de.json" -> "de"
fn language_from_file_name(name: &str) -> Option<&str> {
    let parts: Vec<&str> = name.split('.').collect();
    match parts.as_slice() {
        ["reasons", lang, "json"] if is_language_code(lang) => Some(lang),
        _ => None,
    }
}

fn is_language_code(lang: &str) -> bool {
    !lang.is_empty()
        && lang
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn parse_reasons(lang: &str, bytes: &[u8]) -> Result<Vec<String>> {
    let malformed = |detail: String| ReasonError::Malformed {
        lang: lang.to_string(),
        detail,
    };

    let reasons: Vec<String> =
        serde_json::from_slice(bytes).map_err(|e| malformed(e.to_string()))?;

    if reasons.is_empty() {
        return Err(malformed("list is empty".to_string()));
    }
    if let Some(idx) = reasons.iter().position(|r| r.trim().is_empty()) {
        return Err(malformed(format!("entry {idx} is blank")));
    }

    Ok(reasons)
}

/// Per-language reason lists, loaded on first use and kept for the
/// lifetime of the process.
///
/// The set of supported languages is taken from the source once, at
/// construction. A failed load leaves the cache untouched so the next
/// request tries again.
pub struct ReasonStore {
    source: Box<dyn ReasonSource>,
    languages: Vec<String>,
    cache: RwLock<HashMap<String, Arc<[String]>>>,
}

impl ReasonStore {
    pub fn new(source: impl ReasonSource + 'static) -> Self {
        let languages = source.languages();
        Self {
            source: Box::new(source),
            languages,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn is_supported(&self, lang: &str) -> bool {
        self.languages.iter().any(|l| l == lang)
    }

    // Number of languages currently held in memory
    pub fn cached_languages(&self) -> usize {
        self.cache.read().len()
    }

    /// Returns the full reason list for `lang`, loading it on first access.
    pub fn reasons(&self, lang: &str) -> Result<Arc<[String]>> {
        if let Some(reasons) = self.cache.read().get(lang) {
            return Ok(Arc::clone(reasons));
        }

        if !self.is_supported(lang) {
            return Err(ReasonError::NotFound(lang.to_string()));
        }

        // Load under the write lock so each language is read at most once.
        let mut cache = self.cache.write();
        if let Some(reasons) = cache.get(lang) {
            return Ok(Arc::clone(reasons));
        }

        let loaded = self
            .source
            .load(lang)
            .and_then(|bytes| parse_reasons(lang, &bytes));

        let reasons: Arc<[String]> = match loaded {
            Ok(reasons) => reasons.into(),
            Err(e) => {
                REASON_LOAD_ERRORS.inc();
                error!(lang, error = %e, "Failed to load reasons");
                return Err(e);
            }
        };

        cache.insert(lang.to_string(), Arc::clone(&reasons));
        REASON_LOADS.inc();
        CACHED_LANGUAGES.set(cache.len() as f64);
        info!(lang, count = reasons.len(), "Loaded reasons");

        Ok(reasons)
    }

    /// Picks one reason for `lang` uniformly at random.
    pub fn get_reason(&self, lang: &str) -> Result<String> {
        let reasons = self.reasons(lang)?;
        reasons
            .choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| ReasonError::Malformed {
                lang: lang.to_string(),
                detail: "list is empty".to_string(),
            })
    }
}
