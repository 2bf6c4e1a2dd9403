//! Bounded code-generation history, most recent first.

use serde::{Deserialize, Serialize};

use super::store::{KeyValueStore, StoreError, load_json, save_json};
use super::{new_id, now_ms};

pub const CODE_HISTORY_KEY: &str = "code-history";
pub const CODE_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeLanguage {
    Jsx,
    Python,
    Javascript,
    Java,
    Cpp,
    Sql,
    Html,
    Css,
    Text,
}

impl CodeLanguage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jsx => "jsx",
            Self::Python => "python",
            Self::Javascript => "javascript",
            Self::Java => "java",
            Self::Cpp => "cpp",
            Self::Sql => "sql",
            Self::Html => "html",
            Self::Css => "css",
            Self::Text => "text",
        }
    }
}

impl std::fmt::Display for CodeLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substring cues per language, checked top to bottom. Case-sensitive.
const LANGUAGE_CUES: &[(CodeLanguage, &[&str])] = &[
    (CodeLanguage::Jsx, &["import React", "jsx", "tsx"]),
    (CodeLanguage::Python, &["def ", "import ", "print("]),
    (CodeLanguage::Javascript, &["function ", "const ", "let "]),
    (CodeLanguage::Java, &["public class", "import java"]),
    (CodeLanguage::Cpp, &["#include", "int main"]),
    (CodeLanguage::Sql, &["SELECT", "CREATE TABLE"]),
    (CodeLanguage::Html, &["<!DOCTYPE", "<html"]),
    (CodeLanguage::Css, &["body {", ".class"]),
];

/// Label `code` by the first language whose cue it contains.
///
/// The table is a heuristic, not a parser: Java with `import java.util` is
/// labelled python because the python row is checked first.
#[must_use]
pub fn detect_language(code: &str) -> CodeLanguage {
    LANGUAGE_CUES
        .iter()
        .find(|(_, cues)| cues.iter().any(|cue| code.contains(cue)))
        .map_or(CodeLanguage::Text, |(lang, _)| *lang)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeGenerationRecord {
    pub id: String,
    pub prompt: String,
    pub code: String,
    pub language: CodeLanguage,
    pub created_at: i64,
}

impl CodeGenerationRecord {
    /// Build a record, labelling the language from `code`.
    #[must_use]
    pub fn new(prompt: impl Into<String>, code: impl Into<String>) -> Self {
        let code = code.into();
        let language = detect_language(&code);
        Self { id: new_id(), prompt: prompt.into(), code, language, created_at: now_ms() }
    }
}

#[derive(Debug)]
pub struct CodeHistory<S> {
    store: S,
    entries: Vec<CodeGenerationRecord>,
}

impl<S: KeyValueStore> CodeHistory<S> {
    /// Load the persisted history, keeping at most [`CODE_HISTORY_LIMIT`] entries.
    pub fn load(store: S) -> Self {
        let mut entries: Vec<CodeGenerationRecord> = load_json(&store, CODE_HISTORY_KEY).unwrap_or_default();
        entries.truncate(CODE_HISTORY_LIMIT);
        Self { store, entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[CodeGenerationRecord] {
        &self.entries
    }

    #[must_use]
    pub fn latest(&self) -> Option<&CodeGenerationRecord> {
        self.entries.first()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert at the front, evict past the limit, persist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the write fails.
    pub fn record(&mut self, record: CodeGenerationRecord) -> Result<(), StoreError> {
        self.entries.insert(0, record);
        self.entries.truncate(CODE_HISTORY_LIMIT);
        save_json(&self.store, CODE_HISTORY_KEY, &self.entries)
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] when the key cannot be removed.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        self.store.remove(CODE_HISTORY_KEY)
    }
}

#[cfg(test)]
#[path = "code_test.rs"]
mod tests;
