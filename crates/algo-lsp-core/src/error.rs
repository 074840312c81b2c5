//! Configuration errors for the Algo analysis core.
//!
//! The analysis entry points themselves never fail: a line that cannot be
//! classified degrades to plain tokens, and "no fold" / "no completion" are
//! ordinary results. The only fallible step is loading a vocabulary override.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("cannot read vocabulary file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid vocabulary JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("vocabulary table '{table}' contains an empty or blank entry")]
    EmptyEntry { table: &'static str },

    #[error("snippet '{label}' has an empty trigger word")]
    EmptySnippetTrigger { label: String },
}
