use thiserror::Error;

/// Unified error type for the entire finpanel-core library.
///
/// Transaction validation deliberately does NOT go through this type:
/// `add_transaction` returns a field-keyed `ValidationErrors` map so the
/// form layer can surface messages inline. `CoreError` covers storage,
/// serialization, and feed failures.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage ─────────────────────────────────────────────────────
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Feed / Refresh ──────────────────────────────────────────────
    #[error("Feed error ({group}): {message}")]
    Feed { group: String, message: String },
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}
