//! Best-score persistence
//!
//! A single non-negative integer under a fixed key. Read once at startup,
//! written only when a finished run improves on it.

/// Storage key for the best score
pub const STORAGE_KEY: &str = "frogger-high-score";

/// Failures reported by a [`ScoreStore`]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No storage backend available (private browsing, no window, ...)
    #[error("score storage unavailable: {0}")]
    Unavailable(String),

    /// Stored value could not be parsed as a score
    #[error("stored score '{raw}' is not a non-negative integer")]
    Corrupt { raw: String },

    /// Backend rejected the write
    #[error("failed to write score: {0}")]
    Write(String),
}

/// Persistence collaborator for the best score
pub trait ScoreStore {
    /// Stored best score (0 if nothing stored yet)
    fn load(&self) -> Result<u64, StorageError>;

    /// Replace the stored best score
    fn save(&mut self, score: u64) -> Result<(), StorageError>;
}

/// Parse a stored value. Accepts JSON numbers and plain integer strings.
pub fn parse_score(raw: &str) -> Result<u64, StorageError> {
    let trimmed = raw.trim();
    serde_json::from_str::<u64>(trimmed)
        .ok()
        .or_else(|| trimmed.parse::<u64>().ok())
        .ok_or_else(|| StorageError::Corrupt {
            raw: raw.to_string(),
        })
}

/// Encode a score for storage
pub fn encode_score(score: u64) -> String {
    // u64 always serializes
    serde_json::to_string(&score).unwrap_or_else(|_| score.to_string())
}

/// In-memory store (native builds and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a raw value
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            value: Some(raw.into()),
        }
    }

    pub fn raw(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<u64, StorageError> {
        match &self.value {
            Some(raw) => parse_score(raw),
            None => Ok(0),
        }
    }

    fn save(&mut self, score: u64) -> Result<(), StorageError> {
        self.value = Some(encode_score(score));
        Ok(())
    }
}

/// Browser LocalStorage store (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StorageError::Unavailable("no LocalStorage".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl ScoreStore for LocalStorageStore {
    fn load(&self) -> Result<u64, StorageError> {
        let storage = Self::storage()?;
        match storage.get_item(STORAGE_KEY) {
            Ok(Some(raw)) => {
                let score = parse_score(&raw)?;
                log::info!("Loaded best score {}", score);
                Ok(score)
            }
            Ok(None) => {
                log::info!("No best score found, starting fresh");
                Ok(0)
            }
            Err(e) => Err(StorageError::Unavailable(format!("{:?}", e))),
        }
    }

    fn save(&mut self, score: u64) -> Result<(), StorageError> {
        let storage = Self::storage()?;
        storage
            .set_item(STORAGE_KEY, &encode_score(score))
            .map_err(|e| StorageError::Write(format!("{:?}", e)))?;
        log::info!("Best score saved ({})", score);
        Ok(())
    }
}
