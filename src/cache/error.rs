/// Failure of a list fetch, classified for retry handling.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
  /// Rate limited or unreachable; a retry has been scheduled
  #[error("could not load {key}: {message} (retrying)")]
  Transient { key: String, message: String },
  /// Not worth retrying
  #[error("could not load {key}: {message}")]
  Fatal { key: String, message: String },
  /// Transient failures persisted past the retry budget
  #[error("could not load {key} after {attempts} attempts: {message}")]
  Exhausted {
    key: String,
    attempts: u32,
    message: String,
  },
}

impl FetchError {
  pub fn key(&self) -> &str {
    match self {
      FetchError::Transient { key, .. }
      | FetchError::Fatal { key, .. }
      | FetchError::Exhausted { key, .. } => key,
    }
  }

  /// True while an automatic retry is still pending.
  pub fn is_transient(&self) -> bool {
    matches!(self, FetchError::Transient { .. })
  }
}
