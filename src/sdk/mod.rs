//! Backend SDK contract consumed by the cache coordinator and bulk executor.
//!
//! Each entity type is served by one [`EntitySdk`]. The engine never knows
//! how records are stored; it only lists, creates, updates and deletes them.

mod memory;
mod rest;

use async_trait::async_trait;
use serde_json::Value;

use crate::entity::{Entity, EntityId};

pub use memory::MemorySdk;
pub use rest::RestSdk;

/// HTTP status signalling rate limiting.
pub const TOO_MANY_REQUESTS: u16 = 429;

/// Errors raised by an SDK call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SdkError {
  /// The backend answered with a non-success status
  #[error("request failed with status {status}: {message}")]
  Status { status: u16, message: String },
  /// The request never reached the backend or the connection dropped
  #[error("network error: {0}")]
  Network(String),
  /// The response body could not be decoded
  #[error("invalid response: {0}")]
  Decode(String),
  /// Anything else reported by the SDK
  #[error("{0}")]
  Other(String),
}

/// Message fragments that identify connectivity failures reported as plain text.
const NETWORK_HINTS: &[&str] = &[
  "network",
  "failed to fetch",
  "connection",
  "timed out",
  "timeout",
  "unreachable",
  "econnreset",
  "econnrefused",
];

impl SdkError {
  pub fn status(&self) -> Option<u16> {
    match self {
      SdkError::Status { status, .. } => Some(*status),
      _ => None,
    }
  }

  /// Rate limits and connectivity failures are worth retrying; the rest is not.
  pub fn is_transient(&self) -> bool {
    match self {
      SdkError::Status { status, .. } => *status == TOO_MANY_REQUESTS,
      SdkError::Network(_) => true,
      SdkError::Decode(_) => false,
      SdkError::Other(message) => {
        let lower = message.to_lowercase();
        NETWORK_HINTS.iter().any(|hint| lower.contains(hint))
      }
    }
  }
}

/// CRUD contract for one entity type.
#[async_trait]
pub trait EntitySdk: Send + Sync {
  /// List every record, optionally asking the backend for an order.
  async fn list(&self, sort_hint: Option<&str>) -> Result<Vec<Entity>, SdkError>;

  /// Create a record from a JSON payload
  async fn create(&self, payload: Value) -> Result<Entity, SdkError>;

  /// Update an existing record
  async fn update(&self, id: &EntityId, payload: Value) -> Result<Entity, SdkError>;

  /// Delete a record
  async fn delete(&self, id: &EntityId) -> Result<(), SdkError>;
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_rate_limit_is_transient() {
    let err = SdkError::Status {
      status: 429,
      message: "slow down".to_string(),
    };
    assert!(err.is_transient());
    assert_eq!(err.status(), Some(429));
  }

  #[test]
  fn test_other_statuses_are_fatal() {
    for status in [400, 401, 404, 500, 503] {
      let err = SdkError::Status {
        status,
        message: String::new(),
      };
      assert!(!err.is_transient(), "status {} should be fatal", status);
    }
  }

  #[test]
  fn test_network_text_heuristics() {
    assert!(SdkError::Network("dns".to_string()).is_transient());
    assert!(SdkError::Other("Network Error".to_string()).is_transient());
    assert!(SdkError::Other("TypeError: Failed to fetch".to_string()).is_transient());
    assert!(SdkError::Other("request timed out".to_string()).is_transient());
    assert!(!SdkError::Other("permission denied".to_string()).is_transient());
    assert!(!SdkError::Decode("expected array".to_string()).is_transient());
  }
}
