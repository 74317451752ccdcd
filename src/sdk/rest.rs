//! REST-backed SDK for one entity endpoint.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{EntitySdk, SdkError};
use crate::entity::{Entity, EntityId};

/// SDK talking to `{base_url}/{endpoint}` with JSON bodies.
#[derive(Clone)]
pub struct RestSdk {
  client: reqwest::Client,
  collection: Url,
  token: Option<String>,
}

impl RestSdk {
  /// Create an SDK for `endpoint` relative to `base_url`.
  pub fn new(
    client: reqwest::Client,
    base_url: &str,
    endpoint: &str,
    token: Option<String>,
  ) -> Result<Self, SdkError> {
    // A trailing slash keeps `join` from replacing the last path segment.
    let base = if base_url.ends_with('/') {
      base_url.to_string()
    } else {
      format!("{}/", base_url)
    };
    let base = Url::parse(&base).map_err(|e| SdkError::Other(format!("invalid base url: {}", e)))?;
    let collection = base
      .join(endpoint.trim_matches('/'))
      .map_err(|e| SdkError::Other(format!("invalid endpoint {}: {}", endpoint, e)))?;

    Ok(Self {
      client,
      collection,
      token,
    })
  }

  fn item_url(&self, id: &EntityId) -> Url {
    let mut url = self.collection.clone();
    if let Ok(mut segments) = url.path_segments_mut() {
      segments.pop_if_empty().push(id.as_str());
    }
    url
  }

  fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
    match &self.token {
      Some(token) => request.bearer_auth(token),
      None => request,
    }
  }

  async fn send(&self, request: RequestBuilder) -> Result<Response, SdkError> {
    let response = self
      .authorize(request)
      .send()
      .await
      .map_err(map_transport_error)?;

    let status = response.status();
    if status.is_success() {
      return Ok(response);
    }

    let message = response
      .text()
      .await
      .unwrap_or_default()
      .chars()
      .take(200)
      .collect::<String>();
    Err(SdkError::Status {
      status: status.as_u16(),
      message: if message.is_empty() {
        status.canonical_reason().unwrap_or("error").to_string()
      } else {
        message
      },
    })
  }

  async fn read_entity(response: Response) -> Result<Entity, SdkError> {
    let value: Value = response
      .json()
      .await
      .map_err(|e| SdkError::Decode(e.to_string()))?;
    Entity::from_value(value).ok_or_else(|| SdkError::Decode("expected a JSON object".to_string()))
  }
}

fn map_transport_error(e: reqwest::Error) -> SdkError {
  if e.is_connect() || e.is_timeout() || e.is_request() {
    SdkError::Network(e.to_string())
  } else if let Some(status) = e.status() {
    SdkError::Status {
      status: status.as_u16(),
      message: e.to_string(),
    }
  } else {
    SdkError::Other(e.to_string())
  }
}

/// Accept either a bare array or an envelope such as `{"items": [...]}`.
fn unwrap_list(value: Value) -> Result<Vec<Entity>, SdkError> {
  let items = match value {
    Value::Array(items) => items,
    Value::Object(mut map) => match ["items", "data", "results"]
      .iter()
      .find_map(|k| map.remove(*k))
    {
      Some(Value::Array(items)) => items,
      _ => return Err(SdkError::Decode("expected a JSON array".to_string())),
    },
    _ => return Err(SdkError::Decode("expected a JSON array".to_string())),
  };

  Ok(items.into_iter().filter_map(Entity::from_value).collect())
}

#[async_trait]
impl EntitySdk for RestSdk {
  async fn list(&self, sort_hint: Option<&str>) -> Result<Vec<Entity>, SdkError> {
    let mut request = self.client.get(self.collection.clone());
    if let Some(sort) = sort_hint {
      request = request.query(&[("sort", sort)]);
    }
    debug!(url = %self.collection, "listing entities");

    let response = self.send(request).await?;
    let value: Value = response
      .json()
      .await
      .map_err(|e| SdkError::Decode(e.to_string()))?;
    unwrap_list(value)
  }

  async fn create(&self, payload: Value) -> Result<Entity, SdkError> {
    let request = self.client.post(self.collection.clone()).json(&payload);
    let response = self.send(request).await?;
    Self::read_entity(response).await
  }

  async fn update(&self, id: &EntityId, payload: Value) -> Result<Entity, SdkError> {
    let request = self.client.put(self.item_url(id)).json(&payload);
    let response = self.send(request).await?;
    Self::read_entity(response).await
  }

  async fn delete(&self, id: &EntityId) -> Result<(), SdkError> {
    let request = self.client.delete(self.item_url(id));
    self.send(request).await?;
    Ok(())
  }
}
