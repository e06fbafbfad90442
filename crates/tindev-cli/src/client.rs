//! Async HTTP client for the tindev developer service.

use std::time::Duration;

use anyhow::Context as _;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tindev_core::{
  Error, Result,
  api::DevApi,
  dev::{Candidate, DevId, Reaction, RegisterRequest, Registered},
};
use tracing::debug;

/// Header that scopes a request to the logged-in developer.
const USER_HEADER: &str = "user";

/// Connection settings for the developer service.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
  pub base_url:          String,
  pub timeout:           Duration,
  /// Send dislikes to `/devs/:id/dislikes` instead of acknowledging them as
  /// likes.
  pub distinct_dislikes: bool,
}

/// Async HTTP client for the developer service's JSON API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> anyhow::Result<Self> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn reaction_path(&self, target: &DevId, reaction: Reaction) -> String {
    match reaction {
      Reaction::Dislike if self.config.distinct_dislikes => format!("/devs/{target}/dislikes"),
      Reaction::Like | Reaction::Dislike => format!("/devs/{target}/likes"),
    }
  }
}

/// Send `req` and map transport failures and error statuses onto the core
/// error taxonomy.
async fn send(req: RequestBuilder, what: &str) -> Result<Response> {
  let resp = req
    .send()
    .await
    .map_err(|e| Error::Network(format!("{what} failed: {e}")))?;

  let status = resp.status();
  debug!(%status, "{what}");
  if status == StatusCode::NOT_FOUND {
    return Err(Error::NotFound(format!("{what} → {status}")));
  }
  if !status.is_success() {
    return Err(Error::Network(format!("{what} → {status}")));
  }
  Ok(resp)
}

async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
  resp
    .json()
    .await
    .map_err(|e| Error::Protocol(format!("decoding {what}: {e}")))
}

impl DevApi for ApiClient {
  /// `POST /devs`
  async fn register(&self, username: &str) -> Result<DevId> {
    let body = RegisterRequest { username: username.to_owned() };
    let resp = send(self.client.post(self.url("/devs")).json(&body), "POST /devs").await?;
    let registered: Registered = decode(resp, "registration").await?;
    Ok(registered.id)
  }

  /// `GET /devs` scoped by the `user` header.
  async fn list_candidates(&self, user: &DevId) -> Result<Vec<Candidate>> {
    let req = self
      .client
      .get(self.url("/devs"))
      .header(USER_HEADER, user.as_str());
    let resp = send(req, "GET /devs").await?;
    decode(resp, "candidates").await
  }

  /// `POST /devs/:id/likes` (or `/dislikes`) scoped by the `user` header.
  /// The response body is ignored.
  async fn react(&self, user: &DevId, target: &DevId, reaction: Reaction) -> Result<()> {
    let path = self.reaction_path(target, reaction);
    let req = self
      .client
      .post(self.url(&path))
      .header(USER_HEADER, user.as_str());
    send(req, &format!("POST {path}")).await?;
    Ok(())
  }
}
