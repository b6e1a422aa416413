//! Typed HTTP access driven by [`Endpoint`] descriptors.
//!
//! Every call goes through a [`RequestAdapter`] before it is sent, which is
//! where the stored access token gets attached.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    endpoint::{Endpoint, Method},
    store::{ACCESS_TOKEN_KEY, KeyValueStore, StoreError},
};

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("decode: {0}")]
    Decoding(#[from] serde_json::Error),

    #[error("a body cannot be sent with {0} {1}")]
    BodyNotAllowed(Method, String),

    #[error("invalid header {0}")]
    InvalidHeader(String),

    #[error("reading access token: {0}")]
    Store(#[from] StoreError),
}

/// Hook that may rewrite the headers of every outgoing request.
pub trait RequestAdapter: Send + Sync {
    fn adapt(&self, headers: &mut HeaderMap) -> Result<(), ProviderError>;
}

/// Attaches `Authorization: Bearer <token>` when a token has been stored.
pub struct TokenAdapter<S> {
    store: Arc<S>,
}

impl<S: KeyValueStore> TokenAdapter<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

impl<S: KeyValueStore> RequestAdapter for TokenAdapter<S> {
    fn adapt(&self, headers: &mut HeaderMap) -> Result<(), ProviderError> {
        let Some(token) = self.store.get(ACCESS_TOKEN_KEY)? else {
            tracing::debug!("No access token stored, sending request without Authorization");
            return Ok(());
        };
        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ProviderError::InvalidHeader(AUTHORIZATION.to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}

#[derive(Clone)]
pub struct DataProvider {
    http: reqwest::Client,
    adapter: Option<Arc<dyn RequestAdapter>>,
}

impl DataProvider {
    pub fn new(adapter: Arc<dyn RequestAdapter>) -> Self {
        Self {
            http: reqwest::Client::new(),
            adapter: Some(adapter),
        }
    }

    /// A provider that never touches the Authorization header.
    pub fn unauthenticated() -> Self {
        Self {
            http: reqwest::Client::new(),
            adapter: None,
        }
    }

    /// Issue one request for `endpoint` and decode the response body as `T`.
    ///
    /// The body, if any, is sent as JSON; GET endpoints must not carry one.
    /// Non-success statuses surface as [`ProviderError::Transport`].
    pub async fn load<T, B>(
        &self,
        endpoint: &Endpoint,
        body: Option<&B>,
    ) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        if body.is_some() && endpoint.method() == Method::Get {
            return Err(ProviderError::BodyNotAllowed(
                endpoint.method(),
                endpoint.url().to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        for (name, value) in endpoint.headers() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ProviderError::InvalidHeader(name.clone()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| ProviderError::InvalidHeader(name.to_string()))?;
            headers.insert(name, value);
        }
        if let Some(adapter) = &self.adapter {
            adapter.adapt(&mut headers)?;
        }

        let mut request = self
            .http
            .request(endpoint.method().into(), endpoint.url())
            .headers(headers);
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!("{} {}", endpoint.method(), endpoint.url());
        let bytes = request
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
