use std::future::Future;

use derive_more::Debug;
use serde::{Deserialize, Serialize};

use crate::{
    endpoint::Endpoint,
    provider::{DataProvider, ProviderError},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCredentials {
    pub email: String,
    #[debug(skip)]
    pub password: String,
}

/// Opaque bearer token handed out by the login endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[debug("AuthToken(••••••••)")]
#[serde(transparent)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

#[derive(Serialize, Deserialize)]
pub struct LoginRes {
    pub data: LoginData,
}

#[derive(Serialize, Deserialize)]
pub struct LoginData {
    pub token: AuthToken,
}

/// The login call the view-model depends on.
pub trait AuthApi: Send + Sync {
    fn login(
        &self,
        credentials: &UserCredentials,
    ) -> impl Future<Output = Result<AuthToken, ProviderError>> + Send;
}

pub struct ApiClient {
    base_url: String,
    provider: DataProvider,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, provider: DataProvider) -> Self {
        Self {
            base_url: base_url.into(),
            provider,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn provider(&self) -> &DataProvider {
        &self.provider
    }

    /// Build an endpoint for a path relative to the API base URL.
    pub fn endpoint(&self, path: &str) -> Endpoint {
        Endpoint::get(format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }
}

impl AuthApi for ApiClient {
    async fn login(&self, credentials: &UserCredentials) -> Result<AuthToken, ProviderError> {
        tracing::info!("Authenticating {}...", credentials.email);
        let LoginRes { data } = self
            .provider
            .load(&Endpoint::login(&self.base_url), Some(credentials))
            .await?;
        tracing::debug!("Token acquired");
        Ok(data.token)
    }
}
