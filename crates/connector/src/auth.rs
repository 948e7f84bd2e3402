use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    tokio::sync::Mutex,
    tracing::{debug, warn},
};

use crate::error::{Error, Result};

/// Default OAuth tenant segment for Bot Framework token issuance.
pub const DEFAULT_OAUTH_TENANT: &str = "botframework.com";

/// Default OAuth scope for the Connector API.
pub const DEFAULT_OAUTH_SCOPE: &str = "https://api.botframework.com/.default";

/// Bot registration credentials (Microsoft App ID + password).
#[derive(Clone)]
pub struct AppCredentials {
    pub app_id: String,
    pub app_password: Secret<String>,
}

impl AppCredentials {
    #[must_use]
    pub fn new(app_id: impl Into<String>, app_password: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            app_password: Secret::new(app_password.into()),
        }
    }
}

impl std::fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .field("app_password", &"[REDACTED]")
            .finish()
    }
}

/// A cached bearer token, replaced wholesale on refresh and never used past
/// `expires_at`.
struct Token {
    access_token: Secret<String>,
    expires_at: u64,
}

impl Token {
    fn is_valid(&self, now: u64) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<u64>,
}

/// Obtains and caches the OAuth client-credentials token for outbound
/// Connector calls.
///
/// Without credentials the manager is in emulator mode: callers check
/// [`emulator_mode`](Self::emulator_mode) and skip the Authorization header
/// entirely. The cache sits behind a `tokio::sync::Mutex` held across the
/// refresh request, so concurrent callers share a single in-flight refresh.
pub struct TokenManager {
    client: reqwest::Client,
    credentials: Option<AppCredentials>,
    token_url: String,
    scope: String,
    cache: Mutex<Option<Token>>,
}

impl TokenManager {
    #[must_use]
    pub fn new(credentials: Option<AppCredentials>) -> Self {
        Self {
            client: reqwest::Client::new(),
            credentials,
            token_url: token_url_for_tenant(DEFAULT_OAUTH_TENANT),
            scope: DEFAULT_OAUTH_SCOPE.to_string(),
            cache: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn with_tenant(mut self, tenant: &str) -> Self {
        self.token_url = token_url_for_tenant(tenant);
        self
    }

    /// Override the full token endpoint (tests, sovereign clouds).
    #[must_use]
    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// True when no credentials are configured and outbound calls must not
    /// carry an Authorization header.
    #[must_use]
    pub fn emulator_mode(&self) -> bool {
        self.credentials.is_none()
    }

    /// Return a valid bearer token, refreshing it if the cached one has
    /// expired. Fails with [`Error::Auth`] when the identity provider
    /// rejects the credentials or the network call fails.
    pub async fn ensure_token(&self) -> Result<String> {
        let mut cache = self.cache.lock().await;
        if let Some(token) = cache.as_ref()
            && token.is_valid(unix_now())
        {
            return Ok(token.access_token.expose_secret().clone());
        }

        let Some(credentials) = self.credentials.as_ref() else {
            return Err(Error::Auth {
                status: None,
                detail: "no app credentials configured (emulator mode)".into(),
            });
        };

        debug!(token_url = %self.token_url, "refreshing bearer token");
        let form = [
            ("grant_type", "client_credentials"),
            ("scope", self.scope.as_str()),
            ("client_id", credentials.app_id.as_str()),
            ("client_secret", credentials.app_password.expose_secret()),
        ];
        let resp = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(Error::auth_transport)?;

        let status = resp.status();
        if status.as_u16() >= 400 {
            let body = resp.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body, "token request rejected");
            return Err(Error::auth_rejected(status, body));
        }

        let body: TokenResponse = resp.json().await.map_err(Error::auth_transport)?;
        let expires_in = body.expires_in.unwrap_or(3600);
        let token = Token {
            access_token: Secret::new(body.access_token),
            expires_at: unix_now() + expires_in,
        };
        let access = token.access_token.expose_secret().clone();
        *cache = Some(token);
        Ok(access)
    }
}

fn token_url_for_tenant(tenant: &str) -> String {
    format!("https://login.microsoftonline.com/{tenant}/oauth2/v2.0/token")
}

fn unix_now() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
