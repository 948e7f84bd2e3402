use std::collections::HashMap;

use {
    secrecy::{ExposeSecret, Secret},
    serde::{Deserialize, Serialize},
};

/// Bot registration identity.
///
/// When either field is absent the bridge runs in emulator mode: no token
/// is ever requested and outbound calls carry no Authorization header.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Microsoft App ID (bot registration client ID).
    pub app_id: Option<String>,

    /// Microsoft App Password (client secret).
    #[serde(serialize_with = "serialize_option_secret")]
    pub app_password: Option<Secret<String>>,

    /// OAuth tenant segment for token issuance.
    pub oauth_tenant: String,

    /// OAuth scope for the Connector API.
    pub oauth_scope: String,
}

impl IdentityConfig {
    /// Both credential halves, or `None` (emulator mode).
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.app_id, &self.app_password) {
            (Some(id), Some(password)) => Some((id.as_str(), password.expose_secret())),
            _ => None,
        }
    }

    #[must_use]
    pub fn emulator_mode(&self) -> bool {
        self.credentials().is_none()
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            app_id: None,
            app_password: None,
            oauth_tenant: "botframework.com".into(),
            oauth_scope: "https://api.botframework.com/.default".into(),
        }
    }
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("app_id", &self.app_id)
            .field(
                "app_password",
                &self.app_password.as_ref().map(|_| "[REDACTED]"),
            )
            .field("oauth_tenant", &self.oauth_tenant)
            .field("oauth_scope", &self.oauth_scope)
            .finish()
    }
}

/// Webhook server bind settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 3978,
        }
    }
}

/// Static pre-registration of a channel, so proactive sends work before the
/// first inbound activity from that platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelSeed {
    pub service_url: String,
    pub bot_id: String,
    pub bot_name: String,
}

/// Top-level bridge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub identity: IdentityConfig,
    pub server: ServerConfig,
    /// channel id → seed, e.g. `[channels.skype]`.
    pub channels: HashMap<String, ChannelSeed>,
}

fn serialize_option_secret<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(s) => serializer.serialize_some(s.expose_secret()),
        None => serializer.serialize_none(),
    }
}
