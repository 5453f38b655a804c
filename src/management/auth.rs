use std::path::PathBuf;

use chrono::Utc;
use reqwest::{Client, header::AUTHORIZATION};

use crate::{
    config::{self, Credentials},
    spotify::auth::basic_auth_header,
    types::Token,
};

/// Holds the OAuth token and refreshes it when it nears expiry.
///
/// The token lives at `<data_local_dir>/spotigen/cache/token.json`. Refresh
/// requests authenticate with the client credentials, so the manager carries
/// them alongside the token.
pub struct TokenManager {
    token: Token,
    credentials: Credentials,
}

impl TokenManager {
    pub fn new(token: Token, credentials: Credentials) -> Self {
        TokenManager { token, credentials }
    }

    /// Loads the cached token from disk. Fails when no token has been
    /// persisted yet, i.e. before the first `spotigen auth`.
    pub async fn load(credentials: Credentials) -> Result<Self, String> {
        let path = Self::token_path();
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { token, credentials })
    }

    pub async fn persist(&self) -> Result<(), String> {
        let path = Self::token_path();
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(Self::token_path(), json)
            .await
            .map_err(|e| e.to_string())
    }

    /// Returns a usable access token, refreshing and re-persisting it first
    /// when the current one is about to expire.
    pub async fn get_valid_token(&mut self) -> String {
        if self.is_expired() {
            if let Ok(new_token) = self.refresh_token().await {
                self.token = new_token;
                let _ = self.persist().await;
            }
        }

        self.token.access_token.clone()
    }

    // Treat the token as expired four minutes early so a request never
    // races the actual expiry.
    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now >= self.token.obtained_at + self.token.expires_in - 240
    }

    async fn refresh_token(&self) -> Result<Token, String> {
        let client = Client::new();
        let res = client
            .post(config::spotify_token_url())
            .header(AUTHORIZATION, basic_auth_header(&self.credentials))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", &self.token.refresh_token),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let json: serde_json::Value = res.json().await.map_err(|e| e.to_string())?;

        Ok(Token {
            access_token: json["access_token"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            // Spotify may omit the refresh token on refresh; keep the old one.
            refresh_token: json["refresh_token"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| self.token.refresh_token.clone()),
            scope: json["scope"].as_str().unwrap_or_default().to_string(),
            expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
            obtained_at: Utc::now().timestamp() as u64,
        })
    }

    fn token_path() -> PathBuf {
        let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("spotigen/cache/token.json");
        path
    }
}
