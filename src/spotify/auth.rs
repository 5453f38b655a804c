use std::{sync::Arc, time::Duration};

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use rand::{Rng, distr::Alphanumeric};
use reqwest::{Client, Url, header::AUTHORIZATION};
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    config::{self, Credentials},
    error,
    management::TokenManager,
    server::start_api_server,
    success,
    types::{AuthState, Token},
    warning,
};

/// Generates the random OAuth `state` parameter.
///
/// The callback handler rejects responses that echo a different value,
/// which guards the local callback against forged redirects.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Runs the complete OAuth 2.0 authorization-code flow with Spotify.
///
/// Starts a local callback server, opens the authorization URL in the
/// user's browser, waits for the callback to exchange the authorization
/// code, and persists the obtained token for future runs.
///
/// # Arguments
///
/// * `credentials` - Client id, secret and redirect URI from the environment
/// * `shared_state` - Shared slot the callback handler writes the token into
///
/// # Behavior
///
/// Browser launch failures degrade to printing the URL for manual
/// navigation. A missing token after the 120 second wait, or a failure to
/// persist the token, terminates the program.
pub async fn auth(credentials: Credentials, shared_state: Arc<Mutex<Option<AuthState>>>) {
    let state_param = generate_state();

    // Store the expected state before the redirect can come back.
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(AuthState {
            state: state_param.clone(),
            token: None,
        });
    }

    // start API server
    let server_state = Arc::clone(&shared_state);
    let server_creds = credentials.clone();
    tokio::spawn(async move {
        start_api_server(server_state, server_creds).await;
    });

    let auth_url = match authorize_url(&credentials, &state_param) {
        Ok(url) => url,
        Err(e) => error!("Failed to build authorization URL: {}", e),
    };

    // Open the authorization URL in the default browser
    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    // wait for callback to be hit
    let token = wait_for_token(shared_state).await;

    match token {
        Some(t) => {
            let token_manager = TokenManager::new(t, credentials);
            if let Err(e) = token_manager.persist().await {
                error!("Failed to save token to cache: {}", e);
            }

            success!("Authentication successful!");
        }
        None => {
            error!("Authentication failed or timed out.");
        }
    }
}

fn authorize_url(credentials: &Credentials, state_param: &str) -> Result<Url, String> {
    let mut url = Url::parse(&config::spotify_auth_url()).map_err(|e| e.to_string())?;
    url.query_pairs_mut()
        .append_pair("client_id", &credentials.client_id)
        .append_pair("response_type", "code")
        .append_pair("redirect_uri", &credentials.redirect_uri)
        .append_pair("state", state_param)
        .append_pair("scope", &config::spotify_scope());
    Ok(url)
}

/// Polls the shared state for a completed token, giving the user two
/// minutes to finish the browser authorization.
async fn wait_for_token(shared_state: Arc<Mutex<Option<AuthState>>>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(120);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(auth_state) = lock.as_ref() {
            if let Some(token) = &auth_state.token {
                return Some(token.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Exchanges an authorization code for an access token.
///
/// The authorization-code grant with a client secret authenticates the
/// token request with an HTTP Basic header built from
/// `client_id:client_secret`.
pub async fn exchange_code(
    credentials: &Credentials,
    code: &str,
) -> Result<Token, reqwest::Error> {
    let client = Client::new();
    let res = client
        .post(config::spotify_token_url())
        .header(AUTHORIZATION, basic_auth_header(credentials))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &credentials.redirect_uri),
        ])
        .send()
        .await?;

    let json: Value = res.json().await?;

    Ok(Token {
        access_token: json["access_token"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        refresh_token: json["refresh_token"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        scope: json["scope"].as_str().unwrap_or_default().to_string(),
        expires_in: json["expires_in"].as_i64().unwrap_or(3600) as u64,
        obtained_at: Utc::now().timestamp() as u64,
    })
}

/// `Basic` authorization header value for the token endpoint.
pub fn basic_auth_header(credentials: &Credentials) -> String {
    let pair = format!("{}:{}", credentials.client_id, credentials.client_secret);
    format!("Basic {}", STANDARD.encode(pair))
}
