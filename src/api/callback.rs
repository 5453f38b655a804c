use std::{collections::HashMap, sync::Arc};

use axum::{Extension, extract::Query, response::Html};
use tokio::sync::Mutex;

use crate::{config::Credentials, spotify::auth::exchange_code, types::AuthState, warning};

/// OAuth callback handler.
///
/// Verifies that the echoed `state` matches the one generated for this
/// flow, then exchanges the authorization code for a token and stores it in
/// the shared state the `auth` command polls.
pub async fn callback(
    Query(params): Query<HashMap<String, String>>,
    Extension(shared_state): Extension<Arc<Mutex<Option<AuthState>>>>,
    Extension(credentials): Extension<Arc<Credentials>>,
) -> Html<&'static str> {
    let Some(code) = params.get("code") else {
        return Html("<h4>Missing authorization code.</h4>");
    };

    let mut state = shared_state.lock().await;
    let Some(auth_state) = state.as_mut() else {
        return Html("<h4>No authentication flow in progress.</h4>");
    };

    if params.get("state").map(String::as_str) != Some(auth_state.state.as_str()) {
        warning!("OAuth callback carried an unexpected state parameter.");
        return Html("<h4>State mismatch.</h4>");
    }

    match exchange_code(&credentials, code).await {
        Ok(token) => {
            auth_state.token = Some(token);
            Html("<h2>Authentication successful.</h2><p>Close browser window.</p>")
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            Html("<h4>Login failed.</h4>")
        }
    }
}
