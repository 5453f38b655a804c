use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{config::Credentials, error, spotify, types::AuthState};

pub async fn auth() {
    let credentials = match Credentials::from_env() {
        Ok(credentials) => credentials,
        Err(missing) => error!(
            "Missing required environment variables: {}",
            missing.join(", ")
        ),
    };

    let oauth_result: Arc<Mutex<Option<AuthState>>> = Arc::new(Mutex::new(None));
    spotify::auth::auth(credentials, Arc::clone(&oauth_result)).await;
}
