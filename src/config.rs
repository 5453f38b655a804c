//! Configuration management for the Spotify Playlist Generator.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. Spotify API credentials are
//! resolved once at startup into an explicit [`Credentials`] struct that is
//! passed into the pipeline, so the core never reads process-wide state.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the current working directory
//! 3. `.env` file in the platform-specific local data directory
//! 4. Application defaults for the Spotify endpoint URLs

use std::{env, path::PathBuf};

use dotenv;

/// Default base URL of the Spotify Web API.
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";

/// Default Spotify OAuth authorization endpoint.
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";

/// Default Spotify OAuth token exchange endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// OAuth scope required for creating and modifying public playlists.
pub const DEFAULT_SCOPE: &str = "playlist-modify-public user-library-read";

/// Spotify API credentials resolved from the environment.
///
/// Accepts either of two interchangeable environment variable prefix
/// families, `SPOTIFY_` and `SPOTIPY_` (the latter for compatibility with
/// configurations written for the spotipy Python client). For each
/// credential the first prefix found wins.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl Credentials {
    /// Resolves credentials from the environment.
    ///
    /// Each of the three required values is looked up under the `SPOTIFY_`
    /// prefix first and the `SPOTIPY_` prefix second. When one or more
    /// values are missing under both prefixes, returns an error naming every
    /// missing variable so the user can fix their `.env` file in one pass.
    ///
    /// # Errors
    ///
    /// Returns `Err(Vec<String>)` with one entry per missing credential,
    /// e.g. `"SPOTIFY_CLIENT_ID or SPOTIPY_CLIENT_ID"`.
    ///
    /// # Example
    ///
    /// ```
    /// use spotigen::config::Credentials;
    ///
    /// match Credentials::from_env() {
    ///     Ok(creds) => println!("client id: {}", creds.client_id),
    ///     Err(missing) => eprintln!("missing: {}", missing.join(", ")),
    /// }
    /// ```
    pub fn from_env() -> Result<Self, Vec<String>> {
        let mut missing = Vec::new();

        let client_id = first_of(&["SPOTIFY_CLIENT_ID", "SPOTIPY_CLIENT_ID"]);
        if client_id.is_none() {
            missing.push("SPOTIFY_CLIENT_ID or SPOTIPY_CLIENT_ID".to_string());
        }

        let client_secret = first_of(&["SPOTIFY_CLIENT_SECRET", "SPOTIPY_CLIENT_SECRET"]);
        if client_secret.is_none() {
            missing.push("SPOTIFY_CLIENT_SECRET or SPOTIPY_CLIENT_SECRET".to_string());
        }

        let redirect_uri = first_of(&["SPOTIFY_REDIRECT_URI", "SPOTIPY_REDIRECT_URI"]);
        if redirect_uri.is_none() {
            missing.push("SPOTIFY_REDIRECT_URI or SPOTIPY_REDIRECT_URI".to_string());
        }

        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(Credentials {
            client_id: client_id.unwrap(),
            client_secret: client_secret.unwrap(),
            redirect_uri: redirect_uri.unwrap(),
        })
    }
}

/// Returns the value of the first environment variable in `names` that is
/// set to a non-empty string.
fn first_of(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

/// Loads environment variables from `.env` files.
///
/// Tries a `.env` file in the current working directory first, then a
/// `.env` file in the platform-specific local data directory under
/// `spotigen/.env`. Missing files are not an error; variables already set in
/// the process environment keep priority.
///
/// # Directory Structure
///
/// The data-directory fallback lives in:
/// - Linux: `~/.local/share/spotigen/.env`
/// - macOS: `~/Library/Application Support/spotigen/.env`
/// - Windows: `%LOCALAPPDATA%/spotigen/.env`
///
/// # Errors
///
/// Returns an error string only when the data directory cannot be created.
pub async fn load_env() -> Result<(), String> {
    // cwd .env, the usual place for per-project credentials
    let _ = dotenv::dotenv();

    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotigen/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    let _ = dotenv::from_path(path);
    Ok(())
}

/// Returns the local callback server address for the OAuth flow.
///
/// Reads `SERVER_ADDRESS`, defaulting to `127.0.0.1:8888` which matches the
/// conventional `http://localhost:8888/callback` redirect URI.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").unwrap_or_else(|_| "127.0.0.1:8888".to_string())
}

/// Returns the Spotify Web API base URL, overridable via `SPOTIFY_API_URL`.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
}

/// Returns the OAuth authorization URL, overridable via `SPOTIFY_AUTH_URL`.
pub fn spotify_auth_url() -> String {
    env::var("SPOTIFY_AUTH_URL").unwrap_or_else(|_| DEFAULT_AUTH_URL.to_string())
}

/// Returns the OAuth token exchange URL, overridable via `SPOTIFY_TOKEN_URL`.
pub fn spotify_token_url() -> String {
    env::var("SPOTIFY_TOKEN_URL").unwrap_or_else(|_| DEFAULT_TOKEN_URL.to_string())
}

/// Returns the OAuth scope, overridable via `SPOTIFY_SCOPE`.
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_SCOPE").unwrap_or_else(|_| DEFAULT_SCOPE.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    // The process environment is global state; every test that touches the
    // credential variables must hold this lock.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const CREDENTIAL_VARS: [&str; 6] = [
        "SPOTIFY_CLIENT_ID",
        "SPOTIPY_CLIENT_ID",
        "SPOTIFY_CLIENT_SECRET",
        "SPOTIPY_CLIENT_SECRET",
        "SPOTIFY_REDIRECT_URI",
        "SPOTIPY_REDIRECT_URI",
    ];

    fn clear_credential_vars() {
        for var in CREDENTIAL_VARS {
            unsafe { env::remove_var(var) };
        }
    }

    #[test]
    fn test_credentials_resolve_from_spotipy_prefix() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_credential_vars();
        unsafe {
            env::set_var("SPOTIPY_CLIENT_ID", "py-id");
            env::set_var("SPOTIPY_CLIENT_SECRET", "py-secret");
            env::set_var("SPOTIPY_REDIRECT_URI", "http://localhost:8888/callback");
        }

        let credentials = Credentials::from_env().unwrap();
        assert_eq!(credentials.client_id, "py-id");
        assert_eq!(credentials.client_secret, "py-secret");
        assert_eq!(credentials.redirect_uri, "http://localhost:8888/callback");

        clear_credential_vars();
    }

    #[test]
    fn test_credentials_spotify_prefix_wins_over_spotipy() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_credential_vars();
        unsafe {
            env::set_var("SPOTIFY_CLIENT_ID", "fy-id");
            env::set_var("SPOTIPY_CLIENT_ID", "py-id");
            env::set_var("SPOTIFY_CLIENT_SECRET", "fy-secret");
            env::set_var("SPOTIPY_CLIENT_SECRET", "py-secret");
            env::set_var("SPOTIFY_REDIRECT_URI", "http://localhost:8888/callback");
        }

        let credentials = Credentials::from_env().unwrap();
        assert_eq!(credentials.client_id, "fy-id");
        assert_eq!(credentials.client_secret, "fy-secret");

        clear_credential_vars();
    }

    #[test]
    fn test_credentials_error_names_every_missing_variable() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_credential_vars();

        let missing = Credentials::from_env().unwrap_err();

        // One entry per missing credential, so a user fixes .env in one pass
        assert_eq!(missing.len(), 3);
        assert_eq!(missing[0], "SPOTIFY_CLIENT_ID or SPOTIPY_CLIENT_ID");
        assert_eq!(missing[1], "SPOTIFY_CLIENT_SECRET or SPOTIPY_CLIENT_SECRET");
        assert_eq!(missing[2], "SPOTIFY_REDIRECT_URI or SPOTIPY_REDIRECT_URI");
    }

    #[test]
    fn test_credentials_blank_value_counts_as_missing() {
        let _guard = ENV_LOCK.lock().unwrap();
        clear_credential_vars();
        unsafe {
            env::set_var("SPOTIFY_CLIENT_ID", "  ");
            env::set_var("SPOTIPY_CLIENT_ID", "py-id");
            env::set_var("SPOTIFY_CLIENT_SECRET", "fy-secret");
            env::set_var("SPOTIFY_REDIRECT_URI", "http://localhost:8888/callback");
        }

        // Whitespace-only values are skipped, so the SPOTIPY_ fallback wins
        let credentials = Credentials::from_env().unwrap();
        assert_eq!(credentials.client_id, "py-id");

        clear_credential_vars();
    }
}
