use std::{collections::HashSet, time::Duration};

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tokio::{sync::Mutex, time::sleep};

use crate::{
    catalog::{Catalog, CatalogError},
    config::{self, Credentials},
    management::TokenManager,
    types::{
        AddTracksRequest, AddTracksResponse, AlbumObject, AlbumTracksResponse,
        ArtistAlbumsResponse, ArtistObject, ArtistSearchResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, CurrentUserResponse, PlaylistObject, PlaylistTracksResponse,
        SimpleTrack, TopTracksResponse, TrackObject, TrackSearchResponse, UserPlaylistItem,
        UserPlaylistsResponse,
    },
    warning,
};

/// Longest `Retry-After` delay honored before giving up on a request.
const MAX_RETRY_AFTER_SECS: u64 = 120;

/// The real [`Catalog`] implementation backed by the Spotify Web API.
///
/// Holds the token manager behind a mutex so `&self` methods can refresh
/// the access token transparently.
pub struct SpotifyClient {
    token_mgr: Mutex<TokenManager>,
}

impl SpotifyClient {
    /// Loads the cached token and wraps it into a client.
    ///
    /// # Errors
    ///
    /// Returns an error string when no token has been cached yet, in which
    /// case the user needs to run `spotigen auth` first.
    pub async fn new(credentials: Credentials) -> Result<Self, String> {
        let token_mgr = TokenManager::load(credentials).await?;
        Ok(SpotifyClient {
            token_mgr: Mutex::new(token_mgr),
        })
    }

    async fn token(&self) -> String {
        self.token_mgr.lock().await.get_valid_token().await
    }

    /// Sends a request and deserializes the JSON response, retrying on
    /// 502 Bad Gateway and honoring `Retry-After` on 429 responses.
    async fn send<T, F>(&self, build: F) -> Result<T, CatalogError>
    where
        T: DeserializeOwned,
        F: Fn(&Client, &str) -> RequestBuilder,
    {
        loop {
            let client = Client::new();
            let token = self.token().await;
            let response = build(&client, &token).send().await?;

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1);
                if retry_after <= MAX_RETRY_AFTER_SECS {
                    warning!("Rate limit hit, waiting {} seconds", retry_after);
                    sleep(Duration::from_secs(retry_after)).await;
                    continue; // retry
                }
                return Err(CatalogError::RateLimited(retry_after));
            }

            let response = match response.error_for_status() {
                Ok(valid_response) => valid_response,
                Err(err) => {
                    if let Some(status) = err.status() {
                        if status == StatusCode::BAD_GATEWAY {
                            sleep(Duration::from_secs(10)).await;
                            continue; // retry
                        }
                    }
                    return Err(err.into()); // propagate other errors
                }
            };

            return Ok(response.json::<T>().await?);
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: String,
        query: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        self.send(|client, token| client.get(&url).query(query).bearer_auth(token))
            .await
    }

    async fn post<T, B>(&self, url: String, body: &B) -> Result<T, CatalogError>
    where
        T: DeserializeOwned,
        B: serde::Serialize,
    {
        self.send(|client, token| client.post(&url).json(body).bearer_auth(token))
            .await
    }
}

/// Picks the first playlist in a listing page that the given user owns and
/// whose name matches exactly. Followed playlists never match.
fn owned_playlist_match(
    items: Vec<UserPlaylistItem>,
    user_id: &str,
    name: &str,
) -> Option<PlaylistObject> {
    items
        .into_iter()
        .find(|p| p.owner.id == user_id && p.name == name)
        .map(|p| PlaylistObject {
            id: p.id,
            name: p.name,
        })
}

impl Catalog for SpotifyClient {
    async fn current_user_id(&self) -> Result<String, CatalogError> {
        let url = format!("{}/me", config::spotify_apiurl());
        let user: CurrentUserResponse = self.get(url, &[]).await?;
        Ok(user.id)
    }

    async fn search_artist(&self, name: &str) -> Result<Option<ArtistObject>, CatalogError> {
        let url = format!("{}/search", config::spotify_apiurl());
        let query = format!("artist:{}", name);
        let res: ArtistSearchResponse = self
            .get(url, &[("q", query.as_str()), ("type", "artist"), ("limit", "1")])
            .await?;
        Ok(res.artists.items.into_iter().next())
    }

    async fn search_track_exact(
        &self,
        artist: &str,
        song: &str,
    ) -> Result<Vec<TrackObject>, CatalogError> {
        let url = format!("{}/search", config::spotify_apiurl());
        let query = format!("artist:\"{}\" track:\"{}\"", artist, song);
        let res: TrackSearchResponse = self
            .get(url, &[("q", query.as_str()), ("type", "track"), ("limit", "10")])
            .await?;
        Ok(res.tracks.items)
    }

    async fn search_track_free(
        &self,
        artist: &str,
        song: &str,
    ) -> Result<Vec<TrackObject>, CatalogError> {
        let url = format!("{}/search", config::spotify_apiurl());
        let query = format!("{} {}", artist, song);
        let res: TrackSearchResponse = self
            .get(url, &[("q", query.as_str()), ("type", "track"), ("limit", "10")])
            .await?;
        Ok(res.tracks.items)
    }

    async fn artist_top_tracks(
        &self,
        artist_id: &str,
        country: &str,
    ) -> Result<Vec<TrackObject>, CatalogError> {
        let url = format!(
            "{}/artists/{}/top-tracks",
            config::spotify_apiurl(),
            artist_id
        );
        let res: TopTracksResponse = self.get(url, &[("market", country)]).await?;
        Ok(res.tracks)
    }

    async fn artist_albums(&self, artist_id: &str) -> Result<Vec<AlbumObject>, CatalogError> {
        let url = format!("{}/artists/{}/albums", config::spotify_apiurl(), artist_id);
        let res: ArtistAlbumsResponse = self
            .get(url, &[("include_groups", "album"), ("limit", "50")])
            .await?;
        Ok(res.items)
    }

    async fn album_tracks(&self, album_id: &str) -> Result<Vec<SimpleTrack>, CatalogError> {
        let mut url = format!(
            "{}/albums/{}/tracks?limit=50",
            config::spotify_apiurl(),
            album_id
        );
        let mut tracks = Vec::new();

        loop {
            let page: AlbumTracksResponse = self.get(url, &[]).await?;
            tracks.extend(page.items);
            match page.next {
                Some(next) => url = next,
                None => break,
            }
        }

        Ok(tracks)
    }

    async fn find_playlist_by_name(
        &self,
        name: &str,
    ) -> Result<Option<PlaylistObject>, CatalogError> {
        // The listing also contains playlists the user merely follows; only
        // an owned playlist is a valid write target.
        let user_id = self.current_user_id().await?;
        let mut url = format!("{}/me/playlists?limit=50", config::spotify_apiurl());

        loop {
            let page: UserPlaylistsResponse = self.get(url, &[]).await?;
            if let Some(found) = owned_playlist_match(page.items, &user_id, name) {
                return Ok(Some(found));
            }
            match page.next {
                Some(next) => url = next,
                None => return Ok(None),
            }
        }
    }

    async fn create_playlist(
        &self,
        name: &str,
        description: &str,
    ) -> Result<PlaylistObject, CatalogError> {
        let user_id = self.current_user_id().await?;
        let url = format!("{}/users/{}/playlists", config::spotify_apiurl(), user_id);
        let body = CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public: true,
            collaborative: false,
        };
        let created: CreatePlaylistResponse = self.post(url, &body).await?;
        Ok(PlaylistObject {
            id: created.id,
            name: created.name,
        })
    }

    async fn playlist_track_ids(
        &self,
        playlist_id: &str,
    ) -> Result<HashSet<String>, CatalogError> {
        let mut url = format!(
            "{}/playlists/{}/tracks?limit=100",
            config::spotify_apiurl(),
            playlist_id
        );
        let mut ids = HashSet::new();

        loop {
            let page: PlaylistTracksResponse = self.get(url, &[]).await?;
            for item in page.items {
                if let Some(id) = item.track.and_then(|t| t.id) {
                    ids.insert(id);
                }
            }
            match page.next {
                Some(next) => url = next,
                None => break,
            }
        }

        Ok(ids)
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<(), CatalogError> {
        let url = format!(
            "{}/playlists/{}/tracks",
            config::spotify_apiurl(),
            playlist_id
        );
        let body = AddTracksRequest {
            uris: track_ids
                .iter()
                .map(|id| format!("spotify:track:{}", id))
                .collect(),
        };
        let res: AddTracksResponse = self.post(url, &body).await?;
        if res.snapshot_id.is_empty() {
            return Err(CatalogError::Provider(
                "add-tracks response carried no snapshot id".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlaylistOwner;

    fn listed(id: &str, name: &str, owner: &str) -> UserPlaylistItem {
        UserPlaylistItem {
            id: id.to_string(),
            name: name.to_string(),
            owner: PlaylistOwner {
                id: owner.to_string(),
            },
        }
    }

    #[test]
    fn test_followed_playlist_with_matching_name_is_skipped() {
        let items = vec![
            listed("pl1", "Setlist 2025-03-01", "someone_else"),
            listed("pl2", "Setlist 2025-03-01", "tester"),
        ];

        let found = owned_playlist_match(items, "tester", "Setlist 2025-03-01").unwrap();
        assert_eq!(found.id, "pl2");
    }

    #[test]
    fn test_no_owned_match_yields_none() {
        let items = vec![
            listed("pl1", "Setlist 2025-03-01", "someone_else"),
            listed("pl2", "Another Playlist", "tester"),
        ];

        assert!(owned_playlist_match(items, "tester", "Setlist 2025-03-01").is_none());
    }
}
