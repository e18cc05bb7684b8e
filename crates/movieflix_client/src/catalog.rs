//! crates/movieflix_client/src/catalog.rs
//!
//! Read-only client for the third-party movie catalog API: listing pages,
//! combined movie detail (credits and videos included), and multi-type
//! search. Stateless; every call is bounded by the configured timeout.

use std::time::Duration;

use movieflix_core::domain::{CastMember, Movie, MovieDetails, Page, SearchResult, Video};
use movieflix_core::ports::{AuthError, AuthResult};
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/500x750/1C1C1C/FFFFFF?text=No+Image";

/// Builds a full poster/backdrop/profile URL from the relative path the
/// catalog returns, falling back to a placeholder when there is none.
pub fn image_url(path: Option<&str>, size: &str) -> String {
    match path {
        Some(p) => format!("{IMAGE_BASE_URL}/{size}{p}"),
        None => PLACEHOLDER_IMAGE.to_string(),
    }
}

#[derive(Deserialize)]
struct Credits {
    #[serde(default)]
    cast: Vec<CastMember>,
}

#[derive(Deserialize)]
struct VideoList {
    #[serde(default)]
    results: Vec<Video>,
}

pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    /// Read-only credential issued by the catalog provider; not the
    /// first-party session token.
    bearer: String,
    language: String,
}

impl CatalogClient {
    pub fn new(
        base_url: &str,
        bearer: &str,
        language: &str,
        timeout: Duration,
    ) -> AuthResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::Unexpected(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer: bearer.to_string(),
            language: language.to_string(),
        })
    }

    fn transport_error(err: reqwest::Error) -> AuthError {
        if err.is_timeout() {
            AuthError::NetworkTimeout
        } else if err.is_connect() || err.is_request() {
            AuthError::NetworkUnavailable
        } else {
            AuthError::Unexpected(err.to_string())
        }
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AuthResult<T> {
        debug!(path, "fetching from catalog");
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.bearer)
            .header(ACCEPT, "application/json")
            .query(&[("language", self.language.as_str())])
            .query(query)
            .send()
            .await
            .map_err(Self::transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Unexpected(format!(
                "Catalog API answered {status}"
            )));
        }

        response.json().await.map_err(Self::transport_error)
    }

    pub async fn popular(&self, page: u32) -> AuthResult<Page<Movie>> {
        self.fetch("/movie/popular", &[("page", page.to_string())])
            .await
    }

    pub async fn now_playing(&self, page: u32) -> AuthResult<Page<Movie>> {
        self.fetch("/movie/now_playing", &[("page", page.to_string())])
            .await
    }

    pub async fn top_rated(&self, page: u32) -> AuthResult<Page<Movie>> {
        self.fetch("/movie/top_rated", &[("page", page.to_string())])
            .await
    }

    pub async fn upcoming(&self, page: u32) -> AuthResult<Page<Movie>> {
        self.fetch("/movie/upcoming", &[("page", page.to_string())])
            .await
    }

    /// The full detail view. Detail, credits, and videos are fetched
    /// concurrently; the first failure wins.
    pub async fn movie_details(&self, movie_id: u64) -> AuthResult<MovieDetails> {
        let detail_path = format!("/movie/{movie_id}");
        let credits_path = format!("/movie/{movie_id}/credits");
        let videos_path = format!("/movie/{movie_id}/videos");
        let (movie, credits, videos) = tokio::try_join!(
            self.fetch::<Movie>(&detail_path, &[]),
            self.fetch::<Credits>(&credits_path, &[]),
            self.fetch::<VideoList>(&videos_path, &[]),
        )?;

        Ok(MovieDetails {
            movie,
            cast: credits.cast,
            videos: videos.results,
        })
    }

    /// Combined movie-and-people search.
    pub async fn search_multi(&self, query: &str, page: u32) -> AuthResult<Page<SearchResult>> {
        self.fetch(
            "/search/multi",
            &[
                ("query", query.to_string()),
                ("page", page.to_string()),
                ("include_adult", "false".to_string()),
            ],
        )
        .await
    }
}
