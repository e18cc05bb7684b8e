//! crates/movieflix_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are shared between the server and the device client,
//! so the wire representation (serde) lives here too.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//=========================================================================================
// Accounts and Sessions
//=========================================================================================

/// Represents a registered user as exposed through the API.
///
/// This is the public projection: it never carries the secret hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

// Only used internally for login/registration - contains sensitive data.
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl AccountCredentials {
    /// Strips the secret hash, leaving the public projection.
    pub fn into_account(self) -> Account {
        Account {
            id: self.id,
            email: self.email,
            username: self.username,
            created_at: self.created_at,
        }
    }
}

/// What a successful login or registration hands back: the account plus a
/// bearer token proving it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub account: Account,
    pub token: String,
}

//=========================================================================================
// Catalog (third-party movie metadata API)
//=========================================================================================

/// One page of results as the catalog API returns them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u32,
}

/// A movie as it appears in listings and detail responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    // Only present on the full detail response.
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// A credited cast member on a movie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
}

/// A promotional video reference (trailer, teaser) attached to a movie.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// The combined detail view: the movie itself, its credits, and its videos.
#[derive(Debug, Clone)]
pub struct MovieDetails {
    pub movie: Movie,
    pub cast: Vec<CastMember>,
    pub videos: Vec<Video>,
}

/// One hit from the combined multi-type search (movies and people mixed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    #[serde(default)]
    pub media_type: Option<String>,
    // Movies carry `title`, people carry `name`.
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}
