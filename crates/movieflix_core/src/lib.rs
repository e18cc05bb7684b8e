pub mod domain;
pub mod ports;

pub use domain::{
    Account, AccountCredentials, AuthSession, CastMember, Genre, Movie, MovieDetails, Page,
    SearchResult, Video,
};
pub use ports::{AuthError, AuthGateway, AuthResult, CredentialStore, TokenStore};
