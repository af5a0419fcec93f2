use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use tokio::sync::Mutex;
use url::Url;

use crate::{
    config,
    errors::{AuthError, ConfigError},
    types::{AuthErrorResponse, AuthorizeOptions, PkceToken, Token},
    utils,
};

/// Permissions requested on every authorization request.
///
/// See <https://developer.spotify.com/documentation/web-api/concepts/scopes>.
pub const SCOPES: [&str; 7] = [
    "user-read-email",
    "user-read-private",
    "user-top-read",
    "playlist-read-private",
    "playlist-read-collaborative",
    "playlist-modify-private",
    "playlist-modify-public",
];

/// The two halves of the authorization code flow.
#[async_trait]
pub trait OAuthSession: Send + Sync {
    /// URL the user is sent to in order to grant access.
    async fn authorize_url(&self, options: &AuthorizeOptions) -> String;

    /// Exchanges a one-time authorization code for an access token.
    async fn request_access_token(&self, code: &str) -> Result<Token, AuthError>;
}

/// Credentials and endpoints of the registered Spotify application.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub client_id: String,
    /// Without a secret the session acts as a public client and uses PKCE.
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub authorize_url: String,
    pub token_url: String,
}

impl SessionConfig {
    /// Reads the application credentials from the environment.
    ///
    /// # Errors
    ///
    /// Fails when the client id or redirect URI is not configured.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            client_id: config::spotify_client_id()?,
            client_secret: config::spotify_client_secret(),
            redirect_uri: config::spotify_redirect_uri()?,
            authorize_url: config::spotify_apiauth_url(),
            token_url: config::spotify_apitoken_url(),
        })
    }
}

/// [`OAuthSession`] against the Spotify accounts service.
///
/// With a client secret the token request is authenticated with HTTP Basic
/// credentials. Without one, every authorize URL carries a fresh PKCE
/// challenge and the matching verifier is kept until the code is exchanged.
pub struct SpotifySession {
    config: SessionConfig,
    authorize_endpoint: Url,
    http: Client,
    pkce: Mutex<Option<PkceToken>>,
}

impl SpotifySession {
    /// # Errors
    ///
    /// Fails when the configured authorize URL cannot be parsed.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        let authorize_endpoint = Url::parse(&config.authorize_url)?;
        Ok(Self {
            config,
            authorize_endpoint,
            http: Client::new(),
            pkce: Mutex::new(None),
        })
    }

    pub fn uses_pkce(&self) -> bool {
        self.config.client_secret.is_none()
    }
}

#[async_trait]
impl OAuthSession for SpotifySession {
    async fn authorize_url(&self, options: &AuthorizeOptions) -> String {
        let pkce = self.uses_pkce().then(utils::generate_pkce);

        let mut url = self.authorize_endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &self.config.client_id)
                .append_pair("response_type", "code")
                .append_pair("redirect_uri", &self.config.redirect_uri);

            if !options.scope.is_empty() {
                query.append_pair("scope", &options.scope.join(" "));
            }

            if let Some(pkce) = &pkce {
                query
                    .append_pair("code_challenge_method", "S256")
                    .append_pair("code_challenge", &pkce.code_challenge);
            }
        }

        if pkce.is_some() {
            *self.pkce.lock().await = pkce;
        }

        url.to_string()
    }

    async fn request_access_token(&self, code: &str) -> Result<Token, AuthError> {
        let mut form: Vec<(&str, String)> = vec![
            ("grant_type", "authorization_code".to_string()),
            ("code", code.to_string()),
            ("redirect_uri", self.config.redirect_uri.clone()),
        ];

        let mut request = self.http.post(&self.config.token_url);
        match &self.config.client_secret {
            Some(secret) => {
                request = request.basic_auth(&self.config.client_id, Some(secret));
            }
            None => {
                let verifier = self
                    .pkce
                    .lock()
                    .await
                    .as_ref()
                    .map(|pkce| pkce.code_verifier.clone())
                    .ok_or(AuthError::MissingPkceVerifier)?;
                form.push(("client_id", self.config.client_id.clone()));
                form.push(("code_verifier", verifier));
            }
        }

        let response = request.form(&form).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<AuthErrorResponse>(&body) {
                Ok(err) => err.error_description.unwrap_or(err.error),
                Err(_) => format!("Token request failed with status {status}"),
            };
            return Err(AuthError::Rejected { message });
        }

        let mut token: Token = response.json().await?;
        token.obtained_at = Utc::now().timestamp() as u64;

        if self.uses_pkce() {
            *self.pkce.lock().await = None;
        }

        Ok(token)
    }
}
