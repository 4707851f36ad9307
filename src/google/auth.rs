//! OAuth 2.0 for Google Calendar: authorization code + PKCE with a loopback
//! redirect, and a file-backed token cache that refreshes on demand.

use crate::config::GoogleConfig;
use crate::error::{AttendanceError, AttendanceResult};
use crate::google::models::TokenSet;
use chrono::Utc;
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::reqwest::async_http_client;
use oauth2::url::Url;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge, RedirectUrl,
    RefreshToken, Scope, TokenResponse, TokenUrl,
};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

pub const SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";

const DEFAULT_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

pub struct GoogleAuthenticator {
    client: BasicClient,
    redirect_port: u16,
    cache_path: PathBuf,
}

fn auth_err(e: impl std::fmt::Display) -> AttendanceError {
    AttendanceError::Auth(e.to_string())
}

impl GoogleAuthenticator {
    pub fn new(
        config: &GoogleConfig,
        client_secret: Option<String>,
        cache_path: PathBuf,
    ) -> AttendanceResult<Self> {
        if config.client_id.trim().is_empty() {
            return Err(AttendanceError::Auth(
                "google.client_id is not configured. \
                 Run 'attend config set google.client_id <ID>'"
                    .to_string(),
            ));
        }

        let auth_url = config.auth_url.as_deref().unwrap_or(DEFAULT_AUTH_URL);
        let token_url = config.token_url.as_deref().unwrap_or(DEFAULT_TOKEN_URL);
        let redirect = format!("http://localhost:{}/callback", config.redirect_port);

        let client = BasicClient::new(
            ClientId::new(config.client_id.clone()),
            client_secret.map(ClientSecret::new),
            AuthUrl::new(auth_url.to_string()).map_err(auth_err)?,
            Some(TokenUrl::new(token_url.to_string()).map_err(auth_err)?),
        )
        .set_redirect_uri(RedirectUrl::new(redirect).map_err(auth_err)?);

        Ok(Self {
            client,
            redirect_port: config.redirect_port,
            cache_path,
        })
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }

    /// Run the browser consent flow and cache the resulting tokens
    pub async fn login(&self) -> AttendanceResult<TokenSet> {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf) = self
            .client
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new(SCOPE.to_string()))
            .add_extra_param("access_type", "offline")
            .add_extra_param("prompt", "consent")
            .set_pkce_challenge(pkce_challenge)
            .url();

        eprintln!("\nOpen this URL in your browser to authenticate:\n");
        eprintln!("{}\n", auth_url);

        let (code, state) = wait_for_callback(self.redirect_port).await?;
        if state != *csrf.secret() {
            return Err(AttendanceError::Auth(
                "OAuth state mismatch; aborting login".to_string(),
            ));
        }

        let response = self
            .client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(pkce_verifier)
            .request_async(async_http_client)
            .await
            .map_err(|e| AttendanceError::Auth(format!("Code exchange failed: {}", e)))?;

        let tokens = token_set(&response);
        self.save(&tokens)?;
        tracing::info!(path = %self.cache_path.display(), "google tokens cached");

        Ok(tokens)
    }

    /// A usable access token, refreshing the cached one if it is about to expire
    pub async fn access_token(&self) -> AttendanceResult<String> {
        let tokens = self.load_cached()?.ok_or_else(|| {
            AttendanceError::Auth("Not authenticated. Run 'attend oauth login' first.".to_string())
        })?;

        if !tokens.needs_refresh(Utc::now()) {
            return Ok(tokens.access_token);
        }

        let refresh = tokens.refresh_token.ok_or_else(|| {
            AttendanceError::Auth(
                "Access token expired and no refresh token is cached. \
                 Run 'attend oauth login' again."
                    .to_string(),
            )
        })?;

        tracing::debug!("refreshing google access token");
        let response = self
            .client
            .exchange_refresh_token(&RefreshToken::new(refresh.clone()))
            .request_async(async_http_client)
            .await
            .map_err(|e| AttendanceError::Auth(format!("Token refresh failed: {}", e)))?;

        // Google usually omits the refresh token on refresh
        let mut refreshed = token_set(&response);
        if refreshed.refresh_token.is_none() {
            refreshed.refresh_token = Some(refresh);
        }
        self.save(&refreshed)?;

        Ok(refreshed.access_token)
    }

    pub fn load_cached(&self) -> AttendanceResult<Option<TokenSet>> {
        if !self.cache_path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.cache_path)?;
        Ok(Some(serde_json::from_str(&contents)?))
    }

    pub fn save(&self, tokens: &TokenSet) -> AttendanceResult<()> {
        if let Some(parent) = self.cache_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.cache_path, serde_json::to_string_pretty(tokens)?)?;
        Ok(())
    }

    /// Forget cached tokens; returns false if none were cached
    pub fn logout(&self) -> AttendanceResult<bool> {
        if !self.cache_path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&self.cache_path)?;
        Ok(true)
    }
}

fn token_set(response: &BasicTokenResponse) -> TokenSet {
    TokenSet {
        access_token: response.access_token().secret().clone(),
        refresh_token: response.refresh_token().map(|t| t.secret().clone()),
        expires_at: response
            .expires_in()
            .and_then(|d| chrono::Duration::from_std(d).ok())
            .map(|d| Utc::now() + d),
    }
}

/// Accept one redirect on the loopback port and pull `code` and `state` out of it
async fn wait_for_callback(port: u16) -> AttendanceResult<(String, String)> {
    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    let (stream, _) = listener.accept().await?;

    let mut reader = BufReader::new(stream);
    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    let path = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| AttendanceError::Auth("Invalid OAuth callback request".to_string()))?;
    let url = Url::parse(&format!("http://localhost{}", path)).map_err(auth_err)?;

    let param = |name: &str| {
        url.query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.to_string())
    };

    let body = if param("error").is_some() {
        "Authentication was declined. You can close this window."
    } else {
        "Authentication successful! You can close this window and return to the terminal."
    };
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nConnection: close\r\n\r\n{}",
        body
    );
    let mut stream = reader.into_inner();
    stream.write_all(response.as_bytes()).await?;

    if let Some(error) = param("error") {
        return Err(AttendanceError::Auth(format!("Consent denied: {}", error)));
    }

    let code = param("code")
        .ok_or_else(|| AttendanceError::Auth("No code in OAuth callback".to_string()))?;
    let state = param("state")
        .ok_or_else(|| AttendanceError::Auth("No state in OAuth callback".to_string()))?;

    Ok((code, state))
}
