use crate::error::AuthError;
use chrono::{DateTime, Utc};
use oauth2::basic::{BasicClient, BasicTokenResponse};
use oauth2::reqwest::async_http_client;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, PkceCodeChallenge,
    PkceCodeVerifier, RedirectUrl, RefreshToken, Scope, TokenResponse, TokenUrl,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info, warn};
use url::Url;

const SCOPE: &str = "https://www.googleapis.com/auth/youtube.readonly";
const REDIRECT_PORT: u16 = 8080;
/// Tokens this close to expiry are treated as expired.
const EXPIRY_SKEW_SECS: i64 = 60;
const CONSENT_TIMEOUT: Duration = Duration::from_secs(300);

const WEB_CREDENTIAL_HELP: &str = "You are using a 'Web Application' credential. \
Local tools need a 'Desktop app' credential: open https://console.cloud.google.com/apis/credentials, \
create an 'OAuth client ID' of type 'Desktop app', download the JSON and save it as the client secrets file.";

/// How authentication ended. The caller decides how to report each case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Ready(String),
    CredentialError(String),
    SetupRequired(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialKind {
    Installed,
    Web,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OAuthApp {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

#[derive(Debug, Deserialize)]
struct ClientSecretsFile {
    installed: Option<OAuthApp>,
    web: Option<OAuthApp>,
}

pub fn parse_client_secrets(text: &str) -> Result<(OAuthApp, CredentialKind), AuthError> {
    let secrets: ClientSecretsFile = serde_json::from_str(text)?;
    match (secrets.installed, secrets.web) {
        (Some(app), _) => Ok((app, CredentialKind::Installed)),
        (None, Some(app)) => Ok((app, CredentialKind::Web)),
        (None, None) => Err(AuthError::MalformedSecrets),
    }
}

pub fn oauth_client(app: &OAuthApp, redirect_uri: &str) -> Result<BasicClient, AuthError> {
    Ok(BasicClient::new(
        ClientId::new(app.client_id.clone()),
        Some(ClientSecret::new(app.client_secret.clone())),
        AuthUrl::new(app.auth_uri.clone())?,
        Some(TokenUrl::new(app.token_uri.clone())?),
    )
    .set_redirect_uri(RedirectUrl::new(redirect_uri.to_string())?))
}

/// Consent page URL plus the state and PKCE verifier the redirect must be checked against.
pub fn consent_request(client: &BasicClient) -> (Url, CsrfToken, PkceCodeVerifier) {
    let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

    let (auth_url, csrf_token) = client
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::new(SCOPE.to_string()))
        .add_extra_param("access_type", "offline")
        .add_extra_param("prompt", "consent")
        .set_pkce_challenge(pkce_challenge)
        .url();

    (auth_url, csrf_token, pkce_verifier)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    /// `None` means the expiry is unknown and the token is trusted.
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredToken {
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |expires_at| {
            now + chrono::Duration::seconds(EXPIRY_SKEW_SECS) < expires_at
        })
    }

    fn from_response(response: &BasicTokenResponse) -> Self {
        Self {
            access_token: response.access_token().secret().clone(),
            refresh_token: response.refresh_token().map(|t| t.secret().clone()),
            expires_at: response.expires_in().map(|duration| {
                Utc::now() + chrono::Duration::seconds(duration.as_secs() as i64)
            }),
        }
    }
}

/// What a request on the redirect listener amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    Code(String),
    Denied(String),
    /// Not an answer to our consent request: wrong path, no state, or a state we did not issue.
    Ignored,
}

pub fn check_redirect(request: &str, expected_state: &str) -> Redirect {
    let Some(target) = request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
    else {
        return Redirect::Ignored;
    };

    let Ok(url) = Url::parse("http://localhost").and_then(|base| base.join(target)) else {
        return Redirect::Ignored;
    };

    let mut code = None;
    let mut error = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }

    if state.as_deref() != Some(expected_state) {
        return Redirect::Ignored;
    }

    match (code, error) {
        (Some(code), _) => Redirect::Code(code),
        (None, Some(error)) => Redirect::Denied(error),
        (None, None) => Redirect::Ignored,
    }
}

/// Serves the loopback redirect until a request carrying our state arrives.
pub async fn wait_for_code(listener: &TcpListener, expected_state: &str) -> Result<String, AuthError> {
    loop {
        let (mut stream, peer) = listener.accept().await?;
        let request = read_request_head(&mut stream).await?;

        match check_redirect(&request, expected_state) {
            Redirect::Code(code) => {
                respond(&mut stream, "200 OK", "The authentication flow has completed. You may close this window.").await?;
                return Ok(code);
            }
            Redirect::Denied(reason) => {
                respond(&mut stream, "200 OK", "Authorization was denied. Return to the terminal for details.").await?;
                return Err(AuthError::Consent(reason));
            }
            Redirect::Ignored => {
                debug!("Ignoring request from {} on the redirect listener", peer);
                respond(&mut stream, "404 Not Found", "Not found").await?;
            }
        }
    }
}

async fn read_request_head(stream: &mut TcpStream) -> Result<String, AuthError> {
    let mut head = Vec::new();
    let mut buffer = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") && head.len() < 16 * 1024 {
        let read = stream.read(&mut buffer).await?;
        if read == 0 {
            break;
        }
        head.extend_from_slice(&buffer[..read]);
    }
    Ok(String::from_utf8_lossy(&head).into_owned())
}

async fn respond(stream: &mut TcpStream, status: &str, body: &str) -> Result<(), AuthError> {
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/plain; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

pub struct Authenticator {
    client_secrets: PathBuf,
    token_file: PathBuf,
}

impl Authenticator {
    pub fn new(client_secrets: impl Into<PathBuf>, token_file: impl Into<PathBuf>) -> Self {
        Self {
            client_secrets: client_secrets.into(),
            token_file: token_file.into(),
        }
    }

    pub async fn authenticate(&self) -> AuthOutcome {
        match self.try_authenticate().await {
            Ok(outcome) => outcome,
            Err(e) => AuthOutcome::CredentialError(e.to_string()),
        }
    }

    async fn try_authenticate(&self) -> Result<AuthOutcome, AuthError> {
        let cached = load_token(&self.token_file)?;
        if let Some(token) = &cached {
            if token.is_fresh(Utc::now()) {
                debug!("Using cached token from {}", self.token_file.display());
                return Ok(AuthOutcome::Ready(token.access_token.clone()));
            }
        }

        if !self.client_secrets.exists() {
            return Ok(AuthOutcome::SetupRequired(format!(
                "'{}' not found. Please download it from Google Cloud Console.",
                self.client_secrets.display()
            )));
        }

        let (app, kind) = parse_client_secrets(&std::fs::read_to_string(&self.client_secrets)?)?;
        let redirect_uri = format!("http://localhost:{}/", REDIRECT_PORT);
        let client = oauth_client(&app, &redirect_uri)?;

        if let Some(refresh_token) = cached.and_then(|t| t.refresh_token) {
            match refresh(&client, &refresh_token).await {
                Ok(token) => {
                    save_token(&self.token_file, &token)?;
                    info!("Refreshed access token");
                    return Ok(AuthOutcome::Ready(token.access_token));
                }
                Err(e) => warn!("Token refresh failed, asking for consent again: {}", e),
            }
        }

        if kind == CredentialKind::Web {
            warn!("{}", WEB_CREDENTIAL_HELP);
        }

        let token = self.consent(&client).await?;
        save_token(&self.token_file, &token)?;
        Ok(AuthOutcome::Ready(token.access_token))
    }

    /// Sends the user to the consent page and exchanges the code from the local redirect.
    async fn consent(&self, client: &BasicClient) -> Result<StoredToken, AuthError> {
        let listener = TcpListener::bind(("127.0.0.1", REDIRECT_PORT)).await?;
        let (auth_url, csrf_token, pkce_verifier) = consent_request(client);

        println!("Please visit this URL to authorize this application:");
        println!("{}", auth_url);

        let code = tokio::time::timeout(CONSENT_TIMEOUT, wait_for_code(&listener, csrf_token.secret()))
            .await
            .map_err(|_| AuthError::Consent("timed out waiting for the browser".to_string()))??;

        let response = client
            .exchange_code(AuthorizationCode::new(code))
            .set_pkce_verifier(pkce_verifier)
            .request_async(async_http_client)
            .await
            .map_err(|e| AuthError::TokenRejected(e.to_string()))?;

        Ok(StoredToken::from_response(&response))
    }
}

async fn refresh(client: &BasicClient, refresh_token: &str) -> Result<StoredToken, AuthError> {
    let response = client
        .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
        .request_async(async_http_client)
        .await
        .map_err(|e| AuthError::TokenRejected(e.to_string()))?;

    let mut token = StoredToken::from_response(&response);
    // Refresh responses usually omit the refresh token itself.
    token
        .refresh_token
        .get_or_insert_with(|| refresh_token.to_string());
    Ok(token)
}

fn load_token(path: &Path) -> Result<Option<StoredToken>, AuthError> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)?;
    match serde_json::from_str(&text) {
        Ok(token) => Ok(Some(token)),
        Err(e) => {
            warn!("Ignoring unreadable token file {}: {}", path.display(), e);
            Ok(None)
        }
    }
}

fn save_token(path: &Path, token: &StoredToken) -> Result<(), AuthError> {
    std::fs::write(path, serde_json::to_string_pretty(token)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INSTALLED: &str = r#"{"installed": {"client_id": "id", "client_secret": "secret",
        "auth_uri": "https://accounts.google.com/o/oauth2/auth",
        "token_uri": "https://oauth2.googleapis.com/token"}}"#;

    fn query(url: &Url) -> Vec<(String, String)> {
        url.query_pairs().into_owned().collect()
    }

    #[test]
    fn test_parse_installed_secrets() -> Result<(), AuthError> {
        let (app, kind) = parse_client_secrets(INSTALLED)?;
        assert_eq!(kind, CredentialKind::Installed);
        assert_eq!(app.client_id, "id");
        Ok(())
    }

    #[test]
    fn test_parse_web_secrets_with_default_uris() -> Result<(), AuthError> {
        let (app, kind) =
            parse_client_secrets(r#"{"web": {"client_id": "w", "client_secret": "s"}}"#)?;
        assert_eq!(kind, CredentialKind::Web);
        assert_eq!(app.token_uri, "https://oauth2.googleapis.com/token");
        Ok(())
    }

    #[test]
    fn test_parse_secrets_without_section() {
        assert!(matches!(
            parse_client_secrets("{}"),
            Err(AuthError::MalformedSecrets)
        ));
    }

    #[test]
    fn test_consent_url_carries_state_pkce_and_scope() -> Result<(), AuthError> {
        let (app, _) = parse_client_secrets(INSTALLED)?;
        let client = oauth_client(&app, "http://localhost:8080/")?;
        let (url, csrf_token, _) = consent_request(&client);

        let pairs = query(&url);
        assert!(pairs.contains(&("state".to_string(), csrf_token.secret().clone())));
        assert!(pairs.contains(&("scope".to_string(), SCOPE.to_string())));
        assert!(pairs.contains(&("code_challenge_method".to_string(), "S256".to_string())));
        assert!(pairs.iter().any(|(k, _)| k == "code_challenge"));
        assert!(pairs.contains(&("access_type".to_string(), "offline".to_string())));
        Ok(())
    }

    #[test]
    fn test_redirect_with_matching_state() {
        let request = "GET /?state=s1&code=4%2F0Abc&scope=youtube HTTP/1.1\r\nHost: localhost:8080\r\n\r\n";
        assert_eq!(check_redirect(request, "s1"), Redirect::Code("4/0Abc".to_string()));
    }

    #[test]
    fn test_redirect_with_foreign_or_missing_state_is_ignored() {
        assert_eq!(
            check_redirect("GET /?code=forged HTTP/1.1\r\n\r\n", "s1"),
            Redirect::Ignored
        );
        assert_eq!(
            check_redirect("GET /?code=forged&state=other HTTP/1.1\r\n\r\n", "s1"),
            Redirect::Ignored
        );
        assert_eq!(
            check_redirect("GET /favicon.ico HTTP/1.1\r\n\r\n", "s1"),
            Redirect::Ignored
        );
        assert_eq!(check_redirect("", "s1"), Redirect::Ignored);
    }

    #[test]
    fn test_denied_redirect() {
        assert_eq!(
            check_redirect("GET /?error=access_denied&state=s1 HTTP/1.1\r\n\r\n", "s1"),
            Redirect::Denied("access_denied".to_string())
        );
    }

    #[tokio::test]
    async fn test_listener_skips_stray_and_forged_requests() -> Result<(), AuthError> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;

        let browser = tokio::spawn(async move {
            for target in ["/favicon.ico", "/?code=forged&state=wrong", "/?code=real&state=s1"] {
                let mut stream = TcpStream::connect(addr).await?;
                stream
                    .write_all(format!("GET {} HTTP/1.1\r\nHost: localhost\r\n\r\n", target).as_bytes())
                    .await?;
                let mut reply = Vec::new();
                stream.read_to_end(&mut reply).await?;
            }
            Ok::<_, std::io::Error>(())
        });

        let code = wait_for_code(&listener, "s1").await?;
        assert_eq!(code, "real");
        assert!(browser.await.is_ok());
        Ok(())
    }

    #[test]
    fn test_token_freshness() {
        let now = Utc::now();
        let token = StoredToken {
            access_token: "a".to_string(),
            refresh_token: None,
            expires_at: Some(now + chrono::Duration::seconds(100)),
        };
        assert!(token.is_fresh(now));
        assert!(!token.is_fresh(now + chrono::Duration::seconds(50)));
        assert!(StoredToken {
            expires_at: None,
            ..token
        }
        .is_fresh(now));
    }

    #[test]
    fn test_stored_token_round_trips_expiry() -> Result<(), AuthError> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("token.json");
        let token = StoredToken {
            access_token: "a".to_string(),
            refresh_token: Some("r".to_string()),
            expires_at: Some(Utc::now()),
        };

        save_token(&path, &token)?;
        assert_eq!(load_token(&path)?, Some(token));
        Ok(())
    }
}
