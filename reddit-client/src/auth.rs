//! Application-only OAuth2 (client credentials) for the Reddit API.

use mood_core::{ConfigError, CoreError, RedditApiError, RedditCredentials};
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, ClientId, ClientSecret, HttpRequest, HttpResponse, RequestTokenError, TokenResponse,
    TokenUrl,
};
use reqwest::Client;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Tokens are refreshed this long before Reddit says they expire.
pub const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);
const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }
}

pub struct RedditAuthenticator {
    oauth: BasicClient,
    http_client: Client,
    token: Mutex<Option<CachedToken>>,
}

impl RedditAuthenticator {
    /// `http_client` must already carry the Reddit user agent; the token
    /// endpoint rejects anonymous agents.
    pub fn new(
        credentials: &RedditCredentials,
        auth_base_url: &str,
        http_client: Client,
    ) -> Result<Self, CoreError> {
        let base = auth_base_url.trim_end_matches('/');
        let auth_url = AuthUrl::new(format!("{base}/api/v1/authorize")).map_err(|_| {
            ConfigError::InvalidValue {
                field: "auth_base_url".to_string(),
                value: auth_base_url.to_string(),
            }
        })?;
        let token_url = TokenUrl::new(format!("{base}/api/v1/access_token")).map_err(|_| {
            ConfigError::InvalidValue {
                field: "auth_base_url".to_string(),
                value: auth_base_url.to_string(),
            }
        })?;

        let oauth = BasicClient::new(
            ClientId::new(credentials.client_id.clone()),
            Some(ClientSecret::new(credentials.client_secret.clone())),
            auth_url,
            Some(token_url),
        );

        Ok(Self {
            oauth,
            http_client,
            token: Mutex::new(None),
        })
    }

    /// A bearer token, reusing the cached one until it nears expiry.
    pub async fn access_token(&self) -> Result<String, CoreError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh()) {
            return Ok(token.access_token.clone());
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    /// Drop the cached token so the next call authenticates again.
    pub async fn invalidate(&self) {
        if self.token.lock().await.take().is_some() {
            debug!("Cached access token invalidated");
        }
    }

    async fn request_token(&self) -> Result<CachedToken, CoreError> {
        debug!("Requesting application-only access token");
        let response = self
            .oauth
            .exchange_client_credentials()
            .request_async(|request| send_token_request(&self.http_client, request))
            .await
            .map_err(|e| match e {
                RequestTokenError::Request(e) if e.is_timeout() => {
                    CoreError::RedditApi(RedditApiError::RequestTimeout)
                }
                RequestTokenError::Request(e) => CoreError::Network(e),
                RequestTokenError::ServerResponse(response) => {
                    CoreError::RedditApi(RedditApiError::AuthenticationFailed {
                        reason: response.to_string(),
                    })
                }
                RequestTokenError::Parse(e, _) => {
                    CoreError::RedditApi(RedditApiError::AuthenticationFailed {
                        reason: format!("unexpected token response: {e}"),
                    })
                }
                RequestTokenError::Other(reason) => {
                    CoreError::RedditApi(RedditApiError::AuthenticationFailed { reason })
                }
            });

        let response = match response {
            Ok(response) => response,
            Err(error) => {
                warn!("Reddit authentication failed: {}", error);
                return Err(error);
            }
        };

        let lifetime = response.expires_in().unwrap_or(DEFAULT_TOKEN_LIFETIME);
        info!("Authenticated with Reddit, token valid for {}s", lifetime.as_secs());

        Ok(CachedToken {
            access_token: response.access_token().secret().clone(),
            expires_at: Instant::now() + lifetime,
        })
    }
}

async fn send_token_request(
    client: &Client,
    request: HttpRequest,
) -> Result<HttpResponse, reqwest::Error> {
    let response = client
        .request(request.method, request.url.as_str())
        .headers(request.headers)
        .body(request.body)
        .send()
        .await?;

    let status_code = response.status();
    let headers = response.headers().clone();
    let body = response.bytes().await?.to_vec();

    Ok(HttpResponse {
        status_code,
        headers,
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> RedditCredentials {
        RedditCredentials {
            client_id: "id".to_string(),
            client_secret: "secret".to_string(),
            user_agent: "test-agent/1.0".to_string(),
        }
    }

    #[test]
    fn test_invalid_auth_base_url() {
        let result = RedditAuthenticator::new(&credentials(), "not a url", Client::new());
        assert!(matches!(
            result,
            Err(CoreError::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_token_freshness() {
        let expiring = CachedToken {
            access_token: "t".to_string(),
            expires_at: Instant::now() + Duration::from_secs(30),
        };
        assert!(!expiring.is_fresh());

        let fresh = CachedToken {
            access_token: "t".to_string(),
            expires_at: Instant::now() + Duration::from_secs(3600),
        };
        assert!(fresh.is_fresh());
    }

    #[tokio::test]
    async fn test_invalidate_without_token() {
        let auth =
            RedditAuthenticator::new(&credentials(), "https://www.reddit.com", Client::new())
                .unwrap();
        auth.invalidate().await;
        assert!(auth.token.lock().await.is_none());
    }
}
