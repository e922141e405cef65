use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Google rotates the securetoken signing keys well outside this window.
const KEY_CACHE_TTL_SECS: u64 = 3600;

/// Errors that can occur while authenticating a request
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("No token provided")]
    MissingToken,

    #[error("Invalid token format")]
    InvalidFormat,

    #[error("Token verification failed: {0}")]
    Verification(String),

    #[error("Failed to fetch signing keys: {0}")]
    KeyFetch(String),

    #[error("Unknown signing key: {0}")]
    UnknownKey(String),
}

/// Claims of a Firebase ID token we care about
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
}

/// An authenticated subject resolved from a verified bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub uid: String,
}

#[derive(Debug, Deserialize)]
struct JwkKey {
    kid: String,
    n: String,
    e: String,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<JwkKey>,
}

/// Verifies Firebase ID tokens against Google's securetoken JWKS.
///
/// Signing keys are cached by `kid`; a miss refetches the whole key
/// set, so key rotation is picked up on the first token signed with a
/// fresh key.
pub struct FirebaseTokenVerifier {
    client: Client,
    project_id: String,
    jwks_url: String,
    keys: moka::future::Cache<String, Arc<JwkKey>>,
}

impl FirebaseTokenVerifier {
    pub fn new(project_id: String, jwks_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        let keys = moka::future::CacheBuilder::new(16)
            .time_to_live(Duration::from_secs(KEY_CACHE_TTL_SECS))
            .build();

        Self {
            client,
            project_id,
            jwks_url,
            keys,
        }
    }

    /// Verify a bearer token and resolve the acting subject.
    ///
    /// Checks the RS256 signature against Google's published keys and
    /// validates audience and issuer for the configured project.
    pub async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let header =
            decode_header(token).map_err(|e| AuthError::Verification(e.to_string()))?;

        let kid = header.kid.ok_or(AuthError::InvalidFormat)?;
        let key = self.signing_key(&kid).await?;

        let decoding_key = DecodingKey::from_rsa_components(&key.n, &key.e)
            .map_err(|e| AuthError::Verification(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[format!(
            "https://securetoken.google.com/{}",
            self.project_id
        )]);

        let data = decode::<IdTokenClaims>(token, &decoding_key, &validation)
            .map_err(|e| AuthError::Verification(e.to_string()))?;

        if data.claims.sub.is_empty() {
            return Err(AuthError::Verification("Empty subject claim".to_string()));
        }

        Ok(AuthenticatedUser {
            uid: data.claims.sub,
        })
    }

    async fn signing_key(&self, kid: &str) -> Result<Arc<JwkKey>, AuthError> {
        if let Some(key) = self.keys.get(kid).await {
            return Ok(key);
        }

        let fetched = self.fetch_keys().await?;
        for (kid, key) in &fetched {
            self.keys.insert(kid.clone(), key.clone()).await;
        }

        fetched
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::UnknownKey(kid.to_string()))
    }

    async fn fetch_keys(&self) -> Result<HashMap<String, Arc<JwkKey>>, AuthError> {
        tracing::debug!("Fetching securetoken signing keys from {}", self.jwks_url);

        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::KeyFetch(format!(
                "JWKS endpoint returned {}",
                response.status()
            )));
        }

        let set: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        Ok(set
            .keys
            .into_iter()
            .map(|key| (key.kid.clone(), Arc::new(key)))
            .collect())
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
///
/// A missing header and a header without a token part are reported
/// separately, matching the messages clients already rely on.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;

    let token = header
        .split(' ')
        .nth(1)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidFormat)?;

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        let token = extract_bearer(Some("Bearer abc.def.ghi")).unwrap();
        assert_eq!(token, "abc.def.ghi");
    }

    #[test]
    fn test_extract_bearer_missing_header() {
        let err = extract_bearer(None).unwrap_err();
        assert!(matches!(err, AuthError::MissingToken));
        assert_eq!(err.to_string(), "No token provided");
    }

    #[test]
    fn test_extract_bearer_malformed_header() {
        let err = extract_bearer(Some("Bearer")).unwrap_err();
        assert!(matches!(err, AuthError::InvalidFormat));
        assert_eq!(err.to_string(), "Invalid token format");

        let err = extract_bearer(Some("Bearer ")).unwrap_err();
        assert!(matches!(err, AuthError::InvalidFormat));
    }

    #[tokio::test]
    async fn test_verify_rejects_garbage_token() {
        let verifier = FirebaseTokenVerifier::new(
            "test-project".to_string(),
            "https://jwks.invalid/keys".to_string(),
        );

        // Not a JWT at all: fails at header decoding, before any key fetch
        let err = verifier.verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, AuthError::Verification(_)));
    }

    #[tokio::test]
    async fn test_verify_rejects_token_without_kid() {
        let verifier = FirebaseTokenVerifier::new(
            "test-project".to_string(),
            "https://jwks.invalid/keys".to_string(),
        );

        // Valid JWT structure ({"alg":"RS256"} header, no kid), junk signature
        let token = "eyJhbGciOiJSUzI1NiJ9.eyJzdWIiOiJ1MSJ9.c2ln";
        let err = verifier.verify(token).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidFormat));
    }

    #[tokio::test]
    async fn test_unknown_kid_after_key_fetch() {
        let mut server = mockito::Server::new_async().await;
        let _jwks = server
            .mock("GET", "/keys")
            .with_status(200)
            .with_body(r#"{"keys": [{"kid": "other", "n": "AQAB", "e": "AQAB", "kty": "RSA"}]}"#)
            .create_async()
            .await;

        let verifier = FirebaseTokenVerifier::new(
            "test-project".to_string(),
            format!("{}/keys", server.url()),
        );

        // Header carries kid "missing", which the JWKS does not serve
        let token = "eyJhbGciOiJSUzI1NiIsImtpZCI6Im1pc3NpbmcifQ.eyJzdWIiOiJ1MSJ9.c2ln";
        let err = verifier.verify(token).await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownKey(_)));
    }
}
