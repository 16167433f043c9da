//! JWT token service implementation.
//!
//! Tokens come either from the external identity provider (RS256, verified
//! with its public key) or from the local login path (HS256, shared secret).
//! Both carry the same OIDC-style claims.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, decode_header, encode,
};
use serde::{Deserialize, Serialize};

use quill_core::domain::User;
use quill_core::ports::{AuthError, TokenClaims, TokenService};

/// JWT token service configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
    /// Checked against the `aud` claim when set.
    pub audience: Option<String>,
    /// PEM public key of the identity provider. Enables RS256 tokens.
    pub public_key_pem: Option<String>,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            expiration_hours: 24,
            issuer: "quill".to_string(),
            audience: None,
            public_key_pem: None,
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RealmAccess {
    #[serde(default)]
    roles: Vec<String>,
}

/// `aud` is either one string or an array of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum Audience {
    One(String),
    Many(Vec<String>),
}

/// Internal JWT claims structure for serialization.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(default)]
    sub: String,
    #[serde(default)]
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    preferred_username: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    roles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    realm_access: Option<RealmAccess>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    aud: Option<Audience>,
    exp: i64,
    #[serde(default)]
    iat: i64,
    iss: String,
}

impl Claims {
    fn into_token_claims(self, from_provider: bool) -> TokenClaims {
        let mut roles = self.roles;
        if let Some(realm) = self.realm_access {
            roles.extend(realm.roles);
        }

        TokenClaims {
            subject: self.sub,
            email: self.email,
            given_name: self.given_name,
            family_name: self.family_name,
            preferred_username: self.preferred_username,
            roles,
            exp: self.exp,
            from_provider,
        }
    }
}

/// JWT-based token service.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    provider_key: Option<DecodingKey>,
    config: JwtConfig,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Result<Self, AuthError> {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());
        let provider_key = config
            .public_key_pem
            .as_deref()
            .map(|pem| DecodingKey::from_rsa_pem(pem.as_bytes()))
            .transpose()
            .map_err(|e| AuthError::InvalidToken(format!("identity provider key: {e}")))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            provider_key,
            config,
        })
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.config.issuer]);
        match &self.config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }
        validation
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, user: &User) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::hours(self.config.expiration_hours);

        let claims = Claims {
            sub: user.external_subject.clone().unwrap_or_default(),
            email: user.email.clone(),
            given_name: Some(user.name.clone()),
            family_name: None,
            preferred_username: None,
            roles: vec![user.role.as_str().to_string()],
            realm_access: None,
            aud: self.config.audience.clone().map(Audience::One),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let key = match header.alg {
            Algorithm::HS256 => &self.decoding_key,
            Algorithm::RS256 => self.provider_key.as_ref().ok_or_else(|| {
                AuthError::InvalidToken("no identity provider key configured".to_string())
            })?,
            other => {
                return Err(AuthError::InvalidToken(format!(
                    "unsupported algorithm {other:?}"
                )));
            }
        };

        let token_data =
            decode::<Claims>(token, key, &self.validation(header.alg)).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken(e.to_string()),
                }
            })?;

        Ok(token_data
            .claims
            .into_token_claims(header.alg == Algorithm::RS256))
    }

    fn expiration_seconds(&self) -> i64 {
        self.config.expiration_hours * 3600
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_core::domain::Role;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key".to_string(),
            expiration_hours: 1,
            issuer: "test-issuer".to_string(),
            ..Default::default()
        }
    }

    fn user() -> User {
        let mut user = User::new("test@example.com", "Test User");
        user.id = Some(1);
        user.role = Role::Admin;
        user
    }

    #[test]
    fn test_generate_token_success() {
        let service = JwtTokenService::new(test_config()).unwrap();

        let token = service.generate_token(&user()).unwrap();

        assert!(!token.is_empty());
    }

    #[test]
    fn test_validate_token_success() {
        let service = JwtTokenService::new(test_config()).unwrap();

        let token = service.generate_token(&user()).unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.display_name(), "Test User");
        assert!(claims.has_role("admin"));
    }

    #[test]
    fn test_realm_access_roles_are_merged() {
        let service = JwtTokenService::new(test_config()).unwrap();
        let exp = (Utc::now() + TimeDelta::hours(1)).timestamp();
        let payload = serde_json::json!({
            "sub": "f3a1",
            "email": "ada@example.com",
            "preferred_username": "ada",
            "realm_access": { "roles": ["admin", "offline_access"] },
            "exp": exp,
            "iss": "test-issuer",
        });
        let token = sign(&payload);

        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.subject, "f3a1");
        assert_eq!(claims.display_name(), "ada");
        assert!(claims.has_role("admin"));
    }

    fn sign(payload: &serde_json::Value) -> String {
        encode(
            &Header::default(),
            payload,
            &EncodingKey::from_secret(b"test-secret-key"),
        )
        .unwrap()
    }

    #[test]
    fn test_audience_array_is_accepted() {
        let service = JwtTokenService::new(JwtConfig {
            audience: Some("quill-web".to_string()),
            ..test_config()
        })
        .unwrap();
        let exp = (Utc::now() + TimeDelta::hours(1)).timestamp();
        let token = sign(&serde_json::json!({
            "sub": "kc-7",
            "email": "grace@example.com",
            "aud": ["quill-web", "account"],
            "exp": exp,
            "iss": "test-issuer",
        }));

        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.email, "grace@example.com");
    }

    #[test]
    fn test_audience_array_without_our_client_is_rejected() {
        let service = JwtTokenService::new(JwtConfig {
            audience: Some("quill-web".to_string()),
            ..test_config()
        })
        .unwrap();
        let exp = (Utc::now() + TimeDelta::hours(1)).timestamp();
        let token = sign(&serde_json::json!({
            "email": "grace@example.com",
            "aud": ["account"],
            "exp": exp,
            "iss": "test-issuer",
        }));

        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn test_local_tokens_are_not_from_provider() {
        let service = JwtTokenService::new(test_config()).unwrap();

        let token = service.generate_token(&user()).unwrap();

        assert!(!service.validate_token(&token).unwrap().from_provider);
    }

    #[test]
    fn test_validate_invalid_token() {
        let service = JwtTokenService::new(test_config()).unwrap();

        let result = service.validate_token("invalid-token");

        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_validate_wrong_issuer_token() {
        let service1 = JwtTokenService::new(JwtConfig {
            issuer: "issuer1".to_string(),
            ..test_config()
        })
        .unwrap();
        let service2 = JwtTokenService::new(JwtConfig {
            issuer: "issuer2".to_string(),
            ..test_config()
        })
        .unwrap();

        let token = service1.generate_token(&user()).unwrap();

        assert!(service2.validate_token(&token).is_err());
    }

    #[test]
    fn test_audience_is_checked_when_configured() {
        let issuing = JwtTokenService::new(JwtConfig {
            audience: Some("other-client".to_string()),
            ..test_config()
        })
        .unwrap();
        let checking = JwtTokenService::new(JwtConfig {
            audience: Some("quill-web".to_string()),
            ..test_config()
        })
        .unwrap();

        let token = issuing.generate_token(&user()).unwrap();

        assert!(checking.validate_token(&token).is_err());
        assert!(issuing.validate_token(&token).is_ok());
    }

    #[test]
    fn test_rs256_rejected_without_provider_key() {
        let service = JwtTokenService::new(test_config()).unwrap();
        // header {"alg":"RS256","typ":"JWT"}, payload {}, bogus signature
        let token = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.e30.c2ln";

        assert!(matches!(
            service.validate_token(token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_expiration_seconds() {
        let service = JwtTokenService::new(JwtConfig {
            expiration_hours: 24,
            ..test_config()
        })
        .unwrap();

        assert_eq!(service.expiration_seconds(), 86400);
    }
}
