//! Authentication ports.
//!
//! Sign-in itself happens at the external identity provider; the application
//! only validates the bearer token it receives and reads the identity out of it.

use crate::domain::User;

/// Identity carried by a validated token.
#[derive(Debug, Clone, Default)]
pub struct TokenClaims {
    pub subject: String,
    pub email: String,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub preferred_username: Option<String>,
    pub roles: Vec<String>,
    pub exp: i64,
    /// Signed by the identity provider rather than issued by the local login path.
    pub from_provider: bool,
}

impl TokenClaims {
    /// Given + family name, else the preferred username, else the email local part.
    pub fn display_name(&self) -> String {
        let full_name = [self.given_name.as_deref(), self.family_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full_name.is_empty() {
            return full_name;
        }

        if let Some(username) = self.preferred_username.as_deref().map(str::trim) {
            if !username.is_empty() {
                return username.to_string();
            }
        }

        self.email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_string()
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }
}

/// Token service trait for JWT operations.
pub trait TokenService: Send + Sync {
    /// Issue a token for a locally authenticated user.
    fn generate_token(&self, user: &User) -> Result<String, AuthError>;

    /// Validate and decode a token.
    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError>;

    /// Lifetime of issued tokens.
    fn expiration_seconds(&self) -> i64;
}

/// Password hashing service for the local login path.
pub trait PasswordService: Send + Sync {
    /// Hash a plain text password.
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// Verify a password against a hash.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Hashing error: {0}")]
    HashingError(String),
}
