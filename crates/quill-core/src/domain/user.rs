use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access level of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    #[default]
    RegularUser,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::RegularUser => "REGULAR_USER",
        }
    }

    /// Parse a role name, accepting identity-provider spellings ("admin", "ROLE_ADMIN").
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_uppercase();
        match normalized.trim_start_matches("ROLE_") {
            "ADMIN" => Some(Role::Admin),
            "REGULAR_USER" | "USER" => Some(Role::RegularUser),
            _ => None,
        }
    }
}

/// User entity - represents an account in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// `None` until the user is persisted.
    pub id: Option<i64>,
    pub email: String,
    pub name: String,
    /// Only set for accounts created through the local login path.
    pub password_hash: Option<String>,
    /// `sub` claim of the external identity provider.
    pub external_subject: Option<String>,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new, not yet persisted, regular user.
    pub fn new(email: &str, name: &str) -> Self {
        Self {
            id: None,
            email: normalize_email(email),
            name: name.trim().to_string(),
            password_hash: None,
            external_subject: None,
            role: Role::RegularUser,
            active: true,
            created_at: super::timestamp_now(),
            last_login_at: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Public view of the user as shown next to posts and comments.
    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id.unwrap_or_default(),
            name: self.name.clone(),
        }
    }
}

/// Lowercased, trimmed email used as the unique account key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Email with the local part hidden, for logging (`a***@example.com`).
pub fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}

/// Author information loaded together with posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: i64,
    pub name: String,
}
