use std::sync::Arc;

use chrono::TimeDelta;

use crate::domain::{Role, User, normalize_email, timestamp_now};
use crate::error::{DomainError, DomainResult};
use crate::ports::{AuthError, BaseRepository, PasswordService, TokenClaims, UserRepository};
use crate::validation::{self, ValidationResult};

use super::{AuthContext, for_entity};

/// `last_login_at` is refreshed at most this often for token-authenticated requests.
const LAST_LOGIN_REFRESH_MINUTES: i64 = 15;

/// Accounts: identity resolution, local credentials and administration.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    passwords: Arc<dyn PasswordService>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<dyn PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Turn a validated token identity into the persisted account acting on
    /// this request, provisioning the account on first sight.
    pub async fn resolve_identity(&self, claims: &TokenClaims) -> DomainResult<AuthContext> {
        let email = normalize_email(&claims.email);
        if !validation::is_valid_email(&email) {
            tracing::warn!("Token carries no usable email claim");
            return Err(DomainError::Unauthorized);
        }

        let mut user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                let mut user = User::new(&email, &claims.display_name());
                // Only the provider is trusted to grant roles.
                if claims.from_provider && claims.has_role("admin") {
                    user.role = Role::Admin;
                }
                tracing::info!(role = user.role.as_str(), "Provisioning account for new identity");
                user
            }
        };

        if !user.active {
            return Err(DomainError::Forbidden("account is deactivated".to_string()));
        }

        let now = timestamp_now();
        let stale = user
            .last_login_at
            .is_none_or(|at| now - at > TimeDelta::minutes(LAST_LOGIN_REFRESH_MINUTES));
        let missing_subject = user.external_subject.is_none() && !claims.subject.is_empty();

        if user.id.is_none() || stale || missing_subject {
            if missing_subject {
                user.external_subject = Some(claims.subject.clone());
            }
            user.last_login_at = Some(now);
            user = self.users.save(user).await?;
        }

        AuthContext::from_user(&user)
    }

    /// Create an account on the local login path.
    pub async fn register_local(&self, email: &str, name: &str, password: &str) -> DomainResult<User> {
        let mut user = User::new(email, name);

        validate_registration(&user, password).into_result()?;

        if self.users.exists_by_email(&user.email).await? {
            return Err(DomainError::Duplicate("email already registered".to_string()));
        }

        user.password_hash = Some(self.passwords.hash(password).map_err(auth_failure)?);
        let saved = self.users.save(user).await?;
        tracing::info!(user_id = ?saved.id, "Local account registered");
        Ok(saved)
    }

    /// Check local credentials and record the login.
    pub async fn login_local(&self, email: &str, password: &str) -> DomainResult<User> {
        let mut user = self
            .users
            .find_by_email(&normalize_email(email))
            .await?
            .ok_or(DomainError::Unauthorized)?;

        let Some(hash) = user.password_hash.as_deref() else {
            return Err(DomainError::Unauthorized);
        };
        if !self.passwords.verify(password, hash).map_err(auth_failure)? {
            return Err(DomainError::Unauthorized);
        }
        if !user.active {
            return Err(DomainError::Forbidden("account is deactivated".to_string()));
        }

        user.last_login_at = Some(timestamp_now());
        Ok(self.users.save(user).await?)
    }

    pub async fn change_password(
        &self,
        actor: &AuthContext,
        old_password: &str,
        new_password: &str,
    ) -> DomainResult<()> {
        let mut user = self.get(actor.user_id).await?;
        let Some(hash) = user.password_hash.as_deref() else {
            return Err(DomainError::invalid(
                "this account signs in through the identity provider",
            ));
        };
        if !self.passwords.verify(old_password, hash).map_err(auth_failure)? {
            return Err(DomainError::invalid("current password is incorrect"));
        }
        if !validation::is_valid_password(new_password) {
            return Err(DomainError::invalid(validation::ERROR_PASSWORD_TOO_SHORT));
        }

        user.password_hash = Some(self.passwords.hash(new_password).map_err(auth_failure)?);
        self.users.save(user).await?;
        tracing::info!(user_id = actor.user_id, "Password changed");
        Ok(())
    }

    pub async fn get(&self, id: i64) -> DomainResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", id))
    }

    pub async fn update_name(&self, actor: &AuthContext, name: &str) -> DomainResult<User> {
        let mut user = self.get(actor.user_id).await?;
        user.name = name.trim().to_string();
        validation::validate_user(&user).into_result()?;
        Ok(self.users.save(user).await?)
    }

    pub async fn list_users(&self, actor: &AuthContext) -> DomainResult<Vec<User>> {
        actor.require_admin()?;
        Ok(self.users.find_all().await?)
    }

    /// Admin edit of role and active flag.
    pub async fn update_account(
        &self,
        actor: &AuthContext,
        id: i64,
        role: Option<Role>,
        active: Option<bool>,
    ) -> DomainResult<User> {
        actor.require_admin()?;
        if id == actor.user_id && (role == Some(Role::RegularUser) || active == Some(false)) {
            return Err(DomainError::invalid(
                "administrators cannot demote or deactivate themselves",
            ));
        }

        let mut user = self.get(id).await?;
        if let Some(role) = role {
            user.role = role;
        }
        if let Some(active) = active {
            user.active = active;
        }
        let saved = self.users.save(user).await?;
        tracing::info!(user_id = id, role = saved.role.as_str(), active = saved.active, "Account updated");
        Ok(saved)
    }

    pub async fn set_role(&self, actor: &AuthContext, id: i64, role: Role) -> DomainResult<User> {
        self.update_account(actor, id, Some(role), None).await
    }

    /// Deactivate or reactivate an account. Deactivated accounts are refused at sign-in.
    pub async fn set_active(&self, actor: &AuthContext, id: i64, active: bool) -> DomainResult<User> {
        self.update_account(actor, id, None, Some(active)).await
    }

    /// Delete an account. Accounts that still own posts or comments are
    /// refused by the store as an integrity conflict.
    pub async fn delete_user(&self, actor: &AuthContext, id: i64) -> DomainResult<()> {
        actor.require_admin()?;
        if id == actor.user_id {
            return Err(DomainError::invalid("administrators cannot delete themselves"));
        }
        self.users.delete(id).await.map_err(for_entity("User", id))?;
        tracing::info!(user_id = id, actor_id = actor.user_id, "Account deleted");
        Ok(())
    }
}

fn auth_failure(err: AuthError) -> DomainError {
    DomainError::Internal(err.to_string())
}

fn validate_registration(user: &User, password: &str) -> ValidationResult {
    let mut result = validation::validate_user(user);
    result.check(
        validation::is_valid_password(password),
        validation::ERROR_PASSWORD_TOO_SHORT,
    );
    result
}
