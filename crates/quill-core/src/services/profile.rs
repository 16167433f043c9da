use std::sync::Arc;

use crate::domain::Profile;
use crate::error::{DomainError, DomainResult};
use crate::ports::{BaseRepository, ProfileRepository, UserRepository};
use crate::validation;

pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
    users: Arc<dyn UserRepository>,
}

impl ProfileService {
    pub fn new(profiles: Arc<dyn ProfileRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { profiles, users }
    }

    /// The stored profile of a user, or an empty unsaved one.
    pub async fn profile_for(&self, user_id: i64) -> DomainResult<Profile> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;

        Ok(self
            .profiles
            .find_by_user_id(user_id)
            .await?
            .unwrap_or_else(|| Profile::empty(user_id)))
    }

    /// Create or replace the profile of a user. There is never more than one.
    pub async fn save_profile(
        &self,
        user_id: i64,
        bio: Option<String>,
        description: Option<String>,
    ) -> DomainResult<Profile> {
        self.update_profile(user_id, None, bio, description).await
    }

    /// Optionally rename the user, then save their profile.
    ///
    /// Name, bio and description are all validated before anything is
    /// written, so a rejected request leaves the account untouched.
    pub async fn update_profile(
        &self,
        user_id: i64,
        name: Option<&str>,
        bio: Option<String>,
        description: Option<String>,
    ) -> DomainResult<Profile> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", user_id))?;
        let existing = self
            .profiles
            .find_by_user_id(user_id)
            .await?
            .unwrap_or_else(|| Profile::empty(user_id));
        let profile = Profile {
            id: existing.id,
            user_id,
            bio: non_blank(bio),
            description: non_blank(description),
        };

        let mut result = validation::validate_profile(&profile);
        let rename = name.map(str::trim).filter(|n| !n.is_empty());
        if let Some(name) = rename {
            user.name = name.to_string();
            result.merge(validation::validate_user(&user));
        }
        result.into_result()?;

        if rename.is_some() {
            self.users.save(user).await?;
        }
        Ok(self.profiles.save(profile).await?)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
