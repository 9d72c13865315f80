//! Device-local profile state repository

use libsql::Connection;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::models::{CustomExerciseRegistry, LocalProfile, User};

const SYNC_CODE_KEY: &str = "sync_code";
const CURRENT_USER_KEY: &str = "current_user";
const USERS_KEY: &str = "users";
const CUSTOM_EXERCISES_KEY: &str = "custom_exercises";

/// Trait for local profile storage operations (async)
#[allow(async_fn_in_trait)]
pub trait LocalStateRepository {
    /// Load the device profile; missing or unreadable keys fall back to defaults
    async fn load(&self) -> Result<LocalProfile>;

    /// Save every key of the device profile
    async fn save(&self, profile: &LocalProfile) -> Result<()>;

    async fn set_sync_code(&self, sync_code: &str) -> Result<()>;

    /// Set or clear the profile this device acts as
    async fn set_current_user(&self, user: Option<&User>) -> Result<()>;

    async fn set_users(&self, users: &[User]) -> Result<()>;

    async fn set_custom_exercises(&self, registry: &CustomExerciseRegistry) -> Result<()>;
}

/// libSQL implementation of `LocalStateRepository`
#[derive(Clone)]
pub struct LibSqlLocalStateRepository {
    conn: Connection,
}

impl LibSqlLocalStateRepository {
    /// Create a new repository with the given connection
    pub const fn new(conn: Connection) -> Self {
        Self { conn }
    }

    async fn get_value(&self, key: &str) -> Result<Option<String>> {
        let mut rows = self
            .conn
            .query("SELECT value FROM local_state WHERE key = ?", [key])
            .await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }

    async fn set_value(&self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO local_state (key, value) VALUES (?, ?)",
                [key, value],
            )
            .await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get_value(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                tracing::warn!("Ignoring unreadable local state key {key}: {error}");
                Ok(None)
            }
        }
    }

    async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set_value(key, &raw).await
    }
}

impl LocalStateRepository for LibSqlLocalStateRepository {
    async fn load(&self) -> Result<LocalProfile> {
        let mut profile = LocalProfile::default();

        if let Some(sync_code) = self.get_json::<String>(SYNC_CODE_KEY).await? {
            if !sync_code.trim().is_empty() {
                profile.sync_code = sync_code;
            }
        }
        profile.current_user = self
            .get_json::<Option<User>>(CURRENT_USER_KEY)
            .await?
            .flatten();
        if let Some(users) = self.get_json(USERS_KEY).await? {
            profile.users = users;
        }
        if let Some(registry) = self.get_json(CUSTOM_EXERCISES_KEY).await? {
            profile.custom_exercises = registry;
        }

        Ok(profile)
    }

    async fn save(&self, profile: &LocalProfile) -> Result<()> {
        self.set_sync_code(&profile.sync_code).await?;
        self.set_current_user(profile.current_user.as_ref()).await?;
        self.set_users(&profile.users).await?;
        self.set_custom_exercises(&profile.custom_exercises).await?;
        Ok(())
    }

    async fn set_sync_code(&self, sync_code: &str) -> Result<()> {
        self.set_json(SYNC_CODE_KEY, sync_code).await
    }

    async fn set_current_user(&self, user: Option<&User>) -> Result<()> {
        self.set_json(CURRENT_USER_KEY, &user).await
    }

    async fn set_users(&self, users: &[User]) -> Result<()> {
        self.set_json(USERS_KEY, users).await
    }

    async fn set_custom_exercises(&self, registry: &CustomExerciseRegistry) -> Result<()> {
        self.set_json(CUSTOM_EXERCISES_KEY, registry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use pretty_assertions::assert_eq;

    async fn setup() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_load_default_profile() {
        let db = setup().await;
        let repo = db.local_state();

        let profile = repo.load().await.unwrap();
        assert_eq!(profile, LocalProfile::default());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_save_and_load_profile() {
        let db = setup().await;
        let repo = db.local_state();
        let sam = User::new("Sam", "/avatars/a.jpg");
        let mut custom = CustomExerciseRegistry::default();
        custom.register("Chest", "Landmine Press");

        let profile = LocalProfile {
            sync_code: "IRONCREW".to_string(),
            current_user: Some(sam.clone()),
            users: vec![sam],
            custom_exercises: custom,
        };
        repo.save(&profile).await.unwrap();

        assert_eq!(repo.load().await.unwrap(), profile);

        repo.set_current_user(None).await.unwrap();
        let loaded = repo.load().await.unwrap();
        assert!(loaded.current_user.is_none());
        assert_eq!(loaded.users.len(), 1);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_malformed_values_fall_back_to_defaults() {
        let db = setup().await;
        let repo = db.local_state();
        repo.set_value(USERS_KEY, "not json").await.unwrap();
        repo.set_value(SYNC_CODE_KEY, "\"  \"").await.unwrap();

        let profile = repo.load().await.unwrap();
        assert!(profile.users.is_empty());
        assert_eq!(profile.sync_code, "SHARED");
    }
}
