//! User Repository

use super::{BaseRepository, RepoError, RepoResult, parse_id};
use crate::db::models::{User, UserCreate, UserRole};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "user";

#[derive(Clone)]
pub struct UserRepository {
    base: BaseRepository,
}

impl UserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find user by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<User>> {
        let thing = parse_id(TABLE, id)?;
        let user: Option<User> = self.base.db().select(thing).await?;
        Ok(user)
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let username_owned = username.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM user WHERE username = $username LIMIT 1")
            .bind(("username", username_owned))
            .await?;
        let users: Vec<User> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user
    pub async fn create(&self, data: UserCreate) -> RepoResult<User> {
        if data.username.trim().is_empty() {
            return Err(RepoError::Validation("Username is required".to_string()));
        }
        if data.password.len() < 6 {
            return Err(RepoError::Validation(
                "Password must be at least 6 characters".to_string(),
            ));
        }
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                data.username
            )));
        }

        let hash_pass = User::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE user SET
                    username = $username,
                    hash_pass = $hash_pass,
                    role = $role,
                    is_active = true
                RETURN AFTER"#,
            )
            .bind(("username", data.username.trim().to_string()))
            .bind(("hash_pass", hash_pass))
            .bind(("role", data.role))
            .await?;

        let created: Option<User> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create user".to_string()))
    }

    /// Seed the default admin account on first start
    pub async fn ensure_admin(&self, username: &str, password: &str) -> RepoResult<()> {
        if self.find_by_username(username).await?.is_none() {
            self.create(UserCreate {
                username: username.to_string(),
                password: password.to_string(),
                role: UserRole::Admin,
            })
            .await?;
            tracing::info!(username, "Seeded default admin user");
        }
        Ok(())
    }
}
