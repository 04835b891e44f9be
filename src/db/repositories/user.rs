use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, SqlErr,
};

use crate::entities::users;

/// User data returned from repository (without the password digest)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub username: String,
    pub profile_pic: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            username: model.username,
            profile_pic: model.profile_pic,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Column values for a locally registered account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Outcome of an insert attempt; duplicates are reported, not raised,
/// so callers can turn them into a conflict instead of a server error.
#[derive(Debug, Clone)]
pub enum InsertUser {
    Created(User),
    DuplicateEmail,
    DuplicateUsername,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> Result<Option<User>> {
        let user = users::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query user by ID")?;

        Ok(user.map(User::from))
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(User::from))
    }

    /// Get user by username together with the stored digest (for login).
    /// The digest is `None` for identity-provider accounts.
    pub async fn get_by_username_with_digest(
        &self,
        username: &str,
    ) -> Result<Option<(User, Option<String>)>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(|u| {
            let digest = u.password_hash.clone();
            (User::from(u), digest)
        }))
    }

    /// Get user by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        Ok(user.map(User::from))
    }

    /// Insert a new account. The unique indexes on email and username are
    /// the authoritative duplicate check; callers may pre-check for a
    /// friendlier fast path, but a violation here still maps to a duplicate.
    pub async fn create(&self, new_user: NewUser) -> Result<InsertUser> {
        let now = chrono::Utc::now().to_rfc3339();

        let insert = users::Entity::insert(users::ActiveModel {
            name: Set(new_user.name),
            email: Set(new_user.email),
            username: Set(new_user.username),
            password_hash: Set(Some(new_user.password_hash)),
            profile_pic: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await;

        let inserted = match insert {
            Ok(res) => res,
            Err(err) => {
                if let Some(SqlErr::UniqueConstraintViolation(msg)) = err.sql_err() {
                    return Ok(if msg.contains("users.email") {
                        InsertUser::DuplicateEmail
                    } else {
                        InsertUser::DuplicateUsername
                    });
                }
                return Err(err).context("Failed to insert user");
            }
        };

        let user = users::Entity::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await
            .context("Failed to query created user")?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created user"))?;

        Ok(InsertUser::Created(User::from(user)))
    }

    /// Create-or-fetch keyed by email, for identity-provider logins.
    /// Existing accounts keep their fields; only a missing profile picture
    /// is filled in from the provider.
    pub async fn upsert_by_email(
        &self,
        email: &str,
        name: &str,
        picture: Option<&str>,
    ) -> Result<User> {
        let existing = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("Failed to query user by email")?;

        if let Some(user) = existing {
            if user.profile_pic.is_none() && picture.is_some() {
                let now = chrono::Utc::now().to_rfc3339();
                let mut active: users::ActiveModel = user.into();
                active.profile_pic = Set(picture.map(ToOwned::to_owned));
                active.updated_at = Set(now);
                let updated = active
                    .update(&self.conn)
                    .await
                    .context("Failed to update user profile picture")?;
                return Ok(User::from(updated));
            }
            return Ok(User::from(user));
        }

        let now = chrono::Utc::now().to_rfc3339();
        let insert = users::Entity::insert(users::ActiveModel {
            name: Set(name.to_owned()),
            email: Set(email.to_owned()),
            // Provider accounts have no chosen username; the email stands in.
            username: Set(email.to_owned()),
            password_hash: Set(None),
            profile_pic: Set(picture.map(ToOwned::to_owned)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        })
        .exec(&self.conn)
        .await;

        let inserted = match insert {
            Ok(res) => res,
            Err(err) => {
                // Lost a create race; the account exists now.
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                    let user = users::Entity::find()
                        .filter(users::Column::Email.eq(email))
                        .one(&self.conn)
                        .await
                        .context("Failed to query user by email")?
                        .ok_or_else(|| {
                            anyhow::anyhow!("User vanished after conflicting insert")
                        })?;
                    return Ok(User::from(user));
                }
                return Err(err).context("Failed to insert user");
            }
        };

        let user = users::Entity::find_by_id(inserted.last_insert_id)
            .one(&self.conn)
            .await
            .context("Failed to query created user")?
            .ok_or_else(|| anyhow::anyhow!("Failed to retrieve created user"))?;

        Ok(User::from(user))
    }
}
