use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::repo_types::{age_on, NewUser, User};

const USER_COLUMNS: &str = "id, name, email, phone, password_hash, date_of_birth, age, gender, \
     address, is_verified, verification_status, verified_at, profile_image, created_at, updated_at";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique field already belongs to another record.
    #[error("{0} is already registered")]
    Duplicate(&'static str),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Persistent store of registered users, keyed by email.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError>;
    /// Persist a new user; `age` is derived from the date of birth here.
    async fn insert(&self, user: NewUser) -> Result<User, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn find_by(&self, column: &str, value: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(value)
            .fetch_optional(&self.db)
            .await
            .with_context(|| format!("find user by {column}"))?;
        Ok(user)
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        self.find_by("email", email).await
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<User>, StoreError> {
        self.find_by("phone", phone).await
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        let age = age_on(user.date_of_birth, OffsetDateTime::now_utc().date());
        let sql = format!(
            r#"
            INSERT INTO users (id, name, email, phone, password_hash, date_of_birth, age,
                               gender, address, profile_image)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {USER_COLUMNS}
            "#
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.phone)
            .bind(&user.password_hash)
            .bind(user.date_of_birth)
            .bind(age)
            .bind(user.gender)
            .bind(&user.address)
            .bind(&user.profile_image)
            .fetch_one(&self.db)
            .await
            .map_err(|e| match duplicate_field(&e) {
                Some(field) => StoreError::Duplicate(field),
                None => StoreError::Backend(anyhow::Error::new(e).context("insert user")),
            })
    }
}

/// Maps a unique-constraint violation to the user-facing name of the field.
fn duplicate_field(e: &sqlx::Error) -> Option<&'static str> {
    let sqlx::Error::Database(db) = e else {
        return None;
    };
    if !db.is_unique_violation() {
        return None;
    }
    match db.constraint() {
        Some(c) if c.contains("phone") => Some("Phone number"),
        _ => Some("Email"),
    }
}
