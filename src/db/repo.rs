use sqlx::sqlite::{SqliteConnection, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, warn};

use crate::db::models::{NewUser, User};

const CREATE_USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username VARCHAR(128) NOT NULL UNIQUE,
        email VARCHAR(120) NOT NULL UNIQUE,
        active BOOLEAN NOT NULL DEFAULT 1
    )
"#;

const DROP_USERS_TABLE: &str = "DROP TABLE IF EXISTS users";

#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique index rejected the write.
    #[error("unique constraint violated: {0}")]
    ConstraintViolation(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::ConstraintViolation(db_err.message().to_string());
        }
    }
    StoreError::Database(err)
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// Persistence for user records, backed by a single SQLite table.
#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `url`.
    ///
    /// Every SQLite connection to an in-memory URL sees its own database, so
    /// those pools are held at exactly one connection that is never recycled.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = if is_in_memory(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = options.connect(url).await?;
        debug!(in_memory = is_in_memory(url), "connected to user store");
        Ok(Self::new(pool))
    }

    pub async fn create_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_USERS_TABLE).execute(&self.pool).await?;
        Ok(())
    }

    /// Drops the `users` table with all its rows and creates it again.
    pub async fn drop_and_recreate_schema(&self) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(DROP_USERS_TABLE).execute(&mut *tx).await?;
        sqlx::query(CREATE_USERS_TABLE).execute(&mut *tx).await?;
        tx.commit().await?;

        debug!("users table recreated");
        Ok(())
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, active FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, active FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// All users in insertion order.
    pub async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, username, email, active FROM users ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Stores a new active user. A unique-index violation rolls the
    /// transaction back and surfaces as [`StoreError::ConstraintViolation`].
    pub async fn insert(&self, new_user: &NewUser) -> Result<User, StoreError> {
        let mut tx = self.pool.begin().await?;

        match insert_row(&mut tx, new_user).await {
            Ok(user) => {
                tx.commit().await?;
                Ok(user)
            }
            Err(err) => {
                tx.rollback().await?;
                let err = map_write_error(err);
                if let StoreError::ConstraintViolation(detail) = &err {
                    warn!(email = %new_user.email, %detail, "insert rejected by unique constraint");
                }
                Err(err)
            }
        }
    }

    /// Inserts every user or none of them.
    pub async fn seed(&self, users: &[NewUser]) -> Result<Vec<User>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut seeded = Vec::with_capacity(users.len());

        for new_user in users {
            match insert_row(&mut tx, new_user).await {
                Ok(user) => seeded.push(user),
                Err(err) => {
                    tx.rollback().await?;
                    return Err(map_write_error(err));
                }
            }
        }

        tx.commit().await?;
        Ok(seeded)
    }
}

async fn insert_row(conn: &mut SqliteConnection, new_user: &NewUser) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, email, active)
        VALUES (?, ?, 1)
        RETURNING id, username, email, active
        "#,
    )
    .bind(&new_user.username)
    .bind(&new_user.email)
    .fetch_one(conn)
    .await
}
