use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgRow};
use sqlx::Row;
use tracing::{debug, info, Instrument};

use crate::observability::{db_span, record_db_metrics};

/// Represents a platform user in the database
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub telegram_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a user
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub telegram_id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl From<&crate::telegram::User> for NewUser {
    fn from(user: &crate::telegram::User) -> Self {
        Self {
            telegram_id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
        }
    }
}

/// Represents a stored file reference in the database
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    pub id: i64,
    /// file_id issued by the Telegram API
    pub file_id: String,
    pub description: Option<String>,
    pub file_extension: String,
    pub file_name: String,
    pub file_type: String,
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a file reference
#[derive(Debug, Clone, PartialEq)]
pub struct NewFile {
    pub file_id: String,
    pub description: Option<String>,
    pub file_extension: String,
    pub file_name: String,
    pub file_type: String,
}

/// Initialize the database schema
pub async fn init_database_schema(pool: &PgPool) -> Result<()> {
    info!("Initializing database schema");

    // Create users table; telegram_id is intentionally not unique
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS users (
            id BIGSERIAL PRIMARY KEY,
            telegram_id BIGINT NOT NULL,
            first_name VARCHAR(255) NOT NULL,
            last_name VARCHAR(255),
            username VARCHAR(255),
            created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create users table")?;

    // Create files table
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS files (
            id BIGSERIAL PRIMARY KEY,
            file_id VARCHAR(255) NOT NULL,
            description TEXT,
            file_extension VARCHAR(32) NOT NULL,
            file_name VARCHAR(255) NOT NULL,
            file_type VARCHAR(64) NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
    )
    .execute(pool)
    .await
    .context("Failed to create files table")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS users_telegram_id_idx ON users(telegram_id)")
        .execute(pool)
        .await
        .context("Failed to create users telegram_id index")?;

    sqlx::query("CREATE INDEX IF NOT EXISTS files_file_type_idx ON files(file_type)")
        .execute(pool)
        .await
        .context("Failed to create files file_type index")?;

    info!("Database schema initialized successfully");
    Ok(())
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        telegram_id: row.get("telegram_id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        username: row.get("username"),
        created_at: row.get("created_at"),
    }
}

fn file_from_row(row: &PgRow) -> File {
    File {
        id: row.get("id"),
        file_id: row.get("file_id"),
        description: row.get("description"),
        file_extension: row.get("file_extension"),
        file_name: row.get("file_name"),
        file_type: row.get("file_type"),
        created_at: row.get("created_at"),
    }
}

/// Insert a user and return its database ID
pub async fn create_user(pool: &PgPool, user: &NewUser) -> Result<i64> {
    debug!(telegram_id = %user.telegram_id, "Creating new user");
    let start = Instant::now();

    let row = sqlx::query(
        "INSERT INTO users (telegram_id, first_name, last_name, username)
         VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(user.telegram_id)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.username)
    .fetch_one(pool)
    .instrument(db_span("insert", "users"))
    .await
    .context("Failed to insert new user")?;

    record_db_metrics("insert", start.elapsed());
    let user_id: i64 = row.get(0);
    debug!(user_id = %user_id, "User created successfully");

    Ok(user_id)
}

/// Read a user by database ID
pub async fn get_user_by_id(pool: &PgPool, user_id: i64) -> Result<Option<User>> {
    debug!(user_id = %user_id, "Reading user");

    let row = sqlx::query(
        "SELECT id, telegram_id, first_name, last_name, username, created_at
         FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .instrument(db_span("select", "users"))
    .await
    .context("Failed to read user")?;

    Ok(row.as_ref().map(user_from_row))
}

/// Read the oldest user row for a Telegram ID
pub async fn get_user_by_telegram_id(pool: &PgPool, telegram_id: i64) -> Result<Option<User>> {
    debug!(telegram_id = %telegram_id, "Reading user by telegram_id");

    let row = sqlx::query(
        "SELECT id, telegram_id, first_name, last_name, username, created_at
         FROM users WHERE telegram_id = $1 ORDER BY id LIMIT 1",
    )
    .bind(telegram_id)
    .fetch_optional(pool)
    .instrument(db_span("select", "users"))
    .await
    .context("Failed to read user by telegram_id")?;

    Ok(row.as_ref().map(user_from_row))
}

/// Return the existing user for this Telegram ID or insert a new one
pub async fn get_or_create_user(pool: &PgPool, user: &NewUser) -> Result<User> {
    if let Some(existing) = get_user_by_telegram_id(pool, user.telegram_id).await? {
        debug!(telegram_id = %user.telegram_id, user_id = %existing.id, "Found existing user");
        return Ok(existing);
    }

    let user_id = create_user(pool, user).await?;
    get_user_by_id(pool, user_id)
        .await?
        .with_context(|| format!("User {} vanished right after insert", user_id))
}

/// Insert a file reference and return its database ID
pub async fn create_file(pool: &PgPool, file: &NewFile) -> Result<i64> {
    debug!(file_id = %file.file_id, file_type = %file.file_type, "Creating new file record");
    let start = Instant::now();

    let row = sqlx::query(
        "INSERT INTO files (file_id, description, file_extension, file_name, file_type)
         VALUES ($1, $2, $3, $4, $5) RETURNING id",
    )
    .bind(&file.file_id)
    .bind(&file.description)
    .bind(&file.file_extension)
    .bind(&file.file_name)
    .bind(&file.file_type)
    .fetch_one(pool)
    .instrument(db_span("insert", "files"))
    .await
    .context("Failed to insert new file")?;

    record_db_metrics("insert", start.elapsed());
    let id: i64 = row.get(0);
    debug!(id = %id, "File record created successfully");

    Ok(id)
}

/// Read a file reference by database ID
pub async fn get_file_by_id(pool: &PgPool, id: i64) -> Result<Option<File>> {
    debug!(id = %id, "Reading file record");

    let row = sqlx::query(
        "SELECT id, file_id, description, file_extension, file_name, file_type, created_at
         FROM files WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .instrument(db_span("select", "files"))
    .await
    .context("Failed to read file")?;

    Ok(row.as_ref().map(file_from_row))
}

/// List file references of one type, oldest first
pub async fn get_files_by_type(pool: &PgPool, file_type: &str) -> Result<Vec<File>> {
    debug!(file_type = %file_type, "Listing file records by type");

    let rows = sqlx::query(
        "SELECT id, file_id, description, file_extension, file_name, file_type, created_at
         FROM files WHERE file_type = $1 ORDER BY id",
    )
    .bind(file_type)
    .fetch_all(pool)
    .instrument(db_span("select", "files"))
    .await
    .context("Failed to list files by type")?;

    Ok(rows.iter().map(file_from_row).collect())
}
