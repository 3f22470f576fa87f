//! Author Storage
//! Mission: Persist author accounts and owned blogs with SQLite

use crate::models::Author;
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode};
use tracing::info;

/// New author row to insert. Timestamps and id are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub image_url: Option<String>,
    pub verification_code: String,
}

/// Field-level changes for a profile update. `None` leaves the column as is.
#[derive(Debug, Default, Clone)]
pub struct AuthorChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub image_url: Option<String>,
}

/// Storage errors the handlers branch on.
#[derive(Debug)]
pub enum StoreError {
    DuplicateEmail,
    NotFound,
    Database(rusqlite::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::DuplicateEmail => write!(f, "Email already exists"),
            StoreError::NotFound => write!(f, "Author not found"),
            StoreError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(err, msg) = &e {
            if err.code == ErrorCode::ConstraintViolation
                && msg.as_deref().is_some_and(|m| m.contains("email"))
            {
                return StoreError::DuplicateEmail;
            }
        }
        StoreError::Database(e)
    }
}

/// Author storage with SQLite backend.
pub struct AuthorStore {
    db_path: String,
}

impl AuthorStore {
    /// Create a new store and initialize the schema.
    pub fn new(db_path: &str) -> Result<Self, StoreError> {
        let store = Self {
            db_path: db_path.to_string(),
        };
        store.init_db()?;
        Ok(store)
    }

    fn open(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.db_path)?;
        // Cascading deletes require this per connection.
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    fn init_db(&self) -> Result<(), StoreError> {
        let conn = self.open()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS authors (
                author_id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                contact_phone TEXT,
                address TEXT,
                role TEXT NOT NULL DEFAULT 'author',
                verification_code TEXT,
                is_verified INTEGER NOT NULL DEFAULT 0,
                image_url TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        // Owned content rides on the author row: deleting an account
        // removes its blogs.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS blogs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                image_url TEXT,
                author_id INTEGER NOT NULL
                    REFERENCES authors(author_id) ON DELETE CASCADE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        Ok(())
    }

    fn row_to_author(row: &rusqlite::Row<'_>) -> rusqlite::Result<Author> {
        Ok(Author {
            author_id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            email: row.get(3)?,
            password_hash: row.get(4)?,
            contact_phone: row.get(5)?,
            address: row.get(6)?,
            role: row.get(7)?,
            verification_code: row.get(8)?,
            is_verified: row.get::<_, i64>(9)? != 0,
            image_url: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }

    const COLUMNS: &'static str = "author_id, first_name, last_name, email, password_hash, \
         contact_phone, address, role, verification_code, is_verified, \
         image_url, created_at, updated_at";

    /// Get author by id.
    pub fn find_by_id(&self, id: i64) -> Result<Option<Author>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM authors WHERE author_id = ?1",
            Self::COLUMNS
        ))?;

        match stmt.query_row(params![id], Self::row_to_author) {
            Ok(author) => Ok(Some(author)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Get author by email (exact match, for login and verification).
    pub fn find_by_email(&self, email: &str) -> Result<Option<Author>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM authors WHERE email = ?1",
            Self::COLUMNS
        ))?;

        match stmt.query_row(params![email], Self::row_to_author) {
            Ok(author) => Ok(Some(author)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a new, unverified author. A UNIQUE violation on email maps
    /// to `StoreError::DuplicateEmail`.
    pub fn insert(&self, new: NewAuthor) -> Result<Author, StoreError> {
        let conn = self.open()?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO authors (first_name, last_name, email, password_hash,
                contact_phone, address, role, verification_code, is_verified,
                image_url, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'author', ?7, 0, ?8, ?9, ?9)",
            params![
                new.first_name,
                new.last_name,
                new.email,
                new.password_hash,
                new.contact_phone,
                new.address,
                new.verification_code,
                new.image_url,
                now,
            ],
        )?;

        let id = conn.last_insert_rowid();
        info!(author_id = id, "Created author account");

        self.find_by_id(id)?.ok_or(StoreError::NotFound)
    }

    /// Apply profile changes and return the updated row.
    ///
    /// Verification state is untouchable here; see `mark_verified`.
    pub fn update(&self, id: i64, changes: AuthorChanges) -> Result<Author, StoreError> {
        let current = self.find_by_id(id)?.ok_or(StoreError::NotFound)?;
        let conn = self.open()?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "UPDATE authors SET first_name = ?1, last_name = ?2, email = ?3,
                password_hash = ?4, contact_phone = ?5, address = ?6,
                image_url = ?7, updated_at = ?8
             WHERE author_id = ?9",
            params![
                changes.first_name.unwrap_or(current.first_name),
                changes.last_name.unwrap_or(current.last_name),
                changes.email.unwrap_or(current.email),
                changes.password_hash.unwrap_or(current.password_hash),
                changes.contact_phone.or(current.contact_phone),
                changes.address.or(current.address),
                changes.image_url.or(current.image_url),
                now,
                id,
            ],
        )?;

        self.find_by_id(id)?.ok_or(StoreError::NotFound)
    }

    /// Flip the account to verified and clear the code in one statement.
    pub fn mark_verified(&self, id: i64) -> Result<Author, StoreError> {
        let conn = self.open()?;
        let now = Utc::now().to_rfc3339();

        let changed = conn.execute(
            "UPDATE authors SET is_verified = 1, verification_code = NULL,
                updated_at = ?1
             WHERE author_id = ?2",
            params![now, id],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound);
        }

        info!(author_id = id, "Author email verified");
        self.find_by_id(id)?.ok_or(StoreError::NotFound)
    }

    /// Delete an author. Returns whether a row was removed. Owned blogs go
    /// with it via the FK cascade.
    pub fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.open()?;
        let removed = conn.execute("DELETE FROM authors WHERE author_id = ?1", params![id])?;

        if removed > 0 {
            info!(author_id = id, "Deleted author account");
        }
        Ok(removed > 0)
    }

    /// List every author (callers project before exposing).
    pub fn list_all(&self) -> Result<Vec<Author>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM authors", Self::COLUMNS))?;

        let authors = stmt
            .query_map([], Self::row_to_author)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(authors)
    }

    /// Attach a blog post to an author.
    pub fn insert_blog(&self, author_id: i64, title: &str, content: &str) -> Result<i64, StoreError> {
        let conn = self.open()?;
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO blogs (title, content, author_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![title, content, author_id, now],
        )?;

        Ok(conn.last_insert_rowid())
    }

    /// Count blog rows owned by an author.
    pub fn count_blogs(&self, author_id: i64) -> Result<i64, StoreError> {
        let conn = self.open()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM blogs WHERE author_id = ?1",
            params![author_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
