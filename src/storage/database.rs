use crate::models::UploadRecord;
use anyhow::Result;
use sqlx::{sqlite::SqlitePool, Row};
use std::path::{Path, PathBuf};

/// Local SQLite storage: a `config` key/value table (session token and
/// client settings) plus an `uploads` history table.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn init() -> Result<Self> {
        let app_data_dir = Self::get_app_data_dir()?;
        Self::init_at(&app_data_dir).await
    }

    /// Open (creating if needed) the database under the given directory.
    /// Split out from `init` so tests can point at a scratch directory.
    pub async fn init_at(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;

        let db_path = dir.join("data.db");
        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let pool = SqlitePool::connect(&db_url).await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS config (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS uploads (
                id TEXT PRIMARY KEY,
                filename TEXT NOT NULL,
                size_bytes INTEGER NOT NULL,
                total_rows INTEGER NOT NULL,
                total_sales REAL NOT NULL,
                uploaded_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        // 초기 설정값
        sqlx::query(
            r#"
            INSERT OR IGNORE INTO config (key, value) VALUES
                ('theme', 'system')
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    fn get_app_data_dir() -> Result<PathBuf> {
        let base = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("No config directory for this platform"))?;
        Ok(base.join("com.datus.app"))
    }

    pub async fn set_config(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO config (key, value) VALUES (?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_config(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM config WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get(0)))
    }

    pub async fn delete_config(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM config WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn record_upload(&self, record: &UploadRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO uploads (id, filename, size_bytes, total_rows, total_sales, uploaded_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.filename)
        .bind(record.size_bytes)
        .bind(record.total_rows)
        .bind(record.total_sales)
        .bind(record.uploaded_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn recent_uploads(&self, limit: i64) -> Result<Vec<UploadRecord>> {
        let records = sqlx::query_as::<_, UploadRecord>(
            "SELECT id, filename, size_bytes, total_rows, total_sales, uploaded_at
             FROM uploads ORDER BY uploaded_at DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
