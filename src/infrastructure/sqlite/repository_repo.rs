use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{SqlitePool, Row};
use chrono::{DateTime, Utc};
use crate::domain::entities::MirroredRepository;
use crate::ports::repository::MirrorPort;
use crate::shared::result::Result;

/// SQLite 镜像仓储实现
pub struct SqliteMirrorRepository {
    pool: SqlitePool,
}

impl SqliteMirrorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn map_row(r: &SqliteRow) -> MirroredRepository {
    MirroredRepository {
        id: r.get("id"),
        name: r.get("name"),
        url: r.get("url"),
        synced_at: DateTime::from_timestamp(r.get("synced_at"), 0).unwrap_or_default(),
    }
}

#[async_trait]
impl MirrorPort for SqliteMirrorRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<MirroredRepository>> {
        let row = sqlx::query("SELECT id, name, url, synced_at FROM repositories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_row))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<MirroredRepository>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, url, synced_at
            FROM repositories
            WHERE name = ?
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(map_row))
    }

    async fn list_all(&self) -> Result<Vec<MirroredRepository>> {
        let rows = sqlx::query("SELECT id, name, url, synced_at FROM repositories ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.iter().map(map_row).collect())
    }

    async fn count_matching(&self, search: &str) -> Result<u64> {
        // instr() 区分大小写，LIKE 不区分
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total
            FROM repositories
            WHERE (? = '' OR instr(name, ?) > 0)
            "#,
        )
        .bind(search)
        .bind(search)
        .fetch_one(&self.pool)
        .await?;

        let total: i64 = row.get("total");
        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn list_matching(
        &self,
        search: &str,
        limit: u32,
        offset: u64,
    ) -> Result<Vec<MirroredRepository>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, url, synced_at
            FROM repositories
            WHERE (? = '' OR instr(name, ?) > 0)
            ORDER BY id ASC
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(search)
        .bind(search)
        .bind(i64::from(limit))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(map_row).collect())
    }

    async fn insert(&self, repo: &MirroredRepository) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO repositories (name, url, synced_at)
            VALUES (?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&repo.name)
        .bind(&repo.url)
        .bind(repo.synced_at.timestamp())
        .fetch_one(&self.pool)
        .await?;

        Ok(result.get("id"))
    }

    async fn update(&self, id: i64, name: &str, url: &str) -> Result<bool> {
        let now = Utc::now().timestamp();
        let result = sqlx::query("UPDATE repositories SET name = ?, url = ?, synced_at = ? WHERE id = ?")
            .bind(name)
            .bind(url)
            .bind(now)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM repositories WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
