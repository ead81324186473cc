// PostgreSQL storage implementation
// Decision: Tags are stored once and linked through snippet_tags with a position column
// Decision: Snippet writes that touch tags run in a single transaction

use async_trait::async_trait;
use snippets_core::{
    ApiKeyCredential, Credential, CredentialStore, IssuedApiKey, NewSnippet, Result, Snippet,
    SnippetFilter, SnippetPatch, SnippetStore, StorageError, TagSummary, UserCredential,
};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::models::{ApiKeyRow, SnippetRow, TagRow, UserRow};
use super::password::hash_new_user;
use crate::auth::api_key::{generate_api_key, hash_api_key};

/// Columns of a snippet joined with its ordered tag names
const SNIPPET_COLUMNS: &str = r#"
    s.id, s.title, s.code, s.language, s.description,
    ARRAY(
        SELECT t.name::TEXT
        FROM snippet_tags st
        JOIN tags t ON t.id = st.tag_id
        WHERE st.snippet_id = s.id
        ORDER BY st.position
    ) AS tags,
    s.created_at, s.updated_at
"#;

fn db_error(e: sqlx::Error) -> StorageError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StorageError::conflict(db.constraint().unwrap_or("record").to_string())
        }
        _ => StorageError::backend(e.to_string()),
    }
}

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create database connection from URL
    pub async fn from_url(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    async fn fetch_snippet<'e, E>(executor: E, id: i64) -> Result<Option<Snippet>>
    where
        E: sqlx::PgExecutor<'e>,
    {
        let sql = format!("SELECT {SNIPPET_COLUMNS} FROM snippets s WHERE s.id = $1");
        let row = sqlx::query_as::<_, SnippetRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    /// Link tags to a snippet in order, creating missing tags
    async fn attach_tags(
        tx: &mut Transaction<'_, Postgres>,
        snippet_id: i64,
        tags: &[String],
    ) -> Result<()> {
        for (position, name) in tags.iter().enumerate() {
            let (tag_id,): (i64,) = sqlx::query_as(
                r#"
                INSERT INTO tags (name)
                VALUES ($1)
                ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                RETURNING id
                "#,
            )
            .bind(name)
            .fetch_one(&mut **tx)
            .await
            .map_err(db_error)?;

            sqlx::query(
                r#"
                INSERT INTO snippet_tags (snippet_id, tag_id, position)
                VALUES ($1, $2, $3)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(snippet_id)
            .bind(tag_id)
            .bind(position as i32)
            .execute(&mut **tx)
            .await
            .map_err(db_error)?;
        }
        Ok(())
    }
}

// ============================================
// Credentials
// ============================================

#[async_trait]
impl CredentialStore for Database {
    async fn find_by_token(&self, token: &str) -> Result<Option<ApiKeyCredential>> {
        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            SELECT id, owner, key_hash, key_prefix, active, created_at, last_used_at
            FROM api_keys
            WHERE key_hash = $1
            "#,
        )
        .bind(hash_api_key(token))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<UserCredential>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, active, created_at, last_login_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(row.map(Into::into))
    }

    async fn record_usage(&self, credential: &Credential) -> Result<()> {
        let sql = match credential {
            Credential::ApiKey(_) => "UPDATE api_keys SET last_used_at = NOW() WHERE id = $1",
            Credential::User(_) => "UPDATE users SET last_login_at = NOW() WHERE id = $1",
        };

        sqlx::query(sql)
            .bind(credential.id())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(())
    }

    async fn create_api_key(&self, owner: &str) -> Result<IssuedApiKey> {
        let generated = generate_api_key();
        let row = sqlx::query_as::<_, ApiKeyRow>(
            r#"
            INSERT INTO api_keys (id, owner, key_hash, key_prefix, active)
            VALUES ($1, $2, $3, $4, TRUE)
            RETURNING id, owner, key_hash, key_prefix, active, created_at, last_used_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(owner)
        .bind(&generated.key_hash)
        .bind(&generated.key_prefix)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(IssuedApiKey {
            credential: row.into(),
            token: generated.key,
        })
    }

    async fn create_user(&self, username: &str, password: &str) -> Result<UserCredential> {
        let password_hash = hash_new_user(username, password)?;
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, password_hash, active)
            VALUES ($1, $2, $3, TRUE)
            RETURNING id, username, password_hash, active, created_at, last_login_at
            "#,
        )
        .bind(Uuid::now_v7())
        .bind(username)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match db_error(e) {
            StorageError::Conflict(_) => StorageError::conflict(format!("username '{username}'")),
            other => other,
        })?;

        Ok(row.into())
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<bool> {
        let keys = sqlx::query("UPDATE api_keys SET active = $2 WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;
        if keys.rows_affected() > 0 {
            return Ok(true);
        }

        let users = sqlx::query("UPDATE users SET active = $2 WHERE id = $1")
            .bind(id)
            .bind(active)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(users.rows_affected() > 0)
    }
}

// ============================================
// Snippets
// ============================================

#[async_trait]
impl SnippetStore for Database {
    async fn list_snippets(&self, filter: &SnippetFilter) -> Result<Vec<Snippet>> {
        let sql = format!(
            r#"
            SELECT {SNIPPET_COLUMNS}
            FROM snippets s
            WHERE ($1::TEXT IS NULL OR LOWER(s.language) = LOWER($1))
              AND ($2::TEXT IS NULL OR EXISTS (
                    SELECT 1
                    FROM snippet_tags st
                    JOIN tags t ON t.id = st.tag_id
                    WHERE st.snippet_id = s.id AND LOWER(t.name) = LOWER($2)
              ))
            ORDER BY s.created_at DESC, s.id DESC
            "#
        );
        let rows = sqlx::query_as::<_, SnippetRow>(&sql)
            .bind(&filter.language)
            .bind(&filter.tag)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_snippet(&self, id: i64) -> Result<Option<Snippet>> {
        Self::fetch_snippet(&self.pool, id).await
    }

    async fn create_snippet(&self, input: NewSnippet) -> Result<Snippet> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO snippets (title, code, language, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&input.title)
        .bind(&input.code)
        .bind(&input.language)
        .bind(&input.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error)?;

        Self::attach_tags(&mut tx, id, &input.tags).await?;

        let snippet = Self::fetch_snippet(&mut *tx, id)
            .await?
            .ok_or_else(|| StorageError::backend("created snippet vanished"))?;
        tx.commit().await.map_err(db_error)?;

        Ok(snippet)
    }

    async fn update_snippet(&self, id: i64, patch: SnippetPatch) -> Result<Option<Snippet>> {
        let mut tx = self.pool.begin().await.map_err(db_error)?;

        let (set_description, description) = match patch.description {
            Some(description) => (true, description),
            None => (false, None),
        };

        let updated: Option<(i64,)> = sqlx::query_as(
            r#"
            UPDATE snippets
            SET
                title = COALESCE($2, title),
                code = COALESCE($3, code),
                language = COALESCE($4, language),
                description = CASE WHEN $5 THEN $6 ELSE description END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.code)
        .bind(&patch.language)
        .bind(set_description)
        .bind(&description)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?;

        if updated.is_none() {
            return Ok(None);
        }

        if let Some(tags) = &patch.tags {
            sqlx::query("DELETE FROM snippet_tags WHERE snippet_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(db_error)?;
            Self::attach_tags(&mut tx, id, tags).await?;
        }

        let snippet = Self::fetch_snippet(&mut *tx, id).await?;
        tx.commit().await.map_err(db_error)?;

        Ok(snippet)
    }

    async fn delete_snippet(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM snippets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_languages(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT language::TEXT FROM snippets ORDER BY 1")
                .fetch_all(&self.pool)
                .await
                .map_err(db_error)?;

        Ok(rows.into_iter().map(|(language,)| language).collect())
    }

    async fn list_tags(&self) -> Result<Vec<TagSummary>> {
        let rows = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT t.id, t.name::TEXT AS name, COUNT(st.snippet_id) AS snippet_count
            FROM tags t
            LEFT JOIN snippet_tags st ON st.tag_id = t.id
            GROUP BY t.id, t.name
            ORDER BY t.id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
