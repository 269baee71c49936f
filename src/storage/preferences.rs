use anyhow::Result;

use super::schema::Database;
use crate::preferences::PreferenceStore;

impl Database {
    // ========================================================================
    // User Preferences Operations
    // ========================================================================

    /// Get a single preference value by key, or `None` if not set.
    pub async fn get_preference(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT value FROM user_preferences WHERE key = ?")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(value,)| value))
    }

    /// Set a preference value, replacing any previous value (UPSERT).
    pub async fn set_preference(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_preferences (key, value, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

impl PreferenceStore for Database {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.get_preference(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_preference(key, value).await
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::Database;

    async fn test_db() -> Database {
        Database::open(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_get_preference_missing() {
        let db = test_db().await;
        let value = db.get_preference("theme").await.unwrap();
        assert_eq!(value, None);
    }

    #[tokio::test]
    async fn test_set_and_get_preference() {
        let db = test_db().await;
        db.set_preference("theme", "light").await.unwrap();

        let value = db.get_preference("theme").await.unwrap();
        assert_eq!(value, Some("light".to_string()));
    }

    #[tokio::test]
    async fn test_set_preference_upsert() {
        let db = test_db().await;
        db.set_preference("theme", "light").await.unwrap();
        db.set_preference("theme", "dark").await.unwrap();

        let value = db.get_preference("theme").await.unwrap();
        assert_eq!(value, Some("dark".to_string()));

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user_preferences")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }

    #[tokio::test]
    async fn test_set_preference_records_timestamp() {
        let db = test_db().await;
        db.set_preference("theme", "light").await.unwrap();

        let row: (String,) =
            sqlx::query_as("SELECT updated_at FROM user_preferences WHERE key = ?")
                .bind("theme")
                .fetch_one(&db.pool)
                .await
                .unwrap();
        assert!(!row.0.is_empty());
    }

    #[tokio::test]
    async fn test_preference_survives_reopen() {
        let dir = std::env::temp_dir().join("gamedeck_prefs_test_reopen");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("prefs.db");
        std::fs::remove_file(&path).ok();
        let path_str = path.to_str().unwrap();

        let db = Database::open(path_str).await.unwrap();
        db.set_preference("theme", "light").await.unwrap();
        db.pool.close().await;

        let reopened = Database::open(path_str).await.unwrap();
        assert_eq!(
            reopened.get_preference("theme").await.unwrap(),
            Some("light".to_string())
        );

        std::fs::remove_dir_all(&dir).ok();
    }
}
