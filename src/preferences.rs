//! Key/value preference storage and the theme preference built on it.
//!
//! `PreferenceStore` is the injected capability: the SQLite `Database`
//! implements it for real runs, `MemoryPreferenceStore` for tests and
//! `--no-persist`. `ThemeStore` is the only consumer.
use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;

use crate::theme::ThemeVariant;

// ============================================================================
// PreferenceStore
// ============================================================================

/// A string key/value store that outlives the process (or pretends to).
#[allow(async_fn_in_trait)]
pub trait PreferenceStore {
    /// Stored value for `key`, or `None` if it was never set.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("preference map lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("preference map lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================================================
// ThemeStore
// ============================================================================

/// Reads and writes the light/dark choice through any `PreferenceStore`.
pub struct ThemeStore<S> {
    store: S,
    default: ThemeVariant,
}

impl<S: PreferenceStore> ThemeStore<S> {
    /// Preference key holding `"light"` or `"dark"`.
    pub const KEY: &'static str = "theme";

    /// `default` is returned whenever nothing usable is stored.
    pub fn new(store: S, default: ThemeVariant) -> Self {
        Self { store, default }
    }

    /// The persisted theme.
    ///
    /// Absent, unrecognised and unreadable values all fall back to the
    /// configured default; read failures are logged, never surfaced.
    pub async fn get_theme(&self) -> ThemeVariant {
        match self.store.get(Self::KEY).await {
            Ok(Some(value)) => ThemeVariant::from_str_name(&value).unwrap_or_else(|| {
                tracing::warn!(value = %value, "Unrecognised stored theme, using default");
                self.default
            }),
            Ok(None) => self.default,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read theme preference, using default");
                self.default
            }
        }
    }

    /// Persist `theme`.
    pub async fn set_theme(&self, theme: ThemeVariant) -> Result<()> {
        self.store.set(Self::KEY, theme.as_str()).await?;
        tracing::debug!(theme = theme.as_str(), "Theme preference saved");
        Ok(())
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    /// Store whose every operation fails.
    struct BrokenStore;

    impl PreferenceStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>> {
            Err(anyhow::anyhow!("disk on fire"))
        }

        async fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(anyhow::anyhow!("disk on fire"))
        }
    }

    #[tokio::test]
    async fn test_memory_store_get_set() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(store.get("theme").await.unwrap(), None);

        store.set("theme", "light").await.unwrap();
        assert_eq!(store.get("theme").await.unwrap(), Some("light".to_string()));

        store.set("theme", "dark").await.unwrap();
        assert_eq!(store.get("theme").await.unwrap(), Some("dark".to_string()));
    }

    #[tokio::test]
    async fn test_theme_absent_is_default() {
        let themes = ThemeStore::new(MemoryPreferenceStore::new(), ThemeVariant::Dark);
        assert_eq!(themes.get_theme().await, ThemeVariant::Dark);

        let themes = ThemeStore::new(MemoryPreferenceStore::new(), ThemeVariant::Light);
        assert_eq!(themes.get_theme().await, ThemeVariant::Light);
    }

    #[tokio::test]
    async fn test_theme_set_then_get() {
        let themes = ThemeStore::new(MemoryPreferenceStore::new(), ThemeVariant::Dark);
        themes.set_theme(ThemeVariant::Light).await.unwrap();
        assert_eq!(themes.get_theme().await, ThemeVariant::Light);
        assert_eq!(
            themes.store().get("theme").await.unwrap(),
            Some("light".to_string())
        );
    }

    #[tokio::test]
    async fn test_theme_stored_value_case_insensitive() {
        let store = MemoryPreferenceStore::new();
        store.set("theme", "LIGHT").await.unwrap();
        let themes = ThemeStore::new(store, ThemeVariant::Dark);
        assert_eq!(themes.get_theme().await, ThemeVariant::Light);
    }

    #[tokio::test]
    async fn test_theme_unrecognised_value_is_default() {
        let store = MemoryPreferenceStore::new();
        store.set("theme", "solarized").await.unwrap();
        let themes = ThemeStore::new(store, ThemeVariant::Dark);
        assert_eq!(themes.get_theme().await, ThemeVariant::Dark);
    }

    #[tokio::test]
    async fn test_theme_read_failure_is_default() {
        let themes = ThemeStore::new(BrokenStore, ThemeVariant::Light);
        assert_eq!(themes.get_theme().await, ThemeVariant::Light);
    }

    #[tokio::test]
    async fn test_theme_write_failure_is_reported() {
        let themes = ThemeStore::new(BrokenStore, ThemeVariant::Dark);
        let err = themes.set_theme(ThemeVariant::Light).await.unwrap_err();
        assert!(err.to_string().contains("disk on fire"));
    }

    #[tokio::test]
    async fn test_theme_store_over_database() {
        let db = Database::open(":memory:").await.unwrap();
        let themes = ThemeStore::new(db, ThemeVariant::Dark);

        themes.set_theme(ThemeVariant::Light).await.unwrap();
        assert_eq!(themes.get_theme().await, ThemeVariant::Light);
        assert_eq!(
            themes.store().get_preference("theme").await.unwrap(),
            Some("light".to_string())
        );
    }
}
