use std::sync::Arc;

use tokio::sync::watch;

use crate::storage::{PreferenceStorage, THEME_KEY};
use crate::theme::{EffectiveTheme, Palette, ThemePreference};

/// Текущее состояние темы, которое получают подписчики.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeSnapshot {
    pub preference: ThemePreference,
    pub effective: EffectiveTheme,
}

/// Владелец предпочтения темы.
///
/// Создаётся явно и передаётся по ссылке тем, кому нужна тема. Каждое
/// изменение предпочтения сохраняется в `PreferenceStorage`; ошибки хранилища
/// только логируются, состояние в памяти остаётся главным на время сессии.
pub struct ThemeStore {
    storage: Arc<dyn PreferenceStorage>,
    preference: ThemePreference,
    device: Option<EffectiveTheme>,
    tx: watch::Sender<ThemeSnapshot>,
}

impl ThemeStore {
    /// Читает сохранённое предпочтение; при отсутствии, мусоре или ошибке
    /// чтения остаётся `system`.
    pub fn load(storage: Arc<dyn PreferenceStorage>, device: Option<EffectiveTheme>) -> Self {
        let preference = read_preference(storage.as_ref());
        let snapshot = ThemeSnapshot {
            preference,
            effective: preference.resolve(device),
        };
        let (tx, _rx) = watch::channel(snapshot);

        Self {
            storage,
            preference,
            device,
            tx,
        }
    }

    pub fn preference(&self) -> ThemePreference {
        self.preference
    }

    pub fn effective(&self) -> EffectiveTheme {
        self.preference.resolve(self.device)
    }

    pub fn is_dark(&self) -> bool {
        self.effective().is_dark()
    }

    pub fn palette(&self) -> &'static Palette {
        self.effective().palette()
    }

    pub fn device_scheme(&self) -> Option<EffectiveTheme> {
        self.device
    }

    pub fn snapshot(&self) -> ThemeSnapshot {
        ThemeSnapshot {
            preference: self.preference,
            effective: self.effective(),
        }
    }

    /// Подписка на изменения; приходят только реально изменившиеся снимки.
    pub fn subscribe(&self) -> watch::Receiver<ThemeSnapshot> {
        self.tx.subscribe()
    }

    pub fn set_theme(&mut self, preference: ThemePreference) {
        self.preference = preference;
        self.persist();
        self.publish();
    }

    /// `light -> dark -> system -> light`.
    pub fn toggle_theme(&mut self) -> ThemePreference {
        self.set_theme(self.preference.next());
        self.preference
    }

    /// Устройство сообщило новую цветовую схему.
    pub fn set_device_scheme(&mut self, device: Option<EffectiveTheme>) {
        self.device = device;
        self.publish();
    }

    fn persist(&self) {
        if let Err(err) = self.storage.set_item(THEME_KEY, self.preference.as_str()) {
            tracing::error!(error = %err, "Failed to save theme preference");
        }
    }

    fn publish(&self) {
        let next = self.snapshot();
        self.tx.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            *current = next;
            true
        });
    }
}

fn read_preference(storage: &dyn PreferenceStorage) -> ThemePreference {
    match storage.get_item(THEME_KEY) {
        Ok(Some(raw)) => match raw.parse() {
            Ok(preference) => preference,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring stored theme preference");
                ThemePreference::default()
            }
        },
        Ok(None) => ThemePreference::default(),
        Err(err) => {
            tracing::error!(error = %err, "Failed to load theme preference");
            ThemePreference::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage, StorageError};
    use tempfile::TempDir;

    struct BrokenStorage;

    impl PreferenceStorage for BrokenStorage {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disk on fire".to_string()))
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disk on fire".to_string()))
        }
    }

    fn memory() -> Arc<dyn PreferenceStorage> {
        Arc::new(MemoryStorage::new())
    }

    #[test]
    fn defaults_to_system_when_nothing_is_stored() {
        let store = ThemeStore::load(memory(), Some(EffectiveTheme::Dark));
        assert_eq!(store.preference(), ThemePreference::System);
        assert_eq!(store.effective(), EffectiveTheme::Dark);
    }

    #[test]
    fn invalid_stored_value_falls_back_to_system() {
        let storage = memory();
        storage.set_item(THEME_KEY, "purple").expect("seed");
        let store = ThemeStore::load(storage, None);
        assert_eq!(store.preference(), ThemePreference::System);
        assert_eq!(store.effective(), EffectiveTheme::Light);
    }

    #[test]
    fn preference_survives_reload() {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("prefs.json");

        let mut store = ThemeStore::load(Arc::new(FileStorage::new(&path)), None);
        store.set_theme(ThemePreference::Dark);
        drop(store);

        let reloaded = ThemeStore::load(Arc::new(FileStorage::new(&path)), None);
        assert_eq!(reloaded.preference(), ThemePreference::Dark);
        assert_eq!(reloaded.effective(), EffectiveTheme::Dark);
    }

    #[test]
    fn system_preference_resolves_against_device_at_reload_time() {
        let storage = memory();
        let mut store = ThemeStore::load(storage.clone(), Some(EffectiveTheme::Light));
        store.set_theme(ThemePreference::System);
        drop(store);

        let reloaded = ThemeStore::load(storage, Some(EffectiveTheme::Dark));
        assert_eq!(reloaded.effective(), EffectiveTheme::Dark);
    }

    #[test]
    fn toggle_cycles_and_persists_each_step() {
        let storage = memory();
        storage.set_item(THEME_KEY, "light").expect("seed");
        let mut store = ThemeStore::load(storage.clone(), None);

        assert_eq!(store.toggle_theme(), ThemePreference::Dark);
        assert_eq!(storage.get_item(THEME_KEY).expect("read").as_deref(), Some("dark"));
        assert_eq!(store.toggle_theme(), ThemePreference::System);
        assert_eq!(store.toggle_theme(), ThemePreference::Light);
        assert_eq!(storage.get_item(THEME_KEY).expect("read").as_deref(), Some("light"));
    }

    #[test]
    fn device_changes_only_matter_under_system() {
        let mut store = ThemeStore::load(memory(), Some(EffectiveTheme::Light));
        store.set_theme(ThemePreference::Light);
        store.set_device_scheme(Some(EffectiveTheme::Dark));
        assert_eq!(store.effective(), EffectiveTheme::Light);

        store.set_theme(ThemePreference::System);
        assert_eq!(store.effective(), EffectiveTheme::Dark);
        store.set_device_scheme(Some(EffectiveTheme::Light));
        assert_eq!(store.effective(), EffectiveTheme::Light);
    }

    #[test]
    fn subscribers_see_only_real_changes() {
        let mut store = ThemeStore::load(memory(), Some(EffectiveTheme::Light));
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().expect("sender alive"));

        store.set_theme(ThemePreference::System);
        assert!(!rx.has_changed().expect("sender alive"));

        store.set_theme(ThemePreference::Dark);
        assert!(rx.has_changed().expect("sender alive"));
        let seen = *rx.borrow_and_update();
        assert_eq!(seen.preference, ThemePreference::Dark);
        assert_eq!(seen.effective, EffectiveTheme::Dark);

        store.set_device_scheme(Some(EffectiveTheme::Dark));
        assert!(!rx.has_changed().expect("sender alive"));
    }

    #[test]
    fn storage_failures_keep_in_memory_state() {
        let mut store = ThemeStore::load(Arc::new(BrokenStorage), Some(EffectiveTheme::Dark));
        assert_eq!(store.preference(), ThemePreference::System);

        store.set_theme(ThemePreference::Light);
        assert_eq!(store.preference(), ThemePreference::Light);
        assert_eq!(store.effective(), EffectiveTheme::Light);
    }
}
