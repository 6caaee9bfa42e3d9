//! Template persistence with a local-storage fallback.
//!
//! Saving goes to the remote store first. When the remote store is missing
//! its table or is unreachable, the template is written to a key/value local
//! store instead and picked up later by [`TemplateSaver::sync_pending`].

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::invitation::InvitationDraft;
use crate::models::template::{CustomTemplate, NewCustomTemplate};

/// Prefix of every local template key.
pub const LOCAL_KEY_PREFIX: &str = "custom_template_";

/// Prefix of local record ids.
pub const LOCAL_ID_PREFIX: &str = "local_";

pub const REMOTE_REDIRECT_DELAY_MS: u64 = 2000;
pub const TABLE_MISSING_REDIRECT_DELAY_MS: u64 = 3000;
pub const REMOTE_ERROR_REDIRECT_DELAY_MS: u64 = 2000;

/// Postgres "undefined_table".
const UNDEFINED_TABLE_CODE: &str = "42P01";
/// PostgREST relation/row not found.
const POSTGREST_NOT_FOUND_CODE: &str = "PGRST116";

/// Error reported by the remote template store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteError {
    pub code: Option<String>,
    pub message: String,
}

impl RemoteError {
    pub fn new(code: Option<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Whether the error means the templates table has not been created yet.
    pub fn is_table_missing(&self) -> bool {
        matches!(
            self.code.as_deref(),
            Some(UNDEFINED_TABLE_CODE) | Some(POSTGREST_NOT_FOUND_CODE)
        ) || self.message.contains("does not exist")
    }
}

/// Error type for local store operations.
#[derive(Debug, Error)]
pub enum LocalStoreError {
    #[error("Local storage I/O failed: {0}")]
    Io(String),

    #[error("Local record is not valid JSON: {0}")]
    Serialization(String),

    #[error("Invalid local storage key: {0}")]
    InvalidKey(String),
}

/// Destination for templates saved by the editor.
#[async_trait::async_trait]
pub trait RemoteTemplateStore: Send + Sync {
    async fn insert_template(
        &self,
        payload: &NewCustomTemplate,
    ) -> Result<CustomTemplate, RemoteError>;
}

/// Durable string key/value storage for templates awaiting upload.
#[async_trait::async_trait]
pub trait LocalStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, LocalStoreError>;

    async fn set_item(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;

    /// Removing an absent key is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), LocalStoreError>;

    async fn keys(&self) -> Result<Vec<String>, LocalStoreError>;
}

/// In-memory local store for development and testing.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocalStore {
    items: Arc<Mutex<BTreeMap<String, String>>>,
    /// Whether writes should fail.
    pub simulate_failure: bool,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose writes always fail.
    pub fn failing() -> Self {
        Self {
            items: Arc::default(),
            simulate_failure: true,
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, LocalStoreError> {
        self.items
            .lock()
            .map_err(|_| LocalStoreError::Io("local store lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl LocalStore for MemoryLocalStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
        if self.simulate_failure {
            return Err(LocalStoreError::Io("Simulated failure".to_string()));
        }
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), LocalStoreError> {
        self.lock()?.remove(key);
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<String>, LocalStoreError> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

/// Why a template ended up in local storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    TableMissing,
    RemoteError,
}

impl FallbackReason {
    pub fn redirect_delay_ms(&self) -> u64 {
        match self {
            FallbackReason::TableMissing => TABLE_MISSING_REDIRECT_DELAY_MS,
            FallbackReason::RemoteError => REMOTE_ERROR_REDIRECT_DELAY_MS,
        }
    }
}

/// A template waiting in local storage for the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LocalTemplateRecord {
    pub id: String,
    pub payload: NewCustomTemplate,
    pub draft: InvitationDraft,
    pub created_at: DateTime<Utc>,
    pub is_local: bool,
    pub reason: FallbackReason,
}

impl LocalTemplateRecord {
    pub fn key(&self) -> String {
        local_key(&self.id)
    }
}

pub fn local_key(id: &str) -> String {
    format!("{}{}", LOCAL_KEY_PREFIX, id)
}

/// Where a saved template ended up.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "storage", rename_all = "snake_case")]
pub enum SaveOutcome {
    Remote { template: CustomTemplate },
    Local { record: LocalTemplateRecord },
}

impl SaveOutcome {
    pub fn redirect_delay_ms(&self) -> u64 {
        match self {
            SaveOutcome::Remote { .. } => REMOTE_REDIRECT_DELAY_MS,
            SaveOutcome::Local { record } => record.reason.redirect_delay_ms(),
        }
    }

    /// User-facing status line.
    pub fn message(&self) -> &'static str {
        match self {
            SaveOutcome::Remote { .. } => "Template saved successfully!",
            SaveOutcome::Local { record } => match record.reason {
                FallbackReason::TableMissing => {
                    "Template saved locally. It will be synced once the database is set up."
                }
                FallbackReason::RemoteError => {
                    "Template saved locally because the server could not be reached. It will be synced later."
                }
            },
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, SaveOutcome::Local { .. })
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("Template could not be saved remotely ({remote}) or locally ({local})")]
    BothStoresFailed {
        remote: RemoteError,
        local: LocalStoreError,
    },
}

/// Result of a deferred sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SyncReport {
    pub attempted: usize,
    pub synced: usize,
    pub failed: usize,
    pub remaining: usize,
}

/// Saves templates remotely, falling back to local storage.
///
/// Clones share the same stores and locks.
#[derive(Clone)]
pub struct TemplateSaver {
    remote: Arc<dyn RemoteTemplateStore>,
    local: Arc<dyn LocalStore>,
    /// Held from local id allocation until the record is written.
    write_lock: Arc<AsyncMutex<()>>,
    /// One sync run at a time.
    sync_lock: Arc<AsyncMutex<()>>,
}

impl TemplateSaver {
    pub fn new(remote: Arc<dyn RemoteTemplateStore>, local: Arc<dyn LocalStore>) -> Self {
        Self {
            remote,
            local,
            write_lock: Arc::default(),
            sync_lock: Arc::default(),
        }
    }

    /// Saves `payload`, storing `draft` alongside it if the save goes local.
    pub async fn save(
        &self,
        payload: NewCustomTemplate,
        draft: InvitationDraft,
    ) -> Result<SaveOutcome, SaveError> {
        let remote_err = match self.remote.insert_template(&payload).await {
            Ok(template) => {
                info!(
                    template_id = %template.id,
                    user_id = %payload.user_id,
                    "Template saved to remote store"
                );
                return Ok(SaveOutcome::Remote { template });
            }
            Err(e) => e,
        };

        let reason = if remote_err.is_table_missing() {
            warn!(
                user_id = %payload.user_id,
                error = %remote_err,
                "Templates table missing, saving template locally"
            );
            FallbackReason::TableMissing
        } else {
            warn!(
                user_id = %payload.user_id,
                code = ?remote_err.code,
                error = %remote_err,
                "Remote template save failed, saving template locally"
            );
            FallbackReason::RemoteError
        };

        match self.write_local(payload, draft, reason, Utc::now()).await {
            Ok(record) => {
                info!(local_id = %record.id, reason = ?reason, "Template saved to local store");
                Ok(SaveOutcome::Local { record })
            }
            Err(local) => Err(SaveError::BothStoresFailed {
                remote: remote_err,
                local,
            }),
        }
    }

    async fn write_local(
        &self,
        payload: NewCustomTemplate,
        draft: InvitationDraft,
        reason: FallbackReason,
        now: DateTime<Utc>,
    ) -> Result<LocalTemplateRecord, LocalStoreError> {
        let _guard = self.write_lock.lock().await;
        let id = self.unused_local_id(now.timestamp_millis()).await?;
        let record = LocalTemplateRecord {
            id,
            payload,
            draft,
            created_at: now,
            is_local: true,
            reason,
        };
        let json = serde_json::to_string(&record)
            .map_err(|e| LocalStoreError::Serialization(e.to_string()))?;
        self.local.set_item(&record.key(), &json).await?;
        Ok(record)
    }

    async fn unused_local_id(&self, mut millis: i64) -> Result<String, LocalStoreError> {
        loop {
            let id = format!("{}{}", LOCAL_ID_PREFIX, millis);
            if self.local.get_item(&local_key(&id)).await?.is_none() {
                return Ok(id);
            }
            millis += 1;
        }
    }

    async fn load_records(&self) -> Result<Vec<LocalTemplateRecord>, LocalStoreError> {
        let mut records = Vec::new();
        for key in self.local.keys().await? {
            if !key.starts_with(LOCAL_KEY_PREFIX) {
                continue;
            }
            let Some(raw) = self.local.get_item(&key).await? else {
                continue;
            };
            match serde_json::from_str::<LocalTemplateRecord>(&raw) {
                Ok(record) => records.push(record),
                Err(e) => warn!(key = %key, error = %e, "Skipping unreadable local template"),
            }
        }
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    /// Lists a user's templates still waiting in local storage, oldest first.
    pub async fn list_pending(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<LocalTemplateRecord>, LocalStoreError> {
        Ok(self
            .load_records()
            .await?
            .into_iter()
            .filter(|r| r.payload.user_id == user_id)
            .collect())
    }

    /// Pushes local templates to the remote store.
    ///
    /// With `filter_user` set only that user's records are considered. The run
    /// stops at the first table-missing error since every later insert would
    /// fail the same way. Concurrent calls run one after another, so a record
    /// is never inserted twice by overlapping runs.
    pub async fn sync_pending(
        &self,
        filter_user: Option<Uuid>,
    ) -> Result<SyncReport, LocalStoreError> {
        let _guard = self.sync_lock.lock().await;
        let records: Vec<LocalTemplateRecord> = self
            .load_records()
            .await?
            .into_iter()
            .filter(|r| filter_user.map_or(true, |u| r.payload.user_id == u))
            .collect();

        let mut report = SyncReport::default();
        for record in &records {
            report.attempted += 1;
            match self.remote.insert_template(&record.payload).await {
                Ok(template) => {
                    report.synced += 1;
                    info!(local_id = %record.id, template_id = %template.id, "Local template synced");
                    if let Err(e) = self.local.remove_item(&record.key()).await {
                        warn!(
                            local_id = %record.id,
                            error = %e,
                            "Synced template could not be removed from local store"
                        );
                    }
                }
                Err(e) if e.is_table_missing() => {
                    report.failed += 1;
                    debug!(local_id = %record.id, "Templates table still missing, stopping sync");
                    break;
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(local_id = %record.id, error = %e, "Failed to sync local template");
                }
            }
        }
        report.remaining = records.len() - report.synced;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::template::TemplateConfig;
    use chrono::NaiveDate;

    /// Remote store whose behaviour is fixed per test.
    struct FakeRemote {
        error: Mutex<Option<RemoteError>>,
        inserted: Mutex<Vec<NewCustomTemplate>>,
    }

    impl FakeRemote {
        fn ok() -> Self {
            Self {
                error: Mutex::new(None),
                inserted: Mutex::new(Vec::new()),
            }
        }

        fn failing(code: Option<&str>, message: &str) -> Self {
            Self {
                error: Mutex::new(Some(RemoteError::new(code.map(str::to_string), message))),
                inserted: Mutex::new(Vec::new()),
            }
        }

        fn recover(&self) {
            *self.error.lock().unwrap() = None;
        }

        fn inserted(&self) -> usize {
            self.inserted.lock().unwrap().len()
        }
    }

    #[async_trait::async_trait]
    impl RemoteTemplateStore for FakeRemote {
        async fn insert_template(
            &self,
            payload: &NewCustomTemplate,
        ) -> Result<CustomTemplate, RemoteError> {
            if let Some(err) = self.error.lock().unwrap().clone() {
                return Err(err);
            }
            self.inserted.lock().unwrap().push(payload.clone());
            Ok(CustomTemplate {
                id: Uuid::new_v4(),
                user_id: Some(payload.user_id),
                name: payload.name.clone(),
                description: payload.description.clone(),
                category: payload.category.clone(),
                is_public: payload.is_public,
                is_featured: payload.is_featured,
                config: payload.config.clone(),
                custom_css: None,
                preview_image: None,
                usage_count: 0,
                is_active: true,
                tags: payload.tags.clone(),
                metadata: payload.metadata.clone(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        }
    }

    fn payload(user_id: Uuid) -> NewCustomTemplate {
        NewCustomTemplate::from_editor(
            user_id,
            "Spring",
            TemplateConfig::default(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        )
    }

    fn saver(remote: Arc<FakeRemote>, local: Arc<MemoryLocalStore>) -> TemplateSaver {
        TemplateSaver::new(remote, local)
    }

    #[test]
    fn test_table_missing_detection() {
        assert!(RemoteError::new(Some("42P01".into()), "x").is_table_missing());
        assert!(RemoteError::new(Some("PGRST116".into()), "x").is_table_missing());
        assert!(RemoteError::new(None, "relation \"custom_templates\" does not exist")
            .is_table_missing());
        assert!(!RemoteError::new(Some("23505".into()), "duplicate key").is_table_missing());
        assert!(!RemoteError::new(None, "connection refused").is_table_missing());
    }

    #[tokio::test]
    async fn test_remote_save() {
        let remote = Arc::new(FakeRemote::ok());
        let local = Arc::new(MemoryLocalStore::new());
        let outcome = saver(remote.clone(), local.clone())
            .save(payload(Uuid::new_v4()), InvitationDraft::default())
            .await
            .unwrap();

        assert!(!outcome.is_local());
        assert_eq!(outcome.redirect_delay_ms(), 2000);
        assert_eq!(outcome.message(), "Template saved successfully!");
        assert_eq!(remote.inserted(), 1);
        assert!(local.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_table_missing_falls_back_to_local() {
        let remote = Arc::new(FakeRemote::failing(Some("42P01"), "relation does not exist"));
        let local = Arc::new(MemoryLocalStore::new());
        let outcome = saver(remote, local.clone())
            .save(payload(Uuid::new_v4()), InvitationDraft::default())
            .await
            .unwrap();

        let SaveOutcome::Local { record } = &outcome else {
            panic!("expected local outcome");
        };
        assert_eq!(record.reason, FallbackReason::TableMissing);
        assert!(record.is_local);
        assert!(record.id.starts_with("local_"));
        assert_eq!(outcome.redirect_delay_ms(), 3000);

        let keys = local.keys().await.unwrap();
        assert_eq!(keys, vec![format!("custom_template_{}", record.id)]);
    }

    #[tokio::test]
    async fn test_other_remote_error_keeps_draft_locally() {
        let remote = Arc::new(FakeRemote::failing(None, "connection refused"));
        let local = Arc::new(MemoryLocalStore::new());
        let mut draft = InvitationDraft::default();
        draft.venue = "Navruz Hall".to_string();

        let outcome = saver(remote, local.clone())
            .save(payload(Uuid::new_v4()), draft)
            .await
            .unwrap();

        let SaveOutcome::Local { record } = outcome else {
            panic!("expected local outcome");
        };
        assert_eq!(record.reason, FallbackReason::RemoteError);

        let raw = local.get_item(&record.key()).await.unwrap().unwrap();
        let stored: LocalTemplateRecord = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.draft.venue, "Navruz Hall");
        assert_eq!(stored.payload.name, "Spring");
    }

    #[tokio::test]
    async fn test_both_stores_failing() {
        let remote = Arc::new(FakeRemote::failing(None, "timeout"));
        let local = Arc::new(MemoryLocalStore::failing());
        let result = saver(remote, local)
            .save(payload(Uuid::new_v4()), InvitationDraft::default())
            .await;

        assert!(matches!(result, Err(SaveError::BothStoresFailed { .. })));
    }

    #[tokio::test]
    async fn test_local_ids_do_not_collide() {
        let remote = Arc::new(FakeRemote::failing(Some("42P01"), "missing"));
        let local = Arc::new(MemoryLocalStore::new());
        let saver = saver(remote, local.clone());
        let user = Uuid::new_v4();

        for _ in 0..3 {
            saver.save(payload(user), InvitationDraft::default()).await.unwrap();
        }

        assert_eq!(local.keys().await.unwrap().len(), 3);
        assert_eq!(saver.list_pending(user).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_sync_pending_pushes_and_removes() {
        let remote = Arc::new(FakeRemote::failing(Some("42P01"), "missing"));
        let local = Arc::new(MemoryLocalStore::new());
        let saver = saver(remote.clone(), local.clone());
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        saver.save(payload(alice), InvitationDraft::default()).await.unwrap();
        saver.save(payload(bob), InvitationDraft::default()).await.unwrap();

        remote.recover();
        let report = saver.sync_pending(Some(alice)).await.unwrap();
        assert_eq!(
            report,
            SyncReport {
                attempted: 1,
                synced: 1,
                failed: 0,
                remaining: 0
            }
        );
        assert!(saver.list_pending(alice).await.unwrap().is_empty());
        assert_eq!(saver.list_pending(bob).await.unwrap().len(), 1);

        let report = saver.sync_pending(None).await.unwrap();
        assert_eq!(report.synced, 1);
        assert!(local.keys().await.unwrap().is_empty());
        assert_eq!(remote.inserted(), 2);
    }

    #[tokio::test]
    async fn test_sync_stops_while_table_missing() {
        let remote = Arc::new(FakeRemote::failing(Some("42P01"), "missing"));
        let local = Arc::new(MemoryLocalStore::new());
        let saver = saver(remote, local);
        let user = Uuid::new_v4();

        for _ in 0..3 {
            saver.save(payload(user), InvitationDraft::default()).await.unwrap();
        }

        let report = saver.sync_pending(None).await.unwrap();
        assert_eq!(report.attempted, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.remaining, 3);
    }

    #[tokio::test]
    async fn test_unreadable_records_are_skipped() {
        let remote = Arc::new(FakeRemote::ok());
        let local = Arc::new(MemoryLocalStore::new());
        local.set_item("custom_template_local_1", "{not json").await.unwrap();
        local.set_item("theme", "dark").await.unwrap();

        let report = saver(remote, local.clone()).sync_pending(None).await.unwrap();
        assert_eq!(report.attempted, 0);
        assert_eq!(local.keys().await.unwrap().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_local_saves_keep_every_record() {
        let remote = Arc::new(FakeRemote::failing(Some("42P01"), "missing"));
        let local = Arc::new(MemoryLocalStore::new());
        let saver = saver(remote, local.clone());
        let user = Uuid::new_v4();

        let handles: Vec<_> = (0..25)
            .map(|_| {
                let saver = saver.clone();
                tokio::spawn(
                    async move { saver.save(payload(user), InvitationDraft::default()).await },
                )
            })
            .collect();

        let mut ids = std::collections::HashSet::new();
        for handle in handles {
            let SaveOutcome::Local { record } = handle.await.unwrap().unwrap() else {
                panic!("expected local outcome");
            };
            ids.insert(record.id);
        }

        assert_eq!(ids.len(), 25);
        assert_eq!(local.keys().await.unwrap().len(), 25);
    }

    /// Remote that answers slowly, so overlapping sync runs interleave.
    #[derive(Default)]
    struct SlowRemote {
        online: std::sync::atomic::AtomicBool,
        inserted: std::sync::atomic::AtomicUsize,
    }

    #[async_trait::async_trait]
    impl RemoteTemplateStore for SlowRemote {
        async fn insert_template(
            &self,
            payload: &NewCustomTemplate,
        ) -> Result<CustomTemplate, RemoteError> {
            use std::sync::atomic::Ordering;

            if !self.online.load(Ordering::SeqCst) {
                return Err(RemoteError::new(Some("42P01".into()), "missing"));
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            self.inserted.fetch_add(1, Ordering::SeqCst);
            FakeRemote::ok().insert_template(payload).await
        }
    }

    #[tokio::test]
    async fn test_overlapping_syncs_insert_each_record_once() {
        use std::sync::atomic::Ordering;

        let remote = Arc::new(SlowRemote::default());
        let local = Arc::new(MemoryLocalStore::new());
        let saver = TemplateSaver::new(remote.clone(), local.clone());
        let user = Uuid::new_v4();
        for _ in 0..3 {
            saver.save(payload(user), InvitationDraft::default()).await.unwrap();
        }

        remote.online.store(true, Ordering::SeqCst);
        let (first, second) = tokio::join!(saver.sync_pending(None), saver.sync_pending(None));

        assert_eq!(first.unwrap().synced + second.unwrap().synced, 3);
        assert_eq!(remote.inserted.load(Ordering::SeqCst), 3);
        assert!(local.keys().await.unwrap().is_empty());
    }

    /// Local store whose removals always fail.
    struct StickyStore(MemoryLocalStore);

    #[async_trait::async_trait]
    impl LocalStore for StickyStore {
        async fn get_item(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
            self.0.get_item(key).await
        }

        async fn set_item(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
            self.0.set_item(key, value).await
        }

        async fn remove_item(&self, _key: &str) -> Result<(), LocalStoreError> {
            Err(LocalStoreError::Io("read-only".to_string()))
        }

        async fn keys(&self) -> Result<Vec<String>, LocalStoreError> {
            self.0.keys().await
        }
    }

    #[tokio::test]
    async fn test_sync_continues_when_removal_fails() {
        let remote = Arc::new(FakeRemote::failing(Some("42P01"), "missing"));
        let local = Arc::new(StickyStore(MemoryLocalStore::new()));
        let saver = TemplateSaver::new(remote.clone(), local);
        let user = Uuid::new_v4();
        saver.save(payload(user), InvitationDraft::default()).await.unwrap();
        saver.save(payload(user), InvitationDraft::default()).await.unwrap();

        remote.recover();
        let report = saver.sync_pending(None).await.unwrap();

        assert_eq!(report.attempted, 2);
        assert_eq!(report.synced, 2);
        assert_eq!(report.failed, 0);
        assert_eq!(remote.inserted(), 2);
    }
}
