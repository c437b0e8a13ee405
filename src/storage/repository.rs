//! Entity repository for JSON storage
//!
//! Stores one entity type in `data/<file>.json` and reports every mutation
//! to the change auditor in the same call. The audit record is written
//! before the mutation is applied, so a failing audit store aborts the
//! mutation and leaves the repository untouched.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::warn;

use crate::audit::{AuditRecord, AuditStore, ChangeAuditor, RequestContext};
use crate::error::{AuditError, AuditResult};
use crate::models::Entity;

use super::entity_file::EntityFile;

struct State<T> {
    entities: BTreeMap<u64, T>,
    next_id: u64,
}

/// Repository for one audited entity type
pub struct EntityRepository<T, S> {
    file: EntityFile,
    state: RwLock<State<T>>,
    auditor: ChangeAuditor<S>,
}

impl<T: Entity, S: AuditStore> EntityRepository<T, S> {
    /// Create a repository backed by `path`, auditing into `store`
    pub fn new(path: PathBuf, store: S) -> Self {
        Self {
            file: EntityFile::new(path, T::SUBJECT_TYPE),
            state: RwLock::new(State {
                entities: BTreeMap::new(),
                next_id: 1,
            }),
            auditor: ChangeAuditor::new(store),
        }
    }

    /// The auditor this repository reports to
    pub fn auditor(&self) -> &ChangeAuditor<S> {
        &self.auditor
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Load entities from disk
    pub fn load(&self) -> AuditResult<()> {
        let file_data = self.file.read::<T>()?;
        let mut state = self.write()?;

        state.entities = file_data
            .entities
            .into_iter()
            .map(|e| (e.id(), e))
            .collect();
        let max_id = state.entities.keys().next_back().copied().unwrap_or(0);
        state.next_id = file_data.next_id.max(max_id + 1);

        Ok(())
    }

    /// Save entities to disk
    pub fn save(&self) -> AuditResult<()> {
        let state = self.read()?;
        self.persist(&state)
    }

    /// Insert a new entity, assigning its ID, and record `created`
    pub fn create(&self, ctx: &RequestContext, mut entity: T) -> AuditResult<T> {
        entity.validate()?;

        let mut state = self.write()?;
        let id = state.next_id;
        entity.set_id(id);
        entity.set_deleted_at(None);

        let record = self.auditor.created(ctx, &entity)?;

        state.entities.insert(id, entity.clone());
        state.next_id = id + 1;
        if let Err(e) = self.persist(&state) {
            state.entities.remove(&id);
            state.next_id = id;
            return Err(unsaved::<T>(&record, id, e));
        }

        Ok(entity)
    }

    /// Apply `change` to a live entity and record `updated`
    ///
    /// The ID and soft-delete state cannot be changed through `change`. No
    /// audit record is written when no audited attribute changed.
    pub fn update<F>(&self, ctx: &RequestContext, id: u64, change: F) -> AuditResult<T>
    where
        F: FnOnce(&mut T),
    {
        let mut state = self.write()?;
        let original = live(&state, id)?.clone();

        let mut current = original.clone();
        change(&mut current);
        current.set_id(id);
        current.set_deleted_at(None);
        current.validate()?;

        let record = self.auditor.updated(ctx, &original, &current)?;

        state.entities.insert(id, current.clone());
        if let Err(e) = self.persist(&state) {
            state.entities.insert(id, original);
            return Err(match record {
                Some(record) => unsaved::<T>(&record, id, e),
                None => e,
            });
        }

        Ok(current)
    }

    /// Soft-delete a live entity and record `deleted`
    pub fn delete(&self, ctx: &RequestContext, id: u64) -> AuditResult<T> {
        let mut state = self.write()?;
        let original = live(&state, id)?.clone();

        let record = self.auditor.deleted(ctx, &original)?;

        let mut trashed = original.clone();
        trashed.set_deleted_at(Some(Utc::now()));
        state.entities.insert(id, trashed.clone());
        if let Err(e) = self.persist(&state) {
            state.entities.insert(id, original);
            return Err(unsaved::<T>(&record, id, e));
        }

        Ok(trashed)
    }

    /// Restore a soft-deleted entity and record `restored`
    pub fn restore(&self, ctx: &RequestContext, id: u64) -> AuditResult<T> {
        let mut state = self.write()?;
        let trashed = state
            .entities
            .get(&id)
            .cloned()
            .ok_or_else(|| AuditError::not_found(T::SUBJECT_TYPE, id.to_string()))?;

        if !trashed.is_trashed() {
            return Err(AuditError::Validation(format!(
                "{} #{} is not deleted",
                T::SUBJECT_TYPE,
                id
            )));
        }

        let mut restored = trashed.clone();
        restored.set_deleted_at(None);

        let record = self.auditor.restored(ctx, &restored)?;

        state.entities.insert(id, restored.clone());
        if let Err(e) = self.persist(&state) {
            state.entities.insert(id, trashed);
            return Err(unsaved::<T>(&record, id, e));
        }

        Ok(restored)
    }

    /// Get a live entity by ID
    pub fn get(&self, id: u64) -> AuditResult<Option<T>> {
        let state = self.read()?;
        Ok(state.entities.get(&id).filter(|e| !e.is_trashed()).cloned())
    }

    /// Get an entity by ID, including soft-deleted ones
    pub fn get_with_trashed(&self, id: u64) -> AuditResult<Option<T>> {
        let state = self.read()?;
        Ok(state.entities.get(&id).cloned())
    }

    /// All live entities, ordered by ID
    pub fn list(&self) -> AuditResult<Vec<T>> {
        let state = self.read()?;
        Ok(state
            .entities
            .values()
            .filter(|e| !e.is_trashed())
            .cloned()
            .collect())
    }

    /// All entities including soft-deleted ones, ordered by ID
    pub fn list_with_trashed(&self) -> AuditResult<Vec<T>> {
        let state = self.read()?;
        Ok(state.entities.values().cloned().collect())
    }

    /// All soft-deleted entities, ordered by ID
    pub fn list_trashed(&self) -> AuditResult<Vec<T>> {
        let state = self.read()?;
        Ok(state
            .entities
            .values()
            .filter(|e| e.is_trashed())
            .cloned()
            .collect())
    }

    /// Count live entities
    pub fn count(&self) -> AuditResult<usize> {
        let state = self.read()?;
        Ok(state.entities.values().filter(|e| !e.is_trashed()).count())
    }

    fn persist(&self, state: &State<T>) -> AuditResult<()> {
        self.file.write(state.next_id, state.entities.values())
    }

    fn read(&self) -> AuditResult<RwLockReadGuard<'_, State<T>>> {
        self.state
            .read()
            .map_err(|e| AuditError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> AuditResult<RwLockWriteGuard<'_, State<T>>> {
        self.state
            .write()
            .map_err(|e| AuditError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

fn live<T: Entity>(state: &State<T>, id: u64) -> AuditResult<&T> {
    state
        .entities
        .get(&id)
        .filter(|e| !e.is_trashed())
        .ok_or_else(|| AuditError::not_found(T::SUBJECT_TYPE, id.to_string()))
}

/// The entity write failed after `record` was appended to the log
fn unsaved<T: Entity>(record: &AuditRecord, id: u64, err: AuditError) -> AuditError {
    warn!(
        subject_type = T::SUBJECT_TYPE,
        id,
        record_id = %record.id,
        action = %record.action,
        error = %err,
        "Audited change not persisted"
    );

    let detail = match err {
        AuditError::Storage(msg) => msg,
        other => other.to_string(),
    };
    AuditError::Storage(format!(
        "{}; audit record {} describes a change that was not saved",
        detail, record.id
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{Actor, AuditAction, AuditRecord, MemoryStore};
    use crate::models::{Agency, User};
    use serde_json::json;
    use std::sync::Arc;
    use tempfile::TempDir;

    struct FailingStore;

    impl AuditStore for FailingStore {
        fn append(&self, _record: &AuditRecord) -> AuditResult<()> {
            Err(AuditError::Storage("audit table unavailable".into()))
        }

        fn records(&self) -> AuditResult<Vec<AuditRecord>> {
            Ok(Vec::new())
        }
    }

    fn create_test_repo() -> (TempDir, Arc<MemoryStore>, EntityRepository<Agency, Arc<MemoryStore>>) {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let repo = EntityRepository::new(temp_dir.path().join("agencies.json"), Arc::clone(&store));
        (temp_dir, store, repo)
    }

    fn ctx() -> RequestContext {
        RequestContext::request("10.0.0.5", "Mozilla/5.0").with_actor(Actor::user("1"))
    }

    #[test]
    fn test_create_assigns_ids_and_audits() {
        let (_temp, store, repo) = create_test_repo();

        let first = repo.create(&ctx(), Agency::new("Acme Agency", "555-0100")).unwrap();
        let second = repo.create(&ctx(), Agency::new("Bright Care", "555-0200")).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let records = store.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].action, AuditAction::Created);
        assert_eq!(records[0].subject_id.as_deref(), Some("1"));
        assert_eq!(records[0].summary, "Agency 'Acme Agency' was created");
    }

    #[test]
    fn test_update_records_only_changed_fields() {
        let (_temp, store, repo) = create_test_repo();
        let agency = repo.create(&ctx(), Agency::new("Acme Agency", "555-0100")).unwrap();

        let updated = repo
            .update(&ctx(), agency.id, |a| a.phone = "555-0199".into())
            .unwrap();
        assert_eq!(updated.phone, "555-0199");

        let records = store.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(serde_json::Value::Object(records[1].before.clone()), json!({"phone": "555-0100"}));
        assert_eq!(serde_json::Value::Object(records[1].after.clone()), json!({"phone": "555-0199"}));
    }

    #[test]
    fn test_noop_update_writes_no_record() {
        let (_temp, store, repo) = create_test_repo();
        let agency = repo.create(&ctx(), Agency::new("Acme Agency", "555-0100")).unwrap();

        repo.update(&ctx(), agency.id, |a| a.phone = "555-0100".into()).unwrap();

        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_cannot_change_id() {
        let (_temp, _store, repo) = create_test_repo();
        let agency = repo.create(&ctx(), Agency::new("Acme Agency", "555-0100")).unwrap();

        let updated = repo.update(&ctx(), agency.id, |a| a.id = 99).unwrap();

        assert_eq!(updated.id, agency.id);
        assert!(repo.get(99).unwrap().is_none());
    }

    #[test]
    fn test_invalid_update_is_rejected_without_audit() {
        let (_temp, store, repo) = create_test_repo();
        let agency = repo.create(&ctx(), Agency::new("Acme Agency", "555-0100")).unwrap();

        let err = repo.update(&ctx(), agency.id, |a| a.name.clear()).unwrap_err();

        assert!(matches!(err, AuditError::Validation(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(repo.get(agency.id).unwrap().unwrap().name, "Acme Agency");
    }

    #[test]
    fn test_delete_and_restore() {
        let (_temp, store, repo) = create_test_repo();
        let agency = repo.create(&ctx(), Agency::new("Acme Agency", "555-0100")).unwrap();

        let trashed = repo.delete(&ctx(), agency.id).unwrap();
        assert!(trashed.deleted_at.is_some());
        assert!(repo.get(agency.id).unwrap().is_none());
        assert_eq!(repo.list_trashed().unwrap().len(), 1);
        assert_eq!(repo.list_with_trashed().unwrap().len(), 1);

        let restored = repo.restore(&ctx(), agency.id).unwrap();
        assert!(restored.deleted_at.is_none());
        assert_eq!(repo.count().unwrap(), 1);

        let actions: Vec<_> = store.records().unwrap().iter().map(|r| r.action).collect();
        assert_eq!(
            actions,
            vec![AuditAction::Created, AuditAction::Deleted, AuditAction::Restored]
        );

        let deleted = &store.records().unwrap()[1];
        assert!(deleted.after.is_empty());
        assert!(!deleted.before.contains_key("deleted_at"));
    }

    #[test]
    fn test_trashed_entities_cannot_be_updated_or_deleted() {
        let (_temp, _store, repo) = create_test_repo();
        let agency = repo.create(&ctx(), Agency::new("Acme Agency", "555-0100")).unwrap();
        repo.delete(&ctx(), agency.id).unwrap();

        assert!(repo.update(&ctx(), agency.id, |a| a.is_active = false).unwrap_err().is_not_found());
        assert!(repo.delete(&ctx(), agency.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_restore_live_entity_is_rejected() {
        let (_temp, store, repo) = create_test_repo();
        let agency = repo.create(&ctx(), Agency::new("Acme Agency", "555-0100")).unwrap();

        assert!(matches!(
            repo.restore(&ctx(), agency.id),
            Err(AuditError::Validation(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_audit_failure_aborts_mutation() {
        let temp_dir = TempDir::new().unwrap();
        let repo: EntityRepository<Agency, FailingStore> =
            EntityRepository::new(temp_dir.path().join("agencies.json"), FailingStore);

        let err = repo.create(&ctx(), Agency::new("Acme Agency", "555-0100")).unwrap_err();

        assert!(err.is_storage());
        assert_eq!(repo.count().unwrap(), 0);
        assert!(!temp_dir.path().join("agencies.json").exists());
    }

    #[test]
    fn test_failed_create_names_its_audit_record() {
        let (temp_dir, store, repo) = create_test_repo();
        std::fs::create_dir(temp_dir.path().join("agencies.json")).unwrap();

        let err = repo.create(&ctx(), Agency::new("Acme Agency", "555-0100")).unwrap_err();

        assert!(err.is_storage());
        assert_eq!(repo.count().unwrap(), 0);

        let records = store.records().unwrap();
        assert_eq!(records.len(), 1);
        assert!(err.to_string().contains(&records[0].id.to_string()));

        // The rolled-back ID is handed out again
        std::fs::remove_dir(temp_dir.path().join("agencies.json")).unwrap();
        let agency = repo.create(&ctx(), Agency::new("Acme Agency", "555-0100")).unwrap();
        assert_eq!(agency.id, 1);
    }

    #[test]
    fn test_failed_update_rolls_back_and_names_its_audit_record() {
        let (temp_dir, store, repo) = create_test_repo();
        let agency = repo.create(&ctx(), Agency::new("Acme Agency", "555-0100")).unwrap();
        let path = temp_dir.path().join("agencies.json");
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        let err = repo
            .update(&ctx(), agency.id, |a| a.phone = "555-0199".into())
            .unwrap_err();

        let records = store.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].action, AuditAction::Updated);
        assert!(err.to_string().contains(&records[1].id.to_string()));
        assert_eq!(repo.get(agency.id).unwrap().unwrap().phone, "555-0100");
    }

    #[test]
    fn test_save_and_reload_keeps_id_sequence() {
        let (temp_dir, store, repo) = create_test_repo();
        repo.create(&ctx(), Agency::new("Acme Agency", "555-0100")).unwrap();
        let second = repo.create(&ctx(), Agency::new("Bright Care", "555-0200")).unwrap();
        repo.delete(&ctx(), second.id).unwrap();

        let reloaded: EntityRepository<Agency, _> =
            EntityRepository::new(temp_dir.path().join("agencies.json"), Arc::clone(&store));
        reloaded.load().unwrap();

        assert_eq!(reloaded.count().unwrap(), 1);
        assert!(reloaded.get_with_trashed(second.id).unwrap().unwrap().deleted_at.is_some());

        let third = reloaded.create(&ctx(), Agency::new("Carewell", "555-0300")).unwrap();
        assert_eq!(third.id, 3);
    }

    #[test]
    fn test_user_credentials_stay_out_of_the_trail() {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(MemoryStore::new());
        let repo: EntityRepository<User, _> =
            EntityRepository::new(temp_dir.path().join("users.json"), Arc::clone(&store));

        let user = repo
            .create(&ctx(), User::new("Dana Carer", "dana@example.com", "$2y$10$a"))
            .unwrap();
        repo.update(&ctx(), user.id, |u| u.password = "$2y$10$b".into()).unwrap();
        repo.update(&ctx(), user.id, |u| {
            u.password = "$2y$10$c".into();
            u.name = "Dana Lead".into();
        })
        .unwrap();

        let records = store.records().unwrap();
        assert_eq!(records.len(), 2);
        assert!(!records[0].after.contains_key("password"));
        assert_eq!(records[1].changed_fields(), vec!["name"]);
        assert_eq!(records[1].summary, "User 'Dana Lead' was updated");
    }
}
