//! Storage layer for care-audit
//!
//! JSON file storage with atomic writes for the audited entities, wired to a
//! shared JSON Lines audit log.

mod entity_file;
pub mod repository;

pub use repository::EntityRepository;

use std::sync::Arc;

use crate::audit::{AuthAuditor, JsonlStore};
use crate::config::paths::AuditPaths;
use crate::error::AuditResult;
use crate::models::{Agency, Discharge, Entity, Resident, StaffMember, TherapySession, User};

/// Audit store shared by every repository
pub type SharedLog = Arc<JsonlStore>;

/// Repository of one entity type writing to the shared audit log
pub type Repository<T> = EntityRepository<T, SharedLog>;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: AuditPaths,
    audit_log: SharedLog,
    pub agencies: Repository<Agency>,
    pub residents: Repository<Resident>,
    pub users: Repository<User>,
    pub therapy_sessions: Repository<TherapySession>,
    pub discharges: Repository<Discharge>,
    pub staff: Repository<StaffMember>,
    pub auth: AuthAuditor<SharedLog>,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: AuditPaths) -> AuditResult<Self> {
        paths.ensure_directories()?;

        let audit_log = Arc::new(JsonlStore::new(paths.audit_log()));

        Ok(Self {
            agencies: repository(&paths, &audit_log),
            residents: repository(&paths, &audit_log),
            users: repository(&paths, &audit_log),
            therapy_sessions: repository(&paths, &audit_log),
            discharges: repository(&paths, &audit_log),
            staff: repository(&paths, &audit_log),
            auth: AuthAuditor::new(Arc::clone(&audit_log)),
            audit_log,
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &AuditPaths {
        &self.paths
    }

    /// The audit log all repositories append to
    pub fn audit_log(&self) -> &JsonlStore {
        &self.audit_log
    }

    /// Load all entity files from disk
    pub fn load_all(&self) -> AuditResult<()> {
        self.agencies.load()?;
        self.residents.load()?;
        self.users.load()?;
        self.therapy_sessions.load()?;
        self.discharges.load()?;
        self.staff.load()?;
        Ok(())
    }

    /// Save all entity files to disk
    pub fn save_all(&self) -> AuditResult<()> {
        self.agencies.save()?;
        self.residents.save()?;
        self.users.save()?;
        self.therapy_sessions.save()?;
        self.discharges.save()?;
        self.staff.save()?;
        Ok(())
    }
}

fn repository<T: Entity>(paths: &AuditPaths, log: &SharedLog) -> Repository<T> {
    EntityRepository::new(paths.entity_file(T::FILE_NAME), Arc::clone(log))
}
