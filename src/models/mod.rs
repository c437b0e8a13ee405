//! Care-home data models
//!
//! The entities whose lifecycle is recorded in the audit trail: residents,
//! users, agencies, therapy sessions, discharges and staff.

pub mod agency;
pub mod discharge;
pub mod entity;
pub mod resident;
pub mod staff_member;
pub mod therapy_session;
pub mod user;

pub use agency::Agency;
pub use discharge::Discharge;
pub use entity::Entity;
pub use resident::Resident;
pub use staff_member::StaffMember;
pub use therapy_session::TherapySession;
pub use user::{User, UserRole};
