//! Project ledger: projects, their line items, and snapshot-producing CRUD.

#[allow(clippy::module_inception)]
pub mod ledger;
pub mod project;

pub use ledger::{Ledger, CURRENT_SCHEMA_VERSION};
pub use project::{Project, ProjectChanges, ProjectDraft, ProjectId};
