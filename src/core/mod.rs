//! Services, session management, and filesystem helpers built on the ledger.

pub mod ledger_manager;
pub mod services;
pub mod utils;

pub use ledger_manager::{LedgerManager, LoadMetadata};
