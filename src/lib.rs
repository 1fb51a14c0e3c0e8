#![doc(test(attr(deny(warnings))))]

//! Costing Core turns net wages into employer cost, aggregates labor and
//! material expenses per construction project, and derives break-even totals
//! and margins against quoted sale prices.

pub mod config;
pub mod core;
pub mod costing;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::services::{PortfolioSummary, ProjectReport, ProjectSummary, SummaryService};
pub use costing::{CostRates, WageConverter};
pub use errors::{CostingError, LedgerError};
pub use ledger::{Ledger, ProjectId};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Costing Core tracing initialized.");
    });
}
