pub mod json_backend;

use std::collections::HashSet;

use crate::{
    costing::{derive_labor_entry, derive_material_entry, WageConverter},
    errors::CostingError,
    ledger::Ledger,
};

pub type Result<T> = std::result::Result<T, CostingError>;

const DRIFT_TOLERANCE: f64 = 1e-6;

/// Abstraction over persistence backends that store whole ledger snapshots.
pub trait StorageBackend: Send + Sync {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<Ledger>;
    fn exists(&self, name: &str) -> bool;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn backup(&self, ledger: &Ledger, name: &str, note: Option<&str>) -> Result<String>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<Ledger>;

    /// Loads the named ledger, or hands back an empty one when nothing was saved yet.
    fn load_or_empty(&self, name: &str) -> Result<Ledger> {
        if self.exists(name) {
            self.load(name)
        } else {
            Ok(Ledger::new())
        }
    }
}

/// Lists inconsistencies in a loaded snapshot: duplicate project names, and
/// stored derived amounts that disagree with a re-derivation under `converter`.
pub fn ledger_warnings(ledger: &Ledger, converter: &WageConverter) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();

    for project in ledger.projects() {
        if !seen.insert(project.name_key()) {
            warnings.push(format!(
                "project {} duplicates the name `{}`",
                project.id, project.name
            ));
        }
        for (index, entry) in project.labor_entries.iter().enumerate() {
            match derive_labor_entry(converter, entry.input()) {
                Ok(fresh) if drifted(fresh.cost_for_hours(), entry.cost_for_hours()) => {
                    warnings.push(format!(
                        "labor entry {} of project {} was costed under different rates",
                        index, project.id
                    ))
                }
                Ok(_) => {}
                Err(err) => warnings.push(format!(
                    "labor entry {} of project {} is invalid: {}",
                    index, project.id, err
                )),
            }
        }
        for (index, entry) in project.material_entries.iter().enumerate() {
            match derive_material_entry(entry.input()) {
                Ok(fresh) if drifted(fresh.total(), entry.total()) => warnings.push(format!(
                    "material entry {} of project {} has a stale total",
                    index, project.id
                )),
                Ok(_) => {}
                Err(err) => warnings.push(format!(
                    "material entry {} of project {} is invalid: {}",
                    index, project.id, err
                )),
            }
        }
    }
    warnings
}

fn drifted(expected: f64, stored: f64) -> bool {
    (expected - stored).abs() > DRIFT_TOLERANCE * expected.abs().max(1.0)
}

pub use json_backend::JsonStorage;
