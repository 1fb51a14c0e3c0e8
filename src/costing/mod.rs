//! Wage-to-employer-cost conversion and line-item derivation.

pub mod entry;
pub mod rates;
pub mod wage;

pub use entry::{
    derive_labor_entry, derive_material_entry, LaborEntry, LaborInput, MaterialEntry,
    MaterialInput,
};
pub use rates::CostRates;
pub use wage::{WageBreakdown, WageConverter};
