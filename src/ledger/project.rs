use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::costing::{LaborEntry, MaterialEntry};

/// Creation-ordered project identifier, never reused within a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub u64);

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A construction site accruing labor and material line items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub overhead_percent: f64,
    #[serde(default)]
    pub sale_price: Option<f64>,
    pub creation_date: NaiveDate,
    #[serde(default)]
    pub labor_entries: Vec<LaborEntry>,
    #[serde(default)]
    pub material_entries: Vec<MaterialEntry>,
}

impl Project {
    pub(crate) fn new(id: ProjectId, draft: ProjectDraft) -> Self {
        Self {
            id,
            name: draft.name.trim().to_string(),
            overhead_percent: draft.overhead_percent,
            sale_price: draft.sale_price,
            creation_date: draft.creation_date,
            labor_entries: Vec::new(),
            material_entries: Vec::new(),
        }
    }

    pub fn labor_entry(&self, index: usize) -> Option<&LaborEntry> {
        self.labor_entries.get(index)
    }

    pub fn material_entry(&self, index: usize) -> Option<&MaterialEntry> {
        self.material_entries.get(index)
    }

    pub fn entry_count(&self) -> usize {
        self.labor_entries.len() + self.material_entries.len()
    }

    /// Case-insensitive comparison key for the project name.
    pub fn name_key(&self) -> String {
        normalize_name(&self.name)
    }
}

/// Values required to open a new project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub name: String,
    pub overhead_percent: f64,
    pub sale_price: Option<f64>,
    pub creation_date: NaiveDate,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>, overhead_percent: f64, creation_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            overhead_percent,
            sale_price: None,
            creation_date,
        }
    }

    pub fn with_sale_price(mut self, sale_price: f64) -> Self {
        self.sale_price = Some(sale_price);
        self
    }
}

/// Partial update of a project's own fields. `None` leaves a field untouched;
/// `sale_price: Some(None)` clears the sale price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub overhead_percent: Option<f64>,
    pub sale_price: Option<Option<f64>>,
}

impl ProjectChanges {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.overhead_percent.is_none() && self.sale_price.is_none()
    }
}

pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
