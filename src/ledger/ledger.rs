use serde::{Deserialize, Serialize};

use crate::costing::{
    derive_labor_entry, derive_material_entry, LaborEntry, LaborInput, MaterialEntry,
    MaterialInput, WageConverter,
};
use crate::errors::{LedgerError, LedgerResult};

use super::project::{normalize_name, Project, ProjectChanges, ProjectDraft, ProjectId};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// Ordered collection of projects. Every mutation returns a new ledger value and
/// leaves the receiver untouched, whether it succeeds or not.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ledger {
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default = "Ledger::first_project_id")]
    next_project_id: u64,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            projects: Vec::new(),
            next_project_id: Self::first_project_id(),
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn project_by_name(&self, name: &str) -> Option<&Project> {
        let key = normalize_name(name);
        self.projects.iter().find(|project| project.name_key() == key)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn create_project(&self, draft: ProjectDraft) -> LedgerResult<(Ledger, ProjectId)> {
        validate_project_name(&draft.name)?;
        validate_overhead(draft.overhead_percent)?;
        validate_sale_price(draft.sale_price)?;
        self.ensure_unique_name(&draft.name, None)?;

        let mut next = self.clone();
        let id = next.allocate_id()?;
        next.projects.push(Project::new(id, draft));
        tracing::debug!(project = %id, "project created");
        Ok((next, id))
    }

    pub fn delete_project(&self, id: ProjectId) -> LedgerResult<Ledger> {
        let position = self.position(id)?;
        let mut next = self.clone();
        let removed = next.projects.remove(position);
        tracing::debug!(
            project = %id,
            entries = removed.entry_count(),
            "project deleted"
        );
        Ok(next)
    }

    pub fn update_project(&self, id: ProjectId, changes: ProjectChanges) -> LedgerResult<Ledger> {
        self.position(id)?;
        if let Some(name) = changes.name.as_deref() {
            validate_project_name(name)?;
            self.ensure_unique_name(name, Some(id))?;
        }
        if let Some(overhead) = changes.overhead_percent {
            validate_overhead(overhead)?;
        }
        if let Some(sale_price) = changes.sale_price {
            validate_sale_price(sale_price)?;
        }

        let (next, ()) = self.with_project(id, |project| {
            if let Some(name) = changes.name {
                project.name = name.trim().to_string();
            }
            if let Some(overhead) = changes.overhead_percent {
                project.overhead_percent = overhead;
            }
            if let Some(sale_price) = changes.sale_price {
                project.sale_price = sale_price;
            }
            Ok(())
        })?;
        tracing::debug!(project = %id, "project updated");
        Ok(next)
    }

    pub fn add_labor_entry(
        &self,
        converter: &WageConverter,
        project_id: ProjectId,
        input: LaborInput,
    ) -> LedgerResult<(Ledger, LaborEntry)> {
        self.position(project_id)?;
        let entry = derive_labor_entry(converter, input)?;
        let (next, ()) = self.with_project(project_id, |project| {
            project.labor_entries.push(entry.clone());
            Ok(())
        })?;
        tracing::debug!(project = %project_id, "labor entry added");
        Ok((next, entry))
    }

    pub fn add_material_entry(
        &self,
        project_id: ProjectId,
        input: MaterialInput,
    ) -> LedgerResult<(Ledger, MaterialEntry)> {
        self.position(project_id)?;
        let entry = derive_material_entry(input)?;
        let (next, ()) = self.with_project(project_id, |project| {
            project.material_entries.push(entry.clone());
            Ok(())
        })?;
        tracing::debug!(project = %project_id, "material entry added");
        Ok((next, entry))
    }

    /// Re-derives and replaces the labor entry at `index`.
    pub fn update_labor_entry(
        &self,
        converter: &WageConverter,
        project_id: ProjectId,
        index: usize,
        input: LaborInput,
    ) -> LedgerResult<(Ledger, LaborEntry)> {
        let project = self.require(project_id)?;
        ensure_index(project_id, index, project.labor_entries.len(), "labor")?;
        let entry = derive_labor_entry(converter, input)?;
        let (next, ()) = self.with_project(project_id, |project| {
            project.labor_entries[index] = entry.clone();
            Ok(())
        })?;
        tracing::debug!(project = %project_id, index, "labor entry updated");
        Ok((next, entry))
    }

    pub fn update_material_entry(
        &self,
        project_id: ProjectId,
        index: usize,
        input: MaterialInput,
    ) -> LedgerResult<(Ledger, MaterialEntry)> {
        let project = self.require(project_id)?;
        ensure_index(project_id, index, project.material_entries.len(), "material")?;
        let entry = derive_material_entry(input)?;
        let (next, ()) = self.with_project(project_id, |project| {
            project.material_entries[index] = entry.clone();
            Ok(())
        })?;
        tracing::debug!(project = %project_id, index, "material entry updated");
        Ok((next, entry))
    }

    /// Removes the labor entry at `index`; later entries move down by one.
    pub fn delete_labor_entry(
        &self,
        project_id: ProjectId,
        index: usize,
    ) -> LedgerResult<(Ledger, LaborEntry)> {
        let project = self.require(project_id)?;
        ensure_index(project_id, index, project.labor_entries.len(), "labor")?;
        let (next, removed) =
            self.with_project(project_id, |project| Ok(project.labor_entries.remove(index)))?;
        tracing::debug!(project = %project_id, index, "labor entry deleted");
        Ok((next, removed))
    }

    /// Removes the material entry at `index`; later entries move down by one.
    pub fn delete_material_entry(
        &self,
        project_id: ProjectId,
        index: usize,
    ) -> LedgerResult<(Ledger, MaterialEntry)> {
        let project = self.require(project_id)?;
        ensure_index(project_id, index, project.material_entries.len(), "material")?;
        let (next, removed) = self.with_project(project_id, |project| {
            Ok(project.material_entries.remove(index))
        })?;
        tracing::debug!(project = %project_id, index, "material entry deleted");
        Ok((next, removed))
    }

    /// Re-derives every line item under the supplied converter's rates.
    pub fn rederive(&self, converter: &WageConverter) -> LedgerResult<Ledger> {
        let mut next = self.clone();
        for project in &mut next.projects {
            project.labor_entries = project
                .labor_entries
                .iter()
                .map(|entry| derive_labor_entry(converter, entry.input()))
                .collect::<LedgerResult<Vec<_>>>()?;
            project.material_entries = project
                .material_entries
                .iter()
                .map(|entry| derive_material_entry(entry.input()))
                .collect::<LedgerResult<Vec<_>>>()?;
            ensure_finite_total(project)?;
        }
        Ok(next)
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    fn first_project_id() -> u64 {
        1
    }

    fn allocate_id(&mut self) -> LedgerResult<ProjectId> {
        let exhausted = || LedgerError::InvalidInput("project ids are exhausted".into());
        let mut id = self.next_project_id;
        for project in &self.projects {
            id = id.max(project.id.0.checked_add(1).ok_or_else(exhausted)?);
        }
        self.next_project_id = id.checked_add(1).ok_or_else(exhausted)?;
        Ok(ProjectId(id))
    }

    fn position(&self, id: ProjectId) -> LedgerResult<usize> {
        self.projects
            .iter()
            .position(|project| project.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("project {}", id)))
    }

    fn require(&self, id: ProjectId) -> LedgerResult<&Project> {
        let position = self.position(id)?;
        Ok(&self.projects[position])
    }

    fn with_project<T>(
        &self,
        id: ProjectId,
        apply: impl FnOnce(&mut Project) -> LedgerResult<T>,
    ) -> LedgerResult<(Ledger, T)> {
        let position = self.position(id)?;
        let mut next = self.clone();
        let value = apply(&mut next.projects[position])?;
        ensure_finite_total(&next.projects[position])?;
        Ok((next, value))
    }

    fn ensure_unique_name(&self, candidate: &str, exclude: Option<ProjectId>) -> LedgerResult<()> {
        let key = normalize_name(candidate);
        let duplicate = self
            .projects
            .iter()
            .any(|project| project.name_key() == key && exclude != Some(project.id));
        if duplicate {
            Err(LedgerError::DuplicateName(format!(
                "project `{}` already exists",
                candidate.trim()
            )))
        } else {
            Ok(())
        }
    }
}

fn validate_project_name(name: &str) -> LedgerResult<()> {
    if name.trim().is_empty() {
        Err(LedgerError::InvalidInput("project name is empty".into()))
    } else {
        Ok(())
    }
}

fn validate_overhead(overhead_percent: f64) -> LedgerResult<()> {
    if overhead_percent.is_finite() && overhead_percent >= 0.0 {
        Ok(())
    } else {
        Err(LedgerError::InvalidInput(format!(
            "overhead percent must be a non-negative number, got {}",
            overhead_percent
        )))
    }
}

fn validate_sale_price(sale_price: Option<f64>) -> LedgerResult<()> {
    match sale_price {
        Some(price) if !price.is_finite() || price < 0.0 => Err(LedgerError::InvalidInput(
            format!("sale price must be a non-negative number, got {}", price),
        )),
        _ => Ok(()),
    }
}

/// Rejects a project whose aggregate cost no longer fits in an `f64`.
fn ensure_finite_total(project: &Project) -> LedgerResult<()> {
    let labor: f64 = project
        .labor_entries
        .iter()
        .map(|entry| entry.cost_for_hours())
        .sum();
    let material: f64 = project
        .material_entries
        .iter()
        .map(|entry| entry.total())
        .sum();
    let subtotal = labor + material;
    let total = subtotal + subtotal * project.overhead_percent / 100.0;
    if total.is_finite() {
        Ok(())
    } else {
        Err(LedgerError::InvalidInput(format!(
            "total cost of project {} is out of range",
            project.id
        )))
    }
}

fn ensure_index(project_id: ProjectId, index: usize, len: usize, kind: &str) -> LedgerResult<()> {
    if index < len {
        Ok(())
    } else {
        Err(LedgerError::NotFound(format!(
            "{} entry {} in project {} ({} entries)",
            kind, index, project_id, len
        )))
    }
}
