use crate::{
    costing::{LaborEntry, LaborInput, MaterialEntry, MaterialInput, WageConverter},
    errors::{LedgerResult, Result},
    ledger::{Ledger, ProjectChanges, ProjectDraft, ProjectId},
    storage::{ledger_warnings, StorageBackend},
};

const DEFAULT_HISTORY_DEPTH: usize = 50;

/// Outcome of opening a ledger.
#[derive(Debug, Clone)]
pub struct LoadMetadata {
    pub name: String,
    pub warnings: Vec<String>,
    pub created: bool,
}

/// A ledger together with the rates its entries were derived under.
#[derive(Debug, Clone)]
struct Snapshot {
    ledger: Ledger,
    converter: WageConverter,
}

/// Facade that owns the current ledger snapshot, applies mutations, and
/// persists every accepted change.
pub struct LedgerManager {
    current: Ledger,
    name: String,
    converter: WageConverter,
    storage: Box<dyn StorageBackend>,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    history_depth: usize,
}

impl LedgerManager {
    pub fn new(
        storage: Box<dyn StorageBackend>,
        converter: WageConverter,
        name: impl Into<String>,
    ) -> Self {
        Self {
            current: Ledger::new(),
            name: name.into(),
            converter,
            storage,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            history_depth: DEFAULT_HISTORY_DEPTH,
        }
    }

    pub fn with_history_depth(mut self, depth: usize) -> Self {
        self.history_depth = depth;
        self
    }

    /// Loads the named ledger, or starts an empty one when nothing is stored yet.
    pub fn open(&mut self, name: &str) -> Result<LoadMetadata> {
        let created = !self.storage.exists(name);
        let ledger = self.storage.load_or_empty(name)?;
        let warnings = ledger_warnings(&ledger, &self.converter);
        for warning in &warnings {
            tracing::warn!(ledger = name, "{}", warning);
        }
        self.current = ledger;
        self.name = name.to_string();
        self.undo_stack.clear();
        self.redo_stack.clear();
        tracing::info!(
            ledger = name,
            projects = self.current.len(),
            created,
            "ledger opened"
        );
        Ok(LoadMetadata {
            name: self.name.clone(),
            warnings,
            created,
        })
    }

    pub fn current(&self) -> &Ledger {
        &self.current
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn converter(&self) -> &WageConverter {
        &self.converter
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn save(&self) -> Result<()> {
        self.storage.save(&self.current, &self.name)
    }

    pub fn backup(&self, note: Option<&str>) -> Result<String> {
        self.storage.backup(&self.current, &self.name, note)
    }

    /// Replaces the current ledger with a backup and returns the same load
    /// warnings `open` reports.
    pub fn restore(&mut self, backup_name: &str) -> Result<Vec<String>> {
        let restored = self.storage.restore(&self.name, backup_name)?;
        let warnings = ledger_warnings(&restored, &self.converter);
        for warning in &warnings {
            tracing::warn!(ledger = %self.name, backup = backup_name, "{}", warning);
        }
        let previous = self.replace_current(restored, self.converter);
        self.push_history(previous);
        self.redo_stack.clear();
        Ok(warnings)
    }

    /// Swaps in a converter for new rates and re-derives every stored entry.
    pub fn change_rates(&mut self, converter: WageConverter) -> Result<()> {
        let next = self.current.rederive(&converter)?;
        self.commit(next, converter)
    }

    pub fn create_project(&mut self, draft: ProjectDraft) -> Result<ProjectId> {
        let outcome = self.current.create_project(draft);
        self.apply("create project", outcome)
    }

    pub fn update_project(&mut self, id: ProjectId, changes: ProjectChanges) -> Result<()> {
        let outcome = self.current.update_project(id, changes).map(|next| (next, ()));
        self.apply("update project", outcome)
    }

    pub fn delete_project(&mut self, id: ProjectId) -> Result<()> {
        let outcome = self.current.delete_project(id).map(|next| (next, ()));
        self.apply("delete project", outcome)
    }

    pub fn add_labor_entry(&mut self, project: ProjectId, input: LaborInput) -> Result<LaborEntry> {
        let outcome = self.current.add_labor_entry(&self.converter, project, input);
        self.apply("add labor entry", outcome)
    }

    pub fn update_labor_entry(
        &mut self,
        project: ProjectId,
        index: usize,
        input: LaborInput,
    ) -> Result<LaborEntry> {
        let outcome = self
            .current
            .update_labor_entry(&self.converter, project, index, input);
        self.apply("update labor entry", outcome)
    }

    pub fn delete_labor_entry(&mut self, project: ProjectId, index: usize) -> Result<LaborEntry> {
        let outcome = self.current.delete_labor_entry(project, index);
        self.apply("delete labor entry", outcome)
    }

    pub fn add_material_entry(
        &mut self,
        project: ProjectId,
        input: MaterialInput,
    ) -> Result<MaterialEntry> {
        let outcome = self.current.add_material_entry(project, input);
        self.apply("add material entry", outcome)
    }

    pub fn update_material_entry(
        &mut self,
        project: ProjectId,
        index: usize,
        input: MaterialInput,
    ) -> Result<MaterialEntry> {
        let outcome = self.current.update_material_entry(project, index, input);
        self.apply("update material entry", outcome)
    }

    pub fn delete_material_entry(
        &mut self,
        project: ProjectId,
        index: usize,
    ) -> Result<MaterialEntry> {
        let outcome = self.current.delete_material_entry(project, index);
        self.apply("delete material entry", outcome)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Reverts to the previous snapshot. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<bool> {
        let Some(previous) = self.undo_stack.pop() else {
            return Ok(false);
        };
        if let Err(err) = self.storage.save(&previous.ledger, &self.name) {
            self.undo_stack.push(previous);
            return Err(err);
        }
        let undone = self.replace_current(previous.ledger, previous.converter);
        self.redo_stack.push(undone);
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool> {
        let Some(next) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(err) = self.storage.save(&next.ledger, &self.name) {
            self.redo_stack.push(next);
            return Err(err);
        }
        let previous = self.replace_current(next.ledger, next.converter);
        self.push_history(previous);
        Ok(true)
    }

    fn apply<T>(&mut self, action: &str, outcome: LedgerResult<(Ledger, T)>) -> Result<T> {
        match outcome {
            Ok((next, value)) => {
                self.commit(next, self.converter)?;
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(ledger = %self.name, action, error = %err, "mutation rejected");
                Err(err.into())
            }
        }
    }

    /// Persists `next` and makes it current; on a failed save the previous
    /// snapshot stays current.
    fn commit(&mut self, next: Ledger, converter: WageConverter) -> Result<()> {
        self.storage.save(&next, &self.name)?;
        let previous = self.replace_current(next, converter);
        self.push_history(previous);
        self.redo_stack.clear();
        Ok(())
    }

    /// Installs a ledger with its rates and hands back the pair it replaced.
    fn replace_current(&mut self, ledger: Ledger, converter: WageConverter) -> Snapshot {
        Snapshot {
            ledger: std::mem::replace(&mut self.current, ledger),
            converter: std::mem::replace(&mut self.converter, converter),
        }
    }

    fn push_history(&mut self, snapshot: Snapshot) {
        if self.history_depth == 0 {
            return;
        }
        if self.undo_stack.len() == self.history_depth {
            self.undo_stack.remove(0);
        }
        self.undo_stack.push(snapshot);
    }
}
