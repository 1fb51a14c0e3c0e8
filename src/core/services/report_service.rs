use serde::Serialize;

use crate::ledger::Project;

use super::summary_service::{ProjectSummary, SummaryService};

const DEFAULT_FILE_STEM: &str = "project";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportLineKind {
    Labor,
    Material,
}

/// One priced line of a project report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLine {
    pub kind: ReportLineKind,
    pub name: String,
    pub amount: f64,
}

/// Everything a document generator needs to export one project.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectReport {
    pub project_name: String,
    pub overhead_percent: f64,
    pub lines: Vec<ReportLine>,
    pub summary: ProjectSummary,
}

impl ProjectReport {
    /// Filesystem-safe stem derived from the project name.
    pub fn suggested_file_stem(&self) -> String {
        let mut stem = String::new();
        let mut last_dash = false;
        for ch in self.project_name.trim().chars() {
            if ch.is_alphanumeric() {
                stem.extend(ch.to_lowercase());
                last_dash = false;
            } else if !stem.is_empty() && !last_dash {
                stem.push('-');
                last_dash = true;
            }
        }
        let trimmed = stem.trim_matches('-');
        if trimmed.is_empty() {
            DEFAULT_FILE_STEM.to_string()
        } else {
            trimmed.to_string()
        }
    }

    pub fn labor_lines(&self) -> impl Iterator<Item = &ReportLine> {
        self.lines
            .iter()
            .filter(|line| line.kind == ReportLineKind::Labor)
    }

    pub fn material_lines(&self) -> impl Iterator<Item = &ReportLine> {
        self.lines
            .iter()
            .filter(|line| line.kind == ReportLineKind::Material)
    }
}

pub struct ReportService;

impl ReportService {
    pub fn project_report(project: &Project) -> ProjectReport {
        let labor = project.labor_entries.iter().map(|entry| ReportLine {
            kind: ReportLineKind::Labor,
            name: entry.name().to_string(),
            amount: entry.cost_for_hours(),
        });
        let material = project.material_entries.iter().map(|entry| ReportLine {
            kind: ReportLineKind::Material,
            name: entry.name().to_string(),
            amount: entry.total(),
        });
        ProjectReport {
            project_name: project.name.clone(),
            overhead_percent: project.overhead_percent,
            lines: labor.chain(material).collect(),
            summary: SummaryService::project(project),
        }
    }
}
