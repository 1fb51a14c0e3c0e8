use serde::Serialize;

use crate::ledger::{Ledger, Project, ProjectId};

/// Cost split fed to charting collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostBreakdown {
    pub labor: f64,
    pub material: f64,
    pub overhead: f64,
}

/// Derived costs of a single project.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectSummary {
    pub labor_cost: f64,
    pub material_cost: f64,
    pub subtotal: f64,
    pub overhead_amount: f64,
    pub total: f64,
    /// `None` when the project has no sale price, which differs from breaking even.
    pub margin: Option<f64>,
    pub sale_price: Option<f64>,
}

impl ProjectSummary {
    pub fn breakdown(&self) -> CostBreakdown {
        CostBreakdown {
            labor: self.labor_cost,
            material: self.material_cost,
            overhead: self.overhead_amount,
        }
    }

    /// Margin as a share of the sale price.
    pub fn margin_rate(&self) -> Option<f64> {
        match (self.margin, self.sale_price) {
            (Some(margin), Some(price)) if price != 0.0 => Some(margin / price),
            _ => None,
        }
    }
}

/// Totals across every project in a ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PortfolioSummary {
    pub total_labor: f64,
    pub total_material: f64,
    pub total_overhead: f64,
    pub grand_total: f64,
}

impl PortfolioSummary {
    /// False when nothing has been costed yet; callers may hide the overview.
    pub fn has_costs(&self) -> bool {
        self.grand_total != 0.0
    }

    pub fn breakdown(&self) -> CostBreakdown {
        CostBreakdown {
            labor: self.total_labor,
            material: self.total_material,
            overhead: self.total_overhead,
        }
    }
}

pub struct SummaryService;

impl SummaryService {
    pub fn project(project: &Project) -> ProjectSummary {
        let labor_cost: f64 = project
            .labor_entries
            .iter()
            .map(|entry| entry.cost_for_hours())
            .sum();
        let material_cost: f64 = project
            .material_entries
            .iter()
            .map(|entry| entry.total())
            .sum();
        let subtotal = labor_cost + material_cost;
        let overhead_amount = subtotal * project.overhead_percent / 100.0;
        let total = subtotal + overhead_amount;
        ProjectSummary {
            labor_cost,
            material_cost,
            subtotal,
            overhead_amount,
            total,
            margin: project.sale_price.map(|price| price - total),
            sale_price: project.sale_price,
        }
    }

    /// Project summaries in display order.
    pub fn projects(ledger: &Ledger) -> Vec<(ProjectId, ProjectSummary)> {
        ledger
            .projects()
            .iter()
            .map(|project| (project.id, Self::project(project)))
            .collect()
    }

    pub fn portfolio(ledger: &Ledger) -> PortfolioSummary {
        ledger
            .projects()
            .iter()
            .map(Self::project)
            .fold(PortfolioSummary::default(), |acc, summary| {
                PortfolioSummary {
                    total_labor: acc.total_labor + summary.labor_cost,
                    total_material: acc.total_material + summary.material_cost,
                    total_overhead: acc.total_overhead + summary.overhead_amount,
                    grand_total: acc.grand_total + summary.total,
                }
            })
    }
}
