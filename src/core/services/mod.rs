pub mod report_service;
pub mod summary_service;

pub use report_service::{ProjectReport, ReportLine, ReportLineKind, ReportService};
pub use summary_service::{CostBreakdown, PortfolioSummary, ProjectSummary, SummaryService};
