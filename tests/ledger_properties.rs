mod common;

use common::{assert_close, date};
use costing_core::{
    core::services::SummaryService,
    costing::{LaborInput, MaterialInput},
    ledger::{Ledger, ProjectChanges, ProjectDraft, ProjectId},
    LedgerError, WageConverter,
};

fn assert_portfolio_matches_projects(ledger: &Ledger) {
    let portfolio = SummaryService::portfolio(ledger);
    let summaries = SummaryService::projects(ledger);
    let labor: f64 = summaries.iter().map(|(_, s)| s.labor_cost).sum();
    let material: f64 = summaries.iter().map(|(_, s)| s.material_cost).sum();
    let overhead: f64 = summaries.iter().map(|(_, s)| s.overhead_amount).sum();
    let total: f64 = summaries.iter().map(|(_, s)| s.total).sum();
    assert_close(portfolio.total_labor, labor, 1e-6);
    assert_close(portfolio.total_material, material, 1e-6);
    assert_close(portfolio.total_overhead, overhead, 1e-6);
    assert_close(portfolio.grand_total, total, 1e-6);
    assert_close(
        portfolio.grand_total,
        portfolio.total_labor + portfolio.total_material + portfolio.total_overhead,
        1e-6,
    );
}

#[test]
fn portfolio_tracks_projects_through_crud_sequence() {
    let converter = WageConverter::default();
    let day = date(2024, 10, 1);
    let mut ledger = Ledger::new();
    assert_portfolio_matches_projects(&ledger);

    let mut ids = Vec::new();
    for (name, overhead) in [("Mairie", 8.0), ("École", 12.0), ("Gymnase", 0.0)] {
        let (next, id) = ledger
            .create_project(ProjectDraft::new(name, overhead, day))
            .unwrap();
        ledger = next;
        ids.push(id);
        assert_portfolio_matches_projects(&ledger);
    }

    for (step, id) in ids.iter().enumerate() {
        let hours = 10.0 + step as f64 * 7.5;
        ledger = ledger
            .add_labor_entry(&converter, *id, LaborInput::new("Équipe", 1950.0, hours, day))
            .unwrap()
            .0;
        ledger = ledger
            .add_material_entry(*id, MaterialInput::new("Béton", 110.0, 4.0 + step as f64, day))
            .unwrap()
            .0;
        assert_portfolio_matches_projects(&ledger);
    }

    ledger = ledger
        .update_labor_entry(&converter, ids[0], 0, LaborInput::new("Équipe", 2400.0, 44.0, day))
        .unwrap()
        .0;
    assert_portfolio_matches_projects(&ledger);

    ledger = ledger
        .update_project(
            ids[1],
            ProjectChanges {
                overhead_percent: Some(20.0),
                sale_price: Some(Some(8_000.0)),
                ..ProjectChanges::default()
            },
        )
        .unwrap();
    assert_portfolio_matches_projects(&ledger);

    ledger = ledger.delete_material_entry(ids[2], 0).unwrap().0;
    ledger = ledger.delete_project(ids[0]).unwrap();
    assert_portfolio_matches_projects(&ledger);
    assert_eq!(ledger.len(), 2);
}

#[test]
fn rejected_create_is_a_no_op() {
    let day = date(2024, 10, 1);
    let (ledger, _) = Ledger::new()
        .create_project(ProjectDraft::new("Piscine", 10.0, day))
        .unwrap();
    let before = serde_json::to_string(&ledger).unwrap();

    let err = ledger
        .create_project(ProjectDraft::new("PISCINE", 3.0, day))
        .expect_err("duplicate name");
    assert!(matches!(err, LedgerError::DuplicateName(_)));
    assert_eq!(ledger.len(), 1);
    assert_eq!(serde_json::to_string(&ledger).unwrap(), before);
}

#[test]
fn rejected_entry_mutations_are_no_ops() {
    let converter = WageConverter::default();
    let day = date(2024, 10, 1);
    let (ledger, id) = Ledger::new()
        .create_project(ProjectDraft::new("Piscine", 10.0, day))
        .unwrap();
    let (ledger, _) = ledger
        .add_labor_entry(&converter, id, LaborInput::new("Yanis", 1800.0, 30.0, day))
        .unwrap();
    let before = ledger.clone();

    let attempts: Vec<Result<Ledger, LedgerError>> = vec![
        ledger
            .add_labor_entry(&converter, id, LaborInput::new("Yanis", 1800.0, 0.0, day))
            .map(|(next, _)| next),
        ledger
            .update_labor_entry(&converter, id, 0, LaborInput::new("", 1800.0, 3.0, day))
            .map(|(next, _)| next),
        ledger
            .update_labor_entry(&converter, id, 5, LaborInput::new("Yanis", 1800.0, 3.0, day))
            .map(|(next, _)| next),
        ledger.delete_labor_entry(ProjectId(999), 0).map(|(next, _)| next),
        ledger.update_project(id, ProjectChanges::rename("  ")),
    ];
    for attempt in attempts {
        assert!(attempt.is_err());
        assert_eq!(ledger, before);
    }
}

#[test]
fn deletion_shifts_entry_indices() {
    let converter = WageConverter::default();
    let day = date(2024, 10, 1);
    let (ledger, id) = Ledger::new()
        .create_project(ProjectDraft::new("Garage", 10.0, day))
        .unwrap();
    let (ledger, _) = ledger
        .add_labor_entry(&converter, id, LaborInput::new("Premier", 1800.0, 8.0, day))
        .unwrap();
    let (ledger, second) = ledger
        .add_labor_entry(&converter, id, LaborInput::new("Second", 2200.0, 16.0, day))
        .unwrap();

    let (ledger, removed) = ledger.delete_labor_entry(id, 0).unwrap();
    assert_eq!(removed.name(), "Premier");
    let project = ledger.project(id).unwrap();
    assert_eq!(project.labor_entries.len(), 1);
    assert_eq!(project.labor_entry(0), Some(&second));
    assert!(project.labor_entry(1).is_none());
}

#[test]
fn projects_keep_insertion_order() {
    let day = date(2024, 10, 1);
    let mut ledger = Ledger::new();
    for name in ["Zinc", "Atelier", "Mezzanine"] {
        ledger = ledger
            .create_project(ProjectDraft::new(name, 0.0, day))
            .unwrap()
            .0;
    }
    let names: Vec<&str> = ledger.projects().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Zinc", "Atelier", "Mezzanine"]);
    assert_eq!(ledger.project_by_name("atelier").unwrap().name, "Atelier");
}
