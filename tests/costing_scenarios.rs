mod common;

use common::{assert_close, date};
use costing_core::{
    core::services::{ReportService, SummaryService},
    costing::{derive_labor_entry, derive_material_entry, LaborInput, MaterialInput},
    ledger::{Ledger, ProjectDraft},
    CostRates, LedgerError, WageConverter,
};

#[test]
fn reference_wage_scenario() {
    let converter = WageConverter::default();
    let wage = converter.convert(2000.0).expect("convert");
    assert_close(wage.gross_wage, 2597.40, 0.01);
    assert_close(wage.employer_cost, 3688.31, 0.01);
    assert_close(wage.employer_charges, wage.employer_cost - wage.gross_wage, 1e-9);

    let entry = derive_labor_entry(
        &converter,
        LaborInput::new("Chef d'équipe", 2000.0, 20.0, date(2024, 1, 8)),
    )
    .expect("labor entry");
    let expected = (wage.employer_cost / 151.67) * 20.0;
    assert_eq!(entry.cost_for_hours(), expected);
    assert_close(entry.cost_for_hours(), 486.36, 0.01);
}

#[test]
fn charges_add_cost_at_every_step() {
    let converter = WageConverter::default();
    let mut net = 0.5;
    while net < 50_000.0 {
        let wage = converter.convert(net).expect("convert");
        assert!(wage.employer_cost > wage.gross_wage, "net = {net}");
        assert!(wage.gross_wage > net, "net = {net}");
        net *= 3.7;
    }
}

#[test]
fn material_total_commutes() {
    let day = date(2024, 1, 8);
    for (a, b) in [(100.0, 3.0), (0.35, 1200.0), (19.99, 7.5)] {
        let left = derive_material_entry(MaterialInput::new("Item", a, b, day)).unwrap();
        let right = derive_material_entry(MaterialInput::new("Item", b, a, day)).unwrap();
        assert_eq!(left.total(), right.total());
    }
}

#[test]
fn invalid_inputs_report_invalid_input() {
    let converter = WageConverter::default();
    let day = date(2024, 1, 8);
    let labor = derive_labor_entry(&converter, LaborInput::new("Ana", -1.0, 8.0, day));
    assert!(matches!(labor, Err(LedgerError::InvalidInput(_))));
    let material = derive_material_entry(MaterialInput::new("Pipe", 4.0, -2.0, day));
    assert!(matches!(material, Err(LedgerError::InvalidInput(_))));
}

#[test]
fn material_project_scenario() {
    let day = date(2024, 3, 15);
    let (ledger, id) = Ledger::new()
        .create_project(ProjectDraft::new("Cuisine Martin", 10.0, day).with_sale_price(400.0))
        .unwrap();
    let (ledger, _) = ledger
        .add_material_entry(id, MaterialInput::new("Plan de travail", 100.0, 3.0, day))
        .unwrap();

    let summary = SummaryService::project(ledger.project(id).unwrap());
    assert_eq!(summary.labor_cost, 0.0);
    assert_eq!(summary.material_cost, 300.0);
    assert_eq!(summary.subtotal, 300.0);
    assert_close(summary.overhead_amount, 30.0, 1e-9);
    assert_close(summary.total, 330.0, 1e-9);
    assert_close(summary.margin.expect("margin"), 70.0, 1e-9);
}

#[test]
fn project_without_sale_price_has_no_margin() {
    let day = date(2024, 3, 15);
    let (ledger, id) = Ledger::new()
        .create_project(ProjectDraft::new("Devis en attente", 10.0, day))
        .unwrap();
    let (ledger, _) = ledger
        .add_material_entry(id, MaterialInput::new("Isolant", 12.0, 30.0, day))
        .unwrap();
    let summary = SummaryService::project(ledger.project(id).unwrap());
    assert_eq!(summary.margin, None);
    assert!(summary.total > 0.0);
}

#[test]
fn aggregates_are_idempotent() {
    let converter = WageConverter::default();
    let day = date(2024, 5, 2);
    let (ledger, id) = Ledger::new()
        .create_project(ProjectDraft::new("Extension", 12.5, day).with_sale_price(25_000.0))
        .unwrap();
    let (ledger, _) = ledger
        .add_labor_entry(&converter, id, LaborInput::new("Sami", 2350.0, 120.0, day))
        .unwrap();
    let (ledger, _) = ledger
        .add_material_entry(id, MaterialInput::new("Parpaings", 1.35, 2400.0, day))
        .unwrap();

    let project = ledger.project(id).unwrap();
    assert_eq!(SummaryService::project(project), SummaryService::project(project));
    assert_eq!(
        SummaryService::portfolio(&ledger),
        SummaryService::portfolio(&ledger)
    );
    assert_eq!(
        ReportService::project_report(project),
        ReportService::project_report(project)
    );
}

#[test]
fn alternate_rate_regime_changes_labor_cost() {
    let day = date(2024, 5, 2);
    let standard = WageConverter::default();
    let reduced = WageConverter::new(CostRates::new(0.22, 0.30, 151.67)).unwrap();
    let input = LaborInput::new("Sami", 2350.0, 120.0, day);
    let standard_entry = derive_labor_entry(&standard, input.clone()).unwrap();
    let reduced_entry = derive_labor_entry(&reduced, input).unwrap();
    assert!(reduced_entry.cost_for_hours() < standard_entry.cost_for_hours());
}
