use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, LedgerResult};

use super::wage::WageConverter;

/// Raw values captured for a worker assigned to a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaborInput {
    pub name: String,
    pub net_monthly_wage: f64,
    pub hours_on_project: f64,
    pub recorded_date: NaiveDate,
}

impl LaborInput {
    pub fn new(
        name: impl Into<String>,
        net_monthly_wage: f64,
        hours_on_project: f64,
        recorded_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            net_monthly_wage,
            hours_on_project,
            recorded_date,
        }
    }
}

/// A labor line item. Derived amounts are only produced by [`derive_labor_entry`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LaborEntry {
    name: String,
    net_monthly_wage: f64,
    hours_on_project: f64,
    recorded_date: NaiveDate,
    gross_wage: f64,
    employer_monthly_cost: f64,
    employer_charges: f64,
    cost_for_hours: f64,
}

impl LaborEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn net_monthly_wage(&self) -> f64 {
        self.net_monthly_wage
    }

    pub fn hours_on_project(&self) -> f64 {
        self.hours_on_project
    }

    pub fn recorded_date(&self) -> NaiveDate {
        self.recorded_date
    }

    pub fn gross_wage(&self) -> f64 {
        self.gross_wage
    }

    pub fn employer_monthly_cost(&self) -> f64 {
        self.employer_monthly_cost
    }

    pub fn employer_charges(&self) -> f64 {
        self.employer_charges
    }

    /// Employer cost of the hours spent on the project.
    pub fn cost_for_hours(&self) -> f64 {
        self.cost_for_hours
    }

    /// Returns the inputs this entry was derived from.
    pub fn input(&self) -> LaborInput {
        LaborInput {
            name: self.name.clone(),
            net_monthly_wage: self.net_monthly_wage,
            hours_on_project: self.hours_on_project,
            recorded_date: self.recorded_date,
        }
    }
}

/// Raw values captured for a material purchase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialInput {
    pub name: String,
    pub unit_price: f64,
    pub quantity: f64,
    pub recorded_date: NaiveDate,
}

impl MaterialInput {
    pub fn new(
        name: impl Into<String>,
        unit_price: f64,
        quantity: f64,
        recorded_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            unit_price,
            quantity,
            recorded_date,
        }
    }
}

/// A material line item with its extended total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaterialEntry {
    name: String,
    unit_price: f64,
    quantity: f64,
    recorded_date: NaiveDate,
    total: f64,
}

impl MaterialEntry {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn recorded_date(&self) -> NaiveDate {
        self.recorded_date
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    pub fn input(&self) -> MaterialInput {
        MaterialInput {
            name: self.name.clone(),
            unit_price: self.unit_price,
            quantity: self.quantity,
            recorded_date: self.recorded_date,
        }
    }
}

pub fn derive_labor_entry(converter: &WageConverter, input: LaborInput) -> LedgerResult<LaborEntry> {
    let name = validate_name(&input.name, "labor entry")?;
    if !input.hours_on_project.is_finite() || input.hours_on_project <= 0.0 {
        return Err(LedgerError::InvalidInput(format!(
            "hours on project must be a positive number, got {}",
            input.hours_on_project
        )));
    }
    let wage = converter.convert(input.net_monthly_wage)?;
    let hourly = wage.employer_cost / converter.rates().hours_per_month;
    let cost_for_hours = ensure_finite_amount("labor cost", hourly * input.hours_on_project)?;
    Ok(LaborEntry {
        name,
        net_monthly_wage: input.net_monthly_wage,
        hours_on_project: input.hours_on_project,
        recorded_date: input.recorded_date,
        gross_wage: wage.gross_wage,
        employer_monthly_cost: wage.employer_cost,
        employer_charges: wage.employer_charges,
        cost_for_hours,
    })
}

pub fn derive_material_entry(input: MaterialInput) -> LedgerResult<MaterialEntry> {
    let name = validate_name(&input.name, "material entry")?;
    ensure_non_negative("unit price", input.unit_price)?;
    ensure_non_negative("quantity", input.quantity)?;
    let total = ensure_finite_amount("material total", input.unit_price * input.quantity)?;
    Ok(MaterialEntry {
        name,
        unit_price: input.unit_price,
        quantity: input.quantity,
        recorded_date: input.recorded_date,
        total,
    })
}

fn validate_name(raw: &str, what: &str) -> LedgerResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::InvalidInput(format!("{} name is empty", what)));
    }
    Ok(trimmed.to_string())
}

fn ensure_non_negative(field: &str, value: f64) -> LedgerResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LedgerError::InvalidInput(format!(
            "{} must be a non-negative number, got {}",
            field, value
        )))
    }
}

fn ensure_finite_amount(field: &str, value: f64) -> LedgerResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LedgerError::InvalidInput(format!(
            "{} is out of range",
            field
        )))
    }
}
