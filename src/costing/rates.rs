use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, LedgerResult};

pub const DEFAULT_EMPLOYEE_CHARGE_RATE: f64 = 0.23;
pub const DEFAULT_EMPLOYER_CHARGE_RATE: f64 = 0.42;
pub const DEFAULT_HOURS_PER_MONTH: f64 = 151.67;

/// Flat statutory charge rates and the monthly hour basis used to cost labor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CostRates {
    /// Share of the gross wage withheld from the employee.
    #[serde(default = "CostRates::default_employee_charge_rate")]
    pub employee_charge_rate: f64,
    /// Charges paid by the employer on top of the gross wage.
    #[serde(default = "CostRates::default_employer_charge_rate")]
    pub employer_charge_rate: f64,
    #[serde(default = "CostRates::default_hours_per_month")]
    pub hours_per_month: f64,
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            employee_charge_rate: DEFAULT_EMPLOYEE_CHARGE_RATE,
            employer_charge_rate: DEFAULT_EMPLOYER_CHARGE_RATE,
            hours_per_month: DEFAULT_HOURS_PER_MONTH,
        }
    }
}

impl CostRates {
    pub fn new(employee_charge_rate: f64, employer_charge_rate: f64, hours_per_month: f64) -> Self {
        Self {
            employee_charge_rate,
            employer_charge_rate,
            hours_per_month,
        }
    }

    /// Checks that the rates describe a regime the converter can divide by.
    pub fn validate(&self) -> LedgerResult<()> {
        if !self.employee_charge_rate.is_finite()
            || !(0.0..1.0).contains(&self.employee_charge_rate)
        {
            return Err(LedgerError::InvalidInput(format!(
                "employee charge rate must be in [0, 1), got {}",
                self.employee_charge_rate
            )));
        }
        if !self.employer_charge_rate.is_finite() || self.employer_charge_rate < 0.0 {
            return Err(LedgerError::InvalidInput(format!(
                "employer charge rate must be a non-negative number, got {}",
                self.employer_charge_rate
            )));
        }
        if !self.hours_per_month.is_finite() || self.hours_per_month <= 0.0 {
            return Err(LedgerError::InvalidInput(format!(
                "hours per month must be positive, got {}",
                self.hours_per_month
            )));
        }
        Ok(())
    }

    fn default_employee_charge_rate() -> f64 {
        DEFAULT_EMPLOYEE_CHARGE_RATE
    }

    fn default_employer_charge_rate() -> f64 {
        DEFAULT_EMPLOYER_CHARGE_RATE
    }

    fn default_hours_per_month() -> f64 {
        DEFAULT_HOURS_PER_MONTH
    }
}
