use serde::{Deserialize, Serialize};

use crate::errors::{LedgerError, LedgerResult};

use super::rates::CostRates;

/// Monthly amounts derived from a net wage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WageBreakdown {
    pub gross_wage: f64,
    pub employer_cost: f64,
    pub employer_charges: f64,
}

/// Converts net monthly wages into employer cost under a fixed set of rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WageConverter {
    rates: CostRates,
}

impl Default for WageConverter {
    fn default() -> Self {
        Self {
            rates: CostRates::default(),
        }
    }
}

impl WageConverter {
    /// Builds a converter after checking the supplied rates.
    pub fn new(rates: CostRates) -> LedgerResult<Self> {
        rates.validate()?;
        Ok(Self { rates })
    }

    pub fn rates(&self) -> &CostRates {
        &self.rates
    }

    pub fn convert(&self, net_monthly_wage: f64) -> LedgerResult<WageBreakdown> {
        if !net_monthly_wage.is_finite() || net_monthly_wage <= 0.0 {
            return Err(LedgerError::InvalidInput(format!(
                "net monthly wage must be a positive number, got {}",
                net_monthly_wage
            )));
        }
        let gross_wage = net_monthly_wage / (1.0 - self.rates.employee_charge_rate);
        let employer_cost = gross_wage * (1.0 + self.rates.employer_charge_rate);
        let employer_charges = employer_cost - gross_wage;
        if !employer_cost.is_finite() || !employer_charges.is_finite() {
            return Err(LedgerError::InvalidInput(format!(
                "net monthly wage {} overflows the employer cost",
                net_monthly_wage
            )));
        }
        Ok(WageBreakdown {
            gross_wage,
            employer_cost,
            employer_charges,
        })
    }

    /// Employer cost of one hour of work for the given net monthly wage.
    pub fn hourly_cost(&self, net_monthly_wage: f64) -> LedgerResult<f64> {
        let breakdown = self.convert(net_monthly_wage)?;
        Ok(breakdown.employer_cost / self.rates.hours_per_month)
    }
}
