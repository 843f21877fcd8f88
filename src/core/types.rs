use serde::Serialize;

/// Fully validated inputs for one projection. Rates are decimal fractions
/// (percent inputs are divided by 100 by the validator). Ages are signed:
/// validation only enforces the retirement/current ordering and a positive
/// life expectancy, everything else is left open for what-if scenarios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetirementParameters {
    pub present_lumpsum: f64,
    pub monthly_investable: f64,
    pub present_pf_value: f64,
    pub monthly_pf_investment: f64,
    pub cagr_invested: f64,
    pub cagr_pf: f64,
    pub cagr_after_retirement: f64,
    pub current_age: i32,
    pub retirement_age: i32,
    pub inflation_rate: f64,
    pub annual_investment_increase: f64,
    pub annual_pf_increase: f64,
    pub desired_annual_income: f64,
    pub life_expectancy: i32,
}

impl RetirementParameters {
    /// Always > 0 once validation has passed.
    pub fn years_to_retirement(&self) -> i32 {
        self.retirement_age - self.current_age
    }

    /// Inflation-adjusted growth rate applied to the corpus during drawdown.
    pub fn real_rate_after_retirement(&self) -> f64 {
        (1.0 + self.cagr_after_retirement) / (1.0 + self.inflation_rate) - 1.0
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Surplus,
    Deficit,
}

const ADVISORY_NOTE: &str = "Expected return after retirement is below the inflation rate, \
so the corpus loses purchasing power during drawdown. The annuity formula understates the \
required corpus in this regime; treat the figure shown as a lower bound.";

/// Result of one projection. Constructed once by the engine, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outlook {
    pub accumulated_corpus: f64,
    pub required_corpus: f64,
    /// `accumulated_corpus - required_corpus`; the sign decides the outcome.
    pub surplus_or_deficit: f64,
    pub outcome: Outcome,
    pub advisory_flag: bool,
}

impl Outlook {
    /// Absolute size of the surplus or deficit.
    pub fn magnitude(&self) -> f64 {
        self.surplus_or_deficit.abs()
    }

    /// Explanatory note for the negative-real-rate advisory, when set.
    pub fn advisory_note(&self) -> Option<&'static str> {
        self.advisory_flag.then_some(ADVISORY_NOTE)
    }
}
