use serde::Deserialize;
use thiserror::Error;

use super::types::RetirementParameters;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("field `{0}` must be a valid number")]
    NonNumeric(&'static str),
    #[error("retirement age must be greater than current age")]
    AgeOrdering,
    #[error("life expectancy in retirement must be a positive number")]
    LifeExpectancy,
}

/// A single untrusted field as it arrives from the form layer: either a raw
/// string or an already-numeric JSON value.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

/// The fourteen raw fields of one calculation request. Every field is
/// optional at this layer; a missing field fails numeric parsing the same
/// way garbage text does.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawFields {
    pub present_lumpsum: Option<RawValue>,
    pub monthly_investable: Option<RawValue>,
    #[serde(rename = "presentPFValue")]
    pub present_pf_value: Option<RawValue>,
    #[serde(rename = "monthlyPFInvestment")]
    pub monthly_pf_investment: Option<RawValue>,
    pub cagr_invested: Option<RawValue>,
    #[serde(rename = "cagrPF")]
    pub cagr_pf: Option<RawValue>,
    pub cagr_after_retirement: Option<RawValue>,
    pub current_age: Option<RawValue>,
    pub retirement_age: Option<RawValue>,
    pub inflation_rate: Option<RawValue>,
    pub annual_investment_increase: Option<RawValue>,
    #[serde(rename = "annualPFIncrease")]
    pub annual_pf_increase: Option<RawValue>,
    pub desired_annual_income: Option<RawValue>,
    pub life_expectancy: Option<RawValue>,
}

fn number(field: &'static str, raw: &Option<RawValue>) -> Result<f64, ValidationError> {
    let value = match raw {
        Some(RawValue::Number(n)) => *n,
        Some(RawValue::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ValidationError::NonNumeric(field))?,
        None => return Err(ValidationError::NonNumeric(field)),
    };
    if !value.is_finite() {
        return Err(ValidationError::NonNumeric(field));
    }
    Ok(value)
}

fn percent(field: &'static str, raw: &Option<RawValue>) -> Result<f64, ValidationError> {
    Ok(number(field, raw)? / 100.0)
}

fn integer(field: &'static str, raw: &Option<RawValue>) -> Result<i32, ValidationError> {
    match raw {
        Some(RawValue::Number(n)) if n.is_finite() => Ok(n.trunc() as i32),
        Some(RawValue::Text(s)) => s
            .trim()
            .parse::<i32>()
            .map_err(|_| ValidationError::NonNumeric(field)),
        _ => Err(ValidationError::NonNumeric(field)),
    }
}

/// Sole gate between untrusted text and the typed model. Numeric
/// well-formedness is checked for every field first, then the age ordering,
/// then life-expectancy positivity; the first failure wins. Anything else
/// (negative rates, negative ages, zero amounts) passes, so exploratory
/// what-if inputs are not rejected.
pub fn validate(raw: &RawFields) -> Result<RetirementParameters, ValidationError> {
    let present_lumpsum = number("presentLumpsum", &raw.present_lumpsum)?;
    let monthly_investable = number("monthlyInvestable", &raw.monthly_investable)?;
    let present_pf_value = number("presentPFValue", &raw.present_pf_value)?;
    let monthly_pf_investment = number("monthlyPFInvestment", &raw.monthly_pf_investment)?;
    let cagr_invested = percent("cagrInvested", &raw.cagr_invested)?;
    let cagr_pf = percent("cagrPF", &raw.cagr_pf)?;
    let cagr_after_retirement = percent("cagrAfterRetirement", &raw.cagr_after_retirement)?;
    let current_age = integer("currentAge", &raw.current_age)?;
    let retirement_age = integer("retirementAge", &raw.retirement_age)?;
    let inflation_rate = percent("inflationRate", &raw.inflation_rate)?;
    let annual_investment_increase =
        percent("annualInvestmentIncrease", &raw.annual_investment_increase)?;
    let annual_pf_increase = percent("annualPFIncrease", &raw.annual_pf_increase)?;
    let desired_annual_income = number("desiredAnnualIncome", &raw.desired_annual_income)?;
    let life_expectancy = integer("lifeExpectancy", &raw.life_expectancy)?;

    if retirement_age <= current_age {
        return Err(ValidationError::AgeOrdering);
    }
    if life_expectancy <= 0 {
        return Err(ValidationError::LifeExpectancy);
    }

    Ok(RetirementParameters {
        present_lumpsum,
        monthly_investable,
        present_pf_value,
        monthly_pf_investment,
        cagr_invested,
        cagr_pf,
        cagr_after_retirement,
        current_age,
        retirement_age,
        inflation_rate,
        annual_investment_increase,
        annual_pf_increase,
        desired_annual_income,
        life_expectancy,
    })
}
