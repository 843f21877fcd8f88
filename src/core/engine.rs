use super::types::{Outcome, Outlook, RetirementParameters};

/// Projects the validated parameters into an outlook. Pure and total: any
/// parameter set that survived validation yields a complete result, with no
/// I/O and loop counts bounded by the years to retirement.
pub fn project(params: &RetirementParameters) -> Outlook {
    let years = params.years_to_retirement();
    debug_assert!(years > 0, "validation guarantees the age ordering");

    let accumulated_corpus = lumpsum_future_value(params.present_lumpsum, params.cagr_invested, years)
        + escalating_contribution_future_value(
            params.monthly_investable * 12.0,
            params.cagr_invested,
            params.annual_investment_increase,
            years,
        )
        + lumpsum_future_value(params.present_pf_value, params.cagr_pf, years)
        + escalating_contribution_future_value(
            params.monthly_pf_investment * 12.0,
            params.cagr_pf,
            params.annual_pf_increase,
            years,
        );

    let income_at_retirement =
        params.desired_annual_income * (1.0 + params.inflation_rate).powi(years);
    let real_rate = params.real_rate_after_retirement();
    let required_corpus = required_corpus(income_at_retirement, real_rate, params.life_expectancy);

    let surplus_or_deficit = accumulated_corpus - required_corpus;
    Outlook {
        accumulated_corpus,
        required_corpus,
        surplus_or_deficit,
        outcome: if surplus_or_deficit >= 0.0 {
            Outcome::Surplus
        } else {
            Outcome::Deficit
        },
        advisory_flag: real_rate < 0.0,
    }
}

fn lumpsum_future_value(present: f64, rate: f64, years: i32) -> f64 {
    present * (1.0 + rate).powi(years)
}

/// Future value of an annually escalating contribution stream. The year-`i`
/// contribution lands at the end of that year, so it compounds for
/// `years - 1 - i` remaining years; the contribution amount then steps up.
/// The amount changes every term, so there is no closed-form annuity here.
fn escalating_contribution_future_value(
    mut annual_contribution: f64,
    rate: f64,
    step_up: f64,
    years: i32,
) -> f64 {
    let mut total = 0.0;
    for i in 0..years {
        total += annual_contribution * (1.0 + rate).powi(years - 1 - i);
        annual_contribution *= 1.0 + step_up;
    }
    total
}

/// Corpus needed at retirement to fund `life_expectancy` withdrawals of
/// constant purchasing power, discounted at the real rate.
///
/// Zero real rate is the annuity formula's limit case. A negative real rate
/// still evaluates the same formula for compatibility with the original
/// calculator even though it understates the corpus there; the caller
/// surfaces that through the advisory flag.
fn required_corpus(income_at_retirement: f64, real_rate: f64, life_expectancy: i32) -> f64 {
    if real_rate == 0.0 {
        return income_at_retirement * life_expectancy as f64;
    }
    income_at_retirement * (1.0 - (1.0 + real_rate).powi(-life_expectancy)) / real_rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn worked_scenario() -> RetirementParameters {
        RetirementParameters {
            present_lumpsum: 5_000_000.0,
            monthly_investable: 30_000.0,
            present_pf_value: 1_000_000.0,
            monthly_pf_investment: 15_000.0,
            cagr_invested: 0.12,
            cagr_pf: 0.075,
            cagr_after_retirement: 0.06,
            current_age: 30,
            retirement_age: 60,
            inflation_rate: 0.05,
            annual_investment_increase: 0.05,
            annual_pf_increase: 0.05,
            desired_annual_income: 750_000.0,
            life_expectancy: 25,
        }
    }

    #[test]
    fn worked_scenario_regression_baseline() {
        let outlook = project(&worked_scenario());
        // Nearest-rupee baselines for the bundled example inputs.
        assert_eq!(outlook.accumulated_corpus.round(), 322_324_725.0);
        assert_eq!(outlook.required_corpus.round(), 71_809_008.0);
        assert_eq!(outlook.outcome, Outcome::Surplus);
        assert!(!outlook.advisory_flag);
        assert_close(
            outlook.surplus_or_deficit,
            outlook.accumulated_corpus - outlook.required_corpus,
            0.0,
        );
    }

    #[test]
    fn zero_growth_leaves_lumpsum_unchanged() {
        let mut params = worked_scenario();
        params.monthly_investable = 0.0;
        params.present_pf_value = 0.0;
        params.monthly_pf_investment = 0.0;
        params.cagr_invested = 0.0;
        let outlook = project(&params);
        assert_eq!(outlook.accumulated_corpus, params.present_lumpsum);
    }

    #[test]
    fn zero_real_rate_uses_limit_case_exactly() {
        let mut params = worked_scenario();
        params.cagr_after_retirement = 0.05;
        params.inflation_rate = 0.05;
        let outlook = project(&params);

        let income_at_retirement = 750_000.0 * 1.05_f64.powi(30);
        assert_eq!(outlook.required_corpus, income_at_retirement * 25.0);
        assert!(!outlook.advisory_flag);
    }

    #[test]
    fn negative_real_rate_sets_advisory_flag() {
        let mut params = worked_scenario();
        params.cagr_after_retirement = 0.03;
        params.inflation_rate = 0.05;
        let outlook = project(&params);
        assert!(outlook.advisory_flag);
        assert!(outlook.advisory_note().is_some());
        assert!(outlook.required_corpus.is_finite());
    }

    #[test]
    fn positive_real_rate_carries_no_advisory() {
        let outlook = project(&worked_scenario());
        assert_eq!(outlook.advisory_note(), None);
    }

    #[test]
    fn deficit_when_required_exceeds_accumulated() {
        let mut params = worked_scenario();
        params.present_lumpsum = 0.0;
        params.monthly_investable = 100.0;
        params.present_pf_value = 0.0;
        params.monthly_pf_investment = 0.0;
        let outlook = project(&params);
        assert_eq!(outlook.outcome, Outcome::Deficit);
        assert!(outlook.surplus_or_deficit < 0.0);
        assert_eq!(
            outlook.magnitude(),
            outlook.required_corpus - outlook.accumulated_corpus
        );
    }

    #[test]
    fn single_year_horizon_runs_one_contribution_term() {
        let mut params = worked_scenario();
        params.retirement_age = 31;
        params.present_lumpsum = 0.0;
        params.present_pf_value = 0.0;
        params.monthly_pf_investment = 0.0;
        let outlook = project(&params);
        // One end-of-year contribution, no compounding time left.
        assert_eq!(outlook.accumulated_corpus, 30_000.0 * 12.0);
    }

    proptest! {
        #[test]
        fn outcome_sign_matches_corpus_comparison(
            lumpsum in 0.0..5.0e7f64,
            monthly in 0.0..2.0e5f64,
            income in 1.0e4..5.0e6f64,
            cagr in -0.05..0.20f64,
            inflation in 0.0..0.12f64,
            years in 1..45i32,
            life in 1..40i32,
        ) {
            let params = RetirementParameters {
                present_lumpsum: lumpsum,
                monthly_investable: monthly,
                present_pf_value: 0.0,
                monthly_pf_investment: 0.0,
                cagr_invested: cagr,
                cagr_pf: 0.0,
                cagr_after_retirement: cagr,
                current_age: 30,
                retirement_age: 30 + years,
                inflation_rate: inflation,
                annual_investment_increase: 0.0,
                annual_pf_increase: 0.0,
                desired_annual_income: income,
                life_expectancy: life,
            };
            let outlook = project(&params);

            let surplus = outlook.accumulated_corpus >= outlook.required_corpus;
            prop_assert_eq!(outlook.outcome == Outcome::Surplus, surplus);
            prop_assert_eq!(
                outlook.magnitude(),
                (outlook.accumulated_corpus - outlook.required_corpus).abs()
            );
            prop_assert_eq!(
                outlook.advisory_flag,
                params.real_rate_after_retirement() < 0.0
            );
        }

        #[test]
        fn projection_is_idempotent(
            lumpsum in 0.0..5.0e7f64,
            cagr in -0.05..0.20f64,
            inflation in 0.0..0.12f64,
            years in 1..45i32,
            life in 1..40i32,
        ) {
            let params = RetirementParameters {
                present_lumpsum: lumpsum,
                monthly_investable: 10_000.0,
                present_pf_value: lumpsum / 2.0,
                monthly_pf_investment: 5_000.0,
                cagr_invested: cagr,
                cagr_pf: cagr / 2.0,
                cagr_after_retirement: cagr,
                current_age: 25,
                retirement_age: 25 + years,
                inflation_rate: inflation,
                annual_investment_increase: 0.03,
                annual_pf_increase: 0.03,
                desired_annual_income: 500_000.0,
                life_expectancy: life,
            };
            prop_assert_eq!(project(&params), project(&params));
        }
    }
}
