// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use decofi::advisor::{FinancialProfile, Level, group_thousands, investment_mix, recommend};
use decofi::error::CoreError;
use rust_decimal::Decimal;

fn d(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn sample() -> FinancialProfile {
    serde_json::from_str(
        r#"{
            "income": 5000,
            "expenses": 3500,
            "savings": 10000,
            "debt": 20000,
            "riskTolerance": "medium",
            "age": 35,
            "goals": [
                {
                    "type": "retirement",
                    "targetAmount": 1000000,
                    "timeframe": 30,
                    "priority": "high"
                },
                { "type": "house", "targetAmount": 100000, "timeframe": 5, "priority": "medium" }
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn indebted_saver_gets_debt_first_plan() {
    let rec = recommend(&sample()).unwrap();
    let s = &rec.savings_recommendations;
    assert_eq!(s.monthly_savings_target, d("750"));
    assert_eq!(s.emergency_fund_target, d("21000"));
    assert_eq!(
        s.debt_reduction_strategy.as_deref(),
        Some("Focus on paying down high-interest debt before increasing investments.")
    );
    let flags: Vec<bool> = s.savings_products.iter().map(|p| p.recommended).collect();
    assert_eq!(flags, vec![true, true, false]);

    assert_eq!(
        rec.next_steps,
        vec![
            "Build your emergency fund to 21,000 USD.",
            "Reduce high-interest debt to improve financial stability.",
            "Schedule a free consultation with a DeCoFi financial advisor.",
            "Set up automatic monthly transfers to your savings account.",
        ]
    );
    assert_eq!(
        rec.summary,
        "You're saving $1500 monthly, but will need approximately $2778 monthly \
         to reach your retirement goal of $1,000,000 in 30 years."
    );
}

#[test]
fn mixes_sum_to_one_hundred() {
    for level in [Level::Low, Level::Medium, Level::High] {
        let total: u32 = investment_mix(level).iter().map(|i| i.allocation).sum();
        assert_eq!(total, 100, "{:?}", level);
    }
    assert_eq!(investment_mix(Level::High)[0].kind, "Growth Stocks");
    assert_eq!(investment_mix(Level::Low)[0].expected_return, d("3.5"));
}

#[test]
fn moderate_debt_gets_allocation_strategy() {
    let mut p = sample();
    p.debt = d("2000"); // ratio 0.4
    p.savings = d("50000");
    let rec = recommend(&p).unwrap();
    assert_eq!(
        rec.savings_recommendations.debt_reduction_strategy.as_deref(),
        Some("Allocate 50% of monthly savings to debt reduction until ratio drops below 20%.")
    );
    // ratio 0.4 is not above the 0.4 next-step threshold
    assert_eq!(rec.next_steps.len(), 2);
}

#[test]
fn low_debt_long_goal_unlocks_fixed_term() {
    let mut p = sample();
    p.debt = d("500");
    p.savings = d("50000");
    let rec = recommend(&p).unwrap();
    let s = &rec.savings_recommendations;
    assert!(s.debt_reduction_strategy.is_none());
    let flags: Vec<bool> = s.savings_products.iter().map(|p| p.recommended).collect();
    assert_eq!(flags, vec![false, true, true]);
}

#[test]
fn not_saving_summary() {
    let mut p = sample();
    p.income = d("3000");
    p.expenses = d("3200");
    let rec = recommend(&p).unwrap();
    assert!(rec.summary.contains("you're currently not saving"));
    assert!(rec.summary.contains("$300 in monthly expense reductions"));
    assert_eq!(rec.savings_recommendations.monthly_savings_target, Decimal::ZERO);
}

#[test]
fn on_track_and_generic_summaries() {
    let mut p = sample();
    p.goals[0].target_amount = d("100000"); // 277.78 / month needed
    assert!(recommend(&p).unwrap().summary.contains("puts you on track"));

    p.goals.clear();
    assert!(recommend(&p).unwrap().summary.starts_with("With your current savings rate of $1500"));
}

#[test]
fn savings_target_is_capped() {
    let mut p = sample();
    p.income = d("20000");
    let rec = recommend(&p).unwrap();
    assert_eq!(rec.savings_recommendations.monthly_savings_target, d("2000"));
}

#[test]
fn zero_income_with_debt_counts_as_high_ratio() {
    let mut p = sample();
    p.income = Decimal::ZERO;
    let rec = recommend(&p).unwrap();
    assert!(rec.savings_recommendations.debt_reduction_strategy.is_some());
    assert!(rec.savings_recommendations.savings_products[0].recommended);
}

#[test]
fn negative_amounts_are_rejected() {
    let mut p = sample();
    p.savings = d("-1");
    assert!(matches!(
        recommend(&p),
        Err(CoreError::InvalidArgument { ref field, .. }) if field == "savings"
    ));
}

#[test]
fn thousands_grouping() {
    assert_eq!(group_thousands(d("1000000")), "1,000,000");
    assert_eq!(group_thousands(d("999")), "999");
    assert_eq!(group_thousands(d("21000.00")), "21,000");
    assert_eq!(group_thousands(d("1234.5")), "1,234.5");
    assert_eq!(group_thousands(d("-4500")), "-4,500");
}

#[test]
fn huge_debt_on_tiny_income_is_rejected() {
    let mut p = sample();
    p.income = d("0.0001");
    p.expenses = Decimal::ZERO;
    p.debt = d("10000000000000000000000000");
    assert!(p.validate().is_ok());
    assert!(matches!(
        recommend(&p),
        Err(CoreError::InvalidArgument { ref field, .. }) if field == "debt"
    ));
}

#[test]
fn expense_shortfall_near_decimal_max_is_rejected() {
    let mut p = sample();
    p.income = Decimal::ZERO;
    p.expenses = Decimal::MAX;
    assert!(matches!(
        recommend(&p),
        Err(CoreError::InvalidArgument { ref field, .. }) if field == "expenses"
    ));
}

#[test]
fn emergency_fund_overflow_is_rejected() {
    let mut p = sample();
    p.income = d("30000000000000000000000000000");
    p.expenses = d("20000000000000000000000000000");
    assert!(p.emergency_fund_target().is_err());
    assert!(matches!(
        recommend(&p),
        Err(CoreError::InvalidArgument { ref field, .. }) if field == "expenses"
    ));
}
