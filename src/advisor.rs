// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Rule-of-thumb recommendations derived from a user's financial profile.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

const RETIREMENT_AGE: u32 = 65;
const EMERGENCY_FUND_MONTHS: i64 = 6;
const MAX_MONTHLY_SAVINGS_TARGET: i64 = 2000;
const MAX_AGE: u32 = 130;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Retirement,
    House,
    Education,
    Travel,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(rename = "type")]
    pub kind: GoalType,
    pub target_amount: Decimal,
    /// Years until the goal is due.
    pub timeframe: u32,
    pub priority: Level,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialProfile {
    pub income: Decimal,
    pub expenses: Decimal,
    pub savings: Decimal,
    pub debt: Decimal,
    pub risk_tolerance: Level,
    pub age: u32,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRecommendation {
    #[serde(rename = "type")]
    pub kind: String,
    /// Percentage of the portfolio.
    pub allocation: u32,
    pub description: String,
    pub risk_level: Level,
    /// Annual percentage.
    pub expected_return: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsProduct {
    pub name: String,
    pub interest_rate: Decimal,
    pub description: String,
    pub recommended: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsRecommendation {
    pub monthly_savings_target: Decimal,
    pub emergency_fund_target: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_reduction_strategy: Option<String>,
    pub savings_products: Vec<SavingsProduct>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialRecommendations {
    pub summary: String,
    pub investment_recommendations: Vec<InvestmentRecommendation>,
    pub savings_recommendations: SavingsRecommendation,
    pub next_steps: Vec<String>,
}

impl FinancialProfile {
    pub fn validate(&self) -> CoreResult<()> {
        for (field, v) in [
            ("income", self.income),
            ("expenses", self.expenses),
            ("savings", self.savings),
            ("debt", self.debt),
        ] {
            if v < Decimal::ZERO {
                return Err(CoreError::invalid(
                    field,
                    format!("must not be negative, got {v}"),
                ));
            }
        }
        if self.age > MAX_AGE {
            return Err(CoreError::invalid(
                "age",
                format!("{} is not a plausible age", self.age),
            ));
        }
        if let Some(g) = self.goals.iter().find(|g| g.target_amount < Decimal::ZERO) {
            return Err(CoreError::invalid(
                "goals.targetAmount",
                format!("must not be negative, got {}", g.target_amount),
            ));
        }
        Ok(())
    }

    pub fn monthly_savings(&self) -> CoreResult<Decimal> {
        self.income
            .checked_sub(self.expenses)
            .ok_or_else(|| out_of_range("expenses"))
    }

    /// Debt over monthly income. With no income, any debt counts as
    /// exceeding every threshold.
    pub fn debt_ratio(&self) -> CoreResult<Decimal> {
        if self.income.is_zero() {
            return Ok(if self.debt.is_zero() { Decimal::ZERO } else { Decimal::MAX });
        }
        self.debt
            .checked_div(self.income)
            .ok_or_else(|| out_of_range("debt"))
    }

    pub fn emergency_fund_target(&self) -> CoreResult<Decimal> {
        self.expenses
            .checked_mul(Decimal::from(EMERGENCY_FUND_MONTHS))
            .ok_or_else(|| out_of_range("expenses"))
    }

    pub fn years_to_retirement(&self) -> u32 {
        RETIREMENT_AGE.saturating_sub(self.age)
    }
}

fn out_of_range(field: &str) -> CoreError {
    CoreError::invalid(field, "too large to plan with")
}

fn pick(
    kind: &str,
    allocation: u32,
    description: &str,
    risk_level: Level,
    expected_return: Decimal,
) -> InvestmentRecommendation {
    InvestmentRecommendation {
        kind: kind.to_string(),
        allocation,
        description: description.to_string(),
        risk_level,
        expected_return,
    }
}

pub fn investment_mix(risk: Level) -> Vec<InvestmentRecommendation> {
    let bonds_return = Decimal::new(35, 1);
    match risk {
        Level::Low => vec![
            pick(
                "Bonds",
                60,
                "Government and high-grade corporate bonds for stable returns.",
                Level::Low,
                bonds_return,
            ),
            pick(
                "Conservative Stocks",
                30,
                "Blue-chip stocks with stable dividend history.",
                Level::Medium,
                Decimal::new(50, 1),
            ),
            pick(
                "Cash Equivalents",
                10,
                "Money market funds and short-term CDs for liquidity.",
                Level::Low,
                Decimal::new(20, 1),
            ),
        ],
        Level::Medium => vec![
            pick(
                "Diversified Stock Portfolio",
                60,
                "Mix of growth and value stocks across various sectors.",
                Level::Medium,
                Decimal::new(70, 1),
            ),
            pick(
                "Bonds",
                30,
                "Mix of government and corporate bonds.",
                Level::Low,
                bonds_return,
            ),
            pick(
                "Alternative Investments",
                10,
                "REITs and commodity ETFs for diversification.",
                Level::Medium,
                Decimal::new(60, 1),
            ),
        ],
        Level::High => vec![
            pick(
                "Growth Stocks",
                70,
                "Focus on companies with high growth potential.",
                Level::High,
                Decimal::new(100, 1),
            ),
            pick(
                "International Markets",
                20,
                "Emerging market stocks and international growth funds.",
                Level::High,
                Decimal::new(90, 1),
            ),
            pick(
                "Bonds",
                10,
                "Small bond allocation for minimal stability.",
                Level::Low,
                bonds_return,
            ),
        ],
    }
}

fn savings_plan(profile: &FinancialProfile) -> CoreResult<SavingsRecommendation> {
    let ratio = profile.debt_ratio()?;
    let emergency = profile.emergency_fund_target()?;
    let half = Decimal::new(5, 1);

    let target = (profile.monthly_savings()? * half)
        .min(Decimal::from(MAX_MONTHLY_SAVINGS_TARGET))
        .max(Decimal::ZERO);

    let mid_term_goal = profile.goals.iter().any(|g| (1..=5).contains(&g.timeframe));
    let long_term_goal = profile.goals.iter().any(|g| g.timeframe > 5);

    let product = |name: &str, rate: i64, description: &str, recommended: bool| SavingsProduct {
        name: name.to_string(),
        interest_rate: Decimal::from(rate),
        description: description.to_string(),
        recommended,
    };

    let debt_reduction_strategy = if ratio > Decimal::new(3, 1) {
        Some(if ratio > half {
            "Focus on paying down high-interest debt before increasing investments.".to_string()
        } else {
            "Allocate 50% of monthly savings to debt reduction until ratio drops below 20%."
                .to_string()
        })
    } else {
        None
    };

    Ok(SavingsRecommendation {
        monthly_savings_target: target,
        emergency_fund_target: emergency,
        debt_reduction_strategy,
        savings_products: vec![
            product(
                "DeCoFi Flexible Savings",
                3,
                "Liquid savings with easy access and competitive rates.",
                ratio > half || profile.savings < emergency / Decimal::TWO,
            ),
            product(
                "DeCoFi Goal Saver",
                4,
                "Medium-term savings with slightly higher returns.",
                mid_term_goal,
            ),
            product(
                "DeCoFi Fixed Term Deposit",
                5,
                "Higher interest for longer commitments.",
                long_term_goal && ratio < Decimal::new(3, 1),
            ),
        ],
    })
}

fn next_steps(profile: &FinancialProfile) -> CoreResult<Vec<String>> {
    let mut steps = Vec::new();
    let emergency = profile.emergency_fund_target()?;
    if profile.savings < emergency {
        steps.push(format!(
            "Build your emergency fund to {} USD.",
            group_thousands(emergency)
        ));
    }
    if profile.debt_ratio()? > Decimal::new(4, 1) {
        steps.push("Reduce high-interest debt to improve financial stability.".to_string());
    }
    steps.push("Schedule a free consultation with a DeCoFi financial advisor.".to_string());
    steps.push("Set up automatic monthly transfers to your savings account.".to_string());
    Ok(steps)
}

fn summary(profile: &FinancialProfile) -> CoreResult<String> {
    let saving = profile.monthly_savings()?;
    if saving <= Decimal::ZERO {
        let cut = saving
            .abs()
            .checked_add(Decimal::ONE_HUNDRED)
            .ok_or_else(|| out_of_range("expenses"))?;
        return Ok(format!(
            "Based on your current expenses and income, you're currently not saving. \
             We recommend reviewing your budget to find at least ${} \
             in monthly expense reductions.",
            plain(cut)
        ));
    }

    let years = profile.years_to_retirement();
    let retirement = profile.goals.iter().find(|g| g.kind == GoalType::Retirement);
    if let (Some(goal), true) = (retirement, years > 0) {
        let needed = goal.target_amount / Decimal::from(years * 12);
        return Ok(if needed > saving {
            format!(
                "You're saving ${} monthly, but will need approximately ${} monthly \
                 to reach your retirement goal of ${} in {} years.",
                plain(saving),
                needed.ceil(),
                group_thousands(goal.target_amount),
                years
            )
        } else {
            format!(
                "You're saving ${} monthly, which puts you on track for your retirement goal \
                 of ${} in {} years. Consider additional investment opportunities.",
                plain(saving),
                group_thousands(goal.target_amount),
                years
            )
        });
    }

    Ok(format!(
        "With your current savings rate of ${} per month, you're building a solid financial \
         foundation. Our recommendations will help optimize your savings and investments.",
        plain(saving)
    ))
}

pub fn recommend(profile: &FinancialProfile) -> CoreResult<FinancialRecommendations> {
    profile.validate()?;
    Ok(FinancialRecommendations {
        summary: summary(profile)?,
        investment_recommendations: investment_mix(profile.risk_tolerance),
        savings_recommendations: savings_plan(profile)?,
        next_steps: next_steps(profile)?,
    })
}

fn plain(d: Decimal) -> String {
    d.normalize().to_string()
}

/// `1000000` -> `1,000,000`; fractional digits are kept as-is.
pub fn group_thousands(d: Decimal) -> String {
    let s = plain(d);
    let (sign, rest) = match s.strip_prefix('-') {
        Some(r) => ("-", r),
        None => ("", s.as_str()),
    };
    let (int, frac) = match rest.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (rest, None),
    };
    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    match frac {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
