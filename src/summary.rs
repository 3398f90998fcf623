//! Read models built on top of a ledger: group summaries, exports and the
//! one-off even split calculator.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::ledger::Ledger;
use crate::member::normalize_name;
use crate::money::{format_currency, split_evenly, validate_amount, SETTLED_EPSILON};
use crate::schemas::{Group, MemberName, Transfer};

/// How amounts are rendered for people.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Presentation {
    pub currency: String,
}

impl Default for Presentation {
    fn default() -> Self {
        Presentation {
            currency: "₹".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Standing {
    Gets,
    Owes,
    Settled,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberBalance {
    pub member: MemberName,
    pub balance: Decimal,
    pub standing: Standing,
    pub label: String,
}

impl MemberBalance {
    pub fn new(member: MemberName, balance: Decimal, presentation: &Presentation) -> Self {
        let standing = if balance > SETTLED_EPSILON {
            Standing::Gets
        } else if balance < -SETTLED_EPSILON {
            Standing::Owes
        } else {
            Standing::Settled
        };
        let label = match standing {
            Standing::Gets => format!(
                "{member}: Gets {}",
                format_currency(balance.abs(), &presentation.currency)
            ),
            Standing::Owes => format!(
                "{member}: Owes {}",
                format_currency(balance.abs(), &presentation.currency)
            ),
            Standing::Settled => format!("{member}: Settled"),
        };
        MemberBalance {
            member,
            balance,
            standing,
            label,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub id: String,
    pub name: String,
    pub member_count: usize,
    pub expense_count: usize,
    pub settlement_count: usize,
    pub total_spent: Decimal,
    pub total_label: String,
    pub balances: Vec<MemberBalance>,
    pub suggested_transfers: Vec<Transfer>,
    pub unsettled_count: usize,
}

impl GroupSummary {
    pub fn build(id: &str, name: &str, ledger: &Ledger, presentation: &Presentation) -> Self {
        let balances: Vec<MemberBalance> = ledger
            .balances()
            .into_iter()
            .map(|(member, balance)| MemberBalance::new(member, balance, presentation))
            .collect();
        let unsettled_count = balances
            .iter()
            .filter(|entry| entry.standing != Standing::Settled)
            .count();
        let total_spent = ledger.total_spent();
        GroupSummary {
            id: id.to_string(),
            name: name.to_string(),
            member_count: ledger.roster().len(),
            expense_count: ledger.expenses().len(),
            settlement_count: ledger.settlements().len(),
            total_spent,
            total_label: format_currency(total_spent, &presentation.currency),
            balances,
            suggested_transfers: ledger.suggested_transfers(),
            unsettled_count,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupExport {
    pub group: Group,
    pub total: Decimal,
    pub exported_at: DateTime<Utc>,
}

impl GroupExport {
    pub fn new(group: Group, ledger: &Ledger) -> Self {
        GroupExport {
            total: ledger.total_spent(),
            group,
            exported_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersonShare {
    pub name: String,
    pub amount: Decimal,
    pub label: String,
}

/// Split a single bill evenly between `names`. Blank names become
/// "Person N" after their position.
pub fn quick_split<S: AsRef<str>>(
    amount: Decimal,
    names: &[S],
    presentation: &Presentation,
) -> Result<Vec<PersonShare>, EngineError> {
    let invalid = |reason: String| EngineError::InvalidExpense { index: 0, reason };
    validate_amount(amount).map_err(invalid)?;
    if names.is_empty() {
        return Err(invalid("bill must be split between at least one person".to_string()));
    }

    let shares = split_evenly(amount, names.len());
    Ok(names
        .iter()
        .zip(shares)
        .enumerate()
        .map(|(i, (name, share))| {
            let mut name = normalize_name(name.as_ref());
            if name.is_empty() {
                name = format!("Person {}", i + 1);
            }
            PersonShare {
                label: format!(
                    "{name} owes {}",
                    format_currency(share, &presentation.currency)
                ),
                name,
                amount: share,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{Expense, Settlement};
    use rstest::{fixture, rstest};
    use rust_decimal_macros::dec;

    #[fixture]
    fn ledger() -> Ledger {
        Ledger::new(
            &["A", "B", "C"],
            vec![Expense {
                description: "Hotel".to_string(),
                amount: dec!(300),
                payer: "A".to_string(),
                participants: vec!["A".to_string(), "B".to_string(), "C".to_string()],
                date: Utc::now(),
            }],
            vec![Settlement {
                from: "B".to_string(),
                to: "A".to_string(),
                amount: dec!(100),
                note: None,
                date: Utc::now(),
            }],
        )
        .unwrap()
    }

    #[rstest]
    fn summary_reports_totals_and_standings(ledger: Ledger) {
        let summary = GroupSummary::build("trip", "Trip", &ledger, &Presentation::default());

        assert_eq!(summary.member_count, 3);
        assert_eq!(summary.expense_count, 1);
        assert_eq!(summary.settlement_count, 1);
        assert_eq!(summary.total_spent, dec!(300));
        assert_eq!(summary.total_label, "₹300.00");
        assert_eq!(summary.unsettled_count, 2);
        assert_eq!(
            summary
                .balances
                .iter()
                .map(|entry| entry.label.as_str())
                .collect::<Vec<_>>(),
            vec!["A: Gets ₹100.00", "B: Settled", "C: Owes ₹100.00"]
        );
        assert_eq!(summary.suggested_transfers.len(), 1);
    }

    #[rstest]
    fn summary_uses_configured_currency(ledger: Ledger) {
        let presentation = Presentation {
            currency: "$".to_string(),
        };
        let summary = GroupSummary::build("trip", "Trip", &ledger, &presentation);

        assert_eq!(summary.total_label, "$300.00");
    }

    #[rstest]
    #[case(dec!(0.01), Standing::Settled, "A: Settled")]
    #[case(dec!(-0.01), Standing::Settled, "A: Settled")]
    #[case(dec!(0.02), Standing::Gets, "A: Gets ₹0.02")]
    #[case(dec!(-0.02), Standing::Owes, "A: Owes ₹0.02")]
    fn a_cent_either_way_is_settled(
        #[case] balance: Decimal,
        #[case] standing: Standing,
        #[case] label: &str,
    ) {
        let entry = MemberBalance::new("A".to_string(), balance, &Presentation::default());

        assert_eq!(entry.standing, standing);
        assert_eq!(entry.label, label);
    }

    #[rstest]
    fn quick_split_names_blank_people() {
        let shares = quick_split(dec!(100), &["Ann", " ", "Cat"], &Presentation::default()).unwrap();

        assert_eq!(
            shares
                .iter()
                .map(|share| (share.name.as_str(), share.amount))
                .collect::<Vec<_>>(),
            vec![("Ann", dec!(33.33)), ("Person 2", dec!(33.33)), ("Cat", dec!(33.34))]
        );
        assert_eq!(shares[2].label, "Cat owes ₹33.34");
    }

    #[rstest]
    fn quick_split_needs_people() {
        let names: [&str; 0] = [];
        assert!(matches!(
            quick_split(dec!(10), &names, &Presentation::default()),
            Err(EngineError::InvalidExpense { .. })
        ));
    }
}
