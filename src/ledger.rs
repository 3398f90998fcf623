//! A group's append-only transaction log.
//!
//! Records are checked against the roster when they are recorded and kept as
//! postings: one member credited with the full amount, the others debited
//! their share. Balances are always a full recomputation over the postings.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::balance::{tally, Balances};
use crate::error::EngineError;
use crate::exchange::suggest_settlements;
use crate::member::Roster;
use crate::money::{split_evenly, validate_amount};
use crate::schemas::{Expense, Group, Settlement, Transfer};

/// `creditor` is owed `amount` in total, collected as `shares` from the
/// members listed there (possibly including the creditor itself).
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Posting {
    pub(crate) creditor: usize,
    pub(crate) amount: Decimal,
    pub(crate) shares: Vec<(usize, Decimal)>,
}

#[derive(Clone, Debug, Default)]
pub struct Ledger {
    roster: Roster,
    expenses: Vec<Expense>,
    settlements: Vec<Settlement>,
    postings: Vec<Posting>,
}

impl Ledger {
    pub fn new<S: AsRef<str>>(
        members: &[S],
        expenses: Vec<Expense>,
        settlements: Vec<Settlement>,
    ) -> Result<Self, EngineError> {
        let mut ledger = Ledger::with_roster(Roster::new(members)?);
        for expense in expenses {
            ledger.record_expense(expense)?;
        }
        for settlement in settlements {
            ledger.record_settlement(settlement)?;
        }
        Ok(ledger)
    }

    pub fn from_group(group: &Group) -> Result<Self, EngineError> {
        Ledger::new(
            &group.members,
            group.expenses.clone(),
            group.settlements.clone(),
        )
    }

    pub fn with_roster(roster: Roster) -> Self {
        Ledger {
            roster,
            ..Ledger::default()
        }
    }

    /// Validate and append an expense. Names in the stored copy are replaced
    /// by their roster spelling and repeated participants are dropped.
    pub fn record_expense(&mut self, expense: Expense) -> Result<&Expense, EngineError> {
        let index = self.expenses.len();
        let invalid = |reason: String| EngineError::InvalidExpense { index, reason };

        if expense.description.trim().is_empty() {
            return Err(invalid("description must not be blank".to_string()));
        }
        validate_amount(expense.amount).map_err(invalid)?;
        if expense.participants.is_empty() {
            return Err(invalid("expense must be split between at least one member".to_string()));
        }

        let payer = self.roster.position(&expense.payer)?;
        let mut participants = Vec::with_capacity(expense.participants.len());
        for name in &expense.participants {
            let position = self.roster.position(name)?;
            if !participants.contains(&position) {
                participants.push(position);
            }
        }

        // Leftover cents go to the last participants by name, whatever order
        // they were listed in.
        let by_name: BTreeMap<&str, usize> = participants
            .iter()
            .filter_map(|&position| self.roster.name(position).map(|name| (name, position)))
            .collect();
        let shares = by_name
            .into_values()
            .zip(split_evenly(expense.amount, participants.len()))
            .collect();

        let display = |position: usize| self.roster.name(position).unwrap_or_default().to_string();
        let stored = Expense {
            description: expense.description.trim().to_string(),
            amount: expense.amount,
            payer: display(payer),
            participants: participants.iter().map(|&position| display(position)).collect(),
            date: expense.date,
        };

        self.postings.push(Posting {
            creditor: payer,
            amount: expense.amount,
            shares,
        });
        self.expenses.push(stored);
        Ok(&self.expenses[index])
    }

    /// Validate and append a settlement: `from` paid `to` outside the group,
    /// so `from` is credited and `to` debited.
    pub fn record_settlement(
        &mut self,
        settlement: Settlement,
    ) -> Result<&Settlement, EngineError> {
        let index = self.settlements.len();
        let invalid = |reason: String| EngineError::InvalidSettlement { index, reason };

        validate_amount(settlement.amount).map_err(invalid)?;
        let from = self.roster.position(&settlement.from)?;
        let to = self.roster.position(&settlement.to)?;
        if from == to {
            return Err(invalid(format!(
                "`{}` cannot settle with themselves",
                settlement.from
            )));
        }

        let display = |position: usize| self.roster.name(position).unwrap_or_default().to_string();
        let stored = Settlement {
            from: display(from),
            to: display(to),
            amount: settlement.amount,
            note: settlement
                .note
                .map(|note| note.trim().to_string())
                .filter(|note| !note.is_empty()),
            date: settlement.date,
        };

        self.postings.push(Posting {
            creditor: from,
            amount: settlement.amount,
            shares: vec![(to, settlement.amount)],
        });
        self.settlements.push(stored);
        Ok(&self.settlements[index])
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn settlements(&self) -> &[Settlement] {
        &self.settlements
    }

    pub(crate) fn postings(&self) -> &[Posting] {
        &self.postings
    }

    pub fn balances(&self) -> Balances {
        tally(&self.roster, &self.postings)
    }

    pub fn suggested_transfers(&self) -> Vec<Transfer> {
        suggest_settlements(&self.balances())
    }

    /// Sum of every expense amount; settlements are not spending.
    pub fn total_spent(&self) -> Decimal {
        self.expenses.iter().map(|expense| expense.amount).sum()
    }
}
