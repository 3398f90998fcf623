use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::error::EngineError;
use crate::ledger::{Ledger, Posting};
use crate::member::Roster;
use crate::schemas::{Expense, MemberName, Settlement};

/// Net position per member: positive when the group owes them, negative
/// when they owe the group. Always sums to zero.
pub type Balances = BTreeMap<MemberName, Decimal>;

pub fn compute_balances<S: AsRef<str>>(
    members: &[S],
    expenses: &[Expense],
    settlements: &[Settlement],
) -> Result<Balances, EngineError> {
    let ledger = Ledger::new(members, expenses.to_vec(), settlements.to_vec())?;
    Ok(ledger.balances())
}

pub(crate) fn tally(roster: &Roster, postings: &[Posting]) -> Balances {
    let mut balance: Balances = roster
        .names()
        .iter()
        .map(|name| (name.clone(), Decimal::ZERO))
        .collect();
    for posting in postings {
        adjust(&mut balance, roster, posting.creditor, posting.amount);
        for &(debtor, share) in &posting.shares {
            adjust(&mut balance, roster, debtor, -share);
        }
    }
    balance
}

fn adjust(balance: &mut Balances, roster: &Roster, position: usize, amount: Decimal) {
    if let Some(name) = roster.name(position) {
        balance
            .entry(name.to_string())
            .and_modify(|v| *v += amount)
            .or_insert(amount);
    }
}
