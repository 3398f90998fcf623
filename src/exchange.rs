use std::collections::BTreeMap;
use std::mem::swap;

use rust_decimal::Decimal;

use crate::balance::Balances;
use crate::ledger::Ledger;
use crate::money::SETTLED_EPSILON;
use crate::schemas::{MemberName, Transfer};

#[derive(Clone, Debug)]
pub struct PersonalBalance {
    pub id: MemberName,
    pub balance: Decimal,
}

#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct UserPair {
    pub user1: MemberName,
    pub user2: MemberName,
}

/// Who owes whom directly, without simplifying across members.
///
/// Every expense share and every settlement is netted per pair of members,
/// so each pair ends up with at most one transfer.
pub fn pairwise_debts(ledger: &Ledger) -> Vec<Transfer> {
    let roster = ledger.roster();
    let mut balances_between_people: BTreeMap<UserPair, Decimal> = BTreeMap::new();

    for posting in ledger.postings() {
        let Some(creditor) = roster.name(posting.creditor) else {
            continue;
        };
        for &(debtor, share) in &posting.shares {
            let Some(debtor) = roster.name(debtor) else {
                continue;
            };
            if debtor == creditor {
                continue;
            }
            let mut pair = UserPair {
                user1: creditor.to_string(),
                user2: debtor.to_string(),
            };
            let mut amount = share;

            // Alphabetical order keeps both directions of a pair in one entry
            if pair.user1 > pair.user2 {
                swap(&mut pair.user1, &mut pair.user2);
                amount = -amount;
            }

            balances_between_people
                .entry(pair)
                .and_modify(|balance| *balance += amount)
                .or_insert(amount);
        }
    }

    let mut exchanges = Vec::new();
    for (people_pair, balance) in balances_between_people {
        if balance.is_zero() {
            continue;
        }
        // user2 owes user1 while the balance is positive
        let mut payer = people_pair.user2;
        let mut receiver = people_pair.user1;
        if balance.is_sign_negative() {
            swap(&mut payer, &mut receiver);
        }
        exchanges.push(Transfer {
            from: payer,
            to: receiver,
            amount: balance.abs(),
        });
    }
    exchanges
}

/// Greedy debt clearing over a balance map.
///
/// Creditors and debtors are each taken largest first (ties by name), and the
/// current debtor pays the current creditor as much as both allow. Whoever
/// drops below [`SETTLED_EPSILON`] is done; anyone starting within it of zero
/// is already settled. This does not search for the
/// smallest possible number of transfers.
pub fn suggest_settlements(balances: &Balances) -> Vec<Transfer> {
    let mut payers = Vec::new();
    let mut receivers = Vec::new();

    for (id, &balance) in balances {
        let person = PersonalBalance {
            id: id.clone(),
            balance: balance.abs(),
        };
        if balance > SETTLED_EPSILON {
            receivers.push(person);
        } else if balance < -SETTLED_EPSILON {
            payers.push(person);
        }
    }

    // Ascending, so the largest balance (first name on ties) sits at the end
    let order = |a: &PersonalBalance, b: &PersonalBalance| {
        a.balance.cmp(&b.balance).then_with(|| b.id.cmp(&a.id))
    };
    payers.sort_by(order);
    receivers.sort_by(order);

    let mut exchanges = Vec::new();
    while let (Some(receiver), Some(payer)) = (receivers.last_mut(), payers.last_mut()) {
        let amount = receiver.balance.min(payer.balance);
        exchanges.push(Transfer {
            from: payer.id.clone(),
            to: receiver.id.clone(),
            amount,
        });
        receiver.balance -= amount;
        payer.balance -= amount;

        let receiver_done = receiver.balance < SETTLED_EPSILON;
        let payer_done = payer.balance < SETTLED_EPSILON;
        if receiver_done {
            receivers.pop();
        }
        if payer_done {
            payers.pop();
        }
    }
    exchanges
}
