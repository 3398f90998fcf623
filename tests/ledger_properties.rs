use billsplit::money::SETTLED_EPSILON;
use billsplit::{compute_balances, suggest_settlements, Expense, Ledger, Settlement};
use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const MEMBERS: [&str; 5] = ["Ann", "Ben", "Cat", "Dev", "Eli"];

fn amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn expense() -> impl Strategy<Value = Expense> {
    (
        amount(),
        0..MEMBERS.len(),
        proptest::sample::subsequence(MEMBERS.to_vec(), 1..=MEMBERS.len()),
    )
        .prop_map(|(amount, payer, participants)| Expense {
            description: "Shared".to_string(),
            amount,
            payer: MEMBERS[payer].to_string(),
            participants: participants.into_iter().map(str::to_string).collect(),
            date: Utc::now(),
        })
}

fn settlement() -> impl Strategy<Value = Settlement> {
    (amount(), 0..MEMBERS.len(), 1..MEMBERS.len()).prop_map(|(amount, from, offset)| {
        Settlement {
            from: MEMBERS[from].to_string(),
            to: MEMBERS[(from + offset) % MEMBERS.len()].to_string(),
            amount,
            note: None,
            date: Utc::now(),
        }
    })
}

proptest! {
    #[test]
    fn balances_always_sum_to_zero(
        expenses in proptest::collection::vec(expense(), 0..30),
        settlements in proptest::collection::vec(settlement(), 0..10),
    ) {
        let balances = compute_balances(&MEMBERS, &expenses, &settlements).unwrap();

        prop_assert_eq!(balances.len(), MEMBERS.len());
        prop_assert_eq!(balances.values().sum::<Decimal>(), Decimal::ZERO);
    }

    #[test]
    fn record_order_does_not_change_balances(
        (expenses, shuffled_expenses) in proptest::collection::vec(expense(), 0..20)
            .prop_flat_map(|expenses| (Just(expenses.clone()), Just(expenses).prop_shuffle())),
        (settlements, shuffled_settlements) in proptest::collection::vec(settlement(), 0..10)
            .prop_flat_map(|settlements| {
                (Just(settlements.clone()), Just(settlements).prop_shuffle())
            }),
    ) {
        let forward = compute_balances(&MEMBERS, &expenses, &settlements).unwrap();

        prop_assert_eq!(
            &forward,
            &compute_balances(&MEMBERS, &shuffled_expenses, &settlements).unwrap()
        );
        prop_assert_eq!(
            &forward,
            &compute_balances(&MEMBERS, &expenses, &shuffled_settlements).unwrap()
        );
    }

    #[test]
    fn recording_suggested_transfers_settles_everyone(
        expenses in proptest::collection::vec(expense(), 1..30),
        settlements in proptest::collection::vec(settlement(), 0..10),
    ) {
        let mut ledger = Ledger::new(&MEMBERS, expenses, settlements).unwrap();
        let suggested = ledger.suggested_transfers();
        prop_assert!(suggested.len() < MEMBERS.len());

        for transfer in suggested {
            prop_assert!(transfer.amount > Decimal::ZERO);
            ledger
                .record_settlement(Settlement {
                    from: transfer.from,
                    to: transfer.to,
                    amount: transfer.amount,
                    note: None,
                    date: Utc::now(),
                })
                .unwrap();
        }

        // Members within a cent of zero are never matched, so the other side
        // can keep at most one cent per such member.
        let residue = SETTLED_EPSILON * Decimal::from(MEMBERS.len() - 1);
        for balance in ledger.balances().values() {
            prop_assert!(balance.abs() <= residue);
        }
        prop_assert!(ledger.suggested_transfers().is_empty());
    }
}

#[test]
fn empty_group_is_a_no_op() {
    let members: [&str; 0] = [];
    let balances = compute_balances(&members, &[], &[]).unwrap();

    assert!(balances.is_empty());
    assert!(suggest_settlements(&balances).is_empty());
}

#[test]
fn three_way_split_keeps_every_cent() {
    let expense = Expense {
        description: "Dinner".to_string(),
        amount: dec!(100),
        payer: "Ann".to_string(),
        participants: vec!["Ann".to_string(), "Ben".to_string(), "Cat".to_string()],
        date: Utc::now(),
    };
    let balances = compute_balances(&["Ann", "Ben", "Cat"], &[expense], &[]).unwrap();

    assert_eq!(balances["Ann"], dec!(66.67));
    assert_eq!(balances["Ben"], dec!(-33.33));
    assert_eq!(balances["Cat"], dec!(-33.34));
    assert_eq!(balances.values().sum::<Decimal>(), Decimal::ZERO);
}

#[test]
fn names_differing_in_case_and_spacing_are_one_member() {
    let expense = Expense {
        description: "Coffee".to_string(),
        amount: dec!(10),
        payer: "alice ".to_string(),
        participants: vec!["Alice".to_string(), "  BOB".to_string()],
        date: Utc::now(),
    };
    let balances = compute_balances(&["Alice", "Bob"], &[expense], &[]).unwrap();

    assert_eq!(balances.len(), 2);
    assert_eq!(balances["Alice"], dec!(5));
    assert_eq!(balances["Bob"], dec!(-5));
}
