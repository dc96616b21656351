use ledger::{Amount, CMAction, FungibleTransition, ProcedureResult, TransitionProcedure};

struct Fungible {
    amount: Amount,
}

impl Fungible {
    fn new(amount: Amount) -> Self {
        Self { amount }
    }

    fn amount(&self) -> Amount {
        self.amount
    }
}

fn procedure() -> FungibleTransition<Fungible, Fungible> {
    FungibleTransition::new(Fungible::amount, Fungible::amount, |_, _| true)
}

#[test]
fn simple_transfer_pops_both() {
    let result = procedure()
        .execute(
            &Fungible::new(Amount::ONE),
            &Fungible::new(Amount::ONE),
            None,
            None,
        )
        .unwrap();
    assert_eq!(result.action(), CMAction::PopInputAndOutput);
    assert_eq!(result.used(), None);
}

#[test]
fn two_to_one_pops_output_and_leaves_one_on_input() {
    let result = procedure()
        .execute(
            &Fungible::new(Amount::TWO),
            &Fungible::new(Amount::ONE),
            None,
            None,
        )
        .unwrap();
    assert_eq!(result.action(), CMAction::PopOutput);
    assert_eq!(result.used(), Some(Amount::ONE));
}

#[test]
fn one_to_two_pops_input_and_leaves_one_on_output() {
    let result = procedure()
        .execute(
            &Fungible::new(Amount::ONE),
            &Fungible::new(Amount::TWO),
            None,
            None,
        )
        .unwrap();
    assert_eq!(result.action(), CMAction::PopInput);
    assert_eq!(result.used(), Some(Amount::ONE));
}

#[test]
fn two_to_two_pops_both() {
    let result = procedure()
        .execute(
            &Fungible::new(Amount::TWO),
            &Fungible::new(Amount::TWO),
            None,
            None,
        )
        .unwrap();
    assert_eq!(result.action(), CMAction::PopInputAndOutput);
    assert_eq!(result.used(), None);
}

#[test]
fn one_to_two_one_resolves_against_carried_output() {
    let result = procedure()
        .execute(
            &Fungible::new(Amount::ONE),
            &Fungible::new(Amount::TWO),
            Some(Amount::ONE),
            Some(&ProcedureResult::of(CMAction::PopInput)),
        )
        .unwrap();
    assert_eq!(result.action(), CMAction::PopInputAndOutput);
    assert_eq!(result.used(), None);
}

#[test]
fn three_way_rule_holds_for_small_amounts() {
    let procedure = procedure();
    for a in 0u64..24 {
        for b in 0u64..24 {
            let result = procedure
                .execute(
                    &Fungible::new(Amount::from_u64(a)),
                    &Fungible::new(Amount::from_u64(b)),
                    None,
                    None,
                )
                .unwrap();
            let expected = match a.cmp(&b) {
                std::cmp::Ordering::Equal => (CMAction::PopInputAndOutput, None),
                std::cmp::Ordering::Greater => (CMAction::PopOutput, Some(a - b)),
                std::cmp::Ordering::Less => (CMAction::PopInput, Some(b - a)),
            };
            assert_eq!(result.action(), expected.0, "a={a} b={b}");
            assert_eq!(result.used(), expected.1.map(Amount::from_u64), "a={a} b={b}");
        }
    }
}

#[test]
fn procedure_is_shareable_across_threads() {
    let procedure = std::sync::Arc::new(procedure());
    let handles: Vec<_> = (1u64..=4)
        .map(|n| {
            let procedure = std::sync::Arc::clone(&procedure);
            std::thread::spawn(move || {
                procedure
                    .execute(
                        &Fungible::new(Amount::from_u64(n * 2)),
                        &Fungible::new(Amount::from_u64(n)),
                        None,
                        None,
                    )
                    .unwrap()
            })
        })
        .collect();
    for (n, handle) in (1u64..=4).zip(handles) {
        let result = handle.join().unwrap();
        assert_eq!(result.action(), CMAction::PopOutput);
        assert_eq!(result.used(), Some(Amount::from_u64(n)));
    }
}
