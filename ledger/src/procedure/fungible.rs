use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

use super::{CMAction, ProcedureError, ProcedureResult, TransitionProcedure};
use crate::amount::Amount;

/// Conservation check between two particle types holding a comparable amount.
///
/// Consumed and produced amounts are merged pairwise: whichever side is larger
/// stays on the stack with its remainder carried into the next step, so a run
/// balances exactly when the totals on both sides agree.
pub struct FungibleTransition<I, O> {
    input_amount: fn(&I) -> Amount,
    output_amount: fn(&O) -> Amount,
    compatible: fn(&I, &O) -> bool,
}

impl<I, O> FungibleTransition<I, O> {
    pub fn new(
        input_amount: fn(&I) -> Amount,
        output_amount: fn(&O) -> Amount,
        compatible: fn(&I, &O) -> bool,
    ) -> Self {
        Self {
            input_amount,
            output_amount,
            compatible,
        }
    }

    /// Effective amounts for this step, substituting the carried remainder
    /// for whichever particle the previous step left on the stack.
    fn effective_amounts(
        &self,
        input: &I,
        output: &O,
        used: Option<Amount>,
        prior: Option<&ProcedureResult>,
    ) -> (Amount, Amount) {
        let kept = prior.map(ProcedureResult::action);
        match (kept, used) {
            (Some(CMAction::PopOutput), Some(rest)) => (rest, (self.output_amount)(output)),
            (Some(CMAction::PopInput), Some(rest)) => ((self.input_amount)(input), rest),
            _ => ((self.input_amount)(input), (self.output_amount)(output)),
        }
    }
}

impl<I, O> TransitionProcedure<I, O> for FungibleTransition<I, O> {
    fn execute(
        &self,
        input: &I,
        output: &O,
        used: Option<Amount>,
        prior: Option<&ProcedureResult>,
    ) -> Result<ProcedureResult, ProcedureError> {
        if !(self.compatible)(input, output) {
            return Err(ProcedureError::Incompatible);
        }

        let (consumed, produced) = self.effective_amounts(input, output, used, prior);
        let result = match consumed.cmp(&produced) {
            Ordering::Equal => ProcedureResult::new(CMAction::PopInputAndOutput, None),
            Ordering::Greater => {
                ProcedureResult::new(CMAction::PopOutput, Some(consumed - produced))
            }
            Ordering::Less => ProcedureResult::new(CMAction::PopInput, Some(produced - consumed)),
        };
        debug!(
            %consumed,
            %produced,
            action = ?result.action(),
            "fungible transition step"
        );
        Ok(result)
    }
}

impl<I, O> fmt::Debug for FungibleTransition<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FungibleTransition").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Coin(Amount);

    fn coin_amount(c: &Coin) -> Amount {
        c.0
    }

    fn procedure() -> FungibleTransition<Coin, Coin> {
        FungibleTransition::new(coin_amount, coin_amount, |_, _| true)
    }

    #[test]
    fn pop_input_and_output_without_prior_ignores_stale_remainder() {
        let result = procedure()
            .execute(
                &Coin(Amount::from_u64(3)),
                &Coin(Amount::from_u64(3)),
                Some(Amount::ONE),
                Some(&ProcedureResult::of(CMAction::PopInputAndOutput)),
            )
            .unwrap();
        assert_eq!(result.action(), CMAction::PopInputAndOutput);
        assert_eq!(result.used(), None);
    }

    #[test]
    fn carried_input_remainder_replaces_input_amount() {
        // Previous step popped the output and left 4 of the input unspent.
        let result = procedure()
            .execute(
                &Coin(Amount::from_u64(10)),
                &Coin(Amount::from_u64(1)),
                Some(Amount::from_u64(4)),
                Some(&ProcedureResult::of(CMAction::PopOutput)),
            )
            .unwrap();
        assert_eq!(result.action(), CMAction::PopOutput);
        assert_eq!(result.used(), Some(Amount::from_u64(3)));
    }

    #[test]
    fn incompatible_pair_is_rejected() {
        let strict: FungibleTransition<Coin, Coin> =
            FungibleTransition::new(coin_amount, coin_amount, |_, _| false);
        let err = strict
            .execute(&Coin(Amount::ONE), &Coin(Amount::ONE), None, None)
            .unwrap_err();
        assert_eq!(err, ProcedureError::Incompatible);
    }

    #[test]
    fn full_width_amounts_compare_exactly() {
        let result = procedure()
            .execute(&Coin(Amount::MAX), &Coin(Amount::ONE), None, None)
            .unwrap();
        assert_eq!(result.action(), CMAction::PopOutput);
        assert_eq!(result.used(), Some(Amount::MAX - Amount::ONE));
    }
}
