//! Constraint machine: drives transition procedures over the consumed and
//! produced particles of one state change.
//!
//! Both sides are treated as stacks whose first element is on top. Each step
//! resolves the procedure for the top pair, feeds it the remainder left by the
//! previous step, and pops whatever the procedure reports as resolved. A run
//! is valid only if both stacks empty out together with nothing carried over.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crypto::{CryptoError, ECSignature, Hash, KeyHandler};

use crate::amount::{Amount, AmountError};
use crate::config::ValidationConfig;
use crate::particle::{Fungible, Particle};
use crate::procedure::{ProcedureError, ProcedureResult};
use crate::registry::ProcedureRegistry;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Consumed,
    Produced,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Consumed => f.write_str("consumed"),
            Side::Produced => f.write_str("produced"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MachineError {
    #[error(transparent)]
    Procedure(#[from] ProcedureError),
    #[error(transparent)]
    Crypto(#[from] CryptoError),
    #[error(transparent)]
    Amount(#[from] AmountError),
    #[error("{0} side is empty")]
    Empty(Side),
    #[error("{side} side has {count} particles (max {max})")]
    TooManyParticles { side: Side, count: usize, max: usize },
    #[error("{side} particle {index} has a zero amount")]
    ZeroAmount { side: Side, index: usize },
    #[error(
        "unbalanced transition: {remaining_inputs} consumed and {remaining_outputs} produced \
         particles left, carried {leftover:?}"
    )]
    Unbalanced {
        remaining_inputs: usize,
        remaining_outputs: usize,
        leftover: Option<Amount>,
    },
    #[error("signature does not match the transition hash")]
    Unauthorized,
    #[error("consumed particle {index} is not owned by the signer")]
    NotOwner { index: usize },
}

/// Totals of a successful run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub steps: usize,
    /// Sum of amounts of fully popped consumed particles.
    pub consumed: Amount,
    /// Sum of amounts of fully popped produced particles.
    pub produced: Amount,
}

/// Validates state changes against a procedure registry.
///
/// Holds no per-run state, so one machine can serve many threads.
#[derive(Clone, Debug)]
pub struct ConstraintMachine {
    registry: Arc<ProcedureRegistry>,
    config: ValidationConfig,
}

impl ConstraintMachine {
    pub fn new(registry: Arc<ProcedureRegistry>, config: ValidationConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn registry(&self) -> &ProcedureRegistry {
        &self.registry
    }

    /// Check that `outputs` are a conservation-preserving transformation of `inputs`.
    pub fn validate(
        &self,
        inputs: &[Particle],
        outputs: &[Particle],
    ) -> Result<RunSummary, MachineError> {
        self.check_side(Side::Consumed, inputs)?;
        self.check_side(Side::Produced, outputs)?;

        let mut summary = RunSummary::default();
        let (mut next_input, mut next_output) = (0usize, 0usize);
        let mut used: Option<Amount> = None;
        let mut prior: Option<ProcedureResult> = None;

        while next_input < inputs.len() && next_output < outputs.len() {
            let input = &inputs[next_input];
            let output = &outputs[next_output];
            let result = self
                .registry
                .resolve(input.kind(), output.kind())
                .and_then(|procedure| procedure.execute(input, output, used, prior.as_ref()))
                .map_err(|err| {
                    warn!(
                        step = summary.steps,
                        input = %input.kind(),
                        output = %output.kind(),
                        %err,
                        "transition rejected"
                    );
                    err
                })?;

            summary.steps += 1;
            if result.action().pops_input() {
                summary.consumed = summary.consumed.try_add(input.amount())?;
                next_input += 1;
            }
            if result.action().pops_output() {
                summary.produced = summary.produced.try_add(output.amount())?;
                next_output += 1;
            }
            used = result.used();
            prior = Some(result);
            debug!(
                step = summary.steps,
                action = ?result.action(),
                used = ?used,
                "constraint machine step"
            );
        }

        if !self.config.reject_zero_amounts {
            // Zero particles left behind once the other side has emptied carry nothing.
            next_input += count_zero_prefix(&inputs[next_input..]);
            next_output += count_zero_prefix(&outputs[next_output..]);
        }

        let remaining_inputs = inputs.len() - next_input;
        let remaining_outputs = outputs.len() - next_output;
        if remaining_inputs > 0 || remaining_outputs > 0 || used.is_some() {
            warn!(
                remaining_inputs,
                remaining_outputs,
                leftover = ?used,
                "unbalanced transition"
            );
            return Err(MachineError::Unbalanced {
                remaining_inputs,
                remaining_outputs,
                leftover: used,
            });
        }

        debug!(
            steps = summary.steps,
            total = %summary.consumed,
            "transition balanced"
        );
        Ok(summary)
    }

    /// Authenticate the signer of `hash`, check that it owns every
    /// transferrable input, then validate the transition.
    ///
    /// The signer key may be given in any encoding the key handler accepts;
    /// owners are compared against its compressed form.
    pub fn validate_signed(
        &self,
        keys: &dyn KeyHandler,
        hash: &Hash,
        signature: &ECSignature,
        public_key: &[u8],
        inputs: &[Particle],
        outputs: &[Particle],
    ) -> Result<RunSummary, MachineError> {
        if !keys.verify(hash.as_bytes(), signature, public_key)? {
            warn!(%hash, "signature rejected");
            return Err(MachineError::Unauthorized);
        }
        let signer = keys.compress_public_key(public_key)?;
        for (index, input) in inputs.iter().enumerate() {
            if let Particle::TransferrableTokens(tokens) = input {
                if !tokens.is_owned_by(&signer) {
                    warn!(index, owner = %tokens.owner, "input not owned by signer");
                    return Err(MachineError::NotOwner { index });
                }
            }
        }
        self.validate(inputs, outputs)
    }

    fn check_side(&self, side: Side, particles: &[Particle]) -> Result<(), MachineError> {
        if particles.is_empty() {
            return Err(MachineError::Empty(side));
        }
        let max = self.config.max_particles_per_side;
        if particles.len() > max {
            return Err(MachineError::TooManyParticles {
                side,
                count: particles.len(),
                max,
            });
        }
        if self.config.reject_zero_amounts {
            if let Some(index) = particles.iter().position(|p| p.amount().is_zero()) {
                return Err(MachineError::ZeroAmount { side, index });
            }
        }
        Ok(())
    }
}

fn count_zero_prefix(particles: &[Particle]) -> usize {
    particles
        .iter()
        .take_while(|p| p.amount().is_zero())
        .count()
}

impl Default for ConstraintMachine {
    fn default() -> Self {
        Self::new(
            Arc::new(ProcedureRegistry::token_transfers()),
            ValidationConfig::default(),
        )
    }
}
