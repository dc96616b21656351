//! Transition procedures: pure decision functions applied to one consumed and
//! one produced particle at a time.
//!
//! A procedure never mutates anything. The remainder it leaves behind is part
//! of its [`ProcedureResult`] and the driver hands it back on the next call.

pub mod fungible;

use std::marker::PhantomData;
use thiserror::Error;

use crate::amount::Amount;
use crate::particle::{Particle, ParticleKind, ParticleVariant};

pub use fungible::FungibleTransition;

/// Which of the two compared particles the driver should discard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CMAction {
    PopInput,
    PopOutput,
    PopInputAndOutput,
}

impl CMAction {
    pub fn pops_input(self) -> bool {
        matches!(self, CMAction::PopInput | CMAction::PopInputAndOutput)
    }

    pub fn pops_output(self) -> bool {
        matches!(self, CMAction::PopOutput | CMAction::PopInputAndOutput)
    }
}

/// Outcome of one procedure step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcedureResult {
    action: CMAction,
    used: Option<Amount>,
}

impl ProcedureResult {
    pub const fn new(action: CMAction, used: Option<Amount>) -> Self {
        Self { action, used }
    }

    /// A result carrying only an action, as used when resuming a run.
    pub const fn of(action: CMAction) -> Self {
        Self { action, used: None }
    }

    pub fn action(&self) -> CMAction {
        self.action
    }

    /// Remainder of the particle left on the stack, if any.
    pub fn used(&self) -> Option<Amount> {
        self.used
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcedureError {
    #[error("particles are not a compatible transition pair")]
    Incompatible,
    #[error("no transition procedure for {input} -> {output}")]
    UnsupportedVariantPair {
        input: ParticleKind,
        output: ParticleKind,
    },
}

/// A transition procedure over a consumed particle of type `I` and a
/// produced particle of type `O`.
pub trait TransitionProcedure<I, O>: Send + Sync {
    /// Decide how much of each side this step resolves.
    ///
    /// `used` is the remainder returned by the previous step of the same run
    /// and `prior` is that step's full result.
    fn execute(
        &self,
        input: &I,
        output: &O,
        used: Option<Amount>,
        prior: Option<&ProcedureResult>,
    ) -> Result<ProcedureResult, ProcedureError>;
}

/// Object-safe procedure over [`Particle`] values, as stored in the registry.
pub trait ParticleProcedure: Send + Sync {
    fn execute(
        &self,
        input: &Particle,
        output: &Particle,
        used: Option<Amount>,
        prior: Option<&ProcedureResult>,
    ) -> Result<ProcedureResult, ProcedureError>;
}

/// Adapts a typed procedure to [`ParticleProcedure`] by projecting each
/// particle onto its concrete variant.
pub struct Typed<P, I, O> {
    inner: P,
    _variants: PhantomData<fn(&I, &O)>,
}

impl<P, I, O> Typed<P, I, O> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            _variants: PhantomData,
        }
    }
}

impl<P, I, O> ParticleProcedure for Typed<P, I, O>
where
    P: TransitionProcedure<I, O>,
    I: ParticleVariant,
    O: ParticleVariant,
{
    fn execute(
        &self,
        input: &Particle,
        output: &Particle,
        used: Option<Amount>,
        prior: Option<&ProcedureResult>,
    ) -> Result<ProcedureResult, ProcedureError> {
        match (I::from_particle(input), O::from_particle(output)) {
            (Some(i), Some(o)) => self.inner.execute(i, o, used, prior),
            _ => Err(ProcedureError::UnsupportedVariantPair {
                input: input.kind(),
                output: output.kind(),
            }),
        }
    }
}
