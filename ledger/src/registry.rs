//! Static dispatch table from particle kind pairs to transition procedures.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::particle::{
    Fungible, ParticleKind, ParticleVariant, TransferrableTokensParticle,
    UnallocatedTokensParticle,
};
use crate::procedure::{
    FungibleTransition, ParticleProcedure, ProcedureError, TransitionProcedure, Typed,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("procedure already registered for {input} -> {output}")]
    Duplicate {
        input: ParticleKind,
        output: ParticleKind,
    },
}

/// Immutable table of procedures keyed by `(input kind, output kind)`.
#[derive(Clone, Default)]
pub struct ProcedureRegistry {
    procedures: HashMap<(ParticleKind, ParticleKind), Arc<dyn ParticleProcedure>>,
}

/// Collects registrations before freezing them into a [`ProcedureRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    procedures: HashMap<(ParticleKind, ParticleKind), Arc<dyn ParticleProcedure>>,
    duplicate: Option<RegistryError>,
}

impl RegistryBuilder {
    /// Register `procedure` for the `I -> O` pair.
    pub fn register<I, O, P>(mut self, procedure: P) -> Self
    where
        I: ParticleVariant + 'static,
        O: ParticleVariant + 'static,
        P: TransitionProcedure<I, O> + 'static,
    {
        let key = (I::KIND, O::KIND);
        if self.procedures.contains_key(&key) {
            self.duplicate.get_or_insert(RegistryError::Duplicate {
                input: key.0,
                output: key.1,
            });
            return self;
        }
        self.procedures
            .insert(key, Arc::new(Typed::<P, I, O>::new(procedure)));
        self
    }

    pub fn build(self) -> Result<ProcedureRegistry, RegistryError> {
        match self.duplicate {
            Some(err) => Err(err),
            None => Ok(ProcedureRegistry {
                procedures: self.procedures,
            }),
        }
    }
}

fn same_token<I: Fungible, O: Fungible>(input: &I, output: &O) -> bool {
    input.token_definition() == output.token_definition()
}

/// Amount conservation between two token particle types of the same token.
fn conserve<I: Fungible, O: Fungible>() -> FungibleTransition<I, O> {
    FungibleTransition::new(I::amount, O::amount, same_token)
}

impl ProcedureRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Transfer, mint and burn procedures for token particles.
    pub fn token_transfers() -> Self {
        let built = Self::builder()
            .register(conserve::<TransferrableTokensParticle, TransferrableTokensParticle>())
            .register(conserve::<UnallocatedTokensParticle, TransferrableTokensParticle>())
            .register(conserve::<TransferrableTokensParticle, UnallocatedTokensParticle>())
            .register(conserve::<UnallocatedTokensParticle, UnallocatedTokensParticle>())
            .build();
        // Every kind pair above is distinct.
        match built {
            Ok(registry) => registry,
            Err(err) => unreachable!("standard token table: {err}"),
        }
    }

    /// Procedure for the given kind pair.
    pub fn resolve(
        &self,
        input: ParticleKind,
        output: ParticleKind,
    ) -> Result<&dyn ParticleProcedure, ProcedureError> {
        self.procedures
            .get(&(input, output))
            .map(|p| &**p)
            .ok_or(ProcedureError::UnsupportedVariantPair { input, output })
    }

    pub fn len(&self) -> usize {
        self.procedures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procedures.is_empty()
    }
}

impl fmt::Debug for ProcedureRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pairs: Vec<_> = self.procedures.keys().collect();
        pairs.sort();
        f.debug_struct("ProcedureRegistry")
            .field("pairs", &pairs)
            .finish()
    }
}
