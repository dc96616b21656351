pub mod amount;
pub mod config;
pub mod machine;
pub mod particle;
pub mod procedure;
pub mod registry;

pub use amount::{Amount, AmountError};
pub use config::{ConfigError, ValidationConfig};
pub use machine::{ConstraintMachine, MachineError, RunSummary, Side};
pub use particle::{
    Fungible, Particle, ParticleError, ParticleKind, ParticleVariant, TokenDefinitionReference,
    TransferrableTokensParticle, UnallocatedTokensParticle,
};
pub use procedure::{
    CMAction, FungibleTransition, ParticleProcedure, ProcedureError, ProcedureResult,
    TransitionProcedure,
};
pub use registry::{ProcedureRegistry, RegistryBuilder, RegistryError};
