use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::amount::Amount;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParticleError {
    #[error("invalid token address {0:?}")]
    InvalidAddress(String),
    #[error("invalid token symbol {0:?}")]
    InvalidSymbol(String),
    #[error("malformed token reference {0:?}")]
    Malformed(String),
}

/// Identifies a token type as `/<address>/<symbol>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TokenDefinitionReference {
    address: String,
    symbol: String,
}

impl TokenDefinitionReference {
    /// Build a reference, validating that `symbol` is non-empty alphanumeric.
    pub fn new(address: &str, symbol: &str) -> Result<Self, ParticleError> {
        if address.is_empty() || address.contains('/') {
            return Err(ParticleError::InvalidAddress(address.to_string()));
        }
        if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ParticleError::InvalidSymbol(symbol.to_string()));
        }
        Ok(Self {
            address: address.to_string(),
            symbol: symbol.to_string(),
        })
    }

    /// Parse the `/<address>/<symbol>` form.
    pub fn parse(text: &str) -> Result<Self, ParticleError> {
        let mut parts = text.split('/');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(""), Some(address), Some(symbol), None) => Self::new(address, symbol),
            _ => Err(ParticleError::Malformed(text.to_string())),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }
}

impl fmt::Display for TokenDefinitionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.address, self.symbol)
    }
}

impl TryFrom<String> for TokenDefinitionReference {
    type Error = ParticleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TokenDefinitionReference> for String {
    fn from(value: TokenDefinitionReference) -> Self {
        value.to_string()
    }
}

/// Capability of carrying a conserved token amount.
pub trait Fungible {
    fn amount(&self) -> Amount;
    fn token_definition(&self) -> &TokenDefinitionReference;
}

/// Tokens held by an owner and spendable with the owner's signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferrableTokensParticle {
    /// Hex encoded compressed public key of the holder.
    pub owner: String,
    pub token_definition: TokenDefinitionReference,
    pub amount: Amount,
    pub nonce: u64,
}

impl TransferrableTokensParticle {
    pub fn new(
        owner: &[u8],
        token_definition: TokenDefinitionReference,
        amount: Amount,
        nonce: u64,
    ) -> Self {
        Self {
            owner: hex::encode(owner),
            token_definition,
            amount,
            nonce,
        }
    }

    pub fn is_owned_by(&self, public_key: &[u8]) -> bool {
        self.owner == hex::encode(public_key)
    }
}

impl Fungible for TransferrableTokensParticle {
    fn amount(&self) -> Amount {
        self.amount
    }

    fn token_definition(&self) -> &TokenDefinitionReference {
        &self.token_definition
    }
}

/// Supply of a token that has not been minted to anyone yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnallocatedTokensParticle {
    pub token_definition: TokenDefinitionReference,
    pub amount: Amount,
    pub nonce: u64,
}

impl Fungible for UnallocatedTokensParticle {
    fn amount(&self) -> Amount {
        self.amount
    }

    fn token_definition(&self) -> &TokenDefinitionReference {
        &self.token_definition
    }
}

/// Type tag of a [`Particle`], used as the procedure dispatch key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    TransferrableTokens,
    UnallocatedTokens,
}

impl fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticleKind::TransferrableTokens => f.write_str("transferrable_tokens"),
            ParticleKind::UnallocatedTokens => f.write_str("unallocated_tokens"),
        }
    }
}

/// A unit of ledger state consumed or produced by a transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Particle {
    TransferrableTokens(TransferrableTokensParticle),
    UnallocatedTokens(UnallocatedTokensParticle),
}

impl Particle {
    pub fn kind(&self) -> ParticleKind {
        match self {
            Particle::TransferrableTokens(_) => ParticleKind::TransferrableTokens,
            Particle::UnallocatedTokens(_) => ParticleKind::UnallocatedTokens,
        }
    }

    fn as_fungible(&self) -> &dyn Fungible {
        match self {
            Particle::TransferrableTokens(p) => p,
            Particle::UnallocatedTokens(p) => p,
        }
    }
}

impl Fungible for Particle {
    fn amount(&self) -> Amount {
        self.as_fungible().amount()
    }

    fn token_definition(&self) -> &TokenDefinitionReference {
        self.as_fungible().token_definition()
    }
}

impl From<TransferrableTokensParticle> for Particle {
    fn from(p: TransferrableTokensParticle) -> Self {
        Particle::TransferrableTokens(p)
    }
}

impl From<UnallocatedTokensParticle> for Particle {
    fn from(p: UnallocatedTokensParticle) -> Self {
        Particle::UnallocatedTokens(p)
    }
}

/// A concrete particle struct that can be projected out of [`Particle`].
pub trait ParticleVariant: Sized {
    const KIND: ParticleKind;

    fn from_particle(particle: &Particle) -> Option<&Self>;
}

impl ParticleVariant for TransferrableTokensParticle {
    const KIND: ParticleKind = ParticleKind::TransferrableTokens;

    fn from_particle(particle: &Particle) -> Option<&Self> {
        match particle {
            Particle::TransferrableTokens(p) => Some(p),
            _ => None,
        }
    }
}

impl ParticleVariant for UnallocatedTokensParticle {
    const KIND: ParticleKind = ParticleKind::UnallocatedTokens;

    fn from_particle(particle: &Particle) -> Option<&Self> {
        match particle {
            Particle::UnallocatedTokens(p) => Some(p),
            _ => None,
        }
    }
}
