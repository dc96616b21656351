//! 256-bit unsigned amounts for conserved quantities.
//!
//! Arithmetic is exact: the checked variants report overflow and underflow,
//! while the `+`/`-` operators panic on them. Balancing code only subtracts
//! after comparing, so a panic there is an algorithm bug, not bad input.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;
use thiserror::Error;

const LIMBS: usize = 4;

/// Width in bytes of the big-endian encoding.
pub const AMOUNT_BYTES: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount overflows 256 bits")]
    Overflow,
    #[error("amount underflows zero")]
    Underflow,
    #[error("invalid decimal amount: {0:?}")]
    Parse(String),
}

/// Exact unsigned 256-bit integer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Amount {
    // Least significant limb first.
    limbs: [u64; LIMBS],
}

impl Amount {
    pub const ZERO: Amount = Amount::from_u64(0);
    pub const ONE: Amount = Amount::from_u64(1);
    pub const TWO: Amount = Amount::from_u64(2);
    pub const MAX: Amount = Amount {
        limbs: [u64::MAX; LIMBS],
    };

    pub const fn from_u64(value: u64) -> Self {
        Self {
            limbs: [value, 0, 0, 0],
        }
    }

    pub const fn from_u128(value: u128) -> Self {
        Self {
            limbs: [value as u64, (value >> 64) as u64, 0, 0],
        }
    }

    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|limb| *limb == 0)
    }

    /// Value as `u128`, or `None` if it does not fit.
    pub fn to_u128(&self) -> Option<u128> {
        if self.limbs[2] != 0 || self.limbs[3] != 0 {
            return None;
        }
        Some((self.limbs[1] as u128) << 64 | self.limbs[0] as u128)
    }

    pub fn from_be_bytes(bytes: [u8; AMOUNT_BYTES]) -> Self {
        let mut limbs = [0u64; LIMBS];
        for (i, chunk) in bytes.chunks_exact(8).enumerate() {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            limbs[LIMBS - 1 - i] = u64::from_be_bytes(word);
        }
        Self { limbs }
    }

    pub fn to_be_bytes(&self) -> [u8; AMOUNT_BYTES] {
        let mut out = [0u8; AMOUNT_BYTES];
        for (i, chunk) in out.chunks_exact_mut(8).enumerate() {
            chunk.copy_from_slice(&self.limbs[LIMBS - 1 - i].to_be_bytes());
        }
        out
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        let mut limbs = [0u64; LIMBS];
        let mut carry = false;
        for (i, limb) in limbs.iter_mut().enumerate() {
            let (sum, c1) = self.limbs[i].overflowing_add(rhs.limbs[i]);
            let (sum, c2) = sum.overflowing_add(carry as u64);
            *limb = sum;
            carry = c1 || c2;
        }
        (!carry).then_some(Amount { limbs })
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        let mut limbs = [0u64; LIMBS];
        let mut borrow = false;
        for (i, limb) in limbs.iter_mut().enumerate() {
            let (diff, b1) = self.limbs[i].overflowing_sub(rhs.limbs[i]);
            let (diff, b2) = diff.overflowing_sub(borrow as u64);
            *limb = diff;
            borrow = b1 || b2;
        }
        (!borrow).then_some(Amount { limbs })
    }

    pub fn try_add(self, rhs: Amount) -> Result<Amount, AmountError> {
        self.checked_add(rhs).ok_or(AmountError::Overflow)
    }

    pub fn try_sub(self, rhs: Amount) -> Result<Amount, AmountError> {
        self.checked_sub(rhs).ok_or(AmountError::Underflow)
    }

    fn checked_mul_small(self, factor: u64) -> Option<Amount> {
        let mut limbs = [0u64; LIMBS];
        let mut carry = 0u128;
        for (i, limb) in limbs.iter_mut().enumerate() {
            let product = self.limbs[i] as u128 * factor as u128 + carry;
            *limb = product as u64;
            carry = product >> 64;
        }
        (carry == 0).then_some(Amount { limbs })
    }

    fn div_rem_small(self, divisor: u64) -> (Amount, u64) {
        let mut limbs = [0u64; LIMBS];
        let mut rem = 0u128;
        for i in (0..LIMBS).rev() {
            let acc = rem << 64 | self.limbs[i] as u128;
            limbs[i] = (acc / divisor as u128) as u64;
            rem = acc % divisor as u128;
        }
        (Amount { limbs }, rem as u64)
    }
}

impl Ord for Amount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.limbs.iter().rev().cmp(other.limbs.iter().rev())
    }
}

impl PartialOrd for Amount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Amount) -> Amount {
        match self.checked_add(rhs) {
            Some(sum) => sum,
            None => panic!("amount overflow: {self} + {rhs}"),
        }
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Amount) -> Amount {
        match self.checked_sub(rhs) {
            Some(diff) => diff,
            None => panic!("amount underflow: {self} - {rhs}"),
        }
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount::from_u64(value)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Amount::from_u128(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        // 10^19 is the largest power of ten that fits in a u64.
        const CHUNK: u64 = 10_000_000_000_000_000_000;
        let mut chunks = Vec::new();
        let mut rest = *self;
        while !rest.is_zero() {
            let (quot, rem) = rest.div_rem_small(CHUNK);
            chunks.push(rem);
            rest = quot;
        }
        let mut out = String::with_capacity(chunks.len() * 19);
        let mut iter = chunks.iter().rev();
        if let Some(head) = iter.next() {
            out.push_str(&head.to_string());
        }
        for chunk in iter {
            out.push_str(&format!("{chunk:019}"));
        }
        f.pad(&out)
    }
}

impl fmt::Debug for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Amount({self})")
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AmountError::Parse(s.to_string()));
        }
        s.bytes().try_fold(Amount::ZERO, |acc, digit| {
            acc.checked_mul_small(10)
                .and_then(|acc| acc.checked_add(Amount::from_u64((digit - b'0') as u64)))
                .ok_or(AmountError::Overflow)
        })
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}
