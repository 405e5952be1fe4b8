//! Unsigned decimal integer wide enough for every Fibonacci term up to n = 10000.
//!
//! Only addition and formatting are needed, so limbs are stored base 10^9,
//! least significant first, which makes `Display` a straight walk.

use std::fmt;

const LIMB_BASE: u32 = 1_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BigNat {
    limbs: Vec<u32>,
}

impl BigNat {
    pub(crate) fn from_u32(value: u32) -> Self {
        let mut limbs = vec![value % LIMB_BASE];
        if value >= LIMB_BASE {
            limbs.push(value / LIMB_BASE);
        }
        Self { limbs }
    }

    pub(crate) fn add(&self, other: &Self) -> Self {
        let len = self.limbs.len().max(other.limbs.len());
        let mut limbs = Vec::with_capacity(len + 1);
        let mut carry = 0u32;
        for i in 0..len {
            let a = self.limbs.get(i).copied().unwrap_or(0);
            let b = other.limbs.get(i).copied().unwrap_or(0);
            // Each limb is < 10^9, so the sum stays below u32::MAX
            let sum = a + b + carry;
            limbs.push(sum % LIMB_BASE);
            carry = sum / LIMB_BASE;
        }
        if carry > 0 {
            limbs.push(carry);
        }
        Self { limbs }
    }
}

impl fmt::Display for BigNat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut iter = self.limbs.iter().rev();
        if let Some(top) = iter.next() {
            write!(f, "{top}")?;
        }
        for limb in iter {
            write!(f, "{limb:09}")?;
        }
        Ok(())
    }
}
