//! Fixed-capacity values for the interpreter.

use super::{convert, magnitude, ops, Limb, Num, NumResult, FIXED_LIMBS};
use std::fmt;

/// A signed integer with one pre-sized buffer of [`FIXED_LIMBS`] limbs,
/// created per expression evaluation and dropped with it.
///
/// Invariant: limbs at positions `>= len` are zero, so derived equality
/// is value equality.
#[derive(Clone, PartialEq, Eq)]
pub struct FixedInt {
    limbs: Box<[Limb]>,
    len: usize,
    negative: bool,
}

impl FixedInt {
    /// Canonical zero.
    pub fn zero() -> Self {
        Self {
            limbs: vec![0; FIXED_LIMBS].into_boxed_slice(),
            len: 0,
            negative: false,
        }
    }

    pub fn from_i64(value: i64) -> Self {
        let mut out = Self::zero();
        out.len = magnitude::from_u64(&mut out.limbs, value.unsigned_abs());
        out.negative = out.len > 0 && value < 0;
        out
    }

    /// Parse decimal text; fails with `MalformedInteger` on bad input
    /// and `CapacityExceeded` past [`FIXED_LIMBS`] limbs.
    pub fn parse(text: &str) -> NumResult<Self> {
        let mut out = Self::zero();
        let (len, negative) = convert::parse_into(&mut out.limbs, text)?;
        out.len = len;
        out.negative = negative;
        Ok(out)
    }

    pub fn view(&self) -> Num<'_> {
        Num::new(&self.limbs[..self.len], self.negative)
    }

    /// Limbs in use.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_zero(&self) -> bool {
        self.len == 0
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn add(&self, other: &Self) -> NumResult<Self> {
        let mut out = Self::zero();
        let (len, negative) = ops::add(&mut out.limbs, self.view(), other.view())?;
        out.len = len;
        out.negative = negative;
        Ok(out)
    }

    pub fn sub(&self, other: &Self) -> NumResult<Self> {
        let mut out = Self::zero();
        let (len, negative) = ops::sub(&mut out.limbs, self.view(), other.view())?;
        out.len = len;
        out.negative = negative;
        Ok(out)
    }

    pub fn negated(&self) -> Self {
        let mut out = self.clone();
        if out.len > 0 {
            out.negative = !out.negative;
        }
        out
    }
}

impl fmt::Display for FixedInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", convert::render(&self.limbs[..self.len], self.negative))
    }
}

impl fmt::Debug for FixedInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedInt({self})")
    }
}
