//! Growable storage for persistent program variables.

use super::{convert, magnitude, ops, sizing, Limb, Num, NumError, NumResult};
use std::cmp::Ordering;
use std::fmt;

const INITIAL_CAPACITY: usize = 1;

/// A signed integer that owns a growable limb buffer. One `GrowInt` is
/// created per program variable and mutated in place for the whole
/// program lifetime; capacity at least doubles on growth and never
/// shrinks, so reallocation amortizes to O(1) per assignment.
///
/// Invariant: limbs at positions `>= len` are zero.
pub struct GrowInt {
    limbs: Box<[Limb]>,
    len: usize,
    negative: bool,
}

impl GrowInt {
    /// A zero-valued variable with minimal capacity.
    pub fn new() -> Self {
        Self {
            limbs: vec![0; INITIAL_CAPACITY].into_boxed_slice(),
            len: 0,
            negative: false,
        }
    }

    pub fn from_i64(value: i64) -> NumResult<Self> {
        let mut out = Self::new();
        out.set_i64(value)?;
        Ok(out)
    }

    /// Parse decimal text, pre-sizing the buffer from the digit count.
    pub fn parse(text: &str) -> NumResult<Self> {
        let mut out = Self::new();
        out.ensure_capacity(sizing::limbs_for_decimal(text.len()).max(1))?;
        let (len, negative) = convert::parse_into(&mut out.limbs, text)?;
        out.len = len;
        out.negative = negative;
        Ok(out)
    }

    /// Allocated limb slots (monotonically non-decreasing).
    pub fn capacity(&self) -> usize {
        self.limbs.len()
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

    pub fn view(&self) -> Num<'_> {
        Num::new(&self.limbs[..self.len], self.negative)
    }

    /// Grow to at least `needed` slots: a fresh buffer of
    /// `max(2 * capacity, needed)`, live limbs carried over, the rest
    /// zeroed. Reports `AllocationFailure` if the reserve fails.
    pub fn ensure_capacity(&mut self, needed: usize) -> NumResult<()> {
        let capacity = self.limbs.len();
        if needed <= capacity {
            return Ok(());
        }
        let target = needed.max(capacity * 2);
        let mut fresh: Vec<Limb> = Vec::new();
        fresh
            .try_reserve_exact(target)
            .map_err(|_| NumError::AllocationFailure { limbs: target })?;
        fresh.resize(target, 0);
        fresh[..self.len].copy_from_slice(&self.limbs[..self.len]);
        self.limbs = fresh.into_boxed_slice();
        Ok(())
    }

    /// Overwrite with a copy of `src`.
    pub fn assign(&mut self, src: Num<'_>) -> NumResult<()> {
        self.ensure_capacity(src.len())?;
        // clear old limbs above the incoming length
        for limb in self.limbs[src.len()..self.len.max(src.len())].iter_mut() {
            *limb = 0;
        }
        self.limbs[..src.len()].copy_from_slice(src.limbs());
        self.len = src.len();
        self.negative = src.is_negative();
        Ok(())
    }

    /// Overwrite with a native value.
    pub fn set_i64(&mut self, value: i64) -> NumResult<()> {
        self.ensure_capacity(sizing::limbs_for_i64())?;
        let old_len = self.len;
        self.len = magnitude::from_u64(&mut self.limbs, value.unsigned_abs());
        for limb in self.limbs[self.len..old_len.max(self.len)].iter_mut() {
            *limb = 0;
        }
        self.negative = self.len > 0 && value < 0;
        Ok(())
    }

    /// `self += rhs`, in place.
    pub fn add_assign(&mut self, rhs: Num<'_>) -> NumResult<()> {
        self.combine(rhs, rhs.is_negative())
    }

    /// `self -= rhs`, in place.
    pub fn sub_assign(&mut self, rhs: Num<'_>) -> NumResult<()> {
        self.combine(rhs, !rhs.is_negative())
    }

    fn combine(&mut self, rhs: Num<'_>, rhs_negative: bool) -> NumResult<()> {
        self.ensure_capacity(sizing::add(self.len, rhs.len()))?;
        if self.negative == rhs_negative {
            self.len = magnitude::add_in_place(&mut self.limbs, self.len, rhs.limbs())?;
        } else if magnitude::cmp(&self.limbs[..self.len], rhs.limbs()) != Ordering::Less {
            self.len = magnitude::sub_in_place(&mut self.limbs, self.len, rhs.limbs())?;
            if self.len == 0 {
                self.negative = false;
            }
        } else {
            self.len = magnitude::sub_from_in_place(&mut self.limbs, self.len, rhs.limbs())?;
            self.negative = rhs_negative;
        }
        Ok(())
    }

    /// `self = -self`; zero stays non-negative.
    pub fn negate(&mut self) {
        if self.len > 0 {
            self.negative = !self.negative;
        }
    }
}

impl Default for GrowInt {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GrowInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", convert::render(&self.limbs[..self.len], self.negative))
    }
}

impl fmt::Debug for GrowInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GrowInt({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigint::FixedInt;

    #[test]
    fn test_new_is_zero_with_minimal_capacity() {
        let v = GrowInt::new();
        assert!(v.is_zero());
        assert_eq!(v.capacity(), INITIAL_CAPACITY);
        assert_eq!(v.to_string(), "0");
    }

    #[test]
    fn test_growth_at_least_doubles() {
        let mut v = GrowInt::new();
        v.ensure_capacity(2).unwrap();
        assert_eq!(v.capacity(), 2);
        v.ensure_capacity(3).unwrap();
        assert_eq!(v.capacity(), 4);
        v.ensure_capacity(100).unwrap();
        assert_eq!(v.capacity(), 100);
    }

    #[test]
    fn test_capacity_never_shrinks() {
        let mut v = GrowInt::new();
        v.ensure_capacity(50).unwrap();
        v.set_i64(1).unwrap();
        v.ensure_capacity(1).unwrap();
        assert_eq!(v.capacity(), 50);
    }

    #[test]
    fn test_growth_preserves_value() {
        let mut v = GrowInt::parse("18446744073709551616").unwrap();
        let before = v.to_string();
        v.ensure_capacity(v.capacity() * 8).unwrap();
        assert_eq!(v.to_string(), before);
    }

    #[test]
    fn test_accumulator_doubling() {
        // x := x + x, ten times from 1, grows through several capacities
        let mut x = GrowInt::from_i64(1).unwrap();
        for _ in 0..10 {
            let snapshot = FixedInt::parse(&x.to_string()).unwrap();
            x.add_assign(snapshot.view()).unwrap();
        }
        assert_eq!(x.to_string(), "1024");
    }

    #[test]
    fn test_add_assign_in_place_carry_growth() {
        let mut x = GrowInt::parse("18446744073709551615").unwrap();
        let one = GrowInt::from_i64(1).unwrap();
        x.add_assign(one.view()).unwrap();
        assert_eq!(x.to_string(), "18446744073709551616");
    }

    #[test]
    fn test_sub_assign_sign_crossing() {
        // 3 - 10 = -7 exercises the reversed in-place subtraction
        let mut x = GrowInt::from_i64(3).unwrap();
        let y = GrowInt::from_i64(10).unwrap();
        x.sub_assign(y.view()).unwrap();
        assert_eq!(x.to_string(), "-7");
    }

    #[test]
    fn test_sub_assign_to_zero_is_canonical() {
        let mut x = GrowInt::from_i64(-4).unwrap();
        let y = GrowInt::from_i64(-4).unwrap();
        x.sub_assign(y.view()).unwrap();
        assert!(x.is_zero());
        assert!(!x.is_negative());
    }

    #[test]
    fn test_assign_shorter_value_clears_stale_limbs() {
        let mut x = GrowInt::parse("340282366920938463463374607431768211456").unwrap();
        let y = GrowInt::from_i64(7).unwrap();
        x.assign(y.view()).unwrap();
        assert_eq!(x.to_string(), "7");
        // arithmetic after the overwrite must not see stale high limbs
        let one = GrowInt::from_i64(1).unwrap();
        x.add_assign(one.view()).unwrap();
        assert_eq!(x.to_string(), "8");
    }

    #[test]
    fn test_set_i64_clears_stale_limbs() {
        let mut x = GrowInt::parse("340282366920938463463374607431768211456").unwrap();
        x.set_i64(-1).unwrap();
        assert_eq!(x.to_string(), "-1");
        x.negate();
        assert_eq!(x.to_string(), "1");
    }

    #[test]
    fn test_negate() {
        let mut x = GrowInt::from_i64(5).unwrap();
        x.negate();
        assert_eq!(x.to_string(), "-5");
        x.negate();
        assert_eq!(x.to_string(), "5");
    }

    #[test]
    fn test_negate_zero_stays_non_negative() {
        let mut x = GrowInt::new();
        x.negate();
        assert!(!x.is_negative());
    }

    #[test]
    fn test_parse_matches_fixed_parse() {
        for text in ["0", "-1", "99999999999999999999", "-170141183460469231731687303715884105728"] {
            assert_eq!(
                GrowInt::parse(text).unwrap().to_string(),
                FixedInt::parse(text).unwrap().to_string()
            );
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            GrowInt::parse("12a3"),
            Err(NumError::MalformedInteger(_))
        ));
    }
}
