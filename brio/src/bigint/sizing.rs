//! Capacity prediction for arithmetic and conversion results.
//!
//! Pure functions with no allocation side effects. Each returns an
//! upper bound on the limbs (or decimal digits) the corresponding
//! operation writes; callers allocate at least that much before
//! invoking the operation, which is what makes the checked capacity
//! errors in the arithmetic layer unreachable in practice.

use super::{DEC_DIGITS_FIT_PER_LIMB, DEC_DIGITS_PER_LIMB, LIMB_BITS};

/// Limbs an addition result can require.
pub fn add(a_len: usize, b_len: usize) -> usize {
    a_len.max(b_len) + 1
}

/// Limbs a subtraction result can require. A safe over-estimate; the
/// actual result often normalizes shorter.
pub fn sub(a_len: usize, b_len: usize) -> usize {
    a_len.max(b_len) + 1
}

/// Limbs a negation result requires.
pub fn negate(a_len: usize) -> usize {
    a_len
}

/// Limbs needed to hold any `i64` magnitude.
pub const fn limbs_for_i64() -> usize {
    (64 + LIMB_BITS as usize - 1) / LIMB_BITS as usize
}

/// Decimal digits that suffice to render a magnitude of `limbs` limbs.
/// Always at least 1 so zero's `"0"` fits.
pub fn decimal_digits(limbs: usize) -> usize {
    (limbs * DEC_DIGITS_PER_LIMB).max(1)
}

/// Limbs that suffice to hold a number of `digits` decimal digits.
pub fn limbs_for_decimal(digits: usize) -> usize {
    digits.div_ceil(DEC_DIGITS_FIT_PER_LIMB)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigint::{FixedInt, Limb};

    #[test]
    fn test_add_size() {
        assert_eq!(add(0, 0), 1);
        assert_eq!(add(3, 1), 4);
        assert_eq!(add(1, 3), 4);
    }

    #[test]
    fn test_sub_size() {
        assert_eq!(sub(2, 2), 3);
    }

    #[test]
    fn test_negate_size() {
        assert_eq!(negate(0), 0);
        assert_eq!(negate(5), 5);
    }

    #[test]
    fn test_limbs_for_i64_covers_max() {
        // i64::MIN magnitude must fit
        assert!(limbs_for_i64() * LIMB_BITS as usize >= 64);
    }

    #[test]
    fn test_decimal_digits_covers_max_limb_value() {
        // A single all-ones limb renders in at most DEC_DIGITS_PER_LIMB digits
        let rendered = format!("{}", Limb::MAX);
        assert!(rendered.len() <= decimal_digits(1));
    }

    #[test]
    fn test_decimal_digits_nonzero_for_zero_limbs() {
        assert_eq!(decimal_digits(0), 1);
    }

    #[test]
    fn test_limbs_for_decimal_roundtrip_bound() {
        // Any d-digit number must fit in limbs_for_decimal(d) limbs;
        // check the boundary with a run of nines.
        for digits in [1usize, 9, 18, 19, 20, 38, 40] {
            let nines = "9".repeat(digits);
            let value = FixedInt::parse(&nines).unwrap();
            assert!(
                value.len() <= limbs_for_decimal(digits),
                "{digits} digits used {} limbs, bound was {}",
                value.len(),
                limbs_for_decimal(digits)
            );
        }
    }

    #[test]
    fn test_sizing_never_under_allocates_random() {
        // Deterministic pseudo-random magnitudes; the written length of
        // every operation must stay within the predicted size.
        let mut seed = 0x9e3779b97f4a7c15u64;
        let mut next = move || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed
        };
        for _ in 0..200 {
            let a_digits = (next() % 30 + 1) as usize;
            let b_digits = (next() % 30 + 1) as usize;
            let a_str: String = (0..a_digits).map(|_| char::from(b'0' + (next() % 10) as u8)).collect();
            let b_str: String = (0..b_digits).map(|_| char::from(b'0' + (next() % 10) as u8)).collect();
            let a = FixedInt::parse(&a_str).unwrap();
            let b = FixedInt::parse(&b_str).unwrap();

            let sum = a.add(&b).unwrap();
            assert!(sum.len() <= add(a.len(), b.len()));

            let diff = a.sub(&b).unwrap();
            assert!(diff.len() <= sub(a.len(), b.len()));

            let neg = a.negated();
            assert!(neg.len() <= negate(a.len()));
        }
    }
}
