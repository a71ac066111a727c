//! Decimal parsing and rendering.
//!
//! Both directions are digit loops over the limb representation: parse
//! folds each decimal digit in with an in-place multiply-by-ten
//! (structurally the same carry propagation as addition), render peels
//! decimal digits off with repeated divide-by-ten over a scratch copy.

use super::{sizing, DoubleLimb, Limb, NumError, NumResult, LIMB_BITS};

/// Parse decimal text (optional `+`/`-` sign, then one or more digits)
/// into `out`. Returns the written length and sign; `-0` normalizes to
/// canonical zero.
pub fn parse_into(out: &mut [Limb], text: &str) -> NumResult<(usize, bool)> {
    let bytes = text.as_bytes();
    let (negative, digits) = match bytes.first() {
        Some(b'-') => (true, &bytes[1..]),
        Some(b'+') => (false, &bytes[1..]),
        _ => (false, bytes),
    };
    if digits.is_empty() {
        return Err(NumError::MalformedInteger(text.to_string()));
    }

    let mut len = 0usize;
    for &c in digits {
        if !c.is_ascii_digit() {
            return Err(NumError::MalformedInteger(text.to_string()));
        }
        let mut carry = (c - b'0') as Limb;
        for limb in out.iter_mut().take(len) {
            let product = *limb as DoubleLimb * 10 + carry as DoubleLimb;
            *limb = product as Limb;
            carry = (product >> LIMB_BITS) as Limb;
        }
        if carry != 0 {
            if len == out.len() {
                return Err(NumError::CapacityExceeded {
                    needed: len + 1,
                    capacity: out.len(),
                });
            }
            out[len] = carry;
            len += 1;
        }
    }

    Ok((len, len > 0 && negative))
}

/// Render a normalized magnitude as decimal text with an optional
/// leading minus. The digit buffer is pre-sized from the magnitude's
/// length via [`sizing::decimal_digits`]; zero renders as `"0"`.
pub fn render(limbs: &[Limb], negative: bool) -> String {
    if limbs.is_empty() {
        return "0".to_string();
    }

    let mut scratch = limbs.to_vec();
    let mut n = scratch.len();
    let mut digits: Vec<u8> = Vec::with_capacity(sizing::decimal_digits(limbs.len()));

    while n > 0 {
        let mut rem: DoubleLimb = 0;
        for i in (0..n).rev() {
            let cur = (rem << LIMB_BITS) | scratch[i] as DoubleLimb;
            scratch[i] = (cur / 10) as Limb;
            rem = cur % 10;
        }
        digits.push(b'0' + rem as u8);
        while n > 0 && scratch[n - 1] == 0 {
            n -= 1;
        }
    }

    let mut text = String::with_capacity(digits.len() + 1);
    if negative {
        text.push('-');
    }
    while let Some(d) = digits.pop() {
        text.push(d as char);
    }
    text
}
