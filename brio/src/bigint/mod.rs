//! Signed arbitrary-precision integers and the storage disciplines
//! behind them.
//!
//! A value is a little-endian sequence of limbs plus a sign flag, kept
//! normalized: no leading zero limb, and zero is always non-negative
//! with zero length. The arithmetic layer (magnitude primitives, signed
//! operations, decimal conversion) works on borrowed views and
//! caller-supplied destination buffers, so the same routines serve all
//! three storage disciplines:
//!
//! - [`FixedInt`] — one pre-sized buffer per value, used by the
//!   interpreter for short-lived expression results;
//! - [`GrowInt`] — an owned buffer that grows by doubling and never
//!   shrinks, used for program variables that live until teardown;
//! - [`TempArena`] — bump storage with mark/rewind bulk release, used
//!   for the temporaries of compiled expression evaluation.
//!
//! Destination sizes come from the [`sizing`] functions; every routine
//! still checks its buffer and reports [`NumError::CapacityExceeded`]
//! rather than writing out of bounds.

mod arena;
mod convert;
mod fixed;
mod grow;
mod magnitude;
mod ops;
pub mod sizing;

pub use arena::{ArenaScope, Mark, Temp, TempArena};
pub use fixed::FixedInt;
pub use grow::GrowInt;
pub use ops::Num;

use thiserror::Error;

/// One digit of a magnitude, least-significant first in storage.
#[cfg(not(feature = "limb32"))]
pub type Limb = u64;
#[cfg(feature = "limb32")]
pub type Limb = u32;

/// Carry/borrow intermediate; never exposed to callers.
#[cfg(not(feature = "limb32"))]
pub type DoubleLimb = u128;
#[cfg(feature = "limb32")]
pub type DoubleLimb = u64;

/// Bits per limb.
#[cfg(not(feature = "limb32"))]
pub const LIMB_BITS: u32 = 64;
#[cfg(feature = "limb32")]
pub const LIMB_BITS: u32 = 32;

/// Decimal digits that always suffice to render one limb (2^64 < 10^20,
/// 2^32 < 10^10).
#[cfg(not(feature = "limb32"))]
pub(crate) const DEC_DIGITS_PER_LIMB: usize = 20;
#[cfg(feature = "limb32")]
pub(crate) const DEC_DIGITS_PER_LIMB: usize = 10;

/// Decimal digits guaranteed to fit in one limb (10^19 < 2^64,
/// 10^9 < 2^32).
#[cfg(not(feature = "limb32"))]
pub(crate) const DEC_DIGITS_FIT_PER_LIMB: usize = 19;
#[cfg(feature = "limb32")]
pub(crate) const DEC_DIGITS_FIT_PER_LIMB: usize = 9;

/// Capacity of every interpreter value, in limbs (about 1,200 decimal
/// digits at the default 64-bit limb width). Results that need more
/// limbs than this are reported as [`NumError::CapacityExceeded`].
pub const FIXED_LIMBS: usize = 64;

/// Numeric-core error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NumError {
    /// Text that is not an optional sign followed by decimal digits
    #[error("malformed integer: {0:?}")]
    MalformedInteger(String),

    /// A result would not fit the destination buffer
    #[error("capacity exceeded: need {needed} limbs, destination holds {capacity}")]
    CapacityExceeded { needed: usize, capacity: usize },

    /// Storage growth failed; fatal
    #[error("allocation failure: could not reserve {limbs} limbs")]
    AllocationFailure { limbs: usize },
}

/// Result type for numeric-core operations
pub type NumResult<T> = Result<T, NumError>;
