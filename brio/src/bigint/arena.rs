//! Stack-discipline arena for compiled expression temporaries.

use super::{convert, magnitude, ops, sizing, Limb, Num, NumError, NumResult};

const DEFAULT_CAPACITY: usize = 4096;

/// Handle to a temporary carved from a [`TempArena`]: an offset into
/// the arena's storage plus the value metadata. Handles are plain data;
/// using one after its allocation was rewound is a caller bug.
#[derive(Debug, Clone, Copy)]
pub struct Temp {
    off: usize,
    len: usize,
    negative: bool,
}

/// Rewind point returned by [`TempArena::mark`].
#[derive(Debug, Clone, Copy)]
pub struct Mark(pub(crate) usize);

/// Bump storage for temporaries. Allocations stack up; [`mark`] and
/// [`rewind`] release everything allocated since the mark in one bulk
/// truncation, which bounds temporary storage inside a loop to the
/// high-water mark of a single iteration.
///
/// Every operation allocates its destination at the top of storage with
/// the exact size predicted by [`sizing`], then computes across a
/// `split_at_mut` at the destination offset — operands always live
/// strictly below it.
///
/// [`mark`]: TempArena::mark
/// [`rewind`]: TempArena::rewind
pub struct TempArena {
    storage: Vec<Limb>,
}

impl TempArena {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(limbs: usize) -> Self {
        Self {
            storage: Vec::with_capacity(limbs),
        }
    }

    /// Current allocation point.
    pub fn mark(&self) -> Mark {
        Mark(self.storage.len())
    }

    /// Bulk-release everything allocated since `mark`.
    pub fn rewind(&mut self, mark: Mark) {
        self.storage.truncate(mark.0);
    }

    /// Open an RAII scope that rewinds on drop.
    pub fn scope(&mut self) -> ArenaScope<'_> {
        let mark = self.mark();
        ArenaScope { arena: self, mark }
    }

    /// Limbs currently allocated; the end of the most recent allocation.
    pub(crate) fn top(&self) -> usize {
        self.storage.len()
    }

    fn alloc(&mut self, limbs: usize) -> NumResult<usize> {
        let off = self.storage.len();
        self.storage
            .try_reserve(limbs)
            .map_err(|_| NumError::AllocationFailure { limbs })?;
        self.storage.resize(off + limbs, 0);
        Ok(off)
    }

    /// Temporary holding a native value.
    pub fn lit(&mut self, value: i64) -> NumResult<Temp> {
        let off = self.alloc(sizing::limbs_for_i64())?;
        let len = magnitude::from_u64(&mut self.storage[off..], value.unsigned_abs());
        Ok(Temp {
            off,
            len,
            negative: len > 0 && value < 0,
        })
    }

    /// Temporary parsed from decimal text.
    pub fn parse(&mut self, text: &str) -> NumResult<Temp> {
        let off = self.alloc(sizing::limbs_for_decimal(text.len()).max(1))?;
        let (len, negative) = convert::parse_into(&mut self.storage[off..], text)?;
        Ok(Temp { off, len, negative })
    }

    /// Temporary copied from a value outside the arena.
    pub fn load(&mut self, src: Num<'_>) -> NumResult<Temp> {
        let off = self.alloc(src.len())?;
        self.storage[off..].copy_from_slice(src.limbs());
        Ok(Temp {
            off,
            len: src.len(),
            negative: src.is_negative(),
        })
    }

    pub fn add(&mut self, a: Temp, b: Temp) -> NumResult<Temp> {
        self.binary(a, b, false)
    }

    pub fn sub(&mut self, a: Temp, b: Temp) -> NumResult<Temp> {
        self.binary(a, b, true)
    }

    fn binary(&mut self, a: Temp, b: Temp, subtract: bool) -> NumResult<Temp> {
        let needed = sizing::add(a.len, b.len);
        let off = self.alloc(needed)?;
        debug_assert!(a.off + a.len <= off && b.off + b.len <= off);
        let (operands, dest) = self.storage.split_at_mut(off);
        let av = Num::new(&operands[a.off..a.off + a.len], a.negative);
        let bv = Num::new(&operands[b.off..b.off + b.len], b.negative);
        let (len, negative) = if subtract {
            ops::sub(dest, av, bv)?
        } else {
            ops::add(dest, av, bv)?
        };
        Ok(Temp { off, len, negative })
    }

    pub fn neg(&mut self, a: Temp) -> NumResult<Temp> {
        let off = self.alloc(sizing::negate(a.len))?;
        let (operands, dest) = self.storage.split_at_mut(off);
        let av = Num::new(&operands[a.off..a.off + a.len], a.negative);
        let (len, negative) = ops::negate(dest, av)?;
        Ok(Temp { off, len, negative })
    }

    pub fn view(&self, t: Temp) -> Num<'_> {
        Num::new(&self.storage[t.off..t.off + t.len], t.negative)
    }

    pub fn is_zero(&self, t: Temp) -> bool {
        t.len == 0
    }

    pub fn render(&self, t: Temp) -> String {
        convert::render(self.view(t).limbs(), t.negative)
    }
}

impl Default for TempArena {
    fn default() -> Self {
        Self::new()
    }
}

/// RAII view of a [`TempArena`] that rewinds to its opening mark when
/// dropped. Derefs to the arena, so all operations are available on the
/// scope; nested scopes reborrow through `DerefMut`.
pub struct ArenaScope<'a> {
    arena: &'a mut TempArena,
    mark: Mark,
}

impl std::ops::Deref for ArenaScope<'_> {
    type Target = TempArena;

    fn deref(&self) -> &TempArena {
        self.arena
    }
}

impl std::ops::DerefMut for ArenaScope<'_> {
    fn deref_mut(&mut self) -> &mut TempArena {
        self.arena
    }
}

impl Drop for ArenaScope<'_> {
    fn drop(&mut self) {
        self.arena.rewind(self.mark);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bigint::GrowInt;

    #[test]
    fn test_lit_and_render() {
        let mut arena = TempArena::new();
        let t = arena.lit(-42).unwrap();
        assert_eq!(arena.render(t), "-42");
        let z = arena.lit(0).unwrap();
        assert!(arena.is_zero(z));
        assert_eq!(arena.render(z), "0");
    }

    #[test]
    fn test_parse_and_arithmetic() {
        let mut arena = TempArena::new();
        let a = arena.parse("99999999999999999999").unwrap();
        let b = arena.lit(1).unwrap();
        let sum = arena.add(a, b).unwrap();
        assert_eq!(arena.render(sum), "100000000000000000000");
        let diff = arena.sub(sum, a).unwrap();
        assert_eq!(arena.render(diff), "1");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let mut arena = TempArena::new();
        assert!(matches!(
            arena.parse("12a3"),
            Err(NumError::MalformedInteger(_))
        ));
    }

    #[test]
    fn test_neg() {
        let mut arena = TempArena::new();
        let a = arena.lit(7).unwrap();
        let n = arena.neg(a).unwrap();
        assert_eq!(arena.render(n), "-7");
        let z = arena.lit(0).unwrap();
        let nz = arena.neg(z).unwrap();
        assert_eq!(arena.render(nz), "0");
    }

    #[test]
    fn test_load_copies_external_value() {
        let mut arena = TempArena::new();
        let var = GrowInt::parse("-123456789012345678901234567890").unwrap();
        let t = arena.load(var.view()).unwrap();
        assert_eq!(arena.render(t), "-123456789012345678901234567890");
    }

    #[test]
    fn test_mark_rewind_releases_in_bulk() {
        let mut arena = TempArena::new();
        let keep = arena.lit(5).unwrap();
        let mark = arena.mark();
        for i in 0..100 {
            arena.lit(i).unwrap();
        }
        assert!(arena.top() > 1);
        arena.rewind(mark);
        assert_eq!(arena.top(), sizing::limbs_for_i64());
        // the surviving temporary is untouched
        assert_eq!(arena.render(keep), "5");
    }

    #[test]
    fn test_rewind_bounds_loop_high_water() {
        let mut arena = TempArena::new();
        let mut high_water = 0;
        for _ in 0..1000 {
            let mark = arena.mark();
            let a = arena.lit(123).unwrap();
            let b = arena.lit(456).unwrap();
            arena.add(a, b).unwrap();
            high_water = high_water.max(arena.top());
            arena.rewind(mark);
        }
        // storage never exceeds one iteration's worth
        assert_eq!(high_water, 2 * sizing::limbs_for_i64() + sizing::add(1, 1));
        assert_eq!(arena.top(), 0);
    }

    #[test]
    fn test_scope_rewinds_on_drop() {
        let mut arena = TempArena::new();
        {
            let mut scope = arena.scope();
            let a = scope.lit(1).unwrap();
            let b = scope.lit(2).unwrap();
            let sum = scope.add(a, b).unwrap();
            assert_eq!(scope.render(sum), "3");
        }
        assert_eq!(arena.top(), 0);
    }

    #[test]
    fn test_nested_scopes() {
        let mut arena = TempArena::new();
        {
            let mut outer = arena.scope();
            outer.lit(1).unwrap();
            let outer_top = outer.top();
            {
                let mut inner = outer.scope();
                inner.lit(2).unwrap();
                inner.lit(3).unwrap();
            }
            assert_eq!(outer.top(), outer_top);
        }
        assert_eq!(arena.top(), 0);
    }

    #[test]
    fn test_operands_below_destination() {
        // A chain of dependent operations keeps reading results computed
        // lower in the arena.
        let mut arena = TempArena::new();
        let mut acc = arena.lit(1).unwrap();
        for _ in 0..10 {
            acc = arena.add(acc, acc).unwrap();
        }
        assert_eq!(arena.render(acc), "1024");
    }
}
