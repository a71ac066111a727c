//! C ABI runtime surface.
//!
//! Variables are heap-allocated [`GrowInt`]s behind raw pointers,
//! created once by the emitted `@main` and owned by their slot until
//! process teardown. Temporaries live in a thread-local [`TempArena`];
//! the handles passed across the boundary are `i64` indices into a
//! registry of [`Temp`]s. A mark is simply the registry length:
//! `brio_rewind` truncates the registry and the arena storage back to
//! it, so rewinding the same mark twice (iteration path, then break
//! path) is harmless.
//!
//! Errors follow the fatal-reporting contract of the toolchain: any
//! numeric failure is printed to stderr and the process exits with
//! code 1. Nothing is silently swallowed.

use crate::bigint::{GrowInt, Mark, NumError, NumResult, Temp, TempArena};
use std::cell::RefCell;
use std::ffi::CStr;
use std::os::raw::{c_char, c_int};

struct RtState {
    arena: TempArena,
    temps: Vec<Slot>,
}

struct Slot {
    temp: Temp,
    /// arena storage top right after this temp's allocation
    end: usize,
}

thread_local! {
    static STATE: RefCell<RtState> = RefCell::new(RtState {
        arena: TempArena::new(),
        temps: Vec::new(),
    });
}

fn fail(err: NumError) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1);
}

fn push(state: &mut RtState, result: NumResult<Temp>) -> i64 {
    let temp = result.unwrap_or_else(|e| fail(e));
    let end = state.arena.top();
    state.temps.push(Slot { temp, end });
    (state.temps.len() - 1) as i64
}

fn temp(state: &RtState, handle: i64) -> Temp {
    state.temps[handle as usize].temp
}

/// Allocate a zero-valued program variable.
#[unsafe(no_mangle)]
pub extern "C" fn brio_var_new() -> *mut GrowInt {
    Box::into_raw(Box::new(GrowInt::new()))
}

/// Allocate a program variable bound from `argv[index]`, or zero if the
/// argument is absent. Malformed text is fatal.
///
/// # Safety
///
/// `argv` must be the argument vector passed to the process entry
/// point, holding `argc` valid NUL-terminated strings.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn brio_var_arg(
    argc: c_int,
    argv: *const *const c_char,
    index: c_int,
) -> *mut GrowInt {
    let value = if index < argc {
        let arg = unsafe { CStr::from_ptr(*argv.add(index as usize)) };
        match arg.to_str() {
            Ok(text) => GrowInt::parse(text).unwrap_or_else(|e| fail(e)),
            Err(_) => fail(NumError::MalformedInteger("<non-utf8 argument>".into())),
        }
    } else {
        GrowInt::new()
    };
    Box::into_raw(Box::new(value))
}

/// Temporary holding a literal value.
#[unsafe(no_mangle)]
pub extern "C" fn brio_lit(value: i64) -> i64 {
    STATE.with_borrow_mut(|state| {
        let result = state.arena.lit(value);
        push(state, result)
    })
}

/// Temporary copied from a variable.
///
/// # Safety
///
/// `var` must point to a live variable from `brio_var_new`/`brio_var_arg`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn brio_load(var: *const GrowInt) -> i64 {
    let var = unsafe { &*var };
    STATE.with_borrow_mut(|state| {
        let result = state.arena.load(var.view());
        push(state, result)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn brio_add(a: i64, b: i64) -> i64 {
    STATE.with_borrow_mut(|state| {
        let (a, b) = (temp(state, a), temp(state, b));
        let result = state.arena.add(a, b);
        push(state, result)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn brio_sub(a: i64, b: i64) -> i64 {
    STATE.with_borrow_mut(|state| {
        let (a, b) = (temp(state, a), temp(state, b));
        let result = state.arena.sub(a, b);
        push(state, result)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn brio_neg(a: i64) -> i64 {
    STATE.with_borrow_mut(|state| {
        let a = temp(state, a);
        let result = state.arena.neg(a);
        push(state, result)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn brio_is_zero(handle: i64) -> c_int {
    STATE.with_borrow(|state| state.arena.is_zero(temp(state, handle)) as c_int)
}

/// Print the decimal rendering of a temporary, newline-terminated.
#[unsafe(no_mangle)]
pub extern "C" fn brio_print(handle: i64) {
    STATE.with_borrow(|state| {
        println!("{}", state.arena.render(temp(state, handle)));
    });
}

/// In-place `*var = value`.
///
/// # Safety
///
/// `var` must point to a live variable from `brio_var_new`/`brio_var_arg`.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn brio_set_int(var: *mut GrowInt, value: i64) {
    let var = unsafe { &mut *var };
    var.set_i64(value).unwrap_or_else(|e| fail(e));
}

/// In-place `*dst = *src`. A self-copy is a no-op.
///
/// # Safety
///
/// Both pointers must point to live variables.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn brio_copy(dst: *mut GrowInt, src: *const GrowInt) {
    if std::ptr::eq(dst, src) {
        return;
    }
    let dst = unsafe { &mut *dst };
    let src = unsafe { &*src };
    dst.assign(src.view()).unwrap_or_else(|e| fail(e));
}

/// In-place `*var = temp`.
///
/// # Safety
///
/// `var` must point to a live variable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn brio_store(var: *mut GrowInt, handle: i64) {
    let var = unsafe { &mut *var };
    STATE.with_borrow_mut(|state| {
        let view = state.arena.view(temp(state, handle));
        var.assign(view).unwrap_or_else(|e| fail(e));
    });
}

/// In-place `*var += temp`.
///
/// # Safety
///
/// `var` must point to a live variable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn brio_add_assign(var: *mut GrowInt, handle: i64) {
    let var = unsafe { &mut *var };
    STATE.with_borrow_mut(|state| {
        let view = state.arena.view(temp(state, handle));
        var.add_assign(view).unwrap_or_else(|e| fail(e));
    });
}

/// In-place `*var -= temp`.
///
/// # Safety
///
/// `var` must point to a live variable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn brio_sub_assign(var: *mut GrowInt, handle: i64) {
    let var = unsafe { &mut *var };
    STATE.with_borrow_mut(|state| {
        let view = state.arena.view(temp(state, handle));
        var.sub_assign(view).unwrap_or_else(|e| fail(e));
    });
}

/// In-place `*var = -*var`.
///
/// # Safety
///
/// `var` must point to a live variable.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn brio_negate(var: *mut GrowInt) {
    let var = unsafe { &mut *var };
    var.negate();
}

/// Current rewind point: the number of live temporaries.
#[unsafe(no_mangle)]
pub extern "C" fn brio_mark() -> i64 {
    STATE.with_borrow(|state| state.temps.len() as i64)
}

/// Release every temporary allocated since `mark`, in bulk.
#[unsafe(no_mangle)]
pub extern "C" fn brio_rewind(mark: i64) {
    STATE.with_borrow_mut(|state| {
        let keep = mark as usize;
        let top = if keep == 0 {
            0
        } else {
            state.temps[keep - 1].end
        };
        state.temps.truncate(keep);
        state.arena.rewind(Mark(top));
    });
}
