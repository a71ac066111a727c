//! Runtime for compiled programs
//!
//! Programs emitted by the LLVM IR backend link against this crate's
//! staticlib and drive the numeric core through the C ABI surface in
//! [`ffi`]. The Rust source backend needs none of this; its output uses
//! the library types directly.

pub mod ffi;
