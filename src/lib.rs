//! skref-bridge - C ABI for Skia's header-only reference counting
//!
//! `SkRefCntBase::ref()` and `unref()` exist only as inline header code, so a
//! non-C++ caller holding an `sk_sp<T>` has no symbol to call. This crate
//! supplies them by operating on the compiled object layout directly: an
//! atomic `int32_t` right after the vptr, and `internal_dispose` reached
//! through the vtable when the last owner lets go.
//!
//! The exported functions are declared in `include/skref_bridge.h`.

pub mod abi;
pub mod ffi;
pub mod logging;
pub mod refcnt;

// Re-export core types
pub use abi::{CxxAbi, DisposeFn, RefCntLayout, VTable};
pub use ffi::{
    sk_ref_cnt_get_count, sk_ref_cnt_ref, sk_ref_cnt_unique, sk_ref_cnt_unref, skref_bridge_init,
};
pub use refcnt::RefCntPtr;
