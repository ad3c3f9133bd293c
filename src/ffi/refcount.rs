//! Reference counting - C API for `SkRefCntBase` objects
//!
//! Each export is a null check plus a call into `RefCntPtr`, whose atomic
//! operations are inlined into it. Every entry point accepts null.

use crate::refcnt::RefCntPtr;
use core::ffi::c_void;

/// Increment reference count (`SkRefCntBase::ref()`)
///
/// # Safety
/// - Null-safe (no-op for null pointers)
/// - Otherwise `ptr` must be a live `SkRefCntBase` subclass instance
#[no_mangle]
pub unsafe extern "C" fn sk_ref_cnt_ref(ptr: *mut c_void) {
    if let Some(rc) = RefCntPtr::new(ptr) {
        rc.ref_();
    }
}

/// Decrement reference count, dispose through the vtable if it reaches zero
/// (`SkRefCntBase::unref()`)
///
/// # Safety
/// - Null-safe (no-op for null pointers)
/// - Otherwise `ptr` must be a live `SkRefCntBase` subclass instance owned
///   by the caller; after the last unref it must not be passed again
#[no_mangle]
pub unsafe extern "C" fn sk_ref_cnt_unref(ptr: *mut c_void) {
    if let Some(rc) = RefCntPtr::new(ptr) {
        rc.unref();
    }
}

/// Get current reference count (for debugging)
///
/// # Safety
/// - Returns -1 for null pointers
/// - Otherwise `ptr` must be a live `SkRefCntBase` subclass instance
#[no_mangle]
pub unsafe extern "C" fn sk_ref_cnt_get_count(ptr: *mut c_void) -> i32 {
    match RefCntPtr::new(ptr) {
        Some(rc) => rc.count(),
        None => -1,
    }
}

/// True if the caller holds the only reference (`SkRefCntBase::unique()`)
///
/// # Safety
/// - Returns false for null pointers
/// - Otherwise `ptr` must be a live `SkRefCntBase` subclass instance
#[no_mangle]
pub unsafe extern "C" fn sk_ref_cnt_unique(ptr: *mut c_void) -> bool {
    RefCntPtr::new(ptr).is_some_and(|rc| rc.unique())
}
