//! Reference counting on foreign `SkRefCntBase` objects
//!
//! Mirrors the inline `ref()`, `unref()`, `unique()` and `getRefCnt()` from
//! Skia's `SkRefCnt.h`, which are never emitted into the library binary.
//! Thread-safe atomic refcounting; no locks, no allocation.

use crate::abi::{RefCntLayout, VTable};
use crate::logging::{error, trace};
use core::ffi::c_void;
use core::ptr::NonNull;
use std::sync::atomic::{AtomicI32, Ordering};

/// Non-owning address of a live `SkRefCntBase` subclass instance
///
/// Design: A plain address with typed access to the two fields the bridge
/// knows about. Copying it does not touch the count and dropping it never
/// releases; ownership stays with whoever called `ref_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct RefCntPtr {
    ptr: NonNull<c_void>,
}

impl RefCntPtr {
    /// Wrap a foreign address, `None` for null
    #[inline]
    pub fn new(ptr: *mut c_void) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr })
    }

    /// Raw object address
    #[inline]
    pub fn as_ptr(self) -> *mut c_void {
        self.ptr.as_ptr()
    }

    /// The atomic counter at `RefCntLayout::HOST.refcnt_offset`
    ///
    /// # Safety
    /// The object must be alive and laid out as `SkRefCntBase`.
    #[inline(always)]
    pub unsafe fn ref_cnt<'a>(self) -> &'a AtomicI32 {
        let field = (self.ptr.as_ptr() as *const u8).add(RefCntLayout::HOST.refcnt_offset);
        &*(field as *const AtomicI32)
    }

    /// Add an owner (hot path, always inlined)
    ///
    /// Relaxed: a new owner can only come from an existing one, which already
    /// keeps the object alive.
    ///
    /// # Safety
    /// The object must be alive and laid out as `SkRefCntBase`.
    #[inline(always)]
    pub unsafe fn ref_(self) {
        let old = self.ref_cnt().fetch_add(1, Ordering::Relaxed);

        debug_assert!(old > 0, "ref on object with refcount {old}");
        debug_assert!(old < i32::MAX, "refcount overflow");
    }

    /// Drop an owner; the caller that takes the count from 1 to 0 disposes
    ///
    /// AcqRel: release publishes this owner's writes to the disposing
    /// thread, acquire makes every other owner's writes visible before
    /// teardown.
    ///
    /// # Safety
    /// The object must be alive and laid out as `SkRefCntBase`, and the caller
    /// must own one reference. The address is invalid after the last unref.
    #[inline(always)]
    pub unsafe fn unref(self) {
        let old = self.ref_cnt().fetch_sub(1, Ordering::AcqRel);

        if old == 1 {
            self.dispose();
        } else if old <= 0 {
            self.underflow(old);
        }
    }

    /// Current count (advisory, may be stale as soon as it returns)
    ///
    /// # Safety
    /// The object must be alive and laid out as `SkRefCntBase`.
    #[inline]
    pub unsafe fn count(self) -> i32 {
        self.ref_cnt().load(Ordering::Relaxed)
    }

    /// True when the caller holds the only reference
    ///
    /// Acquire pairs with the release in other owners' `unref`, so a caller
    /// that sees `true` may mutate the object.
    ///
    /// # Safety
    /// The object must be alive and laid out as `SkRefCntBase`.
    #[inline]
    pub unsafe fn unique(self) -> bool {
        self.ref_cnt().load(Ordering::Acquire) == 1
    }

    /// Invoke `internal_dispose` through the object's own dispatch table
    ///
    /// # Safety
    /// Must run at most once per object, after its count reached zero.
    #[cold]
    #[inline(never)]
    pub unsafe fn dispose(self) {
        let obj = self.ptr.as_ptr() as *const c_void;

        trace!(event = "refcnt_dispose", address = ?obj);

        let dispose = VTable::of(obj).dispose_fn(RefCntLayout::HOST);
        dispose(obj);
    }

    #[cold]
    #[inline(never)]
    fn underflow(self, old: i32) {
        error!(
            event = "refcnt_underflow",
            address = ?self.ptr.as_ptr(),
            previous = old,
            "unref on object that was already released"
        );
        debug_assert!(old > 0, "refcount underflow");
    }
}

// Only ever an address; the pointee's thread-safety is the counter's atomics.
unsafe impl Send for RefCntPtr {}
unsafe impl Sync for RefCntPtr {}
