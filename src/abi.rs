//! ABI layout of `SkRefCntBase` - where the counter and dispose slot live
//!
//! Design: The bridge cannot see Skia's class definitions, so every position
//! it relies on is recorded here, once, keyed by the C++ ABI family:
//! - Itanium (GCC, Clang on Unix, MinGW)
//! - MSVC (cl.exe, clang-cl)
//!
//! Porting to another ABI means adding a row here, nothing else.

use core::ffi::c_void;
use core::mem::size_of;

/// `SkRefCntBase::internal_dispose() const` as seen through the dispatch table.
///
/// On 64-bit targets a member function taking only `this` uses the same
/// registers as a C function taking one pointer.
pub type DisposeFn = unsafe extern "C" fn(*const c_void);

/// C++ ABI family a layout was derived for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CxxAbi {
    /// Itanium C++ ABI: two destructor slots (complete, deleting)
    Itanium,
    /// MSVC C++ ABI: one scalar deleting destructor slot
    Msvc,
}

impl CxxAbi {
    /// ABI family the host compiler toolchain uses
    #[inline]
    pub const fn host() -> Self {
        #[cfg(target_env = "msvc")]
        return Self::Msvc;

        #[cfg(not(target_env = "msvc"))]
        return Self::Itanium;
    }

    /// Number of vtable slots the virtual destructor occupies
    #[inline]
    pub const fn destructor_slots(self) -> usize {
        match self {
            Self::Itanium => 2,
            Self::Msvc => 1,
        }
    }
}

/// Byte offset of `fRefCnt` and vtable index of `internal_dispose`
///
/// `SkRefCntBase` declares, in order: a virtual destructor, the virtual
/// `internal_dispose`, then `mutable std::atomic<int32_t> fRefCnt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefCntLayout {
    pub abi: CxxAbi,
    /// Offset of the 4-byte signed counter from the object address
    pub refcnt_offset: usize,
    /// Index of `internal_dispose` in the dispatch table
    pub dispose_slot: usize,
}

impl RefCntLayout {
    pub const ITANIUM_64: Self = Self::derive(CxxAbi::Itanium, 8);
    pub const MSVC_64: Self = Self::derive(CxxAbi::Msvc, 8);

    /// Layout the bridge was compiled for
    #[cfg(target_pointer_width = "64")]
    pub const HOST: Self = match CxxAbi::host() {
        CxxAbi::Itanium => Self::ITANIUM_64,
        CxxAbi::Msvc => Self::MSVC_64,
    };

    /// The vptr fills the first word; the counter follows with 4-byte alignment.
    const fn derive(abi: CxxAbi, pointer_width: usize) -> Self {
        Self {
            abi,
            refcnt_offset: pointer_width,
            dispose_slot: abi.destructor_slots(),
        }
    }
}

#[cfg(not(target_pointer_width = "64"))]
compile_error!(
    "skref-bridge only knows the 64-bit SkRefCntBase layout; \
     derive the counter offset and dispose slot for this target in abi.rs"
);

const _: () = {
    let host = RefCntLayout::HOST;
    assert!(host.refcnt_offset >= size_of::<*const c_void>());
    assert!(host.refcnt_offset % 4 == 0);
    assert!(host.dispose_slot == host.abi.destructor_slots());
};

/// Dispatch table of a polymorphic object, read-only
///
/// Never constructed by the bridge; only reached through an object's vptr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VTable(*const *const c_void);

impl VTable {
    /// Read the vptr stored at offset 0 of `obj`
    ///
    /// # Safety
    /// `obj` must point to a live polymorphic object.
    #[inline]
    pub unsafe fn of(obj: *const c_void) -> Self {
        Self(*(obj as *const *const *const c_void))
    }

    /// Function address stored in `index`
    ///
    /// # Safety
    /// The table must have more than `index` entries.
    #[inline]
    pub unsafe fn slot(self, index: usize) -> *const c_void {
        *self.0.add(index)
    }

    /// Resolve `internal_dispose` under `layout`
    ///
    /// # Safety
    /// The table must belong to an `SkRefCntBase` subclass built for `layout`.
    #[inline]
    pub unsafe fn dispose_fn(self, layout: RefCntLayout) -> DisposeFn {
        core::mem::transmute::<*const c_void, DisposeFn>(self.slot(layout.dispose_slot))
    }
}
