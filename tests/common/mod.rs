//! Shared fixture: heap objects laid out like `SkRefCntBase` whose dispose
//! slot frees them and reports to a probe that outlives them.

#![allow(dead_code)]

use core::ffi::c_void;
use parking_lot::Mutex;
use skref_bridge::{DisposeFn, RefCntLayout};
use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicI32, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};

/// What the dispose slot saw
#[derive(Default)]
pub struct DisposeProbe {
    calls: AtomicUsize,
    address: AtomicUsize,
    thread: Mutex<Option<ThreadId>>,
    payload_sum: AtomicU64,
}

impl DisposeProbe {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn address(&self) -> usize {
        self.address.load(Ordering::SeqCst)
    }

    pub fn thread(&self) -> Option<ThreadId> {
        *self.thread.lock()
    }

    /// Sum of all payload slots as read by the disposing thread
    pub fn payload_sum(&self) -> u64 {
        self.payload_sum.load(Ordering::SeqCst)
    }
}

/// `vptr` and `ref_cnt` must stay first; the bridge only knows those two.
#[repr(C)]
pub struct FakeRefCnt {
    vptr: *const DisposeFn,
    ref_cnt: AtomicI32,
    probe: Arc<DisposeProbe>,
    /// Written with plain stores by owners before they unref
    payload: Box<[UnsafeCell<u64>]>,
}

unsafe extern "C" fn dispose_and_free(obj: *const c_void) {
    let this = Box::from_raw(obj as *mut FakeRefCnt);
    let sum: u64 = this.payload.iter().map(|slot| *slot.get()).sum();

    let probe = &this.probe;
    probe.address.store(obj as usize, Ordering::SeqCst);
    *probe.thread.lock() = Some(thread::current().id());
    probe.payload_sum.store(sum, Ordering::SeqCst);
    probe.calls.fetch_add(1, Ordering::SeqCst);
}

unsafe extern "C" fn destructor_slot(_: *const c_void) {
    // The bridge must never call the C++ destructors directly
    std::process::abort();
}

static VTABLE: [DisposeFn; 3] = {
    let mut table = [destructor_slot as DisposeFn; 3];
    table[RefCntLayout::HOST.dispose_slot] = dispose_and_free;
    table
};

impl FakeRefCnt {
    /// A fresh object with one owner (the caller) and `slots` payload cells
    pub fn create(slots: usize) -> (*mut c_void, Arc<DisposeProbe>) {
        let probe = Arc::new(DisposeProbe::default());
        let obj = Box::new(FakeRefCnt {
            vptr: VTABLE.as_ptr(),
            ref_cnt: AtomicI32::new(1),
            probe: Arc::clone(&probe),
            payload: (0..slots).map(|_| UnsafeCell::new(0)).collect(),
        });
        (Box::into_raw(obj) as *mut c_void, probe)
    }

    /// Plain (non-atomic) write into the payload of a live object
    ///
    /// # Safety
    /// Object must be alive and no other thread may touch `slot` concurrently.
    pub unsafe fn write_payload(obj: *mut c_void, slot: usize, value: u64) {
        let this = &*(obj as *const FakeRefCnt);
        *this.payload[slot].get() = value;
    }
}

/// Raw address that may cross threads
#[derive(Clone, Copy)]
pub struct SendPtr(pub *mut c_void);

unsafe impl Send for SendPtr {}
unsafe impl Sync for SendPtr {}
