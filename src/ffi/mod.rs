//! C FFI - Stable ABI for foreign callers
//!
//! Design: Flat `extern "C"` functions, no state, no allocation:
//! 1. Reference counting (ref, unref, get_count, unique)
//! 2. Optional diagnostics setup (init)
//!
//! Symbols match `include/skref_bridge.h`.

mod refcount;


pub use refcount::{sk_ref_cnt_get_count, sk_ref_cnt_ref, sk_ref_cnt_unique, sk_ref_cnt_unref};

use crate::abi::RefCntLayout;
use crate::logging::{self, debug};

/// Install the bridge's tracing subscriber from `SKREF_LOG_*` variables
///
/// Optional and idempotent; the refcount functions never require it.
#[no_mangle]
pub extern "C" fn skref_bridge_init() {
    logging::init();
    debug!(
        abi = ?RefCntLayout::HOST.abi,
        refcnt_offset = RefCntLayout::HOST.refcnt_offset,
        dispose_slot = RefCntLayout::HOST.dispose_slot,
        "skref bridge ready"
    );
}
