use crate::entry_point::{EntryPointTable, ERROR_DEVICE_NOT_CONNECTED};
use crate::proxy::ProxyContext;
use std::ptr;
use std::sync::atomic::{AtomicPtr, Ordering};

/// The one initialized proxy for this process, if any.
///
/// Written on attach and detach only; the exported entry points read it
/// without locking.
static CONTEXT: AtomicPtr<ProxyContext> = AtomicPtr::new(ptr::null_mut());

/// Publish a freshly initialized context. If one is already installed it is
/// kept and `ctx` is dropped instead, since exports may be reading the live
/// one. Returns whether `ctx` was installed.
pub fn install(ctx: ProxyContext) -> bool {
    let new = Box::into_raw(Box::new(ctx));
    match CONTEXT.compare_exchange(ptr::null_mut(), new, Ordering::AcqRel, Ordering::Acquire) {
        Ok(_) => true,
        Err(_) => {
            drop(unsafe { Box::from_raw(new) });
            false
        }
    }
}

/// Take the context down, freeing the real library. Returns whether one was installed.
pub fn release() -> bool {
    let old = CONTEXT.swap(ptr::null_mut(), Ordering::AcqRel);
    if old.is_null() {
        return false;
    }
    drop(unsafe { Box::from_raw(old) });
    true
}

pub fn is_ready() -> bool {
    !CONTEXT.load(Ordering::Acquire).is_null()
}

/// Run a forwarding call against the installed table. Without a context the
/// call is answered with "device not connected".
pub fn forward(f: impl FnOnce(&EntryPointTable) -> u32) -> u32 {
    // SAFETY: the pointer comes from `Box::into_raw` and is only freed on
    // detach, after the host has stopped calling in.
    match unsafe { CONTEXT.load(Ordering::Acquire).as_ref() } {
        Some(ctx) => f(ctx.entry_points()),
        None => ERROR_DEVICE_NOT_CONNECTED,
    }
}

/// Serializes tests that touch the process-wide context or logger.
#[cfg(test)]
pub(crate) static GLOBAL_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
