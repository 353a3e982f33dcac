use crate::platform::LoadedLibrary;
use std::ffi::{c_void, CStr};

/// Untyped procedure address as returned by the loader (same shape as `FARPROC`).
pub type RawProc = unsafe extern "system" fn() -> isize;

/// Win32 `BOOL`.
pub type Bool = i32;

pub const ERROR_SUCCESS: u32 = 0;
/// Returned by every forwarding call whose real entry point is unavailable.
pub const ERROR_DEVICE_NOT_CONNECTED: u32 = 1167;

pub type GetStateFn = unsafe extern "system" fn(u32, *mut c_void) -> u32;
pub type SetStateFn = unsafe extern "system" fn(u32, *mut c_void) -> u32;
pub type GetCapabilitiesFn = unsafe extern "system" fn(u32, u32, *mut c_void) -> u32;
pub type EnableFn = unsafe extern "system" fn(Bool) -> u32;
pub type GetBatteryInformationFn = unsafe extern "system" fn(u32, u8, *mut c_void) -> u32;
pub type GetKeystrokeFn = unsafe extern "system" fn(u32, u32, *mut c_void) -> u32;

/// The closed set of exports the proxy impersonates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPoint {
    GetState,
    SetState,
    GetCapabilities,
    Enable,
    GetBatteryInformation,
    GetKeystroke,
}

impl EntryPoint {
    pub const COUNT: usize = 6;

    pub const ALL: [EntryPoint; Self::COUNT] = [
        EntryPoint::GetState,
        EntryPoint::SetState,
        EntryPoint::GetCapabilities,
        EntryPoint::Enable,
        EntryPoint::GetBatteryInformation,
        EntryPoint::GetKeystroke,
    ];

    /// Export name in the real library.
    pub fn symbol(self) -> &'static CStr {
        match self {
            EntryPoint::GetState => c"XInputGetState",
            EntryPoint::SetState => c"XInputSetState",
            EntryPoint::GetCapabilities => c"XInputGetCapabilities",
            EntryPoint::Enable => c"XInputEnable",
            EntryPoint::GetBatteryInformation => c"XInputGetBatteryInformation",
            EntryPoint::GetKeystroke => c"XInputGetKeystroke",
        }
    }

    pub fn name(self) -> &'static str {
        // Symbol literals are ASCII.
        self.symbol().to_str().unwrap_or("<invalid>")
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Resolved addresses of the real library's exports, keyed by [`EntryPoint`].
///
/// Filled once during initialization and only read afterwards, so the
/// forwarding methods take `&self` and need no synchronization.
#[derive(Clone, Copy, Default)]
pub struct EntryPointTable {
    procs: [Option<RawProc>; EntryPoint::COUNT],
}

impl EntryPointTable {
    /// Table with nothing bound; every forward reports "device not connected".
    pub const fn empty() -> Self {
        Self {
            procs: [None; EntryPoint::COUNT],
        }
    }

    /// Look up every entry point independently. A missing export leaves its
    /// slot empty and does not affect the others.
    pub fn resolve(library: &dyn LoadedLibrary) -> Self {
        let mut table = Self::empty();
        for ep in EntryPoint::ALL {
            table.procs[ep.index()] = library.symbol(ep.symbol());
        }
        table
    }

    pub fn get(&self, ep: EntryPoint) -> Option<RawProc> {
        self.procs[ep.index()]
    }

    pub fn is_resolved(&self, ep: EntryPoint) -> bool {
        self.get(ep).is_some()
    }

    pub fn resolved_count(&self) -> usize {
        self.procs.iter().filter(|p| p.is_some()).count()
    }

    /// Entry points the real library did not export.
    pub fn missing(&self) -> Vec<EntryPoint> {
        EntryPoint::ALL
            .into_iter()
            .filter(|ep| !self.is_resolved(*ep))
            .collect()
    }

    // Forwarding. Arguments and output buffers pass through untouched; the
    // caller's pointers carry the same validity contract as for the real
    // library.

    pub unsafe fn get_state(&self, user_index: u32, state: *mut c_void) -> u32 {
        match self.get(EntryPoint::GetState) {
            Some(raw) => {
                let f: GetStateFn = std::mem::transmute(raw);
                f(user_index, state)
            }
            None => ERROR_DEVICE_NOT_CONNECTED,
        }
    }

    pub unsafe fn set_state(&self, user_index: u32, vibration: *mut c_void) -> u32 {
        match self.get(EntryPoint::SetState) {
            Some(raw) => {
                let f: SetStateFn = std::mem::transmute(raw);
                f(user_index, vibration)
            }
            None => ERROR_DEVICE_NOT_CONNECTED,
        }
    }

    pub unsafe fn get_capabilities(
        &self,
        user_index: u32,
        flags: u32,
        capabilities: *mut c_void,
    ) -> u32 {
        match self.get(EntryPoint::GetCapabilities) {
            Some(raw) => {
                let f: GetCapabilitiesFn = std::mem::transmute(raw);
                f(user_index, flags, capabilities)
            }
            None => ERROR_DEVICE_NOT_CONNECTED,
        }
    }

    pub unsafe fn enable(&self, enable: Bool) -> u32 {
        match self.get(EntryPoint::Enable) {
            Some(raw) => {
                let f: EnableFn = std::mem::transmute(raw);
                f(enable)
            }
            None => ERROR_DEVICE_NOT_CONNECTED,
        }
    }

    pub unsafe fn get_battery_information(
        &self,
        user_index: u32,
        dev_type: u8,
        battery_information: *mut c_void,
    ) -> u32 {
        match self.get(EntryPoint::GetBatteryInformation) {
            Some(raw) => {
                let f: GetBatteryInformationFn = std::mem::transmute(raw);
                f(user_index, dev_type, battery_information)
            }
            None => ERROR_DEVICE_NOT_CONNECTED,
        }
    }

    pub unsafe fn get_keystroke(&self, user_index: u32, reserved: u32, keystroke: *mut c_void) -> u32 {
        match self.get(EntryPoint::GetKeystroke) {
            Some(raw) => {
                let f: GetKeystrokeFn = std::mem::transmute(raw);
                f(user_index, reserved, keystroke)
            }
            None => ERROR_DEVICE_NOT_CONNECTED,
        }
    }
}

impl std::fmt::Debug for EntryPointTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for ep in EntryPoint::ALL {
            map.entry(&ep.name(), &self.get(ep).map(|p| p as usize as *const c_void));
        }
        map.finish()
    }
}
