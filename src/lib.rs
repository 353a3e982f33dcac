pub mod config;
pub mod entry_point;
pub mod error;
pub mod exports;
pub mod lifecycle;
pub mod logging;
pub mod platform;
pub mod proxy;
pub mod state;

pub use config::ProxyConfig;
pub use entry_point::{EntryPoint, EntryPointTable, ERROR_DEVICE_NOT_CONNECTED};
pub use error::{ProxyError, Result};
pub use lifecycle::{attach, detach};
pub use platform::{create_platform, LoadedLibrary, SystemLibraries};
pub use proxy::ProxyContext;

#[cfg(target_os = "windows")]
mod dll {
    use std::ffi::c_void;
    use windows::Win32::Foundation::{BOOL, HINSTANCE, HMODULE, TRUE};
    use windows::Win32::System::LibraryLoader::DisableThreadLibraryCalls;
    use windows::Win32::System::SystemServices::{DLL_PROCESS_ATTACH, DLL_PROCESS_DETACH};

    #[no_mangle]
    extern "system" fn DllMain(hinst: HINSTANCE, reason: u32, _reserved: *mut c_void) -> BOOL {
        match reason {
            DLL_PROCESS_ATTACH => {
                // Thread attach/detach notifications are not needed.
                unsafe {
                    let _ = DisableThreadLibraryCalls(HMODULE::from(hinst));
                }

                let platform = crate::platform::create_platform();
                if crate::lifecycle::attach(platform.as_ref(), &crate::ProxyConfig::default())
                    .is_err()
                {
                    crate::platform::exit_process(1);
                }
            }
            DLL_PROCESS_DETACH => crate::lifecycle::detach(),
            _ => {}
        }
        TRUE
    }
}
