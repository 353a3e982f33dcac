use crate::entry_point::RawProc;
use crate::error::Result;
use std::ffi::CStr;
use std::path::{Path, PathBuf};

/// A library mapped into the process. Dropping it releases the module.
pub trait LoadedLibrary: Send + Sync {
    /// Address of an exported symbol, or `None` when the library lacks it.
    fn symbol(&self, name: &CStr) -> Option<RawProc>;
}

/// Locate and load libraries the way the OS loader does.
pub trait SystemLibraries: Send + Sync {
    /// The OS system directory (e.g. `C:\Windows\System32`).
    fn system_directory(&self) -> Result<PathBuf>;
    /// Load a library by full path.
    fn load_library(&self, path: &Path) -> Result<Box<dyn LoadedLibrary>>;
}

#[cfg(target_os = "windows")]
mod windows;
#[cfg(not(target_os = "windows"))]
mod unsupported;

#[cfg(target_os = "windows")]
pub use self::windows::{debug_output, exit_process, WindowsLibraries};
#[cfg(not(target_os = "windows"))]
pub use self::unsupported::{debug_output, exit_process, UnsupportedLibraries};

/// Create the platform-appropriate loader.
pub fn create_platform() -> Box<dyn SystemLibraries> {
    #[cfg(target_os = "windows")]
    {
        Box::new(WindowsLibraries)
    }
    #[cfg(not(target_os = "windows"))]
    {
        Box::new(UnsupportedLibraries)
    }
}
