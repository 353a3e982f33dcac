use crate::error::{ProxyError, Result};
use crate::platform::{LoadedLibrary, SystemLibraries};
use std::path::{Path, PathBuf};

/// Stub for non-Windows hosts. There is no XInput to forward to, so
/// initialization fails at the first step.
pub struct UnsupportedLibraries;

impl SystemLibraries for UnsupportedLibraries {
    fn system_directory(&self) -> Result<PathBuf> {
        Err(ProxyError::PlatformNotSupported(std::env::consts::OS.into()))
    }

    fn load_library(&self, _path: &Path) -> Result<Box<dyn LoadedLibrary>> {
        Err(ProxyError::PlatformNotSupported(std::env::consts::OS.into()))
    }
}

/// No debugger channel here; stderr stands in for it.
pub fn debug_output(message: &str) {
    eprint!("{}", message);
}

pub fn exit_process(code: u32) -> ! {
    std::process::exit(code as i32)
}
