use crate::entry_point::RawProc;
use crate::error::{ProxyError, Result};
use crate::platform::{LoadedLibrary, SystemLibraries};
use ::windows::core::{PCSTR, PCWSTR};
use ::windows::Win32::Foundation::{FreeLibrary, ERROR_INSUFFICIENT_BUFFER, HMODULE, MAX_PATH};
use ::windows::Win32::System::Diagnostics::Debug::OutputDebugStringW;
use ::windows::Win32::System::LibraryLoader::{GetProcAddress, LoadLibraryW};
use ::windows::Win32::System::SystemInformation::GetSystemDirectoryW;
use ::windows::Win32::System::Threading::ExitProcess;
use std::ffi::{CStr, OsString};
use std::os::windows::ffi::{OsStrExt, OsStringExt};
use std::path::{Path, PathBuf};

/// Windows loader backend: `GetSystemDirectoryW` + `LoadLibraryW` + `GetProcAddress`.
pub struct WindowsLibraries;

impl SystemLibraries for WindowsLibraries {
    fn system_directory(&self) -> Result<PathBuf> {
        let mut buf = [0u16; MAX_PATH as usize];
        let len = unsafe { GetSystemDirectoryW(Some(&mut buf)) } as usize;
        directory_from_buffer(&buf, len)
    }

    fn load_library(&self, path: &Path) -> Result<Box<dyn LoadedLibrary>> {
        let wide: Vec<u16> = path
            .as_os_str()
            .encode_wide()
            .chain(std::iter::once(0))
            .collect();
        let module = unsafe { LoadLibraryW(PCWSTR(wide.as_ptr())) }.map_err(|e| {
            ProxyError::LibraryLoad {
                path: path.to_path_buf(),
                source: std::io::Error::from_raw_os_error(e.code().0 & 0xFFFF),
            }
        })?;
        Ok(Box::new(WindowsLibrary { module }))
    }
}

/// Interpret the return value of `GetSystemDirectoryW` for `buf`.
fn directory_from_buffer(buf: &[u16], len: usize) -> Result<PathBuf> {
    if len == 0 {
        return Err(ProxyError::SystemDirectory(std::io::Error::last_os_error()));
    }
    // On truncation the call succeeds and returns the required size instead.
    if len >= buf.len() {
        return Err(ProxyError::SystemDirectory(std::io::Error::from_raw_os_error(
            ERROR_INSUFFICIENT_BUFFER.0 as i32,
        )));
    }
    Ok(PathBuf::from(OsString::from_wide(&buf[..len])))
}

/// Owns one loader reference on a module; freed on drop.
struct WindowsLibrary {
    module: HMODULE,
}

// HMODULE is an address, valid from any thread until FreeLibrary.
unsafe impl Send for WindowsLibrary {}
unsafe impl Sync for WindowsLibrary {}

impl LoadedLibrary for WindowsLibrary {
    fn symbol(&self, name: &CStr) -> Option<RawProc> {
        unsafe { GetProcAddress(self.module, PCSTR(name.as_ptr() as *const u8)) }
    }
}

impl Drop for WindowsLibrary {
    fn drop(&mut self) {
        unsafe {
            let _ = FreeLibrary(self.module);
        }
    }
}

pub fn debug_output(message: &str) {
    let wide: Vec<u16> = message.encode_utf16().chain(std::iter::once(0)).collect();
    unsafe { OutputDebugStringW(PCWSTR(wide.as_ptr())) };
}

pub fn exit_process(code: u32) -> ! {
    unsafe { ExitProcess(code) }
}
