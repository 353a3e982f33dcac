use crate::config::ProxyConfig;
use crate::entry_point::{EntryPoint, EntryPointTable};
use crate::error::{ProxyError, Result};
use crate::platform::{LoadedLibrary, SystemLibraries};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Longest path the loader accepts, including the terminating NUL.
pub const MAX_PATH: usize = 260;

/// Length in UTF-16 code units, the unit the wide loader APIs count in.
fn wide_len(s: &OsStr) -> usize {
    #[cfg(target_os = "windows")]
    {
        use std::os::windows::ffi::OsStrExt;
        s.encode_wide().count()
    }
    #[cfg(not(target_os = "windows"))]
    {
        s.to_string_lossy().encode_utf16().count()
    }
}

/// Join the system directory and the real library's file name, refusing
/// anything that would not fit in a `MAX_PATH` buffer.
pub fn build_library_path(system_dir: &Path, file_name: &str) -> Result<PathBuf> {
    let path = system_dir.join(file_name);
    if wide_len(path.as_os_str()) + 1 > MAX_PATH {
        return Err(ProxyError::PathTooLong(path));
    }
    Ok(path)
}

fn logged(e: ProxyError) -> ProxyError {
    log::error!("{}", e);
    e
}

/// Everything forwarding needs, produced by a successful initialization.
///
/// Owns the loaded real library; the entry-point table is only meaningful
/// while it is alive, so both live and die together.
pub struct ProxyContext {
    table: EntryPointTable,
    path: PathBuf,
    // Declared last so the table is gone before the module is freed.
    _library: Box<dyn LoadedLibrary>,
}

impl ProxyContext {
    /// Locate, load and bind the real library.
    ///
    /// Errors are logged before being returned. An individual entry point
    /// missing from the library is not an error.
    pub fn initialize(platform: &dyn SystemLibraries, config: &ProxyConfig) -> Result<Self> {
        let system_dir = platform.system_directory().map_err(logged)?;
        let path = build_library_path(&system_dir, &config.library_name).map_err(logged)?;
        let library = platform.load_library(&path).map_err(logged)?;

        let table = EntryPointTable::resolve(library.as_ref());
        for ep in table.missing() {
            log::warn!("{} not exported by {}", ep.name(), path.display());
        }

        log::info!(
            "XInput proxy initialized successfully ({} of {} entry points from {}).",
            table.resolved_count(),
            EntryPoint::COUNT,
            path.display()
        );

        Ok(Self {
            table,
            path,
            _library: library,
        })
    }

    pub fn entry_points(&self) -> &EntryPointTable {
        &self.table
    }

    /// Path the real library was loaded from.
    pub fn library_path(&self) -> &Path {
        &self.path
    }
}
