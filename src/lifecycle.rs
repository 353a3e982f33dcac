use crate::config::ProxyConfig;
use crate::error::Result;
use crate::logging;
use crate::platform::SystemLibraries;
use crate::proxy::ProxyContext;
use crate::state;

/// Process-attach work: bring up logging, bind the real library and publish
/// the context for the exports.
///
/// An error means the proxy is unusable. The caller is expected to end the
/// process rather than let the host run without input.
pub fn attach(platform: &dyn SystemLibraries, config: &ProxyConfig) -> Result<()> {
    let sink = logging::init(config);
    log::info!("Attached to process.");

    match ProxyContext::initialize(platform, config) {
        Ok(ctx) => {
            if !state::install(ctx) {
                log::warn!("Proxy already initialized; keeping the existing context.");
            }
            sink.close();
            Ok(())
        }
        Err(e) => {
            log::error!("Proxy initialization failed, exiting process...");
            sink.close();
            Err(e)
        }
    }
}

/// Process-detach work: free the real library and close the log.
pub fn detach() {
    state::release();
    logging::close();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry_point::{EntryPoint, ERROR_DEVICE_NOT_CONNECTED, ERROR_SUCCESS};
    use crate::error::ProxyError;
    use crate::exports::XInputGetKeystroke;
    use crate::logging::tests::scratch_log;
    use crate::proxy::tests::FakeSystem;
    use std::ffi::c_void;

    fn config_logging_to(path: &std::path::Path) -> ProxyConfig {
        ProxyConfig {
            log_path: path.to_path_buf(),
            ..ProxyConfig::default()
        }
    }

    #[test]
    fn attach_with_real_library_present() {
        let _guard = state::GLOBAL_TEST_LOCK
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        state::release();
        let log_path = scratch_log();
        let config = config_logging_to(&log_path);

        attach(&FakeSystem::windows(), &config).unwrap();
        assert!(state::is_ready());
        assert_eq!(logging::sink().unwrap().path(), log_path);

        let mut out = 0u32;
        let status = unsafe { XInputGetKeystroke(2, 3, &mut out as *mut u32 as *mut c_void) };
        assert_eq!(status, 4306);
        assert_eq!(out, 5);

        detach();
        assert!(!state::is_ready());

        // Filtering is driven by RUST_LOG; only check content when info passes.
        if log::log_enabled!(log::Level::Info) {
            let contents = std::fs::read_to_string(&log_path).unwrap();
            assert!(contents.contains("Attached to process."));
            assert!(contents.contains("initialized successfully"));
        }
        let _ = std::fs::remove_file(&log_path);
    }

    #[test]
    fn attach_without_real_library_never_becomes_ready() {
        let _guard = state::GLOBAL_TEST_LOCK
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        state::release();
        let log_path = scratch_log();
        let config = config_logging_to(&log_path);
        let system = FakeSystem {
            present: false,
            ..FakeSystem::windows()
        };

        let err = attach(&system, &config).unwrap_err();
        assert!(matches!(err, ProxyError::LibraryLoad { .. }));
        assert!(!state::is_ready());
        assert_eq!(
            unsafe { crate::exports::XInputEnable(1) },
            ERROR_DEVICE_NOT_CONNECTED
        );

        if log::log_enabled!(log::Level::Error) {
            let contents = std::fs::read_to_string(&log_path).unwrap();
            assert!(contents.contains("Failed to load"));
            assert!(contents.contains("Proxy initialization failed"));
        }
        let _ = std::fs::remove_file(&log_path);
    }

    #[test]
    fn repeated_attach_cycles_append_to_the_log() {
        let _guard = state::GLOBAL_TEST_LOCK
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        state::release();
        let log_path = scratch_log();
        let config = config_logging_to(&log_path);
        let system = FakeSystem {
            exports: vec![EntryPoint::GetState],
            ..FakeSystem::windows()
        };

        for _ in 0..2 {
            attach(&system, &config).unwrap();
            let mut out = 0u32;
            assert_eq!(
                unsafe { crate::exports::XInputGetState(0, &mut out as *mut u32 as *mut c_void) },
                ERROR_SUCCESS
            );
            detach();
        }

        if log::log_enabled!(log::Level::Info) {
            let contents = std::fs::read_to_string(&log_path).unwrap();
            assert_eq!(contents.matches("Attached to process.").count(), 2);
            // Other tests may initialize contexts while this logger is active.
            assert!(contents.matches("initialized successfully").count() >= 2);
        }
        let _ = std::fs::remove_file(&log_path);
    }
}
