use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Failed to get system directory: {0}")]
    SystemDirectory(std::io::Error),

    #[error("Failed to build XInput DLL path: {} exceeds MAX_PATH", .0.display())]
    PathTooLong(PathBuf),

    #[error("Failed to load {}: {source}", path.display())]
    LibraryLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Platform not supported: {0}")]
    PlatformNotSupported(String),
}

pub type Result<T> = std::result::Result<T, ProxyError>;
