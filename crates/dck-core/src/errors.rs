use std::time::Duration;

/// Core error type for devchat-keeper.
///
/// The adapter crate maps client-library errors into this type so the
/// reconciler can tell a server throttle apart from a generic communication
/// failure. "Dialog not found" and "user not in participant list" are valid
/// states, not errors; they never appear here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("telegram error: {0}")]
    Telegram(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("flood wait: server asked to retry after {retry_after:?}")]
    FloodWait { retry_after: Duration },
}

pub type Result<T> = std::result::Result<T, Error>;
