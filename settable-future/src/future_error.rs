use super::*;

use std::io;

/// Failure of a consumer waiting on a [`SettableFuture`]
#[derive(ThisError, Debug, Clone, Copy, Eq, PartialEq)]
pub enum FutureError {
    #[error("Timeout")]
    Timeout,
    #[error("Interrupted")]
    Interrupted,
    #[error("Cancelled")]
    Cancelled,
}

impl FutureError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted)
    }
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    pub fn to_io(self) -> io::Error {
        let kind = match self {
            Self::Timeout => io::ErrorKind::TimedOut,
            Self::Interrupted => io::ErrorKind::Interrupted,
            Self::Cancelled => io::ErrorKind::Other,
        };
        io::Error::new(kind, self)
    }
}

impl From<FutureError> for io::Error {
    fn from(e: FutureError) -> Self {
        e.to_io()
    }
}

/// Rejected call to [`SettableFuture::set`]
/// The value that could not be stored is handed back to the producer
#[derive(ThisError, Clone, Eq, PartialEq)]
pub enum SetError<T> {
    #[error("Value already set")]
    AlreadySet(T),
    #[error("Future was cancelled")]
    Cancelled(T),
}

impl<T> SetError<T> {
    pub fn into_inner(self) -> T {
        match self {
            Self::AlreadySet(v) | Self::Cancelled(v) => v,
        }
    }

    pub fn is_already_set(&self) -> bool {
        matches!(self, Self::AlreadySet(_))
    }
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }
}

// Does not require T: Debug
impl<T> fmt::Debug for SetError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadySet(_) => f.write_str("AlreadySet(..)"),
            Self::Cancelled(_) => f.write_str("Cancelled(..)"),
        }
    }
}
