use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The requested key is not stored in the tree.
    #[error("key not found")]
    KeyNotFound,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
