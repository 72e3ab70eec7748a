use std::error;
use std::fmt;
use std::result;

/// Errors returned by the order queries of an `AvlSet<T>`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Error {
    /// The set has no elements, so it has no minimum or maximum.
    EmptyTree,
}

impl error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::EmptyTree => write!(f, "the tree is empty"),
        }
    }
}

pub type Result<T> = result::Result<T, Error>;
