use thiserror::Error;

/// The errors that can happen while setting up or driving a hash.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A parameter was out of range, or an input couldn't be interpreted as bytes.
    #[error("invalid parameter: {0}")]
    InvalidParameter(Parameter),
    /// The context was already finalized.
    #[error("the hash context has already been finalized")]
    InvalidState,
}

/// The parameter that caused an [`Error::InvalidParameter`], with the offending value.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Parameter {
    #[error("bad hash length {0}, expected 1 to 64")]
    HashLength(usize),
    #[error("bad key length {0}, expected 1 to 64")]
    KeyLength(usize),
    #[error("unsupported input: {0}")]
    Input(&'static str),
}

impl From<Parameter> for Error {
    fn from(p: Parameter) -> Self {
        Error::InvalidParameter(p)
    }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        std::io::Error::new(std::io::ErrorKind::Other, e)
    }
}
