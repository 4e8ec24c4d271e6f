use std::fmt::Display;

#[derive(Debug)]
pub enum Error {
    UnsupportedInteraction(String),
    HyperError(hyper::Error),
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::UnsupportedInteraction(kind) => {
                write!(f, "Matching a {} is not implemented", kind)
            }
            Error::HyperError(e) => write!(f, "Hyper error: {}", e),
        }
    }
}

impl From<hyper::Error> for Error {
    fn from(e: hyper::Error) -> Self {
        Error::HyperError(e)
    }
}
