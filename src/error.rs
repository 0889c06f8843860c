//! Provides [`Error`].

/// Alias for a `Result<T, tky2jgd::error::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents all possible errors that can occur by this crate.
#[derive(Debug)]
pub struct Error {
    err: Box<ErrorImpl>,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.err)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.err.as_ref() {
            ErrorImpl::Io { source } => Some(source),
            _ => None,
        }
    }
}

impl Error {
    /// Returns a error kind.
    pub fn kind(&self) -> &ErrorImpl {
        &self.err
    }
}

impl Error {
    #[cold]
    pub(crate) fn new_io(source: std::io::Error) -> Self {
        Self {
            err: Box::new(ErrorImpl::Io { source }),
        }
    }

    #[cold]
    pub(crate) fn new_out_of_range_meshcode(value: i32) -> Self {
        Self {
            err: Box::new(ErrorImpl::OutOfRangeMeshcode { value }),
        }
    }

    #[cold]
    pub(crate) fn new_out_of_range_secondary(value: u8) -> Self {
        Self {
            err: Box::new(ErrorImpl::OutOfRangeSecondary { value }),
        }
    }

    #[cold]
    pub(crate) fn new_out_of_range_tertiary(value: u8) -> Self {
        Self {
            err: Box::new(ErrorImpl::OutOfRangeTertiary { value }),
        }
    }
}

#[derive(Debug)]
pub enum ErrorImpl {
    /// The parameter file cannot be opened/read.
    Io {
        /// The underlying I/O error
        source: std::io::Error,
    },
    /// Invalid combined meshcode.
    OutOfRangeMeshcode {
        /// Invalid data
        value: i32,
    },
    /// Invalid packed secondary digits.
    OutOfRangeSecondary {
        /// Invalid data
        value: u8,
    },
    /// Invalid packed tertiary digits.
    OutOfRangeTertiary {
        /// Invalid data
        value: u8,
    },
}

impl std::fmt::Display for ErrorImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ErrorImpl::Io { source } => write!(f, "parameter file unreadable: {source}"),
            ErrorImpl::OutOfRangeMeshcode { value } => write!(f, "invalid meshcode: {value}"),
            ErrorImpl::OutOfRangeSecondary { value } => write!(
                f,
                "invalid secondary: each digit must satisfy 0 <= and <= 7, we got {value}"
            ),
            ErrorImpl::OutOfRangeTertiary { value } => write!(
                f,
                "invalid tertiary: must satisfy 0 <= and <= 99, we got {value}"
            ),
        }
    }
}
