use std::borrow::Cow;
use std::fmt::{self, Display, Formatter};
use std::ops::Deref;

pub type ParagenResult<T> = Result<T, ParagenError>;

/// Broad classification of a [ParagenError]. Configuration and population
/// errors are always fatal for the run that raised them; evaluation, broker
/// and thread-pool errors are recoverable through the population repair path.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidConfig,
    InvalidParameter,
    Population,
    Evaluation,
    ThreadPool,
    Broker,
    Protocol,
    Io,
    Serde,
    Multiple,
    Context,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrString(Cow<'static, str>);

impl AsRef<str> for ErrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ErrString {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<T: Into<Cow<'static, str>>> From<T> for ErrString {
    fn from(v: T) -> Self {
        Self(v.into())
    }
}

#[derive(Debug)]
pub enum ParagenError {
    InvalidConfig {
        message: ErrString,
    },
    InvalidParameter {
        message: ErrString,
    },
    /// A population invariant was violated, e.g. a dirty individual was
    /// observed at a point that requires clean fitness values.
    Population {
        message: ErrString,
    },
    Evaluation {
        message: ErrString,
    },
    ThreadPool {
        message: ErrString,
    },
    Broker {
        message: ErrString,
    },
    Protocol {
        message: ErrString,
    },
    Io {
        source: std::io::Error,
    },
    Serde {
        message: ErrString,
    },

    Multiple(MultiDisplay),

    Context {
        context: ErrorContext,
        source: Box<ParagenError>,
    },
}

impl ParagenError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidConfig { .. } => ErrorCode::InvalidConfig,
            Self::InvalidParameter { .. } => ErrorCode::InvalidParameter,
            Self::Population { .. } => ErrorCode::Population,
            Self::Evaluation { .. } => ErrorCode::Evaluation,
            Self::ThreadPool { .. } => ErrorCode::ThreadPool,
            Self::Broker { .. } => ErrorCode::Broker,
            Self::Protocol { .. } => ErrorCode::Protocol,
            Self::Io { .. } => ErrorCode::Io,
            Self::Serde { .. } => ErrorCode::Serde,
            Self::Multiple(_) => ErrorCode::Multiple,
            Self::Context { .. } => ErrorCode::Context,
        }
    }

    /// The innermost code, looking through any [ParagenError::Context] layers.
    pub fn root_code(&self) -> ErrorCode {
        match self {
            Self::Context { source, .. } => source.root_code(),
            _ => self.code(),
        }
    }

    pub fn with_context(self, msg: impl Into<String>) -> Self {
        ParagenError::Context {
            context: ErrorContext::new(msg),
            source: Box::new(self),
        }
    }

    /// Folds a list of errors into a single error, unwrapping the common
    /// zero- and one-element cases.
    pub fn aggregate(mut errors: Vec<ParagenError>) -> Option<ParagenError> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(ParagenError::Multiple(errors.into())),
        }
    }
}

impl Display for ParagenError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { message } => write!(f, "Invalid configuration: {}", message),
            Self::InvalidParameter { message } => write!(f, "Invalid parameter: {}", message),
            Self::Population { message } => write!(f, "Population error: {}", message),
            Self::Evaluation { message } => write!(f, "Evaluation error: {}", message),
            Self::ThreadPool { message } => write!(f, "Thread pool error: {}", message),
            Self::Broker { message } => write!(f, "Broker error: {}", message),
            Self::Protocol { message } => write!(f, "Protocol error: {}", message),
            Self::Io { source } => write!(f, "Io error: {}", source),
            Self::Serde { message } => write!(f, "Serialization error: {}", message),
            Self::Multiple(m) => write!(f, "Multiple errors:\n{}", m),
            Self::Context {
                context, source, ..
            } => write!(f, "{}\nCaused by: {}", context, source),
        }
    }
}

impl std::error::Error for ParagenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source } => Some(source),
            Self::Context { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ParagenError {
    fn from(source: std::io::Error) -> Self {
        ParagenError::Io { source }
    }
}

#[derive(Debug)]
pub struct ErrorContext {
    message: String,
}

impl ErrorContext {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl Display for ErrorContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ErrorContext {}

#[derive(Debug)]
pub struct MultiDisplay(Vec<ParagenError>);

impl MultiDisplay {
    pub fn errors(&self) -> &[ParagenError] {
        &self.0
    }
}

impl Display for MultiDisplay {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[{}] {} (code: {:?})", i, e, e.code())?;
        }
        Ok(())
    }
}

impl From<Vec<ParagenError>> for MultiDisplay {
    fn from(v: Vec<ParagenError>) -> Self {
        Self(v)
    }
}

// Ergonomic Result extensions (context)
pub trait ResultExt<T> {
    fn context(self, msg: impl Into<String>) -> ParagenResult<T>;
    fn with_context<F: FnOnce() -> String>(self, f: F) -> ParagenResult<T>;
}

impl<T, E: Into<ParagenError>> ResultExt<T> for Result<T, E> {
    fn context(self, msg: impl Into<String>) -> ParagenResult<T> {
        self.map_err(|e| e.into().with_context(msg))
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> ParagenResult<T> {
        self.map_err(|e| e.into().with_context(f()))
    }
}

// Macros: err, bail, ensure
#[doc(hidden)]
pub mod __private {
    #[inline]
    #[cold]
    #[must_use]
    pub fn must_use<E>(e: E) -> E {
        e
    }
}

#[macro_export]
macro_rules! paragen_err {
    (Io: $source:expr) => {
        $crate::__private::must_use($crate::ParagenError::Io { source: $source })
    };
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__private::must_use($crate::ParagenError::$variant { message: format!($fmt, $($arg),*).into() })
    };
    ($variant:ident: $msg:expr $(,)?) => {
        $crate::__private::must_use($crate::ParagenError::$variant { message: $msg.into() })
    };
}

#[macro_export]
macro_rules! paragen_bail {
    ($($tt:tt)+) => { return Err($crate::paragen_err!($($tt)+)) };
}

#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($tt:tt)+) => {
        if !$cond { $crate::paragen_bail!($($tt)+); }
    };
}
