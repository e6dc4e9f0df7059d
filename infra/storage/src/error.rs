use std::borrow::Cow;

/// A specialized [`StorageError`] enum of this crate.
///
/// Each variant corresponds to one outcome the transport layer has to translate;
/// see [`StorageError::kind`].
#[fstore_derive::fstore_error]
pub enum StorageError {
    #[error("Invalid item name{}: {message}", format_context(.context))]
    InvalidName { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid pattern{}: {message}", format_context(.context))]
    InvalidPattern { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Item already exists{}: {message}", format_context(.context))]
    AlreadyExists { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Item not found{}: {message}", format_context(.context))]
    Missing { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Storage corruption detected{}: {message}", format_context(.context))]
    CorruptionDetected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Storage service failure{}: {source}", format_context(.context))]
    Service { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid storage configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Payload-free classification of a [`StorageError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidName,
    InvalidPattern,
    AlreadyExists,
    Missing,
    CorruptionDetected,
    Service,
    InvalidConfiguration,
}

impl StorageError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidName { .. } => ErrorKind::InvalidName,
            Self::InvalidPattern { .. } => ErrorKind::InvalidPattern,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::Missing { .. } => ErrorKind::Missing,
            Self::CorruptionDetected { .. } => ErrorKind::CorruptionDetected,
            Self::Service { .. } => ErrorKind::Service,
            Self::InvalidConfiguration { .. } => ErrorKind::InvalidConfiguration,
        }
    }

    pub(crate) fn missing(name: &str) -> Self {
        Self::Missing { message: name.to_owned().into(), context: None }
    }
}
