use thiserror::Error;

/// Transport and codec failures raised while moving carrier fields.
#[derive(Debug, Error)]
pub enum Error {
    #[error("fault transport io: {0}")]
    Io(#[from] std::io::Error),
    #[error("fault transport: invalid frame: {0}")]
    InvalidFrame(String),
    #[error("fault transport: encode error: {0}")]
    Encode(String),
    #[error("fault transport: decode error: {0}")]
    Decode(String),
}

impl Error {
    pub fn invalid_frame(msg: impl Into<String>) -> Self {
        Error::InvalidFrame(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Constructor shape requested from a registered fault factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstructorShape {
    Empty,
    WithMessage,
}

impl std::fmt::Display for ConstructorShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstructorShape::Empty => write!(f, "no-argument"),
            ConstructorShape::WithMessage => write!(f, "single-message"),
        }
    }
}

/// Why an identity could not be turned back into a live error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("unknown fault identity: {0}")]
    UnknownIdentity(String),
    #[error("fault {identity} has no {shape} constructor")]
    MissingConstructor {
        identity: String,
        shape: ConstructorShape,
    },
    #[error("fault {identity} failed to construct: {detail}")]
    Construction { identity: String, detail: String },
}

/// Returned by a kind's constructors when it cannot build itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructError {
    #[error("constructor not provided")]
    MissingConstructor,
    #[error("{0}")]
    Failed(String),
}

impl ConstructError {
    pub fn failed(detail: impl Into<String>) -> Self {
        ConstructError::Failed(detail.into())
    }
}

impl RegistryError {
    pub(crate) fn from_construct(
        identity: &str,
        shape: ConstructorShape,
        err: ConstructError,
    ) -> Self {
        match err {
            ConstructError::MissingConstructor => RegistryError::MissingConstructor {
                identity: identity.to_string(),
                shape,
            },
            ConstructError::Failed(detail) => RegistryError::Construction {
                identity: identity.to_string(),
                detail,
            },
        }
    }
}
