//! Outcomes of turning carrier fields back into live errors.

use std::fmt;

use crate::error::RegistryError;
use crate::registry::FaultClass;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A reconstructed error together with the fields it was built from.
#[derive(Debug)]
pub struct Fault {
    identity: String,
    message: String,
    class: FaultClass,
    error: BoxError,
}

impl Fault {
    pub fn new(
        identity: impl Into<String>,
        message: impl Into<String>,
        class: FaultClass,
        error: BoxError,
    ) -> Self {
        Self {
            identity: identity.into(),
            message: message.into(),
            class,
            error,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Message carried on the wire; empty when the no-argument constructor was used.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn class(&self) -> FaultClass {
        self.class
    }

    pub fn is_domain(&self) -> bool {
        self.class == FaultClass::Domain
    }

    pub fn get_ref(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.error.as_ref()
    }

    pub fn downcast_ref<K: std::error::Error + 'static>(&self) -> Option<&K> {
        self.error.downcast_ref::<K>()
    }

    pub fn into_inner(self) -> BoxError {
        self.error
    }

    /// Domain kinds surface as themselves; everything else is wrapped.
    pub fn into_raised(self) -> Raised {
        match self.class {
            FaultClass::Domain => Raised::Domain(DomainFault {
                identity: self.identity,
                error: self.error,
            }),
            FaultClass::Unexpected => {
                tracing::debug!(
                    identity = %self.identity,
                    "wrapping fault outside the domain set"
                );
                Raised::Unexpected(UnexpectedFault {
                    identity: self.identity,
                    message: self.message,
                    source: self.error,
                })
            }
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

/// Tagged result of reconstruction.
///
/// Unlike [`ErrorCarrier::reconstruct`](crate::ErrorCarrier::reconstruct), this keeps
/// "no error" and "error present but undecodable" apart.
#[derive(Debug)]
pub enum Reconstruction {
    NoError,
    Domain(Fault),
    Unexpected(Fault),
    Undecodable {
        identity: String,
        reason: RegistryError,
    },
}

impl Reconstruction {
    pub fn is_no_error(&self) -> bool {
        matches!(self, Reconstruction::NoError)
    }

    pub fn is_undecodable(&self) -> bool {
        matches!(self, Reconstruction::Undecodable { .. })
    }

    pub fn into_fault(self) -> Option<Fault> {
        match self {
            Reconstruction::Domain(fault) | Reconstruction::Unexpected(fault) => Some(fault),
            Reconstruction::NoError | Reconstruction::Undecodable { .. } => None,
        }
    }

    /// Same outcome as [`ErrorCarrier::raise`](crate::ErrorCarrier::raise).
    pub fn into_result(self) -> Result<(), Raised> {
        match self.into_fault() {
            Some(fault) => Err(fault.into_raised()),
            None => Ok(()),
        }
    }
}

/// Error produced by raising a populated carrier.
#[derive(Debug, thiserror::Error)]
pub enum Raised {
    #[error(transparent)]
    Domain(DomainFault),
    #[error(transparent)]
    Unexpected(UnexpectedFault),
}

impl Raised {
    pub fn identity(&self) -> &str {
        match self {
            Raised::Domain(fault) => fault.identity(),
            Raised::Unexpected(fault) => fault.identity(),
        }
    }

    pub fn is_domain(&self) -> bool {
        matches!(self, Raised::Domain(_))
    }

    /// Only domain faults expose their concrete kind.
    pub fn downcast_ref<K: std::error::Error + 'static>(&self) -> Option<&K> {
        match self {
            Raised::Domain(fault) => fault.downcast_ref::<K>(),
            Raised::Unexpected(_) => None,
        }
    }
}

/// A fault in the caller's expected set, preserved as its concrete kind.
#[derive(Debug)]
pub struct DomainFault {
    identity: String,
    error: BoxError,
}

impl DomainFault {
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn get_ref(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.error.as_ref()
    }

    pub fn downcast_ref<K: std::error::Error + 'static>(&self) -> Option<&K> {
        self.error.downcast_ref::<K>()
    }

    pub fn downcast<K: std::error::Error + 'static>(self) -> Result<Box<K>, Self> {
        match self.error.downcast::<K>() {
            Ok(kind) => Ok(kind),
            Err(error) => Err(Self {
                identity: self.identity,
                error,
            }),
        }
    }

    pub fn into_inner(self) -> BoxError {
        self.error
    }
}

impl fmt::Display for DomainFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for DomainFault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.error.source()
    }
}

/// Generic wrapper for faults outside the caller's expected set.
#[derive(Debug)]
pub struct UnexpectedFault {
    identity: String,
    message: String,
    source: BoxError,
}

impl UnexpectedFault {
    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for UnexpectedFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "unexpected fault {}", self.identity)
        } else {
            write!(f, "unexpected fault {}: {}", self.identity, self.message)
        }
    }
}

impl std::error::Error for UnexpectedFault {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}
