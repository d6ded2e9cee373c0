use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Result;
use crate::fault::{Fault, Raised, Reconstruction};
use crate::registry::{FaultClass, FaultKind, FaultRegistry};
use crate::wire::{FieldSink, FieldSource};

/// Container for at most one failure, encoded as an identity and a message.
///
/// An empty identity means "no error". Both fields are always present so the
/// wire form has a fixed shape: `identity` then `message`.
///
/// A carrier is reusable but not shared: give each in-flight call its own, and
/// clear it between attempts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ErrorCarrier {
    identity: String,
    message: String,
}

impl ErrorCarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A `None` or empty identity yields an empty carrier whatever the message.
    pub fn with_error(identity: Option<&str>, message: Option<&str>) -> Self {
        let mut carrier = Self::new();
        carrier.set_error(identity, message);
        carrier
    }

    pub fn with_kind<K: FaultKind>(message: Option<&str>) -> Self {
        Self::with_error(Some(K::IDENTITY), message)
    }

    /// Builds a carrier from the next two fields of `source`.
    pub fn from_source<S: FieldSource + ?Sized>(source: &mut S) -> Result<Self> {
        let mut carrier = Self::new();
        carrier.deserialize(source)?;
        Ok(carrier)
    }

    pub fn clear(&mut self) {
        self.identity.clear();
        self.message.clear();
    }

    pub fn set_error(&mut self, identity: Option<&str>, message: Option<&str>) {
        match identity {
            Some(identity) if !identity.is_empty() => {
                self.identity = identity.to_string();
                self.message = message.unwrap_or_default().to_string();
            }
            _ => self.clear(),
        }
    }

    pub fn set_kind<K: FaultKind>(&mut self, message: Option<&str>) {
        self.set_error(Some(K::IDENTITY), message);
    }

    /// Records the error of a failed result; a successful result leaves the carrier untouched.
    pub fn capture<T, K: FaultKind>(&mut self, result: std::result::Result<T, K>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                let message = err.fault_message();
                self.set_kind::<K>(Some(&message));
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.identity.is_empty()
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn serialize<S: FieldSink + ?Sized>(&self, sink: &mut S) -> Result<()> {
        sink.write_string(Some(&self.identity))?;
        sink.write_string(Some(&self.message))?;
        Ok(())
    }

    /// Overwrites both fields. Absent strings on the wire become empty.
    pub fn deserialize<S: FieldSource + ?Sized>(&mut self, source: &mut S) -> Result<()> {
        let identity = source.read_string()?.unwrap_or_default();
        let message = source.read_string()?.unwrap_or_default();
        self.identity = identity;
        self.message = message;
        Ok(())
    }

    /// Best effort: any resolution or construction failure yields `None`.
    pub fn reconstruct(&self, registry: &FaultRegistry) -> Option<Fault> {
        self.diagnose(registry).into_fault()
    }

    pub fn diagnose(&self, registry: &FaultRegistry) -> Reconstruction {
        if self.is_empty() {
            return Reconstruction::NoError;
        }
        match registry.construct(&self.identity, &self.message) {
            Ok(fault) => match fault.class() {
                FaultClass::Domain => Reconstruction::Domain(fault),
                FaultClass::Unexpected => Reconstruction::Unexpected(fault),
            },
            Err(reason) => {
                tracing::debug!(
                    identity = %self.identity,
                    reason = %reason,
                    "error carrier could not reconstruct fault"
                );
                Reconstruction::Undecodable {
                    identity: self.identity.clone(),
                    reason,
                }
            }
        }
    }

    /// `Ok(())` when empty or when the fault cannot be reconstructed; use
    /// [`diagnose`](Self::diagnose) to tell those apart.
    pub fn raise(&self, registry: &FaultRegistry) -> std::result::Result<(), Raised> {
        match self.reconstruct(registry) {
            Some(fault) => Err(fault.into_raised()),
            None => Ok(()),
        }
    }
}

impl fmt::Display for ErrorCarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "<none>")
        } else if self.message.is_empty() {
            write!(f, "{}", self.identity)
        } else {
            write!(f, "{}: {}", self.identity, self.message)
        }
    }
}

// Serde form is the same fixed pair: a two-element tuple, no field names.
impl Serialize for ErrorCarrier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (&self.identity, &self.message).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ErrorCarrier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let (identity, message) = <(Option<String>, Option<String>)>::deserialize(deserializer)?;
        Ok(Self {
            identity: identity.unwrap_or_default(),
            message: message.unwrap_or_default(),
        })
    }
}
