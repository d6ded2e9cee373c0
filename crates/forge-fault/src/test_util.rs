use serde::Deserialize;

use crate::error::ConstructError;
use crate::registry::{FaultClass, FaultKind, FaultRegistry};

#[derive(Debug, Deserialize)]
pub struct Fixture {
    #[allow(dead_code)]
    pub name: String,
    pub identity: String,
    pub message: String,
    pub payload_hex: String,
    #[allow(dead_code)]
    pub notes: Option<String>,
}

pub fn load_fixture(name: &str) -> Fixture {
    let dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");
    let path = dir.join(format!("{name}.json"));
    let data = std::fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read fixture {name}: {err}"));
    serde_json::from_str(&data)
        .unwrap_or_else(|err| panic!("failed to parse fixture {name}: {err}"))
}

pub fn decode_hex(hex_str: &str) -> Vec<u8> {
    hex::decode(hex_str).unwrap_or_else(|err| panic!("hex decode failed: {err}"))
}

/// Registry with every test kind.
pub fn registry() -> FaultRegistry {
    FaultRegistry::new()
        .with_kind::<ReaderTimeout>()
        .with_kind::<InvalidApdu>()
        .with_kind::<SecurityViolation>()
        .with_kind::<CorruptedState>()
}

/// Domain kind with both constructor shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderTimeout {
    pub detail: Option<String>,
    pub built_without_message: bool,
}

impl ReaderTimeout {
    pub fn new(detail: Option<&str>) -> Self {
        Self {
            detail: detail.map(str::to_string),
            built_without_message: false,
        }
    }
}

impl std::fmt::Display for ReaderTimeout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "card reader timed out: {detail}"),
            None => write!(f, "card reader timed out"),
        }
    }
}

impl std::error::Error for ReaderTimeout {}

impl FaultKind for ReaderTimeout {
    const IDENTITY: &'static str = "forge.card.ReaderTimeout";
    const CLASS: FaultClass = FaultClass::Domain;

    fn construct_empty() -> Result<Self, ConstructError> {
        Ok(Self {
            detail: None,
            built_without_message: true,
        })
    }

    fn construct_with_message(message: String) -> Result<Self, ConstructError> {
        Ok(Self {
            detail: Some(message),
            built_without_message: false,
        })
    }
}

/// Domain kind that only accepts a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid APDU: {reason}")]
pub struct InvalidApdu {
    pub reason: String,
}

impl InvalidApdu {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl FaultKind for InvalidApdu {
    const IDENTITY: &'static str = "forge.card.InvalidApdu";
    const CLASS: FaultClass = FaultClass::Domain;

    fn construct_with_message(message: String) -> Result<Self, ConstructError> {
        Ok(Self::new(message))
    }

    fn fault_message(&self) -> String {
        self.reason.clone()
    }
}

/// Registered kind outside the domain set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityViolation {
    pub detail: Option<String>,
}

impl SecurityViolation {
    pub fn new(detail: Option<&str>) -> Self {
        Self {
            detail: detail.map(str::to_string),
        }
    }
}

impl std::fmt::Display for SecurityViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "security violation: {detail}"),
            None => write!(f, "security violation"),
        }
    }
}

impl std::error::Error for SecurityViolation {}

impl FaultKind for SecurityViolation {
    const IDENTITY: &'static str = "forge.platform.SecurityViolation";

    fn construct_empty() -> Result<Self, ConstructError> {
        Ok(Self::new(None))
    }

    fn construct_with_message(message: String) -> Result<Self, ConstructError> {
        Ok(Self::new(Some(&message)))
    }
}

/// Registered kind whose constructors always fail.
#[derive(Debug, thiserror::Error)]
#[error("corrupted state")]
pub struct CorruptedState;

impl FaultKind for CorruptedState {
    const IDENTITY: &'static str = "forge.card.CorruptedState";
    const CLASS: FaultClass = FaultClass::Domain;

    fn construct_empty() -> Result<Self, ConstructError> {
        Err(ConstructError::failed("state snapshot unavailable"))
    }

    fn construct_with_message(_message: String) -> Result<Self, ConstructError> {
        Err(ConstructError::failed("state snapshot unavailable"))
    }
}
