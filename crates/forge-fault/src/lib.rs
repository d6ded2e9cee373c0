//! Error transport across execution boundaries.
//!
//! A producer records a failure in an [`ErrorCarrier`] as an identity string and
//! a message, the carrier travels as two ordered string fields, and the receiver
//! rebuilds the failure through a [`FaultRegistry`] and raises it.

pub mod carrier;
pub mod config;
pub mod error;
pub mod fault;
pub mod registry;
pub mod wire;

#[cfg(test)]
mod test_util;

pub use crate::carrier::ErrorCarrier;
pub use crate::config::{CodecConfig, DEFAULT_MAX_STRING_LEN};
pub use crate::error::{ConstructError, ConstructorShape, Error, RegistryError, Result};
pub use crate::fault::{BoxError, DomainFault, Fault, Raised, Reconstruction, UnexpectedFault};
pub use crate::registry::{FaultClass, FaultFactory, FaultKind, FaultRegistry};
pub use crate::wire::{
    FieldSink, FieldSource, MsgpackSink, MsgpackSource, Parcel, ParcelReader, ParcelWriter,
    decode_msgpack_into, encode_msgpack,
};
