use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{ConstructError, ConstructorShape, RegistryError};
use crate::fault::{BoxError, Fault};

/// Whether a reconstructed fault is part of the caller's expected failure set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FaultClass {
    Domain,
    #[default]
    Unexpected,
}

/// An error type that can travel through an [`ErrorCarrier`](crate::ErrorCarrier).
///
/// `IDENTITY` must be unique across every registry the type is registered in.
/// Kinds opt into the constructor shapes they support; the defaults report a
/// missing constructor.
pub trait FaultKind: std::error::Error + Send + Sync + Sized + 'static {
    const IDENTITY: &'static str;
    const CLASS: FaultClass = FaultClass::Unexpected;

    fn construct_empty() -> Result<Self, ConstructError> {
        Err(ConstructError::MissingConstructor)
    }

    fn construct_with_message(_message: String) -> Result<Self, ConstructError> {
        Err(ConstructError::MissingConstructor)
    }

    /// Message recorded when a producer captures this error.
    fn fault_message(&self) -> String {
        self.to_string()
    }
}

type EmptyConstructor = Arc<dyn Fn() -> Result<BoxError, ConstructError> + Send + Sync>;
type MessageConstructor = Arc<dyn Fn(String) -> Result<BoxError, ConstructError> + Send + Sync>;

/// Builds live errors for one identity.
#[derive(Clone, Default)]
pub struct FaultFactory {
    class: FaultClass,
    empty: Option<EmptyConstructor>,
    with_message: Option<MessageConstructor>,
}

impl FaultFactory {
    pub fn new(class: FaultClass) -> Self {
        Self {
            class,
            empty: None,
            with_message: None,
        }
    }

    pub fn for_kind<K: FaultKind>() -> Self {
        Self::new(K::CLASS)
            .with_empty(K::construct_empty)
            .with_message(K::construct_with_message)
    }

    pub fn with_empty<F, E>(mut self, constructor: F) -> Self
    where
        F: Fn() -> Result<E, ConstructError> + Send + Sync + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.empty = Some(Arc::new(move || {
            constructor().map(|error| Box::new(error) as BoxError)
        }));
        self
    }

    pub fn with_message<F, E>(mut self, constructor: F) -> Self
    where
        F: Fn(String) -> Result<E, ConstructError> + Send + Sync + 'static,
        E: std::error::Error + Send + Sync + 'static,
    {
        self.with_message = Some(Arc::new(move |message| {
            constructor(message).map(|error| Box::new(error) as BoxError)
        }));
        self
    }

    pub fn class(&self) -> FaultClass {
        self.class
    }

    pub fn has_constructor(&self, shape: ConstructorShape) -> bool {
        match shape {
            ConstructorShape::Empty => self.empty.is_some(),
            ConstructorShape::WithMessage => self.with_message.is_some(),
        }
    }

    /// Empty `message` selects the no-argument constructor.
    fn build(&self, identity: &str, message: &str) -> Result<BoxError, RegistryError> {
        let (shape, result) = if message.is_empty() {
            (ConstructorShape::Empty, self.empty.as_ref().map(|ctor| ctor()))
        } else {
            (
                ConstructorShape::WithMessage,
                self.with_message
                    .as_ref()
                    .map(|ctor| ctor(message.to_string())),
            )
        };
        result
            .unwrap_or(Err(ConstructError::MissingConstructor))
            .map_err(|err| RegistryError::from_construct(identity, shape, err))
    }
}

impl std::fmt::Debug for FaultFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaultFactory")
            .field("class", &self.class)
            .field("empty", &self.empty.is_some())
            .field("with_message", &self.with_message.is_some())
            .finish()
    }
}

/// Maps identity strings to factories. Built at startup, then shared read-only.
#[derive(Clone, Debug, Default)]
pub struct FaultRegistry {
    factories: BTreeMap<String, FaultFactory>,
}

impl FaultRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<K: FaultKind>(&mut self) -> Option<FaultFactory> {
        self.register_factory(K::IDENTITY, FaultFactory::for_kind::<K>())
    }

    /// Chainable form of [`register`](Self::register) for startup wiring.
    pub fn with_kind<K: FaultKind>(mut self) -> Self {
        self.register::<K>();
        self
    }

    pub fn register_factory(
        &mut self,
        identity: impl Into<String>,
        factory: FaultFactory,
    ) -> Option<FaultFactory> {
        self.factories.insert(identity.into(), factory)
    }

    pub fn unregister(&mut self, identity: &str) -> Option<FaultFactory> {
        self.factories.remove(identity)
    }

    pub fn contains(&self, identity: &str) -> bool {
        self.factories.contains_key(identity)
    }

    pub fn identities(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    pub fn resolve(&self, identity: &str) -> Result<&FaultFactory, RegistryError> {
        self.factories
            .get(identity)
            .ok_or_else(|| RegistryError::UnknownIdentity(identity.to_string()))
    }

    pub fn construct(&self, identity: &str, message: &str) -> Result<Fault, RegistryError> {
        let factory = self.resolve(identity)?;
        let error = factory.build(identity, message)?;
        Ok(Fault::new(identity, message, factory.class(), error))
    }
}
