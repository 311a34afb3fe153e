//! A type-keyed service locator handed to scenes during load.
//!
//! The host populates a [`ServiceRegistry`] with shared services (graphics
//! device, asset cache, logger sinks, ...) before building the
//! [`SceneManager`](crate::scene::SceneManager). The manager seals the
//! registry, after which it is read-only: scenes and systems can look
//! services up but never replace them.
//!
//! The registry is an explicit object, not a global, so tests build isolated
//! instances freely.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use thiserror::Error;

/// Service lookup and registration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// No service of the requested type is registered
    #[error("service not registered: {0}")]
    Missing(&'static str),

    /// Registration attempted after the registry was sealed
    #[error("service registry is sealed, cannot register {0}")]
    Sealed(&'static str),
}

/// A generic service registry keyed by [`TypeId`].
///
/// # Example
///
/// ```rust
/// use sim_core::services::ServiceRegistry;
///
/// struct MyService { value: i32 }
///
/// let mut registry = ServiceRegistry::new();
/// registry.insert(MyService { value: 42 }).unwrap();
///
/// let svc = registry.get::<MyService>().unwrap();
/// assert_eq!(svc.value, 42);
/// ```
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<TypeId, (&'static str, Box<dyn Any + Send + Sync>)>,
    sealed: bool,
}

impl ServiceRegistry {
    /// Creates an empty service registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
            sealed: false,
        }
    }

    /// Inserts a service into the registry, keyed by `T`'s [`TypeId`].
    ///
    /// If a service of the same type was already registered, it is replaced.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Sealed`] once the registry has been sealed.
    pub fn insert<T: Send + Sync + 'static>(&mut self, service: T) -> Result<(), ServiceError> {
        let name = type_name::<T>();
        if self.sealed {
            return Err(ServiceError::Sealed(name));
        }
        if self.services.insert(TypeId::of::<T>(), (name, Box::new(service))).is_some() {
            log::debug!("Replaced service {}", name);
        } else {
            log::debug!("Registered service {}", name);
        }
        Ok(())
    }

    /// Builder-style [`ServiceRegistry::insert`] for bootstrap code.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Sealed`] once the registry has been sealed.
    pub fn with<T: Send + Sync + 'static>(mut self, service: T) -> Result<Self, ServiceError> {
        self.insert(service)?;
        Ok(self)
    }

    /// Retrieves a shared reference to a previously registered service.
    ///
    /// Returns `None` if no service of type `T` has been registered.
    #[must_use]
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.services
            .get(&TypeId::of::<T>())
            .and_then(|(_, boxed)| boxed.downcast_ref::<T>())
    }

    /// Like [`get`](ServiceRegistry::get), but a missing service is an error.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Missing`] if no `T` is registered.
    pub fn require<T: Send + Sync + 'static>(&self) -> Result<&T, ServiceError> {
        self.get::<T>()
            .ok_or(ServiceError::Missing(type_name::<T>()))
    }

    /// Returns `true` if a service of type `T` is registered.
    #[must_use]
    pub fn contains<T: Send + Sync + 'static>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }

    /// Freezes the registry; further inserts fail.
    pub fn seal(&mut self) {
        if !self.sealed {
            log::debug!("Sealed service registry with {} services", self.services.len());
        }
        self.sealed = true;
    }

    /// Whether the registry has been sealed.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Type names of registered services, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.services.values().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns `true` if no services are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl std::fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.names())
            .field("sealed", &self.sealed)
            .finish()
    }
}
