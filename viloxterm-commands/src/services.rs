//! A minimal type-keyed service locator (§4.2's `services` field).
//!
//! Commands that need something beyond the workspace model (a settings
//! engine handle, a clock, a persistence sink) look it up here by type
//! rather than the context growing a bespoke field per dependency.

use std::any::{Any, TypeId};
use std::collections::HashMap;

#[derive(Default)]
pub struct Services {
    entries: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Services {
    pub fn new() -> Self {
        Services::default()
    }

    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.entries.insert(TypeId::of::<T>(), Box::new(value));
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.entries
            .get(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_ref())
    }

    pub fn get_mut<T: Any + Send + Sync>(&mut self) -> Option<&mut T> {
        self.entries
            .get_mut(&TypeId::of::<T>())
            .and_then(|boxed| boxed.downcast_mut())
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("count", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stores_and_retrieves_by_type() {
        let mut services = Services::new();
        services.insert(42u32);
        services.insert("hello".to_string());
        assert_eq!(services.get::<u32>(), Some(&42));
        assert_eq!(services.get::<String>().map(String::as_str), Some("hello"));
        assert_eq!(services.get::<i64>(), None);
    }
}
