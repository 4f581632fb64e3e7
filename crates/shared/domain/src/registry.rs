//! Registry primitives for feature slices.
//!
//! A slice carries its pre-initialized state (repositories, caches) behind a
//! type-erased box; the API state map recovers the concrete type on lookup.

use std::any::{Any, TypeId};
use std::fmt::Debug;

/// Feature state that can live in the shared API state map.
pub trait FeatureSlice: Any + Debug + Send + Sync {
    /// Upcast used by the state map to downcast back to the concrete slice.
    fn as_any(&self) -> &dyn Any;
}

/// A feature slice paired with the [`TypeId`] it is registered under.
#[derive(Debug)]
pub struct InitializedSlice {
    pub id: TypeId,
    pub state: Box<dyn FeatureSlice>,
}

impl InitializedSlice {
    /// Wraps a concrete slice, keying it by its own type.
    pub fn new<T: FeatureSlice>(state: T) -> Self {
        Self { id: TypeId::of::<T>(), state: Box::new(state) }
    }
}
