/*!

The `Context` holds all of the state belonging to a single simulation run. Each component
stores its data in a container keyed by the container's type, and exposes its public API as
an extension trait on `Context` (`ContextRandomExt`, `ContextGridExt`, `ContextPeopleExt`, ...).

A fresh `Context` is created for every run, so no state can leak from one run into the next.

*/

use crate::{type_of, TypeId};
use rustc_hash::FxHashMap;
use std::any::Any;

/// A data container that knows how to construct its initial (empty) state. Containers that
/// implement `DataPlugin` are created lazily on first mutable access.
pub trait DataPlugin: Any + Sized {
    fn init() -> Self;
}

pub struct Context {
    data_plugins: FxHashMap<TypeId, Box<dyn Any>>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    pub fn new() -> Self {
        Context {
            data_plugins: FxHashMap::default(),
        }
    }

    /// Returns a mutable reference for the data container for `T`, creating it if it doesn't exist yet.
    pub fn get_data_container_mut<T: DataPlugin>(&mut self) -> &mut T {
        self.data_plugins
            .entry(type_of::<T>())
            .or_insert_with(|| Box::new(T::init()))
            .downcast_mut::<T>()
            .expect("data container has the type it is keyed by")
    }

    /// Returns a reference to the data container for `T` if it exists.
    /// If you need a mutable reference or lazy instantiation, use `Context::get_data_container_mut()`.
    pub fn get_data_container<T: Any>(&self) -> Option<&T> {
        self.data_plugins
            .get(&type_of::<T>())
            .and_then(|data| data.downcast_ref::<T>())
    }

    /// Returns a mutable reference to the data container for `T` if it exists. Unlike
    /// `get_data_container_mut`, this works for containers that can't build themselves.
    pub fn try_get_data_container_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.data_plugins
            .get_mut(&type_of::<T>())
            .and_then(|data| data.downcast_mut::<T>())
    }

    /// Installs `value` as the data container for `T`, returning the previous container if any.
    pub fn insert_data_container<T: Any>(&mut self, value: T) -> Option<Box<T>> {
        self.data_plugins
            .insert(type_of::<T>(), Box::new(value))
            .and_then(|boxed| boxed.downcast::<T>().ok())
    }
}
