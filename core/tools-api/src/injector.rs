//! A small type-keyed dependency container, grounded on the original
//! implementation's `Injector`: register concrete values ahead of time,
//! then let tool handlers pull out exactly the capability type they need.

use std::any::Any;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

/// Dependencies available to tool handlers, keyed by type.
///
/// A handler asks for `ctx.injector().require::<ApprovalGate>()` instead of
/// `ToolContext` growing one field per capability. Missing a dependency a
/// handler declares as required is a configuration error caught at agent
/// construction time, not at call time.
#[derive(Default, Clone)]
pub struct Injector {
    values: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
}

impl Injector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Any + Send + Sync>(&mut self, value: T) -> &mut Self {
        self.values.insert(TypeId::of::<T>(), Arc::new(value));
        self
    }

    /// Returns the registered value of type `T`, or `None` if it was never
    /// registered.
    pub fn optional<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.values
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|v| v.downcast::<T>().ok())
    }

    /// Returns the registered value of type `T`, panicking if it is absent.
    ///
    /// Reserved for dependencies a handler cannot function without; callers
    /// that can degrade gracefully should use [`Self::optional`] instead.
    pub fn require<T: Any + Send + Sync>(&self) -> Arc<T> {
        self.optional::<T>()
            .unwrap_or_else(|| panic!("required dependency {} was not registered", std::any::type_name::<T>()))
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct WorkspaceRoot(String);

    #[test]
    fn optional_returns_none_when_unregistered() {
        let injector = Injector::new();
        assert!(injector.optional::<WorkspaceRoot>().is_none());
    }

    #[test]
    fn register_then_require_returns_the_value() {
        let mut injector = Injector::new();
        injector.register(WorkspaceRoot("/work".to_string()));
        let root = injector.require::<WorkspaceRoot>();
        assert_eq!(*root, WorkspaceRoot("/work".to_string()));
    }

    #[test]
    fn contains_reflects_registration() {
        let mut injector = Injector::new();
        assert!(!injector.contains::<WorkspaceRoot>());
        injector.register(WorkspaceRoot("/x".to_string()));
        assert!(injector.contains::<WorkspaceRoot>());
    }

    #[test]
    #[should_panic(expected = "was not registered")]
    fn require_panics_on_missing_dependency() {
        let injector = Injector::new();
        injector.require::<WorkspaceRoot>();
    }
}
