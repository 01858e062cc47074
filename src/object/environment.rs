//! Lexical scope chain: a mapping from name to value, with an optional
//! reference to an enclosing scope.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::object::Object;

struct EnvironmentInner {
    store: HashMap<String, Object>,
    outer: Option<Environment>,
}

/// A scope frame. Cheap to clone: clones share the same underlying store, so
/// a function can hold one as its captured closure environment without
/// copying any bindings.
#[derive(Clone)]
pub struct Environment {
    inner: Rc<RefCell<EnvironmentInner>>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(EnvironmentInner {
                store: HashMap::new(),
                outer: None,
            })),
        }
    }

    /// Creates a new scope enclosed by `self`, the way calling a function
    /// opens a fresh environment whose outer is the function's captured env.
    pub fn enclosed(&self) -> Self {
        Self {
            inner: Rc::new(RefCell::new(EnvironmentInner {
                store: HashMap::new(),
                outer: Some(self.clone()),
            })),
        }
    }

    /// Looks up `name` in this scope, then each outer scope in turn.
    pub fn get(&self, name: &str) -> Option<Object> {
        let inner = self.inner.borrow();
        if let Some(value) = inner.store.get(name) {
            return Some(value.clone());
        }
        inner.outer.as_ref().and_then(|outer| outer.get(name))
    }

    /// Binds `name` to `value`.
    ///
    /// Walks outward first to find a scope that already owns `name`: if one
    /// exists and holds a value of a different type, the write is rejected
    /// with an error string rather than overwritten; if it exists with a
    /// matching type, it is updated in place. Only when no existing binding
    /// is found anywhere in the chain does `set` create a new one in the
    /// current scope.
    pub fn set(&self, name: &str, value: Object) -> Result<Object, String> {
        if let Some(owner) = self.find_owner(name) {
            let mut owner_inner = owner.inner.borrow_mut();
            let existing = owner_inner.store.get(name).expect("find_owner located this binding");
            if std::mem::discriminant(existing) != std::mem::discriminant(&value) {
                return Err(format!(
                    "Cannot reassign different types. Passed {} type to {} type variable",
                    value.object_type(),
                    existing.object_type()
                ));
            }
            owner_inner.store.insert(name.to_string(), value.clone());
            return Ok(value);
        }

        self.inner.borrow_mut().store.insert(name.to_string(), value.clone());
        Ok(value)
    }

    fn find_owner(&self, name: &str) -> Option<Environment> {
        let inner = self.inner.borrow();
        if inner.store.contains_key(name) {
            return Some(self.clone());
        }
        inner.outer.as_ref().and_then(|outer| outer.find_owner(name))
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_through_outer_scopes() {
        let outer = Environment::new();
        outer.set("a", Object::Integer(5)).unwrap();
        let inner = outer.enclosed();
        assert_eq!(inner.get("a"), Some(Object::Integer(5)));
    }

    #[test]
    fn set_writes_to_the_scope_that_owns_the_binding() {
        let outer = Environment::new();
        outer.set("i", Object::Integer(0)).unwrap();
        let inner = outer.enclosed();

        inner.set("i", Object::Integer(10)).unwrap();

        assert_eq!(outer.get("i"), Some(Object::Integer(10)));
    }

    #[test]
    fn set_rejects_a_type_changing_reassignment() {
        let env = Environment::new();
        env.set("a", Object::Integer(5)).unwrap();
        let result = env.set("a", Object::String("oops".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn unbound_name_creates_a_binding_in_the_current_scope() {
        let outer = Environment::new();
        let inner = outer.enclosed();
        inner.set("x", Object::Integer(1)).unwrap();
        assert_eq!(outer.get("x"), None);
        assert_eq!(inner.get("x"), Some(Object::Integer(1)));
    }
}
