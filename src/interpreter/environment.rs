use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

use crate::value::Value;

/// Environments are shared by handle: closures keep their defining frame
/// alive, and frames chain to their enclosing frame up to the global one.
pub type Env = Rc<Environment>;

pub struct Environment {
    store: RefCell<IndexMap<String, Value>>,
    enclosing: Option<Env>,
}

impl Environment {
    pub fn global() -> Env {
        Rc::new(Self {
            store: RefCell::new(IndexMap::new()),
            enclosing: None,
        })
    }

    /// A fresh frame whose lookups fall through to `parent`. Created per
    /// procedure invocation (and therefore per `let` expansion).
    pub fn extend(parent: &Env) -> Env {
        Rc::new(Self {
            store: RefCell::new(IndexMap::new()),
            enclosing: Some(parent.clone()),
        })
    }

    /// Binds in this frame, shadowing any outer binding of the same name.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.store.borrow_mut().insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.store.borrow().get(name) {
            return Some(value.clone());
        }
        self.enclosing.as_ref().and_then(|parent| parent.get(name))
    }

    /// Updates the nearest existing binding, returning its previous value,
    /// or None when the name is bound nowhere up the chain.
    pub fn update(&self, name: &str, value: Value) -> Option<Value> {
        let mut store = self.store.borrow_mut();
        if let Some(slot) = store.get_mut(name) {
            return Some(std::mem::replace(slot, value));
        }
        drop(store);
        self.enclosing
            .as_ref()
            .and_then(|parent| parent.update(name, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_define_get() {
        let env = Environment::global();
        env.define("x", Value::int(42));
        assert_eq!(env.get("x").unwrap().to_string(), "42");
    }

    #[test]
    fn test_inner_frame_shadows_outer() {
        let global = Environment::global();
        global.define("x", Value::int(1));

        let inner = Environment::extend(&global);
        inner.define("x", Value::int(2));
        assert_eq!(inner.get("x").unwrap().to_string(), "2");
        assert_eq!(global.get("x").unwrap().to_string(), "1");
    }

    #[test]
    fn test_update_walks_to_outer_frame() {
        let global = Environment::global();
        global.define("x", Value::int(1));

        let inner = Environment::extend(&global);
        let old = inner.update("x", Value::int(2)).unwrap();
        assert_eq!(old.to_string(), "1");
        assert_eq!(global.get("x").unwrap().to_string(), "2");
    }

    #[test]
    fn test_update_missing_binding() {
        let env = Environment::global();
        assert!(env.update("nope", Value::int(1)).is_none());
    }

    #[test]
    fn test_lookup_falls_through_chain() {
        let global = Environment::global();
        global.define("x", Value::int(7));
        let a = Environment::extend(&global);
        let b = Environment::extend(&a);
        assert_eq!(b.get("x").unwrap().to_string(), "7");
        assert!(b.get("y").is_none());
    }
}
