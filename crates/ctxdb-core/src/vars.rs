//! String-keyed, per-request variable store.
//!
//! Middleware publishes values under a name with [`ContextVars::set`]; handlers further down the
//! chain read them back with [`ContextVars::get`]. Values are stored type-erased, so a read names
//! the type it expects and gets `None` both when the key is unbound and when the stored value has
//! a different type. Use [`ContextVars::contains`] to tell the two apart.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type Value = Arc<dyn Any + Send + Sync>;

#[derive(Clone, Default)]
pub struct ContextVars {
    values: HashMap<String, Value>,
}

impl ContextVars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `value` under `key`, returning `true` if an earlier value was replaced.
    pub fn set<K, T>(&mut self, key: K, value: T) -> bool
    where
        K: Into<String>,
        T: Any + Send + Sync,
    {
        self.values.insert(key.into(), Arc::new(value)).is_some()
    }

    /// Clone out the value under `key` if it exists and has type `T`.
    pub fn get<T>(&self, key: &str) -> Option<T>
    where
        T: Any + Clone,
    {
        self.values
            .get(key)
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    /// Borrow the value under `key` without naming its type.
    pub fn get_raw(&self, key: &str) -> Option<&(dyn Any + Send + Sync)> {
        self.values.get(key).map(|value| value.as_ref())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> bool {
        self.values.remove(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ContextVars {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("ContextVars").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_value() {
        let mut vars = ContextVars::new();
        assert!(!vars.set("user", String::from("ada")));
        assert_eq!(vars.get::<String>("user").as_deref(), Some("ada"));
    }

    #[test]
    fn set_overwrites_existing_value() {
        let mut vars = ContextVars::new();
        vars.set("count", 1u32);
        assert!(vars.set("count", 2u32));
        assert_eq!(vars.get::<u32>("count"), Some(2));
        assert_eq!(vars.len(), 1);
    }

    #[test]
    fn get_with_wrong_type_is_none_but_key_is_present() {
        let mut vars = ContextVars::new();
        vars.set("count", 1u32);
        assert_eq!(vars.get::<String>("count"), None);
        assert!(vars.contains("count"));
        assert!(vars.get_raw("count").is_some());
    }

    #[test]
    fn missing_key_is_none() {
        let vars = ContextVars::new();
        assert!(vars.is_empty());
        assert_eq!(vars.get::<u32>("nope"), None);
        assert!(vars.get_raw("nope").is_none());
    }

    #[test]
    fn remove_unbinds_key() {
        let mut vars = ContextVars::new();
        vars.set("a", 1u8);
        assert!(vars.remove("a"));
        assert!(!vars.remove("a"));
        assert!(!vars.contains("a"));
    }

    #[test]
    fn debug_lists_sorted_keys() {
        let mut vars = ContextVars::new();
        vars.set("b", 1u8);
        vars.set("a", 2u8);
        assert_eq!(format!("{:?}", vars), r#"ContextVars { keys: ["a", "b"] }"#);
    }
}
