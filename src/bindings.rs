// src/bindings.rs

//! Name bindings produced by inline work items.
//!
//! During a run the driver lends a `&mut Bindings` to each fragment in turn;
//! afterwards the [`Wrapper`](crate::wrapper::Wrapper) keeps the finished map
//! and only hands out shared references to it.

use std::collections::BTreeMap;

use crate::script::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bindings {
    values: BTreeMap<String, Value>,
}

impl Bindings {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub(crate) fn set(&mut self, name: String, value: Value) {
        self.values.insert(name, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate bindings sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl std::ops::Index<&str> for Bindings {
    type Output = Value;

    fn index(&self, name: &str) -> &Value {
        &self.values[name]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_assignment_wins() {
        let mut b = Bindings::default();
        b.set("a".into(), Value::Int(1));
        b.set("a".into(), Value::Int(2));
        assert_eq!(b.len(), 1);
        assert_eq!(b["a"], Value::Int(2));
    }

    #[test]
    fn iterates_in_name_order() {
        let mut b = Bindings::default();
        b.set("zeta".into(), Value::Int(1));
        b.set("alpha".into(), Value::Int(2));
        let names: Vec<_> = b.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
