use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Extra attributes attached to a lookup or carried by a stack.
///
/// Values compare by deep structural equality.
pub type Parameters = BTreeMap<String, Value>;

/// A stack of items of one vanilla material.
///
/// Providers recognise their own stacks through `tags`, the producer-owned
/// persistent data attached to the stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    /// Upper-case vanilla material name, e.g. `GLOWSTONE`.
    pub material: String,
    pub amount: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: Parameters,
}

impl ItemStack {
    pub fn new(material: impl Into<String>, amount: u32) -> Self {
        Self {
            material: material.into(),
            amount,
            display_name: None,
            tags: BTreeMap::new(),
        }
    }

    /// Builder-style tag setter.
    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.tags.insert(name.into(), value.into());
        self
    }

    /// Builder-style display name setter.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn tag(&self, name: &str) -> Option<&Value> {
        self.tags.get(name)
    }

    pub fn set_tag(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.tags.insert(name.into(), value.into());
    }

    /// Set the amount, returning the stack for chaining.
    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_stack_has_no_tags() {
        let stack = ItemStack::new("STONE", 3);
        assert_eq!(stack.material, "STONE");
        assert_eq!(stack.amount, 3);
        assert!(stack.tags.is_empty());
        assert!(stack.display_name.is_none());
    }

    #[test]
    fn tags_round_trip_through_setters() {
        let mut stack = ItemStack::new("GLOWSTONE", 1).with_tag("decor:id", "lamp");
        stack.set_tag("decor:color", json!("red"));
        assert_eq!(stack.tag("decor:id"), Some(&json!("lamp")));
        assert_eq!(stack.tag("decor:color"), Some(&json!("red")));
        assert_eq!(stack.tag("missing"), None);
    }

    #[test]
    fn with_amount_replaces_amount() {
        let stack = ItemStack::new("STONE", 1).with_amount(64);
        assert_eq!(stack.amount, 64);
    }

    #[test]
    fn stacks_with_different_tags_differ() {
        let a = ItemStack::new("STONE", 1).with_tag("k", 1);
        let b = ItemStack::new("STONE", 1).with_tag("k", 2);
        assert_ne!(a, b);
    }

    #[test]
    fn empty_tags_are_omitted_when_serialized() {
        let json = serde_json::to_value(ItemStack::new("STONE", 1)).unwrap();
        assert_eq!(json, json!({ "material": "STONE", "amount": 1 }));
    }
}
