//! Forward resolution: identifier → stack, and identity matching.
//!
//! Inside one namespace, listeners are asked in the order they were
//! registered and the first answer wins. Priority plays no part here.
//! A `None` namespace goes straight to the vanilla provider without
//! consulting the alias table.

use crate::item::{ItemStack, Parameters};
use crate::key::{Key, VANILLA_NAMESPACE, split_combined};
use crate::registry::Registry;

impl Registry {
    /// Resolve `identifier` in `namespace` (`None`: vanilla).
    pub fn resolve(
        &self,
        namespace: Option<&str>,
        identifier: &str,
        parameters: &Parameters,
    ) -> Option<ItemStack> {
        let Some(namespace) = namespace else {
            return self.vanilla().fetch_with(identifier, parameters);
        };
        let (_, group) = self.resolvable_group(namespace)?;
        group
            .listeners()
            .find_map(|l| l.fetch_with(identifier, parameters))
    }

    /// Like [`Registry::resolve`], with the matched stack's amount set.
    pub fn resolve_amount(
        &self,
        namespace: Option<&str>,
        identifier: &str,
        parameters: &Parameters,
        amount: u32,
    ) -> Option<ItemStack> {
        let Some(namespace) = namespace else {
            return self
                .vanilla()
                .fetch_amount(identifier, parameters, amount);
        };
        let (_, group) = self.resolvable_group(namespace)?;
        group
            .listeners()
            .find_map(|l| l.fetch_amount(identifier, parameters, amount))
    }

    /// Resolve a combined `namespace:identifier` string. A string without a
    /// separator is looked up in the `minecraft` namespace.
    pub fn resolve_str(&self, combined: &str, parameters: &Parameters) -> Option<ItemStack> {
        let (namespace, identifier) = split_combined(combined);
        self.resolve(
            Some(namespace.unwrap_or(VANILLA_NAMESPACE)),
            identifier,
            parameters,
        )
    }

    pub fn resolve_key(&self, key: &Key, parameters: &Parameters) -> Option<ItemStack> {
        self.resolve(Some(key.namespace()), key.identifier(), parameters)
    }

    /// Whether `stack` is `identifier` in `namespace` with exactly these
    /// parameters. See [`crate::matcher`] for how parameters compare.
    pub fn matches(
        &self,
        stack: &ItemStack,
        namespace: Option<&str>,
        identifier: &str,
        parameters: &Parameters,
    ) -> bool {
        let Some(namespace) = namespace else {
            return self.vanilla().is_item_with(stack, identifier, parameters);
        };
        self.resolvable_group(namespace).is_some_and(|(_, group)| {
            group
                .listeners()
                .any(|l| l.is_item_with(stack, identifier, parameters))
        })
    }

    /// Whether `stack` is `identifier` in `namespace`, ignoring parameters.
    pub fn matches_id(&self, stack: &ItemStack, namespace: Option<&str>, identifier: &str) -> bool {
        let Some(namespace) = namespace else {
            return self.vanilla().is_item(stack, identifier);
        };
        self.resolvable_group(namespace).is_some_and(|(_, group)| {
            group.listeners().any(|l| l.is_item(stack, identifier))
        })
    }

    /// [`Registry::matches`] against a [`Key`].
    pub fn matches_key(&self, stack: &ItemStack, key: &Key, parameters: &Parameters) -> bool {
        self.matches(stack, Some(key.namespace()), key.identifier(), parameters)
    }
}
