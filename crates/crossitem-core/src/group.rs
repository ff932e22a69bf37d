//! Provider groups: the unit a producer registers.

use crate::listener::Listener;
use crate::priority::Priority;
use std::rc::Rc;

/// A listener together with the priority it reported when registered.
///
/// The recorded priority is the level the listener occupies in the
/// [`PriorityIndex`](crate::priority_index::PriorityIndex).
#[derive(Debug, Clone)]
pub struct ListenerEntry {
    pub listener: Rc<dyn Listener>,
    pub priority: Priority,
}

/// The aliases and listeners of one producer.
///
/// Aliases are fixed at creation. A group whose aliases were all rejected is
/// invalid: it cannot be reached by namespace and has no default alias.
#[derive(Debug)]
pub struct ProviderGroup {
    owner: String,
    aliases: Vec<String>,
    listeners: Vec<ListenerEntry>,
    seeded: bool,
}

impl ProviderGroup {
    pub(crate) fn new(owner: impl Into<String>, seeded: bool) -> Self {
        Self {
            owner: owner.into(),
            aliases: Vec::new(),
            listeners: Vec::new(),
            seeded,
        }
    }

    pub(crate) fn push_alias(&mut self, alias: String) {
        self.aliases.push(alias);
    }

    /// Identity of the producer that created the group.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// First accepted alias; used as the namespace of reverse-lookup keys.
    pub fn default_alias(&self) -> Option<&str> {
        self.aliases.first().map(String::as_str)
    }

    /// Accepted aliases, in the order they were requested.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn is_valid(&self) -> bool {
        !self.aliases.is_empty()
    }

    /// Whether the group was seeded at bootstrap rather than registered.
    pub fn is_seeded(&self) -> bool {
        self.seeded
    }

    /// Listeners in insertion order.
    pub fn listeners(&self) -> impl Iterator<Item = &Rc<dyn Listener>> {
        self.listeners.iter().map(|e| &e.listener)
    }

    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Whether every listener reports itself loaded.
    pub fn is_ready(&self) -> bool {
        self.listeners.iter().all(|e| e.listener.is_ready())
    }

    pub(crate) fn push_listener(&mut self, entry: ListenerEntry) {
        self.listeners.push(entry);
    }

    /// Remove the first entry holding this listener instance.
    pub(crate) fn remove_listener(&mut self, listener: &Rc<dyn Listener>) -> Option<ListenerEntry> {
        let i = self
            .listeners
            .iter()
            .position(|e| Rc::ptr_eq(&e.listener, listener))?;
        Some(self.listeners.remove(i))
    }

    pub(crate) fn take_listeners(&mut self) -> Vec<ListenerEntry> {
        std::mem::take(&mut self.listeners)
    }
}
