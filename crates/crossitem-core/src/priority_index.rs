//! Secondary index of every registered listener, keyed by priority.
//!
//! Reverse resolution walks this index from [`Priority::Highest`] to
//! [`Priority::Lowest`], in registration order within each level. It is kept
//! in step with the per-group listener lists by the
//! [`Registry`](crate::registry::Registry); nothing else mutates it.

use crate::id::GroupId;
use crate::listener::Listener;
use crate::priority::{PRIORITY_COUNT, Priority};
use std::rc::Rc;

/// A listener registered to a group.
///
/// Two registrations are equal when they hold the same listener instance
/// for the same group.
#[derive(Clone)]
pub struct Registration {
    pub listener: Rc<dyn Listener>,
    pub group: GroupId,
}

impl Registration {
    pub fn new(listener: Rc<dyn Listener>, group: GroupId) -> Self {
        Self { listener, group }
    }
}

impl PartialEq for Registration {
    fn eq(&self, other: &Self) -> bool {
        self.group == other.group && Rc::ptr_eq(&self.listener, &other.listener)
    }
}

impl Eq for Registration {}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("listener", &self.listener)
            .field("group", &self.group)
            .finish()
    }
}

/// Priority → registrations, registration order within a level.
#[derive(Debug, Default)]
pub struct PriorityIndex {
    levels: [Vec<Registration>; PRIORITY_COUNT],
}

impl PriorityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append at the tail of `priority`'s level.
    pub(crate) fn insert(&mut self, priority: Priority, registration: Registration) {
        self.levels[priority.index()].push(registration);
    }

    /// Remove the first equal registration from `priority`'s level.
    /// Returns whether one was removed.
    pub(crate) fn remove(&mut self, priority: Priority, registration: &Registration) -> bool {
        let level = &mut self.levels[priority.index()];
        match level.iter().position(|r| r == registration) {
            Some(i) => {
                level.remove(i);
                true
            }
            None => false,
        }
    }

    /// Keep only registrations whose group satisfies `keep`.
    pub(crate) fn retain_groups(&mut self, mut keep: impl FnMut(GroupId) -> bool) {
        for level in &mut self.levels {
            level.retain(|r| keep(r.group));
        }
    }

    pub fn level(&self, priority: Priority) -> &[Registration] {
        &self.levels[priority.index()]
    }

    /// Every registration, highest priority first.
    pub fn iter(&self) -> impl Iterator<Item = &Registration> {
        Priority::ALL.into_iter().flat_map(|p| self.level(p).iter())
    }

    pub fn len(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(Vec::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemStack;
    use slotmap::SlotMap;

    #[derive(Debug)]
    struct Named(&'static str);

    impl Listener for Named {
        fn fetch(&self, _identifier: &str) -> Option<ItemStack> {
            None
        }
    }

    fn group() -> GroupId {
        let mut map: SlotMap<GroupId, ()> = SlotMap::with_key();
        map.insert(())
    }

    fn reg(name: &'static str, group: GroupId) -> Registration {
        Registration::new(Rc::new(Named(name)), group)
    }

    fn names(index: &PriorityIndex) -> Vec<String> {
        index.iter().map(|r| format!("{:?}", r.listener)).collect()
    }

    #[test]
    fn iteration_is_priority_then_registration_order() {
        let g = group();
        let mut index = PriorityIndex::new();
        index.insert(Priority::Lowest, reg("vanilla", g));
        index.insert(Priority::Medium, reg("m1", g));
        index.insert(Priority::Highest, reg("h", g));
        index.insert(Priority::Medium, reg("m2", g));

        assert_eq!(
            names(&index),
            vec!["Named(\"h\")", "Named(\"m1\")", "Named(\"m2\")", "Named(\"vanilla\")"]
        );
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn equality_is_instance_and_group() {
        let g = group();
        let listener: Rc<dyn Listener> = Rc::new(Named("a"));
        let a = Registration::new(listener.clone(), g);
        let b = Registration::new(listener, g);
        let c = reg("a", g);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn remove_takes_first_match_only() {
        let g = group();
        let listener: Rc<dyn Listener> = Rc::new(Named("dup"));
        let r = Registration::new(listener, g);
        let mut index = PriorityIndex::new();
        index.insert(Priority::Medium, r.clone());
        index.insert(Priority::Medium, r.clone());

        assert!(index.remove(Priority::Medium, &r));
        assert_eq!(index.level(Priority::Medium).len(), 1);
        assert!(index.remove(Priority::Medium, &r));
        assert!(!index.remove(Priority::Medium, &r));
        assert!(index.is_empty());
    }

    #[test]
    fn remove_from_wrong_level_is_noop() {
        let g = group();
        let r = reg("a", g);
        let mut index = PriorityIndex::new();
        index.insert(Priority::High, r.clone());
        assert!(!index.remove(Priority::Low, &r));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn retain_groups_filters_every_level() {
        let mut map: SlotMap<GroupId, ()> = SlotMap::with_key();
        let keep = map.insert(());
        let drop = map.insert(());
        let mut index = PriorityIndex::new();
        index.insert(Priority::Highest, reg("a", drop));
        index.insert(Priority::Lowest, reg("b", keep));
        index.insert(Priority::Lowest, reg("c", drop));
        index.retain_groups(|g| g == keep);
        assert_eq!(names(&index), vec!["Named(\"b\")"]);
    }
}
