//! CrossItem Core -- the identity registry behind cross-plugin item lookups.
//!
//! Independent producers each claim one or more namespaces and register
//! [`listener::Listener`]s that turn identifiers into stacks or blocks and
//! recognise their own stacks and blocks again. The core owns the namespace
//! table and dispatches every lookup.
//!
//! # Two Orderings
//!
//! Every listener is recorded twice:
//!
//! 1. **Per group, insertion order** -- forward lookups (`decor:lamp` → stack)
//!    and item matching ask the listeners of one namespace in the order they
//!    were registered.
//! 2. **Global priority index** -- reverse lookups (stack → `decor:lamp`) and
//!    block operations walk every registration from
//!    [`priority::Priority::Highest`] to [`priority::Priority::Lowest`].
//!
//! The vanilla provider is seeded at `Lowest` under `minecraft` and `mc`, so
//! a producer that repurposes a plain material outranks it.
//!
//! # Registration Pattern
//!
//! ```rust,ignore
//! let mut registry = Registry::new();
//! let decor = registry.create_group("DecorPlugin", ["decor", "deco"])?;
//! registry.register_listener(decor, Rc::new(DecorListener::default()))?;
//!
//! let lamp = registry.resolve_str("decor:lamp", &Parameters::new());
//! let key = registry.identify(&lamp.unwrap());
//! ```
//!
//! # Key Types
//!
//! - [`registry::Registry`] -- Namespace table, provider groups and priority
//!   index; the entry point for every lookup.
//! - [`registry::RegistryBuilder`] -- Bootstrap path that seeds providers
//!   under reserved aliases.
//! - [`listener::Listener`] -- Capability trait implemented by providers.
//! - [`key::Key`] -- `namespace:identifier` pair.
//! - [`item::ItemStack`] and [`world::World`] -- The objects being named.
//! - [`vanilla::VanillaProvider`] -- Built-in provider for plain materials.

pub mod group;
pub mod id;
pub mod item;
pub mod key;
pub mod listener;
pub mod matcher;
pub mod namespace;
pub mod priority;
pub mod priority_index;
pub mod registry;
pub mod resolve;
pub mod reverse;
pub mod vanilla;
pub mod world;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use item::{ItemStack, Parameters};
pub use key::Key;
pub use listener::Listener;
pub use priority::Priority;
pub use registry::{Registry, RegistryBuilder, RegistryError};
pub use world::{BlockPos, BlockState, GridWorld, World};
