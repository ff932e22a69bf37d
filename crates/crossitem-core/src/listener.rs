//! The capability trait providers implement.
//!
//! A provider only has to implement [`Listener::fetch`]. Every other method
//! has a default supplied here, so amount-qualified, parameterized and block
//! variants behave consistently across providers:
//!
//! - forward lookups return `None`,
//! - reverse lookups return `None`,
//! - block mutations report `false`,
//! - availability lists are empty.
//!
//! Block mutations must leave the world untouched when they return `false`.

use crate::item::{ItemStack, Parameters};
use crate::matcher::{names_match, parameters_match};
use crate::priority::Priority;
use crate::world::{BlockPos, World};

/// Resolves identifiers of one provider to stacks and blocks, and back.
pub trait Listener: std::fmt::Debug {
    /// The stack named `identifier`, or `None` if this provider has no such
    /// item.
    fn fetch(&self, identifier: &str) -> Option<ItemStack>;

    /// Parameterized fetch. Ignores `parameters` by default.
    fn fetch_with(&self, identifier: &str, parameters: &Parameters) -> Option<ItemStack> {
        let _ = parameters;
        self.fetch(identifier)
    }

    /// Fetch and set the amount of the resulting stack.
    fn fetch_amount(
        &self,
        identifier: &str,
        parameters: &Parameters,
        amount: u32,
    ) -> Option<ItemStack> {
        self.fetch_with(identifier, parameters)
            .map(|stack| stack.with_amount(amount))
    }

    /// Reverse-lookup priority. Read once, when the listener is registered.
    fn priority(&self) -> Priority {
        Priority::Medium
    }

    /// Whether the provider finished loading. Listeners are dispatched to
    /// regardless.
    fn is_ready(&self) -> bool {
        true
    }

    fn available_items(&self) -> Vec<String> {
        Vec::new()
    }

    fn available_blocks(&self) -> Vec<String> {
        Vec::new()
    }

    /// The identifier of `stack` if this provider produced it.
    fn item_name(&self, stack: &ItemStack) -> Option<String> {
        let _ = stack;
        None
    }

    /// The parameters of `stack` if this provider tracks any.
    fn item_parameters(&self, stack: &ItemStack) -> Option<Parameters> {
        let _ = stack;
        None
    }

    fn is_item(&self, stack: &ItemStack, identifier: &str) -> bool {
        names_match(self.item_name(stack).as_deref(), identifier)
    }

    fn is_item_with(&self, stack: &ItemStack, identifier: &str, parameters: &Parameters) -> bool {
        self.is_item(stack, identifier)
            && parameters_match(self.item_parameters(stack).as_ref(), parameters)
    }

    /// The identifier of the block at `pos` if this provider placed it.
    fn block_name(&self, world: &dyn World, pos: &BlockPos) -> Option<String> {
        let _ = (world, pos);
        None
    }

    fn block_parameters(&self, world: &dyn World, pos: &BlockPos) -> Option<Parameters> {
        let _ = (world, pos);
        None
    }

    fn is_block(&self, world: &dyn World, pos: &BlockPos, identifier: &str) -> bool {
        names_match(self.block_name(world, pos).as_deref(), identifier)
    }

    fn is_block_with(
        &self,
        world: &dyn World,
        pos: &BlockPos,
        identifier: &str,
        parameters: &Parameters,
    ) -> bool {
        self.is_block(world, pos, identifier)
            && parameters_match(self.block_parameters(world, pos).as_ref(), parameters)
    }

    /// Place the block `identifier` at `pos`. Must not touch the world when
    /// returning `false`.
    fn set_block(&self, world: &mut dyn World, pos: &BlockPos, identifier: &str) -> bool {
        let _ = (world, pos, identifier);
        false
    }

    fn set_block_with(
        &self,
        world: &mut dyn World,
        pos: &BlockPos,
        identifier: &str,
        parameters: &Parameters,
    ) -> bool {
        let _ = parameters;
        self.set_block(world, pos, identifier)
    }

    /// Remove the block at `pos` if this provider manages it. Must not touch
    /// the world when returning `false`.
    fn remove_block(&self, world: &mut dyn World, pos: &BlockPos) -> bool {
        let _ = (world, pos);
        false
    }
}

/// Adapts a plain lookup closure into a [`Listener`].
pub struct FnListener<F> {
    fetch: F,
}

impl<F> FnListener<F>
where
    F: Fn(&str) -> Option<ItemStack>,
{
    pub fn new(fetch: F) -> Self {
        Self { fetch }
    }
}

impl<F> std::fmt::Debug for FnListener<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FnListener(<fn>)")
    }
}

impl<F> Listener for FnListener<F>
where
    F: Fn(&str) -> Option<ItemStack>,
{
    fn fetch(&self, identifier: &str) -> Option<ItemStack> {
        (self.fetch)(identifier)
    }
}
