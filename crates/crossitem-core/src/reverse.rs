//! Reverse resolution: stack or block → key, and block mutation.
//!
//! Every operation here walks the priority index from highest to lowest
//! priority, registration order within a level, and stops at the first
//! listener that answers. The vanilla provider sits at the lowest level, so
//! any producer claiming a plain material outranks it.

use crate::id::GroupId;
use crate::item::{ItemStack, Parameters};
use crate::key::{Key, VANILLA_NAMESPACE, split_combined};
use crate::listener::Listener;
use crate::registry::Registry;
use crate::world::{BlockPos, World};
use std::rc::Rc;

impl Registry {
    /// The key of the producer that claims `stack`, if any.
    pub fn identify(&self, stack: &ItemStack) -> Option<Key> {
        self.ranked().find_map(|(reg, group)| {
            let name = reg.listener.item_name(stack)?;
            Key::new(group.default_alias()?, name).ok()
        })
    }

    /// Parameters of `stack`, from the first listener that tracks any.
    pub fn identify_parameters(&self, stack: &ItemStack) -> Option<Parameters> {
        self.ranked()
            .find_map(|(reg, _)| reg.listener.item_parameters(stack))
    }

    /// The key of the block at `pos`. Never absent: an unclaimed block is
    /// keyed by its raw material in the vanilla namespace.
    pub fn block_identify(&self, world: &dyn World, pos: &BlockPos) -> Key {
        self.ranked()
            .find_map(|(reg, group)| {
                let name = reg.listener.block_name(world, pos)?;
                Key::new(group.default_alias()?, name).ok()
            })
            .unwrap_or_else(|| Key::vanilla(world.block(pos).material))
    }

    pub fn block_parameters(&self, world: &dyn World, pos: &BlockPos) -> Option<Parameters> {
        self.ranked()
            .find_map(|(reg, _)| reg.listener.block_parameters(world, pos))
    }

    /// Whether the block at `pos` is `identifier` in `namespace` with exactly
    /// these parameters. `None` asks the vanilla provider only.
    pub fn block_matches(
        &self,
        world: &dyn World,
        pos: &BlockPos,
        namespace: Option<&str>,
        identifier: &str,
        parameters: &Parameters,
    ) -> bool {
        let Some(namespace) = namespace else {
            return self
                .vanilla()
                .is_block_with(world, pos, identifier, parameters);
        };
        self.ranked_in(namespace)
            .any(|l| l.is_block_with(world, pos, identifier, parameters))
    }

    /// Place `identifier` from `namespace` at `pos`. The first listener that
    /// reports success wins. Returns `false` for an unknown namespace.
    pub fn set_block(
        &self,
        world: &mut dyn World,
        pos: &BlockPos,
        namespace: Option<&str>,
        identifier: &str,
        parameters: &Parameters,
    ) -> bool {
        let placed = match namespace {
            None => self
                .vanilla()
                .set_block_with(world, pos, identifier, parameters),
            Some(namespace) => self
                .ranked_in(namespace)
                .any(|l| l.set_block_with(world, pos, identifier, parameters)),
        };
        if placed {
            tracing::trace!(?namespace, identifier, ?pos, "placed block");
        }
        placed
    }

    /// [`Registry::set_block`] with a combined `namespace:identifier`. A
    /// string without a separator is placed from the `minecraft` namespace.
    pub fn set_block_str(
        &self,
        world: &mut dyn World,
        pos: &BlockPos,
        combined: &str,
        parameters: &Parameters,
    ) -> bool {
        let (namespace, identifier) = split_combined(combined);
        self.set_block(
            world,
            pos,
            Some(namespace.unwrap_or(VANILLA_NAMESPACE)),
            identifier,
            parameters,
        )
    }

    /// Remove the block at `pos` through the first listener that manages it.
    pub fn remove_block(&self, world: &mut dyn World, pos: &BlockPos) -> bool {
        self.ranked()
            .any(|(reg, _)| reg.listener.remove_block(world, pos))
    }

    /// Listeners of the namespace's group, in global priority order.
    fn ranked_in(&self, namespace: &str) -> impl Iterator<Item = &Rc<dyn Listener>> {
        let target: Option<GroupId> = self.group_for(namespace);
        self.index()
            .iter()
            .filter(move |r| Some(r.group) == target)
            .map(|r| &r.listener)
    }
}

#[cfg(test)]
mod tests {
    use crate::item::{ItemStack, Parameters};
    use crate::key::Key;
    use crate::listener::Listener;
    use crate::priority::Priority;
    use crate::registry::Registry;
    use crate::world::{BlockPos, BlockState, GridWorld, World};
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Claims every stack or block of one material under a fixed name.
    #[derive(Debug)]
    struct Claim {
        material: &'static str,
        name: &'static str,
        priority: Priority,
        parameters: Option<Parameters>,
        places: bool,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Claim {
        fn new(material: &'static str, name: &'static str, priority: Priority) -> Self {
            Self {
                material,
                name,
                priority,
                parameters: None,
                places: false,
                log: Rc::default(),
            }
        }
    }

    impl Listener for Claim {
        fn fetch(&self, identifier: &str) -> Option<ItemStack> {
            (identifier == self.name).then(|| ItemStack::new(self.material, 1))
        }

        fn priority(&self) -> Priority {
            self.priority
        }

        fn item_name(&self, stack: &ItemStack) -> Option<String> {
            (stack.material == self.material).then(|| self.name.to_string())
        }

        fn item_parameters(&self, stack: &ItemStack) -> Option<Parameters> {
            self.item_name(stack)?;
            self.parameters.clone()
        }

        fn block_name(&self, world: &dyn World, pos: &BlockPos) -> Option<String> {
            (world.block(pos).material == self.material).then(|| self.name.to_string())
        }

        fn block_parameters(&self, world: &dyn World, pos: &BlockPos) -> Option<Parameters> {
            self.block_name(world, pos)?;
            self.parameters.clone()
        }

        fn set_block(&self, world: &mut dyn World, pos: &BlockPos, identifier: &str) -> bool {
            self.log.borrow_mut().push(self.name);
            if !self.places || identifier != self.name {
                return false;
            }
            world.set_block(pos.clone(), BlockState::new(self.material));
            true
        }

        fn remove_block(&self, world: &mut dyn World, pos: &BlockPos) -> bool {
            if world.block(pos).material != self.material {
                return false;
            }
            world.clear_block(pos);
            true
        }
    }

    fn register(reg: &mut Registry, alias: &str, claim: Claim) {
        let id = reg
            .group_for(alias)
            .unwrap_or_else(|| reg.create_group(alias, [alias]).unwrap());
        reg.register_listener(id, Rc::new(claim)).unwrap();
    }

    #[test]
    fn higher_priority_claim_wins() {
        let mut reg = Registry::new();
        register(&mut reg, "decor", Claim::new("GLOWSTONE", "GLOWSTONE", Priority::Medium));
        register(&mut reg, "lights", Claim::new("GLOWSTONE", "GLOWSTONE", Priority::High));

        let key = reg.identify(&ItemStack::new("GLOWSTONE", 1)).unwrap();
        assert_eq!(key.to_string(), "lights:GLOWSTONE");
    }

    #[test]
    fn registration_order_breaks_ties() {
        let mut reg = Registry::new();
        register(&mut reg, "first", Claim::new("GLOWSTONE", "a", Priority::Medium));
        register(&mut reg, "second", Claim::new("GLOWSTONE", "b", Priority::Medium));
        let key = reg.identify(&ItemStack::new("GLOWSTONE", 1)).unwrap();
        assert_eq!(key.to_string(), "first:a");
    }

    #[test]
    fn vanilla_answers_when_nobody_claims() {
        let mut reg = Registry::new();
        register(&mut reg, "decor", Claim::new("GLOWSTONE", "lamp", Priority::Medium));
        let key = reg.identify(&ItemStack::new("DIRT", 1)).unwrap();
        assert_eq!(key, Key::vanilla("DIRT"));
    }

    #[test]
    fn lowest_producer_registered_after_vanilla_loses() {
        let mut reg = Registry::new();
        register(&mut reg, "late", Claim::new("DIRT", "mud", Priority::Lowest));
        assert_eq!(
            reg.identify(&ItemStack::new("DIRT", 1)),
            Some(Key::vanilla("DIRT"))
        );
    }

    #[test]
    fn identify_is_absent_without_any_claim() {
        let mut builder = Registry::builder();
        builder.vanilla(Rc::new(Claim::new("NONE", "none", Priority::Lowest)));
        let reg = builder.build().unwrap();
        assert!(reg.identify(&ItemStack::new("DIRT", 1)).is_none());
    }

    #[test]
    fn identify_uses_default_alias() {
        let mut reg = Registry::new();
        let id = reg.create_group("p", ["decor", "deco"]).unwrap();
        reg.register_listener(id, Rc::new(Claim::new("GLOWSTONE", "lamp", Priority::Medium)))
            .unwrap();
        let key = reg.identify(&ItemStack::new("GLOWSTONE", 1)).unwrap();
        assert_eq!(key.namespace(), "decor");
    }

    #[test]
    fn identify_parameters_first_non_absent_wins() {
        let mut reg = Registry::new();
        register(&mut reg, "quiet", Claim::new("GLOWSTONE", "lamp", Priority::Highest));
        let mut loud = Claim::new("GLOWSTONE", "lamp", Priority::High);
        let mut params = Parameters::new();
        params.insert("color".into(), json!("red"));
        loud.parameters = Some(params.clone());
        register(&mut reg, "loud", loud);

        assert_eq!(reg.identify_parameters(&ItemStack::new("GLOWSTONE", 1)), Some(params));
        assert!(reg.identify_parameters(&ItemStack::new("DIRT", 1)).is_none());
    }

    #[test]
    fn block_identify_falls_back_to_raw_material() {
        let mut reg = Registry::new();
        register(&mut reg, "decor", Claim::new("GLOWSTONE", "lamp", Priority::High));
        let mut world = GridWorld::new();
        let lamp = BlockPos::new("w", 0, 0, 0);
        let air = BlockPos::new("w", 0, 1, 0);
        world.set_block(lamp.clone(), BlockState::new("GLOWSTONE"));

        assert_eq!(reg.block_identify(&world, &lamp).to_string(), "decor:lamp");
        assert_eq!(reg.block_identify(&world, &air), Key::vanilla("AIR"));
    }

    #[test]
    fn block_parameters_follow_priority() {
        let mut reg = Registry::new();
        let mut claim = Claim::new("GLOWSTONE", "lamp", Priority::Medium);
        let mut params = Parameters::new();
        params.insert("lit".into(), json!(true));
        claim.parameters = Some(params.clone());
        register(&mut reg, "decor", claim);

        let mut world = GridWorld::new();
        let pos = BlockPos::new("w", 0, 0, 0);
        world.set_block(pos.clone(), BlockState::new("GLOWSTONE"));
        assert_eq!(reg.block_parameters(&world, &pos), Some(params.clone()));
        assert!(reg.block_matches(&world, &pos, Some("decor"), "lamp", &params));
        assert!(!reg.block_matches(&world, &pos, Some("decor"), "lamp", &Parameters::new()));
        assert!(!reg.block_matches(&world, &pos, Some("other"), "lamp", &params));
    }

    #[test]
    fn block_matches_without_namespace_uses_vanilla() {
        let reg = Registry::new();
        let mut world = GridWorld::new();
        let pos = BlockPos::new("w", 0, 0, 0);
        world.set_block(pos.clone(), BlockState::new("STONE"));
        assert!(reg.block_matches(&world, &pos, None, "stone", &Parameters::new()));
        assert!(!reg.block_matches(&world, &pos, None, "dirt", &Parameters::new()));
    }

    #[test]
    fn set_block_visits_group_listeners_by_priority() {
        let mut reg = Registry::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let id = reg.create_group("p", ["decor"]).unwrap();

        let mut low = Claim::new("STONE", "low", Priority::Low);
        low.log = log.clone();
        let mut high = Claim::new("GLOWSTONE", "high", Priority::High);
        high.log = log.clone();
        high.places = true;
        reg.register_listener(id, Rc::new(low)).unwrap();
        reg.register_listener(id, Rc::new(high)).unwrap();

        let mut world = GridWorld::new();
        let pos = BlockPos::new("w", 0, 0, 0);
        assert!(!reg.set_block(&mut world, &pos, Some("decor"), "missing", &Parameters::new()));
        assert_eq!(*log.borrow(), vec!["high", "low"]);
        assert_eq!(world.block_count(), 0);

        assert!(reg.set_block(&mut world, &pos, Some("decor"), "high", &Parameters::new()));
        assert_eq!(world.block(&pos).material, "GLOWSTONE");
    }

    #[test]
    fn set_block_unknown_namespace_fails() {
        let reg = Registry::new();
        let mut world = GridWorld::new();
        let pos = BlockPos::new("w", 0, 0, 0);
        assert!(!reg.set_block(&mut world, &pos, Some("nowhere"), "stone", &Parameters::new()));
        assert_eq!(world.block_count(), 0);
    }

    #[test]
    fn set_block_str_defaults_to_vanilla() {
        let reg = Registry::new();
        let mut world = GridWorld::new();
        let pos = BlockPos::new("w", 2, 64, 2);
        assert!(reg.set_block_str(&mut world, &pos, "cobblestone", &Parameters::new()));
        assert_eq!(world.block(&pos).material, "COBBLESTONE");
        assert!(reg.set_block(&mut world, &pos, None, "dirt", &Parameters::new()));
        assert_eq!(world.block(&pos).material, "DIRT");
        assert!(!reg.set_block_str(&mut world, &pos, "mc:diamond", &Parameters::new()));
        assert_eq!(world.block(&pos).material, "DIRT");
    }

    #[test]
    fn remove_block_first_success_wins() {
        let mut reg = Registry::new();
        register(&mut reg, "decor", Claim::new("GLOWSTONE", "lamp", Priority::Medium));
        let mut world = GridWorld::new();
        let lamp = BlockPos::new("w", 0, 0, 0);
        let stone = BlockPos::new("w", 1, 0, 0);
        world.set_block(lamp.clone(), BlockState::new("GLOWSTONE"));
        world.set_block(stone.clone(), BlockState::new("STONE"));

        assert!(reg.remove_block(&mut world, &lamp));
        assert!(world.block(&lamp).is_air());
        // vanilla provider does not manage removal
        assert!(!reg.remove_block(&mut world, &stone));
        assert_eq!(world.block(&stone).material, "STONE");
    }

    #[test]
    fn removed_listener_no_longer_claims() {
        let mut reg = Registry::new();
        let id = reg.create_group("p", ["lights"]).unwrap();
        let claim: Rc<dyn Listener> =
            Rc::new(Claim::new("GLOWSTONE", "GLOWSTONE", Priority::Highest));
        reg.register_listener(id, claim.clone()).unwrap();
        assert_eq!(
            reg.identify(&ItemStack::new("GLOWSTONE", 1)).unwrap().namespace(),
            "lights"
        );

        reg.remove_listener(id, &claim).unwrap();
        assert_eq!(
            reg.identify(&ItemStack::new("GLOWSTONE", 1)),
            Some(Key::vanilla("GLOWSTONE"))
        );
    }
}
