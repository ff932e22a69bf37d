use crate::group::{ListenerEntry, ProviderGroup};
use crate::id::GroupId;
use crate::item::ItemStack;
use crate::key::VANILLA_NAMESPACE;
use crate::listener::{FnListener, Listener};
use crate::namespace::{AliasRejection, NamespaceRegistry};
use crate::priority_index::{PriorityIndex, Registration};
use crate::vanilla::VanillaProvider;
use slotmap::SlotMap;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Aliases the vanilla provider is seeded under unless overridden.
pub const DEFAULT_VANILLA_ALIASES: [&str; 2] = [VANILLA_NAMESPACE, "mc"];

/// Owner identity recorded for the vanilla group.
pub const VANILLA_OWNER: &str = "crossitem";

/// A provider seeded at bootstrap under reserved aliases.
#[derive(Debug)]
struct SeededProvider {
    owner: String,
    aliases: Vec<String>,
    listeners: Vec<Rc<dyn Listener>>,
}

/// Builder for a [`Registry`].
///
/// The builder is the only place reserved aliases can be bound. Once built,
/// the registry accepts ordinary registrations only.
#[derive(Debug)]
pub struct RegistryBuilder {
    vanilla: Option<Rc<dyn Listener>>,
    vanilla_aliases: Vec<String>,
    seeded: Vec<SeededProvider>,
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            vanilla: None,
            vanilla_aliases: DEFAULT_VANILLA_ALIASES.iter().map(|s| s.to_string()).collect(),
            seeded: Vec::new(),
        }
    }

    /// Replace the vanilla provider. Defaults to [`VanillaProvider::default`].
    pub fn vanilla(&mut self, listener: Rc<dyn Listener>) -> &mut Self {
        self.vanilla = Some(listener);
        self
    }

    /// Replace the aliases the vanilla provider is seeded under.
    pub fn vanilla_aliases<I, S>(&mut self, aliases: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vanilla_aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    /// Seed a built-in provider under aliases that may be reserved words.
    pub fn reserved_provider<I, S>(
        &mut self,
        owner: &str,
        aliases: I,
        listener: Rc<dyn Listener>,
    ) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.seeded.push(SeededProvider {
            owner: owner.to_string(),
            aliases: aliases.into_iter().map(Into::into).collect(),
            listeners: vec![listener],
        });
        self
    }

    /// Bind the seeded aliases and build the registry.
    pub fn build(self) -> Result<Registry, BuildError> {
        let vanilla: Rc<dyn Listener> = self
            .vanilla
            .unwrap_or_else(|| Rc::new(VanillaProvider::default()));

        let mut registry = Registry {
            groups: SlotMap::with_key(),
            namespaces: NamespaceRegistry::new(),
            index: PriorityIndex::new(),
            vanilla: vanilla.clone(),
        };

        let seeds = std::iter::once(SeededProvider {
            owner: VANILLA_OWNER.to_string(),
            aliases: self.vanilla_aliases,
            listeners: vec![vanilla],
        })
        .chain(self.seeded);

        for seed in seeds {
            if seed.owner.is_empty() {
                return Err(BuildError::EmptyOwner);
            }
            if seed.aliases.is_empty() {
                return Err(BuildError::NoAliases { owner: seed.owner });
            }
            let id = registry
                .groups
                .insert(ProviderGroup::new(seed.owner.as_str(), true));
            for alias in &seed.aliases {
                let accepted = registry
                    .namespaces
                    .claim_seeded(alias, id, &seed.owner)
                    .map_err(|reason| BuildError::Alias {
                        alias: alias.clone(),
                        owner: seed.owner.clone(),
                        reason,
                    })?;
                registry.groups[id].push_alias(accepted);
            }
            for listener in seed.listeners {
                registry.attach(id, listener);
            }
            tracing::debug!(owner = %seed.owner, aliases = ?seed.aliases, "seeded reserved provider");
        }

        Ok(registry)
    }
}

/// Namespace table, provider groups and priority index of one host.
///
/// Each registry is independent; ids and listeners never cross registries.
#[derive(Debug)]
pub struct Registry {
    groups: SlotMap<GroupId, ProviderGroup>,
    namespaces: NamespaceRegistry,
    index: PriorityIndex,
    vanilla: Rc<dyn Listener>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::builder()
            .build()
            .expect("default vanilla aliases are valid on an empty registry")
    }
}

impl Registry {
    /// A registry with only the default vanilla provider.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    // -----------------------------------------------------------------------
    // Groups
    // -----------------------------------------------------------------------

    /// Create a provider group for `owner`, binding each candidate alias
    /// that passes validation.
    ///
    /// Rejected aliases are logged and skipped. With no candidates, the
    /// owner identity itself is tried. The group is returned even when no
    /// alias was accepted; check [`ProviderGroup::is_valid`].
    pub fn create_group<I, S>(&mut self, owner: &str, aliases: I) -> Result<GroupId, RegistryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if owner.is_empty() {
            return Err(RegistryError::InvalidProducer);
        }

        let mut candidates: Vec<String> =
            aliases.into_iter().map(|a| a.as_ref().to_string()).collect();
        if candidates.is_empty() {
            candidates.push(owner.to_string());
        }

        let id = self.groups.insert(ProviderGroup::new(owner, false));
        for candidate in &candidates {
            match self.namespaces.claim(candidate, id, owner) {
                Ok(alias) => self.groups[id].push_alias(alias),
                Err(reason) => {
                    tracing::warn!(
                        alias = %candidate,
                        owner = %owner,
                        %reason,
                        "could not associate alias with producer"
                    );
                }
            }
        }

        let group = &self.groups[id];
        if group.is_valid() {
            tracing::info!(owner = %owner, aliases = ?group.aliases(), "attached aliases");
        } else {
            tracing::warn!(owner = %owner, "no alias accepted; provider group is invalid");
        }
        Ok(id)
    }

    pub fn group(&self, id: GroupId) -> Option<&ProviderGroup> {
        self.groups.get(id)
    }

    /// The group bound to `alias`, case-insensitive.
    pub fn group_for(&self, alias: &str) -> Option<GroupId> {
        self.namespaces.lookup(alias)
    }

    pub fn groups(&self) -> impl Iterator<Item = (GroupId, &ProviderGroup)> {
        self.groups.iter()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn is_valid(&self, id: GroupId) -> bool {
        self.groups.get(id).is_some_and(ProviderGroup::is_valid)
    }

    pub fn has_listeners(&self, id: GroupId) -> bool {
        self.groups.get(id).is_some_and(ProviderGroup::has_listeners)
    }

    pub fn listener_count(&self, id: GroupId) -> usize {
        self.groups.get(id).map_or(0, ProviderGroup::listener_count)
    }

    /// Default alias → every alias, for each valid group.
    pub fn enabled_namespaces(&self) -> BTreeMap<String, Vec<String>> {
        self.groups
            .values()
            .filter_map(|g| {
                g.default_alias()
                    .map(|d| (d.to_string(), g.aliases().to_vec()))
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Listeners
    // -----------------------------------------------------------------------

    /// Append `listener` to the group and to the priority index.
    ///
    /// Registering the same instance twice dispatches to it twice. Groups
    /// seeded at bootstrap only take listeners through the builder.
    pub fn register_listener(
        &mut self,
        group: GroupId,
        listener: Rc<dyn Listener>,
    ) -> Result<(), RegistryError> {
        let g = self.producer_group(group)?;
        if !g.is_valid() {
            return Err(RegistryError::InvalidGroup {
                owner: g.owner().to_string(),
            });
        }
        self.attach(group, listener);
        Ok(())
    }

    /// The group behind `id`, if it was created by a producer.
    fn producer_group(&self, id: GroupId) -> Result<&ProviderGroup, RegistryError> {
        let g = self.groups.get(id).ok_or(RegistryError::UnknownGroup)?;
        if g.is_seeded() {
            return Err(RegistryError::ReservedGroup {
                owner: g.owner().to_string(),
            });
        }
        Ok(g)
    }

    /// Register every listener in order, stopping at the first error.
    pub fn register_listeners<I>(&mut self, group: GroupId, listeners: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = Rc<dyn Listener>>,
    {
        for listener in listeners {
            self.register_listener(group, listener)?;
        }
        Ok(())
    }

    /// Register a plain lookup closure. Returns the listener handle so it
    /// can be removed later.
    pub fn register_fn<F>(&mut self, group: GroupId, fetch: F) -> Result<Rc<dyn Listener>, RegistryError>
    where
        F: Fn(&str) -> Option<ItemStack> + 'static,
    {
        let listener: Rc<dyn Listener> = Rc::new(FnListener::new(fetch));
        self.register_listener(group, listener.clone())?;
        Ok(listener)
    }

    fn attach(&mut self, group: GroupId, listener: Rc<dyn Listener>) {
        let priority = listener.priority();
        self.index
            .insert(priority, Registration::new(listener.clone(), group));
        self.groups[group].push_listener(ListenerEntry { listener, priority });
        tracing::debug!(?group, ?priority, "registered listener");
    }

    /// Remove the first registration of this listener instance from the
    /// group and the priority index. Returns whether anything was removed.
    pub fn remove_listener(
        &mut self,
        group: GroupId,
        listener: &Rc<dyn Listener>,
    ) -> Result<bool, RegistryError> {
        self.producer_group(group)?;
        let g = &mut self.groups[group];
        let Some(entry) = g.remove_listener(listener) else {
            return Ok(false);
        };
        self.index
            .remove(entry.priority, &Registration::new(entry.listener, group));
        Ok(true)
    }

    /// Remove every listener of the group. Returns how many were removed.
    pub fn remove_all_listeners(&mut self, group: GroupId) -> Result<usize, RegistryError> {
        self.producer_group(group)?;
        let entries = self.groups[group].take_listeners();
        for entry in &entries {
            self.index.remove(
                entry.priority,
                &Registration::new(entry.listener.clone(), group),
            );
        }
        Ok(entries.len())
    }

    // -----------------------------------------------------------------------
    // Lifecycle and introspection
    // -----------------------------------------------------------------------

    /// Drop every group created through [`Registry::create_group`], with its
    /// aliases and listeners. Bootstrap providers stay.
    pub fn reset(&mut self) {
        self.groups.retain(|_, g| g.is_seeded());
        let groups = &self.groups;
        self.index.retain_groups(|id| groups.contains_key(id));
        self.namespaces.release_unseeded();
        tracing::info!(remaining = self.groups.len(), "registry reset");
    }

    pub fn index(&self) -> &PriorityIndex {
        &self.index
    }

    pub fn namespaces(&self) -> &NamespaceRegistry {
        &self.namespaces
    }

    /// The provider behind the no-namespace lookups.
    pub fn vanilla(&self) -> &Rc<dyn Listener> {
        &self.vanilla
    }

    /// Group bound to a namespace, only if it is valid.
    pub(crate) fn resolvable_group(&self, namespace: &str) -> Option<(GroupId, &ProviderGroup)> {
        let id = self.namespaces.lookup(namespace)?;
        self.groups.get(id).map(|g| (id, g))
    }

    /// Registrations in priority order, skipping groups without a default
    /// alias.
    pub(crate) fn ranked(&self) -> impl Iterator<Item = (&Registration, &ProviderGroup)> {
        self.index
            .iter()
            .filter_map(|r| self.groups.get(r.group).map(|g| (r, g)))
            .filter(|(_, g)| g.is_valid())
    }

    // -----------------------------------------------------------------------
    // Availability
    // -----------------------------------------------------------------------

    /// Item identifiers offered by every listener of the namespace, or
    /// `None` for an unknown namespace.
    pub fn available_items(&self, namespace: &str) -> Option<Vec<String>> {
        let (_, group) = self.resolvable_group(namespace)?;
        Some(group.listeners().flat_map(|l| l.available_items()).collect())
    }

    pub fn available_blocks(&self, namespace: &str) -> Option<Vec<String>> {
        let (_, group) = self.resolvable_group(namespace)?;
        Some(group.listeners().flat_map(|l| l.available_blocks()).collect())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("the producer identity can not be empty")]
    InvalidProducer,
    #[error("unknown provider group")]
    UnknownGroup,
    #[error("provider group of '{owner}' has no accepted alias")]
    InvalidGroup { owner: String },
    #[error("provider group of '{owner}' is reserved for bootstrap providers")]
    ReservedGroup { owner: String },
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("seeded provider has an empty owner")]
    EmptyOwner,
    #[error("seeded provider '{owner}' has no aliases")]
    NoAliases { owner: String },
    #[error("could not seed alias '{alias}' for '{owner}': {reason}")]
    Alias {
        alias: String,
        owner: String,
        reason: AliasRejection,
    },
}
