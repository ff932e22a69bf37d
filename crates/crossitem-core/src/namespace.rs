//! Alias table mapping namespaces to provider groups.
//!
//! Aliases are case-folded to lower case, restricted to `[a-z0-9._-]`, and
//! unique across the table. Words in [`RESERVED_ALIASES`] can only be bound
//! through the bootstrap path used for the built-in providers.

use crate::id::GroupId;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Aliases no ordinary registration may claim.
pub const RESERVED_ALIASES: [&str; 18] = [
    "minecraft",
    "mc",
    "mojang",
    "itembridge",
    "item",
    "block",
    "entity",
    "mob",
    "monster",
    "potion",
    "saved",
    "save",
    "saves",
    "bukkit",
    "spigot",
    "paper",
    "null",
    "resource",
];

static ALIAS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9._-]+$").expect("alias pattern is valid"));

/// Why a single alias was not bound. Never fatal to the registration call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AliasRejection {
    #[error("aliases cannot be empty")]
    Empty,
    #[error("aliases can only contain letters, numbers, dots, dashes, and underscores")]
    InvalidCharset,
    #[error("this alias is reserved")]
    Reserved,
    #[error("the alias is already in use by '{owner}'")]
    InUse { owner: String },
}

/// Whether `alias` is a reserved word, ignoring case.
pub fn is_reserved(alias: &str) -> bool {
    let lower = alias.to_lowercase();
    RESERVED_ALIASES.contains(&lower.as_str())
}

/// Lower-case `alias` and check its shape. Does not check reservation or
/// collisions.
pub fn normalize_alias(alias: &str) -> Result<String, AliasRejection> {
    let lower = alias.to_lowercase();
    if lower.is_empty() {
        return Err(AliasRejection::Empty);
    }
    if !ALIAS_PATTERN.is_match(&lower) {
        return Err(AliasRejection::InvalidCharset);
    }
    Ok(lower)
}

#[derive(Debug, Clone)]
struct Binding {
    group: GroupId,
    owner: String,
    seeded: bool,
}

/// Alias → group table of one registry.
#[derive(Debug, Default)]
pub struct NamespaceRegistry {
    bindings: HashMap<String, Binding>,
}

impl NamespaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `alias` to `group` for an ordinary producer. Returns the
    /// normalized alias.
    pub fn claim(
        &mut self,
        alias: &str,
        group: GroupId,
        owner: &str,
    ) -> Result<String, AliasRejection> {
        let alias = normalize_alias(alias)?;
        if is_reserved(&alias) {
            return Err(AliasRejection::Reserved);
        }
        self.bind(alias, group, owner, false)
    }

    /// Bootstrap binding: skips the reserved-word check.
    pub(crate) fn claim_seeded(
        &mut self,
        alias: &str,
        group: GroupId,
        owner: &str,
    ) -> Result<String, AliasRejection> {
        let alias = normalize_alias(alias)?;
        self.bind(alias, group, owner, true)
    }

    fn bind(
        &mut self,
        alias: String,
        group: GroupId,
        owner: &str,
        seeded: bool,
    ) -> Result<String, AliasRejection> {
        if let Some(existing) = self.bindings.get(&alias) {
            return Err(AliasRejection::InUse {
                owner: existing.owner.clone(),
            });
        }
        self.bindings.insert(
            alias.clone(),
            Binding {
                group,
                owner: owner.to_string(),
                seeded,
            },
        );
        Ok(alias)
    }

    /// The group bound to `alias`, compared case-insensitively.
    pub fn lookup(&self, alias: &str) -> Option<GroupId> {
        self.bindings.get(&alias.to_lowercase()).map(|b| b.group)
    }

    /// The producer that owns `alias`.
    pub fn owner_of(&self, alias: &str) -> Option<&str> {
        self.bindings
            .get(&alias.to_lowercase())
            .map(|b| b.owner.as_str())
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.bindings.contains_key(&alias.to_lowercase())
    }

    /// Drop every binding that was not seeded at bootstrap.
    pub(crate) fn release_unseeded(&mut self) {
        self.bindings.retain(|_, b| b.seeded);
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
