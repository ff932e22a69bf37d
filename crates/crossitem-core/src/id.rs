use slotmap::new_key_type;

new_key_type! {
    /// Identifies a provider group in a [`Registry`](crate::registry::Registry).
    ///
    /// Ids are only meaningful for the registry that issued them.
    pub struct GroupId;
}
