//! Identity and parameter comparison used by the `is_item`/`is_block`
//! defaults of [`Listener`](crate::listener::Listener).
//!
//! Two cases are kept apart on purpose:
//!
//! - the provider reports **no** parameters (`None`): the object matches only
//!   a lookup that asked for no parameters;
//! - the provider reports a map, possibly empty: both maps must hold exactly
//!   the same entries, compared in both directions.

use crate::item::Parameters;

/// Case-insensitive name comparison. `None` never matches.
pub fn names_match(reported: Option<&str>, identifier: &str) -> bool {
    reported.is_some_and(|name| name.eq_ignore_ascii_case(identifier))
}

/// Compare the parameters an object reports against the requested ones.
pub fn parameters_match(current: Option<&Parameters>, requested: &Parameters) -> bool {
    match current {
        None => requested.is_empty(),
        Some(current) => contained_in(requested, current) && contained_in(current, requested),
    }
}

/// Every entry of `a` has an equal value under the same key in `b`.
/// A key missing from `b` is a mismatch.
fn contained_in(a: &Parameters, b: &Parameters) -> bool {
    a.iter().all(|(k, v)| b.get(k) == Some(v))
}
