/// Reverse-lookup priority of a listener. `Highest` is consulted first.
///
/// Priority only orders reverse resolution (stack or block to key) across
/// every registered group. Forward lookups inside one namespace ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    Highest = 0,
    High = 1,
    #[default]
    Medium = 2,
    Low = 3,
    Lowest = 4,
}

/// Total number of priority levels.
pub const PRIORITY_COUNT: usize = 5;

impl Priority {
    /// All levels in traversal order, highest first.
    pub const ALL: [Priority; PRIORITY_COUNT] = [
        Priority::Highest,
        Priority::High,
        Priority::Medium,
        Priority::Low,
        Priority::Lowest,
    ];

    /// Convert to usize index for array lookups.
    pub(crate) fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_highest_first() {
        assert_eq!(Priority::ALL[0], Priority::Highest);
        assert_eq!(Priority::ALL[PRIORITY_COUNT - 1], Priority::Lowest);
        assert!(Priority::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn default_is_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn index_matches_position() {
        for (i, p) in Priority::ALL.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
    }
}
