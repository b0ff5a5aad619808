//! Version moniker sets

use itertools::Itertools;

/// Set of version monikers a node is visible for.
///
/// The default (empty) list places no restriction: a node without monikers is
/// visible for every version. Lists are stored sorted and deduplicated so
/// equality is structural.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MonikerList {
    monikers: Vec<String>,
}

impl MonikerList {
    /// Build a list from any collection of moniker names
    pub fn new<I, S>(monikers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut monikers: Vec<String> = monikers.into_iter().map(Into::into).collect();
        monikers.sort();
        monikers.dedup();
        Self { monikers }
    }

    /// True when this list places no version restriction
    pub fn is_default(&self) -> bool {
        self.monikers.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.monikers
    }

    /// Union of several moniker lists.
    ///
    /// An unrestricted member makes the whole union unrestricted, so the
    /// union short-circuits to default as soon as one contributing list is
    /// default.
    pub fn union<'a, I>(lists: I) -> MonikerList
    where
        I: IntoIterator<Item = &'a MonikerList>,
    {
        let mut members = Vec::new();
        for list in lists {
            if list.is_default() {
                return MonikerList::default();
            }
            members.push(&list.monikers);
        }

        MonikerList {
            monikers: members
                .iter()
                .map(|monikers| monikers.iter().cloned())
                .kmerge()
                .dedup()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sorts_and_dedups() {
        let list = MonikerList::new(["v2", "v1", "v2"]);
        assert_eq!(list.as_slice(), ["v1", "v2"]);
        assert_eq!(list, MonikerList::new(["v1", "v2", "v1"]));
    }

    #[test]
    fn test_union_merges_members() {
        let a = MonikerList::new(["v1", "v2"]);
        let b = MonikerList::new(["v2", "v3"]);

        let union = MonikerList::union([&a, &b]);
        assert_eq!(union.as_slice(), ["v1", "v2", "v3"]);
    }

    #[test]
    fn test_union_with_unrestricted_member_is_unrestricted() {
        let restricted = MonikerList::new(["v1"]);
        let unrestricted = MonikerList::default();

        let union = MonikerList::union([&restricted, &unrestricted]);
        assert!(union.is_default());
    }

    #[test]
    fn test_union_of_nothing_is_default() {
        assert!(MonikerList::union(Vec::new()).is_default());
    }
}
