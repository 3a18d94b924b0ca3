use std::collections::BTreeMap;

/// One protein of one reference species inside a core group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupMember {
    pub species: String,
    pub protein: String,
}

/// One ortholog group of the core set. Members keep the order they were
/// loaded in; the set is immutable after loading.
#[derive(Debug, Clone)]
pub struct CoreGroup {
    pub id: String,
    pub members: Vec<GroupMember>,
}

impl CoreGroup {
    pub fn has_species(&self, species: &str) -> bool {
        self.members.iter().any(|m| m.species == species)
    }
}

/// The curated core set used as the completeness yardstick.
#[derive(Debug, Clone)]
pub struct CoreSet {
    groups: BTreeMap<String, CoreGroup>,
}

impl CoreSet {
    pub fn new(groups: Vec<CoreGroup>) -> Self {
        let groups = groups.into_iter().map(|g| (g.id.clone(), g)).collect();
        Self { groups }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CoreGroup> {
        self.groups.get(id)
    }

    /// Groups in stable (lexicographic) id order.
    pub fn iter(&self) -> impl Iterator<Item = &CoreGroup> {
        self.groups.values()
    }
}
