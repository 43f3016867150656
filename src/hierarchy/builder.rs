//! Flat person list → reporting forest.

use std::collections::{HashMap, VecDeque};

use orgchart_types::Person;
use serde::Serialize;

use super::index::SubordinateIndex;

/// Deepest level a built tree holds. A report that would sit below it starts
/// a new root at level 0, so every tree stays shallow enough to clone, drop
/// and serialize without exhausting the stack.
pub const MAX_TREE_LEVEL: u32 = 256;

/// Counters describing one build, for logging and diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HierarchyStats {
    pub people: usize,
    pub roots: usize,
    /// Roots whose declared manager is not in the loaded set.
    pub orphans: usize,
    /// Records skipped because their id was already seen.
    pub duplicates: usize,
    /// Subtrees re-rooted because they hung below [`MAX_TREE_LEVEL`].
    pub rerooted: usize,
    pub max_depth: u32,
}

/// Result of a build: the forest for layout plus the untouched flat list.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrgHierarchy {
    pub forest: Vec<Person>,
    pub all_people: Vec<Person>,
    pub stats: HierarchyStats,
}

impl OrgHierarchy {
    pub fn index(&self) -> SubordinateIndex<'_> {
        SubordinateIndex::new(&self.all_people)
    }

    pub fn is_empty(&self) -> bool {
        self.all_people.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&Person> {
        find_in_forest(&self.forest, id)
    }
}

pub struct HierarchyBuilder;

impl HierarchyBuilder {
    /// Build the forest in O(n). Never fails: a manager reference that does not
    /// resolve makes the person a root, duplicate ids keep the first record.
    pub fn build(people: &[Person]) -> OrgHierarchy {
        let mut slot_of: HashMap<&str, usize> = HashMap::with_capacity(people.len());
        let mut duplicates = 0;
        for (slot, person) in people.iter().enumerate() {
            if slot_of.contains_key(person.id.as_str()) {
                duplicates += 1;
                tracing::warn!(person_id = %person.id, "duplicate person id ignored");
                continue;
            }
            slot_of.insert(person.id.as_str(), slot);
        }

        let mut children: Vec<Vec<usize>> = vec![Vec::new(); people.len()];
        let mut roots = Vec::new();
        let mut orphans = 0;

        for (slot, person) in people.iter().enumerate() {
            if slot_of.get(person.id.as_str()) != Some(&slot) {
                continue;
            }
            match person.manager_ref().and_then(|m| slot_of.get(m)) {
                Some(&manager_slot) => children[manager_slot].push(slot),
                None => {
                    if person.manager_ref().is_some() {
                        orphans += 1;
                    }
                    roots.push(slot);
                }
            }
        }

        let mut max_depth = 0;
        let mut rerooted = 0;
        let mut queue: VecDeque<usize> = roots.into();
        let mut forest = Vec::with_capacity(queue.len());

        // Nodes reachable from a root cannot sit on a manager cycle, so this terminates.
        while let Some(root) = queue.pop_front() {
            let tree = assemble(
                root,
                node_at(people, root, 0),
                |slot, level| Some(node_at(people, slot, level)),
                |slot, level| {
                    max_depth = max_depth.max(level);
                    if level < MAX_TREE_LEVEL {
                        return children[slot].clone();
                    }
                    rerooted += children[slot].len();
                    queue.extend(&children[slot]);
                    Vec::new()
                },
            );
            forest.push(tree);
        }

        let stats = HierarchyStats {
            people: people.len(),
            roots: forest.len(),
            orphans,
            duplicates,
            rerooted,
            max_depth,
        };
        if rerooted > 0 {
            tracing::warn!(
                rerooted,
                max_level = MAX_TREE_LEVEL,
                "reporting chain too deep, subtrees re-rooted"
            );
        }
        tracing::debug!(?stats, "hierarchy built");

        OrgHierarchy {
            forest,
            all_people: people.iter().map(Person::detached).collect(),
            stats,
        }
    }
}

fn node_at(people: &[Person], slot: usize, level: u32) -> Person {
    let mut node = people[slot].detached();
    node.level = level;
    node
}

/// Build the tree under `root` without recursion.
///
/// `children_of(key, level)` lists the keys to place under the node at
/// `level`; `node_for(key, level)` materializes one of them, or skips it by
/// returning `None`. Children keep the order `children_of` returns.
pub(crate) fn assemble<K: Copy>(
    root_key: K,
    mut root: Person,
    mut node_for: impl FnMut(K, u32) -> Option<Person>,
    mut children_of: impl FnMut(K, u32) -> Vec<K>,
) -> Person {
    let mut root_pending = children_of(root_key, root.level).into_iter();
    let mut stack: Vec<(Person, std::vec::IntoIter<K>)> = Vec::new();

    loop {
        let (level, next) = match stack.last_mut() {
            Some((node, pending)) => (node.level + 1, pending.next()),
            None => (root.level + 1, root_pending.next()),
        };
        match next {
            Some(key) => {
                if let Some(node) = node_for(key, level) {
                    let pending = children_of(key, level).into_iter();
                    stack.push((node, pending));
                }
            }
            None => match stack.pop() {
                Some((done, _)) => match stack.last_mut() {
                    Some((parent, _)) => parent.children.push(done),
                    None => root.children.push(done),
                },
                None => return root,
            },
        }
    }
}

/// Pre-order listing of every node in `forest`.
pub fn flatten(forest: &[Person]) -> Vec<&Person> {
    let mut out = Vec::new();
    let mut stack: Vec<&Person> = forest.iter().rev().collect();
    while let Some(person) = stack.pop() {
        out.push(person);
        stack.extend(person.children.iter().rev());
    }
    out
}

pub fn find_in_forest<'a>(forest: &'a [Person], id: &str) -> Option<&'a Person> {
    flatten(forest).into_iter().find(|p| p.id == id)
}

/// Number of people in the subtree, the root included.
pub fn subtree_size(person: &Person) -> usize {
    flatten(std::slice::from_ref(person)).len()
}
