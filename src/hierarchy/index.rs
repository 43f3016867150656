//! Manager → direct-reports adjacency over a borrowed person list.

use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use orgchart_types::Person;

/// Read-only subordinate queries. Built in O(n); lookups are O(1) except the
/// transitive walks, which are bounded by visited sets so cyclic manager
/// chains terminate.
#[derive(Debug, Clone, Default)]
pub struct SubordinateIndex<'a> {
    by_id: HashMap<&'a str, &'a Person>,
    reports: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> SubordinateIndex<'a> {
    pub fn new(people: &'a [Person]) -> Self {
        let mut by_id: HashMap<&'a str, &'a Person> = HashMap::with_capacity(people.len());
        let mut reports: HashMap<&'a str, Vec<&'a str>> = HashMap::new();

        for person in people {
            if by_id.contains_key(person.id.as_str()) {
                continue;
            }
            by_id.insert(person.id.as_str(), person);
            if let Some(manager) = person.manager_ref() {
                reports.entry(manager).or_default().push(person.id.as_str());
            }
        }

        Self { by_id, reports }
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn person(&self, id: &str) -> Option<&'a Person> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn manager_of(&self, id: &str) -> Option<&'a str> {
        self.person(id).and_then(Person::manager_ref)
    }

    /// Direct reports in input order.
    pub fn direct_reports_of(&self, id: &str) -> &[&'a str] {
        self.reports.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn direct_report_ids(&self, id: &str) -> BTreeSet<String> {
        self.direct_reports_of(id)
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_subordinates(&self, id: &str) -> bool {
        !self.direct_reports_of(id).is_empty()
    }

    pub fn is_direct_subordinate(&self, person_id: &str, manager_id: &str) -> bool {
        self.manager_of(person_id) == Some(manager_id)
    }

    /// Walks manager pointers upward from `person_id`. A revisited id means
    /// the chain is cyclic and the answer is `false`.
    pub fn is_subordinate_of(&self, person_id: &str, manager_id: &str) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut current = self.manager_of(person_id);

        while let Some(id) = current {
            if !visited.insert(id) {
                return false;
            }
            if id == manager_id {
                return true;
            }
            current = self.manager_of(id);
        }

        false
    }

    /// The person themself or anyone below them.
    pub fn is_in_team(&self, person_id: &str, leader_id: &str) -> bool {
        person_id == leader_id || self.is_subordinate_of(person_id, leader_id)
    }

    /// Transitive closure of direct reports, excluding `manager_id` itself.
    pub fn all_subordinates_of(&self, manager_id: &str) -> BTreeSet<String> {
        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(manager_id);
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(manager_id);
        let mut result = BTreeSet::new();

        while let Some(current) = queue.pop_front() {
            for &report in self.direct_reports_of(current) {
                if visited.insert(report) {
                    result.insert(report.to_string());
                    queue.push_back(report);
                }
            }
        }

        result
    }
}
