//! Reporting hierarchy: forest construction, subordinate queries and
//! data-quality validation.
//!
//! ```text
//! flat Person list ──► HierarchyBuilder ──► OrgHierarchy { forest, all_people }
//!        │
//!        ├──────────► SubordinateIndex (manager → direct reports, upward walks)
//!        └──────────► validate() (cycles, duplicates, dangling managers)
//! ```

mod builder;
mod index;
mod validate;

pub use builder::{
    find_in_forest, flatten, subtree_size, HierarchyBuilder, HierarchyStats, OrgHierarchy,
    MAX_TREE_LEVEL,
};
pub(crate) use builder::assemble;
pub use index::SubordinateIndex;
pub use validate::{validate, HierarchyIssue, HierarchyValidation};
