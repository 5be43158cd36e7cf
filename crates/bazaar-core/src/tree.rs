//! Category tree assembly and integrity guards.
//!
//! The read side ([`build_forest`]) is lenient: a row whose parent is
//! missing from the input becomes a root, and nothing ever errors.
//! The write side ([`ensure_reparent_allowed`], [`ensure_no_children`])
//! enforces the invariants: no category may be its own ancestor, and a
//! category with children cannot be deleted.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::BazaarError;
use crate::models::category::Category;

/// Depth bound for ancestor walks. The walk fails closed when the
/// bound is exceeded, so corrupt data with a pre-existing cycle cannot
/// loop forever.
pub const MAX_TREE_DEPTH: usize = 32;

/// Violations of the category tree invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("a category cannot be its own parent")]
    SelfParent,

    #[error("moving the category under this parent would create a cycle")]
    CircularReference,

    #[error("category has {count} child categories and cannot be deleted")]
    HasChildren { count: u64 },

    #[error("parent category not found: {id}")]
    ParentNotFound { id: Uuid },
}

impl From<TreeError> for BazaarError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::ParentNotFound { id } => BazaarError::NotFound {
                entity: "category".into(),
                id: id.to_string(),
            },
            other => BazaarError::Validation {
                message: other.to_string(),
            },
        }
    }
}

/// A category with its resolved children, as served by the tree view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryNode {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<Uuid>,
    pub children: Vec<CategoryNode>,
}

/// Assemble flat category rows into a forest.
///
/// First pass indexes the input ids; second pass attaches each row to
/// its parent's children list, preserving input order (callers pass
/// rows sorted by name). A row with no parent, a parent missing from
/// the input, or a parent equal to itself becomes a root.
pub fn build_forest(rows: Vec<Category>) -> Vec<CategoryNode> {
    let ids: HashSet<Uuid> = rows.iter().map(|c| c.id).collect();

    let mut children_of: HashMap<Uuid, Vec<Category>> = HashMap::new();
    let mut roots: Vec<Category> = Vec::new();
    for row in rows {
        match row.parent_id {
            Some(parent) if parent != row.id && ids.contains(&parent) => {
                children_of.entry(parent).or_default().push(row);
            }
            _ => roots.push(row),
        }
    }

    roots
        .into_iter()
        .map(|row| assemble(row, &mut children_of))
        .collect()
}

fn assemble(row: Category, children_of: &mut HashMap<Uuid, Vec<Category>>) -> CategoryNode {
    let children = children_of
        .remove(&row.id)
        .unwrap_or_default()
        .into_iter()
        .map(|child| assemble(child, children_of))
        .collect();

    CategoryNode {
        id: row.id,
        name: row.name,
        slug: row.slug,
        parent_id: row.parent_id,
        children,
    }
}

/// Check that setting `new_parent_id` as the parent of `id` keeps the
/// tree acyclic.
///
/// `parents` maps every existing category to its current parent (one
/// bulk read of the table). The target parent's ancestor chain is
/// walked upward at most `max_depth` hops; reaching `id` means the
/// update would close a cycle. Exceeding the bound also fails closed
/// as a cycle rather than trusting corrupt data.
pub fn ensure_reparent_allowed(
    id: Uuid,
    new_parent_id: Uuid,
    parents: &HashMap<Uuid, Option<Uuid>>,
    max_depth: usize,
) -> Result<(), TreeError> {
    if new_parent_id == id {
        return Err(TreeError::SelfParent);
    }
    if !parents.contains_key(&new_parent_id) {
        return Err(TreeError::ParentNotFound { id: new_parent_id });
    }

    let mut current = new_parent_id;
    for _ in 0..max_depth {
        match parents.get(&current) {
            Some(Some(next)) => {
                if *next == id {
                    return Err(TreeError::CircularReference);
                }
                current = *next;
            }
            // Reached a root (or a dangling parent): no cycle.
            _ => return Ok(()),
        }
    }

    Err(TreeError::CircularReference)
}

/// Delete guard: a category with at least one child cannot be removed.
pub fn ensure_no_children(child_count: u64) -> Result<(), TreeError> {
    if child_count > 0 {
        Err(TreeError::HasChildren { count: child_count })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn category(name: &str, parent_id: Option<Uuid>) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.into(),
            slug: name.to_lowercase(),
            parent_id,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn count_nodes(forest: &[CategoryNode]) -> usize {
        forest
            .iter()
            .map(|n| 1 + count_nodes(&n.children))
            .sum()
    }

    fn collect_ids(forest: &[CategoryNode], out: &mut Vec<Uuid>) {
        for node in forest {
            out.push(node.id);
            collect_ids(&node.children, out);
        }
    }

    #[test]
    fn nests_child_under_parent() {
        let electronics = category("Electronics", None);
        let phones = category("Phones", Some(electronics.id));

        let forest = build_forest(vec![electronics.clone(), phones.clone()]);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].slug, "electronics");
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].slug, "phones");
        assert!(forest[0].children[0].children.is_empty());
    }

    #[test]
    fn every_row_appears_exactly_once() {
        let a = category("A", None);
        let b = category("B", Some(a.id));
        let c = category("C", Some(a.id));
        let d = category("D", Some(b.id));
        let e = category("E", None);
        let rows = vec![a, b, c, d, e];
        let input_ids: HashSet<Uuid> = rows.iter().map(|r| r.id).collect();

        let forest = build_forest(rows);

        assert_eq!(count_nodes(&forest), 5);
        let mut seen = Vec::new();
        collect_ids(&forest, &mut seen);
        assert_eq!(seen.len(), 5);
        assert_eq!(seen.into_iter().collect::<HashSet<_>>(), input_ids);
    }

    #[test]
    fn children_keep_input_order() {
        let parent = category("Parent", None);
        let first = category("Alpha", Some(parent.id));
        let second = category("Beta", Some(parent.id));
        let third = category("Gamma", Some(parent.id));

        let forest = build_forest(vec![
            parent,
            first.clone(),
            second.clone(),
            third.clone(),
        ]);

        let names: Vec<&str> = forest[0]
            .children
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["Alpha", "Beta", "Gamma"]);
    }

    #[test]
    fn unresolved_parent_becomes_root() {
        let orphan = category("Orphan", Some(Uuid::new_v4()));

        let forest = build_forest(vec![orphan.clone()]);

        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id, orphan.id);
    }

    #[test]
    fn self_parent_row_becomes_root() {
        let mut row = category("Loop", None);
        row.parent_id = Some(row.id);

        let forest = build_forest(vec![row]);

        assert_eq!(forest.len(), 1);
    }

    #[test]
    fn empty_input_builds_empty_forest() {
        assert!(build_forest(Vec::new()).is_empty());
    }

    fn parents_map(entries: &[(Uuid, Option<Uuid>)]) -> HashMap<Uuid, Option<Uuid>> {
        entries.iter().copied().collect()
    }

    #[test]
    fn reparent_to_self_is_rejected() {
        let id = Uuid::new_v4();
        let parents = parents_map(&[(id, None)]);

        assert_eq!(
            ensure_reparent_allowed(id, id, &parents, MAX_TREE_DEPTH),
            Err(TreeError::SelfParent)
        );
    }

    #[test]
    fn reparent_under_own_descendant_is_rejected() {
        // electronics -> phones; moving electronics under phones
        // closes a two-hop cycle.
        let electronics = Uuid::new_v4();
        let phones = Uuid::new_v4();
        let parents = parents_map(&[(electronics, None), (phones, Some(electronics))]);

        assert_eq!(
            ensure_reparent_allowed(electronics, phones, &parents, MAX_TREE_DEPTH),
            Err(TreeError::CircularReference)
        );
    }

    #[test]
    fn deep_cycle_is_rejected() {
        // a -> b -> c; moving a under c walks two hops before
        // reaching a.
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let parents = parents_map(&[(a, None), (b, Some(a)), (c, Some(b))]);

        assert_eq!(
            ensure_reparent_allowed(a, c, &parents, MAX_TREE_DEPTH),
            Err(TreeError::CircularReference)
        );
    }

    #[test]
    fn reparent_to_sibling_subtree_is_allowed() {
        let root = Uuid::new_v4();
        let left = Uuid::new_v4();
        let right = Uuid::new_v4();
        let parents = parents_map(&[(root, None), (left, Some(root)), (right, Some(root))]);

        assert_eq!(
            ensure_reparent_allowed(left, right, &parents, MAX_TREE_DEPTH),
            Ok(())
        );
    }

    #[test]
    fn missing_target_parent_is_not_found() {
        let id = Uuid::new_v4();
        let ghost = Uuid::new_v4();
        let parents = parents_map(&[(id, None)]);

        assert_eq!(
            ensure_reparent_allowed(id, ghost, &parents, MAX_TREE_DEPTH),
            Err(TreeError::ParentNotFound { id: ghost })
        );
    }

    #[test]
    fn depth_bound_fails_closed() {
        // A chain longer than the bound: the walk must give up and
        // report a cycle instead of trusting the data.
        let ids: Vec<Uuid> = (0..10).map(|_| Uuid::new_v4()).collect();
        let mut entries = vec![(ids[0], None)];
        for pair in ids.windows(2) {
            entries.push((pair[1], Some(pair[0])));
        }
        let parents = parents_map(&entries);
        let candidate = Uuid::new_v4();
        let mut parents = parents;
        parents.insert(candidate, None);

        assert_eq!(
            ensure_reparent_allowed(candidate, *ids.last().unwrap(), &parents, 3),
            Err(TreeError::CircularReference)
        );
    }

    #[test]
    fn delete_guard_rejects_categories_with_children() {
        assert_eq!(
            ensure_no_children(2),
            Err(TreeError::HasChildren { count: 2 })
        );
        assert_eq!(ensure_no_children(0), Ok(()));
    }

    #[test]
    fn tree_errors_map_to_core_taxonomy() {
        let id = Uuid::new_v4();
        assert!(matches!(
            BazaarError::from(TreeError::SelfParent),
            BazaarError::Validation { .. }
        ));
        assert!(matches!(
            BazaarError::from(TreeError::HasChildren { count: 1 }),
            BazaarError::Validation { .. }
        ));
        assert!(matches!(
            BazaarError::from(TreeError::ParentNotFound { id }),
            BazaarError::NotFound { .. }
        ));
    }
}
