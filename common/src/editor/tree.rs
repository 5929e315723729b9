//! # Tree Mutation Operations
//!
//! Pure functions over the root-level component sequence. Every operation takes the
//! current tree by reference and returns a new tree; the input is never touched.
//!
//! The operations are total: an unknown id, a non-container insertion target, or a move
//! past the edge of a sibling list returns a tree equal to the input instead of failing.
//! Callers that need to report "nothing selected" check with [`find_by_id`] first.

use crate::model::component::{clone_subtree, AttributeMap, Component, StyleMap};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Fields that may be merged into an existing node. `id` and `type` are not patchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentPatch {
    /// Replaces the node's content.
    #[serde(default)]
    pub content: Option<String>,
    /// Merged key by key into the node's styles.
    #[serde(default)]
    pub styles: Option<StyleMap>,
    /// Merged key by key into the node's attributes.
    #[serde(default)]
    pub attributes: Option<AttributeMap>,
    /// Replaces the children of a container-like node; ignored for leaves. A child whose
    /// subtree reuses an id found elsewhere in the tree is installed with fresh ids.
    #[serde(default)]
    pub children: Option<Vec<Component>>,
}

impl ComponentPatch {
    pub fn content(content: impl Into<String>) -> Self {
        ComponentPatch {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn styles(styles: StyleMap) -> Self {
        ComponentPatch {
            styles: Some(styles),
            ..Default::default()
        }
    }

    fn apply(&self, node: &mut Component, children: Option<Vec<Component>>) {
        if let Some(content) = &self.content {
            node.content = content.clone();
        }
        if let Some(styles) = &self.styles {
            for (key, value) in styles {
                node.styles.insert(key.clone(), value.clone());
            }
        }
        if let Some(attributes) = &self.attributes {
            for (key, value) in attributes {
                node.attributes.insert(key.clone(), value.clone());
            }
        }
        if let Some(children) = children {
            if node.is_container() {
                node.children = children;
            }
        }
    }
}

/// Direction of a sibling swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// A node paired with its nesting depth, as listed by [`flatten`].
#[derive(Debug, Clone, Copy)]
pub struct FlatNode<'a> {
    pub depth: usize,
    pub component: &'a Component,
}

/// Depth-first, pre-order search by id.
pub fn find_by_id<'a>(tree: &'a [Component], id: &str) -> Option<&'a Component> {
    for component in tree {
        if component.id == id {
            return Some(component);
        }
        if let Some(found) = find_by_id(&component.children, id) {
            return Some(found);
        }
    }
    None
}

/// Returns a tree where the node with `id` has `patch` merged in.
pub fn update_by_id(tree: &[Component], id: &str, patch: &ComponentPatch) -> Vec<Component> {
    let children = match (&patch.children, find_by_id(tree, id)) {
        (Some(children), Some(target)) => Some(with_unique_ids(tree, target, children)),
        _ => None,
    };
    let mut next = tree.to_vec();
    if let Some((siblings, index)) = locate_mut(&mut next, id) {
        patch.apply(&mut siblings[index], children);
    }
    next
}

/// Replacement children for `target`, re-identified where they would clash with ids used
/// outside `target`'s current subtree or with each other.
fn with_unique_ids(tree: &[Component], target: &Component, children: &[Component]) -> Vec<Component> {
    let replaced: HashSet<&str> = flatten(&target.children)
        .into_iter()
        .map(|n| n.component.id.as_str())
        .collect();
    let mut taken: HashSet<String> = flatten(tree)
        .into_iter()
        .map(|n| n.component.id.as_str())
        .filter(|id| !replaced.contains(id))
        .map(str::to_string)
        .collect();

    children
        .iter()
        .map(|child| {
            let ids = subtree_ids(child);
            let unique: HashSet<&String> = ids.iter().collect();
            let clashes = unique.len() != ids.len() || ids.iter().any(|id| taken.contains(id));
            let child = if clashes { clone_subtree(child) } else { child.clone() };
            taken.extend(subtree_ids(&child));
            child
        })
        .collect()
}

fn subtree_ids(node: &Component) -> Vec<String> {
    flatten(std::slice::from_ref(node))
        .into_iter()
        .map(|n| n.component.id.clone())
        .collect()
}

/// Removes the first node with `id`, wherever it sits in the tree.
pub fn delete_by_id(tree: &[Component], id: &str) -> Vec<Component> {
    let mut next = tree.to_vec();
    if let Some((siblings, index)) = locate_mut(&mut next, id) {
        siblings.remove(index);
    }
    next
}

/// Swaps the node with its previous or next sibling inside the same sibling list.
pub fn move_within_siblings(tree: &[Component], id: &str, direction: Direction) -> Vec<Component> {
    let mut next = tree.to_vec();
    if let Some((siblings, index)) = locate_mut(&mut next, id) {
        match direction {
            Direction::Up if index > 0 => siblings.swap(index, index - 1),
            Direction::Down if index + 1 < siblings.len() => siblings.swap(index, index + 1),
            _ => {}
        }
    }
    next
}

/// Replaces the root sequence with the given permutation of root ids.
///
/// Anything other than an exact permutation of the current root ids is ignored.
pub fn reorder(tree: &[Component], order: &[String]) -> Vec<Component> {
    if order.len() != tree.len() {
        return tree.to_vec();
    }

    let mut reordered = Vec::with_capacity(tree.len());
    let mut used = vec![false; tree.len()];
    for id in order {
        match tree.iter().position(|c| &c.id == id) {
            Some(index) if !used[index] => {
                used[index] = true;
                reordered.push(tree[index].clone());
            }
            _ => return tree.to_vec(),
        }
    }
    reordered
}

/// Appends a fresh-id copy of `node` to the children of the container `container_id`.
pub fn insert_into_container(
    tree: &[Component],
    container_id: &str,
    node: &Component,
) -> Vec<Component> {
    let mut next = tree.to_vec();
    if let Some((siblings, index)) = locate_mut(&mut next, container_id) {
        let target = &mut siblings[index];
        if target.is_container() {
            target.children.push(clone_subtree(node));
        }
    }
    next
}

/// Appends a fresh-id copy of `node` to the root sequence.
pub fn insert_at_root(tree: &[Component], node: &Component) -> Vec<Component> {
    let mut next = tree.to_vec();
    next.push(clone_subtree(node));
    next
}

/// Inserts a fresh-id copy of the node right after it, within the same sibling list.
pub fn duplicate_by_id(tree: &[Component], id: &str) -> Vec<Component> {
    let mut next = tree.to_vec();
    if let Some((siblings, index)) = locate_mut(&mut next, id) {
        let copy = clone_subtree(&siblings[index]);
        siblings.insert(index + 1, copy);
    }
    next
}

/// Pre-order listing of every node with its depth (root level is 0).
pub fn flatten(tree: &[Component]) -> Vec<FlatNode<'_>> {
    fn walk<'a>(nodes: &'a [Component], depth: usize, out: &mut Vec<FlatNode<'a>>) {
        for component in nodes {
            out.push(FlatNode { depth, component });
            walk(&component.children, depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(tree, 0, &mut out);
    out
}

/// Finds the sibling list holding `id` and the node's position in it.
fn locate_mut<'a>(
    nodes: &'a mut Vec<Component>,
    id: &str,
) -> Option<(&'a mut Vec<Component>, usize)> {
    if let Some(index) = nodes.iter().position(|c| c.id == id) {
        return Some((nodes, index));
    }
    for component in nodes.iter_mut() {
        if let Some(found) = locate_mut(&mut component.children, id) {
            return Some(found);
        }
    }
    None
}
