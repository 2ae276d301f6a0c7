//! Permission tree: a flat permission set folded into a segment trie.
//!
//! Built fresh per check and dropped afterwards; nothing here is cached or
//! shared between requests.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::permissions::segments_of;
use crate::well_known::WILDCARD_SEGMENT;

/// One segment position in the tree.
///
/// `is_leaf` is tracked independently of `children`: with both `admin` and
/// `admin.user` granted, the `admin` node is a leaf *and* has a child, yet it
/// still grants only `admin` itself. Only a leaf `*` child grants everything
/// beneath a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PermissionNode {
    pub children: BTreeMap<String, PermissionNode>,
    pub is_leaf: bool,
}

impl PermissionNode {
    pub fn child(&self, segment: &str) -> Option<&PermissionNode> {
        self.children.get(segment)
    }

    /// `true` when some granted permission ends in `*` right below this node.
    pub fn has_wildcard_leaf(&self) -> bool {
        self.child(WILDCARD_SEGMENT).is_some_and(|n| n.is_leaf)
    }

    fn insert(&mut self, segments: &[&str]) {
        match segments.split_first() {
            None => self.is_leaf = true,
            Some((head, rest)) => self
                .children
                .entry((*head).to_string())
                .or_default()
                .insert(rest),
        }
    }

    /// Descend one segment at a time.
    ///
    /// Succeeds on a wildcard leaf below any node on the path, or when the
    /// path ends exactly on a leaf.
    fn grants(&self, segments: &[&str]) -> bool {
        if self.has_wildcard_leaf() {
            return true;
        }
        match segments.split_first() {
            None => self.is_leaf,
            Some((head, rest)) => self.child(head).is_some_and(|next| next.grants(rest)),
        }
    }

    fn leaf_count(&self) -> usize {
        usize::from(self.is_leaf) + self.children.values().map(Self::leaf_count).sum::<usize>()
    }

    fn fmt_indented(&self, f: &mut core::fmt::Formatter<'_>, depth: usize) -> core::fmt::Result {
        for (segment, node) in &self.children {
            let marker = if node.is_leaf { " ✓" } else { "" };
            writeln!(f, "{:indent$}{segment}{marker}", "", indent = depth * 2)?;
            node.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Hierarchical view of a permission set.
///
/// Shape depends only on the set of inputs, never on their order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PermissionTree {
    root: PermissionNode,
}

impl PermissionTree {
    /// Fold permission strings into a tree.
    ///
    /// Malformed strings (empty, or with an empty segment) are skipped: no
    /// well-formed required permission could ever reach them.
    pub fn build<'a>(permissions: impl IntoIterator<Item = &'a str>) -> Self {
        let mut root = PermissionNode::default();
        for permission in permissions {
            match segments_of(permission) {
                Some(segments) => root.insert(&segments),
                None => tracing::debug!(permission, "skipping malformed permission"),
            }
        }
        let tree = Self { root };
        tracing::trace!(leaves = tree.leaf_count(), "permission tree built");
        tree
    }

    pub fn root(&self) -> &PermissionNode {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Number of distinct well-formed permissions folded into the tree.
    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    /// Whether the tree grants `required`. Malformed `required` never matches.
    pub fn grants(&self, required: &str) -> bool {
        segments_of(required).is_some_and(|segments| self.root.grants(&segments))
    }
}

impl core::fmt::Display for PermissionTree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.root.fmt_indented(f, 0)
    }
}
