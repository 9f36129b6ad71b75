//! Traversal and measurement over built category trees.

use termtree::Tree;

use crate::domain::entities::CategoryNode;

/// Number of parent-to-leaf edges on the longest path below `node`.
///
/// A node without subcategories has height 0 whatever its image count.
pub fn height(node: &CategoryNode) -> usize {
    node.sub_categories()
        .iter()
        .map(|child| 1 + height(child))
        .max()
        .unwrap_or(0)
}

/// Height of an optional root; an absent tree has height 0.
pub fn height_of(node: Option<&CategoryNode>) -> usize {
    node.map(height).unwrap_or(0)
}

impl CategoryNode {
    pub fn height(&self) -> usize {
        height(self)
    }

    /// Pre-order, left-to-right traversal starting at this node.
    pub fn iter(&self) -> CategoryIter<'_> {
        CategoryIter::new(self)
    }

    /// Nodes without subcategories, in traversal order.
    pub fn leaves(&self) -> Vec<&CategoryNode> {
        self.iter().filter(|n| n.is_leaf()).collect()
    }

    /// First node in pre-order with the given name.
    pub fn find(&self, name: &str) -> Option<&CategoryNode> {
        self.iter().find(|n| n.name() == name)
    }

    /// Nodes exactly `depth` edges below this node (0 is the node itself).
    pub fn nodes_at_depth(&self, depth: usize) -> Vec<&CategoryNode> {
        let mut level = vec![self];
        for _ in 0..depth {
            level = level
                .into_iter()
                .flat_map(|n| n.sub_categories().iter())
                .collect();
        }
        level
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    /// Images in this node and all of its descendants.
    pub fn total_images(&self) -> usize {
        self.iter().map(|n| n.images().len()).sum()
    }
}

impl<'a> IntoIterator for &'a CategoryNode {
    type Item = &'a CategoryNode;
    type IntoIter = CategoryIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct CategoryIter<'a> {
    stack: Vec<&'a CategoryNode>,
}

impl<'a> CategoryIter<'a> {
    fn new(root: &'a CategoryNode) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for CategoryIter<'a> {
    type Item = &'a CategoryNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        // Push children in reverse order for left-to-right traversal
        for child in current.sub_categories().iter().rev() {
            self.stack.push(child);
        }
        Some(current)
    }
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeNodeConvert for CategoryNode {
    fn to_tree_string(&self) -> Tree<String> {
        let label = format!("{} ({} images)", self.name(), self.images().len());
        let leaves: Vec<_> = self
            .sub_categories()
            .iter()
            .map(|c| c.to_tree_string())
            .collect();
        Tree::new(label).with_leaves(leaves)
    }
}
