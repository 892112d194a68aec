//! Browser model for the data and classification hierarchies.
//!
//! The server returns two trees: Project > Dataset > Image, and
//! CategoryGroup > Category > Image. Both are mirrored into one
//! [`HierarchyTree`], an arena of nodes holding a [`DataObject`] each, with
//! an owned index from `(kind, server id)` to the nodes showing that object.
//! The tree is only ever rebuilt through [`HierarchyTree::reload`], which is
//! also where the index is invalidated.

mod data;
mod error;
mod node;
mod render;
mod tree;

pub use data::{
    CategoryData, CategoryGroupData, DatasetData, HierarchyData, ImageData, ProjectData,
};
pub use error::HierarchyError;
pub use node::{DataObject, NodeKey, NodeVisitor, ObjectKind};
pub use render::render_rows;
pub use tree::{HierarchyTree, NodeId, Row, TreeNode};

#[cfg(test)]
mod tests;
