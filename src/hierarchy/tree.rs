//! Arena-backed hierarchy tree.

use std::collections::{HashMap, HashSet};

use super::data::{HierarchyData, ImageData};
use super::error::HierarchyError;
use super::node::{DataObject, NodeKey, NodeVisitor, ObjectKind};

/// Index of a node in the arena. Only valid for the generation it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    pub object: DataObject,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub expanded: bool,
}

/// One line of the flattened, expanded view.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: NodeId,
    pub depth: usize,
    pub key: NodeKey,
    pub name: String,
    pub expanded: bool,
    pub has_children: bool,
    pub selected: bool,
}

#[derive(Debug, Clone, Default)]
pub struct HierarchyTree {
    nodes: Vec<TreeNode>,
    roots: Vec<NodeId>,
    /// Every node showing a given server object. Images can have several.
    index: HashMap<NodeKey, Vec<NodeId>>,
    selected: Option<NodeId>,
    generation: u64,
}

impl HierarchyTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from a server snapshot. Roots are projects, then
    /// category groups, then images outside any dataset.
    pub fn from_data(data: &HierarchyData) -> Result<Self, HierarchyError> {
        let mut tree = Self::new();

        for project in &data.projects {
            let p = tree.push_container(
                None,
                DataObject::Project {
                    id: project.id,
                    name: project.name.clone(),
                },
            )?;
            for dataset in &project.datasets {
                let d = tree.push_container(
                    Some(p),
                    DataObject::Dataset {
                        id: dataset.id,
                        name: dataset.name.clone(),
                    },
                )?;
                tree.push_images(d, &dataset.images);
            }
        }

        for group in &data.category_groups {
            let g = tree.push_container(
                None,
                DataObject::CategoryGroup {
                    id: group.id,
                    name: group.name.clone(),
                },
            )?;
            for category in &group.categories {
                let c = tree.push_container(
                    Some(g),
                    DataObject::Category {
                        id: category.id,
                        name: category.name.clone(),
                    },
                )?;
                tree.push_images(c, &category.images);
            }
        }

        for image in &data.orphan_images {
            tree.push(
                None,
                DataObject::Image {
                    id: image.id,
                    name: image.name.clone(),
                },
            );
        }

        log::debug!(
            "Built hierarchy: {} nodes, {} roots",
            tree.nodes.len(),
            tree.roots.len()
        );
        Ok(tree)
    }

    fn push(&mut self, parent: Option<NodeId>, object: DataObject) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.index.entry(object.key()).or_default().push(id);
        self.nodes.push(TreeNode {
            object,
            parent,
            children: Vec::new(),
            expanded: false,
        });
        match parent {
            Some(p) => self.nodes[p.0].children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    fn push_container(
        &mut self,
        parent: Option<NodeId>,
        object: DataObject,
    ) -> Result<NodeId, HierarchyError> {
        if self.index.contains_key(&object.key()) {
            return Err(HierarchyError::DuplicateContainer {
                kind: object.kind(),
                id: object.id(),
            });
        }
        Ok(self.push(parent, object))
    }

    fn push_images(&mut self, parent: NodeId, images: &[ImageData]) {
        for image in images {
            self.push(
                Some(parent),
                DataObject::Image {
                    id: image.id,
                    name: image.name.clone(),
                },
            );
        }
    }

    /// Replace the contents with a fresh snapshot.
    ///
    /// All `NodeId`s from before the call are invalidated. Expanded nodes and
    /// the selection are carried over by key. On error the tree is unchanged.
    pub fn reload(&mut self, data: &HierarchyData) -> Result<(), HierarchyError> {
        let mut fresh = Self::from_data(data)?;

        let expanded: HashSet<Vec<NodeKey>> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.expanded)
            .map(|(i, _)| self.key_path(NodeId(i)))
            .collect();
        for i in 0..fresh.nodes.len() {
            if expanded.contains(&fresh.key_path(NodeId(i))) {
                fresh.nodes[i].expanded = true;
            }
        }

        if let Some(selected) = self.selected {
            let path = self.key_path(selected);
            fresh.selected = fresh
                .resolve_key_path(&path)
                .or_else(|| path.last().and_then(|key| fresh.find(key).first().copied()));
            if fresh.selected.is_none() {
                log::debug!("Selection {:?} no longer exists", path.last());
            }
        }

        fresh.generation = self.generation + 1;
        *self = fresh;
        log::info!(
            "Reloaded hierarchy (generation {}): {} nodes",
            self.generation,
            self.nodes.len()
        );
        Ok(())
    }

    fn key_path(&self, id: NodeId) -> Vec<NodeKey> {
        self.path(id)
            .into_iter()
            .map(|n| self.nodes[n.0].object.key())
            .collect()
    }

    fn resolve_key_path(&self, keys: &[NodeKey]) -> Option<NodeId> {
        let mut level = &self.roots;
        let mut found = None;
        for key in keys {
            let next = *level
                .iter()
                .find(|id| self.nodes[id.0].object.key() == *key)?;
            level = &self.nodes[next.0].children;
            found = Some(next);
        }
        found
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Incremented on every successful reload.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    pub fn object(&self, id: NodeId) -> Option<&DataObject> {
        self.node(id).map(|n| &n.object)
    }

    /// All nodes showing the given object, in insertion order.
    pub fn find(&self, key: &NodeKey) -> &[NodeId] {
        self.index.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Ids from the root down to `id`, inclusive. Empty for unknown ids.
    pub fn path(&self, id: NodeId) -> Vec<NodeId> {
        if self.node(id).is_none() {
            return Vec::new();
        }
        let mut path = vec![id];
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            path.push(parent);
            current = parent;
        }
        path.reverse();
        path
    }

    /// Ids of the images classified under a category.
    pub fn images_in_category(&self, category_id: u64) -> Vec<u64> {
        let key = NodeKey::new(ObjectKind::Category, category_id);
        self.find(&key)
            .iter()
            .flat_map(|c| self.children(*c))
            .filter_map(|id| self.object(*id))
            .filter(|o| o.kind() == ObjectKind::Image)
            .map(|o| o.id())
            .collect()
    }

    /// Ids of the categories an image is classified under.
    pub fn categories_of_image(&self, image_id: u64) -> Vec<u64> {
        let key = NodeKey::new(ObjectKind::Image, image_id);
        let mut ids: Vec<u64> = self
            .find(&key)
            .iter()
            .filter_map(|id| self.parent(*id))
            .filter_map(|p| self.object(p))
            .filter(|o| o.kind() == ObjectKind::Category)
            .map(|o| o.id())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    fn set_expanded(&mut self, id: NodeId, expanded: bool) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(node) if node.object.is_container() && node.expanded != expanded => {
                node.expanded = expanded;
                true
            }
            _ => false,
        }
    }

    /// Returns whether anything changed.
    pub fn expand(&mut self, id: NodeId) -> bool {
        self.set_expanded(id, true)
    }

    pub fn collapse(&mut self, id: NodeId) -> bool {
        self.set_expanded(id, false)
    }

    pub fn toggle(&mut self, id: NodeId) -> bool {
        let expanded = self.node(id).is_some_and(|n| n.expanded);
        self.set_expanded(id, !expanded)
    }

    pub fn expand_all(&mut self) {
        for node in &mut self.nodes {
            if node.object.is_container() {
                node.expanded = true;
            }
        }
    }

    pub fn collapse_all(&mut self) {
        for node in &mut self.nodes {
            node.expanded = false;
        }
    }

    /// Select a node, or clear the selection with `None`. Unknown ids clear it.
    pub fn select(&mut self, id: Option<NodeId>) {
        self.selected = id.filter(|id| id.0 < self.nodes.len());
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    /// Walk every node depth-first, ignoring expansion.
    pub fn visit<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) {
        let mut stack: Vec<(NodeId, usize)> = self.roots.iter().rev().map(|id| (*id, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id.0];
            node.object.accept(depth, visitor);
            stack.extend(node.children.iter().rev().map(|c| (*c, depth + 1)));
        }
    }

    /// Rows currently on screen: roots, plus children of expanded nodes.
    pub fn visible_rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        let mut stack: Vec<(NodeId, usize)> = self.roots.iter().rev().map(|id| (*id, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id.0];
            rows.push(Row {
                id,
                depth,
                key: node.object.key(),
                name: node.object.name().to_string(),
                expanded: node.expanded,
                has_children: !node.children.is_empty(),
                selected: self.selected == Some(id),
            });
            if node.expanded {
                stack.extend(node.children.iter().rev().map(|c| (*c, depth + 1)));
            }
        }
        rows
    }
}
