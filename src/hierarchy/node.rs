//! Node payloads and the visitor used to walk them.

use crate::icons::IconId;

/// Kind of object a node shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectKind {
    Project,
    Dataset,
    Image,
    CategoryGroup,
    Category,
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Project => "Project",
            ObjectKind::Dataset => "Dataset",
            ObjectKind::Image => "Image",
            ObjectKind::CategoryGroup => "Category Group",
            ObjectKind::Category => "Category",
        }
    }

    pub fn icon(&self) -> IconId {
        match self {
            ObjectKind::Project => IconId::Project,
            ObjectKind::Dataset => IconId::Dataset,
            ObjectKind::Image => IconId::Image,
            ObjectKind::CategoryGroup => IconId::CategoryGroup,
            ObjectKind::Category => IconId::Category,
        }
    }
}

/// Identity of a server object, independent of where it sits in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey {
    pub kind: ObjectKind,
    pub id: u64,
}

impl NodeKey {
    pub fn new(kind: ObjectKind, id: u64) -> Self {
        Self { kind, id }
    }
}

/// What a tree node holds.
#[derive(Debug, Clone, PartialEq)]
pub enum DataObject {
    Project { id: u64, name: String },
    Dataset { id: u64, name: String },
    Image { id: u64, name: String },
    CategoryGroup { id: u64, name: String },
    Category { id: u64, name: String },
}

impl DataObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            DataObject::Project { .. } => ObjectKind::Project,
            DataObject::Dataset { .. } => ObjectKind::Dataset,
            DataObject::Image { .. } => ObjectKind::Image,
            DataObject::CategoryGroup { .. } => ObjectKind::CategoryGroup,
            DataObject::Category { .. } => ObjectKind::Category,
        }
    }

    pub fn id(&self) -> u64 {
        match self {
            DataObject::Project { id, .. }
            | DataObject::Dataset { id, .. }
            | DataObject::Image { id, .. }
            | DataObject::CategoryGroup { id, .. }
            | DataObject::Category { id, .. } => *id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DataObject::Project { name, .. }
            | DataObject::Dataset { name, .. }
            | DataObject::Image { name, .. }
            | DataObject::CategoryGroup { name, .. }
            | DataObject::Category { name, .. } => name,
        }
    }

    pub fn key(&self) -> NodeKey {
        NodeKey::new(self.kind(), self.id())
    }

    pub fn icon(&self) -> IconId {
        self.kind().icon()
    }

    /// Images are leaves; everything else may have children.
    pub fn is_container(&self) -> bool {
        !matches!(self, DataObject::Image { .. })
    }

    /// Dispatch to the visitor method for this variant.
    pub fn accept<V: NodeVisitor + ?Sized>(&self, depth: usize, visitor: &mut V) {
        match self {
            DataObject::Project { id, name } => visitor.visit_project(depth, *id, name),
            DataObject::Dataset { id, name } => visitor.visit_dataset(depth, *id, name),
            DataObject::Image { id, name } => visitor.visit_image(depth, *id, name),
            DataObject::CategoryGroup { id, name } => {
                visitor.visit_category_group(depth, *id, name)
            }
            DataObject::Category { id, name } => visitor.visit_category(depth, *id, name),
        }
    }
}

/// Depth-first walker over a [`HierarchyTree`](super::HierarchyTree).
///
/// Every method defaults to [`NodeVisitor::visit_node`], so an implementor
/// only overrides the variants it cares about.
pub trait NodeVisitor {
    fn visit_node(&mut self, _depth: usize, _kind: ObjectKind, _id: u64, _name: &str) {}

    fn visit_project(&mut self, depth: usize, id: u64, name: &str) {
        self.visit_node(depth, ObjectKind::Project, id, name);
    }

    fn visit_dataset(&mut self, depth: usize, id: u64, name: &str) {
        self.visit_node(depth, ObjectKind::Dataset, id, name);
    }

    fn visit_image(&mut self, depth: usize, id: u64, name: &str) {
        self.visit_node(depth, ObjectKind::Image, id, name);
    }

    fn visit_category_group(&mut self, depth: usize, id: u64, name: &str) {
        self.visit_node(depth, ObjectKind::CategoryGroup, id, name);
    }

    fn visit_category(&mut self, depth: usize, id: u64, name: &str) {
        self.visit_node(depth, ObjectKind::Category, id, name);
    }
}
