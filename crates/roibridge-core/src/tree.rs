//! ROI tree.
//!
//! The root of a [`RoiTree`] stands for "all ROIs of one image". Its children
//! are collections (one logical ROI grouping several masks) or bare masks.
//! Parents own their children outright; a leaf can never hold children
//! because [`RoiNode::Leaf`] carries only a [`Mask`].

use crate::ids::{MaskId, RemoteId};
use crate::mask::Mask;

/// A named grouping of masks that make up one logical ROI
#[derive(Debug, Default)]
pub struct RoiCollection {
    name: Option<String>,
    remote_id: Option<RemoteId>,
    children: Vec<RoiNode>,
}

impl RoiCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Collection already stored on the server under `remote_id`
    pub fn remote(remote_id: RemoteId) -> Self {
        Self {
            remote_id: Some(remote_id),
            ..Self::default()
        }
    }

    pub fn with_child(mut self, node: impl Into<RoiNode>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn push(&mut self, node: impl Into<RoiNode>) {
        self.children.push(node.into());
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn remote_id(&self) -> Option<RemoteId> {
        self.remote_id
    }

    pub fn set_remote_id(&mut self, remote_id: Option<RemoteId>) {
        self.remote_id = remote_id;
    }

    pub fn children(&self) -> &[RoiNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<RoiNode> {
        &mut self.children
    }
}

#[derive(Debug)]
pub enum RoiNode {
    Collection(RoiCollection),
    Leaf(Mask),
    /// A host payload that is not one of the known mask variants
    Unsupported { kind: String },
}

impl RoiNode {
    pub fn is_leaf(&self) -> bool {
        !matches!(self, RoiNode::Collection(_))
    }

    pub fn as_mask(&self) -> Option<&Mask> {
        match self {
            RoiNode::Leaf(mask) => Some(mask),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&RoiCollection> {
        match self {
            RoiNode::Collection(collection) => Some(collection),
            _ => None,
        }
    }

    pub fn children(&self) -> &[RoiNode] {
        match self {
            RoiNode::Collection(collection) => collection.children(),
            _ => &[],
        }
    }
}

impl From<Mask> for RoiNode {
    fn from(value: Mask) -> Self {
        RoiNode::Leaf(value)
    }
}

impl From<RoiCollection> for RoiNode {
    fn from(value: RoiCollection) -> Self {
        RoiNode::Collection(value)
    }
}

/// Root of a ROI hierarchy
#[derive(Debug, Default)]
pub struct RoiTree {
    source_image: Option<RemoteId>,
    children: Vec<RoiNode>,
}

impl RoiTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tree holding the ROIs downloaded from `image_id`
    pub fn for_image(image_id: RemoteId) -> Self {
        Self {
            source_image: Some(image_id),
            children: Vec::new(),
        }
    }

    pub fn source_image(&self) -> Option<RemoteId> {
        self.source_image
    }

    pub fn set_source_image(&mut self, image_id: Option<RemoteId>) {
        self.source_image = image_id;
    }

    /// Visit every collection in pre-order, nested ones included
    pub fn for_each_collection_mut(&mut self, mut f: impl FnMut(&mut RoiCollection)) {
        visit_collections(&mut self.children, &mut f);
    }

    pub fn with_child(mut self, node: impl Into<RoiNode>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn push(&mut self, node: impl Into<RoiNode>) {
        self.children.push(node.into());
    }

    pub fn children(&self) -> &[RoiNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<RoiNode> {
        &mut self.children
    }

    /// All masks in pre-order
    pub fn masks(&self) -> Vec<&Mask> {
        let mut out = Vec::new();
        collect_masks(&self.children, &mut out);
        out
    }

    /// Number of masks in the tree
    pub fn len(&self) -> usize {
        self.masks().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn find_mask(&self, id: MaskId) -> Option<&Mask> {
        self.masks().into_iter().find(|m| m.id() == id)
    }

    pub fn find_mask_mut(&mut self, id: MaskId) -> Option<&mut Mask> {
        find_in(&mut self.children, id)
    }
}

fn collect_masks<'a>(nodes: &'a [RoiNode], out: &mut Vec<&'a Mask>) {
    for node in nodes {
        match node {
            RoiNode::Leaf(mask) => out.push(mask),
            RoiNode::Collection(collection) => collect_masks(collection.children(), out),
            RoiNode::Unsupported { .. } => {}
        }
    }
}

fn visit_collections(nodes: &mut [RoiNode], f: &mut impl FnMut(&mut RoiCollection)) {
    for node in nodes.iter_mut() {
        if let RoiNode::Collection(collection) = node {
            f(collection);
            visit_collections(collection.children_mut(), f);
        }
    }
}

fn find_in(nodes: &mut [RoiNode], id: MaskId) -> Option<&mut Mask> {
    for node in nodes.iter_mut() {
        match node {
            RoiNode::Leaf(mask) if mask.id() == id => return Some(mask),
            RoiNode::Collection(collection) => {
                if let Some(found) = find_in(collection.children_mut(), id) {
                    return Some(found);
                }
            }
            _ => {}
        }
    }
    None
}
