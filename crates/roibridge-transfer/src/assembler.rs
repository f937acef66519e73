//! ROI tree assembly.
//!
//! Download: remote shapes are grouped by their ROI into collections under
//! one root, collections in order of first appearance and shapes in server
//! order. Each collection takes its ROI's name. Upload: a tree is flattened in pre-order into ROI groups, each
//! holding the shapes that go into one remote ROI.

use roibridge_core::{
    Mask, MaskId, RemoteId, RoiCollection, RoiNode, RoiTree, TranslationError,
};
use roibridge_geometry::{from_remote_shape, to_remote_shape, ShapeRecord};
use std::collections::HashMap;

use crate::cache::RemoteShapeRef;

/// A tree built from remote shapes, with the identity of every leaf
#[derive(Debug)]
pub struct AssembledTree {
    pub tree: RoiTree,
    /// One entry per leaf, in pre-order
    pub identities: Vec<(MaskId, RemoteShapeRef)>,
}

/// Build the tree of the shapes attached to `image_id`
pub fn assemble(
    image_id: Option<RemoteId>,
    records: &[ShapeRecord],
) -> Result<AssembledTree, TranslationError> {
    let mut groups: Vec<(RemoteId, Vec<&ShapeRecord>)> = Vec::new();
    let mut index: HashMap<RemoteId, usize> = HashMap::new();

    for record in records {
        let roi_id = record
            .roi_id
            .ok_or_else(|| malformed(record, "shape has no ROI"))?;
        let slot = *index.entry(roi_id).or_insert_with(|| {
            groups.push((roi_id, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(record);
    }

    let mut tree = match image_id {
        Some(image_id) => RoiTree::for_image(image_id),
        None => RoiTree::new(),
    };
    let mut identities = Vec::with_capacity(records.len());

    for (roi_id, shapes) in groups {
        let mut collection = RoiCollection::remote(roi_id);
        collection.set_name(shapes.iter().find_map(|r| r.roi_name.clone()));
        for record in shapes {
            let shape_id = record
                .id
                .ok_or_else(|| malformed(record, "shape has no id"))?;
            let image_id = image_id
                .or(record.image_id)
                .ok_or_else(|| malformed(record, "shape has no image"))?;
            let mask = from_remote_shape(record)?;
            identities.push((
                mask.id(),
                RemoteShapeRef {
                    shape_id,
                    roi_id,
                    image_id,
                },
            ));
            collection.push(mask);
        }
        tree.push(collection);
    }

    Ok(AssembledTree { tree, identities })
}

/// Shapes bound for one remote ROI
#[derive(Debug)]
pub struct UploadGroup<'a> {
    /// Existing remote ROI, if the group's collection has one
    pub roi_id: Option<RemoteId>,
    pub name: Option<&'a str>,
    /// Pre-order index of the collection this group came from
    pub collection: Option<usize>,
    pub shapes: Vec<PlannedShape<'a>>,
}

/// A leaf ready for upload
#[derive(Debug)]
pub struct PlannedShape<'a> {
    pub mask: &'a Mask,
    pub record: ShapeRecord,
    /// Pre-order index among all leaves
    pub order: usize,
}

/// Flatten `tree` into ROI groups, converting every leaf.
///
/// A collection forms one group with its direct leaves; nested collections
/// form their own groups. A leaf directly under the root becomes a group of
/// one. Fails on the first leaf that cannot be converted, before anything is
/// sent.
pub fn plan_upload(tree: &RoiTree) -> Result<Vec<UploadGroup<'_>>, TranslationError> {
    let mut planner = Planner::default();
    for node in tree.children() {
        match node {
            RoiNode::Collection(collection) => planner.collection(collection)?,
            RoiNode::Leaf(mask) => {
                let shape = planner.shape(mask)?;
                planner.groups.push(UploadGroup {
                    roi_id: None,
                    name: mask.name(),
                    collection: None,
                    shapes: vec![shape],
                });
            }
            RoiNode::Unsupported { kind } => return Err(unsupported(kind)),
        }
    }
    Ok(planner.groups)
}

#[derive(Default)]
struct Planner<'a> {
    groups: Vec<UploadGroup<'a>>,
    leaves: usize,
    collections: usize,
}

impl<'a> Planner<'a> {
    fn collection(&mut self, collection: &'a RoiCollection) -> Result<(), TranslationError> {
        let slot = self.groups.len();
        self.groups.push(UploadGroup {
            roi_id: collection.remote_id(),
            name: collection.name(),
            collection: Some(self.collections),
            shapes: Vec::new(),
        });
        self.collections += 1;

        for child in collection.children() {
            match child {
                RoiNode::Leaf(mask) => {
                    let shape = self.shape(mask)?;
                    self.groups[slot].shapes.push(shape);
                }
                RoiNode::Collection(nested) => self.collection(nested)?,
                RoiNode::Unsupported { kind } => return Err(unsupported(kind)),
            }
        }
        Ok(())
    }

    fn shape(&mut self, mask: &'a Mask) -> Result<PlannedShape<'a>, TranslationError> {
        let record = to_remote_shape(mask)?;
        let order = self.leaves;
        self.leaves += 1;
        Ok(PlannedShape {
            mask,
            record,
            order,
        })
    }
}

fn unsupported(kind: &str) -> TranslationError {
    TranslationError::UnsupportedGeometry {
        kind: kind.to_string(),
    }
}

fn malformed(record: &ShapeRecord, reason: &str) -> TranslationError {
    TranslationError::MalformedShape {
        kind: record.kind_name().to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roibridge_core::{PointMask, RealPoint};
    use roibridge_geometry::ShapeGeometry;

    fn point(id: u64, roi: u64, x: f64) -> ShapeRecord {
        ShapeRecord::new(ShapeGeometry::Point { x, y: 0.0 })
            .with_id(RemoteId(id))
            .with_roi(RemoteId(roi))
            .with_image(RemoteId(1))
    }

    #[test]
    fn test_groups_follow_first_appearance() {
        let records = vec![point(1, 20, 0.0), point(2, 10, 1.0), point(3, 20, 2.0)];
        let assembled = assemble(Some(RemoteId(1)), &records).unwrap();

        let ids: Vec<_> = assembled
            .tree
            .children()
            .iter()
            .filter_map(|n| n.as_collection()?.remote_id())
            .collect();
        assert_eq!(ids, vec![RemoteId(20), RemoteId(10)]);

        let first = assembled.tree.children()[0].children();
        assert_eq!(first.len(), 2);
        let shape_ids: Vec<_> = assembled.identities.iter().map(|(_, r)| r.shape_id).collect();
        assert_eq!(shape_ids, vec![RemoteId(1), RemoteId(3), RemoteId(2)]);
    }

    #[test]
    fn test_collection_takes_roi_name() {
        let records = vec![
            point(1, 20, 0.0).with_roi_name("cells"),
            point(2, 10, 1.0),
        ];
        let assembled = assemble(Some(RemoteId(1)), &records).unwrap();
        let names: Vec<_> = assembled
            .tree
            .children()
            .iter()
            .map(|n| n.as_collection().and_then(|c| c.name()))
            .collect();
        assert_eq!(names, vec![Some("cells"), None]);
    }

    #[test]
    fn test_shape_without_roi_is_malformed() {
        let record = ShapeRecord::new(ShapeGeometry::Point { x: 0.0, y: 0.0 }).with_id(RemoteId(1));
        assert!(matches!(
            assemble(Some(RemoteId(1)), &[record]),
            Err(TranslationError::MalformedShape { .. })
        ));
    }

    #[test]
    fn test_plan_preorder_and_groups() {
        let tree = RoiTree::new()
            .with_child(
                RoiCollection::named("outer")
                    .with_child(Mask::new(PointMask::new(0.0, 0.0)))
                    .with_child(
                        RoiCollection::named("inner").with_child(Mask::new(PointMask::new(1.0, 0.0))),
                    )
                    .with_child(Mask::new(PointMask::new(2.0, 0.0))),
            )
            .with_child(Mask::new(PointMask::new(3.0, 0.0)).with_name("lonely"));

        let groups = plan_upload(&tree).unwrap();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].name, Some("outer"));
        assert_eq!(groups[0].collection, Some(0));
        assert_eq!(
            groups[0].shapes.iter().map(|s| s.order).collect::<Vec<_>>(),
            vec![0, 2]
        );
        assert_eq!(groups[1].name, Some("inner"));
        assert_eq!(groups[1].collection, Some(1));
        assert_eq!(groups[1].shapes[0].order, 1);
        assert_eq!(groups[2].name, Some("lonely"));
        assert_eq!(groups[2].collection, None);
        assert_eq!(groups[2].shapes[0].order, 3);
        assert_eq!(
            groups[2].shapes[0].record.geometry,
            ShapeGeometry::Point { x: 3.0, y: 0.0 }
        );
    }

    #[test]
    fn test_plan_rejects_unsupported_leaf() {
        let tree = RoiTree::new().with_child(
            RoiCollection::new()
                .with_child(Mask::new(PointMask::new(0.0, 0.0)))
                .with_child(RoiNode::Unsupported {
                    kind: "text overlay".to_string(),
                }),
        );
        assert_eq!(
            plan_upload(&tree).unwrap_err(),
            TranslationError::UnsupportedGeometry {
                kind: "text overlay".to_string()
            }
        );
    }

    #[test]
    fn test_plan_rejects_malformed_leaf() {
        let tree = RoiTree::new().with_child(Mask::new(roibridge_core::Polygon2D::new(vec![
            RealPoint::new(f64::NAN, 0.0),
        ])));
        assert!(plan_upload(&tree).is_err());
    }
}
