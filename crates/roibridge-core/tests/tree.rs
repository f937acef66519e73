use roibridge_core::{
    BoxMask, Mask, PointMask, RealPoint, RemoteId, RoiCollection, RoiNode, RoiTree,
};

fn sample_tree() -> RoiTree {
    RoiTree::for_image(RemoteId(1))
        .with_child(
            RoiCollection::named("cells")
                .with_child(Mask::new(PointMask::new(1.0, 1.0)))
                .with_child(Mask::new(PointMask::new(2.0, 2.0))),
        )
        .with_child(Mask::new(BoxMask::from_origin(0.0, 0.0, 4.0, 4.0)))
        .with_child(RoiNode::Unsupported {
            kind: "label".to_string(),
        })
}

#[test]
fn test_masks_are_listed_in_pre_order() {
    let tree = sample_tree();
    let masks = tree.masks();
    assert_eq!(masks.len(), 3);
    assert_eq!(tree.len(), 3);
    assert_eq!(masks[2].kind(), roibridge_core::MaskKind::Box);
    assert_eq!(tree.source_image(), Some(RemoteId(1)));
}

#[test]
fn test_leaves_have_no_children() {
    let tree = sample_tree();
    let collection = &tree.children()[0];
    assert!(!collection.is_leaf());
    for child in collection.children() {
        assert!(child.is_leaf());
        assert!(child.children().is_empty());
    }
}

#[test]
fn test_find_mask_mut_edits_in_place() {
    let mut tree = sample_tree();
    let id = tree.masks()[1].id();

    let mask = tree.find_mask_mut(id).expect("mask present");
    if let roibridge_core::MaskGeometry::Point(p) = mask.geometry_mut() {
        p.set_position(0.0, 0.0);
    }

    let mask = tree.find_mask(id).expect("mask present");
    assert_eq!(
        mask.geometry(),
        &roibridge_core::MaskGeometry::Point(PointMask {
            position: RealPoint::new(0.0, 0.0)
        })
    );
}

#[test]
fn test_empty_tree() {
    let tree = RoiTree::new();
    assert!(tree.is_empty());
    assert!(tree.source_image().is_none());
}

#[test]
fn test_collections_visited_in_pre_order() {
    let mut tree = RoiTree::new()
        .with_child(
            RoiCollection::named("outer").with_child(RoiCollection::named("inner")),
        )
        .with_child(RoiCollection::named("second"));

    let mut names = Vec::new();
    let mut next = 10;
    tree.for_each_collection_mut(|collection| {
        names.push(collection.name().unwrap_or_default().to_string());
        collection.set_remote_id(Some(RemoteId(next)));
        next += 1;
    });
    assert_eq!(names, ["outer", "inner", "second"]);

    let inner = tree.children()[0].children()[0].as_collection().unwrap();
    assert_eq!(inner.remote_id(), Some(RemoteId(11)));

    tree.set_source_image(Some(RemoteId(5)));
    assert_eq!(tree.source_image(), Some(RemoteId(5)));
}
