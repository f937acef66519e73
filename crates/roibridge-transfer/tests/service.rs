use roibridge_communication::{Credentials, InMemoryClient};
use roibridge_core::{
    Mask, PlaneAttachment, PointMask, Polyshape2D, RealPoint, RemoteId, RoiCollection, RoiTree,
};
use roibridge_geometry::ShapeGeometry;
use roibridge_settings::{Config, ServerSettings};
use roibridge_transfer::RoiService;
use std::sync::Arc;
use tempfile::TempDir;

fn service() -> (Arc<InMemoryClient>, RoiService) {
    let client = Arc::new(InMemoryClient::new().with_user("root", "omero").with_image(42u64));
    let mut config = Config::new();
    config.servers.push(ServerSettings::new("lab", "localhost"));
    (client.clone(), RoiService::new(config, client))
}

#[test]
fn test_transfers_need_a_current_session() {
    let (_, service) = service();
    let err = service.download_rois(RemoteId(42)).unwrap_err();
    assert!(err.is_no_active_session());
}

#[test]
fn test_connect_unknown_server() {
    let (_, service) = service();
    let err = service
        .connect("elsewhere", &Credentials::new("root", "omero"))
        .unwrap_err();
    assert!(err.to_string().contains("Unknown server 'elsewhere'"));
}

#[test]
fn test_round_trip_through_current_session() {
    let (client, service) = service();
    let session = service.connect("lab", &Credentials::new("root", "omero")).unwrap();
    let _scope = service.registry().enter(session);

    let mut tree = RoiTree::new().with_child(
        RoiCollection::named("cells")
            .with_child(Mask::new(PointMask::new(1.0, 1.0)))
            .with_child(Mask::new(PointMask::new(2.0, 2.0))),
    );
    let ids = service.upload_rois(&mut tree, RemoteId(42)).unwrap();
    assert_eq!(ids.len(), 2);
    assert_eq!(service.cache().len(), 2);

    let mut downloaded = service.download_rois(RemoteId(42)).unwrap();
    assert_eq!(downloaded.len(), 2);
    assert_eq!(service.cache().len(), 4);

    service.upload_rois(&mut downloaded, RemoteId(42)).unwrap();
    assert_eq!(client.counters().shape_creates, 2);
    assert_eq!(client.counters().shape_updates, 2);

    let roi_id = downloaded.children()[0].as_collection().unwrap().remote_id().unwrap();
    assert_eq!(service.download_roi(roi_id).unwrap().len(), 2);
}

#[test]
fn test_dispose_closes_sessions() {
    let (client, service) = service();
    let session = service.connect("lab", &Credentials::new("root", "omero")).unwrap();
    service.dispose().unwrap();
    assert!(!session.is_active());
    assert_eq!(client.open_connections(), 0);
}

#[test]
fn test_configured_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    let mut config = Config::new();
    config.servers.push(ServerSettings::new("lab", "localhost").with_username("root"));
    config.save_to_file(&path).unwrap();

    let config = Config::load_from_file(&path).unwrap();
    let client = Arc::new(InMemoryClient::new().with_user("root", "omero").with_image(42u64));
    let service = RoiService::new(config, client.clone());

    let session = service.connect("lab", &Credentials::new("root", "omero")).unwrap();
    let _scope = service.registry().enter(session);

    let outline = Polyshape2D::closed(vec![
        RealPoint::new(0.0, 0.0),
        RealPoint::new(4.0, 0.0),
        RealPoint::new(4.0, 3.0),
    ]);
    let mut tree = RoiTree::new().with_child(
        RoiCollection::named("cell").with_child(
            Mask::new(outline)
                .with_plane(PlaneAttachment::unset().with_c(1))
                .with_name("membrane"),
        ),
    );

    let ids = service.upload_rois(&mut tree, RemoteId(42)).unwrap();
    let stored = client.shape(ids[0]).unwrap();
    assert!(matches!(stored.geometry, ShapeGeometry::Polygon { .. }));
    assert_eq!((stored.z, stored.t, stored.c), (-1, -1, 1));
    assert_eq!(stored.text.as_deref(), Some("membrane"));

    let downloaded = service.download_rois(RemoteId(42)).unwrap();
    let mask = downloaded.masks()[0];
    assert_eq!(mask.plane(), PlaneAttachment::unset().with_c(1));
    assert_eq!(mask.name(), Some("membrane"));
    assert_eq!(downloaded.children()[0].as_collection().unwrap().name(), Some("cell"));

    service.dispose().unwrap();
    assert_eq!(client.open_connections(), 0);
}
