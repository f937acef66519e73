//! # ROI Bridge Transfer
//!
//! Moves ROI trees between memory and the image server: the identity cache
//! that keeps re-uploads from duplicating shapes, tree assembly in both
//! directions, and the upload/download engine with its service facade.

pub mod assembler;
pub mod cache;
pub mod service;
pub mod transfer;

pub use assembler::{assemble, plan_upload, AssembledTree, PlannedShape, UploadGroup};
pub use cache::{RemoteShapeRef, RoiCache};
pub use service::RoiService;
pub use transfer::RoiTransfer;
