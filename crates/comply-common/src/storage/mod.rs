//! Object storage for uploaded label images

mod object_store;

pub use object_store::{FsObjectStore, ObjectStore};
