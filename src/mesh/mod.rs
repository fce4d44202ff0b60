//! Indexed triangle mesh buffers

pub mod data;
pub mod optimize;

pub use data::MeshData;
pub use optimize::optimize;
