mod local_filesystem_store;
mod path_builder;
mod stream_writer;

pub use local_filesystem_store::LocalFilesystemStore;
pub use path_builder::PathBuilder;
pub use stream_writer::{StreamWriter, BUFFER_SIZE};
