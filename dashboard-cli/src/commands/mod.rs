pub mod diff;
pub mod env;
pub mod init;
pub mod pools;
pub mod render;
pub mod sync;
