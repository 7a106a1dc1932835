/// Filesystem helpers shared by the scanner, the manager and the bootstrap
pub struct FileSystem;
