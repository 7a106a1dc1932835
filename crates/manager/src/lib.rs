mod models;
mod manager;
mod upload;
mod rewrite;
mod cleanup;
mod download;
mod fix;
mod export;
mod links;
mod errors;

pub use models::ImageManager;
pub use errors::ManagerError;
pub use export::REPORT_FILE;
