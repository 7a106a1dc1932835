mod models;
mod state;
mod params;
mod status;
mod documents;
mod maintenance;
mod routes;

pub use models::AppState;
pub use status::{get_mapping, get_status, scan_directory};
pub use documents::{cleanup_images, download_images, list_md_files, replace_links, upload_images};
pub use maintenance::{check_links, export_report, fix_paths, undo_fix};
pub use routes::routes;
