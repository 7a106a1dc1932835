mod backend;
mod command;
mod fetch;
mod errors;

pub use backend::ImageHost;
pub use command::CommandHost;
pub use fetch::{file_name_from_url, FetchedImage, RemoteFetcher};
pub use errors::HostError;
