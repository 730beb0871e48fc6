//! Shared run context.

use std::path::PathBuf;

use crate::api::WebtoonClient;
use crate::metadata::MetadataCache;

/// Collaborators shared by the caller and every download worker.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub client: WebtoonClient,
    pub cache: MetadataCache,

    /// Root of the permanent library.
    pub library_path: PathBuf,
}

impl AppContext {
    pub fn new(client: WebtoonClient, cache: MetadataCache, library_path: PathBuf) -> Self {
        Self {
            client,
            cache,
            library_path,
        }
    }
}
