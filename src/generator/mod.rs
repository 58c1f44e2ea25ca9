pub mod batch;
pub mod catalog;
pub mod local;
pub mod parse;
pub mod remote;

use thiserror::Error;

use crate::model::item::ReturnItem;

pub trait ItemSource {
    fn generate(&mut self, level: u32, count: usize) -> Vec<ReturnItem>;
}

/// Anything that can be asked for a batch on a worker thread.
pub trait ContentSource: Send + Sync {
    fn fetch(&self, level: u32, count: usize) -> Result<Vec<ReturnItem>, ContentError>;
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("no credential configured for the content source")]
    MissingCredential,
    #[error("content source disabled in this build")]
    Disabled,
    #[error("request failed: {0}")]
    Http(String),
    #[error("content source returned status {0}")]
    Status(u16),
    #[error("malformed payload: {0}")]
    Malformed(String),
    #[error("payload contained no usable items")]
    Empty,
}
