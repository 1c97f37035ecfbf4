use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse OSM XML: {0}")]
    Xml(#[from] quick_xml::de::DeError),
    #[error("failed to read CBOR: {0}")]
    CborRead(#[from] ciborium::de::Error<io::Error>),
    #[error("failed to write CBOR: {0}")]
    CborWrite(#[from] ciborium::ser::Error<io::Error>),
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("failed to start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;
