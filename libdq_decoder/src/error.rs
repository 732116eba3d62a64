use std::path::PathBuf;
use thiserror::Error;

use super::constants::MASK_WIDTH;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Invalid bit position {0} requested; mask words have {width} bits", width=MASK_WIDTH)]
    InvalidBitPosition(usize),
    #[error("No flags were selected to combine")]
    EmptySelection,
    #[error("Series lengths disagree -- left: {0} samples, right: {1} samples")]
    LengthMismatch(usize, usize),
    #[error("Segment [{0}, {1}) lies outside of the series it was applied to")]
    SegmentOutsideSeries(i64, i64),
    #[error("A series sampled 0 times per second cannot hold any segment")]
    ZeroSampleRate,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Flag catalog has {0} names but {1} descriptions")]
    LengthMismatch(usize, usize),
    #[error("Flag catalog contains the name {0} more than once")]
    DuplicateFlag(String),
    #[error("Flag catalog has {0} entries, more than the {width} bits of a mask word", width=MASK_WIDTH)]
    CatalogTooLarge(usize),
    #[error("Flag {0} does not exist in the catalog")]
    UnknownFlag(String),
    #[error("Flag catalog failed to decode: {0}")]
    DecodeError(#[from] DecodeError),
}

#[derive(Debug, Error)]
pub enum HDFReaderError {
    #[error("Could not open HDF5 file because file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("HDFReader failed due to HDF5 error: {0}")]
    HDF5Error(#[from] hdf5::Error),
    #[error("HDFReader could not read the string dataset {0} in any supported string type")]
    BadStringDataset(String),
    #[error("HDFReader found a negative value {1} for {0}")]
    NegativeValue(String, i64),
    #[error("HDFReader found a mask of {0} samples but the file claims a duration of {1} seconds")]
    LengthMismatch(usize, u64),
    #[error("HDFReader found an invalid strain spacing of {0} seconds")]
    BadStrainSpacing(f64),
    #[error("HDFReader failed to build a flag catalog: {0}")]
    CatalogError(#[from] CatalogError),
}

#[derive(Debug, Error)]
pub enum TimeBaseError {
    #[error("GPS time {0} cannot be represented as a UTC date: {1}")]
    OutOfRange(i64, #[source] time::error::ComponentRange),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to HDFReader error: {0}")]
    HDFError(#[from] HDFReaderError),
    #[error("Processor failed due to Catalog error: {0}")]
    CatalogError(#[from] CatalogError),
    #[error("Processor failed due to decoding error: {0}")]
    DecodeError(#[from] DecodeError),
    #[error("Processor failed due to TimeBase error: {0}")]
    TimeBaseError(#[from] TimeBaseError),
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor failed to convert report to yaml: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Processor failed due to IO error: {0}")]
    IoError(#[from] std::io::Error),
}
