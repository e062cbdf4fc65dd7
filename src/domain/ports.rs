use crate::domain::model::Vehicle;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn data_dir(&self) -> &str;
    fn json_file(&self) -> &str;
    fn xml_file(&self) -> &str;
    fn decode_policy(&self) -> DecodePolicy;
}

/// Converts a whole collection to and from one external representation.
pub trait VehicleCodec {
    fn format_name(&self) -> &'static str;
    fn encode(&self, vehicles: &[Vehicle]) -> Result<Vec<u8>>;
    fn decode(&self, data: &[u8]) -> Result<Vec<Vehicle>>;
}

/// What a codec does when a single entry of a document cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// The first bad entry fails the whole load.
    #[default]
    Abort,
    /// Bad entries are logged and dropped; the rest of the document loads.
    Skip,
}
