use std::path::PathBuf;

use crate::record::RecordShape;

/// Sibling of the directory the generator is run from
pub const DEFAULT_OUTPUT_PATH: &str = "../random_json.gz";
/// 1024^3 bytes of uncompressed output
pub const DEFAULT_THRESHOLD_BYTES: u64 = 1024 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Created, or truncated if it already exists
    pub output_path: PathBuf,
    /// Generation stops once at least this many uncompressed bytes are written
    pub threshold_bytes: u64,
    pub shape: RecordShape,
    /// Fixed seed for reproducible output. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            threshold_bytes: DEFAULT_THRESHOLD_BYTES,
            shape: RecordShape::default(),
            seed: None,
        }
    }
}
