use std::ops::RangeInclusive;

use rand::distributions::{Alphanumeric, Distribution};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GenError;

pub const ID_LEN: usize = 10;
pub const VALUE_RANGE: RangeInclusive<u32> = 1..=100;
// 2020-01-01 to 2024-01-01, Unix epoch seconds
pub const TIMESTAMP_RANGE: RangeInclusive<i64> = 1_577_836_800..=1_704_062_400;

/// One line of output. Field order here is the key order on the wire.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Record {
    pub id: String,
    pub value: u32,
    pub timestamp: i64,
}

/// The parameters [Record]s are sampled from.
///
/// `RecordShape` is a [Distribution], so records are drawn with
/// `rng.sample(&shape)` or `shape.sample(&mut rng)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordShape {
    /// Number of characters in `id`, each drawn from `[A-Za-z0-9]`
    pub id_len: usize,
    pub value_range: RangeInclusive<u32>,
    /// Unix epoch seconds
    pub timestamp_range: RangeInclusive<i64>,
}

impl Default for RecordShape {
    fn default() -> Self {
        RecordShape {
            id_len: ID_LEN,
            value_range: VALUE_RANGE,
            timestamp_range: TIMESTAMP_RANGE,
        }
    }
}

impl Distribution<Record> for RecordShape {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Record {
        let id = (0..self.id_len)
            .map(|_| char::from(Alphanumeric.sample(rng)))
            .collect();
        Record {
            id,
            value: rng.gen_range(self.value_range.clone()),
            timestamp: rng.gen_range(self.timestamp_range.clone()),
        }
    }
}

impl RecordShape {
    /// # Errors
    /// Errors when either range is empty, since nothing could be sampled from it
    pub fn validate(&self) -> Result<(), GenError> {
        if self.value_range.is_empty() {
            return Err(GenError::InvalidConfig(format!(
                "empty value range {:?}",
                self.value_range
            )));
        }
        if self.timestamp_range.is_empty() {
            return Err(GenError::InvalidConfig(format!(
                "empty timestamp range {:?}",
                self.timestamp_range
            )));
        }
        Ok(())
    }

    /// # Errors
    /// Returns a description of the first field of `record` that could not have been
    /// sampled from this shape
    pub fn check(&self, record: &Record) -> Result<(), String> {
        if record.id.len() != self.id_len {
            return Err(format!(
                "id {:?} has {} characters, expected {}",
                record.id,
                record.id.len(),
                self.id_len
            ));
        }
        if !record.id.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(format!("id {:?} is not alphanumeric", record.id));
        }
        if !self.value_range.contains(&record.value) {
            return Err(format!(
                "value {} outside {:?}",
                record.value, self.value_range
            ));
        }
        if !self.timestamp_range.contains(&record.timestamp) {
            return Err(format!(
                "timestamp {} outside {:?}",
                record.timestamp, self.timestamp_range
            ));
        }
        Ok(())
    }

    /// Length in bytes of the longest line (newline included) this shape can produce.
    ///
    /// The final output overshoots the size threshold by less than this.
    #[must_use]
    pub fn max_line_len(&self) -> usize {
        // {"id":"","value":,"timestamp":}\n
        const FRAMING: usize = 32;
        let widest = |a: String, b: String| a.len().max(b.len());
        FRAMING
            + self.id_len
            + widest(
                self.value_range.start().to_string(),
                self.value_range.end().to_string(),
            )
            + widest(
                self.timestamp_range.start().to_string(),
                self.timestamp_range.end().to_string(),
            )
    }
}
