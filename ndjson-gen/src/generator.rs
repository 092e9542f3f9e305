use std::fs::File;
use std::io::{self, BufWriter, Write};

use flate2::write::GzEncoder;
use flate2::Compression;
use log::{debug, info};
use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GeneratorConfig;
use crate::error::GenError;
use crate::record::Record;

/// Records between progress log lines
pub const PROGRESS_INTERVAL: u64 = 1_000_000;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSummary {
    pub records: u64,
    /// Bytes written before compression, newlines included
    pub uncompressed_bytes: u64,
}

/// Writes gzip-compressed NDJSON records to `config.output_path` until at least
/// `config.threshold_bytes` of uncompressed output has been produced.
///
/// On error the encoder and file are dropped as the error propagates, which closes the
/// file. Whatever was written so far is left in place.
///
/// # Errors
/// Errors when the output file cannot be created or written, including when the gzip
/// trailer cannot be flushed, or when `config.shape` is invalid
pub fn generate(config: &GeneratorConfig) -> Result<GenerationSummary, GenError> {
    config.shape.validate()?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        "Writing at least {} bytes of records to {}",
        config.threshold_bytes,
        config.output_path.display()
    );
    let file = File::create(&config.output_path)?;
    let mut writer = BufWriter::new(GzEncoder::new(file, Compression::default()));

    let summary = write_records(&mut writer, &mut rng, config)?;

    let encoder = writer.into_inner().map_err(io::IntoInnerError::into_error)?;
    encoder.finish()?;

    info!(
        "Wrote {} records ({} bytes uncompressed) to {}",
        summary.records,
        summary.uncompressed_bytes,
        config.output_path.display()
    );
    Ok(summary)
}

/// The generation loop, independent of where the bytes end up.
///
/// Each iteration samples one [Record], writes it as a line of compact JSON and adds the
/// line's length to the running total. The total is checked only after a write, so at
/// least one record is always written and the output overshoots the threshold by less
/// than [`max_line_len`](crate::record::RecordShape::max_line_len).
///
/// # Errors
/// Errors when writing to `writer` fails, or when `config.shape` is invalid
pub fn write_records<W, R>(
    writer: &mut W,
    rng: &mut R,
    config: &GeneratorConfig,
) -> Result<GenerationSummary, GenError>
where
    W: Write,
    R: Rng + ?Sized,
{
    config.shape.validate()?;

    let mut line = Vec::with_capacity(config.shape.max_line_len());
    let mut summary = GenerationSummary::default();
    loop {
        let record: Record = config.shape.sample(rng);
        line.clear();
        serde_json::to_writer(&mut line, &record)?;
        line.push(b'\n');
        writer.write_all(&line)?;

        summary.records += 1;
        summary.uncompressed_bytes += line.len() as u64;
        if summary.records % PROGRESS_INTERVAL == 0 {
            debug!(
                "{} records, {} of {} bytes",
                summary.records, summary.uncompressed_bytes, config.threshold_bytes
            );
        }

        if summary.uncompressed_bytes >= config.threshold_bytes {
            break;
        }
    }
    writer.flush()?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordShape;

    fn config_with_threshold(threshold_bytes: u64) -> GeneratorConfig {
        GeneratorConfig {
            threshold_bytes,
            ..GeneratorConfig::default()
        }
    }

    fn lines(buf: &[u8]) -> Vec<&str> {
        std::str::from_utf8(buf)
            .unwrap()
            .split_terminator('\n')
            .collect()
    }

    /// Fails every write after the first `remaining` bytes, like a disk filling up
    struct FullDisk {
        remaining: usize,
    }

    impl Write for FullDisk {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.remaining == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "no space left"));
            }
            let n = buf.len().min(self.remaining);
            self.remaining -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_small_threshold_stops_after_crossing() {
        let config = config_with_threshold(50);
        let mut rng = StdRng::seed_from_u64(1);
        let mut buf = Vec::new();
        let summary = write_records(&mut buf, &mut rng, &config).unwrap();

        assert!(summary.records >= 1);
        assert_eq!(summary.uncompressed_bytes, buf.len() as u64);
        assert!(summary.uncompressed_bytes >= 50);
        assert!(summary.uncompressed_bytes < 50 + config.shape.max_line_len() as u64);
        assert_eq!(lines(&buf).len() as u64, summary.records);
        assert!(buf.ends_with(b"\n"));
    }

    #[test]
    fn test_zero_threshold_writes_one_record() {
        let config = config_with_threshold(0);
        let mut rng = StdRng::seed_from_u64(2);
        let mut buf = Vec::new();
        let summary = write_records(&mut buf, &mut rng, &config).unwrap();
        assert_eq!(summary.records, 1);
        assert_eq!(lines(&buf).len(), 1);
    }

    #[test]
    fn test_overshoot_is_less_than_one_line() {
        let config = config_with_threshold(100_000);
        let mut rng = StdRng::seed_from_u64(3);
        let mut buf = Vec::new();
        let summary = write_records(&mut buf, &mut rng, &config).unwrap();

        let all = lines(&buf);
        let last = all.last().unwrap().len() as u64 + 1;
        // Stopping one record earlier would have been under the threshold
        assert!(summary.uncompressed_bytes - last < 100_000);
        assert!(summary.uncompressed_bytes >= 100_000);
    }

    #[test]
    fn test_every_line_is_a_record() {
        let config = config_with_threshold(20_000);
        let mut rng = StdRng::seed_from_u64(4);
        let mut buf = Vec::new();
        write_records(&mut buf, &mut rng, &config).unwrap();

        for line in lines(&buf) {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            let object = value.as_object().unwrap();
            let keys: Vec<&str> = object.keys().map(String::as_str).collect();
            assert_eq!(keys.len(), 3);
            for key in ["id", "value", "timestamp"] {
                assert!(object.contains_key(key));
            }
            assert!(line.starts_with(r#"{"id":""#));

            let record: Record = serde_json::from_str(line).unwrap();
            assert!(config.shape.check(&record).is_ok());
        }
    }

    #[test]
    fn test_same_seed_same_output() {
        let config = config_with_threshold(5_000);
        let mut a = Vec::new();
        let mut b = Vec::new();
        write_records(&mut a, &mut StdRng::seed_from_u64(9), &config).unwrap();
        write_records(&mut b, &mut StdRng::seed_from_u64(9), &config).unwrap();
        assert_eq!(a, b);

        let mut c = Vec::new();
        write_records(&mut c, &mut StdRng::seed_from_u64(10), &config).unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn test_write_error_propagates() {
        let config = config_with_threshold(10_000);
        let mut rng = StdRng::seed_from_u64(5);
        let mut disk = FullDisk { remaining: 500 };
        let result = write_records(&mut disk, &mut rng, &config);
        assert!(matches!(result, Err(GenError::IoError(_))));
    }

    #[test]
    fn test_invalid_shape_is_rejected() {
        #[allow(clippy::reversed_empty_ranges)]
        let config = GeneratorConfig {
            shape: RecordShape {
                timestamp_range: 10..=0,
                ..RecordShape::default()
            },
            ..config_with_threshold(50)
        };
        let mut buf = Vec::new();
        let result = write_records(&mut buf, &mut StdRng::seed_from_u64(6), &config);
        assert!(matches!(result, Err(GenError::InvalidConfig(_))));
        assert!(buf.is_empty());
    }
}
