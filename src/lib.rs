//! huffpack: Huffman prefix coding with a padded, byte-aligned bit packer.
//!
//! The pipeline has four stages:
//! - Frequency counting over the input symbols
//! - Tree building by greedy min-priority-queue merging
//! - Code table generation from the tree paths
//! - Bit packing into a stream whose first byte records the pad amount
//!
//! The code table is not embedded in the packed stream. Whoever keeps the
//! stream must also keep the table (or the original input to rebuild it).
//!
//! ```
//! let (stream, table) = huffpack::encode_text("AABBBCCCC")?;
//! assert_eq!(huffpack::decode_text(&stream, &table)?, "AABBBCCCC");
//! # Ok::<(), huffpack::error::CodecError>(())
//! ```

pub mod codes;
pub mod config;
pub mod error;
pub mod frequency;
pub mod packer;
pub mod symbol;
pub mod tree;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use crate::codes::{Code, CodeTable};
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
pub use crate::frequency::FrequencyTable;
pub use crate::packer::PackedStream;
pub use crate::symbol::Symbol;
pub use crate::tree::{build_tree, TreeNode};

/// Count, build and walk: the code table for `symbols`.
pub fn table_for<S: Symbol>(symbols: &[S]) -> Result<CodeTable<S>> {
    let freqs = FrequencyTable::count(symbols.iter().copied());
    let tree = build_tree(&freqs)?;
    CodeTable::from_tree(&tree)
}

/// Encode `symbols`, returning the packed stream and the table needed to decode it.
pub fn encode<S: Symbol>(symbols: &[S]) -> Result<(PackedStream, CodeTable<S>)> {
    let table = table_for(symbols)?;
    let stream = packer::pack(symbols, &table)?;
    Ok((stream, table))
}

/// Decode a stream produced by [`encode`] with its matching table.
pub fn decode<S: Symbol>(stream: &PackedStream, table: &CodeTable<S>) -> Result<Vec<S>> {
    packer::unpack(stream, table)
}

/// Encode text with trailing whitespace removed.
pub fn encode_text(text: &str) -> Result<(PackedStream, CodeTable<char>)> {
    let symbols: Vec<char> = text.trim_end().chars().collect();
    encode(&symbols)
}

pub fn decode_text(stream: &PackedStream, table: &CodeTable<char>) -> Result<String> {
    Ok(decode(stream, table)?.into_iter().collect())
}

/// Packed stream plus everything needed to reverse it
#[derive(Debug, Clone)]
pub struct Compressed<S: Symbol> {
    pub stream: PackedStream,
    pub table: CodeTable<S>,
    pub stats: CompressionStats,
}

/// Statistics about one compression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionStats {
    pub original_symbols: usize,
    pub packed_bytes: usize,
    /// Packed bytes per input symbol.
    pub ratio: f64,
    /// Shannon entropy of the input, bits per symbol.
    pub entropy_bits: f64,
    /// Average code length, bits per symbol.
    pub avg_code_bits: f64,
    pub alphabet_size: usize,
    pub pad: u8,
}

/// The codec engine
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    /// Create a codec with the given configuration
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compress a symbol sequence. Empty input is rejected with `EmptyAlphabet`.
    pub fn compress<S: Symbol>(&self, symbols: &[S]) -> Result<Compressed<S>> {
        if symbols.len() > self.config.max_input_size {
            return Err(CodecError::InputTooLarge {
                size: symbols.len(),
                max: self.config.max_input_size,
            });
        }

        let freqs = FrequencyTable::count(symbols.iter().copied());
        let tree = build_tree(&freqs)?;
        let table = CodeTable::from_tree(&tree)?;
        let stream = packer::pack(symbols, &table)?;

        let code_bits = table.weighted_length(&freqs);
        let stats = CompressionStats {
            original_symbols: symbols.len(),
            packed_bytes: stream.len(),
            ratio: stream.len() as f64 / symbols.len() as f64,
            entropy_bits: freqs.entropy_bits(),
            avg_code_bits: code_bits as f64 / symbols.len() as f64,
            alphabet_size: table.len(),
            pad: stream.pad()?,
        };
        debug!(
            symbols = stats.original_symbols,
            bytes = stats.packed_bytes,
            ratio = stats.ratio,
            "compressed"
        );

        Ok(Compressed {
            stream,
            table,
            stats,
        })
    }

    pub fn decompress<S: Symbol>(&self, compressed: &Compressed<S>) -> Result<Vec<S>> {
        let symbols =
            packer::unpack_with(&compressed.stream, &compressed.table, self.config.verify_padding)?;
        if symbols.len() != compressed.stats.original_symbols {
            return Err(CodecError::CorruptStream(format!(
                "decoded {} symbols, expected {}",
                symbols.len(),
                compressed.stats.original_symbols
            )));
        }
        Ok(symbols)
    }

    /// Compress text, trimming trailing whitespace when configured.
    pub fn compress_text(&self, text: &str) -> Result<Compressed<char>> {
        let text = if self.config.trim_trailing_whitespace {
            text.trim_end()
        } else {
            text
        };
        let symbols: Vec<char> = text.chars().collect();
        self.compress(&symbols)
    }

    pub fn decompress_text(&self, compressed: &Compressed<char>) -> Result<String> {
        Ok(self.decompress(compressed)?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_text() {
        let codec = Codec::default();
        let result = codec.compress_text("hello world hello world hello world").unwrap();
        assert!(result.stats.packed_bytes > 0);
        assert_eq!(result.stats.original_symbols, 35);
        assert_eq!(result.stats.alphabet_size, 8);
    }

    #[test]
    fn test_compress_empty() {
        let codec = Codec::default();
        let err = codec.compress::<u8>(&[]).unwrap_err();
        assert!(matches!(err, CodecError::EmptyAlphabet));
        assert!(matches!(encode_text("  \n"), Err(CodecError::EmptyAlphabet)));
    }

    #[test]
    fn test_roundtrip_bytes() {
        let codec = Codec::default();
        let data = b"the quick brown fox jumps over the lazy dog";
        let compressed = codec.compress(data).unwrap();
        assert_eq!(codec.decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_trailing_whitespace_trimmed() {
        let codec = Codec::default();
        let compressed = codec.compress_text("abc  \n\t").unwrap();
        assert_eq!(codec.decompress_text(&compressed).unwrap(), "abc");

        let keep = Codec::new(CodecConfig {
            trim_trailing_whitespace: false,
            ..CodecConfig::default()
        });
        let compressed = keep.compress_text("abc \n").unwrap();
        assert_eq!(keep.decompress_text(&compressed).unwrap(), "abc \n");
    }

    #[test]
    fn test_input_limit() {
        let codec = Codec::new(CodecConfig {
            max_input_size: 4,
            ..CodecConfig::default()
        });
        let err = codec.compress(b"abcde").unwrap_err();
        assert!(matches!(err, CodecError::InputTooLarge { size: 5, max: 4 }));
    }

    #[test]
    fn test_stats() {
        let codec = Codec::default();
        let data = "aaaaaaaaaa".repeat(100);
        let result = codec.compress(data.as_bytes()).unwrap();
        assert!(result.stats.ratio < 0.2, "one-bit codes should pack 8 per byte");
        assert!(result.stats.entropy_bits < 0.01);
        assert_eq!(result.stats.avg_code_bits, 1.0);
        assert_eq!(result.stats.pad, 8);
    }

    #[test]
    fn test_decompress_detects_missing_symbols() {
        let codec = Codec::default();
        let mut compressed = codec.compress_text("AABBBCCCC").unwrap();
        compressed.stats.original_symbols += 1;
        assert!(matches!(
            codec.decompress(&compressed),
            Err(CodecError::CorruptStream(_))
        ));
    }

    #[test]
    fn test_stats_serialize() {
        let codec = Codec::default();
        let result = codec.compress_text("AABBBCCCC").unwrap();
        let json = serde_json::to_string(&result.stats).unwrap();
        let back: CompressionStats = serde_json::from_str(&json).unwrap();
        assert_eq!(back.original_symbols, 9);
        assert_eq!(back.packed_bytes, 3);
        assert_eq!(back.pad, 2);
        assert!((back.ratio - result.stats.ratio).abs() < 1e-12);
    }
}
