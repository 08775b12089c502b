//! Bit packing and unpacking
//!
//! A packed stream is one header byte holding the pad amount followed by the
//! concatenated codes, most-significant bit first, zero-padded to a byte
//! boundary. The pad is `8 - (bits % 8)`, so an already aligned payload still
//! gains a full zero byte and a header of 8.

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use tracing::{debug, warn};

use crate::codes::CodeTable;
use crate::error::{CodecError, Result};
use crate::symbol::Symbol;

/// Largest pad amount a header may record.
pub const MAX_PAD: u8 = 8;

/// Header byte followed by the byte-aligned payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackedStream(Vec<u8>);

impl PackedStream {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The pad amount recorded in the header, validated against the payload.
    pub fn pad(&self) -> Result<u8> {
        let (&pad, payload) = self
            .0
            .split_first()
            .ok_or_else(|| corrupt("missing pad header".into()))?;
        if pad > MAX_PAD {
            return Err(corrupt(format!("pad amount {pad} out of range 0..={MAX_PAD}")));
        }
        if usize::from(pad) > payload.len() * 8 {
            return Err(corrupt(format!(
                "pad amount {pad} exceeds {} payload bits",
                payload.len() * 8
            )));
        }
        Ok(pad)
    }

    /// Payload bits carrying codes, i.e. everything after the header minus the pad.
    pub fn payload_bits(&self) -> Result<usize> {
        let pad = self.pad()?;
        Ok((self.0.len() - 1) * 8 - usize::from(pad))
    }
}

impl From<PackedStream> for Vec<u8> {
    fn from(stream: PackedStream) -> Self {
        stream.0
    }
}

impl AsRef<[u8]> for PackedStream {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

fn corrupt(reason: String) -> CodecError {
    warn!(%reason, "rejecting packed stream");
    CodecError::CorruptStream(reason)
}

/// Pack `symbols` using `table`.
pub fn pack<S: Symbol>(symbols: &[S], table: &CodeTable<S>) -> Result<PackedStream> {
    let bit_len = table.encoded_bit_len(symbols)?;
    let pad = MAX_PAD - (bit_len % 8) as u8;

    let mut out = Vec::with_capacity(1 + (bit_len + usize::from(pad)) / 8);
    out.push(pad);

    let mut writer = BitWriter::endian(out, BigEndian);
    for sym in symbols {
        let code = table
            .code_for(sym)
            .ok_or_else(|| CodecError::UnknownSymbol(format!("{sym:?}")))?;
        for &bit in code {
            writer.write_bit(bit)?;
        }
    }
    for _ in 0..pad {
        writer.write_bit(false)?;
    }
    let out = writer.into_writer();

    debug!(
        symbols = symbols.len(),
        bits = bit_len,
        pad,
        bytes = out.len(),
        "packed stream"
    );
    Ok(PackedStream(out))
}

/// Unpack `stream` with the table it was packed with, checking the pad bits.
pub fn unpack<S: Symbol>(stream: &PackedStream, table: &CodeTable<S>) -> Result<Vec<S>> {
    unpack_with(stream, table, true)
}

/// Unpack `stream`; when `verify_padding` is set, non-zero pad bits are rejected.
pub fn unpack_with<S: Symbol>(
    stream: &PackedStream,
    table: &CodeTable<S>,
    verify_padding: bool,
) -> Result<Vec<S>> {
    let pad = stream.pad()?;
    let data_bits = stream.payload_bits()?;
    let max_code_len = table.max_code_len();

    let mut reader = BitReader::endian(&stream.0[1..], BigEndian);
    let mut output = Vec::new();
    let mut candidate = Vec::with_capacity(max_code_len);

    for _ in 0..data_bits {
        candidate.push(reader.read_bit()?);
        if let Some(sym) = table.symbol_for(&candidate) {
            output.push(sym);
            candidate.clear();
        } else if candidate.len() >= max_code_len {
            return Err(corrupt(format!(
                "{} bits match no code",
                candidate.len()
            )));
        }
    }

    if !candidate.is_empty() {
        return Err(corrupt(format!(
            "stream ends inside a code ({} dangling bits)",
            candidate.len()
        )));
    }

    if verify_padding {
        for _ in 0..pad {
            if reader.read_bit()? {
                return Err(corrupt("non-zero pad bit".into()));
            }
        }
    }

    debug!(symbols = output.len(), bits = data_bits, pad, "unpacked stream");
    Ok(output)
}
