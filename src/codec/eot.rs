//! Embedded OpenType (EOT) container.
//!
//! An EOT file is a little-endian header followed by the raw sfnt data,
//! which always sits at the very end of the file. Subsetting only needs to
//! cut the payload out and later put a new one back behind the same header.

use super::CodecError;
use crate::classify::FontFormat;

/// Bytes up to and including `Padding1`; the variable-length names follow.
const FIXED_HEADER_LEN: usize = 82;

/// `MagicNumber` field value.
const MAGIC_NUMBER: u16 = 0x504C;
const MAGIC_OFFSET: usize = 34;
const FLAGS_OFFSET: usize = 12;

/// Payload is MicroType Express compressed.
const TTEMBED_TTCOMPRESSED: u32 = 0x0000_0004;
/// Payload is XOR-obfuscated with [`XOR_KEY`].
const TTEMBED_XORENCRYPTDATA: u32 = 0x1000_0000;
const XOR_KEY: u8 = 0x50;

/// A parsed EOT file borrowing its input.
#[derive(Debug, Clone, Copy)]
pub struct EotContainer<'a> {
    header: &'a [u8],
    payload: &'a [u8],
    flags: u32,
}

impl<'a> EotContainer<'a> {
    /// Split an EOT file into header and font payload.
    pub fn parse(bytes: &'a [u8]) -> Result<Self, CodecError> {
        if bytes.len() < FIXED_HEADER_LEN {
            return Err(malformed("file shorter than the EOT header"));
        }

        let eot_size = read_u32(bytes, 0) as usize;
        let font_data_size = read_u32(bytes, 4) as usize;
        let flags = read_u32(bytes, FLAGS_OFFSET);

        if read_u16(bytes, MAGIC_OFFSET) != MAGIC_NUMBER {
            return Err(malformed("bad magic number"));
        }
        if eot_size > bytes.len() {
            return Err(malformed(format!(
                "EOTSize {} exceeds file length {}",
                eot_size,
                bytes.len()
            )));
        }
        if font_data_size > eot_size.saturating_sub(FIXED_HEADER_LEN) {
            return Err(malformed(format!(
                "FontDataSize {} does not fit in EOTSize {}",
                font_data_size, eot_size
            )));
        }
        if flags & TTEMBED_TTCOMPRESSED != 0 {
            return Err(malformed(
                "MicroType Express compressed payloads are not supported",
            ));
        }

        let data_offset = eot_size - font_data_size;
        Ok(Self {
            header: &bytes[..data_offset],
            payload: &bytes[data_offset..eot_size],
            flags,
        })
    }

    /// The plain sfnt font inside the container.
    pub fn font_data(&self) -> Vec<u8> {
        if self.is_obfuscated() {
            self.payload.iter().map(|b| b ^ XOR_KEY).collect()
        } else {
            self.payload.to_vec()
        }
    }

    /// Build a new EOT file with the same header around `sfnt`.
    ///
    /// `EOTSize` and `FontDataSize` are rewritten; obfuscation is reapplied
    /// when the original used it.
    pub fn rewrap(&self, sfnt: &[u8]) -> Result<Vec<u8>, CodecError> {
        let total = self.header.len() + sfnt.len();
        let eot_size = u32::try_from(total).map_err(|_| malformed("font too large for EOT"))?;
        let font_data_size =
            u32::try_from(sfnt.len()).map_err(|_| malformed("font too large for EOT"))?;

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(self.header);
        out[0..4].copy_from_slice(&eot_size.to_le_bytes());
        out[4..8].copy_from_slice(&font_data_size.to_le_bytes());

        if self.is_obfuscated() {
            out.extend(sfnt.iter().map(|b| b ^ XOR_KEY));
        } else {
            out.extend_from_slice(sfnt);
        }
        Ok(out)
    }

    fn is_obfuscated(&self) -> bool {
        self.flags & TTEMBED_XORENCRYPTDATA != 0
    }
}

fn malformed(message: impl Into<String>) -> CodecError {
    CodecError::container(FontFormat::Eot, message)
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([bytes[offset], bytes[offset + 1]])
}
