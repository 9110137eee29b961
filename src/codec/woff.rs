//! WOFF and WOFF2 containers.
//!
//! WOFF 1.0 is a table directory over individually zlib-compressed sfnt
//! tables and is handled here with `flate2`. WOFF2 (brotli plus glyf/loca
//! transforms) goes through the `woff` crate.

use super::CodecError;
use crate::classify::FontFormat;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::borrow::Cow;
use std::cmp::Ordering;
use std::io::{Read, Write};

const WOFF_SIGNATURE: &[u8; 4] = b"wOFF";
const WOFF2_SIGNATURE: &[u8; 4] = b"wOF2";

const WOFF_HEADER_LEN: usize = 44;
const WOFF_ENTRY_LEN: usize = 20;
const SFNT_HEADER_LEN: usize = 12;
const SFNT_ENTRY_LEN: usize = 16;

/// Brotli quality used when re-encoding WOFF2.
const WOFF2_QUALITY: usize = 11;

/// Font version carried in a WOFF 1.0 header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WoffVersion {
    pub major: u16,
    pub minor: u16,
}

/// One uncompressed sfnt table.
struct Table<'a> {
    tag: [u8; 4],
    checksum: u32,
    data: Cow<'a, [u8]>,
}

/// Decode a WOFF 1.0 file, returning the sfnt and its header version.
pub fn unwrap_woff(bytes: &[u8]) -> Result<(Vec<u8>, WoffVersion), CodecError> {
    check_signature(bytes, WOFF_SIGNATURE, FontFormat::Woff)?;
    if bytes.len() < WOFF_HEADER_LEN {
        return Err(malformed("truncated header"));
    }

    let flavor = read_u32(bytes, 4);
    let num_tables = usize::from(read_u16(bytes, 12));
    let version = WoffVersion {
        major: read_u16(bytes, 20),
        minor: read_u16(bytes, 22),
    };

    let directory = bytes
        .get(WOFF_HEADER_LEN..WOFF_HEADER_LEN + num_tables * WOFF_ENTRY_LEN)
        .ok_or_else(|| malformed("table directory out of bounds"))?;

    let mut tables = Vec::with_capacity(num_tables);
    for entry in directory.chunks_exact(WOFF_ENTRY_LEN) {
        let tag = read_tag(entry);
        let offset = read_u32(entry, 4) as usize;
        let comp_length = read_u32(entry, 8) as usize;
        let orig_length = read_u32(entry, 12) as usize;

        let stored = offset
            .checked_add(comp_length)
            .and_then(|end| bytes.get(offset..end))
            .ok_or_else(|| malformed(format!("table {} out of bounds", tag_name(&tag))))?;

        let data = match comp_length.cmp(&orig_length) {
            Ordering::Equal => Cow::Borrowed(stored),
            Ordering::Less => Cow::Owned(inflate(stored, orig_length, &tag)?),
            Ordering::Greater => {
                return Err(malformed(format!(
                    "table {} is longer compressed than uncompressed",
                    tag_name(&tag)
                )));
            }
        };

        tables.push(Table {
            tag,
            checksum: read_u32(entry, 16),
            data,
        });
    }

    Ok((write_sfnt(flavor, &tables)?, version))
}

/// Encode an sfnt as WOFF 1.0.
///
/// Each table is stored deflated when that makes it smaller, raw otherwise.
/// No metadata or private block is written.
pub fn wrap_woff(sfnt: &[u8], version: WoffVersion) -> Result<Vec<u8>, CodecError> {
    let (flavor, mut tables) = read_sfnt(sfnt)?;
    tables.sort_by(|a, b| a.tag.cmp(&b.tag));

    let compressed = tables
        .iter()
        .map(|table| deflate(&table.data))
        .collect::<Result<Vec<_>, _>>()?;
    let stored: Vec<&[u8]> = tables
        .iter()
        .zip(&compressed)
        .map(|(table, deflated)| {
            if deflated.len() < table.data.len() {
                deflated.as_slice()
            } else {
                &table.data[..]
            }
        })
        .collect();

    let mut offset = WOFF_HEADER_LEN + tables.len() * WOFF_ENTRY_LEN;
    let woff_len = offset + stored.iter().map(|data| padded(data.len())).sum::<usize>();
    let sfnt_len = SFNT_HEADER_LEN
        + tables.len() * SFNT_ENTRY_LEN
        + tables.iter().map(|table| padded(table.data.len())).sum::<usize>();

    let mut out = Vec::with_capacity(woff_len);
    out.extend_from_slice(WOFF_SIGNATURE);
    out.extend_from_slice(&flavor.to_be_bytes());
    out.extend_from_slice(&to_u32(woff_len)?.to_be_bytes());
    out.extend_from_slice(&(tables.len() as u16).to_be_bytes());
    out.extend_from_slice(&[0, 0]);
    out.extend_from_slice(&to_u32(sfnt_len)?.to_be_bytes());
    out.extend_from_slice(&version.major.to_be_bytes());
    out.extend_from_slice(&version.minor.to_be_bytes());
    // metaOffset, metaLength, metaOrigLength, privOffset, privLength
    out.extend_from_slice(&[0; 20]);

    for (table, data) in tables.iter().zip(&stored) {
        out.extend_from_slice(&table.tag);
        out.extend_from_slice(&to_u32(offset)?.to_be_bytes());
        out.extend_from_slice(&to_u32(data.len())?.to_be_bytes());
        out.extend_from_slice(&to_u32(table.data.len())?.to_be_bytes());
        out.extend_from_slice(&table.checksum.to_be_bytes());
        offset += padded(data.len());
    }
    for data in &stored {
        out.extend_from_slice(data);
        out.resize(padded(out.len()), 0);
    }

    Ok(out)
}

/// Decode a WOFF2 file to sfnt.
pub fn unwrap_woff2(bytes: &[u8]) -> Result<Vec<u8>, CodecError> {
    check_signature(bytes, WOFF2_SIGNATURE, FontFormat::Woff2)?;
    ::woff::version2::decompress(bytes)
        .ok_or_else(|| CodecError::container(FontFormat::Woff2, "failed to decompress tables"))
}

/// Encode an sfnt as WOFF2.
pub fn wrap_woff2(sfnt: &[u8]) -> Result<Vec<u8>, CodecError> {
    ::woff::version2::compress(sfnt, String::new(), WOFF2_QUALITY, true)
        .ok_or_else(|| CodecError::container(FontFormat::Woff2, "failed to compress tables"))
}

/// Split an sfnt into its tables, in directory order.
fn read_sfnt(sfnt: &[u8]) -> Result<(u32, Vec<Table<'_>>), CodecError> {
    if sfnt.len() < SFNT_HEADER_LEN {
        return Err(malformed("sfnt shorter than its header"));
    }

    let flavor = read_u32(sfnt, 0);
    let num_tables = usize::from(read_u16(sfnt, 4));
    let directory = sfnt
        .get(SFNT_HEADER_LEN..SFNT_HEADER_LEN + num_tables * SFNT_ENTRY_LEN)
        .ok_or_else(|| malformed("sfnt table directory out of bounds"))?;

    let tables = directory
        .chunks_exact(SFNT_ENTRY_LEN)
        .map(|entry| sfnt_table(sfnt, entry))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((flavor, tables))
}

fn sfnt_table<'a>(sfnt: &'a [u8], entry: &[u8]) -> Result<Table<'a>, CodecError> {
    let tag = read_tag(entry);
    let offset = read_u32(entry, 8) as usize;
    let length = read_u32(entry, 12) as usize;
    let data = offset
        .checked_add(length)
        .and_then(|end| sfnt.get(offset..end))
        .ok_or_else(|| malformed(format!("sfnt table {} out of bounds", tag_name(&tag))))?;

    Ok(Table {
        tag,
        checksum: read_u32(entry, 4),
        data: Cow::Borrowed(data),
    })
}

/// Lay `tables` out as an sfnt, 4-byte aligned, in the given order.
fn write_sfnt(flavor: u32, tables: &[Table<'_>]) -> Result<Vec<u8>, CodecError> {
    let num_tables = tables.len() as u16;
    let entry_selector = if num_tables == 0 {
        0
    } else {
        15 - num_tables.leading_zeros() as u16
    };
    let search_range = (16u32 << entry_selector).min(u32::from(u16::MAX)) as u16;
    let range_shift = (num_tables.saturating_mul(16)).saturating_sub(search_range);

    let mut offset = SFNT_HEADER_LEN + tables.len() * SFNT_ENTRY_LEN;
    let total = offset + tables.iter().map(|table| padded(table.data.len())).sum::<usize>();

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&flavor.to_be_bytes());
    out.extend_from_slice(&num_tables.to_be_bytes());
    out.extend_from_slice(&search_range.to_be_bytes());
    out.extend_from_slice(&entry_selector.to_be_bytes());
    out.extend_from_slice(&range_shift.to_be_bytes());

    for table in tables {
        out.extend_from_slice(&table.tag);
        out.extend_from_slice(&table.checksum.to_be_bytes());
        out.extend_from_slice(&to_u32(offset)?.to_be_bytes());
        out.extend_from_slice(&to_u32(table.data.len())?.to_be_bytes());
        offset += padded(table.data.len());
    }
    for table in tables {
        out.extend_from_slice(&table.data);
        out.resize(padded(out.len()), 0);
    }

    Ok(out)
}

fn inflate(stored: &[u8], orig_length: usize, tag: &[u8; 4]) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::with_capacity(orig_length);
    ZlibDecoder::new(stored)
        .take(orig_length as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| malformed(format!("table {}: {}", tag_name(tag), e)))?;

    if out.len() != orig_length {
        return Err(malformed(format!(
            "table {} inflated to {} bytes, expected {}",
            tag_name(tag),
            out.len(),
            orig_length
        )));
    }
    Ok(out)
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, CodecError> {
    let mut encoder = ZlibEncoder::new(Vec::with_capacity(data.len()), Compression::best());
    encoder
        .write_all(data)
        .map_err(|e| malformed(format!("deflate: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| malformed(format!("deflate: {}", e)))
}

fn check_signature(bytes: &[u8], expected: &[u8; 4], format: FontFormat) -> Result<(), CodecError> {
    if bytes.get(..4) == Some(&expected[..]) {
        Ok(())
    } else {
        Err(CodecError::container(format, "bad signature"))
    }
}

fn malformed(message: impl Into<String>) -> CodecError {
    CodecError::container(FontFormat::Woff, message)
}

fn to_u32(value: usize) -> Result<u32, CodecError> {
    u32::try_from(value).map_err(|_| malformed("font too large for WOFF"))
}

fn padded(len: usize) -> usize {
    (len + 3) & !3
}

fn tag_name(tag: &[u8; 4]) -> Cow<'_, str> {
    String::from_utf8_lossy(tag)
}

fn read_tag(bytes: &[u8]) -> [u8; 4] {
    [bytes[0], bytes[1], bytes[2], bytes[3]]
}

fn read_u16(bytes: &[u8], offset: usize) -> u16 {
    u16::from_be_bytes([bytes[offset], bytes[offset + 1]])
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}
