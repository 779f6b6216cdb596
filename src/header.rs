//! Gzip header and trailer construction.
//!
//! Per the Design Note in spec.md §9, this replaces the reference
//! implementation's variadic `put()`/`put_header()`/`put_trailer()` (which
//! packs a `va_list` of `(width, value)` pairs) with a small builder that
//! appends little-endian integers and byte slices to an in-memory buffer,
//! flushed once by the writer. `byteorder` supplies the endian-aware
//! integer writes, matching the dependency both pack repos that hand-roll
//! binary headers (`lz4r`'s frame header, `gzp`'s footer) reach for.

use byteorder::{LittleEndian, WriteBytesExt};

use crate::options::Options;

/// An in-memory buffer builder for the fixed gzip header and trailer.
#[derive(Default)]
pub struct GzipHeaderBuilder {
    buf: Vec<u8>,
}

impl GzipHeaderBuilder {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Build the 10-byte fixed header (plus an optional NUL-terminated
    /// original filename) for the given options, per the byte table in
    /// spec.md §6.
    pub fn header(options: &Options) -> Vec<u8> {
        let mut b = GzipHeaderBuilder::new();
        let has_name = options.name().is_some();

        b.buf.push(0x1f); // magic
        b.buf.push(0x8b); // magic
        b.buf.push(0x08); // compression method: deflate
        b.buf.push(if has_name { 0x08 } else { 0x00 }); // flags: FNAME bit
        b.buf.write_u32::<LittleEndian>(options.mtime()).expect("write to Vec cannot fail");
        b.buf.push(options.xflags());
        b.buf.push(0x03); // OS: Unix

        if let Some(name) = options.name() {
            b.buf.extend_from_slice(name.as_bytes());
            b.buf.push(0x00);
        }

        b.buf
    }

    /// Build the 8-byte trailer: little-endian CRC-32 followed by
    /// little-endian ISIZE (uncompressed length mod 2^32).
    pub fn trailer(crc: u32, uncompressed_len: u64) -> Vec<u8> {
        let mut b = GzipHeaderBuilder::new();
        b.buf.write_u32::<LittleEndian>(crc).expect("write to Vec cannot fail");
        b.buf
            .write_u32::<LittleEndian>((uncompressed_len & 0xffff_ffff) as u32)
            .expect("write to Vec cannot fail");
        b.buf
    }
}
