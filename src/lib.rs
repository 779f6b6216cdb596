//! A parallel gzip-format compressor.
//!
//! # Overview
//!
//! `pigzr` splits an input stream into fixed-size blocks, compresses the
//! blocks concurrently across a pool of worker threads, and reassembles
//! the compressed output, in order, into a single standards-conformant
//! gzip member. This is the same strategy as `pigz`: a block-partitioned
//! DEFLATE pipeline rather than a single-threaded codec, trading a
//! modest amount of compression ratio (dictionary continuity is carried
//! across blocks rather than being one continuous window) for
//! near-linear speedup across cores.
//!
//! The pipeline has four moving parts:
//! - a [`pool::Pool`] of reusable, bounded-count byte buffers,
//! - a [`reader`] that partitions an input stream into [`job::Job`]s,
//!   each carrying the previous block's trailing 32 KiB as a dictionary,
//! - a set of [`worker`] threads that compress jobs independently and in
//!   any order,
//! - and a single [`writer`] thread that reassembles compressed blocks
//!   strictly in sequence, combining their checksums via [`crc`] and
//!   emitting one gzip header and trailer.
//!
//! [`core::compress`] wires all four together behind a single call.
//! Configuration lives in [`options::Options`], built via
//! [`options::OptionsBuilder`].
//!
//! # Example
//!
//! ```rust
//! use pigzr::{compress, Options};
//!
//! let options = Options::builder().level(6).unwrap().build();
//! let input = b"hello, pigzr".repeat(100);
//! let mut output = Vec::new();
//! compress(&options, &input[..], &mut output).unwrap();
//! ```
#![forbid(unsafe_code)]

pub mod core;
pub mod crc;
pub mod decompress;
pub mod deflate;
pub mod error;
pub mod header;
pub mod job;
pub mod options;
pub mod pool;
pub mod queue;
pub mod reader;
pub mod worker;
pub mod writer;

pub use crate::core::compress;
pub use crate::decompress::decompress;
pub use crate::error::{PigzError, PigzResult};
pub use crate::options::{Options, OptionsBuilder};
