//! This crate provides a library for decoding baseline sequential
//! ITU-T T.81 (JPEG-1) images, together with discovery of the metadata
//! segments real-world JPEGs carry alongside their pixels: EXIF, ICC
//! profiles, XMP packets (including UltraHDR gain maps) and MPF indices.
//!
//! # Features
//!  - A compact integer IDCT, AAN-style separable two-pass, no SIMD.
//!  - Nearest-neighbour chroma up-sampling for any 1..=4 sampling factor.
//!  - A structured report of every marker segment walked, not just the
//!    ones this crate understands.
//!  - EXIF/ICC/XMP/UltraHDR/MPF discovery, each surfaced as its own typed
//!    report rather than one grab-bag struct.
//!
//! # Usage
//! Add this crate to the dependencies in the project `Cargo.toml`.
//!
//! # Examples
//!
//! ## Decode a JPEG byte stream with default options.
//! ```no_run
//! use jpeg_atlas::Decoder;
//! let data = std::fs::read("a_jpeg_file").unwrap();
//! let result = Decoder::new().decode(data).unwrap();
//! println!("{}x{}", result.width, result.height);
//! ```
//!
//! ## Decode to grayscale output and inspect embedded metadata.
//! ```no_run
//! use jpeg_atlas::{ColorSpace, Decoder, DecoderOptions};
//! let data = std::fs::read("a_jpeg_file").unwrap();
//! let mut decoder = Decoder::new_with_options(
//!     DecoderOptions::new().set_output_colorspace(ColorSpace::Grayscale)
//! );
//! let result = decoder.decode(data).unwrap();
//! if let Some(exif) = result.sidecars.exif {
//!     println!("{} EXIF entries", exif.entries.len());
//! }
//! ```
//!
//! ## Probe an image's dimensions without decoding pixels.
//! ```no_run
//! use jpeg_atlas::probe::probe;
//! let data = std::fs::read("a_jpeg_file").unwrap();
//! let info = probe(data).unwrap();
//! println!("{}x{}", info.width, info.height)
//! ```
//!
//! # Crate scope
//! This crate only speaks baseline sequential DCT (SOF0). Progressive,
//! lossless, arithmetic-coded, 12/16-bit and CMYK frames are all
//! recognised by marker and rejected with a typed error rather than
//! guessed at - there is no best-effort fallback path here.
//!
//! No unsafe code anywhere in this crate; the IDCT it carries is a plain
//! scalar implementation, so there is nothing gated behind a platform
//! feature to disable.

#![warn(
    clippy::correctness,
    clippy::perf,
    clippy::pedantic,
    clippy::inline_always,
    clippy::missing_errors_doc,
    clippy::panic
)]
#![allow(
    clippy::needless_return,
    clippy::similar_names,
    clippy::inline_always,
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

pub use crate::decoder::{DecodeResult, Decoder};
pub use crate::metadata::SidecarReport;
pub use crate::misc::ColorSpace;
pub use crate::options::DecoderOptions;

mod bitstream;
mod components;
mod decoder;
pub mod errors;
mod headers;
mod huffman;
mod idct;
mod logger;
mod marker;
mod mcu;
pub mod metadata;
mod misc;
mod options;
pub mod probe;
mod segments;
mod upsampler;
mod worker;
