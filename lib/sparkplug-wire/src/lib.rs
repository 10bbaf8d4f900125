//! A minimal writer for the subset of the Protocol Buffers wire format used by Sparkplug B payloads.
//!
//! This crate only ever writes: there is no reader, no schema handling, and no support for wire types beyond
//! varints, fixed 32/64-bit values and length-delimited fields.

#![deny(missing_docs)]

mod builder;
pub use self::builder::ByteStreamBuilder;

pub mod helpers;
pub use self::helpers::{sizeof_len, sizeof_tag, sizeof_varint, tag, WireType};
