//! Strict, allocator-pluggable JSON parsing and serialization.
//!
//! Parsing is a single pass over the input bytes: a hand-written recursive
//! descent machine that validates UTF-8 through a classifier table, decodes
//! string escapes (including UTF-16 surrogate pairs and CESU-8 pair
//! reassembly), folds numbers into a checked 64-bit accumulator with
//! promotion to floating point, and enforces the strict structural grammar
//! (no trailing commas, no leading zeros, at most [`DEPTH`] nested
//! containers). Failures are precise: one of the three dozen [`Status`]
//! diagnostics, never a position-less "syntax error".
//!
//! The serializer is the parser's round-trip partner: it shares the string
//! escaping rules and emits either compact or pretty text.
//!
//! # Architecture
//!
//! - [`Alloc`] - allocator context and the buffers built on it
//! - [`Status`] - the closed diagnostic vocabulary
//! - [`Value`] / [`Kind`] - the tagged value tree
//! - [`parse`] - the parser entry point
//! - `Value::to_string` / [`Value::to_string_pretty`] - serialization
//!
//! # Example
//!
//! ```
//! use strictjson::{parse, Alloc, Kind};
//!
//! let ctx = Alloc::default();
//! let value = parse(ctx, b"{ \"b\": 2, \"a\": [1, 1.5] }").unwrap();
//! assert_eq!(value.kind(), Kind::Object);
//! assert_eq!(value["a"][1].get_double(), 1.5);
//! assert_eq!(value.to_string(), "{\"a\":[1,1.5],\"b\":2}");
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(missing_docs)]

mod alloc;
mod escape;
mod float;
mod lexer;
mod parser;
mod ser;
mod status;
mod types;
mod utf8;

pub use alloc::{Alloc, AllocFn, FreeFn};
pub use parser::{parse, DEPTH};
pub use status::Status;
pub use types::{Kind, Value};
