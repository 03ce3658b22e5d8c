//! Methods Module
//!
//! Static metadata describing Flickr's remote methods: arguments, permission
//! requirements, error catalogs and example responses. The data is loaded
//! from JSON and passed through without interpretation.

mod descriptor;
mod docs;
mod table;

pub use descriptor::{Argument, ErrorCode, MethodDescriptor, Permission};
pub use docs::{describe, format_block};
pub use table::MethodTable;
