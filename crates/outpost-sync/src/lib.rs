//! Codec for S3JSON, the nested JSON tree exchanged with the server.
//!
//! A tree holds one collection per table under a `"$_<table>"` key. Items
//! are identified by their `"@uuid"` and point at other items through
//! `"$k_<field>"` foreign keys. [`decode`] turns a tree into typed
//! [`Record`]s, following foreign keys to every item the root collection
//! depends on. [`encode_record`] and the assembly helpers go the other way.

pub mod key;

mod decode;
pub use decode::{decode, Decoded};

mod encode;
pub use encode::{add_file, add_reference, encode, encode_record, EncodedRecord};

mod record;
pub use record::{Record, Reference};

mod source_map;
pub use source_map::SourceMap;
