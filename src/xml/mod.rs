//! XML codec: text ⇄ [`Document`](crate::model::Document).
//!
//! The parser is built on `quick-xml` and keeps entity references undecoded;
//! the serializer writes escaped content back verbatim, so a report survives a
//! parse/write cycle without double encoding.

mod parse;
mod write;

pub use parse::parse;
pub use write::{WriteOptions, write};
