//! Encyclopedia CLI library.
//!
//! Terminal styling and the text and JSON renderers behind the
//! `encyclopedia` binary.

pub mod output;
pub mod terminal;
