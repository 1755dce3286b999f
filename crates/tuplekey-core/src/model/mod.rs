//! Runtime data model definitions.
//!
//! Types in `model` describe the shapes that selector recognition and key
//! synthesis reason about: static value types, record layouts, compound key
//! tuples, and the index descriptors that own a parsed key selector.
//!
//! In general:
//! - `types` and `record` describe *what a row looks like*
//! - `tuple` describes *what a key looks like*
//! - `index` binds the two together
pub mod index;
pub mod record;
pub mod tuple;
pub mod types;
