#![doc = include_str!("../../README.md")]
//! Crate-specific API surface for `geowire-diesel`.

pub mod types;

pub use types::Geometry;
