//! KeyProbe Library
//!
//! This library normalizes heterogeneous keyboard-firmware descriptor
//! artifacts (JSON configs, ZMK keymap sources, QMK C sources, compiled
//! binaries) into a single spatial keyboard model: key identities, matrix
//! coordinates, pixel geometry, layers, and auxiliary peripherals.
//!
//! Entry point: [`parser::parse_descriptor`] (or [`parser::parse_file`]
//! for on-disk artifacts).

// Module declarations
pub mod config;
pub mod constants;
pub mod error;
pub mod geometry;
pub mod models;
pub mod parser;
pub mod session;
