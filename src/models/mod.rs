//! Data models for descriptors and the normalized keyboard model.
//!
//! This module contains all the core data structures used throughout the
//! crate. Models are plain owned data, independent of parsing and UI logic.

pub mod descriptor;
pub mod key;
pub mod keyboard;
pub mod layer;
pub mod layout_family;
pub mod peripherals;

// Re-export all model types
pub use descriptor::{DescriptorContent, FirmwareDescriptor};
pub use key::{KeyHalf, KeySpec};
pub use keyboard::{FirmwareType, KeyboardModel, ModelMetadata};
pub use layer::LayerSpec;
pub use layout_family::LayoutFamily;
pub use peripherals::{DisplaySpec, EncoderSpec, TrackballSpec};
