//! Configuration building blocks: option derivation, directory resolution,
//! source enumeration and presets. These are consumed by the batch driver in
//! the `api` module.
pub mod dirs;
pub mod params;
pub mod preset;
pub mod sources;
