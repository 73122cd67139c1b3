//! Configuration types

pub mod settings;
