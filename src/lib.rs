//! Impaired Vision - see the world through simulated vision impairments
//!
//! Drives camera preview frames through the `vision-core` color pipeline
//! and onto a render target. This library exposes modules for integration
//! testing.

pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod services;
