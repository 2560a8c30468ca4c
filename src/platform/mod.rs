//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Tick sources and their cancellation
//! - Storage (LocalStorage on web, in-memory on native)
//! - Animation frames and DOM input on web

pub mod ticker;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use ticker::{TickHandle, TickToken, tick_pair};

#[cfg(target_arch = "wasm32")]
pub use web::{AnimationLoop, LocalStore, save_pdf};

/// Seed for procedural content when none is configured
#[cfg(not(target_arch = "wasm32"))]
pub fn entropy_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

#[cfg(target_arch = "wasm32")]
pub fn entropy_seed() -> u64 {
    (js_sys::Math::random() * u64::MAX as f64) as u64 ^ js_sys::Date::now() as u64
}
