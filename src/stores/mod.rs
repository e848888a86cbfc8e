//! Store implementations.
//!
//! - `memory`: Simple HashMap-based store with RwLock
//! - `moka`: High-performance concurrent store using Moka
//! - `metrics`: Middleware wrapper that emits operation metrics

pub mod memory;
pub mod metrics;
pub mod moka;
