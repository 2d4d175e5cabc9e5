//! Global config handle.
//!
//! Uses `arc-swap` for lock-free reads from the HTTP workers and the
//! actor threads. Stored once after loading.

use crate::config::BridgeConfig;
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};

/// Global config storage.
pub static CONFIG: LazyLock<ArcSwap<BridgeConfig>> =
    LazyLock::new(|| ArcSwap::from_pointee(BridgeConfig::default()));

#[inline]
pub fn cfg() -> Arc<BridgeConfig> {
    CONFIG.load_full()
}

#[inline]
pub fn init_config(config: BridgeConfig) -> Arc<BridgeConfig> {
    let arc = Arc::new(config);
    CONFIG.store(Arc::clone(&arc));
    arc
}
