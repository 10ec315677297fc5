//! Semantic action IDs for Cookie Bakery tap targets.
//!
//! Registered during render and dispatched via `InputEvent::Click`.

pub const CLICK_COOKIE: u16 = 0;
pub const SAVE_NOW: u16 = 1;

// ── Generator purchase (base + catalog index) ───────────────────
pub const BUY_GENERATOR_BASE: u16 = 100;

// ── Upgrade purchase (base + index among available upgrades) ────
pub const BUY_UPGRADE_BASE: u16 = 200;

/// Keyboard shortcuts for the upgrade shop, by position among upgrades still for sale.
pub const UPGRADE_KEYS: [char; 3] = ['q', 'w', 'e'];
