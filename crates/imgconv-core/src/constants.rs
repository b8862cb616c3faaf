//! Service-wide constants.

use std::time::Duration;

/// How long an ingested original stays convertible. Reads do not renew it.
pub const ORIGINAL_TTL: Duration = Duration::from_secs(180);

/// Quality applied when a request carries no usable quality value.
pub const DEFAULT_QUALITY: u8 = 85;

/// Lossy qualities produced by the batch conversion endpoint.
pub const BATTERY_QUALITIES: [u8; 4] = [70, 75, 80, 85];
