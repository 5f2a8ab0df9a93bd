/// Window within which a new buy is folded into the most recent open lot.
pub const DEFAULT_MERGE_WINDOW_HOURS: i64 = 24;

/// Deadline applied to one settlement action when the caller supplies none.
pub const DEFAULT_ACTION_TIMEOUT_MS: u64 = 30_000;

/// Minor-unit exponent assumed for currencies missing from the currency table.
pub const DEFAULT_MINOR_UNIT_EXPONENT: u32 = 2;

/// Decimal precision used when rounding exchange rates for display
pub const FX_RATE_DISPLAY_PRECISION: u32 = 6;
