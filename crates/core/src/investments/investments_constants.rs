/// Transaction types
///
/// Purchase of units. Debits the wallet and opens or grows a lot.
pub const TRANSACTION_TYPE_BUY: &str = "BUY";

/// Disposal of units, consumed oldest lot first. Credits net proceeds.
pub const TRANSACTION_TYPE_SELL: &str = "SELL";

/// Cash distribution on held units. Credits the net amount.
pub const TRANSACTION_TYPE_DIVIDEND: &str = "DIVIDEND";

/// Maximum length of a free-text transaction note.
pub const MAX_NOTE_LENGTH: usize = 1_000;
