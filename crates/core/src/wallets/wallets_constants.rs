/// Wallet type constants
pub mod wallet_types {
    pub const BASIC: &str = "BASIC";
    pub const INVESTMENT: &str = "INVESTMENT";
    pub const SAVINGS: &str = "SAVINGS";
    pub const CREDIT: &str = "CREDIT";
}
