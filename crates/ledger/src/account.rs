use serde::{Deserialize, Serialize};

/// Account document: the spendable balance.
///
/// The balance is a non-negative integer by construction and is only mutated
/// inside ledger transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub balance: u64,
}

impl Account {
    pub fn with_balance(balance: u64) -> Self {
        Self { balance }
    }
}
