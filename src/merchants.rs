//! Merchants

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a seller on the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MerchantId(u64);

impl MerchantId {
    /// Wrap a raw merchant identifier.
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw identifier value
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for MerchantId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for MerchantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Merchant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merchant {
    /// Merchant identifier
    pub id: MerchantId,

    /// Display name, e.g. "兰州拉面"
    pub name: String,
}

impl Merchant {
    /// Create a merchant with the given id and name.
    pub fn new(id: impl Into<MerchantId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merchant_id_displays_raw_value() {
        assert_eq!(MerchantId::new(42).to_string(), "42");
    }

    #[test]
    fn new_merchant_converts_id_and_name() {
        let merchant = Merchant::new(7, "兰州拉面");

        assert_eq!(merchant.id.get(), 7);
        assert_eq!(merchant.name, "兰州拉面");
    }
}
