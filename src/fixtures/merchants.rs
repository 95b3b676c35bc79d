//! Merchant Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::merchants::Merchant;

/// Wrapper for merchants in YAML
#[derive(Debug, Deserialize)]
pub struct MerchantsFixture {
    /// Map of merchant key -> merchant fixture
    pub merchants: FxHashMap<String, MerchantFixture>,
}

/// Merchant Fixture
#[derive(Debug, Deserialize)]
pub struct MerchantFixture {
    /// Merchant identifier
    pub id: u64,

    /// Merchant display name
    pub name: String,
}

impl From<MerchantFixture> for Merchant {
    fn from(fixture: MerchantFixture) -> Self {
        Merchant::new(fixture.id, fixture.name)
    }
}
