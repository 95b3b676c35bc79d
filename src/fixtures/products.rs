//! Product Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    items::{NewCartItem, ProductId, SpecId},
    merchants::Merchant,
    money::parse_price,
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub struct ProductsFixture {
    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product identifier
    pub id: u64,

    /// Optional variant
    #[serde(default)]
    pub spec: Option<SpecFixture>,

    /// Product name
    pub name: String,

    /// Merchant key reference
    pub merchant: String,

    /// Product price (e.g., "28.00 CNY")
    pub price: String,

    /// Available stock
    pub stock: u32,

    /// Image URL
    #[serde(default)]
    pub image: String,
}

/// Variant of a product
#[derive(Debug, Deserialize)]
pub struct SpecFixture {
    /// Variant identifier
    pub id: u64,

    /// Variant display name
    pub name: String,
}

impl ProductFixture {
    /// Build a cart item owned by the given merchant.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Price`] if the price string cannot be parsed.
    pub fn into_item(self, merchant: &Merchant) -> Result<NewCartItem<'static>, FixtureError> {
        let price = parse_price(&self.price)?;

        let (spec_id, spec_name) = match self.spec {
            Some(spec) => (Some(SpecId::new(spec.id)), Some(spec.name)),
            None => (None, None),
        };

        Ok(NewCartItem {
            id: ProductId::new(self.id),
            spec_id,
            spec_name,
            name: self.name,
            price,
            image: self.image,
            merchant_id: merchant.id,
            merchant_name: merchant.name.clone(),
            stock: self.stock,
        })
    }
}
