//! Fixtures
//!
//! Named YAML fixture sets describing merchants, products and cart lines.
//! A set called `canteen` is read from `merchants/canteen.yml`,
//! `products/canteen.yml` and `carts/canteen.yml` under the base path.

use std::{fs, path::PathBuf};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    fixtures::{carts::CartFixture, merchants::MerchantsFixture, products::ProductsFixture},
    items::NewCartItem,
    merchants::Merchant,
    money::MoneyParseError,
};

pub mod carts;
pub mod merchants;
pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price
    #[error(transparent)]
    Price(#[from] MoneyParseError),

    /// Merchant not found
    #[error("Merchant not found: {0}")]
    MerchantNotFound(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),
}

/// Line to add when building the fixture cart
#[derive(Debug, Clone)]
struct FixtureLine {
    product: String,
    quantity: u32,
    checked: bool,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Merchants by fixture key
    merchants: FxHashMap<String, Merchant>,

    /// Products by fixture key
    products: FxHashMap<String, NewCartItem<'static>>,

    /// Cart lines in file order
    lines: Vec<FixtureLine>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            merchants: FxHashMap::default(),
            products: FxHashMap::default(),
            lines: Vec::new(),
            currency: None,
        }
    }

    fn read(&self, category: &str, name: &str) -> Result<String, FixtureError> {
        let file_path = self.base_path.join(category).join(format!("{name}.yml"));

        Ok(fs::read_to_string(file_path)?)
    }

    /// Load merchants from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_merchants(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: MerchantsFixture = serde_norway::from_str(&self.read("merchants", name)?)?;

        for (key, merchant) in fixture.merchants {
            self.merchants.insert(key, merchant.into());
        }

        Ok(self)
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a price is
    /// invalid, a referenced merchant doesn't exist, or products disagree on
    /// currency.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ProductsFixture = serde_norway::from_str(&self.read("products", name)?)?;

        for (key, product_fixture) in fixture.products {
            let merchant = self
                .merchants
                .get(&product_fixture.merchant)
                .ok_or_else(|| FixtureError::MerchantNotFound(product_fixture.merchant.clone()))?;

            let item = product_fixture.into_item(merchant)?;
            let currency = item.price.currency();

            // Validate currency consistency
            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            self.products.insert(key, item);
        }

        Ok(self)
    }

    /// Load cart lines from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if a
    /// referenced product doesn't exist.
    pub fn load_cart(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CartFixture = serde_norway::from_str(&self.read("carts", name)?)?;

        for line in fixture.lines {
            if !self.products.contains_key(&line.product) {
                return Err(FixtureError::ProductNotFound(line.product));
            }

            self.lines.push(FixtureLine {
                product: line.product,
                quantity: line.quantity,
                checked: line.checked,
            });
        }

        Ok(self)
    }

    /// Load a complete fixture set (merchants, products and cart with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_set_in("./fixtures", name)
    }

    /// Load a complete fixture set from a custom base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set_in(base_path: impl Into<PathBuf>, name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::with_base_path(base_path);

        fixture
            .load_merchants(name)?
            .load_products(name)?
            .load_cart(name)?;

        Ok(fixture)
    }

    /// Get a merchant by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the merchant is not found.
    pub fn merchant(&self, key: &str) -> Result<&Merchant, FixtureError> {
        self.merchants
            .get(key)
            .ok_or_else(|| FixtureError::MerchantNotFound(key.to_string()))
    }

    /// Get a product by its string key
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found.
    pub fn product(&self, key: &str) -> Result<&NewCartItem<'static>, FixtureError> {
        self.products
            .get(key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Build a cart by adding the loaded lines in order.
    ///
    /// # Errors
    ///
    /// Returns an error if no products are loaded or a line references an
    /// unknown product.
    pub fn cart(&self) -> Result<Cart<'static>, FixtureError> {
        let mut cart = Cart::new(self.currency()?);

        for line in &self.lines {
            let item = self.product(&line.product)?.clone();
            let key = item.key();

            cart.add_item(item, line.quantity)?;

            if !line.checked {
                cart.set_checked(key, false);
            }
        }

        Ok(cart)
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}
