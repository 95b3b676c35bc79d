//! Cart Fixtures

use serde::Deserialize;

/// Wrapper for cart lines in YAML
#[derive(Debug, Deserialize)]
pub struct CartFixture {
    /// Lines, added to the cart in order
    pub lines: Vec<CartLineFixture>,
}

/// Cart Line Fixture
#[derive(Debug, Deserialize)]
pub struct CartLineFixture {
    /// Product key reference
    pub product: String,

    /// Quantity to add
    #[serde(default = "default_quantity")]
    pub quantity: u32,

    /// Whether the line stays selected for checkout
    #[serde(default = "default_checked")]
    pub checked: bool,
}

fn default_quantity() -> u32 {
    1
}

fn default_checked() -> bool {
    true
}
