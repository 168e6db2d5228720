use std::fmt;

use serde::{Deserialize, Serialize};

/// Remote catalog identifier for a product. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u64", into = "u64")]
pub struct ProductId(u64);

impl ProductId {
    /// Returns `None` for zero, which the remote catalog never assigns.
    pub fn new(id: u64) -> Option<Self> {
        (id > 0).then_some(Self(id))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for ProductId {
    type Error = String;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        Self::new(id).ok_or_else(|| "product id must be positive".to_owned())
    }
}

impl From<ProductId> for u64 {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Sub-resources requested alongside a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductInclude {
    Variants,
    CustomFields,
    Images,
    Videos,
    BulkPricingRules,
    Options,
    Modifiers,
}

impl ProductInclude {
    /// Everything the importer needs to rebuild a product locally.
    pub const FULL: [ProductInclude; 7] = [
        Self::Variants,
        Self::CustomFields,
        Self::Images,
        Self::Videos,
        Self::BulkPricingRules,
        Self::Options,
        Self::Modifiers,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Variants => "variants",
            Self::CustomFields => "custom_fields",
            Self::Images => "images",
            Self::Videos => "videos",
            Self::BulkPricingRules => "bulk_pricing_rules",
            Self::Options => "options",
            Self::Modifiers => "modifiers",
        }
    }
}

/// A purchasable variant of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: u64,
    pub product_id: ProductId,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub purchasing_disabled: bool,
}

/// Full product detail as returned by the remote catalog.
///
/// Only the fields the sync pipeline acts on are typed. Everything else
/// (custom fields, images, pricing rules, ...) rides along in `attributes`
/// so the importer can persist it untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(flatten)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
}

fn default_visible() -> bool {
    true
}
