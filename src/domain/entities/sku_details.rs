use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkuType {
    /// In-app product with a recurring period.
    #[serde(rename = "subs")]
    Subscription,
    /// One-time (managed) product.
    #[serde(rename = "inapp")]
    OneTime,
}

impl SkuType {
    /// Label used by the billing SDK, also used as the grouping key in
    /// per-type summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            SkuType::Subscription => "subs",
            SkuType::OneTime => "inapp",
        }
    }
}

/// Product metadata as returned by the billing SDK.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuDetails {
    pub sku: String,
    /// Localized, formatted price, e.g. "$9.99". Not guaranteed to be
    /// machine-readable.
    pub price: String,
    #[serde(rename = "type")]
    pub sku_type: SkuType,
}

impl SkuDetails {
    pub fn new(sku: impl Into<String>, price: impl Into<String>, sku_type: SkuType) -> Self {
        Self {
            sku: sku.into(),
            price: price.into(),
            sku_type,
        }
    }

    pub fn is_subscription(&self) -> bool {
        self.sku_type == SkuType::Subscription
    }

    /// All ASCII digits of the price string, concatenated. Currency symbols
    /// AND decimal separators are dropped, so "$9.99" yields "999".
    pub fn price_digits(&self) -> String {
        self.price.chars().filter(char::is_ascii_digit).collect()
    }
}
