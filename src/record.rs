// src/record.rs

use serde::{Deserialize, Serialize};

/// One catalogue row, mapped from the CSV by header name.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Eq, Hash, Default)]
pub struct Record {
    /// Product name. Never empty for records produced by the loader.
    pub name: String,
    /// Display text for the 30mm price tier; may be empty.
    pub price_tier_30: String,
    /// Display text for the 20mm price tier; may be empty.
    pub price_tier_20: String,
    /// Empty means "no image".
    pub image_url: String,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_prices(mut self, tier_30: impl Into<String>, tier_20: impl Into<String>) -> Self {
        self.price_tier_30 = tier_30.into();
        self.price_tier_20 = tier_20.into();
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    pub fn has_image(&self) -> bool {
        !self.image_url.is_empty()
    }
}
