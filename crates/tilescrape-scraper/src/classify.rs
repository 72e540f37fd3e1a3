//! Title → [`ProductType`] classification.
//!
//! Categories overlap ("raglan hoodie", "premium tee", "sweatshirt" contains
//! "shirt"), so classification is an ordered rule table evaluated top to
//! bottom; the first matching rule wins. Reordering [`RULES`] changes results.

use std::sync::LazyLock;

use regex::Regex;
use tilescrape_core::ProductType;

/// One row of the classification table.
pub struct ClassifierRule {
    pub product_type: ProductType,
    pub pattern: Regex,
}

fn rule(product_type: ProductType, pattern: &str) -> ClassifierRule {
    ClassifierRule {
        product_type,
        pattern: Regex::new(pattern).expect("valid classifier regex"),
    }
}

/// Classification rules in precedence order.
pub static RULES: LazyLock<Vec<ClassifierRule>> = LazyLock::new(|| {
    vec![
        rule(ProductType::ZipHoodie, r"(?i)zip hoodie"),
        rule(ProductType::Hoodie, r"(?i)\b(?:pullover hoodie|hoodie)\b"),
        rule(ProductType::Sweatshirt, r"(?i)\bsweatshirt\b"),
        rule(ProductType::TankTop, r"(?i)\btank\s*top\b"),
        rule(ProductType::LongSleeve, r"(?i)\blong\s*sleeve\b"),
        rule(ProductType::Raglan, r"(?i)\braglan\b"),
        rule(ProductType::VNeck, r"(?i)\bv[-\s]?neck\b"),
        rule(ProductType::Premium, r"(?i)\bpremium\s*(?:t[-\s]?shirt|tee)\b"),
        rule(ProductType::Shirt, r"(?i)\b(?:t[-\s]?shirt|tee|shirt)\b"),
    ]
});

/// Classifies a listing title. Blank titles are [`ProductType::Other`].
#[must_use]
pub fn classify_title(title: &str) -> ProductType {
    let title = title.trim();
    if title.is_empty() {
        return ProductType::Other;
    }
    RULES
        .iter()
        .find(|r| r.pattern.is_match(title))
        .map_or(ProductType::Other, |r| r.product_type)
}

/// [`classify_title`] for an optional title.
#[must_use]
pub fn classify_optional_title(title: Option<&str>) -> ProductType {
    title.map_or(ProductType::Other, classify_title)
}
