//! The closed product-type vocabulary and the operator's allow-list over it.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Garment category inferred from a listing title.
///
/// Variants are declared in classification precedence order; `Other` is the
/// fallback for titles that match no rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    ZipHoodie,
    Hoodie,
    Sweatshirt,
    TankTop,
    LongSleeve,
    Raglan,
    VNeck,
    Premium,
    Shirt,
    Other,
}

impl ProductType {
    pub const ALL: [ProductType; 10] = [
        ProductType::ZipHoodie,
        ProductType::Hoodie,
        ProductType::Sweatshirt,
        ProductType::TankTop,
        ProductType::LongSleeve,
        ProductType::Raglan,
        ProductType::VNeck,
        ProductType::Premium,
        ProductType::Shirt,
        ProductType::Other,
    ];

    /// The lowercase tag used in exports, job files, and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ProductType::ZipHoodie => "ziphoodie",
            ProductType::Hoodie => "hoodie",
            ProductType::Sweatshirt => "sweatshirt",
            ProductType::TankTop => "tanktop",
            ProductType::LongSleeve => "longsleeve",
            ProductType::Raglan => "raglan",
            ProductType::VNeck => "vneck",
            ProductType::Premium => "premium",
            ProductType::Shirt => "shirt",
            ProductType::Other => "other",
        }
    }
}

impl std::fmt::Display for ProductType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        ProductType::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .ok_or_else(|| CoreError::UnknownProductType(s.to_string()))
    }
}

/// Set of product types the operator wants exported.
///
/// An empty allow-list is unrestricted: every type is permitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeAllowList(BTreeSet<ProductType>);

impl TypeAllowList {
    #[must_use]
    pub fn unrestricted() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn permits(&self, product_type: ProductType) -> bool {
        self.0.is_empty() || self.0.contains(&product_type)
    }
}

impl FromIterator<ProductType> for TypeAllowList {
    fn from_iter<I: IntoIterator<Item = ProductType>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl std::fmt::Display for TypeAllowList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return f.write_str("all");
        }
        let tags: Vec<&str> = self.0.iter().map(|t| t.as_str()).collect();
        f.write_str(&tags.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_through_from_str() {
        for t in ProductType::ALL {
            assert_eq!(t.as_str().parse::<ProductType>().unwrap(), t);
        }
    }

    #[test]
    fn from_str_is_case_insensitive_and_trims() {
        assert_eq!(" Hoodie ".parse::<ProductType>().unwrap(), ProductType::Hoodie);
        assert_eq!("VNECK".parse::<ProductType>().unwrap(), ProductType::VNeck);
    }

    #[test]
    fn from_str_rejects_unknown_tag() {
        let err = "poncho".parse::<ProductType>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownProductType(ref s) if s == "poncho"));
    }

    #[test]
    fn serde_uses_lowercase_tags() {
        let json = serde_json::to_string(&ProductType::ZipHoodie).unwrap();
        assert_eq!(json, "\"ziphoodie\"");
        let parsed: ProductType = serde_json::from_str("\"tanktop\"").unwrap();
        assert_eq!(parsed, ProductType::TankTop);
    }

    #[test]
    fn empty_allow_list_permits_everything() {
        let allow = TypeAllowList::unrestricted();
        assert!(allow.is_unrestricted());
        assert!(ProductType::ALL.iter().all(|t| allow.permits(*t)));
    }

    #[test]
    fn non_empty_allow_list_permits_only_members() {
        let allow: TypeAllowList = [ProductType::Hoodie].into_iter().collect();
        assert!(allow.permits(ProductType::Hoodie));
        assert!(!allow.permits(ProductType::Shirt));
        assert!(!allow.permits(ProductType::ZipHoodie));
    }

    #[test]
    fn allow_list_display() {
        let allow: TypeAllowList = [ProductType::Shirt, ProductType::Hoodie].into_iter().collect();
        assert_eq!(allow.to_string(), "hoodie,shirt");
        assert_eq!(TypeAllowList::unrestricted().to_string(), "all");
    }
}
