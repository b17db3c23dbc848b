//! Newtype IDs for type-safe entity references.
//!
//! Commerce identifiers are opaque strings (Shopify global IDs such as
//! `gid://shopify/ProductVariant/123`, or mock IDs in demo mode). Use the
//! `define_id!` macro to create wrappers that prevent accidentally mixing IDs
//! from different entity types.

use chrono::{DateTime, Utc};

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use sparkcola_core::define_id;
/// define_id!(ShipmentId);
/// define_id!(ParcelId);
///
/// let shipment = ShipmentId::new("gid://shopify/Shipment/1");
/// let parcel = ParcelId::new("gid://shopify/Parcel/1");
///
/// // These are different types, so this won't compile:
/// // let _: ShipmentId = parcel;
/// # let _ = (shipment, parcel);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the underlying string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(VariantId);
define_id!(CartId);
define_id!(CartLineId);
define_id!(OrderId);

/// Prefix for synthesized order numbers.
pub const ORDER_ID_PREFIX: &str = "SC-";

impl OrderId {
    /// Fabricate an order identifier from a submission timestamp.
    ///
    /// Identifiers are unique for distinct millisecond timestamps.
    #[must_use]
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        Self(format!("{ORDER_ID_PREFIX}{}", at.timestamp_millis()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_id_display_and_conversions() {
        let id = VariantId::new("gid://shopify/ProductVariant/42");
        assert_eq!(id.to_string(), "gid://shopify/ProductVariant/42");
        assert_eq!(id.as_str(), "gid://shopify/ProductVariant/42");

        let raw: String = id.clone().into();
        assert_eq!(VariantId::from(raw), id);
    }

    #[test]
    fn test_id_serializes_transparently() {
        let id = CartId::new("gid://shopify/Cart/abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"gid://shopify/Cart/abc\"");
    }

    #[test]
    fn test_order_id_from_timestamp() {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let id = OrderId::from_timestamp(at);
        assert_eq!(id.as_str(), format!("SC-{}", at.timestamp_millis()));
    }

    #[test]
    fn test_order_ids_distinct_for_distinct_timestamps() {
        let base = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let ids: std::collections::HashSet<OrderId> = (0..100)
            .map(|ms| OrderId::from_timestamp(base + Duration::milliseconds(ms)))
            .collect();
        assert_eq!(ids.len(), 100);
    }
}
