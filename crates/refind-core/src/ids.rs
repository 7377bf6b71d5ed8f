//! Branded ID newtypes for type safety.
//!
//! Every entity in the refind system has a distinct ID type implemented as a
//! newtype wrapper around `String`. This prevents accidentally passing a
//! search-session ID where a learned-item ID is expected.
//!
//! All IDs are UUID v7 (time-ordered) generated via [`uuid::Uuid::now_v7`].

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Generate a new UUID v7 string (time-ordered).
fn new_v7() -> String {
    Uuid::now_v7().to_string()
}

macro_rules! branded_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new random ID (UUID v7, time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(new_v7())
            }

            /// Create from an existing string value.
            #[must_use]
            pub fn from_string(s: String) -> Self {
                Self(s)
            }

            /// Return the inner string as a slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

branded_id! {
    /// Unique identifier for a learned item.
    ItemId
}

branded_id! {
    /// Unique identifier for one teach or search session.
    SearchSessionId
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn new_ids_are_unique() {
        let a = ItemId::new();
        let b = ItemId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn ids_are_valid_uuids() {
        let id = ItemId::new();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn v7_ids_are_time_ordered() {
        let ids: Vec<ItemId> = (0..10).map(|_| ItemId::new()).collect();
        let mut sorted: Vec<String> = ids.iter().map(|i| i.as_str().to_owned()).collect();
        sorted.sort();
        let original: Vec<String> = ids.iter().map(|i| i.as_str().to_owned()).collect();
        assert_eq!(original, sorted);
    }

    #[test]
    fn from_string_roundtrip() {
        let id = ItemId::from_string("item-123".to_owned());
        assert_eq!(id.as_str(), "item-123");
        assert_eq!(id.into_inner(), "item-123");
    }

    #[test]
    fn serde_transparent() {
        let id = ItemId::from_string("abc".to_owned());
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""abc""#);
        let parsed: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn usable_as_hash_key() {
        let mut set = HashSet::new();
        assert!(set.insert(ItemId::from_string("a".into())));
        assert!(!set.insert(ItemId::from_string("a".into())));
    }

    #[test]
    fn distinct_brands_are_distinct_types() {
        fn takes_item(_: &ItemId) {}
        let item = ItemId::new();
        takes_item(&item);
        // SearchSessionId would not compile here; this test documents the brand.
        let session = SearchSessionId::new();
        assert_ne!(item.as_str(), session.as_str());
    }

    #[test]
    fn display_matches_inner() {
        let id = SearchSessionId::from_string("s-1".into());
        assert_eq!(id.to_string(), "s-1");
    }
}
