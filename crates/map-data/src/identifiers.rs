//! Type-safe identifiers for agencies, regions and line/yard datasets.
//!
//! Identifiers use Arc<str> so that stamping them onto thousands of features
//! during enrichment is a reference count bump rather than an allocation.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

macro_rules! impl_identifier {
    ($name:ident) => {
        #[derive(Clone, Debug)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(s: impl AsRef<str>) -> Self {
                Self(s.as_ref().into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
            }
        }

        impl Eq for $name {}

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0.cmp(&other.0)
            }
        }

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                String::deserialize(deserializer).map(Self::from)
            }
        }
    };
}

impl_identifier!(AgencyId);
impl_identifier!(RegionId);
impl_identifier!(LineId);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashMap};

    #[test]
    fn test_identifier_equality() {
        let id1 = AgencyId::new("oc-transpo");
        let id2 = AgencyId::new("oc-transpo");
        let id3 = id1.clone();

        assert_eq!(id1, id2);
        assert_eq!(id1, id3);
        assert!(Arc::ptr_eq(&id1.0, &id3.0)); // Clone shares Arc
    }

    #[test]
    fn test_identifier_lookup_by_str() {
        let mut map = HashMap::new();
        map.insert(RegionId::new("ottawa"), 1);

        assert_eq!(map.get("ottawa"), Some(&1));
        assert_eq!(map.get(&RegionId::new("ottawa")), Some(&1));
    }

    #[test]
    fn test_identifier_ordering() {
        let mut map = BTreeMap::new();
        map.insert(LineId::new("stm-orange"), ());
        map.insert(LineId::new("oc-1"), ());
        map.insert(LineId::new("go-lakeshore"), ());

        let keys: Vec<_> = map.keys().map(LineId::as_str).collect();
        assert_eq!(keys, vec!["go-lakeshore", "oc-1", "stm-orange"]);
    }

    #[test]
    fn test_identifier_serde() {
        let id: LineId = serde_json::from_str("\"oc-2\"").unwrap();
        assert_eq!(id.as_str(), "oc-2");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"oc-2\"");
    }
}
