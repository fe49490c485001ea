use crate::error::SchemaError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Vendor extension fields (`x-*` keys) carried through from the source document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VendorProperties(BTreeMap<String, Value>);

impl VendorProperties {
    pub fn new() -> Self {
        VendorProperties(BTreeMap::new())
    }

    /// Collects every key of `object` starting with `prefix`.
    pub fn collect(object: &Map<String, Value>, prefix: &str) -> Self {
        VendorProperties(
            object
                .iter()
                .filter(|(key, _)| key.starts_with(prefix))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        )
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&Value, SchemaError> {
        self.0
            .get(name)
            .ok_or_else(|| SchemaError::UnknownVendorProperty(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Value)> for VendorProperties {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        VendorProperties(iter.into_iter().collect())
    }
}

/// Read access to the vendor extensions of a model entity.
///
/// The bag is filled once by the factory while the entity is built and is
/// read-only afterwards.
pub trait ProvideVendorProperties {
    fn vendor_properties(&self) -> &VendorProperties;

    fn has_vendor_property(&self, name: &str) -> bool {
        self.vendor_properties().contains(name)
    }

    /// Returns the stored value exactly as it appeared in the document.
    fn get_vendor_property(&self, name: &str) -> Result<&Value, SchemaError> {
        self.vendor_properties().get(name)
    }

    /// Returns the stored value converted into plain data structures chosen by
    /// the caller, e.g. `HashMap<String, Vec<String>>` or `Vec<String>`.
    fn get_vendor_property_as<T>(&self, name: &str) -> Result<T, SchemaError>
    where
        T: DeserializeOwned,
        Self: Sized,
    {
        let value = self.vendor_properties().get(name)?;
        serde_json::from_value(value.clone()).map_err(|e| SchemaError::InvalidVendorProperty {
            name: name.to_string(),
            message: e.to_string(),
        })
    }
}
