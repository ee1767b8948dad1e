//! Common serde helpers

/// Tri-state field helper for partial updates
///
/// - field absent → `None` (requires `#[serde(default)]`)
/// - `null` → `Some(None)`
/// - value → `Some(Some(value))`
pub mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }

    pub fn serialize<T, S>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
    struct Patch {
        #[serde(default, with = "super::double_option", skip_serializing_if = "Option::is_none")]
        value: Option<Option<i64>>,
    }

    #[test]
    fn test_double_option_states() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.value, None);

        let null: Patch = serde_json::from_str(r#"{"value":null}"#).unwrap();
        assert_eq!(null.value, Some(None));

        let set: Patch = serde_json::from_str(r#"{"value":5}"#).unwrap();
        assert_eq!(set.value, Some(Some(5)));
    }

    #[test]
    fn test_double_option_serialize() {
        let json = serde_json::to_string(&Patch { value: Some(None) }).unwrap();
        assert_eq!(json, r#"{"value":null}"#);

        let json = serde_json::to_string(&Patch::default()).unwrap();
        assert_eq!(json, "{}");
    }
}
