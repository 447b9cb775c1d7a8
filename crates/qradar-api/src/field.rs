// Three-state optional values for sparsely populated QRadar records.
//
// QRadar drops every attribute that was not named in `fields`, and sends
// `null` for attributes that have no value yet (`close_time` on an open
// offense, `assigned_to` on an unassigned one). `Option<T>` can only say
// "not there"; `Field<T>` keeps the two apart and never invents a zero.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A remote attribute that may be missing, explicitly null, or set.
///
/// Struct fields of this type must carry
/// `#[serde(default, skip_serializing_if = "Field::is_missing")]`
/// (or a struct-level `#[serde(default)]`) so that a missing key decodes to
/// [`Field::Missing`] and encodes back to no key at all.
///
/// ```
/// use qradar_api::Field;
///
/// let severity: Field<i64> = Field::from(0);
/// assert!(severity.is_present());
/// assert_eq!(severity.value(), Some(&0));
///
/// let unknown: Field<i64> = Field::Missing;
/// assert!(!unknown.is_present());
/// assert_eq!(unknown.unwrap_or_default(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field<T> {
    /// The key was not in the payload.
    Missing,
    /// The key was present with a JSON `null`.
    Null,
    /// The key carried a value.
    Value(T),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Self::Missing
    }
}

impl<T> Field<T> {
    /// `true` only when a concrete value is held.
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    /// `true` for both [`Field::Missing`] and [`Field::Null`].
    pub const fn is_absent(&self) -> bool {
        !self.is_present()
    }

    /// `true` when the key never appeared. Used as the serde skip predicate.
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// `true` when the key appeared with `null`.
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the value if present.
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Missing | Self::Null => None,
        }
    }

    /// Convert `&Field<T>` into `Field<&T>`.
    pub const fn as_ref(&self) -> Field<&T> {
        match self {
            Self::Missing => Field::Missing,
            Self::Null => Field::Null,
            Self::Value(v) => Field::Value(v),
        }
    }

    /// Consume into an `Option`, folding missing and null into `None`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Missing | Self::Null => None,
        }
    }

    /// The value, or `default` when absent.
    pub fn value_or(self, default: T) -> T {
        self.into_option().unwrap_or(default)
    }

    /// Map the inner value, preserving missing/null.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Self::Missing => Field::Missing,
            Self::Null => Field::Null,
            Self::Value(v) => Field::Value(f(v)),
        }
    }
}

impl<T: Default> Field<T> {
    /// The value, or `T::default()` when absent.
    pub fn unwrap_or_default(self) -> T {
        self.into_option().unwrap_or_default()
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T> From<Field<T>> for Option<T> {
    fn from(field: Field<T>) -> Self {
        field.into_option()
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => v.serialize(serializer),
            // Missing is normally skipped before we get here.
            Self::Missing | Self::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Only reached when the key exists; a missing key falls back to Default.
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(v) => Self::Value(v),
            None => Self::Null,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::Field;

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    struct Probe {
        #[serde(skip_serializing_if = "Field::is_missing")]
        count: Field<i64>,
        #[serde(skip_serializing_if = "Field::is_missing")]
        name: Field<String>,
        #[serde(skip_serializing_if = "Field::is_missing")]
        flag: Field<bool>,
    }

    #[test]
    fn missing_key_decodes_to_missing() {
        let p: Probe = serde_json::from_value(json!({})).unwrap();
        assert!(p.count.is_missing());
        assert!(!p.count.is_present());
        assert!(p.count.is_absent());
    }

    #[test]
    fn null_decodes_to_null_and_is_not_present() {
        let p: Probe = serde_json::from_value(json!({ "count": null })).unwrap();
        assert!(p.count.is_null());
        assert!(!p.count.is_present());
        assert_eq!(p.count.value(), None);
    }

    #[test]
    fn zero_values_are_present() {
        let p: Probe =
            serde_json::from_value(json!({ "count": 0, "name": "", "flag": false })).unwrap();
        assert_eq!(p.count, Field::Value(0));
        assert_eq!(p.name, Field::Value(String::new()));
        assert_eq!(p.flag, Field::Value(false));
    }

    #[test]
    fn missing_is_omitted_on_encode() {
        let p = Probe {
            count: Field::Value(0),
            ..Probe::default()
        };
        assert_eq!(serde_json::to_value(&p).unwrap(), json!({ "count": 0 }));
    }

    #[test]
    fn null_is_encoded_as_null() {
        let p = Probe {
            name: Field::Null,
            ..Probe::default()
        };
        assert_eq!(serde_json::to_value(&p).unwrap(), json!({ "name": null }));
    }

    #[test]
    fn wrong_type_is_a_decode_error() {
        let res: Result<Probe, _> = serde_json::from_value(json!({ "count": "many" }));
        assert!(res.is_err());
    }

    #[test]
    fn accessors() {
        let f: Field<i64> = 7.into();
        assert_eq!(f.map(|v| v * 2), Field::Value(14));
        assert_eq!(f.value_or(1), 7);
        assert_eq!(Field::<i64>::Null.value_or(1), 1);
        assert_eq!(Field::<i64>::Missing.unwrap_or_default(), 0);
        assert_eq!(Option::<i64>::from(Field::Value(3)), Some(3));
        assert_eq!(Field::<String>::Null.as_ref(), Field::Null);
    }
}
