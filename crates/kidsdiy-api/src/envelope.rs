// ── Uniform proxy envelope ──
//
// Every proxied response is `{data, error}` with exactly one side set.
// The Rust type makes the exclusivity structural; the wire form keeps
// both keys so consumers can test `error === null`.

use serde::de::{Error as _, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Result of a proxied call: either the upstream payload or a failure message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope<T> {
    Data(T),
    Error(String),
}

impl<T> Envelope<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Data(d) => Some(d),
            Self::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Data(_) => None,
            Self::Error(e) => Some(e),
        }
    }

    pub fn is_data(&self) -> bool {
        matches!(self, Self::Data(_))
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Data(d) => Ok(d),
            Self::Error(e) => Err(e),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        match self {
            Self::Data(d) => Envelope::Data(f(d)),
            Self::Error(e) => Envelope::Error(e),
        }
    }
}

impl<T> From<Result<T, String>> for Envelope<T> {
    fn from(result: Result<T, String>) -> Self {
        match result {
            Ok(d) => Self::Data(d),
            Err(e) => Self::Error(e),
        }
    }
}

#[derive(Serialize)]
struct WireRef<'a, T> {
    data: Option<&'a T>,
    error: Option<&'a str>,
}

#[derive(Deserialize)]
struct Wire<T> {
    #[serde(default = "Option::default")]
    data: Option<T>,
    #[serde(default)]
    error: Option<String>,
}

impl<T: Serialize> Serialize for Envelope<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            Self::Data(d) => WireRef {
                data: Some(d),
                error: None,
            },
            Self::Error(e) => WireRef {
                data: None,
                error: Some(e.as_str()),
            },
        };
        wire.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Envelope<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = Wire::<T>::deserialize(deserializer)?;
        match (wire.data, wire.error) {
            (Some(_), Some(_)) => Err(D::Error::custom(
                "envelope carries both data and error",
            )),
            (None, Some(e)) => Ok(Self::Error(e)),
            (Some(d), None) => Ok(Self::Data(d)),
            // `{data: null}` is a legitimate empty payload for types that
            // accept unit (JSON values, options).
            (None, None) => T::deserialize(().into_deserializer())
                .map(Self::Data)
                .map_err(|_: D::Error| D::Error::custom("envelope carries neither data nor error")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    #[test]
    fn data_serializes_with_null_error() {
        let env = Envelope::Data(json!([1, 2]));
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({"data": [1, 2], "error": null})
        );
    }

    #[test]
    fn error_serializes_with_null_data() {
        let env: Envelope<Value> = Envelope::Error("Not authenticated".into());
        assert_eq!(
            serde_json::to_value(&env).unwrap(),
            json!({"data": null, "error": "Not authenticated"})
        );
    }

    #[test]
    fn error_only_body_deserializes() {
        let env: Envelope<Vec<u32>> = serde_json::from_value(json!({"error": "boom"})).unwrap();
        assert_eq!(env, Envelope::Error("boom".into()));
    }

    #[test]
    fn null_data_is_a_unit_payload() {
        let env: Envelope<Value> = serde_json::from_value(json!({"data": null})).unwrap();
        assert_eq!(env, Envelope::Data(Value::Null));
    }

    #[test]
    fn both_sides_set_is_rejected() {
        let res: Result<Envelope<Value>, _> =
            serde_json::from_value(json!({"data": 1, "error": "x"}));
        assert!(res.is_err());
    }

    #[test]
    fn empty_object_for_struct_payload_is_rejected() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Item {
            id: u32,
        }
        let res: Result<Envelope<Item>, _> = serde_json::from_value(json!({}));
        assert!(res.is_err());
    }
}
