// crates/geomerge-core/src/facts/raw.rs
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// One element of the REST Countries v3.1 response, as far as we read it.
///
/// NOTE: every field is lenient. A member of an unexpected shape reads as
/// `None` and only drops its clause; it never fails the decode of the
/// whole response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCountry {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<RemoteName>,
    #[serde(default, deserialize_with = "lenient")]
    pub cca2: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub cca3: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub capital: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient")]
    pub capital_info: Option<CapitalInfo>,
    #[serde(default, deserialize_with = "lenient")]
    pub latlng: Option<Vec<f64>>,
    #[serde(default, deserialize_with = "lenient")]
    pub region: Option<String>,
    /// Any JSON number; fractions are truncated.
    #[serde(default, deserialize_with = "lenient_count")]
    pub population: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub area: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub currencies: Option<Map<String, Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub languages: Option<Map<String, Value>>,
}

/// `"name": { "common": "France", "official": "French Republic", ... }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteName {
    #[serde(default, deserialize_with = "lenient")]
    pub common: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub official: Option<String>,
}

/// `"capitalInfo": { "latlng": [48.87, 2.33] }`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CapitalInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub latlng: Option<Vec<f64>>,
}

pub type CountriesRaw = Vec<RemoteCountry>;

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f.trunc() as u64)
        }),
        _ => None,
    };
    Ok(count)
}
