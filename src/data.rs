use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use serde_json::Value;

pub mod prefix_index;
pub mod student;

/// Field deserializer for hand-written API data: a value of the wrong type
/// reads as absent instead of failing the whole document.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}
