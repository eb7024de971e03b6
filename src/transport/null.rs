use serde::{Deserialize, Deserializer};

/// Decode a field, mapping JSON `null` to `T::default()`.
///
/// Combine with `#[serde(default)]` so a missing field and a `null` field end up
/// the same.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
