use serde::Deserialize;
use serde::de::Error as DeError;

use crate::domain::Money;

// Numbers keep their raw JSON token so `10.00` is not reformatted to `10.0`.
impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw: Box<serde_json::value::RawValue> = Deserialize::deserialize(deserializer)?;
        let token = raw.get();

        match token.as_bytes().first().copied() {
            Some(b'"') => {
                let parsed = serde_json::from_str::<String>(token).map_err(D::Error::custom)?;
                Ok(Money::from_token(parsed))
            }
            Some(b'-' | b'0'..=b'9') => Ok(Money::from_token(token)),
            _ => Err(D::Error::custom(
                "expected money field to be JSON string or number",
            )),
        }
    }
}
