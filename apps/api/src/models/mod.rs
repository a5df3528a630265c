pub mod cv;
pub mod job;
pub mod linkedin;
pub mod resume;
pub mod skill;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Treats an explicit JSON `null` like a missing field.
/// LLM output routinely sends `null` where the schema asks for `[]`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Trims a string field, mapping blank values to `None`.
pub fn clean_opt(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A JSON number, or a string holding one ("45 000", "3,5").
/// Anything else is `None`.
fn number_from_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let compact: String = s
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '\u{202f}')
                .map(|c| if c == ',' { '.' } else { c })
                .collect();
            compact.parse().ok()?
        }
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn lenient_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Option::<Value>::deserialize(deserializer)
}

/// Lenient `Option<f32>`: numbers and numeric strings, `None` otherwise.
pub fn lenient_f32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f32>, D::Error> {
    Ok(lenient_value(deserializer)?
        .as_ref()
        .and_then(number_from_value)
        .map(|n| n as f32))
}

/// Lenient `Option<u32>` for amounts. Fractions are rounded, negatives dropped.
pub fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(lenient_value(deserializer)?
        .as_ref()
        .and_then(number_from_value)
        .filter(|n| *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| n.round() as u32))
}

/// Lenient year. A range such as "2017-2019" yields its last year.
pub fn lenient_year<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    let Some(value) = lenient_value(deserializer)? else {
        return Ok(None);
    };
    if let Some(n) = number_from_value(&value) {
        return Ok((n.fract() == 0.0 && n.abs() < 10_000.0).then_some(n as i32));
    }
    Ok(value.as_str().and_then(last_year))
}

/// Last run of exactly four digits in `raw`.
fn last_year(raw: &str) -> Option<i32> {
    raw.split(|c: char| !c.is_ascii_digit())
        .filter(|run| run.len() == 4)
        .last()
        .and_then(|run| run.parse().ok())
}
