//! YAML decoding into JSON values.

use crate::ConfigError;
use serde_json::{Map, Number, Value};
use serde_yaml::Value as YamlValue;

/// Parse YAML contents into a JSON value, stringifying non-string keys.
pub(super) fn parse_yaml(contents: &str) -> Result<Value, ConfigError> {
    if contents.trim().is_empty() {
        return Ok(Value::Null);
    }
    let value: YamlValue = serde_yaml::from_str(contents)?;
    yaml_to_json(value)
}

fn yaml_to_json(value: YamlValue) -> Result<Value, ConfigError> {
    Ok(match value {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(flag) => Value::Bool(flag),
        YamlValue::Number(number) => {
            if let Some(int) = number.as_i64() {
                Value::from(int)
            } else if let Some(uint) = number.as_u64() {
                Value::from(uint)
            } else {
                let float = number.as_f64().unwrap_or(f64::NAN);
                Number::from_f64(float).map(Value::Number).ok_or_else(|| {
                    ConfigError::Invalid(format!("unsupported yaml number: {number}"))
                })?
            }
        }
        YamlValue::String(text) => Value::String(text),
        YamlValue::Sequence(items) => Value::Array(
            items
                .into_iter()
                .map(yaml_to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        YamlValue::Mapping(mapping) => {
            let mut map = Map::new();
            for (key, value) in mapping {
                map.insert(yaml_key(key)?, yaml_to_json(value)?);
            }
            Value::Object(map)
        }
        YamlValue::Tagged(tagged) => yaml_to_json(tagged.value)?,
    })
}

fn yaml_key(key: YamlValue) -> Result<String, ConfigError> {
    match key {
        YamlValue::String(text) => Ok(text),
        YamlValue::Number(number) => Ok(number.to_string()),
        YamlValue::Bool(flag) => Ok(flag.to_string()),
        YamlValue::Null => Ok(String::new()),
        other => Err(ConfigError::Invalid(format!(
            "unsupported yaml mapping key: {other:?}"
        ))),
    }
}
