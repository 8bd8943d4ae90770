use serde_json::{json, Value};
use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(map)) = (data, response.as_object_mut()) {
                map.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a gateway response body as-is (JSON) or as `key: value` lines (text)
pub fn output_value(output_format: &OutputFormat, value: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Text => match value {
            Value::Object(map) => {
                for (key, v) in map {
                    println!("{}: {}", key, display_scalar(v));
                }
            }
            other => println!("{}", display_scalar(other)),
        },
    }
    Ok(())
}

/// Output an empty collection in the appropriate format
pub fn output_empty_collection(
    output_format: &OutputFormat,
    collection_name: &str,
    message: &str,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({
                collection_name: []
            }))?);
        }
        OutputFormat::Text => {
            println!("{}", message);
        }
    }
    Ok(())
}

/// Strings print bare; everything else prints as compact JSON.
pub fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a CLI argument into a JSON scalar: `true`, `42`, `null`, or a bare string.
pub fn parse_scalar(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Bool(_) | Value::Number(_) | Value::Null | Value::String(_))) => value,
        _ => Value::String(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalars_parse_as_json_first() {
        assert_eq!(parse_scalar("true"), json!(true));
        assert_eq!(parse_scalar("12.5"), json!(12.5));
        assert_eq!(parse_scalar("null"), Value::Null);
        assert_eq!(parse_scalar("Scheduled downtime"), json!("Scheduled downtime"));
        assert_eq!(parse_scalar("[1,2]"), json!("[1,2]"));
    }

    #[test]
    fn strings_display_without_quotes() {
        assert_eq!(display_scalar(&json!("on")), "on");
        assert_eq!(display_scalar(&json!(false)), "false");
    }
}
