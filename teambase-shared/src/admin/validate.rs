/// Value validation for admin edits
///
/// Submitted values arrive as strings; before a value is bound into an
/// UPDATE it must parse as the column's SQL type. The UPDATE itself casts
/// with `$n::{type}`, so validation here decides the error message while
/// the cast keeps the database honest.

use chrono::DateTime;

/// Checks that a raw string is a valid literal for a SQL type.
///
/// # Errors
///
/// Returns a human-readable message naming what the value failed to
/// parse as.
pub fn validate_value(sql_type: &str, raw: &str) -> Result<(), String> {
    match sql_type {
        "bigint" => raw
            .parse::<i64>()
            .map(|_| ())
            .map_err(|_| format!("'{}' is not a valid bigint", raw)),
        "integer" => raw
            .parse::<i32>()
            .map(|_| ())
            .map_err(|_| format!("'{}' is not a valid integer", raw)),
        "smallint" => raw
            .parse::<i16>()
            .map(|_| ())
            .map_err(|_| format!("'{}' is not a valid smallint", raw)),
        "boolean" => match raw {
            "t" | "f" | "true" | "false" | "0" | "1" => Ok(()),
            _ => Err(format!("'{}' is not a valid boolean", raw)),
        },
        "timestamptz" => DateTime::parse_from_rfc3339(raw)
            .map(|_| ())
            .map_err(|_| format!("'{}' is not a valid RFC 3339 timestamp", raw)),
        "varchar" | "text" => Ok(()),
        other => Err(format!("unsupported column type '{}'", other)),
    }
}
