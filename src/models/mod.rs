// src/models/mod.rs
pub mod course;
pub mod lecture;
pub mod settings;
pub mod user;

use serde::{de, Deserialize, Deserializer};

/// Campo opcional de um PATCH que pode ser limpo:
/// ausente = `None` (não mexer), `null` = `Some(None)` (limpar), valor = `Some(Some(v))`.
/// Usar sempre com `#[serde(default, deserialize_with = "nullable")]`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// Query strings mandam `semester=` quando o campo fica vazio no frontend
pub(crate) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("invalid number '{}'", value))),
    }
}
