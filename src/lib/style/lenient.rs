//! Deserializers that accept the loose value types style sources tend to emit.
//!
//! Style values arrive as whatever the engine produced: numbers may be strings,
//! flags may be `"true"` and dash patterns may be `"5,3"`.

use serde::Deserializer;
use serde_derive::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<f64>),
}

fn loose<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Loose>, D::Error> {
    serde::Deserialize::deserialize(deserializer)
}

fn invalid<E: serde::de::Error>(what: &str, value: impl std::fmt::Display) -> E {
    E::custom(format!("'{}' is not a valid {}", value, what))
}

pub fn number<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    match loose(deserializer)? {
        None => Ok(None),
        Some(Loose::Number(n)) => Ok(Some(n as f32)),
        Some(Loose::String(s)) => s
            .trim()
            .parse::<f32>()
            .map(Some)
            .map_err(|_| invalid("number", s)),
        Some(Loose::Bool(b)) => Err(invalid("number", b)),
        Some(Loose::List(_)) => Err(invalid("number", "list")),
    }
}

pub fn string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match loose(deserializer)? {
        None => Ok(None),
        Some(Loose::String(s)) => Ok(Some(s)),
        Some(Loose::Number(n)) => Ok(Some(n.to_string())),
        Some(Loose::Bool(b)) => Ok(Some(b.to_string())),
        Some(Loose::List(_)) => Err(invalid("string", "list")),
    }
}

pub fn boolean<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match loose(deserializer)? {
        None => Ok(None),
        Some(Loose::Bool(b)) => Ok(Some(b)),
        Some(Loose::String(s)) => match s.trim() {
            "true" | "yes" => Ok(Some(true)),
            "false" | "no" => Ok(Some(false)),
            _ => Err(invalid("flag", s)),
        },
        Some(Loose::Number(n)) => Err(invalid("flag", n)),
        Some(Loose::List(_)) => Err(invalid("flag", "list")),
    }
}

pub fn dashes<'de, D>(deserializer: D) -> Result<Option<Vec<f32>>, D::Error>
where
    D: Deserializer<'de>,
{
    match loose(deserializer)? {
        None => Ok(None),
        Some(Loose::List(list)) => Ok(Some(list.into_iter().map(|v| v as f32).collect())),
        Some(Loose::String(s)) => s
            .split(',')
            .map(|part| part.trim().parse::<f32>())
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
            .map_err(|_| invalid("dash pattern", s)),
        Some(Loose::Number(n)) => Ok(Some(vec![n as f32])),
        Some(Loose::Bool(b)) => Err(invalid("dash pattern", b)),
    }
}
