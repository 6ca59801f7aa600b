use nom::{
    bytes::complete::{tag, take_till1},
    character::complete::{char, multispace0},
    combinator::all_consuming,
    sequence::{delimited, tuple},
    IResult,
};
use serde_derive::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

use super::*;
use crate::{LoadError, Properties};

fn default_variant() -> String {
    "default".to_string()
}

/// A single style rule including the entities it applies to.
#[derive(Debug, Clone, Deserialize)]
pub struct StyleRule {
    /// The entity type the rule matches.
    pub entity: EntityType,
    /// The selector subject, e.g. `area`. Matches every subject if missing.
    #[serde(default)]
    pub selector: Option<SelectorKind>,
    /// Tags a feature must carry. A value of `*` only requires the tag to be present.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub min_zoom: Option<u32>,
    #[serde(default)]
    pub max_zoom: Option<u32>,
    /// The variant (think `::casing` in MapCSS) the declaration contributes to.
    #[serde(default = "default_variant")]
    pub variant: String,
    /// The declaration, using the usual style keys.
    pub style: Map<String, Value>,
}

impl StyleRule {
    /// Checks if the rule applies to an entity described by the given criteria.
    pub fn matches(
        &self,
        properties: &Properties,
        zoom: u32,
        entity: EntityType,
        selector: SelectorKind,
    ) -> bool {
        if self.entity != entity {
            return false;
        }

        if let Some(s) = self.selector {
            if s != selector {
                return false;
            }
        }

        if self.min_zoom.map_or(false, |min| zoom < min)
            || self.max_zoom.map_or(false, |max| zoom > max)
        {
            return false;
        }

        for (key, expected) in &self.tags {
            match properties.get(key) {
                Some(value) => {
                    if expected != "*" && &tag_string(value) != expected {
                        return false;
                    }
                }
                None => return false,
            }
        }

        true
    }
}

fn tag_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        value => value.to_string(),
    }
}

/// Parses a `tag(key)` reference to a feature property.
fn tag_reference(input: &str) -> IResult<&str, &str> {
    let (input, (_, _, key, _)) = tuple((
        multispace0,
        tag("tag("),
        delimited(multispace0, take_till1(|c: char| c == ')' || c.is_whitespace()), multispace0),
        char(')'),
    ))(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, key))
}

/// Replaces `tag(key)` values with the property `key` of the feature.
///
/// A key whose tag is missing is dropped from the declaration.
fn substitute_tags(declaration: &mut Map<String, Value>, properties: &Properties) {
    let references: Vec<(String, String)> = declaration
        .iter()
        .filter_map(|(key, value)| {
            let (_, tag_key) = all_consuming(tag_reference)(value.as_str()?).ok()?;
            Some((key.clone(), tag_key.to_string()))
        })
        .collect();

    for (key, tag_key) in references {
        match properties.get(&tag_key) {
            Some(value) => {
                declaration.insert(key, Value::String(tag_string(value)));
            }
            None => {
                declaration.remove(&key);
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct RuleFile {
    rules: Vec<StyleRule>,
}

/// A style engine driven by a list of rules stored as JSON data.
///
/// All matching rules apply in order. Within one variant, keys of later rules
/// override those of earlier ones. A value `tag(key)` takes the feature's `key` property.
#[derive(Debug, Clone)]
pub struct RuleStyleEngine {
    id: StyleSourceId,
    rules: Vec<StyleRule>,
}

impl RuleStyleEngine {
    /// Creates an engine from rules, validating every declaration up front.
    pub fn new(id: StyleSourceId, rules: Vec<StyleRule>) -> Result<Self, LoadError> {
        for (index, rule) in rules.iter().enumerate() {
            serde_json::from_value::<StyleDeclaration>(Value::Object(rule.style.clone()))
                .map_err(|source| LoadError::InvalidRule { index, source })?;
        }

        Ok(Self { id, rules })
    }

    /// Parses a rule file of the form `{ "rules": [..] }`.
    pub fn from_json(id: StyleSourceId, json: &str) -> Result<Self, LoadError> {
        let file: RuleFile = serde_json::from_str(json).map_err(|source| LoadError::Json {
            path: id.to_string(),
            source,
        })?;
        Self::new(id, file.rules)
    }

    /// Loads a rule file from disk. The revision becomes part of the source identity.
    pub fn load(path: impl AsRef<Path>, revision: u64) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let id = StyleSourceId::new(format!("{}#{}", path.display(), revision));
        Self::from_json(id, &contents)
    }

    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }
}

impl StyleEngine for RuleStyleEngine {
    fn source_id(&self) -> &StyleSourceId {
        &self.id
    }

    fn restyle(
        &self,
        properties: &Properties,
        zoom: u32,
        entity: EntityType,
        selector: SelectorKind,
    ) -> StyleVariants {
        let mut cascaded: Vec<(&str, Map<String, Value>)> = vec![];

        for rule in self
            .rules
            .iter()
            .filter(|rule| rule.matches(properties, zoom, entity, selector))
        {
            let index = match cascaded.iter().position(|(name, _)| *name == rule.variant) {
                Some(index) => index,
                None => {
                    cascaded.push((rule.variant.as_str(), Map::new()));
                    cascaded.len() - 1
                }
            };
            let declaration = &mut cascaded[index].1;

            for (key, value) in &rule.style {
                declaration.insert(key.clone(), value.clone());
            }
        }

        let mut variants = StyleVariants::new();
        for (name, mut declaration) in cascaded {
            substitute_tags(&mut declaration, properties);
            match serde_json::from_value::<StyleDeclaration>(Value::Object(declaration)) {
                Ok(declaration) => variants.insert(name, declaration),
                Err(e) => log::warn!("Dropping the '{}' style variant: {}", name, e),
            }
        }
        variants
    }
}
