use serde_derive::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

use super::*;
use crate::{GeometryKind, Properties};

/// Identifies one revision of a style source.
///
/// The resolver keys its cache by this, so a new revision never sees stale entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StyleSourceId(String);

impl StyleSourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for StyleSourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The OSM entity type a style is requested for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Node,
    Way,
    Canvas,
}

/// The selector subject within an entity type.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectorKind {
    Node,
    Line,
    Area,
    Canvas,
}

/// A named style variant, e.g. the `casing` or `label` of a road.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleVariant {
    pub name: String,
    pub declaration: Arc<StyleDeclaration>,
}

/// The ordered set of variants that apply to one feature.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleVariants(Vec<StyleVariant>);

impl StyleVariants {
    pub fn new() -> Self {
        Self(vec![])
    }

    /// Adds a variant, replacing an earlier one of the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, declaration: StyleDeclaration) {
        let name = name.into();
        let declaration = Arc::new(declaration);
        match self.0.iter_mut().find(|v| v.name == name) {
            Some(variant) => variant.declaration = declaration,
            None => self.0.push(StyleVariant { name, declaration }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<StyleDeclaration>> {
        self.0.iter().find(|v| v.name == name).map(|v| &v.declaration)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StyleVariant> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Computes the style of map entities. Selector matching and the cascade live behind this.
pub trait StyleEngine {
    /// The identity of the style source currently loaded.
    fn source_id(&self) -> &StyleSourceId;

    fn restyle(
        &self,
        properties: &Properties,
        zoom: u32,
        entity: EntityType,
        selector: SelectorKind,
    ) -> StyleVariants;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
enum StyleTarget {
    Geometry(GeometryKind),
    Canvas,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    source: StyleSourceId,
    properties: String,
    zoom: u32,
    target: StyleTarget,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResolverStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

/// Memoizes style lookups across renders.
///
/// The cache is unbounded. Whoever swaps the style source has to call
/// [`StyleResolver::invalidate`] for the old source, otherwise its entries stay around.
#[derive(Debug, Default)]
pub struct StyleResolver {
    cache: HashMap<CacheKey, Arc<StyleVariants>>,
    hits: u64,
    misses: u64,
}

impl StyleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the style variants for a feature at `zoom`.
    pub fn resolve(
        &mut self,
        engine: &dyn StyleEngine,
        properties: &Properties,
        zoom: u32,
        kind: GeometryKind,
    ) -> Arc<StyleVariants> {
        let subject = match kind {
            GeometryKind::Polygon | GeometryKind::MultiPolygon => {
                Some((EntityType::Way, SelectorKind::Area))
            }
            GeometryKind::LineString | GeometryKind::MultiLineString => {
                Some((EntityType::Way, SelectorKind::Line))
            }
            GeometryKind::Point | GeometryKind::MultiPoint => {
                Some((EntityType::Node, SelectorKind::Node))
            }
            GeometryKind::GeometryCollection => None,
        };

        match subject {
            Some((entity, selector)) => self.lookup(
                engine,
                properties,
                zoom,
                StyleTarget::Geometry(kind),
                entity,
                selector,
            ),
            None => {
                log::trace!("No style subject for {:?}, leaving it unstyled.", kind);
                Arc::new(StyleVariants::new())
            }
        }
    }

    /// Returns the style of the tile background.
    pub fn resolve_canvas(&mut self, engine: &dyn StyleEngine, zoom: u32) -> Arc<StyleVariants> {
        self.lookup(
            engine,
            &Properties::new(),
            zoom,
            StyleTarget::Canvas,
            EntityType::Canvas,
            SelectorKind::Canvas,
        )
    }

    fn lookup(
        &mut self,
        engine: &dyn StyleEngine,
        properties: &Properties,
        zoom: u32,
        target: StyleTarget,
        entity: EntityType,
        selector: SelectorKind,
    ) -> Arc<StyleVariants> {
        let key = CacheKey {
            source: engine.source_id().clone(),
            // Maps with string keys always serialize.
            properties: serde_json::to_string(properties)
                .unwrap_or_else(|_| format!("{:?}", properties)),
            zoom,
            target,
        };

        if let Some(variants) = self.cache.get(&key) {
            self.hits += 1;
            return variants.clone();
        }

        self.misses += 1;
        let variants = Arc::new(engine.restyle(properties, zoom, entity, selector));
        self.cache.insert(key, variants.clone());
        variants
    }

    /// Drops every cached entry that was produced by `source`.
    pub fn invalidate(&mut self, source: &StyleSourceId) {
        let before = self.cache.len();
        self.cache.retain(|key, _| &key.source != source);
        log::debug!(
            "Invalidated {} cached styles of source {}.",
            before - self.cache.len(),
            source
        );
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn stats(&self) -> ResolverStats {
        ResolverStats {
            entries: self.cache.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}
