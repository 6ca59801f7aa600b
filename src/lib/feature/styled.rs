use std::sync::Arc;

use crate::*;

/// Identifies the source feature of a styled feature.
///
/// All variants of one feature share it, which keeps them from blocking each other's labels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct StyleId(pub u32);

/// A feature bound to one of its style variants.
#[derive(Debug, Clone)]
pub struct StyledFeature {
    pub feature: Arc<Feature>,
    pub variant: String,
    pub style: Arc<StyleDeclaration>,
    pub style_id: StyleId,
    /// The position in the global draw order of the tile.
    pub rank: usize,
}

impl StyledFeature {
    /// Whether two styled features use the very same declaration object.
    pub fn shares_style(&self, other: &StyledFeature) -> bool {
        Arc::ptr_eq(&self.style, &other.style)
    }
}

/// Expands every feature into one styled feature per style variant and sorts them by z-index.
///
/// The sort is stable: features with equal z-index stay in input order, variants of
/// one feature in the order the style engine returned them.
pub fn stylize_features(
    features: &[Arc<Feature>],
    zoom: u32,
    resolver: &mut StyleResolver,
    engine: &dyn StyleEngine,
) -> Vec<StyledFeature> {
    let mut styled = vec![];

    for (index, feature) in features.iter().enumerate() {
        let variants = resolver.resolve(engine, &feature.properties, zoom, feature.kind());
        for variant in variants.iter() {
            styled.push((
                variant.declaration.z_index(),
                StyledFeature {
                    feature: feature.clone(),
                    variant: variant.name.clone(),
                    style: variant.declaration.clone(),
                    style_id: StyleId(index as u32),
                    rank: 0,
                },
            ));
        }
    }

    styled.sort_by(|a, b| a.0.total_cmp(&b.0));

    styled
        .into_iter()
        .enumerate()
        .map(|(rank, (_, mut feature))| {
            feature.rank = rank;
            feature
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Styles every feature by its `name` property, one variant per `variants` entry.
    struct TableEngine {
        id: StyleSourceId,
        table: HashMap<String, Vec<(&'static str, StyleDeclaration)>>,
    }

    impl StyleEngine for TableEngine {
        fn source_id(&self) -> &StyleSourceId {
            &self.id
        }

        fn restyle(
            &self,
            properties: &Properties,
            _zoom: u32,
            _entity: EntityType,
            _selector: SelectorKind,
        ) -> StyleVariants {
            let mut variants = StyleVariants::new();
            let name = properties.get("name").and_then(|n| n.as_str()).unwrap_or("");
            for (variant, declaration) in self.table.get(name).cloned().unwrap_or_default() {
                variants.insert(variant, declaration);
            }
            variants
        }
    }

    fn z(z: &str) -> StyleDeclaration {
        StyleDeclaration {
            z_index: Some(z.to_string()),
            ..Default::default()
        }
    }

    fn point(name: &str) -> Arc<Feature> {
        Arc::new(
            Feature::new(Geometry::Point {
                coordinates: [0.0, 0.0],
            })
            .with_property("name", name),
        )
    }

    fn engine() -> TableEngine {
        let mut table = HashMap::new();
        table.insert("a".to_string(), vec![("fill", z("2")), ("label", z("1"))]);
        table.insert("b".to_string(), vec![("casing", z("1")), ("line", z("1"))]);
        table.insert("c".to_string(), vec![("default", z("not a number"))]);
        table.insert("d".to_string(), vec![("default", z("-1.5"))]);
        table.insert("zero".to_string(), vec![("default", z("0"))]);
        table.insert("negative zero".to_string(), vec![("default", z("-0"))]);
        TableEngine {
            id: StyleSourceId::new("table"),
            table,
        }
    }

    #[test]
    fn sorts_by_z_index_and_keeps_ties_in_input_order() {
        let features = vec![point("a"), point("b"), point("c"), point("d"), point("unstyled")];
        let mut resolver = StyleResolver::new();
        let styled = stylize_features(&features, 14, &mut resolver, &engine());

        let order: Vec<_> = styled
            .iter()
            .map(|f| (f.style_id.0, f.variant.as_str()))
            .collect();
        assert_eq!(
            order,
            vec![
                (3, "default"),
                (2, "default"),
                (0, "label"),
                (1, "casing"),
                (1, "line"),
                (0, "fill"),
            ]
        );

        let ranks: Vec<_> = styled.iter().map(|f| f.rank).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn signed_zero_z_indices_tie() {
        let features = vec![point("zero"), point("negative zero"), point("unstyled"), point("c")];
        let mut resolver = StyleResolver::new();
        let styled = stylize_features(&features, 14, &mut resolver, &engine());

        let order: Vec<_> = styled.iter().map(|f| f.style_id.0).collect();
        assert_eq!(order, vec![0, 1, 3]);
    }

    #[test]
    fn variants_share_the_style_id_of_their_feature() {
        let features = vec![point("b"), point("a")];
        let mut resolver = StyleResolver::new();
        let styled = stylize_features(&features, 14, &mut resolver, &engine());

        for feature in &styled {
            let expected = if feature.feature.properties["name"] == "b" { 0 } else { 1 };
            assert_eq!(feature.style_id, StyleId(expected));
        }
    }

    #[test]
    fn identical_properties_share_declarations() {
        let features = vec![point("a"), point("a")];
        let mut resolver = StyleResolver::new();
        let styled = stylize_features(&features, 14, &mut resolver, &engine());

        let fills: Vec<_> = styled.iter().filter(|f| f.variant == "fill").collect();
        assert_eq!(fills.len(), 2);
        assert!(fills[0].shares_style(fills[1]));
        assert_ne!(fills[0].style_id, fills[1].style_id);
    }
}
