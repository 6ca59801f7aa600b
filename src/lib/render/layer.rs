use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::*;

/// The z-order bucket a styled feature is drawn in.
///
/// `Bottom` and `Top` sort outside every numeric layer.
#[derive(Debug, Copy, Clone)]
pub enum LayerId {
    Bottom,
    Numeric(f64),
    Top,
}

impl LayerId {
    /// Reads the layer of a styled feature from its `layer` tag and its declaration.
    pub fn of(feature: &StyledFeature) -> Self {
        match feature.style.mapnik_layer {
            Some(LayerDirective::Top) => LayerId::Top,
            Some(LayerDirective::Bottom) => LayerId::Bottom,
            None => {
                let layer = feature.feature.property_number("layer").unwrap_or(0.0);
                // -0 and 0 are the same layer.
                LayerId::Numeric(if layer == 0.0 { 0.0 } else { layer })
            }
        }
    }

    fn class(&self) -> u8 {
        match self {
            LayerId::Bottom => 0,
            LayerId::Numeric(_) => 1,
            LayerId::Top => 2,
        }
    }
}

impl Ord for LayerId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (LayerId::Numeric(a), LayerId::Numeric(b)) => a.total_cmp(b),
            _ => self.class().cmp(&other.class()),
        }
    }
}

impl PartialOrd for LayerId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for LayerId {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LayerId {}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LayerId::Bottom => write!(f, "bottom"),
            LayerId::Numeric(layer) => write!(f, "{}", layer),
            LayerId::Top => write!(f, "top"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Layer {
    pub id: LayerId,
    /// Features in global z-order.
    pub features: Vec<StyledFeature>,
}

/// All layers of a tile in ascending order, which is the order geometry is drawn in.
#[derive(Debug, Clone, Default)]
pub struct LayerStack {
    layers: Vec<Layer>,
}

impl LayerStack {
    /// Groups z-sorted styled features into layers, keeping their order within each layer.
    pub fn build(features: Vec<StyledFeature>) -> Self {
        let mut layers: BTreeMap<LayerId, Vec<StyledFeature>> = BTreeMap::new();
        for feature in features {
            layers.entry(LayerId::of(&feature)).or_default().push(feature);
        }

        Self {
            layers: layers
                .into_iter()
                .map(|(id, features)| Layer { id, features })
                .collect(),
        }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn feature_count(&self) -> usize {
        self.layers.iter().map(|l| l.features.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// The order decorations claim space in: layers from top to bottom and within a
/// layer the feature drawn last first.
pub fn decoration_order(stack: &LayerStack) -> Vec<(LayerId, Vec<&StyledFeature>)> {
    stack
        .layers()
        .iter()
        .rev()
        .map(|layer| {
            let mut features: Vec<_> = layer.features.iter().collect();
            features.sort_by(|a, b| b.rank.cmp(&a.rank));
            (layer.id, features)
        })
        .collect()
}
