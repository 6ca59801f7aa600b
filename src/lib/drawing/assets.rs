use std::collections::HashMap;
use std::sync::Arc;

/// A decoded image that can be blitted or used as a fill pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub name: String,
    pub width: u32,
    pub height: u32,
    /// Where a surface can load the pixels from, if it needs them.
    pub href: Option<String>,
}

impl Image {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            href: None,
        }
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }
}

/// Looks up images by name.
///
/// `None` means the image is unknown or not loaded yet. The renderer skips whatever
/// needs it and does not retry, the host re-renders once the image is there.
pub trait AssetCache {
    fn image(&self, name: &str) -> Option<Arc<Image>>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryAssets {
    images: HashMap<String, Arc<Image>>,
}

impl MemoryAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, image: Image) {
        self.images.insert(image.name.clone(), Arc::new(image));
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<Image>> {
        self.images.remove(name)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl AssetCache for MemoryAssets {
    fn image(&self, name: &str) -> Option<Arc<Image>> {
        self.images.get(name).cloned()
    }
}

#[test]
fn memory_assets_lookup() {
    let mut assets = MemoryAssets::new();
    assets.insert(Image::new("logo.png", 16, 12).with_href("icons/logo.png"));

    let logo = assets.image("logo.png").unwrap();
    assert_eq!((logo.width, logo.height), (16, 12));
    assert_eq!(logo.href.as_deref(), Some("icons/logo.png"));
    assert!(assets.image("missing.png").is_none());

    assets.remove("logo.png");
    assert!(assets.is_empty());
}
