//! Terminal graphics protocols for decoded images.

use std::collections::HashMap;
use std::sync::Arc;

use image::DynamicImage;
use ratatui::layout::Rect;
use ratatui_image::Resize;
use ratatui_image::picker::{Capability, Picker, ProtocolType};
use ratatui_image::protocol::StatefulProtocol;
use tracing::debug;

struct CachedProtocol {
    pixels: Arc<DynamicImage>,
    protocol: StatefulProtocol,
}

/// Picks the terminal's image protocol and keeps one encoder per slot key.
pub struct ImageRenderer {
    picker: Picker,
    protocols: HashMap<String, CachedProtocol>,
}

impl ImageRenderer {
    /// Queries the terminal for graphics support.
    ///
    /// Must run after the terminal entered raw mode. Falls back to half blocks
    /// when the query fails.
    #[must_use]
    pub fn new() -> Self {
        let mut picker = Picker::from_query_stdio().unwrap_or_else(|_| Picker::halfblocks());

        let caps = picker.capabilities();
        let has_sixel = caps.iter().any(|c| matches!(c, Capability::Sixel));
        let has_kitty = caps.iter().any(|c| matches!(c, Capability::Kitty));
        if has_sixel && !has_kitty && picker.protocol_type() == ProtocolType::Halfblocks {
            picker.set_protocol_type(ProtocolType::Sixel);
        }

        debug!(protocol = ?picker.protocol_type(), "Image protocol selected");
        Self::with_picker(picker)
    }

    /// Renderer that draws with unicode half blocks only.
    #[must_use]
    pub fn halfblocks() -> Self {
        Self::with_picker(Picker::halfblocks())
    }

    fn with_picker(picker: Picker) -> Self {
        Self {
            picker,
            protocols: HashMap::new(),
        }
    }

    /// Protocol for the image currently shown under `key`.
    ///
    /// A new pixel buffer replaces the cached encoder; `None` drops it.
    pub fn protocol(
        &mut self,
        key: &str,
        pixels: Option<&Arc<DynamicImage>>,
    ) -> Option<&mut StatefulProtocol> {
        let Some(pixels) = pixels else {
            self.protocols.remove(key);
            return None;
        };

        let stale = self
            .protocols
            .get(key)
            .is_none_or(|cached| !Arc::ptr_eq(&cached.pixels, pixels));
        if stale {
            let protocol = self.picker.new_resize_protocol((**pixels).clone());
            self.protocols.insert(
                key.to_string(),
                CachedProtocol {
                    pixels: pixels.clone(),
                    protocol,
                },
            );
        }
        self.protocols.get_mut(key).map(|cached| &mut cached.protocol)
    }

    /// Drops encoders whose key no longer passes `keep`.
    pub fn retain(&mut self, keep: impl Fn(&str) -> bool) {
        self.protocols.retain(|key, _| keep(key));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }
}

impl Default for ImageRenderer {
    fn default() -> Self {
        Self::halfblocks()
    }
}

impl std::fmt::Debug for ImageRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageRenderer")
            .field("protocol", &self.picker.protocol_type())
            .field("cached", &self.protocols.len())
            .finish()
    }
}

/// Area an image occupies when fit into `area`, centered.
#[must_use]
pub fn fitted_area(protocol: &StatefulProtocol, area: Rect) -> Rect {
    let size = protocol.size_for(Resize::Fit(None), area);
    let width = size.width.min(area.width);
    let height = size.height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixels() -> Arc<DynamicImage> {
        Arc::new(DynamicImage::new_rgb8(16, 8))
    }

    #[test]
    fn test_protocol_is_reused_for_same_pixels() {
        let mut renderer = ImageRenderer::halfblocks();
        let image = pixels();

        assert!(renderer.protocol("cover", Some(&image)).is_some());
        assert!(renderer.protocol("cover", Some(&image)).is_some());
        assert_eq!(renderer.len(), 1);

        assert!(renderer.protocol("cover", None).is_none());
        assert!(renderer.is_empty());
    }

    #[test]
    fn test_retain_drops_unlisted_keys() {
        let mut renderer = ImageRenderer::halfblocks();
        let image = pixels();
        renderer.protocol("list:a", Some(&image));
        renderer.protocol("list:b", Some(&image));

        renderer.retain(|key| key == "list:a");
        assert_eq!(renderer.len(), 1);
    }

    #[test]
    fn test_fitted_area_stays_inside() {
        let mut renderer = ImageRenderer::halfblocks();
        let image = pixels();
        let area = Rect::new(2, 3, 20, 10);
        let protocol = renderer.protocol("cover", Some(&image)).expect("protocol");

        let fitted = fitted_area(protocol, area);
        assert!(fitted.width <= area.width && fitted.height <= area.height);
        assert!(fitted.x >= area.x && fitted.y >= area.y);
    }
}
