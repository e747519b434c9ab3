#![forbid(unsafe_code)]

//! Paint-layer capability.
//!
//! The renderer never draws. It tells each [`PaintLayer`] that a new
//! [`LayerConfig`] is current and how much of it changed. Any target can
//! implement the trait: a pixel canvas, a terminal cell grid, a retained
//! scene graph, or a recorder in tests.

use std::fmt;

use vrender_core::LayerConfig;

/// A drawing surface driven by the renderer.
pub trait PaintLayer {
    /// Redraw everything inside the window.
    fn update(&mut self, config: &LayerConfig);

    /// The window moved; reuse rows that are still visible.
    fn scroll_lines(&mut self, config: &LayerConfig) {
        self.update(config);
    }

    /// Redraw document rows `first_row..=last_row`, already clipped to the window.
    fn update_lines(&mut self, config: &LayerConfig, first_row: usize, last_row: usize) {
        let _ = (first_row, last_row);
        self.update(config);
    }
}

impl<L: PaintLayer + ?Sized> PaintLayer for Box<L> {
    fn update(&mut self, config: &LayerConfig) {
        (**self).update(config);
    }

    fn scroll_lines(&mut self, config: &LayerConfig) {
        (**self).scroll_lines(config);
    }

    fn update_lines(&mut self, config: &LayerConfig, first_row: usize, last_row: usize) {
        (**self).update_lines(config, first_row, last_row);
    }
}

/// A layer that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLayer;

impl PaintLayer for NullLayer {
    fn update(&mut self, _config: &LayerConfig) {}
}

/// Which layer of a [`LayerSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    Text,
    Gutter,
    MarkerBack,
    MarkerFront,
    Cursor,
}

impl LayerKind {
    pub const ALL: [Self; 5] = [
        Self::Text,
        Self::Gutter,
        Self::MarkerBack,
        Self::MarkerFront,
        Self::Cursor,
    ];
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Gutter => "gutter",
            Self::MarkerBack => "marker_back",
            Self::MarkerFront => "marker_front",
            Self::Cursor => "cursor",
        })
    }
}

/// The five layers the renderer dispatches to.
pub struct LayerSet {
    layers: [Box<dyn PaintLayer>; 5],
}

impl LayerSet {
    /// All layers draw nothing. Replace individual layers with
    /// [`with_layer`](Self::with_layer).
    #[must_use]
    pub fn headless() -> Self {
        Self {
            layers: LayerKind::ALL.map(|_| Box::new(NullLayer) as Box<dyn PaintLayer>),
        }
    }

    #[must_use]
    pub fn with_layer(mut self, kind: LayerKind, layer: impl PaintLayer + 'static) -> Self {
        self.set(kind, layer);
        self
    }

    /// Replace one layer, returning the previous one.
    pub fn set(
        &mut self,
        kind: LayerKind,
        layer: impl PaintLayer + 'static,
    ) -> Box<dyn PaintLayer> {
        std::mem::replace(&mut self.layers[index(kind)], Box::new(layer))
    }

    pub fn get_mut(&mut self, kind: LayerKind) -> &mut dyn PaintLayer {
        self.layers[index(kind)].as_mut()
    }
}

impl Default for LayerSet {
    fn default() -> Self {
        Self::headless()
    }
}

impl fmt::Debug for LayerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerSet").finish_non_exhaustive()
    }
}

const fn index(kind: LayerKind) -> usize {
    match kind {
        LayerKind::Text => 0,
        LayerKind::Gutter => 1,
        LayerKind::MarkerBack => 2,
        LayerKind::MarkerFront => 3,
        LayerKind::Cursor => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Count(Rc<RefCell<(usize, usize)>>);

    impl PaintLayer for Count {
        fn update(&mut self, _config: &LayerConfig) {
            self.0.borrow_mut().0 += 1;
        }

        fn update_lines(&mut self, _config: &LayerConfig, _first: usize, _last: usize) {
            self.0.borrow_mut().1 += 1;
        }
    }

    #[test]
    fn defaults_fall_back_to_update() {
        let counts = Rc::new(RefCell::new((0, 0)));
        let mut layers = LayerSet::headless().with_layer(LayerKind::Text, Count(counts.clone()));
        let config = LayerConfig::default();
        layers.get_mut(LayerKind::Text).scroll_lines(&config);
        layers.get_mut(LayerKind::Text).update_lines(&config, 0, 1);
        layers.get_mut(LayerKind::Gutter).update(&config);
        assert_eq!(*counts.borrow(), (1, 1));
    }

    #[test]
    fn set_returns_previous() {
        let mut layers = LayerSet::headless();
        let mut previous = layers.set(LayerKind::Cursor, NullLayer);
        previous.update(&LayerConfig::default());
    }

    #[test]
    fn kinds_display() {
        let names: Vec<_> = LayerKind::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ["text", "gutter", "marker_back", "marker_front", "cursor"]);
    }
}
