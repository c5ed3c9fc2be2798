//! Pan and zoom viewport over the cluster markers
//!
//! Markers sit at fixed percentage positions; only the viewport transform
//! and the selected cluster change. All input goes through
//! [`MapState::apply`].

use ambient_core::types::{Cluster, ClusterId, PercentPoint};
use serde::Serialize;
use tracing::trace;

/// Smallest zoom factor
pub const MIN_SCALE: f64 = 0.5;

/// Largest zoom factor
pub const MAX_SCALE: f64 = 3.0;

/// Zoom change per wheel event
pub const ZOOM_STEP: f64 = 0.1;

/// Marker hit radius in canvas percent
pub const MARKER_RADIUS: f64 = 4.0;

/// A point in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    /// Horizontal component
    pub x: f64,
    /// Vertical component
    pub y: f64,
}

impl Point {
    /// Create a point
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What the pointer went down on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Empty map canvas
    Canvas,
    /// A cluster marker
    Marker(ClusterId),
    /// Zoom buttons, reset, info panel
    Control,
}

/// Input to the map
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Pointer pressed
    PointerDown {
        /// Pointer position
        at: Point,
        /// Element under the pointer
        target: Target,
    },
    /// Pointer moved
    PointerMove {
        /// Pointer position
        at: Point,
    },
    /// Pointer released
    PointerUp,
    /// Pointer left the map
    PointerLeave,
    /// Wheel scrolled; positive `delta_y` zooms out, zero or non-finite is ignored
    Wheel {
        /// Vertical wheel delta
        delta_y: f64,
    },
    /// Zoom-in button
    ZoomIn,
    /// Zoom-out button
    ZoomOut,
    /// Info panel close control
    ClosePanel,
    /// Reset control
    Reset,
}

/// Viewport and selection state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapState {
    scale: f64,
    offset: Point,
    selected: Option<ClusterId>,
    #[serde(skip)]
    drag_anchor: Option<Point>,
}

impl Default for MapState {
    fn default() -> Self {
        Self::new()
    }
}

impl MapState {
    /// Unzoomed, centred, nothing selected
    pub const fn new() -> Self {
        Self {
            scale: 1.0,
            offset: Point::new(0.0, 0.0),
            selected: None,
            drag_anchor: None,
        }
    }

    /// Current zoom factor
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Current translation
    pub const fn offset(&self) -> Point {
        self.offset
    }

    /// Selected cluster id
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Whether a drag is in progress
    pub const fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// The selected cluster, resolved against `clusters`
    pub fn selected_cluster<'c>(&self, clusters: &'c [Cluster]) -> Option<&'c Cluster> {
        let id = self.selected.as_deref()?;
        clusters.iter().find(|cluster| cluster.id == id)
    }

    /// CSS transform of the map layer
    pub fn transform_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.offset.x, self.offset.y, self.scale
        )
    }

    /// Apply one input event
    pub fn apply(&mut self, event: MapEvent) {
        trace!(?event, "map event");
        match event {
            MapEvent::PointerDown { at, target } => match target {
                Target::Canvas => {
                    self.drag_anchor = Some(Point::new(at.x - self.offset.x, at.y - self.offset.y));
                }
                Target::Marker(id) => self.selected = Some(id),
                Target::Control => {}
            },
            MapEvent::PointerMove { at } => {
                if let Some(anchor) = self.drag_anchor {
                    self.offset = Point::new(at.x - anchor.x, at.y - anchor.y);
                }
            }
            MapEvent::PointerUp | MapEvent::PointerLeave => self.drag_anchor = None,
            MapEvent::Wheel { delta_y } if delta_y.is_finite() => {
                if delta_y > 0.0 {
                    self.zoom_by(-ZOOM_STEP);
                } else if delta_y < 0.0 {
                    self.zoom_by(ZOOM_STEP);
                }
            }
            MapEvent::Wheel { .. } => {}
            MapEvent::ZoomIn => self.zoom_by(ZOOM_STEP),
            MapEvent::ZoomOut => self.zoom_by(-ZOOM_STEP),
            MapEvent::ClosePanel => self.selected = None,
            MapEvent::Reset => {
                self.scale = 1.0;
                self.offset = Point::default();
            }
        }
    }

    fn zoom_by(&mut self, step: f64) {
        let next = ((self.scale + step) * 10.0).round() / 10.0;
        self.scale = next.clamp(MIN_SCALE, MAX_SCALE);
    }
}

/// Marker under a canvas point given in percent coordinates
pub fn hit_test<'c>(clusters: &'c [Cluster], point: PercentPoint) -> Option<&'c Cluster> {
    clusters.iter().find(|cluster| {
        let dx = cluster.position.left - point.left;
        let dy = cluster.position.top - point.top;
        dx.hypot(dy) <= MARKER_RADIUS
    })
}
