//! Tracking "the same" shape across adjacent slides.
//!
//! Shapes carry no identity that survives from one slide to the next, so a
//! shape is identified by its kind and size plus an occurrence index that
//! tells identical shapes on one slide apart in encounter order.

use crate::types::{Shape, ShapeKind, Slide, SLIDE_NUMBER_PLACEHOLDER};
use std::collections::HashMap;

/// Composite identity of a shape on a slide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeKey {
    pub kind: ShapeKind,
    pub width: i64,
    pub height: i64,
    pub occurrence: usize,
}

/// Where a shape sits and what it looks like.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedShape {
    /// `(left, top)`.
    pub position: (i64, i64),

    /// Kind label, followed by the shape's text when it has any.
    pub signature: Vec<String>,
}

impl TrackedShape {
    fn from_shape(shape: &Shape) -> Self {
        let mut signature = vec![shape.kind.to_string()];
        let text = shape.text();
        if !text.is_empty() {
            signature.push(text);
        }
        Self {
            position: (shape.left, shape.top),
            signature,
        }
    }

    /// Kind label of the shape.
    pub fn label(&self) -> &str {
        &self.signature[0]
    }

    /// The shape's text, if it has any.
    pub fn text(&self) -> Option<&str> {
        self.signature.get(1).map(String::as_str)
    }

    /// Feedback line describing a jumpy transition of this shape.
    pub fn transition_comment(&self) -> String {
        match self.text() {
            Some(SLIDE_NUMBER_PLACEHOLDER) => {
                "Slide transition for the slide number is not smooth.".to_string()
            }
            Some(text) => format!(
                "Slide transition for {} is not smooth. This shape object holds the following text: '{}'",
                self.label(),
                text
            ),
            None => format!("Slide transition for {} is not smooth.", self.label()),
        }
    }
}

/// Fingerprinted shapes of one slide, in encounter order.
#[derive(Debug, Clone, Default)]
pub struct SlideShapes {
    order: Vec<ShapeKey>,
    shapes: HashMap<ShapeKey, TrackedShape>,
}

impl SlideShapes {
    /// Fingerprint every shape on a slide.
    pub fn from_slide(slide: &Slide) -> Self {
        let mut tracked = Self::default();
        for shape in &slide.shapes {
            let mut key = ShapeKey {
                kind: shape.kind.clone(),
                width: shape.width,
                height: shape.height,
                occurrence: 0,
            };
            while tracked.shapes.contains_key(&key) {
                key.occurrence += 1;
            }
            tracked.order.push(key.clone());
            tracked.shapes.insert(key, TrackedShape::from_shape(shape));
        }
        tracked
    }

    pub fn get(&self, key: &ShapeKey) -> Option<&TrackedShape> {
        self.shapes.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &ShapeKey> {
        self.order.iter()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Tolerance window around a previous position, in EMU per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftTolerance {
    pub x: f64,
    pub y: f64,
}

impl ShiftTolerance {
    /// A window of `fraction` of the slide size on each axis.
    pub fn for_slide(width: i64, height: i64, fraction: f64) -> Self {
        Self {
            x: width as f64 * fraction,
            y: height as f64 * fraction,
        }
    }

    /// Whether `current` lies within the window around `previous`
    /// (bounds inclusive).
    pub fn contains(&self, previous: (i64, i64), current: (i64, i64)) -> bool {
        let (px, py) = (previous.0 as f64, previous.1 as f64);
        let (cx, cy) = (current.0 as f64, current.1 as f64);
        (px - self.x..=px + self.x).contains(&cx) && (py - self.y..=py + self.y).contains(&cy)
    }
}

/// Shapes of `current` that drifted from their counterpart on `previous`.
///
/// A shape that kept its exact position and signature length is stable,
/// whatever its content. Otherwise it has drifted when it moved outside the
/// tolerance window while its signature stayed identical. Shapes that exist
/// on only one of the two slides are never reported.
pub fn drifted_shapes<'a>(
    previous: &SlideShapes,
    current: &'a SlideShapes,
    tolerance: ShiftTolerance,
) -> Vec<&'a TrackedShape> {
    let mut drifted = Vec::new();

    for key in previous.keys() {
        let (Some(prev), Some(curr)) = (previous.get(key), current.get(key)) else {
            continue;
        };

        if prev.position == curr.position && prev.signature.len() == curr.signature.len() {
            continue;
        }

        if prev.position != curr.position
            && !tolerance.contains(prev.position, curr.position)
            && prev.signature == curr.signature
        {
            log::debug!(
                "Shape '{}' moved from {:?} to {:?}",
                curr.label(),
                prev.position,
                curr.position
            );
            drifted.push(curr);
        }
    }

    drifted
}
