//! Domain types for the read-only deck model the checks run against.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Text PowerPoint renders in place of the current slide number.
pub const SLIDE_NUMBER_PLACEHOLDER: &str = "‹#›";

/// An entire presentation, as exposed by a deck reader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deck {
    /// Slide width in EMU.
    pub width: i64,

    /// Slide height in EMU.
    pub height: i64,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,

    /// Theme palette used to resolve theme-referenced colors.
    pub color_scheme: ColorScheme,
}

impl Deck {
    /// Create an empty deck with the given slide size.
    pub fn new(width: i64, height: i64) -> Self {
        Self {
            width,
            height,
            slides: Vec::new(),
            color_scheme: ColorScheme::default(),
        }
    }

    /// Add a slide to the deck.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Slides up to (not including) the first backup slide.
    ///
    /// Everything after the first backup slide is excluded from analysis.
    pub fn in_scope_slides(&self) -> &[Slide] {
        let end = self
            .slides
            .iter()
            .position(Slide::is_backup)
            .unwrap_or(self.slides.len());
        &self.slides[..end]
    }
}

/// A single slide.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Slide {
    /// Text of the title placeholder, if the slide has one.
    pub title: Option<String>,

    /// Shapes in z-order.
    pub shapes: Vec<Shape>,

    /// Speaker notes, if a notes page exists.
    pub notes: Option<Notes>,

    /// Slide background fill, if set explicitly.
    pub background: Option<Fill>,
}

impl Slide {
    /// Create an empty slide with an optional title.
    pub fn new(title: Option<&str>) -> Self {
        Self {
            title: title.map(str::to_string),
            ..Self::default()
        }
    }

    /// Add a shape to this slide.
    pub fn add_shape(&mut self, shape: Shape) {
        self.shapes.push(shape);
    }

    /// Attach speaker notes made of the given runs.
    pub fn with_notes<I, S>(mut self, runs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.notes = Some(Notes {
            runs: runs.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// Whether the title marks the start of the backup section.
    pub fn is_backup(&self) -> bool {
        self.title
            .as_deref()
            .is_some_and(|t| t.to_lowercase().contains("backup"))
    }
}

/// Speaker notes for a slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Notes {
    /// Text runs in reading order.
    pub runs: Vec<String>,
}

/// A shape placed on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// What kind of shape this is.
    pub kind: ShapeKind,

    /// Left offset in EMU.
    pub left: i64,

    /// Top offset in EMU.
    pub top: i64,

    /// Width in EMU.
    pub width: i64,

    /// Height in EMU.
    pub height: i64,

    /// Shape fill, if the shape defines one.
    pub fill: Option<Fill>,

    /// Outline format (only meaningful for lines).
    pub line: Option<LineFormat>,

    /// Text content, for shapes that can hold text.
    pub text_frame: Option<TextFrame>,
}

impl Shape {
    /// Create a shape of the given kind and geometry, without fill or text.
    pub fn new(kind: ShapeKind, left: i64, top: i64, width: i64, height: i64) -> Self {
        Self {
            kind,
            left,
            top,
            width,
            height,
            fill: None,
            line: None,
            text_frame: None,
        }
    }

    /// Set the fill of this shape.
    pub fn with_fill(mut self, fill: Fill) -> Self {
        self.fill = Some(fill);
        self
    }

    /// Set the line width of this shape in points.
    pub fn with_line_width(mut self, width_pt: f64) -> Self {
        self.line.get_or_insert_with(LineFormat::default).width_pt = Some(width_pt);
        self
    }

    /// Set the solid line color of this shape.
    pub fn with_line_color(mut self, color: ColorFormat) -> Self {
        self.line.get_or_insert_with(LineFormat::default).color = Some(color);
        self
    }

    /// Set the text frame of this shape.
    pub fn with_text_frame(mut self, text_frame: TextFrame) -> Self {
        self.text_frame = Some(text_frame);
        self
    }

    /// All text in the shape, paragraphs joined by newlines.
    ///
    /// Empty for shapes without a text frame.
    pub fn text(&self) -> String {
        self.text_frame
            .as_ref()
            .map(TextFrame::text)
            .unwrap_or_default()
    }

    /// All text runs of the shape in reading order.
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.text_frame
            .iter()
            .flat_map(|tf| tf.paragraphs.iter())
            .flat_map(|p| p.runs.iter())
    }
}

/// Closed set of shape kinds the checks distinguish.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    /// A plain text box.
    TextBox,
    /// A preset geometry shape.
    AutoShape(AutoShapeKind),
    /// A line or connector.
    Line,
    /// A picture.
    Picture,
    /// A chart graphic frame.
    Chart,
    /// A table graphic frame.
    Table,
    /// A layout placeholder (title, body, slide number, ...).
    Placeholder,
    /// Anything else (groups, media, other graphic frames).
    Other,
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TextBox => f.write_str("text box"),
            Self::AutoShape(kind) => fmt::Display::fmt(kind, f),
            Self::Line => f.write_str("line"),
            Self::Picture => f.write_str("picture"),
            Self::Chart => f.write_str("chart"),
            Self::Table => f.write_str("table"),
            Self::Placeholder => f.write_str("placeholder"),
            Self::Other => f.write_str("shape"),
        }
    }
}

/// Preset geometry of an auto shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutoShapeKind {
    Rectangle,
    RoundedRectangle,
    Oval,
    /// Any other preset, by its OOXML preset name.
    Preset(String),
}

impl AutoShapeKind {
    /// Map an OOXML preset geometry name (`prst`) to a kind.
    pub fn from_preset(prst: &str) -> Self {
        match prst {
            "rect" => Self::Rectangle,
            "roundRect" => Self::RoundedRectangle,
            "ellipse" => Self::Oval,
            other => Self::Preset(other.to_string()),
        }
    }

    /// Rectangles are often used to cover or frame other content.
    pub fn is_rectangle(&self) -> bool {
        matches!(self, Self::Rectangle | Self::RoundedRectangle)
    }
}

impl fmt::Display for AutoShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rectangle => f.write_str("rectangle"),
            Self::RoundedRectangle => f.write_str("rounded rectangle"),
            Self::Oval => f.write_str("oval"),
            Self::Preset(name) => f.write_str(name),
        }
    }
}

/// Fill of a shape or slide background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Fill {
    /// Solid fill with a fore color.
    Solid(ColorFormat),
    /// Explicitly no fill.
    NoFill,
    /// Gradient, pattern, picture or any other fill.
    Other,
}

/// Outline of a shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineFormat {
    /// Line width in points, if set.
    pub width_pt: Option<f64>,

    /// Solid line color, if set.
    pub color: Option<ColorFormat>,
}

/// A color reference as stored in the deck.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ColorFormat {
    /// Literal sRGB color.
    Rgb(Rgb),
    /// Theme slot with a brightness adjustment in roughly -1..1 (0 = none).
    Theme { color: ThemeColor, brightness: f64 },
}

/// Text content of a shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextFrame {
    /// Paragraphs in reading order.
    pub paragraphs: Vec<Paragraph>,
}

impl TextFrame {
    /// Build a frame with one paragraph per line of text, each a single run
    /// with the given font.
    pub fn from_lines<I, S>(lines: I, font: Font) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paragraphs: lines
                .into_iter()
                .map(|line| Paragraph {
                    runs: vec![TextRun {
                        text: line.into(),
                        font: font.clone(),
                    }],
                })
                .collect(),
        }
    }

    /// Paragraph texts joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A paragraph of runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub runs: Vec<TextRun>,
}

impl Paragraph {
    /// Concatenated run text.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

/// A run of text sharing one font.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub font: Font,
}

/// Font attributes of a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Font {
    /// Size in points, if set on the run.
    pub size_pt: Option<f64>,

    /// Color, if set on the run.
    pub color: Option<ColorFormat>,
}

impl Font {
    /// A font with an explicit size and no color.
    pub fn sized(size_pt: f64) -> Self {
        Self {
            size_pt: Some(size_pt),
            color: None,
        }
    }

    /// Set the color of this font.
    pub fn with_color(mut self, color: ColorFormat) -> Self {
        self.color = Some(color);
        self
    }
}

/// A literal sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a six hex digit color such as `"1F4E79"`.
    pub fn from_hex(hex: &str) -> Result<Self> {
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::MalformedColor(format!(
                "expected six hex digits, got '{}'",
                hex
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| Error::MalformedColor(format!("'{}': {}", hex, e)))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Sum of the raw channel values.
    pub fn channel_sum(&self) -> u32 {
        u32::from(self.r) + u32::from(self.g) + u32::from(self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Theme color slots, numbered the way Office numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum ThemeColor {
    Mixed = -2,
    NotThemeColor = 0,
    Dark1 = 1,
    Light1 = 2,
    Dark2 = 3,
    Light2 = 4,
    Accent1 = 5,
    Accent2 = 6,
    Accent3 = 7,
    Accent4 = 8,
    Accent5 = 9,
    Accent6 = 10,
    Hyperlink = 11,
    FollowedHyperlink = 12,
    Text1 = 13,
    Background1 = 14,
    Text2 = 15,
    Background2 = 16,
}

impl ThemeColor {
    /// Numeric slot index of this theme color.
    pub fn slot(self) -> i32 {
        self as i32
    }

    /// Map a DrawingML scheme color name (`tx1`, `accent2`, ...) to a slot.
    pub fn from_scheme_name(name: &str) -> Option<Self> {
        let color = match name {
            "dk1" => Self::Dark1,
            "lt1" => Self::Light1,
            "dk2" => Self::Dark2,
            "lt2" => Self::Light2,
            "accent1" => Self::Accent1,
            "accent2" => Self::Accent2,
            "accent3" => Self::Accent3,
            "accent4" => Self::Accent4,
            "accent5" => Self::Accent5,
            "accent6" => Self::Accent6,
            "hlink" => Self::Hyperlink,
            "folHlink" => Self::FollowedHyperlink,
            "tx1" => Self::Text1,
            "bg1" => Self::Background1,
            "tx2" => Self::Text2,
            "bg2" => Self::Background2,
            _ => return None,
        };
        Some(color)
    }
}

/// The deck's theme palette, in `a:clrScheme` order
/// (dk1, lt1, dk2, lt2, accent1-6, hlink, folHlink).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub entries: Vec<SchemeColor>,
}

impl Default for ColorScheme {
    /// The stock Office palette, used when a deck carries no theme.
    fn default() -> Self {
        let system = |name: &str, rgb: Rgb| SchemeValue::System {
            name: name.to_string(),
            last_color: Some(rgb),
        };
        let srgb = |hex: u32| {
            SchemeValue::Srgb(Rgb::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8))
        };
        let entries = [
            ("dk1", system("windowText", Rgb::BLACK)),
            ("lt1", system("window", Rgb::WHITE)),
            ("dk2", srgb(0x44546A)),
            ("lt2", srgb(0xE7E6E6)),
            ("accent1", srgb(0x4472C4)),
            ("accent2", srgb(0xED7D31)),
            ("accent3", srgb(0xA5A5A5)),
            ("accent4", srgb(0xFFC000)),
            ("accent5", srgb(0x5B9BD5)),
            ("accent6", srgb(0x70AD47)),
            ("hlink", srgb(0x0563C1)),
            ("folHlink", srgb(0x954F72)),
        ]
        .into_iter()
        .map(|(name, value)| SchemeColor {
            name: name.to_string(),
            value,
        })
        .collect();

        Self { entries }
    }
}

/// One entry of the color scheme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeColor {
    /// Slot name, e.g. `accent1`.
    pub name: String,
    pub value: SchemeValue,
}

/// Value of a scheme entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SchemeValue {
    /// Literal sRGB value.
    Srgb(Rgb),
    /// System color with the RGB last rendered for it, if recorded.
    System {
        name: String,
        last_color: Option<Rgb>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_hex() {
        assert_eq!(Rgb::from_hex("FF8000").unwrap(), Rgb::new(255, 128, 0));
        assert_eq!(Rgb::from_hex("0a0B0c").unwrap(), Rgb::new(10, 11, 12));
        assert!(Rgb::from_hex("FFF").is_err());
        assert!(Rgb::from_hex("GG0000").is_err());
        assert_eq!(Rgb::new(1, 2, 255).to_string(), "0102FF");
    }

    #[test]
    fn test_backup_detection() {
        assert!(Slide::new(Some("BACKUP slides")).is_backup());
        assert!(Slide::new(Some("Appendix / Backup")).is_backup());
        assert!(!Slide::new(Some("Summary")).is_backup());
        assert!(!Slide::new(None).is_backup());
    }

    #[test]
    fn test_in_scope_slides_stop_at_first_backup() {
        let mut deck = Deck::new(100, 100);
        deck.add_slide(Slide::new(Some("Intro")));
        deck.add_slide(Slide::new(Some("Summary")));
        deck.add_slide(Slide::new(Some("Backup")));
        deck.add_slide(Slide::new(Some("Extra")));

        assert_eq!(deck.in_scope_slides().len(), 2);
    }

    #[test]
    fn test_shape_text_joins_paragraphs() {
        let shape = Shape::new(ShapeKind::TextBox, 0, 0, 10, 10)
            .with_text_frame(TextFrame::from_lines(["one", "two"], Font::default()));
        assert_eq!(shape.text(), "one\ntwo");
        assert_eq!(shape.runs().count(), 2);
        assert_eq!(Shape::new(ShapeKind::Line, 0, 0, 1, 1).text(), "");
    }

    #[test]
    fn test_line_builders_keep_each_other() {
        let shape = Shape::new(ShapeKind::Line, 0, 0, 10, 0)
            .with_line_color(ColorFormat::Rgb(Rgb::BLACK))
            .with_line_width(2.5);
        assert_eq!(
            shape.line,
            Some(LineFormat {
                width_pt: Some(2.5),
                color: Some(ColorFormat::Rgb(Rgb::BLACK)),
            })
        );
    }

    #[test]
    fn test_theme_color_names() {
        assert_eq!(ThemeColor::from_scheme_name("tx1"), Some(ThemeColor::Text1));
        assert_eq!(ThemeColor::from_scheme_name("accent6").map(ThemeColor::slot), Some(10));
        assert_eq!(ThemeColor::from_scheme_name("phClr"), None);
    }

    #[test]
    fn test_default_scheme_has_twelve_entries() {
        assert_eq!(ColorScheme::default().entries.len(), 12);
    }
}
