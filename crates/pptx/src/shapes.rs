//! Shape tree extraction shared by slides, layouts, masters and notes pages.

use pptcheck_core::{
    AutoShapeKind, ColorFormat, Error, Fill, LineFormat, Paragraph, Result, Rgb, Shape, ShapeKind,
    TextFrame, TextRun, ThemeColor,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// EMU per typographic point.
const EMU_PER_POINT: f64 = 12_700.0;

/// Percentages in DrawingML are stored in thousandths of a percent.
const PERCENT_SCALE: f64 = 100_000.0;

const CHART_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";
const TABLE_URI: &str = "http://schemas.openxmlformats.org/drawingml/2006/table";

/// Top-level element a shape was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShapeElement {
    Shape,
    Picture,
    Connector,
    GraphicFrame,
    Group,
}

impl ShapeElement {
    fn from_local_name(name: &[u8]) -> Option<Self> {
        match name {
            b"sp" => Some(Self::Shape),
            b"pic" => Some(Self::Picture),
            b"cxnSp" => Some(Self::Connector),
            b"graphicFrame" => Some(Self::GraphicFrame),
            b"grpSp" => Some(Self::Group),
            _ => None,
        }
    }
}

/// The `p:ph` element of a placeholder shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct PlaceholderInfo {
    /// Value of the `type` attribute; absent means `obj`.
    pub kind: Option<String>,
    pub idx: u32,
}

impl PlaceholderInfo {
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or("obj")
    }

    pub fn is_title(&self) -> bool {
        matches!(self.kind(), "title" | "ctrTitle")
    }

    /// Type of the master placeholder this one inherits from.
    pub fn master_kind(&self) -> &str {
        match self.kind() {
            "ctrTitle" => "title",
            "obj" | "body" | "subTitle" | "chart" | "tbl" | "clipArt" | "dgm" | "media"
            | "pic" => "body",
            other => other,
        }
    }
}

/// A shape as found in the XML, before placeholder inheritance.
#[derive(Debug, Clone)]
pub(crate) struct ParsedShape {
    pub element: ShapeElement,
    pub text_box: bool,
    pub placeholder: Option<PlaceholderInfo>,
    pub preset: Option<String>,
    pub offset: Option<(i64, i64)>,
    pub extent: Option<(i64, i64)>,
    pub fill: Option<Fill>,
    pub line_width_emu: Option<i64>,
    pub line_color: Option<ColorFormat>,
    pub graphic_uri: Option<String>,

    /// Present when the shape has a `txBody`.
    pub paragraphs: Option<Vec<Paragraph>>,
}

impl ParsedShape {
    fn new(element: ShapeElement) -> Self {
        Self {
            element,
            text_box: false,
            placeholder: None,
            preset: None,
            offset: None,
            extent: None,
            fill: None,
            line_width_emu: None,
            line_color: None,
            graphic_uri: None,
            paragraphs: None,
        }
    }

    /// A shape carrying nothing but a frame, to inherit geometry from.
    pub fn frame_only(offset: Option<(i64, i64)>, extent: Option<(i64, i64)>) -> Self {
        Self {
            offset,
            extent,
            ..Self::new(ShapeElement::Shape)
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self.element {
            ShapeElement::Picture => ShapeKind::Picture,
            ShapeElement::Connector => ShapeKind::Line,
            ShapeElement::Group => ShapeKind::Other,
            ShapeElement::GraphicFrame => match self.graphic_uri.as_deref() {
                Some(CHART_URI) => ShapeKind::Chart,
                Some(TABLE_URI) => ShapeKind::Table,
                _ => ShapeKind::Other,
            },
            ShapeElement::Shape => {
                if self.placeholder.is_some() {
                    ShapeKind::Placeholder
                } else if self.text_box {
                    ShapeKind::TextBox
                } else {
                    match self.preset.as_deref() {
                        Some("line" | "straightConnector1") => ShapeKind::Line,
                        Some(preset) => ShapeKind::AutoShape(AutoShapeKind::from_preset(preset)),
                        // Freeform (custGeom) shapes
                        None => ShapeKind::Other,
                    }
                }
            }
        }
    }

    /// Paragraph texts joined by newlines.
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .flatten()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Build the deck shape, filling missing geometry from `inherited`.
    pub fn into_shape(self, inherited: Option<&ParsedShape>) -> Shape {
        let kind = self.kind();
        let (left, top) = self
            .offset
            .or_else(|| inherited.and_then(|s| s.offset))
            .unwrap_or_default();
        let (width, height) = self
            .extent
            .or_else(|| inherited.and_then(|s| s.extent))
            .unwrap_or_default();

        let mut shape = Shape::new(kind, left, top, width, height);
        shape.fill = self.fill;
        if self.line_width_emu.is_some() || self.line_color.is_some() {
            shape.line = Some(LineFormat {
                width_pt: self.line_width_emu.map(|w| w as f64 / EMU_PER_POINT),
                color: self.line_color,
            });
        }
        shape.text_frame = self.paragraphs.map(|paragraphs| TextFrame { paragraphs });
        shape
    }
}

/// Top-level shapes and background of one `p:cSld`.
#[derive(Debug, Clone, Default)]
pub(crate) struct ShapeTree {
    pub shapes: Vec<ParsedShape>,
    pub background: Option<Fill>,
}

impl ShapeTree {
    /// First placeholder matching `predicate`.
    pub fn placeholder(&self, predicate: impl Fn(&PlaceholderInfo) -> bool) -> Option<&ParsedShape> {
        self.shapes
            .iter()
            .find(|s| s.placeholder.as_ref().is_some_and(&predicate))
    }
}

/// Where a color inside `a:solidFill` ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorTarget {
    RunFont,
    ShapeFill,
    Line,
    Background,
}

/// A color element being read, with its luminance modifiers.
#[derive(Debug)]
struct PendingColor {
    base: Option<BaseColor>,
    lum_mod: Option<f64>,
    lum_off: Option<f64>,
}

#[derive(Debug)]
enum BaseColor {
    Rgb(Rgb),
    Theme(ThemeColor),
}

impl PendingColor {
    fn from_element(name: &[u8], e: &BytesStart) -> Self {
        let base = match name {
            b"srgbClr" => rgb_attribute(e, b"val").map(BaseColor::Rgb),
            b"sysClr" => rgb_attribute(e, b"lastClr").map(BaseColor::Rgb),
            b"schemeClr" => attribute(e, b"val")
                .and_then(|v| ThemeColor::from_scheme_name(&v))
                .map(BaseColor::Theme),
            _ => None,
        };
        Self {
            base,
            lum_mod: None,
            lum_off: None,
        }
    }

    /// Tints carry `lumOff`; shades only `lumMod`.
    fn brightness(&self) -> f64 {
        match (self.lum_off, self.lum_mod) {
            (Some(off), _) => off,
            (None, Some(modulation)) => modulation - 1.0,
            (None, None) => 0.0,
        }
    }

    fn into_color(self) -> Option<ColorFormat> {
        let brightness = self.brightness();
        match self.base? {
            BaseColor::Rgb(rgb) => Some(ColorFormat::Rgb(rgb)),
            BaseColor::Theme(color) => Some(ColorFormat::Theme { color, brightness }),
        }
    }
}

/// Event-driven reader state for one shape tree document.
#[derive(Default)]
struct ShapeTreeReader {
    tree: ShapeTree,
    current: Option<ParsedShape>,

    /// Open shape elements nested inside the current group.
    nested_depth: usize,

    in_properties: bool,
    in_line: bool,
    in_background: bool,
    in_text_body: bool,
    in_run_properties: bool,
    in_text: bool,

    fill_target: Option<ColorTarget>,
    pending_color: Option<PendingColor>,
    paragraph: Option<Paragraph>,
    run: Option<TextRun>,
}

impl ShapeTreeReader {
    fn start(&mut self, e: &BytesStart) {
        let qname = e.name();
        let name = local_name(qname.as_ref());

        if let Some(element) = ShapeElement::from_local_name(name) {
            if self.current.is_some() {
                self.nested_depth += 1;
            } else {
                self.current = Some(ParsedShape::new(element));
            }
            return;
        }
        if self.nested_depth > 0 {
            return;
        }

        match name {
            b"bgPr" => self.in_background = true,
            b"spPr" | b"grpSpPr" => self.in_properties = self.current.is_some(),
            b"cNvSpPr" => {
                if let Some(shape) = self.current.as_mut() {
                    shape.text_box = attribute(e, b"txBox").is_some_and(|v| v == "1" || v == "true");
                }
            }
            b"ph" => {
                if let Some(shape) = self.current.as_mut() {
                    shape.placeholder = Some(PlaceholderInfo {
                        kind: attribute(e, b"type"),
                        idx: attribute(e, b"idx").and_then(|v| v.parse().ok()).unwrap_or(0),
                    });
                }
            }
            b"off" => {
                if let Some(shape) = self.current.as_mut() {
                    if shape.offset.is_none() {
                        shape.offset = coordinates(e, b"x", b"y");
                    }
                }
            }
            b"ext" => {
                if let Some(shape) = self.current.as_mut() {
                    if shape.extent.is_none() {
                        shape.extent = coordinates(e, b"cx", b"cy");
                    }
                }
            }
            b"prstGeom" if self.in_properties => {
                if let Some(shape) = self.current.as_mut() {
                    shape.preset = attribute(e, b"prst");
                }
            }
            b"ln" if self.in_properties => {
                self.in_line = true;
                if let Some(shape) = self.current.as_mut() {
                    shape.line_width_emu = attribute(e, b"w").and_then(|v| v.parse().ok());
                }
            }
            b"graphicData" => {
                if let Some(shape) = self.current.as_mut() {
                    shape.graphic_uri = attribute(e, b"uri");
                }
            }
            b"solidFill" => self.fill_target = self.color_target(),
            b"noFill" => self.set_fill(Fill::NoFill),
            b"gradFill" | b"pattFill" | b"blipFill" | b"grpFill" => self.set_fill(Fill::Other),
            b"srgbClr" | b"schemeClr" | b"sysClr" | b"prstClr" if self.fill_target.is_some() => {
                self.pending_color = Some(PendingColor::from_element(name, e));
            }
            b"lumMod" | b"lumOff" => {
                if let Some(pending) = self.pending_color.as_mut() {
                    let value = attribute(e, b"val")
                        .and_then(|v| v.parse::<f64>().ok())
                        .map(|v| v / PERCENT_SCALE);
                    if name == b"lumMod" {
                        pending.lum_mod = value;
                    } else {
                        pending.lum_off = value;
                    }
                }
            }
            b"txBody" => {
                if let Some(shape) = self.current.as_mut() {
                    if shape.element == ShapeElement::Shape {
                        shape.paragraphs = Some(Vec::new());
                        self.in_text_body = true;
                    }
                }
            }
            b"p" if self.in_text_body => self.paragraph = Some(Paragraph::default()),
            b"r" | b"fld" if self.paragraph.is_some() => self.run = Some(TextRun::default()),
            b"rPr" => {
                if let Some(run) = self.run.as_mut() {
                    self.in_run_properties = true;
                    run.font.size_pt = attribute(e, b"sz")
                        .and_then(|v| v.parse::<f64>().ok())
                        .map(|hundredths| hundredths / 100.0);
                }
            }
            b"t" if self.run.is_some() => self.in_text = true,
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        if ShapeElement::from_local_name(name).is_some() {
            if self.nested_depth > 0 {
                self.nested_depth -= 1;
            } else if let Some(shape) = self.current.take() {
                self.tree.shapes.push(shape);
                self.in_properties = false;
                self.in_line = false;
                self.in_text_body = false;
            }
            return;
        }
        if self.nested_depth > 0 {
            return;
        }

        match name {
            b"bgPr" => self.in_background = false,
            b"spPr" | b"grpSpPr" => self.in_properties = false,
            b"ln" => self.in_line = false,
            b"solidFill" => self.fill_target = None,
            b"srgbClr" | b"schemeClr" | b"sysClr" | b"prstClr" => {
                if let Some(color) = self.pending_color.take().and_then(PendingColor::into_color) {
                    self.apply_color(color);
                }
            }
            b"txBody" => self.in_text_body = false,
            b"p" => {
                if let (Some(paragraph), Some(shape)) = (self.paragraph.take(), self.current.as_mut())
                {
                    if let Some(paragraphs) = shape.paragraphs.as_mut() {
                        paragraphs.push(paragraph);
                    }
                }
            }
            b"r" | b"fld" => {
                if let (Some(run), Some(paragraph)) = (self.run.take(), self.paragraph.as_mut()) {
                    paragraph.runs.push(run);
                }
            }
            b"rPr" => self.in_run_properties = false,
            b"t" => self.in_text = false,
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if self.nested_depth > 0 || !self.in_text {
            return;
        }
        if let Some(run) = self.run.as_mut() {
            run.text.push_str(text);
        }
    }

    fn color_target(&self) -> Option<ColorTarget> {
        if self.in_run_properties {
            Some(ColorTarget::RunFont)
        } else if self.in_text_body {
            None
        } else if self.in_line {
            Some(ColorTarget::Line)
        } else if self.in_properties {
            Some(ColorTarget::ShapeFill)
        } else if self.in_background && self.current.is_none() {
            Some(ColorTarget::Background)
        } else {
            None
        }
    }

    fn set_fill(&mut self, fill: Fill) {
        if self.in_line || self.in_text_body {
            return;
        }
        if self.in_properties {
            if let Some(shape) = self.current.as_mut() {
                shape.fill = Some(fill);
            }
        } else if self.in_background && self.current.is_none() {
            self.tree.background = Some(fill);
        }
    }

    fn apply_color(&mut self, color: ColorFormat) {
        match self.fill_target {
            Some(ColorTarget::RunFont) => {
                if let Some(run) = self.run.as_mut() {
                    run.font.color = Some(color);
                }
            }
            Some(ColorTarget::ShapeFill) => self.set_fill(Fill::Solid(color)),
            Some(ColorTarget::Line) => {
                if let Some(shape) = self.current.as_mut() {
                    shape.line_color = Some(color);
                }
            }
            Some(ColorTarget::Background) => self.tree.background = Some(Fill::Solid(color)),
            None => {}
        }
    }
}

/// Read the top-level shapes and background of a slide-like part.
pub(crate) fn parse_shape_tree(xml: &str) -> Result<ShapeTree> {
    let mut reader = Reader::from_str(xml);
    let mut state = ShapeTreeReader::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => state.start(e),
            Ok(Event::Empty(ref e)) => {
                state.start(e);
                state.end(local_name(e.name().as_ref()));
            }
            Ok(Event::End(ref e)) => state.end(local_name(e.name().as_ref())),
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default();
                state.text(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(state.tree)
}

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

/// Value of the attribute whose full (possibly prefixed) key is `key`.
pub(crate) fn attribute(e: &BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// A hex color attribute; malformed values read as absent.
pub(crate) fn rgb_attribute(e: &BytesStart, key: &[u8]) -> Option<Rgb> {
    attribute(e, key).and_then(|v| Rgb::from_hex(&v).ok())
}

/// Parse a pair of integer attributes such as `x`/`y` or `cx`/`cy`.
pub(crate) fn coordinates(e: &BytesStart, first: &[u8], second: &[u8]) -> Option<(i64, i64)> {
    let a = attribute(e, first)?.parse().ok()?;
    let b = attribute(e, second)?.parse().ok()?;
    Some((a, b))
}
