//! PPTX file parser implementation.

use crate::shapes::{
    attribute, coordinates, local_name, parse_shape_tree, rgb_attribute, ParsedShape, ShapeTree,
};
use pptcheck_core::{
    ColorScheme, Deck, Error, Notes, Result, SchemeColor, SchemeValue, Slide,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

const PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Default 4:3 slide size in EMU, used when `p:sldSz` is missing.
const DEFAULT_SLIDE_SIZE: (i64, i64) = (9_144_000, 6_858_000);

const REL_SLIDE: &str = "/slide";
const REL_THEME: &str = "/theme";
const REL_SLIDE_LAYOUT: &str = "/slideLayout";
const REL_SLIDE_MASTER: &str = "/slideMaster";
const REL_NOTES_SLIDE: &str = "/notesSlide";

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a PPTX file from a reader into a deck.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<Deck> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let content = self.read_file_from_archive(&mut archive, PRESENTATION_PART)?;
        let info = parse_presentation(&content)?;
        let rels = self
            .read_relationships(&mut archive, PRESENTATION_PART)?
            .ok_or_else(|| {
                Error::PptxParseError("Presentation has no relationships part".to_string())
            })?;

        let (width, height) = info.slide_size.unwrap_or(DEFAULT_SLIDE_SIZE);
        let mut deck = Deck::new(width, height);

        match rels.target_of_type(REL_THEME) {
            Some(theme_path) => match self.read_optional_file(&mut archive, &theme_path)? {
                Some(theme) => deck.color_scheme = parse_color_scheme(&theme)?,
                None => log::warn!("Theme part '{}' is missing, using default colors", theme_path),
            },
            None => log::warn!("Presentation has no theme, using default colors"),
        }

        let slide_order = self.get_slide_order(&info, &rels);
        log::debug!("Found {} slides", slide_order.len());

        let mut layouts = HashMap::new();
        for slide_path in &slide_order {
            let slide = self.parse_slide(&mut archive, slide_path, &mut layouts)?;
            deck.add_slide(slide);
        }

        Ok(deck)
    }

    /// Slide part paths in presentation order.
    ///
    /// Follows `p:sldIdLst`; falls back to numbering in the relationship
    /// targets when the list is absent.
    fn get_slide_order(&self, info: &PresentationInfo, rels: &Relationships) -> Vec<String> {
        if !info.slide_ids.is_empty() {
            return info
                .slide_ids
                .iter()
                .filter_map(|id| {
                    let path = rels.target_by_id(id);
                    if path.is_none() {
                        log::warn!("Slide relationship '{}' not found", id);
                    }
                    path
                })
                .collect();
        }

        let mut slides: Vec<(String, Option<usize>)> = rels
            .entries
            .iter()
            .filter(|rel| rel.rel_type.ends_with(REL_SLIDE))
            .map(|rel| {
                let order_num =
                    extract_slide_number(&rel.target).or_else(|| extract_slide_number(&rel.id));
                (rels.resolve(&rel.target), order_num)
            })
            .collect();

        slides.sort_by(|a, b| match (a.1, b.1) {
            (Some(na), Some(nb)) => na.cmp(&nb),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.0.cmp(&b.0),
        });

        slides.into_iter().map(|(path, _)| path).collect()
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
        layouts: &mut HashMap<String, LayoutPlaceholders>,
    ) -> Result<Slide> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        let tree = parse_shape_tree(&content)?;
        let rels = self
            .read_relationships(archive, slide_path)?
            .unwrap_or_default();

        let layout = match rels.target_of_type(REL_SLIDE_LAYOUT) {
            Some(layout_path) => {
                if !layouts.contains_key(&layout_path) {
                    let placeholders = self.load_layout(archive, &layout_path)?;
                    layouts.insert(layout_path.clone(), placeholders);
                }
                layouts.get(&layout_path).cloned().unwrap_or_default()
            }
            None => LayoutPlaceholders::default(),
        };

        let mut slide = Slide::new(None);
        slide.background = tree.background.clone();
        slide.title = tree
            .placeholder(|ph| ph.is_title())
            .map(|shape| shape.text());

        for parsed in tree.shapes {
            let inherited = parsed
                .placeholder
                .as_ref()
                .and_then(|ph| layout.geometry_for(ph.idx, ph.master_kind()));
            slide.add_shape(parsed.into_shape(inherited.as_ref()));
        }

        if let Some(notes_path) = rels.target_of_type(REL_NOTES_SLIDE) {
            match self.read_optional_file(archive, &notes_path)? {
                Some(notes) => slide.notes = Some(parse_notes(&notes)?),
                None => log::warn!("Notes part '{}' is missing", notes_path),
            }
        }

        Ok(slide)
    }

    /// Placeholder geometry of a layout, completed from its master.
    fn load_layout<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        layout_path: &str,
    ) -> Result<LayoutPlaceholders> {
        let Some(content) = self.read_optional_file(archive, layout_path)? else {
            log::warn!("Slide layout '{}' is missing", layout_path);
            return Ok(LayoutPlaceholders::default());
        };
        let layout = parse_shape_tree(&content)?;

        let master_path = self
            .read_relationships(archive, layout_path)?
            .and_then(|rels| rels.target_of_type(REL_SLIDE_MASTER));
        let master = match master_path {
            Some(path) => match self.read_optional_file(archive, &path)? {
                Some(content) => parse_shape_tree(&content)?,
                None => ShapeTree::default(),
            },
            None => ShapeTree::default(),
        };

        Ok(LayoutPlaceholders::new(&layout, &master))
    }

    /// Read and parse the `.rels` part belonging to `part_path`, if any.
    fn read_relationships<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        part_path: &str,
    ) -> Result<Option<Relationships>> {
        let rels_path = relationships_path(part_path);
        match self.read_optional_file(archive, &rels_path)? {
            Some(content) => Ok(Some(Relationships::parse(part_path, &content)?)),
            None => Ok(None),
        }
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        self.read_optional_file(archive, path)?.ok_or_else(|| {
            Error::PptxParseError(format!("File not found in archive '{}'", path))
        })
    }

    /// Read a file from the ZIP archive, `None` if it does not exist.
    fn read_optional_file<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<Option<String>> {
        let mut file = match archive.by_name(path) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Ok(None),
            Err(e) => {
                return Err(Error::ZipError(format!(
                    "Failed to open '{}': {}",
                    path, e
                )))
            }
        };

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(Some(content))
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// What `ppt/presentation.xml` contributes.
#[derive(Debug, Default)]
struct PresentationInfo {
    slide_size: Option<(i64, i64)>,

    /// Relationship ids from `p:sldIdLst`, in presentation order.
    slide_ids: Vec<String>,
}

fn parse_presentation(xml: &str) -> Result<PresentationInfo> {
    let mut info = PresentationInfo::default();
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) => {
                match local_name(e.name().as_ref()) {
                    b"sldSz" => info.slide_size = coordinates(e, b"cx", b"cy"),
                    b"sldId" => {
                        if let Some(id) = relationship_id(e) {
                            info.slide_ids.push(id);
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(info)
}

/// The namespaced `r:id` attribute (as opposed to the plain numeric `id`).
fn relationship_id(e: &BytesStart) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| {
            let key = attr.key.as_ref();
            key != b"id" && local_name(key) == b"id"
        })
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// One `Relationship` entry of a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Relationship {
    id: String,
    rel_type: String,
    target: String,
}

/// The relationships of one part, with targets resolved against it.
#[derive(Debug, Clone, Default)]
struct Relationships {
    source_part: String,
    entries: Vec<Relationship>,
}

impl Relationships {
    fn parse(source_part: &str, xml: &str) -> Result<Self> {
        let mut entries = Vec::new();
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if local_name(e.name().as_ref()) == b"Relationship" =>
                {
                    if attribute(e, b"TargetMode").is_some_and(|mode| mode == "External") {
                        continue;
                    }
                    entries.push(Relationship {
                        id: attribute(e, b"Id").unwrap_or_default(),
                        rel_type: attribute(e, b"Type").unwrap_or_default(),
                        target: attribute(e, b"Target").unwrap_or_default(),
                    });
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlError(format!(
                        "Error parsing relationships of '{}': {}",
                        source_part, e
                    )));
                }
                _ => {}
            }
        }

        Ok(Self {
            source_part: source_part.to_string(),
            entries,
        })
    }

    /// Archive path of the first target whose type ends with `suffix`.
    fn target_of_type(&self, suffix: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|rel| rel.rel_type.ends_with(suffix))
            .map(|rel| self.resolve(&rel.target))
    }

    fn target_by_id(&self, id: &str) -> Option<String> {
        self.entries
            .iter()
            .find(|rel| rel.id == id)
            .map(|rel| self.resolve(&rel.target))
    }

    fn resolve(&self, target: &str) -> String {
        resolve_part_path(&self.source_part, target)
    }
}

/// `ppt/slides/slide1.xml` -> `ppt/slides/_rels/slide1.xml.rels`
fn relationships_path(part_path: &str) -> String {
    match part_path.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part_path),
    }
}

/// Resolve a relationship target relative to the part that references it.
fn resolve_part_path(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = source_part.split('/').collect();
    segments.pop();
    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Placeholder geometry a slide can inherit, keyed the way PowerPoint
/// resolves it: layout placeholders by `idx`, master placeholders by type.
#[derive(Debug, Clone, Default)]
struct LayoutPlaceholders {
    by_idx: HashMap<u32, Frame>,
    by_kind: HashMap<String, Frame>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Frame {
    offset: Option<(i64, i64)>,
    extent: Option<(i64, i64)>,
}

impl Frame {
    fn or(self, fallback: Option<Frame>) -> Frame {
        let fallback = fallback.unwrap_or_default();
        Frame {
            offset: self.offset.or(fallback.offset),
            extent: self.extent.or(fallback.extent),
        }
    }
}

impl LayoutPlaceholders {
    fn new(layout: &ShapeTree, master: &ShapeTree) -> Self {
        let mut by_kind = HashMap::new();
        for shape in &master.shapes {
            if let Some(ph) = &shape.placeholder {
                by_kind.entry(ph.master_kind().to_string()).or_insert(Frame {
                    offset: shape.offset,
                    extent: shape.extent,
                });
            }
        }

        let mut by_idx = HashMap::new();
        for shape in &layout.shapes {
            if let Some(ph) = &shape.placeholder {
                let own = Frame {
                    offset: shape.offset,
                    extent: shape.extent,
                };
                let frame = own.or(by_kind.get(ph.master_kind()).copied());
                by_idx.entry(ph.idx).or_insert(frame);
                by_kind.entry(ph.master_kind().to_string()).or_insert(frame);
            }
        }

        Self { by_idx, by_kind }
    }

    /// Geometry for a slide placeholder, as a shape carrying only a frame.
    fn geometry_for(&self, idx: u32, master_kind: &str) -> Option<ParsedShape> {
        let frame = self
            .by_idx
            .get(&idx)
            .copied()
            .map(|f| f.or(self.by_kind.get(master_kind).copied()))
            .or_else(|| self.by_kind.get(master_kind).copied())?;
        Some(ParsedShape::frame_only(frame.offset, frame.extent))
    }
}

/// Speaker notes: the runs of the notes page's body placeholder.
fn parse_notes(xml: &str) -> Result<Notes> {
    let tree = parse_shape_tree(xml)?;
    let runs = tree
        .placeholder(|ph| ph.kind() == "body")
        .and_then(|shape| shape.paragraphs.as_ref())
        .map(|paragraphs| {
            paragraphs
                .iter()
                .flat_map(|p| p.runs.iter())
                .map(|run| run.text.clone())
                .collect()
        })
        .unwrap_or_default();
    Ok(Notes { runs })
}

/// Reader state for the `a:clrScheme` element of a theme.
#[derive(Default)]
struct ColorSchemeReader {
    entries: Vec<SchemeColor>,
    in_scheme: bool,
    done: bool,

    /// Depth below `a:clrScheme`.
    depth: usize,
    slot: Option<String>,
}

impl ColorSchemeReader {
    fn start(&mut self, e: &BytesStart) {
        let qname = e.name();
        let name = local_name(qname.as_ref());
        if self.done {
            return;
        }
        if !self.in_scheme {
            self.in_scheme = name == b"clrScheme";
            return;
        }

        self.depth += 1;
        match self.depth {
            1 => self.slot = Some(String::from_utf8_lossy(name).to_string()),
            2 => {
                let value = match name {
                    b"srgbClr" => rgb_attribute(e, b"val").map(SchemeValue::Srgb),
                    b"sysClr" => Some(SchemeValue::System {
                        name: attribute(e, b"val").unwrap_or_default(),
                        last_color: rgb_attribute(e, b"lastClr"),
                    }),
                    _ => None,
                };
                if let (Some(name), Some(value)) = (self.slot.take(), value) {
                    self.entries.push(SchemeColor { name, value });
                }
            }
            _ => {}
        }
    }

    fn end(&mut self) {
        if !self.in_scheme || self.done {
            return;
        }
        if self.depth == 0 {
            self.done = true;
        } else {
            self.depth -= 1;
        }
    }
}

/// Read `a:clrScheme` from a theme part, in document order.
fn parse_color_scheme(xml: &str) -> Result<ColorScheme> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    let mut state = ColorSchemeReader::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => state.start(e),
            Ok(Event::Empty(ref e)) => {
                state.start(e);
                state.end();
            }
            Ok(Event::End(_)) => state.end(),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing theme: {}", e)));
            }
            _ => {}
        }
    }

    if state.entries.is_empty() {
        log::warn!("Theme has no color scheme, using default colors");
        return Ok(ColorScheme::default());
    }
    Ok(ColorScheme {
        entries: state.entries,
    })
}

/// Extract a slide number from a string like "rId2" or "slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pptcheck_core::{ColorFormat, Fill, Rgb, ShapeKind, ThemeColor};
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;

    const PRESENTATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
<p:sldIdLst><p:sldId id="257" r:id="rId3"/><p:sldId id="256" r:id="rId2"/></p:sldIdLst>
<p:sldSz cx="12192000" cy="6858000"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#;

    const PRESENTATION_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="theme/theme1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide2.xml"/>
</Relationships>"#;

    const THEME: &str = r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office"><a:themeElements>
<a:clrScheme name="Custom"><a:dk1><a:sysClr val="windowText" lastClr="111111"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>
<a:dk2><a:srgbClr val="222222"/></a:dk2><a:lt2><a:srgbClr val="EEEEEE"/></a:lt2></a:clrScheme>
<a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri"/></a:majorFont></a:fontScheme></a:themeElements></a:theme>"#;

    const SLIDE1: &str = r#"<p:sld xmlns:a="a" xmlns:r="r" xmlns:p="p"><p:cSld><p:spTree>
<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/>
<p:txBody><a:p><a:r><a:rPr lang="en-US"/><a:t>Summary</a:t></a:r></a:p></p:txBody></p:sp>
<p:sp><p:nvSpPr><p:cNvSpPr/><p:nvPr><p:ph type="sldNum" sz="quarter" idx="12"/></p:nvPr></p:nvSpPr><p:spPr/>
<p:txBody><a:p><a:fld type="slidenum"><a:t>‹#›</a:t></a:fld></a:p></p:txBody></p:sp>
</p:spTree></p:cSld></p:sld>"#;

    const SLIDE1_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide" Target="../notesSlides/notesSlide1.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>
</Relationships>"#;

    const SLIDE2: &str = r#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="000000"/></a:solidFill></p:bgPr></p:bg><p:spTree>
<p:sp><p:nvSpPr><p:cNvSpPr txBox="1"/></p:nvSpPr><p:spPr><a:xfrm><a:off x="10" y="20"/><a:ext cx="30" cy="40"/></a:xfrm><a:prstGeom prst="rect"/></p:spPr>
<p:txBody><a:p><a:r><a:rPr sz="1400"><a:solidFill><a:schemeClr val="bg1"/></a:solidFill></a:rPr><a:t>Fish &amp; chips</a:t></a:r></a:p></p:txBody></p:sp>
</p:spTree></p:cSld></p:sld>"#;

    const LAYOUT1: &str = r#"<p:sldLayout xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
<p:sp><p:nvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>
<p:sp><p:nvSpPr><p:nvPr><p:ph type="sldNum" idx="12"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="8610600" y="6356350"/><a:ext cx="2743200" cy="365125"/></a:xfrm></p:spPr></p:sp>
</p:spTree></p:cSld></p:sldLayout>"#;

    const LAYOUT1_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/>
</Relationships>"#;

    const MASTER1: &str = r#"<p:sldMaster xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
<p:sp><p:nvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:spPr><a:xfrm><a:off x="838200" y="365125"/><a:ext cx="10515600" cy="1325563"/></a:xfrm></p:spPr></p:sp>
</p:spTree></p:cSld></p:sldMaster>"#;

    const NOTES1: &str = r#"<p:notes xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
<p:sp><p:nvSpPr><p:nvPr><p:ph type="sldImg"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>
<p:sp><p:nvSpPr><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr><p:spPr/>
<p:txBody><a:p><a:r><a:t>Thanks for listening.</a:t></a:r></a:p><a:p><a:r><a:t>[Break]</a:t></a:r><a:r><a:t>Questions?</a:t></a:r></a:p></p:txBody></p:sp>
</p:spTree></p:cSld></p:notes>"#;

    fn build_pptx(parts: &[(&str, &str)]) -> Cursor<Vec<u8>> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in parts {
            zip.start_file(*name, FileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        let mut cursor = zip.finish().unwrap();
        cursor.set_position(0);
        cursor
    }

    fn sample_deck() -> Deck {
        let pptx = build_pptx(&[
            ("ppt/presentation.xml", PRESENTATION),
            ("ppt/_rels/presentation.xml.rels", PRESENTATION_RELS),
            ("ppt/theme/theme1.xml", THEME),
            ("ppt/slides/slide1.xml", SLIDE1),
            ("ppt/slides/_rels/slide1.xml.rels", SLIDE1_RELS),
            ("ppt/slides/slide2.xml", SLIDE2),
            ("ppt/slideLayouts/slideLayout1.xml", LAYOUT1),
            ("ppt/slideLayouts/_rels/slideLayout1.xml.rels", LAYOUT1_RELS),
            ("ppt/slideMasters/slideMaster1.xml", MASTER1),
            ("ppt/notesSlides/notesSlide1.xml", NOTES1),
        ]);
        PptxParser::new().parse(pptx).unwrap()
    }

    #[test]
    fn test_extract_slide_number() {
        assert_eq!(extract_slide_number("rId1"), Some(1));
        assert_eq!(extract_slide_number("rId12"), Some(12));
        assert_eq!(extract_slide_number("slide1.xml"), Some(1));
        assert_eq!(extract_slide_number("slide123.xml"), Some(123));
        assert_eq!(extract_slide_number("nodigits"), None);
    }

    #[test]
    fn test_part_paths() {
        assert_eq!(
            relationships_path("ppt/slides/slide1.xml"),
            "ppt/slides/_rels/slide1.xml.rels"
        );
        assert_eq!(relationships_path("ppt/presentation.xml"), "ppt/_rels/presentation.xml.rels");
        assert_eq!(
            resolve_part_path("ppt/slides/slide1.xml", "../notesSlides/notesSlide1.xml"),
            "ppt/notesSlides/notesSlide1.xml"
        );
        assert_eq!(
            resolve_part_path("ppt/presentation.xml", "slides/slide2.xml"),
            "ppt/slides/slide2.xml"
        );
        assert_eq!(
            resolve_part_path("ppt/presentation.xml", "/ppt/slides/slide3.xml"),
            "ppt/slides/slide3.xml"
        );
    }

    #[test]
    fn test_slide_order_follows_id_list() {
        let deck = sample_deck();
        assert_eq!((deck.width, deck.height), (12_192_000, 6_858_000));
        assert_eq!(deck.slides.len(), 2);
        // rId3 (slide2.xml) is listed first.
        assert_eq!(deck.slides[0].title, None);
        assert_eq!(deck.slides[1].title.as_deref(), Some("Summary"));
    }

    #[test]
    fn test_theme_colors() {
        let deck = sample_deck();
        let scheme = &deck.color_scheme.entries;
        assert_eq!(scheme.len(), 4);
        assert_eq!(scheme[0].name, "dk1");
        assert_eq!(
            scheme[0].value,
            SchemeValue::System {
                name: "windowText".to_string(),
                last_color: Some(Rgb::new(0x11, 0x11, 0x11)),
            }
        );
        assert_eq!(scheme[3].value, SchemeValue::Srgb(Rgb::new(0xEE, 0xEE, 0xEE)));
    }

    #[test]
    fn test_slide_content() {
        let deck = sample_deck();
        let slide = &deck.slides[0];
        assert_eq!(
            slide.background,
            Some(Fill::Solid(ColorFormat::Rgb(Rgb::BLACK)))
        );
        let shape = &slide.shapes[0];
        assert_eq!(shape.kind, ShapeKind::TextBox);
        assert_eq!(shape.text(), "Fish & chips");
        let run = shape.runs().next().unwrap();
        assert_eq!(run.font.size_pt, Some(14.0));
        assert_eq!(
            run.font.color,
            Some(ColorFormat::Theme {
                color: ThemeColor::Background1,
                brightness: 0.0,
            })
        );
        assert_eq!(slide.notes, None);
    }

    #[test]
    fn test_placeholders_inherit_layout_and_master_geometry() {
        let deck = sample_deck();
        let slide = &deck.slides[1];
        let title = &slide.shapes[0];
        assert_eq!(title.kind, ShapeKind::Placeholder);
        assert_eq!((title.left, title.top), (838_200, 365_125));
        let number = &slide.shapes[1];
        assert_eq!(number.text(), "‹#›");
        assert_eq!((number.left, number.top), (8_610_600, 6_356_350));
        assert_eq!((number.width, number.height), (2_743_200, 365_125));
    }

    #[test]
    fn test_notes_runs() {
        let deck = sample_deck();
        let notes = deck.slides[1].notes.as_ref().unwrap();
        assert_eq!(notes.runs, vec!["Thanks for listening.", "[Break]", "Questions?"]);
    }

    #[test]
    fn test_slide_order_without_id_list() {
        let pptx = build_pptx(&[
            (
                "ppt/presentation.xml",
                r#"<p:presentation xmlns:p="p"></p:presentation>"#,
            ),
            ("ppt/_rels/presentation.xml.rels", PRESENTATION_RELS),
            ("ppt/slides/slide1.xml", SLIDE1),
            ("ppt/slides/slide2.xml", SLIDE2),
        ]);
        let deck = PptxParser::new().parse(pptx).unwrap();
        assert_eq!((deck.width, deck.height), DEFAULT_SLIDE_SIZE);
        assert_eq!(deck.slides[0].title.as_deref(), Some("Summary"));
        // Theme part is missing from the archive.
        assert_eq!(deck.color_scheme, ColorScheme::default());
        // No layout to inherit from.
        assert_eq!(deck.slides[0].shapes[0].top, 0);
    }

    #[test]
    fn test_missing_presentation_is_an_error() {
        let pptx = build_pptx(&[("docProps/app.xml", "<Properties/>")]);
        assert!(matches!(
            PptxParser::new().parse(pptx),
            Err(Error::PptxParseError(_))
        ));
    }

    #[test]
    fn test_not_a_zip_is_an_error() {
        let result = PptxParser::new().parse(Cursor::new(b"not a zip".to_vec()));
        assert!(matches!(result, Err(Error::ZipError(_))));
    }
}
