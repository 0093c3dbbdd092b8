//! The deck checks.
//!
//! Each check looks at the in-scope slides of a deck, returns whether the
//! deck passes, and may append comments to the per-slide feedback.

use crate::config::CheckerConfig;
use crate::contrast::{contrast_ratio, resolve_color};
use crate::feedback::SlideFeedback;
use crate::fingerprint::{drifted_shapes, ShiftTolerance, SlideShapes};
use crate::grammar::SentenceClassifier;
use crate::lexicon::SenseLookup;
use crate::types::{
    ColorFormat, ColorScheme, Deck, Fill, Rgb, Shape, ShapeKind, Slide, ThemeColor,
    SLIDE_NUMBER_PLACEHOLDER,
};

/// Fraction of the slide height at the top and bottom where slide numbers
/// are expected.
const SLIDE_NUMBER_MARGIN: f64 = 0.1;

/// Font sizes this far below the minimum fail regardless of run length.
const FONT_SIZE_HARD_FLOOR_OFFSET: f64 = 6.0;

/// The deck ends with a summary slide, optionally followed by backup slides.
pub fn must_end_with_summary_slide(deck: &Deck) -> bool {
    let mut summary_at_end = false;

    for slide in &deck.slides {
        let Some(title) = slide.title.as_deref() else {
            continue;
        };
        let title = title.to_lowercase();
        if title.contains("summary") {
            summary_at_end = true;
        } else if title.contains("backup") {
            return summary_at_end;
        } else if summary_at_end {
            return false;
        }
    }

    summary_at_end
}

/// Slides after the title slide carry a slide number in a consistent spot.
///
/// The first slide showing a number in the top or bottom margin fixes the
/// expected position. Later slides with the number elsewhere, or without a
/// number, are flagged. A deck that never shows a number passes.
pub fn should_have_slide_numbers(deck: &Deck, feedback: &mut SlideFeedback) -> bool {
    let slides = deck.in_scope_slides();
    if slides.len() < 2 {
        return true;
    }

    let mut established: Option<(i64, i64)> = None;
    let mut passed = true;

    // The title slide is exempt.
    for (index, slide) in slides.iter().enumerate().skip(1) {
        let slide_number = index + 1;
        let mut slide_has_number = false;

        for shape in slide_number_candidates(slide, slide_number) {
            let reference_top = established.map_or(shape.top, |(_, top)| top);
            if !in_vertical_margin(reference_top, deck.height) {
                continue;
            }

            slide_has_number = true;
            match established {
                None => {
                    log::debug!(
                        "Slide numbers established at ({}, {}) on slide {}",
                        shape.left,
                        shape.top,
                        slide_number
                    );
                    established = Some((shape.left, shape.top));
                }
                Some(position) if position != (shape.left, shape.top) => {
                    feedback.push(index, "Slide number is misplaced in a different location.");
                    passed = false;
                }
                Some(_) => {}
            }
        }

        if established.is_some() && !slide_has_number {
            feedback.push(index, "Slide number is missing on this slide.");
            passed = false;
        }
    }

    passed
}

/// Single-paragraph shapes whose text is the slide number or its placeholder.
fn slide_number_candidates(slide: &Slide, slide_number: usize) -> impl Iterator<Item = &Shape> {
    slide.shapes.iter().filter(move |shape| {
        let Some(frame) = &shape.text_frame else {
            return false;
        };
        if frame.paragraphs.len() != 1 {
            return false;
        }
        let text = shape.text();
        let text = text.trim();
        text == SLIDE_NUMBER_PLACEHOLDER
            || (!text.is_empty()
                && text.chars().all(|c| c.is_ascii_digit())
                && text.parse::<usize>().ok() == Some(slide_number))
    })
}

fn in_vertical_margin(top: i64, slide_height: i64) -> bool {
    let top = top as f64;
    let height = slide_height as f64;
    top > height * (1.0 - SLIDE_NUMBER_MARGIN) || top < height * SLIDE_NUMBER_MARGIN
}

/// Shapes that persist across slides do not jump around.
pub fn has_smooth_slide_transitions(
    deck: &Deck,
    config: &CheckerConfig,
    feedback: &mut SlideFeedback,
) -> bool {
    let slides = deck.in_scope_slides();
    if slides.len() < 2 {
        return true;
    }

    let tolerance =
        ShiftTolerance::for_slide(deck.width, deck.height, config.position_shift_tolerance);
    let mut smooth = true;
    let mut previous: Option<SlideShapes> = None;

    for (index, slide) in slides.iter().enumerate() {
        let current = SlideShapes::from_slide(slide);

        if let Some(prev) = previous.as_ref().filter(|p| !p.is_empty()) {
            for shape in drifted_shapes(prev, &current, tolerance) {
                smooth = false;
                feedback.push(index, shape.transition_comment());
            }
        }

        previous = Some(current);
    }

    smooth
}

/// Shapes stand out from the background, lines are thick enough, and text
/// is large enough and readable against what it sits on.
///
/// Pictures, charts and tables are not inspected. Plain rectangles may
/// blend into the background since they often cover or frame content.
pub fn should_have_high_contrast_fonts_colours(
    deck: &Deck,
    config: &CheckerConfig,
    feedback: &mut SlideFeedback,
) -> bool {
    let scheme = &deck.color_scheme;
    let mut passed = true;

    for (index, slide) in deck.in_scope_slides().iter().enumerate() {
        let background = slide_background(slide);

        for shape in &slide.shapes {
            if matches!(
                shape.kind,
                ShapeKind::Picture | ShapeKind::Chart | ShapeKind::Table
            ) {
                continue;
            }

            if shape.kind == ShapeKind::Line {
                let width = shape
                    .line
                    .as_ref()
                    .and_then(|line| line.width_pt)
                    .unwrap_or(0.0);
                if width < config.min_line_width_pt {
                    feedback.push(
                        index,
                        format!(
                            "Line width for {} is too small to be seen at {} pts.",
                            shape.kind, width
                        ),
                    );
                    passed = false;
                }
            }

            // A line is judged by its stroke, every other shape by its fill.
            let fill_color = if shape.kind == ShapeKind::Line {
                shape.line.as_ref().and_then(|line| line.color.as_ref())
            } else {
                match &shape.fill {
                    Some(Fill::Solid(color)) => Some(color),
                    _ => None,
                }
            };

            let mut text_background = background;
            if let Some(color) = fill_color {
                let Some(fill) = resolve_or_note(scheme, color, shape, index, feedback) else {
                    passed = false;
                    continue;
                };
                let ratio = contrast_ratio(background, fill);
                let is_rectangle =
                    matches!(&shape.kind, ShapeKind::AutoShape(kind) if kind.is_rectangle());
                // A ratio of exactly 1 means the shape is the background color.
                if ratio < config.shape_min_contrast_ratio && ratio != 1.0 && !is_rectangle {
                    feedback.push(
                        index,
                        format!(
                            "Colour contrast for {} is not sufficient from the slide background colour.",
                            shape.kind
                        ),
                    );
                    passed = false;
                }
                text_background = fill;
            }

            if shape.kind == ShapeKind::Line {
                continue;
            }
            if !check_shape_fonts(shape, text_background, scheme, config, index, feedback) {
                passed = false;
            }
        }
    }

    passed
}

/// Solid RGB slide backgrounds are honored; anything else counts as white.
fn slide_background(slide: &Slide) -> Rgb {
    match slide.background {
        Some(Fill::Solid(ColorFormat::Rgb(rgb))) => rgb,
        _ => Rgb::WHITE,
    }
}

/// Resolve a color of `shape`, or leave a comment on the slide when the deck
/// points at a theme slot it does not define.
fn resolve_or_note(
    scheme: &ColorScheme,
    color: &ColorFormat,
    shape: &Shape,
    slide_index: usize,
    feedback: &mut SlideFeedback,
) -> Option<Rgb> {
    match resolve_color(scheme, color) {
        Ok(rgb) => Some(rgb),
        Err(e) => {
            log::warn!(
                "Slide {}: colour of {} could not be resolved: {}",
                slide_index + 1,
                shape.kind,
                e
            );
            feedback.push(
                slide_index,
                format!("Colour for {} could not be resolved ({}).", shape.kind, e),
            );
            None
        }
    }
}

/// Font size and font color checks for the runs of one shape.
///
/// Color complaints are only reported when no run of the shape is readable;
/// a shape may grey out some runs on purpose.
fn check_shape_fonts(
    shape: &Shape,
    background: Rgb,
    scheme: &ColorScheme,
    config: &CheckerConfig,
    slide_index: usize,
    feedback: &mut SlideFeedback,
) -> bool {
    let mut passed = true;
    let mut at_least_one_visible = false;
    let mut color_comments = Vec::new();

    for run in shape.runs() {
        if let Some(size) = run.font.size_pt {
            let long_run = run.text.split_whitespace().count() > 2 && !run.text.starts_with('*');
            let too_small = (size < config.min_font_size_pt && long_run)
                || size < config.min_font_size_pt - FONT_SIZE_HARD_FLOOR_OFFSET;
            if too_small {
                feedback.push(
                    slide_index,
                    format!(
                        "Font size for text '{}' in shape {} is too small.",
                        run.text, shape.kind
                    ),
                );
                passed = false;
            }
        }

        if run.text.is_empty() {
            continue;
        }

        let default_color = ColorFormat::Theme {
            color: ThemeColor::Dark1,
            brightness: 0.0,
        };
        let font_color = run.font.color.as_ref().unwrap_or(&default_color);
        let Some(color) = resolve_or_note(scheme, font_color, shape, slide_index, feedback) else {
            passed = false;
            continue;
        };

        if contrast_ratio(background, color) < config.font_min_contrast_ratio
            && !at_least_one_visible
        {
            color_comments.push(format!(
                "Font colour contrast for text '{}' in shape {} is not sufficient from the background colour.",
                run.text, shape.kind
            ));
        } else {
            at_least_one_visible = true;
        }
    }

    if !at_least_one_visible && !color_comments.is_empty() {
        for comment in color_comments {
            feedback.push(slide_index, comment);
        }
        passed = false;
    }

    passed
}

/// No slide carries more than the configured number of words.
///
/// Only runs of more than two words count, and the slide title is skipped.
pub fn should_not_have_excessive_text(
    deck: &Deck,
    config: &CheckerConfig,
    feedback: &mut SlideFeedback,
) -> bool {
    let mut passed = true;

    for (index, slide) in deck.in_scope_slides().iter().enumerate() {
        let title = slide.title.as_deref().map(str::trim);
        let mut slide_text = String::new();

        for run in slide.shapes.iter().flat_map(Shape::runs) {
            if run.text.split(' ').count() <= 2 {
                continue;
            }
            if title.is_some_and(|title| run.text.trim() == title) {
                continue;
            }
            slide_text.push_str(run.text.trim());
            slide_text.push(' ');
        }

        // Counts the empty token after the trailing separator too.
        let word_count = slide_text.split(' ').count();
        log::debug!("Slide {} has a word count of {}", index + 1, word_count);
        if word_count > config.max_words_per_slide {
            feedback.push(index, "Excessive amount of words on this slide.");
            passed = false;
        }
    }

    passed
}

/// Bullet text is phrased as fragments rather than full sentences.
///
/// Questions, titles, short runs and runs with a colon or dash are not
/// inspected.
pub fn does_not_have_complete_sentences<L: SenseLookup>(
    deck: &Deck,
    classifier: &SentenceClassifier<L>,
    feedback: &mut SlideFeedback,
) -> bool {
    let mut passed = true;

    for (index, slide) in deck.in_scope_slides().iter().enumerate() {
        let title = slide.title.as_deref().unwrap_or_default().trim();

        for run in slide.shapes.iter().flat_map(Shape::runs) {
            let text = run.text.trim();
            // Only a run matching the title with exact case is the title.
            if text.is_empty()
                || text == title
                || text.split(' ').count() <= 4
                || text.ends_with('?')
                || text.contains(':')
                || text.contains('-')
            {
                continue;
            }

            if classifier.is_full_sentence(text) {
                feedback.push(index, format!("Avoid full sentences: '{}'", run.text));
                passed = false;
            }
        }
    }

    passed
}
