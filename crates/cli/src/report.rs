//! HTML rendering of a check report.

use anyhow::{Context, Result};
use askama::Template;
use pptcheck_core::CheckReport;

/// One row of the per-slide table.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideRow {
    /// 1-based slide number.
    pub number: usize,

    /// Feedback lines for the slide, rendered one per line.
    pub feedback: Vec<String>,

    pub start_time: String,
    pub time_spent: String,
}

#[derive(Template)]
#[template(path = "report.html")]
pub struct ReportPage<'a> {
    pub title: &'a str,
    pub time_estimate: Option<&'a str>,
    pub general_feedback: &'a [String],
    pub passed_all: bool,
    pub rows: Vec<SlideRow>,
}

impl<'a> ReportPage<'a> {
    pub fn new(title: &'a str, report: &'a CheckReport) -> Self {
        let times = report.time_estimate.as_ref();
        let time_at = |values: Option<&Vec<String>>, i: usize| -> String {
            values
                .and_then(|v| v.get(i))
                .cloned()
                .unwrap_or_default()
        };

        let rows = report
            .slide_feedback
            .iter()
            .enumerate()
            .map(|(i, feedback)| SlideRow {
                number: i + 1,
                feedback: feedback.lines().map(str::to_string).collect(),
                start_time: time_at(times.map(|t| &t.cumulative_start_times), i),
                time_spent: time_at(times.map(|t| &t.slide_times), i),
            })
            .collect();

        Self {
            title,
            time_estimate: times.map(|t| t.total.as_str()),
            general_feedback: &report.general_feedback,
            passed_all: report.passed_all(),
            rows,
        }
    }
}

/// Render the report page for a checked deck.
pub fn render_html(title: &str, report: &CheckReport) -> Result<String> {
    ReportPage::new(title, report)
        .render()
        .context("Failed to render report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pptcheck_core::{Rule, RuleOutcome, TimeEstimate};

    fn report() -> CheckReport {
        CheckReport {
            outcomes: vec![RuleOutcome {
                rule: Rule::SlideNumbers,
                passed: false,
            }],
            general_feedback: vec![Rule::SlideNumbers.advice().to_string()],
            slide_feedback: vec![
                String::new(),
                "Missing slide number\nFont size for text '<b>' too small".to_string(),
            ],
            time_estimate: Some(TimeEstimate {
                total: "00:01:05".to_string(),
                slide_times: vec!["00:30".to_string(), "00:31".to_string()],
                cumulative_start_times: vec!["00:00:00".to_string(), "00:00:32".to_string()],
                total_seconds: 65.0,
            }),
        }
    }

    #[test]
    fn test_rows_follow_slide_feedback() {
        let report = report();
        let page = ReportPage::new("talk.pptx", &report);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.rows[1].number, 2);
        assert_eq!(page.rows[1].feedback.len(), 2);
        assert_eq!(page.rows[1].start_time, "00:00:32");
        assert_eq!(page.rows[1].time_spent, "00:31");
        assert!(!page.passed_all);
    }

    #[test]
    fn test_render_escapes_feedback() {
        let html = render_html("talk.pptx", &report()).unwrap();
        assert!(html.contains("Estimate total time for presentation: 00:01:05"));
        assert!(html.contains("Please add slide numbers."));
        assert!(html.contains("Missing slide number<br>"));
        assert!(html.contains("&lt;b&gt;"));
        assert!(!html.contains("passed all checks"));
    }

    #[test]
    fn test_render_without_estimate() {
        let report = CheckReport {
            outcomes: Vec::new(),
            general_feedback: Vec::new(),
            slide_feedback: vec![String::new()],
            time_estimate: None,
        };
        let page = ReportPage::new("talk.pptx", &report);
        assert_eq!(page.rows[0].start_time, "");

        let html = page.render().unwrap();
        assert!(html.contains("Presentation passed all checks!"));
        assert!(!html.contains("Estimate total time"));
    }
}
