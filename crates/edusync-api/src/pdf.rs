use std::io::{BufWriter, Write};

use axum::{
    Json,
    http::header,
    response::IntoResponse,
};
use axum_extra::extract::WithRejection;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};
use serde::Deserialize;
use tracing::{error, info};

use edusync_types::api::GeneratePdfRequest;

use crate::error::ApiError;

const DOCUMENT_TITLE: &str = "EduSync Lecture Notes";

// A4 portrait, in millimetres.
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 10.0;
const MARGIN_TOP: f32 = 20.0;
const MARGIN_BOTTOM: f32 = 15.0;

const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 13.0;
const BODY_SIZE: f32 = 11.0;
const LINE_HEIGHT: f32 = 5.5;

/// Helvetica at 11pt averages a little under 2mm per glyph; 95 columns keeps
/// lines inside a 190mm text block.
const WRAP_COLUMNS: usize = 95;

/// POST /generate_pdf: server-side fallback for browsers without the
/// client-side renderer.
pub async fn generate_pdf(
    WithRejection(Json(req), _): WithRejection<Json<GeneratePdfRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    let transcript = req.transcript.unwrap_or_default();
    let summary = req.summary.unwrap_or_default();
    let quiz = req.quiz.unwrap_or_default();

    let bytes = tokio::task::spawn_blocking(move || render_lecture_pdf(&transcript, &summary, &quiz))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal("blocking task failed".into())
        })??;

    info!("Generated lecture PDF ({} bytes)", bytes.len());
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"lecture.pdf\""),
        ],
        bytes,
    ))
}

/// Render transcript, summary and quiz into an A4 document, each section
/// starting on its own page.
pub fn render_lecture_pdf(transcript: &str, summary: &str, quiz: &str) -> Result<Vec<u8>, ApiError> {
    let (doc, page, layer) = PdfDocument::new(DOCUMENT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| pdf_error("font", e))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| pdf_error("font", e))?;

    let mut writer = PageWriter {
        layer: doc.get_page(page).get_layer(layer),
        doc: &doc,
        y: PAGE_HEIGHT - MARGIN_TOP,
    };

    writer.line(DOCUMENT_TITLE, TITLE_SIZE, &bold);
    writer.gap();
    writer.section("Transcript:", transcript, &bold, &regular);

    writer.new_page();
    writer.section("Summary:", summary, &bold, &regular);

    writer.new_page();
    writer.section("Quiz:", &format_quiz(quiz), &bold, &regular);

    let mut bytes = Vec::new();
    {
        let mut out = BufWriter::new(&mut bytes);
        doc.save(&mut out).map_err(|e| pdf_error("save", e))?;
        out.flush()
            .map_err(|e| ApiError::Internal(format!("pdf flush failed: {e}")))?;
    }
    Ok(bytes)
}

fn pdf_error(stage: &str, err: impl std::fmt::Debug) -> ApiError {
    ApiError::Internal(format!("pdf {stage} failed: {err:?}"))
}

struct PageWriter<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f32,
}

impl PageWriter<'_> {
    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN_TOP;
    }

    fn line(&mut self, text: &str, size: f32, font: &IndirectFontRef) {
        if self.y < MARGIN_BOTTOM {
            self.new_page();
        }
        self.layer
            .use_text(to_latin1(text), size, Mm(MARGIN_LEFT), Mm(self.y), font);
        self.y -= LINE_HEIGHT * size / BODY_SIZE;
    }

    fn gap(&mut self) {
        self.y -= LINE_HEIGHT;
    }

    fn section(&mut self, heading: &str, body: &str, bold: &IndirectFontRef, regular: &IndirectFontRef) {
        self.line(heading, HEADING_SIZE, bold);
        self.gap();
        for line in wrap_text(body, WRAP_COLUMNS) {
            self.line(&line, BODY_SIZE, regular);
        }
    }
}

/// Greedy word wrap. Existing line breaks are kept and words longer than
/// `columns` are split.
pub fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > columns {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                lines.push(word.drain(..columns).collect());
            }

            let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
            if needed > columns && current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }

        lines.push(current);
    }

    lines
}

/// The built-in PDF fonts only cover Latin-1; map common typographic
/// punctuation and replace anything else with '?'.
fn to_latin1(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2013}' | '\u{2014}' => '-',
            '\u{2022}' => '*',
            '\t' => ' ',
            c if (c as u32) < 0x20 => ' ',
            c if (c as u32) <= 0xFF => c,
            _ => '?',
        })
        .collect()
}

#[derive(Deserialize)]
struct QuizDocument {
    questions: Vec<QuizQuestion>,
}

#[derive(Deserialize)]
struct QuizQuestion {
    question: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    answer: Option<String>,
}

/// Lay out a quiz for print when it is in the requested JSON shape; any other
/// text is printed as is.
pub fn format_quiz(raw: &str) -> String {
    let Ok(doc) = serde_json::from_str::<QuizDocument>(raw.trim()) else {
        return raw.to_string();
    };

    let mut out = String::new();
    for (i, q) in doc.questions.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, q.question));
        for (letter, option) in ('A'..='Z').zip(&q.options) {
            out.push_str(&format!("   {letter}) {option}\n"));
        }
        if let Some(answer) = &q.answer {
            out.push_str(&format!("   Answer: {answer}\n"));
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_column_limit() {
        let text = "the quick brown fox jumps over the lazy dog ".repeat(10);
        let lines = wrap_text(&text, 20);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
        assert_eq!(lines.join(" ").split_whitespace().count(), 90);
    }

    #[test]
    fn wrap_keeps_paragraph_breaks_and_splits_long_words() {
        let lines = wrap_text("first\n\nsecond", 10);
        assert_eq!(lines, vec!["first", "", "second"]);

        let lines = wrap_text("abcdefghijklmnop", 5);
        assert_eq!(lines, vec!["abcde", "fghij", "klmno", "p"]);
    }

    #[test]
    fn latin1_mapping() {
        assert_eq!(to_latin1("“café” — 日本"), "\"café\" - ??");
    }

    #[test]
    fn quiz_json_is_laid_out() {
        let raw = r#"{"questions":[{"question":"2+2?","options":["3","4","5","6"],"answer":"B"}]}"#;
        let out = format_quiz(raw);
        assert!(out.starts_with("1. 2+2?\n"));
        assert!(out.contains("   B) 4\n"));
        assert!(out.contains("Answer: B"));
    }

    #[test]
    fn non_json_quiz_is_printed_verbatim() {
        assert_eq!(format_quiz("Q1: what?"), "Q1: what?");
    }

    /// Number of `/Type /Page` objects, with or without the space, excluding
    /// the `/Pages` tree node.
    fn page_count(pdf: &[u8]) -> usize {
        [&b"/Type/Page"[..], &b"/Type /Page"[..]]
            .iter()
            .map(|needle| {
                pdf.windows(needle.len() + 1)
                    .filter(|w| w.starts_with(needle) && w[needle.len()] != b's')
                    .count()
            })
            .sum()
    }

    #[test]
    fn each_section_starts_on_its_own_page() {
        let short = render_lecture_pdf("t", "s", "q").unwrap();
        assert!(short.starts_with(b"%PDF"));
        assert_eq!(page_count(&short), 3);

        let empty = render_lecture_pdf("", "", "").unwrap();
        assert_eq!(page_count(&empty), 3);
    }

    #[test]
    fn long_transcript_overflows_onto_more_pages() {
        let long = "Lecture content sentence. ".repeat(2000);
        let bytes = render_lecture_pdf(&long, "A summary.", "not json").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(page_count(&bytes) > 3);
    }
}
