//! PDF rendering of the monthly report
//!
//! Uses the standard Helvetica fonts that every PDF viewer provides, so no font
//! files are embedded. Those fonts only cover Latin text: the rupee sign is
//! written as "Rs." and any other non-ASCII character becomes '?'.

use printpdf::{BuiltinFont, Mm, PdfDocument};

use super::{format_currency, format_date, MonthlyReport};
use crate::error::{Error, Result};

// A4, in millimetres
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 20.0;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const ROW_HEIGHT: f32 = 6.0;

// Column anchors; amounts are right-aligned on AMOUNT_RIGHT
const DATE_X: f32 = MARGIN;
const AMOUNT_RIGHT: f32 = 80.0;
const CATEGORY_X: f32 = 88.0;
const NOTE_X: f32 = 125.0;
const NOTE_CHARS: usize = 38;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Weight {
    Regular,
    Bold,
}

/// One run of text with its baseline position in millimetres
#[derive(Debug, Clone, PartialEq)]
struct Placed {
    content: String,
    size: f32,
    x: f32,
    y: f32,
    weight: Weight,
}

/// Places text top to bottom, starting a new page at the bottom margin
struct Layout {
    pages: Vec<Vec<Placed>>,
    y: f32,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Vec::new()],
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn next_line(&mut self, height: f32) {
        if self.y - height < MARGIN {
            self.pages.push(Vec::new());
            self.y = PAGE_HEIGHT - MARGIN;
        }
        self.y -= height;
    }

    fn put(&mut self, content: &str, size: f32, x: f32, weight: Weight) {
        let y = self.y;
        if let Some(page) = self.pages.last_mut() {
            page.push(Placed {
                content: pdf_text(content),
                size,
                x,
                y,
                weight,
            });
        }
    }

    fn put_right(&mut self, content: &str, size: f32, right: f32, weight: Weight) {
        let text = pdf_text(content);
        let x = right - text_width(&text, size);
        self.put(&text, size, x, weight);
    }
}

fn layout(report: &MonthlyReport) -> Vec<Vec<Placed>> {
    let mut layout = Layout::new();

    layout.next_line(10.0);
    layout.put(&report.title, TITLE_SIZE, MARGIN, Weight::Bold);

    layout.next_line(10.0);
    layout.put_right(
        &format!("Total Expenses: {}", format_currency(report.total)),
        HEADING_SIZE,
        PAGE_WIDTH - MARGIN,
        Weight::Bold,
    );

    layout.next_line(12.0);
    layout.put("Date", BODY_SIZE, DATE_X, Weight::Bold);
    layout.put_right("Amount", BODY_SIZE, AMOUNT_RIGHT, Weight::Bold);
    layout.put("Category", BODY_SIZE, CATEGORY_X, Weight::Bold);
    layout.put("Note", BODY_SIZE, NOTE_X, Weight::Bold);

    for row in &report.rows {
        layout.next_line(ROW_HEIGHT);
        layout.put(&format_date(row.date), BODY_SIZE, DATE_X, Weight::Regular);
        layout.put_right(
            &format_currency(row.amount),
            BODY_SIZE,
            AMOUNT_RIGHT,
            Weight::Regular,
        );
        layout.put(row.category.as_str(), BODY_SIZE, CATEGORY_X, Weight::Regular);
        if !row.note.is_empty() {
            layout.put(&clip(&row.note, NOTE_CHARS), BODY_SIZE, NOTE_X, Weight::Regular);
        }
    }

    layout.next_line(12.0);
    layout.put("Category Summary", HEADING_SIZE, MARGIN, Weight::Bold);
    for summary in &report.categories {
        layout.next_line(ROW_HEIGHT);
        layout.put(summary.category.as_str(), BODY_SIZE, DATE_X, Weight::Regular);
        layout.put_right(
            &format_currency(summary.amount),
            BODY_SIZE,
            AMOUNT_RIGHT,
            Weight::Regular,
        );
    }

    layout.pages
}

/// Render `report` as a complete PDF document
pub(super) fn render(report: &MonthlyReport) -> Result<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        report.title.clone(),
        Mm(PAGE_WIDTH),
        Mm(PAGE_HEIGHT),
        String::from("Report"),
    );
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    for (index, placed) in layout(report).into_iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), String::from("Report"))
        };
        let target = doc.get_page(page).get_layer(layer);
        for text in placed {
            let font = match text.weight {
                Weight::Regular => &regular,
                Weight::Bold => &bold,
            };
            target.use_text(text.content, text.size, Mm(text.x), Mm(text.y), font);
        }
    }

    doc.save_to_bytes().map_err(pdf_error)
}

fn pdf_error(e: impl std::fmt::Display) -> Error {
    Error::Report(format!("Failed to render PDF: {}", e))
}

/// Restrict text to what the built-in fonts can draw
fn pdf_text(s: &str) -> String {
    s.replace('₹', "Rs. ")
        .chars()
        .map(|c| if c.is_ascii() && !c.is_ascii_control() { c } else { '?' })
        .collect()
}

fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Approximate Helvetica width of `text` in millimetres
fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| match c {
            ' ' | ',' | '.' | ':' | 'i' | 'l' | 'I' => 278,
            '-' | 'r' | 't' | 'f' => 333,
            's' | 'c' | 'k' | 'v' | 'x' | 'y' | 'z' => 500,
            'm' | 'M' => 833,
            'A'..='Z' => 722,
            _ => 556,
        })
        .sum();
    // 1000 units per em; 1pt = 25.4/72 mm
    units as f32 / 1000.0 * size * 25.4 / 72.0
}
