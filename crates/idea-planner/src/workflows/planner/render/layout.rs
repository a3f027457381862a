use serde::Serialize;

use super::markup::strip_markup;
use super::metrics::{line_height, text_width, wrap_text, FontFace};
use crate::workflows::planner::report::Report;
use crate::workflows::planner::validation::{RiskEntry, Severity};

pub const PAGE_WIDTH: f32 = 210.0;
pub const PAGE_HEIGHT: f32 = 297.0;
pub const MARGIN: f32 = 20.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
pub const BOTTOM_LIMIT: f32 = PAGE_HEIGHT - MARGIN;

const HEADER_BAND_HEIGHT: f32 = 25.0;
const FIRST_PAGE_START: f32 = 35.0;
const FOOTER_BASELINE: f32 = PAGE_HEIGHT - 10.0;
const BODY_SIZE: f32 = 10.0;
const SMALL_SIZE: f32 = 8.0;
const DETAIL_LINE: f32 = 4.0;
const LEADER_GAP: f32 = 1.5;
const ROW_INDENT: f32 = 5.0;
const FOOTER_TEXT: &str = "Generated by Design 1st Medical Device Idea Planner";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const INK: Rgb = Rgb(17, 17, 17);
    pub const SLATE: Rgb = Rgb(84, 86, 90);
    pub const MUTED: Rgb = Rgb(128, 128, 128);
    pub const ACCENT: Rgb = Rgb(255, 102, 0);
    pub const PANEL: Rgb = Rgb(255, 243, 230);
}

/// Fixed severity palette. Anything unrecognised renders in the neutral ink.
pub fn severity_color(severity: Severity) -> Rgb {
    match severity {
        Severity::High => Rgb(220, 38, 38),
        Severity::Medium => Rgb(234, 88, 12),
        Severity::Low => Rgb(22, 163, 74),
        Severity::Unrecognized => Rgb::BLACK,
    }
}

/// One drawing instruction. Coordinates are millimetres from the top-left
/// corner; text `y` is the baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawOp {
    Text {
        x: f32,
        y: f32,
        text: String,
        face: FontFace,
        size: f32,
        color: Rgb,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Rgb,
    },
    Rule {
        x1: f32,
        x2: f32,
        y: f32,
        thickness: f32,
        color: Rgb,
    },
    Link {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        url: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub body: Vec<DrawOp>,
    pub footer: Vec<DrawOp>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DocumentLayout {
    pub pages: Vec<Page>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

struct Cursor {
    pages: Vec<Page>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        Self {
            pages: vec![Page::default()],
            y: MARGIN,
        }
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.body.push(op);
        }
    }

    fn at_page_top(&self) -> bool {
        self.y <= MARGIN
    }

    fn break_page(&mut self) {
        self.pages.push(Page::default());
        self.y = MARGIN;
    }

    /// Single page-break decision for a block of known height.
    fn reserve(&mut self, height: f32) {
        if self.y + height > BOTTOM_LIMIT && !self.at_page_top() {
            self.break_page();
        }
    }

    fn text(&mut self, x: f32, text: String, face: FontFace, size: f32, color: Rgb) {
        self.push(DrawOp::Text {
            x,
            y: self.y,
            text,
            face,
            size,
            color,
        });
    }

    /// Writes pre-wrapped lines. A block taller than a page continues on the
    /// next page once it reaches the bottom margin.
    fn lines(&mut self, x: f32, lines: Vec<String>, face: FontFace, size: f32, color: Rgb, step: f32) {
        let height = lines.len() as f32 * step;
        self.reserve(height);
        for line in lines {
            if self.y + step > BOTTOM_LIMIT && !self.at_page_top() {
                self.break_page();
            }
            if !line.is_empty() {
                self.text(x, line, face, size, color);
            }
            self.y += step;
        }
    }

    fn paragraph(&mut self, text: &str, face: FontFace, size: f32, color: Rgb) {
        let plain = strip_markup(text);
        let lines = wrap_text(&plain, face, size, CONTENT_WIDTH);
        self.lines(MARGIN, lines, face, size, color, line_height(size));
    }

    fn section_header(&mut self, title: &str) {
        self.y += 5.0;
        self.reserve(15.0);
        self.paragraph(title, FontFace::Bold, 14.0, Rgb::ACCENT);
        self.push(DrawOp::Rule {
            x1: MARGIN,
            x2: MARGIN + CONTENT_WIDTH,
            y: self.y,
            thickness: 0.5,
            color: Rgb::ACCENT,
        });
        self.y += 5.0;
    }

    fn numbered(&mut self, items: &[String]) {
        for (index, item) in items.iter().enumerate() {
            self.paragraph(
                &format!("{}. {}", index + 1, strip_markup(item)),
                FontFace::Regular,
                BODY_SIZE,
                Rgb::BLACK,
            );
            self.y += 2.0;
        }
    }

    fn disclaimer(&mut self, text: &str) {
        let lines = wrap_text(text, FontFace::Regular, SMALL_SIZE, CONTENT_WIDTH);
        self.lines(MARGIN, lines, FontFace::Regular, SMALL_SIZE, Rgb::MUTED, DETAIL_LINE);
    }

    /// Label on the left, value flush with the right edge, dots between.
    fn leader_row(&mut self, indent: f32, label: &str, value: &str, label_face: FontFace) {
        let left = MARGIN + indent;
        let right = MARGIN + CONTENT_WIDTH;
        let row_width = right - left;
        let step = line_height(BODY_SIZE);

        let value_lines = wrap_text(value, FontFace::Regular, BODY_SIZE, row_width / 2.0);
        let value_width = value_lines
            .iter()
            .map(|line| text_width(line, FontFace::Regular, BODY_SIZE))
            .fold(0.0_f32, f32::max);
        let label_room = (row_width - value_width - 2.0 * LEADER_GAP).max(row_width / 4.0);
        let mut label_lines = wrap_text(label, label_face, BODY_SIZE, label_room);
        if label_lines.is_empty() {
            label_lines.push(String::new());
        }

        let rows = label_lines.len() - 1 + value_lines.len().max(1);
        self.reserve(rows as f32 * step);

        let last = label_lines.len() - 1;
        for (index, line) in label_lines.into_iter().enumerate() {
            if index < last {
                self.text(left, line, label_face, BODY_SIZE, Rgb::BLACK);
                self.y += step;
                continue;
            }
            let first_value_width = value_lines
                .first()
                .map(|line| text_width(line, FontFace::Regular, BODY_SIZE))
                .unwrap_or(0.0);
            let text = with_leaders(&line, label_face, row_width - first_value_width);
            self.text(left, text, label_face, BODY_SIZE, Rgb::BLACK);
        }

        for value_line in value_lines {
            let width = text_width(&value_line, FontFace::Regular, BODY_SIZE);
            self.text(right - width, value_line, FontFace::Regular, BODY_SIZE, Rgb::BLACK);
            self.y += step;
        }
    }

    fn into_pages(self) -> Vec<Page> {
        self.pages
    }
}

/// Appends as many dots as fit between the label and `available` width,
/// leaving a small gap on either side.
pub(crate) fn with_leaders(label: &str, face: FontFace, available: f32) -> String {
    let label_width = text_width(label, face, BODY_SIZE);
    let dot = text_width(".", face, BODY_SIZE);
    let space = text_width(" ", face, BODY_SIZE);
    let gap = available - label_width - space - LEADER_GAP;
    let count = if gap > 0.0 { (gap / dot).floor() as usize } else { 0 };

    let mut text = String::with_capacity(label.len() + count + 1);
    text.push_str(label);
    if count > 0 {
        text.push(' ');
        text.extend(std::iter::repeat('.').take(count));
    }
    text
}

/// Lay out a report onto fixed-size pages. Pure and deterministic.
pub fn layout_report(report: &Report) -> DocumentLayout {
    let mut cursor = Cursor::new();
    let sections = &report.sections;

    header_band(&mut cursor);
    cursor.y = FIRST_PAGE_START;

    cursor.paragraph(&report.header.title, FontFace::Bold, 18.0, Rgb::INK);
    cursor.y += 2.0;
    cursor.paragraph(&report.header.subtitle, FontFace::Regular, 11.0, Rgb::SLATE);
    cursor.y += 2.0;
    cursor.paragraph(
        &format!("Generated: {}", report.header.generated_date),
        FontFace::Regular,
        9.0,
        Rgb::MUTED,
    );
    cursor.y += 8.0;

    cursor.section_header("1. Where You Are Now");
    cursor.paragraph(&sections.where_you_are_now, FontFace::Regular, BODY_SIZE, Rgb::BLACK);
    cursor.y += 5.0;

    cursor.section_header("2. Your Likely Regulatory Pathway");
    cursor.paragraph(&sections.regulatory_pathway, FontFace::Regular, BODY_SIZE, Rgb::BLACK);
    cursor.y += 5.0;

    cursor.section_header("3. Your Next 3 Steps");
    cursor.numbered(&sections.next_three_steps);
    cursor.y += 3.0;

    cursor.section_header("4. Realistic Timeline");
    for milestone in &sections.timeline {
        cursor.leader_row(
            0.0,
            &strip_markup(&milestone.milestone),
            &strip_markup(&milestone.timeframe),
            FontFace::Bold,
        );
        cursor.y += 0.5;
    }
    cursor.y += 2.0;
    cursor.disclaimer(&sections.timeline_disclaimer);
    cursor.y += 3.0;

    let budget = &sections.budget_reality_check;
    cursor.section_header("5. Budget Reality Check");
    cursor.paragraph(&budget.expectation_comparison, FontFace::Regular, BODY_SIZE, Rgb::BLACK);
    cursor.y += 5.0;
    cursor.paragraph("Budget Breakdown:", FontFace::Bold, BODY_SIZE, Rgb::BLACK);
    cursor.y += 2.0;
    for line in &budget.breakdown {
        cursor.leader_row(
            ROW_INDENT,
            &strip_markup(&line.category),
            &strip_markup(&line.range),
            FontFace::Regular,
        );
        cursor.y += 0.5;
    }
    cursor.y += 2.0;
    cursor.disclaimer(&budget.disclaimer);
    cursor.y += 5.0;

    cursor.section_header("6. Key Risks to Address Early");
    for risk in &sections.key_risks {
        risk_block(&mut cursor, risk);
    }

    cursor.section_header("7. What Design 1st Would Focus On First");
    cursor.paragraph(
        "Based on your situation, if you engaged Design 1st, we would likely start by:",
        FontFace::Regular,
        BODY_SIZE,
        Rgb::BLACK,
    );
    cursor.y += 3.0;
    cursor.numbered(&sections.design_first_focus);
    cursor.y += 5.0;

    call_to_action_panel(&mut cursor, report);

    let mut pages = cursor.into_pages();
    let total = pages.len();
    for (index, page) in pages.iter_mut().enumerate() {
        page.footer = footer(index + 1, total);
    }

    DocumentLayout { pages }
}

fn header_band(cursor: &mut Cursor) {
    cursor.push(DrawOp::Rect {
        x: 0.0,
        y: 0.0,
        width: PAGE_WIDTH,
        height: HEADER_BAND_HEIGHT,
        fill: Rgb::SLATE,
    });
    cursor.push(DrawOp::Text {
        x: MARGIN,
        y: 15.0,
        text: "Design 1st".to_string(),
        face: FontFace::Bold,
        size: 12.0,
        color: Rgb::WHITE,
    });
    let tagline = "Medical Device Idea Planner";
    let width = text_width(tagline, FontFace::Regular, 10.0);
    cursor.push(DrawOp::Text {
        x: PAGE_WIDTH - MARGIN - width,
        y: 15.0,
        text: tagline.to_string(),
        face: FontFace::Regular,
        size: 10.0,
        color: Rgb::WHITE,
    });
}

fn risk_block(cursor: &mut Cursor, risk: &RiskEntry) {
    let color = severity_color(risk.severity);
    let title = format!("[{}] {}", risk.severity.label(), strip_markup(&risk.title));
    let title_lines = wrap_text(&title, FontFace::Bold, BODY_SIZE, CONTENT_WIDTH);
    let detail_lines = wrap_text(
        &strip_markup(&risk.description),
        FontFace::Regular,
        BODY_SIZE,
        CONTENT_WIDTH - ROW_INDENT,
    );

    let title_step = line_height(BODY_SIZE) + 0.5;
    let height = title_lines.len() as f32 * title_step + detail_lines.len() as f32 * DETAIL_LINE;
    cursor.reserve(height);

    cursor.lines(MARGIN, title_lines, FontFace::Bold, BODY_SIZE, color, title_step);
    cursor.lines(
        MARGIN + ROW_INDENT,
        detail_lines,
        FontFace::Regular,
        BODY_SIZE,
        Rgb::BLACK,
        DETAIL_LINE,
    );
    cursor.y += 3.0;
}

/// Tinted panel sized to the measured call-to-action content.
fn call_to_action_panel(cursor: &mut Cursor, report: &Report) {
    let cta = &report.call_to_action;
    let inner_width = CONTENT_WIDTH - 10.0;
    let headline = wrap_text(&cta.headline, FontFace::Bold, 12.0, inner_width);
    let body = wrap_text(&cta.body, FontFace::Regular, BODY_SIZE, inner_width);

    let headline_step = 6.0;
    let content = 8.0
        + headline.len() as f32 * headline_step
        + body.len() as f32 * DETAIL_LINE
        + 4.0
        + line_height(BODY_SIZE);
    let panel_height = content.min(BOTTOM_LIMIT - MARGIN);
    cursor.reserve(panel_height);

    let top = cursor.y;
    cursor.push(DrawOp::Rect {
        x: MARGIN,
        y: top,
        width: CONTENT_WIDTH,
        height: panel_height,
        fill: Rgb::PANEL,
    });
    cursor.y += 8.0;

    let text_x = MARGIN + 5.0;
    cursor.lines(text_x, headline, FontFace::Bold, 12.0, Rgb::ACCENT, headline_step);
    cursor.lines(text_x, body, FontFace::Regular, BODY_SIZE, Rgb::SLATE, DETAIL_LINE);
    cursor.y += 4.0;

    let label_width = text_width(&cta.link_label, FontFace::Bold, BODY_SIZE);
    let link_height = line_height(BODY_SIZE);
    cursor.text(
        text_x,
        cta.link_label.clone(),
        FontFace::Bold,
        BODY_SIZE,
        Rgb::ACCENT,
    );
    cursor.push(DrawOp::Link {
        x: text_x,
        y: cursor.y - link_height * 0.8,
        width: label_width,
        height: link_height,
        url: cta.link_url.clone(),
    });
    cursor.y += link_height;
}

fn footer(page: usize, total: usize) -> Vec<DrawOp> {
    let brand_width = text_width(FOOTER_TEXT, FontFace::Regular, SMALL_SIZE);
    let numbering = format!("Page {page} of {total}");
    let numbering_width = text_width(&numbering, FontFace::Regular, SMALL_SIZE);
    vec![
        DrawOp::Text {
            x: (PAGE_WIDTH - brand_width) / 2.0,
            y: FOOTER_BASELINE,
            text: FOOTER_TEXT.to_string(),
            face: FontFace::Regular,
            size: SMALL_SIZE,
            color: Rgb::MUTED,
        },
        DrawOp::Text {
            x: PAGE_WIDTH - MARGIN - numbering_width,
            y: FOOTER_BASELINE,
            text: numbering,
            face: FontFace::Regular,
            size: SMALL_SIZE,
            color: Rgb::MUTED,
        },
    ]
}
