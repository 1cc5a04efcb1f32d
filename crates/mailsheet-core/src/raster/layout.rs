//! Page layout of the live preview as a flat display list.
//!
//! Coordinates are CSS pixels on an A4 page (96 dpi). The list is built by
//! walking a [`Sections`] tree and is painted by [`super::paint`].

use crate::document::{
    AccountSection, Footer, Header, IssuedDate, ManualLink, PortSection, SectionVisitor, Sections,
    ServerInfo, text,
};

/// Page width.
pub const PAGE_WIDTH: f32 = 793.7;
/// Minimum page height; longer content makes the page taller.
pub const PAGE_MIN_HEIGHT: f32 = 1122.5;
/// Inner padding on every side.
pub const PADDING: f32 = 37.8;

const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * PADDING;
const LINE_FACTOR: f32 = 1.25;
const CELL_PAD: f32 = 16.0;

/// Opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// White.
    pub const WHITE: Self = Self(255, 255, 255);
    /// Black.
    pub const BLACK: Self = Self(0, 0, 0);
    pub(crate) const BLUE_900: Self = Self(30, 58, 138);
    pub(crate) const BLUE_800: Self = Self(30, 64, 175);
    pub(crate) const BLUE_700: Self = Self(29, 78, 216);
    pub(crate) const BLUE_600: Self = Self(37, 99, 235);
    pub(crate) const SLATE_600: Self = Self(71, 85, 105);
    pub(crate) const GRAY_50: Self = Self(249, 250, 251);
    pub(crate) const GRAY_200: Self = Self(229, 231, 235);
    pub(crate) const GRAY_300: Self = Self(209, 213, 219);
    pub(crate) const GRAY_400: Self = Self(156, 163, 175);
    pub(crate) const GRAY_500: Self = Self(107, 114, 128);
    pub(crate) const GRAY_700: Self = Self(55, 65, 81);
    pub(crate) const GRAY_800: Self = Self(31, 41, 55);
}

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub w: f32,
    /// Height.
    pub h: f32,
}

impl Frame {
    const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }
}

/// One drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// Filled rectangle.
    Fill {
        /// Area.
        frame: Frame,
        /// Fill color.
        color: Rgb,
    },
    /// Rectangle outline.
    Stroke {
        /// Outlined area.
        frame: Frame,
        /// Line color.
        color: Rgb,
    },
    /// A single line of text; `y` is the top of the em box.
    Text {
        /// Left edge of the first glyph.
        x: f32,
        /// Top of the em box.
        y: f32,
        /// Font size.
        size: f32,
        /// Glyph color.
        color: Rgb,
        /// Draw with synthetic bold.
        bold: bool,
        /// The line.
        text: String,
    },
}

impl DrawOp {
    /// Vertical extent of the op.
    #[must_use]
    pub fn span(&self) -> (f32, f32) {
        match self {
            Self::Fill { frame, .. } | Self::Stroke { frame, .. } => (frame.y, frame.bottom()),
            Self::Text { y, size, .. } => (*y, y + size * LINE_FACTOR),
        }
    }
}

/// A laid-out page.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    /// Page width.
    pub width: f32,
    /// Page height, never below [`PAGE_MIN_HEIGHT`].
    pub height: f32,
    /// Ops in paint order.
    pub ops: Vec<DrawOp>,
}

impl DisplayList {
    /// A blank page.
    #[must_use]
    pub const fn blank() -> Self {
        Self {
            width: PAGE_WIDTH,
            height: PAGE_MIN_HEIGHT,
            ops: Vec::new(),
        }
    }

    /// Text of every text op, in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Horizontal text metrics used for wrapping and alignment.
pub trait TextMeasure {
    /// Advance width of `ch` at `size`.
    fn advance(&self, ch: char, size: f32) -> f32;

    /// Width of a single line.
    fn width(&self, line: &str, size: f32) -> f32 {
        line.chars().map(|ch| self.advance(ch, size)).sum()
    }
}

impl TextMeasure for fontdue::Font {
    fn advance(&self, ch: char, size: f32) -> f32 {
        self.metrics(ch, size).advance_width
    }
}

/// Breaks `line` into lines no wider than `max_width`.
///
/// Breaks happen between any two characters, so addresses and URLs without
/// spaces still wrap. A single character wider than `max_width` gets a line
/// of its own.
pub fn wrap<M: TextMeasure + ?Sized>(
    line: &str,
    size: f32,
    max_width: f32,
    measure: &M,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut width = 0.0;

    for ch in line.chars() {
        let advance = measure.advance(ch, size);
        if !current.is_empty() && width + advance > max_width {
            lines.push(std::mem::take(&mut current));
            width = 0.0;
        }
        current.push(ch);
        width += advance;
    }
    lines.push(current);
    lines
}

/// Lays out one handout page.
#[must_use]
pub fn layout<M: TextMeasure + ?Sized>(
    sections: &Sections,
    issued: IssuedDate,
    measure: &M,
) -> DisplayList {
    let mut builder = Builder {
        measure,
        issued,
        y: PADDING,
        ops: Vec::new(),
    };
    sections.accept(&mut builder);

    DisplayList {
        width: PAGE_WIDTH,
        height: (builder.y + PADDING).max(PAGE_MIN_HEIGHT),
        ops: builder.ops,
    }
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Center,
}

#[derive(Clone, Copy)]
struct Style {
    size: f32,
    color: Rgb,
    bold: bool,
}

impl Style {
    const fn new(size: f32, color: Rgb, bold: bool) -> Self {
        Self { size, color, bold }
    }

    fn line_height(self) -> f32 {
        self.size * LINE_FACTOR
    }
}

struct Builder<'a, M: ?Sized> {
    measure: &'a M,
    issued: IssuedDate,
    y: f32,
    ops: Vec<DrawOp>,
}

impl<M: TextMeasure + ?Sized> Builder<'_, M> {
    fn fill(&mut self, frame: Frame, color: Rgb) {
        self.ops.push(DrawOp::Fill { frame, color });
    }

    fn stroke(&mut self, frame: Frame, color: Rgb) {
        self.ops.push(DrawOp::Stroke { frame, color });
    }

    fn text(&mut self, x: f32, line_top: f32, style: Style, line: &str) {
        if line.is_empty() {
            return;
        }
        self.ops.push(DrawOp::Text {
            x,
            y: line_top + (style.line_height() - style.size) / 2.0,
            size: style.size,
            color: style.color,
            bold: style.bold,
            text: line.to_string(),
        });
    }

    fn wrap(&self, line: &str, style: Style, max_width: f32) -> Vec<String> {
        wrap(line, style.size, max_width, self.measure)
    }

    /// Writes wrapped text at the cursor and advances it.
    fn paragraph(&mut self, line: &str, style: Style) {
        for wrapped in self.wrap(line, style, CONTENT_WIDTH) {
            self.text(PADDING, self.y, style, &wrapped);
            self.y += style.line_height();
        }
    }

    /// Height a cell needs to hold `lines`.
    fn cell_height(lines: usize, style: Style, min: f32) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let content = lines as f32 * style.line_height();
        (content + 18.0).max(min)
    }

    /// Draws pre-wrapped lines inside a cell, vertically centered.
    fn cell_lines(&mut self, frame: Frame, lines: &[String], style: Style, align: Align) {
        #[allow(clippy::cast_precision_loss)]
        let block = lines.len() as f32 * style.line_height();
        let mut top = frame.y + (frame.h - block) / 2.0;
        for line in lines {
            let x = match align {
                Align::Left => frame.x + CELL_PAD,
                Align::Center => {
                    frame.x + (frame.w - self.measure.width(line, style.size)).max(0.0) / 2.0
                }
            };
            self.text(x, top, style, line);
            top += style.line_height();
        }
    }

    fn cell(&mut self, frame: Frame, fill: Option<Rgb>, line: &str, style: Style, align: Align) {
        if let Some(color) = fill {
            self.fill(frame, color);
        }
        self.stroke(frame, Rgb::GRAY_300);
        let lines = self.wrap(line, style, frame.w - 2.0 * CELL_PAD);
        self.cell_lines(frame, &lines, style, align);
    }

    /// Centered heading bar.
    fn bar(&mut self, heading: &str) {
        let style = Style::new(11.0, Rgb::WHITE, true);
        let width = self.measure.width(heading, style.size) + 24.0;
        let height = style.line_height() + 8.0;
        let frame = Frame::new(PADDING + (CONTENT_WIDTH - width) / 2.0, self.y, width, height);
        self.fill(frame, Rgb::BLUE_900);
        self.text(frame.x + 12.0, frame.y + 4.0, style, heading);
        self.y += height + 6.0;
    }
}

impl<M: TextMeasure + ?Sized> SectionVisitor for Builder<'_, M> {
    fn header(&mut self, header: &Header) {
        let top = self.y;
        let title = Style::new(24.0, Rgb::BLUE_900, true);
        self.text(PADDING, top, title, header.title);
        let subtitle = Style::new(10.0, Rgb::GRAY_500, false);
        self.text(PADDING, top + title.line_height(), subtitle, header.subtitle);

        let issued = format!("{}: {}", text::ISSUED_LABEL, self.issued.display());
        let style = Style::new(14.0, Rgb::GRAY_800, true);
        let width = self.measure.width(&issued, style.size);
        self.text(PADDING + CONTENT_WIDTH - width, top, style, &issued);

        self.y = top + title.line_height() + subtitle.line_height() + 8.0;
        self.fill(Frame::new(PADDING, self.y, CONTENT_WIDTH, 2.0), Rgb::BLUE_600);
        self.y += 2.0 + 16.0;

        let greeting = Style::new(14.0, Rgb::GRAY_700, true);
        for line in header.greeting {
            self.paragraph(line, greeting);
        }
        self.y += 16.0;
    }

    fn server_info(&mut self, info: &ServerInfo) {
        self.bar(info.heading);

        let table_width = CONTENT_WIDTH * 0.75;
        let x = PADDING + (CONTENT_WIDTH - table_width) / 2.0;
        let label_width = table_width * 0.33;
        let value_width = table_width - label_width;
        let label = Style::new(14.0, Rgb::GRAY_700, true);
        let value = Style::new(16.0, Rgb::BLUE_800, true);

        for row in &info.rows {
            let lines = self.wrap(&row.value, value, value_width - 2.0 * CELL_PAD);
            let height = Self::cell_height(lines.len(), value, 38.0);
            self.cell(
                Frame::new(x, self.y, label_width, height),
                Some(Rgb::GRAY_50),
                row.label,
                label,
                Align::Left,
            );
            let frame = Frame::new(x + label_width, self.y, value_width, height);
            self.stroke(frame, Rgb::GRAY_300);
            self.cell_lines(frame, &lines, value, Align::Left);
            self.y += height;
        }
        self.y += 4.0;
    }

    fn ports(&mut self, ports: &PortSection) {
        const ROW: f32 = 34.0;
        const MARKER_WIDTH: f32 = 20.0;

        self.y += 20.0;
        let widths = [0.2, 0.4, 0.2, 0.2].map(|share| CONTENT_WIDTH * share);
        let mut lefts = [PADDING; 4];
        for i in 1..4 {
            lefts[i] = lefts[i - 1] + widths[i - 1];
        }

        let head = Style::new(13.0, Rgb::WHITE, true);
        for (i, column) in ports.columns.iter().enumerate() {
            let frame = Frame::new(lefts[i], self.y, widths[i], ROW);
            self.cell(frame, Some(Rgb::SLATE_600), column, head, Align::Center);
        }
        self.y += ROW;

        let group = Style::new(13.0, Rgb::GRAY_800, true);
        for row in &ports.rows {
            if let Some(cell) = row.group {
                #[allow(clippy::cast_precision_loss)]
                let height = ROW * cell.rowspan as f32;
                let frame = Frame::new(lefts[0], self.y, widths[0], height);
                self.cell(frame, Some(Rgb::GRAY_50), cell.label, group, Align::Center);
            }

            let body = if row.selected {
                Style::new(13.0, Rgb::BLACK, true)
            } else {
                Style::new(13.0, Rgb::GRAY_300, false)
            };
            let marker = Style::new(
                13.0,
                if row.selected { Rgb::BLUE_600 } else { Rgb::GRAY_300 },
                body.bold,
            );

            let frame = Frame::new(lefts[1], self.y, widths[1], ROW);
            self.stroke(frame, Rgb::GRAY_300);
            let top = frame.y + (ROW - body.line_height()) / 2.0;
            let marker_x = frame.x
                + 12.0
                + (MARKER_WIDTH - self.measure.width(row.marker(), marker.size)).max(0.0) / 2.0;
            self.text(marker_x, top, marker, row.marker());
            self.text(frame.x + 12.0 + MARKER_WIDTH + 4.0, top, body, row.protocol);

            self.cell(Frame::new(lefts[2], self.y, widths[2], ROW), None, row.port, body, Align::Center);
            self.cell(
                Frame::new(lefts[3], self.y, widths[3], ROW),
                None,
                row.encryption,
                body,
                Align::Center,
            );
            self.y += ROW;
        }

        self.y += 4.0;
        self.paragraph(ports.legend, Style::new(9.0, Rgb::GRAY_400, true));
        self.y += 20.0;
    }

    fn accounts(&mut self, accounts: &AccountSection) {
        self.bar(accounts.heading);

        let widths = [CONTENT_WIDTH * 0.6, CONTENT_WIDTH * 0.4];
        let lefts = [PADDING, PADDING + widths[0]];
        let head = Style::new(14.0, Rgb::GRAY_700, true);
        for (i, column) in accounts.columns.iter().enumerate() {
            let frame = Frame::new(lefts[i], self.y, widths[i], 38.0);
            self.cell(frame, Some(Rgb::GRAY_50), column, head, Align::Left);
        }
        self.y += 38.0;

        let value = Style::new(14.0, Rgb::BLUE_800, true);
        for row in &accounts.rows {
            let email = self.wrap(&row.email, value, widths[0] - 2.0 * CELL_PAD);
            let password = self.wrap(&row.password, value, widths[1] - 2.0 * CELL_PAD);
            let height = Self::cell_height(email.len().max(password.len()), value, 38.0);
            for (i, lines) in [email, password].iter().enumerate() {
                let frame = Frame::new(lefts[i], self.y, widths[i], height);
                self.stroke(frame, Rgb::GRAY_300);
                self.cell_lines(frame, lines, value, Align::Left);
            }
            self.y += height;
        }
        self.y += 20.0;
    }

    fn manual_link(&mut self, link: &ManualLink) {
        let label = Style::new(9.0, Rgb::GRAY_500, true);
        let url = Style::new(12.0, Rgb::BLUE_700, false);
        let inner_width = CONTENT_WIDTH - 20.0;
        let lines = self.wrap(&link.url, url, inner_width - 12.0);
        #[allow(clippy::cast_precision_loss)]
        let inner_height = lines.len() as f32 * url.line_height() + 12.0;
        let outer_height = 10.0 + label.line_height() + 4.0 + inner_height + 10.0;

        let outer = Frame::new(PADDING, self.y, CONTENT_WIDTH, outer_height);
        self.fill(outer, Rgb::GRAY_50);
        self.stroke(outer, Rgb::GRAY_200);
        self.text(PADDING + 10.0, self.y + 10.0, label, link.label);

        let inner = Frame::new(
            PADDING + 10.0,
            self.y + 10.0 + label.line_height() + 4.0,
            inner_width,
            inner_height,
        );
        self.fill(inner, Rgb::WHITE);
        self.stroke(inner, Rgb::GRAY_300);
        let mut top = inner.y + 6.0;
        for line in &lines {
            self.text(inner.x + 6.0, top, url, line);
            top += url.line_height();
        }
        self.y += outer_height + 12.0;
    }

    fn footer(&mut self, footer: &Footer) {
        let style = Style::new(8.0, Rgb::GRAY_400, true);
        for note in footer.notes {
            self.paragraph(note, style);
            self.y += 2.0;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::PortCatalog;
    use crate::document::build;
    use crate::model::{Account, Config};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    /// Every character advances by a fixed fraction of the font size.
    pub(crate) struct FixedAdvance(pub f32);

    impl TextMeasure for FixedAdvance {
        fn advance(&self, _ch: char, size: f32) -> f32 {
            size * self.0
        }
    }

    pub(crate) fn issued() -> IssuedDate {
        IssuedDate::new(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
    }

    fn page(config: &Config, accounts: &[Account]) -> DisplayList {
        let sections = build(config, accounts, &PortCatalog::standard());
        layout(&sections, issued(), &FixedAdvance(0.6))
    }

    #[test]
    fn short_handout_fills_one_page() {
        let list = page(&Config::default(), &[Account::default()]);
        assert!((list.width - PAGE_WIDTH).abs() < f32::EPSILON);
        assert!((list.height - PAGE_MIN_HEIGHT).abs() < f32::EPSILON);
    }

    #[test]
    fn many_accounts_grow_the_page() {
        let accounts: Vec<_> = (0..40)
            .map(|i| Account::new(format!("user{i}@example.jp"), "secret"))
            .collect();
        let list = page(&Config::default(), &accounts);
        assert!(list.height > PAGE_MIN_HEIGHT);
        for op in &list.ops {
            assert!(op.span().1 <= list.height);
        }
    }

    #[test]
    fn shows_issued_date_and_placeholders() {
        let list = page(&Config::default(), &[Account::new("a@example.jp", "")]);
        let texts: Vec<_> = list.texts().collect();
        assert!(texts.contains(&"発行日: 2026/10/16"));
        assert!(texts.contains(&"a@example.jp"));
        assert!(texts.contains(&"-"));
    }

    #[test]
    fn selected_rows_use_filled_marker_in_accent() {
        let list = page(&Config::default(), &[Account::default()]);
        let markers: Vec<_> = list
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, color, .. } if text == "●" || text == "○" => {
                    Some((text.as_str(), *color))
                }
                _ => None,
            })
            .collect();
        // Encryption column also prints ○ for encrypted rows.
        assert_eq!(markers.iter().filter(|(t, _)| *t == "●").count(), 3);
        assert!(
            markers
                .iter()
                .filter(|(t, _)| *t == "●")
                .all(|(_, c)| *c == Rgb::BLUE_600)
        );
    }

    #[test]
    fn manual_link_absent_without_url() {
        let config = Config {
            manual_url: String::new(),
            ..Config::default()
        };
        let list = page(&config, &[]);
        assert!(!list.texts().any(|t| t == text::MANUAL_LABEL));

        let list = page(&Config::default(), &[]);
        assert!(list.texts().any(|t| t == text::MANUAL_LABEL));
        assert!(list.texts().any(|t| t == "https://example.jp"));
    }

    #[test]
    fn long_values_wrap_inside_cells() {
        let email = "x".repeat(200);
        let list = page(&Config::default(), &[Account::new(email.clone(), "pw")]);
        let pieces: String = list
            .texts()
            .filter(|t| t.chars().all(|c| c == 'x') && !t.is_empty())
            .collect();
        assert_eq!(pieces, email);
        for op in &list.ops {
            if let DrawOp::Text { x, text, size, .. } = op {
                let right = x + FixedAdvance(0.6).width(text, *size);
                assert!(right <= PAGE_WIDTH - PADDING + 0.5, "{text} overflows");
            }
        }
    }

    #[test]
    fn wrap_empty_is_single_empty_line() {
        assert_eq!(wrap("", 10.0, 50.0, &FixedAdvance(1.0)), vec![String::new()]);
    }

    proptest! {
        #[test]
        fn wrap_preserves_text_and_width(s in "[a-zあ-ん@.]{0,80}", max in 10.0f32..200.0) {
            let measure = FixedAdvance(0.5);
            let lines = wrap(&s, 10.0, max, &measure);
            prop_assert_eq!(lines.concat(), s);
            for line in &lines {
                prop_assert!(line.chars().count() == 1 || measure.width(line, 10.0) <= max);
            }
        }
    }
}
