//! A small WordprocessingML object model.
//!
//! Only what the handout needs: styled paragraphs of runs, and bordered
//! tables whose cells may be shaded or vertically merged.

/// Paragraph style, matching an id in `styles.xml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParagraphStyle {
    /// Document title.
    Heading1,
    /// Section heading.
    Heading2,
    /// Body text.
    #[default]
    Normal,
}

impl ParagraphStyle {
    /// Style id as written to the document.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Heading1 => "Heading1",
            Self::Heading2 => "Heading2",
            Self::Normal => "Normal",
        }
    }
}

/// A span of text with uniform formatting.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Run {
    /// The text.
    pub text: String,
    /// Bold weight.
    pub bold: bool,
    /// Hex color without `#`, e.g. `FFFFFF`.
    pub color: Option<&'static str>,
}

impl Run {
    /// A plain run.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// A bold run.
    #[must_use]
    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            color: None,
        }
    }

    /// Sets the color.
    #[must_use]
    pub const fn colored(mut self, color: &'static str) -> Self {
        self.color = Some(color);
        self
    }
}

/// A paragraph. Spacing is in twentieths of a point.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paragraph {
    /// Paragraph style.
    pub style: ParagraphStyle,
    /// Runs in order.
    pub runs: Vec<Run>,
    /// Space above.
    pub spacing_before: u32,
    /// Space below.
    pub spacing_after: u32,
}

impl Paragraph {
    /// A paragraph holding a single run.
    #[must_use]
    pub fn of(run: Run) -> Self {
        Self {
            runs: vec![run],
            ..Self::default()
        }
    }

    /// A paragraph with no text.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sets the style.
    #[must_use]
    pub const fn styled(mut self, style: ParagraphStyle) -> Self {
        self.style = style;
        self
    }

    /// Sets the spacing above and below.
    #[must_use]
    pub const fn spaced(mut self, before: u32, after: u32) -> Self {
        self.spacing_before = before;
        self.spacing_after = after;
        self
    }

    /// Concatenated text of all runs.
    #[must_use]
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }
}

/// Vertical merge state of a table cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VMerge {
    /// First cell of a merged run; carries the content.
    Restart,
    /// Covered by the cell above.
    Continue,
}

/// A table cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cell {
    /// Cell content. Word requires at least one paragraph.
    pub paragraphs: Vec<Paragraph>,
    /// Background fill as hex.
    pub shading: Option<&'static str>,
    /// Vertical merge state.
    pub v_merge: Option<VMerge>,
}

impl Cell {
    /// A cell holding one paragraph.
    #[must_use]
    pub fn of(paragraph: Paragraph) -> Self {
        Self {
            paragraphs: vec![paragraph],
            ..Self::default()
        }
    }

    /// Placeholder for a position covered by a merged cell above.
    #[must_use]
    pub fn merged_below() -> Self {
        Self {
            paragraphs: vec![Paragraph::empty()],
            shading: None,
            v_merge: Some(VMerge::Continue),
        }
    }

    /// Sets the background fill.
    #[must_use]
    pub const fn shaded(mut self, fill: &'static str) -> Self {
        self.shading = Some(fill);
        self
    }

    /// Sets the merge state.
    #[must_use]
    pub const fn merge(mut self, state: VMerge) -> Self {
        self.v_merge = Some(state);
        self
    }
}

/// A table row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    /// Cells left to right.
    pub cells: Vec<Cell>,
}

/// A bordered table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Width as a percentage of the text area.
    pub width_pct: u32,
    /// Rows top to bottom.
    pub rows: Vec<Row>,
}

impl Table {
    /// Largest number of cells in any row.
    #[must_use]
    pub fn columns(&self) -> usize {
        self.rows.iter().map(|row| row.cells.len()).max().unwrap_or(0)
    }
}

/// Body-level content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// A paragraph.
    Paragraph(Paragraph),
    /// A table.
    Table(Table),
}

/// A single-section document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Title stored in the package properties.
    pub title: String,
    /// Page margin on every side, in twips.
    pub margin_twips: u32,
    /// Body content.
    pub blocks: Vec<Block>,
}

impl Document {
    /// Every table in the body, in order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Table(table) => Some(table),
            Block::Paragraph(_) => None,
        })
    }

    /// Every body-level paragraph, in order.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|block| match block {
            Block::Paragraph(paragraph) => Some(paragraph),
            Block::Table(_) => None,
        })
    }
}
