//! Borderless table location from run alignment.
//!
//! A table shows up as consecutive baselines whose runs start at the same
//! few x positions. Only the extent of each table is reported, since the
//! outline pass just needs to know which text to leave out.

use std::collections::{HashMap, HashSet};

use super::content::{RawRect, RawSpan};

/// Width of the x buckets used when voting on column edges.
const BUCKET_SIZE: f32 = 5.0;

/// How far a run may start from a column edge and still sit in it.
const ALIGNMENT_TOLERANCE: f32 = 5.0;

/// Extent of one table found on a page, in bottom-up user space.
#[derive(Debug, Clone, PartialEq)]
pub struct TableExtent {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
    /// Left edges of the columns, ascending.
    pub columns: Vec<f32>,
    pub row_count: usize,
}

impl TableExtent {
    /// `(x0, y0, x1, y1)` rectangle.
    pub fn rect(&self) -> [f32; 4] {
        [self.left, self.bottom, self.right, self.top]
    }

    fn enclosing(rows: &[Baseline], columns: Vec<f32>) -> Self {
        let mut extent = Self {
            top: f32::MIN,
            bottom: f32::MAX,
            left: f32::MAX,
            right: f32::MIN,
            columns,
            row_count: rows.len(),
        };
        for run in rows.iter().flat_map(|row| &row.runs) {
            extent.top = extent.top.max(run.top());
            extent.bottom = extent.bottom.min(run.bottom());
            extent.left = extent.left.min(run.x);
            extent.right = extent.right.max(run.right());
        }
        extent
    }
}

/// Runs sharing a baseline, left to right.
#[derive(Debug, Clone)]
struct Baseline {
    y: f32,
    runs: Vec<RawSpan>,
}

impl Baseline {
    fn from_runs(runs: Vec<RawSpan>) -> Self {
        let y = runs.iter().map(|r| r.y).sum::<f32>() / runs.len() as f32;
        Self { y, runs }
    }

    /// Share of runs that begin on one of `columns`.
    fn aligned_share(&self, columns: &[f32]) -> f32 {
        if self.runs.is_empty() || columns.is_empty() {
            return 0.0;
        }
        let on_column = self
            .runs
            .iter()
            .filter(|run| columns.iter().any(|c| (run.x - c).abs() <= ALIGNMENT_TOLERANCE))
            .count();
        on_column as f32 / self.runs.len() as f32
    }

    fn leading_marker(&self) -> Option<ListMarker> {
        self.runs.first().and_then(|run| ListMarker::parse(&run.text))
    }
}

/// Thresholds for [`TableFinder`].
#[derive(Debug, Clone)]
pub struct TableFinderConfig {
    /// Fewest baselines a table may have.
    pub min_rows: usize,
    pub min_columns: usize,
    /// More columns than this usually means word-by-word runs, not cells.
    pub max_columns: usize,
    /// Runs whose baselines differ by less than this share of their size
    /// are on the same row.
    pub row_tolerance: f32,
    /// Share of rows (or of a row's runs) that must agree on an edge.
    pub min_alignment: f32,
    /// Edges closer than this are one column.
    pub min_column_gap: f32,
}

impl Default for TableFinderConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            row_tolerance: 0.4,
            min_alignment: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// Finds borderless tables among the text runs of a page.
#[derive(Debug, Clone, Default)]
pub struct TableFinder {
    config: TableFinderConfig,
}

impl TableFinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TableFinderConfig) -> Self {
        Self { config }
    }

    /// Locate every table among `runs`.
    pub fn find(&self, runs: &[RawSpan]) -> Vec<TableExtent> {
        let cfg = &self.config;
        if runs.len() < cfg.min_rows * cfg.min_columns {
            return Vec::new();
        }

        let rows = self.baselines(runs);
        if rows.len() < cfg.min_rows {
            return Vec::new();
        }

        let page_columns = self.column_edges(&rows);
        log::debug!(
            "table scan: {} runs on {} baselines, column edges {:?}",
            runs.len(),
            rows.len(),
            page_columns
        );
        if page_columns.len() < cfg.min_columns {
            return Vec::new();
        }

        let found: Vec<TableExtent> = self
            .aligned_blocks(&rows, &page_columns)
            .into_iter()
            .filter_map(|block| {
                let block = &rows[block];
                let columns = self.column_edges(block);
                if columns.len() < cfg.min_columns {
                    return None;
                }
                if columns.len() > cfg.max_columns {
                    log::debug!("table scan: {} columns is too many, skipped", columns.len());
                    return None;
                }
                if looks_like_list(block, columns.len()) {
                    log::debug!("table scan: block is a marked list, skipped");
                    return None;
                }
                Some(TableExtent::enclosing(block, columns))
            })
            .collect();

        log::debug!("table scan: {} table(s)", found.len());
        found
    }

    /// Table extents as user-space rectangles.
    pub(crate) fn find_rects(&self, runs: &[RawSpan]) -> Vec<RawRect> {
        self.find(runs).iter().map(TableExtent::rect).collect()
    }

    /// Buckets runs into baselines, top of the page first.
    fn baselines(&self, runs: &[RawSpan]) -> Vec<Baseline> {
        let mut ordered = runs.to_vec();
        ordered.sort_by(|a, b| b.y.total_cmp(&a.y).then(a.x.total_cmp(&b.x)));

        let mut rows = Vec::new();
        let mut pending: Vec<RawSpan> = Vec::new();
        let mut anchor = f32::NAN;

        for run in ordered {
            let same_row = (run.y - anchor).abs() <= run.font_size * self.config.row_tolerance;
            if !same_row {
                if !pending.is_empty() {
                    rows.push(Baseline::from_runs(std::mem::take(&mut pending)));
                }
                anchor = run.y;
            }
            pending.push(run);
        }
        if !pending.is_empty() {
            rows.push(Baseline::from_runs(pending));
        }
        rows
    }

    /// Left edges shared by enough rows to count as columns.
    ///
    /// Rows with at least two runs vote once per bucket when there are
    /// enough of them; otherwise every run votes.
    fn column_edges(&self, rows: &[Baseline]) -> Vec<f32> {
        let split: Vec<&Baseline> = rows.iter().filter(|r| r.runs.len() >= 2).collect();

        let mut votes: HashMap<i32, usize> = HashMap::new();
        let electorate = if split.len() >= self.config.min_rows {
            for row in &split {
                let distinct: HashSet<i32> = row.runs.iter().map(|r| bucket_of(r.x)).collect();
                for b in distinct {
                    *votes.entry(b).or_default() += 1;
                }
            }
            split.len()
        } else {
            for run in rows.iter().flat_map(|r| &r.runs) {
                *votes.entry(bucket_of(run.x)).or_default() += 1;
            }
            rows.len()
        };

        let quorum = ((electorate as f32 * self.config.min_alignment) as usize).max(2);
        let mut edges: Vec<f32> = votes
            .into_iter()
            .filter(|&(_, n)| n >= quorum)
            .map(|(b, _)| b as f32 * BUCKET_SIZE)
            .collect();
        edges.sort_by(f32::total_cmp);

        edges.into_iter().fold(Vec::new(), |mut kept, edge| {
            if kept.last().map_or(true, |&prev| edge - prev >= self.config.min_column_gap) {
                kept.push(edge);
            }
            kept
        })
    }

    /// Runs of consecutive rows that sit on `columns`.
    fn aligned_blocks(&self, rows: &[Baseline], columns: &[f32]) -> Vec<std::ops::Range<usize>> {
        let min_rows = self.config.min_rows;
        let mut blocks = Vec::new();
        let mut open: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            let aligned = row.aligned_share(columns) >= self.config.min_alignment;
            match (aligned, open) {
                (true, None) => open = Some(i),
                (false, Some(start)) => {
                    if i - start >= min_rows {
                        blocks.push(start..i);
                    }
                    open = None;
                }
                _ => {}
            }
        }
        if let Some(start) = open.filter(|&s| rows.len() - s >= min_rows) {
            blocks.push(start..rows.len());
        }
        blocks
    }
}

fn bucket_of(x: f32) -> i32 {
    (x / BUCKET_SIZE).round() as i32
}

/// A list whose markers are separate runs lines up like a two-column table.
///
/// Bulleted blocks are always lists. Numbered first columns are common in
/// real tables, so numbering only rules out two-column blocks.
fn looks_like_list(rows: &[Baseline], columns: usize) -> bool {
    if columns < 2 || rows.is_empty() {
        return false;
    }
    let (mut bullets, mut numbered) = (0usize, 0usize);
    for marker in rows.iter().filter_map(Baseline::leading_marker) {
        match marker {
            ListMarker::Bullet => bullets += 1,
            ListMarker::Numbered => numbered += 1,
        }
    }
    let half = rows.len() as f32 / 2.0;
    bullets as f32 >= half || (columns == 2 && (bullets + numbered) as f32 >= half)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListMarker {
    Bullet,
    Numbered,
}

impl ListMarker {
    const BULLETS: &'static [&'static str] = &[
        "-", "–", "—", "•", "·", "*", "○", "▪", "◦", "▸", "►", "■", "●", "□", "◆", "▶", "➤",
    ];

    fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if Self::BULLETS.contains(&text) {
            return Some(Self::Bullet);
        }

        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let digits = compact.chars().take_while(char::is_ascii_digit).count();
        let rest = &compact[digits..];
        let numeral = digits > 0 && matches!(rest, "" | "." | ")");

        let mut chars = compact.chars();
        let lettered = matches!(
            (chars.next(), chars.next(), chars.next()),
            (Some(c), Some('.' | ')'), None) if c.is_alphabetic()
        );

        (numeral || lettered).then_some(Self::Numbered)
    }
}
