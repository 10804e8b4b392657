//! Data table with grid keyboard navigation
//!
//! Renders a paged `role="grid"` table. Focus roves between cells: row 0
//! is the header row, rows 1.. are the body rows on the current page.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use focal_dom::{Document, DomResult, FocusOptions, KeyboardEvent, NamedKey, NodeId};

use crate::aria::{set_bool, AriaSort};
use crate::focus_trap::KeyHandling;
use crate::manager::FocusManager;
use crate::{A11yResult, Politeness};

/// Focused cell; row 0 is the header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridPosition {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone)]
struct Record {
    id: usize,
    cells: Vec<String>,
}

#[derive(Debug)]
pub struct DataTable {
    table: NodeId,
    tbody: NodeId,
    headers: Vec<NodeId>,
    columns: Vec<String>,
    records: Vec<Record>,
    page_size: usize,
    page: usize,
    sort: Option<(usize, AriaSort)>,
    selected: BTreeSet<usize>,
    /// Body rows on the current page: the `<tr>` and its cells
    rows: Vec<(NodeId, Vec<NodeId>)>,
    focus: GridPosition,
}

impl DataTable {
    /// Build the table under `parent`
    pub fn mount(
        doc: &mut Document,
        parent: NodeId,
        label: &str,
        columns: &[&str],
        rows: Vec<Vec<String>>,
        page_size: usize,
    ) -> DomResult<Self> {
        let table = doc.create_element_with("table", &[("role", "grid"), ("aria-label", label)], None);
        let thead = doc.create_element("thead");
        let header_row = doc.create_element_with("tr", &[("role", "row")], None);
        let tbody = doc.create_element("tbody");
        doc.append_child(table, thead)?;
        doc.append_child(thead, header_row)?;
        doc.append_child(table, tbody)?;

        let mut headers = Vec::with_capacity(columns.len());
        for column in columns {
            let th = doc.create_element_with(
                "th",
                &[("role", "columnheader"), ("aria-sort", AriaSort::None.as_str()), ("tabindex", "-1")],
                Some(*column),
            );
            doc.append_child(header_row, th)?;
            headers.push(th);
        }

        let records = rows
            .into_iter()
            .enumerate()
            .map(|(id, cells)| Record { id, cells })
            .collect::<Vec<_>>();
        doc.set_attribute(table, "aria-rowcount", &(records.len() + 1).to_string())?;
        doc.set_attribute(table, "aria-colcount", &columns.len().to_string())?;

        let mut grid = Self {
            table,
            tbody,
            headers,
            columns: columns.iter().map(|c| c.to_string()).collect(),
            records,
            page_size: page_size.max(1),
            page: 0,
            sort: None,
            selected: BTreeSet::new(),
            rows: Vec::new(),
            focus: GridPosition::default(),
        };
        grid.render_page(doc)?;
        doc.append_child(parent, table)?;
        Ok(grid)
    }

    pub fn table(&self) -> NodeId {
        self.table
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.records.len().div_ceil(self.page_size).max(1)
    }

    pub fn focus_position(&self) -> GridPosition {
        self.focus
    }

    pub fn sort_state(&self) -> Option<(usize, AriaSort)> {
        self.sort
    }

    /// Cell at a grid position on the current page
    pub fn cell(&self, pos: GridPosition) -> Option<NodeId> {
        if pos.row == 0 {
            return self.headers.get(pos.col).copied();
        }
        self.rows.get(pos.row - 1)?.1.get(pos.col).copied()
    }

    /// Text of the body cells on the current page, row by row
    pub fn visible_rows(&self) -> Vec<Vec<String>> {
        self.page_records().iter().map(|r| r.cells.clone()).collect()
    }

    fn page_records(&self) -> &[Record] {
        let start = (self.page * self.page_size).min(self.records.len());
        let end = (start + self.page_size).min(self.records.len());
        &self.records[start..end]
    }

    fn render_page(&mut self, doc: &mut Document) -> DomResult<()> {
        let had_focus = doc.tree().contains(self.table, doc.active_element());
        for (tr, _) in self.rows.drain(..) {
            doc.remove_child(self.tbody, tr)?;
        }
        let start = self.page * self.page_size;
        let page: Vec<Record> = self.page_records().to_vec();
        for (i, record) in page.iter().enumerate() {
            let tr = doc.create_element_with("tr", &[("role", "row")], None);
            doc.set_attribute(tr, "aria-rowindex", &(start + i + 2).to_string())?;
            set_bool(doc, tr, "aria-selected", self.selected.contains(&record.id))?;
            let mut cells = Vec::with_capacity(record.cells.len());
            for text in &record.cells {
                let td = doc.create_element_with("td", &[("role", "gridcell"), ("tabindex", "-1")], Some(text.as_str()));
                doc.append_child(tr, td)?;
                cells.push(td);
            }
            doc.append_child(self.tbody, tr)?;
            self.rows.push((tr, cells));
        }
        let last_row = self.rows.len();
        self.focus.row = self.focus.row.min(last_row);
        self.update_roving(doc)?;
        // Re-rendered cells are new nodes; keep focus in the grid.
        if had_focus {
            if let Some(cell) = self.cell(self.focus) {
                doc.focus(cell, FocusOptions::default());
            }
        }
        Ok(())
    }

    fn update_roving(&self, doc: &mut Document) -> DomResult<()> {
        let active = self.cell(self.focus);
        let cells = self.headers.iter().chain(self.rows.iter().flat_map(|(_, cells)| cells.iter()));
        for &cell in cells {
            doc.set_attribute(cell, "tabindex", if Some(cell) == active { "0" } else { "-1" })?;
        }
        Ok(())
    }

    /// Move the roving focus to a cell, clamped to the grid
    pub fn focus_cell(&mut self, doc: &mut Document, pos: GridPosition) -> DomResult<Option<NodeId>> {
        let last_col = self.columns.len().saturating_sub(1);
        self.focus = GridPosition {
            row: pos.row.min(self.rows.len()),
            col: pos.col.min(last_col),
        };
        self.update_roving(doc)?;
        let cell = self.cell(self.focus);
        if let Some(cell) = cell {
            doc.focus(cell, FocusOptions::default());
        }
        Ok(cell)
    }

    /// Sort by a column, toggling direction on repeat
    pub fn sort_by(&mut self, doc: &mut Document, manager: &mut FocusManager, col: usize) -> DomResult<()> {
        if col >= self.columns.len() {
            return Ok(());
        }
        let direction = match self.sort {
            Some((current, dir)) if current == col => dir.toggled(),
            _ => AriaSort::Ascending,
        };
        self.records.sort_by(|a, b| {
            let ord = compare_cells(a.cells.get(col), b.cells.get(col));
            if direction == AriaSort::Descending { ord.reverse() } else { ord }
        });
        self.sort = Some((col, direction));
        for (i, &th) in self.headers.iter().enumerate() {
            let value = if i == col { direction } else { AriaSort::None };
            doc.set_attribute(th, "aria-sort", value.as_str())?;
        }
        self.render_page(doc)?;
        manager.announce(
            doc,
            &format!("Sorted by {}, {}", self.columns[col], direction.as_str()),
            Politeness::Polite,
        );
        Ok(())
    }

    /// Show another page. Out-of-range pages are ignored.
    pub fn go_to_page(&mut self, doc: &mut Document, manager: &mut FocusManager, page: usize) -> DomResult<bool> {
        if page >= self.page_count() || page == self.page {
            return Ok(false);
        }
        self.page = page;
        self.render_page(doc)?;
        manager.announce(
            doc,
            &format!("Page {} of {}", page + 1, self.page_count()),
            Politeness::Polite,
        );
        Ok(true)
    }

    /// Toggle selection of a body row on the current page (1-based grid row)
    pub fn toggle_row(&mut self, doc: &mut Document, manager: &mut FocusManager, row: usize) -> DomResult<()> {
        let Some(record_id) = row.checked_sub(1).and_then(|i| self.page_records().get(i)).map(|r| r.id) else {
            return Ok(());
        };
        let selected = if self.selected.remove(&record_id) {
            false
        } else {
            self.selected.insert(record_id);
            true
        };
        let tr = self.rows[row - 1].0;
        set_bool(doc, tr, "aria-selected", selected)?;
        let number = self.page * self.page_size + row;
        let state = if selected { "selected" } else { "deselected" };
        manager.announce(doc, &format!("Row {number} {state}"), Politeness::Polite);
        Ok(())
    }

    pub fn is_row_selected(&self, row: usize) -> bool {
        row.checked_sub(1)
            .and_then(|i| self.page_records().get(i))
            .is_some_and(|r| self.selected.contains(&r.id))
    }

    pub fn handle_keydown(
        &mut self,
        doc: &mut Document,
        manager: &mut FocusManager,
        event: &mut KeyboardEvent,
    ) -> A11yResult<KeyHandling> {
        let GridPosition { row, col } = self.focus;
        let last_row = self.rows.len();
        let last_col = self.columns.len().saturating_sub(1);

        if event.is_activation() {
            if row == 0 {
                self.sort_by(doc, manager, col)?;
            } else if event.is_space() {
                self.toggle_row(doc, manager, row)?;
            } else {
                return Ok(KeyHandling::PassThrough);
            }
            event.prevent_default();
            return Ok(KeyHandling::Swallowed);
        }
        if event.is(NamedKey::PageDown) || event.is(NamedKey::PageUp) {
            event.prevent_default();
            let page = if event.is(NamedKey::PageDown) {
                self.page + 1
            } else {
                self.page.saturating_sub(1)
            };
            self.go_to_page(doc, manager, page)?;
            return Ok(KeyHandling::Moved(doc.active_element()));
        }

        let target = if event.is(NamedKey::ArrowRight) {
            GridPosition { row, col: (col + 1).min(last_col) }
        } else if event.is(NamedKey::ArrowLeft) {
            GridPosition { row, col: col.saturating_sub(1) }
        } else if event.is(NamedKey::ArrowDown) {
            GridPosition { row: (row + 1).min(last_row), col }
        } else if event.is(NamedKey::ArrowUp) {
            GridPosition { row: row.saturating_sub(1), col }
        } else if event.is(NamedKey::Home) {
            if event.ctrl() { GridPosition { row: 0, col: 0 } } else { GridPosition { row, col: 0 } }
        } else if event.is(NamedKey::End) {
            let row = if event.ctrl() { last_row } else { row };
            GridPosition { row, col: last_col }
        } else {
            return Ok(KeyHandling::PassThrough);
        };
        event.prevent_default();
        match self.focus_cell(doc, target)? {
            Some(cell) => Ok(KeyHandling::Moved(cell)),
            None => Ok(KeyHandling::Swallowed),
        }
    }
}

/// Numbers compare numerically, everything else as text
fn compare_cells(a: Option<&String>, b: Option<&String>) -> Ordering {
    let (a, b) = (a.map_or("", String::as_str), b.map_or("", String::as_str));
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}
