//! Grid application state and input handling.
//!
//! Every interaction is routed into the [`ViewState`] mutators; the view is
//! derived again from scratch for the next frame.

use std::sync::Arc;

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use datagrid_lib::model::{Dataset, Value};
use datagrid_lib::store::{SessionStore, Snapshot};
use datagrid_lib::view::{CellName, ScrollMetrics, ViewState, derive};
use log::{debug, info, warn};
use ratatui::layout::{Position, Rect};

use crate::config::GridConfig;
use crate::controls::{Choice, Control};
use crate::input::{LineEdit, LineInput};
use crate::render::{HitMap, Regions, Target};

/// Region that receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Search,
    Save,
    Columns,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Table => Focus::Search,
            Focus::Search => Focus::Save,
            Focus::Save => Focus::Columns,
            Focus::Columns => Focus::Table,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Table => Focus::Columns,
            Focus::Search => Focus::Table,
            Focus::Save => Focus::Search,
            Focus::Columns => Focus::Save,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorKind {
    Text(LineInput),
    Choice { options: Vec<Choice>, selected: usize },
}

/// The open cell editor.
#[derive(Debug, Clone, PartialEq)]
pub struct Editor {
    pub cell: CellName,
    pub kind: EditorKind,
}

/// Blocking dialog, dismissed by any confirming key or a click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modal {
    pub title: String,
    pub lines: Vec<String>,
}

impl Modal {
    pub fn new(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
        }
    }
}

fn is_command(key: &KeyEvent) -> bool {
    key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

pub struct GridApp {
    dataset: Dataset,
    state: ViewState,
    store: Arc<dyn SessionStore>,
    config: GridConfig,
    size: (u16, u16),
    focus: Focus,
    cursor_row: usize,
    cursor_col: usize,
    scroll: usize,
    col_offset: usize,
    column_focus: usize,
    search: LineInput,
    editor: Option<Editor>,
    modal: Option<Modal>,
    message: Option<String>,
    hits: HitMap,
    quit: bool,
}

impl GridApp {
    pub fn new(dataset: Dataset, store: Arc<dyn SessionStore>, config: GridConfig) -> Self {
        let state = ViewState::for_dataset(&dataset).with_reveal_count(config.initial_reveal);
        info!(
            "Grid opened with {} columns, {} rows",
            dataset.columns().len(),
            dataset.rows().len()
        );

        Self {
            dataset,
            state,
            store,
            config,
            size: (80, 24),
            focus: Focus::Table,
            cursor_row: 0,
            cursor_col: 0,
            scroll: 0,
            col_offset: 0,
            column_focus: 0,
            search: LineInput::default(),
            editor: None,
            modal: None,
            message: None,
            hits: HitMap::default(),
            quit: false,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Cursor position as (row index, column index) into the derived view.
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_row, self.cursor_col)
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    /// First visible column index.
    pub fn col_offset(&self) -> usize {
        self.col_offset
    }

    /// Index into the dataset's columns of the focused visibility checkbox.
    pub fn column_focus(&self) -> usize {
        self.column_focus
    }

    pub fn search(&self) -> &LineInput {
        &self.search
    }

    pub fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }

    pub fn modal(&self) -> Option<&Modal> {
        self.modal.as_ref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    fn regions(&self) -> Regions {
        Regions::new(Rect::new(0, 0, self.size.0, self.size.1))
    }

    /// Rows the body can show at the current size.
    pub fn viewport(&self) -> usize {
        self.regions().body.height as usize
    }

    // =========================================================================
    // Frame bookkeeping
    // =========================================================================

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        self.clamp_cursor();
        self.reveal_if_near_end();
    }

    /// Stores the hit regions drawn by the last frame.
    pub fn set_hits(&mut self, hits: HitMap) {
        self.hits = hits;
    }

    pub fn quit(&mut self) {
        info!("Quit requested");
        self.quit = true;
    }

    // =========================================================================
    // Event dispatch
    // =========================================================================

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => self.set_size(width, height),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }

        if self.modal.is_some() {
            if matches!(
                key.code,
                KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') | KeyCode::Char('q')
            ) {
                self.modal = None;
            }
            return;
        }

        if self.editor.is_some() {
            self.handle_editor_key(key);
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            self.save();
            return;
        }
        match key.code {
            KeyCode::Tab => {
                self.set_focus(self.focus.next());
                return;
            }
            KeyCode::BackTab => {
                self.set_focus(self.focus.prev());
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Table => self.handle_table_key(key),
            Focus::Search => self.handle_search_key(key),
            Focus::Save => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.save();
                }
            }
            Focus::Columns => self.handle_columns_key(key),
        }
    }

    fn set_focus(&mut self, focus: Focus) {
        debug!("Focus {:?} -> {:?}", self.focus, focus);
        self.focus = focus;
    }

    fn handle_table_key(&mut self, key: KeyEvent) {
        if is_command(&key) {
            return;
        }
        let page = self.viewport().max(1) as isize;

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),
            KeyCode::PageUp => self.move_cursor(-page, 0),
            KeyCode::PageDown => self.move_cursor(page, 0),
            KeyCode::Home => self.move_cursor(isize::MIN, 0),
            KeyCode::End => self.move_cursor(isize::MAX, 0),
            KeyCode::Enter => self.edit_cursor_cell(),
            KeyCode::Char('s') => self.sort_cursor_column(),
            KeyCode::Char('/') => self.set_focus(Focus::Search),
            KeyCode::Char('v') => self.show_snapshot(),
            KeyCode::Char('q') => self.quit(),
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.set_focus(Focus::Table);
            return;
        }

        match self.search.handle_key(key) {
            LineEdit::Changed => {
                self.state.set_search_query(self.search.text());
                self.cursor_row = 0;
                self.scroll = 0;
                self.clamp_cursor();
                self.reveal_if_near_end();
            }
            LineEdit::Submitted => self.set_focus(Focus::Table),
            LineEdit::Moved | LineEdit::Ignored => {}
        }
    }

    fn handle_columns_key(&mut self, key: KeyEvent) {
        let count = self.dataset.columns().len();
        if count == 0 {
            return;
        }

        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.column_focus = self.column_focus.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.column_focus = (self.column_focus + 1).min(count - 1);
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_column_at(self.column_focus),
            KeyCode::Esc => self.set_focus(Focus::Table),
            _ => {}
        }
    }

    fn handle_editor_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.close_editor();
            return;
        }
        let Some(editor) = self.editor.as_mut() else {
            return;
        };

        match &mut editor.kind {
            EditorKind::Text(input) => match input.handle_key(key) {
                LineEdit::Changed => {
                    let value = Value::Text(input.text().to_string());
                    let cell = &editor.cell;
                    self.state.record_edit(&cell.row_id, &cell.column_id, value);
                }
                LineEdit::Submitted => self.close_editor(),
                LineEdit::Moved | LineEdit::Ignored => {}
            },
            EditorKind::Choice { options, selected } => match key.code {
                KeyCode::Up | KeyCode::Char('k') => *selected = selected.saturating_sub(1),
                KeyCode::Down | KeyCode::Char('j') => {
                    *selected = (*selected + 1).min(options.len().saturating_sub(1));
                }
                KeyCode::Enter | KeyCode::Char(' ') => {
                    let index = *selected;
                    self.choose(index);
                }
                _ => {}
            },
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let position = Position::new(mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(position),
            MouseEventKind::ScrollUp => self.handle_wheel(position, false),
            MouseEventKind::ScrollDown => self.handle_wheel(position, true),
            _ => {}
        }
    }

    fn handle_click(&mut self, position: Position) {
        if self.modal.is_some() {
            self.modal = None;
            return;
        }

        let target = self.hits.target_at(position).cloned();
        debug!("Click at {:?} -> {:?}", position, target);

        if self.editor.is_some() {
            if let Some(Target::Choice(index)) = target {
                self.choose(index);
                return;
            }
            self.close_editor();
        }

        match target {
            Some(Target::Search) => self.set_focus(Focus::Search),
            Some(Target::Save) => {
                self.set_focus(Focus::Save);
                self.save();
            }
            Some(Target::Checkbox(index)) => {
                self.set_focus(Focus::Columns);
                self.column_focus = index;
                self.toggle_column_at(index);
            }
            Some(Target::Header(column_id)) => {
                self.set_focus(Focus::Table);
                self.sort_by(&column_id);
            }
            Some(Target::Cell { row, col }) => {
                self.set_focus(Focus::Table);
                self.cursor_row = row;
                self.cursor_col = col;
                self.clamp_cursor();
                self.edit_cursor_cell();
            }
            Some(Target::Choice(_)) | None => {}
        }
    }

    fn handle_wheel(&mut self, position: Position, down: bool) {
        if self.modal.is_some() || !self.regions().body.contains(position) {
            return;
        }

        let rows = self.config.scroll_wheel_rows;
        let content = derive(&self.dataset, &self.state).rows.len();
        let metrics = ScrollMetrics::new(self.scroll, self.viewport(), content);

        self.scroll = if down {
            self.scroll.saturating_add(rows).min(metrics.max_offset())
        } else {
            self.scroll.saturating_sub(rows)
        };

        // Keep the cursor on screen
        let last_visible = (self.scroll + self.viewport()).saturating_sub(1);
        self.cursor_row = self
            .cursor_row
            .clamp(self.scroll, last_visible.max(self.scroll));
        self.clamp_cursor();
        self.reveal_if_near_end();
    }

    // =========================================================================
    // Grid operations
    // =========================================================================

    fn move_cursor(&mut self, rows: isize, cols: isize) {
        self.cursor_row = self.cursor_row.saturating_add_signed(rows);
        self.cursor_col = self.cursor_col.saturating_add_signed(cols);
        self.clamp_cursor();
        self.scroll_to_cursor();
        self.reveal_if_near_end();
    }

    /// Keeps the cursor inside the derived view.
    fn clamp_cursor(&mut self) {
        let view = derive(&self.dataset, &self.state);
        self.cursor_row = self.cursor_row.min(view.rows.len().saturating_sub(1));
        self.cursor_col = self.cursor_col.min(view.columns.len().saturating_sub(1));

        let metrics = ScrollMetrics::new(self.scroll, self.viewport(), view.rows.len());
        self.scroll = self.scroll.min(metrics.max_offset());
        self.col_offset = self.col_offset.min(self.cursor_col);

        // Shift columns left until the cursor column fits on screen
        let widths: Vec<usize> = view
            .columns
            .iter()
            .map(|column| self.config.column_width(column) as usize + 1)
            .collect();
        let screen = self.size.0 as usize;
        while self.col_offset < self.cursor_col
            && widths[self.col_offset..=self.cursor_col].iter().sum::<usize>() > screen
        {
            self.col_offset += 1;
        }
    }

    fn scroll_to_cursor(&mut self) {
        let viewport = self.viewport().max(1);
        if self.cursor_row < self.scroll {
            self.scroll = self.cursor_row;
        } else if self.cursor_row >= self.scroll + viewport {
            self.scroll = self.cursor_row + 1 - viewport;
        }
    }

    /// Grows the reveal count while the body is within the scroll threshold
    /// of its end and more rows match.
    fn reveal_if_near_end(&mut self) {
        let step = self.config.reveal_step.max(1);
        loop {
            let (near_end, has_more) = {
                let view = derive(&self.dataset, &self.state);
                let metrics = ScrollMetrics::new(self.scroll, self.viewport(), view.rows.len());
                (metrics.is_near_end(self.config.scroll_threshold), view.has_more())
            };
            if !(near_end && has_more) {
                break;
            }
            self.state.grow_reveal(step);
        }
    }

    fn sort_by(&mut self, column_id: &str) {
        self.state.set_sort(column_id);
        self.message = Some(format!(
            "Sorted by {} {}",
            column_id,
            self.state.sort_order()
        ));
    }

    fn sort_cursor_column(&mut self) {
        let column_id = {
            let view = derive(&self.dataset, &self.state);
            view.columns.get(self.cursor_col).map(|column| column.id.clone())
        };
        if let Some(column_id) = column_id {
            self.sort_by(&column_id);
        }
    }

    /// Toggles the visibility of the dataset column at `index`.
    fn toggle_column_at(&mut self, index: usize) {
        let Some(column_id) = self.dataset.columns().get(index).map(|c| c.id.clone()) else {
            return;
        };
        self.state.toggle_column_visibility(&column_id);
        self.clamp_cursor();
    }

    /// Primes the cursor cell and opens the editor matching its column type.
    fn edit_cursor_cell(&mut self) {
        let cell = {
            let view = derive(&self.dataset, &self.state);
            match (view.rows.get(self.cursor_row), view.columns.get(self.cursor_col)) {
                (Some(row), Some(column)) => CellName::new(row.id(), column.id.as_str()),
                _ => return,
            }
        };
        self.open_editor(cell);
    }

    fn open_editor(&mut self, cell: CellName) {
        let Some(column) = self.dataset.column(&cell.column_id) else {
            return;
        };
        let Some(row) = self.dataset.row(&cell.row_id) else {
            return;
        };

        let kind = match Control::for_column(&self.dataset, column) {
            Control::None => {
                self.message = Some(format!("{} cannot be edited", column.title));
                return;
            }
            Control::Select(options) if options.is_empty() => {
                self.message = Some(format!("{} has no options", column.title));
                return;
            }
            Control::Select(options) => {
                let current = self.state.prime_edit(row, &cell.column_id);
                let selected = options
                    .iter()
                    .position(|choice| choice.value == current)
                    .unwrap_or(0);
                EditorKind::Choice { options, selected }
            }
            Control::Text => {
                let current = self.state.prime_edit(row, &cell.column_id);
                EditorKind::Text(LineInput::new(current.to_display_string()))
            }
        };

        debug!("Editing cell {}", cell);
        self.message = Some(format!("Editing {}", cell.name()));
        self.editor = Some(Editor { cell, kind });
    }

    fn close_editor(&mut self) {
        if let Some(editor) = self.editor.take() {
            debug!("Closed editor for {}", editor.cell);
            self.message = None;
        }
    }

    /// Commits a choice from the open choice editor and closes it.
    fn choose(&mut self, index: usize) {
        let Some(editor) = self.editor.take() else {
            return;
        };
        self.message = None;

        match editor.kind {
            EditorKind::Choice { options, .. } => match options.into_iter().nth(index) {
                Some(choice) => {
                    let cell = editor.cell;
                    self.state
                        .record_edit(&cell.row_id, &cell.column_id, choice.value);
                }
                None => warn!("No option {} for cell {}", index, editor.cell),
            },
            EditorKind::Text(_) => {}
        }
    }

    /// Writes the view state snapshot and acknowledges it.
    pub fn save(&mut self) {
        match self.state.snapshot(self.store.as_ref()) {
            Ok(_) => {
                self.message = Some("Saved".to_string());
                self.modal = Some(Modal::new(
                    "Saved",
                    vec!["Data saved to session storage!".to_string()],
                ));
            }
            Err(e) => {
                warn!("Failed to save view state: {}", e);
                self.message = Some(format!("Save failed: {}", e));
            }
        }
    }

    /// Opens a dialog with the last saved snapshot.
    fn show_snapshot(&mut self) {
        let json = Snapshot::load(self.store.as_ref()).and_then(|snapshot| {
            snapshot.map(|snapshot| snapshot.to_pretty_json()).transpose()
        });

        match json {
            Ok(Some(json)) => {
                let lines = json.lines().map(str::to_string).collect();
                self.modal = Some(Modal::new("Saved view state", lines));
            }
            Ok(None) => self.message = Some("Nothing saved yet".to_string()),
            Err(e) => {
                warn!("Failed to read view state: {}", e);
                self.message = Some(format!("Read failed: {}", e));
            }
        }
    }
}
