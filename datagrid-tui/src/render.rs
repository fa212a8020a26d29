//! Draws the grid with ratatui widgets.
//!
//! Screen layout, top to bottom:
//!
//! ```text
//! Search: [query         ]  [ Save ]
//! [x] Name  [x] Age  [ ] Notes
//! Name ▲         Age
//! Amy            25
//! Bob            30
//! 2 of 2 rows | sort: name asc | 0 edits
//! ```
//!
//! Drawing also records a [`HitMap`] so clicks can be resolved against the
//! frame the user actually saw.

use datagrid_lib::model::Column;
use datagrid_lib::view::{DerivedView, derive};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, List, ListItem, ListState, Padding, Paragraph};

use crate::app::{EditorKind, Focus, GridApp};
use crate::controls::cell_text;
use crate::input::LineInput;

const SEARCH_LABEL: &str = "Search: ";
const SEARCH_WIDTH: u16 = 30;
const SAVE_LABEL: &str = "[ Save ]";
const OK_LABEL: &str = "[ OK ]";

const HEADER: Style = Style::new().add_modifier(Modifier::BOLD.union(Modifier::UNDERLINED));
const SEARCH_BOX: Style = Style::new().add_modifier(Modifier::UNDERLINED);
const SELECTED: Style = Style::new().add_modifier(Modifier::REVERSED);
const BUTTON: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
const EDITED: Style = Style::new().fg(Color::Yellow);
const MUTED: Style = Style::new().fg(Color::DarkGray);
const POPUP: Style = Style::new().bg(Color::Blue).fg(Color::White);

/// Fixed screen regions for a terminal area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub toolbar: Rect,
    pub columns_bar: Rect,
    pub header: Rect,
    pub body: Rect,
    pub status: Rect,
}

impl Regions {
    pub fn new(area: Rect) -> Self {
        let [toolbar, columns_bar, header, body, status] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        Self {
            toolbar,
            columns_bar,
            header,
            body,
            status,
        }
    }
}

/// What a screen region activates when clicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Search,
    Save,
    /// Visibility checkbox, by index into the dataset's columns
    Checkbox(usize),
    /// Header cell, by column id
    Header(String),
    /// Body cell, by row and column index into the derived view
    Cell { row: usize, col: usize },
    /// Option of the open choice editor
    Choice(usize),
}

/// Clickable regions of one frame, in draw order.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    regions: Vec<(Rect, Target)>,
}

impl HitMap {
    pub fn push(&mut self, area: Rect, target: Target) {
        if !area.is_empty() {
            self.regions.push((area, target));
        }
    }

    /// Topmost target at a position. Later regions draw over earlier ones.
    pub fn target_at(&self, position: Position) -> Option<&Target> {
        self.regions
            .iter()
            .rev()
            .find(|(area, _)| area.contains(position))
            .map(|(_, target)| target)
    }
}

/// Horizontal placement of one visible column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnSpan {
    index: usize,
    x: u16,
    width: u16,
}

fn column_spans(app: &GridApp, columns: &[&Column], area: Rect) -> Vec<ColumnSpan> {
    let mut spans = Vec::new();
    let mut x = area.x;

    for (index, column) in columns.iter().enumerate().skip(app.col_offset()) {
        if x >= area.right() {
            break;
        }
        let width = app.config().column_width(column).min(area.right() - x);
        spans.push(ColumnSpan { index, x, width });
        x = x.saturating_add(width).saturating_add(1);
    }

    spans
}

/// Collapses line breaks and tabs so a value stays on its row.
fn one_line(text: &str) -> String {
    text.replace(['\n', '\r', '\t'], " ")
}

/// Draws a full frame and returns its clickable regions.
pub fn draw(app: &GridApp, frame: &mut Frame<'_>) -> HitMap {
    let regions = Regions::new(frame.area());
    let view = derive(app.dataset(), app.state());
    let spans = column_spans(app, &view.columns, regions.body);
    let mut hits = HitMap::default();

    draw_toolbar(app, frame, regions.toolbar, &mut hits);
    draw_columns_bar(app, frame, regions.columns_bar, &mut hits);
    draw_header(app, &view, &spans, frame, regions.header, &mut hits);
    draw_body(app, &view, &spans, frame, regions.body, &mut hits);

    frame.render_widget(
        Paragraph::new(status_text(app, &view)).style(MUTED),
        regions.status,
    );

    if app.editor().is_some() {
        draw_editor(app, &spans, frame, regions.body, &mut hits);
    }
    if app.modal().is_some() {
        draw_modal(app, frame);
    }

    hits
}

/// Renders a line input into `area`, keeping its cursor in view.
fn draw_input(frame: &mut Frame<'_>, input: &LineInput, area: Rect, style: Style, focused: bool) {
    if area.is_empty() {
        return;
    }
    let skip = input.cursor().saturating_sub(area.width as usize - 1);
    let visible: String = one_line(input.text()).chars().skip(skip).collect();
    frame.render_widget(Paragraph::new(visible).style(style), area);

    if focused {
        let x = area.x + (input.cursor() - skip) as u16;
        frame.set_cursor_position(Position::new(x, area.y));
    }
}

fn draw_toolbar(app: &GridApp, frame: &mut Frame<'_>, area: Rect, hits: &mut HitMap) {
    let focus = app.focus();
    let label_width = (SEARCH_LABEL.len() as u16).min(area.width);
    frame.render_widget(
        Paragraph::new(SEARCH_LABEL),
        Rect {
            width: label_width,
            ..area
        },
    );

    let search = Rect::new(
        area.x + label_width,
        area.y,
        SEARCH_WIDTH.min(area.width - label_width),
        1,
    );
    let style = if focus == Focus::Search {
        SEARCH_BOX.fg(Color::Cyan)
    } else {
        SEARCH_BOX
    };
    let search_focused = focus == Focus::Search && app.editor().is_none();
    draw_input(frame, app.search(), search, style, search_focused);
    hits.push(search, Target::Search);

    let save_x = search.right().saturating_add(2);
    if save_x < area.right() {
        let save = Rect::new(
            save_x,
            area.y,
            (SAVE_LABEL.len() as u16).min(area.right() - save_x),
            1,
        );
        let style = if focus == Focus::Save {
            BUTTON.patch(SELECTED)
        } else {
            BUTTON
        };
        frame.render_widget(Paragraph::new(SAVE_LABEL).style(style), save);
        hits.push(save, Target::Save);
    }
}

fn draw_columns_bar(app: &GridApp, frame: &mut Frame<'_>, area: Rect, hits: &mut HitMap) {
    let mut x = area.x;
    let mut labels = Vec::new();

    for (index, column) in app.dataset().columns().iter().enumerate() {
        if x >= area.right() {
            break;
        }
        let mark = if app.state().is_column_visible(&column.id) {
            'x'
        } else {
            ' '
        };
        let style = if app.focus() == Focus::Columns && app.column_focus() == index {
            SELECTED
        } else {
            Style::new()
        };
        let label = Span::styled(format!("[{}] {}", mark, one_line(&column.title)), style);

        let width = (label.width() as u16).min(area.right() - x);
        hits.push(Rect::new(x, area.y, width, 1), Target::Checkbox(index));
        x = x.saturating_add(width).saturating_add(2);

        labels.push(label);
        labels.push(Span::raw("  "));
    }

    frame.render_widget(Paragraph::new(Line::from(labels)), area);
}

fn draw_header(
    app: &GridApp,
    view: &DerivedView<'_>,
    spans: &[ColumnSpan],
    frame: &mut Frame<'_>,
    area: Rect,
    hits: &mut HitMap,
) {
    for span in spans {
        let column = view.columns[span.index];
        let mut title = one_line(&column.title);
        if app.state().sort_key() == Some(column.id.as_str()) {
            title.push(' ');
            title.push(app.state().sort_order().indicator());
        }

        let cell = Rect::new(span.x, area.y, span.width, 1);
        frame.render_widget(Paragraph::new(title).style(HEADER), cell);
        hits.push(cell, Target::Header(column.id.clone()));
    }
}

fn draw_body(
    app: &GridApp,
    view: &DerivedView<'_>,
    spans: &[ColumnSpan],
    frame: &mut Frame<'_>,
    area: Rect,
    hits: &mut HitMap,
) {
    if view.rows.is_empty() {
        frame.render_widget(Paragraph::new("No matching rows").style(MUTED), area);
        return;
    }

    let cursor = app.cursor();
    let rows = view
        .rows
        .iter()
        .enumerate()
        .skip(app.scroll())
        .take(area.height as usize);

    for (y, (row_index, row)) in (area.y..).zip(rows) {
        for span in spans {
            let column = view.columns[span.index];
            let cell = Rect::new(span.x, y, span.width, 1);
            hits.push(
                cell,
                Target::Cell {
                    row: row_index,
                    col: span.index,
                },
            );

            let Some(text) = cell_text(column, row.cells[span.index]) else {
                continue;
            };
            let mut style = if app.state().edits().contains(row.id(), &column.id) {
                EDITED
            } else {
                Style::new()
            };
            if app.focus() == Focus::Table && (row_index, span.index) == cursor {
                style = style.patch(SELECTED);
            }
            frame.render_widget(Paragraph::new(one_line(&text)).style(style), cell);
        }
    }
}

/// Text of the status line.
pub fn status_text(app: &GridApp, view: &DerivedView<'_>) -> String {
    let mut parts = vec![if view.matched == view.total {
        format!("{} of {} rows", view.rows.len(), view.total)
    } else {
        format!(
            "{} of {} matching ({} total)",
            view.rows.len(),
            view.matched,
            view.total
        )
    }];

    if let Some(key) = app.state().sort_key() {
        parts.push(format!("sort: {} {}", key, app.state().sort_order()));
    }
    parts.push(format!("{} edits", app.state().edits().len()));
    if let Some(message) = app.message() {
        parts.push(message.to_string());
    }

    parts.join(" | ")
}

fn draw_editor(
    app: &GridApp,
    spans: &[ColumnSpan],
    frame: &mut Frame<'_>,
    body: Rect,
    hits: &mut HitMap,
) {
    let Some(editor) = app.editor() else { return };
    let (cursor_row, cursor_col) = app.cursor();
    let Some(span) = spans.iter().find(|span| span.index == cursor_col) else {
        return;
    };
    let Some(offset) = cursor_row.checked_sub(app.scroll()) else {
        return;
    };
    if offset >= body.height as usize {
        return;
    }
    let y = body.y + offset as u16;

    match &editor.kind {
        EditorKind::Text(input) => {
            draw_input(frame, input, Rect::new(span.x, y, span.width, 1), POPUP, true);
        }
        EditorKind::Choice { options, selected } => {
            let width = options
                .iter()
                .map(|choice| Span::raw(choice.label.as_str()).width() as u16 + 2)
                .max()
                .unwrap_or(0)
                .max(span.width)
                .min(body.right() - span.x);

            // Below the cell when it fits, otherwise above
            let height = options.len() as u16;
            let top = if y + 1 + height <= body.bottom() {
                y + 1
            } else {
                y.saturating_sub(height)
            };
            let popup = Rect::new(span.x, top, width, height).intersection(frame.area());

            let items: Vec<ListItem> = options
                .iter()
                .map(|choice| ListItem::new(choice.label.as_str()))
                .collect();
            let list = List::new(items)
                .style(POPUP)
                .highlight_style(POPUP.patch(SELECTED))
                .highlight_symbol("> ");
            let mut state = ListState::default().with_selected(Some(*selected));

            frame.render_widget(Clear, popup);
            frame.render_stateful_widget(list, popup, &mut state);

            for (i, row_y) in (popup.y..popup.bottom()).enumerate() {
                hits.push(Rect::new(popup.x, row_y, popup.width, 1), Target::Choice(i));
            }
        }
    }
}

fn draw_modal(app: &GridApp, frame: &mut Frame<'_>) {
    let Some(modal) = app.modal() else { return };
    let area = frame.area();

    let mut lines: Vec<Line> = modal.lines.iter().map(|line| Line::raw(line.as_str())).collect();
    lines.push(Line::default());
    lines.push(Line::styled(OK_LABEL, SELECTED).centered());

    let content_width = lines
        .iter()
        .map(Line::width)
        .chain([modal.title.len()])
        .max()
        .unwrap_or(0) as u16;
    let width = (content_width + 4).min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let block = Block::bordered()
        .title(Line::styled(modal.title.as_str(), POPUP.add_modifier(Modifier::BOLD)))
        .padding(Padding::horizontal(1))
        .style(POPUP);

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
