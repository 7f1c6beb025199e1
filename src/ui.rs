use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::app::App;
use crate::theme::Theme;

const IMAGE_WIDTH: usize = 30;
const HELP_TEXT: &str = "↑/k: Up • ↓/j: Down • g/G: Top/Bottom • s: Start • x: Stop • r: Refresh • q: Quit";

/// Draws the whole dashboard. Pure with respect to `app`: it only reads state.
pub fn render(frame: &mut Frame, app: &App, theme: &Theme) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_title(frame, root[0], app, theme);
    render_containers(frame, root[1], app, theme);
    render_status(frame, root[2], app, theme);
    frame.render_widget(
        Paragraph::new(HELP_TEXT).style(theme.help),
        root[3],
    );
}

fn render_title(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let counts = app.counts();
    let mut spans = vec![
        Span::styled(" dockhand ", theme.title),
        Span::raw(" "),
        Span::styled(compact_text(app.engine(), 40), theme.help),
        Span::raw("  "),
        Span::styled(format!("running {}", counts.running), theme.running),
        Span::raw(" "),
        Span::styled(format!("exited {}", counts.exited), theme.exited),
        Span::raw(" "),
        Span::styled(format!("other {}", counts.other), theme.other),
    ];
    if app.pending() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("⟳ loading", theme.help));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_containers(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let block = Block::default()
        .title(format!(" Containers ({}) ", app.records().len()))
        .borders(Borders::ALL)
        .border_style(theme.help);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let header = Row::new(
        ["ID", "IMAGE", "STATUS", "STATE"]
            .into_iter()
            .map(|title| Cell::from(title).style(theme.header)),
    )
    .height(1);

    let rows = app.records().iter().map(|record| {
        Row::new(vec![
            Cell::from(record.id.clone()),
            Cell::from(compact_text(&record.image, IMAGE_WIDTH)),
            Cell::from(record.status_text.clone()),
            Cell::from(Span::styled(
                record.state_tag.clone(),
                theme.state(record.state_class()),
            )),
        ])
        .style(theme.row)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(IMAGE_WIDTH as u16),
            Constraint::Min(20),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .column_spacing(1)
    .row_highlight_style(theme.selected)
    .highlight_symbol("> ");

    let mut state = TableState::default();
    state.select(app.selected().map(|_| app.cursor()));
    frame.render_stateful_widget(table, inner, &mut state);

    if app.records().is_empty() {
        let text = if app.pending() {
            "Loading containers..."
        } else {
            "No containers found."
        };
        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);
        frame.render_widget(Paragraph::new(text), body[1]);
    }
}

fn render_status(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let style: Style = if app.last_error().is_some() && !app.pending() {
        theme.error
    } else {
        theme.status
    };
    frame.render_widget(Paragraph::new(app.status()).style(style), area);
}

fn compact_text(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }

    if max_chars <= 1 {
        return "…".to_string();
    }

    let mut out = value
        .chars()
        .take(max_chars.saturating_sub(1))
        .collect::<String>();
    out.push('…');
    out
}
