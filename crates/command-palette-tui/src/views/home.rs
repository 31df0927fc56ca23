use command_palette::Display;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::*,
};

use crate::App;
use crate::state::LayoutState;

const TRIGGER_LABEL: &str = "[ Open palette ]";

/// Render the whole screen and report where the clickable parts went
pub fn render(f: &mut Frame, app: &App) -> LayoutState {
    let state = app.store.state();
    let theme = &state.theme;
    let palette = &state.palette;

    f.render_widget(
        Block::default().style(Style::default().bg(theme.bg_primary)),
        f.area(),
    );

    let inline_open = palette.is_open() && palette.display() == Display::Inline;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Counter
            Constraint::Length(1), // Trigger button
            Constraint::Min(3),    // Activity (or inline palette)
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    render_counter(f, chunks[0], app);
    let trigger_button = render_trigger_button(f, chunks[1], app);

    let mut layout = LayoutState {
        trigger_button,
        ..Default::default()
    };

    if inline_open {
        let placed = crate::views::command_palette::render_command_palette(f, chunks[2], app);
        let rest = Rect {
            y: placed.area.bottom(),
            height: chunks[2].bottom().saturating_sub(placed.area.bottom()),
            ..chunks[2]
        };
        render_activity(f, rest, app);
        layout.palette_area = Some(placed.area);
        layout.suggestion_rows = placed.rows;
    } else {
        render_activity(f, chunks[2], app);
    }

    render_status_line(f, chunks[3], app);
    render_footer(f, chunks[4], app);

    if palette.is_open() && palette.display() == Display::Modal {
        let placed = crate::views::command_palette::render_command_palette(f, f.area(), app);
        layout.palette_area = Some(placed.area);
        layout.suggestion_rows = placed.rows;
    }

    layout
}

fn render_counter(f: &mut Frame, area: Rect, app: &App) {
    let state = app.store.state();
    let theme = &state.theme;

    let line = Line::from(vec![
        Span::styled("Counter: ", Style::default().fg(theme.text_secondary)),
        Span::styled(
            state.counter.to_string(),
            Style::default()
                .fg(theme.text_primary)
                .add_modifier(Modifier::BOLD),
        ),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" command-palette ")
        .title_style(theme.panel_border())
        .border_style(Style::default().fg(theme.accent_primary));

    f.render_widget(Paragraph::new(line).block(block), area);
}

/// Returns the button's area for click detection
fn render_trigger_button(f: &mut Frame, area: Rect, app: &App) -> Rect {
    let theme = &app.store.state().theme;

    let button_area = Rect {
        x: area.x + 1,
        width: (TRIGGER_LABEL.len() as u16).min(area.width.saturating_sub(1)),
        ..area
    };
    f.render_widget(
        Paragraph::new(TRIGGER_LABEL).style(theme.button()),
        button_area,
    );

    button_area
}

fn render_activity(f: &mut Frame, area: Rect, app: &App) {
    if area.height == 0 {
        return;
    }

    let state = app.store.state();
    let theme = &state.theme;

    let visible_height = area.height.saturating_sub(2) as usize;
    let items: Vec<ListItem> = match state.activity.lock() {
        Ok(logs) => logs
            .iter()
            .skip(logs.len().saturating_sub(visible_height))
            .map(|entry| {
                let timestamp = entry.at.format("%H:%M:%S");
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{} ", timestamp), theme.muted()),
                    Span::styled(
                        format!("{:5} ", entry.level),
                        theme.log_level(entry.level),
                    ),
                    Span::styled(entry.message.clone(), Style::default().fg(theme.text_primary)),
                ]))
            })
            .collect(),
        Err(_) => Vec::new(),
    };

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Activity ")
            .border_style(theme.muted())
            .style(Style::default().bg(theme.bg_secondary)),
    );
    f.render_widget(list, area);
}

fn render_status_line(f: &mut Frame, area: Rect, app: &App) {
    let state = app.store.state();
    let theme = &state.theme;

    let line = if let Some(ref error) = state.ui.last_error {
        Line::from(Span::styled(format!(" Error: {}", error), theme.error()))
    } else if state.ui.tasks_running > 0 {
        Line::from(Span::styled(
            format!(" {} task(s) running", state.ui.tasks_running),
            Style::default().fg(theme.status_info),
        ))
    } else {
        Line::from(Span::styled(" Ready", theme.muted()))
    };

    f.render_widget(Paragraph::new(line), area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.store.state().theme;

    let hotkeys = app
        .store
        .state()
        .palette
        .hot_keys()
        .iter()
        .map(|chord| chord.to_string())
        .collect::<Vec<_>>()
        .join(" / ");

    let footer = Line::from(vec![
        Span::styled(hotkeys, theme.key_hint()),
        Span::styled(" or ", theme.muted()),
        Span::styled("o", theme.key_hint()),
        Span::styled(" palette  ", theme.muted()),
        Span::styled("+/-", theme.key_hint()),
        Span::styled(" counter  ", theme.muted()),
        Span::styled("q", theme.key_hint()),
        Span::styled(" quit", theme.muted()),
    ]);

    f.render_widget(
        Paragraph::new(footer).style(Style::default().bg(theme.bg_panel)),
        area,
    );
}
