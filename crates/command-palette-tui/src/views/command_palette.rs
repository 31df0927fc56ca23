use command_palette::Display;
use ratatui::{
    layout::{Constraint, Direction, Layout, Margin, Rect},
    prelude::*,
    widgets::*,
};

use crate::App;
use crate::view_models::command_palette::CommandPaletteViewModel;

/// Where the palette ended up on screen, for mouse hit tests
#[derive(Debug, Clone, Default)]
pub struct PaletteLayout {
    pub area: Rect,
    /// (row area, suggestion index)
    pub rows: Vec<(Rect, usize)>,
}

/// Render the command palette
///
/// In modal display the palette is a centered popup over `area`; inline
/// it fills `area` directly.
pub fn render_command_palette(f: &mut Frame, area: Rect, app: &App) -> PaletteLayout {
    let state = app.store.state();
    let palette = &state.palette;
    let theme = &state.theme;

    let header_height = u16::from(palette.header().is_some());
    let list_height = palette.config().max_displayed.max(1) as u16;
    // border + input box + header + list + loading line + footer + border
    let wanted_height = 2 + 3 + header_height + list_height + 1 + 1;

    let palette_area = match palette.display() {
        Display::Modal => {
            let width = modal_width(area.width);
            let height = wanted_height.min(area.height);
            Rect {
                x: area.x + area.width.saturating_sub(width) / 2,
                y: area.y + area.height.saturating_sub(height) / 2,
                width,
                height,
            }
        }
        Display::Inline => Rect {
            height: wanted_height.min(area.height),
            ..area
        },
    };

    if palette.display() == Display::Modal {
        f.render_widget(Clear, palette_area);
    }

    let inner = palette_area.inner(Margin {
        horizontal: 1,
        vertical: 1,
    });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Input box
            Constraint::Length(header_height), // Header
            Constraint::Min(1),                // Suggestions
            Constraint::Length(1),             // Loading indicator
            Constraint::Length(1),             // Footer
        ])
        .split(inner);

    let vm = CommandPaletteViewModel::from_palette(
        palette,
        state.ui.spinner_frame,
        chunks[2].height as usize,
        theme,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Commands ({}) ", vm.total_suggestions))
        .title_style(theme.panel_border())
        .border_style(theme.panel_border())
        .style(Style::default().bg(theme.bg_panel));
    f.render_widget(block, palette_area);

    render_input(f, chunks[0], &vm, app);

    if let Some(ref header) = vm.header {
        f.render_widget(
            Paragraph::new(header.as_str()).style(
                Style::default()
                    .fg(theme.text_secondary)
                    .add_modifier(Modifier::BOLD),
            ),
            chunks[1],
        );
    }

    let rows = render_suggestions(f, chunks[2], &vm, app);

    if let Some(ref loading) = vm.loading_text {
        f.render_widget(
            Paragraph::new(loading.as_str()).style(Style::default().fg(theme.accent_secondary)),
            chunks[3],
        );
    }

    let footer_line = Line::from(vec![
        Span::styled("Enter", theme.key_hint()),
        Span::styled(" run  ", theme.muted()),
        Span::styled("↑/↓", theme.key_hint()),
        Span::styled(" navigate  ", theme.muted()),
        Span::styled("Tab", theme.key_hint()),
        Span::styled(" focus  ", theme.muted()),
        Span::styled("Esc", theme.key_hint()),
        Span::styled(" close", theme.muted()),
    ]);
    f.render_widget(
        Paragraph::new(footer_line).alignment(Alignment::Center),
        chunks[4],
    );

    PaletteLayout {
        area: palette_area,
        rows,
    }
}

/// 70% of the screen, at least 30 columns (when available), at most 90
fn modal_width(screen_width: u16) -> u16 {
    let seventy_percent = (u32::from(screen_width) * 70 / 100) as u16;
    seventy_percent.clamp(30u16.min(screen_width), 90)
}

fn render_input(f: &mut Frame, area: Rect, vm: &CommandPaletteViewModel, app: &App) {
    let theme = &app.store.state().theme;

    let text_style = if vm.input_is_placeholder {
        theme.muted()
    } else {
        Style::default().fg(theme.text_primary)
    };
    let border_style = if vm.input_focused {
        Style::default().fg(theme.accent_primary)
    } else {
        theme.muted()
    };

    let mut spans = vec![
        Span::styled("> ", theme.key_hint()),
        Span::styled(vm.input_text.clone(), text_style),
    ];
    if vm.input_focused {
        spans.push(Span::styled("▏", Style::default().fg(theme.accent_primary)));
    }

    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Style::default().bg(theme.bg_secondary)),
    );
    f.render_widget(input, area);
}

/// Render the visible suggestion rows, returning each row's area
fn render_suggestions(
    f: &mut Frame,
    area: Rect,
    vm: &CommandPaletteViewModel,
    app: &App,
) -> Vec<(Rect, usize)> {
    let theme = &app.store.state().theme;

    if vm.visible_rows.is_empty() {
        f.render_widget(
            Paragraph::new("No commands")
                .style(theme.muted())
                .alignment(Alignment::Center),
            area,
        );
        return Vec::new();
    }

    let mut rows = Vec::with_capacity(vm.visible_rows.len());

    for (offset, row) in vm.visible_rows.iter().enumerate() {
        let row_area = Rect {
            y: area.y + offset as u16,
            height: 1,
            ..area
        };
        if row_area.y >= area.bottom() {
            break;
        }

        let base = Style::default().fg(row.fg_color).bg(row.bg_color);
        let base = if row.is_selected {
            base.add_modifier(Modifier::BOLD)
        } else {
            base
        };

        let mut spans = vec![Span::styled(row.indicator.clone(), base)];
        spans.extend(row.name_segments.iter().map(|segment| {
            if segment.matched {
                Span::styled(
                    segment.text.clone(),
                    base.fg(theme.match_fg).add_modifier(Modifier::UNDERLINED),
                )
            } else {
                Span::styled(segment.text.clone(), base)
            }
        }));

        let hint_style = if row.is_selected {
            base
        } else {
            theme.muted()
        };
        let right = Line::from(vec![
            Span::styled(row.shortcut.clone(), hint_style),
            Span::styled(" ", base),
            Span::styled(row.category.clone(), hint_style),
        ])
        .alignment(Alignment::Right);

        f.render_widget(Block::default().style(base), row_area);
        f.render_widget(Paragraph::new(Line::from(spans)), row_area);
        f.render_widget(Paragraph::new(right), row_area);

        rows.push((row_area, row.index));
    }

    rows
}
