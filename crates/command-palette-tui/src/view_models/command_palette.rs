use command_palette::{CommandPalette, Suggestion};
use ratatui::style::Color;

use crate::theme::Theme;

/// View model for command palette - all presentation data pre-computed
#[derive(Debug, Clone)]
pub struct CommandPaletteViewModel {
    /// Query text, or the placeholder when the query is empty
    pub input_text: String,
    pub input_is_placeholder: bool,
    pub input_focused: bool,
    pub header: Option<String>,
    /// Number of suggestions after filtering and the display cap
    pub total_suggestions: usize,
    /// Pre-computed visible rows with all formatting applied
    pub visible_rows: Vec<SuggestionRow>,
    /// "<frame> <command name>" while a command is pending
    pub loading_text: Option<String>,
}

/// A single row in the suggestion list
#[derive(Debug, Clone)]
pub struct SuggestionRow {
    /// Index into the palette's suggestions
    pub index: usize,
    pub is_selected: bool,
    /// Selection indicator: "> " or "  "
    pub indicator: String,
    /// Name split into runs of matched and unmatched text
    pub name_segments: Vec<NameSegment>,
    /// Category text with brackets: "[Category]", right aligned
    pub category: String,
    pub shortcut: String,
    pub fg_color: Color,
    pub bg_color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSegment {
    pub text: String,
    pub matched: bool,
}

impl CommandPaletteViewModel {
    /// Build view model from palette state
    pub fn from_palette(
        palette: &CommandPalette,
        spinner_tick: usize,
        visible_height: usize,
        theme: &Theme,
    ) -> Self {
        let suggestions = palette.suggestions();
        let total_suggestions = suggestions.len();
        let selected_index = palette.highlighted();

        let max_category_width = suggestions
            .iter()
            .filter_map(|s| s.command.category.as_ref())
            .map(|c| c.chars().count() + 2)
            .max()
            .unwrap_or(0);

        let scroll_offset = scroll_offset(selected_index, total_suggestions, visible_height);

        let visible_rows = suggestions
            .iter()
            .enumerate()
            .skip(scroll_offset)
            .take(visible_height)
            .map(|(index, suggestion)| {
                let is_selected = index == selected_index;

                let category = suggestion
                    .command
                    .category
                    .as_ref()
                    .map(|c| format!("[{}]", c))
                    .unwrap_or_default();

                let (fg_color, bg_color) = if is_selected {
                    (theme.selected_fg, theme.selected_bg)
                } else {
                    (theme.text_primary, Color::Reset)
                };

                SuggestionRow {
                    index,
                    is_selected,
                    indicator: if is_selected { "> " } else { "  " }.to_string(),
                    name_segments: name_segments(suggestion),
                    category: format!("{:>width$}", category, width = max_category_width),
                    shortcut: suggestion.command.shortcut.clone().unwrap_or_default(),
                    fg_color,
                    bg_color,
                }
            })
            .collect();

        let query = palette.query();
        let (input_text, input_is_placeholder) = if query.is_empty() {
            (palette.placeholder().to_string(), true)
        } else {
            (query.to_string(), false)
        };

        let loading_text = palette
            .pending()
            .map(|name| format!("{} {}", palette.spinner().frame(spinner_tick), name));

        Self {
            input_text,
            input_is_placeholder,
            input_focused: palette.input_focused(),
            header: palette.header().map(str::to_string),
            total_suggestions,
            visible_rows,
            loading_text,
        }
    }
}

/// Keep the selected row visible, centered when the list scrolls
fn scroll_offset(selected: usize, total: usize, visible_height: usize) -> usize {
    if total == 0 || visible_height == 0 {
        0
    } else if selected < visible_height / 2 {
        0
    } else if selected >= total.saturating_sub(visible_height / 2) {
        total.saturating_sub(visible_height)
    } else {
        selected.saturating_sub(visible_height / 2)
    }
}

/// Split the suggestion name at match boundaries
fn name_segments(suggestion: &Suggestion) -> Vec<NameSegment> {
    let mut segments: Vec<NameSegment> = Vec::new();
    let mut matched = suggestion.indices.iter().peekable();

    for (i, c) in suggestion.name().chars().enumerate() {
        let is_match = matched.next_if(|&&idx| idx as usize == i).is_some();
        match segments.last_mut() {
            Some(last) if last.matched == is_match => last.text.push(c),
            _ => segments.push(NameSegment {
                text: c.to_string(),
                matched: is_match,
            }),
        }
    }

    segments
}
