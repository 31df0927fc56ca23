//! Fuzzy search functionality for commands

use nucleo_matcher::{
    pattern::{AtomKind, CaseMatching, Normalization, Pattern},
    Config, Matcher, Utf32Str,
};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::command::{Command, Suggestion};

/// How query case is compared against command text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseSensitivity {
    #[default]
    Ignore,
    /// Case-sensitive only when the query contains an uppercase letter
    Smart,
    Respect,
}

impl From<CaseSensitivity> for CaseMatching {
    fn from(value: CaseSensitivity) -> Self {
        match value {
            CaseSensitivity::Ignore => CaseMatching::Ignore,
            CaseSensitivity::Smart => CaseMatching::Smart,
            CaseSensitivity::Respect => CaseMatching::Respect,
        }
    }
}

/// Strictness of each whitespace-separated query token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    #[default]
    Fuzzy,
    Substring,
    Prefix,
    Exact,
}

impl From<MatchKind> for AtomKind {
    fn from(value: MatchKind) -> Self {
        match value {
            MatchKind::Fuzzy => AtomKind::Fuzzy,
            MatchKind::Substring => AtomKind::Substring,
            MatchKind::Prefix => AtomKind::Prefix,
            MatchKind::Exact => AtomKind::Exact,
        }
    }
}

/// Command fields the matcher searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKey {
    Name,
    Category,
    Shortcut,
}

/// What a non-empty query that matches nothing should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchPolicy {
    /// Fall back to the full (capped) command list
    #[default]
    ShowAll,
    /// Show an empty list
    Empty,
}

/// Scoring configuration handed through to the matcher
///
/// Every field has a default, so a config file only needs to name the
/// knobs it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchOptions {
    pub case_matching: CaseSensitivity,

    /// Fold accented characters to their ASCII base before matching
    pub normalize: bool,

    /// Favour matches that start near the beginning of the text
    pub prefer_prefix: bool,

    pub kind: MatchKind,

    /// Matches whose raw fuzzy score is below this are dropped
    pub min_score: u32,

    /// Added when the name equals the query (case-insensitive)
    pub exact_boost: u32,

    /// Added when the name starts with the query (case-insensitive)
    pub prefix_boost: u32,

    /// Added when the name contains the query (case-insensitive)
    pub contains_boost: u32,

    pub keys: Vec<SearchKey>,

    pub no_match: NoMatchPolicy,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            case_matching: CaseSensitivity::default(),
            normalize: true,
            prefer_prefix: true,
            kind: MatchKind::default(),
            min_score: 0,
            exact_boost: 20000,
            prefix_boost: 10000,
            contains_boost: 1000,
            keys: vec![SearchKey::Name],
            no_match: NoMatchPolicy::default(),
        }
    }
}

/// Filter and score commands based on a search query
///
/// Uses nucleo-matcher's fuzzy matching algorithm (same as Helix/Zed).
/// Each whitespace-separated token of the query has to match.
///
/// # Arguments
///
/// * `commands` - All available commands to search through
/// * `query` - The search query string
/// * `options` - Scoring configuration
/// * `limit` - Maximum number of suggestions to return
///
/// # Returns
///
/// Suggestions sorted by relevance (highest score first, ties in input
/// order), truncated to `limit`. An empty query returns all commands in
/// input order with score 0; so does a query without matches unless
/// `options.no_match` says otherwise.
pub fn filter_commands(
    commands: &[Command],
    query: &str,
    options: &MatchOptions,
    limit: usize,
) -> Vec<Suggestion> {
    let query = query.trim();

    // Empty query - return all commands
    if query.is_empty() {
        return show_all(commands, limit);
    }

    let mut config = Config::DEFAULT;
    config.prefer_prefix = options.prefer_prefix;
    let mut matcher = Matcher::new(config);

    let normalization = if options.normalize {
        Normalization::Smart
    } else {
        Normalization::Never
    };
    let pattern = Pattern::new(
        query,
        options.case_matching.into(),
        normalization,
        options.kind.into(),
    );

    // Reusable buffers (avoid allocating per command)
    let mut haystack_buf = Vec::new();
    let mut indices = Vec::new();

    let query_lower = query.to_lowercase();
    let name_first = options.keys.first() == Some(&SearchKey::Name);

    let mut results: Vec<Suggestion> = commands
        .iter()
        .filter_map(|cmd| {
            let haystack = cmd.searchable_text(&options.keys);

            indices.clear();
            let score = pattern.indices(
                Utf32Str::new(&haystack, &mut haystack_buf),
                &mut matcher,
                &mut indices,
            )?;

            if score < options.min_score {
                return None;
            }

            // Indices past the name belong to other keys
            let name_indices = if name_first {
                indices.sort_unstable();
                indices.dedup();
                let offsets = grapheme_char_offsets(&cmd.name);
                indices
                    .iter()
                    .filter_map(|&i| offsets.get(i as usize).copied())
                    .collect()
            } else {
                Vec::new()
            };

            Some(Suggestion {
                command: cmd.clone(),
                score: score.saturating_add(name_boost(&cmd.name, &query_lower, options)),
                indices: name_indices,
            })
        })
        .collect();

    if results.is_empty() {
        return match options.no_match {
            NoMatchPolicy::ShowAll => show_all(commands, limit),
            NoMatchPolicy::Empty => Vec::new(),
        };
    }

    // Stable sort keeps input order among equal scores
    results.sort_by(|a, b| b.score.cmp(&a.score));
    results.truncate(limit);

    results
}

fn show_all(commands: &[Command], limit: usize) -> Vec<Suggestion> {
    commands
        .iter()
        .take(limit)
        .cloned()
        .map(Suggestion::unscored)
        .collect()
}

/// Char offset where each grapheme of `name` starts
///
/// nucleo folds non-ASCII text into one char per grapheme, so its match
/// indices count graphemes; this maps them back to char positions.
fn grapheme_char_offsets(name: &str) -> Vec<u32> {
    let mut offset = 0u32;
    name.graphemes(true)
        .map(|grapheme| {
            let start = offset;
            offset += grapheme.chars().count() as u32;
            start
        })
        .collect()
}

/// Boost so that exact and prefix hits on the name rank above scattered
/// fuzzy hits
fn name_boost(name: &str, query_lower: &str, options: &MatchOptions) -> u32 {
    let name_lower = name.to_lowercase();

    if name_lower == query_lower {
        options.exact_boost
    } else if name_lower.starts_with(query_lower) {
        options.prefix_boost
    } else if name_lower.contains(query_lower) {
        options.contains_boost
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 500;

    fn create_test_commands() -> Vec<Command> {
        vec![
            Command::new("Open File", || {})
                .with_category("File")
                .with_shortcut("Ctrl+O"),
            Command::new("Save File", || {})
                .with_category("File")
                .with_shortcut("Ctrl+S"),
            Command::new("Close Window", || {})
                .with_category("Window")
                .with_shortcut("Ctrl+W"),
            Command::new("Toggle Sidebar", || {}).with_category("View"),
        ]
    }

    fn names(results: &[Suggestion]) -> Vec<&str> {
        results.iter().map(|s| s.name()).collect()
    }

    #[test]
    fn test_empty_query_returns_all() {
        let commands = create_test_commands();
        let results = filter_commands(&commands, "", &MatchOptions::default(), LIMIT);
        assert_eq!(results.len(), 4);
        assert_eq!(results[0].score, 0); // Score is 0 for empty query
        assert_eq!(
            names(&results),
            vec!["Open File", "Save File", "Close Window", "Toggle Sidebar"]
        );
    }

    #[test]
    fn test_whitespace_query_returns_all() {
        let commands = create_test_commands();
        let results = filter_commands(&commands, "   ", &MatchOptions::default(), LIMIT);
        assert_eq!(results.len(), 4);
    }

    #[test]
    fn test_fuzzy_match() {
        let commands = create_test_commands();

        let results = filter_commands(&commands, "save", &MatchOptions::default(), LIMIT);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name(), "Save File");
    }

    #[test]
    fn test_case_insensitive() {
        let commands = create_test_commands();

        let results = filter_commands(&commands, "SAVE", &MatchOptions::default(), LIMIT);
        assert_eq!(results[0].name(), "Save File");
    }

    #[test]
    fn test_respect_case() {
        let commands = create_test_commands();
        let options = MatchOptions {
            case_matching: CaseSensitivity::Respect,
            no_match: NoMatchPolicy::Empty,
            ..Default::default()
        };

        let results = filter_commands(&commands, "SAVE", &options, LIMIT);
        assert!(results.is_empty());
    }

    #[test]
    fn test_partial_match() {
        let commands = create_test_commands();

        // "op" should match "Open"
        let results = filter_commands(&commands, "op", &MatchOptions::default(), LIMIT);
        assert!(!results.is_empty());
        assert_eq!(results[0].name(), "Open File");
    }

    #[test]
    fn test_no_match_falls_back_to_all() {
        let commands = create_test_commands();

        let results = filter_commands(&commands, "xyz123", &MatchOptions::default(), LIMIT);
        let all = filter_commands(&commands, "", &MatchOptions::default(), LIMIT);
        assert_eq!(names(&results), names(&all));
    }

    #[test]
    fn test_no_match_with_empty_policy() {
        let commands = create_test_commands();
        let options = MatchOptions {
            no_match: NoMatchPolicy::Empty,
            ..Default::default()
        };

        let results = filter_commands(&commands, "xyz123", &options, LIMIT);
        assert!(results.is_empty());
    }

    #[test]
    fn test_scoring_order() {
        let commands = create_test_commands();

        // "file" matches both Open File and Save File
        let results = filter_commands(&commands, "file", &MatchOptions::default(), LIMIT);
        assert_eq!(names(&results), vec!["Open File", "Save File"]);

        for result in &results {
            assert!(result.score > 0);
        }
    }

    #[test]
    fn test_exact_beats_prefix() {
        let commands = vec![
            Command::new("Fizz", || {}),
            Command::new("Fizz Buzz", || {}),
            Command::new("Buzz", || {}),
        ];

        let results = filter_commands(&commands, "Fizz", &MatchOptions::default(), LIMIT);
        assert_eq!(names(&results), vec!["Fizz", "Fizz Buzz"]);
    }

    #[test]
    fn test_search_includes_category() {
        let commands = create_test_commands();
        let options = MatchOptions {
            keys: vec![SearchKey::Name, SearchKey::Category],
            ..Default::default()
        };

        let results = filter_commands(&commands, "view", &options, LIMIT);
        assert_eq!(names(&results), vec!["Toggle Sidebar"]);

        // Name-only search finds nothing and falls back to the full list
        let results = filter_commands(&commands, "view", &MatchOptions::default(), LIMIT);
        assert_eq!(results.len(), 4);
    }

    #[test]
    fn test_indices_point_into_name() {
        let commands = create_test_commands();
        let options = MatchOptions {
            keys: vec![SearchKey::Name, SearchKey::Category],
            ..Default::default()
        };

        let results = filter_commands(&commands, "sav", &options, LIMIT);
        assert_eq!(results[0].indices, vec![0, 1, 2]);

        // Category-only hit has no highlight in the name
        let results = filter_commands(&commands, "view", &options, LIMIT);
        assert!(results[0].indices.is_empty());
    }

    #[test]
    fn test_indices_after_combining_marks() {
        // "e" + combining acute is one grapheme but two chars
        let commands = vec![Command::new("e\u{301}x", || {})];
        let results = filter_commands(&commands, "x", &MatchOptions::default(), LIMIT);
        assert_eq!(results[0].indices, vec![2]);

        let commands = vec![Command::new("Caf\u{e9} cre\u{300}me", || {})];
        let results = filter_commands(&commands, "reme", &MatchOptions::default(), LIMIT);
        assert_eq!(results[0].indices, vec![6, 7, 9, 10]);
    }

    #[test]
    fn test_prefix_match_priority() {
        let commands = vec![
            Command::new("Open in IDE for easy rebase", || {}),
            Command::new("Rerun failed jobs", || {}),
            Command::new("Rebase selected PRs", || {}),
        ];

        let results = filter_commands(&commands, "rebase", &MatchOptions::default(), LIMIT);
        assert_eq!(results[0].name(), "Rebase selected PRs");
        assert!(results[0].score > 10000);
    }

    #[test]
    fn test_substring_kind_is_stricter() {
        let commands = create_test_commands();
        let options = MatchOptions {
            kind: MatchKind::Substring,
            no_match: NoMatchPolicy::Empty,
            ..Default::default()
        };

        // Fuzzy finds "Save File" for "sf", substring does not
        let fuzzy = filter_commands(&commands, "sf", &MatchOptions::default(), LIMIT);
        assert_eq!(fuzzy[0].name(), "Save File");
        assert!(filter_commands(&commands, "sf", &options, LIMIT).is_empty());
    }

    #[test]
    fn test_min_score_threshold() {
        let commands = create_test_commands();
        let options = MatchOptions {
            min_score: u32::MAX,
            no_match: NoMatchPolicy::Empty,
            ..Default::default()
        };

        assert!(filter_commands(&commands, "file", &options, LIMIT).is_empty());
    }

    #[test]
    fn test_limit_applies_after_ordering() {
        let mut commands: Vec<Command> = (0..9)
            .map(|i| Command::new(format!("foo {}", i), || {}))
            .collect();
        commands.push(Command::new("bar", || {}));

        let results = filter_commands(&commands, "bar", &MatchOptions::default(), 3);
        assert_eq!(names(&results), vec!["bar"]);

        let results = filter_commands(&commands, "", &MatchOptions::default(), 3);
        assert_eq!(names(&results), vec!["foo 0", "foo 1", "foo 2"]);

        let results = filter_commands(&commands, "foo", &MatchOptions::default(), 3);
        assert_eq!(names(&results), vec!["foo 0", "foo 1", "foo 2"]);
    }

    #[test]
    fn test_filter_is_deterministic() {
        let commands = create_test_commands();
        let options = MatchOptions::default();

        let first = filter_commands(&commands, "e", &options, LIMIT);
        let second = filter_commands(&commands, "e", &options, LIMIT);
        assert_eq!(names(&first), names(&second));
        assert_eq!(
            first.iter().map(|s| s.score).collect::<Vec<_>>(),
            second.iter().map(|s| s.score).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_options_from_toml() {
        let options: MatchOptions = toml::from_str(
            r#"
            case_matching = "smart"
            kind = "substring"
            keys = ["name", "category"]
            no_match = "empty"
            "#,
        )
        .unwrap();

        assert_eq!(options.case_matching, CaseSensitivity::Smart);
        assert_eq!(options.kind, MatchKind::Substring);
        assert_eq!(options.keys, vec![SearchKey::Name, SearchKey::Category]);
        assert_eq!(options.no_match, NoMatchPolicy::Empty);
        // Untouched fields keep their defaults
        assert_eq!(options.prefix_boost, 10000);
    }
}
