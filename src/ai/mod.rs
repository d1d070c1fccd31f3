//! Text-model collaborators: theme ideas and search completions.
//!
//! Both flows are synchronous functions over a [`TextModel`]; the UI runs them
//! on the background [`AiWorker`] so the frame loop never blocks on HTTP.

mod client;
mod worker;

pub use client::{model_from_settings, ChatCompletionsClient, DisabledModel};
pub use worker::{AiWorker, SearchReply};

use serde::Deserialize;
use std::fmt;

/// At most this many search completions are ever returned.
pub const MAX_SEARCH_SUGGESTIONS: usize = 5;

pub const THEME_EMPTY_MESSAGE: &str = "Please enter a description for your theme.";
pub const THEME_FAILURE_MESSAGE: &str = "Failed to get a theme suggestion. Please try again.";

/// A model that turns one prompt into one completion.
pub trait TextModel: Send + Sync {
    fn complete(&self, prompt: &str) -> anyhow::Result<String>;

    /// `false` when every call is known to fail, so callers can skip work.
    fn is_available(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeError {
    EmptyDescription,
    Failed,
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeError::EmptyDescription => f.write_str(THEME_EMPTY_MESSAGE),
            ThemeError::Failed => f.write_str(THEME_FAILURE_MESSAGE),
        }
    }
}

impl std::error::Error for ThemeError {}

pub fn theme_prompt(description: &str) -> String {
    format!(
        "You are a theme customization expert for personal dashboards. Based on the user's \
         description, generate a personalized theme suggestion including specific color \
         palettes, font recommendations, and layout ideas.\n\n\
         Description: {description}\n\n\
         Respond with JSON of the form {{\"themeSuggestion\": \"...\"}}.\n\n\
         Theme Suggestion:"
    )
}

pub fn search_prompt(query: &str) -> String {
    format!(
        "You are a search suggestion engine. Based on the user's partial query, provide a list \
         of {MAX_SEARCH_SUGGESTIONS} relevant and concise search suggestions to help them \
         complete their thought. Return only the suggestions as JSON of the form \
         {{\"suggestions\": [\"...\"]}}.\n\nQuery: {query}\n"
    )
}

/// Ask the model for a theme idea.
///
/// A blank description is rejected without calling the model. Any model or
/// parse failure is logged and collapsed into [`ThemeError::Failed`].
pub fn suggest_theme(model: &dyn TextModel, description: &str) -> Result<String, ThemeError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(ThemeError::EmptyDescription);
    }
    match model.complete(&theme_prompt(description)) {
        Ok(text) => parse_theme_response(&text).ok_or_else(|| {
            tracing::warn!("theme suggestion response was empty");
            ThemeError::Failed
        }),
        Err(e) => {
            tracing::error!("theme suggestion failed: {e:#}");
            Err(ThemeError::Failed)
        }
    }
}

/// Ask the model for completions of a partial query.
///
/// An empty query short-circuits to no suggestions. Failures degrade to an
/// empty list.
pub fn suggest_search(model: &dyn TextModel, query: &str) -> Vec<String> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }
    match model.complete(&search_prompt(query)) {
        Ok(text) => parse_search_response(&text),
        Err(e) => {
            tracing::debug!("search suggestions failed: {e:#}");
            Vec::new()
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeReply {
    theme_suggestion: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SearchReplyBody {
    Object { suggestions: Vec<String> },
    List(Vec<String>),
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Accepts `{"themeSuggestion": ...}` or plain text.
pub fn parse_theme_response(text: &str) -> Option<String> {
    let body = strip_code_fence(text);
    let suggestion = match serde_json::from_str::<ThemeReply>(body) {
        Ok(reply) => reply.theme_suggestion,
        Err(_) => body.to_string(),
    };
    let suggestion = suggestion.trim();
    (!suggestion.is_empty()).then(|| suggestion.to_string())
}

/// Accepts `{"suggestions": [...]}`, a bare JSON array or one suggestion per
/// line. Bullets and numbering are stripped, blanks dropped, duplicates kept
/// once and the result capped at [`MAX_SEARCH_SUGGESTIONS`].
pub fn parse_search_response(text: &str) -> Vec<String> {
    let body = strip_code_fence(text);
    let raw: Vec<String> = match serde_json::from_str::<SearchReplyBody>(body) {
        Ok(SearchReplyBody::Object { suggestions }) | Ok(SearchReplyBody::List(suggestions)) => {
            suggestions
        }
        Err(_) => body.lines().map(strip_list_marker).collect(),
    };
    let mut out: Vec<String> = Vec::new();
    for s in raw {
        let s = s.trim().trim_matches('"').trim();
        if s.is_empty() || out.iter().any(|o| o == s) {
            continue;
        }
        out.push(s.to_string());
        if out.len() == MAX_SEARCH_SUGGESTIONS {
            break;
        }
    }
    out
}

fn strip_list_marker(line: &str) -> String {
    let line = line.trim();
    let line = line
        .strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("• "))
        .unwrap_or(line);
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return rest.to_string();
        }
    }
    line.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Scripted {
        reply: anyhow::Result<String>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(anyhow::anyhow!("boom")),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl TextModel for Scripted {
        fn complete(&self, _prompt: &str) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(s) => Ok(s.clone()),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            }
        }
    }

    #[test]
    fn blank_query_never_reaches_model() {
        let model = Scripted::ok(r#"{"suggestions": ["x"]}"#);
        assert!(suggest_search(&model, "").is_empty());
        assert!(suggest_search(&model, "   ").is_empty());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn search_caps_at_five() {
        let model = Scripted::ok(r#"{"suggestions": ["a","b","c","d","e","f","g"]}"#);
        assert_eq!(suggest_search(&model, "q"), vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn search_failure_degrades_to_empty() {
        let model = Scripted::failing();
        assert!(suggest_search(&model, "rust").is_empty());
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn search_accepts_numbered_lines_and_fences() {
        let text = "```\n1. rust book\n2) rust async\n- rust egui\n\n* rust serde\n```";
        assert_eq!(
            parse_search_response(text),
            vec!["rust book", "rust async", "rust egui", "rust serde"]
        );
        assert_eq!(parse_search_response(r#"["a", " ", "a", "b"]"#), vec!["a", "b"]);
    }

    #[test]
    fn blank_theme_description_is_rejected_locally() {
        let model = Scripted::ok("anything");
        assert_eq!(suggest_theme(&model, "  "), Err(ThemeError::EmptyDescription));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            ThemeError::EmptyDescription.to_string(),
            "Please enter a description for your theme."
        );
    }

    #[test]
    fn theme_failure_uses_fixed_message() {
        let err = suggest_theme(&Scripted::failing(), "dark and moody").unwrap_err();
        assert_eq!(err.to_string(), THEME_FAILURE_MESSAGE);
        let empty = suggest_theme(&Scripted::ok("  "), "dark and moody").unwrap_err();
        assert_eq!(empty, ThemeError::Failed);
    }

    #[test]
    fn theme_reads_json_or_plain_text() {
        let json = Scripted::ok(r#"{"themeSuggestion": "Charcoal with amber accents"}"#);
        assert_eq!(
            suggest_theme(&json, "warm night").unwrap(),
            "Charcoal with amber accents"
        );
        let plain = Scripted::ok("Deep navy, silver type\n");
        assert_eq!(suggest_theme(&plain, "cold").unwrap(), "Deep navy, silver type");
    }
}
