use wasm_bindgen::JsValue;

use crate::api::ApiError;

pub mod analysis;
pub mod dashboard;
pub mod file_upload;
pub mod image_modal;
pub mod trained_models;
pub mod training;

/// Lifecycle of a read-only fetch (models list, history, metrics). A failure
/// is logged and then rendered exactly like "nothing there yet"; these
/// sections never block the page on a broken backend.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Ready(T),
    Unavailable,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Loading
    }
}

impl<T> FetchState<T> {
    pub fn from_outcome(what: &str, outcome: Result<T, ApiError>) -> Self {
        match outcome {
            Ok(value) => FetchState::Ready(value),
            Err(err) => {
                leptos::logging::error!("failed to fetch {what}: {err}");
                FetchState::Unavailable
            }
        }
    }
}

/// "May 1, 2024" style rendering of a backend timestamp, in the viewer's
/// locale. Unparseable input comes back as the browser's "Invalid Date".
pub(crate) fn locale_date(timestamp: &str) -> String {
    js_sys::Date::new(&JsValue::from_str(timestamp))
        .to_locale_date_string("en-US", &JsValue::UNDEFINED)
        .into()
}

/// Date plus time of day, for the history feed.
pub(crate) fn locale_date_time(timestamp: &str) -> String {
    js_sys::Date::new(&JsValue::from_str(timestamp))
        .to_locale_string("en-US", &JsValue::UNDEFINED)
        .into()
}

/// Traffic-light class for a model score.
pub(crate) fn score_class(score: f64) -> &'static str {
    if score > 0.8 {
        "score-high"
    } else if score > 0.6 {
        "score-mid"
    } else {
        "score-low"
    }
}

/// First `max` characters with an ellipsis when something was cut.
pub(crate) fn truncate_summary(summary: &str, max: usize) -> String {
    if summary.chars().count() <= max {
        summary.to_string()
    } else {
        let mut cut: String = summary.chars().take(max).collect();
        cut.push_str("...");
        cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_state_folds_outcomes() {
        let ready = FetchState::from_outcome("models", Ok(vec![1, 2]));
        assert_eq!(ready, FetchState::Ready(vec![1, 2]));

        let unavailable: FetchState<Vec<i32>> =
            FetchState::from_outcome("models", Err(ApiError::Network("offline".to_string())));
        assert_eq!(unavailable, FetchState::Unavailable);
    }

    #[test]
    fn score_class_breaks_at_point_six_and_point_eight() {
        assert_eq!(score_class(0.92), "score-high");
        assert_eq!(score_class(0.8), "score-mid");
        assert_eq!(score_class(0.61), "score-mid");
        assert_eq!(score_class(0.6), "score-low");
    }

    #[test]
    fn truncate_keeps_short_summaries_intact() {
        assert_eq!(truncate_summary("short", 120), "short");
    }

    #[test]
    fn truncate_cuts_on_characters_not_bytes() {
        let long = "é".repeat(130);
        let cut = truncate_summary(&long, 120);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 123);
    }
}
