use leptos::ev::Event;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_icons::Icon;

use crate::api::{self, ApiError};
use crate::components::score_class;
use crate::models::{DatasetId, TrainingResult};

#[derive(Clone, Debug, Default, PartialEq)]
pub enum TrainingPhase {
    #[default]
    Idle,
    Training,
    Trained(TrainingResult),
    Failed(String),
}

/// Training flow for one dataset. The controller is created fresh whenever
/// the analysis section remounts, so it never sees more than one dataset;
/// the id tag on [`apply`](Self::apply) still drops anything stale.
#[derive(Clone, Debug, PartialEq)]
pub struct TrainingController {
    dataset_id: DatasetId,
    target: Option<String>,
    phase: TrainingPhase,
}

impl TrainingController {
    pub fn new(dataset_id: DatasetId) -> Self {
        Self {
            dataset_id,
            target: None,
            phase: TrainingPhase::default(),
        }
    }

    pub fn phase(&self) -> &TrainingPhase {
        &self.phase
    }

    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn is_training(&self) -> bool {
        matches!(self.phase, TrainingPhase::Training)
    }

    /// Dropdown changed; the placeholder option carries an empty value and
    /// clears the choice.
    pub fn choose_target(&mut self, column: &str) {
        self.target = (!column.is_empty()).then(|| column.to_string());
    }

    /// Start a run, yielding the target column to request. A run already in
    /// flight is left alone. Submitting without a target fails locally,
    /// without a request. Any previous outcome is gone once a new run
    /// starts.
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.is_training() {
            return None;
        }
        let Some(target) = self.target.clone() else {
            self.phase = TrainingPhase::Failed("select a target column".to_string());
            return None;
        };
        self.phase = TrainingPhase::Training;
        Some(target)
    }

    /// Fold in a response tagged with the dataset it was requested for;
    /// anything tagged differently is dropped.
    pub fn apply(&mut self, dataset_id: DatasetId, outcome: Result<TrainingResult, ApiError>) {
        if dataset_id != self.dataset_id || !self.is_training() {
            return;
        }
        self.phase = match outcome {
            Ok(result) => TrainingPhase::Trained(result),
            Err(err) => TrainingPhase::Failed(err.message_or("Training failed")),
        };
    }
}

#[component]
pub fn MlTraining(dataset_id: DatasetId, columns: Vec<String>) -> impl IntoView {
    let controller = RwSignal::new(TrainingController::new(dataset_id));

    let on_target_change = move |ev: Event| {
        let value = event_target_value(&ev);
        controller.update(|c| c.choose_target(&value));
    };

    let on_train = move |_| {
        let Some(target) = controller.try_update(|c| c.begin_submit()).flatten() else {
            return;
        };
        spawn_local(async move {
            let outcome = api::train_model(dataset_id, &target).await;
            controller.try_update(|c| c.apply(dataset_id, outcome));
        });
    };

    view! {
        <div class="card">
            <h2>
                <Icon width="20" height="20" icon=icondata::LuBrain/>
                " Machine Learning"
            </h2>
            <div class="field">
                <label>"Target column"</label>
                <select on:change=on_target_change>
                    <option value="">"Choose a column to predict..."</option>
                    {columns
                        .iter()
                        .map(|column| {
                            view! { <option value=column.clone()>{column.clone()}</option> }
                        })
                        .collect_view()}
                </select>
            </div>
            <button
                class="btn btn-primary"
                disabled=move || controller.with(|c| c.is_training() || c.target().is_none())
                on:click=on_train
            >
                {move || {
                    if controller.with(|c| c.is_training()) {
                        "Training Model..."
                    } else {
                        "Train Model"
                    }
                }}
            </button>
            {move || match controller.with(|c| c.phase().clone()) {
                TrainingPhase::Failed(message) => {
                    view! { <div class="error">{message}</div> }.into_any()
                }
                TrainingPhase::Trained(result) => {
                    view! { <TrainingResultView result=result/> }.into_any()
                }
                _ => view! {}.into_any(),
            }}
        </div>
    }
}

#[component]
fn TrainingResultView(result: TrainingResult) -> impl IntoView {
    view! {
        <div class="training-result">
            <div class="result-header">
                <h3>"Model Trained"</h3>
                {result
                    .model_type
                    .clone()
                    .map(|kind| view! { <span class="badge">{kind}</span> })}
                {result
                    .trust_level
                    .clone()
                    .map(|level| view! { <span class="badge badge-trust">{level}</span> })}
            </div>
            <div class="stats-grid">
                <div class="stat-item">
                    <div class=format!("stat-value {}", score_class(result.score))>
                        {format!("{:.1}%", result.score * 100.0)}
                    </div>
                    <div class="stat-label">{result.score_name.clone()}</div>
                </div>
                <div class="stat-item">
                    <div class="stat-value">{result.algorithm.clone()}</div>
                    <div class="stat-label">"Algorithm"</div>
                </div>
                <div class="stat-item">
                    <div class="stat-value">{result.feature_importance.len().to_string()}</div>
                    <div class="stat-label">"Features Used"</div>
                </div>
                <div class="stat-item">
                    <div class="stat-value">{format!("{:.2}s", result.processing_time)}</div>
                    <div class="stat-label">"Training Time"</div>
                </div>
            </div>
            {result
                .interpretation
                .clone()
                .map(|text| view! { <p class="interpretation">{text}</p> })}
            {(!result.warnings.is_empty())
                .then(|| {
                    view! {
                        <ul class="warnings">
                            {result
                                .warnings
                                .iter()
                                .map(|warning| view! { <li>{warning.clone()}</li> })
                                .collect_view()}
                        </ul>
                    }
                })}
            {result
                .chart_url
                .clone()
                .map(|url| {
                    view! {
                        <div class="chart-item">
                            <img src=url alt="Feature importance"/>
                        </div>
                    }
                })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn training_result() -> TrainingResult {
        serde_json::from_value(serde_json::json!({
            "algorithm": "RandomForestRegressor",
            "model_type": "regression",
            "score": 0.87,
            "score_name": "R² Score",
            "feature_importance": {"sqft": 0.7, "age": 0.3},
            "processing_time": 4.2
        }))
        .unwrap()
    }

    #[test]
    fn submitting_without_a_target_fails_locally() {
        let mut controller = TrainingController::new(42);
        assert!(controller.begin_submit().is_none());
        assert_eq!(
            controller.phase(),
            &TrainingPhase::Failed("select a target column".to_string())
        );
    }

    #[test]
    fn placeholder_option_clears_the_target() {
        let mut controller = TrainingController::new(42);
        controller.choose_target("price");
        assert_eq!(controller.target(), Some("price"));
        controller.choose_target("");
        assert_eq!(controller.target(), None);
    }

    #[test]
    fn submit_yields_the_chosen_target() {
        let mut controller = TrainingController::new(42);
        controller.choose_target("price");
        assert_eq!(controller.begin_submit().as_deref(), Some("price"));
        assert!(controller.is_training());
    }

    #[test]
    fn only_one_run_in_flight() {
        let mut controller = TrainingController::new(42);
        controller.choose_target("price");
        assert!(controller.begin_submit().is_some());
        assert!(controller.begin_submit().is_none());
        assert!(controller.is_training());
    }

    #[test]
    fn a_new_run_discards_the_previous_outcome() {
        let mut controller = TrainingController::new(42);
        controller.choose_target("price");
        controller.begin_submit();
        controller.apply(42, Ok(training_result()));
        assert!(matches!(controller.phase(), TrainingPhase::Trained(_)));

        controller.begin_submit();
        assert_eq!(controller.phase(), &TrainingPhase::Training);
    }

    #[test]
    fn responses_for_another_dataset_are_dropped() {
        let mut controller = TrainingController::new(42);
        controller.choose_target("price");
        controller.begin_submit();

        controller.apply(7, Ok(training_result()));
        assert!(controller.is_training());

        controller.apply(42, Ok(training_result()));
        assert!(matches!(controller.phase(), TrainingPhase::Trained(_)));
    }

    #[test]
    fn backend_validation_detail_is_shown_as_is() {
        let mut controller = TrainingController::new(42);
        controller.choose_target("price");
        controller.begin_submit();
        controller.apply(
            42,
            Err(ApiError::Validation("Target column not found".to_string())),
        );
        assert_eq!(
            controller.phase(),
            &TrainingPhase::Failed("Target column not found".to_string())
        );
    }

    #[test]
    fn opaque_failures_get_the_generic_message() {
        let mut controller = TrainingController::new(42);
        controller.choose_target("price");
        controller.begin_submit();
        controller.apply(42, Err(ApiError::Server("trace".to_string())));
        assert_eq!(
            controller.phase(),
            &TrainingPhase::Failed("Training failed".to_string())
        );
    }
}
