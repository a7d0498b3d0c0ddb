use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_icons::Icon;

use crate::api::{self, ApiError};
use crate::components::image_modal::{ImageModal, ModalImage};
use crate::components::training::MlTraining;
use crate::models::{AnalysisReport, DatasetId};
use crate::session::SessionContext;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum AnalysisState {
    #[default]
    Idle,
    Loading,
    Ready(AnalysisReport),
    Failed(String),
}

/// Report fetch state, keyed by dataset. Responses come back tagged with the
/// dataset they were requested for; a tag that no longer matches the current
/// dataset is dropped, so rapid re-uploads can never show an older dataset's
/// report.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnalysisController {
    dataset_id: Option<DatasetId>,
    state: AnalysisState,
}

impl AnalysisController {
    pub fn dataset_id(&self) -> Option<DatasetId> {
        self.dataset_id
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    /// A new dataset takes over; whatever was on screen goes back to loading.
    pub fn begin(&mut self, dataset_id: DatasetId) {
        self.dataset_id = Some(dataset_id);
        self.state = AnalysisState::Loading;
    }

    pub fn apply(&mut self, dataset_id: DatasetId, outcome: Result<AnalysisReport, ApiError>) {
        if self.dataset_id != Some(dataset_id) {
            return;
        }
        self.state = match outcome {
            Ok(report) => AnalysisState::Ready(report),
            Err(err) => AnalysisState::Failed(err.message_or("Analysis failed")),
        };
    }
}

#[component]
pub fn AnalysisResults() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let controller = RwSignal::new(AnalysisController::default());

    Effect::new(move |_| {
        let Some(dataset_id) = session.active_dataset_id() else {
            return;
        };
        controller.update(|c| c.begin(dataset_id));
        spawn_local(async move {
            let outcome = api::fetch_analysis(dataset_id).await;
            controller.try_update(|c| c.apply(dataset_id, outcome));
        });
    });

    view! {
        <section class="analysis">
            {move || {
                let (dataset_id, state) = controller
                    .with(|c| (c.dataset_id(), c.state().clone()));
                match state {
                    AnalysisState::Idle => view! {}.into_any(),
                    AnalysisState::Loading => {
                        view! {
                            <div class="card">
                                <div class="loading">"Analyzing your data..."</div>
                            </div>
                        }
                            .into_any()
                    }
                    AnalysisState::Failed(message) => {
                        view! {
                            <div class="card">
                                <div class="error">
                                    <strong>"Analysis Error: "</strong>
                                    {message}
                                </div>
                            </div>
                        }
                            .into_any()
                    }
                    AnalysisState::Ready(report) => {
                        view! {
                            <AnalysisReportView
                                dataset_id=dataset_id.unwrap_or_default()
                                report=report
                            />
                        }
                            .into_any()
                    }
                }
            }}
        </section>
    }
}

#[component]
fn AnalysisReportView(dataset_id: DatasetId, report: AnalysisReport) -> impl IntoView {
    let modal = RwSignal::new(None::<ModalImage>);
    let stats = report.stats.clone();
    let columns = stats.columns.clone();

    view! {
        <div class="card">
            <h2>
                <Icon width="20" height="20" icon=icondata::LuDatabase/>
                " Dataset Overview"
            </h2>
            <div class="stats-grid">
                <div class="stat-item">
                    <div class="stat-value">{stats.rows().to_string()}</div>
                    <div class="stat-label">"Rows"</div>
                </div>
                <div class="stat-item">
                    <div class="stat-value">{stats.cols().to_string()}</div>
                    <div class="stat-label">"Columns"</div>
                </div>
                <div class="stat-item">
                    <div class="stat-value">{stats.total_missing().to_string()}</div>
                    <div class="stat-label">"Missing Values"</div>
                </div>
                <div class="stat-item">
                    <div class="stat-value">{format!("{:.2}s", report.processing_time)}</div>
                    <div class="stat-label">"Analysis Time"</div>
                </div>
                {stats
                    .quality_metrics
                    .clone()
                    .map(|quality| {
                        view! {
                            <div class="stat-item">
                                <div class="stat-value">
                                    {format!("{:.1}%", quality.completeness_ratio * 100.0)}
                                </div>
                                <div class="stat-label">"Complete"</div>
                            </div>
                            <div class="stat-item">
                                <div class="stat-value">{quality.duplicate_rows.to_string()}</div>
                                <div class="stat-label">"Duplicate Rows"</div>
                            </div>
                        }
                    })}
            </div>
        </div>
        <div class="card">
            <h2>
                <Icon width="20" height="20" icon=icondata::LuCpu/>
                " Insights"
            </h2>
            <div class="summary-box">{report.summary.clone()}</div>
        </div>
        {(!report.charts.is_empty())
            .then(|| {
                view! {
                    <div class="card">
                        <h2>"Visualizations"</h2>
                        <div class="charts-grid">
                            {report
                                .charts
                                .iter()
                                .enumerate()
                                .map(|(index, chart)| {
                                    let src = chart.clone();
                                    let alt = format!("Chart {}", index + 1);
                                    let preview = ModalImage {
                                        src: src.clone(),
                                        alt: alt.clone(),
                                    };
                                    view! {
                                        <div
                                            class="chart-item"
                                            on:click=move |_| modal.set(Some(preview.clone()))
                                        >
                                            <img src=src alt=alt/>
                                        </div>
                                    }
                                })
                                .collect_view()}
                        </div>
                    </div>
                }
            })}
        <div class="card">
            <h2>"Columns"</h2>
            <table>
                <thead>
                    <tr>
                        <th>"Column"</th>
                        <th>"Type"</th>
                        <th>"Missing"</th>
                    </tr>
                </thead>
                <tbody>
                    {columns
                        .iter()
                        .map(|column| {
                            let dtype = stats
                                .dtypes
                                .get(column)
                                .cloned()
                                .unwrap_or_else(|| "unknown".to_string());
                            let missing = stats.missing_values.get(column).copied().unwrap_or(0);
                            let missing_class = if missing > 0 {
                                "missing-count warn"
                            } else {
                                "missing-count"
                            };
                            view! {
                                <tr>
                                    <td>{column.clone()}</td>
                                    <td class="muted">{dtype}</td>
                                    <td class=missing_class>{missing.to_string()}</td>
                                </tr>
                            }
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
        <MlTraining dataset_id=dataset_id columns=stats.columns.clone()/>
        <ImageModal image=modal/>
    }
}
