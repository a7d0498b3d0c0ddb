use futures::future;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_icons::Icon;

use crate::api;
use crate::components::{locale_date_time, truncate_summary, FetchState};
use crate::models::{HistoryEntry, SystemMetrics};

const SUMMARY_PREVIEW_CHARS: usize = 120;

/// Usage metrics and the analysis history feed. Both endpoints are fetched
/// concurrently; each side degrades on its own, so a broken metrics endpoint
/// never hides the history.
#[component]
pub fn Dashboard() -> impl IntoView {
    let metrics = RwSignal::new(FetchState::<SystemMetrics>::default());
    let history = RwSignal::new(FetchState::<Vec<HistoryEntry>>::default());

    spawn_local(async move {
        let (metrics_outcome, history_outcome) =
            future::join(api::fetch_metrics(), api::fetch_history()).await;
        let _ = metrics.try_set(FetchState::from_outcome("system metrics", metrics_outcome));
        let _ = history.try_set(FetchState::from_outcome("analysis history", history_outcome));
    });

    view! {
        <div class="dashboard-grid">
            <div class="card">
                <h2>
                    <Icon width="20" height="20" icon=icondata::LuActivity/>
                    " System Metrics"
                </h2>
                {move || match metrics.get() {
                    FetchState::Loading => {
                        view! { <div class="loading">"Loading metrics..."</div> }.into_any()
                    }
                    FetchState::Ready(metrics) => {
                        view! { <MetricsView metrics=metrics/> }.into_any()
                    }
                    FetchState::Unavailable => {
                        view! { <div class="empty-state"><p>"No metrics available"</p></div> }
                            .into_any()
                    }
                }}
            </div>
            <div class="card">
                <h2>
                    <Icon width="20" height="20" icon=icondata::LuHistory/>
                    " Recent Activity"
                </h2>
                {move || match history.get() {
                    FetchState::Loading => {
                        view! { <div class="loading">"Loading history..."</div> }.into_any()
                    }
                    FetchState::Ready(entries) if !entries.is_empty() => {
                        view! { <HistoryList entries=entries/> }.into_any()
                    }
                    _ => {
                        view! {
                            <div class="empty-state">
                                <p>"No activity yet"</p>
                                <p class="empty-hint">"Upload your first dataset to begin"</p>
                            </div>
                        }
                            .into_any()
                    }
                }}
            </div>
        </div>
    }
}

#[component]
fn MetricsView(metrics: SystemMetrics) -> impl IntoView {
    view! {
        <div class="metrics-row">
            <span>"Datasets uploaded"</span>
            <span class="metric-value">{metrics.total_datasets.to_string()}</span>
        </div>
        <div class="metrics-row">
            <span>"Analyses run"</span>
            <span class="metric-value">{metrics.total_analyses.to_string()}</span>
        </div>
        <div class="metrics-row">
            <span>"Avg processing time"</span>
            <span class="metric-value">{format!("{:.2}s", metrics.avg_processing_time)}</span>
        </div>
    }
}

#[component]
fn HistoryList(entries: Vec<HistoryEntry>) -> impl IntoView {
    view! {
        <div class="history-list">
            {entries
                .iter()
                .map(|entry| {
                    view! {
                        <div class="history-item">
                            <div class="history-head">
                                <strong>{entry.dataset_name.clone()}</strong>
                                {entry
                                    .processing_time
                                    .map(|seconds| {
                                        view! {
                                            <span class="history-time">
                                                {format!("{seconds:.2}s")}
                                            </span>
                                        }
                                    })}
                            </div>
                            <div class="history-date">{locale_date_time(&entry.timestamp)}</div>
                            <p>{truncate_summary(&entry.summary, SUMMARY_PREVIEW_CHARS)}</p>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}
