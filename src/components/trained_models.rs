use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_icons::Icon;

use crate::api;
use crate::components::{locale_date, score_class, FetchState};
use crate::models::TrainedModel;

/// Catalogue of every model trained so far, fetched once per mount.
#[component]
pub fn TrainedModels() -> impl IntoView {
    let models = RwSignal::new(FetchState::<Vec<TrainedModel>>::default());

    spawn_local(async move {
        let outcome = api::fetch_models().await;
        let _ = models.try_set(FetchState::from_outcome("trained models", outcome));
    });

    view! {
        <div class="card">
            <h2>
                <Icon width="20" height="20" icon=icondata::LuBox/>
                " Trained Models"
            </h2>
            {move || match models.get() {
                FetchState::Loading => {
                    view! { <div class="loading">"Loading models..."</div> }.into_any()
                }
                FetchState::Ready(models) if !models.is_empty() => {
                    view! { <ModelsTable models=models/> }.into_any()
                }
                _ => {
                    view! {
                        <div class="empty-state">
                            <p>"No models trained yet"</p>
                            <p class="empty-hint">
                                "Upload a dataset and train your first model"
                            </p>
                        </div>
                    }
                        .into_any()
                }
            }}
        </div>
    }
}

#[component]
fn ModelsTable(models: Vec<TrainedModel>) -> impl IntoView {
    view! {
        <table>
            <thead>
                <tr>
                    <th>"Dataset"</th>
                    <th>"Target"</th>
                    <th>"Algorithm"</th>
                    <th>"Score"</th>
                    <th>"Created"</th>
                </tr>
            </thead>
            <tbody>
                {models
                    .iter()
                    .map(|model| {
                        view! {
                            <tr>
                                <td>{model.dataset_name.clone()}</td>
                                <td>{model.target_column.clone()}</td>
                                <td class="muted">{model.algorithm.clone()}</td>
                                <td class=score_class(model.score)>
                                    {format!("{:.1}%", model.score * 100.0)}
                                </td>
                                <td class="muted">{locale_date(&model.created_at)}</td>
                            </tr>
                        }
                    })
                    .collect_view()}
            </tbody>
        </table>
    }
}
