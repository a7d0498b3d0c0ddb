use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_icons::Icon;
use web_sys::{DragEvent, File};

use crate::api::{self, ApiError};
use crate::models::UploadResponse;
use crate::session::{ActiveDataset, SessionContext};

/// Largest file the picker accepts.
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq)]
pub struct PendingFile {
    pub name: String,
    pub size: u64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum UploadPhase {
    #[default]
    Idle,
    Uploading,
    Failed(String),
}

/// Upload flow state. The `File` handle itself stays with the component;
/// only its name and size matter for the rules here.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadController {
    selected: Option<PendingFile>,
    phase: UploadPhase,
    notice: Option<String>,
}

impl UploadController {
    pub fn selected(&self) -> Option<&PendingFile> {
        self.selected.as_ref()
    }

    pub fn is_uploading(&self) -> bool {
        matches!(self.phase, UploadPhase::Uploading)
    }

    /// Local validation notice or the last upload failure, whichever is
    /// fresher.
    pub fn message(&self) -> Option<&str> {
        if let Some(notice) = &self.notice {
            return Some(notice);
        }
        match &self.phase {
            UploadPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Consider a candidate from the picker or a drop. Anything that is not
    /// a `.csv` under the size cap is refused with a notice, leaving the
    /// current selection untouched; no request is involved, so a refusal is
    /// not an upload failure.
    pub fn select_file(&mut self, name: &str, size: u64) -> bool {
        if !name.ends_with(".csv") {
            self.notice = Some("Please select a CSV file".to_string());
            return false;
        }
        if size > MAX_FILE_BYTES {
            self.notice = Some("File is too large (10 MiB max)".to_string());
            return false;
        }
        self.selected = Some(PendingFile {
            name: name.to_string(),
            size,
        });
        self.notice = None;
        if matches!(self.phase, UploadPhase::Failed(_)) {
            self.phase = UploadPhase::Idle;
        }
        true
    }

    /// Move to uploading and hand back what to send. Nothing happens while a
    /// request is already in flight or when no file is selected.
    pub fn begin_submit(&mut self) -> Option<PendingFile> {
        if self.is_uploading() {
            return None;
        }
        let pending = self.selected.clone()?;
        self.phase = UploadPhase::Uploading;
        self.notice = None;
        Some(pending)
    }

    /// Fold in the response. Success clears the selection and yields the
    /// dataset to announce; failure keeps the selection so the user can
    /// retry without picking the file again.
    pub fn finish(
        &mut self,
        sent_name: &str,
        outcome: Result<UploadResponse, ApiError>,
    ) -> Option<ActiveDataset> {
        match outcome {
            Ok(response) => {
                self.selected = None;
                self.phase = UploadPhase::Idle;
                Some(ActiveDataset {
                    id: response.dataset_id,
                    name: sent_name.to_string(),
                })
            }
            Err(err) => {
                self.phase = UploadPhase::Failed(err.message_or("Upload failed"));
                None
            }
        }
    }
}

fn format_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

#[component]
pub fn FileUpload() -> impl IntoView {
    let session = expect_context::<SessionContext>();
    let controller = RwSignal::new(UploadController::default());
    let picked_file = StoredValue::new_local(None::<File>);
    let input_ref = NodeRef::<leptos::html::Input>::new();
    let (drag_over, set_drag_over) = signal(false);

    let take_candidate = move |file: Option<File>| {
        let Some(file) = file else { return };
        let accepted = controller
            .try_update(|c| c.select_file(&file.name(), file.size() as u64))
            .unwrap_or(false);
        if accepted {
            picked_file.set_value(Some(file));
        }
    };

    let on_pick = move |_| {
        if let Some(input) = input_ref.get() {
            take_candidate(input.files().and_then(|files| files.get(0)));
            // Reset so choosing the same file again still fires `change`.
            input.set_value("");
        }
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_drag_over.set(false);
        take_candidate(
            ev.data_transfer()
                .and_then(|dt| dt.files())
                .and_then(|files| files.get(0)),
        );
    };

    let on_submit = move |_| {
        let Some(file) = picked_file.get_value() else {
            return;
        };
        let Some(pending) = controller.try_update(|c| c.begin_submit()).flatten() else {
            return;
        };
        spawn_local(async move {
            let outcome = api::upload_dataset(&file).await;
            let uploaded = controller
                .try_update(|c| c.finish(&pending.name, outcome))
                .flatten();
            if let Some(dataset) = uploaded {
                picked_file.set_value(None);
                session.dataset_uploaded(dataset);
            }
        });
    };

    view! {
        <div class="card">
            <h2>"Upload Dataset"</h2>
            <div
                class=move || {
                    if drag_over.get() { "upload-area dragover" } else { "upload-area" }
                }
                on:click=move |_| {
                    if let Some(input) = input_ref.get() {
                        input.click();
                    }
                }
                on:dragover=move |ev: DragEvent| {
                    ev.prevent_default();
                    set_drag_over.set(true);
                }
                on:dragleave=move |_| set_drag_over.set(false)
                on:drop=on_drop
            >
                <div class="upload-icon">
                    <Icon width="48" height="48" icon=icondata::LuUpload/>
                </div>
                {move || match controller.with(|c| c.selected().cloned()) {
                    Some(file) => view! {
                        <h3>{file.name}</h3>
                        <p class="upload-hint">{format_size(file.size)}</p>
                    }
                        .into_any(),
                    None => view! {
                        <h3>"Drop your CSV file here"</h3>
                        <p class="upload-hint">"or click to browse. CSV only, up to 10 MiB."</p>
                    }
                        .into_any(),
                }}
            </div>
            <input
                type="file"
                accept=".csv"
                class="file-input"
                node_ref=input_ref
                on:change=on_pick
            />
            {move || {
                controller
                    .with(|c| c.message().map(str::to_string))
                    .map(|message| view! { <div class="error">{message}</div> })
            }}
            {move || {
                controller
                    .with(|c| c.selected().is_some())
                    .then(|| {
                        view! {
                            <div class="upload-actions">
                                <button
                                    class="btn btn-primary"
                                    disabled=move || controller.with(|c| c.is_uploading())
                                    on:click=on_submit
                                >
                                    {move || {
                                        if controller.with(|c| c.is_uploading()) {
                                            "Processing..."
                                        } else {
                                            "Analyze Data"
                                        }
                                    }}
                                </button>
                            </div>
                        }
                    })
            }}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload_response(dataset_id: u64) -> UploadResponse {
        serde_json::from_value(serde_json::json!({
            "dataset_id": dataset_id,
            "message": "Dataset uploaded successfully",
            "rows": 100,
            "columns": 5
        }))
        .unwrap()
    }

    #[test]
    fn refuses_non_csv_files() {
        let mut controller = UploadController::default();
        assert!(!controller.select_file("report.xlsx", 1024));
        assert_eq!(controller.message(), Some("Please select a CSV file"));
        assert!(controller.selected().is_none());
    }

    #[test]
    fn suffix_check_is_case_sensitive() {
        let mut controller = UploadController::default();
        assert!(!controller.select_file("DATA.CSV", 1024));
    }

    #[test]
    fn refuses_oversized_files_and_keeps_previous_selection() {
        let mut controller = UploadController::default();
        assert!(controller.select_file("small.csv", 512));
        assert!(!controller.select_file("huge.csv", MAX_FILE_BYTES + 1));
        assert_eq!(controller.selected().map(|f| f.name.as_str()), Some("small.csv"));
        assert_eq!(controller.message(), Some("File is too large (10 MiB max)"));
    }

    #[test]
    fn accepts_a_file_at_exactly_the_cap() {
        let mut controller = UploadController::default();
        assert!(controller.select_file("edge.csv", MAX_FILE_BYTES));
        assert!(controller.message().is_none());
    }

    #[test]
    fn submit_needs_a_selection() {
        let mut controller = UploadController::default();
        assert!(controller.begin_submit().is_none());
    }

    #[test]
    fn only_one_upload_in_flight() {
        let mut controller = UploadController::default();
        controller.select_file("x.csv", 100);
        assert!(controller.begin_submit().is_some());
        assert!(controller.begin_submit().is_none());
        assert!(controller.is_uploading());
    }

    #[test]
    fn success_clears_selection_and_announces_the_dataset() {
        let mut controller = UploadController::default();
        controller.select_file("x.csv", 100);
        let pending = controller.begin_submit().unwrap();

        let uploaded = controller.finish(&pending.name, Ok(upload_response(42)));
        assert_eq!(
            uploaded,
            Some(ActiveDataset {
                id: 42,
                name: "x.csv".to_string()
            })
        );
        assert!(controller.selected().is_none());
        assert!(!controller.is_uploading());
        assert!(controller.message().is_none());
    }

    #[test]
    fn failure_keeps_selection_for_retry() {
        let mut controller = UploadController::default();
        controller.select_file("x.csv", 100);
        let pending = controller.begin_submit().unwrap();

        let uploaded = controller.finish(
            &pending.name,
            Err(ApiError::Validation("Only CSV files are supported".to_string())),
        );
        assert!(uploaded.is_none());
        assert_eq!(controller.message(), Some("Only CSV files are supported"));
        assert_eq!(controller.selected().map(|f| f.name.as_str()), Some("x.csv"));
        assert!(controller.begin_submit().is_some());
    }

    #[test]
    fn opaque_failure_gets_the_generic_message() {
        let mut controller = UploadController::default();
        controller.select_file("x.csv", 100);
        controller.begin_submit();

        controller.finish("x.csv", Err(ApiError::Server("trace".to_string())));
        assert_eq!(controller.message(), Some("Upload failed"));
    }

    #[test]
    fn picking_a_new_file_clears_an_old_failure() {
        let mut controller = UploadController::default();
        controller.select_file("x.csv", 100);
        controller.begin_submit();
        controller.finish("x.csv", Err(ApiError::Server("trace".to_string())));

        assert!(controller.select_file("y.csv", 100));
        assert!(controller.message().is_none());
    }

    #[test]
    fn kilobyte_sizes_render_with_one_decimal() {
        assert_eq!(format_size(1536), "1.5 KB");
    }
}
