use leptos::prelude::*;

use crate::components::analysis::AnalysisResults;
use crate::components::dashboard::Dashboard;
use crate::components::file_upload::FileUpload;
use crate::components::trained_models::TrainedModels;
use crate::session::SessionContext;

#[component]
pub fn App() -> impl IntoView {
    let session = SessionContext::new();
    provide_context(session);

    view! {
        <div class="container">
            <header class="header">
                <h1>"DataLab"</h1>
                <p>"Automated data analysis and machine learning"</p>
            </header>
            {move || {
                session
                    .banner_visible()
                    .then(|| {
                        view! {
                            <div class="success">
                                "Dataset uploaded successfully - analyzing now..."
                            </div>
                        }
                    })
            }}
            <FileUpload/>
            <AnalysisResults/>
            <TrainedModels/>
            <Dashboard/>
            <footer class="footer">
                <p>"Data science. Machine learning. Automation."</p>
            </footer>
        </div>
    }
}
