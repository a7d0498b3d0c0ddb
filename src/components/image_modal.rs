use leptos::prelude::*;

/// Chart the lightbox is currently showing.
#[derive(Clone, Debug, PartialEq)]
pub struct ModalImage {
    pub src: String,
    pub alt: String,
}

/// Full-screen overlay for a single chart. Renders nothing while the signal
/// is empty; a click anywhere closes it.
#[component]
pub fn ImageModal(image: RwSignal<Option<ModalImage>>) -> impl IntoView {
    view! {
        {move || {
            image
                .get()
                .map(|img| {
                    view! {
                        <div class="image-modal" on:click=move |_| image.set(None)>
                            <img src=img.src alt=img.alt/>
                        </div>
                    }
                })
        }}
    }
}
