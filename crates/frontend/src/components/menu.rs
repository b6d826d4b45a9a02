use dioxus::prelude::*;
use geopal_shared::config::MenuLabels;

#[component]
pub fn Menu(
    labels: MenuLabels,
    lasso_active: bool,
    on_upload: EventHandler<()>,
    on_selection: EventHandler<()>,
    on_change_color: EventHandler<()>,
) -> Element {
    rsx! {
        nav { class: "menu",
            button {
                onclick: move |_| on_upload.call(()),
                "{labels.upload_btn}"
            }
            button {
                class: if lasso_active { "active" } else { "" },
                onclick: move |_| on_selection.call(()),
                "{labels.selection_btn}"
            }
            button {
                onclick: move |_| on_change_color.call(()),
                "{labels.change_btn}"
            }
        }
    }
}
