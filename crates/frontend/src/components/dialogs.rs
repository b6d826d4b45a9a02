use dioxus::prelude::*;
use geopal_shared::config::Labels;

use crate::api::PickedFile;
use crate::notices::Notice;

/// Format a coordinate for the results table.
pub fn format_coordinate(value: f64) -> String {
    let s = format!("{value:.7}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

/// File picked in the upload dialog but not sent yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingUpload {
    file: Option<PickedFile>,
    error: Option<String>,
}

impl PendingUpload {
    pub fn pick(&mut self, file: PickedFile) {
        self.file = Some(file);
        self.error = None;
    }

    pub fn fail(&mut self, error: String) {
        self.file = None;
        self.error = Some(error);
    }

    pub fn can_upload(&self) -> bool {
        self.file.is_some()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Hand the file over for sending and leave nothing behind.
    pub fn take(&mut self) -> Option<PickedFile> {
        let file = self.file.take();
        self.reset();
        file
    }

    pub fn reset(&mut self) {
        *self = PendingUpload::default();
    }
}

#[component]
pub fn UploadDialog(
    show: Signal<bool>,
    labels: Labels,
    on_upload: EventHandler<PickedFile>,
) -> Element {
    let mut pending = use_signal(PendingUpload::default);

    // Every way out of the dialog drops the picked file.
    let mut close = move || {
        pending.write().reset();
        show.set(false);
    };

    if !*show.read() {
        return rsx! {};
    }

    let has_file = pending.read().can_upload();
    let read_error = pending.read().error().map(str::to_string);

    rsx! {
        div {
            class: "dialog-backdrop",
            onclick: move |_| close(),

            div {
                class: "dialog",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),

                h2 { "{labels.titles.upload_geo_json}" }

                input {
                    r#type: "file",
                    accept: ".json,.geojson,application/json,application/geo+json",
                    onchange: move |evt: Event<FormData>| async move {
                        let Some(file) = evt.files().into_iter().next() else {
                            pending.write().reset();
                            return;
                        };
                        let name = file.name();
                        match file.read_bytes().await {
                            Ok(bytes) => pending.write().pick(PickedFile { name, bytes: bytes.to_vec() }),
                            Err(e) => {
                                tracing::warn!(error = %e, "Could not read picked file");
                                pending.write().fail(e.to_string());
                            }
                        }
                    },
                }

                if let Some(err) = read_error {
                    p { class: "dialog-error", "{err}" }
                }

                div { class: "dialog-buttons",
                    button {
                        disabled: !has_file,
                        onclick: move |_| {
                            if let Some(file) = pending.write().take() {
                                on_upload.call(file);
                            }
                            close();
                        },
                        "{labels.buttons.upload}"
                    }
                    button {
                        class: "secondary",
                        onclick: move |_| close(),
                        "{labels.buttons.cancel}"
                    }
                }
            }
        }
    }
}

/// Error message or selection listing, whichever the session queued last.
#[component]
pub fn NoticeDialog(notice: Notice, close_label: String, on_close: EventHandler<()>) -> Element {
    let title = notice.title().to_string();
    let body = match &notice {
        Notice::Error { message, .. } => rsx! {
            p { class: "dialog-message", "{message}" }
        },
        Notice::Selection { rows, .. } => {
            let rows: Vec<(String, String, String)> = rows
                .iter()
                .map(|r| {
                    (
                        r.address.clone(),
                        format_coordinate(r.latitude),
                        format_coordinate(r.longitude),
                    )
                })
                .collect();
            rsx! {
                table { class: "selection-table",
                    thead {
                        tr {
                            th { "Address" }
                            th { "Latitude" }
                            th { "Longitude" }
                        }
                    }
                    tbody {
                        for (address, lat, lng) in rows {
                            tr {
                                td { "{address}" }
                                td { "{lat}" }
                                td { "{lng}" }
                            }
                        }
                    }
                }
            }
        }
    };
    let class = if notice.is_selection() { "dialog wide" } else { "dialog" };

    rsx! {
        div {
            class: "dialog-backdrop",
            onclick: move |_| on_close.call(()),

            div {
                class: "{class}",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),

                h2 { "{title}" }
                {body}
                div { class: "dialog-buttons",
                    button {
                        onclick: move |_| on_close.call(()),
                        "{close_label}"
                    }
                }
            }
        }
    }
}

#[component]
pub fn ColorDialog(
    show: Signal<bool>,
    title: String,
    close_label: String,
    current: String,
    on_change: EventHandler<String>,
) -> Element {
    if !*show.read() {
        return rsx! {};
    }

    rsx! {
        div {
            class: "dialog-backdrop",
            onclick: move |_| show.set(false),

            div {
                class: "dialog",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),

                h2 { "{title}" }
                input {
                    r#type: "color",
                    value: "{current}",
                    oninput: move |evt: Event<FormData>| on_change.call(evt.value()),
                }
                div { class: "dialog-buttons",
                    button {
                        onclick: move |_| show.set(false),
                        "{close_label}"
                    }
                }
            }
        }
    }
}
