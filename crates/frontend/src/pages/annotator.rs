use dioxus::prelude::*;
use geopal_shared::config::{AppOptions, Rgb};
use geopal_shared::drawing::DrawingState;
use geopal_shared::session::Session;
use geopal_shared::surface::MapEvent;

use crate::api::{self, PickedFile};
use crate::components::dialogs::{ColorDialog, NoticeDialog, UploadDialog};
use crate::components::map_view::{dispatch, MapView, MAP_CONTAINER_ID};
use crate::components::menu::Menu;
use crate::notices::NoticeBoard;
use crate::surface::{AppSession, SceneSurface};

/// Id of an optional `<script type="application/json">` carrying init options.
const OPTIONS_ELEMENT_ID: &str = "geopal-options";

/// Options embedded in the page, or the defaults when there are none.
pub fn parse_options(embedded: Option<&str>) -> Result<AppOptions, String> {
    match embedded.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => serde_json::from_str(raw).map_err(|e| format!("Invalid init options: {e}")),
        None => Ok(AppOptions::with_container(MAP_CONTAINER_ID)),
    }
}

fn embedded_options() -> Option<String> {
    let document = web_sys::window()?.document()?;
    document.get_element_by_id(OPTIONS_ELEMENT_ID)?.text_content()
}

fn start_session() -> Result<AppSession, String> {
    let options = parse_options(embedded_options().as_deref())?;
    Session::init(options, NoticeBoard::default(), SceneSurface::new).map_err(|e| e.to_string())
}

#[component]
pub fn Annotator() -> Element {
    let (mut session, init_error) = use_hook(|| match start_session() {
        Ok(s) => (Signal::new(Some(s)), None),
        Err(e) => {
            tracing::error!(error = %e, "Map initialisation failed");
            (Signal::new(None::<AppSession>), Some(e))
        }
    });
    let mut show_upload = use_signal(|| false);
    let mut show_color = use_signal(|| false);

    if let Some(err) = init_error {
        return rsx! {
            div { class: "init-error",
                h1 { "Geopal" }
                p { "{err}" }
            }
        };
    }

    let guard = session.read();
    let Some(app) = guard.as_ref() else {
        return rsx! {};
    };
    let labels = app.labels().clone();
    let notice = app.sink().current().cloned();
    let lasso_active = app.drawing_state() == DrawingState::Drawing;
    let current_color = app.marker_style().stroke_color;
    drop(guard);

    let on_upload = move |file: PickedFile| {
        spawn(async move {
            let result = api::upload_geojson(file).await;
            let mut guard = session.write();
            let Some(app) = guard.as_mut() else { return };
            match result {
                Ok(resp) => {
                    if let Some(count) = app.handle_upload_response(&resp) {
                        tracing::info!(features = count, "Dataset uploaded");
                    }
                }
                Err(e) => app.report_upload_failure(&e),
            }
        });
    };

    rsx! {
        div { class: "app",
            Menu {
                labels: labels.menu.clone(),
                lasso_active: lasso_active,
                on_upload: move |_| show_upload.set(true),
                on_selection: move |_| {
                    if let Some(app) = session.write().as_mut() {
                        app.enable_lasso_mode();
                    }
                },
                on_change_color: move |_| show_color.set(true),
            }

            MapView { session: session }

            UploadDialog {
                show: show_upload,
                labels: labels.clone(),
                on_upload: on_upload,
            }

            ColorDialog {
                show: show_color,
                title: labels.titles.change_marker_icon.clone(),
                close_label: labels.buttons.close.clone(),
                current: current_color,
                on_change: move |value: String| {
                    match value.parse::<Rgb>() {
                        Ok(color) => {
                            if let Some(app) = session.write().as_mut() {
                                app.set_symbol_color(color);
                            }
                        }
                        Err(e) => tracing::warn!(error = %e, "Ignoring colour"),
                    }
                },
            }

            if let Some(notice) = notice {
                NoticeDialog {
                    notice: notice,
                    close_label: labels.buttons.close.clone(),
                    on_close: move |_| {
                        let dismissed = session
                            .write()
                            .as_mut()
                            .and_then(|app| app.sink_mut().dismiss());
                        if dismissed.is_some_and(|n| n.is_selection()) {
                            dispatch(session, MapEvent::ResultsClosed);
                        }
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_options_use_defaults() {
        let opts = parse_options(None).unwrap();
        assert_eq!(opts.container.as_deref(), Some(MAP_CONTAINER_ID));
        assert_eq!(opts.map.zoom, 15);
        assert_eq!(parse_options(Some("  \n")).unwrap(), opts);
    }

    #[test]
    fn test_embedded_options_are_parsed() {
        let opts = parse_options(Some(
            r##"{"container":"geopal-map","markerStyle":{"strokeColor":"#00ff00"},"labels":{"titles":{"error":"Oops"}}}"##,
        ))
        .unwrap();
        assert_eq!(opts.marker_style.stroke_color, "#00ff00");
        assert_eq!(opts.labels.titles.error, "Oops");
        assert_eq!(opts.labels.titles.upload_geo_json, "Upload GeoJSON");
    }

    #[test]
    fn test_embedded_options_without_container_fail_init() {
        let opts = parse_options(Some(r#"{"map":{"location":{"lat":0,"lng":0},"zoom":3}}"#)).unwrap();
        let result = Session::init(opts, NoticeBoard::default(), SceneSurface::new);
        assert!(result.is_err());
    }

    #[test]
    fn test_garbage_options_are_reported() {
        let err = parse_options(Some("{not json")).unwrap_err();
        assert!(err.starts_with("Invalid init options"));
    }
}
