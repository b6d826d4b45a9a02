use geopal_shared::upload::{UploadResponse, UPLOAD_FIELD, UPLOAD_PATH};
use reqwest::multipart::{Form, Part};

/// A file picked in the upload dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Build the gateway URL from the page origin.
pub fn build_upload_url(origin: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), UPLOAD_PATH)
}

fn upload_url() -> Result<String, String> {
    // In production, same origin.
    let window = web_sys::window().ok_or("No window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| "Page origin unavailable".to_string())?;
    Ok(build_upload_url(&origin))
}

/// POST the file as multipart `uploadFile`. Any HTTP status is a response;
/// only transport failures are errors.
pub async fn upload_geojson(file: PickedFile) -> Result<UploadResponse, String> {
    let size = file.bytes.len();
    let part = Part::bytes(file.bytes)
        .file_name(file.name)
        .mime_str("application/json")
        .map_err(|e| e.to_string())?;
    let form = Form::new().part(UPLOAD_FIELD, part);

    let resp = reqwest::Client::new()
        .post(upload_url()?)
        .multipart(form)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    let status = resp.status().as_u16();
    let body = resp.text().await.map_err(|e| e.to_string())?;
    tracing::debug!(size, status, "Upload round trip finished");
    Ok(UploadResponse::new(status, body))
}
