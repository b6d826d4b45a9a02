use axum::extract::multipart::MultipartRejection;
use axum::extract::Multipart;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use geopal_shared::upload::{is_acceptable_json, UPLOAD_FIELD};

/// `POST /upload`: echo the `uploadFile` part back as JSON when it decodes.
///
/// 200 with the part verbatim, 415 when it is not JSON (or is `null`),
/// 400 when the part is missing or the body is not multipart at all.
/// Oversize bodies surface as 413 from the multipart reader. Error responses
/// never carry a body.
pub async fn upload(multipart: Result<Multipart, MultipartRejection>) -> Response {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::info!(error = %rejection, status = 400, "Upload is not multipart");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, status = %e.status(), "Failed to read multipart body");
                return e.status().into_response();
            }
        };
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("").to_string();
        let bytes = match field.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(error = %e, file_name = %file_name, "Failed to read upload");
                return e.status().into_response();
            }
        };

        if !is_acceptable_json(&bytes) {
            tracing::info!(file_name = %file_name, size = bytes.len(), status = 415, "Upload rejected");
            return StatusCode::UNSUPPORTED_MEDIA_TYPE.into_response();
        }

        tracing::info!(file_name = %file_name, size = bytes.len(), status = 200, "Upload accepted");
        return ([(header::CONTENT_TYPE, "application/json")], bytes).into_response();
    }

    tracing::info!(status = 400, "Upload without a file field");
    StatusCode::BAD_REQUEST.into_response()
}
