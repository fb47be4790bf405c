use crate::{decode::decode_rgb8, engine::VqaEngine, error::VqaError, model::VqaRequest};
use axum::{
    Json, Router,
    body::Bytes,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::MultipartRejection,
    },
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Successful answer to `POST /vqa/`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VqaResponse {
    pub answer: String,
}

/// The form parts of a `POST /vqa/` request.
struct VqaForm {
    image: Bytes,
    question: String,
}

impl VqaForm {
    async fn read(mut multipart: Multipart) -> Result<Self, VqaError> {
        let mut image = None;
        let mut question = None;

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_owned);
            match name.as_deref() {
                Some("image") => image = Some(field.bytes().await?),
                Some("question") => question = Some(field.text().await?),
                other => log::debug!("Ignoring unexpected form field {:?}", other),
            }
        }

        Ok(Self {
            image: image.ok_or(VqaError::MissingField("image"))?,
            question: question.ok_or(VqaError::MissingField("question"))?,
        })
    }
}

async fn post_vqa(
    State(engine): State<Arc<VqaEngine>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VqaResponse>, VqaError> {
    let form = VqaForm::read(multipart?).await?;

    let upload = form.image;
    let image = tokio::task::spawn_blocking(move || decode_rgb8(&upload))
        .await
        .map_err(|e| VqaError::InvalidImage(e.to_string()))??;

    log::debug!(
        "Answering {:?} on a {}x{} image",
        form.question,
        image.size().width,
        image.size().height
    );

    let response = engine
        .answer(VqaRequest {
            image,
            question: form.question,
        })
        .await?;

    log::info!("Answered request {} in {:?}", response.id, response.duration);

    Ok(Json(VqaResponse {
        answer: response.answer,
    }))
}

async fn get_status(State(engine): State<Arc<VqaEngine>>) -> impl IntoResponse {
    Json(json!({
        "status": engine.state().as_str(),
        "in_flight": engine.in_flight(),
        "max_in_flight": engine.max_in_flight(),
    }))
}

/// Builds the service router around an already loaded engine.
///
/// `max_upload_bytes` caps the whole request body; larger uploads are
/// rejected with `413 Payload Too Large`.
pub fn router(engine: Arc<VqaEngine>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(|| async { "Welcome to kornia-vqa!" }))
        .route("/vqa/", post(post_vqa))
        .route("/status", get(get_status))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(engine)
}
