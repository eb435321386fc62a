//! Attachment handler implementations

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::{
    error::{AppError, AppResult},
    handlers::MessageResponse,
    middleware::auth::AuthenticatedUser,
    models::{AnswerAttachment, ProblemAttachment},
    services::AttachmentService,
    state::AppState,
};

/// Pull the first file field out of a multipart body.
async fn read_upload(mut multipart: Multipart) -> AppResult<(String, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(e.to_string()))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        return Ok((filename, bytes.to_vec()));
    }

    Err(AppError::InvalidInput("No file uploaded".to_string()))
}

/// Stream attachment bytes back with a download disposition.
fn file_response(filename: String, bytes: Vec<u8>) -> Response {
    let disposition = format!("attachment; filename=\"{filename}\"");
    (
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response()
}

/// POST /attachments/modules/{module_id}/problems
pub async fn upload_problem(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(module_id): Path<i64>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ProblemAttachment>)> {
    let (filename, bytes) = read_upload(multipart).await?;
    let attachment =
        AttachmentService::upload_problem(&state, &user, module_id, &filename, &bytes).await?;
    Ok((StatusCode::CREATED, Json(attachment)))
}

/// GET /attachments/modules/{module_id}/problems
pub async fn list_problem_attachments(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(module_id): Path<i64>,
) -> AppResult<Json<Vec<ProblemAttachment>>> {
    let attachments = AttachmentService::list_problem(state.db(), &user, module_id).await?;
    Ok(Json(attachments))
}

/// GET /attachments/problems/{id}/download
pub async fn download_problem(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let (filename, bytes) = AttachmentService::download_problem(state.db(), &user, id).await?;
    Ok(file_response(filename, bytes))
}

/// DELETE /attachments/problems/{id}
pub async fn delete_problem(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    AttachmentService::delete_problem(state.db(), &user, id).await?;
    Ok(Json(MessageResponse::new(
        "Problem attachment deleted successfully",
    )))
}

/// POST /attachments/modules/{module_id}/answers
pub async fn upload_answer(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(module_id): Path<i64>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<AnswerAttachment>)> {
    let (filename, bytes) = read_upload(multipart).await?;
    let attachment =
        AttachmentService::upload_answer(&state, &user, module_id, &filename, &bytes).await?;
    Ok((StatusCode::CREATED, Json(attachment)))
}

/// GET /attachments/modules/{module_id}/answers/{contestant_id}
pub async fn list_answer_attachments(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path((module_id, contestant_id)): Path<(i64, i64)>,
) -> AppResult<Json<Vec<AnswerAttachment>>> {
    let attachments =
        AttachmentService::list_answers(state.db(), &user, module_id, contestant_id).await?;
    Ok(Json(attachments))
}

/// GET /attachments/answers/{id}/download
pub async fn download_answer(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Response> {
    let (filename, bytes) = AttachmentService::download_answer(state.db(), &user, id).await?;
    Ok(file_response(filename, bytes))
}

/// DELETE /attachments/answers/{id}
pub async fn delete_answer(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
) -> AppResult<Json<MessageResponse>> {
    AttachmentService::delete_answer(state.db(), &user, id).await?;
    Ok(Json(MessageResponse::new(
        "Answer attachment deleted successfully",
    )))
}
