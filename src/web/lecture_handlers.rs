// src/web/lecture_handlers.rs
use crate::{
    error::AppResult,
    models::{
        lecture::{LectureFilter, LectureRequest},
        user::Principal,
    },
    services::lecture_service,
    state::AppState,
    web::extract::{AppJson, AppPath, AppQuery},
};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

// GET /api/lecture?search=&teacherId=&courseId=&semester=&day=
pub async fn list_lectures(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppQuery(filter): AppQuery<LectureFilter>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(lecture_service::list_lectures(&state.db_pool, principal.id(), &filter).await?))
}

// POST /api/lecture
pub async fn assign_lecture(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppJson(form): AppJson<LectureRequest>,
) -> AppResult<impl IntoResponse> {
    let lecture = lecture_service::assign_lecture(&state.db_pool, principal.id(), &form).await?;
    Ok((StatusCode::CREATED, Json(lecture)))
}

// GET /api/lecture/course/{course_id}/semester/{number}
pub async fn lectures_by_course_and_semester(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppPath((course_id, semester)): AppPath<(String, i64)>,
) -> AppResult<impl IntoResponse> {
    let lectures =
        lecture_service::get_lectures_by_course_and_semester(&state.db_pool, principal.id(), &course_id, semester)
            .await?;
    Ok(Json(lectures))
}

pub async fn update_lecture(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppPath(id): AppPath<String>,
    AppJson(form): AppJson<LectureRequest>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(lecture_service::update_lecture(&state.db_pool, &id, principal.id(), &form).await?))
}

pub async fn delete_lecture(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppPath(id): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    lecture_service::delete_lecture(&state.db_pool, &id, principal.id()).await?;
    Ok(Json(json!({ "success": true, "message": "Lecture deleted" })))
}
