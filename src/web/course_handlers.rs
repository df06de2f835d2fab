// src/web/course_handlers.rs
use crate::{
    error::AppResult,
    models::{
        course::{NewCourseRequest, NewSubjectRequest, UpdateCourseRequest, UpdateSubjectRequest},
        user::Principal,
    },
    services::course_service,
    state::AppState,
    web::extract::{AppJson, AppPath},
};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

// Estas rotas só passam pelo require_admin: o tenant é o próprio admin

pub async fn list_courses(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(course_service::list_courses(&state.db_pool, principal.id()).await?))
}

pub async fn create_course(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppJson(form): AppJson<NewCourseRequest>,
) -> AppResult<impl IntoResponse> {
    let course = course_service::create_course(&state.db_pool, principal.id(), &form).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub async fn get_course(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppPath(id): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(course_service::get_course(&state.db_pool, &id, principal.id()).await?))
}

pub async fn update_course(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppPath(id): AppPath<String>,
    AppJson(form): AppJson<UpdateCourseRequest>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(course_service::update_course(&state.db_pool, &id, principal.id(), &form).await?))
}

pub async fn delete_course(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppPath(id): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let report = course_service::delete_course(&state.db_pool, &id, principal.id()).await?;
    Ok(Json(json!({
        "success": true,
        "message": "Course and related subjects/lectures deleted",
        "report": report,
    })))
}

// GET /api/course/{id}/semesters/{number}/subjects
pub async fn list_semester_subjects(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppPath((course_id, number)): AppPath<(String, i64)>,
) -> AppResult<impl IntoResponse> {
    let subjects = course_service::list_semester_subjects(&state.db_pool, &course_id, number, principal.id()).await?;
    Ok(Json(subjects))
}

// POST /api/course/{id}/semesters/{number}/subjects
pub async fn add_subject(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppPath((course_id, number)): AppPath<(String, i64)>,
    AppJson(form): AppJson<NewSubjectRequest>,
) -> AppResult<impl IntoResponse> {
    let subject = course_service::add_subject(&state.db_pool, &course_id, number, principal.id(), &form).await?;
    Ok((StatusCode::CREATED, Json(subject)))
}

pub async fn update_subject(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppPath(id): AppPath<String>,
    AppJson(form): AppJson<UpdateSubjectRequest>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(course_service::update_subject(&state.db_pool, &id, principal.id(), &form).await?))
}

pub async fn delete_subject(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppPath(id): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let report = course_service::delete_subject(&state.db_pool, &id, principal.id()).await?;
    Ok(Json(json!({ "success": true, "message": "Subject deleted", "report": report })))
}
