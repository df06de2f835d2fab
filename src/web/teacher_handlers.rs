// src/web/teacher_handlers.rs
use crate::{
    error::AppResult,
    models::{
        lecture::LectureFilter,
        user::{Principal, TeacherProfileUpdate},
    },
    services::{course_service, lecture_service, user_service},
    state::AppState,
    web::{
        extract::{AppJson, AppQuery},
        mw_role::tenant_of,
    },
};
use axum::{
    extract::{Extension, State},
    response::IntoResponse,
    Json,
};

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<impl IntoResponse> {
    let teacher = user_service::find_teacher(&state.db_pool, principal.id(), tenant_of(&principal)?).await?;
    Ok(Json(teacher))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppJson(form): AppJson<TeacherProfileUpdate>,
) -> AppResult<impl IntoResponse> {
    let teacher =
        user_service::update_teacher_profile(&state.db_pool, principal.id(), tenant_of(&principal)?, &form).await?;
    Ok(Json(teacher))
}

// GET /api/teacher/timetable: o "meu horário" do professor
pub async fn timetable(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppQuery(filter): AppQuery<LectureFilter>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(lecture_service::get_teacher_timetable(&state.db_pool, principal.id(), &filter).await?))
}

pub async fn subjects(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(course_service::list_teacher_subjects(&state.db_pool, principal.id()).await?))
}
