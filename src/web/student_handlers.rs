// src/web/student_handlers.rs
use crate::{
    error::AppResult,
    models::{
        lecture::DayOfWeek,
        user::{Principal, StudentProfileUpdate},
    },
    services::{course_service, lecture_service, user_service},
    state::AppState,
    web::{
        extract::AppJson,
        mw_role::tenant_of,
    },
};
use axum::{
    extract::{Extension, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<impl IntoResponse> {
    let student = user_service::find_student(&state.db_pool, principal.id(), tenant_of(&principal)?).await?;
    Ok(Json(student))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppJson(form): AppJson<StudentProfileUpdate>,
) -> AppResult<impl IntoResponse> {
    let student =
        user_service::update_student_profile(&state.db_pool, principal.id(), tenant_of(&principal)?, &form).await?;
    Ok(Json(student))
}

// GET /api/student/schedule/today
pub async fn today_schedule(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<impl IntoResponse> {
    let today = DayOfWeek::today();
    let lectures = lecture_service::get_today_schedule_for_student(&state.db_pool, principal.id(), today).await?;
    Ok(Json(json!({ "day": today, "lectures": lectures })))
}

pub async fn timetable(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(lecture_service::get_student_timetable(&state.db_pool, principal.id()).await?))
}

// Disciplinas do semestre atual do aluno
pub async fn subjects(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<impl IntoResponse> {
    let admin_id = tenant_of(&principal)?;
    let student = user_service::find_student(&state.db_pool, principal.id(), admin_id).await?;
    let subjects = match (student.course_id, student.semester) {
        (Some(course_id), Some(semester)) => {
            course_service::list_semester_subjects(&state.db_pool, &course_id, semester, admin_id).await?
        }
        _ => Vec::new(),
    };
    Ok(Json(subjects))
}
