// src/web/admin_handlers.rs
use crate::{
    error::AppResult,
    models::user::{
        AdminProfileUpdate, NewStudentRequest, NewTeacherRequest, Principal, UpdateStudentRequest,
        UpdateTeacherRequest,
    },
    services::{cascade_service, user_service},
    state::AppState,
    web::{
        extract::{AppJson, AppPath},
        mw_role::tenant_of,
    },
};
use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

// --- Perfil ---

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(user_service::find_profile(&state.db_pool, &principal).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppJson(form): AppJson<AdminProfileUpdate>,
) -> AppResult<impl IntoResponse> {
    let admin = user_service::update_admin_profile(&state.db_pool, principal.id(), &form).await?;
    Ok(Json(admin))
}

// --- Professores ---

pub async fn list_teachers(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<impl IntoResponse> {
    let teachers = user_service::list_teachers(&state.db_pool, tenant_of(&principal)?).await?;
    Ok(Json(teachers))
}

pub async fn create_teacher(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppJson(form): AppJson<NewTeacherRequest>,
) -> AppResult<impl IntoResponse> {
    let teacher =
        user_service::create_teacher(&state.db_pool, tenant_of(&principal)?, &form, state.config.bcrypt_cost).await?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

pub async fn get_teacher(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppPath(id): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(user_service::find_teacher(&state.db_pool, &id, tenant_of(&principal)?).await?))
}

pub async fn update_teacher(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppPath(id): AppPath<String>,
    AppJson(form): AppJson<UpdateTeacherRequest>,
) -> AppResult<impl IntoResponse> {
    let teacher =
        user_service::update_teacher(&state.db_pool, &id, tenant_of(&principal)?, &form, state.config.bcrypt_cost)
            .await?;
    Ok(Json(teacher))
}

pub async fn delete_teacher(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppPath(id): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let report = cascade_service::delete_teacher(&state.db_pool, &id, tenant_of(&principal)?).await?;
    Ok(Json(json!({ "success": true, "message": "Teacher deleted", "report": report })))
}

// --- Alunos ---

pub async fn list_students(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<impl IntoResponse> {
    let students = user_service::list_students(&state.db_pool, tenant_of(&principal)?).await?;
    Ok(Json(students))
}

pub async fn create_student(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppJson(form): AppJson<NewStudentRequest>,
) -> AppResult<impl IntoResponse> {
    let student =
        user_service::create_student(&state.db_pool, tenant_of(&principal)?, &form, state.config.bcrypt_cost).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn get_student(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppPath(id): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    Ok(Json(user_service::find_student(&state.db_pool, &id, tenant_of(&principal)?).await?))
}

pub async fn update_student(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppPath(id): AppPath<String>,
    AppJson(form): AppJson<UpdateStudentRequest>,
) -> AppResult<impl IntoResponse> {
    let student =
        user_service::update_student(&state.db_pool, &id, tenant_of(&principal)?, &form, state.config.bcrypt_cost)
            .await?;
    Ok(Json(student))
}

pub async fn delete_student(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    AppPath(id): AppPath<String>,
) -> AppResult<impl IntoResponse> {
    let report = cascade_service::delete_student(&state.db_pool, &id, tenant_of(&principal)?).await?;
    Ok(Json(json!({ "success": true, "message": "Student deleted", "report": report })))
}
