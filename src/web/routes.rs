// src/web/routes.rs
use crate::{
    error::AppResult,
    state::AppState,
    web::{
        admin_handlers, auth_handlers, course_handlers, lecture_handlers, mw_auth, mw_role, student_handlers,
        superadmin_handlers, teacher_handlers,
    },
};
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_cookies::CookieManagerLayer;

async fn health(State(state): State<AppState>) -> AppResult<StatusCode> {
    sqlx::query("SELECT 1").execute(&state.db_pool).await?;
    Ok(StatusCode::OK)
}

pub fn create_router(app_state: AppState) -> Router {
    // --- Rotas Públicas ---
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/api/auth/login", post(auth_handlers::handle_login))
        .route("/api/auth/logout", post(auth_handlers::handle_logout))
        .route("/api/auth/register-admin", post(auth_handlers::handle_register_admin));

    // --- Super-admin ---
    let superadmin_routes = Router::new()
        .route("/admins", get(superadmin_handlers::list_admins))
        .route("/admins/{id}", delete(superadmin_handlers::delete_admin))
        .route(
            "/settings",
            get(superadmin_handlers::get_settings).put(superadmin_handlers::update_settings),
        )
        .route_layer(middleware::from_fn(mw_role::require_super_admin));

    // --- Admin: perfil, professores, alunos ---
    let admin_routes = Router::new()
        .route("/profile", get(admin_handlers::get_profile).put(admin_handlers::update_profile))
        .route("/teachers", get(admin_handlers::list_teachers).post(admin_handlers::create_teacher))
        .route(
            "/teachers/{id}",
            get(admin_handlers::get_teacher)
                .put(admin_handlers::update_teacher)
                .delete(admin_handlers::delete_teacher),
        )
        .route("/students", get(admin_handlers::list_students).post(admin_handlers::create_student))
        .route(
            "/students/{id}",
            get(admin_handlers::get_student)
                .put(admin_handlers::update_student)
                .delete(admin_handlers::delete_student),
        )
        .route_layer(middleware::from_fn(mw_role::require_admin));

    // --- Cursos, semestres e disciplinas (admin) ---
    let course_routes = Router::new()
        .route("/", get(course_handlers::list_courses).post(course_handlers::create_course))
        .route(
            "/{id}",
            get(course_handlers::get_course)
                .put(course_handlers::update_course)
                .delete(course_handlers::delete_course),
        )
        .route(
            "/{id}/semesters/{number}/subjects",
            get(course_handlers::list_semester_subjects).post(course_handlers::add_subject),
        )
        .route(
            "/subjects/{id}",
            put(course_handlers::update_subject).delete(course_handlers::delete_subject),
        )
        .route_layer(middleware::from_fn(mw_role::require_admin));

    // --- Aulas (admin) ---
    let lecture_routes = Router::new()
        .route("/", get(lecture_handlers::list_lectures).post(lecture_handlers::assign_lecture))
        .route(
            "/course/{course_id}/semester/{number}",
            get(lecture_handlers::lectures_by_course_and_semester),
        )
        .route(
            "/{id}",
            put(lecture_handlers::update_lecture).delete(lecture_handlers::delete_lecture),
        )
        .route_layer(middleware::from_fn(mw_role::require_admin));

    let teacher_routes = Router::new()
        .route("/profile", get(teacher_handlers::get_profile).put(teacher_handlers::update_profile))
        .route("/timetable", get(teacher_handlers::timetable))
        .route("/subjects", get(teacher_handlers::subjects))
        .route_layer(middleware::from_fn(mw_role::require_teacher));

    let student_routes = Router::new()
        .route("/profile", get(student_handlers::get_profile).put(student_handlers::update_profile))
        .route("/schedule/today", get(student_handlers::today_schedule))
        .route("/timetable", get(student_handlers::timetable))
        .route("/subjects", get(student_handlers::subjects))
        .route_layer(middleware::from_fn(mw_role::require_student));

    // --- Rotas Autenticadas ---
    // require_auth corre antes de qualquer gate de role aninhado
    let authenticated_routes = Router::new()
        .route("/api/auth/me", get(auth_handlers::handle_me))
        .route("/api/auth/change-password", put(auth_handlers::handle_change_password))
        .nest("/api/superadmin", superadmin_routes)
        .nest("/api/admin", admin_routes)
        .nest("/api/course", course_routes)
        .nest("/api/lecture", lecture_routes)
        .nest("/api/teacher", teacher_routes)
        .nest("/api/student", student_routes)
        .route_layer(middleware::from_fn_with_state(app_state.clone(), mw_auth::require_auth));

    // --- Router Final ---
    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .layer(CookieManagerLayer::new())
        .with_state(app_state)
}
