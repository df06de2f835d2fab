// src/web/mod.rs
pub mod admin_handlers;
pub mod auth_handlers;
pub mod course_handlers;
pub mod extract;
pub mod lecture_handlers;
pub mod mw_auth;
pub mod mw_role;
pub mod routes;
pub mod student_handlers;
pub mod superadmin_handlers;
pub mod teacher_handlers;
