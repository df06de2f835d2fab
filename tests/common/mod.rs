// tests/common/mod.rs
#![allow(dead_code)]

use schoolhub::{
    db,
    models::{
        course::{Course, NewCourseRequest, NewSubjectRequest, Subject},
        user::{Admin, NewStudentRequest, NewTeacherRequest, RegisterAdminRequest, Student, Teacher},
    },
    services::{course_service, settings_service::SettingsService, user_service},
};
use sqlx::SqlitePool;

pub const TEST_COST: u32 = 4;

/// Base de dados em memória com as migrações reais (uma só conexão).
pub async fn test_pool() -> SqlitePool {
    db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to create in-memory database")
}

pub async fn seed_admin(pool: &SqlitePool, email: &str) -> Admin {
    let settings = SettingsService::new(pool.clone());
    let form = RegisterAdminRequest {
        name: format!("Admin {}", email),
        email: email.to_string(),
        password: "admin123".to_string(),
        phone: None,
        institute_name: Some("Instituto".to_string()),
    };
    user_service::register_admin(pool, &settings, &form, TEST_COST)
        .await
        .expect("Failed to register admin")
}

pub async fn seed_teacher(pool: &SqlitePool, admin_id: &str, name: &str, email: &str) -> Teacher {
    let form = NewTeacherRequest {
        name: name.to_string(),
        email: email.to_string(),
        password: "teacher123".to_string(),
        phone: None,
        department: Some("Computer Science".to_string()),
        qualification: None,
    };
    user_service::create_teacher(pool, admin_id, &form, TEST_COST)
        .await
        .expect("Failed to create teacher")
}

pub async fn seed_student(
    pool: &SqlitePool,
    admin_id: &str,
    email: &str,
    course_id: Option<&str>,
    semester: Option<i64>,
) -> Student {
    let form = NewStudentRequest {
        name: format!("Student {}", email),
        email: email.to_string(),
        password: "student123".to_string(),
        phone: None,
        roll_number: Some("R-001".to_string()),
        course_id: course_id.map(str::to_string),
        semester,
    };
    user_service::create_student(pool, admin_id, &form, TEST_COST)
        .await
        .expect("Failed to create student")
}

pub async fn seed_course(pool: &SqlitePool, admin_id: &str, name: &str, duration: i64) -> Course {
    let form = NewCourseRequest { name: name.to_string(), duration };
    course_service::create_course(pool, admin_id, &form)
        .await
        .expect("Failed to create course")
}

pub async fn seed_subject(
    pool: &SqlitePool,
    course_id: &str,
    semester: i64,
    admin_id: &str,
    name: &str,
    code: &str,
) -> Subject {
    let form = NewSubjectRequest { name: name.to_string(), code: code.to_string(), description: None };
    course_service::add_subject(pool, course_id, semester, admin_id, &form)
        .await
        .expect("Failed to add subject")
}

pub async fn count(pool: &SqlitePool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .expect("Failed to count rows")
}
