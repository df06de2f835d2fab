mod common;

use common::*;
use schoolhub::{
    error::AppError,
    models::user::{
        NewStudentRequest, NewTeacherRequest, Role, StudentProfileUpdate, TeacherProfileUpdate,
        UpdateStudentRequest, UpdateTeacherRequest,
    },
    services::{auth_service, user_service},
};
use sqlx::SqlitePool;

fn new_student(email: &str, course_id: Option<&str>, semester: Option<i64>) -> NewStudentRequest {
    NewStudentRequest {
        name: "Ana".to_string(),
        email: email.to_string(),
        password: "student123".to_string(),
        phone: Some("555-0100".to_string()),
        roll_number: None,
        course_id: course_id.map(str::to_string),
        semester,
    }
}

async fn password_matches(pool: &SqlitePool, role: Role, id: &str, password: &str) -> bool {
    let credentials = user_service::find_credentials_by_id(pool, role, id)
        .await
        .unwrap()
        .expect("account should exist");
    auth_service::verify_password(password, &credentials.password_hash).await.unwrap()
}

fn assert_validation(result: Result<impl std::fmt::Debug, AppError>, expected: &str) {
    match result {
        Err(AppError::Validation(msg)) => assert!(msg.contains(expected), "message '{}' lacks '{}'", msg, expected),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn enrollment_must_point_at_a_semester_of_an_own_course() {
    let pool = test_pool().await;
    let admin = seed_admin(&pool, "admin@school.test").await;
    let other = seed_admin(&pool, "other@school.test").await;
    let own_course = seed_course(&pool, &admin.id, "B.Sc CS", 2).await;
    let foreign_course = seed_course(&pool, &other.id, "MBA", 2).await;

    let foreign = new_student("a@school.test", Some(&foreign_course.id), Some(1));
    assert_validation(user_service::create_student(&pool, &admin.id, &foreign, TEST_COST).await, "Invalid course");

    let out_of_range = new_student("b@school.test", Some(&own_course.id), Some(5));
    assert_validation(
        user_service::create_student(&pool, &admin.id, &out_of_range, TEST_COST).await,
        "Semester must be between 1 and 4",
    );

    let orphan_semester = new_student("c@school.test", None, Some(2));
    assert_validation(
        user_service::create_student(&pool, &admin.id, &orphan_semester, TEST_COST).await,
        "A semester requires a course",
    );
    assert_eq!(count(&pool, "students").await, 0);

    let enrolled = user_service::create_student(
        &pool,
        &admin.id,
        &new_student("d@school.test", Some(&own_course.id), Some(4)),
        TEST_COST,
    )
    .await
    .unwrap();
    assert_eq!(enrolled.semester, Some(4));
}

#[tokio::test]
async fn emails_are_unique_per_role_ignoring_case() {
    let pool = test_pool().await;
    let admin = seed_admin(&pool, "admin@school.test").await;
    seed_teacher(&pool, &admin.id, "Dr. Rao", "rao@school.test").await;
    seed_student(&pool, &admin.id, "ana@school.test", None, None).await;

    let teacher = NewTeacherRequest {
        name: "Other Rao".to_string(),
        email: "RAO@school.test".to_string(),
        password: "teacher123".to_string(),
        phone: None,
        department: None,
        qualification: None,
    };
    assert_validation(
        user_service::create_teacher(&pool, &admin.id, &teacher, TEST_COST).await,
        "Email already registered",
    );

    let student = new_student("Ana@School.test", None, None);
    assert_validation(
        user_service::create_student(&pool, &admin.id, &student, TEST_COST).await,
        "Email already registered",
    );

    // Cada role tem a sua tabela: o mesmo email pode existir noutra role
    let as_student = new_student("rao@school.test", None, None);
    assert!(user_service::create_student(&pool, &admin.id, &as_student, TEST_COST).await.is_ok());
}

#[tokio::test]
async fn admin_updates_teacher_fields_and_password() {
    let pool = test_pool().await;
    let admin = seed_admin(&pool, "admin@school.test").await;
    let rao = seed_teacher(&pool, &admin.id, "Dr. Rao", "rao@school.test").await;
    seed_teacher(&pool, &admin.id, "Dr. Sen", "sen@school.test").await;

    let steal_email = UpdateTeacherRequest { email: Some("sen@school.test".into()), ..Default::default() };
    assert_validation(
        user_service::update_teacher(&pool, &rao.id, &admin.id, &steal_email, TEST_COST).await,
        "Email already registered",
    );

    let short_password = UpdateTeacherRequest { password: Some("abc".into()), ..Default::default() };
    assert_validation(
        user_service::update_teacher(&pool, &rao.id, &admin.id, &short_password, TEST_COST).await,
        "Password must be at least",
    );

    let form = UpdateTeacherRequest {
        name: Some("Dr. R. Rao".into()),
        password: Some("newpass123".into()),
        phone: Some(Some("555-0199".into())),
        department: Some(None),
        ..Default::default()
    };
    let updated = user_service::update_teacher(&pool, &rao.id, &admin.id, &form, TEST_COST).await.unwrap();
    assert_eq!(updated.name, "Dr. R. Rao");
    assert_eq!(updated.email, "rao@school.test");
    assert_eq!(updated.phone.as_deref(), Some("555-0199"));
    assert!(updated.department.is_none());
    assert!(password_matches(&pool, Role::Teacher, &rao.id, "newpass123").await);
}

#[tokio::test]
async fn teacher_profile_update_keeps_credentials() {
    let pool = test_pool().await;
    let admin = seed_admin(&pool, "admin@school.test").await;
    let rao = seed_teacher(&pool, &admin.id, "Dr. Rao", "rao@school.test").await;

    let update = TeacherProfileUpdate {
        qualification: Some(Some("PhD".into())),
        department: Some(None),
        ..Default::default()
    };
    let updated = user_service::update_teacher_profile(&pool, &rao.id, &admin.id, &update).await.unwrap();
    assert_eq!(updated.qualification.as_deref(), Some("PhD"));
    assert!(updated.department.is_none());
    assert_eq!(updated.email, "rao@school.test");
    assert!(password_matches(&pool, Role::Teacher, &rao.id, "teacher123").await);

    let other = seed_admin(&pool, "other@school.test").await;
    let result = user_service::update_teacher_profile(&pool, &rao.id, &other.id, &update).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn student_can_be_moved_and_unenrolled() {
    let pool = test_pool().await;
    let admin = seed_admin(&pool, "admin@school.test").await;
    let cs = seed_course(&pool, &admin.id, "B.Sc CS", 3).await;
    let mba = seed_course(&pool, &admin.id, "MBA", 1).await;
    let student = seed_student(&pool, &admin.id, "ana@school.test", Some(&cs.id), Some(5)).await;

    // Mudar para um curso mais curto mantendo o semestre 5 é inválido
    let move_only_course = UpdateStudentRequest { course_id: Some(Some(mba.id.clone())), ..Default::default() };
    assert_validation(
        user_service::update_student(&pool, &student.id, &admin.id, &move_only_course, TEST_COST).await,
        "Semester must be between 1 and 2",
    );

    let move_both = UpdateStudentRequest {
        course_id: Some(Some(mba.id.clone())),
        semester: Some(Some(2)),
        ..Default::default()
    };
    let moved = user_service::update_student(&pool, &student.id, &admin.id, &move_both, TEST_COST).await.unwrap();
    assert_eq!(moved.course_id.as_deref(), Some(mba.id.as_str()));
    assert_eq!(moved.semester, Some(2));

    let unenroll = UpdateStudentRequest { course_id: Some(None), ..Default::default() };
    let unenrolled = user_service::update_student(&pool, &student.id, &admin.id, &unenroll, TEST_COST).await.unwrap();
    assert!(unenrolled.course_id.is_none());
    assert!(unenrolled.semester.is_none());

    let semester_alone = UpdateStudentRequest { semester: Some(Some(1)), ..Default::default() };
    assert_validation(
        user_service::update_student(&pool, &student.id, &admin.id, &semester_alone, TEST_COST).await,
        "A semester requires a course",
    );
}

#[tokio::test]
async fn student_profile_update_only_touches_contact_fields() {
    let pool = test_pool().await;
    let admin = seed_admin(&pool, "admin@school.test").await;
    let course = seed_course(&pool, &admin.id, "B.Sc CS", 3).await;
    let student = user_service::create_student(
        &pool,
        &admin.id,
        &new_student("ana@school.test", Some(&course.id), Some(3)),
        TEST_COST,
    )
    .await
    .unwrap();
    assert_eq!(student.phone.as_deref(), Some("555-0100"));

    let update = StudentProfileUpdate { name: Some("Ana Maria".into()), phone: Some(None) };
    let updated = user_service::update_student_profile(&pool, &student.id, &admin.id, &update).await.unwrap();
    assert_eq!(updated.name, "Ana Maria");
    assert!(updated.phone.is_none());
    assert_eq!(updated.course_id.as_deref(), Some(course.id.as_str()));
    assert_eq!(updated.semester, Some(3));
    assert!(password_matches(&pool, Role::Student, &student.id, "student123").await);
}
