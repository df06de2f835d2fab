mod common;

use common::*;
use schoolhub::{
    error::AppError,
    models::lecture::{DayOfWeek, LectureFilter, LectureRequest},
    services::{course_service, lecture_service},
};

fn request(teacher_id: &str, course_id: &str, subject_id: &str, day: &str, slot: &str, semester: i64) -> LectureRequest {
    LectureRequest {
        teacher_id: teacher_id.to_string(),
        course_id: course_id.to_string(),
        subject_id: subject_id.to_string(),
        day: day.to_string(),
        time_slot: slot.to_string(),
        semester,
    }
}

#[tokio::test]
async fn assigning_a_lecture_returns_populated_record() {
    let pool = test_pool().await;
    let admin = seed_admin(&pool, "admin@school.test").await;
    let course = seed_course(&pool, &admin.id, "B.Sc CS", 3).await;
    let dbms = seed_subject(&pool, &course.id, 3, &admin.id, "DBMS", "CS301").await;
    let teacher = seed_teacher(&pool, &admin.id, "Dr. Rao", "rao@school.test").await;

    let form = request(&teacher.id, &course.id, &dbms.id, "Monday", "09:00 AM - 10:00 AM", 3);
    let lecture = lecture_service::assign_lecture(&pool, &admin.id, &form).await.unwrap();

    assert_eq!(lecture.teacher.name, "Dr. Rao");
    assert_eq!(lecture.course.name, "B.Sc CS");
    assert_eq!(lecture.subject.code, "CS301");
    assert_eq!(lecture.day, "Monday");
    assert_eq!(lecture.time_slot, "09:00 AM - 10:00 AM");
    assert_eq!(lecture.semester, 3);
    assert_eq!(lecture.admin, admin.id);

    let stored = lecture_service::get_lectures_by_course_and_semester(&pool, &admin.id, &course.id, 3)
        .await
        .unwrap();
    assert_eq!(stored, vec![lecture]);

    let subject = course_service::find_subject(&pool, &dbms.id, &admin.id).await.unwrap();
    assert_eq!(subject.teacher_id.as_deref(), Some(teacher.id.as_str()));
}

#[tokio::test]
async fn lowercase_day_is_normalized() {
    let pool = test_pool().await;
    let admin = seed_admin(&pool, "admin@school.test").await;
    let course = seed_course(&pool, &admin.id, "B.Sc CS", 3).await;
    let subject = seed_subject(&pool, &course.id, 1, &admin.id, "Maths", "MA101").await;
    let teacher = seed_teacher(&pool, &admin.id, "Dr. Rao", "rao@school.test").await;

    let form = request(&teacher.id, &course.id, &subject.id, "friday", "10:00 AM - 11:00 AM", 1);
    let lecture = lecture_service::assign_lecture(&pool, &admin.id, &form).await.unwrap();
    assert_eq!(lecture.day, "Friday");
}

#[tokio::test]
async fn unknown_references_create_nothing() {
    let pool = test_pool().await;
    let admin = seed_admin(&pool, "admin@school.test").await;
    let course = seed_course(&pool, &admin.id, "B.Sc CS", 3).await;
    let subject = seed_subject(&pool, &course.id, 1, &admin.id, "Maths", "MA101").await;
    let teacher = seed_teacher(&pool, &admin.id, "Dr. Rao", "rao@school.test").await;

    let cases = [
        request("missing", &course.id, &subject.id, "Monday", "09:00 AM - 10:00 AM", 1),
        request(&teacher.id, "missing", &subject.id, "Monday", "09:00 AM - 10:00 AM", 1),
        request(&teacher.id, &course.id, "missing", "Monday", "09:00 AM - 10:00 AM", 1),
    ];
    for form in &cases {
        let err = lecture_service::assign_lecture(&pool, &admin.id, form).await.unwrap_err();
        assert!(
            matches!(err, AppError::NotFound(ref m) if m == "Invalid teacher, course, or subject"),
            "unexpected error: {:?}",
            err
        );
    }
    assert_eq!(count(&pool, "lectures").await, 0);
}

#[tokio::test]
async fn references_from_another_tenant_are_rejected() {
    let pool = test_pool().await;
    let owner = seed_admin(&pool, "owner@school.test").await;
    let other = seed_admin(&pool, "other@school.test").await;
    let course = seed_course(&pool, &owner.id, "B.Sc CS", 3).await;
    let subject = seed_subject(&pool, &course.id, 1, &owner.id, "Maths", "MA101").await;
    let foreign_teacher = seed_teacher(&pool, &other.id, "Dr. Sen", "sen@school.test").await;

    let form = request(&foreign_teacher.id, &course.id, &subject.id, "Monday", "09:00 AM - 10:00 AM", 1);
    let err = lecture_service::assign_lecture(&pool, &owner.id, &form).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = lecture_service::assign_lecture(&pool, &other.id, &form).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(count(&pool, "lectures").await, 0);
}

#[tokio::test]
async fn invalid_slot_details_are_validation_errors() {
    let pool = test_pool().await;
    let admin = seed_admin(&pool, "admin@school.test").await;
    let course = seed_course(&pool, &admin.id, "B.Sc CS", 3).await;
    let subject = seed_subject(&pool, &course.id, 3, &admin.id, "DBMS", "CS301").await;
    let teacher = seed_teacher(&pool, &admin.id, "Dr. Rao", "rao@school.test").await;

    let cases = [
        request(&teacher.id, &course.id, &subject.id, "Funday", "09:00 AM - 10:00 AM", 3),
        request(&teacher.id, &course.id, &subject.id, "Monday", "   ", 3),
        request(&teacher.id, &course.id, &subject.id, "Monday", "09:00 AM - 10:00 AM", 7),
        request(&teacher.id, &course.id, &subject.id, "Monday", "09:00 AM - 10:00 AM", 2),
    ];
    for form in &cases {
        let result = lecture_service::assign_lecture(&pool, &admin.id, form).await;
        assert!(matches!(result, Err(AppError::Validation(_))), "accepted {:?}", form);
    }
    assert_eq!(count(&pool, "lectures").await, 0);
}

#[tokio::test]
async fn subject_teacher_follows_the_latest_assignment() {
    let pool = test_pool().await;
    let admin = seed_admin(&pool, "admin@school.test").await;
    let course = seed_course(&pool, &admin.id, "B.Sc CS", 3).await;
    let subject = seed_subject(&pool, &course.id, 3, &admin.id, "DBMS", "CS301").await;
    let rao = seed_teacher(&pool, &admin.id, "Dr. Rao", "rao@school.test").await;
    let sen = seed_teacher(&pool, &admin.id, "Dr. Sen", "sen@school.test").await;

    let monday = request(&rao.id, &course.id, &subject.id, "Monday", "09:00 AM - 10:00 AM", 3);
    lecture_service::assign_lecture(&pool, &admin.id, &monday).await.unwrap();
    let tuesday = request(&sen.id, &course.id, &subject.id, "Tuesday", "09:00 AM - 10:00 AM", 3);
    lecture_service::assign_lecture(&pool, &admin.id, &tuesday).await.unwrap();

    let subject = course_service::find_subject(&pool, &subject.id, &admin.id).await.unwrap();
    assert_eq!(subject.teacher_id.as_deref(), Some(sen.id.as_str()));
    assert_eq!(count(&pool, "lectures").await, 2);

    let rao_subjects = course_service::list_teacher_subjects(&pool, &rao.id).await.unwrap();
    assert!(rao_subjects.is_empty());
    let rao_timetable = lecture_service::get_teacher_timetable(&pool, &rao.id, &LectureFilter::default())
        .await
        .unwrap();
    assert_eq!(rao_timetable.len(), 1);
}

#[tokio::test]
async fn update_replaces_every_field() {
    let pool = test_pool().await;
    let admin = seed_admin(&pool, "admin@school.test").await;
    let course = seed_course(&pool, &admin.id, "B.Sc CS", 3).await;
    let dbms = seed_subject(&pool, &course.id, 3, &admin.id, "DBMS", "CS301").await;
    let maths = seed_subject(&pool, &course.id, 1, &admin.id, "Maths", "MA101").await;
    let rao = seed_teacher(&pool, &admin.id, "Dr. Rao", "rao@school.test").await;
    let sen = seed_teacher(&pool, &admin.id, "Dr. Sen", "sen@school.test").await;

    let form = request(&rao.id, &course.id, &dbms.id, "Monday", "09:00 AM - 10:00 AM", 3);
    let lecture = lecture_service::assign_lecture(&pool, &admin.id, &form).await.unwrap();

    let change = request(&sen.id, &course.id, &maths.id, "Wednesday", "02:00 PM - 03:00 PM", 1);
    let updated = lecture_service::update_lecture(&pool, &lecture.id, &admin.id, &change).await.unwrap();
    assert_eq!(updated.id, lecture.id);
    assert_eq!(updated.teacher.id, sen.id);
    assert_eq!(updated.subject.code, "MA101");
    assert_eq!(updated.day, "Wednesday");
    assert_eq!(updated.semester, 1);

    let maths = course_service::find_subject(&pool, &maths.id, &admin.id).await.unwrap();
    assert_eq!(maths.teacher_id.as_deref(), Some(sen.id.as_str()));
}

#[tokio::test]
async fn delete_is_scoped_to_the_tenant() {
    let pool = test_pool().await;
    let owner = seed_admin(&pool, "owner@school.test").await;
    let other = seed_admin(&pool, "other@school.test").await;
    let course = seed_course(&pool, &owner.id, "B.Sc CS", 3).await;
    let subject = seed_subject(&pool, &course.id, 1, &owner.id, "Maths", "MA101").await;
    let teacher = seed_teacher(&pool, &owner.id, "Dr. Rao", "rao@school.test").await;

    let form = request(&teacher.id, &course.id, &subject.id, "Monday", "09:00 AM - 10:00 AM", 1);
    let lecture = lecture_service::assign_lecture(&pool, &owner.id, &form).await.unwrap();

    let err = lecture_service::delete_lecture(&pool, &lecture.id, &other.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(count(&pool, "lectures").await, 1);

    lecture_service::delete_lecture(&pool, &lecture.id, &owner.id).await.unwrap();
    assert_eq!(count(&pool, "lectures").await, 0);
    let again = lecture_service::delete_lecture(&pool, &lecture.id, &owner.id).await;
    assert!(matches!(again, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn listings_are_sorted_and_filtered() {
    let pool = test_pool().await;
    let admin = seed_admin(&pool, "admin@school.test").await;
    let course = seed_course(&pool, &admin.id, "B.Sc CS", 3).await;
    let dbms = seed_subject(&pool, &course.id, 3, &admin.id, "DBMS", "CS301").await;
    let os = seed_subject(&pool, &course.id, 3, &admin.id, "Operating Systems", "CS302").await;
    let rao = seed_teacher(&pool, &admin.id, "Dr. Rao", "rao@school.test").await;
    let sen = seed_teacher(&pool, &admin.id, "Dr. Sen", "sen@school.test").await;

    for form in [
        request(&rao.id, &course.id, &dbms.id, "Wednesday", "09:00 AM - 10:00 AM", 3),
        request(&sen.id, &course.id, &os.id, "Monday", "02:00 PM - 03:00 PM", 3),
        request(&rao.id, &course.id, &dbms.id, "Monday", "09:00 AM - 10:00 AM", 3),
    ] {
        lecture_service::assign_lecture(&pool, &admin.id, &form).await.unwrap();
    }

    let all = lecture_service::list_lectures(&pool, &admin.id, &LectureFilter::default()).await.unwrap();
    let order: Vec<_> = all.iter().map(|l| (l.day.as_str(), l.subject.code.as_str())).collect();
    assert_eq!(order, [("Monday", "CS301"), ("Monday", "CS302"), ("Wednesday", "CS301")]);

    let by_teacher = LectureFilter { teacher_id: Some(sen.id.clone()), ..Default::default() };
    let sen_only = lecture_service::list_lectures(&pool, &admin.id, &by_teacher).await.unwrap();
    assert_eq!(sen_only.len(), 1);
    assert_eq!(sen_only[0].subject.code, "CS302");

    let search = LectureFilter { search: Some("dbms".into()), ..Default::default() };
    assert_eq!(lecture_service::list_lectures(&pool, &admin.id, &search).await.unwrap().len(), 2);

    let by_day = LectureFilter { day: Some("Monday".into()), teacher_id: Some(rao.id.clone()), ..Default::default() };
    let rao_monday = lecture_service::get_teacher_timetable(&pool, &rao.id, &by_day).await.unwrap();
    assert_eq!(rao_monday.len(), 1);
    assert_eq!(rao_monday[0].day, "Monday");
}

#[tokio::test]
async fn student_schedule_uses_course_semester_and_day() {
    let pool = test_pool().await;
    let admin = seed_admin(&pool, "admin@school.test").await;
    let course = seed_course(&pool, &admin.id, "B.Sc CS", 3).await;
    let dbms = seed_subject(&pool, &course.id, 3, &admin.id, "DBMS", "CS301").await;
    let maths = seed_subject(&pool, &course.id, 1, &admin.id, "Maths", "MA101").await;
    let teacher = seed_teacher(&pool, &admin.id, "Dr. Rao", "rao@school.test").await;

    for form in [
        request(&teacher.id, &course.id, &dbms.id, "Monday", "11:00 AM - 12:00 PM", 3),
        request(&teacher.id, &course.id, &dbms.id, "Monday", "09:00 AM - 10:00 AM", 3),
        request(&teacher.id, &course.id, &dbms.id, "Tuesday", "09:00 AM - 10:00 AM", 3),
        request(&teacher.id, &course.id, &maths.id, "Monday", "09:00 AM - 10:00 AM", 1),
    ] {
        lecture_service::assign_lecture(&pool, &admin.id, &form).await.unwrap();
    }

    let student = seed_student(&pool, &admin.id, "ana@school.test", Some(&course.id), Some(3)).await;
    let monday = lecture_service::get_today_schedule_for_student(&pool, &student.id, DayOfWeek::Monday)
        .await
        .unwrap();
    let slots: Vec<_> = monday.iter().map(|l| l.time_slot.as_str()).collect();
    assert_eq!(slots, ["09:00 AM - 10:00 AM", "11:00 AM - 12:00 PM"]);
    assert!(monday.iter().all(|l| l.semester == 3));

    let sunday = lecture_service::get_today_schedule_for_student(&pool, &student.id, DayOfWeek::Sunday)
        .await
        .unwrap();
    assert!(sunday.is_empty());

    let week = lecture_service::get_student_timetable(&pool, &student.id).await.unwrap();
    assert_eq!(week.len(), 3);

    let unenrolled = seed_student(&pool, &admin.id, "bia@school.test", None, None).await;
    let nothing = lecture_service::get_today_schedule_for_student(&pool, &unenrolled.id, DayOfWeek::Monday)
        .await
        .unwrap();
    assert!(nothing.is_empty());
}
