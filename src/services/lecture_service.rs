// src/services/lecture_service.rs
use crate::{
    error::{AppError, AppResult},
    models::lecture::{DayOfWeek, Lecture, LectureDetails, LectureDetailsRow, LectureFilter, LectureRequest},
    services::{course_service, lecture_filter, required_text, user_service},
};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

const INVALID_REFERENCES: &str = "Invalid teacher, course, or subject";

const LECTURE_DETAILS_SELECT: &str = r#"
    SELECT l.id, l.teacher_id, t.name AS teacher_name, l.course_id, c.name AS course_name,
           l.semester, l.subject_id, s.name AS subject_name, s.code AS subject_code,
           l.day, l.time_slot, l.admin_id
    FROM lectures l
    JOIN teachers t ON t.id = l.teacher_id
    JOIN courses c ON c.id = l.course_id
    JOIN subjects s ON s.id = l.subject_id
"#;

/// Aula já validada, pronta a gravar.
struct ValidatedLecture {
    teacher_id: String,
    course_id: String,
    subject_id: String,
    semester: i64,
    day: DayOfWeek,
    time_slot: String,
}

/// Professor, curso e disciplina têm de existir no tenant do admin; depois
/// valida dia, slot, semestre e se a disciplina está nesse slot do curso.
async fn validate_request(
    conn: &mut SqliteConnection,
    admin_id: &str,
    form: &LectureRequest,
) -> AppResult<ValidatedLecture> {
    let teacher_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teachers WHERE id = ?1 AND admin_id = ?2")
        .bind(&form.teacher_id)
        .bind(admin_id)
        .fetch_one(&mut *conn)
        .await?;
    let course = course_service::find_course_row(conn, &form.course_id, admin_id).await?;
    let subject = match course_service::find_subject_in(conn, &form.subject_id, admin_id).await {
        Ok(subject) => Some(subject),
        Err(AppError::NotFound(_)) => None,
        Err(e) => return Err(e),
    };

    let (Some(course), Some(subject)) = (course, subject) else {
        tracing::warn!("Aula recusada: curso ou disciplina inexistente no tenant {}.", admin_id);
        return Err(AppError::NotFound(INVALID_REFERENCES.into()));
    };
    if teacher_exists == 0 {
        tracing::warn!("Aula recusada: professor {} inexistente no tenant {}.", form.teacher_id, admin_id);
        return Err(AppError::NotFound(INVALID_REFERENCES.into()));
    }

    let day = form.day.parse::<DayOfWeek>().map_err(AppError::Validation)?;
    let time_slot = required_text(&form.time_slot, "Time slot")?;

    if !(1..=course.duration * 2).contains(&form.semester) {
        return Err(AppError::Validation(format!(
            "Semester must be between 1 and {}",
            course.duration * 2
        )));
    }
    if subject.course_id != course.id || subject.semester_number != form.semester {
        return Err(AppError::Validation(
            "Subject does not belong to the selected course semester".into(),
        ));
    }

    Ok(ValidatedLecture {
        teacher_id: form.teacher_id.clone(),
        course_id: course.id,
        subject_id: subject.id,
        semester: form.semester,
        day,
        time_slot,
    })
}

// O professor da disciplina é sempre o da última aula atribuída
async fn stamp_subject_teacher(conn: &mut SqliteConnection, subject_id: &str, teacher_id: &str) -> AppResult<()> {
    sqlx::query("UPDATE subjects SET teacher_id = ?1 WHERE id = ?2")
        .bind(teacher_id)
        .bind(subject_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn find_details(conn: &mut SqliteConnection, lecture_id: &str) -> AppResult<LectureDetails> {
    let sql = format!("{} WHERE l.id = ?1", LECTURE_DETAILS_SELECT);
    let row = sqlx::query_as::<_, LectureDetailsRow>(&sql)
        .bind(lecture_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Lecture not found".into()))?;
    Ok(row.into())
}

fn into_sorted(rows: Vec<LectureDetailsRow>) -> Vec<LectureDetails> {
    let mut lectures: Vec<LectureDetails> = rows.into_iter().map(LectureDetails::from).collect();
    lecture_filter::sort_lectures(&mut lectures);
    lectures
}

pub async fn find_lecture(db_pool: &SqlitePool, lecture_id: &str, admin_id: &str) -> AppResult<Lecture> {
    sqlx::query_as::<_, Lecture>(
        r#"
        SELECT id, teacher_id, course_id, semester, subject_id, day, time_slot, admin_id, created_at
        FROM lectures WHERE id = ?1 AND admin_id = ?2
        "#,
    )
    .bind(lecture_id)
    .bind(admin_id)
    .fetch_optional(db_pool)
    .await?
    .ok_or_else(|| AppError::NotFound("Lecture not found".into()))
}

/// Cria a aula e marca o professor na disciplina, na mesma transação.
pub async fn assign_lecture(db_pool: &SqlitePool, admin_id: &str, form: &LectureRequest) -> AppResult<LectureDetails> {
    tracing::info!(
        "Atribuindo aula: professor {} / disciplina {} / {} {}",
        form.teacher_id, form.subject_id, form.day, form.time_slot
    );
    let mut tx = db_pool.begin().await?;
    let lecture = validate_request(&mut tx, admin_id, form).await?;

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO lectures (id, teacher_id, course_id, semester, subject_id, day, time_slot, admin_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&id)
    .bind(&lecture.teacher_id)
    .bind(&lecture.course_id)
    .bind(lecture.semester)
    .bind(&lecture.subject_id)
    .bind(lecture.day.as_str())
    .bind(&lecture.time_slot)
    .bind(admin_id)
    .execute(&mut *tx)
    .await?;

    stamp_subject_teacher(&mut tx, &lecture.subject_id, &lecture.teacher_id).await?;

    let details = find_details(&mut tx, &id).await?;
    tx.commit().await?;
    tracing::info!("✅ Aula {} atribuída.", id);
    Ok(details)
}

/// Substitui todos os campos da aula (sem diff).
pub async fn update_lecture(
    db_pool: &SqlitePool,
    lecture_id: &str,
    admin_id: &str,
    form: &LectureRequest,
) -> AppResult<LectureDetails> {
    find_lecture(db_pool, lecture_id, admin_id).await?;

    let mut tx = db_pool.begin().await?;
    let lecture = validate_request(&mut tx, admin_id, form).await?;

    sqlx::query(
        r#"
        UPDATE lectures
        SET teacher_id = ?1, course_id = ?2, semester = ?3, subject_id = ?4, day = ?5, time_slot = ?6
        WHERE id = ?7 AND admin_id = ?8
        "#,
    )
    .bind(&lecture.teacher_id)
    .bind(&lecture.course_id)
    .bind(lecture.semester)
    .bind(&lecture.subject_id)
    .bind(lecture.day.as_str())
    .bind(&lecture.time_slot)
    .bind(lecture_id)
    .bind(admin_id)
    .execute(&mut *tx)
    .await?;

    stamp_subject_teacher(&mut tx, &lecture.subject_id, &lecture.teacher_id).await?;

    let details = find_details(&mut tx, lecture_id).await?;
    tx.commit().await?;
    tracing::info!("✅ Aula {} atualizada.", lecture_id);
    Ok(details)
}

pub async fn delete_lecture(db_pool: &SqlitePool, lecture_id: &str, admin_id: &str) -> AppResult<()> {
    let rows_affected = sqlx::query("DELETE FROM lectures WHERE id = ?1 AND admin_id = ?2")
        .bind(lecture_id)
        .bind(admin_id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Aula {} não encontrada no tenant {}.", lecture_id, admin_id);
        return Err(AppError::NotFound("Lecture not found".into()));
    }
    tracing::info!("🗑️ Aula {} apagada.", lecture_id);
    Ok(())
}

pub async fn get_lectures_by_course_and_semester(
    db_pool: &SqlitePool,
    admin_id: &str,
    course_id: &str,
    semester: i64,
) -> AppResult<Vec<LectureDetails>> {
    tracing::debug!("Buscando aulas do curso {} semestre {}", course_id, semester);
    let sql = format!(
        "{} WHERE l.admin_id = ?1 AND l.course_id = ?2 AND l.semester = ?3",
        LECTURE_DETAILS_SELECT
    );
    let rows = sqlx::query_as::<_, LectureDetailsRow>(&sql)
        .bind(admin_id)
        .bind(course_id)
        .bind(semester)
        .fetch_all(db_pool)
        .await?;
    Ok(into_sorted(rows))
}

pub async fn list_lectures(db_pool: &SqlitePool, admin_id: &str, filter: &LectureFilter) -> AppResult<Vec<LectureDetails>> {
    let sql = format!("{} WHERE l.admin_id = ?1", LECTURE_DETAILS_SELECT);
    let rows = sqlx::query_as::<_, LectureDetailsRow>(&sql)
        .bind(admin_id)
        .fetch_all(db_pool)
        .await?;
    Ok(lecture_filter::filter_lectures(into_sorted(rows), filter))
}

pub async fn get_teacher_timetable(
    db_pool: &SqlitePool,
    teacher_id: &str,
    filter: &LectureFilter,
) -> AppResult<Vec<LectureDetails>> {
    tracing::debug!("Buscando horário do professor {}", teacher_id);
    let sql = format!("{} WHERE l.teacher_id = ?1", LECTURE_DETAILS_SELECT);
    let rows = sqlx::query_as::<_, LectureDetailsRow>(&sql)
        .bind(teacher_id)
        .fetch_all(db_pool)
        .await?;
    Ok(lecture_filter::filter_lectures(into_sorted(rows), filter))
}

/// Aulas do curso/semestre/tenant do aluno no dia indicado.
/// Um aluno sem curso ou semestre não tem aulas.
pub async fn get_today_schedule_for_student(
    db_pool: &SqlitePool,
    student_id: &str,
    today: DayOfWeek,
) -> AppResult<Vec<LectureDetails>> {
    let student = user_service::find_student_by_id(db_pool, student_id).await?;
    let (Some(course_id), Some(semester)) = (student.course_id, student.semester) else {
        tracing::debug!("Aluno {} sem curso/semestre; sem aulas.", student_id);
        return Ok(Vec::new());
    };

    let sql = format!(
        "{} WHERE l.course_id = ?1 AND l.semester = ?2 AND l.admin_id = ?3 AND l.day = ?4",
        LECTURE_DETAILS_SELECT
    );
    let rows = sqlx::query_as::<_, LectureDetailsRow>(&sql)
        .bind(course_id)
        .bind(semester)
        .bind(student.admin_id)
        .bind(today.as_str())
        .fetch_all(db_pool)
        .await?;
    Ok(into_sorted(rows))
}

/// Horário semanal completo do aluno.
pub async fn get_student_timetable(db_pool: &SqlitePool, student_id: &str) -> AppResult<Vec<LectureDetails>> {
    let student = user_service::find_student_by_id(db_pool, student_id).await?;
    let (Some(course_id), Some(semester)) = (student.course_id, student.semester) else {
        return Ok(Vec::new());
    };

    let sql = format!(
        "{} WHERE l.course_id = ?1 AND l.semester = ?2 AND l.admin_id = ?3",
        LECTURE_DETAILS_SELECT
    );
    let rows = sqlx::query_as::<_, LectureDetailsRow>(&sql)
        .bind(course_id)
        .bind(semester)
        .bind(student.admin_id)
        .fetch_all(db_pool)
        .await?;
    Ok(into_sorted(rows))
}
