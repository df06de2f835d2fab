// src/services/course_service.rs
use crate::{
    error::{AppError, AppResult},
    models::course::{
        Course, CourseRow, NewCourseRequest, NewSubjectRequest, Semester, Subject, SubjectDetails,
        UpdateCourseRequest, UpdateSubjectRequest, MAX_COURSE_DURATION,
    },
    services::{
        cascade_service::{self, CascadeReport},
        on_unique_violation, patch_field, required_text,
    },
};
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

const COURSE_EXISTS: &str = "Course already exists";
const CODE_EXISTS: &str = "Subject code already exists";

const SUBJECT_COLUMNS: &str =
    "id, name, code, description, created_by, teacher_id, course_id, semester_number, position, created_at";

fn course_not_found() -> AppError {
    AppError::NotFound("Course not found".into())
}

fn validate_duration(duration: i64) -> AppResult<()> {
    if !(1..=MAX_COURSE_DURATION).contains(&duration) {
        return Err(AppError::Validation(format!(
            "Duration must be between 1 and {} years",
            MAX_COURSE_DURATION
        )));
    }
    Ok(())
}

pub(crate) async fn find_course_row(
    conn: &mut SqliteConnection,
    course_id: &str,
    admin_id: &str,
) -> AppResult<Option<CourseRow>> {
    let row = sqlx::query_as::<_, CourseRow>(
        "SELECT id, name, duration, admin_id, created_at FROM courses WHERE id = ?1 AND admin_id = ?2",
    )
    .bind(course_id)
    .bind(admin_id)
    .fetch_optional(&mut *conn)
    .await?;
    Ok(row)
}

async fn ensure_name_available(conn: &mut SqliteConnection, name: &str, except_id: Option<&str>) -> AppResult<()> {
    // Nomes de curso são únicos em todo o sistema, não por tenant
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM courses WHERE name = ?1 AND id != ?2")
        .bind(name)
        .bind(except_id.unwrap_or(""))
        .fetch_one(&mut *conn)
        .await?;
    if count > 0 {
        tracing::warn!("Curso '{}' já existe.", name);
        return Err(AppError::Validation(COURSE_EXISTS.into()));
    }
    Ok(())
}

async fn ensure_code_available(conn: &mut SqliteConnection, code: &str, except_id: Option<&str>) -> AppResult<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM subjects WHERE code = ?1 AND id != ?2")
        .bind(code)
        .bind(except_id.unwrap_or(""))
        .fetch_one(&mut *conn)
        .await?;
    if count > 0 {
        tracing::warn!("Código de disciplina '{}' já existe.", code);
        return Err(AppError::Validation(CODE_EXISTS.into()));
    }
    Ok(())
}

/// Monta o curso com os seus semestres e os ids das disciplinas de cada slot.
async fn load_semesters(conn: &mut SqliteConnection, row: CourseRow) -> AppResult<Course> {
    let numbers: Vec<i64> =
        sqlx::query_scalar("SELECT number FROM course_semesters WHERE course_id = ?1 ORDER BY number ASC")
            .bind(&row.id)
            .fetch_all(&mut *conn)
            .await?;

    let slots: Vec<(String, i64)> = sqlx::query_as(
        "SELECT id, semester_number FROM subjects WHERE course_id = ?1 ORDER BY semester_number ASC, position ASC",
    )
    .bind(&row.id)
    .fetch_all(&mut *conn)
    .await?;

    let semesters = numbers
        .into_iter()
        .map(|number| Semester {
            number,
            subject_ids: slots
                .iter()
                .filter(|(_, semester)| *semester == number)
                .map(|(id, _)| id.clone())
                .collect(),
        })
        .collect();

    Ok(Course {
        id: row.id,
        name: row.name,
        duration: row.duration,
        admin: row.admin_id,
        semesters,
        created_at: row.created_at,
    })
}

pub(crate) async fn get_course_in(conn: &mut SqliteConnection, course_id: &str, admin_id: &str) -> AppResult<Course> {
    let row = find_course_row(conn, course_id, admin_id)
        .await?
        .ok_or_else(course_not_found)?;
    load_semesters(conn, row).await
}

/// Cria o curso e os seus `duration * 2` semestres vazios, numerados a partir de 1.
pub async fn create_course(db_pool: &SqlitePool, admin_id: &str, form: &NewCourseRequest) -> AppResult<Course> {
    let name = required_text(&form.name, "Course name")?;
    validate_duration(form.duration)?;
    tracing::info!("Criando curso '{}' ({} anos) para admin {}", name, form.duration, admin_id);

    let mut tx = db_pool.begin().await?;
    ensure_name_available(&mut tx, &name, None).await?;

    let id = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO courses (id, name, duration, admin_id) VALUES (?1, ?2, ?3, ?4)")
        .bind(&id)
        .bind(&name)
        .bind(form.duration)
        .bind(admin_id)
        .execute(&mut *tx)
        .await
        .map_err(on_unique_violation(COURSE_EXISTS))?;

    for number in 1..=form.duration * 2 {
        sqlx::query("INSERT INTO course_semesters (course_id, number) VALUES (?1, ?2)")
            .bind(&id)
            .bind(number)
            .execute(&mut *tx)
            .await?;
    }

    let course = get_course_in(&mut tx, &id, admin_id).await?;
    tx.commit().await?;
    tracing::info!("✅ Curso '{}' criado com {} semestres.", course.name, course.semesters.len());
    Ok(course)
}

pub async fn list_courses(db_pool: &SqlitePool, admin_id: &str) -> AppResult<Vec<Course>> {
    let mut conn = db_pool.acquire().await?;
    let rows = sqlx::query_as::<_, CourseRow>(
        "SELECT id, name, duration, admin_id, created_at FROM courses WHERE admin_id = ?1 ORDER BY name ASC",
    )
    .bind(admin_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut courses = Vec::with_capacity(rows.len());
    for row in rows {
        courses.push(load_semesters(&mut conn, row).await?);
    }
    tracing::debug!("Encontrados {} cursos para admin {}.", courses.len(), admin_id);
    Ok(courses)
}

pub async fn get_course(db_pool: &SqlitePool, course_id: &str, admin_id: &str) -> AppResult<Course> {
    let mut conn = db_pool.acquire().await?;
    get_course_in(&mut conn, course_id, admin_id).await
}

/// Renomeia e/ou muda a duração. Aumentar acrescenta semestres vazios;
/// diminuir só é permitido se os semestres removidos não tiverem disciplinas nem alunos.
pub async fn update_course(
    db_pool: &SqlitePool,
    course_id: &str,
    admin_id: &str,
    form: &UpdateCourseRequest,
) -> AppResult<Course> {
    let mut tx = db_pool.begin().await?;
    let current = find_course_row(&mut tx, course_id, admin_id)
        .await?
        .ok_or_else(course_not_found)?;

    if let Some(name) = &form.name {
        let name = required_text(name, "Course name")?;
        if name != current.name {
            ensure_name_available(&mut tx, &name, Some(course_id)).await?;
            sqlx::query("UPDATE courses SET name = ?1 WHERE id = ?2")
                .bind(&name)
                .bind(course_id)
                .execute(&mut *tx)
                .await
                .map_err(on_unique_violation(COURSE_EXISTS))?;
        }
    }

    if let Some(duration) = form.duration {
        validate_duration(duration)?;
        let old_count = current.duration * 2;
        let new_count = duration * 2;

        if new_count < old_count {
            let subjects: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM subjects WHERE course_id = ?1 AND semester_number > ?2")
                    .bind(course_id)
                    .bind(new_count)
                    .fetch_one(&mut *tx)
                    .await?;
            let students: i64 =
                sqlx::query_scalar("SELECT COUNT(*) FROM students WHERE course_id = ?1 AND semester > ?2")
                    .bind(course_id)
                    .bind(new_count)
                    .fetch_one(&mut *tx)
                    .await?;
            if subjects > 0 || students > 0 {
                return Err(AppError::Validation(
                    "Cannot reduce duration while removed semesters still have subjects or students".into(),
                ));
            }
            sqlx::query("DELETE FROM course_semesters WHERE course_id = ?1 AND number > ?2")
                .bind(course_id)
                .bind(new_count)
                .execute(&mut *tx)
                .await?;
        } else {
            for number in old_count + 1..=new_count {
                sqlx::query("INSERT INTO course_semesters (course_id, number) VALUES (?1, ?2)")
                    .bind(course_id)
                    .bind(number)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        sqlx::query("UPDATE courses SET duration = ?1 WHERE id = ?2")
            .bind(duration)
            .bind(course_id)
            .execute(&mut *tx)
            .await?;
    }

    let course = get_course_in(&mut tx, course_id, admin_id).await?;
    tx.commit().await?;
    tracing::info!("✅ Curso {} atualizado.", course_id);
    Ok(course)
}

pub async fn delete_course(db_pool: &SqlitePool, course_id: &str, admin_id: &str) -> AppResult<CascadeReport> {
    cascade_service::delete_course(db_pool, course_id, admin_id).await
}

// --- Disciplinas ---

/// Cria a disciplina e acrescenta-a ao fim do slot (curso, semestre).
pub async fn add_subject(
    db_pool: &SqlitePool,
    course_id: &str,
    semester_number: i64,
    admin_id: &str,
    form: &NewSubjectRequest,
) -> AppResult<Subject> {
    let name = required_text(&form.name, "Subject name")?;
    let code = required_text(&form.code, "Subject code")?;

    let mut tx = db_pool.begin().await?;
    let course = find_course_row(&mut tx, course_id, admin_id)
        .await?
        .ok_or_else(course_not_found)?;
    if !(1..=course.duration * 2).contains(&semester_number) {
        return Err(AppError::NotFound("Semester not found".into()));
    }
    ensure_code_available(&mut tx, &code, None).await?;

    let position: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(position), 0) + 1 FROM subjects WHERE course_id = ?1 AND semester_number = ?2",
    )
    .bind(course_id)
    .bind(semester_number)
    .fetch_one(&mut *tx)
    .await?;

    let id = Uuid::new_v4().to_string();
    sqlx::query(
        r#"
        INSERT INTO subjects (id, name, code, description, created_by, teacher_id, course_id, semester_number, position)
        VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6, ?7, ?8)
        "#,
    )
    .bind(&id)
    .bind(&name)
    .bind(&code)
    .bind(&form.description)
    .bind(admin_id)
    .bind(course_id)
    .bind(semester_number)
    .bind(position)
    .execute(&mut *tx)
    .await
    .map_err(on_unique_violation(CODE_EXISTS))?;

    let subject = find_subject_in(&mut tx, &id, admin_id).await?;
    tx.commit().await?;
    tracing::info!("✅ Disciplina '{}' ({}) adicionada ao semestre {} do curso {}.", name, code, semester_number, course_id);
    Ok(subject)
}

pub(crate) async fn find_subject_in(conn: &mut SqliteConnection, subject_id: &str, admin_id: &str) -> AppResult<Subject> {
    let sql = format!("SELECT {} FROM subjects WHERE id = ?1 AND created_by = ?2", SUBJECT_COLUMNS);
    sqlx::query_as::<_, Subject>(&sql)
        .bind(subject_id)
        .bind(admin_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Subject not found".into()))
}

pub async fn find_subject(db_pool: &SqlitePool, subject_id: &str, admin_id: &str) -> AppResult<Subject> {
    let mut conn = db_pool.acquire().await?;
    find_subject_in(&mut conn, subject_id, admin_id).await
}

const SUBJECT_DETAILS_SELECT: &str = r#"
    SELECT s.id, s.name, s.code, s.description, s.course_id, c.name AS course_name,
           s.semester_number, s.teacher_id, t.name AS teacher_name
    FROM subjects s
    JOIN courses c ON c.id = s.course_id
    LEFT JOIN teachers t ON t.id = s.teacher_id
"#;

/// Disciplinas de um slot, pela ordem de inserção.
pub async fn list_semester_subjects(
    db_pool: &SqlitePool,
    course_id: &str,
    semester_number: i64,
    admin_id: &str,
) -> AppResult<Vec<SubjectDetails>> {
    let course = get_course(db_pool, course_id, admin_id).await?;
    if !course.has_semester(semester_number) {
        return Err(AppError::NotFound("Semester not found".into()));
    }

    let sql = format!(
        "{} WHERE s.course_id = ?1 AND s.semester_number = ?2 ORDER BY s.position ASC",
        SUBJECT_DETAILS_SELECT
    );
    let subjects = sqlx::query_as::<_, SubjectDetails>(&sql)
        .bind(course_id)
        .bind(semester_number)
        .fetch_all(db_pool)
        .await?;
    Ok(subjects)
}

/// Disciplinas cujo professor atual é `teacher_id`.
pub async fn list_teacher_subjects(db_pool: &SqlitePool, teacher_id: &str) -> AppResult<Vec<SubjectDetails>> {
    let sql = format!(
        "{} WHERE s.teacher_id = ?1 ORDER BY c.name ASC, s.semester_number ASC, s.position ASC",
        SUBJECT_DETAILS_SELECT
    );
    let subjects = sqlx::query_as::<_, SubjectDetails>(&sql)
        .bind(teacher_id)
        .fetch_all(db_pool)
        .await?;
    Ok(subjects)
}

pub async fn update_subject(
    db_pool: &SqlitePool,
    subject_id: &str,
    admin_id: &str,
    form: &UpdateSubjectRequest,
) -> AppResult<Subject> {
    let mut tx = db_pool.begin().await?;
    let current = find_subject_in(&mut tx, subject_id, admin_id).await?;

    let name = match &form.name {
        Some(name) => required_text(name, "Subject name")?,
        None => current.name,
    };
    let code = match &form.code {
        Some(code) => {
            let code = required_text(code, "Subject code")?;
            ensure_code_available(&mut tx, &code, Some(subject_id)).await?;
            code
        }
        None => current.code,
    };

    sqlx::query("UPDATE subjects SET name = ?1, code = ?2, description = ?3 WHERE id = ?4")
        .bind(name)
        .bind(code)
        .bind(patch_field(&form.description, current.description))
        .bind(subject_id)
        .execute(&mut *tx)
        .await
        .map_err(on_unique_violation(CODE_EXISTS))?;

    let subject = find_subject_in(&mut tx, subject_id, admin_id).await?;
    tx.commit().await?;
    tracing::info!("✅ Disciplina {} atualizada.", subject_id);
    Ok(subject)
}

pub async fn delete_subject(db_pool: &SqlitePool, subject_id: &str, admin_id: &str) -> AppResult<CascadeReport> {
    cascade_service::delete_subject(db_pool, subject_id, admin_id).await
}
