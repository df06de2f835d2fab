// src/services/cascade_service.rs
//! Apagamentos em cascata. Cada operação corre numa única transação:
//! ou tudo é apagado, ou nada é.

use crate::error::{AppError, AppResult};
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};

/// Quantas linhas cada cascata removeu (ou alterou, no caso dos alunos desinscritos).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeReport {
    pub admins: u64,
    pub courses: u64,
    pub subjects: u64,
    pub lectures: u64,
    pub teachers: u64,
    pub students: u64,
    pub students_unenrolled: u64,
}

async fn exec(conn: &mut SqliteConnection, sql: &str, id: &str) -> AppResult<u64> {
    Ok(sqlx::query(sql).bind(id).execute(&mut *conn).await?.rows_affected())
}

async fn owned(conn: &mut SqliteConnection, sql: &str, id: &str, admin_id: &str) -> AppResult<bool> {
    let count: i64 = sqlx::query_scalar(sql)
        .bind(id)
        .bind(admin_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count > 0)
}

/// Apaga o curso, as disciplinas dos seus semestres e todas as aulas que
/// referenciam o curso ou essas disciplinas. Alunos inscritos ficam sem curso.
pub async fn delete_course(db_pool: &SqlitePool, course_id: &str, admin_id: &str) -> AppResult<CascadeReport> {
    tracing::info!("Apagando curso {} (admin {}) em cascata...", course_id, admin_id);
    let mut tx = db_pool.begin().await?;

    if !owned(&mut tx, "SELECT COUNT(*) FROM courses WHERE id = ?1 AND admin_id = ?2", course_id, admin_id).await? {
        return Err(AppError::NotFound("Course not found".into()));
    }

    let mut report = CascadeReport::default();
    report.lectures = exec(
        &mut tx,
        "DELETE FROM lectures WHERE course_id = ?1 OR subject_id IN (SELECT id FROM subjects WHERE course_id = ?1)",
        course_id,
    )
    .await?;
    report.students_unenrolled = exec(
        &mut tx,
        "UPDATE students SET course_id = NULL, semester = NULL WHERE course_id = ?1",
        course_id,
    )
    .await?;
    report.subjects = exec(&mut tx, "DELETE FROM subjects WHERE course_id = ?1", course_id).await?;
    exec(&mut tx, "DELETE FROM course_semesters WHERE course_id = ?1", course_id).await?;
    report.courses = exec(&mut tx, "DELETE FROM courses WHERE id = ?1", course_id).await?;

    tx.commit().await?;
    tracing::info!("✅ Curso {} apagado: {:?}", course_id, report);
    Ok(report)
}

/// Apaga a disciplina (e com ela o seu lugar no semestre) e as aulas que a referenciam.
pub async fn delete_subject(db_pool: &SqlitePool, subject_id: &str, admin_id: &str) -> AppResult<CascadeReport> {
    tracing::info!("Apagando disciplina {} (admin {}) em cascata...", subject_id, admin_id);
    let mut tx = db_pool.begin().await?;

    if !owned(&mut tx, "SELECT COUNT(*) FROM subjects WHERE id = ?1 AND created_by = ?2", subject_id, admin_id).await? {
        return Err(AppError::NotFound("Subject not found".into()));
    }

    let mut report = CascadeReport::default();
    report.lectures = exec(&mut tx, "DELETE FROM lectures WHERE subject_id = ?1", subject_id).await?;
    report.subjects = exec(&mut tx, "DELETE FROM subjects WHERE id = ?1", subject_id).await?;

    tx.commit().await?;
    tracing::info!("✅ Disciplina {} apagada: {:?}", subject_id, report);
    Ok(report)
}

/// Apaga o professor, as suas aulas, e retira-o das disciplinas que lecionava.
pub async fn delete_teacher(db_pool: &SqlitePool, teacher_id: &str, admin_id: &str) -> AppResult<CascadeReport> {
    tracing::info!("Apagando professor {} (admin {}) em cascata...", teacher_id, admin_id);
    let mut tx = db_pool.begin().await?;

    if !owned(&mut tx, "SELECT COUNT(*) FROM teachers WHERE id = ?1 AND admin_id = ?2", teacher_id, admin_id).await? {
        return Err(AppError::NotFound("Teacher not found".into()));
    }

    let mut report = CascadeReport::default();
    report.lectures = exec(&mut tx, "DELETE FROM lectures WHERE teacher_id = ?1", teacher_id).await?;
    exec(&mut tx, "UPDATE subjects SET teacher_id = NULL WHERE teacher_id = ?1", teacher_id).await?;
    report.teachers = exec(&mut tx, "DELETE FROM teachers WHERE id = ?1", teacher_id).await?;

    tx.commit().await?;
    tracing::info!("✅ Professor {} apagado: {:?}", teacher_id, report);
    Ok(report)
}

pub async fn delete_student(db_pool: &SqlitePool, student_id: &str, admin_id: &str) -> AppResult<CascadeReport> {
    let rows = sqlx::query("DELETE FROM students WHERE id = ?1 AND admin_id = ?2")
        .bind(student_id)
        .bind(admin_id)
        .execute(db_pool)
        .await?
        .rows_affected();
    if rows == 0 {
        return Err(AppError::NotFound("Student not found".into()));
    }
    tracing::info!("🗑️ Aluno {} apagado.", student_id);
    Ok(CascadeReport { students: rows, ..Default::default() })
}

/// Apaga o tenant inteiro: aulas, alunos, disciplinas, cursos, professores e o próprio admin.
pub async fn delete_admin(db_pool: &SqlitePool, admin_id: &str) -> AppResult<CascadeReport> {
    tracing::info!("Apagando admin {} e todo o seu tenant...", admin_id);
    let mut tx = db_pool.begin().await?;

    let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins WHERE id = ?1")
        .bind(admin_id)
        .fetch_one(&mut *tx)
        .await?;
    if exists == 0 {
        return Err(AppError::NotFound("Admin not found".into()));
    }

    let mut report = CascadeReport::default();
    report.lectures = exec(
        &mut tx,
        r#"
        DELETE FROM lectures
        WHERE admin_id = ?1
           OR course_id IN (SELECT id FROM courses WHERE admin_id = ?1)
           OR subject_id IN (SELECT id FROM subjects WHERE created_by = ?1)
           OR teacher_id IN (SELECT id FROM teachers WHERE admin_id = ?1)
        "#,
        admin_id,
    )
    .await?;
    report.students = exec(&mut tx, "DELETE FROM students WHERE admin_id = ?1", admin_id).await?;
    report.students_unenrolled = exec(
        &mut tx,
        "UPDATE students SET course_id = NULL, semester = NULL WHERE course_id IN (SELECT id FROM courses WHERE admin_id = ?1)",
        admin_id,
    )
    .await?;
    report.subjects = exec(
        &mut tx,
        "DELETE FROM subjects WHERE created_by = ?1 OR course_id IN (SELECT id FROM courses WHERE admin_id = ?1)",
        admin_id,
    )
    .await?;
    exec(
        &mut tx,
        "UPDATE subjects SET teacher_id = NULL WHERE teacher_id IN (SELECT id FROM teachers WHERE admin_id = ?1)",
        admin_id,
    )
    .await?;
    exec(
        &mut tx,
        "DELETE FROM course_semesters WHERE course_id IN (SELECT id FROM courses WHERE admin_id = ?1)",
        admin_id,
    )
    .await?;
    report.courses = exec(&mut tx, "DELETE FROM courses WHERE admin_id = ?1", admin_id).await?;
    report.teachers = exec(&mut tx, "DELETE FROM teachers WHERE admin_id = ?1", admin_id).await?;
    report.admins = exec(&mut tx, "DELETE FROM admins WHERE id = ?1", admin_id).await?;

    tx.commit().await?;
    tracing::info!("✅ Admin {} apagado: {:?}", admin_id, report);
    Ok(report)
}
