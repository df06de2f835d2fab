// src/models/course.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Número máximo de anos de um curso.
pub const MAX_COURSE_DURATION: i64 = 10;

#[derive(Debug, Clone, FromRow)]
pub struct CourseRow {
    pub id: String,
    pub name: String,
    pub duration: i64,
    pub admin_id: String,
    pub created_at: Option<NaiveDateTime>,
}

/// Um slot de semestre com os ids das disciplinas, pela ordem de inserção.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Semester {
    pub number: i64,
    pub subject_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    pub duration: i64,
    pub admin: String,
    pub semesters: Vec<Semester>,
    pub created_at: Option<NaiveDateTime>,
}

impl Course {
    pub fn semester_count(&self) -> i64 {
        self.duration * 2
    }

    pub fn has_semester(&self, number: i64) -> bool {
        (1..=self.semester_count()).contains(&number)
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub created_by: String,
    #[serde(rename = "teacher")]
    pub teacher_id: Option<String>,
    #[serde(rename = "course")]
    pub course_id: String,
    #[serde(rename = "semester")]
    pub semester_number: i64,
    #[serde(skip_serializing)]
    pub position: i64,
    pub created_at: Option<NaiveDateTime>,
}

/// Disciplina com o nome do professor atual (para listagens).
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDetails {
    pub id: String,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    #[serde(rename = "course")]
    pub course_id: String,
    pub course_name: String,
    #[serde(rename = "semester")]
    pub semester_number: i64,
    #[serde(rename = "teacher")]
    pub teacher_id: Option<String>,
    pub teacher_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCourseRequest {
    pub name: String,
    pub duration: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub duration: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSubjectRequest {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub description: Option<Option<String>>,
}
