// src/models/lecture.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// Dia da semana de uma aula, guardado na DB pelo nome inglês ("Monday").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }

    /// Dia atual no fuso horário local do servidor.
    pub fn today() -> Self {
        use chrono::Datelike;
        chrono::Local::now().weekday().into()
    }
}

impl From<chrono::Weekday> for DayOfWeek {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => DayOfWeek::Monday,
            chrono::Weekday::Tue => DayOfWeek::Tuesday,
            chrono::Weekday::Wed => DayOfWeek::Wednesday,
            chrono::Weekday::Thu => DayOfWeek::Thursday,
            chrono::Weekday::Fri => DayOfWeek::Friday,
            chrono::Weekday::Sat => DayOfWeek::Saturday,
            chrono::Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayOfWeek {
    type Err = String;

    // Aceita o nome completo sem distinguir maiúsculas ("monday", "MONDAY")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let day = match s.trim().to_ascii_lowercase().as_str() {
            "monday" => DayOfWeek::Monday,
            "tuesday" => DayOfWeek::Tuesday,
            "wednesday" => DayOfWeek::Wednesday,
            "thursday" => DayOfWeek::Thursday,
            "friday" => DayOfWeek::Friday,
            "saturday" => DayOfWeek::Saturday,
            "sunday" => DayOfWeek::Sunday,
            _ => return Err(format!("Invalid day: {}", s)),
        };
        Ok(day)
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    pub id: String,
    #[serde(rename = "teacher")]
    pub teacher_id: String,
    #[serde(rename = "course")]
    pub course_id: String,
    pub semester: i64,
    #[serde(rename = "subject")]
    pub subject_id: String,
    pub day: String,
    pub time_slot: String,
    #[serde(rename = "admin")]
    pub admin_id: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectRef {
    pub id: String,
    pub name: String,
    pub code: String,
}

/// Aula com professor, curso e disciplina já resolvidos.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureDetails {
    pub id: String,
    pub teacher: EntityRef,
    pub course: EntityRef,
    pub semester: i64,
    pub subject: SubjectRef,
    pub day: String,
    pub time_slot: String,
    pub admin: String,
}

// Linha plana do JOIN; convertida em LectureDetails
#[derive(Debug, Clone, FromRow)]
pub struct LectureDetailsRow {
    pub id: String,
    pub teacher_id: String,
    pub teacher_name: String,
    pub course_id: String,
    pub course_name: String,
    pub semester: i64,
    pub subject_id: String,
    pub subject_name: String,
    pub subject_code: String,
    pub day: String,
    pub time_slot: String,
    pub admin_id: String,
}

impl From<LectureDetailsRow> for LectureDetails {
    fn from(row: LectureDetailsRow) -> Self {
        Self {
            id: row.id,
            teacher: EntityRef { id: row.teacher_id, name: row.teacher_name },
            course: EntityRef { id: row.course_id, name: row.course_name },
            semester: row.semester,
            subject: SubjectRef { id: row.subject_id, name: row.subject_name, code: row.subject_code },
            day: row.day,
            time_slot: row.time_slot,
            admin: row.admin_id,
        }
    }
}

/// Payload de criação e de atualização (overwrite completo) de uma aula.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureRequest {
    pub teacher_id: String,
    pub course_id: String,
    pub subject_id: String,
    pub day: String,
    pub time_slot: String,
    pub semester: i64,
}

/// Critérios de filtragem partilhados por todas as listagens de aulas.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureFilter {
    pub search: Option<String>,
    pub teacher_id: Option<String>,
    pub course_id: Option<String>,
    #[serde(default, deserialize_with = "super::blank_as_none")]
    pub semester: Option<i64>,
    pub day: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_day_names_case_insensitively() {
        assert_eq!("Monday".parse::<DayOfWeek>().unwrap(), DayOfWeek::Monday);
        assert_eq!(" sunday ".parse::<DayOfWeek>().unwrap(), DayOfWeek::Sunday);
        assert_eq!("FRIDAY".parse::<DayOfWeek>().unwrap(), DayOfWeek::Friday);
        assert!("Mon".parse::<DayOfWeek>().is_err());
        assert!("".parse::<DayOfWeek>().is_err());
    }

    fn filter_from(query: &str) -> Result<LectureFilter, String> {
        let uri: axum::http::Uri = format!("/api/lecture?{}", query).parse().unwrap();
        axum::extract::Query::<LectureFilter>::try_from_uri(&uri)
            .map(|q| q.0)
            .map_err(|e| e.body_text())
    }

    #[test]
    fn blank_filter_fields_mean_no_filter() {
        let filter = filter_from("search=&teacherId=&courseId=&semester=&day=").unwrap();
        assert_eq!(filter.semester, None);
        assert_eq!(filter.search.as_deref(), Some(""));

        assert_eq!(filter_from("semester=%203%20").unwrap().semester, Some(3));
        assert_eq!(filter_from("").unwrap().semester, None);
        assert!(filter_from("semester=third").is_err());
    }

    #[test]
    fn chrono_weekday_maps_to_full_name() {
        assert_eq!(DayOfWeek::from(chrono::Weekday::Wed).to_string(), "Wednesday");
        assert_eq!(DayOfWeek::from(chrono::Weekday::Sun), DayOfWeek::Sunday);
    }

    #[test]
    fn days_order_from_monday() {
        assert!(DayOfWeek::Monday < DayOfWeek::Tuesday);
        assert!(DayOfWeek::Saturday < DayOfWeek::Sunday);
    }
}
