// src/services/lecture_filter.rs
//! Filtragem e ordenação de aulas, partilhadas pelas listagens de admin,
//! professor e aluno. Funções puras, sem acesso à base de dados.

use crate::models::lecture::{DayOfWeek, LectureDetails, LectureFilter};
use chrono::{NaiveTime, Timelike};
use std::cmp::Ordering;

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Verifica se uma aula satisfaz todos os critérios preenchidos do filtro.
pub fn matches(lecture: &LectureDetails, filter: &LectureFilter) -> bool {
    if let Some(teacher_id) = non_empty(&filter.teacher_id) {
        if lecture.teacher.id != teacher_id {
            return false;
        }
    }
    if let Some(course_id) = non_empty(&filter.course_id) {
        if lecture.course.id != course_id {
            return false;
        }
    }
    if let Some(semester) = filter.semester {
        if lecture.semester != semester {
            return false;
        }
    }
    if let Some(day) = non_empty(&filter.day) {
        if !lecture.day.eq_ignore_ascii_case(day) {
            return false;
        }
    }
    if let Some(term) = non_empty(&filter.search) {
        let term = term.to_lowercase();
        let haystacks = [
            &lecture.teacher.name,
            &lecture.subject.name,
            &lecture.subject.code,
            &lecture.course.name,
            &lecture.day,
            &lecture.time_slot,
        ];
        if !haystacks.iter().any(|h| h.to_lowercase().contains(&term)) {
            return false;
        }
    }
    true
}

/// Aplica o filtro mantendo a ordem de entrada.
pub fn filter_lectures(lectures: Vec<LectureDetails>, filter: &LectureFilter) -> Vec<LectureDetails> {
    lectures.into_iter().filter(|l| matches(l, filter)).collect()
}

/// Minutos desde a meia-noite do início do slot ("09:00 AM - 10:00 AM" ou "14:00-15:00").
pub fn slot_start_minutes(time_slot: &str) -> Option<u32> {
    let start = time_slot.split('-').next()?.trim();
    NaiveTime::parse_from_str(start, "%I:%M %p")
        .or_else(|_| NaiveTime::parse_from_str(start, "%H:%M"))
        .ok()
        .map(|t| t.hour() * 60 + t.minute())
}

fn compare(a: &LectureDetails, b: &LectureDetails) -> Ordering {
    // Dias desconhecidos vão para o fim
    let day_a = a.day.parse::<DayOfWeek>().ok();
    let day_b = b.day.parse::<DayOfWeek>().ok();
    let by_day = match (day_a, day_b) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.day.cmp(&b.day),
    };

    by_day.then_with(|| {
        match (slot_start_minutes(&a.time_slot), slot_start_minutes(&b.time_slot)) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => a.time_slot.cmp(&b.time_slot),
        }
    })
}

/// Ordena por dia da semana (segunda primeiro) e depois pela hora de início.
pub fn sort_lectures(lectures: &mut [LectureDetails]) {
    lectures.sort_by(compare);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lecture::{EntityRef, SubjectRef};

    fn lecture(id: &str, teacher: (&str, &str), subject: (&str, &str), day: &str, slot: &str) -> LectureDetails {
        LectureDetails {
            id: id.into(),
            teacher: EntityRef { id: teacher.0.into(), name: teacher.1.into() },
            course: EntityRef { id: "c1".into(), name: "B.Sc CS".into() },
            semester: 3,
            subject: SubjectRef { id: format!("s-{}", id), name: subject.0.into(), code: subject.1.into() },
            day: day.into(),
            time_slot: slot.into(),
            admin: "a1".into(),
        }
    }

    fn sample() -> Vec<LectureDetails> {
        vec![
            lecture("1", ("t1", "Ada Lovelace"), ("DBMS", "CS301"), "Monday", "09:00 AM - 10:00 AM"),
            lecture("2", ("t2", "Alan Turing"), ("Operating Systems", "CS302"), "Tuesday", "11:00 AM - 12:00 PM"),
            lecture("3", ("t1", "Ada Lovelace"), ("Networks", "CS303"), "Friday", "02:00 PM - 03:00 PM"),
        ]
    }

    #[test]
    fn empty_filter_keeps_everything_in_order() {
        let ids: Vec<_> = filter_lectures(sample(), &LectureFilter::default())
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let by_teacher = LectureFilter { search: Some("lovelace".into()), ..Default::default() };
        assert_eq!(filter_lectures(sample(), &by_teacher).len(), 2);

        let by_code = LectureFilter { search: Some("cs302".into()), ..Default::default() };
        let found = filter_lectures(sample(), &by_code);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "2");

        let by_course = LectureFilter { search: Some("b.sc".into()), ..Default::default() };
        assert_eq!(filter_lectures(sample(), &by_course).len(), 3);

        let none = LectureFilter { search: Some("chemistry".into()), ..Default::default() };
        assert!(filter_lectures(sample(), &none).is_empty());
    }

    #[test]
    fn criteria_are_combined() {
        let filter = LectureFilter {
            teacher_id: Some("t1".into()),
            day: Some("friday".into()),
            ..Default::default()
        };
        let found = filter_lectures(sample(), &filter);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "3");

        let wrong_semester = LectureFilter { semester: Some(4), ..Default::default() };
        assert!(filter_lectures(sample(), &wrong_semester).is_empty());
    }

    #[test]
    fn blank_fields_are_ignored() {
        let filter = LectureFilter {
            search: Some("   ".into()),
            teacher_id: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter_lectures(sample(), &filter).len(), 3);
    }

    #[test]
    fn parses_slot_start_times() {
        assert_eq!(slot_start_minutes("09:00 AM - 10:00 AM"), Some(9 * 60));
        assert_eq!(slot_start_minutes("01:30 PM - 02:30 PM"), Some(13 * 60 + 30));
        assert_eq!(slot_start_minutes("14:00-15:00"), Some(14 * 60));
        assert_eq!(slot_start_minutes("morning"), None);
    }

    #[test]
    fn sorts_by_weekday_then_start_time() {
        let mut lectures = vec![
            lecture("a", ("t1", "A"), ("X", "X1"), "Tuesday", "09:00 AM - 10:00 AM"),
            lecture("b", ("t1", "A"), ("X", "X2"), "Monday", "01:00 PM - 02:00 PM"),
            lecture("c", ("t1", "A"), ("X", "X3"), "Monday", "10:00 AM - 11:00 AM"),
        ];
        sort_lectures(&mut lectures);
        let ids: Vec<_> = lectures.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["c", "b", "a"]);
    }
}
