// src/models/user.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

/// As quatro roles do sistema, tal como aparecem no token e no login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    SuperAdmin,
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "superadmin",
            Role::Admin => "admin",
            Role::Teacher => "teacher",
            Role::Student => "student",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(Role::SuperAdmin),
            "admin" => Ok(Role::Admin),
            "teacher" => Ok(Role::Teacher),
            "student" => Ok(Role::Student),
            other => Err(format!("role desconhecida: {}", other)),
        }
    }
}

/// Utilizador autenticado, resolvido uma vez pelo middleware de autenticação.
///
/// Teachers e students carregam o id do admin dono do tenant; para um admin
/// o tenant é o próprio id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    SuperAdmin { id: String },
    Admin { id: String },
    Teacher { id: String, admin_id: String },
    Student { id: String, admin_id: String },
}

impl Principal {
    pub fn role(&self) -> Role {
        match self {
            Principal::SuperAdmin { .. } => Role::SuperAdmin,
            Principal::Admin { .. } => Role::Admin,
            Principal::Teacher { .. } => Role::Teacher,
            Principal::Student { .. } => Role::Student,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Principal::SuperAdmin { id }
            | Principal::Admin { id }
            | Principal::Teacher { id, .. }
            | Principal::Student { id, .. } => id,
        }
    }

    pub fn tenant_id(&self) -> Option<&str> {
        match self {
            Principal::SuperAdmin { .. } => None,
            Principal::Admin { id } => Some(id),
            Principal::Teacher { admin_id, .. } | Principal::Student { admin_id, .. } => Some(admin_id),
        }
    }
}

// --- Registos lidos das tabelas ---

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuperAdmin {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub institute_name: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub qualification: Option<String>,
    #[serde(rename = "admin")]
    pub admin_id: String,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub roll_number: Option<String>,
    #[serde(rename = "course")]
    pub course_id: Option<String>,
    pub semester: Option<i64>,
    #[serde(rename = "admin")]
    pub admin_id: String,
    pub created_at: Option<NaiveDateTime>,
}

/// Perfil devolvido por `/api/auth/me`, um por role.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", content = "profile", rename_all = "lowercase")]
pub enum Profile {
    SuperAdmin(SuperAdmin),
    Admin(Admin),
    Teacher(Teacher),
    Student(Student),
}

// --- Payloads JSON ---

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAdminRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub institute_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminProfileUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub institute_name: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherProfileUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub department: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub qualification: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfileUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub phone: Option<Option<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeacherRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub qualification: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeacherRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub department: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub qualification: Option<Option<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudentRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
    pub roll_number: Option<String>,
    pub course_id: Option<String>,
    pub semester: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub roll_number: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub course_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub semester: Option<Option<i64>>,
}
