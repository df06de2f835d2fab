// src/services/user_service.rs
use crate::{
    config::SuperAdminSeed,
    error::{AppError, AppResult},
    models::user::{
        Admin, AdminProfileUpdate, NewStudentRequest, NewTeacherRequest, Principal, Profile,
        RegisterAdminRequest, Role, Student, StudentProfileUpdate, SuperAdmin, Teacher,
        TeacherProfileUpdate, UpdateStudentRequest, UpdateTeacherRequest,
    },
    services::{
        auth_service, course_service, on_unique_violation, patch_field, required_text,
        settings_service::SettingsService,
    },
};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

const EMAIL_TAKEN: &str = "Email already registered";

const ADMIN_COLUMNS: &str = "id, name, email, password_hash, phone, institute_name, created_at";
const TEACHER_COLUMNS: &str =
    "id, name, email, password_hash, phone, department, qualification, admin_id, created_at";
const STUDENT_COLUMNS: &str =
    "id, name, email, password_hash, phone, roll_number, course_id, semester, admin_id, created_at";

/// Dados mínimos para autenticar um utilizador de qualquer role.
#[derive(Debug, Clone, FromRow)]
pub struct Credentials {
    pub id: String,
    pub password_hash: String,
    pub admin_id: Option<String>,
}

impl Credentials {
    pub fn into_principal(self, role: Role) -> AppResult<Principal> {
        let missing_tenant = || {
            tracing::error!("Utilizador {} ({}) sem admin associado.", self.id, role);
            AppError::Unauthorized("Not authorized, user not found".into())
        };
        Ok(match role {
            Role::SuperAdmin => Principal::SuperAdmin { id: self.id.clone() },
            Role::Admin => Principal::Admin { id: self.id.clone() },
            Role::Teacher => Principal::Teacher {
                id: self.id.clone(),
                admin_id: self.admin_id.clone().ok_or_else(missing_tenant)?,
            },
            Role::Student => Principal::Student {
                id: self.id.clone(),
                admin_id: self.admin_id.clone().ok_or_else(missing_tenant)?,
            },
        })
    }
}

fn table_for(role: Role) -> &'static str {
    match role {
        Role::SuperAdmin => "super_admins",
        Role::Admin => "admins",
        Role::Teacher => "teachers",
        Role::Student => "students",
    }
}

fn credentials_select(role: Role) -> String {
    let admin_column = match role {
        Role::Teacher | Role::Student => "admin_id",
        Role::SuperAdmin | Role::Admin => "NULL AS admin_id",
    };
    format!("SELECT id, password_hash, {} FROM {}", admin_column, table_for(role))
}

pub async fn find_credentials_by_email(
    db_pool: &SqlitePool,
    role: Role,
    email: &str,
) -> AppResult<Option<Credentials>> {
    tracing::debug!("Buscando credenciais ({}) por email: {}", role, email);
    let sql = format!("{} WHERE email = ?1", credentials_select(role));
    let credentials = sqlx::query_as::<_, Credentials>(&sql)
        .bind(email.trim())
        .fetch_optional(db_pool)
        .await?;
    Ok(credentials)
}

pub async fn find_credentials_by_id(
    db_pool: &SqlitePool,
    role: Role,
    id: &str,
) -> AppResult<Option<Credentials>> {
    let sql = format!("{} WHERE id = ?1", credentials_select(role));
    let credentials = sqlx::query_as::<_, Credentials>(&sql)
        .bind(id)
        .fetch_optional(db_pool)
        .await?;
    Ok(credentials)
}

pub async fn update_password_hash(db_pool: &SqlitePool, role: Role, id: &str, password_hash: &str) -> AppResult<()> {
    let sql = format!("UPDATE {} SET password_hash = ?1 WHERE id = ?2", table_for(role));
    let rows_affected = sqlx::query(&sql)
        .bind(password_hash)
        .bind(id)
        .execute(db_pool)
        .await?
        .rows_affected();

    if rows_affected == 0 {
        tracing::warn!("Falha ao alterar senha: utilizador '{}' não encontrado.", id);
        return Err(AppError::NotFound("User not found".into()));
    }
    Ok(())
}

async fn ensure_email_available(
    db_pool: &SqlitePool,
    role: Role,
    email: &str,
    except_id: Option<&str>,
) -> AppResult<()> {
    let sql = format!(
        "SELECT COUNT(*) FROM {} WHERE email = ?1 AND id != ?2",
        table_for(role)
    );
    let count: i64 = sqlx::query_scalar(&sql)
        .bind(email)
        .bind(except_id.unwrap_or(""))
        .fetch_one(db_pool)
        .await?;

    if count > 0 {
        tracing::warn!("Email '{}' já registado ({}).", email, role);
        return Err(AppError::Validation(EMAIL_TAKEN.into()));
    }
    Ok(())
}

fn normalize_email(email: &str) -> AppResult<String> {
    let email = required_text(email, "Email")?;
    if !email.contains('@') {
        return Err(AppError::Validation("Invalid email address".into()));
    }
    Ok(email.to_lowercase())
}

// --- Super-admin ---

/// Cria o super-admin indicado no ambiente, se ainda não existir nenhum com esse email.
pub async fn ensure_super_admin(db_pool: &SqlitePool, seed: &SuperAdminSeed, bcrypt_cost: u32) -> AppResult<()> {
    let email = normalize_email(&seed.email)?;
    if find_credentials_by_email(db_pool, Role::SuperAdmin, &email).await?.is_some() {
        tracing::debug!("Super-admin '{}' já existe.", email);
        return Ok(());
    }

    let password_hash = auth_service::hash_password(&seed.password, bcrypt_cost).await?;
    sqlx::query("INSERT INTO super_admins (id, name, email, password_hash) VALUES (?1, ?2, ?3, ?4)")
        .bind(Uuid::new_v4().to_string())
        .bind(&seed.name)
        .bind(&email)
        .bind(password_hash)
        .execute(db_pool)
        .await?;

    tracing::info!("✅ Super-admin '{}' criado.", email);
    Ok(())
}

pub async fn find_super_admin_by_id(db_pool: &SqlitePool, id: &str) -> AppResult<Option<SuperAdmin>> {
    let super_admin = sqlx::query_as::<_, SuperAdmin>(
        "SELECT id, name, email, password_hash, created_at FROM super_admins WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(db_pool)
    .await?;
    Ok(super_admin)
}

// --- Admins ---

pub async fn register_admin(
    db_pool: &SqlitePool,
    settings: &SettingsService,
    form: &RegisterAdminRequest,
    bcrypt_cost: u32,
) -> AppResult<Admin> {
    if !settings.get().await?.allow_admin_registration {
        tracing::warn!("Registo de admin recusado: desativado nas definições do sistema.");
        return Err(AppError::Forbidden("Admin registration is currently disabled".into()));
    }

    let name = required_text(&form.name, "Name")?;
    let email = normalize_email(&form.email)?;
    auth_service::validate_new_password(&form.password)?;
    ensure_email_available(db_pool, Role::Admin, &email, None).await?;

    let id = Uuid::new_v4().to_string();
    let password_hash = auth_service::hash_password(&form.password, bcrypt_cost).await?;
    sqlx::query(
        r#"
        INSERT INTO admins (id, name, email, password_hash, phone, institute_name)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&id)
    .bind(&name)
    .bind(&email)
    .bind(password_hash)
    .bind(&form.phone)
    .bind(&form.institute_name)
    .execute(db_pool)
    .await
    .map_err(on_unique_violation(EMAIL_TAKEN))?;

    tracing::info!("✅ Admin '{}' registado.", email);
    find_admin_by_id(db_pool, &id)
        .await?
        .ok_or(AppError::InternalServerError)
}

pub async fn find_admin_by_id(db_pool: &SqlitePool, id: &str) -> AppResult<Option<Admin>> {
    let sql = format!("SELECT {} FROM admins WHERE id = ?1", ADMIN_COLUMNS);
    let admin = sqlx::query_as::<_, Admin>(&sql)
        .bind(id)
        .fetch_optional(db_pool)
        .await?;
    Ok(admin)
}

pub async fn list_admins(db_pool: &SqlitePool) -> AppResult<Vec<Admin>> {
    let sql = format!("SELECT {} FROM admins ORDER BY name ASC", ADMIN_COLUMNS);
    let admins = sqlx::query_as::<_, Admin>(&sql).fetch_all(db_pool).await?;
    tracing::debug!("Encontrados {} admins.", admins.len());
    Ok(admins)
}

pub async fn update_admin_profile(db_pool: &SqlitePool, id: &str, update: &AdminProfileUpdate) -> AppResult<Admin> {
    let current = find_admin_by_id(db_pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Admin not found".into()))?;

    let name = match &update.name {
        Some(name) => required_text(name, "Name")?,
        None => current.name,
    };
    sqlx::query("UPDATE admins SET name = ?1, phone = ?2, institute_name = ?3 WHERE id = ?4")
        .bind(name)
        .bind(patch_field(&update.phone, current.phone))
        .bind(patch_field(&update.institute_name, current.institute_name))
        .bind(id)
        .execute(db_pool)
        .await?;

    tracing::info!("✅ Perfil do admin {} atualizado.", id);
    find_admin_by_id(db_pool, id).await?.ok_or(AppError::InternalServerError)
}

/// Perfil do principal autenticado, qualquer que seja a role.
pub async fn find_profile(db_pool: &SqlitePool, principal: &Principal) -> AppResult<Profile> {
    let not_found = || AppError::NotFound("User not found".into());
    Ok(match principal {
        Principal::SuperAdmin { id } => Profile::SuperAdmin(find_super_admin_by_id(db_pool, id).await?.ok_or_else(not_found)?),
        Principal::Admin { id } => Profile::Admin(find_admin_by_id(db_pool, id).await?.ok_or_else(not_found)?),
        Principal::Teacher { id, admin_id } => Profile::Teacher(find_teacher(db_pool, id, admin_id).await?),
        Principal::Student { id, admin_id } => Profile::Student(find_student(db_pool, id, admin_id).await?),
    })
}

// --- Teachers ---

pub async fn create_teacher(
    db_pool: &SqlitePool,
    admin_id: &str,
    form: &NewTeacherRequest,
    bcrypt_cost: u32,
) -> AppResult<Teacher> {
    let name = required_text(&form.name, "Name")?;
    let email = normalize_email(&form.email)?;
    auth_service::validate_new_password(&form.password)?;
    ensure_email_available(db_pool, Role::Teacher, &email, None).await?;

    let id = Uuid::new_v4().to_string();
    let password_hash = auth_service::hash_password(&form.password, bcrypt_cost).await?;
    sqlx::query(
        r#"
        INSERT INTO teachers (id, name, email, password_hash, phone, department, qualification, admin_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&id)
    .bind(&name)
    .bind(&email)
    .bind(password_hash)
    .bind(&form.phone)
    .bind(&form.department)
    .bind(&form.qualification)
    .bind(admin_id)
    .execute(db_pool)
    .await
    .map_err(on_unique_violation(EMAIL_TAKEN))?;

    tracing::info!("✅ Professor '{}' criado no tenant {}.", email, admin_id);
    find_teacher(db_pool, &id, admin_id).await
}

pub async fn list_teachers(db_pool: &SqlitePool, admin_id: &str) -> AppResult<Vec<Teacher>> {
    let sql = format!("SELECT {} FROM teachers WHERE admin_id = ?1 ORDER BY name ASC", TEACHER_COLUMNS);
    let teachers = sqlx::query_as::<_, Teacher>(&sql)
        .bind(admin_id)
        .fetch_all(db_pool)
        .await?;
    Ok(teachers)
}

/// Professor do tenant indicado; 404 se não existir ou pertencer a outro admin.
pub async fn find_teacher(db_pool: &SqlitePool, id: &str, admin_id: &str) -> AppResult<Teacher> {
    let sql = format!("SELECT {} FROM teachers WHERE id = ?1 AND admin_id = ?2", TEACHER_COLUMNS);
    sqlx::query_as::<_, Teacher>(&sql)
        .bind(id)
        .bind(admin_id)
        .fetch_optional(db_pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Teacher not found".into()))
}

/// Hash da nova password, se o formulário trouxer uma.
async fn new_password_hash(password: Option<&str>, bcrypt_cost: u32) -> AppResult<Option<String>> {
    match password {
        Some(password) => {
            auth_service::validate_new_password(password)?;
            Ok(Some(auth_service::hash_password(password, bcrypt_cost).await?))
        }
        None => Ok(None),
    }
}

pub async fn update_teacher(
    db_pool: &SqlitePool,
    id: &str,
    admin_id: &str,
    form: &UpdateTeacherRequest,
    bcrypt_cost: u32,
) -> AppResult<Teacher> {
    let password_hash = new_password_hash(form.password.as_deref(), bcrypt_cost).await?;
    save_teacher(db_pool, id, admin_id, form, password_hash).await
}

/// Grava os campos do professor; `password_hash = None` mantém a password atual.
async fn save_teacher(
    db_pool: &SqlitePool,
    id: &str,
    admin_id: &str,
    form: &UpdateTeacherRequest,
    password_hash: Option<String>,
) -> AppResult<Teacher> {
    let current = find_teacher(db_pool, id, admin_id).await?;

    let name = match &form.name {
        Some(name) => required_text(name, "Name")?,
        None => current.name,
    };
    let email = match &form.email {
        Some(email) => {
            let email = normalize_email(email)?;
            ensure_email_available(db_pool, Role::Teacher, &email, Some(id)).await?;
            email
        }
        None => current.email,
    };

    sqlx::query(
        r#"
        UPDATE teachers
        SET name = ?1, email = ?2, password_hash = ?3, phone = ?4, department = ?5, qualification = ?6
        WHERE id = ?7 AND admin_id = ?8
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash.unwrap_or(current.password_hash))
    .bind(patch_field(&form.phone, current.phone))
    .bind(patch_field(&form.department, current.department))
    .bind(patch_field(&form.qualification, current.qualification))
    .bind(id)
    .bind(admin_id)
    .execute(db_pool)
    .await
    .map_err(on_unique_violation(EMAIL_TAKEN))?;

    tracing::info!("✅ Professor {} atualizado.", id);
    find_teacher(db_pool, id, admin_id).await
}

// O próprio professor não muda email nem password por aqui
pub async fn update_teacher_profile(
    db_pool: &SqlitePool,
    id: &str,
    admin_id: &str,
    update: &TeacherProfileUpdate,
) -> AppResult<Teacher> {
    let form = UpdateTeacherRequest {
        name: update.name.clone(),
        phone: update.phone.clone(),
        department: update.department.clone(),
        qualification: update.qualification.clone(),
        ..Default::default()
    };
    save_teacher(db_pool, id, admin_id, &form, None).await
}

// --- Students ---

/// Um aluno só pode ficar inscrito num curso do seu tenant e num semestre desse curso.
async fn validate_enrollment(
    db_pool: &SqlitePool,
    admin_id: &str,
    course_id: Option<&str>,
    semester: Option<i64>,
) -> AppResult<()> {
    match (course_id, semester) {
        (None, None) => Ok(()),
        (None, Some(_)) => Err(AppError::Validation("A semester requires a course".into())),
        (Some(course_id), semester) => {
            let course = course_service::get_course(db_pool, course_id, admin_id)
                .await
                .map_err(|e| match e {
                    AppError::NotFound(_) => AppError::Validation("Invalid course".into()),
                    other => other,
                })?;
            if let Some(number) = semester {
                if !course.has_semester(number) {
                    return Err(AppError::Validation(format!(
                        "Semester must be between 1 and {}",
                        course.semester_count()
                    )));
                }
            }
            Ok(())
        }
    }
}

pub async fn create_student(
    db_pool: &SqlitePool,
    admin_id: &str,
    form: &NewStudentRequest,
    bcrypt_cost: u32,
) -> AppResult<Student> {
    let name = required_text(&form.name, "Name")?;
    let email = normalize_email(&form.email)?;
    auth_service::validate_new_password(&form.password)?;
    ensure_email_available(db_pool, Role::Student, &email, None).await?;
    validate_enrollment(db_pool, admin_id, form.course_id.as_deref(), form.semester).await?;

    let id = Uuid::new_v4().to_string();
    let password_hash = auth_service::hash_password(&form.password, bcrypt_cost).await?;
    sqlx::query(
        r#"
        INSERT INTO students (id, name, email, password_hash, phone, roll_number, course_id, semester, admin_id)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&id)
    .bind(&name)
    .bind(&email)
    .bind(password_hash)
    .bind(&form.phone)
    .bind(&form.roll_number)
    .bind(&form.course_id)
    .bind(form.semester)
    .bind(admin_id)
    .execute(db_pool)
    .await
    .map_err(on_unique_violation(EMAIL_TAKEN))?;

    tracing::info!("✅ Aluno '{}' criado no tenant {}.", email, admin_id);
    find_student(db_pool, &id, admin_id).await
}

pub async fn list_students(db_pool: &SqlitePool, admin_id: &str) -> AppResult<Vec<Student>> {
    let sql = format!("SELECT {} FROM students WHERE admin_id = ?1 ORDER BY name ASC", STUDENT_COLUMNS);
    let students = sqlx::query_as::<_, Student>(&sql)
        .bind(admin_id)
        .fetch_all(db_pool)
        .await?;
    Ok(students)
}

pub async fn find_student(db_pool: &SqlitePool, id: &str, admin_id: &str) -> AppResult<Student> {
    let sql = format!("SELECT {} FROM students WHERE id = ?1 AND admin_id = ?2", STUDENT_COLUMNS);
    sqlx::query_as::<_, Student>(&sql)
        .bind(id)
        .bind(admin_id)
        .fetch_optional(db_pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".into()))
}

pub async fn find_student_by_id(db_pool: &SqlitePool, id: &str) -> AppResult<Student> {
    let sql = format!("SELECT {} FROM students WHERE id = ?1", STUDENT_COLUMNS);
    sqlx::query_as::<_, Student>(&sql)
        .bind(id)
        .fetch_optional(db_pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".into()))
}

pub async fn update_student(
    db_pool: &SqlitePool,
    id: &str,
    admin_id: &str,
    form: &UpdateStudentRequest,
    bcrypt_cost: u32,
) -> AppResult<Student> {
    let password_hash = new_password_hash(form.password.as_deref(), bcrypt_cost).await?;
    save_student(db_pool, id, admin_id, form, password_hash).await
}

/// Grava os campos do aluno; `password_hash = None` mantém a password atual.
/// Limpar o curso (`courseId: null`) também limpa o semestre, salvo se vier um novo.
async fn save_student(
    db_pool: &SqlitePool,
    id: &str,
    admin_id: &str,
    form: &UpdateStudentRequest,
    password_hash: Option<String>,
) -> AppResult<Student> {
    let current = find_student(db_pool, id, admin_id).await?;

    let name = match &form.name {
        Some(name) => required_text(name, "Name")?,
        None => current.name,
    };
    let email = match &form.email {
        Some(email) => {
            let email = normalize_email(email)?;
            ensure_email_available(db_pool, Role::Student, &email, Some(id)).await?;
            email
        }
        None => current.email,
    };
    let course_id = patch_field(&form.course_id, current.course_id);
    let semester = match (&form.semester, &form.course_id) {
        (Some(semester), _) => *semester,
        (None, Some(None)) => None,
        (None, _) => current.semester,
    };
    validate_enrollment(db_pool, admin_id, course_id.as_deref(), semester).await?;

    sqlx::query(
        r#"
        UPDATE students
        SET name = ?1, email = ?2, password_hash = ?3, phone = ?4, roll_number = ?5, course_id = ?6, semester = ?7
        WHERE id = ?8 AND admin_id = ?9
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(password_hash.unwrap_or(current.password_hash))
    .bind(patch_field(&form.phone, current.phone))
    .bind(patch_field(&form.roll_number, current.roll_number))
    .bind(course_id)
    .bind(semester)
    .bind(id)
    .bind(admin_id)
    .execute(db_pool)
    .await
    .map_err(on_unique_violation(EMAIL_TAKEN))?;

    tracing::info!("✅ Aluno {} atualizado.", id);
    find_student(db_pool, id, admin_id).await
}

pub async fn update_student_profile(
    db_pool: &SqlitePool,
    id: &str,
    admin_id: &str,
    update: &StudentProfileUpdate,
) -> AppResult<Student> {
    let form = UpdateStudentRequest {
        name: update.name.clone(),
        phone: update.phone.clone(),
        ..Default::default()
    };
    save_student(db_pool, id, admin_id, &form, None).await
}
