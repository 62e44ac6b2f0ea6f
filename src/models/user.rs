use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::types::profile::ProfileUpdate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Tutor,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub program: String,
    pub level: String,
    pub difficult_subjects: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub teachable_subjects: Vec<String>,
    pub experience: String,
    pub availability: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Wire representation of an account. One variant per account kind, tagged
/// by `role`, so a student can never carry tutor-only fields and vice versa.
/// The password hash never leaves the row type below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum User {
    Student(StudentUser),
    Tutor(TutorUser),
    Admin(AdminUser),
}

impl User {
    pub fn id(&self) -> Uuid {
        match self {
            User::Student(u) => u.id,
            User::Tutor(u) => u.id,
            User::Admin(u) => u.id,
        }
    }

    pub fn role(&self) -> UserRole {
        match self {
            User::Student(_) => UserRole::Student,
            User::Tutor(_) => UserRole::Tutor,
            User::Admin(_) => UserRole::Admin,
        }
    }
}

/// One row of the `users` table. All role-specific columns are nullable at
/// the SQL layer; `into_user` narrows the row to the right variant.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub password_hash: String,
    pub avatar_url: Option<String>,
    pub program: Option<String>,
    pub level: Option<String>,
    pub difficult_subjects: Option<Vec<String>>,
    pub teachable_subjects: Option<Vec<String>>,
    pub experience: Option<String>,
    pub availability: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn into_user(self) -> User {
        match self.role {
            UserRole::Student => User::Student(StudentUser {
                id: self.id,
                email: self.email,
                name: self.name,
                avatar_url: self.avatar_url,
                program: self.program.unwrap_or_default(),
                level: self.level.unwrap_or_default(),
                difficult_subjects: self.difficult_subjects.unwrap_or_default(),
            }),
            UserRole::Tutor => User::Tutor(TutorUser {
                id: self.id,
                email: self.email,
                name: self.name,
                avatar_url: self.avatar_url,
                teachable_subjects: self.teachable_subjects.unwrap_or_default(),
                experience: self.experience.unwrap_or_default(),
                availability: self.availability.unwrap_or_default(),
                bio: self.bio,
            }),
            UserRole::Admin => User::Admin(AdminUser {
                id: self.id,
                email: self.email,
                name: self.name,
                avatar_url: self.avatar_url,
            }),
        }
    }

    /// Inserts a fresh account. Role-specific fields start out empty, the
    /// profile form fills them in later.
    pub async fn create(
        pool: &PgPool,
        role: UserRole,
        name: &str,
        email: &str,
        password_hash: &str,
        avatar_url: Option<String>,
    ) -> Result<Self> {
        let now = Utc::now();

        let (program, level, difficult_subjects): (Option<String>, Option<String>, Option<Vec<String>>) =
            match role {
                UserRole::Student => (Some(String::new()), Some(String::new()), Some(Vec::new())),
                _ => (None, None, None),
            };
        let (teachable_subjects, experience, availability, bio): (
            Option<Vec<String>>,
            Option<String>,
            Option<String>,
            Option<String>,
        ) = match role {
            UserRole::Tutor => (
                Some(Vec::new()),
                Some(String::new()),
                Some(String::new()),
                Some(String::new()),
            ),
            _ => (None, None, None, None),
        };

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (
                id, email, name, role, password_hash, avatar_url,
                program, level, difficult_subjects,
                teachable_subjects, experience, availability, bio,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(name)
        .bind(role)
        .bind(password_hash)
        .bind(avatar_url)
        .bind(program)
        .bind(level)
        .bind(difficult_subjects)
        .bind(teachable_subjects)
        .bind(experience)
        .bind(availability)
        .bind(bio)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Login lookup: the claimed role is part of the key, so a student
    /// cannot sign in through the tutor form even with a valid password.
    pub async fn find_by_email_and_role(
        pool: &PgPool,
        email: &str,
        role: UserRole,
    ) -> Result<Option<Self>> {
        let row =
            sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE email = $1 AND role = $2")
                .bind(email)
                .bind(role)
                .fetch_optional(pool)
                .await?;
        Ok(row)
    }

    pub async fn list_tutors(pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT * FROM users WHERE role = $1 ORDER BY created_at DESC",
        )
        .bind(UserRole::Tutor)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Merges a partial profile update. Only fields recognized for the
    /// stored kind are applied; email and role are not mutable here.
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> Result<Option<Self>> {
        let Some(mut row) = Self::get(pool, id).await? else {
            return Ok(None);
        };

        if let Some(name) = &update.name {
            row.name = name.clone();
        }
        if let Some(avatar_url) = &update.avatar_url {
            row.avatar_url = Some(avatar_url.clone());
        }

        match row.role {
            UserRole::Student => {
                if let Some(program) = &update.program {
                    row.program = Some(program.clone());
                }
                if let Some(level) = &update.level {
                    row.level = Some(level.clone());
                }
                if let Some(difficult_subjects) = &update.difficult_subjects {
                    row.difficult_subjects = Some(difficult_subjects.clone());
                }
            }
            UserRole::Tutor => {
                if let Some(teachable_subjects) = &update.teachable_subjects {
                    row.teachable_subjects = Some(teachable_subjects.clone());
                }
                if let Some(experience) = &update.experience {
                    row.experience = Some(experience.clone());
                }
                if let Some(availability) = &update.availability {
                    row.availability = Some(availability.clone());
                }
                if let Some(bio) = &update.bio {
                    row.bio = Some(bio.clone());
                }
            }
            UserRole::Admin => {}
        }

        let updated = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
            SET name = $1, avatar_url = $2,
                program = $3, level = $4, difficult_subjects = $5,
                teachable_subjects = $6, experience = $7, availability = $8, bio = $9,
                updated_at = $10
            WHERE id = $11
            RETURNING *
            "#,
        )
        .bind(&row.name)
        .bind(&row.avatar_url)
        .bind(&row.program)
        .bind(&row.level)
        .bind(&row.difficult_subjects)
        .bind(&row.teachable_subjects)
        .bind(&row.experience)
        .bind(&row.availability)
        .bind(&row.bio)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(updated)
    }
}
