use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::str::FromStr;
use tracing::debug;
use uuid::Uuid;

use super::{
    AssignmentRepository, MissionRepository, MissionSignup, OrganizationRepository, RepoResult,
    RepositoryError, UserRepository,
};
use crate::models::{
    AssignedVolunteer, MemberView, Mission, MissionAssignment, OrganizationProfile, User,
    UserRole, OWNER_MEMBER_ROLE,
};

const UNIQUE_VIOLATION: &str = "23505";

const MISSION_COLUMNS: &str = "m.id, m.title, m.description, m.location, m.start_time, \
     m.end_time, m.created_by_user_id, m.created_by_org_id, m.created_at";

const USER_COLUMNS: &str = "id, email, password_hash, role, first_name, last_name, \
     phone_number, created_at";

const ORGANIZATION_COLUMNS: &str = "id, user_id, organization_name, contact_person, \
     phone_number, website, created_at";

/// PostgreSQL-backed store (source of truth in production)
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Unique violations become `UniqueViolation`; everything else stays a database error.
fn map_write_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unique").to_string();
            return RepositoryError::UniqueViolation(constraint);
        }
    }
    RepositoryError::Database(err)
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    let role: String = row.try_get("role")?;
    let role = UserRole::from_str(&role).map_err(|e| sqlx::Error::ColumnDecode {
        index: "role".to_string(),
        source: e.into(),
    })?;

    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        role,
        first_name: row.try_get("first_name")?,
        last_name: row.try_get("last_name")?,
        phone_number: row.try_get("phone_number")?,
        created_at: row.try_get("created_at")?,
    })
}

fn organization_from_row(row: &PgRow) -> Result<OrganizationProfile, sqlx::Error> {
    Ok(OrganizationProfile {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        organization_name: row.try_get("organization_name")?,
        contact_person: row.try_get("contact_person")?,
        phone_number: row.try_get("phone_number")?,
        website: row.try_get("website")?,
        created_at: row.try_get("created_at")?,
    })
}

fn mission_from_row(row: &PgRow) -> Result<Mission, sqlx::Error> {
    Ok(Mission {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        location: row.try_get("location")?,
        start_time: row.try_get("start_time")?,
        end_time: row.try_get("end_time")?,
        created_by_user_id: row.try_get("created_by_user_id")?,
        created_by_org_id: row.try_get("created_by_org_id")?,
        created_at: row.try_get("created_at")?,
    })
}

fn missions_from_rows(rows: &[PgRow]) -> RepoResult<Vec<Mission>> {
    rows.iter()
        .map(|row| mission_from_row(row).map_err(RepositoryError::from))
        .collect()
}

#[async_trait::async_trait]
impl UserRepository for PgStore {
    async fn find_user(&self, id: Uuid) -> RepoResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn find_user_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn create_user(&self, user: &User) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, first_name, last_name, phone_number, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone_number)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        debug!(user_id = %user.id, "Inserted user");
        Ok(())
    }

    async fn create_organization_account(
        &self,
        user: &User,
        profile: &OrganizationProfile,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, first_name, last_name, phone_number, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone_number)
        .bind(user.created_at)
        .execute(&mut *tx)
        .await
        .map_err(map_write_error)?;

        insert_profile(&mut tx, profile).await?;
        tx.commit().await?;

        debug!(user_id = %user.id, organization_id = %profile.id, "Inserted organization account");
        Ok(())
    }
}

async fn insert_profile(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    profile: &OrganizationProfile,
) -> RepoResult<()> {
    sqlx::query(
        r#"
        INSERT INTO organization_profiles
            (id, user_id, organization_name, contact_person, phone_number, website, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        "#,
    )
    .bind(profile.id)
    .bind(profile.user_id)
    .bind(&profile.organization_name)
    .bind(&profile.contact_person)
    .bind(&profile.phone_number)
    .bind(&profile.website)
    .bind(profile.created_at)
    .execute(&mut **tx)
    .await
    .map_err(map_write_error)?;

    sqlx::query(
        r#"
        INSERT INTO organization_members (id, organization_id, user_id, role, joined_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(profile.id)
    .bind(profile.user_id)
    .bind(OWNER_MEMBER_ROLE)
    .bind(profile.created_at)
    .execute(&mut **tx)
    .await
    .map_err(map_write_error)?;

    Ok(())
}

#[async_trait::async_trait]
impl OrganizationRepository for PgStore {
    async fn find_organization(&self, id: Uuid) -> RepoResult<Option<OrganizationProfile>> {
        let row = sqlx::query(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organization_profiles WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(organization_from_row).transpose()?)
    }

    async fn find_organization_by_owner(
        &self,
        user_id: Uuid,
    ) -> RepoResult<Option<OrganizationProfile>> {
        let row = sqlx::query(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organization_profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(organization_from_row).transpose()?)
    }

    async fn list_organizations(&self) -> RepoResult<Vec<OrganizationProfile>> {
        let rows = sqlx::query(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organization_profiles ORDER BY organization_name"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| organization_from_row(row).map_err(RepositoryError::from))
            .collect()
    }

    async fn create_organization(&self, profile: &OrganizationProfile) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;
        insert_profile(&mut tx, profile).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn list_members(&self, organization_id: Uuid) -> RepoResult<Vec<MemberView>> {
        let rows = sqlx::query(
            r#"
            SELECT om.user_id, u.first_name, u.last_name, u.email, om.role, om.joined_at
            FROM organization_members om
            JOIN users u ON u.id = om.user_id
            WHERE om.organization_id = $1
            ORDER BY om.joined_at
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        let mut members = Vec::with_capacity(rows.len());
        for row in rows {
            members.push(MemberView {
                user_id: row.try_get("user_id")?,
                first_name: row.try_get("first_name")?,
                last_name: row.try_get("last_name")?,
                email: row.try_get("email")?,
                role: row.try_get("role")?,
                joined_at: row.try_get("joined_at")?,
            });
        }
        Ok(members)
    }
}

#[async_trait::async_trait]
impl MissionRepository for PgStore {
    async fn insert_mission(&self, mission: &Mission) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO missions
                (id, title, description, location, start_time, end_time,
                 created_by_user_id, created_by_org_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(mission.id)
        .bind(&mission.title)
        .bind(&mission.description)
        .bind(&mission.location)
        .bind(mission.start_time)
        .bind(mission.end_time)
        .bind(mission.created_by_user_id)
        .bind(mission.created_by_org_id)
        .bind(mission.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;
        Ok(())
    }

    async fn find_mission(&self, id: Uuid) -> RepoResult<Option<Mission>> {
        let row = sqlx::query(&format!("SELECT {MISSION_COLUMNS} FROM missions m WHERE m.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(mission_from_row).transpose()?)
    }

    async fn list_missions(&self) -> RepoResult<Vec<Mission>> {
        let rows = sqlx::query(&format!(
            "SELECT {MISSION_COLUMNS} FROM missions m ORDER BY m.start_time, m.created_at"
        ))
        .fetch_all(&self.pool)
        .await?;
        missions_from_rows(&rows)
    }

    async fn list_missions_by_creator(
        &self,
        user_id: Uuid,
        organization_id: Option<Uuid>,
    ) -> RepoResult<Vec<Mission>> {
        let rows = sqlx::query(&format!(
            "SELECT {MISSION_COLUMNS} FROM missions m \
             WHERE m.created_by_user_id = $1 OR m.created_by_org_id = $2 \
             ORDER BY m.start_time, m.created_at"
        ))
        .bind(user_id)
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        missions_from_rows(&rows)
    }

    async fn list_missions_by_organization(
        &self,
        organization_id: Uuid,
    ) -> RepoResult<Vec<Mission>> {
        let rows = sqlx::query(&format!(
            "SELECT {MISSION_COLUMNS} FROM missions m \
             WHERE m.created_by_org_id = $1 \
             ORDER BY m.start_time, m.created_at"
        ))
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;
        missions_from_rows(&rows)
    }
}

#[async_trait::async_trait]
impl AssignmentRepository for PgStore {
    async fn assignment_exists(&self, mission_id: Uuid, user_id: Uuid) -> RepoResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM mission_assignments WHERE mission_id = $1 AND user_id = $2)",
        )
        .bind(mission_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert_assignment(&self, assignment: &MissionAssignment) -> RepoResult<bool> {
        let inserted: Option<Uuid> = sqlx::query_scalar(
            r#"
            INSERT INTO mission_assignments (id, mission_id, user_id, assigned_at, role_description)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (mission_id, user_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(assignment.id)
        .bind(assignment.mission_id)
        .bind(assignment.user_id)
        .bind(assignment.assigned_at)
        .bind(&assignment.role_description)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(inserted.is_some())
    }

    async fn list_volunteers(&self, mission_id: Uuid) -> RepoResult<Vec<AssignedVolunteer>> {
        let rows = sqlx::query(
            r#"
            SELECT a.user_id, u.first_name, u.last_name, u.email, a.assigned_at, a.role_description
            FROM mission_assignments a
            JOIN users u ON u.id = a.user_id
            WHERE a.mission_id = $1
            ORDER BY a.assigned_at
            "#,
        )
        .bind(mission_id)
        .fetch_all(&self.pool)
        .await?;

        let mut volunteers = Vec::with_capacity(rows.len());
        for row in rows {
            volunteers.push(AssignedVolunteer {
                user_id: row.try_get("user_id")?,
                first_name: row.try_get("first_name")?,
                last_name: row.try_get("last_name")?,
                email: row.try_get("email")?,
                assigned_at: row.try_get("assigned_at")?,
                role_description: row.try_get("role_description")?,
            });
        }
        Ok(volunteers)
    }

    async fn list_signups(&self, user_id: Uuid) -> RepoResult<Vec<MissionSignup>> {
        let rows = sqlx::query(&format!(
            "SELECT {MISSION_COLUMNS}, a.assigned_at, a.role_description \
             FROM mission_assignments a \
             JOIN missions m ON m.id = a.mission_id \
             WHERE a.user_id = $1 \
             ORDER BY m.start_time"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let mut signups = Vec::with_capacity(rows.len());
        for row in rows {
            signups.push(MissionSignup {
                mission: mission_from_row(&row)?,
                assigned_at: row.try_get("assigned_at")?,
                role_description: row.try_get("role_description")?,
            });
        }
        Ok(signups)
    }
}
