//! `PostgreSQL` implementation of [`Persistence`].
//!
//! Queries are checked at runtime (`query_as`) so the crate builds without a
//! live database. Enum columns are stored as TEXT and parsed on the way out;
//! a value that does not parse is reported as `DataCorruption`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use washline_core::{
    AccountId, CertificationId, CertificationStatus, Email, RequestId, RequestStatus, Role,
    ServiceType, StaffId, TrainingModuleId,
};

use super::{NewAccount, Persistence, RepositoryError};
use crate::models::{Account, Certification, NewServiceRequest, ServiceRequest, TrainingModule};

/// Persistence backed by a `PostgreSQL` pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

// =============================================================================
// Row Types
// =============================================================================

#[derive(sqlx::FromRow)]
struct PickupRow {
    id: i64,
    name: String,
    phone: String,
    email: String,
    address: String,
    service_type: String,
    pickup_date: NaiveDate,
    time_slot: String,
    notes: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<PickupRow> for ServiceRequest {
    type Error = RepositoryError;

    fn try_from(row: PickupRow) -> Result<Self, Self::Error> {
        let service_type = row
            .service_type
            .parse::<ServiceType>()
            .map_err(RepositoryError::DataCorruption)?;
        let status = row
            .status
            .parse::<RequestStatus>()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: RequestId::new(row.id),
            name: row.name,
            phone: row.phone,
            email: row.email,
            address: row.address,
            service_type,
            pickup_date: row.pickup_date,
            time_slot: row.time_slot,
            notes: row.notes,
            status,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    email: String,
    name: String,
    role: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        let role = row
            .role
            .parse::<Role>()
            .map_err(|e| RepositoryError::DataCorruption(e.to_string()))?;

        Ok(Self {
            id: AccountId::new(row.id),
            email,
            name: row.name,
            role,
            password_hash: row.password_hash,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CertificationRow {
    id: i64,
    staff_id: i64,
    title: String,
    issued_on: NaiveDate,
    expires_on: NaiveDate,
    status: String,
}

impl TryFrom<CertificationRow> for Certification {
    type Error = RepositoryError;

    fn try_from(row: CertificationRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<CertificationStatus>()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: CertificationId::new(row.id),
            staff_id: StaffId::new(row.staff_id),
            title: row.title,
            issued_on: row.issued_on,
            expires_on: row.expires_on,
            status,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TrainingModuleRow {
    id: i64,
    title: String,
    description: String,
    duration: String,
    completion: i32,
}

impl From<TrainingModuleRow> for TrainingModule {
    fn from(row: TrainingModuleRow) -> Self {
        Self {
            id: TrainingModuleId::new(row.id),
            title: row.title,
            description: row.description,
            duration: row.duration,
            completion: row.completion,
        }
    }
}

const PICKUP_COLUMNS: &str = "id, name, phone, email, address, service_type, pickup_date, \
                              time_slot, notes, status, created_at";

// =============================================================================
// Persistence
// =============================================================================

#[async_trait]
impl Persistence for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))?;
        Ok(())
    }

    async fn select_pickups(&self) -> Result<Vec<ServiceRequest>, RepositoryError> {
        let rows: Vec<PickupRow> = sqlx::query_as(&format!(
            "SELECT {PICKUP_COLUMNS} FROM pickups ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ServiceRequest::try_from).collect()
    }

    async fn insert_pickup(
        &self,
        pickup: &NewServiceRequest,
    ) -> Result<ServiceRequest, RepositoryError> {
        let row: PickupRow = sqlx::query_as(&format!(
            r"
            INSERT INTO pickups
                (name, phone, email, address, service_type, pickup_date, time_slot, notes, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {PICKUP_COLUMNS}
            "
        ))
        .bind(&pickup.name)
        .bind(&pickup.phone)
        .bind(pickup.email.as_str())
        .bind(&pickup.address)
        .bind(pickup.service_type.as_str())
        .bind(pickup.pickup_date)
        .bind(&pickup.time_slot)
        .bind(pickup.notes.as_deref())
        .bind(RequestStatus::Pending.as_str())
        .fetch_one(&self.pool)
        .await?;

        ServiceRequest::try_from(row)
    }

    async fn update_pickup_status(
        &self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE pickups SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn find_account(&self, email: &Email) -> Result<Option<Account>, RepositoryError> {
        let row: Option<AccountRow> = sqlx::query_as(
            r"
            SELECT id, email, name, role, password_hash, created_at
            FROM accounts
            WHERE lower(email) = lower($1)
            ",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Account::try_from).transpose()
    }

    async fn insert_account(&self, account: &NewAccount) -> Result<Account, RepositoryError> {
        let row: AccountRow = sqlx::query_as(
            r"
            INSERT INTO accounts (email, name, role, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, role, password_hash, created_at
            ",
        )
        .bind(account.email.as_str())
        .bind(&account.name)
        .bind(account.role.as_str())
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RepositoryError::Conflict(format!("account {} already exists", account.email))
            }
            other => RepositoryError::Database(other),
        })?;

        Account::try_from(row)
    }

    async fn select_certifications(&self) -> Result<Vec<Certification>, RepositoryError> {
        let rows: Vec<CertificationRow> = sqlx::query_as(
            r"
            SELECT id, staff_id, title, issued_on, expires_on, status
            FROM certifications
            ORDER BY expires_on ASC, id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Certification::try_from).collect()
    }

    async fn update_certification_status(
        &self,
        id: CertificationId,
        status: CertificationStatus,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE certifications SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn select_training_modules(&self) -> Result<Vec<TrainingModule>, RepositoryError> {
        let rows: Vec<TrainingModuleRow> = sqlx::query_as(
            "SELECT id, title, description, duration, completion FROM training_modules ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TrainingModule::from).collect())
    }
}
