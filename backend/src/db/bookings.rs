//! Booking database operations
//!
//! Owns the SQLite pool and handles all reads and writes of booking records.

use crate::error::AppError;
use crate::models::{Booking, BookingUpdate, ListQuery, ObjectId, SearchQuery};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, info};

/// Column list matching the field order of [`Booking`]
const BOOKING_COLUMNS: &str = "id, booking_id, receptionist_id, receptionist_name, service_id, \
     service_name, assigned_staff_name, patient_id, patient_name, booking_date, booking_time, \
     status, remarks, updated";

/// Database connection pool for bookings and their lookups
pub struct BookingDb {
    pub(super) pool: SqlitePool,
}

impl BookingDb {
    /// Initialize database connection pool
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file, with or without a `sqlite:` prefix
    /// * `max_connections` - Pool ceiling
    ///
    /// # Returns
    /// * `Ok(BookingDb)` if successful
    /// * `Err(AppError)` if connection failed
    pub async fn new(db_path: &str, max_connections: u32) -> Result<Self, AppError> {
        let file_path = db_path
            .strip_prefix("sqlite://")
            .or_else(|| db_path.strip_prefix("sqlite:"))
            .unwrap_or(db_path);

        // Ensure parent directory exists
        if let Some(parent) = PathBuf::from(file_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("Failed to create db directory: {}", e))
                })?;
            }
        }

        let connection_string = format!("sqlite:{}", file_path);
        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid database path: {}", e)))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to connect to database: {}", e))
            })?;

        info!("Connected to SQLite database at: {}", file_path);

        let db = Self { pool };
        db.run_migrations().await?;

        Ok(db)
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations...");

        let migration_sql = include_str!("../../migrations/001_create_bookings.sql");

        for statement in split_statements(migration_sql) {
            sqlx::query(&statement)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::Internal(anyhow::anyhow!(
                        "Migration failed: {} - Statement: {}",
                        e,
                        statement.chars().take(100).collect::<String>()
                    ))
                })?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Get one page of bookings in the requested order
    pub async fn list_bookings(&self, query: &ListQuery) -> Result<Vec<Booking>, AppError> {
        let order_by = query
            .sort
            .columns()
            .iter()
            .map(|column| format!("{} {}", column, query.order.as_sql()))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "SELECT {} FROM bookings ORDER BY {}, rowid ASC LIMIT ? OFFSET ?",
            BOOKING_COLUMNS, order_by
        );

        let bookings = sqlx::query_as::<_, Booking>(&sql)
            .bind(query.limit)
            .bind(query.skip)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch bookings: {}", e)))?;

        Ok(bookings)
    }

    /// Find bookings whose service and/or patient names contain the given
    /// substrings (ASCII case-insensitive). An empty query matches nothing.
    pub async fn search_bookings(&self, query: &SearchQuery) -> Result<Vec<Booking>, AppError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM bookings WHERE 1 = 1",
            BOOKING_COLUMNS
        ));
        if let Some(service) = &query.service {
            builder
                .push(" AND instr(lower(service_name), lower(")
                .push_bind(service.clone())
                .push(")) > 0");
        }
        if let Some(patient) = &query.patient {
            builder
                .push(" AND instr(lower(patient_name), lower(")
                .push_bind(patient.clone())
                .push(")) > 0");
        }
        builder.push(" ORDER BY booking_date ASC, booking_time ASC, rowid ASC");

        let bookings = builder
            .build_query_as::<Booking>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to search bookings: {}", e))
            })?;

        Ok(bookings)
    }

    /// Total number of stored bookings
    pub async fn count_bookings(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to count bookings: {}", e)))?;

        Ok(count)
    }

    /// Get a booking by its record key
    pub async fn get_booking(&self, id: &ObjectId) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {} FROM bookings WHERE id = ?",
            BOOKING_COLUMNS
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch booking: {}", e)))?;

        Ok(booking)
    }

    /// Insert a new booking
    pub async fn insert_booking(&self, booking: &Booking) -> Result<(), AppError> {
        sqlx::query(&format!(
            "INSERT INTO bookings ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            BOOKING_COLUMNS
        ))
        .bind(booking.id.as_str())
        .bind(&booking.booking_id)
        .bind(&booking.receptionist_id)
        .bind(&booking.receptionist_name)
        .bind(&booking.service_id)
        .bind(&booking.service_name)
        .bind(&booking.assigned_staff_name)
        .bind(&booking.patient_id)
        .bind(&booking.patient_name)
        .bind(&booking.booking_date)
        .bind(&booking.booking_time)
        .bind(&booking.status)
        .bind(&booking.remarks)
        .bind(booking.updated)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create booking: {}", e)))?;

        debug!("Created booking: {} ({})", booking.booking_id, booking.id);
        Ok(())
    }

    /// Apply a partial update and refresh the `updated` timestamp
    ///
    /// # Returns
    /// * `Ok(Some(Booking))` - The booking as stored after the update
    /// * `Ok(None)` - No booking has this key
    pub async fn update_booking(
        &self,
        id: &ObjectId,
        update: &BookingUpdate,
    ) -> Result<Option<Booking>, AppError> {
        let Some(mut booking) = self.get_booking(id).await? else {
            return Ok(None);
        };
        update.apply(&mut booking);

        let result = sqlx::query(
            "UPDATE bookings SET receptionist_id = ?, receptionist_name = ?, service_id = ?, \
             service_name = ?, assigned_staff_name = ?, patient_id = ?, patient_name = ?, \
             booking_date = ?, booking_time = ?, status = ?, remarks = ?, updated = ? \
             WHERE id = ?",
        )
        .bind(&booking.receptionist_id)
        .bind(&booking.receptionist_name)
        .bind(&booking.service_id)
        .bind(&booking.service_name)
        .bind(&booking.assigned_staff_name)
        .bind(&booking.patient_id)
        .bind(&booking.patient_name)
        .bind(&booking.booking_date)
        .bind(&booking.booking_time)
        .bind(&booking.status)
        .bind(&booking.remarks)
        .bind(booking.updated)
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to update booking: {}", e)))?;

        // Removed between the read and the write
        if result.rows_affected() == 0 {
            return Ok(None);
        }

        debug!("Updated booking: {}", id);
        Ok(Some(booking))
    }

    /// Delete a booking, returning the removed record if there was one
    pub async fn delete_booking(&self, id: &ObjectId) -> Result<Option<Booking>, AppError> {
        let Some(booking) = self.get_booking(id).await? else {
            return Ok(None);
        };

        let result = sqlx::query("DELETE FROM bookings WHERE id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::Internal(anyhow::anyhow!("Failed to delete booking: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        debug!("Deleted booking: {}", id);
        Ok(Some(booking))
    }
}

/// Strip `--` comments and split a migration script into statements
fn split_statements(sql: &str) -> Vec<String> {
    let mut cleaned_sql = String::new();
    for line in sql.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }
        let without_comments = match trimmed.find("--") {
            Some(comment_pos) => &trimmed[..comment_pos],
            None => trimmed,
        };
        cleaned_sql.push_str(without_comments.trim());
        cleaned_sql.push(' ');
    }

    cleaned_sql
        .split(';')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
