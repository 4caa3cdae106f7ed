//! Employee and service lookups
//!
//! Used for referential checks when a booking is created. The service never
//! edits these records through its HTTP surface; they are loaded from a seed
//! file at startup or inserted directly.

use super::BookingDb;
use crate::error::AppError;
use crate::models::{DirectorySeed, Employee, ObjectId, Service};
use std::path::Path;
use tracing::{debug, info};

impl BookingDb {
    /// Get an employee by record key
    pub async fn find_employee(&self, id: &ObjectId) -> Result<Option<Employee>, AppError> {
        let employee =
            sqlx::query_as::<_, Employee>("SELECT id, name, role FROM employees WHERE id = ?")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("Failed to fetch employee: {}", e))
                })?;

        Ok(employee)
    }

    /// Get a service by record key
    pub async fn find_service(&self, id: &ObjectId) -> Result<Option<Service>, AppError> {
        let service =
            sqlx::query_as::<_, Service>("SELECT id, name, price FROM services WHERE id = ?")
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| {
                    AppError::Internal(anyhow::anyhow!("Failed to fetch service: {}", e))
                })?;

        Ok(service)
    }

    /// Insert or replace an employee
    pub async fn insert_employee(&self, employee: &Employee) -> Result<(), AppError> {
        sqlx::query("INSERT OR REPLACE INTO employees (id, name, role) VALUES (?, ?, ?)")
            .bind(employee.id.as_str())
            .bind(&employee.name)
            .bind(&employee.role)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to save employee: {}", e)))?;

        debug!("Saved employee: {}", employee.id);
        Ok(())
    }

    /// Insert or replace a service
    pub async fn insert_service(&self, service: &Service) -> Result<(), AppError> {
        sqlx::query("INSERT OR REPLACE INTO services (id, name, price) VALUES (?, ?, ?)")
            .bind(service.id.as_str())
            .bind(&service.name)
            .bind(service.price)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to save service: {}", e)))?;

        debug!("Saved service: {}", service.id);
        Ok(())
    }

    /// Load employees and services from a JSON seed file
    ///
    /// # Returns
    /// * `Ok((employees, services))` - Number of records written
    /// * `Err(AppError)` - File unreadable, malformed, or a write failed
    pub async fn load_directory_seed<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<(usize, usize), AppError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Failed to read seed file {}: {}",
                path.display(),
                e
            ))
        })?;
        let seed: DirectorySeed = serde_json::from_str(&content).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Invalid seed file {}: {}",
                path.display(),
                e
            ))
        })?;

        for employee in &seed.employees {
            self.insert_employee(employee).await?;
        }
        for service in &seed.services {
            self.insert_service(service).await?;
        }

        info!(
            employees = seed.employees.len(),
            services = seed.services.len(),
            "Loaded directory seed from {}",
            path.display()
        );
        Ok((seed.employees.len(), seed.services.len()))
    }
}
