//! # Customer Repository
//!
//! Database operations for customers.
//!
//! ## The Balance Is Derived
//! A customer's outstanding balance is never stored. It is always computed
//! as the sum of PENDING deferred installment amounts across that
//! customer's sales, so it cannot drift from the installment state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use fiado_core::money::Money;
use fiado_core::types::Customer;
use fiado_core::validation::validate_name;

/// A customer row together with the derived outstanding balance, as shown
/// in customer listings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CustomerWithBalance {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Σ pending deferred installment amounts across this customer's
    /// sales.
    pub balance: Money,
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Creates a customer. Name is unique; a duplicate surfaces as
    /// `DbError::UniqueViolation`.
    pub async fn create(
        &self,
        name: &str,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> DbResult<Customer> {
        validate_name(name)?;

        let customer = Customer {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            phone: phone.map(str::to_string),
            address: address.map(str::to_string),
            created_at: Utc::now(),
        };

        debug!(id = %customer.id, name = %customer.name, "Creating customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, phone, address, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, phone, address, created_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Updates a customer's contact details.
    pub async fn update(
        &self,
        id: &str,
        name: &str,
        phone: Option<&str>,
        address: Option<&str>,
    ) -> DbResult<()> {
        validate_name(name)?;

        let result = sqlx::query(
            r#"
            UPDATE customers SET name = ?2, phone = ?3, address = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(name.trim())
        .bind(phone)
        .bind(address)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    /// Computes the customer's current outstanding balance: the sum of
    /// PENDING deferred installment amounts across all of their sales.
    pub async fn balance_of(&self, customer_id: &str) -> DbResult<Money> {
        let cents: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(i.amount), 0)
            FROM installments i
            JOIN sales s ON s.id = i.sale_id
            WHERE s.customer_id = ?1
              AND i.method = 'deferred'
              AND i.status = 'pending'
            "#,
        )
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(Money::from_cents(cents))
    }

    /// Lists all customers ordered by name, each with the derived balance.
    pub async fn list_with_balance(&self) -> DbResult<Vec<CustomerWithBalance>> {
        let rows = sqlx::query_as::<_, CustomerWithBalance>(
            r#"
            SELECT
                c.id,
                c.name,
                c.phone,
                c.address,
                c.created_at,
                COALESCE((
                    SELECT SUM(i.amount)
                    FROM installments i
                    JOIN sales s ON s.id = i.sale_id
                    WHERE s.customer_id = c.id
                      AND i.method = 'deferred'
                      AND i.status = 'pending'
                ), 0) AS balance
            FROM customers c
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Deletes a customer. Fails with `ForeignKeyViolation` when the
    /// customer still owns sales, quotes or payment history.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
