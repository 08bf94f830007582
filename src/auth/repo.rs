use crate::auth::repo_types::Customer;
use sqlx::PgPool;
use uuid::Uuid;

/// Fields needed to insert a new customer.
pub struct NewCustomer<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

impl Customer {
    /// Find a customer by email.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, created_at
            FROM customers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(customer)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, email, password_hash, first_name, last_name, created_at
            FROM customers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(customer)
    }

    /// Create a new customer with hashed password.
    pub async fn create(db: &PgPool, new: NewCustomer<'_>) -> anyhow::Result<Customer> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (email, password_hash, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, first_name, last_name, created_at
            "#,
        )
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.first_name)
        .bind(new.last_name)
        .fetch_one(db)
        .await?;
        Ok(customer)
    }
}
