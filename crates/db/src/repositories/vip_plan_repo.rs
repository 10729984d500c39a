//! Repository for the `vip_plans` table.

use sqlx::PgPool;

use crate::models::vip_plan::{CreateVipPlan, VipPlan};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, duration_days, price, description, is_active, sort_order, created_at, updated_at";

pub struct VipPlanRepo;

impl VipPlanRepo {
    /// Insert a new plan, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateVipPlan) -> Result<VipPlan, sqlx::Error> {
        let query = format!(
            "INSERT INTO vip_plans (name, duration_days, price, description, is_active, sort_order)
             VALUES ($1, $2, $3, $4, COALESCE($5, true), COALESCE($6, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VipPlan>(&query)
            .bind(&input.name)
            .bind(input.duration_days)
            .bind(&input.price)
            .bind(&input.description)
            .bind(input.is_active)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    /// List plans offered to users, in display order.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<VipPlan>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vip_plans
             WHERE is_active = true
             ORDER BY sort_order ASC, id ASC"
        );
        sqlx::query_as::<_, VipPlan>(&query).fetch_all(pool).await
    }
}
