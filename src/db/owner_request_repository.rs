// src/db/owner_request_repository.rs
// DOCUMENTATION: Applications to become a campsite owner

use crate::errors::CampingError;
use crate::models::{ApprovalStatus, CreateOwnerRequest, OwnerRequest, OwnerRequestWithUser};
use sqlx::PgPool;
use uuid::Uuid;

pub struct OwnerRequestRepository;

impl OwnerRequestRepository {
    /// File an application; a user may only have one pending at a time
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        req: &CreateOwnerRequest,
        phone: &str,
    ) -> Result<OwnerRequest, CampingError> {
        let request = sqlx::query_as::<_, OwnerRequest>(
            r#"
            INSERT INTO owner_requests (user_id, business_name, phone, description)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&req.business_name)
        .bind(phone)
        .bind(&req.description)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            CampingError::from_unique(e, "owner_requests_one_pending_key", "pending owner request")
        })?;

        log::info!("Owner request {} filed by {}", request.id, user_id);
        Ok(request)
    }

    /// Latest application of a user
    pub async fn latest_for_user(
        pool: &PgPool,
        user_id: Uuid,
    ) -> Result<Option<OwnerRequest>, CampingError> {
        let request = sqlx::query_as::<_, OwnerRequest>(
            "SELECT * FROM owner_requests WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
        Ok(request)
    }

    pub async fn list_by_status(
        pool: &PgPool,
        status: ApprovalStatus,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OwnerRequestWithUser>, CampingError> {
        let requests = sqlx::query_as::<_, OwnerRequestWithUser>(
            r#"
            SELECT
                o.id, o.user_id, o.business_name, o.phone, o.description,
                o.status, o.review_note, o.created_at,
                p.email AS user_email, p.full_name AS user_full_name
            FROM owner_requests o
            JOIN profiles p ON p.id = o.user_id
            WHERE o.status = $1
            ORDER BY o.created_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list owner requests: {}", e);
            CampingError::DatabaseError(e.to_string())
        })?;

        Ok(requests)
    }

    /// Approve or reject a pending application
    /// DOCUMENTATION: Approval promotes the applicant to `owner` in the same
    /// transaction; admins keep their role.
    pub async fn decide(
        pool: &PgPool,
        id: Uuid,
        admin_id: Uuid,
        status: ApprovalStatus,
        note: Option<&str>,
    ) -> Result<OwnerRequest, CampingError> {
        let mut tx = pool.begin().await?;

        let current = sqlx::query_as::<_, OwnerRequest>(
            "SELECT * FROM owner_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CampingError::NotFound(format!("owner request {}", id)))?;

        if current.status != ApprovalStatus::Pending {
            return Err(CampingError::Conflict(
                "Owner request was already reviewed".to_string(),
            ));
        }

        let request = sqlx::query_as::<_, OwnerRequest>(
            r#"
            UPDATE owner_requests
            SET status = $1, review_note = $2, reviewed_by = $3, reviewed_at = NOW()
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(note)
        .bind(admin_id)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if status == ApprovalStatus::Approved {
            sqlx::query(
                "UPDATE profiles SET role = 'owner', updated_at = NOW() WHERE id = $1 AND role = 'user'",
            )
            .bind(request.user_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        log::info!("Owner request {} {:?} by {}", id, status, admin_id);
        Ok(request)
    }
}
