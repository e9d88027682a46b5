// src/db/inquiry_repository.rs
// DOCUMENTATION: Guest inquiries sent to campsite owners

use crate::errors::CampingError;
use crate::models::{CreateInquiryRequest, Inquiry, InquiryStatus, InquiryWithCampsite};
use sqlx::PgPool;
use uuid::Uuid;

pub struct InquiryRepository;

impl InquiryRepository {
    pub async fn create(
        pool: &PgPool,
        campsite_id: Uuid,
        user_id: Option<Uuid>,
        req: &CreateInquiryRequest,
        guest_phone: &str,
    ) -> Result<Inquiry, CampingError> {
        let inquiry = sqlx::query_as::<_, Inquiry>(
            r#"
            INSERT INTO inquiries (
                campsite_id, user_id, guest_name, guest_email, guest_phone,
                message, check_in, check_out, guests
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(campsite_id)
        .bind(user_id)
        .bind(&req.guest_name)
        .bind(&req.guest_email)
        .bind(guest_phone)
        .bind(&req.message)
        .bind(req.check_in)
        .bind(req.check_out)
        .bind(req.guests)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to create inquiry: {}", e);
            CampingError::DatabaseError(e.to_string())
        })?;

        log::info!("Inquiry {} sent to campsite {}", inquiry.id, campsite_id);
        Ok(inquiry)
    }

    /// Inquiries across all active listings of an owner, newest first
    pub async fn list_for_owner(
        pool: &PgPool,
        owner_id: Uuid,
        status: Option<InquiryStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<InquiryWithCampsite>, CampingError> {
        let inquiries = sqlx::query_as::<_, InquiryWithCampsite>(
            r#"
            SELECT
                i.id, i.campsite_id, c.name AS campsite_name,
                i.guest_name, i.guest_email, i.guest_phone, i.message,
                i.check_in, i.check_out, i.guests, i.status, i.created_at
            FROM inquiries i
            JOIN campsites c ON c.id = i.campsite_id
            WHERE c.owner_id = $1 AND c.is_active = true
              AND ($2::inquiry_status IS NULL OR i.status = $2)
            ORDER BY i.created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(owner_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to list inquiries for owner {}: {}", owner_id, e);
            CampingError::DatabaseError(e.to_string())
        })?;

        Ok(inquiries)
    }

    /// Change status of an inquiry the owner received; other owners see 404
    pub async fn update_status(
        pool: &PgPool,
        id: Uuid,
        owner_id: Uuid,
        status: InquiryStatus,
    ) -> Result<Inquiry, CampingError> {
        sqlx::query_as::<_, Inquiry>(
            r#"
            UPDATE inquiries i
            SET status = $1, updated_at = NOW()
            FROM campsites c
            WHERE i.id = $2 AND c.id = i.campsite_id AND c.owner_id = $3
            RETURNING i.*
            "#,
        )
        .bind(status)
        .bind(id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| CampingError::NotFound(format!("inquiry {}", id)))
    }
}
