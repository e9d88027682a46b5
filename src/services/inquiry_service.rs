// src/services/inquiry_service.rs
// DOCUMENTATION: Guest inquiries to campsite owners

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::InquiryRepository;
use crate::errors::CampingError;
use crate::middleware::AuthUser;
use crate::models::{CreateInquiryRequest, Inquiry};
use crate::services::CampsiteService;
use crate::validation::normalize_phone;

pub struct InquiryService;

impl InquiryService {
    /// Guest inquiry to a public listing; signed-in guests are linked to it
    pub async fn create(
        pool: &PgPool,
        user: Option<AuthUser>,
        campsite_id: Uuid,
        req: CreateInquiryRequest,
    ) -> Result<Inquiry, CampingError> {
        req.validate()?;
        CampsiteService::load_public(pool, campsite_id).await?;

        let phone = normalize_phone(&req.guest_phone);
        InquiryRepository::create(pool, campsite_id, user.map(|u| u.user_id), &req, &phone).await
    }
}
