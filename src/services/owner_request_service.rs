// src/services/owner_request_service.rs
// DOCUMENTATION: Applications to become a campsite owner

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::db::OwnerRequestRepository;
use crate::errors::CampingError;
use crate::middleware::AuthUser;
use crate::models::{
    ApprovalStatus, CreateOwnerRequest, OwnerRequest, OwnerRequestWithUser, PageQuery,
    RejectRequest,
};
use crate::validation::normalize_phone;

pub struct OwnerRequestService;

impl OwnerRequestService {
    pub async fn create(
        pool: &PgPool,
        user: &AuthUser,
        req: CreateOwnerRequest,
    ) -> Result<OwnerRequest, CampingError> {
        req.validate()?;

        if user.role.can_manage_listings() {
            return Err(CampingError::InvalidInput(
                "Account can already manage listings".to_string(),
            ));
        }

        let phone = normalize_phone(&req.phone);
        OwnerRequestRepository::create(pool, user.user_id, &req, &phone)
            .await
            .map_err(|e| match e {
                CampingError::AlreadyExists(_) => {
                    CampingError::Conflict("An owner request is already pending".to_string())
                }
                other => other,
            })
    }

    pub async fn mine(pool: &PgPool, user: &AuthUser) -> Result<OwnerRequest, CampingError> {
        OwnerRequestRepository::latest_for_user(pool, user.user_id)
            .await?
            .ok_or_else(|| CampingError::NotFound("owner request".to_string()))
    }

    pub async fn list(
        pool: &PgPool,
        status: ApprovalStatus,
        page: &PageQuery,
    ) -> Result<Vec<OwnerRequestWithUser>, CampingError> {
        let (_, limit, offset) = page.resolve(20, 100);
        OwnerRequestRepository::list_by_status(pool, status, limit, offset).await
    }

    pub async fn approve(
        pool: &PgPool,
        admin: &AuthUser,
        id: Uuid,
    ) -> Result<OwnerRequest, CampingError> {
        admin.require_admin()?;
        OwnerRequestRepository::decide(pool, id, admin.user_id, ApprovalStatus::Approved, None).await
    }

    pub async fn reject(
        pool: &PgPool,
        admin: &AuthUser,
        id: Uuid,
        req: RejectRequest,
    ) -> Result<OwnerRequest, CampingError> {
        admin.require_admin()?;
        req.validate()?;
        let note = req.note.as_deref().map(str::trim).filter(|n| !n.is_empty());
        OwnerRequestRepository::decide(pool, id, admin.user_id, ApprovalStatus::Rejected, note).await
    }
}
