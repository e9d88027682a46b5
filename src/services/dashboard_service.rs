// src/services/dashboard_service.rs
// DOCUMENTATION: Owner dashboard numbers and the inquiry inbox

use chrono::{Duration, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::{DashboardRepository, InquiryRepository};
use crate::errors::CampingError;
use crate::middleware::AuthUser;
use crate::models::{
    zero_fill, DashboardStats, Inquiry, InquiryStatus, InquiryWithCampsite, PageQuery,
    ViewsAnalytics,
};

pub const MIN_ANALYTICS_DAYS: i64 = 7;
pub const MAX_ANALYTICS_DAYS: i64 = 90;
pub const DEFAULT_ANALYTICS_DAYS: i64 = 30;

/// Inclusive window of `days` days ending today
pub fn analytics_window(days: Option<i64>, today: NaiveDate) -> Result<(i64, NaiveDate, NaiveDate), CampingError> {
    let days = days.unwrap_or(DEFAULT_ANALYTICS_DAYS);
    if !(MIN_ANALYTICS_DAYS..=MAX_ANALYTICS_DAYS).contains(&days) {
        return Err(CampingError::InvalidInput(format!(
            "days must be between {} and {}",
            MIN_ANALYTICS_DAYS, MAX_ANALYTICS_DAYS
        )));
    }
    Ok((days, today - Duration::days(days - 1), today))
}

pub struct DashboardService;

impl DashboardService {
    pub async fn stats(pool: &PgPool, user: &AuthUser) -> Result<DashboardStats, CampingError> {
        user.require_owner()?;
        DashboardRepository::stats(pool, user.user_id).await
    }

    /// Daily views across the owner's listings, one entry per day
    pub async fn analytics(
        pool: &PgPool,
        user: &AuthUser,
        days: Option<i64>,
    ) -> Result<ViewsAnalytics, CampingError> {
        user.require_owner()?;
        let (days, start, end) = analytics_window(days, Utc::now().date_naive())?;

        let rows = DashboardRepository::daily_views(pool, user.user_id, start, end).await?;
        let series = zero_fill(&rows, start, end);
        let total_views = series.iter().map(|d| d.views).sum();

        Ok(ViewsAnalytics {
            days,
            total_views,
            series,
        })
    }

    pub async fn inquiries(
        pool: &PgPool,
        user: &AuthUser,
        status: Option<InquiryStatus>,
        page: &PageQuery,
    ) -> Result<Vec<InquiryWithCampsite>, CampingError> {
        user.require_owner()?;
        let (_, limit, offset) = page.resolve(20, 100);
        InquiryRepository::list_for_owner(pool, user.user_id, status, limit, offset).await
    }

    pub async fn update_inquiry(
        pool: &PgPool,
        user: &AuthUser,
        inquiry_id: Uuid,
        status: InquiryStatus,
    ) -> Result<Inquiry, CampingError> {
        user.require_owner()?;
        InquiryRepository::update_status(pool, inquiry_id, user.user_id, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analytics_window() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();

        let (days, start, end) = analytics_window(None, today).unwrap();
        assert_eq!(days, 30);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        assert_eq!(end, today);

        let (_, start, _) = analytics_window(Some(7), today).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }

    #[test]
    fn test_analytics_window_bounds() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert!(analytics_window(Some(6), today).is_err());
        assert!(analytics_window(Some(91), today).is_err());
        assert!(analytics_window(Some(90), today).is_ok());
    }
}
