// src/models/dashboard.rs
// DOCUMENTATION: Pre-aggregated owner dashboard payloads

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

/// GET /api/dashboard/stats
#[derive(Debug, Clone, Default, Serialize, FromRow)]
pub struct DashboardStats {
    pub total_campsites: i64,
    pub approved_campsites: i64,
    pub pending_campsites: i64,
    pub rejected_campsites: i64,
    pub total_views: i64,
    pub views_last_30_days: i64,
    pub wishlist_saves: i64,
    pub review_count: i64,
    /// Review-weighted average over all listings
    pub average_rating: f64,
    pub new_inquiries: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct DailyViews {
    pub day: NaiveDate,
    pub views: i64,
}

/// GET /api/dashboard/analytics
#[derive(Debug, Serialize)]
pub struct ViewsAnalytics {
    pub days: i64,
    pub total_views: i64,
    pub series: Vec<DailyViews>,
}

/// Expand sparse (day, views) rows into one entry per day in `[start, end]`
pub fn zero_fill(rows: &[DailyViews], start: NaiveDate, end: NaiveDate) -> Vec<DailyViews> {
    let mut series = Vec::new();
    let mut day = start;
    let mut idx = 0;

    while day <= end {
        while idx < rows.len() && rows[idx].day < day {
            idx += 1;
        }
        let views = if idx < rows.len() && rows[idx].day == day {
            rows[idx].views
        } else {
            0
        };
        series.push(DailyViews { day, views });

        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }

    series
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn test_zero_fill() {
        let rows = vec![
            DailyViews { day: date(2), views: 5 },
            DailyViews { day: date(4), views: 7 },
        ];
        let series = zero_fill(&rows, date(1), date(5));

        let views: Vec<i64> = series.iter().map(|d| d.views).collect();
        assert_eq!(views, vec![0, 5, 0, 7, 0]);
        assert_eq!(series.first().unwrap().day, date(1));
        assert_eq!(series.last().unwrap().day, date(5));
    }

    #[test]
    fn test_zero_fill_ignores_rows_outside_range() {
        let rows = vec![DailyViews { day: date(1), views: 9 }];
        let series = zero_fill(&rows, date(2), date(3));
        assert_eq!(series.iter().map(|d| d.views).sum::<i64>(), 0);
    }
}
