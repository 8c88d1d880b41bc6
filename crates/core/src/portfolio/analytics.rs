use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::CarouselItem;

/// Engagement numbers for one carousel item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAnalytics {
    pub item_id: Uuid,
    pub title: String,
    pub views: u32,
    pub clicks: u32,
    /// Percentage with two decimals; `"0.00"` when there are no views.
    pub click_through_rate: String,
}

/// Aggregate carousel engagement report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselAnalytics {
    pub items: Vec<ItemAnalytics>,
    pub total_views: u64,
    pub total_clicks: u64,
    pub overall_click_through_rate: String,
}

/// Derives per-item and aggregate click-through rates from carousel items.
///
/// Division by zero is defined, not an error: zero views reports `"0.00"`.
pub fn compute_analytics(items: &[CarouselItem]) -> CarouselAnalytics {
    let mut total_views = 0u64;
    let mut total_clicks = 0u64;
    let per_item = items
        .iter()
        .map(|item| {
            total_views += u64::from(item.view_count);
            total_clicks += u64::from(item.click_count);
            ItemAnalytics {
                item_id: item.item_id,
                title: item.title.clone(),
                views: item.view_count,
                clicks: item.click_count,
                click_through_rate: click_through_rate(
                    u64::from(item.click_count),
                    u64::from(item.view_count),
                ),
            }
        })
        .collect();
    CarouselAnalytics {
        items: per_item,
        total_views,
        total_clicks,
        overall_click_through_rate: click_through_rate(total_clicks, total_views),
    }
}

fn click_through_rate(clicks: u64, views: u64) -> String {
    if views == 0 {
        return "0.00".to_string();
    }
    format!("{:.2}", clicks as f64 / views as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::requests::CreateCarouselItem;
    use chrono::Utc;

    fn item(views: u32, clicks: u32) -> CarouselItem {
        let mut item =
            CreateCarouselItem::new("Slide", "/img/slide.jpg").into_item(Uuid::new_v4(), 1, Utc::now());
        item.view_count = views;
        item.click_count = clicks;
        item
    }

    #[test]
    fn zero_views_reports_zero_rate() {
        let report = compute_analytics(&[item(0, 0)]);
        assert_eq!(report.items[0].click_through_rate, "0.00");
        assert_eq!(report.overall_click_through_rate, "0.00");
    }

    #[test]
    fn computes_percentages_with_two_decimals() {
        let report = compute_analytics(&[item(200, 37)]);
        assert_eq!(report.items[0].click_through_rate, "18.50");
    }

    #[test]
    fn aggregates_across_items() {
        let report = compute_analytics(&[item(100, 10), item(100, 30)]);
        assert_eq!(report.total_views, 200);
        assert_eq!(report.total_clicks, 40);
        assert_eq!(report.overall_click_through_rate, "20.00");
    }

    #[test]
    fn empty_carousel_reports_empty_items_and_zero_rate() {
        let report = compute_analytics(&[]);
        assert!(report.items.is_empty());
        assert_eq!(report.total_views, 0);
        assert_eq!(report.overall_click_through_rate, "0.00");
    }

    #[test]
    fn clicks_without_views_still_divide_by_views() {
        // Tracking glitches can record clicks with no view; the rate is then
        // defined by the zero guard, not by the click count.
        let report = compute_analytics(&[item(0, 5)]);
        assert_eq!(report.items[0].click_through_rate, "0.00");
        assert_eq!(report.total_clicks, 5);
    }
}
