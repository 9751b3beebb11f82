//! Calendar/category seasonal multipliers for the aquarium catalog.
//!
//! A pure function of the current month and the product category, matched
//! by case-insensitive substring. Factors above 1.0 mean in-season demand;
//! below 1.0 means off-season.

use chrono::{Datelike, Utc};

/// June through August
fn is_summer(month: u32) -> bool {
    (6..=8).contains(&month)
}

/// December through February
fn is_winter(month: u32) -> bool {
    month == 12 || month <= 2
}

/// Seasonal factor for a category in the given month (1-12).
///
/// Tanks peak in summer, heaters in winter, filters and pumps follow tank
/// sales; food and decorations are flat year round. Unmatched categories
/// get 1.0.
pub fn seasonal_factor_for_month(category: &str, month: u32) -> f64 {
    let category = category.to_lowercase();
    let summer = is_summer(month);
    let winter = is_winter(month);

    if category.contains("aquarium") || category.contains("tank") {
        if summer {
            1.4
        } else if winter {
            0.8
        } else {
            1.0
        }
    } else if category.contains("heater") {
        if winter {
            1.4
        } else if summer {
            0.7
        } else {
            1.0
        }
    } else if category.contains("filter") || category.contains("pump") {
        if summer {
            1.2
        } else if winter {
            0.9
        } else {
            1.0
        }
    } else {
        // food, decor, and anything unmatched are season-neutral
        1.0
    }
}

/// Seasonal factor for the current month.
pub fn seasonal_factor(category: &str) -> f64 {
    seasonal_factor_for_month(category, Utc::now().month())
}
