//! Usage analytics derived from the item collection.
//!
//! Nothing here is stored; every figure is computed from the items and a
//! reference instant.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use uuid::Uuid;

use crate::{
  care::CareState,
  item::WardrobeItem,
  taxonomy::{Category, Color, Season},
};

/// Available items untouched for this long are suggested for donation.
pub const DONATION_AFTER_DAYS: i64 = 180;

/// Length of the most- and least-worn rankings.
pub const RANKING_LEN: usize = 5;

/// Per-item figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemAnalytics {
  pub item_id:              Uuid,
  /// Purchase price divided by wears (a never-worn item counts as one wear).
  /// Zero when the price is unknown.
  pub cost_per_wear:        f64,
  /// 0–100. Wearing an item once a week over the time it has been owned
  /// counts as full utilisation.
  pub utilisation:          f64,
  /// Days since the last wear, or since the item was added if never worn.
  pub days_since_last_worn: i64,
  /// 0–100: clean or in care 100, due soon 50, overdue 0.
  pub care_compliance:      f64,
}

/// Wardrobe-wide figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardrobeInsights {
  pub total_items:           usize,
  pub total_value:           f64,
  /// Mean cost per wear over items with a known price.
  pub avg_cost_per_wear:     f64,
  pub most_worn_items:       Vec<Uuid>,
  pub least_worn_items:      Vec<Uuid>,
  pub category_distribution: BTreeMap<Category, usize>,
  /// Each color of a multi-colored item is counted once.
  pub color_distribution:    BTreeMap<Color, usize>,
  pub seasonal_balance:      BTreeMap<Season, usize>,
  pub donation_candidates:   Vec<Uuid>,
}

pub fn item_analytics(item: &WardrobeItem, now: DateTime<Utc>) -> ItemAnalytics {
  let cost_per_wear = item
    .purchase_price
    .map(|price| price / f64::from(item.wear_count.max(1)))
    .unwrap_or(0.0);

  let weeks_owned = ((now - item.created_at).num_days() / 7).max(1);
  let utilisation =
    (f64::from(item.wear_count) * 100.0 / weeks_owned as f64).min(100.0);

  let last = item.last_worn_at.unwrap_or(item.created_at);
  let days_since_last_worn = (now - last).num_days().max(0);

  let care_compliance = match item.care_state {
    CareState::Clean | CareState::InCare => 100.0,
    CareState::DueSoon => 50.0,
    CareState::Overdue => 0.0,
  };

  ItemAnalytics {
    item_id: item.item_id,
    cost_per_wear,
    utilisation,
    days_since_last_worn,
    care_compliance,
  }
}

pub fn wardrobe_insights(items: &[WardrobeItem], now: DateTime<Utc>) -> WardrobeInsights {
  let total_value: f64 = items.iter().filter_map(|i| i.purchase_price).sum();

  let priced: Vec<f64> = items
    .iter()
    .filter(|i| i.purchase_price.is_some())
    .map(|i| item_analytics(i, now).cost_per_wear)
    .collect();
  let avg_cost_per_wear = if priced.is_empty() {
    0.0
  } else {
    priced.iter().sum::<f64>() / priced.len() as f64
  };

  let mut by_wear: Vec<&WardrobeItem> = items.iter().collect();
  by_wear.sort_by(|a, b| b.wear_count.cmp(&a.wear_count));
  let most_worn_items = top_ids(&by_wear);
  by_wear.sort_by(|a, b| a.wear_count.cmp(&b.wear_count));
  let least_worn_items = top_ids(&by_wear);

  let mut category_distribution: BTreeMap<Category, usize> =
    Category::iter().map(|c| (c, 0)).collect();
  let mut color_distribution: BTreeMap<Color, usize> =
    Color::iter().map(|c| (c, 0)).collect();
  let mut seasonal_balance: BTreeMap<Season, usize> =
    Season::iter().map(|s| (s, 0)).collect();
  for item in items {
    *category_distribution.entry(item.category).or_default() += 1;
    for color in &item.colors {
      *color_distribution.entry(*color).or_default() += 1;
    }
    for season in &item.seasons {
      *seasonal_balance.entry(*season).or_default() += 1;
    }
  }

  let cutoff = now - Duration::days(DONATION_AFTER_DAYS);
  let donation_candidates: Vec<Uuid> = items
    .iter()
    .filter(|i| i.is_available() && i.last_worn_at.unwrap_or(i.created_at) <= cutoff)
    .map(|i| i.item_id)
    .collect();

  WardrobeInsights {
    total_items: items.len(),
    total_value,
    avg_cost_per_wear,
    most_worn_items,
    least_worn_items,
    category_distribution,
    color_distribution,
    seasonal_balance,
    donation_candidates,
  }
}

fn top_ids(ranked: &[&WardrobeItem]) -> Vec<Uuid> {
  ranked.iter().take(RANKING_LEN).map(|i| i.item_id).collect()
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;
  use crate::{care::InventoryState, item::NewItem, taxonomy::Subcategory};

  fn at(days: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::days(days)
  }

  fn item(sub: Subcategory, colors: Vec<Color>, price: Option<f64>) -> WardrobeItem {
    let input = NewItem {
      purchase_price: price,
      ..NewItem::new("img", sub.category(), sub, colors)
    };
    WardrobeItem::create(input, at(0)).unwrap()
  }

  #[test]
  fn cost_per_wear_divides_by_wears() {
    let mut coat = item(Subcategory::Coat, vec![Color::Tan], Some(300.0));
    coat.wear_count = 10;
    let a = item_analytics(&coat, at(70));
    assert_eq!(a.cost_per_wear, 30.0);
    assert_eq!(a.utilisation, 100.0);
    assert_eq!(a.days_since_last_worn, 70);
  }

  #[test]
  fn unpriced_never_worn_item() {
    let mut tee = item(Subcategory::TShirt, vec![Color::Black], None);
    tee.care_state = CareState::Overdue;
    let a = item_analytics(&tee, at(14));
    assert_eq!(a.cost_per_wear, 0.0);
    assert_eq!(a.utilisation, 0.0);
    assert_eq!(a.care_compliance, 0.0);
  }

  #[test]
  fn insights_aggregate_the_collection() {
    let mut tee = item(Subcategory::TShirt, vec![Color::Black, Color::White], Some(20.0));
    tee.wear_count = 4;
    tee.last_worn_at = Some(at(190));
    let boots = item(Subcategory::Boots, vec![Color::Black], Some(200.0));
    let mut sold = item(Subcategory::Belt, vec![Color::Brown], None);
    sold.inventory_state = InventoryState::Sold;

    let items = vec![tee.clone(), boots.clone(), sold.clone()];
    let insights = wardrobe_insights(&items, at(200));

    assert_eq!(insights.total_items, 3);
    assert_eq!(insights.total_value, 220.0);
    assert_eq!(insights.avg_cost_per_wear, (5.0 + 200.0) / 2.0);
    assert_eq!(insights.most_worn_items[0], tee.item_id);
    assert_eq!(insights.least_worn_items[0], boots.item_id);
    assert_eq!(insights.category_distribution[&Category::Tops], 1);
    assert_eq!(insights.category_distribution[&Category::Suits], 0);
    assert_eq!(insights.color_distribution[&Color::Black], 2);
    assert_eq!(insights.seasonal_balance[&Season::AllSeason], 3);
    // Sold items are never donation candidates; the tee was worn recently.
    assert_eq!(insights.donation_candidates, vec![boots.item_id]);
  }
}
