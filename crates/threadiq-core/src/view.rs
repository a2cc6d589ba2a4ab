//! Filter and sort engine: derives the visible, ordered item list.
//!
//! Filtering is disjunctive within a facet and conjunctive across facets; an
//! empty facet places no restriction. Sorting is stable, so items that tie on
//! the sort key keep their collection order.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{
  care::{CareState, InventoryState},
  item::WardrobeItem,
  taxonomy::{Category, Color, Season},
};

// ─── View settings ───────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ViewMode {
  #[default]
  Grid,
  List,
}

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SortBy {
  /// Newest first.
  #[default]
  Recent,
  /// Brand, A–Z; items without a brand first.
  Name,
  /// Most worn first.
  WearCount,
  /// Most recently worn first; never-worn items last.
  LastWorn,
  /// Category name, A–Z.
  Category,
}

// ─── Filters ─────────────────────────────────────────────────────────────────

/// The five independent filter facets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActiveFilters {
  pub categories:       Vec<Category>,
  pub colors:           Vec<Color>,
  pub seasons:          Vec<Season>,
  pub inventory_states: Vec<InventoryState>,
  pub care_states:      Vec<CareState>,
}

impl ActiveFilters {
  pub fn is_empty(&self) -> bool {
    self.categories.is_empty()
      && self.colors.is_empty()
      && self.seasons.is_empty()
      && self.inventory_states.is_empty()
      && self.care_states.is_empty()
  }

  /// Whether `item` passes every facet.
  pub fn matches(&self, item: &WardrobeItem) -> bool {
    facet(&self.categories, |c| item.category == *c)
      && facet(&self.colors, |c| item.colors.contains(c))
      && facet(&self.seasons, |s| item.seasons.contains(s))
      && facet(&self.inventory_states, |s| item.inventory_state == *s)
      && facet(&self.care_states, |s| item.care_state == *s)
  }

  /// Replace every facet present in `patch`; leave the others alone.
  pub fn apply(&mut self, patch: FilterPatch) {
    if let Some(v) = patch.categories {
      self.categories = v;
    }
    if let Some(v) = patch.colors {
      self.colors = v;
    }
    if let Some(v) = patch.seasons {
      self.seasons = v;
    }
    if let Some(v) = patch.inventory_states {
      self.inventory_states = v;
    }
    if let Some(v) = patch.care_states {
      self.care_states = v;
    }
  }

  pub fn clear(&mut self) { *self = Self::default(); }

  pub fn toggle_category(&mut self, category: Category) {
    toggle(&mut self.categories, category);
  }

  pub fn toggle_color(&mut self, color: Color) { toggle(&mut self.colors, color); }

  pub fn toggle_season(&mut self, season: Season) {
    toggle(&mut self.seasons, season);
  }

  pub fn toggle_inventory_state(&mut self, state: InventoryState) {
    toggle(&mut self.inventory_states, state);
  }

  pub fn toggle_care_state(&mut self, state: CareState) {
    toggle(&mut self.care_states, state);
  }
}

/// A partial replacement of [`ActiveFilters`]; `None` keeps a facet as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterPatch {
  pub categories:       Option<Vec<Category>>,
  pub colors:           Option<Vec<Color>>,
  pub seasons:          Option<Vec<Season>>,
  pub inventory_states: Option<Vec<InventoryState>>,
  pub care_states:      Option<Vec<CareState>>,
}

fn facet<T>(selected: &[T], pred: impl FnMut(&T) -> bool) -> bool {
  selected.is_empty() || selected.iter().any(pred)
}

fn toggle<T: PartialEq>(values: &mut Vec<T>, value: T) {
  if let Some(pos) = values.iter().position(|v| *v == value) {
    values.remove(pos);
  } else {
    values.push(value);
  }
}

// ─── Derivation ──────────────────────────────────────────────────────────────

/// Filter `items` and order the survivors by `sort_by`. The input is never
/// reordered; a fresh vector of references is returned on every call.
pub fn derive_view<'a>(
  items: &'a [WardrobeItem],
  filters: &ActiveFilters,
  sort_by: SortBy,
) -> Vec<&'a WardrobeItem> {
  let mut view: Vec<&WardrobeItem> =
    items.iter().filter(|item| filters.matches(item)).collect();
  // `sort_by` is stable: ties keep collection order.
  view.sort_by(|a, b| compare(a, b, sort_by));
  view
}

/// Total order used by [`derive_view`] for a given key.
pub fn compare(a: &WardrobeItem, b: &WardrobeItem, sort_by: SortBy) -> Ordering {
  match sort_by {
    SortBy::Recent => b.created_at.cmp(&a.created_at),
    SortBy::Name => {
      let a = a.brand.as_deref().unwrap_or("");
      let b = b.brand.as_deref().unwrap_or("");
      collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
    }
    SortBy::WearCount => b.wear_count.cmp(&a.wear_count),
    SortBy::LastWorn => match (a.last_worn_at, b.last_worn_at) {
      (Some(a), Some(b)) => b.cmp(&a),
      (Some(_), None) => Ordering::Less,
      (None, Some(_)) => Ordering::Greater,
      (None, None) => Ordering::Equal,
    },
    SortBy::Category => a.category.as_ref().cmp(b.category.as_ref()),
  }
}

/// Primary sort key for text: accents stripped, case folded. "Émile" sorts
/// with "emile", ahead of "Zara".
fn collation_key(s: &str) -> String {
  s.nfd()
    .filter(|c| !is_combining_mark(*c))
    .flat_map(char::to_lowercase)
    .collect()
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone, Utc};

  use super::*;
  use crate::{item::NewItem, taxonomy::Subcategory};

  fn item(sub: Subcategory, color: Color, minutes: i64) -> WardrobeItem {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
      + Duration::minutes(minutes);
    let input = NewItem::new("img", sub.category(), sub, vec![color]);
    WardrobeItem::create(input, at).unwrap()
  }

  fn ids(view: &[&WardrobeItem]) -> Vec<uuid::Uuid> {
    view.iter().map(|i| i.item_id).collect()
  }

  #[test]
  fn category_filter_keeps_only_matches() {
    let items = vec![
      item(Subcategory::TShirt, Color::Black, 0),
      item(Subcategory::Boots, Color::Brown, 1),
    ];
    let mut filters = ActiveFilters::default();
    filters.toggle_category(Category::Tops);

    let view = derive_view(&items, &filters, SortBy::Recent);
    assert_eq!(ids(&view), vec![items[0].item_id]);

    filters.clear();
    let view = derive_view(&items, &filters, SortBy::Recent);
    assert_eq!(ids(&view), vec![items[1].item_id, items[0].item_id]);
  }

  #[test]
  fn facets_are_or_within_and_across() {
    let items = vec![
      item(Subcategory::TShirt, Color::Black, 0),
      item(Subcategory::Shirt, Color::White, 1),
      item(Subcategory::Boots, Color::Black, 2),
    ];
    let filters = ActiveFilters {
      categories: vec![Category::Tops],
      colors: vec![Color::Black, Color::Navy],
      ..ActiveFilters::default()
    };
    let view = derive_view(&items, &filters, SortBy::Recent);
    assert_eq!(ids(&view), vec![items[0].item_id]);
  }

  #[test]
  fn toggling_twice_removes_the_value() {
    let mut filters = ActiveFilters::default();
    filters.toggle_color(Color::Red);
    assert_eq!(filters.colors, vec![Color::Red]);
    filters.toggle_color(Color::Red);
    assert!(filters.is_empty());
  }

  #[test]
  fn patch_only_touches_given_facets() {
    let mut filters = ActiveFilters {
      colors: vec![Color::Red],
      ..ActiveFilters::default()
    };
    filters.apply(FilterPatch {
      seasons: Some(vec![Season::Winter]),
      ..FilterPatch::default()
    });
    assert_eq!(filters.colors, vec![Color::Red]);
    assert_eq!(filters.seasons, vec![Season::Winter]);
  }

  #[test]
  fn name_sort_puts_unbranded_first() {
    let mut items = vec![
      item(Subcategory::TShirt, Color::Black, 0),
      item(Subcategory::TShirt, Color::Black, 1),
      item(Subcategory::TShirt, Color::Black, 2),
    ];
    items[0].brand = Some("zara".into());
    items[1].brand = Some("Acne".into());
    let view = derive_view(&items, &ActiveFilters::default(), SortBy::Name);
    assert_eq!(
      ids(&view),
      vec![items[2].item_id, items[1].item_id, items[0].item_id]
    );
  }

  #[test]
  fn name_sort_ignores_accents() {
    let mut items = vec![
      item(Subcategory::TShirt, Color::Black, 0),
      item(Subcategory::TShirt, Color::Black, 1),
      item(Subcategory::TShirt, Color::Black, 2),
    ];
    items[0].brand = Some("Zara".into());
    items[1].brand = Some("Émile".into());
    items[2].brand = Some("emile".into());
    let view = derive_view(&items, &ActiveFilters::default(), SortBy::Name);
    assert_eq!(
      ids(&view),
      vec![items[2].item_id, items[1].item_id, items[0].item_id]
    );
  }

  #[test]
  fn last_worn_sort_puts_never_worn_last() {
    let mut items = vec![
      item(Subcategory::TShirt, Color::Black, 0),
      item(Subcategory::TShirt, Color::Black, 1),
      item(Subcategory::TShirt, Color::Black, 2),
    ];
    let base = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
    items[1].last_worn_at = Some(base);
    items[2].last_worn_at = Some(base + Duration::days(1));
    let view = derive_view(&items, &ActiveFilters::default(), SortBy::LastWorn);
    assert_eq!(
      ids(&view),
      vec![items[2].item_id, items[1].item_id, items[0].item_id]
    );
  }

  #[test]
  fn wear_count_sort_is_stable() {
    let mut items = vec![
      item(Subcategory::TShirt, Color::Black, 0),
      item(Subcategory::TShirt, Color::Black, 1),
      item(Subcategory::TShirt, Color::Black, 2),
    ];
    items[1].wear_count = 4;
    let view = derive_view(&items, &ActiveFilters::default(), SortBy::WearCount);
    assert_eq!(
      ids(&view),
      vec![items[1].item_id, items[0].item_id, items[2].item_id]
    );
  }

  #[test]
  fn category_sort_is_lexical() {
    let items = vec![
      item(Subcategory::Boots, Color::Black, 0),
      item(Subcategory::Belt, Color::Black, 1),
      item(Subcategory::Jeans, Color::Black, 2),
    ];
    let view = derive_view(&items, &ActiveFilters::default(), SortBy::Category);
    let categories: Vec<_> = view.iter().map(|i| i.category).collect();
    assert_eq!(
      categories,
      vec![Category::Accessories, Category::Bottoms, Category::Shoes]
    );
  }
}
