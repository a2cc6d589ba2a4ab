//! Terminal output: plain lines or pretty JSON.

use anyhow::Context as _;
use serde::Serialize;
use threadiq_core::{
  action::{Change, Outcome},
  insights::{ItemAnalytics, WardrobeInsights},
  item::WardrobeItem,
  outfit::Outfit,
  state::WardrobeState,
  view::ViewMode,
};
use uuid::Uuid;

/// Items per row in grid mode.
const GRID_COLUMNS: usize = 3;

pub struct Printer {
  json: bool,
}

impl Printer {
  pub fn new(json: bool) -> Self { Self { json } }

  fn emit<T: Serialize + ?Sized>(&self, value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("serialising output")?;
    println!("{text}");
    Ok(())
  }

  // ── Items ─────────────────────────────────────────────────────────────────

  pub fn item(&self, state: &WardrobeState, id: Uuid) -> anyhow::Result<()> {
    let item = state.item(id).with_context(|| format!("item not found: {id}"))?;
    if self.json {
      return self.emit(item);
    }
    println!("{}", item_line(item));
    Ok(())
  }

  pub fn items(&self, mode: ViewMode, items: &[&WardrobeItem]) -> anyhow::Result<()> {
    if self.json {
      return self.emit(items);
    }
    if items.is_empty() {
      println!("no items");
      return Ok(());
    }
    match mode {
      ViewMode::List => {
        for item in items {
          println!("{}", item_line(item));
        }
      }
      ViewMode::Grid => {
        for row in items.chunks(GRID_COLUMNS) {
          let cells: Vec<String> = row
            .iter()
            .map(|i| {
              format!("{:<8} {:<14} {:<8}", short(i.item_id), i.subcategory, i.care_state)
            })
            .collect();
          println!("{}", cells.join("  "));
        }
      }
    }
    Ok(())
  }

  pub fn item_detail(
    &self,
    item: &WardrobeItem,
    analytics: &ItemAnalytics,
  ) -> anyhow::Result<()> {
    if self.json {
      return self.emit(&serde_json::json!({ "item": item, "analytics": analytics }));
    }
    println!("{}", item_line(item));
    println!("  image:        {}", item.image_uri);
    println!("  pattern:      {} / {}", item.pattern, item.material);
    println!("  seasons:      {}", join(&item.seasons));
    println!("  formality:    {}", item.formality.get());
    println!(
      "  care:         {} every {} wears{}",
      item.care_profile.care_type,
      item.care_profile.wears_before_care,
      item
        .care_profile
        .last_cared_at
        .map(|at| format!(", last {}", at.format("%Y-%m-%d")))
        .unwrap_or_default()
    );
    if let Some(at) = item.last_worn_at {
      println!("  last worn:    {}", at.format("%Y-%m-%d %H:%M"));
    }
    if !item.tags.is_empty() {
      println!("  tags:         {}", item.tags.join(", "));
    }
    if let Some(notes) = &item.notes {
      println!("  notes:        {notes}");
    }
    println!("  cost/wear:    {:.2}", analytics.cost_per_wear);
    println!("  utilisation:  {:.0}%", analytics.utilisation);
    println!("  idle:         {} days", analytics.days_since_last_worn);
    Ok(())
  }

  // ── Outfits ───────────────────────────────────────────────────────────────

  pub fn outfit(&self, state: &WardrobeState, id: Uuid) -> anyhow::Result<()> {
    let outfit = state
      .outfit(id)
      .with_context(|| format!("outfit not found: {id}"))?;
    let members = state.outfit_items(id).unwrap_or_default();
    if self.json {
      return self.emit(&serde_json::json!({ "outfit": outfit, "items": members }));
    }
    println!("{}", outfit_line(outfit));
    for item in members {
      println!("  {}", item_line(item));
    }
    Ok(())
  }

  pub fn outfits(&self, outfits: &[Outfit]) -> anyhow::Result<()> {
    if self.json {
      return self.emit(outfits);
    }
    if outfits.is_empty() {
      println!("no outfits");
    }
    for outfit in outfits {
      println!("{}", outfit_line(outfit));
    }
    Ok(())
  }

  // ── Other ─────────────────────────────────────────────────────────────────

  pub fn outcome(&self, outcome: &Outcome) -> anyhow::Result<()> {
    if self.json {
      return self.emit(outcome);
    }
    if outcome.is_noop() {
      println!("nothing changed");
    }
    for change in &outcome.changes {
      let (verb, kind, id) = match *change {
        Change::ItemInserted(id) => ("added", "item", id),
        Change::ItemUpdated(id) => ("updated", "item", id),
        Change::ItemRemoved(id) => ("deleted", "item", id),
        Change::OutfitInserted(id) => ("saved", "outfit", id),
        Change::OutfitUpdated(id) => ("updated", "outfit", id),
        Change::OutfitRemoved(id) => ("deleted", "outfit", id),
      };
      println!("{verb} {kind} {id}");
    }
    Ok(())
  }

  pub fn insights(&self, insights: &WardrobeInsights) -> anyhow::Result<()> {
    if self.json {
      return self.emit(insights);
    }
    println!("items:             {}", insights.total_items);
    println!("total value:       {:.2}", insights.total_value);
    println!("avg cost per wear: {:.2}", insights.avg_cost_per_wear);
    println!("most worn:         {}", short_ids(&insights.most_worn_items));
    println!("least worn:        {}", short_ids(&insights.least_worn_items));
    println!("donation picks:    {}", short_ids(&insights.donation_candidates));
    println!("by category:");
    for (category, n) in &insights.category_distribution {
      println!("  {category:<12} {n}");
    }
    println!("by color:");
    for (color, n) in &insights.color_distribution {
      println!("  {color:<12} {n}");
    }
    println!("by season:");
    for (season, n) in &insights.seasonal_balance {
      println!("  {season:<12} {n}");
    }
    Ok(())
  }
}

// ─── Formatting helpers ──────────────────────────────────────────────────────

fn item_line(item: &WardrobeItem) -> String {
  format!(
    "{}  {}/{}  {}  {}  wears {}  {}  {}{}",
    item.item_id,
    item.category,
    item.subcategory,
    join(&item.colors),
    item.brand.as_deref().unwrap_or("—"),
    item.wear_count,
    item.care_state,
    item.inventory_state,
    if item.is_favorite { "  ★" } else { "" },
  )
}

fn outfit_line(outfit: &Outfit) -> String {
  format!(
    "{}  {}  {}  {} items  worn {}  {}{}",
    outfit.outfit_id,
    outfit.name.as_deref().unwrap_or("(unnamed)"),
    outfit.occasion,
    outfit.item_ids.len(),
    outfit.worn_count,
    outfit.state,
    if outfit.is_favorite { "  ★" } else { "" },
  )
}

fn join<T: std::fmt::Display>(values: &[T]) -> String {
  values
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join(",")
}

/// First eight hex digits of an id.
fn short(id: Uuid) -> String { id.simple().to_string()[..8].to_owned() }

fn short_ids(ids: &[Uuid]) -> String {
  if ids.is_empty() {
    return "—".to_owned();
  }
  ids.iter().map(|id| short(*id)).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn short_ids_take_the_first_eight_hex_digits() {
    let id = Uuid::parse_str("6f1c2a3b-0000-4000-8000-000000000000").unwrap();
    assert_eq!(short(id), "6f1c2a3b");
    assert_eq!(short_ids(&[]), "—");
  }

  #[test]
  fn join_uses_display_names() {
    use threadiq_core::taxonomy::Color;
    assert_eq!(join(&[Color::Black, Color::LightBlue]), "black,light-blue");
  }
}
