//! Subcommands and their translation into dispatched [`Action`]s.

use anyhow::{Context as _, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Subcommand};
use threadiq_core::{
  action::Action,
  care::{CareState, CareType, InventoryState},
  dispatch::Dispatcher,
  insights::item_analytics,
  item::{ItemUpdate, NewItem},
  outfit::Outfit,
  store::WardrobeStore,
  taxonomy::{
    Category, Color, Condition, Fit, Material, Occasion, Pattern, Season, Subcategory,
  },
  view::{FilterPatch, SortBy},
};
use uuid::Uuid;

use crate::{render::Printer, settings::Settings};

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Add a new item.
  Add(AddArgs),

  /// List items, optionally filtered and sorted.
  List(ListArgs),

  /// Show one item with its analytics.
  Show { id: Uuid },

  /// Change fields of an item.
  Update {
    id: Uuid,
    #[command(flatten)]
    fields: UpdateArgs,
  },

  /// Log a wear.
  Wear {
    id:     Uuid,
    /// Also count the wear against this outfit.
    #[arg(long)]
    outfit: Option<Uuid>,
    /// When it was worn (RFC 3339); defaults to now.
    #[arg(long)]
    date:   Option<DateTime<Utc>>,
  },

  /// Move an item to another inventory state (available, in-laundry, …).
  State { id: Uuid, state: InventoryState },

  /// Mark an item as freshly cared for.
  Cared { id: Uuid },

  /// Toggle an item's favorite flag.
  Favorite { id: Uuid },

  /// Delete an item and drop it from every outfit.
  Delete { id: Uuid },

  /// List items that are due soon or overdue for care.
  Alerts,

  /// Wardrobe-wide statistics.
  Insights,

  /// Manage outfits.
  #[command(subcommand)]
  Outfit(OutfitCommand),

  /// Dispatch a raw JSON action, e.g. `{"type":"toggle_favorite","data":"…"}`.
  Dispatch { action: String },
}

#[derive(Subcommand, Debug)]
pub enum OutfitCommand {
  /// Save a new outfit from existing items.
  Save {
    /// Item ids, in order.
    #[arg(long = "item", required = true)]
    items:    Vec<Uuid>,
    #[arg(long)]
    occasion: Occasion,
    #[arg(long)]
    name:     Option<String>,
    #[arg(long = "season")]
    seasons:  Vec<Season>,
    #[arg(long)]
    notes:    Option<String>,
  },
  List,
  Show { id: Uuid },
  Favorite { id: Uuid },
  Delete { id: Uuid },
}

#[derive(Args, Debug)]
pub struct AddArgs {
  #[arg(long)]
  image:          String,
  #[arg(long)]
  category:       Category,
  #[arg(long)]
  subcategory:    Subcategory,
  #[arg(long = "color", required = true)]
  colors:         Vec<Color>,
  #[arg(long)]
  pattern:        Option<Pattern>,
  #[arg(long)]
  material:       Option<Material>,
  #[arg(long = "season")]
  seasons:        Vec<Season>,
  #[arg(long)]
  formality:      Option<u8>,
  #[arg(long)]
  brand:          Option<String>,
  #[arg(long)]
  size:           Option<String>,
  #[arg(long)]
  fit:            Option<Fit>,
  #[arg(long)]
  purchase_date:  Option<NaiveDate>,
  #[arg(long)]
  price:          Option<f64>,
  #[arg(long)]
  purchased_at:   Option<String>,
  #[arg(long)]
  care:           Option<CareType>,
  #[arg(long)]
  notes:          Option<String>,
  #[arg(long = "tag")]
  tags:           Vec<String>,
}

impl From<AddArgs> for NewItem {
  fn from(a: AddArgs) -> Self {
    Self {
      pattern: a.pattern,
      material: a.material,
      seasons: (!a.seasons.is_empty()).then_some(a.seasons),
      formality: a.formality,
      brand: a.brand,
      size: a.size,
      fit: a.fit,
      purchase_date: a.purchase_date,
      purchase_price: a.price,
      purchase_location: a.purchased_at,
      care_type: a.care,
      notes: a.notes,
      tags: a.tags,
      ..NewItem::new(a.image, a.category, a.subcategory, a.colors)
    }
  }
}

/// Flags for `update`. Pass an empty string to clear a text field.
#[derive(Args, Debug)]
pub struct UpdateArgs {
  #[arg(long)]
  category:          Option<Category>,
  #[arg(long)]
  subcategory:       Option<Subcategory>,
  /// Replaces the whole color list.
  #[arg(long = "color")]
  colors:            Vec<Color>,
  #[arg(long)]
  pattern:           Option<Pattern>,
  #[arg(long)]
  material:          Option<Material>,
  #[arg(long = "season")]
  seasons:           Vec<Season>,
  #[arg(long)]
  formality:         Option<u8>,
  #[arg(long)]
  brand:             Option<String>,
  #[arg(long)]
  size:              Option<String>,
  #[arg(long)]
  fit:               Option<Fit>,
  #[arg(long)]
  condition:         Option<Condition>,
  #[arg(long)]
  image:             Option<String>,
  #[arg(long)]
  care:              Option<CareType>,
  #[arg(long)]
  wears_before_care: Option<u32>,
  #[arg(long)]
  price:             Option<f64>,
  #[arg(long)]
  notes:             Option<String>,
  /// Replaces the whole tag list.
  #[arg(long = "tag")]
  tags:              Vec<String>,
}

impl From<UpdateArgs> for ItemUpdate {
  fn from(a: UpdateArgs) -> Self {
    fn non_empty<T>(v: Vec<T>) -> Option<Vec<T>> { (!v.is_empty()).then_some(v) }

    Self {
      category: a.category,
      subcategory: a.subcategory,
      colors: non_empty(a.colors),
      pattern: a.pattern,
      material: a.material,
      seasons: non_empty(a.seasons),
      formality: a.formality,
      brand: a.brand,
      size: a.size,
      fit: a.fit,
      condition: a.condition,
      image_uri: a.image,
      care_type: a.care,
      wears_before_care: a.wears_before_care,
      purchase_price: a.price,
      notes: a.notes,
      tags: non_empty(a.tags),
      ..ItemUpdate::default()
    }
  }
}

#[derive(Args, Debug)]
pub struct ListArgs {
  #[arg(long = "category")]
  categories:       Vec<Category>,
  #[arg(long = "color")]
  colors:           Vec<Color>,
  #[arg(long = "season")]
  seasons:          Vec<Season>,
  #[arg(long = "state")]
  inventory_states: Vec<InventoryState>,
  #[arg(long = "care")]
  care_states:      Vec<CareState>,
  /// Sort order; defaults to `sort_by` from the config.
  #[arg(long)]
  sort:             Option<SortBy>,
}

impl ListArgs {
  fn patch(self) -> FilterPatch {
    FilterPatch {
      categories:       Some(self.categories),
      colors:           Some(self.colors),
      seasons:          Some(self.seasons),
      inventory_states: Some(self.inventory_states),
      care_states:      Some(self.care_states),
    }
  }
}

// ─── Execution ───────────────────────────────────────────────────────────────

pub async fn run<S: WardrobeStore>(
  command: Command,
  dispatcher: &mut Dispatcher<S>,
  settings: &Settings,
  json: bool,
) -> anyhow::Result<()> {
  let out = Printer::new(json);
  dispatcher.dispatch(Action::SetViewMode(settings.view_mode)).await?;

  match command {
    Command::Add(args) => {
      let outcome = dispatcher.dispatch(Action::AddItem(args.into())).await?;
      let id = outcome
        .inserted_item()
        .context("add did not report a new item")?;
      out.item(dispatcher.state(), id)
    }
    Command::List(args) => {
      let sort_by = args.sort.unwrap_or(settings.sort_by);
      dispatcher.dispatch(Action::SetSortBy(sort_by)).await?;
      dispatcher.dispatch(Action::SetFilters(args.patch())).await?;
      out.items(dispatcher.state().view_mode(), &dispatcher.state().filtered_items())
    }
    Command::Show { id } => {
      let state = dispatcher.state();
      let Some(item) = state.item(id) else {
        bail!("item not found: {id}");
      };
      out.item_detail(item, &item_analytics(item, Utc::now()))
    }
    Command::Update { id, fields } => {
      let action = Action::UpdateItem { item_id: id, updates: fields.into() };
      dispatcher.dispatch(action).await?;
      out.item(dispatcher.state(), id)
    }
    Command::Wear { id, outfit, date } => {
      let action = Action::LogWear { item_id: id, outfit_id: outfit, date };
      dispatcher.dispatch(action).await?;
      out.item(dispatcher.state(), id)
    }
    Command::State { id, state } => {
      dispatcher
        .dispatch(Action::SetInventoryState { item_id: id, state })
        .await?;
      out.item(dispatcher.state(), id)
    }
    Command::Cared { id } => {
      dispatcher.dispatch(Action::MarkCareComplete(id)).await?;
      out.item(dispatcher.state(), id)
    }
    Command::Favorite { id } => {
      dispatcher.dispatch(Action::ToggleFavorite(id)).await?;
      out.item(dispatcher.state(), id)
    }
    Command::Delete { id } => {
      let outcome = dispatcher.dispatch(Action::DeleteItem(id)).await?;
      out.outcome(&outcome)
    }
    Command::Alerts => {
      let state = dispatcher.state();
      out.items(state.view_mode(), &state.care_alerts())
    }
    Command::Insights => out.insights(&dispatcher.state().insights(Utc::now())),
    Command::Outfit(cmd) => run_outfit(cmd, dispatcher, &out).await,
    Command::Dispatch { action } => {
      let action = Action::from_json(&action).context("invalid action JSON")?;
      let name = action.name();
      let outcome = dispatcher.dispatch(action).await?;
      tracing::debug!(
        action = name,
        changes = outcome.changes.len(),
        "raw action applied"
      );
      out.outcome(&outcome)
    }
  }
}

async fn run_outfit<S: WardrobeStore>(
  command: OutfitCommand,
  dispatcher: &mut Dispatcher<S>,
  out: &Printer,
) -> anyhow::Result<()> {
  match command {
    OutfitCommand::Save { items, occasion, name, seasons, notes } => {
      let mut outfit = Outfit::new(items, occasion);
      if let Some(name) = name {
        outfit = outfit.with_name(name);
      }
      if !seasons.is_empty() {
        outfit.seasons = seasons;
      }
      outfit.notes = notes;
      let id = outfit.outfit_id;
      dispatcher.dispatch(Action::SaveOutfit(outfit)).await?;
      out.outfit(dispatcher.state(), id)
    }
    OutfitCommand::List => out.outfits(dispatcher.state().outfits()),
    OutfitCommand::Show { id } => out.outfit(dispatcher.state(), id),
    OutfitCommand::Favorite { id } => {
      dispatcher.dispatch(Action::ToggleOutfitFavorite(id)).await?;
      out.outfit(dispatcher.state(), id)
    }
    OutfitCommand::Delete { id } => {
      let outcome = dispatcher.dispatch(Action::DeleteOutfit(id)).await?;
      out.outcome(&outcome)
    }
  }
}
