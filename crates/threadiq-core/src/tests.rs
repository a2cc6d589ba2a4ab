//! State-container and dispatcher tests.

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::{
  Error,
  action::{Action, Change},
  care::{CareState, InventoryState},
  dispatch::Dispatcher,
  item::{ItemUpdate, NewItem},
  memory::MemoryStore,
  outfit::{Outfit, OutfitState},
  state::WardrobeState,
  store::WardrobeStore,
  taxonomy::{Category, Color, Occasion, Season, Subcategory},
  view::{FilterPatch, SortBy},
};

fn t(minutes: i64) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 4, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes)
}

fn tee() -> NewItem {
  NewItem::new("x", Category::Tops, Subcategory::TShirt, vec![Color::Black])
}

fn boots() -> NewItem {
  NewItem::new("y", Category::Shoes, Subcategory::Boots, vec![Color::Brown])
}

fn add(state: &mut WardrobeState, input: NewItem, at: DateTime<Utc>) -> Uuid {
  state
    .apply(Action::AddItem(input), at)
    .unwrap()
    .inserted_item()
    .unwrap()
}

// ─── Items ───────────────────────────────────────────────────────────────────

#[test]
fn add_item_scenario() {
  let mut s = WardrobeState::new();
  let id = add(&mut s, tee(), t(0));
  let item = s.item(id).unwrap();
  assert_eq!(item.wear_count, 0);
  assert_eq!(item.care_state, CareState::Clean);
  assert_eq!(item.inventory_state, InventoryState::Available);
}

#[test]
fn add_item_inserts_at_front() {
  let mut s = WardrobeState::new();
  let first = add(&mut s, tee(), t(0));
  let second = add(&mut s, boots(), t(1));
  let ids: Vec<_> = s.items().iter().map(|i| i.item_id).collect();
  assert_eq!(ids, vec![second, first]);
}

#[test]
fn invalid_add_records_error_and_changes_nothing() {
  let mut s = WardrobeState::new();
  let err = s
    .apply(Action::AddItem(NewItem { colors: vec![], ..tee() }), t(0))
    .unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
  assert!(s.items().is_empty());
  assert!(s.last_error().is_some());

  s.apply(Action::ClearError, t(1)).unwrap();
  assert!(s.last_error().is_none());
}

#[test]
fn log_wear_increments_and_derives_care() {
  let mut s = WardrobeState::new();
  let id = add(&mut s, tee(), t(0));

  let expected = [
    (1, CareState::Clean),
    (2, CareState::DueSoon),
    (3, CareState::Overdue),
  ];
  for (n, expected) in expected {
    let before = s.item(id).unwrap().wear_count;
    s.apply(Action::LogWear { item_id: id, outfit_id: None, date: None }, t(n))
      .unwrap();
    let item = s.item(id).unwrap();
    assert_eq!(item.wear_count, before + 1);
    assert_eq!(item.care_state, expected);
    assert_eq!(item.last_worn_at, Some(t(n)));
  }
  assert_eq!(s.care_alerts().len(), 1);
}

#[test]
fn back_dated_wear_keeps_timestamps_ordered() {
  let mut s = WardrobeState::new();
  let id = add(&mut s, tee(), t(60));
  s.apply(
    Action::LogWear { item_id: id, outfit_id: None, date: Some(t(-600)) },
    t(-600),
  )
  .unwrap();
  let item = s.item(id).unwrap();
  assert_eq!(item.last_worn_at, Some(t(-600)));
  assert!(item.updated_at >= item.created_at);
}

#[test]
fn log_wear_on_missing_item_is_not_found() {
  let mut s = WardrobeState::new();
  let missing = Uuid::new_v4();
  let err = s
    .apply(Action::LogWear { item_id: missing, outfit_id: None, date: None }, t(0))
    .unwrap_err();
  assert!(matches!(err, Error::ItemNotFound(id) if id == missing));
}

#[test]
fn log_wear_with_outfit_marks_outfit_worn() {
  let mut s = WardrobeState::new();
  let a = add(&mut s, tee(), t(0));
  let b = add(&mut s, boots(), t(1));
  let outfit = Outfit::new(vec![a, b], Occasion::Casual);
  let outfit_id = outfit.outfit_id;
  s.apply(Action::SaveOutfit(outfit), t(2)).unwrap();

  let outcome = s
    .apply(
      Action::LogWear { item_id: a, outfit_id: Some(outfit_id), date: Some(t(3)) },
      t(4),
    )
    .unwrap();
  assert_eq!(
    outcome.changes,
    vec![Change::ItemUpdated(a), Change::OutfitUpdated(outfit_id)]
  );
  let outfit = s.outfit(outfit_id).unwrap();
  assert_eq!(outfit.worn_count, 1);
  assert_eq!(outfit.state, OutfitState::Worn);
  assert_eq!(outfit.last_worn_at, Some(t(3)));
}

#[test]
fn log_wear_with_unknown_outfit_still_counts_the_item() {
  let mut s = WardrobeState::new();
  let a = add(&mut s, tee(), t(0));
  let outcome = s
    .apply(
      Action::LogWear { item_id: a, outfit_id: Some(Uuid::new_v4()), date: None },
      t(1),
    )
    .unwrap();
  assert_eq!(outcome.changes, vec![Change::ItemUpdated(a)]);
  assert_eq!(s.item(a).unwrap().wear_count, 1);
}

#[test]
fn laundry_round_trip() {
  let mut s = WardrobeState::new();
  let id = add(&mut s, tee(), t(0));

  s.apply(
    Action::SetInventoryState { item_id: id, state: InventoryState::InLaundry },
    t(1),
  )
  .unwrap();
  assert_eq!(s.item(id).unwrap().care_state, CareState::InCare);
  assert!(s.available_items().is_empty());

  s.apply(
    Action::SetInventoryState { item_id: id, state: InventoryState::Available },
    t(2),
  )
  .unwrap();
  let item = s.item(id).unwrap();
  assert_eq!(item.care_state, CareState::Clean);
  assert_eq!(item.care_profile.last_cared_at, Some(t(2)));
}

#[test]
fn other_inventory_states_keep_the_care_label() {
  let mut s = WardrobeState::new();
  let id = add(&mut s, tee(), t(0));
  for n in 1..=3 {
    s.apply(Action::LogWear { item_id: id, outfit_id: None, date: None }, t(n))
      .unwrap();
  }
  s.apply(
    Action::SetInventoryState { item_id: id, state: InventoryState::InRepair },
    t(4),
  )
  .unwrap();
  assert_eq!(s.item(id).unwrap().care_state, CareState::Overdue);
}

#[test]
fn care_reset_survives_edits_and_state_changes() {
  let mut s = WardrobeState::new();
  let id = add(&mut s, tee(), t(0));
  for n in 1..=2 {
    s.apply(Action::LogWear { item_id: id, outfit_id: None, date: None }, t(n))
      .unwrap();
  }
  assert_eq!(s.item(id).unwrap().care_state, CareState::DueSoon);

  s.apply(Action::MarkCareComplete(id), t(3)).unwrap();
  s.apply(
    Action::UpdateItem {
      item_id: id,
      updates: ItemUpdate { brand: Some("Acme".into()), ..ItemUpdate::default() },
    },
    t(4),
  )
  .unwrap();
  assert_eq!(s.item(id).unwrap().care_state, CareState::Clean);
  assert!(s.care_alerts().is_empty());

  for (n, state) in [
    InventoryState::InLaundry,
    InventoryState::Available,
    InventoryState::InRepair,
  ]
  .into_iter()
  .enumerate()
  {
    s.apply(Action::SetInventoryState { item_id: id, state }, t(5 + n as i64))
      .unwrap();
  }
  assert_eq!(s.item(id).unwrap().care_state, CareState::Clean);

  // Wears move the label again, counted modulo the threshold.
  for n in 9..=11 {
    s.apply(Action::LogWear { item_id: id, outfit_id: None, date: None }, t(n))
      .unwrap();
  }
  assert_eq!(s.item(id).unwrap().wear_count, 5);
  assert_eq!(s.item(id).unwrap().care_state, CareState::DueSoon);
}

#[test]
fn mark_care_complete_resets_cycle() {
  let mut s = WardrobeState::new();
  let id = add(&mut s, tee(), t(0));
  for n in 1..=3 {
    s.apply(Action::LogWear { item_id: id, outfit_id: None, date: None }, t(n))
      .unwrap();
  }
  s.apply(
    Action::SetInventoryState { item_id: id, state: InventoryState::InRepair },
    t(4),
  )
  .unwrap();
  s.apply(Action::MarkCareComplete(id), t(5)).unwrap();

  let item = s.item(id).unwrap();
  assert_eq!(item.care_state, CareState::Clean);
  assert_eq!(item.inventory_state, InventoryState::Available);
  assert_eq!(item.care_profile.last_cared_at, Some(t(5)));
  assert_eq!(item.wear_count, 3);
  assert!(s.care_alerts().is_empty());
}

#[test]
fn mutations_on_missing_items_are_not_found() {
  let mut s = WardrobeState::new();
  let missing = Uuid::new_v4();
  let actions = [
    Action::UpdateItem { item_id: missing, updates: ItemUpdate::default() },
    Action::SetInventoryState { item_id: missing, state: InventoryState::Sold },
    Action::MarkCareComplete(missing),
    Action::ToggleFavorite(missing),
  ];
  for action in actions {
    assert!(matches!(s.apply(action, t(0)), Err(Error::ItemNotFound(_))));
  }
  assert!(matches!(
    s.apply(Action::ToggleOutfitFavorite(missing), t(0)),
    Err(Error::OutfitNotFound(_))
  ));
}

#[test]
fn update_merges_and_keeps_wear_count() {
  let mut s = WardrobeState::new();
  let id = add(&mut s, tee(), t(0));
  s.apply(Action::LogWear { item_id: id, outfit_id: None, date: None }, t(1))
    .unwrap();
  s.apply(
    Action::UpdateItem {
      item_id: id,
      updates: ItemUpdate {
        brand: Some("Uniqlo".into()),
        seasons: Some(vec![Season::Summer]),
        ..ItemUpdate::default()
      },
    },
    t(2),
  )
  .unwrap();
  let item = s.item(id).unwrap();
  assert_eq!(item.brand.as_deref(), Some("Uniqlo"));
  assert_eq!(item.seasons, vec![Season::Summer]);
  assert_eq!(item.wear_count, 1);
  assert_eq!(item.updated_at, t(2));
}

#[test]
fn rejected_update_leaves_item_unchanged() {
  let mut s = WardrobeState::new();
  let id = add(&mut s, tee(), t(0));
  let before = s.item(id).unwrap().clone();
  let result = s.apply(
    Action::UpdateItem {
      item_id: id,
      updates: ItemUpdate {
        brand: Some("Acme".into()),
        formality: Some(0),
        ..ItemUpdate::default()
      },
    },
    t(1),
  );
  assert!(matches!(result, Err(Error::Validation(_))));
  assert_eq!(s.item(id).unwrap(), &before);
}

#[test]
fn toggle_favorite_flips_and_touches() {
  let mut s = WardrobeState::new();
  let id = add(&mut s, tee(), t(0));
  s.apply(Action::ToggleFavorite(id), t(1)).unwrap();
  assert!(s.item(id).unwrap().is_favorite);
  s.apply(Action::ToggleFavorite(id), t(2)).unwrap();
  let item = s.item(id).unwrap();
  assert!(!item.is_favorite);
  assert_eq!(item.updated_at, t(2));
}

#[test]
fn delete_item_is_idempotent() {
  let mut s = WardrobeState::new();
  let id = add(&mut s, tee(), t(0));
  let other = add(&mut s, boots(), t(1));

  let first = s.apply(Action::DeleteItem(id), t(2)).unwrap();
  assert_eq!(first.changes, vec![Change::ItemRemoved(id)]);
  let after_once: Vec<_> = s.items().to_vec();

  let second = s.apply(Action::DeleteItem(id), t(3)).unwrap();
  assert!(second.is_noop());
  assert_eq!(s.items(), after_once.as_slice());
  assert_eq!(s.items().len(), 1);
  assert_eq!(s.items()[0].item_id, other);
}

#[test]
fn deleting_an_item_prunes_outfit_references() {
  let mut s = WardrobeState::new();
  let a = add(&mut s, tee(), t(0));
  let b = add(&mut s, boots(), t(1));
  let outfit = Outfit::new(vec![a, b], Occasion::Work);
  let outfit_id = outfit.outfit_id;
  s.apply(Action::SaveOutfit(outfit), t(2)).unwrap();

  s.apply(Action::DeleteItem(a), t(3)).unwrap();
  let outfit = s.outfit(outfit_id).expect("outfit survives");
  assert_eq!(outfit.item_ids, vec![b]);
  let resolved = s.outfit_items(outfit_id).unwrap();
  assert_eq!(resolved.len(), 1);
  assert_eq!(resolved[0].item_id, b);
}

#[test]
fn wear_count_never_decreases() {
  let mut s = WardrobeState::new();
  let id = add(&mut s, tee(), t(0));
  let mut last = 0;
  let actions = vec![
    Action::LogWear { item_id: id, outfit_id: None, date: None },
    Action::SetInventoryState { item_id: id, state: InventoryState::InLaundry },
    Action::MarkCareComplete(id),
    Action::UpdateItem { item_id: id, updates: ItemUpdate::default() },
    Action::ToggleFavorite(id),
    Action::LogWear { item_id: id, outfit_id: None, date: None },
  ];
  for (n, action) in actions.into_iter().enumerate() {
    s.apply(action, t(n as i64 + 1)).unwrap();
    let item = s.item(id).unwrap();
    assert!(item.wear_count >= last);
    assert!(item.updated_at >= item.created_at);
    last = item.wear_count;
  }
  assert_eq!(last, 2);
}

// ─── Outfits ─────────────────────────────────────────────────────────────────

#[test]
fn save_outfit_rejects_duplicates_and_unknown_items() {
  let mut s = WardrobeState::new();
  let a = add(&mut s, tee(), t(0));
  let outfit = Outfit::new(vec![a], Occasion::Formal);
  s.apply(Action::SaveOutfit(outfit.clone()), t(1)).unwrap();

  assert!(matches!(
    s.apply(Action::SaveOutfit(outfit), t(2)),
    Err(Error::Validation(_))
  ));
  assert!(matches!(
    s.apply(
      Action::SaveOutfit(Outfit::new(vec![Uuid::new_v4()], Occasion::Formal)),
      t(3)
    ),
    Err(Error::Validation(_))
  ));
  assert_eq!(s.outfits().len(), 1);
}

#[test]
fn delete_outfit_leaves_items() {
  let mut s = WardrobeState::new();
  let a = add(&mut s, tee(), t(0));
  let outfit = Outfit::new(vec![a], Occasion::Date);
  let outfit_id = outfit.outfit_id;
  s.apply(Action::SaveOutfit(outfit), t(1)).unwrap();
  s.apply(Action::ToggleOutfitFavorite(outfit_id), t(2)).unwrap();
  assert!(s.outfit(outfit_id).unwrap().is_favorite);

  let outcome = s.apply(Action::DeleteOutfit(outfit_id), t(3)).unwrap();
  assert_eq!(outcome.changes, vec![Change::OutfitRemoved(outfit_id)]);
  assert!(s.outfit(outfit_id).is_none());
  assert!(s.item(a).is_some());
  assert!(s.apply(Action::DeleteOutfit(outfit_id), t(4)).unwrap().is_noop());
}

// ─── Selectors ───────────────────────────────────────────────────────────────

#[test]
fn filters_and_sort_through_actions() {
  let mut s = WardrobeState::new();
  let shirt = add(&mut s, tee(), t(0));
  let shoe = add(&mut s, boots(), t(1));

  s.apply(Action::ToggleCategoryFilter(Category::Tops), t(2)).unwrap();
  let visible: Vec<_> = s.filtered_items().iter().map(|i| i.item_id).collect();
  assert_eq!(visible, vec![shirt]);

  s.apply(Action::ClearFilters, t(3)).unwrap();
  let visible: Vec<_> = s.filtered_items().iter().map(|i| i.item_id).collect();
  assert_eq!(visible, vec![shoe, shirt]);

  s.apply(Action::LogWear { item_id: shirt, outfit_id: None, date: None }, t(4))
    .unwrap();
  s.apply(Action::SetSortBy(SortBy::WearCount), t(5)).unwrap();
  assert_eq!(s.filtered_items()[0].item_id, shirt);

  s.apply(
    Action::SetFilters(FilterPatch {
      colors: Some(vec![Color::Brown]),
      ..FilterPatch::default()
    }),
    t(6),
  )
  .unwrap();
  let visible: Vec<_> = s.filtered_items().iter().map(|i| i.item_id).collect();
  assert_eq!(visible, vec![shoe]);
}

#[test]
fn items_by_category_only_lists_available() {
  let mut s = WardrobeState::new();
  let a = add(&mut s, tee(), t(0));
  let b = add(
    &mut s,
    NewItem::new("z", Category::Tops, Subcategory::Polo, vec![Color::Navy]),
    t(1),
  );
  add(&mut s, boots(), t(2));
  s.apply(
    Action::SetInventoryState { item_id: b, state: InventoryState::InDryCleaning },
    t(3),
  )
  .unwrap();
  let tops: Vec<_> = s
    .items_by_category(Category::Tops)
    .iter()
    .map(|i| i.item_id)
    .collect();
  assert_eq!(tops, vec![a]);
}

// ─── Dispatcher ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn dispatcher_persists_changes() {
  let store = MemoryStore::new();
  let mut d = Dispatcher::new(store.clone());

  let id = d.dispatch(Action::AddItem(tee())).await.unwrap().inserted_item().unwrap();
  d.dispatch(Action::LogWear { item_id: id, outfit_id: None, date: None })
    .await
    .unwrap();
  d.dispatch(Action::ToggleCategoryFilter(Category::Shoes)).await.unwrap();

  // Filter intents write nothing.
  assert_eq!(store.commits().await, 2);

  let reloaded = Dispatcher::hydrate(store).await.unwrap();
  let item = reloaded.state().item(id).unwrap();
  assert_eq!(item.wear_count, 1);
}

#[tokio::test]
async fn failed_commit_leaves_state_untouched() {
  let store = MemoryStore::new();
  let mut d = Dispatcher::new(store.clone());
  let id = d.dispatch(Action::AddItem(tee())).await.unwrap().inserted_item().unwrap();

  store.fail_next("backend unavailable").await;
  let err = d
    .dispatch(Action::LogWear { item_id: id, outfit_id: None, date: None })
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Transient(ref m) if m.contains("backend unavailable")));
  assert_eq!(d.state().item(id).unwrap().wear_count, 0);
  assert!(d.state().last_error().is_some());

  // The next attempt goes through and clears the error.
  d.dispatch(Action::LogWear { item_id: id, outfit_id: None, date: None })
    .await
    .unwrap();
  assert_eq!(d.state().item(id).unwrap().wear_count, 1);
  assert!(d.state().last_error().is_none());
  assert_eq!(store.load_items().await.unwrap()[0].wear_count, 1);
}

#[tokio::test]
async fn dispatcher_delete_prunes_stored_outfits() {
  let store = MemoryStore::new().with_latency(std::time::Duration::from_millis(1));
  let mut d = Dispatcher::new(store.clone());
  let a = d.dispatch(Action::AddItem(tee())).await.unwrap().inserted_item().unwrap();
  let b = d.dispatch(Action::AddItem(boots())).await.unwrap().inserted_item().unwrap();
  let outfit = Outfit::new(vec![a, b], Occasion::Travel);
  let outfit_id = outfit.outfit_id;
  d.dispatch(Action::SaveOutfit(outfit)).await.unwrap();

  d.dispatch(Action::DeleteItem(a)).await.unwrap();
  d.dispatch(Action::DeleteItem(a)).await.unwrap();

  let stored = store.load_outfits().await.unwrap();
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0].outfit_id, outfit_id);
  assert_eq!(stored[0].item_ids, vec![b]);
  assert_eq!(store.load_items().await.unwrap().len(), 1);
}

#[tokio::test]
async fn validation_errors_do_not_reach_the_store() {
  let store = MemoryStore::new();
  let mut d = Dispatcher::new(store.clone());
  let err = d
    .dispatch(Action::AddItem(NewItem { image_uri: None, ..tee() }))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Validation(_)));
  assert_eq!(store.commits().await, 0);
  assert!(d.state().last_error().is_some());
}
