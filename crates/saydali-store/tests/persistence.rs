//! Store behavior across storage backends and reopened sessions.

use std::cell::RefCell;
use std::rc::Rc;

use saydali_core::{CartItemInput, HistoryEntryInput, Money, PricingPolicy, MAX_HISTORY_ITEMS};
use saydali_store::{
    CartStore, FileStorage, HistoryStore, MemoryStorage, Session, Storage, StoreError,
    StoreResult, DEFAULT_CART_KEY, DEFAULT_HISTORY_KEY,
};

// =============================================================================
// Helpers
// =============================================================================

fn vitamin(product_id: &str, color: &str, stock: i64) -> CartItemInput {
    CartItemInput {
        product_id: product_id.to_string(),
        name: format!("Vitamin {}", product_id),
        slug: format!("vitamin-{}", product_id),
        category: "vitamins".to_string(),
        image: "/img/vitamin.jpg".to_string(),
        price: Money::from_major(10),
        color: color.to_string(),
        size: String::new(),
        count_in_stock: stock,
    }
}

fn viewed(id: &str) -> HistoryEntryInput {
    HistoryEntryInput {
        id: id.to_string(),
        category: "skin-care".to_string(),
        name: format!("Product {}", id),
        image: String::new(),
        slug: id.to_lowercase(),
    }
}

fn file_storage(dir: &tempfile::TempDir) -> Rc<dyn Storage> {
    Rc::new(FileStorage::new(dir.path()))
}

/// Reads fine, refuses every write.
struct FailingStorage;

impl Storage for FailingStorage {
    fn read(&self, _key: &str) -> StoreResult<Option<String>> {
        Ok(None)
    }

    fn write(&self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("quota exceeded".to_string()))
    }

    fn remove(&self, _key: &str) -> StoreResult<()> {
        Ok(())
    }
}

// =============================================================================
// Cart
// =============================================================================

#[test]
fn test_cart_add_merge_clamp_remove() {
    let mut cart = CartStore::open(
        Rc::new(MemoryStorage::new()),
        DEFAULT_CART_KEY,
        PricingPolicy::default(),
    );

    let first = cart.add_item(vitamin("p1", "red", 3), 2).unwrap();
    assert_eq!(cart.items().len(), 1);
    assert_eq!(first.quantity, 2);

    let merged = cart.add_item(vitamin("p1", "red", 3), 5).unwrap();
    assert!(merged.merged);
    assert!(merged.clamped);
    assert_eq!(merged.client_id, first.client_id);
    assert_eq!(cart.items()[0].quantity, 3);

    let change = cart.update_quantity(&first.client_id, 0).unwrap();
    assert_eq!(change.quantity, 1);
    assert_eq!(cart.items().len(), 1);

    assert!(cart.remove_item(&first.client_id));
    assert!(cart.cart().is_empty());
}

#[test]
fn test_cart_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let (client_id, before) = {
        let mut cart = CartStore::open(file_storage(&dir), DEFAULT_CART_KEY, PricingPolicy::default());
        let outcome = cart.add_item(vitamin("p1", "red", 5), 2).unwrap();
        cart.add_item(vitamin("p1", "blue", 5), 1).unwrap();
        (outcome.client_id, cart.cart().clone())
    };

    let mut cart = CartStore::open(file_storage(&dir), DEFAULT_CART_KEY, PricingPolicy::default());
    assert!(cart.was_rehydrated());
    assert_eq!(cart.cart(), &before);

    // Ids survive the round trip, so the UI can keep addressing lines.
    assert_eq!(cart.update_quantity(&client_id, 4).unwrap().quantity, 4);
}

#[test]
fn test_colon_variants_keep_distinct_ids_across_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let (first, second) = {
        let mut cart = CartStore::open(file_storage(&dir), DEFAULT_CART_KEY, PricingPolicy::default());
        let first = cart.add_item(vitamin("a", "b:", 5), 1).unwrap();
        let second = cart.add_item(vitamin("a:b", "", 5), 1).unwrap();
        assert_ne!(first.client_id, second.client_id);
        (first.client_id, second.client_id)
    };

    let mut cart = CartStore::open(file_storage(&dir), DEFAULT_CART_KEY, PricingPolicy::default());
    assert!(cart.was_rehydrated());
    assert_eq!(cart.items().len(), 2);

    assert!(cart.remove_item(&first));
    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.items()[0].client_id, second);
}

#[test]
fn test_corrupt_record_starts_empty() {
    let storage = Rc::new(MemoryStorage::new());
    storage.write(DEFAULT_CART_KEY, "{\"version\":1,\"state\":").unwrap();

    let cart = CartStore::open(storage, DEFAULT_CART_KEY, PricingPolicy::default());
    assert!(!cart.was_rehydrated());
    assert!(cart.cart().is_empty());
}

#[test]
fn test_unknown_version_starts_empty() {
    let storage = Rc::new(MemoryStorage::new());
    storage
        .write(DEFAULT_HISTORY_KEY, r#"{"version":99,"state":{"products":[]}}"#)
        .unwrap();

    let history = HistoryStore::open(storage, DEFAULT_HISTORY_KEY);
    assert!(!history.was_rehydrated());
    assert!(history.items().is_empty());
}

#[test]
fn test_record_breaking_invariants_starts_empty() {
    let storage = Rc::new(MemoryStorage::new());
    // Quantity above the stock ceiling.
    let record = r#"{"version":1,"state":{"items":[{
        "clientId":"p1:red::1","productId":"p1","name":"Vitamin","slug":"vitamin",
        "category":"vitamins","image":"","price":1000,"color":"red","size":"",
        "quantity":9,"countInStock":3
    }]}}"#;
    storage.write(DEFAULT_CART_KEY, record).unwrap();

    let cart = CartStore::open(storage, DEFAULT_CART_KEY, PricingPolicy::default());
    assert!(!cart.was_rehydrated());
    assert!(cart.cart().is_empty());
}

#[test]
fn test_write_failure_keeps_memory_state() {
    let mut cart = CartStore::open(Rc::new(FailingStorage), DEFAULT_CART_KEY, PricingPolicy::default());

    let outcome = cart.add_item(vitamin("p1", "", 5), 2).unwrap();

    assert_eq!(outcome.quantity, 2);
    assert_eq!(cart.items().len(), 1);
    assert!(matches!(
        cart.last_persist_error(),
        Some(StoreError::Unavailable(_))
    ));
    assert!(cart.flush().is_err());
}

#[test]
fn test_clear_reports_write_failure() {
    let mut cart = CartStore::open(Rc::new(FailingStorage), DEFAULT_CART_KEY, PricingPolicy::default());
    cart.add_item(vitamin("p1", "", 5), 2).unwrap();

    let result = cart.clear();

    assert!(matches!(result, Err(StoreError::Unavailable(_))));
    assert!(cart.cart().is_empty());

    let mut history = HistoryStore::open(Rc::new(FailingStorage), DEFAULT_HISTORY_KEY);
    history.add_item(viewed("A")).unwrap();
    assert!(history.clear().is_err());
    assert!(history.items().is_empty());
}

#[test]
fn test_clear_persists_empty_cart() {
    let storage = Rc::new(MemoryStorage::new());
    {
        let mut cart = CartStore::open(storage.clone(), DEFAULT_CART_KEY, PricingPolicy::default());
        cart.add_item(vitamin("p1", "", 5), 2).unwrap();
    }

    let mut cart = CartStore::open(storage.clone(), DEFAULT_CART_KEY, PricingPolicy::default());
    cart.clear().unwrap();

    let reopened = CartStore::open(storage, DEFAULT_CART_KEY, PricingPolicy::default());
    assert!(reopened.was_rehydrated());
    assert!(reopened.cart().is_empty());
}

#[test]
fn test_observers_see_state_before_write() {
    let storage = Rc::new(MemoryStorage::new());
    let mut cart = CartStore::open(storage.clone(), DEFAULT_CART_KEY, PricingPolicy::default());

    let log = Rc::new(RefCell::new(Vec::new()));
    let first = log.clone();
    let probe = storage.clone();
    cart.subscribe(move |c| {
        let written = probe.read(DEFAULT_CART_KEY).unwrap().is_some();
        first.borrow_mut().push(format!("badge:{}:{}", c.total_quantity(), written));
    });
    let second = log.clone();
    cart.subscribe(move |c| second.borrow_mut().push(format!("drawer:{}", c.item_count())));

    cart.add_item(vitamin("p1", "", 5), 2).unwrap();
    cart.add_item(vitamin("p2", "", 5), 1).unwrap();

    assert_eq!(
        *log.borrow(),
        ["badge:2:false", "drawer:1", "badge:3:true", "drawer:2"]
    );
}

// =============================================================================
// History
// =============================================================================

#[test]
fn test_history_refresh_moves_to_front() {
    let mut history = HistoryStore::open(Rc::new(MemoryStorage::new()), DEFAULT_HISTORY_KEY);
    for id in ["B", "C", "A"] {
        history.add_item(viewed(id)).unwrap();
    }
    // Newest first: [A, C, B]; viewing A again keeps that order.
    let outcome = history.add_item(viewed("A")).unwrap();
    assert!(outcome.refreshed);

    let ids: Vec<_> = history.items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["A", "C", "B"]);
}

#[test]
fn test_history_cap_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let before = {
        let mut history = HistoryStore::open(file_storage(&dir), DEFAULT_HISTORY_KEY);
        for n in 0..MAX_HISTORY_ITEMS + 5 {
            history.add_item(viewed(&format!("P{}", n))).unwrap();
        }
        assert_eq!(history.items().len(), MAX_HISTORY_ITEMS);
        history.history().clone()
    };

    let history = HistoryStore::open(file_storage(&dir), DEFAULT_HISTORY_KEY);
    assert!(history.was_rehydrated());
    // Timestamps included.
    assert_eq!(history.history(), &before);
    assert_eq!(history.items().len(), MAX_HISTORY_ITEMS);
    assert_eq!(history.items()[0].id, format!("P{}", MAX_HISTORY_ITEMS + 4));
    assert!(!history.history().contains("P4"));
    assert!(history.history().contains("P5"));
}

// =============================================================================
// Session
// =============================================================================

#[test]
fn test_session_stores_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    let storage = file_storage(&dir);
    {
        let mut session = Session::with_storage(
            storage.clone(),
            DEFAULT_CART_KEY,
            DEFAULT_HISTORY_KEY,
            PricingPolicy::default(),
        );
        session.cart.add_item(vitamin("p1", "", 5), 1).unwrap();
        session.history.add_item(viewed("p1")).unwrap();
        session.cart.clear().unwrap();
    }

    let session = Session::with_storage(
        storage,
        DEFAULT_CART_KEY,
        DEFAULT_HISTORY_KEY,
        PricingPolicy::default(),
    );
    assert!(session.cart.cart().is_empty());
    assert_eq!(session.history.items().len(), 1);
}
