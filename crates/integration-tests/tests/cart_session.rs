//! Cart persistence contract across store lifetimes.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use modora_core::{Price, Product, ProductId, RawProduct};
use modora_stores::persistence::{CART_ITEMS_KEY, KeyValueStorage, MemoryStorage};
use modora_stores::{CartStore, StoreError};

fn product(id: &str, price: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        price: Price::parse(price).unwrap(),
        image_refs: vec![format!("img/{id}-front.jpg")],
        category: None,
        sizes: vec!["S".to_string(), "M".to_string(), "L".to_string()],
        is_favorite: false,
        is_new: false,
        is_best_seller: false,
        quantity: None,
    }
}

#[tokio::test]
async fn cart_survives_across_sessions() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());

    // First session: build up a cart.
    {
        let mut cart = CartStore::new(Arc::clone(&storage));
        cart.initialize().await.unwrap();
        cart.add_item(&product("P1", "249.90"), "M").await.unwrap();
        cart.add_item(&product("P1", "249.90"), "M").await.unwrap();
        cart.add_item(&product("P2", "100"), "L").await.unwrap();
        cart.increase_quantity(1).await.unwrap();
    }

    // Second session restores the exact same state.
    let mut cart = CartStore::new(Arc::clone(&storage));
    cart.initialize().await.unwrap();

    assert_eq!(cart.items().len(), 2);
    let summary = cart.summary();
    assert_eq!(summary.total_quantity, 4);
    assert_eq!(summary.total_price, "699.80".parse().unwrap());

    // Third session after a checkout handoff starts empty.
    let handoff = cart.take_for_checkout().await;
    assert_eq!(handoff.len(), 2);

    let mut cart = CartStore::new(storage);
    cart.initialize().await.unwrap();
    assert!(cart.items().is_empty());
}

#[tokio::test]
async fn cart_recovers_from_corrupt_snapshot() {
    let storage: Arc<dyn KeyValueStorage> = Arc::new(MemoryStorage::new());
    storage.set(CART_ITEMS_KEY, "{ not a cart").await.unwrap();

    let mut cart = CartStore::new(Arc::clone(&storage));
    let err = cart.initialize().await.unwrap_err();
    assert!(matches!(err, StoreError::Storage(_)));

    // The session continues in-memory and the next mutation repairs the
    // stored snapshot.
    cart.add_item(&product("P1", "50"), "S").await.unwrap();

    let mut cart = CartStore::new(storage);
    cart.initialize().await.unwrap();
    assert_eq!(cart.items().len(), 1);
}

#[tokio::test]
async fn api_payload_flows_into_cart_via_normalization() {
    // A wire payload using the older field names still produces a cart line
    // with a numeric price and canonical image refs.
    let raw: RawProduct = serde_json::from_str(
        r#"{
            "id": 7,
            "name": "Denim Jacket",
            "price": "₺1.249,90",
            "frontImagePath": "img/7-front.jpg",
            "backImagePath": "img/7-back.jpg",
            "categoryId": "outerwear",
            "availableSizes": ["M", "L"]
        }"#,
    )
    .unwrap();
    let canonical = Product::from(raw);

    let mut cart = CartStore::new(Arc::new(MemoryStorage::new()));
    cart.initialize().await.unwrap();
    cart.add_item(&canonical, "L").await.unwrap();

    let line = cart.items().first().unwrap();
    assert_eq!(line.product_id, ProductId::new("7"));
    assert_eq!(line.image_refs.len(), 2);
    assert_eq!(cart.summary().total_price, "1249.90".parse().unwrap());
}
