mod common;

use musicshop::{
    entities::order::{self, BuyingType, Status},
    pricing::ItemRef,
    StoreError,
};
use sea_orm::{EntityTrait, QueryOrder, QuerySelect};

use common::{catalog, cents, customer, money, store};

#[tokio::test]
async fn checkout_turns_cart_into_new_order() {
    let store = store().await;
    let catalog = catalog(&store).await;
    let buyer = customer(&store, "gus").await;
    let cart = store.carts.open_or_create(buyer.id).await.unwrap();
    store
        .carts
        .add_item(cart.id, ItemRef::album(catalog.album.id), 3)
        .await
        .unwrap();

    let order = store
        .orders
        .checkout(cart.id, BuyingType::Delivery, Some("leave at the door".to_owned()))
        .await
        .unwrap();

    assert_eq!(order.status, Status::New);
    assert_eq!(order.buying_type, BuyingType::Delivery);
    assert_eq!(order.customer_id, buyer.id);
    assert_eq!(order.cart_id, Some(cart.id));
    assert_eq!(cents(order.final_price), money(5997));

    let cart = store.carts.get(cart.id).await.unwrap();
    assert!(cart.in_order);
    assert!(store.carts.open_cart_for(buyer.id).await.unwrap().is_none());

    let again = store.orders.checkout(cart.id, BuyingType::SelfPickup, None).await;
    assert!(matches!(again, Err(StoreError::CartInOrder(_))));

    let late = store
        .carts
        .add_item(cart.id, ItemRef::album(catalog.album.id), 1)
        .await;
    assert!(matches!(late, Err(StoreError::CartInOrder(_))));

    let fresh = store.carts.open_or_create(buyer.id).await.unwrap();
    assert_ne!(fresh.id, cart.id);
    assert_eq!(store.orders.list_for_customer(buyer.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn empty_cart_cannot_be_ordered() {
    let store = store().await;
    let buyer = customer(&store, "hal").await;
    let cart = store.carts.create(buyer.id, false).await.unwrap();

    let result = store.orders.checkout(cart.id, BuyingType::SelfPickup, None).await;
    assert!(matches!(result, Err(StoreError::EmptyCart(id)) if id == cart.id));
    assert!(!store.carts.get(cart.id).await.unwrap().in_order);
}

#[tokio::test]
async fn status_moves_forward_one_step_at_a_time() {
    let store = store().await;
    let catalog = catalog(&store).await;
    let buyer = customer(&store, "ivy").await;
    let cart = store.carts.create(buyer.id, false).await.unwrap();
    store
        .carts
        .add_item(cart.id, ItemRef::album(catalog.album.id), 1)
        .await
        .unwrap();
    let order = store
        .orders
        .checkout(cart.id, BuyingType::SelfPickup, None)
        .await
        .unwrap();

    let skipped = store.orders.set_status(order.id, Status::Completed).await;
    assert!(matches!(
        skipped,
        Err(StoreError::InvalidTransition {
            from: Status::New,
            to: Status::Completed
        })
    ));

    let same = store.orders.set_status(order.id, Status::New).await.unwrap();
    assert_eq!(same.status, Status::New);

    let order = store.orders.advance(order.id).await.unwrap();
    assert_eq!(order.status, Status::InProgress);
    let order = store.orders.set_status(order.id, Status::Ready).await.unwrap();
    assert_eq!(order.status, Status::Ready);
    assert_eq!(store.orders.list_by_status(Status::Ready).await.unwrap().len(), 1);
    let order = store.orders.advance(order.id).await.unwrap();
    assert_eq!(order.status, Status::Completed);

    let past_end = store.orders.advance(order.id).await;
    assert!(matches!(past_end, Err(StoreError::InvalidTransition { .. })));

    let backwards = store.orders.set_status(order.id, Status::New).await;
    assert!(matches!(backwards, Err(StoreError::InvalidTransition { .. })));
}

#[tokio::test]
async fn deleting_customer_removes_carts_and_orders() {
    let store = store().await;
    let catalog = catalog(&store).await;
    let buyer = customer(&store, "jo").await;
    let cart = store.carts.create(buyer.id, false).await.unwrap();
    store
        .carts
        .add_item(cart.id, ItemRef::album(catalog.album.id), 1)
        .await
        .unwrap();
    let order = store
        .orders
        .checkout(cart.id, BuyingType::Delivery, None)
        .await
        .unwrap();

    store.customers.delete(buyer.id).await.unwrap();

    assert!(matches!(
        store.orders.get(order.id).await,
        Err(StoreError::NotFound { entity: "order", .. })
    ));
    assert!(matches!(
        store.carts.get(cart.id).await,
        Err(StoreError::NotFound { entity: "cart", .. })
    ));
    assert!(store.cart_products.list_for_customer(buyer.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn deleting_an_ordered_cart_keeps_the_order() {
    let store = store().await;
    let catalog = catalog(&store).await;
    let buyer = customer(&store, "kim").await;
    let cart = store.carts.create(buyer.id, false).await.unwrap();
    store
        .carts
        .add_item(cart.id, ItemRef::album(catalog.album.id), 2)
        .await
        .unwrap();
    let order = store
        .orders
        .checkout(cart.id, BuyingType::SelfPickup, None)
        .await
        .unwrap();

    store.carts.delete(cart.id).await.unwrap();

    let order = store.orders.get(order.id).await.unwrap();
    assert_eq!(order.cart_id, None);
    assert_eq!(cents(order.final_price), money(3998));
}

#[tokio::test]
async fn buying_type_is_stored_by_its_short_name() {
    let store = store().await;
    let catalog = catalog(&store).await;
    let buyer = customer(&store, "lev").await;

    let mut placed = Vec::new();
    for buying_type in [BuyingType::SelfPickup, BuyingType::Delivery] {
        let cart = store.carts.create(buyer.id, false).await.unwrap();
        store
            .carts
            .add_item(cart.id, ItemRef::album(catalog.album.id), 1)
            .await
            .unwrap();
        placed.push(
            store
                .orders
                .checkout(cart.id, buying_type, None)
                .await
                .unwrap(),
        );
    }

    let pickup = store.orders.get(placed[0].id).await.unwrap();
    assert_eq!(pickup.buying_type, BuyingType::SelfPickup);
    let delivery = store.orders.get(placed[1].id).await.unwrap();
    assert_eq!(delivery.buying_type, BuyingType::Delivery);

    let stored: Vec<String> = order::Entity::find()
        .select_only()
        .column(order::Column::BuyingType)
        .order_by_asc(order::Column::Id)
        .into_tuple()
        .all(store.connection())
        .await
        .unwrap();
    assert_eq!(stored, ["self", "delivery"]);
}
