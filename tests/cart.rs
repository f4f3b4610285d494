mod common;

use musicshop::{
    entities::order::BuyingType,
    pricing::{ItemRef, Priced, Purchasable},
    validation::AlbumChanges,
    StoreError,
};

use common::{add_album, catalog, cents, customer, money, store};

#[tokio::test]
async fn line_price_is_quantity_times_album_price() {
    let store = store().await;
    let catalog = catalog(&store).await;
    let buyer = customer(&store, "ann").await;
    let cart = store.carts.create(buyer.id, false).await.unwrap();

    let line = store
        .cart_products
        .create(cart.id, ItemRef::album(catalog.album.id), 3)
        .await
        .unwrap();

    assert_eq!(line.quantity, 3);
    assert_eq!(line.customer_id, buyer.id);
    assert_eq!(cents(line.final_price), money(5997));

    let stored = store.cart_products.get(line.id).await.unwrap();
    assert_eq!(cents(stored.final_price), money(5997));

    let item = store.cart_products.item(&stored).await.unwrap();
    assert!(matches!(item, Purchasable::Album(ref album) if album.id == catalog.album.id));
    assert_eq!(cents(item.unit_price()), money(1999));
}

#[tokio::test]
async fn resaving_keeps_the_row_and_reprices() {
    let store = store().await;
    let catalog = catalog(&store).await;
    let buyer = customer(&store, "ann").await;
    let cart = store.carts.create(buyer.id, false).await.unwrap();
    let line = store
        .cart_products
        .create(cart.id, ItemRef::album(catalog.album.id), 2)
        .await
        .unwrap();

    let again = store.cart_products.save(&line).await.unwrap();
    assert_eq!(again.id, line.id);
    assert_eq!(cents(again.final_price), money(3998));
    assert_eq!(store.carts.lines(cart.id).await.unwrap().len(), 1);

    store
        .albums
        .update(
            catalog.album.id,
            AlbumChanges {
                price: Some(money(1000)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let repriced = store.cart_products.save(&again).await.unwrap();
    assert_eq!(repriced.id, line.id);
    assert_eq!(cents(repriced.final_price), money(2000));

    let cart = store.carts.get(cart.id).await.unwrap();
    assert_eq!(cents(cart.final_price), money(2000));
}

#[tokio::test]
async fn cart_totals_follow_line_changes() {
    let store = store().await;
    let catalog = catalog(&store).await;
    let second = add_album(
        &store,
        &catalog.artist,
        &catalog.media_type,
        "Bitches Brew",
        money(1050),
    )
    .await;
    let buyer = customer(&store, "bo").await;
    let cart = store.carts.open_or_create(buyer.id).await.unwrap();
    assert_eq!(cart.total_products, 0);
    assert_eq!(cents(cart.final_price), money(0));

    let first = store
        .carts
        .add_item(cart.id, ItemRef::album(catalog.album.id), 1)
        .await
        .unwrap();
    let merged = store
        .carts
        .add_item(cart.id, ItemRef::album(catalog.album.id), 2)
        .await
        .unwrap();
    assert_eq!(merged.id, first.id);
    assert_eq!(merged.quantity, 3);

    let other = store
        .carts
        .add_item(cart.id, ItemRef::album(second.id), 1)
        .await
        .unwrap();

    let totals = store.carts.get(cart.id).await.unwrap();
    assert_eq!(totals.total_products, 4);
    assert_eq!(cents(totals.final_price), money(7047));

    let changed = store.carts.set_quantity(other.id, 2).await.unwrap().unwrap();
    assert_eq!(cents(changed.final_price), money(2100));
    let totals = store.carts.get(cart.id).await.unwrap();
    assert_eq!(totals.total_products, 5);
    assert_eq!(cents(totals.final_price), money(8097));

    assert!(store.carts.set_quantity(other.id, 0).await.unwrap().is_none());
    let totals = store.carts.get(cart.id).await.unwrap();
    assert_eq!(totals.total_products, 3);
    assert_eq!(cents(totals.final_price), money(5997));

    store.carts.remove_line(first.id).await.unwrap();
    let totals = store.carts.get(cart.id).await.unwrap();
    assert_eq!(totals.total_products, 0);
    assert_eq!(cents(totals.final_price), money(0));
    assert!(store.carts.lines(cart.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn rejects_bad_quantities() {
    let store = store().await;
    let catalog = catalog(&store).await;
    let buyer = customer(&store, "cy").await;
    let cart = store.carts.create(buyer.id, true).await.unwrap();
    assert!(cart.for_anonymous_user);

    let zero = store
        .carts
        .add_item(cart.id, ItemRef::album(catalog.album.id), 0)
        .await;
    assert!(matches!(zero, Err(StoreError::InvalidQuantity(0))));

    let negative = store
        .cart_products
        .create(cart.id, ItemRef::album(catalog.album.id), -1)
        .await;
    assert!(matches!(negative, Err(StoreError::InvalidQuantity(-1))));

    let line = store
        .carts
        .add_item(cart.id, ItemRef::album(catalog.album.id), 1)
        .await
        .unwrap();
    let negative = store.carts.set_quantity(line.id, -4).await;
    assert!(matches!(negative, Err(StoreError::InvalidQuantity(-4))));

    let missing = store.carts.add_item(cart.id, ItemRef::album(4242), 1).await;
    assert!(matches!(
        missing,
        Err(StoreError::NotFound { entity: "album", id: 4242 })
    ));
    assert_eq!(store.carts.lines(cart.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn deleting_an_album_clears_it_from_open_carts() {
    let store = store().await;
    let catalog = catalog(&store).await;
    let keep = add_album(
        &store,
        &catalog.artist,
        &catalog.media_type,
        "Milestones",
        money(900),
    )
    .await;
    let buyer = customer(&store, "di").await;
    let cart = store.carts.create(buyer.id, false).await.unwrap();
    store
        .carts
        .add_item(cart.id, ItemRef::album(catalog.album.id), 2)
        .await
        .unwrap();
    store
        .carts
        .add_item(cart.id, ItemRef::album(keep.id), 1)
        .await
        .unwrap();

    store.albums.delete(catalog.album.id).await.unwrap();

    let lines = store.carts.lines_with_items(cart.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].1.id(), keep.id);
    let cart = store.carts.get(cart.id).await.unwrap();
    assert_eq!(cart.total_products, 1);
    assert_eq!(cents(cart.final_price), money(900));
}

#[tokio::test]
async fn describes_lines_and_carts() {
    let store = store().await;
    let catalog = catalog(&store).await;
    let buyer = customer(&store, "ed").await;
    let cart = store.carts.create(buyer.id, false).await.unwrap();
    let line = store
        .carts
        .add_item(cart.id, ItemRef::album(catalog.album.id), 1)
        .await
        .unwrap();

    assert_eq!(
        store.cart_products.describe(line.id).await.unwrap(),
        "Product Kind of Blue for cart"
    );
    assert_eq!(cart.to_string(), cart.id.to_string());
    assert_eq!(
        store.cart_products.list_for_customer(buyer.id).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn deleting_a_cart_drops_its_lines() {
    let store = store().await;
    let catalog = catalog(&store).await;
    let buyer = customer(&store, "flo").await;
    let cart = store.carts.create(buyer.id, false).await.unwrap();
    let line = store
        .carts
        .add_item(cart.id, ItemRef::album(catalog.album.id), 1)
        .await
        .unwrap();

    store.carts.delete(cart.id).await.unwrap();

    assert!(matches!(
        store.cart_products.get(line.id).await,
        Err(StoreError::NotFound { .. })
    ));
    assert!(store.carts.list_for_customer(buyer.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn saving_a_line_cannot_retarget_its_cart() {
    let store = store().await;
    let catalog = catalog(&store).await;
    let buyer = customer(&store, "gil").await;
    let ordered = store.carts.create(buyer.id, false).await.unwrap();
    let line = store
        .carts
        .add_item(ordered.id, ItemRef::album(catalog.album.id), 1)
        .await
        .unwrap();
    store
        .orders
        .checkout(ordered.id, BuyingType::Delivery, None)
        .await
        .unwrap();
    let open = store.carts.create(buyer.id, false).await.unwrap();

    let mut forged = line.clone();
    forged.cart_id = open.id;
    forged.quantity = 50;
    let moved = store.cart_products.save(&forged).await;
    assert!(matches!(
        moved,
        Err(StoreError::LineNotInCart { line_id, cart_id }) if line_id == line.id && cart_id == open.id
    ));

    let mut bumped = line.clone();
    bumped.quantity = 50;
    let in_order = store.cart_products.save(&bumped).await;
    assert!(matches!(in_order, Err(StoreError::CartInOrder(id)) if id == ordered.id));

    let stored = store.cart_products.get(line.id).await.unwrap();
    assert_eq!(stored.cart_id, ordered.id);
    assert_eq!(stored.quantity, 1);
    assert_eq!(cents(stored.final_price), money(1999));

    let ordered = store.carts.get(ordered.id).await.unwrap();
    assert_eq!(ordered.total_products, 1);
    assert_eq!(cents(ordered.final_price), money(1999));
    let open = store.carts.get(open.id).await.unwrap();
    assert_eq!(open.total_products, 0);
    assert_eq!(cents(open.final_price), money(0));
}

#[tokio::test]
async fn quantity_overflow_is_rejected() {
    let store = store().await;
    let catalog = catalog(&store).await;
    let second = add_album(
        &store,
        &catalog.artist,
        &catalog.media_type,
        "Sketches of Spain",
        money(1200),
    )
    .await;
    let buyer = customer(&store, "hank").await;
    let cart = store.carts.create(buyer.id, false).await.unwrap();
    let line = store
        .carts
        .add_item(cart.id, ItemRef::album(catalog.album.id), 1)
        .await
        .unwrap();

    let merged = store
        .carts
        .add_item(cart.id, ItemRef::album(catalog.album.id), i32::MAX)
        .await;
    assert!(matches!(merged, Err(StoreError::InvalidQuantity(i32::MAX))));
    assert_eq!(store.cart_products.get(line.id).await.unwrap().quantity, 1);

    store.carts.set_quantity(line.id, i32::MAX).await.unwrap();
    let pushed_over = store
        .carts
        .add_item(cart.id, ItemRef::album(second.id), 1)
        .await;
    assert!(matches!(pushed_over, Err(StoreError::InvalidQuantity(_))));

    let lines = store.carts.lines(cart.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(store.carts.get(cart.id).await.unwrap().total_products, i32::MAX);
}

#[tokio::test]
async fn deleting_an_album_leaves_ordered_carts_alone() {
    let store = store().await;
    let catalog = catalog(&store).await;
    let buyer = customer(&store, "ines").await;
    let ordered = store.carts.create(buyer.id, false).await.unwrap();
    let kept = store
        .carts
        .add_item(ordered.id, ItemRef::album(catalog.album.id), 2)
        .await
        .unwrap();
    store
        .orders
        .checkout(ordered.id, BuyingType::SelfPickup, None)
        .await
        .unwrap();
    let open = store.carts.create(buyer.id, false).await.unwrap();
    store
        .carts
        .add_item(open.id, ItemRef::album(catalog.album.id), 1)
        .await
        .unwrap();

    store.albums.delete(catalog.album.id).await.unwrap();

    let lines = store.carts.lines(ordered.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].id, kept.id);
    let ordered = store.carts.get(ordered.id).await.unwrap();
    assert_eq!(ordered.total_products, 2);
    assert_eq!(cents(ordered.final_price), money(3998));
    assert!(matches!(
        store.cart_products.item(&lines[0]).await,
        Err(StoreError::NotFound { entity: "album", .. })
    ));

    assert!(store.carts.lines(open.id).await.unwrap().is_empty());
    assert_eq!(store.carts.get(open.id).await.unwrap().total_products, 0);
}

#[tokio::test]
async fn deleting_a_media_type_clears_its_albums_from_open_carts() {
    let store = store().await;
    let catalog = catalog(&store).await;
    let buyer = customer(&store, "jon").await;
    let cart = store.carts.create(buyer.id, false).await.unwrap();
    store
        .carts
        .add_item(cart.id, ItemRef::album(catalog.album.id), 3)
        .await
        .unwrap();

    store.media_types.delete(catalog.media_type.id).await.unwrap();

    assert!(store.carts.lines(cart.id).await.unwrap().is_empty());
    let cart = store.carts.get(cart.id).await.unwrap();
    assert_eq!(cart.total_products, 0);
    assert_eq!(cents(cart.final_price), money(0));
    assert!(matches!(
        store.albums.get(catalog.album.id).await,
        Err(StoreError::NotFound { entity: "album", .. })
    ));
}

#[tokio::test]
async fn deleting_a_genre_clears_its_albums_from_open_carts() {
    let store = store().await;
    let catalog = catalog(&store).await;
    let buyer = customer(&store, "kai").await;
    let cart = store.carts.create(buyer.id, false).await.unwrap();
    store
        .carts
        .add_item(cart.id, ItemRef::album(catalog.album.id), 2)
        .await
        .unwrap();

    store.genres.delete(catalog.genre.id).await.unwrap();

    assert!(store.carts.lines(cart.id).await.unwrap().is_empty());
    let cart = store.carts.get(cart.id).await.unwrap();
    assert_eq!(cart.total_products, 0);
    assert_eq!(cents(cart.final_price), money(0));
}

#[tokio::test]
async fn lines_of_ordered_carts_cannot_be_deleted() {
    let store = store().await;
    let catalog = catalog(&store).await;
    let buyer = customer(&store, "lou").await;
    let cart = store.carts.create(buyer.id, false).await.unwrap();
    let line = store
        .carts
        .add_item(cart.id, ItemRef::album(catalog.album.id), 1)
        .await
        .unwrap();
    store
        .orders
        .checkout(cart.id, BuyingType::Delivery, None)
        .await
        .unwrap();

    let deleted = store.cart_products.delete(line.id).await;
    assert!(matches!(deleted, Err(StoreError::CartInOrder(id)) if id == cart.id));
    let removed = store.carts.remove_line(line.id).await;
    assert!(matches!(removed, Err(StoreError::CartInOrder(_))));

    assert!(store.cart_products.get(line.id).await.is_ok());
    assert_eq!(store.carts.get(cart.id).await.unwrap().total_products, 1);
}
