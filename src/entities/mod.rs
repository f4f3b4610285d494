pub mod album;
pub mod artist;
pub mod artist_member;
pub mod cart;
pub mod cart_product;
pub mod customer;
pub mod genre;
pub mod media_type;
pub mod member;
pub mod order;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema, Set, TransactionTrait,
};
use tracing::{info, instrument};

use crate::entities::{
    album::Entity as Album, artist::Entity as Artist, artist_member::Entity as ArtistMember,
    cart::Entity as Cart, cart_product::Entity as CartProduct, customer::Entity as Customer,
    genre::Entity as Genre, media_type::Entity as MediaType, member::Entity as Member,
    order::Entity as Order,
};

async fn create_table<C, E>(db: &C, schema: &Schema, entity: E) -> Result<(), DbErr>
where
    C: ConnectionTrait,
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(backend.build(&statement)).await?;
    Ok(())
}

/// Creates every table, parents before children. Safe to call on an
/// already initialised database.
#[instrument(skip(db))]
pub async fn setup_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let schema = Schema::new(db.get_database_backend());

    create_table(db, &schema, MediaType).await?;
    create_table(db, &schema, Genre).await?;
    create_table(db, &schema, Member).await?;
    create_table(db, &schema, Artist).await?;
    create_table(db, &schema, ArtistMember).await?;
    create_table(db, &schema, Album).await?;
    create_table(db, &schema, Customer).await?;
    create_table(db, &schema, Cart).await?;
    create_table(db, &schema, CartProduct).await?;
    create_table(db, &schema, Order).await?;

    info!("schema ready");
    Ok(())
}

/// Fills an empty database with a small catalog and one customer, all in
/// one transaction.
#[instrument(skip(db))]
pub async fn seed_demo_catalog(db: &DatabaseConnection) -> Result<(), DbErr> {
    let txn = db.begin().await?;

    let cd = MediaType::insert(media_type::ActiveModel {
        name: Set("CD".to_owned()),
        ..Default::default()
    })
    .exec(&txn)
    .await?
    .last_insert_id;
    let vinyl = MediaType::insert(media_type::ActiveModel {
        name: Set("Vinyl".to_owned()),
        ..Default::default()
    })
    .exec(&txn)
    .await?
    .last_insert_id;

    let rock = Genre::insert(genre::ActiveModel {
        name: Set("Rock".to_owned()),
        slug: Set("rock".to_owned()),
        ..Default::default()
    })
    .exec(&txn)
    .await?
    .last_insert_id;

    let band = Artist::insert(artist::ActiveModel {
        name: Set("The Example Band".to_owned()),
        genre_id: Set(rock),
        slug: Set("the-example-band".to_owned()),
        ..Default::default()
    })
    .exec(&txn)
    .await?
    .last_insert_id;

    let members = [("Alex Stone", "alex-stone"), ("Sam Reed", "sam-reed")];
    for (name, slug) in members {
        let member_id = Member::insert(member::ActiveModel {
            name: Set(name.to_owned()),
            slug: Set(slug.to_owned()),
            ..Default::default()
        })
        .exec(&txn)
        .await?
        .last_insert_id;
        ArtistMember::insert(artist_member::ActiveModel {
            artist_id: Set(band),
            member_id: Set(member_id),
        })
        .exec_without_returning(&txn)
        .await?;
    }

    let albums = [
        ("First Light", cd, (2019, 3, 1), Decimal::new(1999, 2), false),
        ("Second Wind", vinyl, (2022, 10, 14), Decimal::new(3450, 2), true),
    ];
    for (name, media_type_id, (y, m, d), price, offer) in albums {
        let release_date = NaiveDate::from_ymd_opt(y, m, d)
            .ok_or_else(|| DbErr::Custom(format!("invalid seed date {y}-{m}-{d}")))?;
        Album::insert(album::ActiveModel {
            artist_id: Set(band),
            name: Set(name.to_owned()),
            media_type_id: Set(media_type_id),
            song_list: Set("1. Intro\n2. Outro".to_owned()),
            release_date: Set(release_date),
            description: Set(album::DEFAULT_DESCRIPTION.to_owned()),
            stock: Set(album::DEFAULT_STOCK),
            price: Set(price),
            offer_of_the_week: Set(offer),
            ..Default::default()
        })
        .exec(&txn)
        .await?;
    }

    Customer::insert(customer::ActiveModel {
        name: Set("demo".to_owned()),
        address: Set(None),
        ..Default::default()
    })
    .exec(&txn)
    .await?;

    txn.commit().await?;
    info!("demo catalog seeded");
    Ok(())
}
