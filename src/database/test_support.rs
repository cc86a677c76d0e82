//! In-memory SQLite databases for tests.

use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    Schema, Set,
};

use std::path::Path;

use crate::entities::{prize_entity as prizes, user_entity as users, user_prize_entity as user_prizes};

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) {
    let schema = Schema::new(db.get_database_backend());
    let stmt = schema.create_table_from_entity(entity);
    db.execute(db.get_database_backend().build(&stmt))
        .await
        .expect("create test table");
}

/// Fresh database with every table and no rows.
///
/// Each pooled connection to `sqlite::memory:` opens its own database, so the
/// pool is pinned to one connection.
pub async fn setup_test_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("connect to in-memory sqlite");
    create_tables(&db).await;
    db
}

/// File-backed database whose pool really hands out several connections.
pub async fn setup_file_test_db(path: &Path, max_connections: u32) -> DatabaseConnection {
    let mut opt = ConnectOptions::new(format!("sqlite://{}?mode=rwc", path.display()));
    opt.max_connections(max_connections).sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("connect to file sqlite");
    create_tables(&db).await;
    db
}

async fn create_tables(db: &DatabaseConnection) {
    create_table(db, users::Entity).await;
    create_table(db, prizes::Entity).await;
    create_table(db, user_prizes::Entity).await;
}

/// Returns the new prize id.
pub async fn insert_prize(db: &DatabaseConnection, name: &str, quantity: i32) -> i32 {
    prizes::ActiveModel {
        name: Set(name.to_string()),
        quantity: Set(quantity),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("insert test prize")
    .id
}

pub async fn prize_quantity(db: &DatabaseConnection, prize_id: i32) -> i32 {
    prizes::Entity::find_by_id(prize_id)
        .one(db)
        .await
        .expect("query test prize")
        .expect("test prize exists")
        .quantity
}
