use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    PasswordHash,
    IsAdmin,
    CreatedAt,
}

/// Prize inventory. `quantity` never goes below zero.
#[derive(DeriveIden)]
enum Prizes {
    Table,
    Id,
    Name,
    Quantity,
    CreatedAt,
    UpdatedAt,
}

/// One row per winning draw.
#[derive(DeriveIden)]
enum UserPrizes {
    Table,
    Id,
    UserId,
    PrizeId,
    PrizeName,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Initial prize stock for the demo:
/// - Grand Prize x1
/// - Second Prize x5
/// - Third Prize x20
/// - Souvenir x100
const SEED_PRIZES: [(&str, i32); 4] = [
    ("Grand Prize", 1),
    ("Second Prize", 5),
    ("Third Prize", 20),
    ("Souvenir", 100),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Users::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Prizes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Prizes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Prizes::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Prizes::Quantity)
                            .integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Prizes::Quantity).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Prizes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Prizes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(UserPrizes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserPrizes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(UserPrizes::UserId).integer().not_null())
                    .col(ColumnDef::new(UserPrizes::PrizeId).integer().not_null())
                    .col(
                        ColumnDef::new(UserPrizes::PrizeName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserPrizes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // no ON DELETE CASCADE: win history outlives prize config
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_prizes_prize")
                            .from(UserPrizes::Table, UserPrizes::PrizeId)
                            .to(Prizes::Table, Prizes::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_prizes_user")
                    .table(UserPrizes::Table)
                    .col(UserPrizes::UserId)
                    .to_owned(),
            )
            .await?;

        let mut insert = Query::insert();
        insert
            .into_table(Prizes::Table)
            .columns([Prizes::Name, Prizes::Quantity]);
        for (name, quantity) in SEED_PRIZES {
            insert.values_panic([name.into(), quantity.into()]);
        }
        let conn = manager.get_connection();
        conn.execute(conn.get_database_backend().build(&insert))
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().if_exists().table(UserPrizes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().if_exists().table(Prizes::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().if_exists().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}
