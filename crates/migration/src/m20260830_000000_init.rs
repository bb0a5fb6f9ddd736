//! Initial schema migration - creates all tables from scratch.
//!
//! It creates the complete schema for Promessa:
//!
//! - `users`: authentication
//! - `weddings`: wedding profiles owned by couple accounts
//! - `vendors`: service provider profiles (one per account)
//! - `bookings`: vendor bookings against a wedding
//! - `budget_lines`: the budget ledger, one line per category per wedding

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Username,
    Password,
}

#[derive(Iden)]
enum Weddings {
    Table,
    Id,
    CoupleId,
    BrideName,
    GroomName,
    WeddingDate,
    Venue,
    City,
    TotalBudgetMinor,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum Vendors {
    Table,
    Id,
    UserId,
    BusinessName,
    Category,
    City,
    CreatedAt,
}

#[derive(Iden)]
enum Bookings {
    Table,
    Id,
    WeddingId,
    VendorId,
    VendorName,
    ContactPerson,
    Email,
    Phone,
    Address,
    ServiceType,
    EventDate,
    Status,
    TotalAmountMinor,
    AdvancePaidMinor,
    FinalPaidMinor,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum BudgetLines {
    Table,
    Id,
    WeddingId,
    Category,
    EstimatedCostMinor,
    ActualCostMinor,
    Notes,
    CreatedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Users::Password).string().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Weddings
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Weddings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Weddings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Weddings::CoupleId).string().not_null())
                    .col(ColumnDef::new(Weddings::BrideName).string().not_null())
                    .col(ColumnDef::new(Weddings::GroomName).string().not_null())
                    .col(ColumnDef::new(Weddings::WeddingDate).date().not_null())
                    .col(ColumnDef::new(Weddings::Venue).string())
                    .col(ColumnDef::new(Weddings::City).string())
                    .col(
                        ColumnDef::new(Weddings::TotalBudgetMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Weddings::Notes).string())
                    .col(ColumnDef::new(Weddings::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-weddings-couple_id")
                            .from(Weddings::Table, Weddings::CoupleId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-weddings-couple_id")
                    .table(Weddings::Table)
                    .col(Weddings::CoupleId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Vendors
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Vendors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Vendors::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Vendors::UserId).string().not_null())
                    .col(ColumnDef::new(Vendors::BusinessName).string().not_null())
                    .col(ColumnDef::new(Vendors::Category).string().not_null())
                    .col(ColumnDef::new(Vendors::City).string())
                    .col(ColumnDef::new(Vendors::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-vendors-user_id")
                            .from(Vendors::Table, Vendors::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-vendors-user_id-unique")
                    .table(Vendors::Table)
                    .col(Vendors::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Bookings
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Bookings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Bookings::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Bookings::WeddingId).string().not_null())
                    .col(ColumnDef::new(Bookings::VendorId).string())
                    .col(ColumnDef::new(Bookings::VendorName).string())
                    .col(ColumnDef::new(Bookings::ContactPerson).string())
                    .col(ColumnDef::new(Bookings::Email).string())
                    .col(ColumnDef::new(Bookings::Phone).string())
                    .col(ColumnDef::new(Bookings::Address).string())
                    .col(ColumnDef::new(Bookings::ServiceType).string().not_null())
                    .col(ColumnDef::new(Bookings::EventDate).date().not_null())
                    .col(
                        ColumnDef::new(Bookings::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Bookings::TotalAmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Bookings::AdvancePaidMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Bookings::FinalPaidMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Bookings::Notes).string())
                    .col(ColumnDef::new(Bookings::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bookings-wedding_id")
                            .from(Bookings::Table, Bookings::WeddingId)
                            .to(Weddings::Table, Weddings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bookings-vendor_id")
                            .from(Bookings::Table, Bookings::VendorId)
                            .to(Vendors::Table, Vendors::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bookings-wedding_id-status")
                    .table(Bookings::Table)
                    .col(Bookings::WeddingId)
                    .col(Bookings::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bookings-vendor_id")
                    .table(Bookings::Table)
                    .col(Bookings::VendorId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Budget lines
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BudgetLines::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BudgetLines::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BudgetLines::WeddingId).string().not_null())
                    .col(ColumnDef::new(BudgetLines::Category).string().not_null())
                    .col(
                        ColumnDef::new(BudgetLines::EstimatedCostMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BudgetLines::ActualCostMinor)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(BudgetLines::Notes).string())
                    .col(
                        ColumnDef::new(BudgetLines::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budget_lines-wedding_id")
                            .from(BudgetLines::Table, BudgetLines::WeddingId)
                            .to(Weddings::Table, Weddings::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One budget line per category per wedding.
        manager
            .create_index(
                Index::create()
                    .name("idx-budget_lines-wedding_id-category-unique")
                    .table(BudgetLines::Table)
                    .col(BudgetLines::WeddingId)
                    .col(BudgetLines::Category)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BudgetLines::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bookings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Vendors::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Weddings::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
