use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_reference_tables::Migration),
            Box::new(m20240101_000002_create_service_order_tables::Migration),
        ]
    }
}

mod m20240101_000001_create_reference_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_reference_tables"
        }
    }

    fn id_col<T: IntoIden>(col: T) -> ColumnDef {
        ColumnDef::new(col)
            .integer()
            .not_null()
            .auto_increment()
            .primary_key()
            .to_owned()
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Categories::Table)
                        .if_not_exists()
                        .col(id_col(Categories::Id))
                        .col(ColumnDef::new(Categories::Name).string().not_null())
                        .col(ColumnDef::new(Categories::Unit).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Roles::Table)
                        .if_not_exists()
                        .col(id_col(Roles::Id))
                        .col(ColumnDef::new(Roles::Name).string().not_null())
                        .col(ColumnDef::new(Roles::Description).text().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(id_col(Suppliers::Id))
                        .col(ColumnDef::new(Suppliers::TradeName).string().not_null())
                        .col(ColumnDef::new(Suppliers::BusinessType).string().not_null())
                        .col(ColumnDef::new(Suppliers::CellNumber).string().not_null())
                        .col(ColumnDef::new(Suppliers::Email).string().not_null())
                        .col(ColumnDef::new(Suppliers::Country).string().not_null())
                        .col(ColumnDef::new(Suppliers::State).string().not_null())
                        .col(ColumnDef::new(Suppliers::City).string().not_null())
                        .col(ColumnDef::new(Suppliers::ContactName).string().not_null())
                        .col(
                            ColumnDef::new(Suppliers::ContactCellPhone)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Suppliers::Address).string().null())
                        .col(ColumnDef::new(Suppliers::PostalCode).string().null())
                        .col(ColumnDef::new(Suppliers::Website).string().null())
                        .col(ColumnDef::new(Suppliers::BillingName).string().null())
                        .col(ColumnDef::new(Suppliers::BillingNumber).string().null())
                        .col(ColumnDef::new(Suppliers::BillingAddress).string().null())
                        .col(ColumnDef::new(Suppliers::Notes).text().null())
                        .col(
                            ColumnDef::new(Suppliers::ContactAreaOrPosition)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(Suppliers::ContactEmail).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(id_col(Clients::Id))
                        .col(ColumnDef::new(Clients::TradeName).string().not_null())
                        .col(ColumnDef::new(Clients::BusinessType).string().not_null())
                        .col(ColumnDef::new(Clients::PhoneOrCell).string().not_null())
                        .col(ColumnDef::new(Clients::Email).string().not_null())
                        .col(ColumnDef::new(Clients::Street).string().not_null())
                        .col(ColumnDef::new(Clients::Number).string().not_null())
                        .col(ColumnDef::new(Clients::Neighborhood).string().null())
                        .col(ColumnDef::new(Clients::PostalCode).string().null())
                        .col(ColumnDef::new(Clients::City).string().not_null())
                        .col(ColumnDef::new(Clients::Country).string().not_null())
                        .col(ColumnDef::new(Clients::State).string().not_null())
                        .col(ColumnDef::new(Clients::ContactName).string().not_null())
                        .col(
                            ColumnDef::new(Clients::ContactCellPhone)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Clients::ContactEmail).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Contacts::Table)
                        .if_not_exists()
                        .col(id_col(Contacts::Id))
                        .col(ColumnDef::new(Contacts::Name).string().not_null())
                        .col(ColumnDef::new(Contacts::LastName).string().not_null())
                        .col(ColumnDef::new(Contacts::Position).string().not_null())
                        .col(ColumnDef::new(Contacts::CellNumber).string().not_null())
                        .col(ColumnDef::new(Contacts::Email).string().not_null())
                        .col(ColumnDef::new(Contacts::PhoneNumber).string().null())
                        .col(ColumnDef::new(Contacts::Street).string().null())
                        .col(ColumnDef::new(Contacts::Number).string().null())
                        .col(ColumnDef::new(Contacts::Neighborhood).string().null())
                        .col(ColumnDef::new(Contacts::Country).string().null())
                        .col(ColumnDef::new(Contacts::State).string().null())
                        .col(ColumnDef::new(Contacts::City).string().null())
                        .col(ColumnDef::new(Contacts::PostalCode).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Personnel::Table)
                        .if_not_exists()
                        .col(id_col(Personnel::Id))
                        .col(ColumnDef::new(Personnel::Name).string().not_null())
                        .col(ColumnDef::new(Personnel::LastName).string().not_null())
                        .col(ColumnDef::new(Personnel::RoleId).integer().not_null())
                        .col(ColumnDef::new(Personnel::Email).string().not_null())
                        .col(ColumnDef::new(Personnel::Phone).string().null())
                        .col(ColumnDef::new(Personnel::CellNumber).string().not_null())
                        .col(ColumnDef::new(Personnel::Country).string().not_null())
                        .col(ColumnDef::new(Personnel::State).string().not_null())
                        .col(ColumnDef::new(Personnel::City).string().not_null())
                        .col(ColumnDef::new(Personnel::Address).string().not_null())
                        .col(ColumnDef::new(Personnel::PasswordHash).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_personnel_email")
                        .table(Personnel::Table)
                        .col(Personnel::Email)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Products::Table)
                        .if_not_exists()
                        .col(id_col(Products::Id))
                        .col(ColumnDef::new(Products::Name).string().not_null())
                        .col(ColumnDef::new(Products::CategoryId).integer().not_null())
                        .col(ColumnDef::new(Products::Description).text().not_null())
                        .col(ColumnDef::new(Products::SalePrice).decimal().not_null())
                        .col(ColumnDef::new(Products::Model).string().null())
                        .col(ColumnDef::new(Products::FactoryCode).string().null())
                        .col(ColumnDef::new(Products::SupplierId).integer().not_null())
                        .col(
                            ColumnDef::new(Products::ManufacturerBrand)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Products::InitialStock).decimal().not_null())
                        .col(ColumnDef::new(Products::MinimumStock).decimal().not_null())
                        .col(
                            ColumnDef::new(Products::Stock)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Products::ProductImage).text().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_products_category_id")
                        .table(Products::Table)
                        .col(Products::CategoryId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Services::Table)
                        .if_not_exists()
                        .col(id_col(Services::Id))
                        .col(ColumnDef::new(Services::Name).string().not_null())
                        .col(ColumnDef::new(Services::CategoryId).integer().not_null())
                        .col(ColumnDef::new(Services::SalePrice).decimal().not_null())
                        .col(ColumnDef::new(Services::Description).text().not_null())
                        .col(ColumnDef::new(Services::SatUnit).string().null())
                        .col(ColumnDef::new(Services::SatCode).string().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Services::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Products::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Personnel::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Contacts::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Roles::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Categories::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Categories {
        Table,
        Id,
        Name,
        Unit,
    }

    #[derive(DeriveIden)]
    enum Roles {
        Table,
        Id,
        Name,
        Description,
    }

    #[derive(DeriveIden)]
    enum Suppliers {
        Table,
        Id,
        TradeName,
        BusinessType,
        CellNumber,
        Email,
        Country,
        State,
        City,
        ContactName,
        ContactCellPhone,
        Address,
        PostalCode,
        Website,
        BillingName,
        BillingNumber,
        BillingAddress,
        Notes,
        ContactAreaOrPosition,
        ContactEmail,
    }

    #[derive(DeriveIden)]
    enum Clients {
        Table,
        Id,
        TradeName,
        BusinessType,
        PhoneOrCell,
        Email,
        Street,
        Number,
        Neighborhood,
        PostalCode,
        City,
        Country,
        State,
        ContactName,
        ContactCellPhone,
        ContactEmail,
    }

    #[derive(DeriveIden)]
    enum Contacts {
        Table,
        Id,
        Name,
        LastName,
        Position,
        CellNumber,
        Email,
        PhoneNumber,
        Street,
        Number,
        Neighborhood,
        Country,
        State,
        City,
        PostalCode,
    }

    #[derive(DeriveIden)]
    enum Personnel {
        Table,
        Id,
        Name,
        LastName,
        RoleId,
        Email,
        Phone,
        CellNumber,
        Country,
        State,
        City,
        Address,
        PasswordHash,
    }

    #[derive(DeriveIden)]
    enum Products {
        Table,
        Id,
        Name,
        CategoryId,
        Description,
        SalePrice,
        Model,
        FactoryCode,
        SupplierId,
        ManufacturerBrand,
        InitialStock,
        MinimumStock,
        Stock,
        ProductImage,
    }

    #[derive(DeriveIden)]
    enum Services {
        Table,
        Id,
        Name,
        CategoryId,
        SalePrice,
        Description,
        SatUnit,
        SatCode,
    }
}

mod m20240101_000002_create_service_order_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_service_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ServiceOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ServiceOrders::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(ServiceOrders::ClientId).integer().not_null())
                        .col(ColumnDef::new(ServiceOrders::ServiceId).integer().not_null())
                        .col(ColumnDef::new(ServiceOrders::ContactName).string().not_null())
                        .col(ColumnDef::new(ServiceOrders::ContactPhone).string().not_null())
                        .col(ColumnDef::new(ServiceOrders::ContactEmail).string().not_null())
                        .col(ColumnDef::new(ServiceOrders::ScheduledDate).date().not_null())
                        .col(ColumnDef::new(ServiceOrders::StartTime).time().null())
                        .col(ColumnDef::new(ServiceOrders::EndTime).time().null())
                        .col(ColumnDef::new(ServiceOrders::Price).decimal().not_null())
                        .col(ColumnDef::new(ServiceOrders::Activities).text().not_null())
                        .col(ColumnDef::new(ServiceOrders::Recommendations).text().null())
                        .col(ColumnDef::new(ServiceOrders::Files).text().null())
                        .col(
                            ColumnDef::new(ServiceOrders::State)
                                .string_len(20)
                                .not_null()
                                .default("pending"),
                        )
                        .col(ColumnDef::new(ServiceOrders::CancelReason).text().null())
                        .col(
                            ColumnDef::new(ServiceOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceOrders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_service_orders_scheduled_date")
                        .table(ServiceOrders::Table)
                        .col(ServiceOrders::ScheduledDate)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ServiceOrderProducts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ServiceOrderProducts::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ServiceOrderProducts::ServiceOrderId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceOrderProducts::ProductId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceOrderProducts::QuantityUsed)
                                .decimal()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_service_order_products_service_order_id")
                                .from(
                                    ServiceOrderProducts::Table,
                                    ServiceOrderProducts::ServiceOrderId,
                                )
                                .to(ServiceOrders::Table, ServiceOrders::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_service_order_products_order_id")
                        .table(ServiceOrderProducts::Table)
                        .col(ServiceOrderProducts::ServiceOrderId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ServiceOrderPersonnel::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ServiceOrderPersonnel::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ServiceOrderPersonnel::ServiceOrderId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ServiceOrderPersonnel::PersonnelId)
                                .integer()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_service_order_personnel_service_order_id")
                                .from(
                                    ServiceOrderPersonnel::Table,
                                    ServiceOrderPersonnel::ServiceOrderId,
                                )
                                .to(ServiceOrders::Table, ServiceOrders::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_service_order_personnel_order_id")
                        .table(ServiceOrderPersonnel::Table)
                        .col(ServiceOrderPersonnel::ServiceOrderId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ServiceOrderPersonnel::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ServiceOrderProducts::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ServiceOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ServiceOrders {
        Table,
        Id,
        ClientId,
        ServiceId,
        ContactName,
        ContactPhone,
        ContactEmail,
        ScheduledDate,
        StartTime,
        EndTime,
        Price,
        Activities,
        Recommendations,
        Files,
        State,
        CancelReason,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum ServiceOrderProducts {
        Table,
        Id,
        ServiceOrderId,
        ProductId,
        QuantityUsed,
    }

    #[derive(DeriveIden)]
    enum ServiceOrderPersonnel {
        Table,
        Id,
        ServiceOrderId,
        PersonnelId,
    }
}
