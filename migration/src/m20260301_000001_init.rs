use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== ENTITIES ==========
        // Owning organisations and individuals
        manager
            .create_table(
                Table::create()
                    .table(Entities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Entities::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Entities::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Entities::Description).text().not_null())
                    .col(
                        ColumnDef::new(Entities::EntityType)
                            .string_len(2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Entities::Email).string_len(254).not_null())
                    .col(ColumnDef::new(Entities::Phone).string_len(16).not_null())
                    .col(ColumnDef::new(Entities::Address).text().not_null())
                    .col(
                        ColumnDef::new(Entities::Operator)
                            .string_len(150)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Entities::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .col(
                        ColumnDef::new(Entities::UpdatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== NETWORKS ==========
        manager
            .create_table(
                Table::create()
                    .table(Networks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Networks::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Networks::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Networks::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Networks::Description).text().not_null())
                    .col(
                        ColumnDef::new(Networks::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .col(
                        ColumnDef::new(Networks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_networks_owner")
                            .from(Networks::Table, Networks::OwnerId)
                            .to(Entities::Table, Entities::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== SITES ==========
        manager
            .create_table(
                Table::create()
                    .table(Sites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sites::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Sites::OwnerId).uuid().not_null())
                    .col(
                        ColumnDef::new(Sites::Code)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Sites::Description).text().not_null())
                    .col(ColumnDef::new(Sites::Address).text().not_null())
                    .col(ColumnDef::new(Sites::PostalCode).integer().not_null())
                    .col(ColumnDef::new(Sites::Town).string_len(30).not_null())
                    .col(
                        ColumnDef::new(Sites::Latitude)
                            .decimal_len(10, 7)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sites::Longitude)
                            .decimal_len(10, 7)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sites::AltitudeM).small_integer().not_null())
                    .col(
                        ColumnDef::new(Sites::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .col(
                        ColumnDef::new(Sites::UpdatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sites_owner")
                            .from(Sites::Table, Sites::OwnerId)
                            .to(Entities::Table, Entities::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== BRANDS ==========
        manager
            .create_table(
                Table::create()
                    .table(Brands::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Brands::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Brands::Name).string_len(30).not_null())
                    .col(
                        ColumnDef::new(Brands::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .col(
                        ColumnDef::new(Brands::UpdatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== INSTRUMENT MODELS ==========
        manager
            .create_table(
                Table::create()
                    .table(InstrumentModels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InstrumentModels::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(InstrumentModels::BrandId).uuid().not_null())
                    .col(
                        ColumnDef::new(InstrumentModels::Name)
                            .string_len(30)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstrumentModels::ReadingType)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstrumentModels::SensorType)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstrumentModels::Precision)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InstrumentModels::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .col(
                        ColumnDef::new(InstrumentModels::UpdatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_instrument_models_brand")
                            .from(InstrumentModels::Table, InstrumentModels::BrandId)
                            .to(Brands::Table, Brands::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== STATION MODELS ==========
        manager
            .create_table(
                Table::create()
                    .table(StationModels::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StationModels::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(StationModels::BrandId).uuid().not_null())
                    .col(
                        ColumnDef::new(StationModels::Name)
                            .string_len(40)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StationModels::Description)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StationModels::StationType)
                            .string_len(2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StationModels::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .col(
                        ColumnDef::new(StationModels::UpdatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_station_models_brand")
                            .from(StationModels::Table, StationModels::BrandId)
                            .to(Brands::Table, Brands::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== STATION MODEL INSTRUMENTS ==========
        // Many-to-many linking station models to the instruments they carry.
        // Join rows belong to the station model; the instrument side is restricted.
        manager
            .create_table(
                Table::create()
                    .table(StationModelInstruments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StationModelInstruments::StationModelId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StationModelInstruments::InstrumentModelId)
                            .uuid()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(StationModelInstruments::StationModelId)
                            .col(StationModelInstruments::InstrumentModelId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_station_model_instruments_station_model")
                            .from(
                                StationModelInstruments::Table,
                                StationModelInstruments::StationModelId,
                            )
                            .to(StationModels::Table, StationModels::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_station_model_instruments_instrument_model")
                            .from(
                                StationModelInstruments::Table,
                                StationModelInstruments::InstrumentModelId,
                            )
                            .to(InstrumentModels::Table, InstrumentModels::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== STATIONS ==========
        manager
            .create_table(
                Table::create()
                    .table(Stations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Stations::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Stations::NetworkId).uuid().not_null())
                    .col(ColumnDef::new(Stations::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Stations::SiteId).uuid().not_null())
                    .col(ColumnDef::new(Stations::StationModelId).uuid().not_null())
                    .col(ColumnDef::new(Stations::Name).string_len(100).not_null())
                    .col(
                        ColumnDef::new(Stations::DateStart)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Stations::DateEnd)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Stations::Description).text().not_null())
                    .col(
                        ColumnDef::new(Stations::AutoTransmit)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Stations::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .col(
                        ColumnDef::new(Stations::UpdatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stations_network")
                            .from(Stations::Table, Stations::NetworkId)
                            .to(Networks::Table, Networks::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stations_owner")
                            .from(Stations::Table, Stations::OwnerId)
                            .to(Entities::Table, Entities::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stations_site")
                            .from(Stations::Table, Stations::SiteId)
                            .to(Sites::Table, Sites::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stations_station_model")
                            .from(Stations::Table, Stations::StationModelId)
                            .to(StationModels::Table, StationModels::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stations_site")
                    .table(Stations::Table)
                    .col(Stations::SiteId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stations_network")
                    .table(Stations::Table)
                    .col(Stations::NetworkId)
                    .to_owned(),
            )
            .await?;

        // ========== SENSORS ==========
        manager
            .create_table(
                Table::create()
                    .table(Sensors::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sensors::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Sensors::StationId).uuid().not_null())
                    .col(
                        ColumnDef::new(Sensors::InstrumentModelId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sensors::Description).text().not_null())
                    .col(
                        ColumnDef::new(Sensors::DateStart)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sensors::DateEnd)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Sensors::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .col(
                        ColumnDef::new(Sensors::UpdatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sensors_station")
                            .from(Sensors::Table, Sensors::StationId)
                            .to(Stations::Table, Stations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sensors_instrument_model")
                            .from(Sensors::Table, Sensors::InstrumentModelId)
                            .to(InstrumentModels::Table, InstrumentModels::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_sensors_station")
                    .table(Sensors::Table)
                    .col(Sensors::StationId)
                    .to_owned(),
            )
            .await?;

        // ========== ARCHIVES ==========
        // One row per periodic weather observation record
        manager
            .create_table(
                Table::create()
                    .table(Archives::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Archives::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .extra("DEFAULT gen_random_uuid()"),
                    )
                    .col(ColumnDef::new(Archives::StationId).uuid().not_null())
                    .col(ColumnDef::new(Archives::SiteId).uuid().not_null())
                    .col(
                        ColumnDef::new(Archives::Date)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Archives::IntervalSec).integer().not_null())
                    .col(ColumnDef::new(Archives::Units).string_len(2).not_null())
                    .col(
                        ColumnDef::new(Archives::Temperature)
                            .decimal_len(4, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Archives::Temperature2)
                            .decimal_len(4, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Archives::Humidity)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Archives::Dewpoint)
                            .decimal_len(4, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Archives::Windchill)
                            .decimal_len(4, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Archives::Heatindex)
                            .decimal_len(4, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Archives::Pressure)
                            .decimal_len(5, 1)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Archives::WindDirection)
                            .decimal_len(4, 1)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Archives::Wind).decimal_len(5, 2).not_null())
                    .col(
                        ColumnDef::new(Archives::WindGust)
                            .decimal_len(5, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Archives::WindGustDir)
                            .decimal_len(5, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Archives::Wind2min)
                            .decimal_len(5, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Archives::Wind10min)
                            .decimal_len(5, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Archives::Rain).decimal_len(5, 2).not_null())
                    .col(
                        ColumnDef::new(Archives::RainRate)
                            .decimal_len(6, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Archives::UvRadiation)
                            .decimal_len(3, 1)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Archives::SolarRadiation)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Archives::Et).decimal_len(5, 2).not_null())
                    .col(
                        ColumnDef::new(Archives::CreatedAt)
                            .timestamp_with_time_zone()
                            .extra("DEFAULT NOW()"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_archives_station")
                            .from(Archives::Table, Archives::StationId)
                            .to(Stations::Table, Stations::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_archives_site")
                            .from(Archives::Table, Archives::SiteId)
                            .to(Sites::Table, Sites::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for station/time listing queries
        let db = manager.get_connection();
        db.execute_unprepared(
            "CREATE INDEX idx_archives_station_date ON archives (station_id, date DESC)",
        )
        .await?;
        db.execute_unprepared(
            "CREATE INDEX idx_archives_site_date ON archives (site_id, date DESC)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop tables in reverse order of dependencies
        manager
            .drop_table(Table::drop().table(Archives::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sensors::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Stations::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(StationModelInstruments::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(StationModels::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(InstrumentModels::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Brands::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sites::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Networks::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Entities::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Entities {
    Table,
    Id,
    Name,
    Description,
    EntityType,
    Email,
    Phone,
    Address,
    Operator,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Networks {
    Table,
    Id,
    OwnerId,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Sites {
    Table,
    Id,
    OwnerId,
    Code,
    Description,
    Address,
    PostalCode,
    Town,
    Latitude,
    Longitude,
    AltitudeM,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Brands {
    Table,
    Id,
    Name,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum InstrumentModels {
    Table,
    Id,
    BrandId,
    Name,
    ReadingType,
    SensorType,
    Precision,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum StationModels {
    Table,
    Id,
    BrandId,
    Name,
    Description,
    StationType,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StationModelInstruments {
    Table,
    StationModelId,
    InstrumentModelId,
}

#[derive(DeriveIden)]
pub enum Stations {
    Table,
    Id,
    NetworkId,
    OwnerId,
    SiteId,
    StationModelId,
    Name,
    DateStart,
    DateEnd,
    Description,
    AutoTransmit,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum Sensors {
    Table,
    Id,
    StationId,
    InstrumentModelId,
    Description,
    DateStart,
    DateEnd,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Archives {
    Table,
    Id,
    StationId,
    SiteId,
    Date,
    IntervalSec,
    Units,
    Temperature,
    Temperature2,
    Humidity,
    Dewpoint,
    Windchill,
    Heatindex,
    Pressure,
    WindDirection,
    Wind,
    WindGust,
    WindGustDir,
    Wind2min,
    Wind10min,
    Rain,
    RainRate,
    UvRadiation,
    SolarRadiation,
    Et,
    CreatedAt,
}
