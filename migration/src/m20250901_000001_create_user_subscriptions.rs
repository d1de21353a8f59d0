use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum UserSubscriptions {
    Table,
    Id,
    ServiceName,
    MonthlyPrice,
    UserId,
    StartDate,
    EndDate,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserSubscriptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UserSubscriptions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(UserSubscriptions::ServiceName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserSubscriptions::MonthlyPrice)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(UserSubscriptions::UserId)
                            .string_len(36)
                            .not_null(),
                    )
                    .col(ColumnDef::new(UserSubscriptions::StartDate).date().not_null())
                    // NULL means the subscription is still running
                    .col(ColumnDef::new(UserSubscriptions::EndDate).date().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_user_subscriptions_user_id")
                    .table(UserSubscriptions::Table)
                    .col(UserSubscriptions::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(UserSubscriptions::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
