use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 预开票：客户信息在此归档，避免后续资料变更影响票据
        manager
            .create_table(
                Table::create()
                    .table(PreInvoices::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PreInvoices::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PreInvoices::UserId).big_integer().not_null())
                    .col(ColumnDef::new(PreInvoices::ClientName).string().null())
                    .col(ColumnDef::new(PreInvoices::ClientIdnumber).string().null())
                    .col(ColumnDef::new(PreInvoices::ClientAddress).string().null())
                    .col(ColumnDef::new(PreInvoices::ClientEmail).string().null())
                    .col(
                        ColumnDef::new(PreInvoices::CompanyId)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(PreInvoices::InvoiceNumber).string().null())
                    .col(ColumnDef::new(PreInvoices::CreatedAt).big_integer().null())
                    .col(ColumnDef::new(PreInvoices::UpdatedAt).big_integer().null())
                    .col(ColumnDef::new(PreInvoices::DeletedAt).big_integer().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PreInvoiceDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PreInvoiceDetails::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PreInvoiceDetails::PreInvoiceId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PreInvoiceDetails::ProductName)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PreInvoiceDetails::Price)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PreInvoiceDetails::CreatedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PreInvoiceDetails::UpdatedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(PreInvoiceDetails::DeletedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PreInvoiceDetails::Table, PreInvoiceDetails::PreInvoiceId)
                            .to(PreInvoices::Table, PreInvoices::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PreInvoiceDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PreInvoices::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum PreInvoices {
    #[sea_orm(iden = "pre_invoices")]
    Table,
    Id,
    UserId,
    ClientName,
    ClientIdnumber,
    ClientAddress,
    ClientEmail,
    CompanyId,
    InvoiceNumber,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden)]
enum PreInvoiceDetails {
    #[sea_orm(iden = "pre_invoice_details")]
    Table,
    Id,
    PreInvoiceId,
    ProductName,
    Price,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
