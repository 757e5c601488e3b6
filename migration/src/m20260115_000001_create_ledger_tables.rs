use sea_orm_migration::prelude::*;
use sea_orm_migration::prelude::extension::postgres::Type;

#[derive(DeriveIden)]
enum Commissions {
    Table,
    Id,
    OrderId,
    ProductId,
    UserId,
    ProductPrice,
    CommissionRateBps,
    CommissionAmount,
    Status,
    PaymentReference,
    Notes,
    CreatedAt,
    UpdatedAt,
    PaidAt,
}

#[derive(DeriveIden)]
enum WithdrawalRequests {
    Table,
    Id,
    UserId,
    Amount,
    PaymentMethod,
    PaymentDetails,
    Status,
    AdminNotes,
    RejectionReason,
    TransactionId,
    ProcessedBy,
    CreatedAt,
    UpdatedAt,
    ApprovedAt,
    RejectedAt,
    CompletedAt,
}

#[derive(DeriveIden)]
enum PromoterAccounts {
    Table,
    Id,
    UserId,
    Version,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AuditLogs {
    Table,
    Id,
    ActorId,
    SubjectType,
    SubjectId,
    PreviousStatus,
    NewStatus,
    Notes,
    TransactionId,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create enum types for ledger statuses
        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("commission_status"))
                    .values(vec![
                        Alias::new("pending"),
                        Alias::new("approved"),
                        Alias::new("rejected"),
                        Alias::new("paid"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("withdrawal_status"))
                    .values(vec![
                        Alias::new("pending"),
                        Alias::new("approved"),
                        Alias::new("rejected"),
                        Alias::new("completed"),
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("payment_method"))
                    .values(vec![Alias::new("paypal"), Alias::new("bank_transfer")])
                    .to_owned(),
            )
            .await?;

        manager
            .create_type(
                Type::create()
                    .as_enum(Alias::new("audit_subject_type"))
                    .values(vec![Alias::new("commission"), Alias::new("withdrawal")])
                    .to_owned(),
            )
            .await?;

        // Commissions: one row per attributed sale, amounts in cents
        manager
            .create_table(
                Table::create()
                    .table(Commissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Commissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Commissions::OrderId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Commissions::ProductId).string().not_null())
                    .col(ColumnDef::new(Commissions::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Commissions::ProductPrice)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Commissions::CommissionRateBps)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Commissions::CommissionAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Commissions::Status)
                            .custom(Alias::new("commission_status"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(Commissions::PaymentReference).string().null())
                    .col(ColumnDef::new(Commissions::Notes).text().null())
                    .col(
                        ColumnDef::new(Commissions::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Commissions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Commissions::PaidAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Withdrawal requests: amount reservations against the wallet
        manager
            .create_table(
                Table::create()
                    .table(WithdrawalRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WithdrawalRequests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WithdrawalRequests::UserId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WithdrawalRequests::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WithdrawalRequests::PaymentMethod)
                            .custom(Alias::new("payment_method"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WithdrawalRequests::PaymentDetails)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(WithdrawalRequests::Status)
                            .custom(Alias::new("withdrawal_status"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(WithdrawalRequests::AdminNotes).text().null())
                    .col(
                        ColumnDef::new(WithdrawalRequests::RejectionReason)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WithdrawalRequests::TransactionId)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WithdrawalRequests::ProcessedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WithdrawalRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(WithdrawalRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(WithdrawalRequests::ApprovedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WithdrawalRequests::RejectedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(WithdrawalRequests::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Promoter accounts: optimistic lock anchor, one row per promoter
        manager
            .create_table(
                Table::create()
                    .table(PromoterAccounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PromoterAccounts::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PromoterAccounts::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(PromoterAccounts::Version)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PromoterAccounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PromoterAccounts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Audit logs: append-only transition trail
        manager
            .create_table(
                Table::create()
                    .table(AuditLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AuditLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AuditLogs::ActorId).big_integer().not_null())
                    .col(
                        ColumnDef::new(AuditLogs::SubjectType)
                            .custom(Alias::new("audit_subject_type"))
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AuditLogs::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AuditLogs::PreviousStatus)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AuditLogs::NewStatus).string().not_null())
                    .col(ColumnDef::new(AuditLogs::Notes).text().null())
                    .col(ColumnDef::new(AuditLogs::TransactionId).string().null())
                    .col(
                        ColumnDef::new(AuditLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create indexes
        manager
            .create_index(
                Index::create()
                    .name("idx_commissions_user_id")
                    .table(Commissions::Table)
                    .col(Commissions::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_commissions_status")
                    .table(Commissions::Table)
                    .col(Commissions::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_commissions_order_id")
                    .table(Commissions::Table)
                    .col(Commissions::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_withdrawal_requests_user_id")
                    .table(WithdrawalRequests::Table)
                    .col(WithdrawalRequests::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_withdrawal_requests_status")
                    .table(WithdrawalRequests::Table)
                    .col(WithdrawalRequests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_logs_subject")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::SubjectType)
                    .col(AuditLogs::SubjectId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PromoterAccounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WithdrawalRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Commissions::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(Alias::new("audit_subject_type")).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("payment_method")).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("withdrawal_status")).to_owned())
            .await?;
        manager
            .drop_type(Type::drop().name(Alias::new("commission_status")).to_owned())
            .await?;

        Ok(())
    }
}
