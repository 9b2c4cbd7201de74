//! Migration: Create the access-administration schema.
//!
//! Five entity tables, two join tables and the append-only audit log.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Branches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Branches::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Branches::SolId)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Branches::Name)
                            .string_len(120)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Branches::Active)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Branches::Deleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Branches::CreatedOn)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Roles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Roles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Roles::Name)
                            .string_len(120)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Roles::Description).text().null())
                    .col(
                        ColumnDef::new(Roles::Deleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PermissionSets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PermissionSets::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PermissionSets::Name)
                            .string_len(80)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(PermissionSets::Description).text().null())
                    .col(
                        ColumnDef::new(PermissionSets::Locked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PermissionSets::Deleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Permissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Permissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Permissions::Name)
                            .string_len(80)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Permissions::Description).text().null())
                    .col(
                        ColumnDef::new(Permissions::Locked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string_len(80)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::FirstName).text().not_null())
                    .col(ColumnDef::new(Users::LastName).text().not_null())
                    .col(ColumnDef::new(Users::Gender).string_len(10).not_null())
                    .col(
                        ColumnDef::new(Users::PfNo)
                            .string_len(10)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Email).text().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).text().not_null())
                    .col(ColumnDef::new(Users::BranchId).big_integer().not_null())
                    .col(ColumnDef::new(Users::RoleId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Users::Active)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::Verified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::Deleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::LoggedIn)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Users::VerifiedBy).string_len(80).null())
                    .col(ColumnDef::new(Users::CreatedBy).string_len(80).not_null())
                    .col(
                        ColumnDef::new(Users::CreatedOn)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Users::ModifiedBy).string_len(80).null())
                    .col(
                        ColumnDef::new(Users::ModifiedOn)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_branch")
                            .from(Users::Table, Users::BranchId)
                            .to(Branches::Table, Branches::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_role")
                            .from(Users::Table, Users::RoleId)
                            .to(Roles::Table, Roles::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RolePermissionSets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RolePermissionSets::RoleId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RolePermissionSets::PermissionSetId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(RolePermissionSets::RoleId)
                            .col(RolePermissionSets::PermissionSetId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_sets_role")
                            .from(RolePermissionSets::Table, RolePermissionSets::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_role_sets_set")
                            .from(
                                RolePermissionSets::Table,
                                RolePermissionSets::PermissionSetId,
                            )
                            .to(PermissionSets::Table, PermissionSets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PermissionSetPermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PermissionSetPermissions::PermissionSetId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PermissionSetPermissions::PermissionId)
                            .big_integer()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(PermissionSetPermissions::PermissionSetId)
                            .col(PermissionSetPermissions::PermissionId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_set_permissions_set")
                            .from(
                                PermissionSetPermissions::Table,
                                PermissionSetPermissions::PermissionSetId,
                            )
                            .to(PermissionSets::Table, PermissionSets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_set_permissions_permission")
                            .from(
                                PermissionSetPermissions::Table,
                                PermissionSetPermissions::PermissionId,
                            )
                            .to(Permissions::Table, Permissions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

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
                    .col(ColumnDef::new(AuditLogs::Action).text().not_null())
                    .col(
                        ColumnDef::new(AuditLogs::IpAddress)
                            .string_len(45)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AuditLogs::LoggedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AuditLogs::UserId).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_audit_logs_user")
                            .from(AuditLogs::Table, AuditLogs::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_audit_logs_logged_at")
                    .table(AuditLogs::Table)
                    .col(AuditLogs::LoggedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AuditLogs::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(PermissionSetPermissions::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(RolePermissionSets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Permissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PermissionSets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Roles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Branches::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Branches {
    Table,
    Id,
    SolId,
    Name,
    Active,
    Deleted,
    CreatedOn,
}

#[derive(Iden)]
enum Roles {
    Table,
    Id,
    Name,
    Description,
    Deleted,
}

#[derive(Iden)]
enum PermissionSets {
    Table,
    Id,
    Name,
    Description,
    Locked,
    Deleted,
}

#[derive(Iden)]
enum Permissions {
    Table,
    Id,
    Name,
    Description,
    Locked,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Username,
    FirstName,
    LastName,
    Gender,
    PfNo,
    Email,
    PasswordHash,
    BranchId,
    RoleId,
    Active,
    Verified,
    Deleted,
    LoggedIn,
    VerifiedBy,
    CreatedBy,
    CreatedOn,
    ModifiedBy,
    ModifiedOn,
}

#[derive(Iden)]
enum RolePermissionSets {
    Table,
    RoleId,
    PermissionSetId,
}

#[derive(Iden)]
enum PermissionSetPermissions {
    Table,
    PermissionSetId,
    PermissionId,
}

#[derive(Iden)]
enum AuditLogs {
    Table,
    Id,
    Action,
    IpAddress,
    LoggedAt,
    UserId,
}
