use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GenreTitles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GenreTitles::TitleId).big_integer().not_null())
                    .col(ColumnDef::new(GenreTitles::GenreId).big_integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(GenreTitles::TitleId)
                            .col(GenreTitles::GenreId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GenreTitles::Table, GenreTitles::TitleId)
                            .to(Titles::Table, Titles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(GenreTitles::Table, GenreTitles::GenreId)
                            .to(Genres::Table, Genres::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(GenreTitles::Table)
                    .col(GenreTitles::GenreId)
                    .name("idx_genre_titles_genre_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(GenreTitles::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum GenreTitles {
    Table,
    TitleId,
    GenreId,
}

#[derive(Iden)]
enum Titles {
    Table,
    Id,
}

#[derive(Iden)]
enum Genres {
    Table,
    Id,
}
