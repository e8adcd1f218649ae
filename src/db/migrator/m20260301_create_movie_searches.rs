use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MovieSearches::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MovieSearches::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MovieSearches::SearchTerm).string().not_null())
                    .col(ColumnDef::new(MovieSearches::MovieId).string().not_null())
                    .col(
                        ColumnDef::new(MovieSearches::Count)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(ColumnDef::new(MovieSearches::PosterUrl).string_len(500))
                    .col(
                        ColumnDef::new(MovieSearches::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(MovieSearches::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_searches_search_term_unique")
                    .table(MovieSearches::Table)
                    .col(MovieSearches::SearchTerm)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_movie_searches_count")
                    .table(MovieSearches::Table)
                    .col(MovieSearches::Count)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MovieSearches::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MovieSearches {
    Table,
    Id,
    SearchTerm,
    MovieId,
    Count,
    PosterUrl,
    CreatedAt,
    UpdatedAt,
}
