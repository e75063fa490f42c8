use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE TABLE dynasty_cube.draft_picks (
                    id uuid NOT NULL DEFAULT gen_random_uuid() PRIMARY KEY,
                    session_id varchar NOT NULL,
                    pick_number integer NOT NULL,
                    card_id varchar NOT NULL,
                    card_name varchar NOT NULL,
                    card_set varchar NOT NULL,
                    rarity varchar NOT NULL,
                    image_url varchar NOT NULL,
                    team_id uuid NOT NULL,
                    team_name varchar NOT NULL,
                    created_at timestamptz NOT NULL DEFAULT now()
                )",
            )
            .await?;

        // Pick history is always read per-session in pick order
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX draft_picks_session_pick_order
                    ON dynasty_cube.draft_picks (session_id, pick_number)",
            )
            .await?;

        // The duplicate-card scan groups by card id across all sessions
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE INDEX draft_picks_card_id ON dynasty_cube.draft_picks (card_id)",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS dynasty_cube.draft_picks;")
            .await?;

        Ok(())
    }
}
