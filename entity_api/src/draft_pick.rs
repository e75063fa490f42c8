//! CRUD operations for the draft_picks table.

use super::error::Error;
use entity::draft_picks::{ActiveModel, Column, Entity, Model};
use log::*;
use sea_orm::{
    entity::prelude::*, ActiveValue::Set, DatabaseConnection, QueryOrder, TryIntoModel,
};

/// Inserts a new draft pick row. The id and created_at columns are
/// server-assigned; values supplied on the model are ignored.
///
/// Mutating callers are expected to go through `domain::draft::record_pick`,
/// which also invalidates the duplicate-card cache.
pub async fn create(db: &DatabaseConnection, model: Model) -> Result<Model, Error> {
    debug!(
        "Creating draft pick {} for session: {}",
        model.card_name, model.session_id
    );

    let now = chrono::Utc::now();

    let active_model = ActiveModel {
        session_id: Set(model.session_id),
        pick_number: Set(model.pick_number),
        card_id: Set(model.card_id),
        card_name: Set(model.card_name),
        card_set: Set(model.card_set),
        rarity: Set(model.rarity),
        image_url: Set(model.image_url),
        team_id: Set(model.team_id),
        team_name: Set(model.team_name),
        created_at: Set(now.into()),
        ..Default::default()
    };

    Ok(active_model.save(db).await?.try_into_model()?)
}

/// Returns every pick recorded for a session, ordered by pick number.
/// Draft boards use this to resync after an SSE reconnect.
pub async fn list_by_session(
    db: &DatabaseConnection,
    session_id: &str,
) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .filter(Column::SessionId.eq(session_id))
        .order_by_asc(Column::PickNumber)
        .all(db)
        .await?)
}

/// Loads the full pick collection across all sessions. Used by the
/// duplicate-card cache to recompute occurrence counts.
pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<Model>, Error> {
    Ok(Entity::find().all(db).await?)
}
