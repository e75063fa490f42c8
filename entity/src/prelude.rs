pub use super::draft_picks::Entity as DraftPicks;
