//! SeaORM entities, one per table.

use sea_orm::ActiveValue::{self, NotSet, Set};

pub mod comment;
pub mod message;
pub mod post;
pub mod profile;
pub mod user;

/// Generated keys: an absent id is left for the database to assign (insert),
/// a present one selects the row to update.
pub(crate) fn id_value(id: Option<i64>) -> ActiveValue<i64> {
    match id {
        Some(id) => Set(id),
        None => NotSet,
    }
}
