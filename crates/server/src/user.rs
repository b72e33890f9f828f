//! The module contains the definition of a user and the session check.

use api_types::session::Session;
use axum::{Extension, Json};
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Returns the identity of the authenticated caller.
pub async fn session(Extension(user): Extension<Model>) -> Json<Session> {
    Json(Session {
        username: user.username,
    })
}
