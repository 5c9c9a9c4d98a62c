use crate::{
    db::{DbPool, OrmConn},
    domain::CountPolicy,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub policy: CountPolicy,
    /// HMAC secret for bearer tokens.
    pub jwt_secret: String,
}
