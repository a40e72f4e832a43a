//! Model to entity mappers
//!
//! `From<Model> for Entity` conversions for every row type, plus helpers for
//! the scalar shapes Postgres returns.

mod comment;
mod group;
mod post;
mod user;

/// `COUNT(*)` comes back as BIGINT; it is never negative
pub fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}
