//! Row structs and DTOs for the forum tables.

pub mod category;
pub mod mention;
pub mod notification;
pub mod post;
pub mod reaction;
pub mod tag;
pub mod topic;
pub mod user;
pub mod wiki_edit;
