//! Domain models for the Pacer backend.
//!
//! This module contains all database-backed models representing
//! the core entities of the group training tracker.

pub mod group;
pub mod group_member;
pub mod group_message;
pub mod user;
pub mod user_data;

// Re-export all models for convenient access
pub use group::Group;
pub use group_member::{GroupMember, MemberRole};
pub use group_message::{GroupMessage, DELETED_MESSAGE_BODY};
pub use user::User;
pub use user_data::{EmojiFeedback, UserData};
