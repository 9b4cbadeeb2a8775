pub mod group_repository;
pub mod user_repository;
pub mod group_member_repository;
pub mod user_data_repository;
pub mod group_message_repository;

// Re-export all repositories for convenient access
pub use group_repository::GroupRepository;
pub use user_repository::UserRepository;
pub use group_member_repository::GroupMemberRepository;
pub use user_data_repository::UserDataRepository;
pub use group_message_repository::GroupMessageRepository;
