use crate::auth;
use crate::error::{AppError, AppResult};
use crate::models::{Group, GroupMember, GroupMessage, MemberRole, User};
use crate::repositories::{
    GroupMemberRepository, GroupMessageRepository, GroupRepository, UserRepository,
};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Service for managing training groups, memberships and the message board
pub struct GroupService {
    group_repo: Arc<GroupRepository>,
    user_repo: Arc<UserRepository>,
    member_repo: Arc<GroupMemberRepository>,
    message_repo: Arc<GroupMessageRepository>,
}

impl GroupService {
    pub fn new(
        group_repo: Arc<GroupRepository>,
        user_repo: Arc<UserRepository>,
        member_repo: Arc<GroupMemberRepository>,
        message_repo: Arc<GroupMessageRepository>,
    ) -> Self {
        Self {
            group_repo,
            user_repo,
            member_repo,
            message_repo,
        }
    }

    /// Create a new training group. Staff only; the creator becomes the
    /// group's first admin member.
    pub async fn create_group(
        &self,
        name: &str,
        start_date: i32,
        end_date: i32,
        weekly_minutes_target: i32,
        day_of_week: Option<i16>,
        creator: &User,
    ) -> AppResult<Group> {
        info!("Creating group: name={}, creator={}", name, creator.id);

        if !creator.is_admin {
            return Err(AppError::Unauthorized("Only staff may create groups".into()));
        }

        if start_date > end_date {
            return Err(AppError::Validation(format!(
                "Group start date {} is after end date {}",
                start_date, end_date
            )));
        }

        let mut group = Group::new(name.to_string(), start_date, end_date, weekly_minutes_target);
        if let Some(anchor) = day_of_week {
            if !(0..=6).contains(&anchor) {
                return Err(AppError::Validation(format!(
                    "Anchor day of week {} outside 0..=6",
                    anchor
                )));
            }
            group.day_of_week = anchor;
        }

        let group = self.group_repo.create(&group).await?;

        // The creator is the first member
        self.member_repo
            .add_member(&group.name, creator.id, MemberRole::Admin)
            .await?;

        info!("Created group {}", group.name);
        Ok(group)
    }

    /// List every group
    pub async fn all_groups(&self) -> AppResult<Vec<Group>> {
        Ok(self.group_repo.find_all().await?)
    }

    /// The group the caller belongs to, when no explicit group is named.
    ///
    /// Non-staff callers must name their own group or belong to exactly the
    /// one returned here (the most recently joined).
    async fn resolve_group_name(&self, explicit: Option<&str>, caller: &User) -> AppResult<String> {
        if let Some(name) = explicit {
            return Ok(name.to_string());
        }

        let memberships = self.member_repo.find_by_user(caller.id).await?;

        memberships
            .into_iter()
            .next()
            .map(|m| m.group_name)
            .ok_or_else(|| AppError::Unauthorized("Caller belongs to no group".into()))
    }

    /// Require that the caller may act within `group_name`
    async fn authorize_group_access(&self, group_name: &str, caller: &User) -> AppResult<()> {
        if caller.is_admin {
            return Ok(());
        }

        let is_member = self.member_repo.is_member(group_name, caller.id).await?;

        if is_member {
            Ok(())
        } else {
            Err(AppError::Unauthorized(format!(
                "Not a member of group {}",
                group_name
            )))
        }
    }

    /// Invite a user into a group. Members may invite into their own group;
    /// staff may invite into any group.
    pub async fn invite_member(
        &self,
        group_name: Option<&str>,
        invited_user_id: Uuid,
        inviter: &User,
    ) -> AppResult<(User, GroupMember)> {
        let group_name = self.resolve_group_name(group_name, inviter).await?;
        self.authorize_group_access(&group_name, inviter).await?;

        let invited_user = self
            .user_repo
            .find_by_id(invited_user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", invited_user_id)))?;

        let member = self
            .member_repo
            .add_member(&group_name, invited_user.id, MemberRole::Member)
            .await?;

        info!("Added member {} to group {}", invited_user.id, group_name);
        Ok((invited_user, member))
    }

    /// Get all of the members of the caller's group (or, for staff and
    /// group admins, any group).
    pub async fn group_members(
        &self,
        group_name: Option<&str>,
        caller: &User,
    ) -> AppResult<Vec<User>> {
        let group_name = self.resolve_group_name(group_name, caller).await?;
        self.authorize_group_access(&group_name, caller).await?;

        let members = self.member_repo.find_by_group(&group_name).await?;

        let ids: Vec<Uuid> = members.iter().map(|m| m.user_id).collect();
        Ok(self.user_repo.find_by_ids(&ids).await?)
    }

    /// Post a message to the caller's group (or, for staff, any group)
    pub async fn create_message(
        &self,
        group_name: Option<&str>,
        body: &str,
        caller: &User,
        posted_at_millis: i64,
    ) -> AppResult<GroupMessage> {
        let group_name = self.resolve_group_name(group_name, caller).await?;
        self.authorize_group_access(&group_name, caller).await?;

        if body.trim().is_empty() {
            return Err(AppError::Validation("Message body is empty".into()));
        }

        let message = GroupMessage::new(group_name, posted_at_millis, body.to_string());
        Ok(self.message_repo.create(&message).await?)
    }

    /// Get the caller's group messages newer than `since` (epoch millis)
    pub async fn messages_since(
        &self,
        group_name: Option<&str>,
        since: i64,
        caller: &User,
    ) -> AppResult<Vec<GroupMessage>> {
        let group_name = self.resolve_group_name(group_name, caller).await?;
        self.authorize_group_access(&group_name, caller).await?;

        Ok(self.message_repo.find_since(&group_name, since).await?)
    }

    /// Soft-delete a group message. Messages carry no author, so deletion is
    /// reserved for group admins and staff.
    ///
    /// Best-effort: the tombstoned message is returned on success, the
    /// original on failure (with the error logged), so the board keeps
    /// rendering either way.
    pub async fn delete_message(&self, message: GroupMessage, caller: &User) -> GroupMessage {
        if !auth::is_group_admin(caller, &message.group, &self.member_repo).await {
            error!(
                "Error deleting group message {}/{}: {} does not administer {}",
                message.group, message.date, caller.id, message.group
            );
            return message;
        }

        match self.message_repo.soft_delete(&message.group, message.date).await {
            Ok(deleted) => deleted,
            Err(err) => {
                error!("Error deleting group message {}/{}: {}", message.group, message.date, err);
                message
            }
        }
    }
}
