//! Create/edit workflow for a single group.
//!
//! The form is a small state machine over [`FormState`]. Network calls go
//! through a [`GroupApi`]; the outcome of each call is reported as
//! [`FormEffect`]s (refresh, navigate, notice) for the caller to render.

use std::collections::BTreeMap;

use crate::database::models::{GroupWithMembers, Member};
use crate::handlers::protected::groups::{CreateGroupRequest, UpdateGroupRequest};

use super::api::GroupApi;
use super::member_cache::MemberCache;
use super::multi_select::{apply_event, MultiSelect};

pub const GROUPS_PATH: &str = "/groups";
pub const SUBMIT_FAILED: &str = "Something went wrong.";
pub const DELETE_FAILED: &str = "Could not delete the group.";
pub const MEMBERS_FAILED: &str = "Error fetching members";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    Loading,
    ModalOpen,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEffect {
    Refresh,
    Navigate(String),
    Notify(Notice),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupFormValues {
    pub name: String,
    pub program_id: String,
    pub location_id: String,
    pub members: Vec<String>,
}

impl From<&GroupWithMembers> for GroupFormValues {
    fn from(initial: &GroupWithMembers) -> Self {
        Self {
            name: initial.group.name.clone(),
            program_id: initial.group.program_id.clone(),
            location_id: initial.group.location_id.clone(),
            members: initial.member_ids(),
        }
    }
}

/// Field name -> message, for every field that failed validation
pub type FieldErrors = BTreeMap<&'static str, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Request succeeded
    Done,
    /// Validation failed; nothing was sent
    Invalid(FieldErrors),
    /// Another request is outstanding, or the action does not apply in this mode
    Refused,
    /// Request was sent and failed
    Failed,
}

pub struct GroupForm<A: GroupApi> {
    api: A,
    initial: Option<GroupWithMembers>,
    values: GroupFormValues,
    state: FormState,
    members: MemberCache,
    picker: MultiSelect,
    effects: Vec<FormEffect>,
}

impl<A: GroupApi> GroupForm<A> {
    pub fn new(api: A, initial: Option<GroupWithMembers>) -> Self {
        let values = initial.as_ref().map(GroupFormValues::from).unwrap_or_default();
        Self {
            api,
            initial,
            values,
            state: FormState::Idle,
            members: MemberCache::default(),
            picker: MultiSelect::new("Select members"),
            effects: Vec::new(),
        }
    }

    pub fn with_member_cache(mut self, cache: MemberCache) -> Self {
        self.members = cache;
        self
    }

    pub fn is_editing(&self) -> bool {
        self.initial.is_some()
    }

    pub fn title(&self) -> &'static str {
        if self.is_editing() { "Edit group" } else { "Create group" }
    }

    pub fn description(&self) -> &'static str {
        if self.is_editing() { "Edit an existing group" } else { "Add a new group" }
    }

    pub fn action_label(&self) -> &'static str {
        if self.is_editing() { "Save changes" } else { "Create" }
    }

    fn success_message(&self) -> &'static str {
        if self.is_editing() { "Group updated." } else { "Group created." }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn values(&self) -> &GroupFormValues {
        &self.values
    }

    pub fn picker(&self) -> &MultiSelect {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut MultiSelect {
        &mut self.picker
    }

    /// Drain the effects produced since the last call
    pub fn take_effects(&mut self) -> Vec<FormEffect> {
        std::mem::take(&mut self.effects)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.values.name = name.into();
    }

    pub fn set_program(&mut self, program_id: impl Into<String>) {
        self.values.program_id = program_id.into();
    }

    pub fn set_location(&mut self, location_id: impl Into<String>) {
        self.values.location_id = location_id.into();
    }

    /// Members known to the form, as of the last fetch
    pub fn members(&self) -> &[Member] {
        self.members.members()
    }

    /// Fetch the member list when the cache is empty or stale
    pub async fn load_members(&mut self) -> &[Member] {
        let fetched = self.members.get_or_fetch(&self.api).await.map(|_| ());
        if let Err(e) = fetched {
            tracing::warn!("[group_form] failed to fetch members: {}", e);
            self.notify(Notice::Error(MEMBERS_FAILED.to_string()));
        }
        self.members.members()
    }

    /// Drop the cached member list so the next load refetches it
    pub fn invalidate_members(&mut self) {
        self.members.invalidate();
    }

    /// Route a pick through the widget; returns whether the selection changed
    pub fn add_member(&mut self, id: &str) -> bool {
        match self.picker.select(self.members.members(), &self.values.members, id) {
            Some(event) => {
                apply_event(&mut self.values.members, event);
                true
            }
            None => false,
        }
    }

    pub fn remove_member(&mut self, id: &str) -> bool {
        match self.picker.remove(&self.values.members, id) {
            Some(event) => {
                apply_event(&mut self.values.members, event);
                true
            }
            None => false,
        }
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.values.name.trim().is_empty() {
            errors.insert("name", "Name is required".to_string());
        }
        if self.values.location_id.trim().is_empty() {
            errors.insert("locationId", "Location is required".to_string());
        }
        if self.values.program_id.trim().is_empty() {
            errors.insert("programId", "Program is required".to_string());
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Create or update, depending on whether the form was opened on an existing group.
    /// Editing sends name/program/location only; member changes are not part of the update call.
    pub async fn submit(&mut self) -> Outcome {
        if self.state != FormState::Idle {
            return Outcome::Refused;
        }
        if let Err(errors) = self.validate() {
            return Outcome::Invalid(errors);
        }

        self.state = FormState::Loading;

        let result = match &self.initial {
            Some(initial) => {
                let payload = UpdateGroupRequest {
                    name: Some(self.values.name.clone()),
                    program_id: Some(self.values.program_id.clone()),
                    location_id: Some(self.values.location_id.clone()),
                };
                self.api.update_group(&initial.group.id, &payload).await.map(|_| ())
            }
            None => {
                let payload = CreateGroupRequest {
                    name: Some(self.values.name.clone()),
                    program_id: Some(self.values.program_id.clone()),
                    location_id: Some(self.values.location_id.clone()),
                    member_ids: Some(self.values.members.clone()),
                };
                self.api.create_group(&payload).await.map(|_| ())
            }
        };

        self.state = FormState::Idle;

        match result {
            Ok(()) => {
                self.effects.push(FormEffect::Refresh);
                self.effects.push(FormEffect::Navigate(GROUPS_PATH.to_string()));
                let message = self.success_message().to_string();
                self.notify(Notice::Success(message));
                Outcome::Done
            }
            Err(e) => {
                tracing::warn!("[group_form] submit failed: {}", e);
                self.notify(Notice::Error(SUBMIT_FAILED.to_string()));
                Outcome::Failed
            }
        }
    }

    /// Open the confirmation modal. Only an existing, idle group can be deleted.
    pub fn request_delete(&mut self) -> bool {
        if !self.is_editing() || self.state != FormState::Idle {
            return false;
        }
        self.state = FormState::ModalOpen;
        true
    }

    pub fn cancel_delete(&mut self) {
        if self.state == FormState::ModalOpen {
            self.state = FormState::Idle;
        }
    }

    /// Delete the group behind the open modal. The modal closes either way.
    pub async fn confirm_delete(&mut self) -> Outcome {
        if self.state != FormState::ModalOpen {
            return Outcome::Refused;
        }
        let id = match &self.initial {
            Some(initial) => initial.group.id.clone(),
            None => {
                self.state = FormState::Idle;
                return Outcome::Refused;
            }
        };

        self.state = FormState::Loading;
        let result = self.api.delete_group(&id).await;
        self.state = FormState::Idle;

        match result {
            Ok(_) => {
                self.effects.push(FormEffect::Refresh);
                self.effects.push(FormEffect::Navigate(GROUPS_PATH.to_string()));
                self.notify(Notice::Success("Group deleted.".to_string()));
                Outcome::Done
            }
            Err(e) => {
                tracing::warn!("[group_form] delete of {} failed: {}", id, e);
                self.notify(Notice::Error(DELETE_FAILED.to_string()));
                Outcome::Failed
            }
        }
    }

    fn notify(&mut self, notice: Notice) {
        self.effects.push(FormEffect::Notify(notice));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::api::ClientError;
    use crate::database::models::{BatchPayload, Group, Location, Program};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        ListMembers,
        Create(CreateGroupRequest),
        Update(String, UpdateGroupRequest),
        Delete(String),
    }

    #[derive(Clone, Default)]
    struct FakeApi {
        calls: Arc<Mutex<Vec<Call>>>,
        fail: bool,
    }

    impl FakeApi {
        fn failing() -> Self {
            Self { fail: true, ..Default::default() }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) -> Result<(), ClientError> {
            self.calls.lock().unwrap().push(call);
            if self.fail {
                Err(ClientError::Status { status: 500, message: "Internal error".into() })
            } else {
                Ok(())
            }
        }
    }

    fn group(id: &str) -> GroupWithMembers {
        let now = Utc::now();
        GroupWithMembers {
            group: Group {
                id: id.into(),
                name: "U10 Boys".into(),
                program_id: "p1".into(),
                location_id: "l1".into(),
                created_at: now,
                updated_at: now,
            },
            members: vec![Member { id: "m1".into(), name: "Ana".into() }],
        }
    }

    #[async_trait]
    impl GroupApi for FakeApi {
        async fn list_groups(&self) -> Result<Vec<Group>, ClientError> {
            Ok(vec![])
        }
        async fn get_group(&self, id: &str) -> Result<GroupWithMembers, ClientError> {
            Ok(group(id))
        }
        async fn create_group(&self, payload: &CreateGroupRequest) -> Result<GroupWithMembers, ClientError> {
            self.record(Call::Create(payload.clone()))?;
            Ok(group("g-new"))
        }
        async fn update_group(&self, id: &str, payload: &UpdateGroupRequest) -> Result<BatchPayload, ClientError> {
            self.record(Call::Update(id.into(), payload.clone()))?;
            Ok(BatchPayload::new(1))
        }
        async fn delete_group(&self, id: &str) -> Result<BatchPayload, ClientError> {
            self.record(Call::Delete(id.into()))?;
            Ok(BatchPayload::new(1))
        }
        async fn list_members(&self) -> Result<Vec<Member>, ClientError> {
            self.record(Call::ListMembers)?;
            Ok(vec![
                Member { id: "m1".into(), name: "Ana".into() },
                Member { id: "m2".into(), name: "Boris".into() },
            ])
        }
        async fn list_programs(&self) -> Result<Vec<Program>, ClientError> {
            Ok(vec![])
        }
        async fn list_locations(&self) -> Result<Vec<Location>, ClientError> {
            Ok(vec![])
        }
    }

    fn success_effects(message: &str) -> Vec<FormEffect> {
        vec![
            FormEffect::Refresh,
            FormEffect::Navigate(GROUPS_PATH.into()),
            FormEffect::Notify(Notice::Success(message.into())),
        ]
    }

    #[tokio::test]
    async fn create_submits_members_and_navigates() {
        let api = FakeApi::default();
        let mut form = GroupForm::new(api.clone(), None);
        assert_eq!(form.title(), "Create group");
        assert_eq!(form.action_label(), "Create");

        form.load_members().await;
        form.set_name("U10 Boys");
        form.set_program("p1");
        form.set_location("l1");
        assert!(form.add_member("m1"));
        assert!(form.add_member("m2"));
        assert!(!form.add_member("m2"));

        assert_eq!(form.submit().await, Outcome::Done);
        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(form.take_effects(), success_effects("Group created."));

        let calls = api.calls();
        assert_eq!(
            calls[1],
            Call::Create(CreateGroupRequest {
                name: Some("U10 Boys".into()),
                program_id: Some("p1".into()),
                location_id: Some("l1".into()),
                member_ids: Some(vec!["m1".into(), "m2".into()]),
            })
        );
    }

    #[tokio::test]
    async fn edit_sends_update_without_members() {
        let api = FakeApi::default();
        let mut form = GroupForm::new(api.clone(), Some(group("g1")));
        assert_eq!(form.title(), "Edit group");
        assert_eq!(form.values().members, vec!["m1".to_string()]);

        form.set_name("U12 Boys");
        assert_eq!(form.submit().await, Outcome::Done);
        assert_eq!(form.take_effects(), success_effects("Group updated."));
        assert_eq!(
            api.calls(),
            vec![Call::Update(
                "g1".into(),
                UpdateGroupRequest {
                    name: Some("U12 Boys".into()),
                    program_id: Some("p1".into()),
                    location_id: Some("l1".into()),
                }
            )]
        );
    }

    #[tokio::test]
    async fn invalid_form_sends_nothing() {
        let api = FakeApi::default();
        let mut form = GroupForm::new(api.clone(), None);
        form.set_program("p1");

        match form.submit().await {
            Outcome::Invalid(errors) => {
                assert!(errors.contains_key("name"));
                assert!(errors.contains_key("locationId"));
                assert!(!errors.contains_key("programId"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
        assert!(api.calls().is_empty());
        assert_eq!(form.state(), FormState::Idle);
    }

    #[tokio::test]
    async fn failed_submit_shows_generic_notice_and_resets_loading() {
        let mut form = GroupForm::new(FakeApi::failing(), Some(group("g1")));
        assert_eq!(form.submit().await, Outcome::Failed);
        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(
            form.take_effects(),
            vec![FormEffect::Notify(Notice::Error(SUBMIT_FAILED.into()))]
        );
    }

    #[tokio::test]
    async fn member_fetch_failure_is_reported() {
        let mut form = GroupForm::new(FakeApi::failing(), None);
        assert!(form.load_members().await.is_empty());
        assert_eq!(
            form.take_effects(),
            vec![FormEffect::Notify(Notice::Error(MEMBERS_FAILED.into()))]
        );
    }

    #[tokio::test]
    async fn members_are_fetched_once_while_fresh() {
        let api = FakeApi::default();
        let mut form = GroupForm::new(api.clone(), None);
        form.load_members().await;
        form.load_members().await;
        assert_eq!(api.calls(), vec![Call::ListMembers]);

        form.invalidate_members();
        form.load_members().await;
        assert_eq!(api.calls().len(), 2);
    }

    #[tokio::test]
    async fn delete_flow_confirms_through_modal() {
        let api = FakeApi::default();
        let mut form = GroupForm::new(api.clone(), Some(group("g1")));

        assert_eq!(form.confirm_delete().await, Outcome::Refused);
        assert!(form.request_delete());
        assert_eq!(form.state(), FormState::ModalOpen);
        assert_eq!(form.submit().await, Outcome::Refused);

        assert_eq!(form.confirm_delete().await, Outcome::Done);
        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(api.calls(), vec![Call::Delete("g1".into())]);
        assert_eq!(form.take_effects(), success_effects("Group deleted."));
    }

    #[tokio::test]
    async fn failed_delete_still_closes_modal() {
        let mut form = GroupForm::new(FakeApi::failing(), Some(group("g1")));
        assert!(form.request_delete());
        assert_eq!(form.confirm_delete().await, Outcome::Failed);
        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(
            form.take_effects(),
            vec![FormEffect::Notify(Notice::Error(DELETE_FAILED.into()))]
        );
    }

    #[test]
    fn delete_needs_an_existing_group() {
        let mut form = GroupForm::new(FakeApi::default(), None);
        assert!(!form.request_delete());

        let mut form = GroupForm::new(FakeApi::default(), Some(group("g1")));
        assert!(form.request_delete());
        form.cancel_delete();
        assert_eq!(form.state(), FormState::Idle);
    }

    #[tokio::test]
    async fn zero_ttl_cache_refetches_every_load() {
        let api = FakeApi::default();
        let mut form = GroupForm::new(api.clone(), None).with_member_cache(MemberCache::new(std::time::Duration::ZERO));
        form.load_members().await;
        form.load_members().await;
        assert_eq!(api.calls(), vec![Call::ListMembers, Call::ListMembers]);
    }

    #[tokio::test]
    async fn picker_filters_candidates_for_the_form() {
        let mut form = GroupForm::new(FakeApi::default(), None);
        assert_eq!(form.description(), "Add a new group");
        form.load_members().await;
        assert!(form.add_member("m1"));

        form.picker_mut().focus();
        form.picker_mut().set_filter("bor");
        let visible: Vec<String> = form
            .picker()
            .visible_candidates(form.members(), &form.values().members)
            .into_iter()
            .map(|m| m.id.clone())
            .collect();
        assert_eq!(visible, vec!["m2".to_string()]);

        assert!(form.add_member("m2"));
        assert_eq!(form.picker().filter(), "");
        assert!(form.remove_member("m1"));
        assert_eq!(form.values().members, vec!["m2".to_string()]);

        let form = GroupForm::new(FakeApi::default(), Some(group("g1")));
        assert_eq!(form.description(), "Edit an existing group");
    }
}
