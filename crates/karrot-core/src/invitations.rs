//! Invitations sent for a group, plus sending and accepting them.

use async_trait::async_trait;
use karrot_client::{InvitationsApi, ShareApi};
use karrot_types::{ApiError, ApiResult, Cursor, GroupId, Invitation, NewInvitation, Page};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::command::Reducer;
use crate::hooks::{Alert, Route, SessionHooks};
use crate::pagination::{FetchOutcome, ListCommand, PageSource, PaginatedList};
use crate::status::RequestStatus;

/// The invitations endpoint returns a plain list; it is served as a single page.
struct InvitationPages {
    api: Arc<dyn ShareApi>,
}

#[async_trait]
impl PageSource<Invitation, GroupId> for InvitationPages {
    async fn first_page(&self, group: &GroupId) -> ApiResult<Page<Invitation>> {
        self.api.list_invitations(*group).await.map(Page::last)
    }

    async fn next_page(&self, _cursor: &Cursor) -> ApiResult<Page<Invitation>> {
        Ok(Page::last(Vec::new()))
    }
}

#[derive(Debug)]
pub enum InvitationCommand {
    RequestSend,
    ReceiveSend,
    ReceiveSendError { error: ApiError },
    RequestAccept,
    ReceiveAccept,
    ReceiveAcceptError { error: ApiError },
    Clear,
}

#[derive(Debug, Default)]
pub struct InvitationsState {
    send_status: RequestStatus,
    accept_status: RequestStatus,
}

impl Reducer for InvitationsState {
    type Command = InvitationCommand;
    type Outcome = ();

    fn name(&self) -> &'static str {
        "invitations"
    }

    fn apply(&mut self, command: InvitationCommand) {
        match command {
            InvitationCommand::RequestSend => self.send_status.begin(),
            InvitationCommand::ReceiveSend => self.send_status.succeed(),
            InvitationCommand::ReceiveSendError { error } => self.send_status.fail(error),
            InvitationCommand::RequestAccept => self.accept_status.begin(),
            InvitationCommand::ReceiveAccept => self.accept_status.succeed(),
            InvitationCommand::ReceiveAcceptError { error } => self.accept_status.fail(error),
            InvitationCommand::Clear => *self = Self::default(),
        }
    }
}

#[derive(Clone)]
pub struct Invitations {
    list: PaginatedList<Invitation, GroupId>,
    state: Arc<Mutex<InvitationsState>>,
    api: Arc<dyn ShareApi>,
    hooks: Arc<dyn SessionHooks>,
}

impl Invitations {
    pub fn new(api: Arc<dyn ShareApi>, hooks: Arc<dyn SessionHooks>) -> Self {
        Self {
            list: PaginatedList::new(
                "invitations",
                Arc::new(InvitationPages {
                    api: Arc::clone(&api),
                }),
            ),
            state: Arc::new(Mutex::new(InvitationsState::default())),
            api,
            hooks,
        }
    }

    async fn commit(&self, command: InvitationCommand) {
        self.state.lock().await.commit(command);
    }

    /// Loads the invitations already sent for `group`.
    pub async fn fetch_for_group(&self, group: GroupId) -> FetchOutcome {
        self.list.fetch_first_page(group).await
    }

    /// Invites `email` into `group`.
    ///
    /// The new invitation is appended to the list only when the list shows
    /// that same group.
    pub async fn send(&self, email: &str, group: GroupId) -> ApiResult<Invitation> {
        self.commit(InvitationCommand::RequestSend).await;

        let request = NewInvitation {
            email: email.to_string(),
            group,
        };
        match self.api.create_invitation(request).await {
            Ok(invited) => {
                self.commit(InvitationCommand::ReceiveSend).await;
                if self.list.filter().await == Some(invited.group) {
                    self.list.commit(ListCommand::Append(invited.clone())).await;
                }
                Ok(invited)
            }
            Err(error) => {
                log::warn!("Sending invitation to {} failed: {}", email, error);
                self.commit(InvitationCommand::ReceiveSendError {
                    error: error.clone(),
                })
                .await;
                Err(error)
            }
        }
    }

    /// Accepts the invitation behind `token` and moves the user on.
    ///
    /// On success the session is refreshed (the user's groups changed), a
    /// success alert is raised and the app navigates home. On failure an error
    /// alert is raised and the app navigates to the groups gallery.
    pub async fn accept(&self, token: &str) -> ApiResult<()> {
        self.commit(InvitationCommand::RequestAccept).await;

        match self.api.accept_invitation(token).await {
            Ok(()) => {
                self.commit(InvitationCommand::ReceiveAccept).await;
                if let Err(err) = self.hooks.refresh_session().await {
                    log::warn!("Refreshing session after accepting invitation failed: {}", err);
                }
                self.hooks.alert(Alert::InviteAcceptSuccess);
                self.hooks.navigate(Route::Home);
                Ok(())
            }
            Err(error) => {
                log::warn!("Accepting invitation failed: {}", error);
                self.commit(InvitationCommand::ReceiveAcceptError {
                    error: error.clone(),
                })
                .await;
                self.hooks.alert(Alert::InviteAcceptError);
                self.hooks.navigate(Route::GroupsGallery);
                Err(error)
            }
        }
    }

    /// Resets the list and all statuses.
    pub async fn clear(&self) {
        self.commit(InvitationCommand::Clear).await;
        self.list.clear().await;
    }

    pub async fn list(&self) -> Vec<Invitation> {
        self.list.entities().await
    }

    pub async fn list_status(&self) -> RequestStatus {
        self.list.status().await
    }

    pub async fn send_status(&self) -> RequestStatus {
        self.state.lock().await.send_status.clone()
    }

    /// First validation message of the last send for a form field
    pub async fn send_error(&self, field: &str) -> Option<String> {
        let state = self.state.lock().await;
        state.send_status.first_field_error(field).map(str::to_string)
    }

    pub async fn accept_status(&self) -> RequestStatus {
        self.state.lock().await.accept_status.clone()
    }
}
