//! Confirmation gate in front of every destructive row action.
//!
//! ```text
//! Idle -> ConfirmPending(item) -> Idle            (cancel)
//!                              -> Deleting(item)  (confirm) -> Idle  (finish or abandon)
//! Idle -> NoAccess                                (role lacks delete)
//! ```
//!
//! `Deleting` is only reachable through [`DeleteFlow::confirm`], and the
//! [`ConfirmedDelete`] it returns is the only way to ask a list controller to
//! remove a row.

use uuid::Uuid;

use super::list_view::ListItem;
use crate::error::{DashboardError, Result};
use crate::models::{EntityId, EntityKind, Role};

#[derive(Debug, Clone, PartialEq)]
pub enum DeleteState<T> {
    Idle,
    /// Waiting on the user to confirm in a modal.
    ConfirmPending(T),
    /// Backend delete in flight.
    Deleting { item: T, ticket: Uuid },
    /// The acting role may not delete this kind of row.
    NoAccess,
}

/// Proof that a user confirmed deleting one specific row.
#[derive(Debug, PartialEq, Eq)]
pub struct ConfirmedDelete {
    id: EntityId,
    ticket: Uuid,
}

impl ConfirmedDelete {
    pub fn id(&self) -> &EntityId {
        &self.id
    }
}

#[derive(Debug, Clone)]
pub struct DeleteFlow<T> {
    kind: EntityKind,
    state: DeleteState<T>,
}

impl<T: ListItem> DeleteFlow<T> {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            state: DeleteState::Idle,
        }
    }

    pub fn state(&self) -> &DeleteState<T> {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, DeleteState::Idle)
    }

    /// Item awaiting confirmation, for the modal body.
    pub fn pending(&self) -> Option<&T> {
        match &self.state {
            DeleteState::ConfirmPending(item) => Some(item),
            _ => None,
        }
    }

    /// User clicked delete on a row.
    pub fn request(&mut self, item: T, role: Role) -> Result<()> {
        if let DeleteState::Deleting { item: busy, .. } = &self.state {
            return Err(DashboardError::DeleteInProgress {
                id: busy.id().to_string(),
            });
        }

        if !role.can_delete(self.kind) {
            tracing::debug!(
                target: "schooldesk::controller",
                kind = self.kind.label(),
                ?role,
                "delete refused for role"
            );
            self.state = DeleteState::NoAccess;
            return Err(DashboardError::Permission(format!(
                "{role:?} may not delete a {}",
                self.kind.label()
            )));
        }

        self.state = DeleteState::ConfirmPending(item);
        Ok(())
    }

    /// User dismissed the confirmation modal.
    pub fn cancel(&mut self) {
        if matches!(self.state, DeleteState::ConfirmPending(_)) {
            self.state = DeleteState::Idle;
        }
    }

    /// User closed the no-access notice.
    pub fn dismiss(&mut self) {
        if matches!(self.state, DeleteState::NoAccess) {
            self.state = DeleteState::Idle;
        }
    }

    /// User confirmed. Moves to `Deleting` and hands out the ticket.
    pub fn confirm(&mut self) -> Result<ConfirmedDelete> {
        let item = match std::mem::replace(&mut self.state, DeleteState::Idle) {
            DeleteState::ConfirmPending(item) => item,
            other => {
                let err = match &other {
                    DeleteState::Deleting { item, .. } => DashboardError::DeleteInProgress {
                        id: item.id().to_string(),
                    },
                    _ => DashboardError::InvalidState(
                        "nothing is awaiting delete confirmation".to_string(),
                    ),
                };
                self.state = other;
                return Err(err);
            }
        };

        let confirmed = ConfirmedDelete {
            id: item.id().clone(),
            ticket: Uuid::new_v4(),
        };
        self.state = DeleteState::Deleting {
            item,
            ticket: confirmed.ticket,
        };
        Ok(confirmed)
    }

    /// The backend call for `confirmed` will never report back (its future
    /// was dropped). Stale tickets are ignored.
    pub fn abandon(&mut self, confirmed: &ConfirmedDelete) {
        self.abandon_ticket(confirmed.ticket, &confirmed.id);
    }

    /// Back to `Idle` from any state, for hosts that lost their ticket. A
    /// late `finish` for the dropped delete is then ignored as stale.
    pub fn reset(&mut self) {
        if let DeleteState::Deleting { item, .. } = &self.state {
            tracing::warn!(
                target: "schooldesk::controller",
                kind = self.kind.label(),
                id = %item.id(),
                "delete flow reset while a delete was in flight"
            );
        }
        self.state = DeleteState::Idle;
    }

    fn abandon_ticket(&mut self, ticket: Uuid, id: &EntityId) {
        match &self.state {
            DeleteState::Deleting { ticket: current, .. } if *current == ticket => {
                tracing::warn!(
                    target: "schooldesk::controller",
                    kind = self.kind.label(),
                    %id,
                    "delete abandoned before the backend answered"
                );
                self.state = DeleteState::Idle;
            }
            _ => {}
        }
    }

    /// Guard for the span of the backend call. Dropping it without
    /// [`InFlight::complete`] abandons the delete.
    pub(crate) fn in_flight(&mut self, confirmed: &ConfirmedDelete) -> InFlight<'_, T> {
        InFlight {
            flow: self,
            ticket: confirmed.ticket,
            id: confirmed.id.clone(),
            armed: true,
        }
    }

    /// Backend call finished, either way. Stale tickets are ignored.
    pub fn finish(&mut self, confirmed: &ConfirmedDelete) {
        match &self.state {
            DeleteState::Deleting { ticket, .. } if *ticket == confirmed.ticket => {
                self.state = DeleteState::Idle;
            }
            _ => {
                tracing::warn!(
                    target: "schooldesk::controller",
                    id = %confirmed.id,
                    "ignoring completion for a delete that is no longer in flight"
                );
            }
        }
    }
}

pub(crate) struct InFlight<'a, T: ListItem> {
    flow: &'a mut DeleteFlow<T>,
    ticket: Uuid,
    id: EntityId,
    armed: bool,
}

impl<T: ListItem> InFlight<'_, T> {
    /// The backend answered; the caller applies the outcome with `finish`.
    pub(crate) fn complete(mut self) {
        self.armed = false;
    }
}

impl<T: ListItem> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            self.flow.abandon_ticket(self.ticket, &self.id);
        }
    }
}
