//! Appointment status state machine.
//!
//! Allowed transitions, by acting party:
//!
//! ```text
//!   pending   --confirm (landlord)-->  confirmed
//!   pending   --cancel  (either)--->   cancelled
//!   confirmed --cancel  (either)--->   cancelled
//!   cancelled --cancel  (either)--->   no-op
//! ```
//!
//! `cancelled` is terminal: nothing leaves it, and re-cancelling is a no-op so
//! the operation stays idempotent (no duplicate notification). The status set
//! is a closed enum; adding a state means extending [`AppointmentStatus`] and
//! the match below together.

use crate::database::models::{AppointmentStatus, Party};
use crate::error::ApiError;

/// Outcome of planning a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Persist the new status and notify the counterpart.
    Apply(AppointmentStatus),
    /// Already in the requested state; persist nothing, notify nobody.
    Noop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    /// The acting party has no right to request this status.
    NotPermitted,
    /// The appointment is in a terminal state.
    Terminal,
    /// The requested status is never a valid transition target.
    InvalidTarget(AppointmentStatus),
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::NotPermitted => {
                ApiError::forbidden("Not authorized to set this status")
            }
            LifecycleError::Terminal => {
                ApiError::bad_request("Appointment is cancelled and cannot change status")
            }
            LifecycleError::InvalidTarget(status) => {
                ApiError::bad_request(format!("Cannot set appointment status to {}", status))
            }
        }
    }
}

/// Decide what a transition request means, without touching storage.
pub fn plan(
    current: AppointmentStatus,
    requested: AppointmentStatus,
    actor: Party,
) -> Result<Transition, LifecycleError> {
    use AppointmentStatus::*;

    match requested {
        // Either party may cancel; cancelling twice is a no-op.
        Cancelled => match current {
            Cancelled => Ok(Transition::Noop),
            Pending | Confirmed => Ok(Transition::Apply(Cancelled)),
        },

        // Only the landlord decides on a booking.
        Confirmed => {
            if actor != Party::Landlord {
                return Err(LifecycleError::NotPermitted);
            }
            match current {
                Pending => Ok(Transition::Apply(Confirmed)),
                Confirmed => Ok(Transition::Noop),
                Cancelled => Err(LifecycleError::Terminal),
            }
        }

        // Nothing transitions back to pending.
        Pending => Err(LifecycleError::InvalidTarget(Pending)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use AppointmentStatus::*;

    #[test]
    fn landlord_confirms_pending() {
        assert_eq!(plan(Pending, Confirmed, Party::Landlord), Ok(Transition::Apply(Confirmed)));
    }

    #[test]
    fn customer_cannot_confirm() {
        assert_eq!(plan(Pending, Confirmed, Party::Customer), Err(LifecycleError::NotPermitted));
    }

    #[test]
    fn either_party_cancels_pending() {
        assert_eq!(plan(Pending, Cancelled, Party::Customer), Ok(Transition::Apply(Cancelled)));
        assert_eq!(plan(Pending, Cancelled, Party::Landlord), Ok(Transition::Apply(Cancelled)));
    }

    #[test]
    fn confirmed_can_still_be_cancelled() {
        assert_eq!(plan(Confirmed, Cancelled, Party::Customer), Ok(Transition::Apply(Cancelled)));
    }

    #[test]
    fn cancelling_cancelled_is_noop() {
        assert_eq!(plan(Cancelled, Cancelled, Party::Customer), Ok(Transition::Noop));
        assert_eq!(plan(Cancelled, Cancelled, Party::Landlord), Ok(Transition::Noop));
    }

    #[test]
    fn cancelled_is_terminal_for_confirmation() {
        assert_eq!(plan(Cancelled, Confirmed, Party::Landlord), Err(LifecycleError::Terminal));
    }

    #[test]
    fn reconfirming_is_noop() {
        assert_eq!(plan(Confirmed, Confirmed, Party::Landlord), Ok(Transition::Noop));
    }

    #[test]
    fn pending_is_never_a_target() {
        for current in [Pending, Confirmed, Cancelled] {
            assert_eq!(
                plan(current, Pending, Party::Landlord),
                Err(LifecycleError::InvalidTarget(Pending))
            );
        }
    }
}
