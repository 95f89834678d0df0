//! Allowed status transitions for orders and applications.

use super::domain::{ApplicationStatus, OrderStatus, Vocabulary};

/// Status vocabulary with an explicit transition graph.
pub trait Lifecycle: Vocabulary {
    fn successors(self) -> &'static [Self];

    fn is_terminal(self) -> bool {
        self.successors().is_empty()
    }

    fn can_transition_to(self, next: Self) -> bool {
        self.successors().contains(&next)
    }
}

/// Rejected status change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("status '{from}' is final and cannot change")]
    Terminal { from: &'static str },
    #[error("cannot move from '{from}' to '{to}'")]
    NotAllowed {
        from: &'static str,
        to: &'static str,
    },
}

pub fn validate_transition<S: Lifecycle>(from: S, to: S) -> Result<(), TransitionError> {
    if from.is_terminal() {
        return Err(TransitionError::Terminal { from: from.label() });
    }
    if !from.can_transition_to(to) {
        return Err(TransitionError::NotAllowed {
            from: from.label(),
            to: to.label(),
        });
    }
    Ok(())
}

impl Lifecycle for OrderStatus {
    fn successors(self) -> &'static [Self] {
        match self {
            Self::Pending => &[Self::Unshipped, Self::Cancelled],
            Self::Unshipped => &[Self::Sent, Self::Cancelled],
            Self::Sent | Self::Cancelled => &[],
        }
    }
}

impl Lifecycle for ApplicationStatus {
    fn successors(self) -> &'static [Self] {
        match self {
            Self::Pending => &[
                Self::Reviewed,
                Self::Shortlisted,
                Self::Rejected,
                Self::Withdrawn,
            ],
            Self::Reviewed => &[
                Self::Shortlisted,
                Self::Interviewed,
                Self::Rejected,
                Self::Withdrawn,
            ],
            Self::Shortlisted => &[
                Self::Interviewed,
                Self::Accepted,
                Self::Rejected,
                Self::Withdrawn,
            ],
            Self::Interviewed => &[Self::Accepted, Self::Rejected, Self::Withdrawn],
            Self::Accepted | Self::Rejected | Self::Withdrawn => &[],
        }
    }
}
