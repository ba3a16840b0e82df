// ── View state machine ──
//
// idle → loading → ready | error, with error → loading (retry) and
// ready → loading (refresh). Nothing else is allowed.

use serde::Serialize;
use strum::{Display, EnumString};

use crate::error::CoreError;

/// Lifecycle status of one page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ViewStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

impl ViewStatus {
    /// Whether the machine may move from `self` to `next`.
    pub fn can_transition_to(self, next: ViewStatus) -> bool {
        matches!(
            (self, next),
            (Self::Idle | Self::Error | Self::Ready, Self::Loading)
                | (Self::Loading, Self::Ready | Self::Error)
        )
    }

    /// Terminal for the current load: either a payload or a message is set.
    pub fn is_settled(self) -> bool {
        matches!(self, Self::Ready | Self::Error)
    }
}

/// State record owned by a single view controller.
///
/// A refresh keeps the previous payload visible while loading; an error
/// clears it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState<T> {
    pub status: ViewStatus,
    pub payload: Option<T>,
    pub message: Option<String>,
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        Self {
            status: ViewStatus::Idle,
            payload: None,
            message: None,
        }
    }
}

impl<T> ViewState<T> {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn begin_loading(&mut self) -> Result<(), CoreError> {
        self.check(ViewStatus::Loading)?;
        self.status = ViewStatus::Loading;
        self.message = None;
        Ok(())
    }

    pub fn succeed(&mut self, payload: T) -> Result<(), CoreError> {
        self.check(ViewStatus::Ready)?;
        self.status = ViewStatus::Ready;
        self.payload = Some(payload);
        self.message = None;
        Ok(())
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), CoreError> {
        self.check(ViewStatus::Error)?;
        self.status = ViewStatus::Error;
        self.payload = None;
        self.message = Some(message.into());
        Ok(())
    }

    /// The line a renderer shows in place of content, if any.
    pub fn error_line(&self) -> Option<String> {
        self.message.as_ref().map(|m| format!("Error: {m}"))
    }

    fn check(&self, next: ViewStatus) -> Result<(), CoreError> {
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition {
                from: self.status,
                to: next,
            })
        }
    }
}
