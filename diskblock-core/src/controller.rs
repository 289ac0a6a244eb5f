// SPDX-License-Identifier: GPL-3.0-only

//! Arbitration session ownership and start-up sequencing
//!
//! ```text
//! Uninitialized -> SessionCreated -> SweepComplete -> CallbackRegistered -> Running
//! ```
//!
//! The sweep must finish before the approval callback is registered, otherwise
//! a blocked volume mounted before start-up would stay mounted until its next
//! mount attempt.

use std::sync::Arc;

use diskblock_contracts::{ArbitrationBackend, ArbitrationSession, EventLoop};
use diskblock_types::BlockList;

use crate::{BlockListPolicy, ControllerError, Result, SweepReport, sweep};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Uninitialized,
    SessionCreated,
    SweepComplete,
    CallbackRegistered,
    Running,
}

pub struct SessionController<B: ArbitrationBackend> {
    backend: B,
    block_list: Arc<BlockList>,
    session: Option<B::Session>,
    state: ControllerState,
    last_sweep: Option<SweepReport>,
}

impl<B: ArbitrationBackend> SessionController<B> {
    pub fn new(backend: B, block_list: Arc<BlockList>) -> Self {
        Self {
            backend,
            block_list,
            session: None,
            state: ControllerState::Uninitialized,
            last_sweep: None,
        }
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    pub fn last_sweep(&self) -> Option<&SweepReport> {
        self.last_sweep.as_ref()
    }

    /// Create the session, sweep mounted volumes, then register the approval
    /// policy and bind the session to the current event loop.
    ///
    /// Session creation is the only step that can fail. Starting an already
    /// started controller does nothing.
    pub fn start(&mut self) -> Result<()> {
        if self.state != ControllerState::Uninitialized {
            tracing::debug!("controller already started ({:?})", self.state);
            return Ok(());
        }

        let mut session = self.backend.create_session().map_err(|e| {
            tracing::error!("couldn't allocate disk arbitration session: {e}");
            ControllerError::SessionUnavailable(e)
        })?;
        self.transition(ControllerState::SessionCreated);

        self.last_sweep = Some(sweep(&session, &self.block_list));
        self.transition(ControllerState::SweepComplete);

        tracing::info!("registering approval callback for {}", self.block_list);
        session.register_approval(Arc::new(BlockListPolicy::new(self.block_list.clone())));
        session.schedule();
        self.session = Some(session);
        self.transition(ControllerState::CallbackRegistered);

        Ok(())
    }

    /// Park the calling thread in `event_loop`, where approval requests are
    /// dispatched. Only returns if the loop itself stops.
    pub fn run<L: EventLoop + ?Sized>(&mut self, event_loop: &mut L) -> Result<()> {
        if self.state != ControllerState::CallbackRegistered {
            return Err(ControllerError::NotStarted(self.state));
        }

        self.transition(ControllerState::Running);
        tracing::info!("waiting for mount requests");
        event_loop.run();
        tracing::warn!("event loop exited");

        Ok(())
    }

    fn transition(&mut self, next: ControllerState) {
        tracing::debug!("session controller: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diskblock_testing::{FakeArbitration, FakeDisk, ManualEventLoop, SessionEvent, volume_id};
    use diskblock_types::Decision;
    use std::path::PathBuf;

    fn controller(backend: &FakeArbitration) -> SessionController<FakeArbitration> {
        SessionController::new(backend.clone(), Arc::new(BlockList::single(volume_id(1))))
    }

    #[test]
    fn start_sweeps_before_registering() {
        let backend = FakeArbitration::new()
            .with_mounted("/Volumes/MONITOR", Some(volume_id(1)))
            .with_mounted("/Volumes/Other", Some(volume_id(2)));
        let mut controller = controller(&backend);

        controller.start().expect("start");

        assert_eq!(
            backend.journal(),
            vec![
                SessionEvent::SessionCreated,
                SessionEvent::UnmountRequested(PathBuf::from("/Volumes/MONITOR")),
                SessionEvent::ApprovalRegistered,
                SessionEvent::Scheduled,
            ]
        );
        assert_eq!(controller.state(), ControllerState::CallbackRegistered);
        assert_eq!(
            controller.last_sweep().map(|r| r.unmount_requested.clone()),
            Some(vec![volume_id(1)])
        );
    }

    #[test]
    fn refused_session_is_fatal() {
        let backend = FakeArbitration::new().refusing_sessions();
        let mut controller = controller(&backend);

        let err = controller.start().expect_err("session refused");

        assert!(matches!(err, ControllerError::SessionUnavailable(_)));
        assert_eq!(controller.state(), ControllerState::Uninitialized);
        assert!(backend.journal().is_empty());
    }

    #[test]
    fn start_is_idempotent() {
        let backend = FakeArbitration::new().with_mounted("/Volumes/MONITOR", Some(volume_id(1)));
        let mut controller = controller(&backend);

        controller.start().expect("first start");
        controller.start().expect("second start");

        assert_eq!(backend.sessions_created(), 1);
        assert_eq!(backend.unmount_requests().len(), 1);
    }

    #[test]
    fn run_requires_start() {
        let backend = FakeArbitration::new();
        let mut controller = controller(&backend);
        let mut event_loop = ManualEventLoop::default();

        let err = controller.run(&mut event_loop).expect_err("not started");

        assert!(matches!(
            err,
            ControllerError::NotStarted(ControllerState::Uninitialized)
        ));
        assert_eq!(event_loop.runs(), 0);
    }

    #[test]
    fn running_controller_answers_mount_attempts() {
        let backend = FakeArbitration::new();
        let mut controller = controller(&backend);
        let mut event_loop = ManualEventLoop::default();

        controller.start().expect("start");
        controller.run(&mut event_loop).expect("run");

        assert_eq!(controller.state(), ControllerState::Running);
        assert_eq!(event_loop.runs(), 1);
        assert_eq!(
            backend.attempt_mount(&FakeDisk::with_id(volume_id(1))),
            Some(Decision::deny("blocked by diskblock"))
        );
        assert_eq!(
            backend.attempt_mount(&FakeDisk::with_id(volume_id(2))),
            Some(Decision::Allow)
        );
        assert_eq!(
            backend.attempt_mount(&FakeDisk::undescribed()),
            Some(Decision::Allow)
        );
    }
}
