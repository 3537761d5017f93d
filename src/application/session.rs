//! Runs synchronizer requests on a spawned task so the event loop keeps
//! drawing while a request is in flight.
//!
//! The synchronizer moves into the task and comes back through a oneshot
//! channel when the request is done. While it is away, `list` and `draft`
//! answer from a snapshot and further requests are refused, which keeps the
//! one-request-at-a-time behaviour of the synchronizer.

use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, error};

use super::notice::Notifier;
use super::synchronizer::TodoSynchronizer;
use crate::domain::collection::TodoCollection;
use crate::domain::todo::{Draft, Todo, TodoId};
use crate::error::SyncError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request { Refresh, Submit, Remove(TodoId) }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Completion {
    pub request: Request,
    pub succeeded: bool,
}

enum State<C: TodoCollection, N: Notifier> {
    Idle(TodoSynchronizer<C, N>),
    Pending { request: Request, done: oneshot::Receiver<(TodoSynchronizer<C, N>, Completion)> },
    Lost,
}

pub struct Session<C: TodoCollection, N: Notifier> {
    state: State<C, N>,
    list: Vec<Todo>,
    draft: Draft,
}

impl<C: TodoCollection, N: Notifier> Session<C, N> {
    pub fn new(sync: TodoSynchronizer<C, N>) -> Self {
        Self { state: State::Idle(sync), list: Vec::new(), draft: Draft::default() }
    }

    /// The synchronizer, unless a request currently owns it.
    pub fn idle(&self) -> Option<&TodoSynchronizer<C, N>> {
        match &self.state { State::Idle(sync) => Some(sync), _ => None }
    }

    pub fn idle_mut(&mut self) -> Option<&mut TodoSynchronizer<C, N>> {
        match &mut self.state { State::Idle(sync) => Some(sync), _ => None }
    }

    pub fn pending(&self) -> Option<Request> {
        match &self.state { State::Pending { request, .. } => Some(*request), _ => None }
    }

    pub fn list(&self) -> &[Todo] {
        match &self.state { State::Idle(sync) => sync.list(), _ => &self.list }
    }

    pub fn draft(&self) -> &Draft {
        match &self.state { State::Idle(sync) => sync.draft(), _ => &self.draft }
    }

    /// Hands the synchronizer to a new task. Returns `false` and does nothing
    /// while another request is in flight.
    pub fn start(&mut self, request: Request) -> bool {
        let mut sync = match std::mem::replace(&mut self.state, State::Lost) {
            State::Idle(sync) => sync,
            other => {
                debug!(?request, "busy, request dropped");
                self.state = other;
                return false;
            }
        };
        self.list = sync.list().to_vec();
        self.draft = sync.draft().clone();
        let (tx, done) = oneshot::channel();
        tokio::spawn(async move {
            let result = match request {
                Request::Refresh => sync.fetch_all().await,
                Request::Submit => sync.submit().await,
                Request::Remove(id) => sync.remove(id).await,
            };
            let _ = tx.send((sync, Completion { request, succeeded: result.is_ok() }));
        });
        self.state = State::Pending { request, done };
        true
    }

    /// Takes the synchronizer back if its request has finished.
    pub fn poll(&mut self) -> Result<Option<Completion>, SyncError> {
        let State::Pending { done, .. } = &mut self.state else { return Ok(None) };
        match done.try_recv() {
            Ok((sync, completion)) => {
                self.state = State::Idle(sync);
                Ok(Some(completion))
            }
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Closed) => {
                error!("request task dropped the synchronizer");
                self.state = State::Lost;
                Err(SyncError::WorkerLost)
            }
        }
    }
}
