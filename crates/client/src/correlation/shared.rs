//! Task-shareable handle around a [`Correlator`].
//!
//! The correlator itself needs `&mut self` for every wire operation. This
//! wrapper serializes access behind an async mutex so several tasks can
//! pipeline on the same connection. The lock is held for the whole of a
//! `response` call, including any wire reads it performs; frames drained on
//! behalf of other tasks are buffered for them as usual.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use sc2link_domain::{RequestId, Status};
use sc2link_shared::MessageCodec;

use super::correlator::Correlator;
use super::error::CorrelationError;
use super::status::StatusObserver;
use crate::ports::outbound::{FrameTransport, TransportError};

pub struct SharedCorrelator<T, C: MessageCodec> {
    inner: Arc<Mutex<Correlator<T, C>>>,
    status: StatusObserver,
}

impl<T, C: MessageCodec> Clone for SharedCorrelator<T, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            status: self.status.clone(),
        }
    }
}

impl<T, C> SharedCorrelator<T, C>
where
    T: FrameTransport,
    C: MessageCodec,
{
    pub fn new(correlator: Correlator<T, C>) -> Self {
        let status = correlator.status_observer();
        Self {
            inner: Arc::new(Mutex::new(correlator)),
            status,
        }
    }

    /// Lock-free read of the last drained status.
    pub fn status(&self) -> Status {
        self.status.status()
    }

    pub fn status_observer(&self) -> StatusObserver {
        self.status.clone()
    }

    pub async fn request(&self, message: &C::Request) -> Result<RequestId, CorrelationError> {
        self.inner.lock().await.request(message).await
    }

    pub async fn response(&self, id: RequestId) -> Result<C::Response, CorrelationError> {
        self.inner.lock().await.response(id).await
    }

    /// Send and wait without letting another task slip a request in between.
    pub async fn req_resp(&self, message: &C::Request) -> Result<C::Response, CorrelationError> {
        self.inner.lock().await.req_resp(message).await
    }

    /// The deadline covers waiting for the lock as well as the wire.
    pub async fn response_with_timeout(
        &self,
        id: RequestId,
        timeout: Duration,
    ) -> Result<C::Response, CorrelationError> {
        let outcome = tokio::time::timeout(timeout, self.response(id)).await;
        outcome.unwrap_or(Err(CorrelationError::TimedOut(id)))
    }

    pub async fn close(&self) -> Result<(), TransportError> {
        self.inner.lock().await.close().await
    }
}
