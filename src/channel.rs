use thiserror::Error;

use crate::{Instant, common::Ts};

/// Consumer side of a telemetry sample stream.
pub trait Receiver<T> {
    fn try_recv(&mut self) -> Option<Ts<T>>;

    /// Drains the stream and keeps only the newest sample.
    fn try_recv_last(&mut self) -> Option<Ts<T>>;
}

#[derive(Error, Debug)]
#[error("channel full, sample dropped")]
pub struct Full<T>(pub Ts<T>);

pub trait Sender<T> {
    fn try_send(&mut self, ts: Instant, item: T) -> Result<(), Full<T>>;
}
