use core::sync::atomic::{AtomicBool, Ordering};

use alloc::sync::Arc;
use heapless::mpmc::MpMcQueue;

use crate::{
    Instant,
    channel::{Full, Receiver, Sender},
    common::Ts,
    messages::TelemetryMessage,
};

const QUEUE_SIZE: usize = 64;

/// Fixed-capacity, lock-free queue carrying timestamped telemetry messages
/// from sampling contexts to the frame writer.
#[derive(Default)]
pub struct SampleQueue {
    inner: Arc<SampleQueueInner>,
}

#[derive(Default)]
struct SampleQueueInner {
    queue: MpMcQueue<Ts<TelemetryMessage>, QUEUE_SIZE>,
    overflow_signal: AtomicBool,
}

impl SampleQueue {
    pub fn new() -> Self {
        SampleQueue {
            inner: Arc::new(SampleQueueInner::default()),
        }
    }

    pub fn publisher(&self) -> SamplePublisher {
        SamplePublisher {
            inner: self.inner.clone(),
        }
    }

    pub fn consumer(&self) -> SampleConsumer {
        SampleConsumer {
            inner: self.inner.clone(),
        }
    }

    pub fn pop(&self) -> Option<Ts<TelemetryMessage>> {
        self.inner.queue.dequeue()
    }

    pub fn overflow_signaled(&self) -> bool {
        self.inner.overflow_signal.load(Ordering::SeqCst)
    }

    pub fn clear_overflow_signal(&self) {
        self.inner.overflow_signal.store(false, Ordering::SeqCst);
    }
}

pub struct SamplePublisher {
    inner: Arc<SampleQueueInner>,
}

impl SamplePublisher {
    /// Enqueues a sample. When the queue is full the sample is dropped and
    /// the overflow signal is set; publish never blocks.
    pub fn publish(&self, msg: TelemetryMessage, ts: Instant) {
        if self.inner.queue.enqueue(Ts::new(ts, msg)).is_err() {
            self.inner.overflow_signal.store(true, Ordering::SeqCst);
        }
    }
}

impl Sender<TelemetryMessage> for SamplePublisher {
    fn try_send(&mut self, ts: Instant, item: TelemetryMessage) -> Result<(), Full<TelemetryMessage>> {
        self.inner.queue.enqueue(Ts::new(ts, item)).map_err(Full)
    }
}

pub struct SampleConsumer {
    inner: Arc<SampleQueueInner>,
}

impl Receiver<TelemetryMessage> for SampleConsumer {
    fn try_recv(&mut self) -> Option<Ts<TelemetryMessage>> {
        self.inner.queue.dequeue()
    }

    fn try_recv_last(&mut self) -> Option<Ts<TelemetryMessage>> {
        let mut last = None;
        while let Some(item) = self.inner.queue.dequeue() {
            last = Some(item);
        }
        last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InstantU64;
    use crate::messages::{AccelSample, GyroSample};

    fn at(us: u64) -> Instant {
        Instant(InstantU64::from_ticks(us))
    }

    fn accel(x: f32) -> TelemetryMessage {
        TelemetryMessage::Accel(AccelSample { x, y: 0.0, z: 0.0 })
    }

    #[test]
    fn test_publish_then_pop() {
        let queue = SampleQueue::new();
        let publisher = queue.publisher();

        publisher.publish(accel(1.0), at(10));
        publisher.publish(TelemetryMessage::Gyro(GyroSample::default()), at(20));

        let first = queue.pop().unwrap();
        assert_eq!(first.t.0.ticks(), 10);
        assert_eq!(first.v, accel(1.0));

        assert!(queue.pop().is_some());
        assert!(queue.pop().is_none());
    }

    #[test]
    fn test_consumer_try_recv_last() {
        let queue = SampleQueue::new();
        let publisher = queue.publisher();
        let mut consumer = queue.consumer();

        for i in 0..5 {
            publisher.publish(accel(i as f32), at(i));
        }

        let last = consumer.try_recv_last().unwrap();
        assert_eq!(last.v, accel(4.0));
        assert!(consumer.try_recv().is_none());
    }

    #[test]
    fn test_overflow_signal() {
        let queue = SampleQueue::new();
        let publisher = queue.publisher();

        assert!(!queue.overflow_signaled());
        for i in 0..=QUEUE_SIZE as u64 {
            publisher.publish(accel(0.0), at(i));
        }
        assert!(queue.overflow_signaled());

        queue.clear_overflow_signal();
        assert!(!queue.overflow_signaled());
    }

    #[test]
    fn test_try_send_reports_full() {
        let queue = SampleQueue::new();
        let mut publisher = queue.publisher();

        let mut full = None;
        for i in 0..=QUEUE_SIZE as u64 {
            if let Err(err) = publisher.try_send(at(i), accel(0.0)) {
                full = Some(err);
                break;
            }
        }

        let Full(returned) = full.expect("queue never reported full");
        assert_eq!(returned.v, accel(0.0));
        assert!(!queue.overflow_signaled());
    }
}
