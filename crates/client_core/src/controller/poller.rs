//! Recurring fetch timer. Dropping the poller cancels it.

use std::time::Duration;

use tokio::{
    sync::mpsc::UnboundedSender,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};

use crate::controller::reducer::Event;

pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub struct Poller {
    task: JoinHandle<()>,
}

impl Poller {
    /// First tick fires one full period after start; the caller has already
    /// issued the immediate fetch.
    pub fn start(period: Duration, events: UnboundedSender<Event>) -> Self {
        let period = period.max(MIN_POLL_INTERVAL);
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if events.send(Event::PollTick).is_err() {
                    break;
                }
            }
        });
        Self { task }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_period_until_dropped() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let poller = Poller::start(Duration::from_secs(15), tx);

        tokio::time::sleep(Duration::from_secs(14)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(32)).await;
        let mut ticks = 0;
        while rx.try_recv().is_ok() {
            ticks += 1;
        }
        assert_eq!(ticks, 3);

        drop(poller);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_is_clamped() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _poller = Poller::start(Duration::ZERO, tx);

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(matches!(rx.try_recv(), Ok(Event::PollTick)));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_receiver_is_gone() {
        let (tx, rx) = mpsc::unbounded_channel();
        let poller = Poller::start(Duration::from_secs(1), tx);
        drop(rx);

        tokio::time::sleep(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert!(poller.is_finished());
    }
}
