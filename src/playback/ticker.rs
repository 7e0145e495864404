use std::{
    sync::mpsc::Sender,
    time::Duration,
};

use tokio::{
    runtime::Handle,
    task::JoinHandle,
    time::{
        interval_at,
        Instant,
        MissedTickBehavior,
    },
};

use super::types::PlaybackEvent;
use crate::core::tasks::RepaintHook;

/// Periodic skim tick. Aborted on stop or drop; the owner also filters by generation.
pub struct SkimTicker {
    generation: u64,
    task: JoinHandle<()>,
}

impl SkimTicker {
    pub fn start(
        runtime: &Handle,
        period: Duration,
        generation: u64,
        events: Sender<PlaybackEvent>,
        repaint: Option<RepaintHook>,
    ) -> Self {
        let task = runtime.spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;
                if events.send(PlaybackEvent::SkimTick { generation }).is_err() {
                    break;
                }
                if let Some(repaint) = &repaint {
                    repaint();
                }
            }
        });

        Self { generation, task }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for SkimTicker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;

    use tokio::runtime::Runtime;

    use super::*;

    #[test]
    fn test_ticks_carry_generation_and_stop() {
        let runtime = Runtime::new().unwrap();
        let (sender, receiver) = mpsc::channel();

        let ticker =
            SkimTicker::start(runtime.handle(), Duration::from_millis(5), 3, sender, None);
        assert_eq!(ticker.generation(), 3);

        let first = receiver.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(first, PlaybackEvent::SkimTick { generation: 3 });

        ticker.stop();
        std::thread::sleep(Duration::from_millis(50));
        while receiver.try_recv().is_ok() {}
        std::thread::sleep(Duration::from_millis(50));
        assert!(receiver.try_recv().is_err());
    }
}
