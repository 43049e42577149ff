use chrono::Utc;
use futures::stream::{self, Stream, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use uuid::Uuid;

use crate::models::timer::{TimeExpired, TimerEvent, TimerTick};

/// Stream of once-per-second countdown events for one presented question:
/// a tick per elapsed second, then a single time-expired event.
pub fn countdown_stream(
    session_id: Uuid,
    question_index: usize,
    total_seconds: u32,
    tick_interval: Duration,
) -> impl Stream<Item = TimerEvent> {
    stream::unfold(
        (1u32, false),
        move |(elapsed, final_sent)| async move {
            if final_sent {
                return None;
            }

            sleep(tick_interval).await;

            if elapsed >= total_seconds {
                let event = TimerEvent::TimeExpired(TimeExpired {
                    session_id,
                    question_index,
                    timestamp: Utc::now(),
                });
                return Some((event, (elapsed, true)));
            }

            let event = TimerEvent::TimerTick(TimerTick {
                session_id,
                question_index,
                remaining_seconds: total_seconds - elapsed,
                elapsed_seconds: elapsed,
                total_seconds,
                timestamp: Utc::now(),
            });
            Some((event, (elapsed + 1, false)))
        },
    )
}

/// Handle over a spawned countdown task.
///
/// Cancellation is a required invariant, not an optimization: the moment a
/// question leaves `Presented`, its countdown must be stopped so a stale
/// timer can never fire into an already-answered question. Dropping the
/// handle aborts the task as well.
pub struct CountdownHandle {
    task: JoinHandle<()>,
}

impl CountdownHandle {
    pub fn cancel(&self) {
        self.task.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Run a countdown on the runtime, forwarding events into `tx`. The task
/// stops on its own after the expiry event or when the receiver goes away.
pub fn spawn_countdown(
    session_id: Uuid,
    question_index: usize,
    total_seconds: u32,
    tick_interval: Duration,
    tx: mpsc::Sender<TimerEvent>,
) -> CountdownHandle {
    let task = tokio::spawn(async move {
        let stream = countdown_stream(session_id, question_index, total_seconds, tick_interval);
        futures::pin_mut!(stream);
        while let Some(event) = stream.next().await {
            if tx.send(event).await.is_err() {
                tracing::debug!(
                    "Countdown receiver dropped: session={} index={}",
                    session_id,
                    question_index
                );
                break;
            }
        }
    });

    CountdownHandle { task }
}
