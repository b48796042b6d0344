/***************************************/
/*        3rd party libraries          */
/***************************************/
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::Duration;

/***************************************/
/*           Local modules             */
/***************************************/
use crate::shared::Event;

/// Event waiting in the queue. `seq` keeps insertion order among events
/// available at the same time.
#[derive(Debug, Clone, PartialEq, Eq)]
struct QueuedEvent {
    at: Duration,
    seq: u64,
    event: Event,
}

impl Ord for QueuedEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the heap pops the earliest event first
        other
            .at
            .cmp(&self.at)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/***************************************/
/*             Public API              */
/***************************************/
/// Time-ordered queue of external events.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<QueuedEvent>,
    next_seq: u64,
}

impl EventQueue {
    pub fn new() -> EventQueue {
        EventQueue::default()
    }

    /// Queues `event` to become available once the clock reaches `at`.
    pub fn push(&mut self, at: Duration, event: Event) {
        self.heap.push(QueuedEvent {
            at,
            seq: self.next_seq,
            event,
        });
        self.next_seq += 1;
    }

    /// Earliest event and the time it becomes available.
    pub fn first(&self) -> Option<(Duration, &Event)> {
        self.heap.peek().map(|queued| (queued.at, &queued.event))
    }

    /// Earliest event if it is available at `now`.
    pub fn available(&self, now: Duration) -> Option<&Event> {
        match self.first() {
            Some((at, event)) if at <= now => Some(event),
            _ => None,
        }
    }

    pub fn pop(&mut self) -> Option<(Duration, Event)> {
        self.heap.pop().map(|queued| (queued.at, queued.event))
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

/***************************************/
/*             Unit tests              */
/***************************************/
