//! Bookkeeping for completed and pending requests

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashMap, VecDeque};
use std::time::Duration;

use shared::{Priority, RequestId};
use crate::types::{GenerationRequest, GenerationResult};

/// Default number of completed results kept for reporting
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Fixed-capacity store of recent results, oldest evicted first
#[derive(Debug)]
pub struct CompletionHistory {
    capacity: usize,
    order: VecDeque<RequestId>,
    results: HashMap<RequestId, GenerationResult>,
}

impl CompletionHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            order: VecDeque::with_capacity(capacity),
            results: HashMap::with_capacity(capacity),
        }
    }

    /// Record a result; a result reusing a retained id replaces it in place
    pub fn insert(&mut self, result: GenerationResult) {
        let id = result.request_id.clone();
        if self.results.insert(id.clone(), result).is_some() {
            return;
        }

        self.order.push_back(id);
        while self.order.len() > self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                self.results.remove(&evicted);
            }
        }
    }

    pub fn get(&self, id: &RequestId) -> Option<&GenerationResult> {
        self.results.get(id)
    }

    pub fn contains(&self, id: &RequestId) -> bool {
        self.results.contains_key(id)
    }

    /// Retained results, oldest first
    pub fn recent(&self) -> impl Iterator<Item = &GenerationResult> {
        self.order.iter().filter_map(|id| self.results.get(id))
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Running totals over every completed request, evicted or not
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunningStats {
    pub completed: u64,
    pub succeeded: u64,
    pub total_duration: Duration,
}

impl RunningStats {
    pub fn record(&mut self, result: &GenerationResult) {
        self.completed += 1;
        if result.success {
            self.succeeded += 1;
        }
        self.total_duration += result.duration;
    }

    /// Cumulative wall-clock time in fractional milliseconds
    pub fn total_duration_ms(&self) -> f64 {
        self.total_duration.as_secs_f64() * 1000.0
    }

    pub fn success_rate(&self) -> f64 {
        if self.completed == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.completed as f64
        }
    }

    pub fn average_duration_ms(&self) -> f64 {
        if self.completed == 0 {
            0.0
        } else {
            self.total_duration_ms() / self.completed as f64
        }
    }
}

#[derive(Debug)]
struct QueuedRequest {
    priority: Priority,
    sequence: Reverse<u64>,
    request: GenerationRequest,
}

impl PartialEq for QueuedRequest {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueuedRequest {}

impl PartialOrd for QueuedRequest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedRequest {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .cmp(&other.priority)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Requests waiting to be serviced, highest priority first
///
/// Requests of equal priority leave in submission order. A request already
/// being serviced is never preempted; priority only decides which pending
/// request goes next.
#[derive(Debug, Default)]
pub struct PendingQueue {
    heap: BinaryHeap<QueuedRequest>,
    next_sequence: u64,
}

impl PendingQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, request: GenerationRequest) {
        let sequence = Reverse(self.next_sequence);
        self.next_sequence += 1;
        self.heap.push(QueuedRequest {
            priority: request.priority,
            sequence,
            request,
        });
    }

    pub fn pop(&mut self) -> Option<GenerationRequest> {
        self.heap.pop().map(|queued| queued.request)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Category;
    use crate::types::GenerationMetadata;

    fn result(id: &str, success: bool, millis: u64) -> GenerationResult {
        timed_result(id, success, Duration::from_millis(millis))
    }

    fn timed_result(id: &str, success: bool, duration: Duration) -> GenerationResult {
        GenerationResult {
            request_id: RequestId::from_string(id),
            success,
            output: String::new(),
            duration,
            confidence: 0.0,
            error: None,
            metadata: GenerationMetadata {
                category: Category::General,
                used_completion: false,
                collaborator: None,
                quality_score: None,
                suggestions: Vec::new(),
            },
        }
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = CompletionHistory::new(2);
        history.insert(result("a", true, 1));
        history.insert(result("b", true, 1));
        history.insert(result("c", true, 1));

        assert_eq!(history.len(), 2);
        assert!(!history.contains(&RequestId::from_string("a")));
        let ids: Vec<_> = history.recent().map(|r| r.request_id.to_string()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_history_replaces_same_id() {
        let mut history = CompletionHistory::new(2);
        history.insert(result("a", false, 1));
        history.insert(result("a", true, 1));

        assert_eq!(history.len(), 1);
        assert!(history.get(&RequestId::from_string("a")).unwrap().success);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let history = CompletionHistory::new(0);
        assert_eq!(history.capacity(), 1);
    }

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();
        assert_eq!(stats.success_rate(), 0.0);

        stats.record(&result("a", true, 100));
        stats.record(&result("b", false, 300));

        assert_eq!(stats.completed, 2);
        assert_eq!(stats.success_rate(), 0.5);
        assert_eq!(stats.average_duration_ms(), 200.0);
    }

    #[test]
    fn test_running_stats_keep_sub_millisecond_time() {
        let durations = [
            Duration::from_micros(350),
            Duration::from_micros(420),
            Duration::from_nanos(999_999),
        ];
        let mut stats = RunningStats::default();
        for (n, duration) in durations.iter().enumerate() {
            stats.record(&timed_result(&n.to_string(), true, *duration));
        }

        let expected: Duration = durations.iter().sum();
        assert_eq!(stats.total_duration, expected);
        assert!((stats.total_duration_ms() - expected.as_secs_f64() * 1000.0).abs() < 1e-9);
        assert!((stats.average_duration_ms() - stats.total_duration_ms() / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_queue_priority_then_fifo() {
        let mut queue = PendingQueue::new();
        queue.push(GenerationRequest::new("first normal").with_priority(Priority::Normal));
        queue.push(GenerationRequest::new("low").with_priority(Priority::Low));
        queue.push(GenerationRequest::new("critical").with_priority(Priority::Critical));
        queue.push(GenerationRequest::new("second normal").with_priority(Priority::Normal));

        let order: Vec<_> = std::iter::from_fn(|| queue.pop()).map(|r| r.input).collect();
        assert_eq!(order, vec!["critical", "first normal", "second normal", "low"]);
        assert!(queue.is_empty());
    }
}
