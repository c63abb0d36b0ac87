use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The `ordinal`-th prime (1-based) found by the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimeReport {
    pub ordinal: u32,
    pub value: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    pub primes_found: u32,
    pub delivered: u32,
    pub last_prime: Option<u32>,
    /// The worker stopped before reaching its prime count because nobody was receiving.
    pub cancelled: bool,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    #[serde(rename = "Hello")]
    pub hello: String,
    pub age: i32,
    pub salary: f64,
    pub email: String,
    pub description: String,
}

pub const DEFAULT_PRIME_COUNT: u32 = 10_000;
pub const DEFAULT_REPORT_EVERY: u32 = 1_000;
pub const DEFAULT_QUEUE_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamSettings {
    /// Stop after this many primes have been found.
    pub prime_count: u32,
    /// Deliver every N-th prime.
    pub report_every: u32,
    pub queue_capacity: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            prime_count: DEFAULT_PRIME_COUNT,
            report_every: DEFAULT_REPORT_EVERY,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}
