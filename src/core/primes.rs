use crate::domain::model::PrimeReport;

pub fn is_prime(n: u32) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }

    let n = u64::from(n);
    let mut divisor = 3u64;
    while divisor * divisor <= n {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}

/// Number of primes below 2^32.
pub const MAX_PRIME_COUNT: u32 = 203_280_221;

/// Walks the primes from 2 upward and yields every `report_every`-th one,
/// stopping once `prime_count` primes have been seen.
#[derive(Debug, Clone)]
pub struct ReportingPrimes {
    prime_count: u32,
    report_every: u32,
    found: u32,
    candidate: u32,
}

impl ReportingPrimes {
    pub fn new(prime_count: u32, report_every: u32) -> Self {
        Self {
            prime_count,
            report_every: report_every.max(1),
            found: 0,
            candidate: 2,
        }
    }

    /// Primes examined so far, reported or not.
    pub fn primes_found(&self) -> u32 {
        self.found
    }

    pub fn is_exhausted(&self) -> bool {
        self.found >= self.prime_count
    }

    /// Like `next`, but checks `stop` after every prime found and gives up
    /// as soon as it returns true.
    pub fn next_until<P>(&mut self, mut stop: P) -> Option<PrimeReport>
    where
        P: FnMut() -> bool,
    {
        while self.found < self.prime_count {
            let n = self.candidate;
            self.candidate = self.candidate.checked_add(1)?;
            if !is_prime(n) {
                continue;
            }

            self.found += 1;
            if stop() {
                return None;
            }
            if self.found % self.report_every == 0 {
                return Some(PrimeReport {
                    ordinal: self.found,
                    value: n,
                });
            }
        }
        None
    }
}

impl Iterator for ReportingPrimes {
    type Item = PrimeReport;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_until(|| false)
    }
}

/// Number of primes in `[x, y]`. `x` below 2 is treated as 2.
pub fn count_primes_in_range(x: i32, y: i32) -> u32 {
    let start = x.max(2);
    if y < start {
        return 0;
    }

    (start..=y).filter(|&n| is_prime(n as u32)).count() as u32
}
