use crate::utils::error::Result;

/// Receives the primes a stream delivers, one call per value, in order.
pub trait PrimeSink {
    fn deliver(&mut self, prime: u32) -> Result<()>;
}

impl<F> PrimeSink for F
where
    F: FnMut(u32),
{
    fn deliver(&mut self, prime: u32) -> Result<()> {
        self(prime);
        Ok(())
    }
}

pub trait StreamConfigProvider: Send + Sync {
    fn prime_count(&self) -> u32;
    fn report_every(&self) -> u32;
    fn queue_capacity(&self) -> usize;
}
