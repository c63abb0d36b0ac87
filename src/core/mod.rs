pub mod driver;
pub mod primes;
pub mod sample;
pub mod stream;

pub use crate::domain::model::{PrimeReport, Profile, StreamSettings, StreamSummary};
pub use crate::domain::ports::{PrimeSink, StreamConfigProvider};
pub use crate::utils::error::Result;
