use crate::{decode::Interpreted, LunexError};

/// Classification of one attempt.
#[derive(Debug)]
pub(crate) enum AttemptOutcome {
    Success(Interpreted),
    /// Transport or timeout failure; another attempt may be made.
    Recoverable(LunexError),
    /// HTTP status, parse or configuration failure; ends the call.
    Fatal(LunexError),
}

impl From<Result<Interpreted, LunexError>> for AttemptOutcome {
    fn from(result: Result<Interpreted, LunexError>) -> Self {
        match result {
            Ok(interpreted) => Self::Success(interpreted),
            Err(err) if err.is_retryable() => Self::Recoverable(err),
            Err(err) => Self::Fatal(err),
        }
    }
}

/// Attempt counter for one logical call.
#[derive(Debug)]
pub(crate) struct RetryState {
    attempt: usize,
    max_retries: usize,
}

impl RetryState {
    pub fn new(max_retries: usize) -> Self {
        Self {
            attempt: 0,
            max_retries,
        }
    }

    /// Zero-based index of the current attempt.
    pub fn attempt(&self) -> usize {
        self.attempt
    }

    /// Attempts performed so far, counting the current one.
    pub fn attempts(&self) -> usize {
        self.attempt + 1
    }

    pub fn can_retry(&self) -> bool {
        self.attempt < self.max_retries
    }

    /// Moves to the next attempt and returns the backoff index for the delay
    /// that precedes it.
    pub fn advance(&mut self) -> usize {
        let index = self.attempt;
        self.attempt += 1;
        index
    }
}

/// Exponential backoff: `base_ms * 2^index`, exponent capped at 16, saturating.
pub(crate) fn backoff_delay_ms(base_ms: u64, index: usize) -> u64 {
    let exp = index.min(16) as u32;
    let multiplier = 1u64 << exp;
    base_ms.saturating_mul(multiplier)
}
