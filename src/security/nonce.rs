use crate::constants::{DEFAULT_NONCE_LENGTH, NONCE_BUFFER_POOL_SIZE};
use crate::error::SecurityHeadersError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use parking_lot::Mutex;
use smallvec::SmallVec;
use std::sync::Arc;

/// Cryptographically secure byte source used for nonces.
pub trait RandomSource: Send + Sync {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), SecurityHeadersError>;
}

/// Operating system randomness via `getrandom`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRandom;

impl RandomSource for SystemRandom {
    #[inline]
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), SecurityHeadersError> {
        getrandom::getrandom(dest).map_err(|e| SecurityHeadersError::RandomError(e.to_string()))
    }
}

#[derive(Clone)]
pub struct NonceGenerator {
    length: usize,
    source: Arc<dyn RandomSource>,
    buffer_pool: Arc<Mutex<SmallVec<[Vec<u8>; NONCE_BUFFER_POOL_SIZE]>>>,
}

impl std::fmt::Debug for NonceGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonceGenerator")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

impl NonceGenerator {
    #[inline]
    pub fn new(length: usize) -> Self {
        Self::with_source(length, Arc::new(SystemRandom))
    }

    pub fn with_source(length: usize, source: Arc<dyn RandomSource>) -> Self {
        Self {
            length: length.max(1),
            source,
            buffer_pool: Arc::new(Mutex::new(SmallVec::new())),
        }
    }

    /// Base64 encoding of `length` fresh random bytes.
    pub fn generate(&self) -> Result<String, SecurityHeadersError> {
        let mut buffer = self
            .buffer_pool
            .lock()
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(self.length));
        buffer.clear();
        buffer.resize(self.length, 0);

        let filled = self.source.fill_bytes(&mut buffer);
        let encoded = filled.map(|_| BASE64.encode(&buffer));

        buffer.iter_mut().for_each(|b| *b = 0);
        let mut pool = self.buffer_pool.lock();
        if pool.len() < NONCE_BUFFER_POOL_SIZE {
            pool.push(buffer);
        }

        encoded
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for NonceGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_NONCE_LENGTH)
    }
}
