use actix_web_secure_headers::security::{NonceGenerator, RandomSource};
use actix_web_secure_headers::SecurityHeadersError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

struct Constant(u8);

impl RandomSource for Constant {
    fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), SecurityHeadersError> {
        dest.fill(self.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_length() {
        let generator = NonceGenerator::default();
        assert_eq!(generator.length(), 18);

        let nonce = generator.generate().unwrap();
        assert_eq!(nonce.len(), 24);
        assert_eq!(BASE64.decode(&nonce).unwrap().len(), 18);
    }

    #[test]
    fn test_injected_source() {
        let generator = NonceGenerator::with_source(18, Arc::new(Constant(1)));
        assert_eq!(generator.generate().unwrap(), "AQEBAQEBAQEBAQEBAQEBAQEB");
    }

    #[test]
    fn test_zero_length_is_clamped() {
        let generator = NonceGenerator::with_source(0, Arc::new(Constant(0)));
        assert_eq!(generator.length(), 1);
        assert_eq!(generator.generate().unwrap(), "AA==");
    }

    #[test]
    fn test_nonces_are_unique() {
        let generator = NonceGenerator::new(16);
        let nonces: HashSet<String> = (0..1000).map(|_| generator.generate().unwrap()).collect();
        assert_eq!(nonces.len(), 1000);
    }

    #[test]
    fn test_shared_across_threads() {
        let generator = NonceGenerator::default();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let generator = generator.clone();
                thread::spawn(move || {
                    (0..100)
                        .map(|_| generator.generate().unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for nonce in handle.join().unwrap() {
                assert_eq!(nonce.len(), 24);
                assert!(all.insert(nonce));
            }
        }
        assert_eq!(all.len(), 800);
    }
}
