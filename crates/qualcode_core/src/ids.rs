//! Identity generation for new entities.
//!
//! # Responsibility
//! - Produce prefixed, session-unique identifiers (`<prefix>-<suffix>`).
//!
//! # Invariants
//! - One generator never returns the same id twice.
//! - The fallback source is only practically unique across generators.
//! - A UUID generator whose entropy source fails switches to the fallback
//!   scheme for that id instead of panicking.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::RandomState;
use std::hash::BuildHasher;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::{Builder, Uuid};

/// Fills a buffer with cryptographic randomness.
pub type RandomFill = fn(&mut [u8]) -> Result<(), getrandom::Error>;

/// Source of the random part of generated ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdSource {
    /// Random v4 UUID.
    #[default]
    Uuid,
    /// Wall clock + counter + hashed noise, for hosts without an entropy source.
    Fallback,
}

/// Prefixed id generator owned by one store.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    source: IdSource,
    counter: u64,
    noise: RandomState,
    fill: RandomFill,
}

impl IdGenerator {
    pub fn new(source: IdSource) -> Self {
        Self::with_random_fill(source, getrandom::fill)
    }

    /// Uses `fill` as the UUID entropy source.
    pub fn with_random_fill(source: IdSource, fill: RandomFill) -> Self {
        Self {
            source,
            counter: 0,
            noise: RandomState::new(),
            fill,
        }
    }

    pub fn source(&self) -> IdSource {
        self.source
    }

    /// Returns a new id formatted `<prefix>-<suffix>`.
    pub fn create_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        match self.source {
            IdSource::Uuid => match self.random_uuid() {
                Ok(uuid) => format!("{prefix}-{uuid}"),
                Err(err) => {
                    warn!("event=id_entropy module=ids status=error fallback=true error={err}");
                    self.fallback_id(prefix)
                }
            },
            IdSource::Fallback => self.fallback_id(prefix),
        }
    }

    fn random_uuid(&self) -> Result<Uuid, getrandom::Error> {
        let mut bytes = [0_u8; 16];
        (self.fill)(&mut bytes)?;
        Ok(Builder::from_random_bytes(bytes).into_uuid())
    }

    fn fallback_id(&self, prefix: &str) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default();
        let noise = self.noise.hash_one((millis, self.counter));
        format!("{prefix}-{millis:x}-{:x}-{noise:016x}", self.counter)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(IdSource::default())
    }
}

/// Returns a UUID-backed id formatted `<prefix>-<uuid>`, or a fallback id
/// when the entropy source is unavailable.
pub fn create_id(prefix: &str) -> String {
    IdGenerator::default().create_id(prefix)
}

#[cfg(test)]
mod tests {
    use super::{create_id, IdGenerator, IdSource};
    use std::collections::HashSet;
    use uuid::{Builder, Uuid};

    fn unavailable(_: &mut [u8]) -> Result<(), getrandom::Error> {
        Err(getrandom::Error::UNSUPPORTED)
    }

    fn sevens(buf: &mut [u8]) -> Result<(), getrandom::Error> {
        buf.fill(7);
        Ok(())
    }

    #[test]
    fn uuid_ids_carry_prefix_and_parse_as_uuid() {
        let id = create_id("code");
        let suffix = id.strip_prefix("code-").expect("prefix should be kept");
        assert!(uuid::Uuid::parse_str(suffix).is_ok());
    }

    #[test]
    fn fallback_ids_are_unique_within_one_generator() {
        let mut ids = IdGenerator::new(IdSource::Fallback);
        let generated: HashSet<String> = (0..1_000).map(|_| ids.create_id("memo")).collect();
        assert_eq!(generated.len(), 1_000);
        assert!(generated.iter().all(|id| id.starts_with("memo-")));
    }

    #[test]
    fn uuid_source_builds_v4_ids_from_filled_bytes() {
        let mut ids = IdGenerator::with_random_fill(IdSource::Uuid, sevens);
        let expected = Builder::from_random_bytes([7; 16]).into_uuid();
        let id = ids.create_id("code");
        assert_eq!(id, format!("code-{expected}"));
        assert_eq!(expected.get_version_num(), 4);
    }

    #[test]
    fn uuid_source_falls_back_when_entropy_is_unavailable() {
        let mut ids = IdGenerator::with_random_fill(IdSource::Uuid, unavailable);
        let first = ids.create_id("memo");
        let second = ids.create_id("memo");

        assert_ne!(first, second);
        let suffix = first.strip_prefix("memo-").expect("prefix should be kept");
        assert!(Uuid::parse_str(suffix).is_err());
        assert_eq!(suffix.split('-').count(), 3);
        assert_eq!(ids.source(), IdSource::Uuid);
    }
}
