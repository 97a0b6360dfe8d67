use crate::core::codec;
use crate::domain::error::CodecError;
use crate::domain::model::{Digit, Ean13, Payload, Prefix, PAYLOAD_LEN};
use crate::domain::ports::{ExclusionSet, NoExclusions};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};

pub const DEFAULT_MAX_ATTEMPTS: u64 = 100_000;
pub const DEFAULT_SCAN_THRESHOLD: u64 = 1_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// Upper bound on candidates examined by one `generate` call.
    pub max_attempts: u64,
    /// Consecutive rejected random draws before switching to a sequential
    /// scan of the free space.
    pub scan_threshold: u64,
    /// Wall-clock budget for one `generate` call.
    #[serde(default, with = "optional_millis")]
    pub time_budget: Option<Duration>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            scan_threshold: DEFAULT_SCAN_THRESHOLD,
            time_budget: None,
        }
    }
}

mod optional_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        value
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}

/// What a generated code must satisfy.
pub struct Constraint<'a> {
    pub prefix: Prefix,
    pub exclusions: &'a dyn ExclusionSet,
}

impl<'a> Constraint<'a> {
    pub fn new(prefix: Prefix, exclusions: &'a dyn ExclusionSet) -> Self {
        Self { prefix, exclusions }
    }

    pub fn with_prefix(prefix: Prefix) -> Constraint<'static> {
        Constraint {
            prefix,
            exclusions: &NoExclusions,
        }
    }

    pub fn unconstrained() -> Constraint<'static> {
        Constraint::with_prefix(Prefix::empty())
    }

    /// Count of payloads that carry the prefix, excluded or not.
    pub fn search_space(&self) -> u64 {
        10u64.pow(self.prefix.free_positions() as u32)
    }
}

/// Draws random codes that honour a [`Constraint`].
///
/// Candidates are drawn uniformly; after `scan_threshold` consecutive
/// rejections the engine walks the free space in order from a random start,
/// so it always terminates once every candidate has been seen. Successive
/// results carry no ordering guarantee.
#[derive(Debug)]
pub struct ConstraintEngine<R: Rng = StdRng> {
    rng: R,
    settings: GeneratorSettings,
}

impl ConstraintEngine<StdRng> {
    pub fn new(settings: GeneratorSettings) -> Self {
        Self::with_rng(StdRng::from_entropy(), settings)
    }

    pub fn seeded(seed: u64, settings: GeneratorSettings) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), settings)
    }
}

impl<R: Rng> ConstraintEngine<R> {
    pub fn with_rng(rng: R, settings: GeneratorSettings) -> Self {
        Self { rng, settings }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// One fresh code. The caller records it in its exclusion set before
    /// asking again; nothing is remembered here.
    pub fn generate(&mut self, constraint: &Constraint<'_>) -> Result<Ean13, CodecError> {
        let space = constraint.search_space();
        let deadline = self.settings.time_budget.map(|budget| Instant::now() + budget);
        let mut budget = Budget {
            attempts: 0,
            max_attempts: self.settings.max_attempts,
            deadline,
        };

        let mut rejections = 0u64;
        while rejections < self.settings.scan_threshold {
            budget.spend()?;
            let index = self.rng.gen_range(0..space);
            let code = candidate(&constraint.prefix, index);
            if !constraint.exclusions.contains(&code) {
                tracing::trace!(%code, attempts = budget.attempts, "accepted random candidate");
                return Ok(code);
            }
            rejections += 1;
        }

        tracing::debug!(
            prefix = %constraint.prefix,
            rejections,
            space,
            "switching to sequential scan"
        );
        let start = self.rng.gen_range(0..space);
        for step in 0..space {
            budget.spend()?;
            let code = candidate(&constraint.prefix, (start + step) % space);
            if !constraint.exclusions.contains(&code) {
                tracing::trace!(%code, attempts = budget.attempts, "accepted scanned candidate");
                return Ok(code);
            }
        }

        tracing::warn!(prefix = %constraint.prefix, space, "every candidate is excluded");
        Err(CodecError::Exhausted {
            attempts: budget.attempts,
        })
    }

    /// `count` distinct codes. Each accepted code is excluded from the rest of
    /// the run; on exhaustion nothing is returned.
    pub fn generate_many(
        &mut self,
        constraint: &Constraint<'_>,
        count: usize,
    ) -> Result<Vec<Ean13>, CodecError> {
        let mut run = RunExclusions {
            base: constraint.exclusions,
            accepted: HashSet::with_capacity(count),
        };
        let mut codes = Vec::with_capacity(count);
        for _ in 0..count {
            let code = {
                let scoped = Constraint::new(constraint.prefix.clone(), &run);
                self.generate(&scoped)?
            };
            run.accepted.insert(code);
            codes.push(code);
        }
        Ok(codes)
    }
}

struct Budget {
    attempts: u64,
    max_attempts: u64,
    deadline: Option<Instant>,
}

impl Budget {
    fn spend(&mut self) -> Result<(), CodecError> {
        let expired = self.deadline.is_some_and(|d| Instant::now() >= d);
        if self.attempts >= self.max_attempts || expired {
            tracing::warn!(attempts = self.attempts, expired, "generation budget spent");
            return Err(CodecError::Exhausted {
                attempts: self.attempts,
            });
        }
        self.attempts += 1;
        Ok(())
    }
}

struct RunExclusions<'a> {
    base: &'a dyn ExclusionSet,
    accepted: HashSet<Ean13>,
}

impl ExclusionSet for RunExclusions<'_> {
    fn contains(&self, code: &Ean13) -> bool {
        self.accepted.contains(code) || self.base.contains(code)
    }
}

/// The code whose free payload positions spell `index` in decimal.
fn candidate(prefix: &Prefix, mut index: u64) -> Ean13 {
    let mut digits = [Digit::ZERO; PAYLOAD_LEN];
    digits[..prefix.len()].copy_from_slice(prefix.digits());
    for slot in digits[prefix.len()..].iter_mut().rev() {
        *slot = Digit::new_unchecked((index % 10) as u8);
        index /= 10;
    }
    codec::encode(&Payload::new(digits))
}
