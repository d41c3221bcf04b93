//! Product code generation
//!
//! A code format is a literal letter prefix followed by a run of `1`s,
//! one per random digit: `EUK111111` yields codes like `EUK042917`.

use std::collections::HashSet;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use tracing::{trace, warn};

use crate::database::StockStore;
use crate::error::{StockError, Result};

/// Digit count used when a pattern has no run of `1`s
pub const DEFAULT_DIGIT_COUNT: usize = 6;

/// Parsed product code pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeFormat {
    prefix: String,
    digit_count: usize,
}

impl CodeFormat {
    /// Build a format from its parts
    pub fn new(prefix: impl Into<String>, digit_count: usize) -> Self {
        Self { prefix: prefix.into(), digit_count }
    }

    /// Parse a pattern such as `EUK111111`
    ///
    /// Leading ASCII letters form the prefix and the `1`s straight after
    /// them give the digit count. Anything after the run is ignored. A
    /// pattern without such a run falls back to no prefix and six digits.
    pub fn parse(pattern: &str) -> Self {
        let prefix_len = pattern
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(pattern.len());
        let ones = pattern[prefix_len..].chars().take_while(|&c| c == '1').count();

        if ones == 0 {
            return Self::new("", DEFAULT_DIGIT_COUNT);
        }
        Self::new(&pattern[..prefix_len], ones)
    }

    /// Literal prefix of every code
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of random digits after the prefix
    pub fn digit_count(&self) -> usize {
        self.digit_count
    }

    /// Check if a code has this format's shape
    pub fn matches(&self, code: &str) -> bool {
        code.strip_prefix(self.prefix.as_str()).is_some_and(|digits| {
            digits.len() == self.digit_count && digits.bytes().all(|b| b.is_ascii_digit())
        })
    }
}

impl Default for CodeFormat {
    fn default() -> Self {
        Self::parse(crate::DEFAULT_CODE_FORMAT)
    }
}

impl fmt::Display for CodeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.prefix, "1".repeat(self.digit_count))
    }
}

impl FromStr for CodeFormat {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Anything that can tell whether a product code is taken
pub trait CodeLookup {
    fn code_exists(&self, product_code: &str) -> Result<bool>;
}

impl CodeLookup for StockStore {
    fn code_exists(&self, product_code: &str) -> Result<bool> {
        StockStore::code_exists(self, product_code)
    }
}

impl CodeLookup for HashSet<String> {
    fn code_exists(&self, product_code: &str) -> Result<bool> {
        Ok(self.contains(product_code))
    }
}

/// Draw one candidate code, leading zeros allowed
pub fn generate_code<R: Rng + ?Sized>(rng: &mut R, format: &CodeFormat) -> String {
    let mut code = String::with_capacity(format.prefix.len() + format.digit_count);
    code.push_str(&format.prefix);
    for _ in 0..format.digit_count {
        code.push(char::from(b'0' + rng.random_range(0..10u8)));
    }
    code
}

/// Generate a code not yet known to `lookup`
///
/// Gives up with [`StockError::CodeSpaceExhausted`] after
/// [`crate::MAX_CODE_ATTEMPTS`] collisions. The code is not reserved;
/// a concurrent insert can still take it, which the store's unique
/// constraint catches.
pub fn generate_unique_code<L: CodeLookup + ?Sized>(lookup: &L, format: &CodeFormat) -> Result<String> {
    generate_unique_code_with(&mut rand::rng(), lookup, format, crate::MAX_CODE_ATTEMPTS)
}

/// Generate a code with a caller-supplied RNG and attempt budget
pub fn generate_unique_code_with<R, L>(
    rng: &mut R,
    lookup: &L,
    format: &CodeFormat,
    max_attempts: u32,
) -> Result<String>
where
    R: Rng + ?Sized,
    L: CodeLookup + ?Sized,
{
    for attempt in 1..=max_attempts {
        let candidate = generate_code(rng, format);
        if !lookup.code_exists(&candidate)? {
            trace!(code = %candidate, attempt, "product code generated");
            return Ok(candidate);
        }
        trace!(code = %candidate, attempt, "product code collision");
    }

    warn!(format = %format, attempts = max_attempts, "product code space exhausted");
    Err(StockError::CodeSpaceExhausted {
        format: format.to_string(),
        attempts: max_attempts,
    })
}
