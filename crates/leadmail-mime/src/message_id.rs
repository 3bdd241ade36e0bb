//! Message-ID generation.

use uuid::Uuid;

/// Generates a `Message-ID` header value: a random 128-bit value,
/// hex-encoded, at the given domain. Randomness gives practical
/// uniqueness per message without any central counter, so concurrent
/// sends never collide.
#[must_use]
pub fn generate(domain: &str) -> String {
    format!("<{}@{domain}>", Uuid::new_v4().simple())
}
