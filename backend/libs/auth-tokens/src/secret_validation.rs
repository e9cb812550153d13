//! Signing secret strength validation
//!
//! HS256 security rests entirely on the shared secret, so weak secrets are
//! rejected before a codec is ever built from them.

const MIN_SECRET_LENGTH: usize = 32; // 256 bits minimum
const RECOMMENDED_SECRET_LENGTH: usize = 64; // 512 bits recommended
const MIN_ENTROPY_BITS: f64 = 4.0;
const STRONG_ENTROPY_BITS: f64 = 5.0;

/// Secret strength classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretStrength {
    /// Weak secret - REJECT
    Weak,
    /// Acceptable secret - WARN
    Acceptable,
    /// Strong secret - OK
    Strong,
}

/// Classify an HS256 signing secret
///
/// **Criteria**:
/// - Minimum 32 bytes (256 bits)
/// - Shannon entropy >= 4.0 bits/byte
/// - No runs of 4 repeated or sequential bytes
/// - Strong: >= 64 bytes and entropy >= 5.0 bits/byte
pub fn validate_secret_strength(secret: &str) -> SecretStrength {
    let bytes = secret.as_bytes();

    if bytes.len() < MIN_SECRET_LENGTH {
        return SecretStrength::Weak;
    }

    let entropy = calculate_shannon_entropy(bytes);
    if entropy < MIN_ENTROPY_BITS || has_obvious_patterns(bytes) {
        return SecretStrength::Weak;
    }

    if bytes.len() >= RECOMMENDED_SECRET_LENGTH && entropy >= STRONG_ENTROPY_BITS {
        SecretStrength::Strong
    } else {
        SecretStrength::Acceptable
    }
}

/// Shannon entropy in bits per byte (0-8 scale)
fn calculate_shannon_entropy(data: &[u8]) -> f64 {
    let mut freq = [0u32; 256];
    for &byte in data {
        freq[byte as usize] += 1;
    }

    let len = data.len() as f64;
    freq.iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Runs of 4 identical bytes ("aaaa") or 4 ascending bytes ("abcd", "1234")
fn has_obvious_patterns(data: &[u8]) -> bool {
    let mut same = 1;
    let mut ascending = 1;

    for window in data.windows(2) {
        same = if window[0] == window[1] { same + 1 } else { 1 };
        ascending = if window[1] as i16 - window[0] as i16 == 1 {
            ascending + 1
        } else {
            1
        };

        if same >= 4 || ascending >= 4 {
            return true;
        }
    }

    false
}
