use rand::RngCore;

/// Number of random bytes appended to a photo name.
const SUFFIX_BYTES: usize = 32;

/// Generate the random hex suffix appended to photo display names.
///
/// 32 bytes of entropy, hex-encoded to 64 lowercase characters, which makes
/// display names unique with overwhelming probability even before the
/// database constraint.
pub fn random_suffix() -> String {
    let mut bytes = [0u8; SUFFIX_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
