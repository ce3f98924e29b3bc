/// Result of validating a user-supplied photo name.
#[derive(Debug)]
pub enum PhotoNameError {
    /// Name is empty or whitespace-only.
    Empty,
    /// Name is shorter than the minimum length.
    TooShort,
    /// Name is longer than the maximum length.
    TooLong,
    /// Name contains path separators (`/` or `\`).
    ContainsPathSeparator,
    /// Name contains null bytes.
    NullByte,
    /// Name starts with a dot (hidden file).
    Hidden,
    /// Name contains control characters (CR, LF, etc.).
    ControlCharacter,
}

/// Minimum length of a photo name in characters.
pub const MIN_NAME_CHARS: usize = 8;
/// Maximum length of a photo name in characters.
pub const MAX_NAME_CHARS: usize = 128;

impl PhotoNameError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> String {
        match self {
            Self::Empty => "Photo name cannot be empty".into(),
            Self::TooShort => {
                format!("The photo name must be at least {MIN_NAME_CHARS} characters long")
            }
            Self::TooLong => {
                format!("The photo name must be at most {MAX_NAME_CHARS} characters long")
            }
            Self::ContainsPathSeparator => {
                "Invalid photo name: path separators are not allowed".into()
            }
            Self::NullByte => "Invalid photo name: null bytes are not allowed".into(),
            Self::Hidden => "Invalid photo name: names starting with '.' are not allowed".into(),
            Self::ControlCharacter => {
                "Invalid photo name: control characters are not allowed".into()
            }
        }
    }
}

/// Validates a user-supplied photo name.
///
/// The name becomes part of a media path and of a `Content-Disposition`
/// header, so path separators and control characters are rejected outright.
pub fn validate_photo_name(name: &str) -> Result<&str, PhotoNameError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(PhotoNameError::Empty);
    }

    if trimmed.contains('\0') {
        return Err(PhotoNameError::NullByte);
    }

    // Reject ASCII control characters to prevent
    // HTTP header injection (e.g. CRLF in Content-Disposition).
    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(PhotoNameError::ControlCharacter);
    }

    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(PhotoNameError::ContainsPathSeparator);
    }

    if trimmed.starts_with('.') {
        return Err(PhotoNameError::Hidden);
    }

    let chars = trimmed.chars().count();
    if chars < MIN_NAME_CHARS {
        return Err(PhotoNameError::TooShort);
    }
    if chars > MAX_NAME_CHARS {
        return Err(PhotoNameError::TooLong);
    }

    Ok(trimmed)
}

/// Extracts a safe, lowercased file extension from an uploaded filename.
///
/// Returns `None` when there is no extension or it looks suspicious
/// (non-alphanumeric, or longer than 8 characters).
pub fn safe_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;

    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(ext.to_ascii_lowercase())
}
