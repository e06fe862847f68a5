/// Client Credential Directory
///
/// A static mapping from short client codes to credentials and a redirect
/// destination, letting multiple prospective-client organizations share one
/// login surface while landing in their own pitch-deck tree. Edited by
/// operators in source; never user-mutable.

/// ClientEntry
///
/// One named client. `code` is unique case-insensitively across the directory;
/// `redirect_path` must point at an existing client route tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEntry {
    pub code: &'static str,
    pub secret: &'static str,
    pub redirect_path: &'static str,
}

pub const CLIENT_DIRECTORY: &[ClientEntry] = &[
    ClientEntry {
        code: "A1",
        secret: "halloffame",
        redirect_path: "/clients/athletes-first/pitch-deck",
    },
    ClientEntry {
        code: "CR8",
        secret: "blueprint",
        redirect_path: "/clients/creait/pitch-deck",
    },
    ClientEntry {
        code: "Z0",
        secret: "firstlight",
        redirect_path: "/clients/zero/investor",
    },
];

/// The single message returned for unknown codes and wrong secrets alike, so
/// responses never reveal which client codes exist.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// DirectoryError
///
/// Authentication failures against the directory. `MissingFields` mirrors the
/// form's required-field validation and fires before any lookup; everything
/// else collapses into the one generic variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryError {
    MissingFields,
    InvalidCredentials,
}

impl DirectoryError {
    pub fn message(&self) -> &'static str {
        match self {
            DirectoryError::MissingFields => "Please enter both client code and password",
            DirectoryError::InvalidCredentials => INVALID_CREDENTIALS,
        }
    }
}

/// authenticate
///
/// Normalizes the submitted code (trimmed, uppercased) and checks it against the
/// directory. Unknown code and mismatched secret both return the same generic
/// error. No network call is involved; the directory is in-memory. The matched
/// entry is returned as a value — recording the client identity on the session
/// and acting on the redirect are the caller's decisions.
pub fn authenticate(code: &str, secret: &str) -> Result<&'static ClientEntry, DirectoryError> {
    let code = code.trim();
    if code.is_empty() || secret.is_empty() {
        return Err(DirectoryError::MissingFields);
    }

    let normalized = code.to_uppercase();
    let entry = CLIENT_DIRECTORY
        .iter()
        .find(|entry| entry.code == normalized)
        .ok_or(DirectoryError::InvalidCredentials)?;

    if entry.secret != secret {
        return Err(DirectoryError::InvalidCredentials);
    }

    Ok(entry)
}
