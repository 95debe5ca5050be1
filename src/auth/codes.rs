//! The two login codes and their generators.
//!
//! A login attempt uses two unrelated random tokens: a long session code
//! that travels in the verification URL, and a short user code shown only
//! in the terminal. They are distinct types on purpose, so the compiler
//! rejects a user code where a URL parameter is expected.

use std::fmt;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngExt;

/// Symbols a user code may contain. Excludes 0/O and 1/I/L so the code
/// survives human transcription.
pub const USER_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// User codes are always this many symbols.
pub const USER_CODE_LENGTH: usize = 8;

/// High-entropy identifier for one login attempt. Embedded in the
/// verification URL; not secret on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCode(String);

impl SessionCode {
    /// Generate a fresh session code: 32 CSPRNG bytes, URL-safe base64.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let bytes: [u8; 32] = rng.random();
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Short code the user types into the browser to prove they hold the
/// terminal. Shown in the terminal and sent to the server once at
/// registration; never placed in a URL and never logged.
#[derive(Clone, PartialEq, Eq)]
pub struct UserCode(String);

impl UserCode {
    /// Generate a fresh user code, sampled uniformly from the restricted
    /// alphabet (rejection-free: the alphabet size divides 256 evenly,
    /// but `random_range` avoids modulo bias regardless).
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let code: String = (0..USER_CODE_LENGTH)
            .map(|_| USER_CODE_ALPHABET[rng.random_range(0..USER_CODE_ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hyphenated form for the terminal, e.g. `ABCD-EFGH`.
    pub fn display(&self) -> String {
        format!("{}-{}", &self.0[..4], &self.0[4..])
    }
}

// Redacted so the code cannot leak through debug logging.
impl fmt::Debug for UserCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserCode(********)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_code_meets_entropy_floor() {
        // 32 bytes base64-encoded without padding is 43 chars; anything
        // shorter would mean fewer than 256 bits went in.
        let code = SessionCode::generate();
        assert_eq!(code.as_str().len(), 43);
    }

    #[test]
    fn session_code_is_url_safe() {
        let code = SessionCode::generate();
        assert!(
            code.as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn consecutive_session_codes_differ() {
        assert_ne!(SessionCode::generate(), SessionCode::generate());
    }

    #[test]
    fn user_code_has_fixed_length() {
        assert_eq!(UserCode::generate().as_str().len(), USER_CODE_LENGTH);
    }

    #[test]
    fn user_code_stays_in_alphabet() {
        for _ in 0..200 {
            let code = UserCode::generate();
            for c in code.as_str().bytes() {
                assert!(
                    USER_CODE_ALPHABET.contains(&c),
                    "unexpected symbol: {}",
                    c as char
                );
            }
        }
    }

    #[test]
    fn user_code_never_contains_ambiguous_symbols() {
        for _ in 0..200 {
            let code = UserCode::generate();
            for c in code.as_str().chars() {
                assert!(!"0O1IL".contains(c), "ambiguous symbol: {c}");
            }
        }
    }

    #[test]
    fn user_code_display_is_hyphenated() {
        let code = UserCode::generate();
        let shown = code.display();
        assert_eq!(shown.len(), 9);
        assert_eq!(&shown[4..5], "-");
        assert_eq!(shown.replace('-', ""), code.as_str());
    }

    #[test]
    fn consecutive_user_codes_differ() {
        // 32^8 possibilities; a collision here means the sampler is broken.
        assert_ne!(
            UserCode::generate().as_str(),
            UserCode::generate().as_str()
        );
    }

    #[test]
    fn user_code_debug_is_redacted() {
        let code = UserCode::generate();
        let debug = format!("{code:?}");
        assert!(!debug.contains(code.as_str()));
    }
}
