//! Signed one-shot flash messages carried in a cookie.
//!
//! The cookie value is `<hex message>.<hex keyed blake3 mac>`. The key is
//! derived from the configured session secret.

use axum::http::{header, HeaderMap, HeaderValue};

/// Cookie name for flash messages.
pub const FLASH_COOKIE: &str = "flash";

const KEY_CONTEXT: &str = "flight-insights 2024 flash cookie signing key";
const FLASH_MAX_AGE_SECS: u32 = 60;

/// Signs and verifies flash cookies.
#[derive(Clone)]
pub struct FlashSigner {
    key: [u8; 32],
}

impl std::fmt::Debug for FlashSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlashSigner").finish_non_exhaustive()
    }
}

impl FlashSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            key: blake3::derive_key(KEY_CONTEXT, secret.as_bytes()),
        }
    }

    /// Encode and sign a message as a cookie value.
    pub fn sign(&self, message: &str) -> String {
        let mac = blake3::keyed_hash(&self.key, message.as_bytes());
        format!("{}.{}", hex_encode(message.as_bytes()), mac.to_hex())
    }

    /// Decode a cookie value, returning the message if the signature holds.
    pub fn verify(&self, value: &str) -> Option<String> {
        let (payload, mac_hex) = value.split_once('.')?;
        let bytes = hex_decode(payload)?;
        let expected = blake3::Hash::from_hex(mac_hex).ok()?;
        // blake3::Hash equality is constant time.
        if blake3::keyed_hash(&self.key, &bytes) != expected {
            return None;
        }
        String::from_utf8(bytes).ok()
    }

    /// `Set-Cookie` value that stores `message`.
    pub fn set_cookie(&self, message: &str) -> HeaderValue {
        let cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            FLASH_COOKIE,
            self.sign(message),
            FLASH_MAX_AGE_SECS
        );
        // Hex and ASCII attributes only.
        HeaderValue::from_str(&cookie).unwrap_or_else(|_| HeaderValue::from_static(""))
    }

    /// Read and verify the flash cookie from request headers.
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == FLASH_COOKIE)
            .and_then(|(_, value)| self.verify(value))
    }
}

/// `Set-Cookie` value that deletes the flash cookie.
pub fn clear_cookie() -> HeaderValue {
    HeaderValue::from_static("flash=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hex_decode(hex: &str) -> Option<Vec<u8>> {
    if hex.len() % 2 != 0 || !hex.is_ascii() {
        return None;
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_and_verify() {
        let signer = FlashSigner::new("secret");
        let value = signer.sign("Please fill in all fields");
        assert_eq!(
            signer.verify(&value),
            Some("Please fill in all fields".to_string())
        );
    }

    #[test]
    fn test_tampered_message_is_rejected() {
        let signer = FlashSigner::new("secret");
        let value = signer.sign("hello");
        let (_, mac) = value.split_once('.').unwrap();
        let forged = format!("{}.{}", hex_encode(b"goodbye"), mac);
        assert_eq!(signer.verify(&forged), None);
    }

    #[test]
    fn test_other_secret_is_rejected() {
        let value = FlashSigner::new("secret").sign("hello");
        assert_eq!(FlashSigner::new("other").verify(&value), None);
    }

    #[test]
    fn test_garbage_is_rejected() {
        let signer = FlashSigner::new("secret");
        assert_eq!(signer.verify("no-dot"), None);
        assert_eq!(signer.verify("zz.abcd"), None);
        assert_eq!(signer.verify("abc.def"), None);
    }

    #[test]
    fn test_read_from_cookie_header() {
        let signer = FlashSigner::new("secret");
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("theme=dark; flash={}", signer.sign("Invalid date format")))
                .unwrap(),
        );
        assert_eq!(signer.read(&headers), Some("Invalid date format".to_string()));
        assert_eq!(signer.read(&HeaderMap::new()), None);
    }

    #[test]
    fn test_set_cookie_attributes() {
        let signer = FlashSigner::new("secret");
        let cookie = signer.set_cookie("hi");
        let text = cookie.to_str().unwrap();
        assert!(text.starts_with("flash="));
        assert!(text.contains("HttpOnly"));
        assert!(clear_cookie().to_str().unwrap().contains("Max-Age=0"));
    }
}
