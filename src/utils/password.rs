use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::Hmac;
use pbkdf2::pbkdf2;
use rand::Rng;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const ITERATIONS: u32 = 260_000;
const KEY_LENGTH: usize = 32;

/// Hash un mot de passe avec PBKDF2-HMAC-SHA256 (salt aléatoire de 16 bytes).
/// Format stocké: pbkdf2:sha256:iterations$salt$hash
pub fn hash_password(password: &str) -> Result<String, String> {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill(&mut salt);

    let mut key = [0u8; KEY_LENGTH];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, ITERATIONS, &mut key)
        .map_err(|e| format!("PBKDF2 hash generation failed: {}", e))?;

    let salt_b64 = URL_SAFE_NO_PAD.encode(salt);
    let hash_b64 = URL_SAFE_NO_PAD.encode(key);

    Ok(format!("pbkdf2:sha256:{}${}${}", ITERATIONS, salt_b64, hash_b64))
}

/// Vérifie un mot de passe contre un hash stocké
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, String> {
    let parts: Vec<&str> = stored_hash.split('$').collect();
    if parts.len() != 3 {
        return Err("Invalid hash format".to_string());
    }

    let header_parts: Vec<&str> = parts[0].split(':').collect();
    if header_parts.len() != 3 || header_parts[0] != "pbkdf2" || header_parts[1] != "sha256" {
        return Err("Invalid header".to_string());
    }

    let iterations = header_parts[2]
        .parse::<u32>()
        .map_err(|_| "Invalid iterations".to_string())?;

    let salt = URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| format!("Salt decode failed: {}", e))?;
    let expected_hash = URL_SAFE_NO_PAD
        .decode(parts[2])
        .map_err(|e| format!("Hash decode failed: {}", e))?;

    let mut computed = vec![0u8; expected_hash.len()];
    pbkdf2::<HmacSha256>(password.as_bytes(), &salt, iterations, &mut computed)
        .map_err(|e| format!("PBKDF2 hash verification failed: {}", e))?;

    Ok(computed == expected_hash)
}

/// Score de force d'un mot de passe (0 à 5), même barème que le front.
/// L'inscription exige un score d'au moins 3.
pub fn password_strength(password: &str) -> u8 {
    let mut score = 0u8;
    if password.len() >= 8 {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 1;
    }
    score
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("S3cret!pass").unwrap();
        assert!(hash.starts_with("pbkdf2:sha256:260000$"));
        assert!(verify_password("S3cret!pass", &hash).unwrap());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("S3cret!pass").unwrap();
        assert!(!verify_password("other-password", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash() {
        assert!(verify_password("x", "not-a-hash").is_err());
        assert!(verify_password("x", "bcrypt:10$abc$def").is_err());
    }

    #[test]
    fn test_password_strength_scoring() {
        assert_eq!(password_strength(""), 0);
        assert_eq!(password_strength("abc"), 1); // minuscules seulement
        assert_eq!(password_strength("abcdefgh"), 2); // + longueur
        assert_eq!(password_strength("Abcdefg1"), 4);
        assert_eq!(password_strength("Abcdefg1!"), 5);
    }
}
