use crate::error::AppError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Lifetime of an issued token.
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

/// The only signing algorithm accepted on verification.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims encoded within an identity token.
///
/// Decoding is strict: a token with a missing or mistyped claim fails to
/// decode instead of yielding a partial identity.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Identifier of the authenticated user.
    pub user_id: i32,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Issues and verifies signed, time-limited identity tokens.
///
/// Implementations are stateless: there is no session table, so a token
/// stays valid until it expires.
pub trait TokenService: Send + Sync {
    /// Signs a token for `user_id` that expires after [`TOKEN_LIFETIME_HOURS`].
    fn issue(&self, user_id: i32) -> Result<String, AppError>;

    /// Returns the user id embedded in `token`.
    ///
    /// Fails with `AppError::InvalidToken` when the token is malformed,
    /// carries a bad signature, uses another algorithm, or has expired.
    fn verify(&self, token: &str) -> Result<i32, AppError>;
}

/// HS256 JSON Web Token implementation of [`TokenService`].
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    /// Creates a service signing with the symmetric `secret`.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(ALGORITHM), claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }
}

impl TokenService for JwtService {
    fn issue(&self, user_id: i32) -> Result<String, AppError> {
        let now = chrono::Utc::now();
        let expiration = now
            .checked_add_signed(chrono::Duration::hours(TOKEN_LIFETIME_HOURS))
            .ok_or_else(|| AppError::InternalServerError("Token expiry overflow".into()))?;

        let claims = Claims {
            user_id,
            iat: now.timestamp() as usize,
            exp: expiration.timestamp() as usize,
        };
        self.sign(&claims)
    }

    fn verify(&self, token: &str) -> Result<i32, AppError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.user_id)
            .map_err(|e| AppError::InvalidToken(format!("{:?}", e.kind())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_for_tokens";

    fn timestamp_from_now(seconds: i64) -> usize {
        (chrono::Utc::now().timestamp() + seconds) as usize
    }

    fn signed_with(secret: &str, algorithm: Algorithm, claims: &Claims) -> String {
        encode(
            &Header::new(algorithm),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_token_generation_and_verification() {
        let tokens = JwtService::new(SECRET);
        let token = tokens.issue(1).unwrap();
        assert_eq!(tokens.verify(&token).unwrap(), 1);
    }

    #[test]
    fn test_issued_token_expires_after_24_hours() {
        let tokens = JwtService::new(SECRET);
        let token = tokens.issue(5).unwrap();

        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        let claims = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &validation,
        )
        .unwrap()
        .claims;

        assert_eq!(claims.user_id, 5);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
    }

    #[test]
    fn test_token_expiration() {
        let tokens = JwtService::new(SECRET);
        let expired = signed_with(
            SECRET,
            ALGORITHM,
            &Claims {
                user_id: 2,
                iat: timestamp_from_now(-TOKEN_LIFETIME_HOURS * 3600 - 1),
                exp: timestamp_from_now(-1),
            },
        );

        match tokens.verify(&expired) {
            Err(AppError::InvalidToken(msg)) => assert!(msg.contains("ExpiredSignature")),
            other => panic!("Token should have been invalid due to expiration: {:?}", other),
        }
    }

    #[test]
    fn test_token_valid_just_before_expiration() {
        let tokens = JwtService::new(SECRET);
        let almost_expired = signed_with(
            SECRET,
            ALGORITHM,
            &Claims {
                user_id: 3,
                iat: timestamp_from_now(-TOKEN_LIFETIME_HOURS * 3600 + 5),
                exp: timestamp_from_now(5),
            },
        );

        assert_eq!(tokens.verify(&almost_expired).unwrap(), 3);
    }

    #[test]
    fn test_invalid_token_signature() {
        let tokens = JwtService::new(SECRET);
        let other_secret = JwtService::new("a_completely_different_secret")
            .issue(1)
            .unwrap();

        assert!(matches!(
            tokens.verify(&other_secret),
            Err(AppError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let tokens = JwtService::new(SECRET);
        let claims = Claims {
            user_id: 1,
            iat: timestamp_from_now(0),
            exp: timestamp_from_now(3600),
        };
        let hs512 = signed_with(SECRET, Algorithm::HS512, &claims);

        assert!(matches!(tokens.verify(&hs512), Err(AppError::InvalidToken(_))));
    }

    #[test]
    fn test_unsigned_token_rejected() {
        let tokens = JwtService::new(SECRET);
        // {"alg":"none","typ":"JWT"} . {"user_id":1,"iat":0,"exp":4102444800} . (empty)
        let unsigned = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0.eyJ1c2VyX2lkIjoxLCJpYXQiOjAsImV4cCI6NDEwMjQ0NDgwMH0.";

        assert!(matches!(
            tokens.verify(unsigned),
            Err(AppError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_malformed_and_mistyped_tokens_rejected() {
        let tokens = JwtService::new(SECRET);
        assert!(matches!(
            tokens.verify("not-a-token"),
            Err(AppError::InvalidToken(_))
        ));

        #[derive(Serialize)]
        struct StringUserId {
            user_id: String,
            iat: usize,
            exp: usize,
        }
        let mistyped = encode(
            &Header::new(ALGORITHM),
            &StringUserId {
                user_id: "1".to_string(),
                iat: timestamp_from_now(0),
                exp: timestamp_from_now(3600),
            },
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(
            tokens.verify(&mistyped),
            Err(AppError::InvalidToken(_))
        ));
    }
}
