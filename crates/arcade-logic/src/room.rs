//! Room codes and seats for two-player matches

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;

/// Unambiguous characters only (no I, O, 0, 1)
const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
const GENERATED_LEN: usize = 6;
const MAX_LEN: usize = 12;

/// Side of a room a client plays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    /// Created the room
    Host,
    Guest,
}

impl Seat {
    pub fn other(self) -> Seat {
        match self {
            Seat::Host => Seat::Guest,
            Seat::Guest => Seat::Host,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Seat::Host => "host",
            Seat::Guest => "guest",
        }
    }
}

/// Always normalized: deserializing goes through the same checks as parsing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..GENERATED_LEN)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        RoomCode(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RoomCode {
    type Err = ArcadeError;

    /// Codes typed by a user: trimmed and upper-cased.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        if code.is_empty() {
            return Err(ArcadeError::InvalidRoomCode("please enter a room code".to_string()));
        }
        if code.len() > MAX_LEN {
            return Err(ArcadeError::InvalidRoomCode(format!(
                "room codes are at most {} characters",
                MAX_LEN
            )));
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ArcadeError::InvalidRoomCode(format!("{:?} contains invalid characters", s)));
        }
        Ok(RoomCode(code))
    }
}

impl TryFrom<String> for RoomCode {
    type Error = ArcadeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> String {
        code.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::SeededRng;

    #[test]
    fn test_generated_codes() {
        let mut rng = SeededRng::new(42);
        for _ in 0..100 {
            let code = RoomCode::generate(&mut rng);
            assert_eq!(code.as_str().len(), 6);
            assert!(code.as_str().bytes().all(|b| ALPHABET.contains(&b)), "bad code {}", code);
            // A generated code always survives being typed back in
            assert_eq!(code.as_str().parse::<RoomCode>().unwrap(), code);
        }
    }

    #[test]
    fn test_parse_normalizes() {
        let code: RoomCode = "  k7qwpz ".parse().unwrap();
        assert_eq!(code.as_str(), "K7QWPZ");
        assert_eq!(code.to_string(), "K7QWPZ");
    }

    #[test]
    fn test_parse_rejects() {
        assert!(matches!("   ".parse::<RoomCode>(), Err(ArcadeError::InvalidRoomCode(_))));
        assert!("ABC-123".parse::<RoomCode>().is_err());
        assert!("ABCDEFGHJKLMN".parse::<RoomCode>().is_err());
    }

    #[test]
    fn test_serde_goes_through_parse() {
        let code: RoomCode = serde_json::from_str(r#"" ab23cd ""#).unwrap();
        assert_eq!(code.as_str(), "AB23CD");
        assert_eq!(serde_json::to_string(&code).unwrap(), r#""AB23CD""#);
        assert!(serde_json::from_str::<RoomCode>(r#""no way""#).is_err());
        assert!(serde_json::from_str::<RoomCode>("\"\"").is_err());
    }

    #[test]
    fn test_seats() {
        assert_eq!(Seat::Host.other(), Seat::Guest);
        assert_eq!(Seat::Guest.other().as_str(), "host");
    }
}
