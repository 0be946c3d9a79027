//! Per-field categorical codec mapping strings to sequential integer codes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Bidirectional string ↔ code mapping owned by a single categorical field.
///
/// Codes are handed out sequentially from `0` in first-occurrence order, so the
/// code of a value is its position in [`Codec::values`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Codec {
    forward: HashMap<String, u32>,
    backward: Vec<String>,
}

impl Codec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the code for `value`, assigning the next free code on first encounter.
    pub fn encode(&mut self, value: &str) -> u32 {
        if let Some(&code) = self.forward.get(value) {
            return code;
        }
        let code = self.backward.len() as u32;
        self.forward.insert(value.to_string(), code);
        self.backward.push(value.to_string());
        code
    }

    /// Look up an existing code without assigning a new one.
    pub fn code_of(&self, value: &str) -> Option<u32> {
        self.forward.get(value).copied()
    }

    /// Decode a code previously returned by [`Codec::encode`].
    ///
    /// `field` is only used to label the error.
    pub fn decode(&self, field: &str, code: u32) -> Result<&str> {
        self.backward
            .get(code as usize)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownCode {
                field: field.to_string(),
                code: f64::from(code),
            })
    }

    /// Decode a cell read from the store's numeric array.
    pub fn decode_value(&self, field: &str, value: f64) -> Result<&str> {
        if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
            return Err(Error::UnknownCode {
                field: field.to_string(),
                code: value,
            });
        }
        self.decode(field, value as u32)
    }

    /// Values in code order.
    pub fn values(&self) -> &[String] {
        &self.backward
    }

    pub fn len(&self) -> usize {
        self.backward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backward.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_follow_first_occurrence() {
        let mut codec = Codec::new();
        assert_eq!(codec.encode("GPS_L1"), 0);
        assert_eq!(codec.encode("GLO_G1"), 1);
        assert_eq!(codec.encode("GPS_L1"), 0);
        assert_eq!(codec.encode("GAL_E1"), 2);
        assert_eq!(codec.values(), &["GPS_L1", "GLO_G1", "GAL_E1"]);
    }

    #[test]
    fn test_decode_inverts_encode() {
        let mut codec = Codec::new();
        for value in ["Pixel4", "", "2020-05-14-US-MTV-1", "Pixel4XL"] {
            let code = codec.encode(value);
            assert_eq!(codec.decode("rx_name", code).unwrap(), value);
        }
    }

    #[test]
    fn test_decode_rejects_unassigned_code() {
        let mut codec = Codec::new();
        codec.encode("GPS_L1");

        let err = codec.decode("signal_type", 3).unwrap_err();
        assert!(matches!(
            err,
            Error::UnknownCode { ref field, code } if field == "signal_type" && code == 3.0
        ));
        assert_eq!(err.to_string(), "Unknown code 3 for field 'signal_type'");
    }

    #[test]
    fn test_decode_value_rejects_unassigned_codes() {
        let mut codec = Codec::new();
        codec.encode("gps");

        assert_eq!(codec.decode_value("Provider", 0.0).unwrap(), "gps");
        for bad in [1.0, -1.0, 0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                codec.decode_value("Provider", bad),
                Err(Error::UnknownCode { .. })
            ));
        }
    }

    #[test]
    fn test_independent_codecs_number_independently() {
        let mut a = Codec::new();
        let mut b = Codec::new();
        a.encode("x");
        a.encode("y");
        b.encode("y");
        assert_eq!(a.code_of("y"), Some(1));
        assert_eq!(b.code_of("y"), Some(0));
        assert_eq!(b.code_of("x"), None);
    }
}
