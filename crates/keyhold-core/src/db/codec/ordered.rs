//! Order-preserving encodings for scalar values.
//!
//! Layouts:
//! - signed integers: sign marker + big-endian `i64`
//! - unsigned integers: positive marker + big-endian `u64`
//! - floats: signed layout of `trunc(v * 1e10)` + sign-folded IEEE bits
//!
//! The float tail is an ordering key, not raw IEEE bytes: it breaks ties once
//! the proxy saturates and is un-folded on decode.
//! - text: raw utf-8
//! - bool: one byte

use super::{CodecError, DecodeValue, EncodeValue, ValueKind};

pub(super) const NEGATIVE_MARKER: u8 = 0x01;
pub(super) const POSITIVE_MARKER: u8 = 0x02;

const WIDE_LEN: usize = 9;
const F32_LEN: usize = WIDE_LEN + 4;
const F64_LEN: usize = WIDE_LEN + 8;

const FLOAT_PROXY_SCALE: f64 = 1e10;

// ---------------------------------------------------------------------
// Integers
// ---------------------------------------------------------------------

fn signed_bytes(value: i64) -> [u8; WIDE_LEN] {
    let mut out = [0u8; WIDE_LEN];
    out[0] = if value < 0 {
        NEGATIVE_MARKER
    } else {
        POSITIVE_MARKER
    };
    out[1..].copy_from_slice(&value.to_be_bytes());

    out
}

fn unsigned_bytes(value: u64) -> [u8; WIDE_LEN] {
    let mut out = [0u8; WIDE_LEN];
    out[0] = POSITIVE_MARKER;
    out[1..].copy_from_slice(&value.to_be_bytes());

    out
}

fn fixed<const N: usize>(bytes: &[u8], kind: ValueKind) -> Result<[u8; N], CodecError> {
    bytes.try_into().map_err(|_| CodecError::InvalidLength {
        kind,
        expected: N,
        found: bytes.len(),
    })
}

fn split_wide(raw: [u8; WIDE_LEN]) -> (u8, [u8; 8]) {
    let mut body = [0u8; 8];
    body.copy_from_slice(&raw[1..]);

    (raw[0], body)
}

fn read_signed(raw: [u8; WIDE_LEN], kind: ValueKind) -> Result<i64, CodecError> {
    let (marker, body) = split_wide(raw);
    let value = i64::from_be_bytes(body);

    let expected = if value < 0 {
        NEGATIVE_MARKER
    } else {
        POSITIVE_MARKER
    };
    if marker != expected {
        return Err(CodecError::InvalidMarker { kind, marker });
    }

    Ok(value)
}

fn read_unsigned(raw: [u8; WIDE_LEN], kind: ValueKind) -> Result<u64, CodecError> {
    let (marker, body) = split_wide(raw);
    if marker != POSITIVE_MARKER {
        return Err(CodecError::InvalidMarker { kind, marker });
    }

    Ok(u64::from_be_bytes(body))
}

macro_rules! impl_signed {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl EncodeValue for $ty {
                const KIND: ValueKind = ValueKind::$kind;

                fn encode_value(&self) -> Result<Vec<u8>, CodecError> {
                    let wide = i64::try_from(*self)
                        .map_err(|_| CodecError::OutOfRange { kind: Self::KIND })?;

                    Ok(signed_bytes(wide).to_vec())
                }
            }

            impl DecodeValue for $ty {
                fn decode_value(bytes: &[u8]) -> Result<Self, CodecError> {
                    let kind = ValueKind::$kind;
                    let wide = read_signed(fixed(bytes, kind)?, kind)?;

                    Self::try_from(wide).map_err(|_| CodecError::OutOfRange { kind })
                }
            }
        )*
    };
}

macro_rules! impl_unsigned {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl EncodeValue for $ty {
                const KIND: ValueKind = ValueKind::$kind;

                fn encode_value(&self) -> Result<Vec<u8>, CodecError> {
                    let wide = u64::try_from(*self)
                        .map_err(|_| CodecError::OutOfRange { kind: Self::KIND })?;

                    Ok(unsigned_bytes(wide).to_vec())
                }
            }

            impl DecodeValue for $ty {
                fn decode_value(bytes: &[u8]) -> Result<Self, CodecError> {
                    let kind = ValueKind::$kind;
                    let wide = read_unsigned(fixed(bytes, kind)?, kind)?;

                    Self::try_from(wide).map_err(|_| CodecError::OutOfRange { kind })
                }
            }
        )*
    };
}

impl_signed!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    isize => Isize,
);

impl_unsigned!(
    u8 => Uint8,
    u16 => Uint16,
    u32 => Uint32,
    u64 => Uint64,
    usize => Usize,
);

// ---------------------------------------------------------------------
// Floats
// ---------------------------------------------------------------------

// Saturating: magnitudes past i64 range share a proxy and fall back to the
// trailing bits for order.
#[allow(clippy::cast_possible_truncation)]
fn float_proxy(value: f64) -> i64 {
    (value * FLOAT_PROXY_SCALE).trunc() as i64
}

const fn ordered_f32_bits(value: f32) -> u32 {
    let bits = value.to_bits();
    if bits & 0x8000_0000 == 0 {
        bits ^ 0x8000_0000
    } else {
        !bits
    }
}

const fn f32_from_ordered(ordered: u32) -> f32 {
    let bits = if ordered & 0x8000_0000 == 0 {
        !ordered
    } else {
        ordered ^ 0x8000_0000
    };

    f32::from_bits(bits)
}

const fn ordered_f64_bits(value: f64) -> u64 {
    let bits = value.to_bits();
    if bits & 0x8000_0000_0000_0000 == 0 {
        bits ^ 0x8000_0000_0000_0000
    } else {
        !bits
    }
}

const fn f64_from_ordered(ordered: u64) -> f64 {
    let bits = if ordered & 0x8000_0000_0000_0000 == 0 {
        !ordered
    } else {
        ordered ^ 0x8000_0000_0000_0000
    };

    f64::from_bits(bits)
}

fn check_proxy(value: f64, proxy: i64, kind: ValueKind) -> Result<(), CodecError> {
    if value.is_nan() {
        return Err(CodecError::NotANumber);
    }
    if float_proxy(value) != proxy {
        return Err(CodecError::ProxyMismatch { kind });
    }

    Ok(())
}

impl EncodeValue for f64 {
    const KIND: ValueKind = ValueKind::Float64;

    fn encode_value(&self) -> Result<Vec<u8>, CodecError> {
        if self.is_nan() {
            return Err(CodecError::NotANumber);
        }
        // -0.0 and 0.0 compare equal, so they share one encoding
        let value = if *self == 0.0 { 0.0 } else { *self };

        let mut out = Vec::with_capacity(F64_LEN);
        out.extend_from_slice(&signed_bytes(float_proxy(value)));
        out.extend_from_slice(&ordered_f64_bits(value).to_be_bytes());

        Ok(out)
    }
}

impl DecodeValue for f64 {
    fn decode_value(bytes: &[u8]) -> Result<Self, CodecError> {
        let kind = ValueKind::Float64;
        let raw: [u8; F64_LEN] = fixed(bytes, kind)?;

        let mut head = [0u8; WIDE_LEN];
        head.copy_from_slice(&raw[..WIDE_LEN]);
        let proxy = read_signed(head, kind)?;

        let mut tail = [0u8; 8];
        tail.copy_from_slice(&raw[WIDE_LEN..]);
        let value = f64_from_ordered(u64::from_be_bytes(tail));

        check_proxy(value, proxy, kind)?;

        Ok(value)
    }
}

impl EncodeValue for f32 {
    const KIND: ValueKind = ValueKind::Float32;

    fn encode_value(&self) -> Result<Vec<u8>, CodecError> {
        if self.is_nan() {
            return Err(CodecError::NotANumber);
        }
        let value = if *self == 0.0 { 0.0 } else { *self };

        let mut out = Vec::with_capacity(F32_LEN);
        out.extend_from_slice(&signed_bytes(float_proxy(f64::from(value))));
        out.extend_from_slice(&ordered_f32_bits(value).to_be_bytes());

        Ok(out)
    }
}

impl DecodeValue for f32 {
    fn decode_value(bytes: &[u8]) -> Result<Self, CodecError> {
        let kind = ValueKind::Float32;
        let raw: [u8; F32_LEN] = fixed(bytes, kind)?;

        let mut head = [0u8; WIDE_LEN];
        head.copy_from_slice(&raw[..WIDE_LEN]);
        let proxy = read_signed(head, kind)?;

        let mut tail = [0u8; 4];
        tail.copy_from_slice(&raw[WIDE_LEN..]);
        let value = f32_from_ordered(u32::from_be_bytes(tail));

        check_proxy(f64::from(value), proxy, kind)?;

        Ok(value)
    }
}

// ---------------------------------------------------------------------
// Text and bool
// ---------------------------------------------------------------------

impl EncodeValue for str {
    const KIND: ValueKind = ValueKind::Text;

    fn encode_value(&self) -> Result<Vec<u8>, CodecError> {
        Ok(self.as_bytes().to_vec())
    }
}

impl EncodeValue for String {
    const KIND: ValueKind = ValueKind::Text;

    fn encode_value(&self) -> Result<Vec<u8>, CodecError> {
        self.as_str().encode_value()
    }
}

impl DecodeValue for String {
    fn decode_value(bytes: &[u8]) -> Result<Self, CodecError> {
        Self::from_utf8(bytes.to_vec()).map_err(|_| CodecError::InvalidUtf8)
    }
}

impl EncodeValue for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn encode_value(&self) -> Result<Vec<u8>, CodecError> {
        Ok(vec![u8::from(*self)])
    }
}

impl DecodeValue for bool {
    fn decode_value(bytes: &[u8]) -> Result<Self, CodecError> {
        let [byte]: [u8; 1] = fixed(bytes, ValueKind::Bool)?;

        match byte {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::InvalidBool(other)),
        }
    }
}
