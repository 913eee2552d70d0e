use std::fmt;
use num_enum::TryFromPrimitive;

/// Render a raw registry value as its enum variant name, or as hex when the
/// value is not a known variant.
pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

/// Printable bytes are shown as a byte-string literal, anything else as hex.
pub fn fmt_bytes(b: &[u8]) -> String {
    if b.iter().all(|&c| c.is_ascii_graphic() || c == b' ') {
        format!("b\"{}\"", String::from_utf8_lossy(b))
    } else {
        format!("0x{}", hex::encode(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::WireType;

    #[test]
    fn known_tag_prints_variant_name() {
        assert_eq!(enum_name_or_hex::<WireType>(8), "I32");
    }

    #[test]
    fn unknown_tag_prints_hex() {
        assert_eq!(enum_name_or_hex::<WireType>(0x7f), "0x7f");
    }

    #[test]
    fn fmt_bytes_switches_to_hex_for_binary() {
        assert_eq!(fmt_bytes(b"row 1"), "b\"row 1\"");
        assert_eq!(fmt_bytes(&[0x00, 0xff]), "0x00ff");
    }
}
