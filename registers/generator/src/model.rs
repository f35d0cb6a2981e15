// Licensed under the Apache-2.0 license

//! In-memory register map.
//!
//! ```text
//! Peripheral            name (canonical), realname, path
//! └── Register[]        sorted by byte offset, contiguous from 0 once normalized
//!     └── Field[]       sorted by bit offset, contiguous once normalized
//! ```
//!
//! Equality is structural throughout. [`Peripheral`] equality ignores the
//! original name and the output path so that instances of the same hardware
//! block (`UART0`, `UART1`) compare equal when their layouts match.

use crate::util::canonical_name;
use std::fmt;
use std::path::PathBuf;

//=============================================================================
// Field
//=============================================================================

/// A bit field within a register. An empty name marks a reserved field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub description: String,
    /// Index of the least significant bit.
    pub offset: u64,
    /// Width in bits, at least 1.
    pub width: u64,
    pub readonly: bool,
}

impl Field {
    pub fn new(name: &str, description: &str, offset: u64, width: u64, readonly: bool) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            offset,
            width,
            readonly,
        }
    }

    /// A placeholder covering `width` bits starting at `offset`.
    pub fn reserved(offset: u64, width: u64) -> Self {
        Self::new("", "Reserved", offset, width, true)
    }

    pub fn is_reserved(&self) -> bool {
        self.name.is_empty()
    }

    /// One past the most significant bit.
    pub fn end(&self) -> u64 {
        self.offset + self.width
    }
}

//=============================================================================
// CType
//=============================================================================

/// The C integer type a register is accessed through.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CType {
    U8,
    U16,
    U32,
    U64,
    /// The register size is not one of 8/16/32/64 bits.
    Unknown,
}

impl CType {
    /// Maps a register size in bits to its type. Any other size is `Unknown`.
    pub fn from_size(bits: u64) -> Self {
        match bits {
            8 => CType::U8,
            16 => CType::U16,
            32 => CType::U32,
            64 => CType::U64,
            _ => CType::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CType::U8 => "uint8_t",
            CType::U16 => "uint16_t",
            CType::U32 => "uint32_t",
            CType::U64 => "uint64_t",
            CType::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//=============================================================================
// Register
//=============================================================================

/// A register, or a reserved gap between registers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Register {
    /// Size in bits.
    pub size: u64,
    /// Byte offset from the peripheral base.
    pub offset: u64,
    pub name: String,
    pub description: String,
    pub ctype: CType,
    pub fields: Vec<Field>,
    pub reserved: bool,
    pub reset: u64,
}

impl Register {
    /// Creates a register that owns `fields`.
    pub fn new(
        size: u64,
        offset: u64,
        name: &str,
        description: &str,
        fields: Vec<Field>,
        reset: u64,
    ) -> Self {
        Self {
            size,
            offset,
            name: name.to_string(),
            description: description.to_string(),
            ctype: CType::from_size(size),
            fields,
            reserved: false,
            reset,
        }
    }

    /// A reserved gap of `bytes` bytes at `offset`.
    pub fn reserved(offset: u64, bytes: u64) -> Self {
        Self {
            reserved: true,
            ..Self::new(bytes * 8, offset, "", "Reserved", Vec::new(), 0)
        }
    }

    /// Size in bytes, rounded up.
    pub fn byte_len(&self) -> u64 {
        self.size.div_ceil(8)
    }

    /// Byte offset one past the end of the register.
    pub fn end(&self) -> u64 {
        self.offset + self.byte_len()
    }

    /// Fields with a name; these get position and mask constants.
    pub fn named_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_reserved())
    }
}

//=============================================================================
// Peripheral
//=============================================================================

#[derive(Clone, Debug)]
pub struct Peripheral {
    /// Canonical name, see [`canonical_name`].
    pub name: String,
    /// Name as written in the document.
    pub realname: String,
    pub description: String,
    pub registers: Vec<Register>,
    /// Output location, assigned when the peripheral is accepted.
    pub path: Option<PathBuf>,
}

impl Peripheral {
    pub fn new(realname: &str, description: &str, registers: Vec<Register>) -> Self {
        Self {
            name: canonical_name(realname).to_string(),
            realname: realname.to_string(),
            description: description.to_string(),
            registers,
            path: None,
        }
    }

    pub fn register_count(&self) -> usize {
        self.registers.len()
    }

    pub fn field_count(&self) -> usize {
        self.registers.iter().map(|r| r.fields.len()).sum()
    }
}

impl PartialEq for Peripheral {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.registers == other.registers
    }
}

impl Eq for Peripheral {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl(width: u64) -> Register {
        Register::new(
            32,
            0,
            "CTRL",
            "Control",
            vec![Field::new("EN", "Enable", 0, width, false)],
            0,
        )
    }

    #[test]
    fn test_ctype_mapping() {
        assert_eq!(CType::from_size(8).as_str(), "uint8_t");
        assert_eq!(CType::from_size(16).as_str(), "uint16_t");
        assert_eq!(CType::from_size(32).as_str(), "uint32_t");
        assert_eq!(CType::from_size(64).as_str(), "uint64_t");
        assert_eq!(CType::from_size(24), CType::Unknown);
        assert_eq!(CType::from_size(0).to_string(), "UNKNOWN");
    }

    #[test]
    fn test_reserved_field() {
        let field = Field::reserved(4, 3);
        assert!(field.is_reserved());
        assert!(field.readonly);
        assert_eq!(field.end(), 7);
    }

    #[test]
    fn test_reserved_register() {
        let reg = Register::reserved(4, 4);
        assert!(reg.reserved);
        assert_eq!(reg.size, 32);
        assert_eq!(reg.byte_len(), 4);
        assert_eq!(reg.end(), 8);
        assert!(reg.fields.is_empty());
    }

    #[test]
    fn test_registers_own_their_fields() {
        let mut a = Register::new(32, 0, "A", "", Vec::new(), 0);
        let b = Register::new(32, 4, "B", "", Vec::new(), 0);
        a.fields.push(Field::reserved(0, 32));
        assert_eq!(a.fields.len(), 1);
        assert!(b.fields.is_empty());
    }

    #[test]
    fn test_peripheral_equality_ignores_realname_and_path() {
        let a = Peripheral::new("UART0", "UART", vec![ctrl(1)]);
        let mut b = Peripheral::new("UART1", "UART", vec![ctrl(1)]);
        b.path = Some(PathBuf::from("elsewhere.h"));
        assert_eq!(a.name, "UART");
        assert_eq!(b.name, "UART");
        assert_eq!(a, b);
        assert_eq!(b, a);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_peripheral_equality_deep() {
        let a = Peripheral::new("UART0", "UART", vec![ctrl(1)]);
        let b = Peripheral::new("UART1", "UART", vec![ctrl(2)]);
        assert_ne!(a, b);
        assert_ne!(b, a);

        let c = Peripheral::new("UART1", "Other", vec![ctrl(1)]);
        assert_ne!(a, c);

        let d = Peripheral::new("SPI0", "UART", vec![ctrl(1)]);
        assert_ne!(a, d);
    }

    #[test]
    fn test_counts() {
        let p = Peripheral::new(
            "TIMER0",
            "",
            vec![ctrl(1), Register::reserved(4, 4)],
        );
        assert_eq!(p.register_count(), 2);
        assert_eq!(p.field_count(), 1);
    }
}
