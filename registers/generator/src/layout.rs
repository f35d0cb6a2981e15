// Licensed under the Apache-2.0 license

//! Layout normalization.
//!
//! Documents describe registers and fields sparsely and in any order. This
//! module sorts them and synthesizes reserved placeholders so that:
//!
//! - a register's field list, when non-empty, covers `[0, coverage)` bits with
//!   no gaps and no overlaps, and
//! - a peripheral's register list starts at byte 0 and has no address gaps.
//!
//! Gaps are detected against a sorted snapshot, the placeholders appended, and
//! the list sorted once more at the end.
//!
//! Any field that cannot be resolved to a bit span fails the whole
//! peripheral; the caller skips it and carries on with the next one.

use crate::config::{FieldCoverage, GeneratorConfig};
use crate::model::{CType, Field, Peripheral, Register};
use registers_svd::{Device, FieldNode, PeripheralNode, RegisterNode};
use thiserror::Error;

/// Problems that cause a single peripheral to be skipped.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum LayoutError {
    #[error("{peripheral}.{register}.{field}: no bitOffset/bitWidth, bitRange or lsb/msb")]
    UnparsableField {
        peripheral: String,
        register: String,
        field: String,
    },
    #[error("{peripheral}.{register}.{field}: invalid bit range {range:?}")]
    InvalidBitRange {
        peripheral: String,
        register: String,
        field: String,
        range: String,
    },
    #[error("{peripheral}.{register}.{field}: bits {offset}+{width} do not fit in {limit} bits")]
    FieldOutOfRange {
        peripheral: String,
        register: String,
        field: String,
        offset: u64,
        width: u64,
        limit: u64,
    },
    #[error("{peripheral}.{register}: field {first} overlaps field {second}")]
    OverlappingFields {
        peripheral: String,
        register: String,
        first: String,
        second: String,
    },
    #[error("{peripheral}.{register}: no register size")]
    MissingRegisterSize { peripheral: String, register: String },
    #[error("{peripheral}.{register}: no address offset")]
    MissingRegisterOffset { peripheral: String, register: String },
    #[error("{peripheral}: no registers")]
    EmptyRegisterList { peripheral: String },
}

/// Parses a `[msb:lsb]` range into `(offset, width)`.
///
/// ```
/// use registers_generator_c::layout::parse_bit_range;
/// assert_eq!(parse_bit_range("[7:4]"), Some((4, 4)));
/// assert_eq!(parse_bit_range("[0:0]"), Some((0, 1)));
/// assert_eq!(parse_bit_range("[3:4]"), None);
/// ```
pub fn parse_bit_range(text: &str) -> Option<(u64, u64)> {
    let inner = text.trim().strip_prefix('[')?.strip_suffix(']')?;
    let (msb, lsb) = inner.split_once(':')?;
    let msb: u64 = msb.trim().parse().ok()?;
    let lsb: u64 = lsb.trim().parse().ok()?;
    if msb < lsb {
        return None;
    }
    Some((lsb, msb - lsb + 1))
}

/// Resolves a field record into a [`Field`], checking it fits in `limit` bits.
///
/// `bitOffset`/`bitWidth` take precedence, then `bitRange`, then `lsb`/`msb`.
pub fn build_field(
    peripheral: &str,
    register: &str,
    node: &FieldNode,
    limit: u64,
) -> Result<Field, LayoutError> {
    let (offset, width) = match (node.bit_offset, node.bit_width, &node.bit_range) {
        (Some(offset), Some(width), _) => (offset, width),
        (_, _, Some(range)) => {
            parse_bit_range(range).ok_or_else(|| LayoutError::InvalidBitRange {
                peripheral: peripheral.to_string(),
                register: register.to_string(),
                field: node.name.clone(),
                range: range.clone(),
            })?
        }
        _ => match (node.lsb, node.msb) {
            (Some(lsb), Some(msb)) if msb >= lsb => (lsb, msb - lsb + 1),
            _ => {
                return Err(LayoutError::UnparsableField {
                    peripheral: peripheral.to_string(),
                    register: register.to_string(),
                    field: node.name.clone(),
                })
            }
        },
    };

    if width == 0 || offset.checked_add(width).map_or(true, |end| end > limit) {
        return Err(LayoutError::FieldOutOfRange {
            peripheral: peripheral.to_string(),
            register: register.to_string(),
            field: node.name.clone(),
            offset,
            width,
            limit,
        });
    }

    Ok(Field::new(
        &node.name,
        &node.description,
        offset,
        width,
        node.is_read_only(),
    ))
}

/// Sorts `fields` and pads them with reserved fields to cover `[0, coverage)`.
///
/// Does nothing for an empty list. Assumes fields do not overlap.
pub fn fill_field_gaps(register: &str, fields: &mut Vec<Field>, coverage: u64) {
    if fields.is_empty() {
        return;
    }
    fields.sort_by_key(|f| f.offset);

    let mut gaps = Vec::new();
    if fields[0].offset != 0 {
        log::debug!(
            "  └> {register}: Reserved field added at offset 0: {}",
            fields[0].offset
        );
        gaps.push(Field::reserved(0, fields[0].offset));
    }
    for pair in fields.windows(2) {
        let end = pair[0].end();
        if pair[1].offset > end {
            let diff = pair[1].offset - end;
            log::debug!("  └> {register}: Reserved field added at offset {end}: {diff}");
            gaps.push(Field::reserved(end, diff));
        }
    }
    fields.extend(gaps);
    fields.sort_by_key(|f| f.offset);

    let last_end = fields.iter().map(Field::end).max().unwrap_or(0);
    if last_end < coverage {
        log::debug!(
            "  └> {register}: Reserved field added at offset {last_end}: {}",
            coverage - last_end
        );
        fields.push(Field::reserved(last_end, coverage - last_end));
    }
}

/// Sorts `registers` and inserts reserved registers so the block is contiguous
/// from byte 0.
///
/// Overlapping registers are left as they are.
pub fn fill_register_gaps(peripheral: &str, registers: &mut Vec<Register>) {
    registers.sort_by_key(|r| r.offset);

    let mut gaps = Vec::new();
    let mut cursor = 0;
    for register in registers.iter() {
        if register.offset > cursor {
            let diff = register.offset - cursor;
            log::debug!("  └> {peripheral}: Reserved section added at offset {cursor}: {diff}");
            gaps.push(Register::reserved(cursor, diff));
        } else if register.offset < cursor {
            log::debug!(
                "  └> {peripheral}: {} at offset {} overlaps the previous register",
                register.name,
                register.offset
            );
        }
        cursor = cursor.max(register.end());
    }
    registers.extend(gaps);
    registers.sort_by_key(|r| r.offset);
}

fn check_overlaps(peripheral: &str, register: &str, fields: &[Field]) -> Result<(), LayoutError> {
    let mut sorted: Vec<&Field> = fields.iter().collect();
    sorted.sort_by_key(|f| f.offset);
    for pair in sorted.windows(2) {
        if pair[1].offset < pair[0].end() {
            return Err(LayoutError::OverlappingFields {
                peripheral: peripheral.to_string(),
                register: register.to_string(),
                first: pair[0].name.clone(),
                second: pair[1].name.clone(),
            });
        }
    }
    Ok(())
}

/// Builds and normalizes one register.
///
/// `default_size` and `default_reset` come from the enclosing peripheral or
/// device and apply when the register does not declare its own.
pub fn load_register(
    peripheral: &str,
    node: &RegisterNode,
    default_size: Option<u64>,
    default_reset: Option<u64>,
    coverage: FieldCoverage,
) -> Result<Register, LayoutError> {
    let size = node
        .size
        .or(default_size)
        .ok_or_else(|| LayoutError::MissingRegisterSize {
            peripheral: peripheral.to_string(),
            register: node.name.clone(),
        })?;
    let offset = node
        .address_offset
        .ok_or_else(|| LayoutError::MissingRegisterOffset {
            peripheral: peripheral.to_string(),
            register: node.name.clone(),
        })?;
    let reset = node.reset_value.or(default_reset).unwrap_or(0);
    let limit = coverage.width(size);

    let mut fields = node
        .fields
        .iter()
        .map(|field| build_field(peripheral, &node.name, field, limit))
        .collect::<Result<Vec<_>, _>>()?;
    check_overlaps(peripheral, &node.name, &fields)?;

    if !fields.is_empty() && coverage == FieldCoverage::Fixed32 && size != 32 {
        log::warn!(
            "{peripheral}.{}: {size}-bit register padded to 32 bits of fields",
            node.name
        );
    }
    fill_field_gaps(&node.name, &mut fields, limit);

    let register = Register::new(size, offset, &node.name, &node.description, fields, reset);
    if register.ctype == CType::Unknown {
        log::warn!(
            "{peripheral}.{}: unsupported register size {size}",
            register.name
        );
    }
    Ok(register)
}

/// Builds a normalized [`Peripheral`] from its document record.
pub fn load_peripheral(
    node: &PeripheralNode,
    device: &Device,
    config: &GeneratorConfig,
) -> Result<Peripheral, LayoutError> {
    let default_size = node.size.or(device.size);
    let default_reset = node.reset_value.or(device.reset_value);

    let mut registers = node
        .registers
        .iter()
        .map(|register| {
            load_register(
                &node.name,
                register,
                default_size,
                default_reset,
                config.field_coverage,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    if registers.is_empty() {
        return Err(LayoutError::EmptyRegisterList {
            peripheral: node.name.clone(),
        });
    }
    fill_register_gaps(&node.name, &mut registers);

    Ok(Peripheral::new(&node.name, &node.description, registers))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_node(name: &str, offset: u64, width: u64) -> FieldNode {
        FieldNode {
            name: name.to_string(),
            bit_offset: Some(offset),
            bit_width: Some(width),
            ..Default::default()
        }
    }

    fn register_node(name: &str, offset: u64, fields: Vec<FieldNode>) -> RegisterNode {
        RegisterNode {
            name: name.to_string(),
            size: Some(32),
            address_offset: Some(offset),
            fields,
            ..Default::default()
        }
    }

    /// Asserts the fields tile `[0, width)` exactly.
    fn assert_covers(fields: &[Field], width: u64) {
        let mut next = 0;
        for field in fields {
            assert_eq!(field.offset, next, "gap or overlap at bit {next}: {fields:?}");
            assert!(field.width >= 1);
            if field.is_reserved() {
                assert!(field.readonly);
            }
            next = field.end();
        }
        assert_eq!(next, width);
    }

    /// Asserts the registers tile `[0, end)` bytes exactly.
    fn assert_contiguous(registers: &[Register]) {
        let mut next = 0;
        for register in registers {
            assert_eq!(register.offset, next, "gap at byte {next}");
            next = register.end();
        }
    }

    #[test]
    fn test_parse_bit_range() {
        assert_eq!(parse_bit_range("[7:4]"), Some((4, 4)));
        assert_eq!(parse_bit_range("[31:0]"), Some((0, 32)));
        assert_eq!(parse_bit_range(" [ 5 : 5 ] "), Some((5, 1)));
        assert_eq!(parse_bit_range("7:4"), None);
        assert_eq!(parse_bit_range("[7-4]"), None);
        assert_eq!(parse_bit_range("[a:4]"), None);
        assert_eq!(parse_bit_range("[4:7]"), None);
    }

    #[test]
    fn test_build_field_forms() {
        let explicit = field_node("A", 4, 4);
        let range = FieldNode {
            name: "A".to_string(),
            bit_range: Some("[7:4]".to_string()),
            ..Default::default()
        };
        let lsb_msb = FieldNode {
            name: "A".to_string(),
            lsb: Some(4),
            msb: Some(7),
            ..Default::default()
        };
        let a = build_field("P", "R", &explicit, 32).unwrap();
        let b = build_field("P", "R", &range, 32).unwrap();
        let c = build_field("P", "R", &lsb_msb, 32).unwrap();
        assert_eq!((a.offset, a.width), (4, 4));
        assert_eq!(a, b);
        assert_eq!(b, c);
    }

    #[test]
    fn test_build_field_read_only() {
        let node = FieldNode {
            access: Some("read-only".to_string()),
            ..field_node("STAT", 0, 1)
        };
        assert!(build_field("P", "R", &node, 32).unwrap().readonly);
        let node = FieldNode {
            access: Some("read-write".to_string()),
            ..field_node("STAT", 0, 1)
        };
        assert!(!build_field("P", "R", &node, 32).unwrap().readonly);
    }

    #[test]
    fn test_build_field_errors() {
        let missing = FieldNode {
            name: "X".to_string(),
            bit_offset: Some(3),
            ..Default::default()
        };
        assert!(matches!(
            build_field("P", "R", &missing, 32),
            Err(LayoutError::UnparsableField { .. })
        ));

        let bad_range = FieldNode {
            name: "X".to_string(),
            bit_range: Some("[1:2]".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            build_field("P", "R", &bad_range, 32),
            Err(LayoutError::InvalidBitRange { .. })
        ));

        assert!(matches!(
            build_field("P", "R", &field_node("X", 30, 4), 32),
            Err(LayoutError::FieldOutOfRange { limit: 32, .. })
        ));
        assert!(matches!(
            build_field("P", "R", &field_node("X", 0, 0), 32),
            Err(LayoutError::FieldOutOfRange { .. })
        ));
    }

    #[test]
    fn test_single_enable_bit() {
        let mut fields = vec![Field::new("EN", "", 0, 1, false)];
        fill_field_gaps("CTRL", &mut fields, 32);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].name, "EN");
        assert_eq!((fields[0].offset, fields[0].width), (0, 1));
        assert!(fields[1].is_reserved());
        assert_eq!((fields[1].offset, fields[1].width), (1, 31));
        assert_covers(&fields, 32);
    }

    #[test]
    fn test_field_gaps_leading_interior_trailing() {
        let mut fields = vec![
            Field::new("HI", "", 16, 4, false),
            Field::new("LO", "", 4, 2, false),
        ];
        fill_field_gaps("R", &mut fields, 32);
        let spans: Vec<_> = fields.iter().map(|f| (f.name.as_str(), f.offset, f.width)).collect();
        assert_eq!(
            spans,
            vec![("", 0, 4), ("LO", 4, 2), ("", 6, 10), ("HI", 16, 4), ("", 20, 12)]
        );
        assert_covers(&fields, 32);
    }

    #[test]
    fn test_field_gaps_full_register_untouched() {
        let mut fields = vec![Field::new("DATA", "", 0, 32, false)];
        fill_field_gaps("R", &mut fields, 32);
        assert_eq!(fields, vec![Field::new("DATA", "", 0, 32, false)]);
    }

    #[test]
    fn test_field_gaps_empty() {
        let mut fields = Vec::new();
        fill_field_gaps("R", &mut fields, 32);
        assert!(fields.is_empty());
    }

    #[test]
    fn test_register_gap() {
        let mut registers = vec![
            Register::new(32, 8, "B", "", Vec::new(), 0),
            Register::new(32, 0, "A", "", Vec::new(), 0),
        ];
        fill_register_gaps("P", &mut registers);
        assert_eq!(registers.len(), 3);
        assert_eq!(registers[0].name, "A");
        assert!(registers[1].reserved);
        assert_eq!(registers[1].offset, 4);
        assert_eq!(registers[1].byte_len(), 4);
        assert_eq!(registers[2].name, "B");
        assert_contiguous(&registers);
    }

    #[test]
    fn test_register_leading_gap() {
        let mut registers = vec![
            Register::new(16, 0x10, "A", "", Vec::new(), 0),
            Register::new(8, 0x12, "B", "", Vec::new(), 0),
            Register::new(32, 0x14, "C", "", Vec::new(), 0),
        ];
        fill_register_gaps("P", &mut registers);
        assert!(registers[0].reserved);
        assert_eq!(registers[0].offset, 0);
        assert_eq!(registers[0].byte_len(), 0x10);
        // One byte after B
        assert!(registers[3].reserved);
        assert_eq!(registers[3].offset, 0x13);
        assert_eq!(registers[3].size, 8);
        assert_contiguous(&registers);
    }

    #[test]
    fn test_register_overlap_left_alone() {
        let mut registers = vec![
            Register::new(32, 0, "A", "", Vec::new(), 0),
            Register::new(32, 0, "A_ALIAS", "", Vec::new(), 0),
            Register::new(32, 4, "B", "", Vec::new(), 0),
        ];
        fill_register_gaps("P", &mut registers);
        assert_eq!(registers.len(), 3);
        assert!(registers.iter().all(|r| !r.reserved));
    }

    #[test]
    fn test_load_register_overlap() {
        let node = register_node("R", 0, vec![field_node("A", 0, 4), field_node("B", 2, 4)]);
        assert!(matches!(
            load_register("P", &node, None, None, FieldCoverage::Fixed32),
            Err(LayoutError::OverlappingFields { .. })
        ));
    }

    #[test]
    fn test_load_register_inherits_defaults() {
        let node = RegisterNode {
            name: "R".to_string(),
            address_offset: Some(0),
            ..Default::default()
        };
        let register = load_register("P", &node, Some(16), Some(0xab), FieldCoverage::Fixed32).unwrap();
        assert_eq!(register.size, 16);
        assert_eq!(register.reset, 0xab);

        assert!(matches!(
            load_register("P", &node, None, None, FieldCoverage::Fixed32),
            Err(LayoutError::MissingRegisterSize { .. })
        ));
    }

    #[test]
    fn test_load_register_coverage_by_size() {
        let node = RegisterNode {
            size: Some(8),
            ..register_node("R", 0, vec![field_node("A", 1, 2)])
        };
        let fixed = load_register("P", &node, None, None, FieldCoverage::Fixed32).unwrap();
        assert_covers(&fixed.fields, 32);
        let sized = load_register("P", &node, None, None, FieldCoverage::RegisterSize).unwrap();
        assert_covers(&sized.fields, 8);
    }

    #[test]
    fn test_load_peripheral() {
        let node = PeripheralNode {
            name: "GPIO3".to_string(),
            description: "General purpose IO".to_string(),
            registers: vec![
                register_node("OUT", 0x8, vec![field_node("PIN0", 0, 1)]),
                register_node("DIR", 0x0, vec![]),
            ],
            ..Default::default()
        };
        let peripheral =
            load_peripheral(&node, &Device::default(), &GeneratorConfig::new("chip")).unwrap();
        assert_eq!(peripheral.name, "GPIO");
        assert_eq!(peripheral.realname, "GPIO3");
        assert_eq!(peripheral.registers.len(), 3);
        assert_eq!(peripheral.registers[0].offset, 0);
        assert_contiguous(&peripheral.registers);
        for register in &peripheral.registers {
            if !register.fields.is_empty() {
                assert_covers(&register.fields, 32);
            }
        }
    }

    #[test]
    fn test_load_peripheral_bad_field_skips() {
        let mut bad = field_node("BAD", 0, 1);
        bad.bit_offset = None;
        bad.bit_range = Some("[oops]".to_string());
        let node = PeripheralNode {
            name: "ADC0".to_string(),
            registers: vec![
                register_node("OK", 0x0, vec![field_node("EN", 0, 1)]),
                register_node("CFG", 0x4, vec![bad]),
            ],
            ..Default::default()
        };
        let err = load_peripheral(&node, &Device::default(), &GeneratorConfig::new("chip"))
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidBitRange { .. }));
    }

    #[test]
    fn test_load_peripheral_empty() {
        let node = PeripheralNode {
            name: "EMPTY".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            load_peripheral(&node, &Device::default(), &GeneratorConfig::new("chip")),
            Err(LayoutError::EmptyRegisterList { .. })
        ));
    }
}
