// Licensed under the Apache-2.0 license

//! Bit arithmetic and C header emission.
//!
//! For a peripheral `UART` with a register `CTRL` the generated header looks
//! like:
//!
//! ```text
//! // ---------- UART Control ----------
//! typedef union
//! {
//!     struct
//!     {
//!         uint32_t EN: 1;      // Bit 0: Enable
//!         uint32_t MODE: 2;    // Bits 1-2: Mode
//!         const uint32_t: 29;  // Bits 3-31: Reserved
//!     } bit;
//!     uint32_t reg;
//! } UART_CTRL_t;
//!
//! #define UART_CTRL_RESETVALUE    ((uint32_t)0x0)
//! #define UART_CTRL_Mask          ((uint32_t)0x7)
//!
//! #define UART_CTRL_EN_Pos        ((uint32_t)0)
//! #define UART_CTRL_EN            ((uint32_t)((uint32_t)1 << UART_CTRL_EN_Pos))
//!
//! #define UART_CTRL_MODE_Pos      ((uint32_t)1)
//! #define UART_CTRL_MODE_Msk      ((uint32_t)((uint32_t)0x3 << UART_CTRL_MODE_Pos))
//! #define UART_CTRL_MODE_Val(v)   ((uint32_t)(((v) & UART_CTRL_MODE_Msk) >> UART_CTRL_MODE_Pos))
//! #define UART_CTRL_MODE(v)       ((uint32_t)(((v) << UART_CTRL_MODE_Pos) & UART_CTRL_MODE_Msk))
//! ```
//!
//! followed by the `UART_t` struct, once with the unions above (under
//! `BITMASK`) and once with plain integers. Everything here is a pure
//! function of the normalized model.

use crate::model::{Field, Peripheral, Register};
use crate::util::c_hex;
use std::fmt::Write;

/// Widest unnamed padding member emitted for a reserved register.
const PADDING_CHUNK_BITS: u64 = 32;

/// `width` ones, unshifted.
fn low_bits(width: u64) -> u64 {
    match width {
        0 => 0,
        64.. => u64::MAX,
        _ => (1u64 << width) - 1,
    }
}

/// Mask of a field of `width` bits at bit `offset`: `((1 << width) - 1) << offset`.
pub fn field_mask(width: u64, offset: u64) -> u64 {
    if offset >= 64 {
        return 0;
    }
    low_bits(width) << offset
}

/// OR of the masks of every named field. Reserved fields do not count.
pub fn register_mask(register: &Register) -> u64 {
    register
        .named_fields()
        .fold(0, |mask, f| mask | field_mask(f.width, f.offset))
}

fn bit_label(field: &Field) -> String {
    if field.width == 1 {
        format!("Bit {}", field.offset)
    } else {
        format!("Bits {}-{}", field.offset, field.end() - 1)
    }
}

fn description_or<'a>(description: &'a str, name: &'a str) -> &'a str {
    if description.is_empty() {
        name
    } else {
        description
    }
}

fn trailing_comment(label: &str, description: &str) -> String {
    if description.is_empty() {
        format!("// {label}")
    } else {
        format!("// {label}: {description}")
    }
}

/// Emits the union and macro block for `register`, or `None` when it has no fields.
pub fn render_register(peripheral: &Peripheral, register: &Register) -> Option<String> {
    if register.fields.is_empty() {
        return None;
    }

    let ty = register.ctype;
    let prefix = format!("{}_{}", peripheral.name, register.name);
    let mut output = String::new();

    writeln!(
        output,
        "// ---------- {} {} ----------",
        description_or(&peripheral.description, &peripheral.name),
        description_or(&register.description, &register.name)
    )
    .unwrap();
    writeln!(output, "typedef union\n{{\n\tstruct\n\t{{").unwrap();
    for field in &register.fields {
        let qualifier = if field.readonly { "const " } else { "" };
        let name = if field.is_reserved() {
            String::new()
        } else {
            format!(" {}", field.name)
        };
        writeln!(
            output,
            "\t\t{qualifier}{ty}{name}: {};\t{}",
            field.width,
            trailing_comment(&bit_label(field), &field.description)
        )
        .unwrap();
    }
    writeln!(output, "\t}} bit;\n\t{ty} reg;\n}} {prefix}_t;").unwrap();
    writeln!(output).unwrap();

    writeln!(
        output,
        "#define {prefix}_RESETVALUE\t(({ty}){})",
        c_hex(register.reset)
    )
    .unwrap();
    writeln!(
        output,
        "#define {prefix}_Mask\t(({ty}){})",
        c_hex(register_mask(register))
    )
    .unwrap();

    for field in register.named_fields() {
        let name = format!("{prefix}_{}", field.name);
        writeln!(output).unwrap();
        writeln!(output, "#define {name}_Pos\t(({ty}){})", field.offset).unwrap();
        if field.width == 1 {
            writeln!(output, "#define {name}\t(({ty})(({ty})1 << {name}_Pos))").unwrap();
        } else {
            writeln!(
                output,
                "#define {name}_Msk\t(({ty})(({ty}){} << {name}_Pos))",
                c_hex(low_bits(field.width))
            )
            .unwrap();
            writeln!(
                output,
                "#define {name}_Val(v)\t(({ty})(((v) & {name}_Msk) >> {name}_Pos))"
            )
            .unwrap();
            writeln!(
                output,
                "#define {name}(v)\t(({ty})(((v) << {name}_Pos) & {name}_Msk))"
            )
            .unwrap();
        }
    }

    Some(output)
}

fn write_padding(output: &mut String, bits: u64) {
    let mut remaining = bits;
    while remaining > 0 {
        let chunk = remaining.min(PADDING_CHUNK_BITS);
        writeln!(output, "\t\tconst volatile uint32_t: {chunk};\t// Reserved").unwrap();
        remaining -= chunk;
    }
}

fn write_struct_body(output: &mut String, peripheral: &Peripheral, use_unions: bool) {
    writeln!(output, "\ttypedef struct\n\t{{").unwrap();
    for register in &peripheral.registers {
        if register.reserved {
            write_padding(output, register.size);
        } else if use_unions && !register.fields.is_empty() {
            writeln!(
                output,
                "\t\tvolatile {}_{}_t {};\t// {}",
                peripheral.name, register.name, register.name, register.description
            )
            .unwrap();
        } else {
            writeln!(
                output,
                "\t\tvolatile {} {};\t// {}",
                register.ctype, register.name, register.description
            )
            .unwrap();
        }
    }
    writeln!(output, "\t}} {}_t;", peripheral.name).unwrap();
}

/// Emits the two peripheral struct variants, selected by `BITMASK`.
pub fn render_struct(peripheral: &Peripheral) -> String {
    let mut output = String::new();
    writeln!(output, "#ifdef BITMASK").unwrap();
    write_struct_body(&mut output, peripheral, true);
    writeln!(output, "#else").unwrap();
    write_struct_body(&mut output, peripheral, false);
    write!(output, "#endif").unwrap();
    output
}

/// Emits the complete header for `peripheral`.
pub fn render_header(peripheral: &Peripheral, prefix: &str) -> String {
    let guard = format!("__{}_{}__", prefix.to_uppercase(), peripheral.name);
    let mut output = String::new();
    writeln!(output, "#ifndef {guard}").unwrap();
    writeln!(output, "#define {guard}").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "#include <stdint.h>").unwrap();
    writeln!(output).unwrap();

    for register in &peripheral.registers {
        if let Some(block) = render_register(peripheral, register) {
            writeln!(output, "{block}").unwrap();
        }
    }

    writeln!(output, "{}", render_struct(peripheral)).unwrap();
    writeln!(output).unwrap();
    writeln!(output, "#endif").unwrap();
    output
}
