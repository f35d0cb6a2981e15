// Licensed under the Apache-2.0 license

//! Plain records extracted from the SVD tree.
//!
//! ```text
//! Device
//! ├── vendor_id / name / version      # summary only
//! ├── size / reset_value              # document-wide register defaults
//! └── peripherals: Vec<PeripheralNode>
//!     ├── derived_from                # skip marker
//!     ├── size / reset_value          # peripheral-wide register defaults
//!     └── registers: Vec<RegisterNode>
//!         └── fields: Vec<FieldNode>
//! ```
//!
//! Numbers that fail to convert are recorded as `None`; deciding whether that
//! is fatal for a register or field belongs to the layout code downstream.

use crate::error::{SvdError, SvdResult};
use crate::text::{child_text, child_text_or_empty, parse_dec, parse_hex};
use xmltree::Element;

/// The top of an SVD document.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Device {
    pub vendor_id: Option<String>,
    /// Chip name; also the default output file prefix.
    pub name: Option<String>,
    pub version: Option<String>,
    /// Default register size in bits.
    pub size: Option<u64>,
    /// Default register reset value.
    pub reset_value: Option<u64>,
    pub peripherals: Vec<PeripheralNode>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeripheralNode {
    pub name: String,
    pub description: String,
    /// Set when the peripheral copies another one; such peripherals are skipped.
    pub derived_from: Option<String>,
    pub size: Option<u64>,
    pub reset_value: Option<u64>,
    pub registers: Vec<RegisterNode>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterNode {
    pub name: String,
    pub description: String,
    /// Width in bits.
    pub size: Option<u64>,
    /// Byte offset from the peripheral base.
    pub address_offset: Option<u64>,
    pub reset_value: Option<u64>,
    pub fields: Vec<FieldNode>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldNode {
    pub name: String,
    pub description: String,
    pub bit_offset: Option<u64>,
    pub bit_width: Option<u64>,
    /// Raw `[msb:lsb]` text.
    pub bit_range: Option<String>,
    pub lsb: Option<u64>,
    pub msb: Option<u64>,
    pub access: Option<String>,
}

impl Device {
    pub(crate) fn from_element(root: &Element) -> SvdResult<Self> {
        if root.name != "device" {
            return Err(SvdError::MissingRoot(root.name.clone()));
        }
        let peripherals = root
            .get_child("peripherals")
            .ok_or(SvdError::NoPeripheralsSection)?;

        let peripherals = child_elements(peripherals, "peripheral")
            .map(PeripheralNode::from_element)
            .collect();

        Ok(Self {
            vendor_id: child_text(root, "vendorID"),
            name: child_text(root, "name"),
            version: child_text(root, "version"),
            size: child_text(root, "size").as_deref().and_then(parse_hex),
            reset_value: child_text(root, "resetValue").as_deref().and_then(parse_hex),
            peripherals,
        })
    }

    /// Human readable identification, e.g. `Found Acme CHIP1 SVD Version 1.0`.
    pub fn summary(&self) -> String {
        let mut message = String::from("Found ");
        if self.vendor_id.is_none() && self.name.is_none() && self.version.is_none() {
            message.push_str("Unknown Chip");
            return message;
        }
        if let Some(vendor) = &self.vendor_id {
            message.push_str(vendor);
            message.push(' ');
        }
        if let Some(name) = &self.name {
            message.push_str(name);
            message.push(' ');
        }
        if let Some(version) = &self.version {
            message.push_str("SVD Version ");
            message.push_str(version);
        }
        message.trim_end().to_string()
    }
}

impl PeripheralNode {
    fn from_element(element: &Element) -> Self {
        let name = child_text_or_empty(element, "name");
        let registers = match element.get_child("registers") {
            Some(registers) => {
                for cluster in child_elements(registers, "cluster") {
                    log::warn!(
                        "{name}: cluster {} is not supported, skipping",
                        child_text_or_empty(cluster, "name")
                    );
                }
                child_elements(registers, "register")
                    .map(RegisterNode::from_element)
                    .collect()
            }
            None => Vec::new(),
        };

        Self {
            description: child_text_or_empty(element, "description"),
            derived_from: element.attributes.get("derivedFrom").cloned(),
            size: child_text(element, "size").as_deref().and_then(parse_hex),
            reset_value: child_text(element, "resetValue").as_deref().and_then(parse_hex),
            registers,
            name,
        }
    }
}

impl RegisterNode {
    fn from_element(element: &Element) -> Self {
        let fields = element
            .get_child("fields")
            .map(|fields| child_elements(fields, "field").map(FieldNode::from_element).collect())
            .unwrap_or_default();

        Self {
            name: child_text_or_empty(element, "name"),
            description: child_text_or_empty(element, "description"),
            size: child_text(element, "size").as_deref().and_then(parse_hex),
            address_offset: child_text(element, "addressOffset")
                .as_deref()
                .and_then(parse_hex),
            reset_value: child_text(element, "resetValue").as_deref().and_then(parse_hex),
            fields,
        }
    }
}

impl FieldNode {
    fn from_element(element: &Element) -> Self {
        let number = |name: &str| child_text(element, name).as_deref().and_then(parse_dec);
        Self {
            name: child_text_or_empty(element, "name"),
            description: child_text_or_empty(element, "description"),
            bit_offset: number("bitOffset"),
            bit_width: number("bitWidth"),
            bit_range: child_text(element, "bitRange"),
            lsb: number("lsb"),
            msb: number("msb"),
            access: child_text(element, "access"),
        }
    }

    /// True when the field is marked `read-only`.
    pub fn is_read_only(&self) -> bool {
        self.access.as_deref() == Some("read-only")
    }
}

fn child_elements<'a>(
    parent: &'a Element,
    name: &'a str,
) -> impl Iterator<Item = &'a Element> + 'a {
    parent
        .children
        .iter()
        .filter_map(|node| node.as_element())
        .filter(move |element| element.name == name)
}
