//! Translation of NDIS2 driver parameters into `Ndi\params` registry lines.
//!
//! Every parameter becomes a block of `HKR` lines under `Ndi\params\<name>` which the network
//! control panel reads to build the adapter's "Advanced" property page. The values end up in
//! `PROTOCOL.INI` for the real-mode driver.

use log::info;

use crate::error::ConvertError;
use crate::section::Section;
use crate::util::{parse_in_base, parse_int, split_values};

/// Shape of a parameter's editor in the property page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// A numeric spin box. `base` is 10 or 16.
    Int {
        min: i64,
        max: i64,
        step: i64,
        base: u32,
    },
    /// A drop-down list of literal choices.
    Enum(Vec<String>),
    /// A free text field of at most `limit` characters.
    Edit { limit: i64 },
}

impl ParamKind {
    /// Interprets a type tag (`int`, `text` or `chars`) and its range specifier.
    ///
    /// `int` takes `min,max,step`, `text` a list of choices and `chars` the maximum length.
    pub fn from_tag(name: &str, type_tag: &str, range: &str) -> Result<Self, ConvertError> {
        let malformed = || ConvertError::MalformedRange {
            name: name.to_owned(),
            range: range.to_owned(),
        };

        match type_tag.trim().to_ascii_lowercase().as_str() {
            "int" => {
                let fields = split_values(range);
                let [min, max, step] = fields.as_slice() else {
                    return Err(malformed());
                };

                Ok(Self::Int {
                    min: parse_int(min)?,
                    max: parse_int(max)?,
                    step: parse_int(step)?,
                    base: 10,
                })
            }
            "text" => {
                let choices = split_values(range);
                if choices.is_empty() {
                    return Err(malformed());
                }

                Ok(Self::Enum(choices))
            }
            "chars" => Self::edit(name, range),
            _ => Err(ConvertError::UnknownParamType(type_tag.to_owned())),
        }
    }

    /// An edit field whose maximum length is given as an integer literal.
    pub fn edit(name: &str, limit: &str) -> Result<Self, ConvertError> {
        let value = parse_int(limit)?;
        if value < 0 {
            return Err(ConvertError::MalformedRange {
                name: name.to_owned(),
                range: limit.to_owned(),
            });
        }

        Ok(Self::Edit { limit: value })
    }
}

/// One driver parameter, independent of the dialect it was declared in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub description: String,
    pub kind: ParamKind,
    pub default: Option<String>,
    pub optional: bool,
    pub read_only: bool,
}

impl Param {
    /// Appends the full registry block: description, editor shape and attributes.
    pub fn emit(&self, section: &mut Section) {
        let key = format!(r"HKR,Ndi\params\{}", self.name);

        section.add_line(format!(r#"{key},ParamDesc,,"{}""#, self.description));
        emit_kind(section, &self.name, &self.kind, self.default.as_deref());

        if self.optional {
            section.add_line(format!("{key},optional,,1"));
        }

        if self.read_only {
            // REG_BINARY DWORD 0x00000020, little-endian.
            section.add_line(format!("{key},flag,1,20,00,00,00"));
        }
    }
}

/// Appends the lines for a single parameter given its type tag and range specifier.
pub fn translate(
    section: &mut Section,
    name: &str,
    type_tag: &str,
    range: &str,
    default: &str,
) -> Result<(), ConvertError> {
    let kind = ParamKind::from_tag(name, type_tag, range)?;
    emit_kind(section, name, &kind, Some(default));
    Ok(())
}

fn emit_kind(section: &mut Section, name: &str, kind: &ParamKind, default: Option<&str>) {
    let key = format!(r"HKR,Ndi\params\{name}");

    match kind {
        ParamKind::Int {
            min,
            max,
            step,
            base,
        } => {
            let default = default.map(|default| normalize_int(default, *base));
            info!(
                "parameter {name:?} (int): range {}-{}, step {}, default {}",
                in_base(*min, *base),
                in_base(*max, *base),
                in_base(*step, *base),
                default.as_deref().unwrap_or("<none>"),
            );

            if let Some(default) = default {
                section.add_line(format!("{key},default,,{default}"));
            }
            section.add_line(format!("{key},min,,{}", in_base(*min, *base)));
            section.add_line(format!("{key},max,,{}", in_base(*max, *base)));
            section.add_line(format!("{key},step,,{}", in_base(*step, *base)));
            section.add_line(format!("{key},base,,{base}"));
            section.add_line(format!("{key},type,,int"));
        }
        ParamKind::Enum(choices) => {
            info!(
                "parameter {name:?} (enum): values {choices:?}, default {}",
                default.unwrap_or("<none>"),
            );

            if let Some(default) = default {
                section.add_line(format!("{key},default,,{default}"));
            }
            section.add_line(format!("{key},type,,enum"));

            for choice in choices {
                section.add_line(format!(r#"{key}\enum,{choice},,"{choice}""#));
            }
        }
        ParamKind::Edit { limit } => {
            info!(
                "parameter {name:?} (edit): maximum length {limit}, default {}",
                default.unwrap_or("<none>"),
            );

            if let Some(default) = default {
                section.add_line(format!(r#"{key},default,,"{default}""#));
            }
            section.add_line(format!("{key},LimitText,,{limit}"));
            section.add_line(format!("{key},type,,edit"));
        }
    }
}

fn in_base(value: i64, base: u32) -> String {
    match base {
        16 if value < 0 => format!("-{:X}", value.unsigned_abs()),
        16 => format!("{value:X}"),
        _ => value.to_string(),
    }
}

/// Rewrites a default in the parameter's base; text that is not a decimal or prefixed literal
/// is passed through untouched.
fn normalize_int(default: &str, base: u32) -> String {
    parse_in_base(default, base).map_or_else(|_| default.to_owned(), |value| in_base(value, base))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::section::Entry;

    fn lines(section: &Section) -> Vec<&str> {
        section
            .entries()
            .iter()
            .map(|entry| match entry {
                Entry::Item(key, _) => key.as_str(),
                _ => panic!("unexpected entry {entry:?}"),
            })
            .collect()
    }

    #[test]
    fn int_parameter() {
        let mut section = Section::new("nd2wrap.ndi.reg");
        translate(&mut section, "IRQ", "int", "0,255,1", "10").expect("valid parameter");

        assert_eq!(
            lines(&section),
            [
                r"HKR,Ndi\params\IRQ,default,,10",
                r"HKR,Ndi\params\IRQ,min,,0",
                r"HKR,Ndi\params\IRQ,max,,255",
                r"HKR,Ndi\params\IRQ,step,,1",
                r"HKR,Ndi\params\IRQ,base,,10",
                r"HKR,Ndi\params\IRQ,type,,int",
            ]
        );
    }

    #[test]
    fn int_parameter_with_hex_literals() {
        let mut section = Section::new("nd2wrap.ndi.reg");
        translate(&mut section, "IOBASE", "INT", "0x200,0x3E0,0x20", "0x300").expect("valid parameter");

        assert_eq!(
            &lines(&section)[..4],
            [
                r"HKR,Ndi\params\IOBASE,default,,768",
                r"HKR,Ndi\params\IOBASE,min,,512",
                r"HKR,Ndi\params\IOBASE,max,,992",
                r"HKR,Ndi\params\IOBASE,step,,32",
            ]
        );
    }

    #[test]
    fn text_parameter() {
        let mut section = Section::new("nd2wrap.ndi.reg");
        translate(&mut section, "MEDIA", "text", "Auto,10Mbps,100Mbps", "Auto")
            .expect("valid parameter");

        assert_eq!(
            lines(&section),
            [
                r"HKR,Ndi\params\MEDIA,default,,Auto",
                r"HKR,Ndi\params\MEDIA,type,,enum",
                r#"HKR,Ndi\params\MEDIA\enum,Auto,,"Auto""#,
                r#"HKR,Ndi\params\MEDIA\enum,10Mbps,,"10Mbps""#,
                r#"HKR,Ndi\params\MEDIA\enum,100Mbps,,"100Mbps""#,
            ]
        );
    }

    #[test]
    fn chars_parameter() {
        let mut section = Section::new("nd2wrap.ndi.reg");
        translate(&mut section, "NODE", "chars", "0x10", "MyNode").expect("valid parameter");

        assert_eq!(
            lines(&section),
            [
                r#"HKR,Ndi\params\NODE,default,,"MyNode""#,
                r"HKR,Ndi\params\NODE,LimitText,,16",
                r"HKR,Ndi\params\NODE,type,,edit",
            ]
        );
    }

    #[test]
    fn unknown_type_is_fatal() {
        let mut section = Section::new("nd2wrap.ndi.reg");

        assert_eq!(
            translate(&mut section, "X", "float", "1", "1"),
            Err(ConvertError::UnknownParamType("float".to_owned()))
        );
        assert!(section.entries().is_empty());
    }

    #[test]
    fn malformed_ranges_are_fatal() {
        assert_eq!(
            ParamKind::from_tag("IRQ", "int", "3,15"),
            Err(ConvertError::MalformedRange {
                name: "IRQ".to_owned(),
                range: "3,15".to_owned(),
            })
        );
        assert_eq!(
            ParamKind::from_tag("IRQ", "int", "3,fifteen,1"),
            Err(ConvertError::InvalidInteger("fifteen".to_owned()))
        );
        assert_eq!(
            ParamKind::from_tag("NODE", "chars", "twelve"),
            Err(ConvertError::InvalidInteger("twelve".to_owned()))
        );
    }

    #[test]
    fn hexadecimal_int_parameter() {
        let mut section = Section::new("nd2wrap.ndi.reg");
        let param = Param {
            name: "IOBASE".to_owned(),
            description: "I/O base address".to_owned(),
            kind: ParamKind::Int {
                min: 0x200,
                max: 0x3E0,
                step: 0x20,
                base: 16,
            },
            default: Some("300".to_owned()),
            optional: true,
            read_only: true,
        };

        param.emit(&mut section);

        assert_eq!(
            lines(&section),
            [
                r#"HKR,Ndi\params\IOBASE,ParamDesc,,"I/O base address""#,
                r"HKR,Ndi\params\IOBASE,default,,300",
                r"HKR,Ndi\params\IOBASE,min,,200",
                r"HKR,Ndi\params\IOBASE,max,,3E0",
                r"HKR,Ndi\params\IOBASE,step,,20",
                r"HKR,Ndi\params\IOBASE,base,,16",
                r"HKR,Ndi\params\IOBASE,type,,int",
                r"HKR,Ndi\params\IOBASE,optional,,1",
                r"HKR,Ndi\params\IOBASE,flag,1,20,00,00,00",
            ]
        );
    }

    #[test]
    fn default_prefix_in_either_case() {
        assert_eq!(normalize_int("0X300", 16), "300");
        assert_eq!(normalize_int("0x3e0", 16), "3E0");
        assert_eq!(normalize_int("0x0x300", 16), "0x0x300");
        assert_eq!(normalize_int("0x300", 10), "768");
        assert_eq!(normalize_int("Auto", 10), "Auto");
    }
}
