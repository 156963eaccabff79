#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

pub mod convert;
pub mod error;
pub mod param;
mod parser;
pub mod pci;
pub mod section;
pub mod util;

use std::borrow::Cow;
use std::fmt;

use encoding_rs::{Encoding, WINDOWS_1252};

pub use error::{ConvertError, EncodeError, ParseError};
pub use section::{Entry, Section};

use crate::parser::Parser;

/// Line terminator used when writing. Windows 9x setup expects DOS line endings.
const NEWLINE: &str = "\r\n";

/// An INF document: an ordered list of sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inf {
    sections: Vec<Section>,
}

impl Inf {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `buffer` and parses it.
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        Self::parse_text(&decode_data(buffer))
    }

    pub fn parse_text(text: &str) -> Result<Self, ParseError> {
        let sections = Parser::new(text).into_sections()?;
        Ok(Self { sections })
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn sections_mut(&mut self) -> &mut [Section] {
        &mut self.sections
    }

    /// Finds the first section whose name matches, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn find_section(&self, name: &str) -> Option<&Section> {
        let name = name.trim();
        self.sections
            .iter()
            .find(|section| section.name().trim().eq_ignore_ascii_case(name))
    }

    pub fn add_section(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Serializes the document and encodes it with a single-byte code page.
    ///
    /// Characters the code page cannot represent are reported rather than substituted. Multi-byte
    /// and UTF-16 encodings are rejected.
    pub fn to_bytes(&self, encoding: &'static Encoding) -> Result<Vec<u8>, EncodeError> {
        if !encoding.is_single_byte() {
            return Err(EncodeError::NotSingleByte(encoding.name()));
        }

        let text = self.to_string();
        let (bytes, _, had_errors) = encoding.encode(&text);

        if had_errors && let Some(error) = find_unmappable(&text, encoding) {
            return Err(error);
        }

        Ok(bytes.into_owned())
    }
}

impl fmt::Display for Inf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for section in &self.sections {
            write!(f, "[{}]{NEWLINE}", section.name())?;

            for entry in section.entries() {
                match entry {
                    Entry::Item(key, value) if value.is_empty() => write!(f, "{key}{NEWLINE}")?,
                    Entry::Item(key, value) => write!(f, "{key}={value}{NEWLINE}")?,
                    Entry::Comment(text) => write!(f, ";{text}{NEWLINE}")?,
                    Entry::Blank => f.write_str(NEWLINE)?,
                }
            }
        }

        Ok(())
    }
}

// Setup files of this era are ANSI; UTF-16 and UTF-8 are recognized by their BOM.
// <https://learn.microsoft.com/en-us/windows-hardware/drivers/display/general-unicode-requirement>
fn decode_data(data: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_length)) = Encoding::for_bom(data) {
        return encoding
            .decode_without_bom_handling(&data[bom_length..])
            .0;
    }

    match std::str::from_utf8(data) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(data).0,
    }
}

fn find_unmappable(text: &str, encoding: &'static Encoding) -> Option<EncodeError> {
    let mut buffer = [0u8; 4];

    text.split(NEWLINE).enumerate().find_map(|(i, line)| {
        line.chars()
            .find(|c| encoding.encode(c.encode_utf8(&mut buffer)).2)
            .map(|c| EncodeError::Unmappable {
                line: i + 1,
                c,
                encoding: encoding.name(),
            })
    })
}

#[cfg(test)]
mod tests {
    use encoding_rs::WINDOWS_1250;

    use super::*;

    const OEMSETUP: &str = r#"; OEMSETUP.INF for the EB100 adapter
[netcard]
EB100="EtherBoard 100, PCI",0,ndis,ethernet,real,EB100,EB100_NIF

[EB100]
device=EB100.DOS,@EB100.DOS
"#;

    #[test]
    fn section_lookup_ignores_case_and_whitespace() {
        let inf = Inf::parse(OEMSETUP.as_bytes()).expect("failed to parse hardcoded INF file");

        let netcard = inf.find_section(" NETCARD ").expect("netcard section");
        assert_eq!(netcard.name(), "netcard");
        assert!(inf.find_section("EB100_NIF").is_none());
    }

    #[test]
    fn decodes_utf16_with_bom() {
        let mut buffer = vec![0xFF, 0xFE];
        buffer.extend("[Strings]\r\nDEVICE=\"Caf\u{e9}\"\r\n".encode_utf16().flat_map(u16::to_le_bytes));

        let inf = Inf::parse(&buffer).expect("failed to parse hardcoded INF file");

        assert_eq!(inf.sections()[0].get_value("device"), "\"Caf\u{e9}\"");
    }

    #[test]
    fn decodes_legacy_code_page() {
        let inf = Inf::parse(b"[Strings]\nDEVICE=\"Caf\xe9\"\n").expect("failed to parse hardcoded INF file");

        assert_eq!(inf.sections()[0].get_value("DEVICE"), "\"Caf\u{e9}\"");
    }

    #[test]
    fn serializes_in_append_order() {
        let mut section = Section::new("nd2wrap.ndi.reg");
        section.add_line("HKR,,DevLoader,,*ndis");
        section.add_comment(" NDIS Info");
        section.add_data("Key", "");
        section.add_blank();

        let mut inf = Inf::new();
        inf.add_section(section);

        assert_eq!(
            inf.to_string(),
            "[nd2wrap.ndi.reg]\r\nHKR,,DevLoader,,*ndis\r\n; NDIS Info\r\nKey\r\n\r\n"
        );
    }

    #[test]
    fn round_trip_preserves_items() {
        let mut version = Section::new("Version");
        version.add_comment(" banner");
        version.add_data("Signature", "$CHICAGO$");
        version.add_data("Class", "Net");
        version.add_blank();

        let mut reg = Section::new("nd2wrap0.ndi.reg");
        reg.add_line(r#"HKR,Ndi,DeviceID,,"PCI\VEN_10EC&DEV_8139""#);
        reg.add_data("%VENDOR%", "ND2WRAP");

        let mut inf = Inf::new();
        inf.add_section(version);
        inf.add_section(reg);

        let reparsed = Inf::parse_text(&inf.to_string()).expect("failed to reparse serialized INF");

        assert_eq!(reparsed.sections().len(), inf.sections().len());
        for (a, b) in inf.sections().iter().zip(reparsed.sections()) {
            assert_eq!(a.name(), b.name());
            assert!(a.items().eq(b.items()));
        }
    }

    #[test]
    fn encodes_to_code_page() {
        let mut section = Section::new("Strings");
        section.add_data("DEVICE", "\"Caf\u{e9}\"");
        let mut inf = Inf::new();
        inf.add_section(section);

        let bytes = inf.to_bytes(WINDOWS_1252).expect("encodable text");

        assert_eq!(bytes, b"[Strings]\r\nDEVICE=\"Caf\xe9\"\r\n");
    }

    #[test]
    fn unmappable_character_is_an_error() {
        let mut section = Section::new("Strings");
        section.add_data("VENDOR", "\"Oerg866\"");
        section.add_data("DEVICE", "\"\u{4e2d}\"");
        let mut inf = Inf::new();
        inf.add_section(section);

        assert_eq!(
            inf.to_bytes(WINDOWS_1250),
            Err(EncodeError::Unmappable {
                line: 3,
                c: '\u{4e2d}',
                encoding: "windows-1250",
            })
        );
    }

    #[test]
    fn multi_byte_encodings_are_rejected() {
        let mut section = Section::new("Strings");
        section.add_data("DEVICE", "\"EtherBoard\"");
        let mut inf = Inf::new();
        inf.add_section(section);

        assert_eq!(
            inf.to_bytes(encoding_rs::UTF_16LE),
            Err(EncodeError::NotSingleByte("UTF-16LE"))
        );
        assert_eq!(
            inf.to_bytes(encoding_rs::SHIFT_JIS),
            Err(EncodeError::NotSingleByte("Shift_JIS"))
        );
    }
}
