use std::fmt;
use std::str::FromStr;

use crate::error::ConvertError;
use crate::util::split_values;

/// A PCI vendor/device pair, optionally carrying a display name override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PciId {
    pub vendor: u16,
    pub device: u16,
    pub name: Option<String>,
}

impl PciId {
    /// The enumerator hardware ID, e.g. `PCI\VEN_10EC&DEV_8139`.
    #[must_use]
    pub fn hardware_id(&self) -> String {
        format!("PCI\\VEN_{:04X}&DEV_{:04X}", self.vendor, self.device)
    }
}

impl FromStr for PciId {
    type Err = ConvertError;

    /// Parses `VENDOR:DEVICE[:NAME]`. Only the first field of a comma-separated name is kept.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConvertError::InvalidPciId(s.to_owned());
        let hex = |token: &str| {
            let token = token.trim();
            if !token.starts_with(|c: char| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            u16::from_str_radix(token, 16).map_err(|_| invalid())
        };

        let mut fields = s.splitn(3, ':');
        let vendor = hex(fields.next().ok_or_else(invalid)?)?;
        let device = hex(fields.next().ok_or_else(invalid)?)?;
        let name = fields
            .next()
            .and_then(|name| split_values(name).into_iter().next())
            .filter(|name| !name.is_empty());

        Ok(Self {
            vendor,
            device,
            name,
        })
    }
}

impl fmt::Display for PciId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}:{:04X}", self.vendor, self.device)?;
        if let Some(name) = &self.name {
            write!(f, ":\"{name}\"")?;
        }
        Ok(())
    }
}
