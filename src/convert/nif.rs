//! Front-end for NDIS2 `.NIF` network information files.
//!
//! A NIF has one section describing the driver, a `[FILE]` section naming the driver binary,
//! and one section per parameter:
//!
//! ```text
//! [EB100]
//! Type = NDIS
//! Title = "EtherBoard 100"
//! DriverName = EB100$
//!
//! [FILE]
//! Name = EB100.DOS
//!
//! [IRQ]
//! display = "Interrupt level"
//! type = decimal
//! default = 10
//! range = 3-15
//! optional = yes
//! editable = yes
//! ```

use log::{info, warn};

use super::{DriverDescriptor, ParamBlock};
use crate::Inf;
use crate::error::ConvertError;
use crate::param::{Param, ParamKind};
use crate::section::Section;
use crate::util::{parse_in_base, split_values};

pub fn describe(source: &Inf) -> Result<DriverDescriptor, ConvertError> {
    let device = source
        .sections()
        .iter()
        .find(|section| section.find_key("Type").is_some() && section.find_key("display").is_none())
        .ok_or(ConvertError::MissingDeclaration("device"))?;

    let device_type = unquote(device.get_value("Type"));
    if !device_type.eq_ignore_ascii_case("NDIS") {
        return Err(ConvertError::DeviceTypeMismatch {
            section: device.name().to_owned(),
            found: device_type,
        });
    }

    info!("device section: [{}]", device.name());

    let driver_name = required(device, "DriverName")?;
    let device_name = match unquote(device.get_value("Title")) {
        title if title.is_empty() => device.name().to_owned(),
        title => title,
    };

    let file = source
        .find_section("FILE")
        .ok_or_else(|| ConvertError::MissingSection("FILE".to_owned()))?;
    let driver_file = required(file, "Name")?;

    let mut params = Vec::new();
    for section in source.sections() {
        if std::ptr::eq(section, device) || std::ptr::eq(section, file) {
            continue;
        }

        if section.find_key("DriverName").is_some() {
            warn!("ignoring additional device [{}]", section.name());
        } else if section.find_key("display").is_some() || section.find_key("type").is_some() {
            params.push(param_block(section)?);
        }
    }

    Ok(DriverDescriptor {
        device_name,
        driver_name,
        driver_file,
        params,
    })
}

fn param_block(section: &Section) -> Result<ParamBlock, ConvertError> {
    let name = match unquote(section.get_value("tag")) {
        tag if tag.is_empty() => section.name().to_owned(),
        tag => tag,
    };
    let description = match unquote(section.get_value("display")) {
        display if display.is_empty() => name.clone(),
        display => display,
    };
    let default = section
        .find_key("default")
        .map(|_| unquote(section.get_value("default")));

    let param = Param {
        kind: param_kind(section, &name)?,
        default,
        optional: is_yes(section.get_value("optional")),
        read_only: section.find_key("editable").is_some() && !is_yes(section.get_value("editable")),
        name,
        description,
    };

    Ok(ParamBlock {
        origin: format!("Original NIF Parameter: [{}]", section.name()),
        param,
    })
}

fn param_kind(section: &Section, name: &str) -> Result<ParamKind, ConvertError> {
    let choices = split_values(section.get_value("set"));
    if !choices.is_empty() {
        return Ok(ParamKind::Enum(choices));
    }

    let strlength = |fallback: &str| match unquote(section.get_value("strlength")) {
        length if length.is_empty() => ParamKind::edit(name, fallback),
        length => ParamKind::edit(name, &length),
    };

    let param_type = unquote(section.get_value("type")).to_ascii_lowercase();
    let base = match param_type.as_str() {
        "" | "string" | "hexstring" => return strlength("255"),
        "decimal" => 10,
        "hexadecimal" => 16,
        _ => return Err(ConvertError::UnknownParamType(param_type)),
    };

    let range = unquote(section.get_value("range"));
    if range.is_empty() {
        return strlength(if base == 16 { "8" } else { "10" });
    }

    let malformed = || ConvertError::MalformedRange {
        name: name.to_owned(),
        range: range.clone(),
    };

    let (min, max) = if range.contains(',') {
        match split_values(&range).as_slice() {
            [min, max] => (parse_in_base(min, base)?, parse_in_base(max, base)?),
            _ => return Err(malformed()),
        }
    } else {
        let (min, max) = range.split_once('-').ok_or_else(malformed)?;
        (parse_in_base(min, base)?, parse_in_base(max, base)?)
    };

    let step = match unquote(section.get_value("step")) {
        step if step.is_empty() => 1,
        step => parse_in_base(&step, base)?,
    };

    Ok(ParamKind::Int {
        min,
        max,
        step,
        base,
    })
}

fn required(section: &Section, key: &str) -> Result<String, ConvertError> {
    match unquote(section.get_value(key)) {
        value if value.is_empty() => Err(ConvertError::MissingKey {
            section: section.name().to_owned(),
            key: key.to_owned(),
        }),
        value => Ok(value),
    }
}

fn unquote(value: &str) -> String {
    split_values(value).into_iter().next().unwrap_or_default()
}

fn is_yes(value: &str) -> bool {
    unquote(value).eq_ignore_ascii_case("yes")
}
