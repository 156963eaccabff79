//! Front-end for LAN Manager style `OEMSETUP.INF` files.
//!
//! ```text
//! [netcard]
//! ms$eb100="EtherBoard 100",0,ndis,ethernet,real,ms$eb100,ms$eb100_nif
//!
//! [ms$eb100]
//! device=EB100.DOS,@EB100.DOS
//!
//! [ms$eb100_nif]
//! drivername=EB100$
//! param=IRQ,"Interrupt level",int,"3,15,1",10,0
//! ```
//!
//! Only the first `[netcard]` declaration is used.

use log::{debug, info, warn};

use super::{DriverDescriptor, ParamBlock};
use crate::Inf;
use crate::error::ConvertError;
use crate::param::{Param, ParamKind};
use crate::section::Section;
use crate::util::{parse_int, split_values};

/// Fields of a `[netcard]` declaration.
const DEVICE_NAME: usize = 0;
const DRIVER_SECTION: usize = 5;
const NIF_SECTION: usize = 6;

pub fn describe(source: &Inf) -> Result<DriverDescriptor, ConvertError> {
    let netcard = find_section(source, "netcard")?;

    let mut declarations = netcard.items();
    let (_, declaration) = declarations
        .next()
        .ok_or(ConvertError::MissingDeclaration("netcard"))?;

    for (key, _) in declarations {
        warn!("ignoring additional netcard declaration {key:?}");
    }

    let fields = split_values(declaration);
    if fields.len() <= NIF_SECTION {
        return Err(ConvertError::MalformedDeclaration(declaration.to_owned()));
    }

    let driver_section = find_section(source, &fields[DRIVER_SECTION])?;
    let nif_section = find_section(source, &fields[NIF_SECTION])?;

    info!("driver section: [{}]", driver_section.name());
    info!("NIF section: [{}]", nif_section.name());

    let params = nif_section
        .items()
        .filter(|(key, _)| key.eq_ignore_ascii_case("param"))
        .map(|(_, value)| param_block(value))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DriverDescriptor {
        device_name: fields[DEVICE_NAME].clone(),
        driver_name: first_field(nif_section, "DriverName")?,
        driver_file: first_field(driver_section, "device")?,
        params,
    })
}

fn find_section<'a>(source: &'a Inf, name: &str) -> Result<&'a Section, ConvertError> {
    source
        .find_section(name)
        .ok_or_else(|| ConvertError::MissingSection(name.to_owned()))
}

fn first_field(section: &Section, key: &str) -> Result<String, ConvertError> {
    split_values(section.get_value(key))
        .into_iter()
        .next()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ConvertError::MissingKey {
            section: section.name().to_owned(),
            key: key.to_owned(),
        })
}

/// Parses `name,description,type,range,default,flags`. The flags field may be omitted; an empty
/// default must be followed by flags, since the splitter drops a trailing empty field.
fn param_block(declaration: &str) -> Result<ParamBlock, ConvertError> {
    let fields = split_values(declaration);
    let [name, description, type_tag, range, default, rest @ ..] = fields.as_slice() else {
        return Err(ConvertError::MalformedDeclaration(declaration.to_owned()));
    };

    let flags = match rest.first() {
        Some(flags) if !flags.is_empty() => parse_int(flags)?,
        _ => 0,
    };
    debug!("parameter {name:?}: flags {flags:#x}");

    Ok(ParamBlock {
        origin: format!("Original NDIS2 Parameter: {declaration}"),
        param: Param {
            name: name.clone(),
            description: description.clone(),
            kind: ParamKind::from_tag(name, type_tag, range)?,
            default: Some(default.clone()),
            optional: false,
            read_only: false,
        },
    })
}
