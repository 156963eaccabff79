//! Builds the Windows 9x INF that wraps an NDIS2 driver.
//!
//! Both source dialects are reduced to a [`DriverDescriptor`] by their front-end module, then
//! [`assemble`] lays out the output document. The generated sections are named `nd2wrap*`, and
//! only one base driver is supported per output file.

pub mod nif;
pub mod oemsetup;

use log::info;

use crate::Inf;
use crate::error::ConvertError;
use crate::param::Param;
use crate::pci::PciId;
use crate::section::Section;

const NDI_REG: &str = "nd2wrap.ndi.reg";
const INSTALL: &str = "nd2wrap.inst.ndis2";
const INSTALL_REG: &str = "nd2wrap.inst.ndis2.reg";
const REMOVE: &str = "nd2wrap.rmv.ndis2";
const REMOVE_REG: &str = "nd2wrap.rmv.ndis2.reg";
const COPY_FILES: &str = "nd2wrap.ndis2.CopyFiles";

/// Registry key listing the real-mode drivers `NET START` loads.
const REAL_MODE_NET: &str = r#"HKLM,"Software\Microsoft\Windows\CurrentVersion\Network\Real Mode Net""#;

const PROJECT_URL: &str = "http://github.com/oerg866/ndis2infer9x";
const VENDOR: &str = "\"NDIS2INFER by Oerg866\"";
const DISK_NAME: &str = "\"Oerg866 NDIS2INFER9X Driver\",,";

/// Destination directory ID for the Windows directory.
const DIRID_WINDOWS: &str = "26";

/// Source descriptor dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// A LAN Manager style `OEMSETUP.INF` with `[netcard]` declarations.
    OemSetup,
    /// An NDIS2 `.NIF` file with one section per device and parameter.
    Nif,
}

impl Dialect {
    /// Extracts the driver description from a parsed source file.
    pub fn describe(self, source: &Inf) -> Result<DriverDescriptor, ConvertError> {
        match self {
            Self::OemSetup => oemsetup::describe(source),
            Self::Nif => nif::describe(source),
        }
    }
}

/// Everything the output needs to know about the wrapped driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverDescriptor {
    /// Display name of the adapter.
    pub device_name: String,
    /// Symbolic driver name used in `PROTOCOL.INI`, e.g. `EB100$`.
    pub driver_name: String,
    /// Real-mode driver file, e.g. `EB100.DOS`.
    pub driver_file: String,
    pub params: Vec<ParamBlock>,
}

/// A parameter along with a note on where it was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamBlock {
    pub origin: String,
    pub param: Param,
}

/// Reads `source` in the given dialect and assembles the output for `ids`.
pub fn convert(
    source: &Inf,
    dialect: Dialect,
    ids: &[PciId],
    command_line: Option<&str>,
) -> Result<Inf, ConvertError> {
    let descriptor = dialect.describe(source)?;

    info!("driver name: {}", descriptor.driver_name);
    info!("driver file: {}", descriptor.driver_file);

    Ok(assemble(&descriptor, ids, command_line))
}

/// Lays out the output INF. `command_line` is echoed into `[Version]` when given.
#[must_use]
pub fn assemble(descriptor: &DriverDescriptor, ids: &[PciId], command_line: Option<&str>) -> Inf {
    let driver_file = descriptor.driver_file.as_str();
    let mut inf = Inf::new();

    let mut version = Section::new("Version");
    version.add_comment(concat!(" NDIS2 Wrapper INF, ndis2inf ", env!("CARGO_PKG_VERSION")));
    version.add_comment(format!(" {PROJECT_URL}"));
    if let Some(command_line) = command_line {
        version.add_comment(format!(" Command Line: [{command_line}]"));
    }
    version.add_data("LayoutFile", "layout.inf");
    version.add_data("Signature", "$CHICAGO$");
    version.add_data("Class", "Net");
    version.add_data("Provider", "%VENDOR%");
    inf.add_section(version);

    let mut manufacturer = Section::new("Manufacturer");
    manufacturer.add_data("%VENDOR%", "ND2WRAP");
    inf.add_section(manufacturer);

    let mut models = Section::new("ND2WRAP");
    for (i, id) in ids.iter().enumerate() {
        let display = id
            .name
            .as_ref()
            .map_or_else(|| "%DEVICE%".to_owned(), |name| format!("\"{name} (NDIS2)\""));
        models.add_data(display, format!("nd2wrap{i}.ndi,{}", id.hardware_id()));
    }
    inf.add_section(models);

    let mut disk_names = Section::new("SourceDisksNames");
    disk_names.add_data("1", DISK_NAME);
    inf.add_section(disk_names);

    let mut disk_files = Section::new("SourceDisksFiles");
    disk_files.add_data(driver_file, "1");
    inf.add_section(disk_files);

    for (i, id) in ids.iter().enumerate() {
        let mut ndi = Section::new(format!("nd2wrap{i}.ndi"));
        ndi.add_data("AddReg", format!("nd2wrap{i}.ndi.reg,{NDI_REG}"));
        inf.add_section(ndi);

        let mut ndi_reg = Section::new(format!("nd2wrap{i}.ndi.reg"));
        ndi_reg.add_line(format!("HKR,Ndi,DeviceID,,\"{}\"", id.hardware_id()));
        inf.add_section(ndi_reg);
    }

    inf.add_section(ndi_registry(descriptor));

    let mut install = Section::new(INSTALL);
    install.add_data("CopyFiles", COPY_FILES);
    install.add_data("AddReg", INSTALL_REG);
    inf.add_section(install);

    let mut remove = Section::new(REMOVE);
    remove.add_data("AddReg", REMOVE_REG);
    inf.add_section(remove);

    let mut install_reg = Section::new(INSTALL_REG);
    install_reg.add_line(format!("{REAL_MODE_NET},{driver_file},,low"));
    inf.add_section(install_reg);

    let mut remove_reg = Section::new(REMOVE_REG);
    remove_reg.add_line(format!("{REAL_MODE_NET},{driver_file}"));
    inf.add_section(remove_reg);

    let mut copy_files = Section::new(COPY_FILES);
    copy_files.add_line(driver_file);
    inf.add_section(copy_files);

    let mut destination_dirs = Section::new("DestinationDirs");
    destination_dirs.add_data(COPY_FILES, DIRID_WINDOWS);
    inf.add_section(destination_dirs);

    let mut strings = Section::new("Strings");
    strings.add_data("VENDOR", VENDOR);
    strings.add_data("DEVICE", format!("\"{} (NDIS2)\"", descriptor.device_name));
    inf.add_section(strings);

    for section in inf.sections_mut() {
        section.add_blank();
    }

    inf
}

/// The registry section shared by every device ID: NDIS linkage plus the driver's parameters.
fn ndi_registry(descriptor: &DriverDescriptor) -> Section {
    let mut section = Section::new(NDI_REG);

    section.add_line("HKR,,DevLoader,,*ndis");
    section.add_line("HKR,,EnumPropPages,,\"netdi.dll,EnumPropPages\"");

    section.add_comment(" NDIS Info");
    section.add_line(format!(
        "HKR,NDIS,LogDriverName,,\"{}\"",
        descriptor.driver_name.replace('$', "")
    ));
    section.add_line("HKR,NDIS,MajorNdisVersion,1,03");
    section.add_line("HKR,NDIS,MinorNdisVersion,1,0A");
    section.add_line(format!(r#"HKR,NDIS\NDIS2,DriverName,,"{}""#, descriptor.driver_name));
    section.add_line(format!(r#"HKR,NDIS\NDIS2,FileName,,"{}""#, descriptor.driver_file));

    section.add_comment(" Interfaces");
    section.add_line(r#"HKR,Ndi\Interfaces,DefUpper,,"ndis2""#);
    section.add_line(r#"HKR,Ndi\Interfaces,DefLower,,"ethernet""#);
    section.add_line(r#"HKR,Ndi\Interfaces,UpperRange,,"ndis2""#);
    section.add_line(r#"HKR,Ndi\Interfaces,LowerRange,,"ethernet""#);

    section.add_comment(" Install sections");
    section.add_line(format!(r#"HKR,Ndi\Install,ndis2,,"{INSTALL}""#));
    section.add_line(format!(r#"HKR,Ndi\Remove,ndis2,,"{REMOVE}""#));

    for block in &descriptor.params {
        section.add_comment(block.origin.as_str());
        block.param.emit(&mut section);
        section.add_blank();
    }

    section.add_line(r#"HKR,,MsPciScan,0,"2""#);
    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::param::ParamKind;

    fn descriptor() -> DriverDescriptor {
        DriverDescriptor {
            device_name: "EtherBoard 100".to_owned(),
            driver_name: "EB100$".to_owned(),
            driver_file: "EB100.DOS".to_owned(),
            params: vec![ParamBlock {
                origin: "Original NDIS2 Parameter: IRQ".to_owned(),
                param: Param {
                    name: "IRQ".to_owned(),
                    description: "Interrupt".to_owned(),
                    kind: ParamKind::Int {
                        min: 3,
                        max: 15,
                        step: 1,
                        base: 10,
                    },
                    default: Some("10".to_owned()),
                    optional: false,
                    read_only: false,
                },
            }],
        }
    }

    fn ids() -> Vec<PciId> {
        vec![
            "10EC:8139".parse().expect("valid PCI identity"),
            "10EC:8138:\"EtherBoard 100 Rev B\"".parse().expect("valid PCI identity"),
        ]
    }

    #[test]
    fn one_model_line_and_section_pair_per_id() {
        let inf = assemble(&descriptor(), &ids(), None);

        let models = inf.find_section("ND2WRAP").expect("models section");
        assert_eq!(
            models.items().collect::<Vec<_>>(),
            [
                ("%DEVICE%", r"nd2wrap0.ndi,PCI\VEN_10EC&DEV_8139"),
                ("\"EtherBoard 100 Rev B (NDIS2)\"", r"nd2wrap1.ndi,PCI\VEN_10EC&DEV_8138"),
            ]
        );

        let names = inf
            .sections()
            .iter()
            .map(Section::name)
            .skip_while(|name| *name != "nd2wrap0.ndi")
            .take(4)
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            ["nd2wrap0.ndi", "nd2wrap0.ndi.reg", "nd2wrap1.ndi", "nd2wrap1.ndi.reg"]
        );

        let reg = inf.find_section("nd2wrap1.ndi.reg").expect("device registry section");
        assert_eq!(
            reg.find_key(r#"HKR,Ndi,DeviceID,,"PCI\VEN_10EC&DEV_8138""#),
            Some(r#"HKR,Ndi,DeviceID,,"PCI\VEN_10EC&DEV_8138""#)
        );
    }

    #[test]
    fn every_section_ends_with_a_spacer() {
        let inf = assemble(&descriptor(), &ids(), Some("ndis2inf --id 10EC:8139"));

        for section in inf.sections() {
            assert_eq!(section.entries().last(), Some(&crate::Entry::Blank), "[{}]", section.name());
        }

        let version = inf.find_section("Version").expect("version section");
        assert!(version.entries().contains(&crate::Entry::Comment(
            " Command Line: [ndis2inf --id 10EC:8139]".to_owned()
        )));
    }

    #[test]
    fn fixed_boilerplate() {
        let inf = assemble(&descriptor(), &ids(), None);

        let version = inf.find_section("Version").expect("version section");
        assert!(version.entries().contains(&crate::Entry::Comment(
            " http://github.com/oerg866/ndis2infer9x".to_owned()
        )));

        let strings = inf.find_section("Strings").expect("strings section");
        assert_eq!(strings.get_value("VENDOR"), "\"NDIS2INFER by Oerg866\"");
        assert_eq!(strings.get_value("DEVICE"), "\"EtherBoard 100 (NDIS2)\"");

        let disk_names = inf.find_section("SourceDisksNames").expect("disk names section");
        assert_eq!(disk_names.get_value("1"), "\"Oerg866 NDIS2INFER9X Driver\",,");
    }

    #[test]
    fn driver_file_is_substituted() {
        let inf = assemble(&descriptor(), &ids(), None);

        let install = inf.find_section(INSTALL_REG).expect("install registry section");
        assert_eq!(
            install.items().next(),
            Some((
                r#"HKLM,"Software\Microsoft\Windows\CurrentVersion\Network\Real Mode Net",EB100.DOS,,low"#,
                ""
            ))
        );
        assert_eq!(inf.find_section(COPY_FILES).and_then(|s| s.items().next()), Some(("EB100.DOS", "")));
    }

    #[test]
    fn shared_registry_section_layout() {
        let inf = assemble(&descriptor(), &ids(), None);
        let reg = inf.find_section(NDI_REG).expect("shared registry section");

        assert!(reg.find_key(r#"HKR,NDIS,LogDriverName,,"EB100""#).is_some());
        assert!(reg.find_key(r#"HKR,NDIS\NDIS2,DriverName,,"EB100$""#).is_some());
        assert!(reg.entries().contains(&crate::Entry::Comment(
            "Original NDIS2 Parameter: IRQ".to_owned()
        )));
        assert_eq!(
            reg.items().last(),
            Some((r#"HKR,,MsPciScan,0,"2""#, ""))
        );
    }
}
