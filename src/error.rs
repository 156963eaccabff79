use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: content before the first section header")]
    ContentOutsideSection { line: usize },

    #[error("line {line}: section name cannot be empty")]
    SectionNameEmpty { line: usize },

    #[error("line {line}: section name cannot exceed 255 characters")]
    SectionNameTooLong { line: usize },

    #[error("line {line}: unterminated section header")]
    UnterminatedSectionName { line: usize },

    #[error("line {line}: unexpected character: {c:?}")]
    UnexpectedCharacter { line: usize, c: char },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("line {line}: character {c:?} cannot be represented in {encoding}")]
    Unmappable {
        line: usize,
        c: char,
        encoding: &'static str,
    },
    #[error("{0} is not a single-byte code page")]
    NotSingleByte(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    #[error("source has no [{0}] section")]
    MissingSection(String),

    #[error("source has no {0} declaration")]
    MissingDeclaration(&'static str),

    #[error("[{section}] has no {key} entry")]
    MissingKey { section: String, key: String },

    #[error("device [{section}] has type {found:?}, expected NDIS")]
    DeviceTypeMismatch { section: String, found: String },

    #[error("malformed declaration {0:?}")]
    MalformedDeclaration(String),

    #[error("unknown parameter type {0:?}")]
    UnknownParamType(String),

    #[error("invalid integer literal {0:?}")]
    InvalidInteger(String),

    #[error("parameter {name}: malformed range {range:?}")]
    MalformedRange { name: String, range: String },

    #[error("invalid PCI identity {0:?}, expected VENDOR:DEVICE[:NAME]")]
    InvalidPciId(String),
}
