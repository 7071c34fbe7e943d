use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraftError {
    #[error("Invalid OOXML package: {message}")]
    InvalidPackage { message: String },

    #[error("Missing required part '{part_path}' in {document_type} document")]
    MissingPart { part_path: String, document_type: String },

    #[error("XML parsing error at {location}: {message}")]
    XmlParse { message: String, location: String },

    #[error("XML serialization error: {0}")]
    XmlWrite(String),

    #[error("Invalid relationship: {message}")]
    InvalidRelationship { message: String },

    /// An A1 reference or `sqref` list that does not parse.
    #[error("Invalid cell reference '{reference}'")]
    InvalidCellReference { reference: String },

    #[error("Invalid sheet name '{name}': {reason}")]
    InvalidSheetName { name: String, reason: String },

    /// Sheet names compare case-insensitively.
    #[error("A sheet named '{name}' already exists")]
    DuplicateSheetName { name: String },

    #[error("Sheet '{name}' not found")]
    SheetNotFound { name: String },

    #[error("Shape '{name}' not found")]
    ShapeNotFound { name: String },

    /// A z-order that is not a permutation of the drawing's two-cell anchors.
    #[error("Invalid anchor permutation: {message}")]
    InvalidPermutation { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

pub type Result<T> = std::result::Result<T, GraftError>;
