use super::color::Theme;
use super::drawing::PictureType;
use super::sheet::Worksheet;
use super::style::StylePool;
use crate::error::{GraftError, Result};
use crate::sink::OutputSink;
use std::collections::BTreeMap;

/// Longest sheet name Excel accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

const FORBIDDEN_SHEET_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// An in-memory spreadsheet document.
#[derive(Debug, Default)]
pub struct Workbook {
    sheets: Vec<Worksheet>,
    pub theme: Theme,
    pub styles: StylePool,
    /// Media parts (`xl/media/image1.png`) and their bytes.
    pub media: BTreeMap<String, Vec<u8>>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        super::reader::read_workbook(bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        super::writer::write_workbook(self)
    }

    /// Serializes the workbook and hands it to `sink` under `name`.
    pub fn write_to(&self, sink: &mut dyn OutputSink, name: &str) -> Result<()> {
        let bytes = self.to_bytes()?;
        sink.write(name, &bytes)
    }

    pub fn sheets(&self) -> &[Worksheet] {
        &self.sheets
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name()).collect()
    }

    /// Case-insensitive, like Excel.
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        let wanted = name.to_lowercase();
        self.sheets.iter().position(|s| s.name().to_lowercase() == wanted)
    }

    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheet_index(name).map(|i| &self.sheets[i])
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Worksheet> {
        let index = self.sheet_index(name)?;
        self.sheets.get_mut(index)
    }

    pub fn sheet_at(&self, index: usize) -> Option<&Worksheet> {
        self.sheets.get(index)
    }

    pub fn sheet_at_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.sheets.get_mut(index)
    }

    /// Appends an empty sheet.
    pub fn create_sheet(&mut self, name: &str) -> Result<&mut Worksheet> {
        self.push_sheet(Worksheet::new(name))
    }

    pub(crate) fn push_sheet(&mut self, sheet: Worksheet) -> Result<&mut Worksheet> {
        validate_sheet_name(&sheet.name)?;
        if self.sheet_index(&sheet.name).is_some() {
            return Err(GraftError::DuplicateSheetName { name: sheet.name });
        }
        self.sheets.push(sheet);
        let last = self.sheets.len() - 1;
        Ok(&mut self.sheets[last])
    }

    pub fn remove_sheet(&mut self, index: usize) -> Option<Worksheet> {
        (index < self.sheets.len()).then(|| self.sheets.remove(index))
    }

    /// Appends a copy of the sheet at `index` named `"<base> (n)"`.
    ///
    /// Styles and media are shared with the source sheet since they live in
    /// this workbook; the drawing gets fresh nodes.
    pub fn clone_sheet(&mut self, index: usize) -> Result<&mut Worksheet> {
        let source = self.sheets.get(index).ok_or_else(|| GraftError::SheetNotFound {
            name: format!("#{}", index),
        })?;
        let name = self.unique_clone_name(source.name())?;
        let copy = source.duplicate(&name)?;
        log::debug!("cloned sheet '{}' as '{}'", self.sheets[index].name(), name);
        self.push_sheet(copy)
    }

    fn unique_clone_name(&self, source: &str) -> Result<String> {
        let (base, start) = split_clone_suffix(source);
        for n in (start..=u64::MAX).chain(2..start) {
            let suffix = format!(" ({})", n);
            let room = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
            let trimmed: String = base.chars().take(room).collect();
            let candidate = format!("{}{}", trimmed, suffix);
            if self.sheet_index(&candidate).is_none() {
                return Ok(candidate);
            }
        }
        Err(GraftError::DuplicateSheetName {
            name: source.to_string(),
        })
    }

    /// Stores image bytes as a new media part and returns its part name.
    pub fn add_picture(&mut self, bytes: Vec<u8>, picture_type: PictureType) -> String {
        let part = free_media_part(&self.media, picture_type.extension());
        self.media.insert(part.clone(), bytes);
        part
    }
}

/// First unused `xl/media/imageN.<ext>` part name in `media`.
pub(crate) fn free_media_part(media: &BTreeMap<String, Vec<u8>>, extension: &str) -> String {
    let mut n = media.len() + 1;
    loop {
        let part = format!("xl/media/image{}.{}", n, extension);
        if !media.contains_key(&part) {
            return part;
        }
        n += 1;
    }
}

/// `"Data (3)"` -> `("Data", 4)`, `"Data"` -> `("Data", 2)`. A suffix with
/// no successor counts as part of the base name.
fn split_clone_suffix(name: &str) -> (&str, u64) {
    let next = name
        .strip_suffix(')')
        .and_then(|stripped| stripped.rsplit_once(" ("))
        .filter(|(base, _)| !base.is_empty())
        .and_then(|(base, number)| {
            let n = number.trim().parse::<u64>().ok()?.checked_add(1)?;
            Some((base, n))
        });
    next.unwrap_or((name, 2))
}

pub fn validate_sheet_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| GraftError::InvalidSheetName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(invalid("name is longer than 31 characters"));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_SHEET_CHARS.contains(c)) {
        return Err(invalid(&format!("name contains '{}'", c)));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(invalid("name starts or ends with an apostrophe"));
    }
    Ok(())
}
