use crate::error::QprfError;
use std::fmt;
use std::str::FromStr;

/// The four top-level parts of a QPRF 1.1 report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Substance,
    GeneralInformation,
    Prediction,
    Adequacy,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Substance,
        Section::GeneralInformation,
        Section::Prediction,
        Section::Adequacy,
    ];

    /// Key of the section in the report document.
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Substance => "1. Substance",
            Section::GeneralInformation => "2. General information",
            Section::Prediction => "3. Prediction",
            Section::Adequacy => "4. Adequacy (Optional)",
        }
    }

    /// Finds the section a chapter code belongs to by its leading number:
    /// `"1.5 a."` is in [`Section::Substance`], `"3.2 d."` in
    /// [`Section::Prediction`].
    pub fn for_code(code: &str) -> Result<Section, QprfError> {
        let (number, _) = code
            .split_once('.')
            .ok_or_else(|| QprfError::UnknownSection(code.to_string()))?;
        match number {
            "1" => Ok(Section::Substance),
            "2" => Ok(Section::GeneralInformation),
            "3" => Ok(Section::Prediction),
            "4" => Ok(Section::Adequacy),
            _ => Err(QprfError::UnknownSection(code.to_string())),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = QprfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == s)
            .ok_or_else(|| QprfError::UnknownSection(s.to_string()))
    }
}
