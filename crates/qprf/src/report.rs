use crate::error::QprfError;
use crate::section::Section;
use crate::{HTML_TEMPLATE, TEMPLATE};
use handlebars::Handlebars;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

const TITLE: &str = "Title";
const VERSION: &str = "Version";
const DATE: &str = "Date";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Document {
    single_calculations: IndexMap<String, String>,
    array_calculations: IndexMap<String, Block>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Block {
    values: IndexMap<String, Entry>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

/// A `[label, value]` pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry(String, String);

/// Where a keyed value lives in the document.
#[derive(Debug, Clone, Copy)]
enum Slot {
    /// `singleCalculations`
    Metadata,
    /// The `values` of one section.
    Chapter(Section),
}

fn unknown_code(section: Section, code: &str) -> QprfError {
    QprfError::UnknownChapterCode {
        section: section.to_string(),
        code: code.to_string(),
    }
}

/// One chapter of a section, copied out of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub code: String,
    pub label: String,
    pub value: String,
}

/// A QPRF 1.1 report, addressed by chapter code.
#[derive(Debug, Clone)]
pub struct QprfReport {
    doc: Document,
    html_template: String,
}

impl QprfReport {
    /// Creates a report from the embedded QPRF template.
    pub fn new() -> Result<Self, QprfError> {
        Self::from_sources(TEMPLATE, HTML_TEMPLATE)
    }

    /// Creates a report from a JSON document and a handlebars template used
    /// by [`QprfReport::to_html`].
    pub fn from_sources(json: &str, html_template: &str) -> Result<Self, QprfError> {
        let doc: Document = serde_json::from_str(json)?;
        log::debug!(
            "Loaded QPRF document with {} sections",
            doc.array_calculations.len()
        );
        Ok(Self {
            doc,
            html_template: html_template.to_string(),
        })
    }

    /// Parses an existing QPRF JSON report.
    pub fn from_json(json: &str) -> Result<Self, QprfError> {
        Self::from_sources(json, HTML_TEMPLATE)
    }

    /// Opens an existing QPRF JSON report from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, QprfError> {
        let path = path.as_ref();
        log::info!("Opening QPRF report from {}", path.display());
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Sets or gets the value of a chapter.
    ///
    /// With `Some(value)` the stored value is replaced first. Returns the
    /// current value either way.
    ///
    /// ```ignore
    /// report.value("1.1", Some("7732-18-5"))?;
    /// assert_eq!(report.value("1.1", None)?, "7732-18-5");
    /// ```
    pub fn value(&mut self, code: &str, value: Option<&str>) -> Result<&str, QprfError> {
        let section = Section::for_code(code)?;
        self.value_in(Slot::Chapter(section), code, value)?
            .ok_or_else(|| unknown_code(section, code))
    }

    /// Read-only lookup of a chapter value.
    pub fn chapter_value(&self, code: &str) -> Result<&str, QprfError> {
        let section = Section::for_code(code)?;
        self.lookup(Slot::Chapter(section), code)?
            .ok_or_else(|| unknown_code(section, code))
    }

    /// The chapters of `section` in document order.
    pub fn chapters(&self, section: Section) -> Result<Vec<Chapter>, QprfError> {
        Ok(self
            .block(section)?
            .values
            .iter()
            .map(|(code, Entry(label, value))| Chapter {
                code: code.clone(),
                label: label.clone(),
                value: value.clone(),
            })
            .collect())
    }

    fn block(&self, section: Section) -> Result<&Block, QprfError> {
        self.doc
            .array_calculations
            .get(section.as_str())
            .ok_or_else(|| QprfError::MissingSection(section.to_string()))
    }

    /// Sets (with `Some`) and then returns the value stored under `key`.
    ///
    /// Metadata keys are created on write. Chapter codes must already exist
    /// in their section, and a failed lookup leaves the document unchanged.
    /// `None` is only returned for metadata that was never set.
    fn value_in(
        &mut self,
        slot: Slot,
        key: &str,
        value: Option<&str>,
    ) -> Result<Option<&str>, QprfError> {
        let current = match slot {
            Slot::Metadata => match value {
                Some(_) => Some(
                    self.doc
                        .single_calculations
                        .entry(key.to_string())
                        .or_default(),
                ),
                None => self.doc.single_calculations.get_mut(key),
            },
            Slot::Chapter(section) => {
                let block = self
                    .doc
                    .array_calculations
                    .get_mut(section.as_str())
                    .ok_or_else(|| QprfError::MissingSection(section.to_string()))?;
                let entry = block
                    .values
                    .get_mut(key)
                    .ok_or_else(|| unknown_code(section, key))?;
                Some(&mut entry.1)
            }
        };
        let Some(current) = current else {
            return Ok(None);
        };
        if let Some(value) = value {
            log::debug!("Set QPRF '{key}' ({} bytes)", value.len());
            *current = value.to_string();
        }
        Ok(Some(current.as_str()))
    }

    fn lookup(&self, slot: Slot, key: &str) -> Result<Option<&str>, QprfError> {
        match slot {
            Slot::Metadata => Ok(self.doc.single_calculations.get(key).map(String::as_str)),
            Slot::Chapter(section) => self
                .block(section)?
                .values
                .get(key)
                .map(|entry| Some(entry.1.as_str()))
                .ok_or_else(|| unknown_code(section, key)),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.metadata(TITLE)
    }

    pub fn set_title(&mut self, title: &str) {
        self.set_metadata(TITLE, title);
    }

    pub fn version(&self) -> Option<&str> {
        self.metadata(VERSION)
    }

    pub fn set_version(&mut self, version: &str) {
        self.set_metadata(VERSION, version);
    }

    pub fn date(&self) -> Option<&str> {
        self.metadata(DATE)
    }

    pub fn set_date(&mut self, date: &str) {
        self.set_metadata(DATE, date);
    }

    fn metadata(&self, key: &str) -> Option<&str> {
        self.lookup(Slot::Metadata, key).ok().flatten()
    }

    fn set_metadata(&mut self, key: &str, value: &str) {
        // Metadata keys are created on write, so this never fails.
        let _ = self.value_in(Slot::Metadata, key, Some(value));
    }

    /// Compact JSON representation of the report.
    pub fn to_json(&self) -> Result<String, QprfError> {
        Ok(serde_json::to_string(&self.doc)?)
    }

    /// Pretty-printed JSON representation of the report.
    pub fn pretty_json(&self) -> Result<String, QprfError> {
        Ok(serde_json::to_string_pretty(&self.doc)?)
    }

    /// Writes the pretty-printed JSON to `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), QprfError> {
        let path = path.as_ref();
        fs::write(path, self.pretty_json()?)?;
        log::info!("Saved QPRF report to {}", path.display());
        Ok(())
    }

    /// Renders the whole report through the HTML template.
    pub fn to_html(&self) -> Result<String, QprfError> {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true);
        handlebars.register_template_string("qprf", &self.html_template)?;
        Ok(handlebars.render("qprf", &self.doc)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_chapter_value() {
        let mut report = QprfReport::new().unwrap();
        assert_eq!(report.value("1.1", Some("7732-18-5")).unwrap(), "7732-18-5");
        assert_eq!(report.value("1.1", None).unwrap(), "7732-18-5");
        assert_eq!(report.chapter_value("1.1").unwrap(), "7732-18-5");
        assert_eq!(report.value("1.5 a.", None).unwrap(), "");
    }

    #[test]
    fn test_unknown_section() {
        let mut report = QprfReport::new().unwrap();
        let err = report.value("5.1", Some("x")).unwrap_err();
        assert!(matches!(err, QprfError::UnknownSection(code) if code == "5.1"));
    }

    #[test]
    fn test_unknown_chapter_code_leaves_report_unchanged() {
        let mut report = QprfReport::new().unwrap();
        let before = report.to_json().unwrap();
        let err = report.value("1.9", Some("x")).unwrap_err();
        assert!(matches!(
            err,
            QprfError::UnknownChapterCode { ref section, ref code }
                if section == "1. Substance" && code == "1.9"
        ));
        assert_eq!(report.to_json().unwrap(), before);
    }

    #[test]
    fn test_metadata_accessors() {
        let mut report = QprfReport::new().unwrap();
        assert_eq!(
            report.title(),
            Some("QSAR Prediction Reporting Format (QPRF)")
        );
        assert_eq!(report.version(), Some(""));

        report.set_title("My QPRF Report");
        report.set_version("1");
        report.set_date("2016/09/12");
        assert_eq!(report.title(), Some("My QPRF Report"));
        assert_eq!(report.version(), Some("1"));
        assert_eq!(report.date(), Some("2016/09/12"));
    }

    #[test]
    fn test_missing_metadata_is_created_on_write() {
        let mut report =
            QprfReport::from_json(r#"{"singleCalculations":{},"arrayCalculations":{}}"#).unwrap();
        assert_eq!(report.title(), None);
        assert_eq!(report.date(), None);

        report.set_title("T");
        report.set_date("2016/09/12");
        assert_eq!(report.title(), Some("T"));
        assert_eq!(
            report.to_json().unwrap(),
            r#"{"singleCalculations":{"Title":"T","Date":"2016/09/12"},"arrayCalculations":{}}"#
        );
        assert!(matches!(
            report.value("1.1", Some("x")),
            Err(QprfError::MissingSection(_))
        ));
    }

    #[test]
    fn test_chapters_in_document_order() {
        let report = QprfReport::new().unwrap();
        let codes: Vec<String> = report
            .chapters(Section::GeneralInformation)
            .unwrap()
            .into_iter()
            .map(|c| c.code)
            .collect();
        assert_eq!(codes, vec!["2.1", "2.2"]);

        let adequacy = report.chapters(Section::Adequacy).unwrap();
        assert_eq!(adequacy[3].label, "Conclusion");
    }

    #[test]
    fn test_every_template_code_is_addressable() {
        let mut report = QprfReport::new().unwrap();
        for section in Section::ALL {
            for chapter in report.chapters(section).unwrap() {
                assert_eq!(Section::for_code(&chapter.code).unwrap(), section);
                report.value(&chapter.code, Some("filled")).unwrap();
            }
        }
        assert_eq!(report.chapter_value("3.5").unwrap(), "filled");
    }

    #[test]
    fn test_pretty_json_keeps_order_and_values() {
        let mut report = QprfReport::new().unwrap();
        report.value("3.2 d.", Some("inactive")).unwrap();
        let json = report.pretty_json().unwrap();

        let first = json.find("\"1. Substance\"").unwrap();
        let last = json.find("\"4. Adequacy (Optional)\"").unwrap();
        assert!(first < last);

        let reopened = QprfReport::from_json(&json).unwrap();
        assert_eq!(reopened.chapter_value("3.2 d.").unwrap(), "inactive");
        assert_eq!(reopened.pretty_json().unwrap(), json);
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let json = r#"{"singleCalculations":{"Title":"T"},"arrayCalculations":{"1. Substance":{"values":{"1.1":["CAS number",""]},"note":"kept"}},"extra":1}"#;
        let report = QprfReport::from_json(json).unwrap();
        assert_eq!(report.to_json().unwrap(), json);
        assert!(matches!(
            report.chapters(Section::Prediction),
            Err(QprfError::MissingSection(_))
        ));
    }

    #[test]
    fn test_to_html_escapes_values() {
        let mut report = QprfReport::new().unwrap();
        report.set_title("My QPRF Report");
        report.value("1.3", Some("water <H2O>")).unwrap();
        let html = report.to_html().unwrap();
        assert!(html.contains("<h1>My QPRF Report</h1>"));
        assert!(html.contains("<h2>3. Prediction</h2>"));
        assert!(html.contains("water &lt;H2O&gt;"));
        assert!(!html.contains("<H2O>"));
    }

    #[test]
    fn test_broken_html_template() {
        let report = QprfReport::from_sources(TEMPLATE, "{{#each values}}<p>").unwrap();
        assert!(matches!(report.to_html(), Err(QprfError::Template(_))));
    }

    #[test]
    fn test_save_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qprf.json");
        let mut report = QprfReport::new().unwrap();
        report.value("1.1", Some("7732-18-5")).unwrap();
        report.save(&path).unwrap();

        let mut reopened = QprfReport::open(&path).unwrap();
        assert_eq!(reopened.value("1.1", None).unwrap(), "7732-18-5");
    }
}
