use crate::error::ReportError;
use qsar_qmrf::QmrfReport;
use qsar_qprf::QprfReport;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The QMRF HTML template used when none is configured.
pub const QMRF_HTML_TEMPLATE: &str = include_str!("../templates/qmrf.hbs");

/// Selects the assets reports are built from.
///
/// Every path is optional; a missing path falls back to the asset embedded
/// in the corresponding crate. Assets are read when a report is created,
/// never cached.
///
/// ```ignore
/// let config = ReportConfig::new().with_qmrf_schema("schemas/QMRF-1.3.xsd");
/// let report = config.qmrf_report()?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub qmrf_template: Option<PathBuf>,
    pub qmrf_schema: Option<PathBuf>,
    pub qmrf_html_template: Option<PathBuf>,
    pub qprf_template: Option<PathBuf>,
    pub qprf_html_template: Option<PathBuf>,
}

impl ReportConfig {
    pub fn new() -> Self {
        Default::default()
    }

    /// Reads a configuration from a JSON file. Relative asset paths are
    /// resolved against the directory of that file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        let path = path.as_ref();
        log::info!("Loading configuration from {}", path.display());
        let mut config: ReportConfig = serde_json::from_str(&read(path)?)?;
        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }
        Ok(config)
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for path in [
            &mut self.qmrf_template,
            &mut self.qmrf_schema,
            &mut self.qmrf_html_template,
            &mut self.qprf_template,
            &mut self.qprf_html_template,
        ]
        .into_iter()
        .flatten()
        {
            if path.is_relative() {
                let resolved = base.join(&*path);
                *path = resolved;
            }
        }
    }

    pub fn with_qmrf_template<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.qmrf_template = Some(path.into());
        self
    }

    pub fn with_qmrf_schema<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.qmrf_schema = Some(path.into());
        self
    }

    pub fn with_qmrf_html_template<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.qmrf_html_template = Some(path.into());
        self
    }

    pub fn with_qprf_template<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.qprf_template = Some(path.into());
        self
    }

    pub fn with_qprf_html_template<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.qprf_html_template = Some(path.into());
        self
    }

    /// A blank QMRF report from the configured template and schema.
    pub fn qmrf_report(&self) -> Result<QmrfReport, ReportError> {
        let template = asset(self.qmrf_template.as_deref(), qsar_qmrf::TEMPLATE)?;
        self.qmrf_from(&template)
    }

    /// An existing QMRF document, checked against the configured schema.
    pub fn open_qmrf<P: AsRef<Path>>(&self, path: P) -> Result<QmrfReport, ReportError> {
        let xml = read(path.as_ref())?;
        self.qmrf_from(&xml)
    }

    fn qmrf_from(&self, xml: &str) -> Result<QmrfReport, ReportError> {
        let schema = asset(self.qmrf_schema.as_deref(), qsar_qmrf::SCHEMA)?;
        Ok(QmrfReport::from_sources(xml, &schema)?)
    }

    /// A blank QPRF report from the configured template.
    pub fn qprf_report(&self) -> Result<QprfReport, ReportError> {
        let template = asset(self.qprf_template.as_deref(), qsar_qprf::TEMPLATE)?;
        self.qprf_from(&template)
    }

    /// An existing QPRF JSON report.
    pub fn open_qprf<P: AsRef<Path>>(&self, path: P) -> Result<QprfReport, ReportError> {
        let json = read(path.as_ref())?;
        self.qprf_from(&json)
    }

    fn qprf_from(&self, json: &str) -> Result<QprfReport, ReportError> {
        let html = asset(self.qprf_html_template.as_deref(), qsar_qprf::HTML_TEMPLATE)?;
        Ok(QprfReport::from_sources(json, &html)?)
    }

    /// The handlebars template QMRF reports are rendered with.
    pub fn qmrf_html_template(&self) -> Result<Cow<'static, str>, ReportError> {
        asset(self.qmrf_html_template.as_deref(), QMRF_HTML_TEMPLATE)
    }
}

fn asset(path: Option<&Path>, embedded: &'static str) -> Result<Cow<'static, str>, ReportError> {
    match path {
        Some(path) => Ok(Cow::Owned(read(path)?)),
        None => Ok(Cow::Borrowed(embedded)),
    }
}

fn read(path: &Path) -> Result<String, ReportError> {
    log::debug!("Reading {}", path.display());
    fs::read_to_string(path).map_err(|e| {
        ReportError::Io(io::Error::new(
            e.kind(),
            format!("Failed to read '{}': {}", path.display(), e),
        ))
    })
}
