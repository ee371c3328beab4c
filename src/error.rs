use qsar_qmrf::QmrfError;
use qsar_qprf::QprfError;
use thiserror::Error;

/// Errors from building, loading and rendering reports.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("QMRF error: {0}")]
    Qmrf(#[from] QmrfError),

    #[error("QPRF error: {0}")]
    Qprf(#[from] QprfError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid HTML template: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Template rendering error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Can not tell the report format of '{0}', expected a .xml or .json file")]
    UnknownFormat(String),
}
