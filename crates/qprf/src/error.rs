use thiserror::Error;

#[derive(Error, Debug)]
pub enum QprfError {
    #[error("Chapter code '{0}' does not belong to any section")]
    UnknownSection(String),

    #[error("Unknown chapter code '{code}' in section '{section}'")]
    UnknownChapterCode { section: String, code: String },

    #[error("Section '{0}' is missing from the report")]
    MissingSection(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid HTML template: {0}")]
    Template(#[from] handlebars::TemplateError),

    #[error("Template rendering error: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
