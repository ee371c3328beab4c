//! HTML rendering of QMRF reports.
//!
//! A report is first turned into a plain JSON view, which is what the
//! handlebars template sees:
//!
//! ```text
//! { "title", "version",
//!   "chapters": [ { "element", "chapter", "name",
//!                   "fields": [ { "element", "chapter", "name", "help", "value",
//!                                 "answers": [ { "name", "value" } ],
//!                                 "references": [ { "catalog", "idref", "label" } ] } ] } ],
//!   "catalogs": [ { "name", "entries": [ { attribute: value } ] } ] }
//! ```

use crate::error::ReportError;
use handlebars::Handlebars;
use qsar_qmrf::{Catalog, QmrfReport};
use qsar_xml::NodeId;
use serde_json::{Value, json};

/// Attributes every template node carries; anything else is an answer.
const DESCRIPTIVE_ATTRIBUTES: [&str; 3] = ["chapter", "help", "name"];

/// Entry attributes tried, in order, to label a reference.
const LABEL_ATTRIBUTES: [&str; 3] = ["name", "title", "definition"];

/// Builds the JSON view of `report` used by [`qmrf_html`].
pub fn qmrf_view(report: &QmrfReport) -> Value {
    let doc = report.document();
    let root = doc.root();

    let chapters: Vec<Value> = doc
        .find_element("QMRF_chapters")
        .map(|container| {
            doc.child_elements(container)
                .map(|chapter| {
                    let fields: Vec<Value> = doc
                        .child_elements(chapter)
                        .map(|field| field_view(report, field))
                        .collect();
                    json!({
                        "element": doc.name(chapter).unwrap_or_default(),
                        "chapter": doc.attribute(chapter, "chapter").unwrap_or_default(),
                        "name": doc.attribute(chapter, "name").unwrap_or_default(),
                        "fields": fields,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    let catalogs: Vec<Value> = Catalog::ALL
        .into_iter()
        .map(|catalog| {
            json!({
                "name": catalog.as_str(),
                "entries": report.catalog_entries(catalog),
            })
        })
        .collect();

    json!({
        "title": doc.attribute(root, "name").unwrap_or("QMRF"),
        "version": doc.attribute(root, "version").unwrap_or_default(),
        "chapters": chapters,
        "catalogs": catalogs,
    })
}

fn field_view(report: &QmrfReport, field: NodeId) -> Value {
    let doc = report.document();

    let answers: Vec<Value> = doc
        .attributes(field)
        .into_iter()
        .flatten()
        .filter(|(key, _)| !DESCRIPTIVE_ATTRIBUTES.contains(&key.as_str()))
        .map(|(key, value)| json!({ "name": key, "value": value }))
        .collect();

    let references: Vec<Value> = doc
        .child_elements(field)
        .filter_map(|reference| {
            let name = doc.name(reference)?;
            let catalog = Catalog::ALL
                .into_iter()
                .find(|c| c.reference_element() == name)?;
            let idref = doc.attribute(reference, "idref")?;
            let label = report
                .entry(catalog, idref)
                .and_then(|entry| LABEL_ATTRIBUTES.iter().find_map(|key| entry.get(*key)))
                .map(String::as_str)
                .unwrap_or(idref);
            Some(json!({
                "catalog": catalog.as_str(),
                "idref": idref,
                "label": label,
            }))
        })
        .collect();

    json!({
        "element": doc.name(field).unwrap_or_default(),
        "chapter": doc.attribute(field, "chapter").unwrap_or_default(),
        "name": doc.attribute(field, "name").unwrap_or_default(),
        "help": doc.attribute(field, "help").unwrap_or_default(),
        "value": doc.text_content(field),
        "answers": answers,
        "references": references,
    })
}

/// Renders `report` to HTML with the handlebars `template`.
pub fn qmrf_html(report: &QmrfReport, template: &str) -> Result<String, ReportError> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars.register_template_string("qmrf", template)?;
    let html = handlebars.render("qmrf", &qmrf_view(report))?;
    log::debug!("Rendered QMRF report to {} bytes of HTML", html.len());
    Ok(html)
}
