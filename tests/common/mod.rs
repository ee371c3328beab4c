pub mod fixtures;

use qsar_report::QmrfReport;
use qsar_xml::XmlDocument;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Parses serialized report output back into a tree for structural checks.
pub fn reparse(report: &QmrfReport) -> Result<XmlDocument, Box<dyn std::error::Error>> {
    Ok(XmlDocument::parse(&report.to_xml()?)?)
}

/// Element names of the children of the first `parent` element, with the
/// value of `attribute` on each.
pub fn child_attributes(
    doc: &XmlDocument,
    parent: &str,
    attribute: &str,
) -> Vec<(String, String)> {
    let Some(node) = doc.find_element(parent) else {
        return Vec::new();
    };
    doc.child_elements(node)
        .map(|child| {
            (
                doc.name(child).unwrap_or_default().to_string(),
                doc.attribute(child, attribute).unwrap_or_default().to_string(),
            )
        })
        .collect()
}

/// Asserts that serialized XML contains a fragment.
#[macro_export]
macro_rules! assert_xml_contains {
    ($xml:expr, $fragment:expr) => {
        assert!(
            $xml.contains($fragment),
            "expected XML to contain {:?}\n--- XML ---\n{}",
            $fragment,
            $xml
        )
    };
}
