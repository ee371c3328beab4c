use crate::report::QmrfReport;
use qsar_xsd::{IssueKind, SchemaIssue};

/// A schema finding known to be a false positive.
///
/// Matched on where it occurs and what kind of problem it is, not on the
/// message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenignIssue {
    pub element: &'static str,
    pub attribute: &'static str,
    pub type_name: &'static str,
    pub value: &'static str,
}

impl BenignIssue {
    pub fn matches(&self, issue: &SchemaIssue) -> bool {
        issue.element == self.element
            && issue.attribute.as_deref() == Some(self.attribute)
            && issue.value.as_deref() == Some(self.value)
            && matches!(&issue.kind, IssueKind::InvalidValue { type_name } if type_name == self.type_name)
    }
}

/// The schema declares `publication_ref` on algorithms and descriptors as an
/// optional IDREF, but the editor writes it as an empty string when no
/// publication is linked.
pub const BENIGN_ISSUES: [BenignIssue; 2] = [
    BenignIssue {
        element: "algorithm",
        attribute: "publication_ref",
        type_name: "xs:IDREF",
        value: "",
    },
    BenignIssue {
        element: "descriptor",
        attribute: "publication_ref",
        type_name: "xs:IDREF",
        value: "",
    },
];

impl QmrfReport {
    /// Validates the document against the QMRF schema.
    ///
    /// Returns one message per problem, in the order they were found. An
    /// empty list means the document is valid.
    pub fn validate(&self) -> Vec<String> {
        self.validate_issues()
            .into_iter()
            .map(|issue| issue.message)
            .collect()
    }

    /// Like [`QmrfReport::validate`], keeping the structured findings.
    pub fn validate_issues(&self) -> Vec<SchemaIssue> {
        let issues = self.schema.validate(&self.doc);
        let total = issues.len();
        let kept: Vec<SchemaIssue> = issues
            .into_iter()
            .filter(|issue| {
                let benign = BENIGN_ISSUES.iter().any(|b| b.matches(issue));
                if benign {
                    log::debug!("Ignoring benign schema issue: {issue}");
                }
                !benign
            })
            .collect();
        log::debug!(
            "Validation found {} issues ({} ignored)",
            kept.len(),
            total - kept.len()
        );
        kept
    }
}
