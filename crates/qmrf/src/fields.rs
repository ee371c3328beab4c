use crate::error::QmrfError;
use crate::report::QmrfReport;
use indexmap::IndexMap;
use std::fmt;
use std::str::FromStr;

/// Names that can only change through their catalog entries.
pub const PROTECTED_FIELDS: [&str; 3] = ["QSAR_software", "QSAR_Algorithm", ""];

/// The fixed descriptive attributes every template field carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    /// Chapter number, e.g. `"6.2"`.
    pub chapter: String,
    pub help: String,
    /// Human readable title.
    pub name: String,
}

/// Nodes whose attributes can be edited: the yes/no answers about training
/// and validation set availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeTarget {
    TrainingSetAvailability,
    TrainingSetData,
    TrainingSetDescriptors,
    DependentVarAvailability,
    ValidationSetAvailability,
    ValidationSetData,
    ValidationSetDescriptors,
    ValidationDependentVarAvailability,
}

impl AttributeTarget {
    pub const ALL: [AttributeTarget; 8] = [
        AttributeTarget::TrainingSetAvailability,
        AttributeTarget::TrainingSetData,
        AttributeTarget::TrainingSetDescriptors,
        AttributeTarget::DependentVarAvailability,
        AttributeTarget::ValidationSetAvailability,
        AttributeTarget::ValidationSetData,
        AttributeTarget::ValidationSetDescriptors,
        AttributeTarget::ValidationDependentVarAvailability,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AttributeTarget::TrainingSetAvailability => "training_set_availability",
            AttributeTarget::TrainingSetData => "training_set_data",
            AttributeTarget::TrainingSetDescriptors => "training_set_descriptors",
            AttributeTarget::DependentVarAvailability => "dependent_var_availability",
            AttributeTarget::ValidationSetAvailability => "validation_set_availability",
            AttributeTarget::ValidationSetData => "validation_set_data",
            AttributeTarget::ValidationSetDescriptors => "validation_set_descriptors",
            AttributeTarget::ValidationDependentVarAvailability => {
                "validation_dependent_var_availability"
            }
        }
    }
}

impl fmt::Display for AttributeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeTarget {
    type Err = QmrfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttributeTarget::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| QmrfError::UnsupportedAttributeTarget(s.to_string()))
    }
}

impl QmrfReport {
    /// Text content of the field `name`.
    pub fn value(&self, name: &str) -> Result<String, QmrfError> {
        let node = self.node(name)?;
        Ok(self.doc.text_content(node))
    }

    /// Replaces the content of the field `name` with `text`.
    ///
    /// The text is stored as character data; markup in it is escaped on
    /// output. Fields that hold other elements (chapter groups, reference
    /// lists with entries) can not be overwritten.
    pub fn set_value(&mut self, name: &str, text: &str) -> Result<(), QmrfError> {
        if PROTECTED_FIELDS.contains(&name) {
            return Err(QmrfError::ProtectedField(name.to_string()));
        }
        let node = self.node(name)?;
        if self.doc.child_elements(node).next().is_some() {
            return Err(QmrfError::StructuralField(name.to_string()));
        }
        self.doc.set_text_content(node, text);
        log::debug!("Set '{name}' ({} bytes)", text.len());
        Ok(())
    }

    /// Chapter number, help text and title of the field `name`.
    pub fn field_info(&self, name: &str) -> Result<FieldInfo, QmrfError> {
        let node = self.node(name)?;
        let get = |key: &str| self.doc.attribute(node, key).unwrap_or_default().to_string();
        Ok(FieldInfo {
            chapter: get("chapter"),
            help: get("help"),
            name: get("name"),
        })
    }

    /// Overwrites existing attributes of an availability node.
    ///
    /// Every key must already exist on the node. Nothing is written if any
    /// key is unknown.
    pub fn set_attributes<I, K, V>(
        &mut self,
        target: AttributeTarget,
        attributes: I,
    ) -> Result<(), QmrfError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let node = self.node(target.as_str())?;
        let attributes: Vec<(K, V)> = attributes.into_iter().collect();
        if let Some((key, _)) = attributes
            .iter()
            .find(|(k, _)| self.doc.attribute(node, k.as_ref()).is_none())
        {
            return Err(QmrfError::UnknownAttribute {
                node: target.to_string(),
                attribute: key.as_ref().to_string(),
            });
        }

        for (k, v) in &attributes {
            self.doc.set_attribute(node, k.as_ref(), v.as_ref());
        }
        log::debug!("Updated {} attributes of '{target}'", attributes.len());
        Ok(())
    }

    /// Snapshot of the attributes of an availability node.
    pub fn attributes(&self, target: AttributeTarget) -> Result<IndexMap<String, String>, QmrfError> {
        let node = self.node(target.as_str())?;
        Ok(self.doc.attributes(node).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn test_set_value_round_trip() {
        let mut report = QmrfReport::new().unwrap();
        report.set_value("QSAR_title", "My QSAR Title").unwrap();
        report.set_value("QSAR_models", "no related models").unwrap();
        report.set_value("qmrf_date", "2016-09-12").unwrap();
        assert_eq!(report.value("QSAR_title").unwrap(), "My QSAR Title");
        assert_eq!(report.value("QSAR_models").unwrap(), "no related models");

        report.set_value("QSAR_title", "Replaced").unwrap();
        assert_eq!(report.value("QSAR_title").unwrap(), "Replaced");
    }

    #[test]
    fn test_markup_in_values_is_kept_as_text() {
        let mut report = QmrfReport::new().unwrap();
        let text = "<b>bold</b> & <i>italic</i>";
        report.set_value("algorithm_type", text).unwrap();
        assert_eq!(report.value("algorithm_type").unwrap(), text);

        let reopened = QmrfReport::from_xml(&report.to_xml().unwrap()).unwrap();
        assert_eq!(reopened.value("algorithm_type").unwrap(), text);
    }

    #[test]
    fn test_unknown_field() {
        let mut report = QmrfReport::new().unwrap();
        assert!(matches!(
            report.value("no_such_field"),
            Err(QmrfError::UnknownField(name)) if name == "no_such_field"
        ));
        assert!(matches!(
            report.set_value("no_such_field", "x"),
            Err(QmrfError::UnknownField(_))
        ));
    }

    #[test]
    fn test_protected_fields_are_rejected() {
        let mut report = QmrfReport::new().unwrap();
        for name in PROTECTED_FIELDS {
            assert!(matches!(
                report.set_value(name, "x"),
                Err(QmrfError::ProtectedField(_))
            ));
        }
    }

    #[test]
    fn test_structural_nodes_keep_their_children() {
        let mut report = QmrfReport::new().unwrap();
        assert!(matches!(
            report.set_value("QSAR_General_information", "x"),
            Err(QmrfError::StructuralField(_))
        ));

        report
            .upsert_entry(Catalog::Publications, "pub1", [("title", "T")])
            .unwrap();
        report
            .add_reference("bibliography", Catalog::Publications, "pub1")
            .unwrap();
        assert!(matches!(
            report.set_value("bibliography", "x"),
            Err(QmrfError::StructuralField(_))
        ));
        assert_eq!(report.references("bibliography").unwrap(), vec!["pub1"]);
    }

    #[test]
    fn test_field_info() {
        let report = QmrfReport::new().unwrap();
        let info = report.field_info("training_set_data").unwrap();
        assert_eq!(info.chapter, "6.2");
        assert_eq!(info.name, "Available information for the training set");
    }

    #[test]
    fn test_set_attributes_changes_only_listed_keys() {
        let mut report = QmrfReport::new().unwrap();
        report
            .set_attributes(
                AttributeTarget::TrainingSetData,
                [("inchi", "Yes"), ("smiles", "Yes")],
            )
            .unwrap();

        let attributes = report.attributes(AttributeTarget::TrainingSetData).unwrap();
        assert_eq!(attributes["inchi"], "Yes");
        assert_eq!(attributes["smiles"], "Yes");
        assert_eq!(attributes["cas"], "No");
        assert_eq!(attributes["mol"], "No");
        assert_eq!(attributes["chapter"], "6.2");
    }

    #[test]
    fn test_set_attributes_rejects_unknown_keys_atomically() {
        let mut report = QmrfReport::new().unwrap();
        let err = report
            .set_attributes(
                AttributeTarget::TrainingSetData,
                [("inchi", "Yes"), ("colour", "blue")],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            QmrfError::UnknownAttribute { ref attribute, .. } if attribute == "colour"
        ));
        let attributes = report.attributes(AttributeTarget::TrainingSetData).unwrap();
        assert_eq!(attributes["inchi"], "No");
        assert!(!attributes.contains_key("colour"));
    }

    #[test]
    fn test_attribute_targets_are_a_closed_set() {
        assert_eq!(
            "validation_set_data".parse::<AttributeTarget>().unwrap(),
            AttributeTarget::ValidationSetData
        );
        assert!(matches!(
            "QSAR_title".parse::<AttributeTarget>(),
            Err(QmrfError::UnsupportedAttributeTarget(_))
        ));

        let report = QmrfReport::new().unwrap();
        for target in AttributeTarget::ALL {
            assert!(report.attributes(target).is_ok(), "{target}");
        }
    }
}
