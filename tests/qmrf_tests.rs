mod common;

use common::fixtures::*;
use common::{TestResult, child_attributes, reparse};
use qsar_report::{AttributeTarget, Catalog, QmrfError, QmrfReport};

#[test]
fn test_fresh_report_validates() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let report = QmrfReport::new()?;
    assert!(report.validate().is_empty());
    Ok(())
}

#[test]
fn test_write_some_values() -> TestResult {
    let mut report = QmrfReport::new()?;
    report.set_value("QSAR_title", "My QSAR Title")?;
    report.set_value("QSAR_models", "My QSAR Model")?;
    assert_eq!(report.value("QSAR_title")?, "My QSAR Title");
    assert_eq!(report.value("QSAR_models")?, "My QSAR Model");
    assert_ne!(report.value("QSAR_title")?, "lazar");

    let xml = report.to_xml()?;
    assert_xml_contains!(xml, ">My QSAR Title</QSAR_title>");
    assert_xml_contains!(xml, ">My QSAR Model</QSAR_models>");
    Ok(())
}

#[test]
fn test_write_catalog() -> TestResult {
    let mut report = QmrfReport::new()?;
    report.upsert_entry(Catalog::Software, "firstsoftware", lazar_software())?;

    let get = |key| report.entry_attribute(Catalog::Software, "firstsoftware", key);
    assert_eq!(get("contact"), Some("in-silico toxicology gmbh"));
    assert_eq!(get("name"), Some("lazar"));
    assert_eq!(get("url"), Some("https://lazar.in-silico.ch"));
    assert_eq!(get("description"), Some("lazar toxicity predictions"));
    assert_eq!(
        report.entry_attribute(Catalog::Software, "nosoftware", "name"),
        None
    );
    Ok(())
}

#[test]
fn test_catalog_names() {
    assert!(qsar_qmrf::catalog_exists("software_catalog"));
    assert!(matches!(
        "noexist_catalog".parse::<Catalog>(),
        Err(QmrfError::UnknownCatalog(_))
    ));
}

#[test]
fn test_entries_serialize_in_insertion_order() -> TestResult {
    let mut report = QmrfReport::new()?;
    for (id, title) in [
        ("publications_catalog_1", "My Publication Title"),
        ("publications_catalog_2", "My Second Publication Title"),
    ] {
        report.upsert_entry(Catalog::Publications, id, [("title", title)])?;
    }
    let two = report.to_xml()?;
    report.upsert_entry(
        Catalog::Publications,
        "publications_catalog_3",
        [("title", "My Third Publication Title")],
    )?;
    assert_ne!(report.to_xml()?, two);

    let doc = reparse(&report)?;
    let ids: Vec<String> = child_attributes(&doc, "publications_catalog", "id")
        .into_iter()
        .map(|(_, id)| id)
        .collect();
    assert_eq!(
        ids,
        vec![
            "publications_catalog_1",
            "publications_catalog_2",
            "publications_catalog_3"
        ]
    );
    Ok(())
}

#[test]
fn test_reference_catalog_entries() -> TestResult {
    let mut report = QmrfReport::new()?;
    report.upsert_entry(Catalog::Authors, "firstauthor", author("Dr. My MyName"))?;
    report.add_reference("qmrf_authors", Catalog::Authors, "firstauthor")?;
    report.upsert_entry(Catalog::Authors, "secondauthor", author("Dr. Mysec MysecName"))?;
    report.add_reference("qmrf_authors", Catalog::Authors, "secondauthor")?;
    report.add_reference("qmrf_authors", Catalog::Authors, "firstauthor")?;

    let doc = reparse(&report)?;
    assert_eq!(
        child_attributes(&doc, "qmrf_authors", "idref"),
        vec![
            ("author_ref".to_string(), "firstauthor".to_string()),
            ("author_ref".to_string(), "secondauthor".to_string()),
        ]
    );
    assert!(report.validate().is_empty());
    Ok(())
}

#[test]
fn test_publication_end_to_end() -> TestResult {
    let mut report = QmrfReport::new()?;
    report.upsert_entry(Catalog::Publications, "pub1", [("title", "T"), ("url", "U")])?;
    report.add_reference("bibliography", Catalog::Publications, "pub1")?;

    let xml = report.to_xml()?;
    assert_xml_contains!(xml, r#"<publication id="pub1" title="T" url="U"/>"#);
    assert_xml_contains!(xml, r#"<publication_ref idref="pub1"/>"#);
    assert_eq!(xml.matches("<publication ").count(), 1);
    assert_eq!(xml.matches("<publication_ref ").count(), 1);

    let doc = reparse(&report)?;
    assert_eq!(
        child_attributes(&doc, "bibliography", "idref"),
        vec![("publication_ref".to_string(), "pub1".to_string())]
    );
    Ok(())
}

#[test]
fn test_dangling_reference() -> TestResult {
    let mut report = QmrfReport::new()?;
    let err = report
        .add_reference("bibliography", Catalog::Publications, "pub1")
        .unwrap_err();
    assert!(matches!(err, QmrfError::DanglingReference { .. }));
    assert_eq!(
        err.to_string(),
        "Catalog entry with id 'pub1' does not exist in publications_catalog"
    );
    Ok(())
}

#[test]
fn test_set_attributes() -> TestResult {
    let mut report = QmrfReport::new()?;
    report.set_attributes(
        AttributeTarget::TrainingSetData,
        [("inchi", "Yes"), ("smiles", "Yes")],
    )?;
    let xml = report.to_xml()?;
    assert_xml_contains!(
        xml,
        r#"cas="No" chemname="No" formula="No" inchi="Yes" mol="No" smiles="Yes"/>"#
    );

    report.set_attributes(
        AttributeTarget::TrainingSetData,
        [("inchi", "No"), ("smiles", "No")],
    )?;
    assert_eq!(report.to_xml()?, qsar_qmrf::TEMPLATE);
    Ok(())
}

#[test]
fn test_attribute_targets_from_names() -> TestResult {
    let mut report = QmrfReport::new()?;
    let target: AttributeTarget = "validation_set_availability".parse()?;
    report.set_attributes(target, [("answer", "Yes")])?;
    assert_eq!(report.attributes(target)?["answer"], "Yes");

    assert!(matches!(
        "QSAR_title".parse::<AttributeTarget>(),
        Err(QmrfError::UnsupportedAttributeTarget(_))
    ));
    Ok(())
}

#[test]
fn test_full_report_is_valid_and_reopens() -> TestResult {
    let _ = env_logger::builder().is_test(true).try_init();

    let report = lazar_report()?;
    assert_eq!(report.validate(), Vec::<String>::new());

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("qmrf.xml");
    report.save(&path)?;

    let mut reopened = QmrfReport::open(&path)?;
    assert_eq!(reopened.to_xml()?, report.to_xml()?);
    assert_eq!(reopened.value("QSAR_title")?, "Model for Rat Carcinogenicity");
    assert_eq!(
        reopened.references("references")?,
        vec!["publications_catalog_1"]
    );

    // Indexes are rebuilt from the loaded tree, so edits stay idempotent.
    assert!(!reopened.add_reference(
        "bibliography",
        Catalog::Publications,
        "publications_catalog_1"
    )?);
    reopened.upsert_entry(Catalog::Software, "firstsoftware", [("number", "1")])?;
    assert_eq!(reopened.catalog_entries(Catalog::Software).len(), 1);
    assert_eq!(
        reopened.entry_attribute(Catalog::Software, "firstsoftware", "name"),
        Some("lazar")
    );
    Ok(())
}

#[test]
fn test_html_in_field_values_round_trips() -> TestResult {
    let mut report = QmrfReport::new()?;
    let html = "<html><head></head><body><p>The applicability domain &amp; more</p></body></html>";
    report.set_value("app_domain_description", html)?;

    let reopened = QmrfReport::from_xml(&report.to_xml()?)?;
    assert_eq!(reopened.value("app_domain_description")?, html);
    assert!(reopened.validate().is_empty());
    Ok(())
}

#[test]
fn test_invalid_report_still_serializes() -> TestResult {
    let mut report = QmrfReport::new()?;
    report.set_attributes(AttributeTarget::DependentVarAvailability, [("answer", "All")])?;
    let problems = report.validate();
    assert_eq!(problems.len(), 1);
    assert!(problems[0].contains("dependent_var_availability"));
    assert!(report.to_xml()?.contains(r#"answer="All""#));
    Ok(())
}

#[test]
fn test_multiline_values_round_trip() -> TestResult {
    let mut report = QmrfReport::new()?;
    let description = "line one\nline two\ttab\r\nline three";
    report.upsert_entry(
        Catalog::Software,
        "firstsoftware",
        [("name", "lazar"), ("description", description)],
    )?;
    report.set_value("QSAR_models", "a\r\nb\rc")?;

    let reopened = QmrfReport::from_xml(&report.to_xml()?)?;
    assert_eq!(
        reopened.entry_attribute(Catalog::Software, "firstsoftware", "description"),
        Some(description)
    );
    assert_eq!(reopened.value("QSAR_models")?, "a\r\nb\rc");
    Ok(())
}

#[test]
fn test_doctype_survives_round_trip() -> TestResult {
    let source = qsar_qmrf::TEMPLATE.replacen(
        "\n<QMRF",
        "\n<!DOCTYPE QMRF SYSTEM \"http://ambit.acad.bg/qmrf/qmrf.dtd\">\n<QMRF",
        1,
    );
    let report = QmrfReport::from_xml(&source)?;
    assert_eq!(report.to_xml()?, source);

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("report.xml");
    report.save(&path)?;
    let reopened = QmrfReport::open(&path)?;
    assert_eq!(
        reopened.document().doctype(),
        Some("QMRF SYSTEM \"http://ambit.acad.bg/qmrf/qmrf.dtd\"")
    );
    Ok(())
}
