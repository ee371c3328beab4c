use qsar_report::{Catalog, QmrfReport, QmrfError};

/// Attributes of a software catalog entry with every descriptive field set.
pub fn lazar_software() -> [(&'static str, &'static str); 4] {
    [
        ("name", "lazar"),
        ("contact", "in-silico toxicology gmbh"),
        ("url", "https://lazar.in-silico.ch"),
        ("description", "lazar toxicity predictions"),
    ]
}

pub fn author(name: &str) -> [(&'static str, String); 3] {
    [
        ("name", name.to_string()),
        ("url", "http://myauthor.dom".to_string()),
        ("email", "myauthor@myauthor.dom".to_string()),
    ]
}

/// A report filled the way a model service fills it: software, authors,
/// publications, endpoint, algorithm and descriptors, all referenced.
pub fn lazar_report() -> Result<QmrfReport, QmrfError> {
    let mut report = QmrfReport::new()?;
    report.set_value("QSAR_title", "Model for Rat Carcinogenicity")?;

    report.upsert_entry(Catalog::Software, "firstsoftware", lazar_software())?;
    report.add_reference("QSAR_software", Catalog::Software, "firstsoftware")?;

    report.set_value("qmrf_date", "12 September 2016")?;
    report.upsert_entry(Catalog::Authors, "firstauthor", author("Christoph Helma"))?;
    report.add_reference("qmrf_authors", Catalog::Authors, "firstauthor")?;
    report.upsert_entry(Catalog::Authors, "modelauthor", author("Christoph Helma"))?;
    report.add_reference("model_authors", Catalog::Authors, "modelauthor")?;

    report.upsert_entry(
        Catalog::Publications,
        "publications_catalog_1",
        [
            ("title", "Maunz et al. (2013), lazar: a modular predictive toxicology framework"),
            ("url", "http://dx.doi.org/10.3389/fphar.2013.00038"),
        ],
    )?;
    report.add_reference("references", Catalog::Publications, "publications_catalog_1")?;
    report.add_reference("bibliography", Catalog::Publications, "publications_catalog_1")?;

    report.upsert_entry(
        Catalog::Endpoints,
        "endpoints_catalog_1",
        [("name", "Carcinogenicity"), ("group", "")],
    )?;
    report.add_reference("model_endpoint", Catalog::Endpoints, "endpoints_catalog_1")?;

    report.upsert_entry(
        Catalog::Algorithms,
        "algorithms_catalog_1",
        [("definition", "modified k-nearest neighbor classification")],
    )?;
    report.add_reference("algorithm_explicit", Catalog::Algorithms, "algorithms_catalog_1")?;

    report.upsert_entry(
        Catalog::Descriptors,
        "descriptors_catalog_1",
        [
            ("description", "all statistically relevant paths"),
            ("name", "linear fragments (paths)"),
            ("publication_ref", ""),
            ("units", "true/false (i.e. present/absent)"),
        ],
    )?;
    report.add_reference("algorithms_descriptors", Catalog::Descriptors, "descriptors_catalog_1")?;

    Ok(report)
}
