//! Embedded template sources

/// DB-SI justification report, read from templates/dbsi_report.typ
const DBSI_REPORT_TEMPLATE: &str = include_str!("../../templates/dbsi_report.typ");

/// Get an embedded template by name
pub fn get_embedded_template(name: &str) -> Option<&'static str> {
    match name {
        "dbsi_report" => Some(DBSI_REPORT_TEMPLATE),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_template_reads_inputs() {
        let template = get_embedded_template("dbsi_report").unwrap();
        assert!(template.contains("sys.inputs"));
        assert!(template.contains("GENERAL DATA"));
        assert!(template.contains("SECTION JUSTIFICATION"));
    }

    #[test]
    fn test_unknown_template() {
        assert!(get_embedded_template("invoice").is_none());
    }
}
