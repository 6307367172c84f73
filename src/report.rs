use crate::core::directives::CspDirectiveKind;
use serde::{Deserialize, Serialize};

/// Body of a `report-uri` violation report, the object under `csp-report`.
///
/// Browsers omit members freely, so everything defaults to empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CspViolationReport {
    pub document_uri: String,
    pub referrer: String,
    pub blocked_uri: String,
    pub violated_directive: String,
    pub effective_directive: String,
    pub original_policy: String,
    pub disposition: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_number: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_sample: Option<String>,
}

#[derive(Deserialize)]
struct ReportEnvelope {
    #[serde(rename = "csp-report")]
    csp_report: Option<CspViolationReport>,
}

impl CspViolationReport {
    /// Parses a `{"csp-report": {...}}` request body. `Ok(None)` means the
    /// body was JSON without a report.
    pub fn from_body(body: &[u8]) -> Result<Option<Self>, serde_json::Error> {
        let envelope: ReportEnvelope = serde_json::from_slice(body)?;
        Ok(envelope.csp_report)
    }

    #[inline]
    pub fn is_report_only(&self) -> bool {
        self.disposition == "report"
    }

    /// The source-list directive that was violated, when it is one this
    /// crate renders. Older browsers send the full directive text in
    /// `violated-directive` instead of `effective-directive`.
    pub fn directive_kind(&self) -> Option<CspDirectiveKind> {
        let name = if self.effective_directive.is_empty() {
            self.violated_directive.split_whitespace().next()?
        } else {
            self.effective_directive.as_str()
        };
        name.parse().ok()
    }
}
