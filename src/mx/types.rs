use serde::Deserialize;

/// DNS record type code for MX.
pub const MX_RECORD_TYPE: u16 = 15;

/// The subset of a JSON DoH reply the verifier looks at.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct DohResponse {
    #[serde(rename = "Status", default)]
    pub status: u32,
    #[serde(rename = "Answer", default)]
    pub answer: Vec<DohAnswer>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct DohAnswer {
    #[serde(rename = "type")]
    pub record_type: u16,
}

impl DohResponse {
    pub fn has_mx(&self) -> bool {
        self.answer.iter().any(|a| a.record_type == MX_RECORD_TYPE)
    }
}
