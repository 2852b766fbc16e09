use crate::types::FormulatorConfig;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn parse_config(json: &str) -> Result<FormulatorConfig, ParseError> {
    Ok(serde_json::from_str(json)?)
}
