//! Foreign key display resolution
//!
//! Joins over whatever collections are currently loaded. Nothing is cached;
//! callers resolve on every render so the label tracks the latest reload.

use crate::model::Pac;

/// Label shown when a reference has no loaded target
pub const MISSING: &str = "N/A";

/// Code of the PAC with id `pac_id`, or [`MISSING`]
pub fn pac_code<'a>(pac_id: &str, pacs: &'a [Pac]) -> &'a str {
    pacs.iter()
        .find(|p| p.id == pac_id)
        .map(|p| p.codigo.as_str())
        .unwrap_or(MISSING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_and_missing_ids() {
        let pacs = vec![Pac {
            id: "p1".to_string(),
            codigo: "PAC-2024-A".to_string(),
            finalizar: false,
        }];
        assert_eq!(pac_code("p1", &pacs), "PAC-2024-A");
        assert_eq!(pac_code("missing", &pacs), "N/A");
        assert_eq!(pac_code("p1", &[]), "N/A");
    }
}
