//! OSiL-style XML results: `<variable name="t3" value="1"/>` elements inside
//! a `<variables>` element.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use suitemin_ir::TestId;

use crate::extract::ExtractError;
use crate::parse::indicator;

fn xml_error(err: impl std::fmt::Display) -> ExtractError {
    ExtractError::Xml {
        message: err.to_string(),
    }
}

/// `(name, value)` attributes of a `<variable>` element.
fn variable_attrs(element: &BytesStart<'_>) -> Result<(Option<String>, Option<String>), ExtractError> {
    let mut name = None;
    let mut value = None;
    for attr in element.attributes() {
        let attr = attr.map_err(xml_error)?;
        let text = attr.unescape_value().map_err(xml_error)?.into_owned();
        match attr.key.local_name().as_ref() {
            b"name" => name = Some(text),
            b"value" => value = Some(text),
            _ => {}
        }
    }
    Ok((name, value))
}

pub fn parse_osil(text: &str) -> Result<Vec<TestId>, ExtractError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut selected = Vec::new();
    let mut depth_in_variables = 0usize;
    let mut index = 0usize;
    loop {
        match reader.read_event().map_err(xml_error)? {
            Event::Start(e) if e.local_name().as_ref() == b"variables" => {
                depth_in_variables += 1;
            }
            Event::End(e) if e.local_name().as_ref() == b"variables" => {
                depth_in_variables = depth_in_variables.saturating_sub(1);
            }
            Event::Start(e) | Event::Empty(e)
                if depth_in_variables > 0 && e.local_name().as_ref() == b"variable" =>
            {
                index += 1;
                let (Some(name), Some(value)) = variable_attrs(&e)? else {
                    return Err(ExtractError::Malformed {
                        line: index,
                        message: "<variable> needs 'name' and 'value'".to_string(),
                    });
                };
                if name.starts_with('t') && indicator(&value, index)? {
                    selected.push(TestId::new(name));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_variable_values() {
        let xml = r#"<?xml version="1.0"?>
<osrl>
  <variables numberOfVariables="4">
    <variable name="t1" value="1"/>
    <variable name="t2" value="-0"/>
    <variable name="v_AB1_1_2" value="1"/>
    <variable name="t3" value="1.0"></variable>
  </variables>
</osrl>"#;
        let selected = parse_osil(xml).unwrap();
        let names: Vec<&str> = selected.iter().map(|t| t.as_str()).collect();
        assert_eq!(names, vec!["t1", "t3"]);
    }

    #[test]
    fn test_variables_outside_block_ignored() {
        let xml = r#"<osrl><variable name="t9" value="1"/><variables/></osrl>"#;
        assert!(parse_osil(xml).unwrap().is_empty());
    }

    #[test]
    fn test_fractional_value_is_malformed() {
        let xml = r#"<osrl><variables><variable name="t1" value="0.4"/></variables></osrl>"#;
        assert!(matches!(
            parse_osil(xml),
            Err(ExtractError::Malformed { line: 1, .. })
        ));
    }
}
