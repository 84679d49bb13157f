use crate::error::{RestconfError, RestconfResult};
use crate::{YANG_DATA_JSON, YANG_DATA_XML};
use core::fmt;
use core::fmt::Display;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Xml,
    Json,
}

impl ConfigFormat {
    /// Media type used for both `Content-Type` and `Accept` when uploading.
    pub fn content_type(&self) -> &'static str {
        match self {
            ConfigFormat::Xml => YANG_DATA_XML,
            ConfigFormat::Json => YANG_DATA_JSON,
        }
    }
}

impl Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigFormat::Xml => write!(f, "xml"),
            ConfigFormat::Json => write!(f, "json"),
        }
    }
}

/// A configuration file on disk together with the format sniffed from its first byte.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    path: PathBuf,
    format: ConfigFormat,
}

impl ConfigDocument {
    pub fn open(path: &Path) -> RestconfResult<ConfigDocument> {
        let format = detect_format(path)?;
        Ok(ConfigDocument {
            path: path.to_path_buf(),
            format,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    /// JSON documents are passed through unchecked.
    pub fn validate_structure(&self) -> RestconfResult<()> {
        match self.format {
            ConfigFormat::Xml => validate_xml_structure(&self.path),
            ConfigFormat::Json => Ok(()),
        }
    }

    pub fn line_count(&self) -> RestconfResult<usize> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut lines = 0;
        for line in reader.split(b'\n') {
            line?;
            lines += 1;
        }
        Ok(lines)
    }

    pub fn size(&self) -> RestconfResult<u64> {
        Ok(fs::metadata(&self.path)?.len())
    }

    /// First `limit` lines, trailing whitespace removed.
    pub fn preview(&self, limit: usize) -> RestconfResult<Vec<String>> {
        let reader = BufReader::new(File::open(&self.path)?);
        let mut lines = Vec::with_capacity(limit);
        for line in reader.split(b'\n').take(limit) {
            let line = line?;
            lines.push(String::from_utf8_lossy(&line).trim_end().to_string());
        }
        Ok(lines)
    }

    pub fn read(&self) -> RestconfResult<Vec<u8>> {
        Ok(fs::read(&self.path)?)
    }
}

/// Sniffs the document format from the first non-whitespace byte, `<` for XML and `{`
/// for JSON. A leading UTF-8 byte order mark is ignored.
pub fn detect_format(path: &Path) -> RestconfResult<ConfigFormat> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut at_start = true;
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Err(RestconfError::UnknownFormat {
                path: path.to_path_buf(),
            });
        }
        let mut chunk = buf;
        if at_start {
            chunk = chunk.strip_prefix(UTF8_BOM).unwrap_or(chunk);
            at_start = false;
        }
        if let Some(byte) = chunk.iter().find(|b| !b.is_ascii_whitespace()) {
            return match byte {
                b'<' => Ok(ConfigFormat::Xml),
                b'{' => Ok(ConfigFormat::Json),
                _ => Err(RestconfError::UnknownFormat {
                    path: path.to_path_buf(),
                }),
            };
        }
        let consumed = buf.len();
        reader.consume(consumed);
    }
}

/// Walks the whole document and fails on the first well-formedness error: mismatched or
/// unclosed tags, invalid names, malformed or duplicated attributes, undeclared entity
/// references, missing root element or content after it.
pub fn validate_xml_structure(path: &Path) -> RestconfResult<()> {
    let mut reader = Reader::from_file(path)?;
    let mut buf = Vec::new();
    let mut open: Vec<Vec<u8>> = Vec::new();
    let mut seen_root = false;
    let mut entities = Entities::default();

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|err| RestconfError::malformed(reader.buffer_position(), err.to_string()))?;
        match event {
            Event::Eof => break,
            Event::DocType(e) => entities = Entities::declared_in(&e),
            Event::Start(e) => {
                if open.is_empty() && seen_root {
                    return Err(RestconfError::malformed(
                        position,
                        "junk after document element",
                    ));
                }
                check_element(&e, &entities, position)?;
                seen_root = true;
                open.push(e.name().as_ref().to_vec());
            }
            Event::Empty(e) => {
                if open.is_empty() && seen_root {
                    return Err(RestconfError::malformed(
                        position,
                        "junk after document element",
                    ));
                }
                check_element(&e, &entities, position)?;
                seen_root = true;
            }
            Event::End(e) => {
                if open.pop().is_none() {
                    return Err(RestconfError::malformed(
                        position,
                        format!(
                            "unexpected closing tag </{}>",
                            String::from_utf8_lossy(e.name().as_ref())
                        ),
                    ));
                }
            }
            Event::Text(e) => {
                if open.is_empty() && !e.iter().all(u8::is_ascii_whitespace) {
                    return Err(RestconfError::malformed(
                        position,
                        "text outside of the document element",
                    ));
                }
                e.unescape_with(|name| entities.resolve(name))
                    .map_err(|err| RestconfError::malformed(position, err.to_string()))?;
            }
            Event::CData(_) if open.is_empty() => {
                return Err(RestconfError::malformed(
                    position,
                    "CDATA outside of the document element",
                ));
            }
            _ => {}
        }
        buf.clear();
    }

    let position = reader.buffer_position();
    if let Some(name) = open.last() {
        return Err(RestconfError::malformed(
            position,
            format!("unclosed tag <{}>", String::from_utf8_lossy(name)),
        ));
    }
    if !seen_root {
        return Err(RestconfError::malformed(position, "no element found"));
    }
    Ok(())
}

fn check_element(e: &BytesStart, entities: &Entities, position: usize) -> RestconfResult<()> {
    let name = e.name();
    if !is_xml_name(name.as_ref()) {
        return Err(RestconfError::malformed(
            position,
            format!(
                "invalid element name '{}'",
                String::from_utf8_lossy(name.as_ref())
            ),
        ));
    }

    let mut attributes = e.attributes();
    attributes.with_checks(true);
    for attr in attributes {
        let attr = attr.map_err(|err| RestconfError::malformed(position, err.to_string()))?;
        if !is_xml_name(attr.key.as_ref()) {
            return Err(RestconfError::malformed(
                position,
                format!(
                    "invalid attribute name '{}'",
                    String::from_utf8_lossy(attr.key.as_ref())
                ),
            ));
        }
        attr.unescape_value_with(|name| entities.resolve(name))
            .map_err(|err| RestconfError::malformed(position, err.to_string()))?;
    }
    Ok(())
}

fn is_xml_name(name: &[u8]) -> bool {
    let Ok(name) = std::str::from_utf8(name) else {
        return false;
    };
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == ':' || !c.is_ascii() => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | ':') || !c.is_ascii())
}

/// Entity names a reference may use: the predefined five plus the general entities
/// declared in the internal DTD subset.
#[derive(Debug, Default)]
struct Entities {
    declared: Vec<String>,
}

impl Entities {
    const PREDEFINED: [&'static str; 5] = ["lt", "gt", "amp", "apos", "quot"];

    fn declared_in(doctype: &[u8]) -> Entities {
        let doctype = String::from_utf8_lossy(doctype);
        let declared = doctype
            .split("<!ENTITY")
            .skip(1)
            .map(str::trim_start)
            .filter(|decl| !decl.starts_with('%'))
            .filter_map(|decl| decl.split_whitespace().next())
            .map(str::to_string)
            .collect();
        Entities { declared }
    }

    // Only presence matters here, so every known name resolves to an empty value.
    fn resolve(&self, name: &str) -> Option<&'static str> {
        let known = Self::PREDEFINED.contains(&name) || self.declared.iter().any(|d| d == name);
        known.then_some("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn document(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file.flush().unwrap();
        file
    }

    const INTERFACES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<config xmlns="http://clicon.org/config">
  <interfaces xmlns="urn:ietf:params:xml:ns:yang:ietf-interfaces">
    <interface>
      <name>GigabitEthernet0/8/0</name>
      <description>uplink &amp; transit</description>
      <enabled>true</enabled>
    </interface>
  </interfaces>
</config>
"#;

    #[test]
    fn test_detect_format() {
        let xml = document(INTERFACES.as_bytes());
        assert_eq!(detect_format(xml.path()).unwrap(), ConfigFormat::Xml);

        let json = document(br#"{"ietf-interfaces:interfaces": {}}"#);
        assert_eq!(detect_format(json.path()).unwrap(), ConfigFormat::Json);

        let indented = document(b"\n\t   <config/>");
        assert_eq!(detect_format(indented.path()).unwrap(), ConfigFormat::Xml);

        let bom = document(b"\xEF\xBB\xBF{\"a\": 1}");
        assert_eq!(detect_format(bom.path()).unwrap(), ConfigFormat::Json);
    }

    #[test]
    fn test_detect_unknown_format() {
        let cases: [&[u8]; 4] = [b"interfaces:\n  - name: eth0\n", b"", b"  \n\t ", b"[1, 2]"];
        for content in cases {
            let file = document(content);
            let err = detect_format(file.path()).unwrap_err();
            assert!(
                matches!(err, RestconfError::UnknownFormat { .. }),
                "unexpected error {:?}",
                err
            );
        }
    }

    #[test]
    fn test_valid_xml_structure() {
        let file = document(INTERFACES.as_bytes());
        validate_xml_structure(file.path()).unwrap();

        let file = document(b"<!-- empty --><config/>\n");
        validate_xml_structure(file.path()).unwrap();

        let file = document(b"<config><if name=\"ge0&#47;1\" mtu='1500' xml:lang=\"en\"/></config>");
        validate_xml_structure(file.path()).unwrap();
    }

    #[test]
    fn test_internal_entities_are_accepted() {
        let file = document(
            br#"<?xml version="1.0"?>
<!DOCTYPE config [
  <!ENTITY site "lab">
  <!ENTITY % shared "ignored">
]>
<config>
  <location site="&site;">&site; &amp; core</location>
</config>
"#,
        );
        validate_xml_structure(file.path()).unwrap();
    }

    #[test]
    fn test_malformed_xml_structure() {
        let cases: [&[u8]; 12] = [
            b"<config><interface></config>",
            b"<config><interface>",
            b"<config/><config/>",
            b"<config/>trailing",
            b"<config>&undefined;</config>",
            b"<?xml version=\"1.0\"?>\n",
            b"<config a=unquoted></config>",
            b"<config a=\"1\" a=\"2\"></config>",
            b"<config a=\"&bogus;\"></config>",
            b"<config><1bad/></config>",
            b"<config><interface enabled></interface></config>",
            b"<!DOCTYPE config [<!ENTITY site \"lab\">]><config>&other;</config>",
        ];
        for content in cases {
            let file = document(content);
            let err = validate_xml_structure(file.path()).unwrap_err();
            assert!(
                matches!(err, RestconfError::MalformedXml { .. }),
                "{} => {:?}",
                String::from_utf8_lossy(content),
                err
            );
        }
    }

    #[test]
    fn test_unclosed_tag_message() {
        let file = document(b"<config>\n  <interfaces>\n");
        let err = validate_xml_structure(file.path()).unwrap_err();
        assert!(err.to_string().contains("unclosed tag <interfaces>"));
    }

    #[test]
    fn test_json_skips_structure_validation() {
        let file = document(b"{ not really json");
        let document = ConfigDocument::open(file.path()).unwrap();
        assert_eq!(document.format(), ConfigFormat::Json);
        document.validate_structure().unwrap();
    }

    #[test]
    fn test_document_statistics() {
        let file = document(INTERFACES.as_bytes());
        let document = ConfigDocument::open(file.path()).unwrap();
        assert_eq!(document.line_count().unwrap(), 10);
        assert_eq!(document.size().unwrap(), INTERFACES.len() as u64);
        assert_eq!(
            document.preview(2).unwrap(),
            vec![
                r#"<?xml version="1.0" encoding="UTF-8"?>"#.to_string(),
                r#"<config xmlns="http://clicon.org/config">"#.to_string(),
            ]
        );
        assert_eq!(document.preview(50).unwrap().len(), 10);
        assert_eq!(document.format().content_type(), "application/yang-data+xml");
    }
}
