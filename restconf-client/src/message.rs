use crate::NETCONF_URN;
use core::fmt;
use core::fmt::Display;
use quick_xml::se::Serializer;
use serde_derive::Serialize;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Debug, Serialize)]
pub struct Source {
    #[serde(rename = "$value")]
    pub datastore: Datastore,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Datastore {
    Candidate,
    Running,
    Startup,
}

/// ietf-netconf operations invoked through `{base}/operations/...`.
#[derive(Debug)]
pub enum RpcOperation {
    Validate { source: Source },
    Commit,
    DiscardChanges,
}

impl RpcOperation {
    pub fn validate(datastore: Datastore) -> RpcOperation {
        RpcOperation::Validate {
            source: Source { datastore },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RpcOperation::Validate { .. } => "validate",
            RpcOperation::Commit => "commit",
            RpcOperation::DiscardChanges => "discard-changes",
        }
    }

    /// Resource path relative to the RESTCONF root.
    pub fn path(&self) -> String {
        format!("operations/ietf-netconf:{}", self.name())
    }
}

#[derive(Serialize)]
struct Input<'a> {
    #[serde(rename = "@xmlns")]
    xmlns: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a Source>,
}

impl Display for RpcOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use serde::Serialize;
        let mut buffer = String::with_capacity(256);
        let mut ser =
            Serializer::with_root(&mut buffer, Some(self.name())).map_err(|_| fmt::Error)?;
        ser.indent(' ', 2);
        let input = Input {
            xmlns: NETCONF_URN,
            source: match self {
                RpcOperation::Validate { source } => Some(source),
                _ => None,
            },
        };
        input.serialize(ser).map_err(|_| fmt::Error)?;
        write!(f, "{}\n{}", XML_DECLARATION, buffer)
    }
}
