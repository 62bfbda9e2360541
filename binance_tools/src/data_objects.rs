use serde_json::Value;

/// The known shapes of a pay-transactions response.
///
/// The endpoint has returned its record array under several different keys across API revisions,
/// so the envelope is modelled explicitly rather than with ad hoc key probing. Precedence when
/// classifying: `data.list`, then `list`, then `data`, then an explicit `success: false`
/// rejection. Anything else is `Unrecognized` and treated as an empty (but successful) page.
#[derive(Debug, Clone, PartialEq)]
pub enum PayHistoryEnvelope {
    /// `{ "data": { "list": [...] } }`
    DataList(Vec<Value>),
    /// `{ "list": [...] }`
    List(Vec<Value>),
    /// `{ "data": [...] }`
    Data(Vec<Value>),
    /// `{ "success": false, ... }` — the API explicitly refused the request.
    Rejected(Value),
    /// None of the known shapes. The raw body is kept for diagnostics.
    Unrecognized(Value),
}

impl PayHistoryEnvelope {
    pub fn from_value(body: Value) -> Self {
        if let Some(list) = body.pointer("/data/list").and_then(Value::as_array) {
            return Self::DataList(list.clone());
        }
        if let Some(list) = body.get("list").and_then(Value::as_array) {
            return Self::List(list.clone());
        }
        if let Some(list) = body.get("data").and_then(Value::as_array) {
            return Self::Data(list.clone());
        }
        if body.get("success").and_then(Value::as_bool) == Some(false) {
            return Self::Rejected(body);
        }
        Self::Unrecognized(body)
    }

    /// The records carried by this envelope, if it represents a successful response.
    pub fn records(self) -> Option<Vec<Value>> {
        match self {
            Self::DataList(records) | Self::List(records) | Self::Data(records) => Some(records),
            Self::Rejected(_) => None,
            Self::Unrecognized(_) => Some(Vec::new()),
        }
    }
}
