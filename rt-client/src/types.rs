use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Record types exposed by the RT REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Ticket,
    Queue,
    Catalog,
    Asset,
    User,
    Group,
    Attachment,
    CustomField,
    CustomRole,
    Transaction,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Ticket => "ticket",
            RecordType::Queue => "queue",
            RecordType::Catalog => "catalog",
            RecordType::Asset => "asset",
            RecordType::User => "user",
            RecordType::Group => "group",
            RecordType::Attachment => "attachment",
            RecordType::CustomField => "customfield",
            RecordType::CustomRole => "customrole",
            RecordType::Transaction => "transaction",
        }
    }

    /// Collection path segment, e.g. `tickets` for searches and archives.
    pub fn collection(&self) -> String {
        format!("{}s", self.as_str())
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ticket lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    New,
    Open,
    Stalled,
    Resolved,
    Rejected,
    Deleted,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::New => "new",
            TicketStatus::Open => "open",
            TicketStatus::Stalled => "stalled",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Rejected => "rejected",
            TicketStatus::Deleted => "deleted",
        }
    }

    pub fn parse(status: &str) -> Option<Self> {
        match status {
            "new" => Some(TicketStatus::New),
            "open" => Some(TicketStatus::Open),
            "stalled" => Some(TicketStatus::Stalled),
            "resolved" => Some(TicketStatus::Resolved),
            "rejected" => Some(TicketStatus::Rejected),
            "deleted" => Some(TicketStatus::Deleted),
            _ => None,
        }
    }

    /// Resolved, rejected and deleted tickets count as closed.
    pub fn is_closed(&self) -> bool {
        matches!(
            self,
            TicketStatus::Resolved | TicketStatus::Rejected | TicketStatus::Deleted
        )
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One term of a field search, e.g. `Name LIKE "Engineering"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTerm {
    pub field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    pub value: Value,
}

impl SearchTerm {
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            operator: None,
            value: value.into(),
        }
    }

    pub fn with_operator(mut self, operator: impl Into<String>) -> Self {
        self.operator = Some(operator.into());
        self
    }
}

/// Pagination envelope returned by collection endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub items: Vec<T>,
}
