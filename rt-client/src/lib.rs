pub mod client;
pub mod config;
pub mod parser;
pub mod records;
pub mod types;

pub use client::{RtClient, RtError, RtResult, Transport, V1Attachment, V1Response};
pub use config::{RtAuth, RtConfig};
pub use records::{
    AttachmentManager, CustomFieldManager, RecordManager, TicketManager, TransactionManager,
};
pub use types::{Paginated, RecordType, SearchTerm, TicketStatus};

pub mod prelude {
    pub use crate::client::*;
    pub use crate::config::*;
    pub use crate::records::*;
    pub use crate::types::*;
}
