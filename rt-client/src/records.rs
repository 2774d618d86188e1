use crate::client::{RtError, RtResult, Transport, V1Attachment, V1Response};
use crate::types::{RecordType, SearchTerm, TicketStatus};
use serde_json::{json, Map, Value};
use tracing::debug;

/// How much of the generic CRUD surface the REST 2.0 API exposes for a
/// record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Support {
    Full,
    Limited,
}

fn support_for(record_type: RecordType) -> Support {
    match record_type {
        RecordType::Ticket
        | RecordType::Queue
        | RecordType::Catalog
        | RecordType::Asset
        | RecordType::User => Support::Full,
        RecordType::Group
        | RecordType::Attachment
        | RecordType::CustomField
        | RecordType::CustomRole
        | RecordType::Transaction => Support::Limited,
    }
}

/// Generic manager for one record type: CRUD, archive retrieval, field
/// search and history, with paths built from the record type. Operations
/// the API does not expose for limited record types return
/// [`RtError::Unsupported`].
pub struct RecordManager<'a> {
    transport: &'a dyn Transport,
    record_type: RecordType,
    support: Support,
}

impl<'a> RecordManager<'a> {
    pub fn new(transport: &'a dyn Transport, record_type: RecordType) -> Self {
        Self {
            transport,
            record_type,
            support: support_for(record_type),
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    fn ensure_supported(&self, operation: &str) -> RtResult<()> {
        match self.support {
            Support::Full => Ok(()),
            Support::Limited => Err(RtError::Unsupported {
                operation: operation.to_string(),
                record_type: self.record_type,
            }),
        }
    }

    pub async fn create(&self, attrs: &Value) -> RtResult<Value> {
        self.ensure_supported("Create")?;
        debug!(record_type = %self.record_type, "creating record");
        self.transport.post(self.record_type.as_str(), attrs).await
    }

    /// Record creation with files attached; routed through the REST 1.0
    /// API, which is the only one that accepts attachments.
    pub async fn create_with_attachments(
        &self,
        attrs: &Value,
        attachments: Vec<V1Attachment>,
    ) -> RtResult<V1Response> {
        self.ensure_supported("Create")?;
        self.transport
            .post_v1(
                &format!("{}/new", self.record_type),
                value_to_v1_content(attrs),
                attachments,
            )
            .await
    }

    pub async fn get(&self, record_id: &str) -> RtResult<Value> {
        self.transport
            .get(&format!("{}/{}", self.record_type, record_id))
            .await
    }

    /// Paginated retrieval of every record of this type.
    pub async fn get_all(&self, page: u64, per_page: u64) -> RtResult<Value> {
        self.ensure_supported("Get all")?;
        self.transport
            .get(&format!(
                "{}/all?page={};per_page={}",
                self.record_type.collection(),
                page,
                per_page
            ))
            .await
    }

    pub async fn update(&self, record_id: &str, attrs: &Value) -> RtResult<Value> {
        self.ensure_supported("Update")?;
        self.transport
            .put(&format!("{}/{}", self.record_type, record_id), attrs)
            .await
    }

    /// Record update with files attached (REST 1.0, as for creation).
    pub async fn update_with_attachments(
        &self,
        record_id: &str,
        attrs: &Value,
        attachments: Vec<V1Attachment>,
    ) -> RtResult<V1Response> {
        self.ensure_supported("Update")?;
        self.transport
            .post_v1(
                &format!("{}/{}/edit", self.record_type, record_id),
                value_to_v1_content(attrs),
                attachments,
            )
            .await
    }

    pub async fn delete(&self, record_id: &str) -> RtResult<Value> {
        self.ensure_supported("Delete")?;
        self.transport
            .delete(&format!("{}/{}", self.record_type, record_id))
            .await
    }

    /// Field search. Pagination is appended as extra terms, as the API
    /// expects.
    pub async fn search(
        &self,
        terms: &[SearchTerm],
        page: u64,
        per_page: u64,
    ) -> RtResult<Value> {
        let mut terms: Vec<Value> = terms
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?;
        terms.push(json!({"field": "page", "value": page}));
        terms.push(json!({"field": "per_page", "value": per_page}));
        self.transport
            .post(&self.record_type.collection(), &Value::Array(terms))
            .await
    }

    pub async fn history(&self, record_id: &str, page: u64, per_page: u64) -> RtResult<Value> {
        self.ensure_supported("History")?;
        self.transport
            .get(&format!(
                "{}/{}/history?page={};per_page={}",
                self.record_type, record_id, page, per_page
            ))
            .await
    }
}

/// Flattens a JSON object into v1 `Key: value` content pairs, skipping
/// nulls.
fn value_to_v1_content(attrs: &Value) -> Vec<(String, String)> {
    let Some(map) = attrs.as_object() else {
        return Vec::new();
    };
    map.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let rendered = match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (k.clone(), rendered)
        })
        .collect()
}

/// Ticket manager: the generic surface minus archive retrieval, plus bulk
/// operations, correspondence and status transitions.
pub struct TicketManager<'a> {
    inner: RecordManager<'a>,
}

impl<'a> TicketManager<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self {
            inner: RecordManager::new(transport, RecordType::Ticket),
        }
    }

    pub async fn create(&self, attrs: &Value) -> RtResult<Value> {
        self.inner.create(attrs).await
    }

    pub async fn create_with_attachments(
        &self,
        attrs: &Value,
        attachments: Vec<V1Attachment>,
    ) -> RtResult<V1Response> {
        self.inner.create_with_attachments(attrs, attachments).await
    }

    pub async fn get(&self, ticket_id: &str) -> RtResult<Value> {
        self.inner.get(ticket_id).await
    }

    /// The API cannot enumerate all tickets; use [`Self::search`].
    pub async fn get_all(&self, _page: u64, _per_page: u64) -> RtResult<Value> {
        Err(RtError::Unsupported {
            operation: "Get all".to_string(),
            record_type: RecordType::Ticket,
        })
    }

    pub async fn update(&self, ticket_id: &str, attrs: &Value) -> RtResult<Value> {
        self.inner.update(ticket_id, attrs).await
    }

    pub async fn delete(&self, ticket_id: &str) -> RtResult<Value> {
        self.inner.delete(ticket_id).await
    }

    pub async fn history(&self, ticket_id: &str, page: u64, per_page: u64) -> RtResult<Value> {
        self.inner.history(ticket_id, page, per_page).await
    }

    pub async fn bulk_create(&self, data: &Value) -> RtResult<Value> {
        self.inner.transport.post("tickets/bulk", data).await
    }

    pub async fn bulk_update(&self, data: &Value) -> RtResult<Value> {
        self.inner.transport.put("tickets/bulk", data).await
    }

    /// Reply to a ticket, including the email update to correspondents.
    /// `attrs` carries `Subject`, `Content` and optional `Cc`/`Bcc`.
    pub async fn reply(&self, ticket_id: &str, attrs: &Value) -> RtResult<Value> {
        let mut content = Map::new();
        content.insert("Action".to_string(), json!("Correspond"));
        content.insert("ContentType".to_string(), json!("text/plain"));
        if let Some(map) = attrs.as_object() {
            for (k, v) in map {
                content.insert(k.clone(), v.clone());
            }
        }
        self.inner
            .transport
            .post(
                &format!("ticket/{ticket_id}/correspond"),
                &Value::Object(content),
            )
            .await
    }

    /// Reply with files attached (REST 1.0).
    pub async fn reply_with_attachments(
        &self,
        ticket_id: &str,
        attrs: &Value,
        attachments: Vec<V1Attachment>,
    ) -> RtResult<V1Response> {
        let mut content = vec![
            ("id".to_string(), ticket_id.to_string()),
            ("Action".to_string(), "correspond".to_string()),
        ];
        for (key, field) in [("Subject", "Subject"), ("Text", "Content"), ("Cc", "Cc"), ("Bcc", "Bcc")]
        {
            if let Some(value) = attrs.get(field).and_then(Value::as_str) {
                content.push((key.to_string(), value.to_string()));
            }
        }
        self.inner
            .transport
            .post_v1(&format!("ticket/{ticket_id}/comment"), content, attachments)
            .await
    }

    /// Adds a comment to an existing ticket. The comment endpoint wants a
    /// `text/plain` body rather than JSON.
    pub async fn comment(&self, ticket_id: &str, comment: &str) -> RtResult<Value> {
        self.inner
            .transport
            .post_plain(&format!("ticket/{ticket_id}/comment"), comment.to_string())
            .await
    }

    /// Comment with files attached (REST 1.0).
    pub async fn comment_with_attachments(
        &self,
        ticket_id: &str,
        comment: &str,
        attachments: Vec<V1Attachment>,
    ) -> RtResult<V1Response> {
        let content = vec![
            ("id".to_string(), ticket_id.to_string()),
            ("Action".to_string(), "comment".to_string()),
            ("Text".to_string(), comment.to_string()),
        ];
        self.inner
            .transport
            .post_v1(&format!("ticket/{ticket_id}/comment"), content, attachments)
            .await
    }

    /// "Closes" a ticket; RT only has resolved and rejected terminal
    /// states, so this resolves it.
    pub async fn close(&self, ticket_id: &str) -> RtResult<Value> {
        self.update(ticket_id, &json!({"Status": "resolved"})).await
    }

    pub async fn reopen(&self, ticket_id: &str) -> RtResult<Value> {
        self.update(ticket_id, &json!({"Status": "open"})).await
    }

    pub async fn change_status(&self, ticket_id: &str, new_status: &str) -> RtResult<Value> {
        let Some(status) = TicketStatus::parse(new_status) else {
            return Err(RtError::InvalidStatus {
                status: new_status.to_string(),
            });
        };
        self.update(ticket_id, &json!({"Status": status.as_str()}))
            .await
    }

    /// TicketSQL search, e.g.
    /// `(Status = "new" OR Status = "open") AND Queue = "General"`.
    /// `simple_search` switches to the simple query syntax instead.
    pub async fn search(
        &self,
        query: &str,
        simple_search: bool,
        page: u64,
        per_page: u64,
    ) -> RtResult<Value> {
        self.inner
            .transport
            .post(
                "tickets",
                &json!({
                    "query": query,
                    "simple": if simple_search { 1 } else { 0 },
                    "page": page,
                    "per_page": per_page,
                }),
            )
            .await
    }
}

/// Transaction manager: retrieval plus the attachment listing endpoint.
pub struct TransactionManager<'a> {
    inner: RecordManager<'a>,
}

impl<'a> TransactionManager<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self {
            inner: RecordManager::new(transport, RecordType::Transaction),
        }
    }

    pub async fn get(&self, transaction_id: &str) -> RtResult<Value> {
        self.inner.get(transaction_id).await
    }

    pub async fn attachments(
        &self,
        transaction_id: &str,
        page: u64,
        per_page: u64,
    ) -> RtResult<Value> {
        self.inner
            .transport
            .get(&format!(
                "transaction/{transaction_id}/attachments?page={page};per_page={per_page}"
            ))
            .await
    }
}

/// Attachment manager: retrieval plus direct file links.
pub struct AttachmentManager<'a> {
    inner: RecordManager<'a>,
}

impl<'a> AttachmentManager<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self {
            inner: RecordManager::new(transport, RecordType::Attachment),
        }
    }

    pub async fn get(&self, attachment_id: &str) -> RtResult<Value> {
        self.inner.get(attachment_id).await
    }

    /// Direct link to the attachment file. When the owning ticket is not
    /// given, it is resolved through the attachment's transaction.
    pub async fn file_url(
        &self,
        attachment_id: &str,
        ticket_id: Option<&str>,
    ) -> RtResult<String> {
        let ticket_id = match ticket_id {
            Some(id) => id.to_string(),
            None => {
                let attachment = self.get(attachment_id).await?;
                let transaction_id = attachment["TransactionId"]["id"]
                    .as_str()
                    .map(str::to_string)
                    .or_else(|| attachment["TransactionId"]["id"].as_u64().map(|v| v.to_string()))
                    .ok_or_else(|| RtError::MalformedResponse {
                        message: "attachment has no TransactionId".to_string(),
                    })?;
                let transaction = self
                    .inner
                    .transport
                    .get(&format!("transaction/{transaction_id}"))
                    .await?;
                transaction["Object"]["id"]
                    .as_str()
                    .map(str::to_string)
                    .or_else(|| transaction["Object"]["id"].as_u64().map(|v| v.to_string()))
                    .ok_or_else(|| RtError::MalformedResponse {
                        message: "transaction has no Object id".to_string(),
                    })?
            }
        };
        Ok(format!(
            "{}Ticket/Attachment/{}/{}",
            self.inner.transport.base_host(),
            ticket_id,
            attachment_id
        ))
    }
}

/// Custom field manager: retrieval plus name lookup.
pub struct CustomFieldManager<'a> {
    inner: RecordManager<'a>,
}

impl<'a> CustomFieldManager<'a> {
    pub fn new(transport: &'a dyn Transport) -> Self {
        Self {
            inner: RecordManager::new(transport, RecordType::CustomField),
        }
    }

    pub async fn get(&self, customfield_id: &str) -> RtResult<Value> {
        self.inner.get(customfield_id).await
    }

    /// Looks a custom field up by name; `None` when nothing matches.
    pub async fn find_id(&self, customfield_name: &str) -> RtResult<Option<Value>> {
        let result = self
            .inner
            .search(&[SearchTerm::new("Name", customfield_name)], 1, 1)
            .await?;
        if result["count"].as_u64().unwrap_or(0) == 0 {
            return Ok(None);
        }
        Ok(result["items"].as_array().and_then(|items| items.first().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{RtError, Transport};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records every call made through the transport and answers with a
    /// canned value.
    struct MockTransport {
        calls: Mutex<Vec<(String, String, Option<Value>)>>,
        response: Value,
    }

    impl MockTransport {
        fn new(response: Value) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                response,
            }
        }

        fn record(&self, verb: &str, path: &str, content: Option<Value>) {
            self.calls
                .lock()
                .unwrap()
                .push((verb.to_string(), path.to_string(), content));
        }

        fn calls(&self) -> Vec<(String, String, Option<Value>)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn get(&self, path: &str) -> RtResult<Value> {
            self.record("GET", path, None);
            Ok(self.response.clone())
        }

        async fn post(&self, path: &str, content: &Value) -> RtResult<Value> {
            self.record("POST", path, Some(content.clone()));
            Ok(self.response.clone())
        }

        async fn post_plain(&self, path: &str, body: String) -> RtResult<Value> {
            self.record("POST-PLAIN", path, Some(Value::String(body)));
            Ok(self.response.clone())
        }

        async fn put(&self, path: &str, content: &Value) -> RtResult<Value> {
            self.record("PUT", path, Some(content.clone()));
            Ok(self.response.clone())
        }

        async fn delete(&self, path: &str) -> RtResult<Value> {
            self.record("DELETE", path, None);
            Ok(self.response.clone())
        }

        async fn post_v1(
            &self,
            path: &str,
            content: Vec<(String, String)>,
            _attachments: Vec<V1Attachment>,
        ) -> RtResult<V1Response> {
            self.record("POST-V1", path, Some(json!(content)));
            Ok(V1Response {
                status: Some(200),
                sections: vec![],
                raw: "RT/4.4.4 200 Ok\n".to_string(),
            })
        }

        fn base_host(&self) -> &str {
            "https://rt.host.com/"
        }
    }

    #[tokio::test]
    async fn test_generic_crud_paths() {
        let mock = MockTransport::new(json!({"id": "7"}));
        let queue = RecordManager::new(&mock, RecordType::Queue);

        queue.create(&json!({"Name": "General"})).await.unwrap();
        queue.get("7").await.unwrap();
        queue.get_all(1, 20).await.unwrap();
        queue.update("7", &json!({"Name": "Support"})).await.unwrap();
        queue.delete("7").await.unwrap();
        queue.history("7", 2, 50).await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].0, "POST");
        assert_eq!(calls[0].1, "queue");
        assert_eq!(calls[1], ("GET".to_string(), "queue/7".to_string(), None));
        assert_eq!(calls[2].1, "queues/all?page=1;per_page=20");
        assert_eq!(calls[3].0, "PUT");
        assert_eq!(calls[3].1, "queue/7");
        assert_eq!(calls[4], ("DELETE".to_string(), "queue/7".to_string(), None));
        assert_eq!(calls[5].1, "queue/7/history?page=2;per_page=50");
    }

    #[tokio::test]
    async fn test_limited_record_types_reject_unsupported_operations() {
        let mock = MockTransport::new(json!({}));
        let group = RecordManager::new(&mock, RecordType::Group);

        for err in [
            group.create(&json!({})).await.unwrap_err(),
            group.get_all(1, 20).await.unwrap_err(),
            group.update("1", &json!({})).await.unwrap_err(),
            group.delete("1").await.unwrap_err(),
            group.history("1", 1, 20).await.unwrap_err(),
        ] {
            assert!(matches!(err, RtError::Unsupported { .. }));
        }
        // Nothing reached the wire.
        assert!(mock.calls().is_empty());

        // Retrieval and search stay available.
        group.get("1").await.unwrap();
        group.search(&[SearchTerm::new("Name", "staff")], 1, 20).await.unwrap();
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_search_appends_pagination_terms() {
        let mock = MockTransport::new(json!({}));
        let user = RecordManager::new(&mock, RecordType::User);
        user.search(
            &[SearchTerm::new("Name", "Engineering").with_operator("LIKE")],
            2,
            50,
        )
        .await
        .unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].1, "users");
        let terms = calls[0].2.as_ref().unwrap().as_array().unwrap().clone();
        assert_eq!(
            terms[0],
            json!({"field": "Name", "operator": "LIKE", "value": "Engineering"})
        );
        assert_eq!(terms[1], json!({"field": "page", "value": 2}));
        assert_eq!(terms[2], json!({"field": "per_page", "value": 50}));
    }

    #[tokio::test]
    async fn test_ticket_get_all_unsupported() {
        let mock = MockTransport::new(json!({}));
        let ticket = TicketManager::new(&mock);
        let err = ticket.get_all(1, 20).await.unwrap_err();
        assert!(matches!(
            err,
            RtError::Unsupported {
                record_type: RecordType::Ticket,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_ticket_bulk_and_correspondence() {
        let mock = MockTransport::new(json!({}));
        let ticket = TicketManager::new(&mock);

        ticket.bulk_create(&json!([{"Queue": "General"}])).await.unwrap();
        ticket.bulk_update(&json!([{"id": "1"}])).await.unwrap();
        ticket
            .reply("42", &json!({"Subject": "Re: fire", "Content": "handled"}))
            .await
            .unwrap();
        ticket.comment("42", "looking into it").await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].1, "tickets/bulk");
        assert_eq!(calls[1].0, "PUT");
        assert_eq!(calls[2].1, "ticket/42/correspond");
        let reply_body = calls[2].2.as_ref().unwrap();
        assert_eq!(reply_body["Action"], "Correspond");
        assert_eq!(reply_body["ContentType"], "text/plain");
        assert_eq!(reply_body["Subject"], "Re: fire");
        assert_eq!(
            calls[3],
            (
                "POST-PLAIN".to_string(),
                "ticket/42/comment".to_string(),
                Some(Value::String("looking into it".to_string()))
            )
        );
    }

    #[tokio::test]
    async fn test_ticket_status_transitions() {
        let mock = MockTransport::new(json!({}));
        let ticket = TicketManager::new(&mock);

        ticket.close("1").await.unwrap();
        ticket.reopen("1").await.unwrap();
        ticket.change_status("1", "stalled").await.unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].2, Some(json!({"Status": "resolved"})));
        assert_eq!(calls[1].2, Some(json!({"Status": "open"})));
        assert_eq!(calls[2].2, Some(json!({"Status": "stalled"})));

        let err = ticket.change_status("1", "blocked").await.unwrap_err();
        assert!(matches!(err, RtError::InvalidStatus { .. }));
        // The invalid transition never reached the wire.
        assert_eq!(mock.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_ticketsql_search_payload() {
        let mock = MockTransport::new(json!({}));
        let ticket = TicketManager::new(&mock);
        ticket
            .search(r#"Status = "new" AND Queue = "General""#, false, 1, 20)
            .await
            .unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].1, "tickets");
        let body = calls[0].2.as_ref().unwrap();
        assert_eq!(body["query"], r#"Status = "new" AND Queue = "General""#);
        assert_eq!(body["simple"], 0);
        assert_eq!(body["page"], 1);
        assert_eq!(body["per_page"], 20);
    }

    #[tokio::test]
    async fn test_reply_with_attachments_goes_through_v1() {
        let mock = MockTransport::new(json!({}));
        let ticket = TicketManager::new(&mock);
        ticket
            .reply_with_attachments(
                "42",
                &json!({"Subject": "logs", "Content": "see attached"}),
                vec![V1Attachment::new("log.txt", b"boom".to_vec())],
            )
            .await
            .unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].0, "POST-V1");
        assert_eq!(calls[0].1, "ticket/42/comment");
        let content = calls[0].2.as_ref().unwrap();
        assert_eq!(content[0], json!(["id", "42"]));
        assert_eq!(content[1], json!(["Action", "correspond"]));
    }

    #[tokio::test]
    async fn test_transaction_attachments_path() {
        let mock = MockTransport::new(json!({}));
        let transaction = TransactionManager::new(&mock);
        transaction.attachments("99", 1, 20).await.unwrap();
        assert_eq!(
            mock.calls()[0].1,
            "transaction/99/attachments?page=1;per_page=20"
        );
    }

    #[tokio::test]
    async fn test_attachment_file_url_with_known_ticket() {
        let mock = MockTransport::new(json!({}));
        let attachment = AttachmentManager::new(&mock);
        let url = attachment.file_url("17", Some("42")).await.unwrap();
        assert_eq!(url, "https://rt.host.com/Ticket/Attachment/42/17");
        // No lookups needed when the ticket is supplied.
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_attachment_file_url_resolves_ticket_via_transaction() {
        let mock = MockTransport::new(json!({
            "TransactionId": {"id": "99"},
            "Object": {"id": "42"},
        }));
        let attachment = AttachmentManager::new(&mock);
        let url = attachment.file_url("17", None).await.unwrap();
        assert_eq!(url, "https://rt.host.com/Ticket/Attachment/42/17");

        let calls = mock.calls();
        assert_eq!(calls[0].1, "attachment/17");
        assert_eq!(calls[1].1, "transaction/99");
    }

    #[tokio::test]
    async fn test_custom_field_find_id() {
        let found = MockTransport::new(json!({
            "count": 1,
            "items": [{"id": "31", "Name": "Severity"}],
        }));
        let manager = CustomFieldManager::new(&found);
        let item = manager.find_id("Severity").await.unwrap().unwrap();
        assert_eq!(item["id"], "31");
        assert_eq!(found.calls()[0].1, "customfields");

        let empty = MockTransport::new(json!({"count": 0, "items": []}));
        let manager = CustomFieldManager::new(&empty);
        assert!(manager.find_id("Missing").await.unwrap().is_none());
    }

    #[test]
    fn test_value_to_v1_content_skips_nulls() {
        let attrs = json!({
            "Subject": "fire",
            "Cc": null,
            "Priority": 10,
        });
        let content = value_to_v1_content(&attrs);
        assert!(content.iter().any(|(k, v)| k == "Subject" && v == "fire"));
        assert!(content.iter().any(|(k, v)| k == "Priority" && v == "10"));
        assert!(!content.iter().any(|(k, _)| k == "Cc"));
    }
}
