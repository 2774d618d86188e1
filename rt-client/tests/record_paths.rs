use async_trait::async_trait;
use rt_client::{
    RecordManager, RecordType, RtConfig, RtError, RtResult, SearchTerm, TicketManager, Transport,
    V1Attachment, V1Response,
};
use serde_json::{json, Value};
use std::sync::Mutex;

/// Transport double that answers from a queue of canned responses and
/// records every request.
struct ScriptedTransport {
    requests: Mutex<Vec<(String, String)>>,
    responses: Mutex<Vec<Value>>,
}

impl ScriptedTransport {
    fn new(responses: Vec<Value>) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            responses: Mutex::new(responses),
        }
    }

    fn next(&self, verb: &str, path: &str) -> RtResult<Value> {
        self.requests
            .lock()
            .unwrap()
            .push((verb.to_string(), path.to_string()));
        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(RtError::NotFound {
                url: path.to_string(),
            });
        }
        Ok(responses.remove(0))
    }

    fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, path: &str) -> RtResult<Value> {
        self.next("GET", path)
    }

    async fn post(&self, path: &str, _content: &Value) -> RtResult<Value> {
        self.next("POST", path)
    }

    async fn post_plain(&self, path: &str, _body: String) -> RtResult<Value> {
        self.next("POST-PLAIN", path)
    }

    async fn put(&self, path: &str, _content: &Value) -> RtResult<Value> {
        self.next("PUT", path)
    }

    async fn delete(&self, path: &str) -> RtResult<Value> {
        self.next("DELETE", path)
    }

    async fn post_v1(
        &self,
        path: &str,
        _content: Vec<(String, String)>,
        _attachments: Vec<V1Attachment>,
    ) -> RtResult<V1Response> {
        self.next("POST-V1", path)?;
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
async fn test_ticket_lifecycle_against_scripted_transport() {
    let transport = ScriptedTransport::new(vec![
        json!({"id": "1", "type": "ticket"}),
        json!({"id": "1", "Status": "new"}),
        json!(["Ticket 1: Status changed from 'new' to 'resolved'"]),
    ]);
    let ticket = TicketManager::new(&transport);

    ticket
        .create(&json!({"Queue": "General", "Subject": "printer is on fire"}))
        .await
        .unwrap();
    let fetched = ticket.get("1").await.unwrap();
    assert_eq!(fetched["Status"], "new");
    ticket.close("1").await.unwrap();

    assert_eq!(
        transport.requests(),
        vec![
            ("POST".to_string(), "ticket".to_string()),
            ("GET".to_string(), "ticket/1".to_string()),
            ("PUT".to_string(), "ticket/1".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_full_record_types_expose_whole_surface() {
    for record_type in [
        RecordType::Queue,
        RecordType::Catalog,
        RecordType::Asset,
        RecordType::User,
    ] {
        let transport = ScriptedTransport::new(vec![json!({}), json!({}), json!({})]);
        let manager = RecordManager::new(&transport, record_type);
        manager.create(&json!({"Name": "x"})).await.unwrap();
        manager.get_all(1, 20).await.unwrap();
        manager
            .search(&[SearchTerm::new("Name", "x")], 1, 20)
            .await
            .unwrap();
        assert_eq!(transport.requests().len(), 3);
    }
}

#[tokio::test]
async fn test_limited_record_types_reject_create() {
    for record_type in [
        RecordType::Group,
        RecordType::CustomRole,
        RecordType::Attachment,
        RecordType::CustomField,
        RecordType::Transaction,
    ] {
        let transport = ScriptedTransport::new(vec![]);
        let manager = RecordManager::new(&transport, record_type);
        let err = manager.create(&json!({})).await.unwrap_err();
        assert!(
            matches!(err, RtError::Unsupported { .. }),
            "{record_type} should be limited"
        );
        assert!(transport.requests().is_empty());
    }
}

#[tokio::test]
async fn test_login_validates_config_before_connecting() {
    // No real RT host; the config error must surface before any request.
    let config = RtConfig::with_credentials("not-a-url", "user", "pass");
    let err = rt_client::RtClient::login(config).await.unwrap_err();
    assert!(matches!(err, RtError::InvalidConfig { .. }));
}
