//! End-to-end broker scenarios, one test per behavior described in the
//! interposition engine's contract.

use interposer_core::{
    Broker, BrokerMode, Cassette, CassetteStore, FileCassetteStore, Interaction, InterposerError,
    LiveResponder, Request, ResponseChunk, StoreOptions,
};

fn request(target: &str, headers: Vec<(&str, &str)>) -> Request {
    Request::new(
        "test-proto",
        "fetch",
        target,
        headers
            .into_iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect(),
        Vec::new(),
    )
    .unwrap()
}

fn recorded_chunks(data: Vec<(&str, u64)>) -> Vec<ResponseChunk> {
    data.into_iter()
        .map(|(d, s)| ResponseChunk::new(d.as_bytes().to_vec(), s))
        .collect()
}

fn drain(chunks: interposer_core::ReplayChunks) -> Vec<String> {
    chunks
        .map(|c| String::from_utf8(c.data).unwrap())
        .collect()
}

struct ScriptedResponder(Vec<ResponseChunk>);
impl LiveResponder for ScriptedResponder {
    fn respond(&self, _request: &Request) -> Result<Vec<ResponseChunk>, InterposerError> {
        Ok(self.0.clone())
    }
}

#[test]
fn scenario_hit_in_replay() {
    let interaction = Interaction::new(
        request("resource-123", vec![]),
        recorded_chunks(vec![("hello", 0), ("world", 1)]),
    )
    .unwrap();
    let mut broker = Broker::new(
        Cassette::new(vec![interaction]),
        BrokerMode::Replay,
        None,
        None,
    )
    .unwrap();

    let chunks = broker.replay(request("resource-123", vec![])).unwrap();
    assert_eq!(drain(chunks), vec!["hello", "world"]);
}

#[test]
fn scenario_miss_in_replay() {
    let interaction =
        Interaction::new(request("resource-123", vec![]), recorded_chunks(vec![("a", 0)]))
            .unwrap();
    let mut broker = Broker::new(
        Cassette::new(vec![interaction]),
        BrokerMode::Replay,
        None,
        None,
    )
    .unwrap();

    let err = broker.replay(request("resource-456", vec![])).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn scenario_header_order_sensitivity() {
    let interaction = Interaction::new(
        request("resource-123", vec![("X-First", "1"), ("X-Second", "2")]),
        vec![],
    )
    .unwrap();
    let mut broker = Broker::new(
        Cassette::new(vec![interaction]),
        BrokerMode::Replay,
        None,
        None,
    )
    .unwrap();

    let err = broker
        .replay(request(
            "resource-123",
            vec![("X-Second", "2"), ("X-First", "1")],
        ))
        .unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn scenario_first_match_among_duplicates() {
    let a = Interaction::new(request("resource-123", vec![]), recorded_chunks(vec![("A", 0)]))
        .unwrap();
    let b = Interaction::new(request("resource-123", vec![]), recorded_chunks(vec![("B", 0)]))
        .unwrap();
    let mut broker = Broker::new(Cassette::new(vec![a, b]), BrokerMode::Replay, None, None)
        .unwrap();

    let chunks = broker.replay(request("resource-123", vec![])).unwrap();
    assert_eq!(drain(chunks), vec!["A"]);
}

#[test]
fn scenario_auto_record_on_miss() {
    let responder = ScriptedResponder(recorded_chunks(vec![("live-data", 0)]));
    let mut broker = Broker::new(
        Cassette::empty(),
        BrokerMode::Auto,
        Some(Box::new(responder)),
        None,
    )
    .unwrap();

    let chunks = broker.replay(request("resource-123", vec![])).unwrap();
    assert_eq!(drain(chunks), vec!["live-data"]);
    assert_eq!(broker.cassette().len(), 1);
}

#[test]
fn scenario_record_overrides_hit() {
    let old = Interaction::new(request("resource-123", vec![]), recorded_chunks(vec![("old", 0)]))
        .unwrap();
    let responder = ScriptedResponder(recorded_chunks(vec![("fresh", 0)]));
    let mut broker = Broker::new(
        Cassette::new(vec![old]),
        BrokerMode::Record,
        Some(Box::new(responder)),
        None,
    )
    .unwrap();

    let chunks = broker.replay(request("resource-123", vec![])).unwrap();
    assert_eq!(drain(chunks), vec!["fresh"]);
    assert_eq!(broker.cassette().len(), 2);
    let fp = broker.cassette().get(0).unwrap().fingerprint();
    assert_eq!(broker.cassette().find(&fp), Some(0), "first-match still wins");
}

#[test]
fn scenario_save_failure_is_atomic() {
    use interposer_core::CassetteIoError;
    use std::io;
    use std::path::PathBuf;

    struct AlwaysFailsStore;
    impl CassetteStore for AlwaysFailsStore {
        fn load(&self) -> Result<Cassette, InterposerError> {
            Ok(Cassette::empty())
        }
        fn save(&self, _cassette: &Cassette) -> Result<(), InterposerError> {
            Err(InterposerError::cassette_save(CassetteIoError::Io {
                path: PathBuf::from("/nonexistent/cassette.json"),
                source: io::Error::new(io::ErrorKind::PermissionDenied, "disk full"),
            }))
        }
    }

    let responder = ScriptedResponder(recorded_chunks(vec![("fresh", 0)]));
    let mut broker = Broker::new(
        Cassette::empty(),
        BrokerMode::Record,
        Some(Box::new(responder)),
        Some(Box::new(AlwaysFailsStore)),
    )
    .unwrap();

    let err = broker.replay(request("resource-123", vec![])).unwrap_err();
    assert!(err.is_save_error());
    assert!(broker.cassette().is_empty(), "no chunk observable means no cassette mutation");
}

#[test]
fn scenario_create_if_missing_round_trip() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("cassette.json");

    let store = FileCassetteStore::new(
        &path,
        StoreOptions {
            create_if_missing: true,
        },
    );
    let responder = ScriptedResponder(recorded_chunks(vec![("live-data", 0)]));
    let mut broker =
        Broker::from_store(Box::new(store), BrokerMode::Auto, Some(Box::new(responder))).unwrap();
    assert!(broker.cassette().is_empty());

    broker.replay(request("resource-123", vec![])).unwrap();

    let reloaded = FileCassetteStore::strict(&path).load().unwrap();
    assert_eq!(reloaded.len(), 1);
}

#[test]
fn construction_rejects_record_and_auto_without_a_responder() {
    assert!(Broker::new(Cassette::empty(), BrokerMode::Record, None, None)
        .unwrap_err()
        .is_live_responder_required());
    assert!(Broker::new(Cassette::empty(), BrokerMode::Auto, None, None)
        .unwrap_err()
        .is_live_responder_required());
}

#[test]
fn broker_mode_parses_only_the_three_literals() {
    assert_eq!(BrokerMode::try_from("replay").unwrap(), BrokerMode::Replay);
    assert_eq!(BrokerMode::try_from("record").unwrap(), BrokerMode::Record);
    assert_eq!(BrokerMode::try_from("auto").unwrap(), BrokerMode::Auto);
    assert!(BrokerMode::try_from("fuzzy").is_err());
}
