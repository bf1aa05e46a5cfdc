//! Integration tests for the resource mappers using wiremock
//!
//! These tests drive the full mapper lifecycle - expand, API call, read-back
//! flatten - against a mocked Nebraska server, including the end-to-end
//! package/channel/group scenario.

use serde_json::json;
use wiremock::matchers::{any, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use nebraska_provider::resource::channel::{self, ChannelState};
use nebraska_provider::resource::group::{self, GroupState};
use nebraska_provider::resource::package::{self, PackageState};
use nebraska_provider::{Config, Error, ProviderClient, FLATCAR_APPLICATION_ID};

const APP: &str = FLATCAR_APPLICATION_ID;
const CREATED_TS_WIRE: &str = "2021-06-01T12:00:00Z";
const CREATED_TS_STATE: &str = "2021-06-01 12:00:00 UTC";

fn provider_for(server: &MockServer) -> ProviderClient {
    ProviderClient::new(
        &Config::default()
            .with_endpoint(&server.uri())
            .with_application_id(APP),
    )
    .expect("client should build")
}

fn package_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "type": 1,
        "version": "0.0.0",
        "url": "http://fake-address/",
        "filename": "",
        "description": "",
        "size": "",
        "hash": "",
        "created_ts": CREATED_TS_WIRE,
        "channels_blacklist": null,
        "application_id": APP,
        "flatcar_action": null,
        "arch": 1
    })
}

fn channel_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "test-terraform",
        "color": "#1458d6",
        "created_ts": CREATED_TS_WIRE,
        "application_id": APP,
        "package_id": "pkg-1",
        "arch": 1
    })
}

fn group_json(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "test-group",
        "description": "",
        "created_ts": CREATED_TS_WIRE,
        "rollout_in_progress": false,
        "application_id": APP,
        "channel_id": "chan-1",
        "policy_updates_enabled": true,
        "policy_safe_mode": true,
        "policy_office_hours": true,
        "policy_timezone": "Europe/Berlin",
        "policy_period_interval": "10 minutes",
        "policy_max_updates_per_period": 10,
        "policy_update_timeout": "35 minutes",
        "track": id
    })
}

#[tokio::test]
async fn package_channel_group_end_to_end() {
    let server = MockServer::start().await;
    let client = provider_for(&server);

    // Package: create, then the read-back issued by create itself.
    Mock::given(method("POST"))
        .and(path(format!("/api/apps/{APP}/packages")))
        .and(body_json(json!({
            "type": 1,
            "version": "0.0.0",
            "url": "http://fake-address/",
            "filename": "",
            "description": "",
            "size": "",
            "hash": "",
            "channels_blacklist": [],
            "arch": 1,
            "flatcar_action": {"sha256": ""}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(package_json("pkg-1")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/apps/{APP}/packages/pkg-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(package_json("pkg-1")))
        .expect(1)
        .mount(&server)
        .await;

    let mut pkg = PackageState {
        version: "0.0.0".to_string(),
        arch: "amd64".to_string(),
        url: "http://fake-address/".to_string(),
        ..Default::default()
    };
    package::create(&client, &mut pkg).await.expect("package create");

    assert_eq!(pkg.id, "pkg-1");
    assert_eq!(pkg.package_type, "flatcar");
    assert_eq!(pkg.arch, "amd64");
    assert_eq!(pkg.created_ts, CREATED_TS_STATE);
    assert!(pkg.flatcar_action.is_none());

    // Channel pointing at the package.
    Mock::given(method("POST"))
        .and(path(format!("/api/apps/{APP}/channels")))
        .and(body_json(json!({
            "name": "test-terraform",
            "color": "",
            "package_id": "pkg-1",
            "arch": 1
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(channel_json("chan-1")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/apps/{APP}/channels/chan-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(channel_json("chan-1")))
        .expect(1)
        .mount(&server)
        .await;

    let mut chan = ChannelState {
        name: "test-terraform".to_string(),
        arch: "amd64".to_string(),
        package_id: pkg.id.clone(),
        ..Default::default()
    };
    channel::create(&client, &mut chan).await.expect("channel create");

    assert_eq!(chan.id, "chan-1");
    assert_eq!(chan.color, "#1458d6");
    assert_eq!(chan.created_ts, CREATED_TS_STATE);
    assert_eq!(chan.package_id, "pkg-1");

    // Group serving the channel, with every policy field set.
    Mock::given(method("POST"))
        .and(path(format!("/api/apps/{APP}/groups")))
        .and(body_json(json!({
            "name": "test-group",
            "description": "",
            "channel_id": "chan-1",
            "policy_updates_enabled": true,
            "policy_safe_mode": true,
            "policy_office_hours": true,
            "policy_timezone": "Europe/Berlin",
            "policy_period_interval": "10 minutes",
            "policy_max_updates_per_period": 10,
            "policy_update_timeout": "35 minutes",
            "track": ""
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(group_json("group-1")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/apps/{APP}/groups/group-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(group_json("group-1")))
        .expect(1)
        .mount(&server)
        .await;

    let mut grp = GroupState {
        name: "test-group".to_string(),
        channel_id: chan.id.clone(),
        policy_safe_mode: true,
        policy_office_hours: true,
        policy_timezone: "Europe/Berlin".to_string(),
        policy_period_interval: "10 minutes".to_string(),
        policy_max_updates_per_period: 10,
        policy_update_timeout: "35 minutes".to_string(),
        ..Default::default()
    };
    group::create(&client, &mut grp).await.expect("group create");

    assert_eq!(grp.id, "group-1");
    assert_eq!(grp.channel_id, "chan-1");
    assert!(grp.policy_updates_enabled);
    assert!(grp.policy_safe_mode);
    assert!(grp.policy_office_hours);
    assert_eq!(grp.policy_timezone, "Europe/Berlin");
    assert_eq!(grp.policy_period_interval, "10 minutes");
    assert_eq!(grp.policy_max_updates_per_period, 10);
    assert_eq!(grp.policy_update_timeout, "35 minutes");
    // The server defaults the track to the group id.
    assert_eq!(grp.track, "group-1");
    assert!(!grp.rollout_in_progress);
}

#[tokio::test]
async fn read_of_deleted_channel_clears_identity() {
    let server = MockServer::start().await;
    let client = provider_for(&server);

    Mock::given(method("GET"))
        .and(path(format!("/api/apps/{APP}/channels/chan-gone")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut state = ChannelState {
        id: "chan-gone".to_string(),
        name: "test-terraform".to_string(),
        arch: "amd64".to_string(),
        ..Default::default()
    };
    channel::read(&client, &mut state)
        .await
        .expect("not-found read should succeed");

    assert!(state.id.is_empty());
}

#[tokio::test]
async fn channel_update_excludes_the_arch() {
    let server = MockServer::start().await;
    let client = provider_for(&server);

    // Exact body match: the update payload must not carry an arch.
    Mock::given(method("PUT"))
        .and(path(format!("/api/apps/{APP}/channels/chan-1")))
        .and(body_json(json!({
            "name": "test-terraform",
            "color": "#000000",
            "package_id": "pkg-1"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(channel_json("chan-1")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/apps/{APP}/channels/chan-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(channel_json("chan-1")))
        .expect(1)
        .mount(&server)
        .await;

    let mut state = ChannelState {
        id: "chan-1".to_string(),
        name: "test-terraform".to_string(),
        arch: "amd64".to_string(),
        color: "#000000".to_string(),
        package_id: "pkg-1".to_string(),
        ..Default::default()
    };
    channel::update(&client, &mut state).await.expect("update");

    assert_eq!(state.color, "#1458d6");
}

#[tokio::test]
async fn truncated_channel_listing_is_fatal() {
    let server = MockServer::start().await;
    let client = provider_for(&server);

    Mock::given(method("GET"))
        .and(path(format!("/api/apps/{APP}/channels")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "total_count": 3,
            "channels": [channel_json("chan-1")]
        })))
        .mount(&server)
        .await;

    let mut state = ChannelState {
        name: "test-terraform".to_string(),
        arch: "amd64".to_string(),
        ..Default::default()
    };
    let err = channel::lookup(&client, &mut state).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Truncated {
            count: 1,
            total_count: 3,
            ..
        }
    ));
    assert!(err.to_string().contains("1/3"));
}

#[tokio::test]
async fn channel_lookup_matches_name_and_arch() {
    let server = MockServer::start().await;
    let client = provider_for(&server);

    let mut amd64_channel = channel_json("chan-amd64");
    amd64_channel["arch"] = json!(1);
    let mut aarch64_channel = channel_json("chan-aarch64");
    aarch64_channel["arch"] = json!(2);

    Mock::given(method("GET"))
        .and(path(format!("/api/apps/{APP}/channels")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 2,
            "total_count": 2,
            "channels": [amd64_channel, aarch64_channel]
        })))
        .mount(&server)
        .await;

    let mut state = ChannelState {
        name: "test-terraform".to_string(),
        arch: "aarch64".to_string(),
        ..Default::default()
    };
    channel::lookup(&client, &mut state).await.expect("lookup");

    assert_eq!(state.id, "chan-aarch64");
    assert_eq!(state.package_id, "pkg-1");
}

#[tokio::test]
async fn channel_lookup_miss_is_descriptive() {
    let server = MockServer::start().await;
    let client = provider_for(&server);

    Mock::given(method("GET"))
        .and(path(format!("/api/apps/{APP}/channels")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 0,
            "total_count": 0,
            "channels": []
        })))
        .mount(&server)
        .await;

    let mut state = ChannelState {
        name: "test-terraform".to_string(),
        arch: "amd64".to_string(),
        ..Default::default()
    };
    let err = channel::lookup(&client, &mut state).await.unwrap_err();

    assert!(matches!(err, Error::LookupMiss(_)));
    assert_eq!(err.to_string(), "couldn't find channel test-terraform (amd64)");
}

#[tokio::test]
async fn group_lookup_by_name() {
    let server = MockServer::start().await;
    let client = provider_for(&server);

    Mock::given(method("GET"))
        .and(path(format!("/api/apps/{APP}/groups")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "total_count": 1,
            "groups": [group_json("group-1")]
        })))
        .mount(&server)
        .await;

    let mut state = GroupState {
        name: "test-group".to_string(),
        ..Default::default()
    };
    group::lookup(&client, &mut state).await.expect("lookup");

    assert_eq!(state.id, "group-1");
    assert_eq!(state.channel_id, "chan-1");
    assert_eq!(state.policy_period_interval, "10 minutes");
}

#[tokio::test]
async fn package_lookup_uses_the_version_filter() {
    let server = MockServer::start().await;
    let client = provider_for(&server);

    Mock::given(method("GET"))
        .and(path(format!("/api/apps/{APP}/packages")))
        .and(query_param("searchVersion", "0.0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "total_count": 1,
            "packages": [package_json("pkg-1")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut state = PackageState {
        version: "0.0.0".to_string(),
        arch: "amd64".to_string(),
        ..Default::default()
    };
    package::lookup(&client, &mut state).await.expect("lookup");

    assert_eq!(state.id, "pkg-1");
    assert_eq!(state.url, "http://fake-address/");
    assert_eq!(state.package_type, "flatcar");
}

#[tokio::test]
async fn package_blacklist_and_action_round_trip() {
    let server = MockServer::start().await;
    let client = provider_for(&server);

    let mut response = package_json("pkg-2");
    response["channels_blacklist"] = json!(["chan-a", "chan-b"]);
    response["flatcar_action"] = json!({
        "id": "action-1",
        "event": "postinstall",
        "chromeos_version": "",
        "sha256": "aGVsbG8=",
        "needs_admin": false,
        "is_delta": false,
        "disable_payload_backoff": true,
        "metadata_signature_rsa": "",
        "metadata_size": "",
        "deadline": "",
        "created_ts": CREATED_TS_WIRE
    });

    Mock::given(method("POST"))
        .and(path(format!("/api/apps/{APP}/packages")))
        .and(body_json(json!({
            "type": 1,
            "version": "0.0.0",
            "url": "http://fake-address/",
            "filename": "",
            "description": "",
            "size": "",
            "hash": "",
            "channels_blacklist": ["chan-a", "chan-b"],
            "arch": 1,
            "flatcar_action": {"sha256": "aGVsbG8="}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/apps/{APP}/packages/pkg-2")))
        .respond_with(ResponseTemplate::new(200).set_body_json(&response))
        .expect(1)
        .mount(&server)
        .await;

    let mut state = PackageState {
        version: "0.0.0".to_string(),
        arch: "amd64".to_string(),
        url: "http://fake-address/".to_string(),
        channels_blacklist: vec!["chan-a".to_string(), "chan-b".to_string()],
        flatcar_action: Some(nebraska_provider::resource::package::FlatcarActionState {
            sha256: "aGVsbG8=".to_string(),
            ..Default::default()
        }),
        ..Default::default()
    };
    package::create(&client, &mut state).await.expect("create");

    assert_eq!(state.channels_blacklist, vec!["chan-a", "chan-b"]);
    let action = state.flatcar_action.expect("action should be populated");
    assert_eq!(action.sha256, "aGVsbG8=");
    assert_eq!(action.event, "postinstall");
    assert!(action.disable_payload_backoff);
    assert_eq!(action.created_ts, CREATED_TS_STATE);
}

#[tokio::test]
async fn missing_application_id_fails_without_any_request() {
    let server = MockServer::start().await;
    let client = ProviderClient::new(&Config::default().with_endpoint(&server.uri()))
        .expect("client should build");

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut state = ChannelState {
        name: "test-terraform".to_string(),
        arch: "amd64".to_string(),
        ..Default::default()
    };
    let err = channel::create(&client, &mut state).await.unwrap_err();

    assert_eq!(err.to_string(), "application_id: required field is not set");
}

#[tokio::test]
async fn invalid_arch_fails_without_any_request() {
    let server = MockServer::start().await;
    let client = provider_for(&server);

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut state = ChannelState {
        name: "test-terraform".to_string(),
        arch: "sparc".to_string(),
        ..Default::default()
    };
    let err = channel::create(&client, &mut state).await.unwrap_err();

    assert!(matches!(err, Error::InvalidArch(_)));
}

#[tokio::test]
async fn delete_propagates_not_found() {
    let server = MockServer::start().await;
    let client = provider_for(&server);

    Mock::given(method("DELETE"))
        .and(path(format!("/api/apps/{APP}/groups/group-gone")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut state = GroupState {
        id: "group-gone".to_string(),
        name: "test-group".to_string(),
        ..Default::default()
    };
    let err = group::delete(&client, &mut state).await.unwrap_err();

    assert!(matches!(err, Error::NotFound));
}
