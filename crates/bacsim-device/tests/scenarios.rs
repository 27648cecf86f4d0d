use bacsim_core::services::{ConfirmedService, ReadPropertyRequest, WritePropertyRequest};
use bacsim_core::types::{ErrorClass, ErrorCode, ObjectId, ObjectType, PropertyId, PropertyValue};
use bacsim_core::{InboundRequest, RequesterAddress, Response, ServiceRequest};
use bacsim_device::{
    Catalogue, FeedRelay, SensorClass, SharedFeed, Simulator, SimulatorConfig, SourceConfig,
    SyntheticDrift, ValueSource,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn ai(instance: u32) -> ObjectId {
    ObjectId::new(ObjectType::AnalogInput, instance)
}

fn request(service: ServiceRequest) -> InboundRequest {
    InboundRequest::new(RequesterAddress::localhost(47808), service)
}

fn read(object_id: ObjectId, property_id: PropertyId) -> InboundRequest {
    request(ServiceRequest::ReadProperty(ReadPropertyRequest {
        object_id,
        property_id,
        array_index: None,
    }))
}

fn seeded(seed: u64) -> Simulator {
    let mut config = SimulatorConfig::default();
    config.source = SourceConfig::Synthetic {
        interval_ms: 2000,
        seed: Some(seed),
    };
    Simulator::from_config(&config).unwrap()
}

#[test]
fn default_transmitter_stays_in_bounds_after_a_thousand_ticks() {
    let sim = seeded(2024);
    let seeds = [(18.0, 24.0), (85.0, 110.0), (35.0, 55.0)];
    for point in sim.catalogue().points() {
        let (lo, hi) = seeds[(point.object_id().instance() as usize - 1) / 3];
        assert!(
            (lo..=hi).contains(&point.present_value()),
            "{} seeded outside [{lo}, {hi}]",
            point.object_id()
        );
    }

    let mut drift = sim.value_source();
    for _ in 0..1000 {
        drift.tick(sim.catalogue());
    }

    let bounds = [(10.0, 35.0), (60.0, 130.0), (10.0, 90.0)];
    for point in sim.catalogue().points() {
        let (lo, hi) = bounds[(point.object_id().instance() as usize - 1) / 3];
        let value = point.present_value();
        assert!(value.is_finite() && (lo..=hi).contains(&value));
    }
}

#[test]
fn write_then_read_returns_written_value() {
    let sim = seeded(1);
    // analog-input 7 is the first humidity sensor
    let write = request(ServiceRequest::WriteProperty(WritePropertyRequest {
        object_id: ai(7),
        property_id: PropertyId::PresentValue,
        array_index: None,
        value: PropertyValue::Real(42.5),
        priority: Some(8),
    }));
    assert_eq!(
        sim.handle(&write),
        Some(Response::SimpleAck {
            service: ConfirmedService::WriteProperty
        })
    );

    let resp = sim.handle(&read(ai(7), PropertyId::PresentValue)).unwrap();
    assert_eq!(resp.value(), Some(&PropertyValue::Real(42.5)));
}

#[test]
fn read_property_multiple_is_denied_without_side_effects() {
    let sim = seeded(5);
    let before = sim.catalogue().points();
    let revision = sim.catalogue().database_revision();

    let resp = sim
        .handle(&request(ServiceRequest::Confirmed {
            service_choice: ConfirmedService::ReadPropertyMultiple.to_u8(),
        }))
        .unwrap();
    assert_eq!(
        resp.error_pair(),
        Some((ErrorClass::Services, ErrorCode::ServiceRequestDenied))
    );
    assert_eq!(sim.catalogue().points(), before);
    assert_eq!(sim.catalogue().database_revision(), revision);
}

#[test]
fn feed_without_any_snapshot_keeps_seeded_values() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = SimulatorConfig::default();
    config.source = SourceConfig::Feed {
        interval_ms: 333,
        path: Some(dir.path().join("never-written.json")),
    };
    for (point, field) in config.points.iter_mut().zip(["level", "level", "level"]) {
        point.feed_field = Some(field.to_string());
    }
    let sim = Simulator::from_config(&config).unwrap();
    let before = sim.catalogue().points();

    let mut relay = sim.value_source();
    for _ in 0..10 {
        assert_eq!(relay.tick(sim.catalogue()), 0);
    }
    assert_eq!(sim.catalogue().points(), before);

    let mut in_memory = FeedRelay::new(Arc::new(SharedFeed::new()));
    assert_eq!(in_memory.tick(sim.catalogue()), 0);
    assert_eq!(sim.catalogue().points(), before);
}

#[test]
fn file_feed_drives_bound_points() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("padA_state.json");
    let config = SimulatorConfig::from_toml_str(&format!(
        r#"
        [source]
        kind = "feed"
        path = "{}"

        [[points]]
        instance = 1
        sensor = "temperature"
        feed_field = "level"

        [[points]]
        instance = 2
        sensor = "pressure"
        feed_field = "pressure"
        "#,
        path.display()
    ))
    .unwrap();
    let sim = Simulator::from_config(&config).unwrap();

    std::fs::write(&path, r#"{"level": 27.5, "pressure": 115}"#).unwrap();
    let mut relay = sim.value_source();
    assert_eq!(relay.tick(sim.catalogue()), 2);

    let resp = sim.handle(&read(ai(1), PropertyId::PresentValue)).unwrap();
    assert_eq!(resp.value(), Some(&PropertyValue::Real(27.5)));
    let resp = sim.handle(&read(ai(2), PropertyId::PresentValue)).unwrap();
    assert_eq!(resp.value(), Some(&PropertyValue::Real(115.0)));
}

#[test]
fn object_list_matches_catalogue() {
    let sim = seeded(8);
    let device = sim.catalogue().device_id();
    let resp = sim.handle(&read(device, PropertyId::ObjectList)).unwrap();
    let list = resp.value().and_then(PropertyValue::as_array).unwrap();

    assert_eq!(list.len(), 1 + sim.catalogue().point_count());
    assert_eq!(list[0], PropertyValue::ObjectId(device));
    let ids: Vec<_> = list
        .iter()
        .map(|v| match v {
            PropertyValue::ObjectId(id) => *id,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(ids, sim.catalogue().list_objects());
}

#[test]
fn concurrent_drift_and_reads_see_consistent_values() {
    let catalogue = Arc::new(
        Catalogue::from_config(&SimulatorConfig::default(), &mut StdRng::seed_from_u64(3))
            .unwrap(),
    );
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let catalogue = catalogue.clone();
        let done = done.clone();
        std::thread::spawn(move || {
            let mut drift = SyntheticDrift::new(Some(99));
            for _ in 0..2000 {
                drift.tick(&catalogue);
            }
            done.store(true, Ordering::SeqCst);
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let catalogue = catalogue.clone();
            let done = done.clone();
            std::thread::spawn(move || {
                let mut reads = 0u32;
                while !done.load(Ordering::SeqCst) || reads < 100 {
                    for instance in 1..=9 {
                        let value = catalogue.get_present_value(ai(instance)).unwrap();
                        let class = match instance {
                            1..=3 => SensorClass::Temperature,
                            4..=6 => SensorClass::Pressure,
                            _ => SensorClass::Humidity,
                        };
                        assert!(class.contains(value), "{instance}: {value}");
                    }
                    reads += 1;
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}

#[tokio::test]
async fn scheduled_simulator_answers_requests_while_drifting() {
    let mut config = SimulatorConfig::default();
    config.source = SourceConfig::Synthetic {
        interval_ms: 2,
        seed: Some(4),
    };
    let sim = Simulator::from_config(&config).unwrap();
    let scheduler = sim.start();

    for _ in 0..20 {
        let resp = sim.handle(&read(ai(4), PropertyId::PresentValue)).unwrap();
        let Some(PropertyValue::Real(v)) = resp.value() else {
            panic!("expected a REAL present-value, got {resp:?}");
        };
        assert!(SensorClass::Pressure.contains(*v));
        tokio::time::sleep(Duration::from_millis(3)).await;
    }
    assert!(scheduler.stop().await >= 1);
}

#[test]
fn json_lines_boundary_round_trip() {
    let sim = seeded(12);
    let line = r#"{"source":{"ip":"192.168.1.20:47808"},"service":{"read_property":{"object_id":{"type":"analog-input","instance":4},"property_id":"units"}}}"#;
    let request: InboundRequest = serde_json::from_str(line).unwrap();
    let resp = sim.handle(&request).unwrap();
    assert_eq!(resp.value(), Some(&PropertyValue::Enumerated(53)));

    let encoded = serde_json::to_value(&resp).unwrap();
    assert_eq!(
        encoded["read_property_ack"]["object_id"],
        serde_json::json!({"type": "analog-input", "instance": 4})
    );
    assert_eq!(encoded["read_property_ack"]["value"]["enumerated"], 53);

    let who_is = r#"{"source":{"ip":"192.168.1.20:47808"},"service":{"unconfirmed":{"service_choice":8}}}"#;
    let request: InboundRequest = serde_json::from_str(who_is).unwrap();
    assert_eq!(sim.handle(&request), None);
}

#[test]
fn numeric_property_codes_over_json_address_the_named_property() {
    let sim = seeded(21);
    let write = r#"{"source":{"ip":"192.168.1.20:47808"},"service":{"write_property":{"object_id":{"type":"analog-input","instance":7},"property_id":{"proprietary":85},"value":{"real":42.5}}}}"#;
    let request: InboundRequest = serde_json::from_str(write).unwrap();
    assert_eq!(
        sim.handle(&request),
        Some(Response::SimpleAck {
            service: ConfirmedService::WriteProperty
        })
    );

    let read_line = r#"{"source":{"ip":"192.168.1.20:47808"},"service":{"read_property":{"object_id":{"type":"analog-input","instance":7},"property_id":85}}}"#;
    let request: InboundRequest = serde_json::from_str(read_line).unwrap();
    let resp = sim.handle(&request).unwrap();
    assert_eq!(resp.value(), Some(&PropertyValue::Real(42.5)));
    assert_eq!(
        serde_json::to_value(&resp).unwrap()["read_property_ack"]["property_id"],
        "present-value"
    );
}
