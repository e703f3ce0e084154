use chrono::{Duration, TimeZone, Utc};

use crate::error::ValidationError;
use crate::event::{EventKind, TelemetryEvent};
use crate::flags::DerivedFlags;
use crate::health::PlaybackPhase;

fn base_event(kind: EventKind) -> TelemetryEvent {
    TelemetryEvent {
        stream_id: "test_stream".to_string(),
        timestamp: Utc.with_ymd_and_hms(2026, 2, 8, 23, 30, 0).unwrap(),
        sequence_id: 7,
        event_kind: kind,
        signal_payload: None,
        latency_ms: 200.0,
    }
}

#[test]
fn valid_event_passes() {
    let event = base_event(EventKind::ContentPlaying);
    assert!(event.validate(None).is_ok());
}

#[test]
fn rejects_negative_latency() {
    let mut event = base_event(EventKind::ContentPlaying);
    event.latency_ms = -1.0;
    assert_eq!(
        event.validate(None),
        Err(ValidationError::NegativeLatency(-1.0))
    );
}

#[test]
fn rejects_non_finite_latency() {
    let mut event = base_event(EventKind::AdPlaying);
    event.latency_ms = f64::NAN;
    assert!(matches!(
        event.validate(None),
        Err(ValidationError::NonFiniteLatency(_))
    ));

    event.latency_ms = f64::INFINITY;
    assert!(matches!(
        event.validate(None),
        Err(ValidationError::NonFiniteLatency(_))
    ));
}

#[test]
fn rejects_payload_outside_trigger() {
    let mut event = base_event(EventKind::AdPlaying);
    event.signal_payload = Some("0xFC30DEADBEEF".to_string());
    assert_eq!(
        event.validate(None),
        Err(ValidationError::PayloadOutsideTrigger(EventKind::AdPlaying))
    );
}

#[test]
fn trigger_may_carry_payload_or_not() {
    let mut event = base_event(EventKind::Scte35Trigger);
    assert!(event.validate(None).is_ok());

    event.signal_payload = Some("0xFC30A1B2C3D4".to_string());
    assert!(event.validate(None).is_ok());
}

#[test]
fn rejects_timestamp_regression() {
    let event = base_event(EventKind::ContentPlaying);
    let later = event.timestamp + Duration::seconds(10);
    assert!(matches!(
        event.validate(Some(later)),
        Err(ValidationError::TimestampRegression { .. })
    ));

    // equal timestamps are allowed, only strict regression is rejected
    assert!(event.validate(Some(event.timestamp)).is_ok());
}

#[test]
fn kind_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&EventKind::Scte35Trigger).unwrap(),
        "\"scte35_trigger\""
    );
    assert_eq!(
        serde_json::to_string(&EventKind::ContentPlaying).unwrap(),
        "\"content_playing\""
    );
    assert_eq!(EventKind::AdComplete.as_str(), "ad_complete");
}

#[test]
fn ad_family_membership() {
    assert!(EventKind::AdPlaying.is_ad_family());
    assert!(EventKind::AdComplete.is_ad_family());
    assert!(EventKind::Scte35Trigger.is_ad_family());
    assert!(!EventKind::ContentPlaying.is_ad_family());

    assert_eq!(
        PlaybackPhase::from_kind(EventKind::Scte35Trigger),
        PlaybackPhase::AdBreak
    );
    assert_eq!(
        PlaybackPhase::from_kind(EventKind::ContentPlaying),
        PlaybackPhase::Content
    );
}

#[test]
fn buffering_flag_boundary() {
    let mut event = base_event(EventKind::AdPlaying);

    event.latency_ms = 999.99;
    assert!(!DerivedFlags::compute(&event, None).buffering);

    event.latency_ms = 1000.0;
    assert!(DerivedFlags::compute(&event, None).buffering);

    // same latency on a content tick never counts as buffering
    event.event_kind = EventKind::ContentPlaying;
    assert!(!DerivedFlags::compute(&event, None).buffering);
}

#[test]
fn lost_packet_flag_against_previous_sequence() {
    let event = base_event(EventKind::ContentPlaying);

    assert!(!DerivedFlags::compute(&event, None).lost_packet);
    assert!(!DerivedFlags::compute(&event, Some(6)).lost_packet);
    assert!(DerivedFlags::compute(&event, Some(5)).lost_packet);
    assert!(DerivedFlags::compute(&event, Some(7)).lost_packet);
}

#[test]
fn signal_failure_flag_requires_trigger_without_payload() {
    let mut event = base_event(EventKind::Scte35Trigger);
    assert!(DerivedFlags::compute(&event, None).signal_failure);

    event.signal_payload = Some("0xFC3000000000".to_string());
    assert!(!DerivedFlags::compute(&event, None).signal_failure);

    let content = base_event(EventKind::ContentPlaying);
    assert!(!DerivedFlags::compute(&content, None).signal_failure);
}
