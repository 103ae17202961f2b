#![allow(missing_docs)]

use upload_params::{select_target, select_transport, DeliveryTarget, ParamsMode, Transport};

#[test]
fn mode_maps_directly_to_target() {
    assert_eq!(select_target(ParamsMode::Url), DeliveryTarget::Url);
    assert_eq!(select_target(ParamsMode::Body), DeliveryTarget::Body);
    assert_eq!(select_target(ParamsMode::Header), DeliveryTarget::Header);
}

#[test]
fn body_mode_stays_body_without_multipart() {
    assert_eq!(select_transport(ParamsMode::Body, false), Transport::Raw);
    assert_eq!(select_target(ParamsMode::Body), DeliveryTarget::Body);
}

#[test]
fn header_mode_forces_multipart() {
    assert_eq!(select_transport(ParamsMode::Header, false), Transport::Multipart);
    assert_eq!(select_transport(ParamsMode::Header, true), Transport::Multipart);
}

#[test]
fn force_multipart_applies_to_every_mode() {
    for mode in [ParamsMode::Url, ParamsMode::Body, ParamsMode::Header] {
        assert!(select_transport(mode, true).is_multipart());
    }
    assert_eq!(select_transport(ParamsMode::Url, false), Transport::Raw);
}

#[test]
fn unrecognized_mode_falls_back_to_url_delivery() {
    let mode: ParamsMode = "paramsInFooter".parse().expect("parsing is infallible");
    assert_eq!(select_target(mode), DeliveryTarget::Url);
    assert_eq!("paramsInHeader".parse::<ParamsMode>(), Ok(ParamsMode::Header));
}

#[cfg(feature = "serde")]
#[test]
fn mode_serializes_under_configuration_names() {
    let mode: ParamsMode = serde_json::from_str("\"paramsInHeader\"").expect("valid mode");
    assert_eq!(mode, ParamsMode::Header);

    let unknown: ParamsMode = serde_json::from_str("\"bogus\"").expect("unknown falls back");
    assert_eq!(unknown, ParamsMode::Url);

    assert_eq!(
        serde_json::to_string(&ParamsMode::Body).expect("serializable"),
        "\"paramsInBody\""
    );
}
