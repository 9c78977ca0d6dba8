//! Decodes a realistic feed snapshot end to end and checks the payloads
//! derived from it.

use vsfetch::models::{feed_timestamp_ms, DataFeed};

const SNAPSHOT: &str = r#"{
    "general": {
        "version": 3,
        "update_timestamp": "2024-03-01T12:00:00.2507623Z",
        "connected_clients": 3,
        "unique_users": 3
    },
    "pilots": [
        {
            "cid": 1403527,
            "name": "John Doe EHAM",
            "callsign": "KLM33X",
            "server": "AMSTERDAM",
            "pilot_rating": 1,
            "latitude": 52.30907,
            "longitude": 4.76420,
            "altitude": 37000,
            "groundspeed": 451,
            "transponder": "1000",
            "heading": 263,
            "qnh_i_hg": 29.92,
            "qnh_mb": 1013,
            "flight_plan": {
                "flight_rules": "I",
                "aircraft": "B738/M-SDE3FGHIM1RWXY/LB1",
                "aircraft_faa": "B738/L",
                "aircraft_short": "B738",
                "departure": "EHAM",
                "arrival": "LPPT",
                "alternate": "LPPR",
                "cruise_tas": "447",
                "altitude": "37000",
                "deptime": "1130",
                "enroute_time": "0255",
                "fuel_time": "0440",
                "remarks": "PBN/A1B1C1D1O1S2 DOF/240301",
                "route": "GORLO UL608 LAM",
                "revision_id": 2,
                "assigned_transponder": "1000"
            },
            "logon_time": "2024-03-01T11:02:58.1234567Z",
            "last_updated": "2024-03-01T12:00:00.0000000Z"
        },
        {
            "cid": 1403528,
            "name": "Jane Doe",
            "callsign": "BAW212",
            "server": "LONDON",
            "pilot_rating": 0,
            "latitude": 51.4775,
            "longitude": -0.461389,
            "altitude": 83,
            "groundspeed": 0,
            "transponder": "2000",
            "heading": 90,
            "qnh_i_hg": 30.12,
            "qnh_mb": 1020,
            "flight_plan": null,
            "logon_time": "2024-03-01T11:45:00.0000000Z",
            "last_updated": "2024-03-01T12:00:00.0000000Z"
        }
    ],
    "controllers": [
        {
            "cid": 900001,
            "name": "Alex Smith",
            "callsign": "EHAM_TWR",
            "frequency": "119.225",
            "facility": 4,
            "rating": 3,
            "server": "AMSTERDAM",
            "visual_range": 50,
            "text_atis": null,
            "last_updated": "2024-03-01T12:00:00.0000000Z",
            "logon_time": "2024-03-01T10:00:00.0000000Z"
        },
        {
            "cid": 900002,
            "name": "Sam Jones",
            "callsign": "EHAA_CTR",
            "frequency": "124.875",
            "facility": 6,
            "rating": 5,
            "server": "AMSTERDAM",
            "visual_range": 600,
            "text_atis": ["Amsterdam Radar", "Contact on 124.875"],
            "last_updated": "2024-03-01T12:00:00.0000000Z",
            "logon_time": "2024-03-01T09:30:00.0000000Z"
        }
    ],
    "atis": [
        {
            "cid": 900003,
            "name": "EHAM ATIS",
            "callsign": "EHAM_ATIS",
            "frequency": "122.200",
            "facility": 0,
            "rating": 2,
            "server": "AMSTERDAM",
            "visual_range": 0,
            "atis_code": "K",
            "text_atis": ["EHAM ATIS INFO K 1155Z", "RWY 18R AND 18C IN USE"],
            "last_updated": "2024-03-01T12:00:00.0000000Z",
            "logon_time": "2024-03-01T06:00:00.0000000Z"
        }
    ]
}"#;

#[test]
fn decodes_full_snapshot() {
    let feed: DataFeed = serde_json::from_str(SNAPSHOT).unwrap();

    assert_eq!(feed.pilots.len(), 2);
    assert_eq!(feed.controllers.len(), 2);
    assert_eq!(feed.atis.len(), 1);

    let version = feed_timestamp_ms(&feed.general.update_timestamp).unwrap();
    assert_eq!(version, 1_709_294_400_251);
}

#[test]
fn pilot_payloads_follow_the_snapshot_version() {
    let feed: DataFeed = serde_json::from_str(SNAPSHOT).unwrap();
    let version = feed_timestamp_ms(&feed.general.update_timestamp).unwrap();

    let klm = &feed.pilots[0];
    assert_eq!(klm.track_id(), "KLM33X.1403527.1709290978123");

    let track = klm.track_object(version);
    assert_eq!(track.point.ts, version);
    assert_eq!(track.point.alt, 37000);
    assert_eq!(track.point.gs, 451);

    let object = serde_json::to_value(klm.versioned_object(version)).unwrap();
    assert_eq!(object["version"], version);
    assert_eq!(object["data"]["type"], "pilot");
    assert_eq!(object["data"]["flight_plan"]["arrival"], "LPPT");
    assert_eq!(object["point"]["lat"], 52.30907);

    // the pilot without a flight plan drops the field entirely
    let baw = serde_json::to_value(feed.pilots[1].versioned_object(version)).unwrap();
    assert!(baw["data"].get("flight_plan").is_none());
}

#[test]
fn controller_atis_text_is_joined() {
    let feed: DataFeed = serde_json::from_str(SNAPSHOT).unwrap();

    assert!(feed.controllers[0].text_atis.is_none());
    assert_eq!(
        feed.controllers[1].text_atis.as_deref(),
        Some("Amsterdam Radar\nContact on 124.875")
    );
    assert_eq!(
        feed.atis[0].text_atis.as_deref(),
        Some("EHAM ATIS INFO K 1155Z\nRWY 18R AND 18C IN USE")
    );
}
