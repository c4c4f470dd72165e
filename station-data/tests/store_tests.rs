//! File round trips for store.rs
#![allow(clippy::unwrap_used)]

use station_data::store;
use station_data::types::{Address, Coordinate, StationTable, TrainRecord};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_train_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("train_g.txt");
    let records = vec![
        TrainRecord::new("G1", vec!["北京南".into(), "南京南".into(), "上海虹桥".into()]),
        TrainRecord::new("G7", vec!["北京南".into(), "上海".into()]),
    ];

    store::write_train_file(&path, &records).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "G1:北京南,南京南,上海虹桥\nG7:北京南,上海\n"
    );
    assert_eq!(store::read_train_file(&path).unwrap(), records);
}

#[test]
fn test_read_train_file_skips_blank_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("train_k.txt");
    fs::write(&path, "K1:A,B\r\n\nK2:C\n").unwrap();

    let records = store::read_train_file(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].stations, vec!["A", "B"]);
    assert_eq!(records[1].train, "K2");
}

#[test]
fn test_read_train_file_reports_bad_line() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("train_t.txt");
    fs::write(&path, "T1:A\nnonsense\n").unwrap();

    let err = store::read_train_file(&path).unwrap_err();
    assert!(err.to_string().contains(":2:"), "{err}");
}

#[test]
fn test_read_train_file_missing() {
    let dir = tempdir().unwrap();
    assert!(store::read_train_file(&dir.path().join("train_z.txt")).is_err());
}

#[test]
fn test_coordinates_written_with_bom() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out").join("coords.csv");

    let mut table = StationTable::new();
    table.insert("苏州北".into(), Some(Coordinate::new(120.642253, 31.421572)));
    table.insert("上高镇".into(), None);

    store::write_coordinates(&path, &table).unwrap();

    let bytes = fs::read(&path).unwrap();
    assert!(bytes.starts_with(&[0xef, 0xbb, 0xbf]));

    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    assert_eq!(
        text,
        "station,lng,lat\n上高镇,,\n苏州北,120.642253,31.421572\n"
    );
}

#[test]
fn test_coordinates_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("coords.csv");

    let mut table = StationTable::new();
    table.insert("北京南".into(), Some(Coordinate::new(116.378248, 39.865275)));
    table.insert("新固镇".into(), Some(Coordinate::new(116.330216, 39.430955)));
    table.insert("无名".into(), None);

    store::write_coordinates(&path, &table).unwrap();
    let read = store::read_coordinates(&path).unwrap();

    assert_eq!(read, table);
}

#[test]
fn test_addresses_written_with_bom() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("address.csv");

    let mut table = StationTable::new();
    table.insert("上海虹桥".into(), Some(Coordinate::new(121.32, 31.194)));
    table.insert("上高镇".into(), None);
    table.set_address(
        "上海虹桥",
        Address {
            province: "上海市".into(),
            city: "上海市".into(),
            district: "闵行区".into(),
        },
    );

    store::write_addresses(&path, &table).unwrap();

    let text = store::read_utf8(&path).unwrap();
    assert_eq!(
        text,
        "station,lng,lat,province,city,district\n上海虹桥,121.32,31.194,上海市,上海市,闵行区\n上高镇,,,,,\n"
    );
}

#[test]
fn test_read_lines_trims_and_skips_blanks() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trains.txt");
    fs::write(&path, "\u{feff}G1\n  G7 \n\nD5\n").unwrap();

    assert_eq!(store::read_lines(&path).unwrap(), vec!["G1", "G7", "D5"]);
}
