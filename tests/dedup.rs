//! Split overlap removal on files.

use semerr::dataset::{Table, COMMA};
use semerr::dedup::{remove_overlaps, suffixed_path, DEFAULT_SUFFIX};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn filtered_splits_round_trip_through_files() {
    let dir = TempDir::new().unwrap();
    let test = write(
        dir.path(),
        "test.csv",
        "mr,ref\n\"name[Aromi], food[French], near[Avalon]\",x\n",
    );
    let devel = write(
        dir.path(),
        "devel.csv",
        "mr,ref\n\
         \"food[French], name[Cotto], near[Ranch]\",a\n\
         \"name[Cotto], food[Indian]\",b\n",
    );
    let train = write(
        dir.path(),
        "train.tsv",
        "mr\tref\n\
         name[Zizzi], food[Indian]\tc\n\
         name[Zizzi], food[English]\td\n",
    );

    let out = remove_overlaps(
        Table::read(&train).unwrap(),
        Table::read(&devel).unwrap(),
        &Table::read(&test).unwrap(),
    )
    .unwrap();

    assert_eq!(out.report.devel.removed, 1);
    assert_eq!(out.report.train.removed, 1);

    let devel_out = suffixed_path(&devel, DEFAULT_SUFFIX);
    let train_out = suffixed_path(&train, DEFAULT_SUFFIX);
    assert_eq!(devel_out, dir.path().join("devel.no-ol.csv"));
    assert_eq!(train_out, dir.path().join("train.no-ol.tsv"));

    out.devel.write(&devel_out, COMMA).unwrap();
    out.train.write(&train_out, COMMA).unwrap();

    let devel_back = Table::read(&devel_out).unwrap();
    assert_eq!(devel_back.column("mr").unwrap(), vec!["name[Cotto], food[Indian]"]);
    assert_eq!(devel_back.column("ref").unwrap(), vec!["b"]);

    let train_back = Table::read(&train_out).unwrap();
    assert_eq!(train_back.column("mr").unwrap(), vec!["name[Zizzi], food[English]"]);
}

#[test]
fn unparsable_mr_is_an_error() {
    let test = Table::parse("mr,ref\n\"name[Aromi\",x\n").unwrap();
    let devel = Table::parse("mr,ref\n").unwrap();
    let train = Table::parse("mr,ref\n").unwrap();
    assert!(remove_overlaps(train, devel, &test).is_err());
}
