//! Performance benchmarks for the per-tick decode path

use client::decoder::decode;
use client::decompress::{decompress, DEFAULT_MAX_DECOMPRESSED_BYTES};
use client::schema::parse_position;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::time::Instant;

/// Builds a compact payload the size of a full, busy server
fn full_server_payload(players: usize) -> String {
    let entries: Vec<String> = (0..players)
        .map(|i| {
            let vehicle = if i % 3 == 0 {
                format!(r#","i":{{"a":true,"b":{},"c":"sultan","d":"Sultan"}}"#, i)
            } else {
                String::new()
            };
            format!(
                r#"{{"a":{},"b":{{"a":0,"b":"Player {}","c":{}}},"c":"{:.2},{:.2},{:.2},{:.1},{:.2}","f":"p{}","g":{},"h":"steam:{:015x}"{}}}"#,
                i % 2,
                i,
                10_000 + i,
                i as f64 * 1.25,
                -(i as f64) * 2.5,
                30.0,
                (i * 7 % 360) as f64,
                (i % 40) as f64,
                i,
                i,
                i,
                vehicle
            )
        })
        .collect();

    let police: Vec<String> = (0..players / 10)
        .map(|i| format!(r#"{{"c":{}}}"#, 10_000 + i))
        .collect();

    format!(
        r#"{{"p":[{}],"d":{{"p":[{}],"e":[]}},"s":["steam:1","steam:2"]}}"#,
        entries.join(","),
        police.join(",")
    )
}

fn gzip(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

/// Benchmarks decoding a 500 player snapshot
#[test]
fn benchmark_snapshot_decode() {
    let text = full_server_payload(500);

    let iterations = 100;
    let start = Instant::now();

    for _ in 0..iterations {
        let snapshot = decode(&text).unwrap();
        assert_eq!(snapshot.players.len(), 500);
    }

    let duration = start.elapsed();
    println!(
        "Snapshot decode: {} iterations of {} bytes in {:?} ({:.2} ms/iter)",
        iterations,
        text.len(),
        duration,
        duration.as_millis() as f64 / iterations as f64
    );

    // Should complete in under 10 seconds
    assert!(duration.as_millis() < 10_000);
}

/// Benchmarks gzip inflation of the same snapshot
#[test]
fn benchmark_decompression() {
    let text = full_server_payload(500);
    let payload = gzip(&text);

    let iterations = 200;
    let start = Instant::now();

    for _ in 0..iterations {
        let inflated = decompress(&payload, DEFAULT_MAX_DECOMPRESSED_BYTES).unwrap();
        assert_eq!(inflated.len(), text.len());
    }

    let duration = start.elapsed();
    println!(
        "Decompression: {} iterations ({} -> {} bytes) in {:?} ({:.2} μs/iter)",
        iterations,
        payload.len(),
        text.len(),
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    // Should complete in under 5 seconds
    assert!(duration.as_millis() < 5000);
}

/// Benchmarks parsing of packed position strings
#[test]
fn benchmark_position_parsing() {
    let positions: Vec<String> = (0..1000)
        .map(|i| format!("{}.5,{}.25,{},{},{}", i, -i, i % 50, i % 360, i % 30))
        .collect();

    let iterations = 100;
    let start = Instant::now();

    let mut checksum = 0.0;
    for _ in 0..iterations {
        for position in &positions {
            let (coords, heading, _) = parse_position(position);
            checksum += coords.x + heading;
        }
    }

    let duration = start.elapsed();
    println!(
        "Position parsing: {} strings in {:?} (checksum {})",
        positions.len() * iterations,
        duration,
        checksum
    );

    assert!(checksum > 0.0);
    // Should complete in under 2 seconds
    assert!(duration.as_millis() < 2000);
}
