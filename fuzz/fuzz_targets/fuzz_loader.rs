#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must load or fail with an error, never panic
    let loader = tsplot::loader::TimeSeriesLoader::new();
    if let Ok(series) = loader.load(Cursor::new(data), "forwarding_latencies") {
        let resampled = tsplot::resample::resample(&series);
        for w in resampled.points().windows(2) {
            assert!(w[0].window_start < w[1].window_start);
        }
    }

    // Raw rows and the loaded series agree whenever both succeed
    let rows = loader.read_rows(Cursor::new(data), None);
    let series = loader.load(Cursor::new(data), "forwarding_latencies");
    if let (Ok(rows), Ok(series)) = (rows, series) {
        assert_eq!(series.len(), rows.len());
        if let Some(first) = series.samples().first() {
            assert_eq!(first.elapsed_seconds, 0.0);
        }
        for row in &rows {
            assert!(row.get("forwarding_latencies").is_some());
        }
    }
});
