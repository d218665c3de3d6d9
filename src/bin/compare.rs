//! Compare a candidate recording against a reference
//!
//! Usage:
//!   cover-compare [--json] [--detailed] <reference> <candidate>

use cover_compare::{try_compare_files, AnalysisResult, ComparisonConfig};
use std::env;
use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut json = false;
    let mut detailed = false;
    let mut paths: Vec<String> = Vec::new();

    for a in env::args().skip(1) {
        match a.as_str() {
            "--json" => json = true,
            "--detailed" => detailed = true,
            "--help" | "-h" => {
                eprintln!(
                    "Usage: cover-compare [--json] [--detailed] <reference> <candidate>\n\
                     \n\
                     --json       Print the result as JSON\n\
                     --detailed   Include keys, shift, lag and component scores\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.len() != 2 {
        eprintln!("ERROR: Provide exactly two audio file paths. Use --help for usage.");
        std::process::exit(2);
    }

    let config = ComparisonConfig::default();
    let report = try_compare_files(Path::new(&paths[0]), Path::new(&paths[1]), &config);

    match (json, detailed, report) {
        (true, true, Ok(report)) => println!("{}", serde_json::to_string_pretty(&report)?),
        (true, false, Ok(report)) => println!("{}", serde_json::to_string(&report.result)?),
        (false, _, Ok(report)) => {
            let result = &report.result;
            println!("Comparison Results:");
            println!("  Score: {:.2}", result.final_score);
            println!(
                "  Trace points: {} / {}",
                result.trace1.len(),
                result.trace2.len()
            );
            if detailed {
                let meta = &report.metadata;
                println!(
                    "  Keys: {} / {} (shift {:+} semitones)",
                    meta.key1.name(),
                    meta.key2.name(),
                    meta.semitone_shift
                );
                println!(
                    "  Sync: window {}, lag {} samples, {:.2} s aligned",
                    meta.start_window, meta.lag_samples, meta.aligned_duration_secs
                );
                println!(
                    "  Segment score: {:.2} ({} segments)",
                    meta.segment_score,
                    meta.similarities.len()
                );
                println!("  Pitch score: {:.2}", meta.pitch_score);
                println!("  Processing time: {:.2} ms", meta.processing_time_ms);
            }
        }
        (_, _, Err(e)) => {
            log::error!("Comparison failed: {}", e);
            let failed = AnalysisResult::failed();
            if json {
                println!("{}", serde_json::to_string(&failed)?);
            } else {
                println!("Comparison could not be completed: {}", e);
                println!("  Score: {:.2}", failed.final_score);
            }
        }
    }

    Ok(())
}
