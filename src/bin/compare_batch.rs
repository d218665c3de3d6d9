//! Compare many candidates against one reference in parallel
//!
//! Usage:
//!   cover-compare-batch [--jobs N] [--json] <reference> <candidate1> <candidate2> ...
//!
//! Notes:
//! - Parallelism is across candidates. Each comparison is still single-threaded.
//! - Default workers: (available CPU threads - 1), keeping one core free for the system.

use cover_compare::{try_compare_files, ComparisonConfig};
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::path::Path;
use std::time::Instant;

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn percentile(mut xs: Vec<f32>, p: f32) -> Option<f32> {
    if xs.is_empty() {
        return None;
    }
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let idx = ((xs.len() - 1) as f32 * p.clamp(0.0, 1.0)).round() as usize;
    Some(xs[idx.min(xs.len() - 1)])
}

#[derive(Debug, Clone, Serialize)]
struct ItemOut {
    file: String,
    ok: bool,
    score: f32,
    segment_score: f32,
    pitch_score: f32,
    semitone_shift: i32,
    lag_samples: i64,
    processing_time_ms: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ItemOut {
    fn failed(file: String, error: String) -> Self {
        Self {
            file,
            ok: false,
            score: 0.0,
            segment_score: 0.0,
            pitch_score: 0.0,
            semitone_shift: 0,
            lag_samples: 0,
            processing_time_ms: 0.0,
            error: Some(error),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut paths: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--jobs" => {
                let v = args
                    .first()
                    .ok_or("--jobs requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
                jobs = Some(std::cmp::max(1, v));
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: cover-compare-batch [--jobs N] [--json] <reference> <candidate1> ...\n\
                     \n\
                     --jobs N   Parallel workers (default: CPU-1)\n\
                     --json     Emit one JSON object per line (JSONL)\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.len() < 2 {
        eprintln!("ERROR: Provide a reference and at least one candidate. Use --help for usage.");
        std::process::exit(2);
    }

    let reference = paths.remove(0);
    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!(
        "Batch: {} candidates vs {}, jobs={}",
        paths.len(),
        reference,
        jobs
    );

    let config = ComparisonConfig::default();

    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let outs: Vec<ItemOut> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                match try_compare_files(Path::new(&reference), Path::new(path), &config) {
                    Ok(report) => ItemOut {
                        file: path.clone(),
                        ok: true,
                        score: report.result.final_score,
                        segment_score: report.metadata.segment_score,
                        pitch_score: report.metadata.pitch_score,
                        semitone_shift: report.metadata.semitone_shift,
                        lag_samples: report.metadata.lag_samples,
                        processing_time_ms: report.metadata.processing_time_ms,
                        error: None,
                    },
                    Err(e) => ItemOut::failed(path.clone(), e.to_string()),
                }
            })
            .collect()
    });

    if json {
        for o in &outs {
            println!("{}", serde_json::to_string(o)?);
        }
    } else {
        for (idx, o) in outs.iter().enumerate() {
            if o.ok {
                println!(
                    "[{}/{}] {}: score={:.2} (segment={:.2} pitch={:.2}) shift={:+} lag={} time={:.2}ms",
                    idx + 1,
                    outs.len(),
                    o.file,
                    o.score,
                    o.segment_score,
                    o.pitch_score,
                    o.semitone_shift,
                    o.lag_samples,
                    o.processing_time_ms
                );
            } else {
                println!(
                    "[{}/{}] {}: ERROR: {} (score=0.00)",
                    idx + 1,
                    outs.len(),
                    o.file,
                    o.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }

    let ok_times: Vec<f32> = outs
        .iter()
        .filter(|o| o.ok)
        .map(|o| o.processing_time_ms)
        .collect();
    let wall_ms = t0.elapsed().as_secs_f64() * 1000.0;

    eprintln!(
        "Done: ok={}/{} wall={:.0}ms",
        ok_times.len(),
        outs.len(),
        wall_ms
    );
    if !ok_times.is_empty() {
        let mean = ok_times.iter().sum::<f32>() / ok_times.len() as f32;
        let p50 = percentile(ok_times.clone(), 0.50).unwrap_or(mean);
        let p90 = percentile(ok_times.clone(), 0.90).unwrap_or(mean);
        let min = ok_times.iter().cloned().fold(f32::INFINITY, f32::min);
        let max = ok_times.iter().cloned().fold(0.0, f32::max);
        eprintln!(
            "processing_time_ms: mean={:.2} p50={:.2} p90={:.2} min={:.2} max={:.2}",
            mean, p50, p90, min, max
        );
    }

    Ok(())
}
