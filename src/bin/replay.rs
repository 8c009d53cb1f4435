//! Directional Survey Replay
//!
//! Feeds survey stations through the full wellpath store:
//! solver → chain → per-well actor → projection / quality / analytics.
//! Stations come from a synthetic build-and-hold trajectory or a CSV file.
//!
//! # Usage
//! ```bash
//! ./replay --count 48 --seed 7
//! ./replay --file data/surveys.csv --delay-ms 50
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use rand::prelude::*;
use rand_distr::{Distribution, Normal};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

use wellpath::angles::normalize_360;
use wellpath::{run_feed, RawSurvey, ReplaySource, WellPlan, WellRegistry};

// ============================================================================
// Trajectory Constants
// ============================================================================

/// First station depth (ft MD)
const FIRST_STATION_MD: f64 = 500.0;
/// Nominal station spacing (ft)
const STATION_SPACING: f64 = 100.0;
/// Depth where the build section starts (ft MD)
const KICKOFF_MD: f64 = 1_500.0;
/// Build rate through the curve (degrees per 100 ft)
const BUILD_RATE: f64 = 1.5;
/// Hold inclination after the build (degrees)
const TARGET_INC: f64 = 35.0;
/// Hold azimuth toward the target (degrees)
const TARGET_AZI: f64 = 175.0;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "replay")]
#[command(about = "Directional survey replay through the wellpath store")]
#[command(version = "1.0")]
struct Args {
    /// Number of synthetic stations to generate (ignored with --file)
    #[arg(short, long, default_value = "48", value_parser = clap::value_parser!(u32).range(2..=5000))]
    count: u32,

    /// Replay stations from a CSV file (md,inc,azi[,bit_depth], optional header)
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Well identifier for the replayed chain
    #[arg(short, long, default_value = "DEMO-01")]
    well_id: String,

    /// Plan TOML path (default: WELLPATH_PLAN / ./well_plan.toml / built-ins)
    #[arg(short, long)]
    plan: Option<PathBuf>,

    /// Inter-station delay in milliseconds
    #[arg(long, default_value = "0")]
    delay_ms: u64,

    /// Projection horizon in feet of measured depth
    #[arg(long, default_value = "100")]
    horizon: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,
}

// ============================================================================
// Synthetic Trajectory
// ============================================================================

/// Generate a build-and-hold wellpath: near-vertical to kickoff, build at
/// [`BUILD_RATE`] up to [`TARGET_INC`], then hold toward [`TARGET_AZI`].
fn synthetic_stations(count: u32, seed: Option<u64>) -> Result<Vec<RawSurvey>> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let inc_noise: Normal<f64> = Normal::new(0.0, 0.15)?;
    let azi_noise = Normal::new(0.0, 0.6)?;

    let mut stations = Vec::with_capacity(count as usize);
    let mut md = FIRST_STATION_MD;

    for _ in 0..count {
        let inc = if md < KICKOFF_MD {
            0.3 + inc_noise.sample(&mut rng).abs()
        } else {
            let built = (md - KICKOFF_MD) / 100.0 * BUILD_RATE;
            (built + inc_noise.sample(&mut rng)).clamp(0.2, TARGET_INC)
        };
        // Near-vertical azimuth is poorly defined, so let it wander more.
        let wander = if inc < 5.0 { 10.0 } else { 1.0 };
        let azi = normalize_360(TARGET_AZI + azi_noise.sample(&mut rng) * wander);

        stations.push(RawSurvey::new(md, inc, azi));
        md += STATION_SPACING + rng.gen_range(-5.0..5.0);
    }
    Ok(stations)
}

// ============================================================================
// CSV Loading (fixed format: md,inc,azi[,bit_depth])
// ============================================================================

fn load_csv(path: &Path) -> Result<Vec<RawSurvey>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut stations = Vec::new();
    for (line_num, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        // Skip a header row if its first field is not numeric.
        if line_num == 0 && fields[0].parse::<f64>().is_err() {
            continue;
        }
        if fields.len() < 3 {
            anyhow::bail!(
                "line {}: expected md,inc,azi[,bit_depth], got {:?}",
                line_num + 1,
                line
            );
        }
        let md: f64 = fields[0]
            .parse()
            .with_context(|| format!("line {}: bad md {:?}", line_num + 1, fields[0]))?;
        let inc: f64 = fields[1]
            .parse()
            .with_context(|| format!("line {}: bad inclination {:?}", line_num + 1, fields[1]))?;
        let azi: f64 = fields[2]
            .parse()
            .with_context(|| format!("line {}: bad azimuth {:?}", line_num + 1, fields[2]))?;

        let mut raw = RawSurvey::new(md, inc, azi);
        if let Some(bit_depth) = fields.get(3).and_then(|f| f.parse::<f64>().ok()) {
            raw = raw.with_bit_depth(bit_depth);
        }
        stations.push(raw);
    }

    if stations.is_empty() {
        anyhow::bail!("No stations parsed from {}", path.display());
    }
    Ok(stations)
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║  wellpath  ·  Directional Survey Replay                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    // Load plan
    println!("[1/5] Loading well plan...");
    let plan = match &args.plan {
        Some(path) => WellPlan::load_from_file(path)
            .with_context(|| format!("Failed to load plan from {}", path.display()))?,
        None => WellPlan::load(),
    };
    println!("  Proposed direction:   {:.1}°", plan.proposed_direction);
    println!("  Sensor offset:        {:.1} ft", plan.sensor_offset);
    println!("  Target TVD:           {:.0} ft", plan.target_tvd);
    println!(
        "  Proposed VS:          {:.0} ft",
        plan.proposed_vertical_section
    );
    println!();

    // Load or generate stations
    let stations = match &args.file {
        Some(path) => {
            println!("[2/5] Loading stations from {}...", path.display());
            load_csv(path)?
        }
        None => {
            println!("[2/5] Generating {} synthetic stations...", args.count);
            synthetic_stations(args.count, args.seed)?
        }
    };
    let md_first = stations.first().map(|s| s.md).unwrap_or(0.0);
    let md_last = stations.last().map(|s| s.md).unwrap_or(0.0);
    println!("  Stations:             {}", stations.len());
    println!("  MD range:             {:.0} – {:.0} ft", md_first, md_last);
    println!();

    // Stream the first half in measured order
    let registry = WellRegistry::new();
    let handle = registry.open(&args.well_id, plan);

    let split = stations.len() / 2;
    let (head, tail) = stations.split_at(split.max(1));

    println!(
        "[3/5] Streaming {} stations through the feed...",
        head.len()
    );
    let mut source = ReplaySource::new(head.to_vec(), args.delay_ms);
    let feed_stats = run_feed(&mut source, &handle, CancellationToken::new()).await;
    println!(
        "  Processed: {}   Accepted: {}   Rejected: {}",
        feed_stats.processed, feed_stats.accepted, feed_stats.rejected
    );
    println!();

    // Import the rest as a shuffled batch, then correct the chain
    println!(
        "[4/5] Importing {} late stations as a shuffled batch...",
        tail.len()
    );
    let mut batch: Vec<RawSurvey> = tail.to_vec();
    let mut shuffle_rng = match args.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    batch.shuffle(&mut shuffle_rng);

    let report = handle.import_batch(batch).await?;
    println!(
        "  Accepted: {}   Rejected: {}",
        report.accepted,
        report.rejected.len()
    );
    for r in &report.rejected {
        println!("    row {:>3} (md {:>8.1}): {}", r.row, r.md, r.reason);
    }

    // Re-measure one mid-chain station and drop the trailing one; every
    // station below the edit is recomputed by the actor.
    let snapshot = handle.snapshot();
    if snapshot.len() >= 3 {
        let target = snapshot.surveys[snapshot.len() / 2].clone();
        let corrected =
            RawSurvey::new(target.md, target.inc, normalize_360(target.azi + 1.5));
        let updated = handle.update(target.sequence_index, corrected).await?;
        println!(
            "  Re-measured station #{} (azi {:.2}° → {:.2}°)",
            updated.sequence_index, target.azi, updated.azi
        );

        let removed = handle.delete(handle.snapshot().len()).await?;
        println!(
            "  Deleted trailing station #{} (md {:.1})",
            removed.sequence_index, removed.md
        );
    }
    println!();

    // Results
    let snapshot = handle.snapshot();
    println!(
        "[5/5] REPLAY COMPLETE — {} stations, revision {}",
        snapshot.len(),
        snapshot.revision
    );
    println!("═════════════════════════════════════════════════════════════════");
    println!();

    println!(
        "{:>4} {:>9} {:>7} {:>8} {:>9} {:>11} {:>11} {:>9} {:>7}",
        "#", "MD", "Inc", "Azi", "TVD", "N/S", "E/W", "VS", "DLS"
    );
    let shown = if snapshot.len() > 20 {
        println!("  ... ({} earlier stations)", snapshot.len() - 15);
        &snapshot.surveys[snapshot.len() - 15..]
    } else {
        &snapshot.surveys[..]
    };
    for s in shown {
        println!(
            "{:>4} {:>9.1} {:>7.2} {:>8.2} {:>9.1} {:>9.1} {} {:>9.1} {} {:>9.1} {:>7.2}",
            s.sequence_index,
            s.md,
            s.inc,
            s.azi,
            s.tvd,
            s.north_south,
            if s.is_north { "N" } else { "S" },
            s.east_west,
            if s.is_east { "E" } else { "W" },
            s.vertical_section,
            s.dogleg_severity,
        );
    }

    let projection = snapshot.project(args.horizon);
    println!();
    println!("Projection (+{:.0} ft MD):", args.horizon);
    println!(
        "  Inclination:          {:.2}°  ({:+.2}°/100ft build)",
        projection.projected_inc, projection.build_rate
    );
    println!(
        "  Azimuth:              {:.2}°  ({:+.2}°/100ft turn)",
        projection.projected_az, projection.turn_rate
    );
    let vertical_tendency = if projection.is_above {
        "building"
    } else if projection.is_below {
        "dropping"
    } else {
        "holding"
    };
    let lateral_tendency = if projection.is_right {
        ", turning right"
    } else if projection.is_left {
        ", turning left"
    } else {
        ""
    };
    println!("  Tendency:             {}{}", vertical_tendency, lateral_tendency);

    if let Some(verdict) = snapshot.classify_latest() {
        println!();
        println!("Latest Station Verdict:  {}", verdict.status);
        println!("  Dogleg:               {}", verdict.dogleg_description);
        println!("  Trend:                {}", verdict.trend_description);
        println!("  Recommendation:       {}", verdict.recommendation);
    }

    let trajectory = snapshot.aggregate();
    println!();
    println!("Trajectory Statistics:");
    println!(
        "  Average build rate:   {:+.2}°/100ft",
        trajectory.avg_build_rate
    );
    println!(
        "  Average turn rate:    {:+.2}°/100ft",
        trajectory.avg_turn_rate
    );
    println!("  Max DLS:              {:.2}°/100ft", trajectory.max_dls);
    println!("  Average DLS:          {:.2}°/100ft", trajectory.avg_dls);
    println!("  DLS violations:       {}", trajectory.dls_violation_count);
    println!("  Tortuosity:           {:.2}", trajectory.tortuosity);
    println!("  On-target score:      {:.0}/100", trajectory.on_target_score);
    if !trajectory.risk_factors.is_empty() {
        println!("  Risk factors:");
        for r in &trajectory.risk_factors {
            println!("    - {}", r);
        }
    }
    if !trajectory.opportunities.is_empty() {
        println!("  Opportunities:");
        for o in &trajectory.opportunities {
            println!("    - {}", o);
        }
    }

    let _ = registry.remove(&args.well_id);
    println!();
    println!("═════════════════════════════════════════════════════════════════");

    Ok(())
}
