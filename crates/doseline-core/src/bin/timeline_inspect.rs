//! timeline-inspect - print the timeline built from an experience document
//!
//! Usage: timeline-inspect <experience.yaml> [--individual] [--independent] [--relative]
//!
//! Reads `timeline.yaml` from the doseline config dir if present.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, Offset};

use doseline_core::config::{default_config_path, load_config};
use doseline_core::{load_experience, TimelineConfig, TimelineModel};

/// Canvas width used for axis labels
const CANVAS_WIDTH_PX: f64 = 800.0;
/// Half the default stroke width, kept free at the right edge
const HALF_LINE_WIDTH_PX: f64 = 2.5;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Set RUST_LOG=debug to see shape selection per lane
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let Some(path) = args.iter().find(|arg| !arg.starts_with("--")) else {
        bail!("usage: timeline-inspect <experience.yaml> [--individual] [--independent] [--relative]");
    };
    let path = PathBuf::from(path);

    let config: TimelineConfig = load_config(&default_config_path("timeline.yaml"));
    let document = load_experience(&path).with_context(|| format!("Cannot inspect {:?}", path))?;

    let mut flags = document.flags;
    flags.are_redoses_drawn_individually |= args.iter().any(|a| a == "--individual");
    flags.are_substance_heights_independent |= args.iter().any(|a| a == "--independent");
    flags.is_time_relative |= args.iter().any(|a| a == "--relative");

    let mut inputs = document.to_inputs();
    inputs.utc_offset = Some(Local::now().offset().fix());
    for consumer in inputs.distinct_consumers() {
        log::info!("Also dosed: {} (not shown)", consumer);
    }

    let table = document.to_table();
    let Some(model) = TimelineModel::build(&inputs, &table, flags, &config) else {
        println!("Nothing visible in {:?}", path);
        return Ok(());
    };
    print_model(&model, &config);
    Ok(())
}

fn print_model(model: &TimelineModel, config: &TimelineConfig) {
    println!("Start:       {}", model.start_time);
    println!("Total width: {:.1} h", model.total_width / 3_600.0);
    if !model.is_worth_drawing {
        println!("(no duration info and no markers, a timeline would be empty)");
    }
    println!();

    for group in &model.groups {
        println!(
            "{:<20} {:<12} {:<24} {:>7.2}h .. {:>7.2}h  height {:.2}",
            group.substance_name,
            group.route,
            group.shape(),
            group.start_in_seconds / 3_600.0,
            group.end_relative_to_start_in_seconds() / 3_600.0,
            group.normalized_height()
        );
    }

    if !model.ratings.is_empty() || !model.timed_notes.is_empty() {
        println!();
    }
    for rating in &model.ratings {
        println!("Rating {:<5} at {:>7.2}h", rating.option.label(), rating.distance_from_start / 3_600.0);
    }
    for note in &model.timed_notes {
        println!("Note ({:?}) at {:>7.2}h", note.color, note.distance_from_start / 3_600.0);
    }

    let pixels_per_sec = (CANVAS_WIDTH_PX - HALF_LINE_WIDTH_PX) / model.total_width;
    let labels: Vec<String> = model
        .axis
        .get_full_hours(pixels_per_sec, CANVAS_WIDTH_PX, config.min_label_spacing_px)
        .into_iter()
        .map(|hour| format!("{}@{:.0}px", hour.label, hour.distance_from_start))
        .collect();
    println!();
    println!("Axis ({} px): {}", CANVAS_WIDTH_PX, labels.join("  "));
}
