use clap::{Parser, Subcommand};
use specimen_labels::annotate::save_annotated;
use specimen_labels::batch::FileRole;
use specimen_labels::detector::contour::ContourDetector;
use specimen_labels::logging::init_tracing;
use specimen_labels::tools::{scan_labels, scan_stats, species_index};
use specimen_labels::utils::grayscale::{load_gray, load_rgb};
use specimen_labels::{CandidateOrder, Decoder, DecoderConfig, DecodeOutcome};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "labeltool", version, about = "Specimen label diagnostics")]
struct Cli {
    /// DataMatrix candidate order: discovery or largest-first
    #[arg(long, global = true)]
    candidate_order: Option<CandidateOrder>,
    /// Log decoder internals to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a single label image
    Decode {
        #[arg(long)]
        image: PathBuf,
    },
    /// Decode a label image and save a copy with the examined regions outlined
    Annotate {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// List species tokens and image roles of a directory
    Species {
        #[arg(long)]
        dir: PathBuf,
    },
    /// Decode every label image of a directory without renaming anything
    Scan {
        #[arg(long)]
        dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = DecoderConfig::from_env();
    if let Some(order) = cli.candidate_order {
        config = config.with_candidate_order(order);
    }
    let decoder = Decoder::with_config(config);

    match cli.command {
        Command::Decode { image } => decode_cmd(&decoder, &image),
        Command::Annotate { image, out } => annotate_cmd(&decoder, &image, &out),
        Command::Species { dir } => species_cmd(&dir),
        Command::Scan { dir } => scan_cmd(&decoder, &dir),
    }
}

fn describe(outcome: &DecodeOutcome) -> String {
    match outcome {
        DecodeOutcome::Found(payload) => format!("found: {payload}"),
        DecodeOutcome::Failed(err) => format!("failed: {err}"),
        other => other.kind().to_string(),
    }
}

fn decode_cmd(decoder: &Decoder, image: &Path) {
    let gray = match load_gray(image) {
        Ok(gray) => gray,
        Err(err) => {
            eprintln!("Failed to load image {}: {}", image.display(), err);
            return;
        }
    };

    println!("Image: {} ({}x{})", image.display(), gray.width(), gray.height());
    let candidates = ContourDetector::detect(&gray, decoder.config());
    println!("Found {} square candidates", candidates.len());
    for (i, c) in candidates.iter().take(10).enumerate() {
        println!(
            "  Candidate {}: x={} y={} {}x{} area={:.0} aspect={:.2}",
            i,
            c.x,
            c.y,
            c.width,
            c.height,
            c.area,
            c.aspect_ratio()
        );
    }

    let start = Instant::now();
    let mut annotations = Vec::new();
    let outcome = decoder.decode_gray(&gray, &mut annotations);
    println!("Result: {} ({:.2?})", describe(&outcome), start.elapsed());
}

fn annotate_cmd(decoder: &Decoder, image: &Path, out: &Path) {
    let rgb = match load_rgb(image) {
        Ok(rgb) => rgb,
        Err(err) => {
            eprintln!("Failed to load image {}: {}", image.display(), err);
            return;
        }
    };

    let (outcome, annotations) =
        decoder.decode_image_annotated(&image::DynamicImage::ImageRgb8(rgb.clone()));
    println!("Result: {}", describe(&outcome));
    println!("Outlined {} region(s)", annotations.len());
    if let Err(err) = save_annotated(&rgb, &annotations, out) {
        eprintln!("Failed to save {}: {}", out.display(), err);
    }
}

fn species_cmd(dir: &Path) {
    let index = match species_index(dir) {
        Ok(index) => index,
        Err(err) => {
            eprintln!("Failed to index {}: {}", dir.display(), err);
            return;
        }
    };

    println!("{} image(s), {} species", index.files().len(), index.species().len());
    for species in index.species() {
        println!("{species}");
        for file in index.group(species) {
            let role = match file.role {
                FileRole::Specimen => "specimen",
                FileRole::Label => "label",
            };
            println!("  [{role}] {}", file.name);
        }
        if let Err(err) = index.pair_for(species) {
            println!("  ! {err}");
        }
    }
}

fn scan_cmd(decoder: &Decoder, dir: &Path) {
    let start = Instant::now();
    let entries = match scan_labels(dir, decoder) {
        Ok(entries) => entries,
        Err(err) => {
            eprintln!("Failed to scan {}: {}", dir.display(), err);
            return;
        }
    };

    if entries.is_empty() {
        println!("No label images found under {}", dir.display());
        return;
    }
    for entry in &entries {
        match &entry.payload {
            Some(payload) => println!("  [OK] {} -> {}", entry.label.display(), payload),
            None => println!("  [FAIL] {} ({})", entry.label.display(), entry.kind),
        }
    }
    let stats = scan_stats(&entries);
    println!(
        "Decoded {}/{} = {:.2}% in {:.2?}",
        stats.decoded,
        stats.total,
        stats.rate(),
        start.elapsed()
    );
}
