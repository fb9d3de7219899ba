#![doc = env!("CARGO_PKG_DESCRIPTION")]

mod report;

use argh::FromArgs;
use std::path::PathBuf;

use xray::batch::{save_batch, BatchTask};
use xray::enhance::{list_techniques, Technique};

#[derive(FromArgs)]
/// Enhance X-ray images with a fixed set of techniques and compare their quality metrics
struct Args {
    /// path to an input image, repeat to process several images
    #[argh(option, short = 'i')]
    input: Vec<PathBuf>,

    /// directory to save every processed image into
    #[argh(option, short = 'o')]
    output_dir: Option<PathBuf>,

    /// label of the technique to compare against the original
    #[argh(option, short = 't')]
    technique: Option<String>,

    /// write the metrics of every image and technique as JSON to this file
    #[argh(option)]
    report: Option<PathBuf>,

    /// list the available techniques and exit
    #[argh(switch)]
    list: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Args = argh::from_env();

    if args.list {
        for technique in list_techniques() {
            println!("{technique}");
        }
        return Ok(());
    }

    let technique = match args.technique.as_deref() {
        Some(label) => Technique::from_label(label)?,
        None => *list_techniques().first().ok_or("no technique registered")?,
    };

    if args.input.is_empty() {
        log::warn!("no input image given, nothing to do");
        return Ok(());
    }

    log::info!("processing {} images", args.input.len());

    let batch = BatchTask::spawn(args.input).wait()?;

    if batch.is_empty() {
        log::warn!("none of the input images could be loaded");
        return Ok(());
    }

    let label = technique.label();
    for entry in batch.iter() {
        if let Some(text) = report::comparison_text(entry, &label) {
            println!("{text}");
        }
    }

    if let Some(output_dir) = args.output_dir {
        let written = save_batch(&batch, &output_dir)?;
        log::info!("saved {} images to {}", written, output_dir.display());
    }

    if let Some(report_path) = args.report {
        let file = std::fs::File::create(&report_path)?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &batch.metrics_report())?;
        log::info!("wrote metrics report to {}", report_path.display());
    }

    Ok(())
}
