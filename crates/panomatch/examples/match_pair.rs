use argh::FromArgs;
use std::path::{Path, PathBuf};

use panomatch::{image::Image, FeaturePipeline, PipelineConfig};

/// Detect, describe and match the features of two images.
#[derive(FromArgs)]
struct Args {
    /// path to the first (query) image
    #[argh(option)]
    first: PathBuf,

    /// path to the second (train) image
    #[argh(option)]
    second: PathBuf,

    /// path to a JSON pipeline configuration
    #[argh(option)]
    config: Option<PathBuf>,

    /// path to a text file with the 9 entries of the ground truth homography
    #[argh(option)]
    homography: Option<PathBuf>,

    /// number of best matches to print
    #[argh(option, default = "10")]
    top: usize,
}

fn read_rgb8(path: &Path) -> Result<Image<u8, 3>, Box<dyn std::error::Error>> {
    let rgb = image::open(path)?.to_rgb8();
    let size = [rgb.width() as usize, rgb.height() as usize].into();
    Ok(Image::new(size, rgb.into_raw())?)
}

fn read_homography(path: &Path) -> Result<[f32; 9], Box<dyn std::error::Error>> {
    let values = std::fs::read_to_string(path)?
        .split_whitespace()
        .map(|v| v.parse::<f32>())
        .collect::<Result<Vec<_>, _>>()?;

    let h: [f32; 9] = values
        .try_into()
        .map_err(|v: Vec<f32>| format!("expected 9 homography entries, found {}", v.len()))?;
    Ok(h)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    let pipeline = FeaturePipeline::from_config(&config)?;

    let first = read_rgb8(&args.first)?;
    let second = read_rgb8(&args.second)?;

    let result = pipeline.match_pair(&first, &second)?;
    println!(
        "Found {} / {} keypoints, {} matches",
        result.first.keypoints.len(),
        result.second.keypoints.len(),
        result.matches.len()
    );

    let mut matches = result.matches.clone();
    matches.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    for m in matches.iter().take(args.top) {
        let p1 = result.first.keypoints[m.query_idx].pt();
        let p2 = result.second.keypoints[m.train_idx].pt();
        println!(
            "({:.0}, {:.0}) -> ({:.0}, {:.0})  distance {:.4}",
            p1.0, p1.1, p2.0, p2.1, m.distance
        );
    }

    if let Some(path) = &args.homography {
        let h = read_homography(path)?;
        println!("Mean reprojection error: {:.3}", result.evaluate(&h)?);
    }

    Ok(())
}
