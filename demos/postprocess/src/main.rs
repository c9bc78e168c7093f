use argh::FromArgs;
use std::path::PathBuf;

use saliency::{
    image::{ops::cast_and_scale, Image},
    imgproc::color::ColorSpace,
    io::functional::{save_image, to_u8_image, SaveOptions},
    post_process, pre_process, PostProcessOptions, PreProcessOptions,
};

/// Post-processes a synthetic saliency map and saves it as a PNG image
#[derive(FromArgs)]
struct Args {
    /// path of the output PNG image
    #[argh(option, short = 'o')]
    output: PathBuf,

    /// color space the synthetic image is re-encoded to
    #[argh(option, short = 'c', default = "ColorSpace::Rgb")]
    color_space: ColorSpace,

    /// post-processing options as a JSON object
    #[argh(option, short = 'j')]
    options: Option<String>,

    /// path of a JSON file with the post-processing options
    #[argh(option, short = 'f')]
    options_file: Option<PathBuf>,

    /// width of the synthetic image
    #[argh(option, default = "256")]
    width: usize,

    /// height of the synthetic image
    #[argh(option, default = "192")]
    height: usize,

    /// owner of the saved file
    #[argh(option)]
    uid: Option<u32>,

    /// group of the saved file
    #[argh(option)]
    gid: Option<u32>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let options = match (&args.options, &args.options_file) {
        (Some(json), _) => PostProcessOptions::from_json_str(json)?,
        (None, Some(path)) => {
            PostProcessOptions::from_json_str(&std::fs::read_to_string(path)?)?
        }
        (None, None) => PostProcessOptions::default(),
    };
    log::info!("post-processing options: {options:?}");

    // two soft blobs over a gradient
    let (width, height) = (args.width, args.height);
    let rgb = Image::<u8, 3>::from_fn([width, height].into(), |r, c, ch| {
        let blob = |cy: f64, cx: f64, s: f64| {
            let (dy, dx) = (r as f64 - cy * height as f64, c as f64 - cx * width as f64);
            (-(dy * dy + dx * dx) / (2.0 * s * s)).exp()
        };
        let v = 0.6 * blob(0.3, 0.7, 20.0) + 0.4 * blob(0.7, 0.25, 35.0);
        let v = v + 0.2 * (c as f64 / width as f64);
        (255.0 * v.min(1.0) * [1.0, 0.8, 0.5][ch]) as u8
    });

    let pre = pre_process(
        &rgb,
        &PreProcessOptions {
            color_space: args.color_space,
        },
    )?;

    let mut raw = Image::<f64, 1>::from_size_val(pre.size(), 0.0)?;
    cast_and_scale(&pre.channel(0)?, &mut raw, 1.0 / 255.0)?;

    let map = post_process(&raw, &options)?;

    let save_options = SaveOptions {
        uid: args.uid,
        gid: args.gid,
        ..Default::default()
    };
    save_image(&args.output, &to_u8_image(&map).into(), &save_options)?;

    log::info!("saved saliency map to {}", args.output.display());

    Ok(())
}
