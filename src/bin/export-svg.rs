/// Render one root group to a static SVG file
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use sunburst_rs::app::App;
use sunburst_rs::config::ChartConfig;
use sunburst_rs::render::svg::save_svg;
use sunburst_rs::tree::aggregate::ValueMode;

const USAGE: &str =
    "Usage: export-svg CSV OUT.svg [--root NAME] [--focus COMPANY] [--width PX] [--count-nodes]";

struct Args {
    csv: PathBuf,
    out: PathBuf,
    root: Option<String>,
    focus: Option<String>,
    width: f64,
    value_mode: ValueMode,
}

fn parse_args() -> Result<Args> {
    let mut positional = Vec::new();
    let mut root = None;
    let mut focus = None;
    let mut width = 1000.0;
    let mut value_mode = ValueMode::Leaves;

    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--root" => root = Some(iter.next().context("--root needs a group name")?),
            "--focus" => focus = Some(iter.next().context("--focus needs a company")?),
            "--width" => {
                let value = iter.next().context("--width needs a number")?;
                width = value
                    .parse()
                    .with_context(|| format!("Invalid width '{}'", value))?;
            }
            "--count-nodes" => value_mode = ValueMode::Nodes,
            "-h" | "--help" => {
                println!("{}", USAGE);
                std::process::exit(0);
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let [csv, out]: [PathBuf; 2] = match positional.try_into() {
        Ok(paths) => paths,
        Err(_) => bail!(USAGE),
    };
    Ok(Args {
        csv,
        out,
        root,
        focus,
        width,
        value_mode,
    })
}

fn main() -> Result<()> {
    sunburst_rs::init_logging();
    let args = parse_args()?;

    let mut config = ChartConfig::with_width(args.width);
    config.value_mode = args.value_mode;

    let mut app = App::new(config);
    app.load_file(&args.csv, args.root.as_deref())?;
    if let Some(error) = &app.last_error {
        bail!(
            "Cannot draw group '{}': {}",
            app.selector.current().unwrap_or_default(),
            error
        );
    }
    if let Some(company) = &args.focus {
        app.focus_on(company)?;
    }

    let Some(scene) = app.scene() else {
        bail!("No data in {}", args.csv.display());
    };
    save_svg(&args.out, scene)?;
    Ok(())
}
