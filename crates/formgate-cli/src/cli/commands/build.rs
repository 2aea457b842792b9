use super::super::args::BuildArgs;
use crate::exit_codes::SUCCESS;
use anyhow::Context;
use formgate_site::{SiteConfig, SitePipeline};

pub fn run(args: BuildArgs) -> anyhow::Result<i32> {
    let config = match &args.config {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("failed to load site config {}", path.display()))?,
        None => SiteConfig::default(),
    };
    let pipeline = SitePipeline::with_plain_highlighter(config)?;
    let report = pipeline
        .build(&args.src, &args.out)
        .with_context(|| format!("site build from {} failed", args.src.display()))?;

    println!(
        "rendered {} page(s), copied {} asset(s) into {}, {} image(s) planned for resizing",
        report.pages.len(),
        report.assets.len(),
        args.out.display(),
        report.images.len()
    );
    Ok(SUCCESS)
}
