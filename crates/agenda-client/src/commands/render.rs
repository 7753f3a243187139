//! Render and asset listing commands.

use agenda_pipeline::{EventPipeline, PipelineConfig, StaticAssets};
use tracing::{info, warn};

use crate::cli::RenderArgs;
use crate::config::{ClientConfig, RenderOptions};
use crate::error::ClientResult;
use crate::renderer::FormatRenderer;

/// Builds the pipeline and warns when it would render nothing.
fn pipeline(config: &ClientConfig) -> ClientResult<EventPipeline> {
    let pipeline_config: PipelineConfig = config.agenda.to_pipeline_config();
    if !pipeline_config.enabled {
        warn!("Agenda is disabled, set `enabled = true` in [agenda] to fetch events");
    }
    Ok(EventPipeline::from_config(pipeline_config)?)
}

/// Runs one render and returns its output with the registered assets.
pub async fn run(config: &ClientConfig, options: &RenderOptions) -> ClientResult<(String, StaticAssets)> {
    let mut pipeline = pipeline(config)?;
    let mut renderer = FormatRenderer::new(options.format);

    info!(page = %options.page_url, allow = %options.allow_list, "Rendering agenda");
    let output = pipeline
        .render(&options.allow_list, &options.page_url, &mut renderer)
        .await?;
    renderer.finish()?;

    Ok((output, pipeline.assets().clone()))
}

/// Prints the rendered agenda.
pub async fn render(config: &ClientConfig, args: &RenderArgs) -> ClientResult<()> {
    let options = config.render.merge(args);
    let (output, _) = run(config, &options).await?;
    print!("{}", output);
    Ok(())
}

/// Prints the files registered for publication during a render.
pub async fn assets(config: &ClientConfig, args: &RenderArgs) -> ClientResult<()> {
    let options = config.render.merge(args);
    let (_, assets) = run(config, &options).await?;
    if assets.is_empty() {
        println!("No new assets.");
    }
    for asset in assets.iter() {
        println!("{}", asset.site_path());
    }
    Ok(())
}
