// Terminal entry point: one interactive compression session on stdin/stdout.

use image_compressor::{shell, ImageCompressor, WorkflowController};
use tokio::io::{stdin, stdout, BufReader};
use tracing::{debug, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_file(false)         // Remove file path
        .with_line_number(false)  // Remove line numbers
        .with_thread_ids(false)   // Remove thread IDs
        .with_thread_names(false) // Remove thread names
        .with_target(false)       // Remove module path
        .with_ansi(true)          // Keep colored output
        .with_writer(std::io::stderr)
        .compact();               // Use compact formatter instead of pretty

    subscriber.init();

    info!("=== Image Compressor Starting ===");

    let controller = WorkflowController::new(ImageCompressor::default());
    debug!("Compressor config: {:?}", controller.compressor().config());

    shell::run(&controller, BufReader::new(stdin()), stdout()).await?;

    let stats = controller.previews().stats();
    debug!(
        "Previews created {}, released {}, live {}",
        stats.created, stats.released, stats.live
    );
    info!("Exiting");
    Ok(())
}
