//! Ping command implementation

use colored::Colorize;

use transip_dns::Result;

use crate::cli::CommandContext;

/// Call the API health endpoint
pub async fn run(ctx: &CommandContext) -> Result<()> {
    ctx.provider.ping(&ctx.options).await?;
    println!("{} {}", "✓".green(), "pong".bold());
    Ok(())
}
