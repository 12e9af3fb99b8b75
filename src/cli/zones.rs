//! Zones command implementation

use transip_dns::{RecordProvider, Result};

use crate::cli::CommandContext;
use crate::output;

/// List the domains of the account
pub async fn list(ctx: &CommandContext) -> Result<()> {
    let zones = ctx.provider.list_zones(&ctx.options).await?;
    log::debug!("Fetched {} zones", zones.len());
    output::print(zones.as_slice(), ctx.format)
}
