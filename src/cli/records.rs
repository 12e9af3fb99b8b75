//! Records command implementations

use colored::Colorize;

use transip_dns::{Record, RecordProvider, Result};

use crate::cli::{CommandContext, OutputFormat, RecordArgs, RecordFilterArgs};
use crate::output;

pub async fn list(ctx: &CommandContext, zone: &str) -> Result<()> {
    let mut records = ctx.provider.get_records(zone, &ctx.options).await?;
    records.sort_by(|a, b| {
        a.name
            .cmp(&b.name)
            .then_with(|| a.record_type.cmp(&b.record_type))
    });
    output::print(records.as_slice(), ctx.format)
}

pub async fn append(ctx: &CommandContext, zone: &str, args: &RecordArgs) -> Result<()> {
    let created = ctx
        .provider
        .append_records(zone, &[args.to_record()], &ctx.options)
        .await?;
    report(ctx, "Added", &created)
}

pub async fn set(ctx: &CommandContext, zone: &str, args: &RecordArgs) -> Result<()> {
    let written = ctx
        .provider
        .set_records(zone, &[args.to_record()], &ctx.options)
        .await?;
    report(ctx, "Set", &written)
}

pub async fn delete(ctx: &CommandContext, zone: &str, args: &RecordFilterArgs) -> Result<()> {
    let removed = ctx
        .provider
        .delete_records(zone, &[args.to_filter()], &ctx.options)
        .await?;
    report(ctx, "Deleted", &removed)
}

fn report(ctx: &CommandContext, verb: &str, records: &[Record]) -> Result<()> {
    if ctx.format == OutputFormat::Json {
        return output::print(records, ctx.format);
    }

    if records.is_empty() {
        println!("{} Nothing to change", "○".dimmed());
        return Ok(());
    }
    for record in records {
        println!("{} {} {}", "✓".green(), verb, record);
    }
    Ok(())
}
