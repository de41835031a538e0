use crate::cmd::{PrepareArgs, RenderArgs};
use crate::config::TagSetConfig;
use crate::utils::read_input;
use anyhow::{Context, Result};
use tm_bbcode_parser::RenderOutput;

fn format_output(output: &RenderOutput, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(output).context("failed to serialize render output")
    } else {
        Ok(output.html.clone())
    }
}

pub async fn run_render_command(args: RenderArgs) -> Result<()> {
    let parser = TagSetConfig::load(args.input.config.as_deref())
        .await?
        .parser();
    let content = read_input(args.input.file.as_deref()).await?;
    let output = if args.prepared {
        parser.render_prepared(&content)
    } else {
        parser.render(&content)
    };
    let output = output.context("failed to parse input")?;

    for error in output.errors.iter() {
        eprintln!("warning: {error}");
    }
    println!("{}", format_output(&output, args.json)?);
    Ok(())
}

pub async fn run_prepare_command(args: PrepareArgs) -> Result<()> {
    let parser = TagSetConfig::load(args.input.config.as_deref())
        .await?
        .parser();
    let content = read_input(args.input.file.as_deref()).await?;
    let prepared = parser.prepare(&content).context("failed to parse input")?;
    print!("{prepared}");
    Ok(())
}
