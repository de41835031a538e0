use crate::cmd::{TokensArgs, TreeArgs};
use crate::config::TagSetConfig;
use crate::utils::read_input;
use anyhow::{Context, Result};
use tm_bbcode_parser::BBCodeParser;

fn format_tokens(parser: &BBCodeParser, content: &str, raw: bool) -> String {
    let tokens = if raw {
        parser.scan(content)
    } else {
        parser.tokenize(content)
    };
    tokens.iter().map(|x| format!("{x}\n")).collect()
}

pub async fn run_tokens_command(args: TokensArgs) -> Result<()> {
    let parser = TagSetConfig::load(args.input.config.as_deref())
        .await?
        .parser();
    let content = read_input(args.input.file.as_deref()).await?;
    print!("{}", format_tokens(&parser, &content, args.raw));
    Ok(())
}

pub async fn run_tree_command(args: TreeArgs) -> Result<()> {
    let parser = TagSetConfig::load(args.input.config.as_deref())
        .await?
        .parser();
    let content = read_input(args.input.file.as_deref()).await?;
    let document = parser.parse(&content).context("failed to parse input")?;
    print!("{document}");
    Ok(())
}
