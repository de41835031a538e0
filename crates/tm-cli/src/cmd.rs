use crate::inspect::{run_tokens_command, run_tree_command};
use crate::render::{run_prepare_command, run_render_command};
use anyhow::Result;
use clap::ArgAction;
use clap::{Args, Parser, Subcommand};

///////// Groups /////////

#[derive(Clone, Debug, Args)]
pub struct InputArgs {
    #[arg(help = "File path to read bbcode from, read stdin when absent")]
    pub file: Option<String>,

    #[arg(
        short = 'c',
        long = "config",
        help = "Path to the toml file defining the tag set. Use the standard tags when absent"
    )]
    pub config: Option<String>,
}

///////// Args /////////

#[derive(Clone, Debug, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(
        long = "json",
        help = "Print html and metadata as json",
        default_value = "false",
        action = ArgAction::SetTrue,
    )]
    pub json: bool,

    #[arg(
        short = 'p',
        long = "prepared",
        help = "Input is the output of the prepare subcommand",
        default_value = "false",
        action = ArgAction::SetTrue,
    )]
    pub prepared: bool,
}

#[derive(Clone, Debug, Args)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[derive(Clone, Debug, Args)]
pub struct TokensArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[arg(
        long = "raw",
        help = "Print all tag markers found, before pairing",
        default_value = "false",
        action = ArgAction::SetTrue,
    )]
    pub raw: bool,
}

#[derive(Clone, Debug, Args)]
pub struct TreeArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

///////// Subcommand /////////

#[derive(Clone, Debug, Parser)]
#[command(name = "tm-bbcode", version)]
pub struct Cli {
    #[arg(
        short = 'v',
        long = "verbose",
        help = "Log tag pairing and processor failures to stderr, repeat for more. TM_BBCODE_LOG overrides it",
        action = ArgAction::Count,
        global = true,
    )]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Debug, Subcommand)]
pub enum Command {
    #[command(about = "render bbcode into html")]
    Render(RenderArgs),

    #[command(about = "run the prepare pass, output is still bbcode")]
    Prepare(PrepareArgs),

    #[command(about = "print tag tokens found in bbcode")]
    Tokens(TokensArgs),

    #[command(about = "print the parsed document tree")]
    Tree(TreeArgs),
}

/// Main entry of all subcommands.
pub async fn run_command_with_args(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render(render_args) => run_render_command(render_args).await,
        Command::Prepare(prepare_args) => run_prepare_command(prepare_args).await,
        Command::Tokens(tokens_args) => run_tokens_command(tokens_args).await,
        Command::Tree(tree_args) => run_tree_command(tree_args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_render_args() {
        let cli = Cli::parse_from(["tm-bbcode", "render", "post.txt", "--json", "-c", "tags.toml"]);
        let Command::Render(args) = cli.command else {
            panic!("expected render command");
        };
        assert!(args.json);
        assert!(!args.prepared);
        assert_eq!(args.input.file.as_deref(), Some("post.txt"));
        assert_eq!(args.input.config.as_deref(), Some("tags.toml"));
    }

    #[test]
    fn verbose_is_counted_after_subcommand() {
        let cli = Cli::parse_from(["tm-bbcode", "tree", "-vv", "post.txt"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(Cli::parse_from(["tm-bbcode", "tree"]).verbose, 0);
    }

    #[test]
    fn input_defaults_to_stdin() {
        let cli = Cli::parse_from(["tm-bbcode", "tokens", "--raw"]);
        let Command::Tokens(args) = cli.command else {
            panic!("expected tokens command");
        };
        assert!(args.raw);
        assert!(args.input.file.is_none());
    }
}
