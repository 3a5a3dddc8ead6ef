pub mod git;
pub mod greet;
pub mod hooks;

use std::path::*;

use color_eyre::Result;
use structopt::{clap::Shell, StructOpt};

#[derive(StructOpt)]
pub struct HeyaArgs {
    /// Repository to operate on, for the pre-push checks.
    #[structopt(short = "p", long = "path")]
    pub path: Option<PathBuf>,

    /// Also print the trailing "extra" line.
    #[structopt(short = "x", long = "extra")]
    pub extra: bool,

    #[structopt(subcommand)]
    pub sub: Option<HeyaSubCmd>,
}

#[derive(StructOpt)]
pub enum HeyaSubCmd {
    Completion { shell: Shell },
    PrePush,
}

/// The lines the bare invocation prints, in order.
pub fn greeting_lines(extra: bool) -> Vec<String> {
    let mut lines = vec![greet::hello("world"), greet::howdy("world")];
    if extra {
        lines.push("extra".to_string());
    }
    lines
}

pub fn run(args: &HeyaArgs) -> Result<()> {
    match &args.sub {
        None => {
            for line in greeting_lines(args.extra) {
                println!("{}", line);
            }
        }
        Some(HeyaSubCmd::PrePush) => {
            let path: Option<&Path> = args.path.as_ref().map(|p| p.as_ref());
            hooks::run(path.unwrap_or(".".as_ref()))?;
        }
        Some(HeyaSubCmd::Completion { shell }) => {
            let mut app = HeyaArgs::clap();
            let mut buffer = vec![];
            let mut buffer = std::io::Cursor::new(&mut buffer);
            app.gen_completions_to("heya", *shell, &mut buffer);

            println!("{}", std::str::from_utf8(buffer.into_inner())?);
        }
    }

    Ok(())
}
