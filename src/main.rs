use color_eyre::Result;
use structopt::StructOpt;

use heya::HeyaArgs;

fn main() -> Result<()> {
    let args = HeyaArgs::from_args();

    heya::run(&args)
}
