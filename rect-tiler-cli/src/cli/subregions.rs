//! Subregions command implementation.

use clap::Args;

use rect_tiler::Rectangle;

use super::common::parse_rect;
use super::error::CliError;

#[derive(Args, Debug)]
pub struct SubregionsArgs {
    /// Parent rectangle as x,y,width,height.
    #[arg(value_parser = parse_rect)]
    pub rect: Rectangle,

    /// Print at most this many subregions.
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Print only how many subregions there are.
    #[arg(short, long)]
    pub count: bool,
}

/// Execute the subregions command: list sub-rectangles largest first.
pub fn cmd_subregions(args: SubregionsArgs) -> Result<(), CliError> {
    if args.count {
        println!("{}", args.rect.subregion_count());
        return Ok(());
    }

    let limit = args.limit.unwrap_or(usize::MAX);
    for r in args.rect.subregions().take(limit) {
        println!("{}", r);
    }
    Ok(())
}
