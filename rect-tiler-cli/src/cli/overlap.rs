//! Overlap command implementation.

use clap::Args;

use rect_tiler::Rectangle;

use super::common::{parse_rect, JsonRect};
use super::error::CliError;

#[derive(Args, Debug)]
pub struct OverlapArgs {
    /// First rectangle as x,y,width,height.
    #[arg(value_parser = parse_rect)]
    pub subject: Rectangle,

    /// Second rectangle as x,y,width,height.
    #[arg(value_parser = parse_rect)]
    pub other: Rectangle,

    /// Print JSON (null when there is no overlap).
    #[arg(long)]
    pub json: bool,
}

/// Execute the overlap command.
pub fn cmd_overlap(args: OverlapArgs) -> Result<(), CliError> {
    let overlap = args.subject.overlap(&args.other);

    if args.json {
        println!("{}", serde_json::to_string(&overlap.map(JsonRect::from))?);
    } else {
        match overlap {
            Some(r) => println!("{}", r),
            None => println!("none"),
        }
    }
    Ok(())
}
