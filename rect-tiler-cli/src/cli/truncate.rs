//! Truncate command implementation.
//!
//! Input is JSON:
//!
//! ```json
//! { "subject": {"x": 1, "y": 1, "width": 2, "height": 6},
//!   "obstacles": [{"x": 2, "y": 2, "width": 4, "height": 4}] }
//! ```

use clap::Args;
use serde::Deserialize;

use rect_tiler::{RectSpec, Rectangle};

use super::common::{read_input, JsonRect};
use super::error::CliError;

#[derive(Args, Debug)]
pub struct TruncateArgs {
    /// JSON input file (- for stdin).
    #[arg(default_value = "-")]
    pub input: String,
}

#[derive(Debug, Deserialize)]
struct TruncateInput {
    subject: JsonRect,
    #[serde(default)]
    obstacles: Vec<JsonRect>,
}

/// Largest piece of the subject clear of every obstacle, or `None`.
fn truncate_json(content: &str) -> Result<Option<Rectangle>, CliError> {
    let input: TruncateInput = serde_json::from_str(content)?;
    let subject = Rectangle::try_from(RectSpec::from(input.subject))?;
    let obstacles: Vec<RectSpec> = input.obstacles.into_iter().map(RectSpec::from).collect();

    log::debug!("truncating {} against {} obstacles", subject, obstacles.len());
    Ok(subject.truncate_specs(&obstacles)?)
}

/// Execute the truncate command.
pub fn cmd_truncate(args: TruncateArgs) -> Result<(), CliError> {
    let content = read_input(&args.input)?;
    let result = truncate_json(&content)?;
    println!("{}", serde_json::to_string(&result.map(JsonRect::from))?);
    Ok(())
}
