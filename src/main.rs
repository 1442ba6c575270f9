use anyhow::Result;

fn main() -> Result<()> {
    skyglance::cli::cli()
}
